//! `list` output parsing

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::FlowSummary;

/// Info glyph the CLI prefixes its banners with
const INFO_GLYPH: char = 'ℹ';
/// "found", as in the "found N flows" banner
const FOUND_WORD: &str = "找到";
/// "ungrouped" section marker
const UNGROUPED_MARKER: &str = "未分组";

static ENTRY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s{2,}(\S+)\s{2,}(\S.*)$").unwrap());
/// Indented token followed by an entry gap but no name
static NAMELESS_ENTRY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s{2,}\S+\s{2,}$").unwrap());
static GROUP_HEADER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\S+(?: \S+)*)\s*$").unwrap());

/// Classification of a single `list` output line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineTag {
    Blank,
    /// Banner such as "ℹ 找到 3 个流程"; never a header or entry
    Diagnostic,
    /// Following entries have no group
    Ungrouped,
    /// Following entries belong to this group
    GroupHeader(String),
    Entry { id: String, name: String },
    Unmatched,
}

/// Classify one line.
///
/// Checks run in order: blank, diagnostic, ungrouped marker, group header, entry.
/// A header never contains a run of two spaces and an entry always does, so the
/// two patterns do not overlap. An indented id with a trailing gap and no name
/// is an entry missing its name, not a header.
pub fn classify_list_line(line: &str) -> LineTag {
    if line.trim().is_empty() {
        return LineTag::Blank;
    }
    if line.contains(INFO_GLYPH) || line.contains(FOUND_WORD) {
        return LineTag::Diagnostic;
    }
    if line.contains(UNGROUPED_MARKER) {
        return LineTag::Ungrouped;
    }
    if NAMELESS_ENTRY_PATTERN.is_match(line) {
        return LineTag::Unmatched;
    }
    if let Some(caps) = GROUP_HEADER_PATTERN.captures(line) {
        let group = caps[1].trim_end_matches([':', '：']).trim_end();
        if !group.is_empty() {
            return LineTag::GroupHeader(group.to_string());
        }
        return LineTag::Unmatched;
    }
    if let Some(caps) = ENTRY_PATTERN.captures(line) {
        return LineTag::Entry {
            id: caps[1].to_string(),
            name: caps[2].trim().to_string(),
        };
    }
    LineTag::Unmatched
}

/// Parse `list` output into flow summaries, in input order.
///
/// Entries take the most recent group header above them, or none after an
/// ungrouped marker. Unrecognized lines are skipped.
pub fn parse_flow_list(text: &str) -> Vec<FlowSummary> {
    let mut current_group: Option<String> = None;
    let mut flows = Vec::new();

    for line in text.lines() {
        match classify_list_line(line) {
            LineTag::Ungrouped => current_group = None,
            LineTag::GroupHeader(group) => current_group = Some(group),
            LineTag::Entry { id, name } => flows.push(FlowSummary {
                id,
                name,
                group: current_group.clone(),
            }),
            LineTag::Blank | LineTag::Diagnostic | LineTag::Unmatched => {}
        }
    }

    flows
}
