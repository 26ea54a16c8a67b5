//! `show <id> -e` output parsing

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{FieldPresence, FlowDetail, NodeInfo};

const ID_LABELS: &[&str] = &["ID:", "ID："];
const NAME_LABELS: &[&str] = &["名称:", "名称："];
const NODE_COUNT_LABELS: &[&str] = &["节点数:", "节点数："];
const EDGE_COUNT_LABELS: &[&str] = &["边数:", "边数："];
/// "node list" heading that opens the node section
const NODE_SECTION_MARKER: &str = "节点列表";

static NODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*-\s*([^\s(]+)\s*\(([^)]*)\)\s*[:：]\s*(.*)$").unwrap());

/// Parsed `show` output plus what was actually recognized
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowReport {
    pub detail: FlowDetail,
    pub presence: FieldPresence,
}

/// Parse `show` output into a [`FlowDetail`]; unrecognized parts stay default.
pub fn parse_flow_show(text: &str) -> FlowDetail {
    parse_flow_show_report(text).detail
}

/// Parse `show` output, also reporting which fields were present.
///
/// Labeled fields are found regardless of line order; the first occurrence of
/// each label wins. Counts take their leading digits, and a count without any
/// digits stays 0 and is reported as absent. Nodes are collected in order from
/// every line after the node-list heading.
pub fn parse_flow_show_report(text: &str) -> ShowReport {
    let mut report = ShowReport::default();
    let detail = &mut report.detail;
    let presence = &mut report.presence;

    for line in text.lines() {
        if !presence.id {
            if let Some(value) = labeled_value(line, ID_LABELS) {
                detail.id = value.to_string();
                presence.id = !value.is_empty();
            }
        }
        if !presence.name {
            if let Some(value) = labeled_value(line, NAME_LABELS) {
                detail.name = value.to_string();
                presence.name = !value.is_empty();
            }
        }
        if !presence.node_count {
            if let Some(count) = labeled_value(line, NODE_COUNT_LABELS).and_then(leading_int) {
                detail.node_count = count;
                presence.node_count = true;
            }
        }
        if !presence.edge_count {
            if let Some(count) = labeled_value(line, EDGE_COUNT_LABELS).and_then(leading_int) {
                detail.edge_count = count;
                presence.edge_count = true;
            }
        }
    }

    let mut in_nodes = false;
    for line in text.lines() {
        if !in_nodes {
            in_nodes = line.contains(NODE_SECTION_MARKER);
            continue;
        }
        if !line.contains('-') {
            continue;
        }
        if let Some(caps) = NODE_PATTERN.captures(line) {
            detail.nodes.push(NodeInfo {
                id: caps[1].to_string(),
                node_type: caps[2].trim().to_string(),
                label: caps[3].trim().to_string(),
            });
        }
    }
    presence.node_section = in_nodes;

    report
}

/// Trimmed text after the first matching label on the line
fn labeled_value<'a>(line: &'a str, labels: &[&str]) -> Option<&'a str> {
    labels
        .iter()
        .find_map(|label| line.split_once(label))
        .map(|(_, rest)| rest.trim())
}

fn leading_int(value: &str) -> Option<u32> {
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().ok()
}
