//! Parsers for the human-oriented text printed by the flow CLI.
//!
//! The CLI has no machine-readable output mode, so these parsers encode the
//! layout it prints today. Any layout change upstream shows up here as missing
//! records or fields, never as an error. Bump [`OUTPUT_GRAMMAR_VERSION`] and
//! the fixtures in the tests whenever the grammar below changes.
//!
//! # Grammar v1
//!
//! `list`:
//!
//! ```text
//! ℹ 找到 3 个流程            <- diagnostic banner (ℹ glyph or 找到), ignored
//! Prod                      <- group header: content without a double-space gap
//!   graph-1  My Flow        <- entry: >=2 spaces, id, >=2 spaces, name
//! 未分组                     <- ungrouped marker: resets the group to null
//!   graph-2  Scratch
//! ```
//!
//! `show <id> -e`:
//!
//! ```text
//! ID: g1                    <- labeled fields, any order, ASCII or full-width colon
//! 名称: Demo
//! 节点数: 3
//! 边数: 2
//! 节点列表:                  <- node section start; runs to end of input
//! - n1 (start): Begin       <- "- id (type): label"
//! ```

mod list;
mod show;

pub use list::{classify_list_line, parse_flow_list, LineTag};
pub use show::{parse_flow_show, parse_flow_show_report, ShowReport};

/// Version of the CLI output layout these parsers understand
pub const OUTPUT_GRAMMAR_VERSION: u32 = 1;
