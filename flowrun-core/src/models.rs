//! Structured records parsed from flow CLI output

use serde::{Deserialize, Serialize};

/// One flow in the `list` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSummary {
    pub id: String,
    pub name: String,
    /// None when the flow is ungrouped
    pub group: Option<String>,
}

/// A node line from the `show` node list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub label: String,
}

/// Flow detail from `show <id> -e`; every field defaults when absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDetail {
    pub id: String,
    pub name: String,
    pub node_count: u32,
    pub edge_count: u32,
    pub nodes: Vec<NodeInfo>,
}

/// Which parts of a `show` output were actually recognized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPresence {
    pub id: bool,
    pub name: bool,
    pub node_count: bool,
    pub edge_count: bool,
    pub node_section: bool,
}

/// Overall verdict on a parsed `show` output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseCompleteness {
    /// Every field and the node section were found
    Complete,
    /// Some, but not all, were found
    Partial,
    /// Nothing recognizable
    Empty,
}

impl FieldPresence {
    pub fn completeness(&self) -> ParseCompleteness {
        let flags = [
            self.id,
            self.name,
            self.node_count,
            self.edge_count,
            self.node_section,
        ];
        match flags.iter().filter(|&&f| f).count() {
            0 => ParseCompleteness::Empty,
            n if n == flags.len() => ParseCompleteness::Complete,
            _ => ParseCompleteness::Partial,
        }
    }
}
