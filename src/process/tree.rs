/*!
 * Process Tree
 * Parent/child forest built from the process table
 */

use super::table::ProcessTable;
use super::types::ProcessState;
use crate::core::types::{Burst, Pid};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One node of the process forest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessNode {
    pub pid: Pid,
    pub name: String,
    pub state: ProcessState,
    pub remaining_burst: Burst,
    pub total_burst: Burst,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ProcessNode>,
}

/// Build the forest: roots are processes with no parent or a parent missing from
/// the table, children follow creation order.
pub fn build_forest(table: &ProcessTable) -> Vec<ProcessNode> {
    table
        .iter()
        .filter(|p| p.parent_pid.map_or(true, |parent| !table.contains(parent)))
        .filter_map(|root| build_node(table, root.pid))
        .collect()
}

fn build_node(table: &ProcessTable, pid: Pid) -> Option<ProcessNode> {
    let process = table.get(pid)?;
    Some(ProcessNode {
        pid,
        name: process.name.clone(),
        state: process.state,
        remaining_burst: process.remaining_burst,
        total_burst: process.total_burst,
        children: process
            .children
            .iter()
            .filter_map(|&child| build_node(table, child))
            .collect(),
    })
}

impl ProcessNode {
    /// Number of nodes in this subtree, including itself
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(ProcessNode::size).sum::<usize>()
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let marker = if depth == 0 { "*" } else { "|-" };
        writeln!(
            f,
            "{}{} PID {}: {} [{}] ({}/{})",
            "  ".repeat(depth),
            marker,
            self.pid,
            self.name,
            self.state,
            self.remaining_burst,
            self.total_burst
        )?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for ProcessNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
