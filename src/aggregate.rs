//! Buckets per-node classifications into dashboard rows keyed by queue group.

use crate::classify::{Symbol, classify_load, classify_reservation};
use crate::scheduler::queue::QueueBlock;

/// One dashboard row. Symbols are in the order the nodes appear in `qstat -f`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub group: String,
    pub reserved: Vec<Symbol>,
    pub actual: Vec<Symbol>,
}

impl GroupSummary {
    fn new(group: &str) -> Self {
        GroupSummary {
            group: group.to_string(),
            reserved: Vec::new(),
            actual: Vec::new(),
        }
    }
}

/// Classify every block and append its two symbols to its group. Groups keep the
/// order in which they were first seen.
pub fn summarize(blocks: &[QueueBlock]) -> Vec<GroupSummary> {
    let mut groups: Vec<GroupSummary> = Vec::new();

    for block in blocks {
        let reserved = classify_reservation(&block.jobs, block.equipped_cpus);
        let actual = classify_load(block.load_avg, f64::from(block.equipped_cpus));
        tracing::trace!(queue = %block.queue, ?reserved, ?actual, "classified queue instance");

        let idx = match groups.iter().position(|g| g.group == block.group()) {
            Some(idx) => idx,
            None => {
                groups.push(GroupSummary::new(block.group()));
                groups.len() - 1
            }
        };
        groups[idx].reserved.push(reserved);
        groups[idx].actual.push(actual);
    }

    groups
}
