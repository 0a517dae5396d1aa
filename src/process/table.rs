/*!
 * Process Table
 * Pid-keyed store owned by a single engine instance
 */

use super::types::{Process, ProcessState};
use crate::core::types::Pid;
use std::collections::BTreeMap;

/// Owned process store
///
/// Ordered by pid so every scan (admission, metrics, export) visits processes in
/// creation order, which keeps seeded runs reproducible.
#[derive(Debug, Clone, Default)]
pub struct ProcessTable {
    processes: BTreeMap<Pid, Process>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, process: Process) {
        self.processes.insert(process.pid, process);
    }

    #[inline]
    pub fn get(&self, pid: Pid) -> Option<&Process> {
        self.processes.get(&pid)
    }

    #[inline]
    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut Process> {
        self.processes.get_mut(&pid)
    }

    #[inline]
    pub fn contains(&self, pid: Pid) -> bool {
        self.processes.contains_key(&pid)
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn clear(&mut self) {
        self.processes.clear();
    }

    /// Processes in pid order
    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.processes.values()
    }

    /// Pids of every process currently in `state`, in pid order
    pub fn pids_in_state(&self, state: ProcessState) -> Vec<Pid> {
        self.processes
            .values()
            .filter(|p| p.state == state)
            .map(|p| p.pid)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_basic() {
        let mut table = ProcessTable::new();
        table.insert(Process::init());
        table.insert(Process::new(2, "P2".into(), 5, 1, 0));
        table.insert(Process::new(1, "P1".into(), 5, 1, 0));

        assert_eq!(table.len(), 3);
        assert!(table.contains(1));
        assert!(!table.contains(9));

        let order: Vec<Pid> = table.iter().map(|p| p.pid).collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(table.pids_in_state(ProcessState::New), vec![1, 2]);
    }
}
