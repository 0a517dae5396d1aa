/*!
 * Scheduler Core Operations
 * Enqueue, dequeue, dispatch and preemption
 */

use super::Scheduler;
use crate::core::types::{Pid, Priority, Tick};
use crate::process::table::ProcessTable;
use crate::process::types::ProcessState;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// Why the running process lost the CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreemptReason {
    /// A strictly more important level has waiters
    Priority,
    /// The quantum was used up
    Quantum,
}

impl Scheduler {
    /// Enqueue `pid` at the tail of the level matching its current priority
    ///
    /// Refuses unknown pids, pids already queued, and the running pid.
    pub fn add_to_ready(&mut self, pid: Pid, table: &ProcessTable) -> bool {
        let Some(process) = table.get(pid) else {
            return false;
        };
        if self.locations.contains_key(&pid) || self.current == Some(pid) {
            return false;
        }

        let level = self.level_for(process.priority);
        self.queues[level as usize].push_back(pid);
        self.locations.insert(pid, level);
        trace!("Process {} queued at level {}", pid, level);
        true
    }

    /// Remove `pid` from whichever level holds it - O(1) lookup + O(n) scan
    pub fn remove_from_ready(&mut self, pid: Pid) -> bool {
        let Some(level) = self.locations.remove(&pid) else {
            return false;
        };

        let queue = &mut self.queues[level as usize];
        match queue.iter().position(|&queued| queued == pid) {
            Some(pos) => {
                queue.remove(pos);
                trace!("Process {} removed from level {}", pid, level);
                true
            }
            None => false,
        }
    }

    /// Pop the head of the most important non-empty level
    pub fn get_next_process(&mut self) -> Option<Pid> {
        let pid = self
            .queues
            .iter_mut()
            .find_map(|queue| queue.pop_front())?;
        self.locations.remove(&pid);
        Some(pid)
    }

    /// Dispatch `pid` onto the CPU
    pub fn set_running(&mut self, pid: Pid, table: &mut ProcessTable, now: Tick) -> bool {
        let Some(process) = table.get_mut(pid) else {
            return false;
        };
        // Never leave a stale queue entry behind a running pid
        self.remove_from_ready(pid);

        process.state = ProcessState::Running;
        if process.start_tick.is_none() {
            process.start_tick = Some(now);
        }

        self.current = Some(pid);
        self.quantum_used = 0;
        self.context_switches += 1;
        self.total_scheduled += 1;
        debug!("Scheduled process {} (priority {})", pid, process.priority);
        true
    }

    /// Evaluate preemption for the running process after one executed unit
    ///
    /// Priority preemption is checked before quantum expiry so a more important
    /// arrival deposes the runner mid-quantum.
    pub fn preempt_current(&mut self, table: &mut ProcessTable) -> Option<PreemptReason> {
        let pid = self.current?;
        let Some(process) = table.get(pid) else {
            self.release_current();
            return None;
        };

        let running_level = self.level_for(process.priority);
        let reason = if self.has_waiter_above(running_level) {
            PreemptReason::Priority
        } else if self.quantum_used >= self.quantum {
            PreemptReason::Quantum
        } else {
            return None;
        };

        if let Some(process) = table.get_mut(pid) {
            process.state = ProcessState::Ready;
            process.preempt_count += 1;
        }
        self.release_current();
        self.add_to_ready(pid, table);
        self.context_switches += 1;
        self.preemptions += 1;

        debug!("Process {} preempted ({:?})", pid, reason);
        Some(reason)
    }

    /// Clear the running slot without re-queueing (block, terminate)
    pub fn release_current(&mut self) -> Option<Pid> {
        self.quantum_used = 0;
        self.current.take()
    }

    /// Currently running pid
    #[inline]
    pub fn current(&self) -> Option<Pid> {
        self.current
    }

    /// Units the running process has used of its quantum
    #[inline]
    pub fn quantum_used(&self) -> u32 {
        self.quantum_used
    }

    /// True when `pid` waits in any ready queue
    #[inline]
    pub fn contains(&self, pid: Pid) -> bool {
        self.locations.contains_key(&pid)
    }

    /// Pids waiting at `level`, head first
    pub fn queue(&self, level: Priority) -> Vec<Pid> {
        self.queues
            .get(level as usize)
            .map(|queue| queue.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of waiting processes across all levels
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    fn has_waiter_above(&self, level: Priority) -> bool {
        self.queues[..level as usize]
            .iter()
            .any(|queue| !queue.is_empty())
    }
}
