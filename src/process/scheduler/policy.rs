/*!
 * Scheduler Policy Management
 * Handle dynamic policy, quantum and priority changes
 */

use super::Scheduler;
use crate::core::types::{clamp_priority, Pid, Priority};
use crate::process::table::ProcessTable;
use crate::process::types::SchedulingPolicy;
use log::info;

impl Scheduler {
    /// Change scheduling policy (preserves waiting processes but requeues them)
    pub fn set_policy(&mut self, new_policy: SchedulingPolicy, table: &ProcessTable) {
        if new_policy == self.policy {
            return;
        }

        info!(
            "Changing scheduler policy from {} to {} (requeuing all processes)",
            self.policy, new_policy
        );

        // Drain in level order so relative order survives the move
        let waiting: Vec<Pid> = self
            .queues
            .iter_mut()
            .flat_map(|queue| queue.drain(..))
            .collect();
        self.locations.clear();

        self.policy = new_policy;
        for pid in waiting {
            self.add_to_ready(pid, table);
        }

        info!("Policy change complete: {} processes requeued", self.len());
    }

    /// Set the time quantum, minimum one unit
    pub fn set_quantum(&mut self, quantum: u32) {
        self.quantum = quantum.max(1);
        info!("Time quantum updated to {}", self.quantum);
    }

    /// Update a process priority, clamped into range
    ///
    /// A waiting process is removed and re-added so the change takes effect on the
    /// next dispatch instead of on its next natural re-enqueue. Returns the applied
    /// priority, or `None` for an unknown pid.
    pub fn adjust_priority(
        &mut self,
        pid: Pid,
        new_priority: i64,
        table: &mut ProcessTable,
    ) -> Option<Priority> {
        let priority = clamp_priority(new_priority);
        let process = table.get_mut(pid)?;
        let old_priority = process.priority;
        process.priority = priority;

        if self.remove_from_ready(pid) {
            self.add_to_ready(pid, table);
        }

        info!(
            "Updated PID {} priority: {} -> {}",
            pid, old_priority, priority
        );
        Some(priority)
    }

    /// Get current scheduling policy
    pub fn policy(&self) -> SchedulingPolicy {
        self.policy
    }

    /// Get current quantum
    pub fn quantum(&self) -> u32 {
        self.quantum
    }
}
