/*!
 * Scheduler Statistics
 * Track and report scheduler counters and queue occupancy
 */

use super::Scheduler;
use crate::core::limits::PRIORITY_LEVELS;
use crate::core::serde::is_zero_u64;
use crate::core::types::Pid;
use crate::process::types::SchedulingPolicy;
use serde::{Deserialize, Serialize};

/// Scheduler statistics snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerStats {
    pub policy: SchedulingPolicy,
    pub quantum: u32,
    pub current: Option<Pid>,
    pub quantum_used: u32,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub total_scheduled: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub context_switches: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub preemptions: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub promotions: u64,
    pub queue_lengths: [usize; PRIORITY_LEVELS],
}

impl Scheduler {
    /// Get scheduler statistics
    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            policy: self.policy,
            quantum: self.quantum,
            current: self.current,
            quantum_used: self.quantum_used,
            total_scheduled: self.total_scheduled,
            context_switches: self.context_switches,
            preemptions: self.preemptions,
            promotions: self.promotions,
            queue_lengths: self.occupancy(),
        }
    }

    /// Waiting processes per level
    pub fn occupancy(&self) -> [usize; PRIORITY_LEVELS] {
        let mut lengths = [0; PRIORITY_LEVELS];
        for (level, queue) in self.queues.iter().enumerate() {
            lengths[level] = queue.len();
        }
        lengths
    }

    /// Every level's queue, head first
    pub fn queues(&self) -> Vec<Vec<Pid>> {
        self.queues
            .iter()
            .map(|queue| queue.iter().copied().collect())
            .collect()
    }

    #[inline]
    pub fn context_switches(&self) -> u64 {
        self.context_switches
    }
}
