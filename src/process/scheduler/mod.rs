/*!
 * CPU Scheduler
 * Per-priority ready queues with aging, quantum and priority preemption
 */

use crate::core::limits::{
    DEFAULT_AGING_INTERVAL, DEFAULT_AGING_PROBABILITY, DEFAULT_QUANTUM, PRIORITY_LEVELS,
};
use crate::core::types::{Pid, Priority};
use crate::process::types::SchedulingPolicy;
use log::info;
use std::collections::{HashMap, VecDeque};

mod aging;
mod operations;
mod policy;
mod stats;

pub use aging::Promotion;
pub use operations::PreemptReason;
pub use stats::SchedulerStats;

/// CPU Scheduler
///
/// Owns one FIFO queue per priority level (0 first) and the running slot. Process
/// records live in the engine's table; the scheduler only stores pids and mutates
/// the state/priority fields of the records it is handed.
///
/// A pid is in at most one place: a ready queue or the running slot. The
/// `locations` index maps a queued pid to its level so membership checks are O(1);
/// removal from the level's deque is a linear scan.
#[derive(Debug, Clone)]
pub struct Scheduler {
    policy: SchedulingPolicy,
    quantum: u32,

    queues: [VecDeque<Pid>; PRIORITY_LEVELS],
    locations: HashMap<Pid, Priority>,

    current: Option<Pid>,
    quantum_used: u32,

    aging_counter: u32,
    aging_interval: u32,
    aging_probability: f64,

    context_switches: u64,
    preemptions: u64,
    total_scheduled: u64,
    promotions: u64,
}

impl Scheduler {
    /// Create new scheduler with policy
    pub fn new(policy: SchedulingPolicy) -> Self {
        Self::with_quantum(policy, DEFAULT_QUANTUM)
    }

    /// Create scheduler with custom quantum
    pub fn with_quantum(policy: SchedulingPolicy, quantum: u32) -> Self {
        let quantum = quantum.max(1);
        info!(
            "Scheduler initialized: policy={}, quantum={}",
            policy, quantum
        );

        Self {
            policy,
            quantum,
            queues: Default::default(),
            locations: HashMap::new(),
            current: None,
            quantum_used: 0,
            aging_counter: 0,
            aging_interval: DEFAULT_AGING_INTERVAL,
            aging_probability: DEFAULT_AGING_PROBABILITY,
            context_switches: 0,
            preemptions: 0,
            total_scheduled: 0,
            promotions: 0,
        }
    }

    /// Override the aging cadence and promotion chance
    #[must_use]
    pub fn with_aging(mut self, interval: u32, probability: f64) -> Self {
        self.aging_interval = interval.max(1);
        self.aging_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Clear all queues and counters, keeping policy, quantum and aging settings
    pub fn reset(&mut self) {
        for queue in self.queues.iter_mut() {
            queue.clear();
        }
        self.locations.clear();
        self.current = None;
        self.quantum_used = 0;
        self.aging_counter = 0;
        self.context_switches = 0;
        self.preemptions = 0;
        self.total_scheduled = 0;
        self.promotions = 0;
        info!("Scheduler reset");
    }

    /// Queue level a process of `priority` waits in under the active policy
    #[inline]
    pub(crate) fn level_for(&self, priority: Priority) -> Priority {
        match self.policy {
            SchedulingPolicy::Priority => {
                priority.min(crate::core::limits::LOWEST_PRIORITY)
            }
            SchedulingPolicy::RoundRobin => crate::core::limits::ROUND_ROBIN_LEVEL,
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulingPolicy::Priority)
    }
}
