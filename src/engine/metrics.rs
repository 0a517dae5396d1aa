/*!
 * Metrics
 * Point-in-time aggregates derived from the process table and scheduler
 */

use super::SimulationEngine;
use crate::core::limits::PRIORITY_LEVELS;
use crate::core::types::Tick;
use crate::process::ProcessState;
use serde::{Deserialize, Serialize};

/// Metrics snapshot
///
/// Every count and average excludes the init process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Metrics {
    pub tick: Tick,
    pub total_processes: usize,
    pub new: usize,
    pub ready: usize,
    pub running: usize,
    pub blocked: usize,
    pub zombie: usize,
    pub terminated: usize,
    pub busy_ticks: Tick,
    pub idle_ticks: Tick,
    /// Percentage of elapsed ticks that executed a unit
    pub cpu_utilization: f64,
    pub context_switches: u64,
    /// Mean `end_tick - created_tick` over finished processes
    pub avg_turnaround: f64,
    /// Mean of turnaround minus burst, each floored at zero
    pub avg_waiting: f64,
    /// Waiting processes per priority level
    pub ready_queue_occupancy: [usize; PRIORITY_LEVELS],
}

impl Metrics {
    /// Non-empty levels as `P<level>:<count>`, or `empty`
    pub fn priority_summary(&self) -> String {
        let parts: Vec<String> = self
            .ready_queue_occupancy
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(level, count)| format!("P{}:{}", level, count))
            .collect();
        if parts.is_empty() {
            "empty".to_string()
        } else {
            parts.join(", ")
        }
    }
}

impl SimulationEngine {
    /// Compute the current metrics
    pub fn get_metrics(&self) -> Metrics {
        let mut counts = [0usize; ProcessState::ALL.len()];
        let mut total = 0;
        let mut finished = 0u64;
        let mut turnaround_sum = 0u64;
        let mut waiting_sum = 0u64;

        for process in self.table.iter().filter(|p| !p.is_init()) {
            total += 1;
            counts[process.state as usize] += 1;
            if !process.is_finished() {
                continue;
            }
            if let (Some(turnaround), Some(waiting)) = (process.turnaround(), process.waiting_time()) {
                finished += 1;
                turnaround_sum += turnaround;
                waiting_sum += waiting;
            }
        }

        let average = |sum: u64| {
            if finished == 0 {
                0.0
            } else {
                sum as f64 / finished as f64
            }
        };

        Metrics {
            tick: self.tick,
            total_processes: total,
            new: counts[ProcessState::New as usize],
            ready: counts[ProcessState::Ready as usize],
            running: counts[ProcessState::Running as usize],
            blocked: counts[ProcessState::Blocked as usize],
            zombie: counts[ProcessState::Zombie as usize],
            terminated: counts[ProcessState::Terminated as usize],
            busy_ticks: self.busy_ticks,
            idle_ticks: self.idle_ticks,
            cpu_utilization: self.busy_ticks as f64 / self.tick.max(1) as f64 * 100.0,
            context_switches: self.scheduler.context_switches(),
            avg_turnaround: average(turnaround_sum),
            avg_waiting: average(waiting_sum),
            ready_queue_occupancy: self.scheduler.occupancy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ProcessSpec, SimConfig};

    #[test]
    fn test_empty_engine_metrics() {
        let engine = SimulationEngine::seeded(1);
        let metrics = engine.get_metrics();
        assert_eq!(metrics.total_processes, 0);
        assert_eq!(metrics.running, 0);
        assert_eq!(metrics.cpu_utilization, 0.0);
        assert_eq!(metrics.avg_turnaround, 0.0);
        assert_eq!(metrics.priority_summary(), "empty");
    }

    #[test]
    fn test_priority_summary_lists_non_empty_levels() {
        let mut engine = SimulationEngine::seeded(1);
        engine.create_process(ProcessSpec::new().priority(0));
        engine.create_process(ProcessSpec::new().priority(0));
        engine.create_process(ProcessSpec::new().priority(5));
        engine.move_new_to_ready();
        assert_eq!(engine.get_metrics().priority_summary(), "P0:2, P5:1");
    }

    #[test]
    fn test_waiting_time_is_floored() {
        let mut engine =
            SimulationEngine::with_config(SimConfig::default().with_seed(2)).unwrap();
        // Killed immediately: turnaround 0, burst 10, waiting floors at 0
        let pid = engine.create_process(ProcessSpec::new().burst(10));
        engine.force_terminate_process(pid);

        let metrics = engine.get_metrics();
        assert_eq!(metrics.terminated, 1);
        assert_eq!(metrics.avg_turnaround, 0.0);
        assert_eq!(metrics.avg_waiting, 0.0);
    }
}
