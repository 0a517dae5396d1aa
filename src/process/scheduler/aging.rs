/*!
 * Scheduler Tick and Aging
 * Quantum accounting and probabilistic promotion of waiting processes
 */

use super::Scheduler;
use crate::core::types::{Pid, Priority};
use crate::process::table::ProcessTable;
use crate::process::types::SchedulingPolicy;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One aging promotion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub pid: Pid,
    pub from: Priority,
    pub to: Priority,
}

impl Scheduler {
    /// Account one executed unit
    ///
    /// Bumps the running quantum and the aging cadence; every `aging_interval`
    /// calls an aging pass runs and its promotions are returned.
    pub fn tick<R: Rng>(
        &mut self,
        table: &mut ProcessTable,
        rng: &mut R,
    ) -> Vec<Promotion> {
        if self.current.is_some() {
            self.quantum_used += 1;
        }

        self.aging_counter += 1;
        if self.aging_counter < self.aging_interval {
            return Vec::new();
        }
        self.aging_counter = 0;
        self.age(table, rng)
    }

    /// Give each waiting process at levels 9..=1 an independent chance to move up
    /// one level
    ///
    /// Candidates come from a snapshot taken before any move, so a process climbs
    /// at most one level per pass. Promoted pids join the tail of their new level.
    fn age<R: Rng>(&mut self, table: &mut ProcessTable, rng: &mut R) -> Vec<Promotion> {
        if self.policy != SchedulingPolicy::Priority {
            return Vec::new();
        }

        let mut promotions = Vec::new();
        for level in (1..self.queues.len()).rev() {
            for &pid in self.queues[level].iter() {
                if rng.gen_bool(self.aging_probability) {
                    promotions.push(Promotion {
                        pid,
                        from: level as Priority,
                        to: level as Priority - 1,
                    });
                }
            }
        }

        for promotion in &promotions {
            let Some(process) = table.get_mut(promotion.pid) else {
                continue;
            };
            process.priority = promotion.to;
            self.remove_from_ready(promotion.pid);
            self.add_to_ready(promotion.pid, table);
            debug!(
                "Aging promoted process {}: {} -> {}",
                promotion.pid, promotion.from, promotion.to
            );
        }

        self.promotions += promotions.len() as u64;
        promotions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::types::{Process, ProcessState};
    use rand::rngs::mock::StepRng;

    fn waiting_table(entries: &[(Pid, Priority)]) -> ProcessTable {
        let mut table = ProcessTable::new();
        for &(pid, priority) in entries {
            let mut p = Process::new(pid, format!("P{}", pid), 10, priority, 0);
            p.state = ProcessState::Ready;
            table.insert(p);
        }
        table
    }

    #[test]
    fn test_aging_promotes_one_level_per_pass() {
        let mut table = waiting_table(&[(1, 9), (2, 8), (3, 0)]);
        let mut scheduler = Scheduler::default().with_aging(1, 1.0);
        for pid in 1..=3 {
            scheduler.add_to_ready(pid, &table);
        }

        let mut rng = StepRng::new(0, 0);
        let promotions = scheduler.tick(&mut table, &mut rng);

        assert_eq!(promotions.len(), 2);
        assert_eq!(table.get(1).unwrap().priority, 8);
        assert_eq!(table.get(2).unwrap().priority, 7);
        assert_eq!(table.get(3).unwrap().priority, 0);
        assert_eq!(scheduler.queue(8), vec![1]);
        assert_eq!(scheduler.queue(7), vec![2]);
    }

    #[test]
    fn test_aging_respects_interval() {
        let mut table = waiting_table(&[(1, 6)]);
        let mut scheduler = Scheduler::default().with_aging(3, 1.0);
        scheduler.add_to_ready(1, &table);
        let mut rng = StepRng::new(0, 0);

        assert!(scheduler.tick(&mut table, &mut rng).is_empty());
        assert!(scheduler.tick(&mut table, &mut rng).is_empty());
        assert_eq!(scheduler.tick(&mut table, &mut rng).len(), 1);
        assert_eq!(table.get(1).unwrap().priority, 5);
    }

    #[test]
    fn test_aging_disabled_under_round_robin() {
        let mut table = waiting_table(&[(1, 9)]);
        let mut scheduler = Scheduler::new(SchedulingPolicy::RoundRobin).with_aging(1, 1.0);
        scheduler.add_to_ready(1, &table);

        let mut rng = StepRng::new(0, 0);
        assert!(scheduler.tick(&mut table, &mut rng).is_empty());
        assert_eq!(table.get(1).unwrap().priority, 9);
    }

    #[test]
    fn test_zero_probability_never_promotes() {
        let mut table = waiting_table(&[(1, 9)]);
        let mut scheduler = Scheduler::default().with_aging(1, 0.0);
        scheduler.add_to_ready(1, &table);

        let mut rng = StepRng::new(0, 0);
        for _ in 0..20 {
            scheduler.tick(&mut table, &mut rng);
        }
        assert_eq!(table.get(1).unwrap().priority, 9);
    }
}
