/*!
 * Consistency Checks
 * Cross-checks the process table against the scheduler and side-lists
 */

use super::SimulationEngine;
use crate::core::errors::{SimError, SimResult};
use crate::core::types::{Pid, INIT_PID};
use crate::process::ProcessState;
use std::collections::HashSet;

impl SimulationEngine {
    /// Verify that every tracked pid sits exactly where its state says it should
    ///
    /// READY pids are queued, the RUNNING pid holds the CPU, BLOCKED pids are on the
    /// blocked list with I/O left, ZOMBIE pids are on the zombie list; NEW and
    /// TERMINATED pids are nowhere. Finished processes carry an end tick and no
    /// process has more burst left than it started with.
    pub fn check_invariants(&self) -> SimResult<()> {
        let init = self
            .table
            .get(INIT_PID)
            .ok_or_else(|| SimError::Inconsistent("init process missing".into()))?;
        if init.is_finished() {
            return Err(SimError::Inconsistent("init process finished".into()));
        }

        let queued: HashSet<Pid> = self.scheduler.queues().into_iter().flatten().collect();
        if queued.len() != self.scheduler.len() {
            return Err(SimError::Inconsistent("pid queued more than once".into()));
        }
        let blocked = unique(&self.blocked, "blocked")?;
        let zombies = unique(&self.zombies, "zombie")?;
        let running = self.scheduler.current();

        for pid in queued.iter().chain(&blocked).chain(&zombies).chain(running.iter()) {
            if !self.table.contains(*pid) {
                return Err(inconsistent(*pid, "tracked but missing from the table"));
            }
        }

        for process in self.table.iter().filter(|p| !p.is_init()) {
            let pid = process.pid;
            let places = [
                (queued.contains(&pid), ProcessState::Ready),
                (running == Some(pid), ProcessState::Running),
                (blocked.contains(&pid), ProcessState::Blocked),
                (zombies.contains(&pid), ProcessState::Zombie),
            ];
            for (present, state) in places {
                if present != (process.state == state) {
                    let place = if present { "tracked as" } else { "not tracked as" };
                    return Err(inconsistent(
                        pid,
                        &format!("is {} but {} {}", process.state, place, state),
                    ));
                }
            }

            if process.remaining_burst > process.total_burst {
                return Err(inconsistent(pid, "remaining burst exceeds total"));
            }
            if (process.io_remaining > 0) != (process.state == ProcessState::Blocked) {
                return Err(inconsistent(pid, "I/O countdown does not match BLOCKED"));
            }
            if process.is_finished() && process.end_tick.is_none() {
                return Err(inconsistent(pid, "finished without an end tick"));
            }
        }
        Ok(())
    }
}

fn unique(pids: &[Pid], list: &str) -> SimResult<HashSet<Pid>> {
    let set: HashSet<Pid> = pids.iter().copied().collect();
    if set.len() != pids.len() {
        return Err(SimError::Inconsistent(format!("duplicate pid on the {} list", list)));
    }
    Ok(set)
}

fn inconsistent(pid: Pid, reason: &str) -> SimError {
    SimError::Inconsistent(format!("PID {} {}", pid, reason))
}
