/*!
 * Tick Loop
 * One simulated time unit: blocked advance, admission, execution, auto-reap
 */

use super::SimulationEngine;
use crate::core::types::Pid;
use crate::monitoring::span_tick;
use crate::process::{PreemptReason, ProcessState};
use rand::Rng;
use tracing::{trace, warn};

impl SimulationEngine {
    /// Advance the simulation by exactly one tick
    pub fn tick_simulation(&mut self) {
        self.tick += 1;
        let _span = span_tick(self.tick).entered();
        trace!("Tick start");

        self.advance_blocked();
        self.move_new_to_ready();
        self.schedule_and_execute();
        if self.config.auto_reap_after > 0 {
            self.auto_reap();
        }
    }

    /// Run `n` ticks back to back
    pub fn run(&mut self, n: u64) {
        for _ in 0..n {
            self.tick_simulation();
        }
    }

    /// Count down I/O; processes reaching zero return to READY in blocked-list order
    fn advance_blocked(&mut self) {
        let mut still_blocked = Vec::with_capacity(self.blocked.len());
        let mut unblocked = Vec::new();

        for pid in std::mem::take(&mut self.blocked) {
            let Some(process) = self.table.get_mut(pid) else {
                warn!(pid, "Blocked pid missing from process table, dropping");
                continue;
            };
            if process.state != ProcessState::Blocked {
                warn!(pid, state = %process.state, "Blocked list entry is not BLOCKED, dropping");
                continue;
            }

            process.io_remaining = process.io_remaining.saturating_sub(1);
            if process.io_remaining == 0 {
                process.state = ProcessState::Ready;
                unblocked.push((pid, process.name.clone(), process.priority));
            } else {
                still_blocked.push(pid);
            }
        }
        self.blocked = still_blocked;

        for (pid, name, priority) in unblocked {
            self.scheduler.add_to_ready(pid, &self.table);
            self.log_event(
                Some(pid),
                format!(
                    "Process {} (PID {}) unblocked -> READY (priority {})",
                    name, pid, priority
                ),
            );
        }
    }

    fn schedule_and_execute(&mut self) {
        if self.scheduler.current().is_none() {
            self.dispatch();
        }

        match self.scheduler.current() {
            Some(pid) => self.execute(pid),
            None => self.idle_ticks += 1,
        }
    }

    fn dispatch(&mut self) {
        let Some(pid) = self.scheduler.get_next_process() else {
            return;
        };
        if !self.scheduler.set_running(pid, &mut self.table, self.tick) {
            warn!(pid, "Queued pid missing from process table, dropping");
            return;
        }
        let name = self.process_name(pid);
        self.log_event(Some(pid), format!("Process {} (PID {}) running", name, pid));
    }

    /// Execute one unit of the running process
    fn execute(&mut self, pid: Pid) {
        if !self.table.contains(pid) {
            warn!(pid, "Running pid missing from process table, releasing CPU");
            self.scheduler.release_current();
            return;
        }

        self.busy_ticks += 1;
        let promotions = self.scheduler.tick(&mut self.table, &mut self.rng);
        for promotion in promotions {
            self.log_event(
                Some(promotion.pid),
                format!(
                    "Aging: PID {} promoted {} -> {}",
                    promotion.pid, promotion.from, promotion.to
                ),
            );
        }

        let remaining = match self.table.get_mut(pid) {
            Some(process) => {
                process.remaining_burst = process.remaining_burst.saturating_sub(1);
                process.remaining_burst
            }
            None => return,
        };

        if remaining == 0 {
            self.scheduler.release_current();
            if let Some(exit) = self.finish(pid) {
                let name = self.process_name(pid);
                self.log_event(
                    Some(pid),
                    format!(
                        "Process {} (PID {}) finished -> {}",
                        name,
                        pid,
                        exit.label()
                    ),
                );
            }
            return;
        }

        if self.rng.gen_bool(self.config.p_block) {
            let io_time = self.rng.gen_range(self.config.random_io_range.clone());
            self.scheduler.release_current();
            let name = self.block(pid, io_time);
            self.log_event(
                Some(pid),
                format!(
                    "Process {} (PID {}) blocked on I/O for {} ticks",
                    name, pid, io_time
                ),
            );
            return;
        }

        if let Some(reason) = self.scheduler.preempt_current(&mut self.table) {
            let name = self.process_name(pid);
            let cause = match reason {
                PreemptReason::Priority => "higher priority waiting",
                PreemptReason::Quantum => "quantum expired",
            };
            self.log_event(
                Some(pid),
                format!("Process {} (PID {}) preempted -> READY ({})", name, pid, cause),
            );
        }
    }

    /// Zombies older than `auto_reap_after` become TERMINATED and reaped
    fn auto_reap(&mut self) {
        let now = self.tick;
        let threshold = self.config.auto_reap_after;
        let mut kept = Vec::with_capacity(self.zombies.len());
        let mut reaped = Vec::new();

        for pid in std::mem::take(&mut self.zombies) {
            let Some(process) = self.table.get_mut(pid) else {
                warn!(pid, "Zombie pid missing from process table, dropping");
                continue;
            };
            let age = now.saturating_sub(process.end_tick.unwrap_or(0));
            if age >= threshold {
                process.state = ProcessState::Terminated;
                process.reaped = true;
                reaped.push((pid, process.name.clone()));
            } else {
                kept.push(pid);
            }
        }
        self.zombies = kept;

        for (pid, name) in reaped {
            self.log_event(Some(pid), format!("Process {} (PID {}) auto-reaped", name, pid));
        }
    }

    pub(crate) fn process_name(&self, pid: Pid) -> String {
        self.table
            .get(pid)
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }
}
