/*!
 * Process Lifecycle
 * Creation, admission, forced block/terminate, reaping and runtime knobs
 */

use super::SimulationEngine;
use crate::core::errors::{SimError, SimResult};
use crate::core::types::{clamp_priority, Burst, Pid, Priority, Tick, INIT_PID};
use crate::process::{Process, ProcessState, SchedulingPolicy};
use rand::Rng;
use tracing::{info, warn};

/// Parameters for [`SimulationEngine::create_process`]
///
/// Any field left unset is filled in by the engine: the name becomes `P<pid>`, burst
/// and priority are sampled from the configured ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSpec {
    pub name: Option<String>,
    pub burst: Option<Burst>,
    pub parent: Option<Pid>,
    /// Out-of-range values are clamped to `0..=9`
    pub priority: Option<i64>,
}

impl ProcessSpec {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn burst(mut self, burst: Burst) -> Self {
        self.burst = Some(burst);
        self
    }

    #[inline]
    #[must_use]
    pub fn parent(mut self, parent: Pid) -> Self {
        self.parent = Some(parent);
        self
    }

    #[inline]
    #[must_use]
    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Outcome of the termination decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Exit {
    Terminated,
    Zombie,
    Reaped,
}

impl Exit {
    /// State shown in the event log
    pub(crate) fn label(self) -> &'static str {
        match self {
            Exit::Terminated => "TERMINATED",
            Exit::Zombie => "ZOMBIE",
            Exit::Reaped => "TERMINATED (reaped by waiting parent)",
        }
    }
}

impl SimulationEngine {
    /// Create a process in state NEW and return its pid
    ///
    /// Pids are assigned from a monotonically increasing counter starting at 1 and are
    /// never reused. Burst is drawn before priority when both are sampled.
    pub fn create_process(&mut self, spec: ProcessSpec) -> Pid {
        let pid = self.next_pid;
        self.next_pid += 1;

        let burst = match spec.burst {
            Some(burst) => burst,
            None => self.rng.gen_range(self.config.burst_range.clone()),
        };
        let priority: Priority = match spec.priority {
            Some(priority) => clamp_priority(priority),
            None => self.rng.gen_range(self.config.priority_range.clone()),
        };
        let name = spec.name.unwrap_or_else(|| format!("P{}", pid));

        let parent = match spec.parent {
            Some(parent) if self.table.contains(parent) => Some(parent),
            Some(parent) => {
                warn!(pid, parent, "Parent not found, creating process as a root");
                None
            }
            None => None,
        };
        if let Some(parent) = parent.and_then(|parent| self.table.get_mut(parent)) {
            parent.children.push(pid);
        }

        self.table
            .insert(Process::new(pid, name.clone(), burst, priority, self.tick).with_parent(parent));
        self.log_event(
            Some(pid),
            format!(
                "Process {} (PID {}) created with burst {}, priority {}",
                name, pid, burst, priority
            ),
        );
        pid
    }

    /// Admit every NEW process to the ready queues, in pid order
    pub fn move_new_to_ready(&mut self) -> usize {
        let admitted = self.table.pids_in_state(ProcessState::New);
        for &pid in &admitted {
            let Some(process) = self.table.get_mut(pid) else {
                continue;
            };
            process.state = ProcessState::Ready;
            let (name, priority) = (process.name.clone(), process.priority);
            self.scheduler.add_to_ready(pid, &self.table);
            self.log_event(
                Some(pid),
                format!(
                    "Process {} (PID {}) NEW -> READY (priority {})",
                    name, pid, priority
                ),
            );
        }
        admitted.len()
    }

    /// Move a READY or RUNNING process to BLOCKED for `io_time` ticks
    ///
    /// Without an explicit duration one is sampled from the forced I/O range. A
    /// duration of zero is raised to one so the process waits at least one tick.
    pub fn try_force_block(&mut self, pid: Pid, io_time: Option<Tick>) -> SimResult<()> {
        if pid == INIT_PID {
            return Err(SimError::InitProtected("force_block".into()));
        }
        let process = self.table.get(pid).ok_or(SimError::ProcessNotFound(pid))?;
        if !matches!(process.state, ProcessState::Ready | ProcessState::Running) {
            return Err(SimError::InvalidState {
                pid,
                state: process.state,
                operation: "block".into(),
            });
        }

        let io_time = match io_time {
            Some(ticks) => ticks.max(1),
            None => self.rng.gen_range(self.config.forced_io_range.clone()),
        };

        if self.scheduler.current() == Some(pid) {
            self.scheduler.release_current();
        }
        self.scheduler.remove_from_ready(pid);

        let name = self.block(pid, io_time);
        self.log_event(
            Some(pid),
            format!(
                "Process {} (PID {}) forced to BLOCKED for {} ticks",
                name, pid, io_time
            ),
        );
        Ok(())
    }

    pub fn force_block_process(&mut self, pid: Pid, io_time: Option<Tick>) -> bool {
        self.try_force_block(pid, io_time).is_ok()
    }

    /// Terminate any non-init process that is not already TERMINATED
    ///
    /// The process leaves every queue and side-list, its remaining burst drops to
    /// zero and the termination decision runs. A zombie keeps the end tick it first recorded.
    pub fn try_force_terminate(&mut self, pid: Pid) -> SimResult<()> {
        if pid == INIT_PID {
            return Err(SimError::InitProtected("force_terminate".into()));
        }
        let process = self.table.get(pid).ok_or(SimError::ProcessNotFound(pid))?;
        if process.state == ProcessState::Terminated {
            return Err(SimError::AlreadyTerminated(pid));
        }

        if self.scheduler.current() == Some(pid) {
            self.scheduler.release_current();
        }
        self.scheduler.remove_from_ready(pid);
        self.blocked.retain(|&blocked| blocked != pid);
        self.zombies.retain(|&zombie| zombie != pid);

        if let Some(process) = self.table.get_mut(pid) {
            process.remaining_burst = 0;
            process.io_remaining = 0;
        }
        if let Some(exit) = self.finish(pid) {
            let name = self.process_name(pid);
            self.log_event(
                Some(pid),
                format!(
                    "Process {} (PID {}) force-terminated -> {}",
                    name,
                    pid,
                    exit.label()
                ),
            );
        }
        Ok(())
    }

    pub fn force_terminate_process(&mut self, pid: Pid) -> bool {
        self.try_force_terminate(pid).is_ok()
    }

    /// Reap every ZOMBIE child of `parent`, in creation order
    pub fn wait_for_child(&mut self, parent: Pid) -> Vec<Pid> {
        let Some(parent_process) = self.table.get(parent) else {
            return Vec::new();
        };
        let parent_name = parent_process.name.clone();
        let children = parent_process.children.clone();

        let mut reaped = Vec::new();
        for child in children {
            let Some(process) = self.table.get_mut(child) else {
                continue;
            };
            if process.state != ProcessState::Zombie {
                continue;
            }
            process.state = ProcessState::Terminated;
            process.reaped = true;
            let name = process.name.clone();
            self.zombies.retain(|&zombie| zombie != child);
            reaped.push(child);
            self.log_event(
                Some(child),
                format!(
                    "Process {} (PID {}) reaped by parent {}",
                    name, child, parent_name
                ),
            );
        }
        reaped
    }

    /// Raise or clear the flag that makes a finishing child skip ZOMBIE
    pub fn try_set_waiting_for_child(&mut self, pid: Pid, waiting: bool) -> SimResult<()> {
        let process = self.table.get_mut(pid).ok_or(SimError::ProcessNotFound(pid))?;
        if process.waiting_for_child == waiting {
            return Ok(());
        }
        process.waiting_for_child = waiting;
        let name = process.name.clone();
        self.log_event(
            Some(pid),
            if waiting {
                format!("Process {} (PID {}) waiting for children", name, pid)
            } else {
                format!("Process {} (PID {}) stopped waiting for children", name, pid)
            },
        );
        Ok(())
    }

    pub fn set_waiting_for_child(&mut self, pid: Pid, waiting: bool) -> bool {
        self.try_set_waiting_for_child(pid, waiting).is_ok()
    }

    /// Set a process priority, clamped to `0..=9`; a waiting process is re-queued
    pub fn try_adjust_priority(&mut self, pid: Pid, priority: i64) -> SimResult<Priority> {
        if pid == INIT_PID {
            return Err(SimError::InitProtected("adjust_priority".into()));
        }
        let old = self
            .table
            .get(pid)
            .map(|p| p.priority)
            .ok_or(SimError::ProcessNotFound(pid))?;
        let new = self
            .scheduler
            .adjust_priority(pid, priority, &mut self.table)
            .ok_or(SimError::ProcessNotFound(pid))?;
        self.log_event(
            Some(pid),
            format!("Priority of PID {} changed: {} -> {}", pid, old, new),
        );
        Ok(new)
    }

    pub fn adjust_priority(&mut self, pid: Pid, priority: i64) -> bool {
        self.try_adjust_priority(pid, priority).is_ok()
    }

    /// With probability `p_create`, create a process with default parameters
    pub fn spawn_arrival(&mut self) -> Option<Pid> {
        if !self.rng.gen_bool(self.config.p_create) {
            return None;
        }
        Some(self.create_process(ProcessSpec::new()))
    }

    // -------------------------------------------------------------------------
    // Runtime knobs
    // -------------------------------------------------------------------------

    pub fn set_quantum(&mut self, quantum: u32) {
        let quantum = quantum.max(1);
        self.config.quantum = quantum;
        self.scheduler.set_quantum(quantum);
        info!(quantum, "Quantum updated");
        self.log_event(None, format!("Quantum set to {}", quantum));
    }

    /// Switch policy; every waiting process is re-queued under the new policy
    pub fn set_policy(&mut self, policy: SchedulingPolicy) {
        self.config.policy = policy;
        self.scheduler.set_policy(policy, &self.table);
        info!(%policy, "Scheduling policy updated");
        self.log_event(None, format!("Scheduling policy set to {}", policy));
    }

    /// Set the random block probability, clamped to `[0, 1]`
    pub fn set_p_block(&mut self, p_block: f64) {
        let p_block = if p_block.is_nan() { 0.0 } else { p_block.clamp(0.0, 1.0) };
        self.config.p_block = p_block;
        info!(p_block, "Block probability updated");
    }

    /// Set the per-call arrival probability, clamped to `[0, 1]`
    pub fn set_p_create(&mut self, p_create: f64) {
        let p_create = if p_create.is_nan() { 0.0 } else { p_create.clamp(0.0, 1.0) };
        self.config.p_create = p_create;
        info!(p_create, "Arrival probability updated");
    }

    /// Zombie age that triggers auto-reap; 0 disables it
    pub fn set_auto_reap_after(&mut self, ticks: Tick) {
        self.config.auto_reap_after = ticks;
        info!(ticks, "Auto-reap threshold updated");
    }

    // -------------------------------------------------------------------------
    // Shared transitions
    // -------------------------------------------------------------------------

    /// Mark `pid` BLOCKED and append it to the blocked list; returns its name
    pub(crate) fn block(&mut self, pid: Pid, io_time: Tick) -> String {
        let Some(process) = self.table.get_mut(pid) else {
            return String::new();
        };
        process.state = ProcessState::Blocked;
        process.io_remaining = io_time;
        process.blocked_count += 1;
        self.blocked.push(pid);
        process.name.clone()
    }

    /// Termination decision for a process that just finished or was killed
    ///
    /// The caller must already have removed `pid` from the scheduler and side-lists,
    /// and logs the returned outcome. `None` if `pid` is not in the table.
    pub(crate) fn finish(&mut self, pid: Pid) -> Option<Exit> {
        let parent_waiting = {
            let process = self.table.get(pid)?;
            process
                .parent_pid
                .and_then(|parent| self.table.get(parent))
                .map(|parent| parent.waiting_for_child)
        };

        let now = self.tick;
        let process = self.table.get_mut(pid)?;
        if process.end_tick.is_none() {
            process.end_tick = Some(now);
        }

        let exit = match parent_waiting {
            None => {
                process.state = ProcessState::Terminated;
                Exit::Terminated
            }
            Some(false) => {
                process.state = ProcessState::Zombie;
                Exit::Zombie
            }
            Some(true) => {
                process.state = ProcessState::Terminated;
                process.reaped = true;
                Exit::Reaped
            }
        };

        if exit == Exit::Zombie {
            self.zombies.push(pid);
        }
        Some(exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SimConfig;

    fn engine() -> SimulationEngine {
        SimulationEngine::with_config(SimConfig::default().with_seed(7).with_p_block(0.0))
            .unwrap()
    }

    #[test]
    fn test_create_assigns_monotonic_pids() {
        let mut engine = engine();
        let a = engine.create_process(ProcessSpec::new());
        let b = engine.create_process(ProcessSpec::new().name("worker"));
        assert_eq!((a, b), (1, 2));

        let p = engine.process(b).unwrap();
        assert_eq!(p.name, "worker");
        assert_eq!(p.state, ProcessState::New);
        assert!((5..=15).contains(&p.total_burst));
        assert!(p.priority <= 8);
        assert_eq!(engine.process(a).unwrap().name, "P1");
    }

    #[test]
    fn test_create_clamps_priority() {
        let mut engine = engine();
        let high = engine.create_process(ProcessSpec::new().priority(-4));
        let low = engine.create_process(ProcessSpec::new().priority(42));
        assert_eq!(engine.process(high).unwrap().priority, 0);
        assert_eq!(engine.process(low).unwrap().priority, 9);
    }

    #[test]
    fn test_invalid_parent_becomes_root() {
        let mut engine = engine();
        let pid = engine.create_process(ProcessSpec::new().parent(99));
        assert_eq!(engine.process(pid).unwrap().parent_pid, None);
    }

    #[test]
    fn test_child_recorded_on_parent() {
        let mut engine = engine();
        let parent = engine.create_process(ProcessSpec::new());
        let child = engine.create_process(ProcessSpec::new().parent(parent));
        assert_eq!(engine.process(parent).unwrap().children, vec![child]);
        assert_eq!(engine.process(child).unwrap().parent_pid, Some(parent));
    }

    #[test]
    fn test_force_block_rejects_new_and_init() {
        let mut engine = engine();
        let pid = engine.create_process(ProcessSpec::new());

        assert!(matches!(
            engine.try_force_block(pid, Some(3)),
            Err(SimError::InvalidState { .. })
        ));
        assert_eq!(
            engine.try_force_block(INIT_PID, None),
            Err(SimError::InitProtected("force_block".into()))
        );
        assert!(!engine.force_block_process(77, None));
    }

    #[test]
    fn test_force_block_ready_process() {
        let mut engine = engine();
        let pid = engine.create_process(ProcessSpec::new());
        engine.move_new_to_ready();

        assert!(engine.force_block_process(pid, Some(4)));
        let p = engine.process(pid).unwrap();
        assert_eq!(p.state, ProcessState::Blocked);
        assert_eq!(p.io_remaining, 4);
        assert_eq!(p.blocked_count, 1);
        assert_eq!(engine.blocked(), &[pid]);
        assert!(engine.ready_queues().iter().all(|q| !q.contains(&pid)));
    }

    #[test]
    fn test_force_block_default_duration_in_range() {
        let mut engine = engine();
        let pid = engine.create_process(ProcessSpec::new());
        engine.move_new_to_ready();

        assert!(engine.force_block_process(pid, None));
        assert!((3..=8).contains(&engine.process(pid).unwrap().io_remaining));
    }

    #[test]
    fn test_force_terminate_twice() {
        let mut engine = engine();
        let pid = engine.create_process(ProcessSpec::new());
        assert!(engine.force_terminate_process(pid));

        let p = engine.process(pid).unwrap();
        assert_eq!(p.state, ProcessState::Terminated);
        assert_eq!(p.remaining_burst, 0);
        assert_eq!(p.end_tick, Some(0));
        assert_eq!(
            engine.try_force_terminate(pid),
            Err(SimError::AlreadyTerminated(pid))
        );
    }

    #[test]
    fn test_terminate_with_waiting_parent_is_reaped() {
        let mut engine = engine();
        let parent = engine.create_process(ProcessSpec::new());
        let child = engine.create_process(ProcessSpec::new().parent(parent));
        assert!(engine.set_waiting_for_child(parent, true));

        engine.force_terminate_process(child);
        let p = engine.process(child).unwrap();
        assert_eq!(p.state, ProcessState::Terminated);
        assert!(p.reaped);
        assert!(engine.zombies().is_empty());
    }

    #[test]
    fn test_force_terminate_logs_outcome() {
        let mut engine = engine();
        let parent = engine.create_process(ProcessSpec::new().name("shell"));
        let child = engine.create_process(ProcessSpec::new().name("job").parent(parent));

        engine.force_terminate_process(child);
        let log = engine.event_log();
        assert!(log
            .last()
            .unwrap()
            .ends_with("Process job (PID 2) force-terminated -> ZOMBIE"));

        engine.wait_for_child(parent);
        engine.set_waiting_for_child(parent, true);
        let late = engine.create_process(ProcessSpec::new().name("late").parent(parent));
        engine.force_terminate_process(late);
        assert!(engine.event_log().last().unwrap().ends_with(
            "Process late (PID 3) force-terminated -> TERMINATED (reaped by waiting parent)"
        ));
    }

    #[test]
    fn test_zombie_reaped_by_wait() {
        let mut engine = engine();
        let parent = engine.create_process(ProcessSpec::new());
        let child = engine.create_process(ProcessSpec::new().parent(parent));

        engine.force_terminate_process(child);
        assert_eq!(engine.process(child).unwrap().state, ProcessState::Zombie);
        assert_eq!(engine.zombies(), &[child]);

        assert_eq!(engine.wait_for_child(parent), vec![child]);
        assert!(engine.process(child).unwrap().reaped);
        assert!(engine.zombies().is_empty());
        assert!(engine.wait_for_child(parent).is_empty());
        assert!(engine.wait_for_child(404).is_empty());
    }

    #[test]
    fn test_adjust_priority_requeues_waiting() {
        let mut engine = engine();
        let pid = engine.create_process(ProcessSpec::new().priority(7));
        engine.move_new_to_ready();

        assert_eq!(engine.try_adjust_priority(pid, 1), Ok(1));
        assert_eq!(engine.ready_queues()[1], vec![pid]);
        assert!(engine.ready_queues()[7].is_empty());
        assert!(!engine.adjust_priority(INIT_PID, 3));
    }

    #[test]
    fn test_spawn_arrival_respects_probability() {
        let mut engine = engine();
        engine.set_p_create(0.0);
        assert_eq!(engine.spawn_arrival(), None);
        engine.set_p_create(1.0);
        assert_eq!(engine.spawn_arrival(), Some(1));
    }
}
