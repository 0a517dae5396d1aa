/*!
 * Process Types
 * The simulated process record and its lifecycle states
 */

use crate::core::limits::INIT_BURST;
use crate::core::serde::{is_empty_vec, is_false, is_zero_u32, is_zero_u64};
use crate::core::types::{Burst, Pid, Priority, Tick, INIT_PID};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt;

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Created, not yet admitted
    New,
    /// Waiting in a ready queue
    Ready,
    /// Holding the CPU
    Running,
    /// Waiting for simulated I/O
    Blocked,
    /// Finished, exit status not yet collected
    Zombie,
    /// Finished and collected (or never needed collecting)
    Terminated,
}

impl ProcessState {
    pub const ALL: [ProcessState; 6] = [
        ProcessState::New,
        ProcessState::Ready,
        ProcessState::Running,
        ProcessState::Blocked,
        ProcessState::Zombie,
        ProcessState::Terminated,
    ];

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Ready => "READY",
            Self::Running => "RUNNING",
            Self::Blocked => "BLOCKED",
            Self::Zombie => "ZOMBIE",
            Self::Terminated => "TERMINATED",
        }
    }

    /// Burst exhausted or killed, whether collected or not
    #[inline(always)]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Zombie | Self::Terminated)
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingPolicy {
    /// Strict priority levels with aging and priority preemption
    #[default]
    Priority,
    /// Every process shares one level; pure quantum rotation
    RoundRobin,
}

impl SchedulingPolicy {
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::RoundRobin => "round_robin",
        }
    }
}

impl std::str::FromStr for SchedulingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "priority" | "prio" => Ok(Self::Priority),
            "round_robin" | "roundrobin" | "rr" => Ok(Self::RoundRobin),
            _ => Err(format!("Invalid policy '{}'. Valid: priority, round_robin", s)),
        }
    }
}

impl fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Simulated process record
///
/// Owned by the engine's process table. Children are stored by pid and looked up
/// in the same table; the parent link is lookup-only.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub pid: Pid,
    pub name: String,
    pub state: ProcessState,
    pub total_burst: Burst,
    pub remaining_burst: Burst,
    pub priority: Priority,
    pub parent_pid: Option<Pid>,
    #[serde(default, skip_serializing_if = "is_empty_vec")]
    pub children: Vec<Pid>,

    pub created_tick: Tick,
    pub start_tick: Option<Tick>,
    pub end_tick: Option<Tick>,

    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub blocked_count: u32,
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub preempt_count: u32,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub io_remaining: Tick,

    #[serde(default, skip_serializing_if = "is_false")]
    pub waiting_for_child: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub reaped: bool,
}

impl Process {
    #[must_use]
    pub fn new(pid: Pid, name: String, burst: Burst, priority: Priority, created_tick: Tick) -> Self {
        Self {
            pid,
            name,
            state: ProcessState::New,
            total_burst: burst,
            remaining_burst: burst,
            priority,
            parent_pid: None,
            children: Vec::new(),
            created_tick,
            start_tick: None,
            end_tick: None,
            blocked_count: 0,
            preempt_count: 0,
            io_remaining: 0,
            waiting_for_child: false,
            reaped: false,
        }
    }

    /// The permanent pid 0, created on engine construction and reset
    #[must_use]
    pub fn init() -> Self {
        let mut init = Self::new(INIT_PID, "init".to_string(), INIT_BURST, 0, 0);
        init.state = ProcessState::Running;
        init
    }

    #[inline]
    #[must_use]
    pub fn with_parent(mut self, parent_pid: Option<Pid>) -> Self {
        self.parent_pid = parent_pid;
        self
    }

    #[inline(always)]
    pub const fn is_init(&self) -> bool {
        self.pid == INIT_PID
    }

    #[inline(always)]
    pub const fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// `end_tick - created_tick`, once finished
    #[inline]
    pub fn turnaround(&self) -> Option<Tick> {
        self.end_tick
            .map(|end| end.saturating_sub(self.created_tick))
    }

    /// Turnaround minus burst, floored at zero
    #[inline]
    pub fn waiting_time(&self) -> Option<Tick> {
        self.turnaround()
            .map(|t| t.saturating_sub(self.total_burst as Tick))
    }
}
