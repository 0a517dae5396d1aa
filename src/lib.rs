/*!
 * Process Lifecycle Simulator Library
 *
 * Discrete-time simulation of an operating system's process lifecycle: creation,
 * priority scheduling with aging and preemption, simulated I/O blocking, and
 * zombie/reap semantics for parent and child processes.
 */

pub mod core;
pub mod driver;
pub mod engine;
pub mod monitoring;
pub mod process;

// Re-exports
pub use crate::core::errors::{SimError, SimResult};
pub use crate::core::types::{Burst, Pid, Priority, Tick, INIT_PID};
pub use driver::{shared, SharedEngine, SimulationCommand, SimulationTask};
pub use engine::{EventLog, Metrics, ProcessSpec, SimConfig, SimulationEngine, Snapshot};
pub use monitoring::init_tracing;
pub use process::{
    PreemptReason, Process, ProcessNode, ProcessState, Promotion, SchedulerStats,
    SchedulingPolicy,
};
