/*!
 * Process Module
 * Process records, the process table and the CPU scheduler
 */

pub mod scheduler;
pub mod table;
pub mod tree;
pub mod types;

// Re-export for convenience
pub use scheduler::{PreemptReason, Promotion, Scheduler, SchedulerStats};
pub use table::ProcessTable;
pub use tree::{build_forest, ProcessNode};
pub use types::{Process, ProcessState, SchedulingPolicy};
