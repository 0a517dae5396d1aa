/*!
 * Simulator Limits and Constants
 *
 * Centralized location for defaults, ranges, and magic numbers.
 * Grouped by domain; engine configuration starts from these values.
 */

use super::types::{Burst, Priority, Tick};
use std::ops::RangeInclusive;
use std::time::Duration;

// =============================================================================
// PRIORITIES
// =============================================================================

/// Number of priority levels (0..=9)
pub const PRIORITY_LEVELS: usize = 10;

/// Most important priority level
pub const HIGHEST_PRIORITY: Priority = 0;

/// Least important priority level
pub const LOWEST_PRIORITY: Priority = 9;

/// Level every process shares under round-robin
pub const ROUND_ROBIN_LEVEL: Priority = 5;

/// Default priority sampling range for new processes (9 is left for explicit use)
pub const DEFAULT_PRIORITY_RANGE: RangeInclusive<Priority> = 0..=8;

// =============================================================================
// SCHEDULING
// =============================================================================

/// Consecutive execute units before quantum preemption
pub const DEFAULT_QUANTUM: u32 = 3;

/// Scheduler ticks between aging passes
pub const DEFAULT_AGING_INTERVAL: u32 = 5;

/// Promotion chance per waiting process per aging pass
pub const DEFAULT_AGING_PROBABILITY: f64 = 0.3;

// =============================================================================
// PROCESS LIFECYCLE
// =============================================================================

/// Default burst sampling range
pub const DEFAULT_BURST_RANGE: RangeInclusive<Burst> = 5..=15;

/// Per-unit probability that a running process blocks on I/O
pub const DEFAULT_P_BLOCK: f64 = 0.1;

/// Per-tick probability of a spontaneous arrival in auto-create mode
pub const DEFAULT_P_CREATE: f64 = 0.05;

/// I/O duration for random blocks
pub const DEFAULT_RANDOM_IO_RANGE: RangeInclusive<Tick> = 2..=5;

/// I/O duration for forced blocks without an explicit time
pub const DEFAULT_FORCED_IO_RANGE: RangeInclusive<Tick> = 3..=8;

/// Zombie age that triggers auto-reap (0 disables)
pub const DEFAULT_AUTO_REAP_AFTER: Tick = 10;

/// Burst given to init so it never finishes
pub const INIT_BURST: Burst = 999_999;

// =============================================================================
// OBSERVABILITY
// =============================================================================

/// Event log ring buffer capacity
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 50;

// =============================================================================
// DRIVER
// =============================================================================

/// Ticks per second for the auto-tick driver
pub const DEFAULT_TICKS_PER_SECOND: f64 = 1.0;

/// Shortest interval between automatic ticks
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Processes the demo seeds on start
pub const DEMO_INITIAL_PROCESSES: usize = 5;

/// Ticks the demo binary runs when PROC_SIM_TICKS is unset
pub const DEMO_DEFAULT_TICKS: u64 = 40;
