/*!
 * Driver Module
 * Shared engine handle and the background auto-tick task
 */

pub mod task;

pub use task::{SimulationCommand, SimulationTask};

use crate::engine::SimulationEngine;
use parking_lot::Mutex;
use std::sync::Arc;

/// Engine shared between a driver task and its callers
///
/// Every operation holds the lock for its whole duration, so ticks and force-actions
/// never interleave.
pub type SharedEngine = Arc<Mutex<SimulationEngine>>;

/// Wrap an engine for sharing
pub fn shared(engine: SimulationEngine) -> SharedEngine {
    Arc::new(Mutex::new(engine))
}
