/*!
 * Snapshot Export
 * Serializable view of the whole simulation for reports and replay checks
 */

use super::{Metrics, SimulationEngine};
use crate::core::errors::SimResult;
use crate::core::types::Pid;
use crate::process::{Process, SchedulerStats};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Full simulation snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub seed: u64,
    pub metrics: Metrics,
    pub scheduler: SchedulerStats,
    pub running: Option<Pid>,
    pub blocked: Vec<Pid>,
    pub zombies: Vec<Pid>,
    /// Every process, init included, in pid order
    pub processes: Vec<Process>,
    /// Buffered event log, oldest first
    pub events: Vec<String>,
}

impl Snapshot {
    /// Pretty-printed JSON
    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty-printed JSON to `path`
    pub fn write_json(&self, path: impl AsRef<Path>) -> SimResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), processes = self.processes.len(), "Snapshot written");
        Ok(())
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl SimulationEngine {
    /// Capture metrics, processes and the event log
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            seed: self.seed,
            metrics: self.get_metrics(),
            scheduler: self.scheduler.stats(),
            running: self.scheduler.current(),
            blocked: self.blocked.clone(),
            zombies: self.zombies.clone(),
            processes: self.table.iter().cloned().collect(),
            events: self.events.entries(),
        }
    }
}
