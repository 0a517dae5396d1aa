/*!
 * Engine Configuration
 * Tunables for one simulation, with builder methods and env overlay
 */

use crate::core::errors::{SimError, SimResult};
use crate::core::limits::*;
use crate::core::types::{Burst, Priority, Tick};
use crate::process::types::SchedulingPolicy;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::str::FromStr;
use tracing::warn;

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SimConfig {
    pub quantum: u32,
    pub p_block: f64,
    pub p_create: f64,
    /// Zombie age that triggers auto-reap; 0 disables
    pub auto_reap_after: Tick,
    pub aging_interval: u32,
    pub aging_probability: f64,
    pub event_log_capacity: usize,
    pub burst_range: RangeInclusive<Burst>,
    pub priority_range: RangeInclusive<Priority>,
    pub random_io_range: RangeInclusive<Tick>,
    pub forced_io_range: RangeInclusive<Tick>,
    pub policy: SchedulingPolicy,
    /// `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            quantum: DEFAULT_QUANTUM,
            p_block: DEFAULT_P_BLOCK,
            p_create: DEFAULT_P_CREATE,
            auto_reap_after: DEFAULT_AUTO_REAP_AFTER,
            aging_interval: DEFAULT_AGING_INTERVAL,
            aging_probability: DEFAULT_AGING_PROBABILITY,
            event_log_capacity: DEFAULT_EVENT_LOG_CAPACITY,
            burst_range: DEFAULT_BURST_RANGE,
            priority_range: DEFAULT_PRIORITY_RANGE,
            random_io_range: DEFAULT_RANDOM_IO_RANGE,
            forced_io_range: DEFAULT_FORCED_IO_RANGE,
            policy: SchedulingPolicy::default(),
            seed: None,
        }
    }
}

impl SimConfig {
    #[inline]
    #[must_use]
    pub fn with_quantum(mut self, quantum: u32) -> Self {
        self.quantum = quantum;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_p_block(mut self, p_block: f64) -> Self {
        self.p_block = p_block;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_p_create(mut self, p_create: f64) -> Self {
        self.p_create = p_create;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_auto_reap_after(mut self, ticks: Tick) -> Self {
        self.auto_reap_after = ticks;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_aging(mut self, interval: u32, probability: f64) -> Self {
        self.aging_interval = interval;
        self.aging_probability = probability;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_event_log_capacity(mut self, capacity: usize) -> Self {
        self.event_log_capacity = capacity;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: SchedulingPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Defaults overlaid with `PROC_SIM_*` environment variables
    pub fn from_env() -> Self {
        Self::default().overlay_env(|key| std::env::var(key).ok())
    }

    /// Overlay values from a key lookup; unparsable values are logged and skipped
    pub fn overlay_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_var(&lookup, "PROC_SIM_QUANTUM") {
            self.quantum = v;
        }
        if let Some(v) = parse_var(&lookup, "PROC_SIM_P_BLOCK") {
            self.p_block = v;
        }
        if let Some(v) = parse_var(&lookup, "PROC_SIM_P_CREATE") {
            self.p_create = v;
        }
        if let Some(v) = parse_var(&lookup, "PROC_SIM_AUTO_REAP") {
            self.auto_reap_after = v;
        }
        if let Some(v) = parse_var(&lookup, "PROC_SIM_POLICY") {
            self.policy = v;
        }
        if let Some(v) = parse_var(&lookup, "PROC_SIM_SEED") {
            self.seed = Some(v);
        }
        self
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> SimResult<()> {
        for (name, p) in [
            ("p_block", self.p_block),
            ("p_create", self.p_create),
            ("aging_probability", self.aging_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }
        if self.quantum == 0 {
            return Err(SimError::InvalidConfig("quantum must be at least 1".into()));
        }
        if self.aging_interval == 0 {
            return Err(SimError::InvalidConfig(
                "aging_interval must be at least 1".into(),
            ));
        }
        if self.event_log_capacity == 0 {
            return Err(SimError::InvalidConfig(
                "event_log_capacity must be at least 1".into(),
            ));
        }
        if self.burst_range.is_empty()
            || self.priority_range.is_empty()
            || self.random_io_range.is_empty()
            || self.forced_io_range.is_empty()
        {
            return Err(SimError::InvalidConfig("sampling ranges must be non-empty".into()));
        }
        if *self.priority_range.end() > LOWEST_PRIORITY {
            return Err(SimError::InvalidConfig(format!(
                "priority_range must stay within 0..={}",
                LOWEST_PRIORITY
            )));
        }
        if *self.random_io_range.start() == 0 || *self.forced_io_range.start() == 0 {
            return Err(SimError::InvalidConfig("I/O durations must be at least 1".into()));
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable configuration value");
            None
        }
    }
}
