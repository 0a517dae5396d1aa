/*!
 * Simulation Engine
 *
 * Owns the process table, the scheduler, the blocked and zombie side-lists and the
 * seeded random generator, and advances the whole system one tick at a time.
 *
 * # Tick order
 *
 * 1. Blocked advance (I/O countdown, unblock to READY)
 * 2. NEW -> READY admission
 * 3. Dispatch and execute one unit on the CPU
 * 4. Zombie auto-reap
 *
 * The engine is synchronous and has no interior locking; share it through
 * [`crate::driver::SharedEngine`] when more than one thread needs it.
 */

mod config;
mod events;
mod invariants;
mod lifecycle;
mod metrics;
mod snapshot;
mod tick;

pub use config::SimConfig;
pub use events::EventLog;
pub use lifecycle::ProcessSpec;
pub use metrics::Metrics;
pub use snapshot::Snapshot;

use crate::core::errors::SimResult;
use crate::core::types::{Pid, Tick, INIT_PID};
use crate::process::{Process, ProcessNode, ProcessTable, Scheduler, SchedulerStats};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use tracing::{debug, info};

/// Discrete-time process lifecycle simulator
pub struct SimulationEngine {
    config: SimConfig,
    tick: Tick,
    next_pid: Pid,
    table: ProcessTable,
    scheduler: Scheduler,
    blocked: Vec<Pid>,
    zombies: Vec<Pid>,
    busy_ticks: Tick,
    idle_ticks: Tick,
    events: EventLog,
    rng: StdRng,
    seed: u64,
}

impl SimulationEngine {
    /// Engine with default configuration and an entropy seed
    pub fn new() -> Self {
        Self::build(SimConfig::default())
    }

    /// Engine with a validated configuration
    pub fn with_config(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Engine with default configuration and a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self::build(SimConfig::default().with_seed(seed))
    }

    fn build(config: SimConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let scheduler = Scheduler::with_quantum(config.policy, config.quantum)
            .with_aging(config.aging_interval, config.aging_probability);

        let mut engine = Self {
            tick: 0,
            next_pid: INIT_PID + 1,
            table: ProcessTable::new(),
            scheduler,
            blocked: Vec::new(),
            zombies: Vec::new(),
            busy_ticks: 0,
            idle_ticks: 0,
            events: EventLog::new(config.event_log_capacity),
            rng: StdRng::seed_from_u64(seed),
            seed,
            config,
        };
        engine.create_init();

        info!(
            seed,
            policy = %engine.config.policy,
            quantum = engine.config.quantum,
            "Simulation engine initialized"
        );
        engine
    }

    fn create_init(&mut self) {
        self.table.insert(Process::init());
        self.log_event(Some(INIT_PID), "Init process (PID 0) created with top priority");
    }

    /// Clear everything back to tick 0 with only init present
    ///
    /// The generator is re-seeded with the configured seed (or the seed of the
    /// current run when none was configured) so a reset replays identically.
    pub fn reset(&mut self) {
        self.tick = 0;
        self.next_pid = INIT_PID + 1;
        self.table.clear();
        self.scheduler.reset();
        self.blocked.clear();
        self.zombies.clear();
        self.busy_ticks = 0;
        self.idle_ticks = 0;
        self.events.clear();
        self.rng = StdRng::seed_from_u64(self.config.seed.unwrap_or(self.seed));
        self.create_init();
        info!("Simulation reset");
    }

    /// Replace the generator; subsequent draws replay for equal seeds
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.config.seed = Some(seed);
        self.rng = StdRng::seed_from_u64(seed);
        self.log_event(None, format!("Seed {} applied", seed));
    }

    /// Append to the event log and mirror it to tracing
    pub(crate) fn log_event(&mut self, pid: Option<Pid>, message: impl fmt::Display) {
        debug!(tick = self.tick, pid = ?pid, "{}", message);
        self.events.record(self.tick, message);
    }

    // -------------------------------------------------------------------------
    // Read accessors
    // -------------------------------------------------------------------------

    /// Current simulated time
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Seed driving the current run
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn process(&self, pid: Pid) -> Option<&Process> {
        self.table.get(pid)
    }

    /// Every process, init included, in pid order
    pub fn processes(&self) -> impl Iterator<Item = &Process> {
        self.table.iter()
    }

    pub fn process_table(&self) -> &ProcessTable {
        &self.table
    }

    pub fn blocked(&self) -> &[Pid] {
        &self.blocked
    }

    pub fn zombies(&self) -> &[Pid] {
        &self.zombies
    }

    pub fn current_running(&self) -> Option<Pid> {
        self.scheduler.current()
    }

    /// Ready queues per level, head first
    pub fn ready_queues(&self) -> Vec<Vec<Pid>> {
        self.scheduler.queues()
    }

    pub fn scheduler_stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    /// Event log, oldest first
    pub fn event_log(&self) -> Vec<String> {
        self.events.entries()
    }

    /// Parent/child forest
    pub fn process_tree(&self) -> Vec<ProcessNode> {
        crate::process::build_forest(&self.table)
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("tick", &self.tick)
            .field("processes", &self.table.len())
            .field("running", &self.scheduler.current())
            .field("blocked", &self.blocked)
            .field("zombies", &self.zombies)
            .field("seed", &self.seed)
            .finish()
    }
}
