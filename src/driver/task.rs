/*!
 * Simulation Task - Auto-Tick Driver
 *
 * Background tokio task that advances a [`SharedEngine`] at a fixed rate and accepts
 * control commands over a channel.
 *
 * # Shutdown
 *
 * 1. **Preferred:** `shutdown().await` sends `Shutdown`, waits for the loop to exit and
 *    consumes the handle.
 * 2. **Fallback:** dropping the handle without `shutdown()` aborts the task and logs a
 *    warning.
 *
 * Commands are handled in the order they were sent, so a `Step` sent before
 * `shutdown()` always runs.
 *
 * # Example Usage
 *
 * ```no_run
 * # use proc_sim::driver::{shared, SimulationTask};
 * # use proc_sim::engine::SimulationEngine;
 * # async fn example() {
 * let engine = shared(SimulationEngine::seeded(42));
 * let task = SimulationTask::spawn(engine.clone(), 4.0);
 * task.set_auto_create(true);
 *
 * // ... observe engine.lock().get_metrics() ...
 *
 * task.shutdown().await;
 * # }
 * ```
 */

use super::SharedEngine;
use crate::core::limits::{DEFAULT_TICKS_PER_SECOND, MIN_TICK_PERIOD};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Control messages for the simulation task
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationCommand {
    /// Stop automatic ticking
    Pause,
    /// Resume automatic ticking
    Resume,
    /// Run exactly one tick, paused or not
    Step,
    /// Change the automatic rate (ticks per second)
    SetSpeed(f64),
    /// Toggle random arrivals before each tick
    SetAutoCreate(bool),
    /// Stop the task
    Shutdown,
}

/// Handle to the simulation background task
pub struct SimulationTask {
    command_tx: mpsc::UnboundedSender<SimulationCommand>,
    handle: Option<tokio::task::JoinHandle<()>>,
    shutdown_initiated: bool,
}

impl SimulationTask {
    /// Spawn a task ticking `engine` at `ticks_per_second`
    pub fn spawn(engine: SharedEngine, ticks_per_second: f64) -> Self {
        Self::spawn_inner(engine, ticks_per_second, true)
    }

    /// Spawn a task that waits for `Resume` or `Step` before ticking
    pub fn spawn_paused(engine: SharedEngine, ticks_per_second: f64) -> Self {
        Self::spawn_inner(engine, ticks_per_second, false)
    }

    fn spawn_inner(engine: SharedEngine, ticks_per_second: f64, active: bool) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let period = tick_period(ticks_per_second).unwrap_or_else(|| {
            warn!(ticks_per_second, "Invalid tick rate, falling back to the default rate");
            Duration::from_secs_f64(1.0 / DEFAULT_TICKS_PER_SECOND)
        });

        let handle = tokio::spawn(async move {
            run_simulation_loop(engine, period, active, command_rx).await;
        });

        info!(ticks_per_second, active, "Simulation task spawned");

        Self {
            command_tx,
            handle: Some(handle),
            shutdown_initiated: false,
        }
    }

    pub fn pause(&self) {
        self.send(SimulationCommand::Pause);
    }

    pub fn resume(&self) {
        self.send(SimulationCommand::Resume);
    }

    pub fn step(&self) {
        self.send(SimulationCommand::Step);
    }

    pub fn set_speed(&self, ticks_per_second: f64) {
        self.send(SimulationCommand::SetSpeed(ticks_per_second));
    }

    pub fn set_auto_create(&self, enabled: bool) {
        self.send(SimulationCommand::SetAutoCreate(enabled));
    }

    /// Send a raw command; ignored once the task has stopped
    pub fn send(&self, command: SimulationCommand) {
        if self.command_tx.send(command).is_err() {
            debug!("Simulation task already stopped, command dropped");
        }
    }

    /// Stop the task and wait for it to finish
    pub async fn shutdown(mut self) {
        self.shutdown_initiated = true;
        let _ = self.command_tx.send(SimulationCommand::Shutdown);

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Simulation task shutdown error");
            } else {
                info!("Simulation task shutdown complete");
            }
        }
    }
}

/// Interval period for a rate, or `None` for non-positive or non-finite rates
fn tick_period(ticks_per_second: f64) -> Option<Duration> {
    if !ticks_per_second.is_finite() || ticks_per_second <= 0.0 {
        return None;
    }
    Some(Duration::from_secs_f64(1.0 / ticks_per_second).max(MIN_TICK_PERIOD))
}

fn ticker(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// One unit of driver work: an optional arrival, then a tick
fn advance(engine: &SharedEngine, auto_create: bool) {
    let mut engine = engine.lock();
    if auto_create {
        if let Some(pid) = engine.spawn_arrival() {
            debug!(pid, "Random arrival");
        }
    }
    engine.tick_simulation();
}

async fn run_simulation_loop(
    engine: SharedEngine,
    period: Duration,
    mut active: bool,
    mut command_rx: mpsc::UnboundedReceiver<SimulationCommand>,
) {
    let mut auto_create = false;
    let mut interval = ticker(period);
    // The first interval tick completes immediately; consume it so ticking starts one
    // period after spawn.
    interval.tick().await;

    info!(period_ms = period.as_millis() as u64, "Simulation loop started");

    loop {
        tokio::select! {
            biased;

            Some(cmd) = command_rx.recv() => {
                match cmd {
                    SimulationCommand::Pause => {
                        info!("Simulation paused");
                        active = false;
                    }
                    SimulationCommand::Resume => {
                        info!("Simulation resumed");
                        active = true;
                        interval.reset();
                    }
                    SimulationCommand::Step => advance(&engine, auto_create),
                    SimulationCommand::SetSpeed(ticks_per_second) => match tick_period(ticks_per_second) {
                        Some(period) => {
                            info!(ticks_per_second, "Simulation speed updated");
                            interval = ticker(period);
                            interval.reset();
                        }
                        None => warn!(ticks_per_second, "Ignoring invalid tick rate"),
                    },
                    SimulationCommand::SetAutoCreate(enabled) => {
                        info!(enabled, "Auto-create toggled");
                        auto_create = enabled;
                    }
                    SimulationCommand::Shutdown => {
                        info!("Simulation task shutting down");
                        break;
                    }
                }
            }

            _ = interval.tick(), if active => advance(&engine, auto_create),

            else => break,
        }
    }
}

impl Drop for SimulationTask {
    fn drop(&mut self) {
        if self.shutdown_initiated {
            return;
        }

        if let Some(handle) = self.handle.take() {
            warn!(
                "SimulationTask dropped without calling shutdown() - aborting task. \
                 Use `task.shutdown().await` for graceful cleanup."
            );
            handle.abort();
        }
    }
}
