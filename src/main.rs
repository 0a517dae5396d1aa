/*!
 * Process Lifecycle Simulator - Demo Entry Point
 *
 * Builds an engine from `PROC_SIM_*` environment variables, seeds a handful of
 * processes, runs a fixed number of ticks and prints the process tree and a JSON
 * snapshot.
 *
 * Extra environment variables:
 * - PROC_SIM_TICKS: ticks to run (default 40)
 * - PROC_SIM_SNAPSHOT: also write the snapshot to this path
 */

use anyhow::Context;
use proc_sim::core::limits::{DEMO_DEFAULT_TICKS, DEMO_INITIAL_PROCESSES};
use proc_sim::{init_tracing, ProcessSpec, SimConfig, SimulationEngine};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = SimConfig::from_env();
    let ticks = match std::env::var("PROC_SIM_TICKS") {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("PROC_SIM_TICKS must be a tick count, got {:?}", raw))?,
        Err(_) => DEMO_DEFAULT_TICKS,
    };

    let mut engine = SimulationEngine::with_config(config).context("invalid configuration")?;
    info!(seed = engine.seed(), ticks, "Process simulator starting");

    for _ in 0..DEMO_INITIAL_PROCESSES {
        engine.create_process(ProcessSpec::new());
    }

    for _ in 0..ticks {
        engine.spawn_arrival();
        engine.tick_simulation();
    }

    let metrics = engine.get_metrics();
    info!(
        tick = metrics.tick,
        processes = metrics.total_processes,
        terminated = metrics.terminated,
        zombies = metrics.zombie,
        cpu_utilization = %format!("{:.1}%", metrics.cpu_utilization),
        queues = %metrics.priority_summary(),
        "Simulation finished"
    );

    println!("Process tree:");
    for root in engine.process_tree() {
        print!("{}", root);
    }

    let snapshot = engine.snapshot();
    println!("{}", snapshot.to_json()?);

    if let Ok(path) = std::env::var("PROC_SIM_SNAPSHOT") {
        snapshot
            .write_json(&path)
            .with_context(|| format!("failed to write snapshot to {}", path))?;
    }

    Ok(())
}
