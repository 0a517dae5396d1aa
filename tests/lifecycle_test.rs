/*!
 * Lifecycle Tests
 * Creation, forced transitions, zombies and reaping
 */

use pretty_assertions::assert_eq;
use proc_sim::{ProcessSpec, ProcessState, SimConfig, SimError, SimulationEngine, INIT_PID};

fn quiet_engine() -> SimulationEngine {
    SimulationEngine::with_config(
        SimConfig::default()
            .with_seed(21)
            .with_p_block(0.0)
            .with_aging(5, 0.0),
    )
    .unwrap()
}

/// Long-running parent at the lowest priority with one short, urgent child
fn family(engine: &mut SimulationEngine) -> (u32, u32) {
    let parent = engine.create_process(ProcessSpec::new().name("parent").burst(100).priority(9));
    let child = engine.create_process(
        ProcessSpec::new()
            .name("child")
            .burst(2)
            .priority(0)
            .parent(parent),
    );
    (parent, child)
}

#[test]
fn test_pids_are_unique_and_monotonic() {
    let mut engine = quiet_engine();
    let pids: Vec<u32> = (0..20)
        .map(|_| engine.create_process(ProcessSpec::new()))
        .collect();
    assert_eq!(pids, (1..=20).collect::<Vec<u32>>());

    engine.reset();
    assert_eq!(engine.create_process(ProcessSpec::new()), 1);
}

#[test]
fn test_move_new_to_ready_counts() {
    let mut engine = quiet_engine();
    for _ in 0..3 {
        engine.create_process(ProcessSpec::new());
    }
    assert_eq!(engine.move_new_to_ready(), 3);
    assert_eq!(engine.move_new_to_ready(), 0);
    assert_eq!(engine.get_metrics().ready, 3);
}

#[test]
fn test_zombie_reap_round_trip() {
    let mut engine = quiet_engine();
    let (parent, child) = family(&mut engine);

    engine.run(2);
    let p = engine.process(child).unwrap();
    assert_eq!(p.state, ProcessState::Zombie);
    assert_eq!(p.end_tick, Some(2));
    assert_eq!(engine.zombies(), &[child]);

    assert_eq!(engine.wait_for_child(parent), vec![child]);
    let p = engine.process(child).unwrap();
    assert_eq!(p.state, ProcessState::Terminated);
    assert!(p.reaped);
    assert_eq!(p.end_tick, Some(2));
    assert!(engine.zombies().is_empty());
}

#[test]
fn test_auto_reap_after_ten_ticks() {
    let mut engine = quiet_engine();
    let (_, child) = family(&mut engine);

    engine.run(2);
    assert_eq!(engine.process(child).unwrap().state, ProcessState::Zombie);

    engine.run(9);
    assert_eq!(engine.tick(), 11);
    assert_eq!(engine.process(child).unwrap().state, ProcessState::Zombie);

    engine.tick_simulation();
    let p = engine.process(child).unwrap();
    assert_eq!(p.state, ProcessState::Terminated);
    assert!(p.reaped);
    assert!(engine.zombies().is_empty());
}

#[test]
fn test_waiting_parent_skips_zombie() {
    let mut engine = quiet_engine();
    let (parent, child) = family(&mut engine);
    assert!(engine.set_waiting_for_child(parent, true));

    engine.run(2);
    let p = engine.process(child).unwrap();
    assert_eq!(p.state, ProcessState::Terminated);
    assert!(p.reaped);
    assert!(engine.zombies().is_empty());
    assert!(engine.wait_for_child(parent).is_empty());
}

#[test]
fn test_terminated_parent_still_collects_zombie() {
    let mut engine = quiet_engine();
    let (parent, child) = family(&mut engine);

    assert!(engine.force_terminate_process(parent));
    assert_eq!(engine.process(parent).unwrap().state, ProcessState::Terminated);

    engine.run(2);
    // Parent record still exists and is not waiting: child becomes a zombie
    assert_eq!(engine.process(child).unwrap().state, ProcessState::Zombie);
}

#[test]
fn test_force_block_running_process() {
    let mut engine = quiet_engine();
    let pid = engine.create_process(ProcessSpec::new().burst(10).priority(1));
    engine.tick_simulation();
    assert_eq!(engine.current_running(), Some(pid));

    assert!(engine.force_block_process(pid, Some(3)));
    assert_eq!(engine.current_running(), None);
    let p = engine.process(pid).unwrap();
    assert_eq!(p.state, ProcessState::Blocked);
    assert_eq!(p.io_remaining, 3);

    // Blocked again is an invalid transition
    assert_eq!(
        engine.try_force_block(pid, Some(1)),
        Err(SimError::InvalidState {
            pid,
            state: ProcessState::Blocked,
            operation: "block".into(),
        })
    );
}

#[test]
fn test_force_terminate_blocked_process() {
    let mut engine = quiet_engine();
    let pid = engine.create_process(ProcessSpec::new().burst(10));
    engine.move_new_to_ready();
    engine.force_block_process(pid, Some(5));

    assert!(engine.force_terminate_process(pid));
    assert!(engine.blocked().is_empty());
    let p = engine.process(pid).unwrap();
    assert_eq!(p.state, ProcessState::Terminated);
    assert_eq!(p.io_remaining, 0);
    assert!(!engine.force_terminate_process(pid));
}

#[test]
fn test_force_terminate_zombie_keeps_end_tick() {
    let mut engine = quiet_engine();
    let (_, child) = family(&mut engine);
    engine.run(2);

    engine.run(3);
    assert!(engine.force_terminate_process(child));
    let p = engine.process(child).unwrap();
    assert_eq!(p.end_tick, Some(2));
    assert_eq!(engine.zombies(), &[child]);
}

#[test]
fn test_init_is_protected() {
    let mut engine = quiet_engine();
    assert_eq!(
        engine.try_force_terminate(INIT_PID),
        Err(SimError::InitProtected("force_terminate".into()))
    );
    assert!(!engine.force_block_process(INIT_PID, None));
    assert!(!engine.force_terminate_process(404));
    assert_eq!(engine.process(INIT_PID).unwrap().state, ProcessState::Running);
}

#[test]
fn test_unknown_pids_are_refused() {
    let mut engine = quiet_engine();
    assert_eq!(
        engine.try_adjust_priority(9, 1),
        Err(SimError::ProcessNotFound(9))
    );
    assert!(!engine.set_waiting_for_child(9, true));
    assert!(engine.wait_for_child(9).is_empty());
}

#[test]
fn test_process_tree_shape() {
    let mut engine = quiet_engine();
    let (parent, child) = family(&mut engine);
    let sibling = engine.create_process(ProcessSpec::new().parent(parent));

    let forest = engine.process_tree();
    let roots: Vec<u32> = forest.iter().map(|n| n.pid).collect();
    assert_eq!(roots, vec![INIT_PID, parent]);

    let children: Vec<u32> = forest[1].children.iter().map(|n| n.pid).collect();
    assert_eq!(children, vec![child, sibling]);

    let text = forest[1].to_string();
    assert!(text.contains("PID 1: parent [NEW]"));
    assert!(text.contains("|- PID 2: child [NEW] (2/2)"));
}
