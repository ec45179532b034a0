use chrono::{TimeZone, Utc};

use fb_core::identity::generate_identity;
use fb_core::layout::{FloorPlan, Tile};
use fb_core::scene::{
    ActivityState, AgentSceneState, Direction, SceneSnapshot, SceneSource, SyncStatus,
};
use fb_core::types::{AgentRole, Gait, Metrics, RuntimeStatus};
use fb_sim::Simulation;

fn scene_agent(id: &str, tile: Tile, target: Tile) -> AgentSceneState {
    let mut identity = generate_identity(id, AgentRole::Worker, id);
    // Pin the gait so step distances are predictable.
    identity.gait = Gait::Quick;

    AgentSceneState {
        agent_id: id.into(),
        display_name: format!("Agent {}", id),
        role: AgentRole::Worker,
        runtime_status: RuntimeStatus::Online,
        activity_state: ActivityState::Active,
        direction: Direction::Right,
        tile,
        target_tile: target,
        target_zone_id: "intake".into(),
        current_task_id: None,
        last_event_at: None,
        is_moving: tile != target,
        identity,
    }
}

fn scene(agents: Vec<AgentSceneState>) -> SceneSnapshot {
    let plan = FloorPlan::default();
    let generated_at = Utc
        .with_ymd_and_hms(2026, 2, 10, 0, 0, 0)
        .single()
        .expect("timestamp");
    SceneSnapshot {
        generated_at,
        source: SceneSource::Ingest,
        sync_status: SyncStatus::Live,
        last_ingested_at: Some(generated_at),
        stale_after_ms: plan.stale_after_ms,
        width: plan.width,
        height: plan.height,
        zones: plan.zones,
        agents,
        occupancy: Vec::new(),
        alerts: Vec::new(),
        events: Vec::new(),
        tasks: Vec::new(),
        metrics: Metrics::default(),
    }
}

fn simulation() -> Simulation {
    Simulation::new(&FloorPlan::default())
}

#[test]
fn agents_advance_toward_targets() {
    let sim = simulation();
    let scene = scene(vec![scene_agent("agent-a", Tile::new(2, 4), Tile::new(9, 4))]);

    let mut state = sim.create_state(&scene, None);
    assert!(state.agent("agent-a").expect("agent-a").scene.is_moving);

    state = sim.step(&state, 1000.0);
    let rendered = state.render();
    let a = &rendered[0];
    assert!(a.state.tile.x > 2, "agent should have moved right");
    assert_eq!(a.state.direction, Direction::Right);
}

#[test]
fn agents_arrive_and_stop() {
    let sim = simulation();
    let scene = scene(vec![scene_agent("agent-a", Tile::new(2, 4), Tile::new(9, 9))]);

    let mut state = sim.create_state(&scene, None);
    for _ in 0..60 {
        state = sim.step(&state, 250.0);
    }

    let a = state.agent("agent-a").expect("agent-a");
    assert_eq!(a.position.rounded(), Tile::new(9, 9));
    assert!(!a.scene.is_moving);
}

#[test]
fn contested_destination_is_claimed_by_one_agent() {
    // Both agents want (6, 5). After a one-second step exactly one of them
    // holds it and the other keeps a distinct tile.
    let sim = simulation();
    let scene = scene(vec![
        scene_agent("agent-a", Tile::new(5, 5), Tile::new(6, 5)),
        scene_agent("agent-b", Tile::new(7, 5), Tile::new(6, 5)),
    ]);

    let state = sim.step(&sim.create_state(&scene, None), 1000.0);
    let rendered = state.render();

    let tiles: Vec<Tile> = rendered.iter().map(|a| a.state.tile).collect();
    let at_target = tiles.iter().filter(|t| **t == Tile::new(6, 5)).count();
    assert_eq!(at_target, 1);
    assert_ne!(tiles[0], tiles[1]);

    // Ids sort ascending, so agent-a wins the tile and agent-b holds.
    let a = state.agent("agent-a").expect("agent-a");
    let b = state.agent("agent-b").expect("agent-b");
    assert_eq!(a.position.rounded(), Tile::new(6, 5));
    assert_eq!(b.position.rounded(), Tile::new(7, 5));
    assert!(!b.scene.is_moving);
}

#[test]
fn no_two_agents_share_a_tile_after_stepping() {
    let sim = simulation();
    let scene = scene(vec![
        scene_agent("agent-a", Tile::new(3, 4), Tile::new(8, 4)),
        scene_agent("agent-b", Tile::new(4, 4), Tile::new(8, 4)),
        scene_agent("agent-c", Tile::new(5, 4), Tile::new(8, 4)),
        scene_agent("agent-d", Tile::new(8, 4), Tile::new(8, 4)),
    ]);

    let mut state = sim.create_state(&scene, None);
    for _ in 0..40 {
        state = sim.step(&state, 200.0);

        let mut tiles: Vec<Tile> = state.render().iter().map(|a| a.state.tile).collect();
        tiles.sort();
        tiles.dedup();
        assert_eq!(tiles.len(), 4, "agents overlapped");
    }
}

#[test]
fn positions_carry_across_scene_rebuilds() {
    let sim = simulation();
    let first = scene(vec![scene_agent("agent-a", Tile::new(2, 4), Tile::new(9, 4))]);

    let mut state = sim.create_state(&first, None);
    state = sim.step(&state, 500.0);
    let mid_position = state.agent("agent-a").expect("agent-a").position;

    let rebuilt = sim.create_state(&first, Some(&state));
    let carried = rebuilt.agent("agent-a").expect("agent-a");
    assert_eq!(carried.position, mid_position);
}

#[test]
fn departed_agents_are_dropped_silently() {
    let sim = simulation();
    let both = scene(vec![
        scene_agent("agent-a", Tile::new(2, 4), Tile::new(9, 4)),
        scene_agent("agent-b", Tile::new(2, 6), Tile::new(9, 6)),
    ]);
    let state = sim.create_state(&both, None);
    assert_eq!(state.len(), 2);

    let only_a = scene(vec![scene_agent("agent-a", Tile::new(2, 4), Tile::new(9, 4))]);
    let rebuilt = sim.create_state(&only_a, Some(&state));
    assert_eq!(rebuilt.len(), 1);
    assert!(rebuilt.agent("agent-b").is_none());
}

#[test]
fn stationary_agents_freeze_their_walk_frame() {
    let sim = simulation();
    let scene = scene(vec![scene_agent("agent-a", Tile::new(5, 5), Tile::new(5, 5))]);

    let mut state = sim.create_state(&scene, None);
    for _ in 0..10 {
        state = sim.step(&state, 250.0);
    }

    let a = state.agent("agent-a").expect("agent-a");
    assert_eq!(a.frame, 0.0);
    assert!(!a.scene.is_moving);
    assert_eq!(a.position.rounded(), Tile::new(5, 5));
}

#[test]
fn stepping_is_deterministic() {
    let sim = simulation();
    let build = || {
        scene(vec![
            scene_agent("agent-a", Tile::new(2, 4), Tile::new(9, 8)),
            scene_agent("agent-b", Tile::new(9, 4), Tile::new(2, 8)),
        ])
    };

    let run = |scene: &SceneSnapshot| {
        let mut state = sim.create_state(scene, None);
        for _ in 0..25 {
            state = sim.step(&state, 180.0);
        }
        state
            .render()
            .iter()
            .map(|a| (a.state.agent_id.clone(), a.state.tile))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(&build()), run(&build()));
}

#[test]
fn zero_delta_changes_nothing() {
    let sim = simulation();
    let scene = scene(vec![scene_agent("agent-a", Tile::new(2, 4), Tile::new(9, 4))]);

    let state = sim.create_state(&scene, None);
    let stepped = sim.step(&state, 0.0);
    let a = stepped.agent("agent-a").expect("agent-a");
    assert_eq!(a.position.rounded(), Tile::new(2, 4));
    assert_eq!(a.frame, 0.0);
}
