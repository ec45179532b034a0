use chrono::Utc;
use std::path::Path;
use tracing::info;

use fb_core::scene::SceneSource;
use fb_core::types::WorkspaceSnapshot;
use fb_scene::SceneSynthesizer;
use fb_sim::Simulation;

pub fn run(
    workspace: &Path,
    plan: Option<&Path>,
    ticks: u32,
    delta_ms: f64,
    pretty: bool,
) -> anyhow::Result<()> {
    let plan = super::load_plan(plan)?;
    let workspace: WorkspaceSnapshot = super::read_json(workspace)?;

    let synthesizer = SceneSynthesizer::new(plan)?;
    let scene = synthesizer.synthesize(&workspace, SceneSource::Local, None, Utc::now());

    let simulation = Simulation::new(synthesizer.plan());
    let mut state = simulation.create_state(&scene, None);
    for _ in 0..ticks {
        state = simulation.step(&state, delta_ms);
    }

    let rendered = state.render();
    let moving = rendered.iter().filter(|a| a.state.is_moving).count();
    info!(
        agents = rendered.len(),
        moving,
        ticks,
        delta_ms,
        "simulation stepped"
    );
    super::print_json(&rendered, pretty)
}
