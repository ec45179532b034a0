use chrono::Utc;
use std::path::Path;
use tracing::info;

use fb_core::scene::{SceneSnapshot, SceneSource};
use fb_core::types::WorkspaceSnapshot;
use fb_scene::SceneSynthesizer;

pub fn run(
    workspace: &Path,
    previous: Option<&Path>,
    plan: Option<&Path>,
    local: bool,
    pretty: bool,
) -> anyhow::Result<()> {
    let plan = super::load_plan(plan)?;
    let workspace: WorkspaceSnapshot = super::read_json(workspace)?;
    let previous: Option<SceneSnapshot> = previous.map(super::read_json).transpose()?;

    let synthesizer = SceneSynthesizer::new(plan)?;
    let source = if local {
        SceneSource::Local
    } else {
        SceneSource::Ingest
    };
    let scene = synthesizer.synthesize(&workspace, source, previous.as_ref(), Utc::now());

    info!(
        agents = scene.agents.len(),
        alerts = scene.alerts.len(),
        sync = ?scene.sync_status,
        "scene derived"
    );
    super::print_json(&scene, pretty)
}
