//! The scene synthesizer: one pass over a workspace snapshot produces the
//! complete derived scene. Everything is a pure function of (workspace,
//! previous scene, now), with no ambient clocks or globals, so
//! re-synthesizing an unchanged workspace reproduces the scene exactly.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

use fb_core::identity::{generate_identity, SeededRng};
use fb_core::layout::{FloorPlan, LayoutError, Tile, Zone};
use fb_core::scene::{
    classify_sync, AgentSceneState, Direction, SceneSnapshot, SceneSource, ZoneOccupancy,
};
use fb_core::types::WorkspaceSnapshot;

use crate::events::{derive_alerts, derive_events};
use crate::rules::{derive_activity, primary_task, route_zone};

/// Width of the window used to slowly re-roll in-zone target tiles. Derived
/// from the workspace timestamp, not the wall clock, so synthesis stays
/// idempotent for an unchanged snapshot.
pub const TARGET_DRIFT_WINDOW_MS: i64 = 300_000;

/// Derives scenes from workspace snapshots against a fixed floor plan.
pub struct SceneSynthesizer {
    plan: FloorPlan,
}

impl SceneSynthesizer {
    /// Build a synthesizer over a validated floor plan.
    pub fn new(plan: FloorPlan) -> Result<Self, LayoutError> {
        plan.validate()?;
        Ok(Self { plan })
    }

    pub fn plan(&self) -> &FloorPlan {
        &self.plan
    }

    /// Derive the scene for `workspace`. The previous scene contributes
    /// position continuity (and the prior task list for transition events);
    /// everything else is recomputed from scratch.
    pub fn synthesize(
        &self,
        workspace: &WorkspaceSnapshot,
        source: SceneSource,
        previous: Option<&SceneSnapshot>,
        now: DateTime<Utc>,
    ) -> SceneSnapshot {
        let previous_agents: HashMap<&str, &AgentSceneState> = previous
            .map(|scene| {
                scene
                    .agents
                    .iter()
                    .map(|a| (a.agent_id.as_str(), a))
                    .collect()
            })
            .unwrap_or_default();

        let drift_bucket = workspace
            .generated_at
            .timestamp_millis()
            .div_euclid(TARGET_DRIFT_WINDOW_MS);

        let mut zone_slots: HashMap<String, i64> = HashMap::new();
        let mut agents = Vec::with_capacity(workspace.agents.len());

        for record in &workspace.agents {
            let identity = record.identity.clone().unwrap_or_else(|| {
                generate_identity(record.identity_seed(), record.role, &record.display_name)
            });

            let task = primary_task(&record.id, &workspace.tasks);
            let activity = derive_activity(record.status, task);
            let carried = previous_agents.get(record.id.as_str());

            let (target_zone_id, target_tile) =
                match route_zone(&self.plan, record.role, activity) {
                    Some(zone) => {
                        let slot = zone_slots.entry(zone.id.clone()).or_insert(0);
                        let tile =
                            self.target_tile_in(zone, &record.id, *slot + drift_bucket);
                        *slot += 1;
                        (zone.id.clone(), tile)
                    }
                    // Unroutable plans are rejected by the constructor; stay
                    // put rather than panic if one slips through.
                    None => {
                        let tile = carried.map(|p| p.tile).unwrap_or_default();
                        (self.plan.fallback_zone.clone(), tile)
                    }
                };

            let tile = carried.map(|p| p.tile).unwrap_or(target_tile);
            let direction = carried.map(|p| p.direction).unwrap_or(Direction::Down);

            agents.push(AgentSceneState {
                agent_id: record.id.clone(),
                display_name: record.display_name.clone(),
                role: record.role,
                runtime_status: record.status,
                activity_state: activity,
                direction,
                tile,
                target_tile,
                target_zone_id,
                current_task_id: task.map(|t| t.id.clone()),
                last_event_at: record.last_updated_at,
                is_moving: tile != target_tile,
                identity,
            });
        }

        let occupancy = self.occupancy(&agents);
        let alerts = derive_alerts(&workspace.tasks);
        let events = derive_events(
            &workspace.tasks,
            previous.map(|scene| scene.tasks.as_slice()),
            workspace.generated_at,
        );

        let last_ingested_at = match source {
            SceneSource::Ingest => Some(workspace.generated_at),
            SceneSource::Local => previous.and_then(|scene| scene.last_ingested_at),
        };

        debug!(
            agents = agents.len(),
            tasks = workspace.tasks.len(),
            alerts = alerts.len(),
            events = events.len(),
            "scene synthesized"
        );

        SceneSnapshot {
            generated_at: workspace.generated_at,
            source,
            sync_status: classify_sync(workspace.generated_at, self.plan.stale_after_ms, now),
            last_ingested_at,
            stale_after_ms: self.plan.stale_after_ms,
            width: self.plan.width,
            height: self.plan.height,
            zones: self.plan.zones.clone(),
            agents,
            occupancy,
            alerts,
            events,
            tasks: workspace.tasks.clone(),
            metrics: workspace.metrics.clone(),
        }
    }

    /// Deterministic target tile strictly inside the zone interior. The
    /// stream is salted with the per-pass slot so agents routed to the same
    /// zone spread out instead of collapsing onto one tile.
    fn target_tile_in(&self, zone: &Zone, agent_id: &str, slot: i64) -> Tile {
        let interior = zone.interior_tiles();
        if interior.is_empty() {
            return Tile::new(zone.x, zone.y);
        }
        let mut rng = SeededRng::new(&format!("{}:{}:{}", agent_id, zone.id, slot));
        *rng.pick(&interior).unwrap_or(&interior[0])
    }

    /// Per-zone headcount of agents targeting each zone.
    fn occupancy(&self, agents: &[AgentSceneState]) -> Vec<ZoneOccupancy> {
        self.plan
            .zones
            .iter()
            .map(|zone| ZoneOccupancy {
                zone_id: zone.id.clone(),
                count: agents
                    .iter()
                    .filter(|a| a.target_zone_id == zone.id)
                    .count() as u32,
                capacity: zone.capacity,
            })
            .collect()
    }
}
