//! Tick-driven movement engine. Each call takes the complete prior state
//! and returns a new one, with no interior mutability and no timers, so the
//! host render loop owns pacing and cancellation is just "stop calling
//! step".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet, VecDeque};
use tracing::trace;

use fb_core::layout::{FloorPlan, Tile};
use fb_core::scene::{AgentSceneState, Direction, SceneSnapshot};

use crate::grid::Grid;

/// Walk-cycle frames advanced per second of movement.
const FRAMES_PER_SECOND: f32 = 10.0;
const FRAME_CYCLE: f32 = 4.0;

/// Distance from the target tile under which an agent counts as arrived.
const ARRIVAL_EPSILON: f32 = 0.05;
/// Remaining distance under which a partial step snaps to the waypoint.
const SNAP_EPSILON: f32 = 1e-4;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Sub-tile floating position used for smooth interpolation between tiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    fn from_tile(tile: Tile) -> Self {
        Self {
            x: tile.x as f32,
            y: tile.y as f32,
        }
    }

    pub fn rounded(self) -> Tile {
        Tile::new(self.x.round() as i32, self.y.round() as i32)
    }
}

fn direction_from_delta(dx: f32, dy: f32, fallback: Direction) -> Direction {
    if dx.abs() > dy.abs() {
        if dx >= 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy.abs() > 0.0 {
        if dy >= 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    } else {
        fallback
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Engine-internal per-agent state. Never serialized as-is; rebuilt from
/// each new scene with positions carried forward by agent id.
#[derive(Debug, Clone)]
pub struct SimAgent {
    pub scene: AgentSceneState,
    pub position: Position,
    pub speed: f32,
    pub frame: f32,
    path: VecDeque<Tile>,
}

impl SimAgent {
    /// Remaining waypoints toward the target tile.
    pub fn waypoints(&self) -> impl Iterator<Item = &Tile> {
        self.path.iter()
    }
}

/// All agents keyed by id. `BTreeMap` iteration gives the deterministic
/// ascending-id update order the collision rule depends on.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub width: i32,
    pub height: i32,
    pub generated_at: DateTime<Utc>,
    agents: BTreeMap<String, SimAgent>,
}

impl SimulationState {
    pub fn agent(&self, agent_id: &str) -> Option<&SimAgent> {
        self.agents.get(agent_id)
    }

    pub fn agents(&self) -> impl Iterator<Item = &SimAgent> {
        self.agents.values()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Discrete placement for the display layer: rounded tiles, integer
    /// animation frames, ascending agent id order.
    pub fn render(&self) -> Vec<RenderedAgent> {
        self.agents
            .values()
            .map(|agent| {
                let mut scene = agent.scene.clone();
                scene.tile = agent.position.rounded();
                RenderedAgent {
                    state: scene,
                    position: agent.position,
                    frame: agent.frame as u32,
                }
            })
            .collect()
    }
}

/// One agent ready for drawing.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedAgent {
    #[serde(flatten)]
    pub state: AgentSceneState,
    pub position: Position,
    pub frame: u32,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// The movement engine: owns the immutable walkability grid, steps states.
pub struct Simulation {
    grid: Grid,
}

impl Simulation {
    pub fn new(plan: &FloorPlan) -> Self {
        Self {
            grid: Grid::from_plan(plan),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Path toward `goal` with the leading start tile stripped, so the
    /// front waypoint is always the next tile to enter.
    fn plan_route(&self, start: Tile, goal: Tile) -> VecDeque<Tile> {
        let mut path: VecDeque<Tile> = self.grid.find_path(start, goal).into();
        if path.len() > 1 && path.front() == Some(&start) {
            path.pop_front();
        }
        path
    }

    /// Seed simulation state from a fresh scene. Agents that persisted keep
    /// their sub-tile position, heading, and walk frame; new agents spawn at
    /// their declared tile; departed agents are silently dropped.
    pub fn create_state(
        &self,
        scene: &SceneSnapshot,
        previous: Option<&SimulationState>,
    ) -> SimulationState {
        let mut agents = BTreeMap::new();

        for agent in &scene.agents {
            let existing = previous.and_then(|state| state.agents.get(&agent.agent_id));
            let position = existing
                .map(|e| e.position)
                .unwrap_or_else(|| Position::from_tile(agent.tile));
            let start = position.rounded();
            let path = self.plan_route(start, agent.target_tile);

            let mut scene_state = agent.clone();
            scene_state.tile = start;
            if let Some(existing) = existing {
                scene_state.direction = existing.scene.direction;
            }
            scene_state.is_moving = !path.is_empty() && start != agent.target_tile;

            agents.insert(
                agent.agent_id.clone(),
                SimAgent {
                    speed: agent.identity.gait.tiles_per_second(),
                    frame: existing.map(|e| e.frame).unwrap_or(0.0),
                    position,
                    path,
                    scene: scene_state,
                },
            );
        }

        SimulationState {
            width: scene.width,
            height: scene.height,
            generated_at: scene.generated_at,
            agents,
        }
    }

    /// Advance every agent by `delta_ms`. Agents update in ascending id
    /// order against a live occupancy set: the first agent to claim a tile
    /// wins it and later agents hold position for the tick: greedy and
    /// first-come rather than globally optimal, but reproducible.
    pub fn step(&self, state: &SimulationState, delta_ms: f64) -> SimulationState {
        let dt = (delta_ms.max(0.0) / 1000.0) as f32;

        let mut occupied: HashSet<Tile> = state
            .agents
            .values()
            .map(|agent| agent.position.rounded())
            .collect();
        let mut next_agents = BTreeMap::new();

        for (id, agent) in &state.agents {
            let mut next = agent.clone();
            let current = next.position.rounded();

            if next.path.is_empty() && current != next.scene.target_tile {
                next.path = self.plan_route(current, next.scene.target_tile);
                trace!(agent = %id, waypoints = next.path.len(), "replanned path");
            }
            if next.path.front() == Some(&current) {
                next.path.pop_front();
            }

            let Some(waypoint) = next.path.front().copied() else {
                next.scene.tile = current;
                next.scene.is_moving = false;
                next_agents.insert(id.clone(), next);
                continue;
            };

            // Contested tile: the earlier-id agent already holds it this
            // tick, so hold position and retry next tick.
            if waypoint != current && occupied.contains(&waypoint) {
                next.scene.tile = current;
                next.scene.is_moving = false;
                next_agents.insert(id.clone(), next);
                continue;
            }

            let dx = waypoint.x as f32 - next.position.x;
            let dy = waypoint.y as f32 - next.position.y;
            let dist = (dx * dx + dy * dy).sqrt();
            let max_step = next.speed * dt;

            if dist <= max_step || dist <= SNAP_EPSILON {
                next.position = Position::from_tile(waypoint);
                next.scene.tile = waypoint;
                next.path.pop_front();
            } else {
                let ratio = max_step / dist;
                next.position.x += dx * ratio;
                next.position.y += dy * ratio;
                next.scene.tile = next.position.rounded();
            }

            next.scene.direction = direction_from_delta(dx, dy, next.scene.direction);
            next.scene.is_moving =
                next.scene.tile.distance(next.scene.target_tile) > ARRIVAL_EPSILON;
            if next.scene.is_moving {
                next.frame = (next.frame + dt * FRAMES_PER_SECOND) % FRAME_CYCLE;
            }

            occupied.remove(&current);
            occupied.insert(next.position.rounded());
            next_agents.insert(id.clone(), next);
        }

        SimulationState {
            width: state.width,
            height: state.height,
            generated_at: state.generated_at,
            agents: next_agents,
        }
    }
}
