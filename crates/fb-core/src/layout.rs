use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::types::AgentRole;

// ---------------------------------------------------------------------------
// Tile / Rect
// ---------------------------------------------------------------------------

/// One cell of the floor grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between tile centers.
    pub fn distance(self, other: Tile) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle of tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn contains(&self, tile: Tile) -> bool {
        tile.x >= self.x
            && tile.y >= self.y
            && tile.x < self.x + self.width
            && tile.y < self.y + self.height
    }

    /// Every tile covered by the rectangle, row-major.
    pub fn tiles(&self) -> Vec<Tile> {
        let mut tiles = Vec::with_capacity((self.width.max(0) * self.height.max(0)) as usize);
        for y in self.y..self.y + self.height {
            for x in self.x..self.x + self.width {
                tiles.push(Tile::new(x, y));
            }
        }
        tiles
    }
}

// ---------------------------------------------------------------------------
// Zone
// ---------------------------------------------------------------------------

/// A fixed region of the floor with a capacity and an optional role affinity.
/// Zones never move; the set of zones is part of the floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub label: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub capacity: u32,
    #[serde(default)]
    pub role_hint: Option<AgentRole>,
}

impl Zone {
    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn contains(&self, tile: Tile) -> bool {
        self.bounds().contains(tile)
    }

    /// Tiles strictly inside the zone, excluding the one-tile border. Agents
    /// are only ever routed to interior tiles.
    pub fn interior_tiles(&self) -> Vec<Tile> {
        let mut tiles = Vec::new();
        for y in self.y + 1..=self.y + self.height - 2 {
            for x in self.x + 1..=self.x + self.width - 2 {
                tiles.push(Tile::new(x, y));
            }
        }
        tiles
    }
}

// ---------------------------------------------------------------------------
// Props
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropKind {
    Desk,
    Terminal,
    Server,
    Plant,
    Coffee,
    GateBeacon,
    Table,
    #[serde(rename = "crate")]
    CrateBox,
}

/// Decorative furniture. Passed through to the display layer untouched; the
/// core only validates that props sit on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prop {
    pub id: String,
    pub kind: PropKind,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub zone_id: Option<String>,
}

// ---------------------------------------------------------------------------
// FloorPlan
// ---------------------------------------------------------------------------

/// Static floor configuration: grid size, zones, obstacles, props, routing
/// targets, and the scene staleness threshold. Loaded from TOML or built
/// from [`FloorPlan::default`], and injected into the scene synthesizer and
/// the simulation; the core never reads ambient state for layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlan {
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    /// Zone that blocked and reviewing agents walk to.
    #[serde(default = "default_review_gate_zone")]
    pub review_gate_zone: String,
    /// Zone for offline and idle agents.
    #[serde(default = "default_break_zone")]
    pub break_zone: String,
    /// Zone for roles without a matching role hint.
    #[serde(default = "default_fallback_zone")]
    pub fallback_zone: String,
    /// Scene age after which sync drops from live to stale (offline at 6x).
    #[serde(default = "default_stale_after_ms")]
    pub stale_after_ms: i64,
    #[serde(default = "default_zones")]
    pub zones: Vec<Zone>,
    #[serde(default = "default_obstacles")]
    pub obstacles: Vec<Rect>,
    #[serde(default = "default_props")]
    pub props: Vec<Prop>,
}

impl Default for FloorPlan {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            review_gate_zone: default_review_gate_zone(),
            break_zone: default_break_zone(),
            fallback_zone: default_fallback_zone(),
            stale_after_ms: default_stale_after_ms(),
            zones: default_zones(),
            obstacles: default_obstacles(),
            props: default_props(),
        }
    }
}

impl FloorPlan {
    /// Load a plan from a TOML file, validating it.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, LayoutError> {
        let path = path.into();
        let text = std::fs::read_to_string(&path).map_err(|e| LayoutError::Io(e.to_string()))?;
        let plan: FloorPlan =
            toml::from_str(&text).map_err(|e| LayoutError::Parse(e.to_string()))?;
        plan.validate()?;
        Ok(plan)
    }

    /// Serialize the plan to a TOML string.
    pub fn to_toml(&self) -> Result<String, LayoutError> {
        self.validate()?;
        toml::to_string_pretty(self).map_err(|e| LayoutError::Parse(e.to_string()))
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// The zone a role works in: first zone whose role hint matches, else
    /// the fallback zone.
    pub fn zone_for_role(&self, role: AgentRole) -> Option<&Zone> {
        self.zones
            .iter()
            .find(|z| z.role_hint == Some(role))
            .or_else(|| self.zone(&self.fallback_zone))
    }

    fn in_grid(&self, rect: Rect) -> bool {
        rect.x >= 0
            && rect.y >= 0
            && rect.width > 0
            && rect.height > 0
            && rect.x + rect.width <= self.width
            && rect.y + rect.height <= self.height
    }

    /// Semantic validation beyond what serde can express.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.width < 4 || self.height < 4 {
            return Err(LayoutError::Validation(format!(
                "grid {}x{} is too small to hold a zone interior",
                self.width, self.height
            )));
        }
        if self.zones.is_empty() {
            return Err(LayoutError::Validation("zones must not be empty".into()));
        }

        let mut ids = BTreeSet::new();
        for zone in &self.zones {
            if zone.id.trim().is_empty() {
                return Err(LayoutError::Validation(
                    "zones must have non-empty ids".into(),
                ));
            }
            if !ids.insert(zone.id.clone()) {
                return Err(LayoutError::Validation(format!(
                    "duplicate zone id '{}'",
                    zone.id
                )));
            }
            if !self.in_grid(zone.bounds()) {
                return Err(LayoutError::Validation(format!(
                    "zone '{}' falls outside the {}x{} grid",
                    zone.id, self.width, self.height
                )));
            }
            if zone.width < 3 || zone.height < 3 {
                return Err(LayoutError::Validation(format!(
                    "zone '{}' has no interior (needs at least 3x3)",
                    zone.id
                )));
            }
            if zone.capacity == 0 {
                return Err(LayoutError::Validation(format!(
                    "zone '{}' must have capacity > 0",
                    zone.id
                )));
            }
        }

        for (route, id) in [
            ("review_gate_zone", &self.review_gate_zone),
            ("break_zone", &self.break_zone),
            ("fallback_zone", &self.fallback_zone),
        ] {
            if self.zone(id).is_none() {
                return Err(LayoutError::Validation(format!(
                    "{} '{}' does not match any zone",
                    route, id
                )));
            }
        }

        for obstacle in &self.obstacles {
            if !self.in_grid(*obstacle) {
                return Err(LayoutError::Validation(format!(
                    "obstacle at ({}, {}) falls outside the grid",
                    obstacle.x, obstacle.y
                )));
            }
        }

        for prop in &self.props {
            if let Some(zone_id) = &prop.zone_id {
                if self.zone(zone_id).is_none() {
                    return Err(LayoutError::Validation(format!(
                        "prop '{}' references unknown zone '{}'",
                        prop.id, zone_id
                    )));
                }
            }
        }

        if self.stale_after_ms <= 0 {
            return Err(LayoutError::Validation(
                "stale_after_ms must be positive".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("io: {0}")]
    Io(String),
    #[error("parse: {0}")]
    Parse(String),
    #[error("validation: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Default office plan
// ---------------------------------------------------------------------------

fn default_width() -> i32 {
    48
}
fn default_height() -> i32 {
    30
}
fn default_review_gate_zone() -> String {
    "reviewer_gate".into()
}
fn default_break_zone() -> String {
    "break_area".into()
}
fn default_fallback_zone() -> String {
    "intake".into()
}
fn default_stale_after_ms() -> i64 {
    45_000
}

fn zone(
    id: &str,
    label: &str,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    capacity: u32,
    role_hint: Option<AgentRole>,
) -> Zone {
    Zone {
        id: id.into(),
        label: label.into(),
        x,
        y,
        width,
        height,
        capacity,
        role_hint,
    }
}

fn default_zones() -> Vec<Zone> {
    vec![
        zone("intake", "Intake", 2, 3, 10, 8, 6, None),
        zone("planner_bay", "Planner Bay", 14, 3, 8, 8, 4, Some(AgentRole::Planner)),
        zone("frontend_bay", "Frontend Bay", 24, 3, 8, 8, 4, Some(AgentRole::Frontend)),
        zone("backend_bay", "Backend Bay", 34, 3, 10, 8, 6, Some(AgentRole::Backend)),
        zone("reviewer_gate", "Reviewer Gate", 14, 14, 14, 8, 8, Some(AgentRole::Reviewer)),
        zone("break_area", "Break Area", 30, 14, 14, 12, 12, None),
        zone(
            "orchestrator_desk",
            "Control Desk",
            2,
            14,
            10,
            12,
            4,
            Some(AgentRole::Orchestrator),
        ),
    ]
}

fn rect(x: i32, y: i32, width: i32, height: i32) -> Rect {
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn default_obstacles() -> Vec<Rect> {
    vec![
        rect(12, 3, 1, 23),
        rect(22, 3, 1, 8),
        rect(32, 3, 1, 8),
        rect(2, 11, 42, 1),
        rect(27, 14, 1, 12),
        rect(8, 18, 4, 1),
        rect(18, 18, 6, 1),
        rect(37, 20, 5, 1),
    ]
}

fn prop(id: &str, kind: PropKind, x: i32, y: i32, width: i32, height: i32, zone_id: &str) -> Prop {
    Prop {
        id: id.into(),
        kind,
        x,
        y,
        width,
        height,
        zone_id: Some(zone_id.into()),
    }
}

fn default_props() -> Vec<Prop> {
    use PropKind::*;
    vec![
        prop("intake-desk-a", Desk, 4, 5, 3, 2, "intake"),
        prop("intake-desk-b", Desk, 8, 7, 3, 2, "intake"),
        prop("planner-terminal-a", Terminal, 16, 5, 2, 2, "planner_bay"),
        prop("planner-terminal-b", Terminal, 19, 8, 2, 2, "planner_bay"),
        prop("frontend-terminal-a", Terminal, 25, 5, 2, 2, "frontend_bay"),
        prop("frontend-terminal-b", Terminal, 29, 8, 2, 2, "frontend_bay"),
        prop("backend-rack-a", Server, 36, 5, 2, 3, "backend_bay"),
        prop("backend-rack-b", Server, 40, 7, 2, 3, "backend_bay"),
        prop("review-gate-beacon", GateBeacon, 26, 13, 1, 1, "reviewer_gate"),
        prop("review-table", Table, 18, 18, 4, 2, "reviewer_gate"),
        prop("break-coffee", Coffee, 32, 18, 2, 2, "break_area"),
        prop("break-plant-a", Plant, 41, 16, 1, 2, "break_area"),
        prop("break-plant-b", Plant, 39, 23, 1, 2, "break_area"),
        prop("orchestrator-main-desk", Desk, 4, 17, 5, 2, "orchestrator_desk"),
        prop("orchestrator-crate", CrateBox, 9, 22, 2, 2, "orchestrator_desk"),
    ]
}
