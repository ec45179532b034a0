use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::layout::{Tile, Zone};
use crate::types::{AgentRole, Metrics, RuntimeStatus, TaskRecord, VisualIdentity};

// ---------------------------------------------------------------------------
// ActivityState
// ---------------------------------------------------------------------------

/// What an agent is doing right now, derived each synthesis pass from its
/// runtime status and primary task. Memoryless: no transition needs history
/// beyond the current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityState {
    Offline,
    Idle,
    Active,
    Blocked,
    Reviewing,
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

// ---------------------------------------------------------------------------
// Sync freshness
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Live,
    Stale,
    Offline,
}

/// Multiplier applied to `stale_after_ms` before a scene counts as offline.
pub const OFFLINE_AFTER_FACTOR: i64 = 6;

/// Bucket a scene's age: within the threshold it is live, within six times
/// the threshold stale, beyond that offline. Pure in `now` so callers
/// re-classify on every read instead of running a timer.
pub fn classify_sync(
    generated_at: DateTime<Utc>,
    stale_after_ms: i64,
    now: DateTime<Utc>,
) -> SyncStatus {
    let age_ms = (now - generated_at).num_milliseconds();
    if age_ms <= stale_after_ms {
        SyncStatus::Live
    } else if age_ms <= stale_after_ms * OFFLINE_AFTER_FACTOR {
        SyncStatus::Stale
    } else {
        SyncStatus::Offline
    }
}

// ---------------------------------------------------------------------------
// SceneSource
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneSource {
    Ingest,
    Local,
}

// ---------------------------------------------------------------------------
// AgentSceneState
// ---------------------------------------------------------------------------

/// One agent's place in the scene: where it stands, where it is headed, and
/// why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSceneState {
    pub agent_id: String,
    pub display_name: String,
    pub role: AgentRole,
    pub runtime_status: RuntimeStatus,
    pub activity_state: ActivityState,
    pub direction: Direction,
    pub tile: Tile,
    pub target_tile: Tile,
    pub target_zone_id: String,
    pub current_task_id: Option<String>,
    pub last_event_at: Option<DateTime<Utc>>,
    pub is_moving: bool,
    pub identity: VisualIdentity,
}

// ---------------------------------------------------------------------------
// Alerts and events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub severity: AlertSeverity,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SnapshotIngested,
    TaskBlocked,
    TaskPassed,
    TaskAssigned,
    TaskProgress,
    ReviewLoopSpike,
    AgentOnline,
    AgentOffline,
    System,
}

/// Timeline entry. Ids are deterministic (`event-{task}-{kind}-{updated}`)
/// so hosts can use them as idempotency keys when forwarding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEvent {
    pub id: String,
    pub kind: EventKind,
    pub severity: AlertSeverity,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// SceneSnapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneOccupancy {
    pub zone_id: String,
    pub count: u32,
    pub capacity: u32,
}

/// The derived, renderable picture of the office at one point in time.
/// Entirely recomputable from a workspace snapshot plus the previous scene
/// (which contributes position continuity only); never a source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub generated_at: DateTime<Utc>,
    pub source: SceneSource,
    pub sync_status: SyncStatus,
    #[serde(default)]
    pub last_ingested_at: Option<DateTime<Utc>>,
    pub stale_after_ms: i64,
    pub width: i32,
    pub height: i32,
    pub zones: Vec<Zone>,
    pub agents: Vec<AgentSceneState>,
    pub occupancy: Vec<ZoneOccupancy>,
    pub alerts: Vec<Alert>,
    pub events: Vec<SceneEvent>,
    pub tasks: Vec<TaskRecord>,
    pub metrics: Metrics,
}

impl SceneSnapshot {
    /// Re-classify freshness against the current clock.
    pub fn sync_status_at(&self, now: DateTime<Utc>) -> SyncStatus {
        classify_sync(self.generated_at, self.stale_after_ms, now)
    }

    pub fn agent(&self, agent_id: &str) -> Option<&AgentSceneState> {
        self.agents.iter().find(|a| a.agent_id == agent_id)
    }
}
