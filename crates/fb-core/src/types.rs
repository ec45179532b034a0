use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// AgentRole
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Orchestrator,
    Planner,
    Frontend,
    Backend,
    Reviewer,
    Worker,
}

impl AgentRole {
    /// Flavor name shown on the roster for agents that did not pick one.
    pub fn character_name(&self) -> &'static str {
        match self {
            AgentRole::Orchestrator => "Captain Orbit",
            AgentRole::Planner => "Map Sage",
            AgentRole::Frontend => "Pixel Alchemist",
            AgentRole::Backend => "Forge Warden",
            AgentRole::Reviewer => "Gate Sentinel",
            AgentRole::Worker => "Ops Runner",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            AgentRole::Orchestrator => "\u{1f9ed}",
            AgentRole::Planner => "\u{1f9e0}",
            AgentRole::Frontend => "\u{1f3a8}",
            AgentRole::Backend => "\u{1f6e0}",
            AgentRole::Reviewer => "\u{2705}",
            AgentRole::Worker => "\u{1f916}",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AgentRole::Orchestrator => "orchestrator",
            AgentRole::Planner => "planner",
            AgentRole::Frontend => "frontend",
            AgentRole::Backend => "backend",
            AgentRole::Reviewer => "reviewer",
            AgentRole::Worker => "worker",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for AgentRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "orchestrator" => Ok(AgentRole::Orchestrator),
            "planner" => Ok(AgentRole::Planner),
            "frontend" => Ok(AgentRole::Frontend),
            "backend" => Ok(AgentRole::Backend),
            "reviewer" => Ok(AgentRole::Reviewer),
            "worker" => Ok(AgentRole::Worker),
            other => Err(format!("unknown agent role '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// RuntimeStatus
// ---------------------------------------------------------------------------

/// Liveness of the agent process itself, as reported by the workflow engine.
/// Orthogonal to the task-derived activity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeStatus {
    Online,
    Idle,
    Offline,
}

const ONLINE_WITHIN_MINUTES: i64 = 10;
const IDLE_WITHIN_HOURS: i64 = 24;

impl RuntimeStatus {
    /// Bucket a last-seen timestamp into a runtime status: active within the
    /// last ten minutes is online, within a day is idle, anything older (or
    /// never seen) is offline.
    pub fn from_last_seen(last_seen: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        let Some(last_seen) = last_seen else {
            return RuntimeStatus::Offline;
        };
        let age = now - last_seen;
        if age < Duration::minutes(ONLINE_WITHIN_MINUTES) {
            RuntimeStatus::Online
        } else if age < Duration::hours(IDLE_WITHIN_HOURS) {
            RuntimeStatus::Idle
        } else {
            RuntimeStatus::Offline
        }
    }
}

// ---------------------------------------------------------------------------
// Visual identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessoryKind {
    Visor,
    Headset,
    Antenna,
    Badge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gait {
    Steady,
    Quick,
    Drift,
}

impl Gait {
    /// Movement speed used by the simulation engine.
    pub fn tiles_per_second(&self) -> f32 {
        match self {
            Gait::Quick => 4.2,
            Gait::Drift => 2.3,
            Gait::Steady => 3.1,
        }
    }
}

/// Cosmetic personality note; has no effect on behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Temperament {
    Calm,
    Focused,
    Bold,
    Precise,
}

/// Stable, seed-derived look of an agent. Generated once per agent id and
/// never mutated afterward; the same seed + role + name always yields a
/// byte-identical profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualIdentity {
    pub seed: String,
    pub callsign: String,
    pub palette_key: String,
    pub base_color: String,
    pub accent_color: String,
    pub accessory_color: String,
    pub accessory: AccessoryKind,
    pub gait: Gait,
    pub temperament: Temperament,
}

// ---------------------------------------------------------------------------
// AgentRecord
// ---------------------------------------------------------------------------

/// One agent as reported by the workflow engine roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: String,
    pub display_name: String,
    pub role: AgentRole,
    pub status: RuntimeStatus,
    #[serde(default)]
    pub character_name: String,
    #[serde(default)]
    pub emoji: String,
    /// Seed for identity generation; falls back to the agent id when empty.
    #[serde(default)]
    pub avatar_seed: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub has_binding: bool,
    #[serde(default)]
    pub last_updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_summary: Option<String>,
    #[serde(default)]
    pub last_session_id: Option<String>,
    #[serde(default)]
    pub total_input_tokens: u64,
    #[serde(default)]
    pub total_output_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
    /// Present when the upstream already generated one; otherwise the scene
    /// synthesizer derives it deterministically.
    #[serde(default)]
    pub identity: Option<VisualIdentity>,
}

impl AgentRecord {
    /// The seed string used for identity generation.
    pub fn identity_seed(&self) -> &str {
        if self.avatar_seed.is_empty() {
            &self.id
        } else {
            &self.avatar_seed
        }
    }
}

// ---------------------------------------------------------------------------
// TaskRecord
// ---------------------------------------------------------------------------

/// One task from the workflow queue. `status` is free text from upstream and
/// is matched by case-insensitive substring, never exact-matched, so that
/// vocabulary drift ("blocked_on_review", "in progress") keeps working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub goal: String,
    #[serde(default)]
    pub priority: String,
    pub status: String,
    pub owner: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub review_loops: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Vec<String>,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureCause {
    pub cause: String,
    pub count: u64,
}

/// Aggregate queue telemetry, echoed through to the scene untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Metrics {
    #[serde(default)]
    pub total_tasks: u64,
    #[serde(default)]
    pub pass_rate: f64,
    #[serde(default)]
    pub status_counts: Vec<StatusCount>,
    #[serde(default)]
    pub avg_lead_time_ms: f64,
    #[serde(default)]
    pub avg_attempts: f64,
    #[serde(default)]
    pub avg_review_loops: f64,
    #[serde(default)]
    pub total_cost_usd: f64,
    #[serde(default)]
    pub avg_cost_usd: f64,
    #[serde(default)]
    pub top_failure_causes: Vec<FailureCause>,
}

// ---------------------------------------------------------------------------
// WorkspaceSnapshot
// ---------------------------------------------------------------------------

/// Which upstream sources contributed to a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SourceAvailability {
    #[serde(default)]
    pub roster: bool,
    #[serde(default)]
    pub queue: bool,
    #[serde(default)]
    pub telemetry: bool,
}

/// Point-in-time input from the workflow engine. Immutable once produced;
/// regenerated wholesale on each refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub sources: SourceAvailability,
    #[serde(default)]
    pub agents: Vec<AgentRecord>,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    #[serde(default)]
    pub metrics: Metrics,
}
