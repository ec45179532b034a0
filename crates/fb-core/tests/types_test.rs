use chrono::{Duration, TimeZone, Utc};
use fb_core::types::*;

#[test]
fn role_flavor_tables() {
    assert_eq!(AgentRole::Orchestrator.character_name(), "Captain Orbit");
    assert_eq!(AgentRole::Reviewer.character_name(), "Gate Sentinel");
    assert!(!AgentRole::Worker.emoji().is_empty());
}

#[test]
fn role_display_and_parse_roundtrip() {
    for role in [
        AgentRole::Orchestrator,
        AgentRole::Planner,
        AgentRole::Frontend,
        AgentRole::Backend,
        AgentRole::Reviewer,
        AgentRole::Worker,
    ] {
        let parsed: AgentRole = role.to_string().parse().expect("parse role");
        assert_eq!(parsed, role);
    }
    assert!("chief-vibes-officer".parse::<AgentRole>().is_err());
}

#[test]
fn role_serializes_snake_case() {
    let json = serde_json::to_string(&AgentRole::Orchestrator).expect("serialize role");
    assert_eq!(json, "\"orchestrator\"");
}

#[test]
fn runtime_status_from_recency() {
    let now = Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).single().expect("timestamp");

    assert_eq!(
        RuntimeStatus::from_last_seen(Some(now - Duration::minutes(5)), now),
        RuntimeStatus::Online
    );
    assert_eq!(
        RuntimeStatus::from_last_seen(Some(now - Duration::hours(2)), now),
        RuntimeStatus::Idle
    );
    assert_eq!(
        RuntimeStatus::from_last_seen(Some(now - Duration::hours(30)), now),
        RuntimeStatus::Offline
    );
    assert_eq!(RuntimeStatus::from_last_seen(None, now), RuntimeStatus::Offline);
}

#[test]
fn gait_speeds() {
    assert_eq!(Gait::Quick.tiles_per_second(), 4.2);
    assert_eq!(Gait::Drift.tiles_per_second(), 2.3);
    assert_eq!(Gait::Steady.tiles_per_second(), 3.1);
}

#[test]
fn agent_record_parses_with_defaults() {
    let json = r#"{
        "id": "agent-1",
        "display_name": "Agent One",
        "role": "backend",
        "status": "online"
    }"#;
    let record: AgentRecord = serde_json::from_str(json).expect("parse agent");
    assert_eq!(record.id, "agent-1");
    assert_eq!(record.role, AgentRole::Backend);
    assert_eq!(record.status, RuntimeStatus::Online);
    assert!(record.identity.is_none());
    assert!(record.avatar_seed.is_empty());
    assert_eq!(record.identity_seed(), "agent-1");
    assert_eq!(record.total_tokens, 0);
}

#[test]
fn identity_seed_prefers_avatar_seed() {
    let json = r#"{
        "id": "agent-1",
        "display_name": "Agent One",
        "role": "backend",
        "status": "online",
        "avatar_seed": "custom-seed"
    }"#;
    let record: AgentRecord = serde_json::from_str(json).expect("parse agent");
    assert_eq!(record.identity_seed(), "custom-seed");
}

#[test]
fn task_record_parses_with_defaults() {
    let json = r#"{
        "id": "task-1",
        "goal": "wire the dashboard",
        "status": "in_progress",
        "owner": "agent-1",
        "created_at": "2026-02-10T00:00:00Z",
        "updated_at": "2026-02-10T01:00:00Z"
    }"#;
    let task: TaskRecord = serde_json::from_str(json).expect("parse task");
    assert!(task.depends_on.is_empty());
    assert_eq!(task.attempts, 0);
    assert_eq!(task.review_loops, 0);
    assert!(task.notes.is_empty());
}

#[test]
fn workspace_snapshot_roundtrip() {
    let json = r#"{
        "generated_at": "2026-02-10T00:00:00Z",
        "sources": { "roster": true, "queue": false, "telemetry": false },
        "agents": [],
        "tasks": []
    }"#;
    let snapshot: WorkspaceSnapshot = serde_json::from_str(json).expect("parse workspace");
    assert!(snapshot.sources.roster);
    assert_eq!(snapshot.metrics, Metrics::default());

    let text = serde_json::to_string(&snapshot).expect("serialize workspace");
    let back: WorkspaceSnapshot = serde_json::from_str(&text).expect("reparse workspace");
    assert_eq!(back, snapshot);
}
