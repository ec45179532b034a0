//! Bounded alert and event feeds derived from the task list.
//!
//! Events compare the current tasks against the tasks echoed in the
//! previous scene, so transition detection needs no storage beyond the
//! scene chain itself. Ids embed the task id, category, and update stamp;
//! re-deriving the same transition always yields the same id.

use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashMap;

use fb_core::scene::{Alert, AlertSeverity, EventKind, SceneEvent};
use fb_core::types::TaskRecord;

use crate::rules::{is_blocked, normalize_status};

pub const MAX_ALERTS: usize = 12;
pub const MAX_EVENTS: usize = 40;

/// Review-loop count at which a task is considered stuck in review.
pub const REVIEW_LOOP_SPIKE: u32 = 3;

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// Alerts for tasks that need attention right now: currently blocked, or
/// churning through review loops. Newest first, capped.
pub fn derive_alerts(tasks: &[TaskRecord]) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for task in tasks {
        let status = normalize_status(&task.status);
        if is_blocked(&status) {
            alerts.push(Alert {
                id: format!("alert-{}-blocked-{}", task.id, task.updated_at.to_rfc3339()),
                severity: AlertSeverity::Warning,
                message: format!("{} blocked on {}", task.owner, task.goal),
                created_at: task.updated_at,
                agent_id: Some(task.owner.clone()),
                task_id: Some(task.id.clone()),
            });
        }
        if task.review_loops >= REVIEW_LOOP_SPIKE {
            alerts.push(Alert {
                id: format!("alert-{}-review-{}", task.id, task.updated_at.to_rfc3339()),
                severity: AlertSeverity::Critical,
                message: format!(
                    "{} has been through review {} times",
                    task.goal, task.review_loops
                ),
                created_at: task.updated_at,
                agent_id: Some(task.owner.clone()),
                task_id: Some(task.id.clone()),
            });
        }
    }

    alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    alerts.truncate(MAX_ALERTS);
    alerts
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

fn task_event(
    task: &TaskRecord,
    kind: EventKind,
    category: &str,
    severity: AlertSeverity,
    message: String,
) -> SceneEvent {
    SceneEvent {
        id: format!(
            "event-{}-{}-{}",
            task.id,
            category,
            task.updated_at.to_rfc3339()
        ),
        kind,
        severity,
        message,
        created_at: task.updated_at,
        agent_id: Some(task.owner.clone()),
        task_id: Some(task.id.clone()),
        metadata: None,
    }
}

/// Timeline entries for task transitions since the previous scene, plus the
/// always-present snapshot marker. Newest first, capped.
pub fn derive_events(
    tasks: &[TaskRecord],
    previous_tasks: Option<&[TaskRecord]>,
    generated_at: DateTime<Utc>,
) -> Vec<SceneEvent> {
    let prior: HashMap<&str, &TaskRecord> = previous_tasks
        .unwrap_or(&[])
        .iter()
        .map(|t| (t.id.as_str(), t))
        .collect();

    let mut events = Vec::new();

    for task in tasks {
        let status = normalize_status(&task.status);

        let Some(prior_task) = prior.get(task.id.as_str()) else {
            events.push(task_event(
                task,
                EventKind::TaskAssigned,
                "assigned",
                AlertSeverity::Info,
                format!("{} picked up {}", task.owner, task.goal),
            ));
            continue;
        };

        let prior_status = normalize_status(&prior_task.status);
        if status != prior_status {
            if is_blocked(&status) {
                events.push(task_event(
                    task,
                    EventKind::TaskBlocked,
                    "blocked",
                    AlertSeverity::Warning,
                    format!("{} blocked on {}", task.owner, task.goal),
                ));
            } else if status == "done" || status == "pass" {
                events.push(task_event(
                    task,
                    EventKind::TaskPassed,
                    "pass",
                    AlertSeverity::Info,
                    format!("{} completed {}", task.owner, task.goal),
                ));
            } else {
                let mut event = task_event(
                    task,
                    EventKind::TaskProgress,
                    "progress",
                    AlertSeverity::Info,
                    format!("{} status changed to {}", task.owner, status),
                );
                event.metadata = Some(json!({
                    "previous_status": prior_status,
                    "next_status": status,
                }));
                events.push(event);
            }
        }

        if task.review_loops >= REVIEW_LOOP_SPIKE && task.review_loops > prior_task.review_loops {
            events.push(task_event(
                task,
                EventKind::ReviewLoopSpike,
                "review",
                AlertSeverity::Warning,
                format!(
                    "{} review loops increased to {}",
                    task.owner, task.review_loops
                ),
            ));
        }
    }

    events.push(SceneEvent {
        id: format!("event-snapshot-{}", generated_at.to_rfc3339()),
        kind: EventKind::SnapshotIngested,
        severity: AlertSeverity::Info,
        message: "Workspace snapshot refreshed".to_string(),
        created_at: generated_at,
        agent_id: None,
        task_id: None,
        metadata: None,
    });

    events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    events.truncate(MAX_EVENTS);
    events
}
