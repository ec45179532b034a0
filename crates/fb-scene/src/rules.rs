//! Primary-task selection, activity derivation, and zone routing.
//!
//! Task status strings come from an upstream with a drifting vocabulary, so
//! every test here is a case-insensitive substring match ("blocked",
//! "review", "progress", "fail") rather than an exact comparison. The two
//! exceptions are "active" and "running", which are matched exactly to
//! avoid catching words like "inactive".

use fb_core::layout::{FloorPlan, Zone};
use fb_core::scene::ActivityState;
use fb_core::types::{AgentRole, RuntimeStatus, TaskRecord};

pub fn normalize_status(status: &str) -> String {
    status.trim().to_lowercase()
}

pub fn is_blocked(status: &str) -> bool {
    status.contains("blocked")
}

pub fn is_failed(status: &str) -> bool {
    status.contains("fail")
}

pub fn is_review(status: &str) -> bool {
    status.contains("review")
}

pub fn is_active(status: &str) -> bool {
    status.contains("progress") || status == "active" || status == "running"
}

/// Select the single task that represents an agent's current state when it
/// owns several: among its tasks newest-first, a blocked task always wins
/// regardless of recency, then an active one, then one under review, then
/// simply the most recent.
pub fn primary_task<'a>(agent_id: &str, tasks: &'a [TaskRecord]) -> Option<&'a TaskRecord> {
    let mut owned: Vec<&TaskRecord> = tasks.iter().filter(|t| t.owner == agent_id).collect();
    if owned.is_empty() {
        return None;
    }
    owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    owned
        .iter()
        .find(|t| is_blocked(&normalize_status(&t.status)))
        .or_else(|| {
            owned
                .iter()
                .find(|t| is_active(&normalize_status(&t.status)))
        })
        .or_else(|| {
            owned
                .iter()
                .find(|t| is_review(&normalize_status(&t.status)))
        })
        .copied()
        .or_else(|| owned.first().copied())
}

/// Derive the activity state from runtime status and the primary task.
///
/// Offline overrides everything. The blocked test runs before the review
/// test so a "blocked_on_review" task reads as blocked. Terminal statuses
/// ("done", "pass") fall through to idle.
pub fn derive_activity(runtime: RuntimeStatus, task: Option<&TaskRecord>) -> ActivityState {
    if runtime == RuntimeStatus::Offline {
        return ActivityState::Offline;
    }
    let Some(task) = task else {
        return ActivityState::Idle;
    };

    let status = normalize_status(&task.status);
    if is_blocked(&status) || is_failed(&status) {
        ActivityState::Blocked
    } else if is_review(&status) {
        ActivityState::Reviewing
    } else if is_active(&status) {
        ActivityState::Active
    } else {
        ActivityState::Idle
    }
}

/// Which zone an agent should head to: blocked and reviewing agents queue at
/// the review gate, offline agents sit in the break zone, idle agents go to
/// their desk (orchestrators) or the break zone (everyone else), and active
/// agents work in their role's bay.
///
/// Returns `None` only for a plan whose routing ids do not resolve, which
/// [`FloorPlan::validate`] rejects up front.
pub fn route_zone<'a>(
    plan: &'a FloorPlan,
    role: AgentRole,
    activity: ActivityState,
) -> Option<&'a Zone> {
    match activity {
        ActivityState::Blocked | ActivityState::Reviewing => plan.zone(&plan.review_gate_zone),
        ActivityState::Offline => plan.zone(&plan.break_zone),
        ActivityState::Idle => {
            if role == AgentRole::Orchestrator {
                plan.zone_for_role(role)
            } else {
                plan.zone(&plan.break_zone)
            }
        }
        ActivityState::Active => plan.zone_for_role(role),
    }
}
