//! Progression engine: XP awards and daily streak arithmetic.
//!
//! # Responsibility
//! - Apply XP/streak updates after qualifying events (review completion,
//!   todo completion).
//! - Keep streak arithmetic a pure function of date keys.
//!
//! # Invariants
//! - Level is always derived from XP at read time; it is never written.
//! - Same-UTC-day repeats never change the streak.

use crate::clock::{is_previous_day, EpochMs};
use crate::model::workspace::WorkspaceId;
use crate::repo::workspace_repo::WorkspaceRepository;
use crate::repo::EntityKind;
use crate::service::{not_found, CoreResult};
use log::info;

/// XP granted for one completed review.
pub const REVIEW_COMPLETED_XP: i64 = 10;

/// XP granted for one todo transitioning to done.
pub const TODO_COMPLETED_XP: i64 = 5;

/// Computes the streak after a qualifying event on `today`.
///
/// - no prior activity: the streak starts at 1;
/// - prior activity today: unchanged (same-day repeats don't double count);
/// - prior activity exactly yesterday: incremented;
/// - any longer gap: reset to 1.
pub fn next_streak(current: i64, last_activity_date: Option<&str>, today: &str) -> i64 {
    match last_activity_date {
        None => 1,
        Some(last) if last == today => current.max(1),
        Some(last) if is_previous_day(last, today) => current + 1,
        Some(_) => 1,
    }
}

/// Applies one qualifying event: adds XP and rolls the streak forward.
pub fn award<W: WorkspaceRepository>(
    workspaces: &W,
    owner: &str,
    workspace_uuid: WorkspaceId,
    xp_delta: i64,
    today: &str,
    now_ms: EpochMs,
) -> CoreResult<()> {
    let workspace = workspaces
        .get_workspace(owner, workspace_uuid)?
        .ok_or_else(|| not_found(EntityKind::Workspace, workspace_uuid))?;

    let streak = next_streak(
        workspace.streak_count,
        workspace.last_activity_date.as_deref(),
        today,
    );
    workspaces.apply_activity(owner, workspace_uuid, xp_delta, streak, today, now_ms)?;

    info!(
        "event=xp_award module=gamification status=ok workspace={workspace_uuid} xp_delta={xp_delta} streak={streak}"
    );
    Ok(())
}
