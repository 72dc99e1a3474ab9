//! Spaced-repetition review scheduler.
//!
//! # Responsibility
//! - Advance review stages and compute next due dates on recorded reviews.
//! - Answer "what is due now" queries.
//!
//! # Invariants
//! - Intervals follow `min(max_days, base_days * 2^stage)` with base 1 and
//!   cap 60, so stale items never drift years out.
//! - The stage never decreases while reviews stay enabled.
//! - Early reviews are permitted; the scheduler only computes the next date
//!   from the current stage.

use crate::clock::{utc_date_key, Clock, EpochMs, MS_PER_DAY};
use crate::model::item::{Item, ItemId};
use crate::model::workspace::WorkspaceId;
use crate::repo::hierarchy_repo::{HierarchyRepository, ReviewUpdate};
use crate::repo::workspace_repo::WorkspaceRepository;
use crate::repo::EntityKind;
use crate::service::gamification::{self, REVIEW_COMPLETED_XP};
use crate::service::{not_found, CoreError, CoreResult};
use log::info;

/// Interval for a fresh item (stage 0), in days.
pub const BASE_INTERVAL_DAYS: i64 = 1;

/// Interval cap, in days.
pub const MAX_INTERVAL_DAYS: i64 = 60;

/// Days until the next review for an item at `stage`.
pub fn review_interval_days(stage: u32) -> i64 {
    // 2^6 already exceeds the cap; clamping the shift keeps the math in
    // i64 range for any persisted stage.
    let doubled = BASE_INTERVAL_DAYS << stage.min(6);
    doubled.min(MAX_INTERVAL_DAYS)
}

/// Use-case facade for the review scheduler.
pub struct ReviewService<H: HierarchyRepository, W: WorkspaceRepository, C: Clock> {
    hierarchy: H,
    workspaces: W,
    clock: C,
}

impl<H: HierarchyRepository, W: WorkspaceRepository, C: Clock> ReviewService<H, W, C> {
    pub fn new(hierarchy: H, workspaces: W, clock: C) -> Self {
        Self {
            hierarchy,
            workspaces,
            clock,
        }
    }

    /// Records one review: advances the stage, pushes the due date out, and
    /// fires the gamification event.
    pub fn record_review(&self, owner: &str, item_uuid: ItemId) -> CoreResult<Item> {
        let mut item = self
            .hierarchy
            .get_item(owner, item_uuid)?
            .ok_or_else(|| not_found(EntityKind::Item, item_uuid))?;

        if !item.review_enabled {
            return Err(CoreError::Validation(format!(
                "reviews are not enabled for item {item_uuid}"
            )));
        }

        let now_ms = self.clock.now_ms();
        let interval_days = review_interval_days(item.review_stage);
        let update = ReviewUpdate {
            review_stage: item.review_stage + 1,
            next_review_at: now_ms + interval_days * MS_PER_DAY,
            reviewed_at: now_ms,
        };
        self.hierarchy.apply_review(owner, item_uuid, update)?;

        let today = utc_date_key(now_ms);
        gamification::award(
            &self.workspaces,
            owner,
            item.workspace_uuid,
            REVIEW_COMPLETED_XP,
            &today,
            now_ms,
        )?;

        info!(
            "event=review_record module=review status=ok item={item_uuid} stage={} interval_days={interval_days}",
            update.review_stage
        );

        item.review_stage = update.review_stage;
        item.next_review_at = Some(update.next_review_at);
        item.last_reviewed_at = Some(update.reviewed_at);
        item.last_touched_at = update.reviewed_at;
        Ok(item)
    }

    /// Returns all review-enabled items due at the current time, most
    /// overdue first. An item without a due date counts as due immediately.
    pub fn due_now(&self, owner: &str, workspace_uuid: WorkspaceId) -> CoreResult<Vec<Item>> {
        let now_ms: EpochMs = self.clock.now_ms();
        Ok(self.hierarchy.due_items(owner, workspace_uuid, now_ms)?)
    }
}
