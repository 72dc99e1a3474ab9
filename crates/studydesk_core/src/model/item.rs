//! Item model: one piece of study material.
//!
//! # Responsibility
//! - Define the item record with status, progress, mastery, and
//!   spaced-repetition scheduling state.
//! - Provide the mastery progression ring as a pure transition.
//!
//! # Invariants
//! - `progress_percent` stays within 0..=100 (user-settable, non-monotonic).
//! - `next_review_at` is meaningful only while `review_enabled` is true.
//! - `review_stage` never decreases across consecutive reviews while
//!   `review_enabled` stays true.

use crate::clock::EpochMs;
use crate::model::folder::FolderId;
use crate::model::workspace::WorkspaceId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable item identifier.
pub type ItemId = Uuid;

/// Kind of study material an item holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Curated catalog resource (`resource_id` linkage).
    Resource,
    /// Uploaded document (`document_id` linkage).
    Document,
    /// External URL.
    Link,
    /// Free-form note text.
    Note,
}

/// Item lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Active,
    Saved,
    Completed,
    Archived,
}

/// Four-stage mastery progression per item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mastery {
    None,
    Understand,
    Implement,
    Teach,
}

impl Mastery {
    /// Advances one step around the fixed ring, wrapping after `Teach`.
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::Understand,
            Self::Understand => Self::Implement,
            Self::Implement => Self::Teach,
            Self::Teach => Self::None,
        }
    }
}

/// One piece of study material inside a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub uuid: ItemId,
    pub workspace_uuid: WorkspaceId,
    /// Optional parent folder; must belong to the same workspace.
    pub folder_uuid: Option<FolderId>,
    #[serde(rename = "type")]
    pub kind: ItemType,
    pub title: String,
    /// Used by `ItemType::Link`.
    pub url: Option<String>,
    /// Used by `ItemType::Note`.
    pub note: Option<String>,
    /// Lowercased, deduplicated labels.
    pub tags: Vec<String>,
    pub status: ItemStatus,
    /// User-settable completion estimate, 0..=100.
    pub progress_percent: u8,
    pub pinned: bool,
    pub mastery: Mastery,
    pub review_enabled: bool,
    /// Spaced-repetition stage; drives the next interval.
    pub review_stage: u32,
    /// Next due timestamp; present only while reviews are enabled.
    pub next_review_at: Option<EpochMs>,
    /// Kept across enable/disable toggles; history is not discarded.
    pub last_reviewed_at: Option<EpochMs>,
    /// Stamped on every successful mutation.
    pub last_touched_at: EpochMs,
    /// Opaque external resource-catalog reference.
    pub resource_id: Option<String>,
    /// Opaque external document-catalog reference.
    pub document_id: Option<String>,
    pub created_at: EpochMs,
}

/// Validation failures for item records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    BlankTitle,
    ProgressOutOfRange(u8),
    ReviewDateWithoutReviewEnabled,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "item title must not be blank"),
            Self::ProgressOutOfRange(value) => {
                write!(f, "progress_percent must be within 0..=100, got {value}")
            }
            Self::ReviewDateWithoutReviewEnabled => {
                write!(f, "next_review_at requires review_enabled")
            }
        }
    }
}

impl Error for ItemValidationError {}

impl Item {
    /// Creates an item with fresh defaults: `active`, zero progress,
    /// mastery `none`, reviews disabled.
    pub fn new(
        workspace_uuid: WorkspaceId,
        kind: ItemType,
        title: impl Into<String>,
        now_ms: EpochMs,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            workspace_uuid,
            folder_uuid: None,
            kind,
            title: title.into(),
            url: None,
            note: None,
            tags: Vec::new(),
            status: ItemStatus::Active,
            progress_percent: 0,
            pinned: false,
            mastery: Mastery::None,
            review_enabled: false,
            review_stage: 0,
            next_review_at: None,
            last_reviewed_at: None,
            last_touched_at: now_ms,
            resource_id: None,
            document_id: None,
            created_at: now_ms,
        }
    }

    /// Checks record-local invariants.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.title.trim().is_empty() {
            return Err(ItemValidationError::BlankTitle);
        }
        if self.progress_percent > 100 {
            return Err(ItemValidationError::ProgressOutOfRange(
                self.progress_percent,
            ));
        }
        if self.next_review_at.is_some() && !self.review_enabled {
            return Err(ItemValidationError::ReviewDateWithoutReviewEnabled);
        }
        Ok(())
    }
}
