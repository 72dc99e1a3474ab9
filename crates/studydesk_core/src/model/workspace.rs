//! Workspace aggregate model.
//!
//! # Responsibility
//! - Define the top-level container record, its mode, and the daily focus
//!   list references.
//! - Provide the XP→level derivation as a pure function.
//!
//! # Invariants
//! - `xp` and `streak_count` are never negative.
//! - `focus` holds at most [`MAX_FOCUS_ENTRIES`] entries, unique by
//!   `(kind, ref_uuid)`.
//! - Level is always derived from `xp`; it is never stored.

use crate::clock::EpochMs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable workspace identifier.
pub type WorkspaceId = Uuid;

/// Opaque owner identity resolved by the external authentication layer.
pub type OwnerId = String;

/// Hard cap on workspaces per owner.
pub const MAX_WORKSPACES_PER_OWNER: u32 = 200;

/// Hard cap on daily focus entries per workspace.
pub const MAX_FOCUS_ENTRIES: usize = 3;

/// XP needed to advance one level.
pub const XP_PER_LEVEL: i64 = 100;

/// Study mode a workspace is currently driven in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceMode {
    /// Building new material.
    Build,
    /// Revisiting existing material.
    Revise,
    /// Interview preparation.
    Interview,
}

/// Referenced entity kind inside a focus entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusKind {
    Item,
    Todo,
}

/// One entry of the daily "next 3" focus list.
///
/// `ref_uuid` is an id lookup into items or todos, validated at write time;
/// it is not an ownership edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusRef {
    pub kind: FocusKind,
    pub ref_uuid: Uuid,
    /// Epoch ms the entry was appended.
    pub added_at: EpochMs,
}

/// Top-level container for one study topic, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub uuid: WorkspaceId,
    pub owner_id: OwnerId,
    pub title: String,
    pub goal: Option<String>,
    pub emoji: Option<String>,
    pub mode: WorkspaceMode,
    /// Lifetime experience points; never decreases below zero.
    pub xp: i64,
    /// Consecutive UTC days with at least one qualifying activity.
    pub streak_count: i64,
    /// UTC date key (`YYYY-MM-DD`) of the last qualifying activity.
    pub last_activity_date: Option<String>,
    /// UTC date key the current focus list was built for.
    pub focus_date: Option<String>,
    /// Ordered focus entries; at most [`MAX_FOCUS_ENTRIES`].
    pub focus: Vec<FocusRef>,
    pub created_at: EpochMs,
    pub updated_at: EpochMs,
}

/// Validation failures for workspace records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceValidationError {
    BlankTitle,
    NegativeXp(i64),
    NegativeStreak(i64),
    TooManyFocusEntries(usize),
    DuplicateFocusEntry { kind: FocusKind, ref_uuid: Uuid },
}

impl Display for WorkspaceValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "workspace title must not be blank"),
            Self::NegativeXp(value) => write!(f, "workspace xp must not be negative: {value}"),
            Self::NegativeStreak(value) => {
                write!(f, "workspace streak must not be negative: {value}")
            }
            Self::TooManyFocusEntries(count) => write!(
                f,
                "focus list holds {count} entries, maximum is {MAX_FOCUS_ENTRIES}"
            ),
            Self::DuplicateFocusEntry { kind, ref_uuid } => {
                write!(f, "duplicate focus entry ({kind:?}, {ref_uuid})")
            }
        }
    }
}

impl Error for WorkspaceValidationError {}

impl Workspace {
    /// Creates a fresh workspace: `build` mode, zero XP, zero streak,
    /// empty focus list.
    pub fn new(owner_id: impl Into<OwnerId>, title: impl Into<String>, now_ms: EpochMs) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            owner_id: owner_id.into(),
            title: title.into(),
            goal: None,
            emoji: None,
            mode: WorkspaceMode::Build,
            xp: 0,
            streak_count: 0,
            last_activity_date: None,
            focus_date: None,
            focus: Vec::new(),
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Checks record-local invariants.
    pub fn validate(&self) -> Result<(), WorkspaceValidationError> {
        if self.title.trim().is_empty() {
            return Err(WorkspaceValidationError::BlankTitle);
        }
        if self.xp < 0 {
            return Err(WorkspaceValidationError::NegativeXp(self.xp));
        }
        if self.streak_count < 0 {
            return Err(WorkspaceValidationError::NegativeStreak(self.streak_count));
        }
        validate_focus_entries(&self.focus)?;
        Ok(())
    }

    /// Current level, derived from XP at read time.
    pub fn level(&self) -> i64 {
        derive_level(self.xp)
    }
}

/// Derives the level for an XP total: `floor(xp / 100) + 1`.
///
/// Monotonic in `xp`; negative inputs clamp to level 1.
pub fn derive_level(xp: i64) -> i64 {
    xp.max(0) / XP_PER_LEVEL + 1
}

/// Checks focus-list cardinality and `(kind, ref_uuid)` uniqueness.
pub fn validate_focus_entries(entries: &[FocusRef]) -> Result<(), WorkspaceValidationError> {
    if entries.len() > MAX_FOCUS_ENTRIES {
        return Err(WorkspaceValidationError::TooManyFocusEntries(entries.len()));
    }
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert((entry.kind, entry.ref_uuid)) {
            return Err(WorkspaceValidationError::DuplicateFocusEntry {
                kind: entry.kind,
                ref_uuid: entry.ref_uuid,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        derive_level, validate_focus_entries, FocusKind, FocusRef, Workspace,
        WorkspaceValidationError,
    };
    use uuid::Uuid;

    #[test]
    fn new_workspace_has_spec_defaults() {
        let workspace = Workspace::new("owner-1", "Node.js", 1_000);
        assert_eq!(workspace.xp, 0);
        assert_eq!(workspace.level(), 1);
        assert_eq!(workspace.streak_count, 0);
        assert!(workspace.focus.is_empty());
        assert!(workspace.validate().is_ok());
    }

    #[test]
    fn derive_level_steps_every_hundred_xp() {
        assert_eq!(derive_level(0), 1);
        assert_eq!(derive_level(99), 1);
        assert_eq!(derive_level(100), 2);
        assert_eq!(derive_level(250), 3);
        assert_eq!(derive_level(-5), 1);
    }

    #[test]
    fn focus_entries_reject_duplicates_and_overflow() {
        let id = Uuid::new_v4();
        let entry = |kind, ref_uuid| FocusRef {
            kind,
            ref_uuid,
            added_at: 0,
        };

        let duplicated = vec![entry(FocusKind::Item, id), entry(FocusKind::Item, id)];
        assert!(matches!(
            validate_focus_entries(&duplicated),
            Err(WorkspaceValidationError::DuplicateFocusEntry { .. })
        ));

        // Same id under a different kind is a distinct pair.
        let mixed = vec![entry(FocusKind::Item, id), entry(FocusKind::Todo, id)];
        assert!(validate_focus_entries(&mixed).is_ok());

        let overflow: Vec<_> = (0..4)
            .map(|_| entry(FocusKind::Item, Uuid::new_v4()))
            .collect();
        assert!(matches!(
            validate_focus_entries(&overflow),
            Err(WorkspaceValidationError::TooManyFocusEntries(4))
        ));
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut workspace = Workspace::new("owner-1", "ok", 0);
        workspace.title = "   ".to_string();
        assert_eq!(
            workspace.validate(),
            Err(WorkspaceValidationError::BlankTitle)
        );
    }
}
