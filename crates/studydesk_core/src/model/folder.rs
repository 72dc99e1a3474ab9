//! Folder model: optional grouping of items within a workspace.

use crate::clock::EpochMs;
use crate::model::workspace::WorkspaceId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable folder identifier.
pub type FolderId = Uuid;

/// Grouping node for items inside one workspace.
///
/// Deleting a folder never deletes its items; they become folderless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub uuid: FolderId,
    pub workspace_uuid: WorkspaceId,
    pub name: String,
    /// Listing order key; ties break by insertion order.
    pub sort_order: i64,
    pub created_at: EpochMs,
    pub updated_at: EpochMs,
}

/// Validation failures for folder records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderValidationError {
    BlankName,
}

impl Display for FolderValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "folder name must not be blank"),
        }
    }
}

impl Error for FolderValidationError {}

impl Folder {
    pub fn new(
        workspace_uuid: WorkspaceId,
        name: impl Into<String>,
        sort_order: i64,
        now_ms: EpochMs,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            workspace_uuid,
            name: name.into(),
            sort_order,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    pub fn validate(&self) -> Result<(), FolderValidationError> {
        if self.name.trim().is_empty() {
            return Err(FolderValidationError::BlankName);
        }
        Ok(())
    }
}
