//! Workspace use-case service.
//!
//! # Responsibility
//! - Provide create/list/update entry points for the workspace aggregate.
//! - Auto-seed a starter workspace on first access.
//! - Validate wholesale focus-list replacement.
//!
//! # Invariants
//! - A focus patch that exceeds the cap or duplicates a reference is
//!   rejected, never clipped.
//! - Level is derived from XP; updates never write it.

use crate::clock::{utc_date_key, Clock};
use crate::model::workspace::{
    validate_focus_entries, FocusKind, FocusRef, Workspace, WorkspaceId, WorkspaceMode,
};
use crate::repo::workspace_repo::WorkspaceRepository;
use crate::repo::EntityKind;
use crate::service::{not_found, CoreResult};
use log::info;
use uuid::Uuid;

const SEED_WORKSPACE_TITLE: &str = "Getting Started";

/// Input for workspace creation.
#[derive(Debug, Clone)]
pub struct CreateWorkspaceRequest {
    pub title: String,
    pub goal: Option<String>,
    pub emoji: Option<String>,
}

/// Partial update over mutable workspace fields.
///
/// Outer `None` leaves a field untouched; for clearable fields the inner
/// option distinguishes "set" from "clear". A `focus` patch replaces the
/// whole list.
#[derive(Debug, Clone, Default)]
pub struct WorkspacePatch {
    pub title: Option<String>,
    pub goal: Option<Option<String>>,
    pub emoji: Option<Option<String>>,
    pub mode: Option<WorkspaceMode>,
    pub focus: Option<Vec<(FocusKind, Uuid)>>,
}

/// Use-case facade for the workspace store.
pub struct WorkspaceService<W: WorkspaceRepository, C: Clock> {
    workspaces: W,
    clock: C,
}

impl<W: WorkspaceRepository, C: Clock> WorkspaceService<W, C> {
    pub fn new(workspaces: W, clock: C) -> Self {
        Self { workspaces, clock }
    }

    /// Creates one workspace with fresh-progression defaults.
    ///
    /// Fails with `LimitExceeded` once the owner holds the maximum number
    /// of workspaces.
    pub fn create_workspace(
        &self,
        owner: &str,
        request: &CreateWorkspaceRequest,
    ) -> CoreResult<Workspace> {
        let now_ms = self.clock.now_ms();
        let mut workspace = Workspace::new(owner, request.title.clone(), now_ms);
        workspace.goal = request.goal.clone();
        workspace.emoji = request.emoji.clone();

        self.workspaces.create_workspace(&workspace)?;
        info!(
            "event=workspace_create module=workspace status=ok workspace={}",
            workspace.uuid
        );
        Ok(workspace)
    }

    /// Lists the caller's workspaces, seeding a starter workspace when the
    /// owner has none yet.
    pub fn list_workspaces(&self, owner: &str) -> CoreResult<Vec<Workspace>> {
        if self.workspaces.count_workspaces(owner)? == 0 {
            let seeded = Workspace::new(owner, SEED_WORKSPACE_TITLE, self.clock.now_ms());
            self.workspaces.create_workspace(&seeded)?;
            info!(
                "event=workspace_seed module=workspace status=ok workspace={}",
                seeded.uuid
            );
        }
        Ok(self.workspaces.list_workspaces(owner)?)
    }

    /// Loads one owned workspace.
    pub fn get_workspace(&self, owner: &str, workspace_uuid: WorkspaceId) -> CoreResult<Workspace> {
        self.workspaces
            .get_workspace(owner, workspace_uuid)?
            .ok_or_else(|| not_found(EntityKind::Workspace, workspace_uuid))
    }

    /// Applies a partial update and returns the new state.
    pub fn update_workspace(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        patch: &WorkspacePatch,
    ) -> CoreResult<Workspace> {
        let mut workspace = self.get_workspace(owner, workspace_uuid)?;
        let now_ms = self.clock.now_ms();

        // Validate the focus replacement before touching the row, so a bad
        // patch applies nothing at all.
        let focus_entries = match &patch.focus {
            Some(focus) => {
                Some(self.validated_focus_entries(owner, workspace_uuid, focus, now_ms)?)
            }
            None => None,
        };

        if let Some(title) = &patch.title {
            workspace.title = title.clone();
        }
        if let Some(goal) = &patch.goal {
            workspace.goal = goal.clone();
        }
        if let Some(emoji) = &patch.emoji {
            workspace.emoji = emoji.clone();
        }
        if let Some(mode) = patch.mode {
            workspace.mode = mode;
        }
        workspace.updated_at = now_ms;
        self.workspaces.update_workspace(&workspace)?;

        if let Some(entries) = focus_entries {
            let today = utc_date_key(now_ms);
            self.workspaces
                .replace_focus(owner, workspace_uuid, &entries, &today, now_ms)?;
        }

        self.get_workspace(owner, workspace_uuid)
    }

    /// Validates a wholesale focus replacement: cap, uniqueness, and
    /// reference resolution, rejecting instead of truncating.
    fn validated_focus_entries(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        focus: &[(FocusKind, Uuid)],
        now_ms: i64,
    ) -> CoreResult<Vec<FocusRef>> {
        let entries: Vec<FocusRef> = focus
            .iter()
            .map(|(kind, ref_uuid)| FocusRef {
                kind: *kind,
                ref_uuid: *ref_uuid,
                added_at: now_ms,
            })
            .collect();

        validate_focus_entries(&entries)
            .map_err(|err| crate::service::CoreError::Validation(err.to_string()))?;

        for entry in &entries {
            let resolves =
                self.workspaces
                    .resolve_focus_ref(owner, workspace_uuid, entry.kind, entry.ref_uuid)?;
            if !resolves {
                return Err(crate::service::CoreError::Validation(format!(
                    "focus reference {} does not resolve in this workspace",
                    entry.ref_uuid
                )));
            }
        }

        Ok(entries)
    }
}
