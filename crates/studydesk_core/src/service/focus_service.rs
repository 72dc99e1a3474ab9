//! Daily focus ("next 3") use-case service.
//!
//! # Responsibility
//! - Maintain each workspace's bounded daily focus list.
//! - Reset the list lazily once per UTC calendar day; no background job.
//!
//! # Invariants
//! - The list never exceeds [`MAX_FOCUS_ENTRIES`]; overflow is rejected,
//!   never truncated.
//! - Entries are unique by `(kind, ref_uuid)` and must resolve to an owned
//!   item/todo in the same workspace at write time.

use crate::clock::{utc_date_key, Clock};
use crate::model::workspace::{FocusKind, FocusRef, WorkspaceId, MAX_FOCUS_ENTRIES};
use crate::repo::workspace_repo::WorkspaceRepository;
use crate::repo::{EntityKind, LimitKind};
use crate::service::{not_found, CoreError, CoreResult};
use log::info;
use uuid::Uuid;

/// Use-case facade for the focus manager.
pub struct FocusService<W: WorkspaceRepository, C: Clock> {
    workspaces: W,
    clock: C,
}

impl<W: WorkspaceRepository, C: Clock> FocusService<W, C> {
    pub fn new(workspaces: W, clock: C) -> Self {
        Self { workspaces, clock }
    }

    /// Returns today's focus list.
    ///
    /// A list built for an earlier UTC day reads as empty; the stored rows
    /// are cleared on the next write, not here.
    pub fn focus_list(&self, owner: &str, workspace_uuid: WorkspaceId) -> CoreResult<Vec<FocusRef>> {
        let workspace = self
            .workspaces
            .get_workspace(owner, workspace_uuid)?
            .ok_or_else(|| not_found(EntityKind::Workspace, workspace_uuid))?;

        let today = utc_date_key(self.clock.now_ms());
        if workspace.focus_date.as_deref() == Some(today.as_str()) {
            Ok(workspace.focus)
        } else {
            Ok(Vec::new())
        }
    }

    /// Appends one entry to today's focus list.
    pub fn add_focus(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        kind: FocusKind,
        ref_uuid: Uuid,
    ) -> CoreResult<Vec<FocusRef>> {
        let now_ms = self.clock.now_ms();
        let today = utc_date_key(now_ms);

        let workspace = self
            .workspaces
            .get_workspace(owner, workspace_uuid)?
            .ok_or_else(|| not_found(EntityKind::Workspace, workspace_uuid))?;

        // Daily reset happens before the add is evaluated.
        let current = if workspace.focus_date.as_deref() == Some(today.as_str()) {
            workspace.focus
        } else {
            self.workspaces
                .clear_focus(owner, workspace_uuid, &today, now_ms)?;
            Vec::new()
        };

        if !self
            .workspaces
            .resolve_focus_ref(owner, workspace_uuid, kind, ref_uuid)?
        {
            return Err(not_found(focus_entity(kind), ref_uuid));
        }
        if current
            .iter()
            .any(|entry| entry.kind == kind && entry.ref_uuid == ref_uuid)
        {
            return Err(CoreError::Validation(format!(
                "{ref_uuid} is already in today's focus list"
            )));
        }
        if current.len() >= MAX_FOCUS_ENTRIES {
            return Err(CoreError::LimitExceeded {
                limit: LimitKind::FocusEntries,
                max: MAX_FOCUS_ENTRIES as u32,
            });
        }

        let entry = FocusRef {
            kind,
            ref_uuid,
            added_at: now_ms,
        };
        self.workspaces
            .append_focus(owner, workspace_uuid, &entry, now_ms)?;
        info!(
            "event=focus_add module=focus status=ok workspace={workspace_uuid} size={}",
            current.len() + 1
        );

        let mut entries = current;
        entries.push(entry);
        Ok(entries)
    }

    /// Removes a matching entry; absence is not an error.
    pub fn remove_focus(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        kind: FocusKind,
        ref_uuid: Uuid,
    ) -> CoreResult<()> {
        let now_ms = self.clock.now_ms();
        let removed =
            self.workspaces
                .remove_focus(owner, workspace_uuid, kind, ref_uuid, now_ms)?;
        if removed {
            info!("event=focus_remove module=focus status=ok workspace={workspace_uuid}");
        }
        Ok(())
    }
}

fn focus_entity(kind: FocusKind) -> EntityKind {
    match kind {
        FocusKind::Item => EntityKind::Item,
        FocusKind::Todo => EntityKind::Todo,
    }
}
