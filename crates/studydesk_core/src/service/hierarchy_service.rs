//! Folder/item hierarchy use-case service.
//!
//! # Responsibility
//! - Validate workspace ownership and folder parentage above the repository.
//! - Own item mutation semantics: touch stamping, review toggles, mastery
//!   cycling, and the delete cascade entry point.
//!
//! # Invariants
//! - An item's folder, when set, must belong to the item's workspace.
//! - Every successful item mutation stamps `last_touched_at`.
//! - Enabling reviews restarts the schedule at stage 0, immediately due;
//!   disabling clears the due date but keeps the history.

use crate::clock::Clock;
use crate::model::folder::{Folder, FolderId};
use crate::model::item::{Item, ItemId, ItemStatus, ItemType};
use crate::model::workspace::WorkspaceId;
use crate::repo::hierarchy_repo::{normalize_tags, HierarchyRepository, ItemListQuery};
use crate::repo::EntityKind;
use crate::service::{map_cascade_error, not_found, CoreError, CoreResult};
use log::info;

/// Input for item creation.
#[derive(Debug, Clone)]
pub struct CreateItemRequest {
    pub workspace_uuid: WorkspaceId,
    pub folder_uuid: Option<FolderId>,
    pub kind: ItemType,
    pub title: String,
    pub url: Option<String>,
    pub note: Option<String>,
    pub tags: Vec<String>,
    pub resource_id: Option<String>,
    pub document_id: Option<String>,
}

/// Partial update over mutable item fields.
///
/// Outer `None` leaves a field untouched; the inner option distinguishes
/// "set" from "clear" for nullable fields.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub folder_uuid: Option<Option<FolderId>>,
    pub title: Option<String>,
    pub url: Option<Option<String>>,
    pub note: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub status: Option<ItemStatus>,
    pub progress_percent: Option<u8>,
    pub pinned: Option<bool>,
    pub review_enabled: Option<bool>,
    pub resource_id: Option<Option<String>>,
    pub document_id: Option<Option<String>>,
}

/// Use-case facade for the folder/item hierarchy.
pub struct HierarchyService<H: HierarchyRepository, C: Clock> {
    hierarchy: H,
    clock: C,
}

impl<H: HierarchyRepository, C: Clock> HierarchyService<H, C> {
    pub fn new(hierarchy: H, clock: C) -> Self {
        Self { hierarchy, clock }
    }

    /// Creates one folder at the end of the workspace ordering.
    pub fn create_folder(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        name: &str,
    ) -> CoreResult<Folder> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation(
                "folder name must not be blank".to_string(),
            ));
        }

        let folder =
            self.hierarchy
                .create_folder(owner, workspace_uuid, trimmed, self.clock.now_ms())?;
        info!(
            "event=folder_create module=hierarchy status=ok folder={}",
            folder.uuid
        );
        Ok(folder)
    }

    /// Lists folders in a workspace, deterministic order.
    pub fn list_folders(&self, owner: &str, workspace_uuid: WorkspaceId) -> CoreResult<Vec<Folder>> {
        Ok(self.hierarchy.list_folders(owner, workspace_uuid)?)
    }

    /// Deletes one folder; its items become folderless.
    pub fn delete_folder(&self, owner: &str, folder_uuid: FolderId) -> CoreResult<()> {
        self.hierarchy
            .delete_folder(owner, folder_uuid, self.clock.now_ms())
            .map_err(|err| map_cascade_error("folder delete", err))?;
        info!("event=folder_delete module=hierarchy status=ok folder={folder_uuid}");
        Ok(())
    }

    /// Creates one item, validating folder parentage first.
    pub fn create_item(&self, owner: &str, request: &CreateItemRequest) -> CoreResult<Item> {
        let now_ms = self.clock.now_ms();
        let mut item = Item::new(
            request.workspace_uuid,
            request.kind,
            request.title.clone(),
            now_ms,
        );
        item.url = request.url.clone();
        item.note = request.note.clone();
        item.tags = normalize_tags(&request.tags);
        item.resource_id = request.resource_id.clone();
        item.document_id = request.document_id.clone();

        if let Some(folder_uuid) = request.folder_uuid {
            self.ensure_folder_in_workspace(owner, folder_uuid, request.workspace_uuid)?;
            item.folder_uuid = Some(folder_uuid);
        }

        item.validate()
            .map_err(|err| CoreError::Validation(err.to_string()))?;
        self.hierarchy.create_item(owner, &item)?;
        info!(
            "event=item_create module=hierarchy status=ok item={}",
            item.uuid
        );
        Ok(item)
    }

    /// Loads one owned item.
    pub fn get_item(&self, owner: &str, item_uuid: ItemId) -> CoreResult<Item> {
        self.hierarchy
            .get_item(owner, item_uuid)?
            .ok_or_else(|| not_found(EntityKind::Item, item_uuid))
    }

    /// Lists items using workspace/status/folder filters.
    pub fn list_items(&self, owner: &str, query: &ItemListQuery) -> CoreResult<Vec<Item>> {
        Ok(self.hierarchy.list_items(owner, query)?)
    }

    /// Applies a partial update and returns the new state.
    ///
    /// Any successful mutation stamps `last_touched_at`.
    pub fn update_item(
        &self,
        owner: &str,
        item_uuid: ItemId,
        patch: &ItemPatch,
    ) -> CoreResult<Item> {
        let mut item = self.get_item(owner, item_uuid)?;
        let now_ms = self.clock.now_ms();

        if let Some(folder_uuid) = &patch.folder_uuid {
            if let Some(folder_uuid) = folder_uuid {
                self.ensure_folder_in_workspace(owner, *folder_uuid, item.workspace_uuid)?;
            }
            item.folder_uuid = *folder_uuid;
        }
        if let Some(title) = &patch.title {
            item.title = title.clone();
        }
        if let Some(url) = &patch.url {
            item.url = url.clone();
        }
        if let Some(note) = &patch.note {
            item.note = note.clone();
        }
        if let Some(status) = patch.status {
            item.status = status;
        }
        if let Some(progress) = patch.progress_percent {
            item.progress_percent = progress;
        }
        if let Some(pinned) = patch.pinned {
            item.pinned = pinned;
        }
        if let Some(resource_id) = &patch.resource_id {
            item.resource_id = resource_id.clone();
        }
        if let Some(document_id) = &patch.document_id {
            item.document_id = document_id.clone();
        }

        match patch.review_enabled {
            Some(true) if !item.review_enabled => {
                // Re-enabling restarts the schedule; the item is due now.
                item.review_enabled = true;
                item.review_stage = 0;
                item.next_review_at = Some(now_ms);
            }
            Some(false) if item.review_enabled => {
                // History (stage, last_reviewed_at) survives the toggle.
                item.review_enabled = false;
                item.next_review_at = None;
            }
            _ => {}
        }

        if let Some(tags) = &patch.tags {
            item.tags = normalize_tags(tags);
        }

        item.last_touched_at = now_ms;
        item.validate()
            .map_err(|err| CoreError::Validation(err.to_string()))?;
        self.hierarchy.update_item(owner, &item)?;
        if patch.tags.is_some() {
            self.hierarchy.set_item_tags(owner, item_uuid, &item.tags)?;
        }

        Ok(item)
    }

    /// Advances mastery one step around the fixed ring.
    pub fn cycle_mastery(&self, owner: &str, item_uuid: ItemId) -> CoreResult<Item> {
        let mut item = self.get_item(owner, item_uuid)?;
        item.mastery = item.mastery.next();
        item.last_touched_at = self.clock.now_ms();
        self.hierarchy.update_item(owner, &item)?;
        Ok(item)
    }

    /// Deletes one item plus its todos and any focus entries referencing
    /// them; all-or-nothing.
    pub fn delete_item(&self, owner: &str, item_uuid: ItemId) -> CoreResult<()> {
        self.hierarchy
            .delete_item(owner, item_uuid)
            .map_err(|err| map_cascade_error("item delete cascade", err))?;
        info!("event=item_delete module=hierarchy status=ok item={item_uuid}");
        Ok(())
    }

    fn ensure_folder_in_workspace(
        &self,
        owner: &str,
        folder_uuid: FolderId,
        workspace_uuid: WorkspaceId,
    ) -> CoreResult<()> {
        let folder = self
            .hierarchy
            .get_folder(owner, folder_uuid)?
            .ok_or_else(|| not_found(EntityKind::Folder, folder_uuid))?;
        if folder.workspace_uuid != workspace_uuid {
            return Err(CoreError::Validation(format!(
                "folder {folder_uuid} belongs to a different workspace"
            )));
        }
        Ok(())
    }
}
