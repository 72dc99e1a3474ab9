//! Template instantiation service.
//!
//! # Responsibility
//! - Expand a curated template definition into a concrete workspace bundle.
//! - Hand the whole bundle to the store as one all-or-nothing transaction.
//!
//! # Invariants
//! - A failed instantiation leaves no partial workspace, folder, item, or
//!   todo behind.
//! - Seed items with reviews enabled start at stage 0, immediately due.

use crate::clock::Clock;
use crate::model::folder::Folder;
use crate::model::item::Item;
use crate::model::todo::Todo;
use crate::model::workspace::Workspace;
use crate::repo::hierarchy_repo::normalize_tags;
use crate::repo::workspace_repo::{WorkspaceBundle, WorkspaceRepository};
use crate::repo::EntityKind;
use crate::service::{map_cascade_error, not_found, CoreResult};
use crate::template::catalog::{TemplateCatalog, TemplateDefinition, TemplateSummary};
use log::info;
use uuid::Uuid;

/// Use-case facade for template instantiation.
pub struct TemplateService<W: WorkspaceRepository, T: TemplateCatalog, C: Clock> {
    workspaces: W,
    catalog: T,
    clock: C,
}

impl<W: WorkspaceRepository, T: TemplateCatalog, C: Clock> TemplateService<W, T, C> {
    pub fn new(workspaces: W, catalog: T, clock: C) -> Self {
        Self {
            workspaces,
            catalog,
            clock,
        }
    }

    /// Lists available templates.
    pub fn list_templates(&self) -> Vec<TemplateSummary> {
        self.catalog.list_templates()
    }

    /// Creates a new workspace plus all seed content from one template,
    /// atomically.
    pub fn instantiate(&self, owner: &str, template_id: &str) -> CoreResult<Workspace> {
        let definition = self
            .catalog
            .resolve(template_id)
            .ok_or_else(|| not_found(EntityKind::Template, template_id))?;

        let bundle = expand_definition(owner, definition, self.clock.now_ms());
        self.workspaces
            .instantiate_bundle(&bundle)
            .map_err(|err| map_cascade_error("template instantiate", err))?;

        info!(
            "event=template_instantiate module=template status=ok template={template_id} workspace={} folders={} items={} todos={}",
            bundle.workspace.uuid,
            bundle.folders.len(),
            bundle.items.len(),
            bundle.todos.len()
        );
        Ok(bundle.workspace)
    }
}

/// Materializes a definition into concrete records with fresh ids.
fn expand_definition(owner: &str, definition: &TemplateDefinition, now_ms: i64) -> WorkspaceBundle {
    let mut workspace = Workspace::new(owner, definition.title.clone(), now_ms);
    workspace.goal = definition.goal.clone();
    workspace.emoji = definition.emoji.clone();
    workspace.mode = definition.mode;

    let mut folders = Vec::new();
    let mut items = Vec::new();
    let mut todos = Vec::new();

    for (index, seed_folder) in definition.folders.iter().enumerate() {
        let folder = Folder {
            uuid: Uuid::new_v4(),
            workspace_uuid: workspace.uuid,
            name: seed_folder.name.clone(),
            sort_order: index as i64,
            created_at: now_ms,
            updated_at: now_ms,
        };

        for seed_item in &seed_folder.items {
            let mut item = Item::new(workspace.uuid, seed_item.kind, seed_item.title.clone(), now_ms);
            item.folder_uuid = Some(folder.uuid);
            item.url = seed_item.url.clone();
            item.note = seed_item.note.clone();
            item.tags = normalize_tags(&seed_item.tags);
            if seed_item.review_enabled {
                item.review_enabled = true;
                item.next_review_at = Some(now_ms);
            }

            for seed_todo in &seed_item.todos {
                let mut todo = Todo::new(workspace.uuid, seed_todo.text.clone(), now_ms);
                todo.item_uuid = Some(item.uuid);
                todo.kind = seed_todo.kind;
                todo.priority = seed_todo.priority;
                todos.push(todo);
            }

            items.push(item);
        }

        folders.push(folder);
    }

    WorkspaceBundle {
        workspace,
        folders,
        items,
        todos,
    }
}
