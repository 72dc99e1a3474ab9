//! Core domain logic for StudyDesk.
//! This crate is the single source of truth for business invariants.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod template;

pub use clock::{Clock, EpochMs, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::folder::{Folder, FolderId};
pub use model::item::{Item, ItemId, ItemStatus, ItemType, ItemValidationError, Mastery};
pub use model::todo::{Todo, TodoId, TodoKind, TodoPriority, TodoValidationError};
pub use model::workspace::{
    derive_level, FocusKind, FocusRef, OwnerId, Workspace, WorkspaceId, WorkspaceMode,
    WorkspaceValidationError, MAX_FOCUS_ENTRIES, MAX_WORKSPACES_PER_OWNER,
};
pub use repo::hierarchy_repo::{
    HierarchyRepository, ItemListQuery, ReviewUpdate, SqliteHierarchyRepository,
};
pub use repo::todo_repo::{SqliteTodoRepository, TodoListQuery, TodoRepository};
pub use repo::workspace_repo::{SqliteWorkspaceRepository, WorkspaceBundle, WorkspaceRepository};
pub use repo::{EntityKind, LimitKind, StoreError, StoreResult};
pub use service::focus_service::FocusService;
pub use service::hierarchy_service::{CreateItemRequest, HierarchyService, ItemPatch};
pub use service::review_service::{
    review_interval_days, ReviewService, BASE_INTERVAL_DAYS, MAX_INTERVAL_DAYS,
};
pub use service::template_service::TemplateService;
pub use service::todo_service::{CreateTodoRequest, TodoPatch, TodoService};
pub use service::workspace_service::{CreateWorkspaceRequest, WorkspacePatch, WorkspaceService};
pub use service::{CoreError, CoreResult};
pub use template::catalog::{
    BuiltinTemplateCatalog, TemplateCatalog, TemplateDefinition, TemplateSummary,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
