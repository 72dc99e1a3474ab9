//! Todo use-case service.
//!
//! # Responsibility
//! - Validate workspace ownership and item parentage for todos.
//! - Fire the gamification event on the done false→true transition.
//!
//! # Invariants
//! - A todo's item, when set, must belong to the todo's workspace.
//! - Re-marking a done todo is a no-op, not an error, and awards nothing.

use crate::clock::{utc_date_key, Clock, EpochMs};
use crate::model::item::ItemId;
use crate::model::todo::{Todo, TodoId, TodoKind, TodoPriority};
use crate::model::workspace::WorkspaceId;
use crate::repo::todo_repo::{TodoListQuery, TodoRepository};
use crate::repo::workspace_repo::WorkspaceRepository;
use crate::repo::EntityKind;
use crate::service::gamification::{self, TODO_COMPLETED_XP};
use crate::service::{map_cascade_error, not_found, CoreError, CoreResult};
use log::info;

/// Input for todo creation.
#[derive(Debug, Clone)]
pub struct CreateTodoRequest {
    pub workspace_uuid: WorkspaceId,
    pub item_uuid: Option<ItemId>,
    pub text: String,
    pub due_at: Option<EpochMs>,
    pub priority: Option<TodoPriority>,
    pub kind: Option<TodoKind>,
}

/// Partial update over mutable todo fields.
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub item_uuid: Option<Option<ItemId>>,
    pub text: Option<String>,
    pub done: Option<bool>,
    pub due_at: Option<Option<EpochMs>>,
    pub priority: Option<TodoPriority>,
    pub kind: Option<TodoKind>,
}

/// Use-case facade for the todo store.
pub struct TodoService<T: TodoRepository, W: WorkspaceRepository, C: Clock> {
    todos: T,
    workspaces: W,
    clock: C,
}

impl<T: TodoRepository, W: WorkspaceRepository, C: Clock> TodoService<T, W, C> {
    pub fn new(todos: T, workspaces: W, clock: C) -> Self {
        Self {
            todos,
            workspaces,
            clock,
        }
    }

    /// Creates one todo, validating item parentage first.
    pub fn create_todo(&self, owner: &str, request: &CreateTodoRequest) -> CoreResult<Todo> {
        let now_ms = self.clock.now_ms();
        let mut todo = Todo::new(request.workspace_uuid, request.text.clone(), now_ms);
        todo.due_at = request.due_at;
        if let Some(priority) = request.priority {
            todo.priority = priority;
        }
        if let Some(kind) = request.kind {
            todo.kind = kind;
        }

        if let Some(item_uuid) = request.item_uuid {
            self.ensure_item_in_workspace(owner, item_uuid, request.workspace_uuid)?;
            todo.item_uuid = Some(item_uuid);
        }

        todo.validate()
            .map_err(|err| CoreError::Validation(err.to_string()))?;
        self.todos.create_todo(owner, &todo)?;
        info!("event=todo_create module=todo status=ok todo={}", todo.uuid);
        Ok(todo)
    }

    /// Loads one owned todo.
    pub fn get_todo(&self, owner: &str, todo_uuid: TodoId) -> CoreResult<Todo> {
        self.todos
            .get_todo(owner, todo_uuid)?
            .ok_or_else(|| not_found(EntityKind::Todo, todo_uuid))
    }

    /// Lists todos using workspace/item filters.
    pub fn list_todos(&self, owner: &str, query: &TodoListQuery) -> CoreResult<Vec<Todo>> {
        Ok(self.todos.list_todos(owner, query)?)
    }

    /// Applies a partial update and returns the new state.
    ///
    /// The done false→true transition awards XP and rolls the streak; any
    /// other done change is silent.
    pub fn update_todo(
        &self,
        owner: &str,
        todo_uuid: TodoId,
        patch: &TodoPatch,
    ) -> CoreResult<Todo> {
        let mut todo = self.get_todo(owner, todo_uuid)?;
        let was_done = todo.done;
        let now_ms = self.clock.now_ms();

        if let Some(item_uuid) = &patch.item_uuid {
            if let Some(item_uuid) = item_uuid {
                self.ensure_item_in_workspace(owner, *item_uuid, todo.workspace_uuid)?;
            }
            todo.item_uuid = *item_uuid;
        }
        if let Some(text) = &patch.text {
            todo.text = text.clone();
        }
        if let Some(done) = patch.done {
            todo.done = done;
        }
        if let Some(due_at) = patch.due_at {
            todo.due_at = due_at;
        }
        if let Some(priority) = patch.priority {
            todo.priority = priority;
        }
        if let Some(kind) = patch.kind {
            todo.kind = kind;
        }

        todo.updated_at = now_ms;
        todo.validate()
            .map_err(|err| CoreError::Validation(err.to_string()))?;
        self.todos.update_todo(owner, &todo)?;

        if !was_done && todo.done {
            let today = utc_date_key(now_ms);
            gamification::award(
                &self.workspaces,
                owner,
                todo.workspace_uuid,
                TODO_COMPLETED_XP,
                &today,
                now_ms,
            )?;
            info!("event=todo_done module=todo status=ok todo={todo_uuid}");
        }

        Ok(todo)
    }

    /// Deletes one todo plus any focus entry referencing it; all-or-nothing.
    pub fn delete_todo(&self, owner: &str, todo_uuid: TodoId) -> CoreResult<()> {
        self.todos
            .delete_todo(owner, todo_uuid)
            .map_err(|err| map_cascade_error("todo delete cascade", err))?;
        info!("event=todo_delete module=todo status=ok todo={todo_uuid}");
        Ok(())
    }

    fn ensure_item_in_workspace(
        &self,
        owner: &str,
        item_uuid: ItemId,
        workspace_uuid: WorkspaceId,
    ) -> CoreResult<()> {
        let item_workspace = self
            .todos
            .item_workspace(owner, item_uuid)?
            .ok_or_else(|| not_found(EntityKind::Item, item_uuid))?;
        if item_workspace != workspace_uuid {
            return Err(CoreError::Validation(format!(
                "item {item_uuid} belongs to a different workspace"
            )));
        }
        Ok(())
    }
}
