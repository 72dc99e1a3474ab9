//! Todo model: a task, optionally tied to one item.

use crate::clock::EpochMs;
use crate::model::item::ItemId;
use crate::model::workspace::WorkspaceId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable todo identifier.
pub type TodoId = Uuid;

/// Todo urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoPriority {
    Low,
    Normal,
    High,
}

/// What kind of work a todo represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoKind {
    Task,
    Flashcards,
    Practice,
    Project,
    Quiz,
}

/// A task scoped to one workspace, optionally attached to one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub uuid: TodoId,
    pub workspace_uuid: WorkspaceId,
    /// Optional parent item; must belong to the same workspace.
    pub item_uuid: Option<ItemId>,
    pub text: String,
    pub done: bool,
    pub due_at: Option<EpochMs>,
    pub priority: TodoPriority,
    pub kind: TodoKind,
    pub created_at: EpochMs,
    pub updated_at: EpochMs,
}

/// Validation failures for todo records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    BlankText,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankText => write!(f, "todo text must not be blank"),
        }
    }
}

impl Error for TodoValidationError {}

impl Todo {
    /// Creates an open `task`-kind todo with `normal` priority.
    pub fn new(workspace_uuid: WorkspaceId, text: impl Into<String>, now_ms: EpochMs) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            workspace_uuid,
            item_uuid: None,
            text: text.into(),
            done: false,
            due_at: None,
            priority: TodoPriority::Normal,
            kind: TodoKind::Task,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.text.trim().is_empty() {
            return Err(TodoValidationError::BlankText);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Todo, TodoKind, TodoPriority, TodoValidationError};
    use uuid::Uuid;

    #[test]
    fn new_todo_is_open_with_normal_priority() {
        let todo = Todo::new(Uuid::new_v4(), "read chapter 4", 7);
        assert!(!todo.done);
        assert_eq!(todo.priority, TodoPriority::Normal);
        assert_eq!(todo.kind, TodoKind::Task);
        assert!(todo.validate().is_ok());
    }

    #[test]
    fn blank_text_is_rejected() {
        let todo = Todo::new(Uuid::new_v4(), "  ", 0);
        assert_eq!(todo.validate(), Err(TodoValidationError::BlankText));
    }
}
