//! Todo repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner-scoped CRUD over `todos`.
//! - Own the todo-delete cascade (focus-entry cleanup) as one immediate
//!   transaction.
//!
//! # Invariants
//! - Listing is deterministic: open todos first, then creation order.

use crate::clock::EpochMs;
use crate::model::item::ItemId;
use crate::model::todo::{Todo, TodoId, TodoKind, TodoPriority};
use crate::model::workspace::WorkspaceId;
use crate::repo::{
    bool_to_int, ensure_connection_ready, ensure_workspace_owned, int_to_bool, parse_uuid,
    EntityKind, StoreError, StoreResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction,
    TransactionBehavior};

const TODO_SELECT_SQL: &str = "SELECT
    t.todo_uuid,
    t.workspace_uuid,
    t.item_uuid,
    t.text,
    t.done,
    t.due_at,
    t.priority,
    t.kind,
    t.created_at,
    t.updated_at
FROM todos t
INNER JOIN workspaces w ON w.workspace_uuid = t.workspace_uuid";

/// Query options for listing todos.
#[derive(Debug, Clone)]
pub struct TodoListQuery {
    pub workspace_uuid: WorkspaceId,
    pub item_uuid: Option<ItemId>,
}

/// Repository interface for todo operations.
pub trait TodoRepository {
    /// Creates one todo.
    fn create_todo(&self, owner: &str, todo: &Todo) -> StoreResult<TodoId>;
    /// Loads one todo by id.
    fn get_todo(&self, owner: &str, todo_uuid: TodoId) -> StoreResult<Option<Todo>>;
    /// Lists todos using workspace/item filters.
    fn list_todos(&self, owner: &str, query: &TodoListQuery) -> StoreResult<Vec<Todo>>;
    /// Full-entity write of mutable todo columns (last write wins).
    fn update_todo(&self, owner: &str, todo: &Todo) -> StoreResult<()>;
    /// Deletes one todo plus any focus entry referencing it, atomically.
    fn delete_todo(&self, owner: &str, todo_uuid: TodoId) -> StoreResult<()>;
    /// Returns the workspace an owned item belongs to, if it exists.
    fn item_workspace(&self, owner: &str, item_uuid: ItemId) -> StoreResult<Option<WorkspaceId>>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_connection_ready(conn, &["todos", "focus_entries"])?;
        Ok(Self { conn })
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn create_todo(&self, owner: &str, todo: &Todo) -> StoreResult<TodoId> {
        todo.validate()
            .map_err(|err| StoreError::Validation(err.to_string()))?;
        ensure_workspace_owned(self.conn, owner, todo.workspace_uuid)?;

        insert_todo_row(self.conn, todo)?;
        Ok(todo.uuid)
    }

    fn get_todo(&self, owner: &str, todo_uuid: TodoId) -> StoreResult<Option<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL}
             WHERE t.todo_uuid = ?1
               AND w.owner_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![todo_uuid.to_string(), owner])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }
        Ok(None)
    }

    fn list_todos(&self, owner: &str, query: &TodoListQuery) -> StoreResult<Vec<Todo>> {
        ensure_workspace_owned(self.conn, owner, query.workspace_uuid)?;

        let mut sql = format!(
            "{TODO_SELECT_SQL}
             WHERE t.workspace_uuid = ?
               AND w.owner_id = ?"
        );
        let mut bind_values: Vec<Value> = vec![
            Value::Text(query.workspace_uuid.to_string()),
            Value::Text(owner.to_string()),
        ];

        if let Some(item_uuid) = query.item_uuid {
            sql.push_str(" AND t.item_uuid = ?");
            bind_values.push(Value::Text(item_uuid.to_string()));
        }

        sql.push_str(" ORDER BY t.done ASC, t.created_at ASC, t.todo_uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }
        Ok(todos)
    }

    fn update_todo(&self, owner: &str, todo: &Todo) -> StoreResult<()> {
        todo.validate()
            .map_err(|err| StoreError::Validation(err.to_string()))?;

        let changed = self.conn.execute(
            "UPDATE todos
             SET
                item_uuid = ?1,
                text = ?2,
                done = ?3,
                due_at = ?4,
                priority = ?5,
                kind = ?6,
                updated_at = ?7
             WHERE todo_uuid = ?8
               AND workspace_uuid IN (
                 SELECT workspace_uuid FROM workspaces WHERE owner_id = ?9
               );",
            params![
                todo.item_uuid.map(|value| value.to_string()),
                todo.text.as_str(),
                bool_to_int(todo.done),
                todo.due_at,
                priority_to_db(todo.priority),
                todo_kind_to_db(todo.kind),
                todo.updated_at,
                todo.uuid.to_string(),
                owner,
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: EntityKind::Todo,
                id: todo.uuid.to_string(),
            });
        }

        Ok(())
    }

    fn delete_todo(&self, owner: &str, todo_uuid: TodoId) -> StoreResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let exists: i64 = tx.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM todos t
                INNER JOIN workspaces w ON w.workspace_uuid = t.workspace_uuid
                WHERE t.todo_uuid = ?1
                  AND w.owner_id = ?2
            );",
            params![todo_uuid.to_string(), owner],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(StoreError::NotFound {
                entity: EntityKind::Todo,
                id: todo_uuid.to_string(),
            });
        }

        tx.execute(
            "DELETE FROM focus_entries
             WHERE kind = 'todo'
               AND ref_uuid = ?1;",
            [todo_uuid.to_string()],
        )?;
        tx.execute(
            "DELETE FROM todos WHERE todo_uuid = ?1;",
            [todo_uuid.to_string()],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn item_workspace(&self, owner: &str, item_uuid: ItemId) -> StoreResult<Option<WorkspaceId>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT i.workspace_uuid
                 FROM items i
                 INNER JOIN workspaces w ON w.workspace_uuid = i.workspace_uuid
                 WHERE i.item_uuid = ?1
                   AND w.owner_id = ?2;",
                params![item_uuid.to_string(), owner],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            None => Ok(None),
            Some(text) => Ok(Some(parse_uuid(&text, "items.workspace_uuid")?)),
        }
    }
}

pub(crate) fn insert_todo_row(conn: &Connection, todo: &Todo) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO todos (
            todo_uuid,
            workspace_uuid,
            item_uuid,
            text,
            done,
            due_at,
            priority,
            kind,
            created_at,
            updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
        params![
            todo.uuid.to_string(),
            todo.workspace_uuid.to_string(),
            todo.item_uuid.map(|value| value.to_string()),
            todo.text.as_str(),
            bool_to_int(todo.done),
            todo.due_at,
            priority_to_db(todo.priority),
            todo_kind_to_db(todo.kind),
            todo.created_at,
            todo.updated_at,
        ],
    )?;
    Ok(())
}

fn parse_todo_row(row: &Row<'_>) -> StoreResult<Todo> {
    let uuid_text: String = row.get("todo_uuid")?;
    let workspace_text: String = row.get("workspace_uuid")?;
    let item_uuid = row
        .get::<_, Option<String>>("item_uuid")?
        .map(|value| parse_uuid(&value, "todos.item_uuid"))
        .transpose()?;

    let priority_text: String = row.get("priority")?;
    let priority = parse_priority(&priority_text).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid priority `{priority_text}` in todos.priority"
        ))
    })?;
    let kind_text: String = row.get("kind")?;
    let kind = parse_todo_kind(&kind_text).ok_or_else(|| {
        StoreError::InvalidData(format!("invalid todo kind `{kind_text}` in todos.kind"))
    })?;

    Ok(Todo {
        uuid: parse_uuid(&uuid_text, "todos.todo_uuid")?,
        workspace_uuid: parse_uuid(&workspace_text, "todos.workspace_uuid")?,
        item_uuid,
        text: row.get("text")?,
        done: int_to_bool(row.get("done")?, "todos.done")?,
        due_at: row.get("due_at")?,
        priority,
        kind,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub(crate) fn priority_to_db(priority: TodoPriority) -> &'static str {
    match priority {
        TodoPriority::Low => "low",
        TodoPriority::Normal => "normal",
        TodoPriority::High => "high",
    }
}

pub(crate) fn parse_priority(value: &str) -> Option<TodoPriority> {
    match value {
        "low" => Some(TodoPriority::Low),
        "normal" => Some(TodoPriority::Normal),
        "high" => Some(TodoPriority::High),
        _ => None,
    }
}

pub(crate) fn todo_kind_to_db(kind: TodoKind) -> &'static str {
    match kind {
        TodoKind::Task => "task",
        TodoKind::Flashcards => "flashcards",
        TodoKind::Practice => "practice",
        TodoKind::Project => "project",
        TodoKind::Quiz => "quiz",
    }
}

pub(crate) fn parse_todo_kind(value: &str) -> Option<TodoKind> {
    match value {
        "task" => Some(TodoKind::Task),
        "flashcards" => Some(TodoKind::Flashcards),
        "practice" => Some(TodoKind::Practice),
        "project" => Some(TodoKind::Project),
        "quiz" => Some(TodoKind::Quiz),
        _ => None,
    }
}
