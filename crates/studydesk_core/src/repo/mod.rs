//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Every query is scoped to one owner identity; an id owned by someone
//!   else is indistinguishable from a nonexistent id.
//! - Write paths validate records before SQL mutations.
//! - Multi-entity cascades run inside a single immediate transaction.

use crate::db::DbError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod hierarchy_repo;
pub mod todo_repo;
pub mod workspace_repo;

pub type StoreResult<T> = Result<T, StoreError>;

/// Entity kinds referenced by store errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Workspace,
    Folder,
    Item,
    Todo,
    Template,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Workspace => "workspace",
            Self::Folder => "folder",
            Self::Item => "item",
            Self::Todo => "todo",
            Self::Template => "template",
        };
        write!(f, "{name}")
    }
}

/// Cardinality caps enforced by the stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    WorkspacesPerOwner,
    FocusEntries,
}

impl Display for LimitKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::WorkspacesPerOwner => "workspaces per owner",
            Self::FocusEntries => "focus entries",
        };
        write!(f, "{name}")
    }
}

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum StoreError {
    /// Record-local validation failed before the write.
    Validation(String),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Id does not resolve to an entity owned by the caller.
    NotFound { entity: EntityKind, id: String },
    /// A hard cardinality cap was hit; nothing was written.
    LimitExceeded { limit: LimitKind, max: u32 },
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "{message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::LimitExceeded { limit, max } => {
                write!(f, "limit exceeded: at most {max} {limit}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> StoreResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(value: i64, column: &'static str) -> StoreResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(StoreError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

/// Returns whether `workspace_uuid` names a workspace owned by `owner`.
pub(crate) fn workspace_owned(
    conn: &Connection,
    owner: &str,
    workspace_uuid: &str,
) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM workspaces
            WHERE workspace_uuid = ?1
              AND owner_id = ?2
        );",
        [workspace_uuid, owner],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn ensure_workspace_owned(
    conn: &Connection,
    owner: &str,
    workspace_uuid: Uuid,
) -> StoreResult<()> {
    if workspace_owned(conn, owner, workspace_uuid.to_string().as_str())? {
        Ok(())
    } else {
        Err(StoreError::NotFound {
            entity: EntityKind::Workspace,
            id: workspace_uuid.to_string(),
        })
    }
}

pub(crate) fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Fails unless the connection is migrated to the latest schema and the
/// required tables are present.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    required_tables: &[&'static str],
) -> StoreResult<()> {
    let expected = crate::db::migrations::latest_version();
    let actual: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual != expected {
        return Err(StoreError::InvalidData(format!(
            "connection schema version {actual} does not match expected {expected}"
        )));
    }

    for table in required_tables {
        if !table_exists(conn, table)? {
            return Err(StoreError::InvalidData(format!(
                "required table `{table}` is missing"
            )));
        }
    }

    Ok(())
}
