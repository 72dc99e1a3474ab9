//! Workspace repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner-scoped CRUD over `workspaces` and `focus_entries`.
//! - Enforce the per-owner workspace cap inside the insert transaction.
//! - Persist template bundles (workspace + folders + items + todos) as one
//!   all-or-nothing transaction.
//!
//! # Invariants
//! - Focus entries are returned in `position ASC` order.
//! - The workspace cap is counted and checked inside the same transaction
//!   that inserts, so concurrent inserts cannot overshoot it.

use crate::clock::EpochMs;
use crate::model::workspace::{
    FocusKind, FocusRef, Workspace, WorkspaceId, WorkspaceMode, MAX_WORKSPACES_PER_OWNER,
};
use crate::model::{folder::Folder, item::Item, todo::Todo};
use crate::repo::{
    ensure_connection_ready, ensure_workspace_owned, parse_uuid, EntityKind, LimitKind, StoreError,
    StoreResult,
};
use crate::repo::{hierarchy_repo, todo_repo};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const WORKSPACE_SELECT_SQL: &str = "SELECT
    workspace_uuid,
    owner_id,
    title,
    goal,
    emoji,
    mode,
    xp,
    streak_count,
    last_activity_date,
    focus_date,
    created_at,
    updated_at
FROM workspaces";

/// Everything created by one template instantiation.
#[derive(Debug, Clone)]
pub struct WorkspaceBundle {
    pub workspace: Workspace,
    pub folders: Vec<Folder>,
    pub items: Vec<Item>,
    pub todos: Vec<Todo>,
}

/// Repository interface for workspace aggregate operations.
pub trait WorkspaceRepository {
    /// Creates one workspace; fails with `LimitExceeded` at the owner cap.
    fn create_workspace(&self, workspace: &Workspace) -> StoreResult<WorkspaceId>;
    /// Loads one workspace with its focus entries.
    fn get_workspace(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
    ) -> StoreResult<Option<Workspace>>;
    /// Lists the caller's workspaces in creation order.
    fn list_workspaces(&self, owner: &str) -> StoreResult<Vec<Workspace>>;
    /// Counts the caller's workspaces.
    fn count_workspaces(&self, owner: &str) -> StoreResult<u32>;
    /// Full-entity write of mutable workspace columns (last write wins).
    fn update_workspace(&self, workspace: &Workspace) -> StoreResult<()>;
    /// Replaces the whole focus list and stamps the date it was built for.
    fn replace_focus(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        entries: &[FocusRef],
        focus_date: &str,
        now_ms: EpochMs,
    ) -> StoreResult<()>;
    /// Drops all focus entries and stamps a new focus date (daily reset).
    fn clear_focus(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        focus_date: &str,
        now_ms: EpochMs,
    ) -> StoreResult<()>;
    /// Appends one focus entry after the current last position.
    fn append_focus(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        entry: &FocusRef,
        now_ms: EpochMs,
    ) -> StoreResult<()>;
    /// Removes a matching focus entry; returns whether one was removed.
    fn remove_focus(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        kind: FocusKind,
        ref_uuid: Uuid,
        now_ms: EpochMs,
    ) -> StoreResult<bool>;
    /// Returns whether a focus reference resolves to an owned item/todo in
    /// the given workspace.
    fn resolve_focus_ref(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        kind: FocusKind,
        ref_uuid: Uuid,
    ) -> StoreResult<bool>;
    /// Adds XP and replaces streak state after a qualifying activity.
    fn apply_activity(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        xp_delta: i64,
        streak_count: i64,
        activity_date: &str,
        now_ms: EpochMs,
    ) -> StoreResult<()>;
    /// Creates a whole template bundle atomically, cap included.
    fn instantiate_bundle(&self, bundle: &WorkspaceBundle) -> StoreResult<WorkspaceId>;
}

/// SQLite-backed workspace repository.
pub struct SqliteWorkspaceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWorkspaceRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_connection_ready(conn, &["workspaces", "focus_entries", "items", "todos"])?;
        Ok(Self { conn })
    }
}

impl WorkspaceRepository for SqliteWorkspaceRepository<'_> {
    fn create_workspace(&self, workspace: &Workspace) -> StoreResult<WorkspaceId> {
        workspace
            .validate()
            .map_err(|err| StoreError::Validation(err.to_string()))?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_below_workspace_cap(&tx, workspace.owner_id.as_str())?;
        insert_workspace_row(&tx, workspace)?;
        tx.commit()?;

        Ok(workspace.uuid)
    }

    fn get_workspace(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
    ) -> StoreResult<Option<Workspace>> {
        let mut stmt = self.conn.prepare(&format!(
            "{WORKSPACE_SELECT_SQL}
             WHERE workspace_uuid = ?1
               AND owner_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![workspace_uuid.to_string(), owner])?;
        if let Some(row) = rows.next()? {
            let mut workspace = parse_workspace_row(row)?;
            workspace.focus = load_focus_entries(self.conn, workspace.uuid)?;
            return Ok(Some(workspace));
        }

        Ok(None)
    }

    fn list_workspaces(&self, owner: &str) -> StoreResult<Vec<Workspace>> {
        let mut stmt = self.conn.prepare(&format!(
            "{WORKSPACE_SELECT_SQL}
             WHERE owner_id = ?1
             ORDER BY created_at ASC, workspace_uuid ASC;"
        ))?;

        let mut rows = stmt.query([owner])?;
        let mut workspaces = Vec::new();
        while let Some(row) = rows.next()? {
            workspaces.push(parse_workspace_row(row)?);
        }

        for workspace in &mut workspaces {
            workspace.focus = load_focus_entries(self.conn, workspace.uuid)?;
        }

        Ok(workspaces)
    }

    fn count_workspaces(&self, owner: &str) -> StoreResult<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM workspaces WHERE owner_id = ?1;",
            [owner],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn update_workspace(&self, workspace: &Workspace) -> StoreResult<()> {
        workspace
            .validate()
            .map_err(|err| StoreError::Validation(err.to_string()))?;

        let changed = self.conn.execute(
            "UPDATE workspaces
             SET
                title = ?1,
                goal = ?2,
                emoji = ?3,
                mode = ?4,
                xp = ?5,
                streak_count = ?6,
                last_activity_date = ?7,
                focus_date = ?8,
                updated_at = ?9
             WHERE workspace_uuid = ?10
               AND owner_id = ?11;",
            params![
                workspace.title.as_str(),
                workspace.goal.as_deref(),
                workspace.emoji.as_deref(),
                mode_to_db(workspace.mode),
                workspace.xp,
                workspace.streak_count,
                workspace.last_activity_date.as_deref(),
                workspace.focus_date.as_deref(),
                workspace.updated_at,
                workspace.uuid.to_string(),
                workspace.owner_id.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: EntityKind::Workspace,
                id: workspace.uuid.to_string(),
            });
        }

        Ok(())
    }

    fn replace_focus(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        entries: &[FocusRef],
        focus_date: &str,
        now_ms: EpochMs,
    ) -> StoreResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_workspace_owned(&tx, owner, workspace_uuid)?;

        tx.execute(
            "DELETE FROM focus_entries WHERE workspace_uuid = ?1;",
            [workspace_uuid.to_string()],
        )?;
        for (position, entry) in entries.iter().enumerate() {
            insert_focus_row(&tx, workspace_uuid, entry, position as i64)?;
        }
        tx.execute(
            "UPDATE workspaces
             SET focus_date = ?2,
                 updated_at = ?3
             WHERE workspace_uuid = ?1;",
            params![workspace_uuid.to_string(), focus_date, now_ms],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn clear_focus(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        focus_date: &str,
        now_ms: EpochMs,
    ) -> StoreResult<()> {
        self.replace_focus(owner, workspace_uuid, &[], focus_date, now_ms)
    }

    fn append_focus(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        entry: &FocusRef,
        now_ms: EpochMs,
    ) -> StoreResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_workspace_owned(&tx, owner, workspace_uuid)?;
        let position = next_focus_position(&tx, workspace_uuid)?;
        insert_focus_row(&tx, workspace_uuid, entry, position)?;
        tx.execute(
            "UPDATE workspaces SET updated_at = ?2 WHERE workspace_uuid = ?1;",
            params![workspace_uuid.to_string(), now_ms],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn remove_focus(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        kind: FocusKind,
        ref_uuid: Uuid,
        now_ms: EpochMs,
    ) -> StoreResult<bool> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_workspace_owned(&tx, owner, workspace_uuid)?;

        let removed = tx.execute(
            "DELETE FROM focus_entries
             WHERE workspace_uuid = ?1
               AND kind = ?2
               AND ref_uuid = ?3;",
            params![
                workspace_uuid.to_string(),
                focus_kind_to_db(kind),
                ref_uuid.to_string(),
            ],
        )?;
        if removed > 0 {
            tx.execute(
                "UPDATE workspaces SET updated_at = ?2 WHERE workspace_uuid = ?1;",
                params![workspace_uuid.to_string(), now_ms],
            )?;
        }

        tx.commit()?;
        Ok(removed > 0)
    }

    fn resolve_focus_ref(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        kind: FocusKind,
        ref_uuid: Uuid,
    ) -> StoreResult<bool> {
        let sql = match kind {
            FocusKind::Item => {
                "SELECT EXISTS(
                    SELECT 1
                    FROM items i
                    INNER JOIN workspaces w ON w.workspace_uuid = i.workspace_uuid
                    WHERE i.item_uuid = ?1
                      AND i.workspace_uuid = ?2
                      AND w.owner_id = ?3
                );"
            }
            FocusKind::Todo => {
                "SELECT EXISTS(
                    SELECT 1
                    FROM todos t
                    INNER JOIN workspaces w ON w.workspace_uuid = t.workspace_uuid
                    WHERE t.todo_uuid = ?1
                      AND t.workspace_uuid = ?2
                      AND w.owner_id = ?3
                );"
            }
        };

        let exists: i64 = self.conn.query_row(
            sql,
            params![ref_uuid.to_string(), workspace_uuid.to_string(), owner],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn apply_activity(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        xp_delta: i64,
        streak_count: i64,
        activity_date: &str,
        now_ms: EpochMs,
    ) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE workspaces
             SET
                xp = xp + ?1,
                streak_count = ?2,
                last_activity_date = ?3,
                updated_at = ?4
             WHERE workspace_uuid = ?5
               AND owner_id = ?6;",
            params![
                xp_delta,
                streak_count,
                activity_date,
                now_ms,
                workspace_uuid.to_string(),
                owner,
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: EntityKind::Workspace,
                id: workspace_uuid.to_string(),
            });
        }

        Ok(())
    }

    fn instantiate_bundle(&self, bundle: &WorkspaceBundle) -> StoreResult<WorkspaceId> {
        bundle
            .workspace
            .validate()
            .map_err(|err| StoreError::Validation(err.to_string()))?;
        for folder in &bundle.folders {
            folder
                .validate()
                .map_err(|err| StoreError::Validation(err.to_string()))?;
        }
        for item in &bundle.items {
            item.validate()
                .map_err(|err| StoreError::Validation(err.to_string()))?;
        }
        for todo in &bundle.todos {
            todo.validate()
                .map_err(|err| StoreError::Validation(err.to_string()))?;
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_below_workspace_cap(&tx, bundle.workspace.owner_id.as_str())?;

        insert_workspace_row(&tx, &bundle.workspace)?;
        for folder in &bundle.folders {
            hierarchy_repo::insert_folder_row(&tx, folder)?;
        }
        for item in &bundle.items {
            hierarchy_repo::insert_item_row(&tx, item)?;
            hierarchy_repo::replace_item_tag_links(&tx, item.uuid, &item.tags)?;
        }
        for todo in &bundle.todos {
            todo_repo::insert_todo_row(&tx, todo)?;
        }

        tx.commit()?;
        Ok(bundle.workspace.uuid)
    }
}

fn ensure_below_workspace_cap(conn: &Connection, owner: &str) -> StoreResult<()> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM workspaces WHERE owner_id = ?1;",
        [owner],
        |row| row.get(0),
    )?;
    if count >= MAX_WORKSPACES_PER_OWNER {
        return Err(StoreError::LimitExceeded {
            limit: LimitKind::WorkspacesPerOwner,
            max: MAX_WORKSPACES_PER_OWNER,
        });
    }
    Ok(())
}

pub(crate) fn insert_workspace_row(conn: &Connection, workspace: &Workspace) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO workspaces (
            workspace_uuid,
            owner_id,
            title,
            goal,
            emoji,
            mode,
            xp,
            streak_count,
            last_activity_date,
            focus_date,
            created_at,
            updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
        params![
            workspace.uuid.to_string(),
            workspace.owner_id.as_str(),
            workspace.title.as_str(),
            workspace.goal.as_deref(),
            workspace.emoji.as_deref(),
            mode_to_db(workspace.mode),
            workspace.xp,
            workspace.streak_count,
            workspace.last_activity_date.as_deref(),
            workspace.focus_date.as_deref(),
            workspace.created_at,
            workspace.updated_at,
        ],
    )?;
    Ok(())
}

fn insert_focus_row(
    conn: &Connection,
    workspace_uuid: WorkspaceId,
    entry: &FocusRef,
    position: i64,
) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO focus_entries (
            workspace_uuid,
            kind,
            ref_uuid,
            position,
            added_at
        ) VALUES (?1, ?2, ?3, ?4, ?5);",
        params![
            workspace_uuid.to_string(),
            focus_kind_to_db(entry.kind),
            entry.ref_uuid.to_string(),
            position,
            entry.added_at,
        ],
    )?;
    Ok(())
}

fn next_focus_position(conn: &Connection, workspace_uuid: WorkspaceId) -> StoreResult<i64> {
    let next = conn.query_row(
        "SELECT COALESCE(MAX(position), -1) + 1
         FROM focus_entries
         WHERE workspace_uuid = ?1;",
        [workspace_uuid.to_string()],
        |row| row.get(0),
    )?;
    Ok(next)
}

fn load_focus_entries(
    conn: &Connection,
    workspace_uuid: WorkspaceId,
) -> StoreResult<Vec<FocusRef>> {
    let mut stmt = conn.prepare(
        "SELECT kind, ref_uuid, added_at
         FROM focus_entries
         WHERE workspace_uuid = ?1
         ORDER BY position ASC, rowid ASC;",
    )?;

    let mut rows = stmt.query([workspace_uuid.to_string()])?;
    let mut entries = Vec::new();
    while let Some(row) = rows.next()? {
        let kind_text: String = row.get("kind")?;
        let kind = parse_focus_kind(&kind_text).ok_or_else(|| {
            StoreError::InvalidData(format!(
                "invalid focus kind `{kind_text}` in focus_entries.kind"
            ))
        })?;
        let ref_text: String = row.get("ref_uuid")?;
        entries.push(FocusRef {
            kind,
            ref_uuid: parse_uuid(&ref_text, "focus_entries.ref_uuid")?,
            added_at: row.get("added_at")?,
        });
    }

    Ok(entries)
}

fn parse_workspace_row(row: &Row<'_>) -> StoreResult<Workspace> {
    let uuid_text: String = row.get("workspace_uuid")?;
    let mode_text: String = row.get("mode")?;
    let mode = parse_mode(&mode_text).ok_or_else(|| {
        StoreError::InvalidData(format!("invalid mode `{mode_text}` in workspaces.mode"))
    })?;

    Ok(Workspace {
        uuid: parse_uuid(&uuid_text, "workspaces.workspace_uuid")?,
        owner_id: row.get("owner_id")?,
        title: row.get("title")?,
        goal: row.get("goal")?,
        emoji: row.get("emoji")?,
        mode,
        xp: row.get("xp")?,
        streak_count: row.get("streak_count")?,
        last_activity_date: row.get("last_activity_date")?,
        focus_date: row.get("focus_date")?,
        focus: Vec::new(),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub(crate) fn mode_to_db(mode: WorkspaceMode) -> &'static str {
    match mode {
        WorkspaceMode::Build => "build",
        WorkspaceMode::Revise => "revise",
        WorkspaceMode::Interview => "interview",
    }
}

pub(crate) fn parse_mode(value: &str) -> Option<WorkspaceMode> {
    match value {
        "build" => Some(WorkspaceMode::Build),
        "revise" => Some(WorkspaceMode::Revise),
        "interview" => Some(WorkspaceMode::Interview),
        _ => None,
    }
}

pub(crate) fn focus_kind_to_db(kind: FocusKind) -> &'static str {
    match kind {
        FocusKind::Item => "item",
        FocusKind::Todo => "todo",
    }
}

pub(crate) fn parse_focus_kind(value: &str) -> Option<FocusKind> {
    match value {
        "item" => Some(FocusKind::Item),
        "todo" => Some(FocusKind::Todo),
        _ => None,
    }
}
