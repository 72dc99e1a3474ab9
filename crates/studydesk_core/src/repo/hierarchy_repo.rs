//! Folder/item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner-scoped persistence for the folder/item hierarchy.
//! - Own the item-delete cascade (todos + focus entries) as one immediate
//!   transaction.
//! - Own tag-link replacement with atomic semantics.
//!
//! # Invariants
//! - Folder listing is deterministic: `sort_order ASC`, insertion order as
//!   the tiebreak.
//! - Tag names are normalized to lowercase before persistence.
//! - Deleting a folder detaches its items instead of deleting them.

use crate::clock::EpochMs;
use crate::model::folder::{Folder, FolderId};
use crate::model::item::{Item, ItemId, ItemStatus, ItemType, Mastery};
use crate::model::workspace::WorkspaceId;
use crate::repo::{
    bool_to_int, ensure_connection_ready, ensure_workspace_owned, int_to_bool, parse_uuid,
    EntityKind, StoreError, StoreResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use std::collections::BTreeSet;
use uuid::Uuid;

const ITEM_SELECT_SQL: &str = "SELECT
    i.item_uuid,
    i.workspace_uuid,
    i.folder_uuid,
    i.type,
    i.title,
    i.url,
    i.note,
    i.status,
    i.progress_percent,
    i.pinned,
    i.mastery,
    i.review_enabled,
    i.review_stage,
    i.next_review_at,
    i.last_reviewed_at,
    i.last_touched_at,
    i.resource_id,
    i.document_id,
    i.created_at
FROM items i
INNER JOIN workspaces w ON w.workspace_uuid = i.workspace_uuid";

/// Query options for listing items.
#[derive(Debug, Clone)]
pub struct ItemListQuery {
    pub workspace_uuid: WorkspaceId,
    pub status: Option<ItemStatus>,
    pub folder_uuid: Option<FolderId>,
}

/// Review-schedule column update applied after one recorded review.
#[derive(Debug, Clone, Copy)]
pub struct ReviewUpdate {
    pub review_stage: u32,
    pub next_review_at: EpochMs,
    pub reviewed_at: EpochMs,
}

/// Repository interface for folder/item operations.
pub trait HierarchyRepository {
    /// Creates one folder at the end of the workspace ordering.
    fn create_folder(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        name: &str,
        now_ms: EpochMs,
    ) -> StoreResult<Folder>;
    /// Loads one folder by id.
    fn get_folder(&self, owner: &str, folder_uuid: FolderId) -> StoreResult<Option<Folder>>;
    /// Lists folders in a workspace.
    fn list_folders(&self, owner: &str, workspace_uuid: WorkspaceId) -> StoreResult<Vec<Folder>>;
    /// Deletes one folder, detaching its items.
    fn delete_folder(&self, owner: &str, folder_uuid: FolderId, now_ms: EpochMs)
        -> StoreResult<()>;
    /// Creates one item (tags included).
    fn create_item(&self, owner: &str, item: &Item) -> StoreResult<ItemId>;
    /// Loads one item with tags.
    fn get_item(&self, owner: &str, item_uuid: ItemId) -> StoreResult<Option<Item>>;
    /// Lists items using workspace/status/folder filters.
    fn list_items(&self, owner: &str, query: &ItemListQuery) -> StoreResult<Vec<Item>>;
    /// Full-entity write of mutable item columns (last write wins).
    fn update_item(&self, owner: &str, item: &Item) -> StoreResult<()>;
    /// Replaces all tags for one item in one transaction.
    fn set_item_tags(&self, owner: &str, item_uuid: ItemId, tags: &[String]) -> StoreResult<()>;
    /// Deletes one item plus its todos and any focus entries referencing
    /// the item or those todos, atomically.
    fn delete_item(&self, owner: &str, item_uuid: ItemId) -> StoreResult<()>;
    /// Lists review-enabled items due at `now_ms`, most overdue first.
    fn due_items(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        now_ms: EpochMs,
    ) -> StoreResult<Vec<Item>>;
    /// Applies one review-schedule update to a review-enabled item.
    fn apply_review(&self, owner: &str, item_uuid: ItemId, update: ReviewUpdate)
        -> StoreResult<()>;
}

/// SQLite-backed folder/item repository.
pub struct SqliteHierarchyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHierarchyRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_connection_ready(conn, &["folders", "items", "tags", "item_tags"])?;
        Ok(Self { conn })
    }
}

impl HierarchyRepository for SqliteHierarchyRepository<'_> {
    fn create_folder(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        name: &str,
        now_ms: EpochMs,
    ) -> StoreResult<Folder> {
        ensure_workspace_owned(self.conn, owner, workspace_uuid)?;

        let sort_order = next_folder_sort_order(self.conn, workspace_uuid)?;
        let folder = Folder {
            uuid: Uuid::new_v4(),
            workspace_uuid,
            name: name.to_string(),
            sort_order,
            created_at: now_ms,
            updated_at: now_ms,
        };
        folder
            .validate()
            .map_err(|err| StoreError::Validation(err.to_string()))?;

        insert_folder_row(self.conn, &folder)?;
        Ok(folder)
    }

    fn get_folder(&self, owner: &str, folder_uuid: FolderId) -> StoreResult<Option<Folder>> {
        let mut stmt = self.conn.prepare(
            "SELECT f.folder_uuid, f.workspace_uuid, f.name, f.sort_order, f.created_at, f.updated_at
             FROM folders f
             INNER JOIN workspaces w ON w.workspace_uuid = f.workspace_uuid
             WHERE f.folder_uuid = ?1
               AND w.owner_id = ?2;",
        )?;

        let mut rows = stmt.query(params![folder_uuid.to_string(), owner])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_folder_row(row)?));
        }
        Ok(None)
    }

    fn list_folders(&self, owner: &str, workspace_uuid: WorkspaceId) -> StoreResult<Vec<Folder>> {
        ensure_workspace_owned(self.conn, owner, workspace_uuid)?;

        let mut stmt = self.conn.prepare(
            "SELECT folder_uuid, workspace_uuid, name, sort_order, created_at, updated_at
             FROM folders
             WHERE workspace_uuid = ?1
             ORDER BY sort_order ASC, rowid ASC;",
        )?;

        let mut rows = stmt.query([workspace_uuid.to_string()])?;
        let mut folders = Vec::new();
        while let Some(row) = rows.next()? {
            folders.push(parse_folder_row(row)?);
        }
        Ok(folders)
    }

    fn delete_folder(
        &self,
        owner: &str,
        folder_uuid: FolderId,
        now_ms: EpochMs,
    ) -> StoreResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !folder_exists_for_owner(&tx, owner, folder_uuid)? {
            return Err(StoreError::NotFound {
                entity: EntityKind::Folder,
                id: folder_uuid.to_string(),
            });
        }

        tx.execute(
            "UPDATE items
             SET folder_uuid = NULL,
                 last_touched_at = ?2
             WHERE folder_uuid = ?1;",
            params![folder_uuid.to_string(), now_ms],
        )?;
        tx.execute(
            "DELETE FROM folders WHERE folder_uuid = ?1;",
            [folder_uuid.to_string()],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn create_item(&self, owner: &str, item: &Item) -> StoreResult<ItemId> {
        item.validate()
            .map_err(|err| StoreError::Validation(err.to_string()))?;
        ensure_workspace_owned(self.conn, owner, item.workspace_uuid)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        insert_item_row(&tx, item)?;
        replace_item_tag_links(&tx, item.uuid, &item.tags)?;
        tx.commit()?;

        Ok(item.uuid)
    }

    fn get_item(&self, owner: &str, item_uuid: ItemId) -> StoreResult<Option<Item>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL}
             WHERE i.item_uuid = ?1
               AND w.owner_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![item_uuid.to_string(), owner])?;
        if let Some(row) = rows.next()? {
            let mut item = parse_item_row(row)?;
            item.tags = load_item_tags(self.conn, item.uuid)?;
            return Ok(Some(item));
        }
        Ok(None)
    }

    fn list_items(&self, owner: &str, query: &ItemListQuery) -> StoreResult<Vec<Item>> {
        ensure_workspace_owned(self.conn, owner, query.workspace_uuid)?;

        let mut sql = format!(
            "{ITEM_SELECT_SQL}
             WHERE i.workspace_uuid = ?
               AND w.owner_id = ?"
        );
        let mut bind_values: Vec<Value> = vec![
            Value::Text(query.workspace_uuid.to_string()),
            Value::Text(owner.to_string()),
        ];

        if let Some(status) = query.status {
            sql.push_str(" AND i.status = ?");
            bind_values.push(Value::Text(item_status_to_db(status).to_string()));
        }
        if let Some(folder_uuid) = query.folder_uuid {
            sql.push_str(" AND i.folder_uuid = ?");
            bind_values.push(Value::Text(folder_uuid.to_string()));
        }

        sql.push_str(" ORDER BY i.last_touched_at DESC, i.item_uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        for item in &mut items {
            item.tags = load_item_tags(self.conn, item.uuid)?;
        }

        Ok(items)
    }

    fn update_item(&self, owner: &str, item: &Item) -> StoreResult<()> {
        item.validate()
            .map_err(|err| StoreError::Validation(err.to_string()))?;

        let changed = self.conn.execute(
            "UPDATE items
             SET
                folder_uuid = ?1,
                type = ?2,
                title = ?3,
                url = ?4,
                note = ?5,
                status = ?6,
                progress_percent = ?7,
                pinned = ?8,
                mastery = ?9,
                review_enabled = ?10,
                review_stage = ?11,
                next_review_at = ?12,
                last_reviewed_at = ?13,
                last_touched_at = ?14,
                resource_id = ?15,
                document_id = ?16
             WHERE item_uuid = ?17
               AND workspace_uuid IN (
                 SELECT workspace_uuid FROM workspaces WHERE owner_id = ?18
               );",
            params![
                item.folder_uuid.map(|value| value.to_string()),
                item_type_to_db(item.kind),
                item.title.as_str(),
                item.url.as_deref(),
                item.note.as_deref(),
                item_status_to_db(item.status),
                item.progress_percent,
                bool_to_int(item.pinned),
                mastery_to_db(item.mastery),
                bool_to_int(item.review_enabled),
                item.review_stage,
                item.next_review_at,
                item.last_reviewed_at,
                item.last_touched_at,
                item.resource_id.as_deref(),
                item.document_id.as_deref(),
                item.uuid.to_string(),
                owner,
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: EntityKind::Item,
                id: item.uuid.to_string(),
            });
        }

        Ok(())
    }

    fn set_item_tags(&self, owner: &str, item_uuid: ItemId, tags: &[String]) -> StoreResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !item_exists_for_owner(&tx, owner, item_uuid)? {
            return Err(StoreError::NotFound {
                entity: EntityKind::Item,
                id: item_uuid.to_string(),
            });
        }

        replace_item_tag_links(&tx, item_uuid, tags)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_item(&self, owner: &str, item_uuid: ItemId) -> StoreResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !item_exists_for_owner(&tx, owner, item_uuid)? {
            return Err(StoreError::NotFound {
                entity: EntityKind::Item,
                id: item_uuid.to_string(),
            });
        }

        let item_uuid_text = item_uuid.to_string();

        // Focus entries referencing the item itself, or any todo the
        // cascade is about to delete.
        tx.execute(
            "DELETE FROM focus_entries
             WHERE (kind = 'item' AND ref_uuid = ?1)
                OR (kind = 'todo' AND ref_uuid IN (
                     SELECT todo_uuid FROM todos WHERE item_uuid = ?1
                ));",
            [item_uuid_text.as_str()],
        )?;
        tx.execute(
            "DELETE FROM todos WHERE item_uuid = ?1;",
            [item_uuid_text.as_str()],
        )?;
        tx.execute(
            "DELETE FROM item_tags WHERE item_uuid = ?1;",
            [item_uuid_text.as_str()],
        )?;
        tx.execute(
            "DELETE FROM items WHERE item_uuid = ?1;",
            [item_uuid_text.as_str()],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn due_items(
        &self,
        owner: &str,
        workspace_uuid: WorkspaceId,
        now_ms: EpochMs,
    ) -> StoreResult<Vec<Item>> {
        ensure_workspace_owned(self.conn, owner, workspace_uuid)?;

        // Absent next_review_at counts as immediately due; SQLite sorts
        // NULL first under ASC, which keeps those at the head of the queue.
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL}
             WHERE i.workspace_uuid = ?1
               AND w.owner_id = ?2
               AND i.review_enabled = 1
               AND (i.next_review_at IS NULL OR i.next_review_at <= ?3)
             ORDER BY i.next_review_at ASC, i.item_uuid ASC;"
        ))?;

        let mut rows = stmt.query(params![workspace_uuid.to_string(), owner, now_ms])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        for item in &mut items {
            item.tags = load_item_tags(self.conn, item.uuid)?;
        }

        Ok(items)
    }

    fn apply_review(
        &self,
        owner: &str,
        item_uuid: ItemId,
        update: ReviewUpdate,
    ) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE items
             SET
                review_stage = ?1,
                next_review_at = ?2,
                last_reviewed_at = ?3,
                last_touched_at = ?3
             WHERE item_uuid = ?4
               AND review_enabled = 1
               AND workspace_uuid IN (
                 SELECT workspace_uuid FROM workspaces WHERE owner_id = ?5
               );",
            params![
                update.review_stage,
                update.next_review_at,
                update.reviewed_at,
                item_uuid.to_string(),
                owner,
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: EntityKind::Item,
                id: item_uuid.to_string(),
            });
        }

        Ok(())
    }
}

pub(crate) fn insert_folder_row(conn: &Connection, folder: &Folder) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO folders (
            folder_uuid,
            workspace_uuid,
            name,
            sort_order,
            created_at,
            updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            folder.uuid.to_string(),
            folder.workspace_uuid.to_string(),
            folder.name.as_str(),
            folder.sort_order,
            folder.created_at,
            folder.updated_at,
        ],
    )?;
    Ok(())
}

pub(crate) fn insert_item_row(conn: &Connection, item: &Item) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO items (
            item_uuid,
            workspace_uuid,
            folder_uuid,
            type,
            title,
            url,
            note,
            status,
            progress_percent,
            pinned,
            mastery,
            review_enabled,
            review_stage,
            next_review_at,
            last_reviewed_at,
            last_touched_at,
            resource_id,
            document_id,
            created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19);",
        params![
            item.uuid.to_string(),
            item.workspace_uuid.to_string(),
            item.folder_uuid.map(|value| value.to_string()),
            item_type_to_db(item.kind),
            item.title.as_str(),
            item.url.as_deref(),
            item.note.as_deref(),
            item_status_to_db(item.status),
            item.progress_percent,
            bool_to_int(item.pinned),
            mastery_to_db(item.mastery),
            bool_to_int(item.review_enabled),
            item.review_stage,
            item.next_review_at,
            item.last_reviewed_at,
            item.last_touched_at,
            item.resource_id.as_deref(),
            item.document_id.as_deref(),
            item.created_at,
        ],
    )?;
    Ok(())
}

/// Replaces all tag links for one item. Caller provides the transaction
/// boundary; tags are normalized to lowercase and deduplicated here.
pub(crate) fn replace_item_tag_links(
    conn: &Connection,
    item_uuid: ItemId,
    tags: &[String],
) -> StoreResult<()> {
    let item_uuid_text = item_uuid.to_string();
    conn.execute(
        "DELETE FROM item_tags WHERE item_uuid = ?1;",
        [item_uuid_text.as_str()],
    )?;

    for tag in normalize_tags(tags) {
        conn.execute(
            "INSERT OR IGNORE INTO tags (name) VALUES (?1);",
            [tag.as_str()],
        )?;
        conn.execute(
            "INSERT INTO item_tags (item_uuid, tag_id)
             SELECT ?1, id
             FROM tags
             WHERE name = ?2 COLLATE NOCASE;",
            params![item_uuid_text.as_str(), tag.as_str()],
        )?;
    }

    Ok(())
}

/// Normalizes one tag: trimmed, lowercased, blank rejected.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and deduplicates tag values.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for tag in tags {
        if let Some(value) = normalize_tag(tag) {
            unique.insert(value);
        }
    }
    unique.into_iter().collect()
}

fn load_item_tags(conn: &Connection, item_uuid: ItemId) -> StoreResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.name
         FROM item_tags it
         INNER JOIN tags t ON t.id = it.tag_id
         WHERE it.item_uuid = ?1
         ORDER BY t.name COLLATE NOCASE ASC;",
    )?;
    let mut rows = stmt.query([item_uuid.to_string()])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        tags.push(value.to_lowercase());
    }
    Ok(tags)
}

fn next_folder_sort_order(conn: &Connection, workspace_uuid: WorkspaceId) -> StoreResult<i64> {
    let next = conn.query_row(
        "SELECT COALESCE(MAX(sort_order), -1) + 1
         FROM folders
         WHERE workspace_uuid = ?1;",
        [workspace_uuid.to_string()],
        |row| row.get(0),
    )?;
    Ok(next)
}

fn folder_exists_for_owner(conn: &Connection, owner: &str, folder_uuid: FolderId) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM folders f
            INNER JOIN workspaces w ON w.workspace_uuid = f.workspace_uuid
            WHERE f.folder_uuid = ?1
              AND w.owner_id = ?2
        );",
        params![folder_uuid.to_string(), owner],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn item_exists_for_owner(conn: &Connection, owner: &str, item_uuid: ItemId) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM items i
            INNER JOIN workspaces w ON w.workspace_uuid = i.workspace_uuid
            WHERE i.item_uuid = ?1
              AND w.owner_id = ?2
        );",
        params![item_uuid.to_string(), owner],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_folder_row(row: &Row<'_>) -> StoreResult<Folder> {
    let uuid_text: String = row.get("folder_uuid")?;
    let workspace_text: String = row.get("workspace_uuid")?;
    Ok(Folder {
        uuid: parse_uuid(&uuid_text, "folders.folder_uuid")?,
        workspace_uuid: parse_uuid(&workspace_text, "folders.workspace_uuid")?,
        name: row.get("name")?,
        sort_order: row.get("sort_order")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_item_row(row: &Row<'_>) -> StoreResult<Item> {
    let uuid_text: String = row.get("item_uuid")?;
    let workspace_text: String = row.get("workspace_uuid")?;
    let folder_uuid = row
        .get::<_, Option<String>>("folder_uuid")?
        .map(|value| parse_uuid(&value, "items.folder_uuid"))
        .transpose()?;

    let type_text: String = row.get("type")?;
    let kind = parse_item_type(&type_text).ok_or_else(|| {
        StoreError::InvalidData(format!("invalid item type `{type_text}` in items.type"))
    })?;
    let status_text: String = row.get("status")?;
    let status = parse_item_status(&status_text).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid item status `{status_text}` in items.status"
        ))
    })?;
    let mastery_text: String = row.get("mastery")?;
    let mastery = parse_mastery(&mastery_text).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid mastery `{mastery_text}` in items.mastery"
        ))
    })?;

    let progress: i64 = row.get("progress_percent")?;
    let progress_percent = u8::try_from(progress).map_err(|_| {
        StoreError::InvalidData(format!(
            "invalid progress_percent `{progress}` in items.progress_percent"
        ))
    })?;

    let item = Item {
        uuid: parse_uuid(&uuid_text, "items.item_uuid")?,
        workspace_uuid: parse_uuid(&workspace_text, "items.workspace_uuid")?,
        folder_uuid,
        kind,
        title: row.get("title")?,
        url: row.get("url")?,
        note: row.get("note")?,
        tags: Vec::new(),
        status,
        progress_percent,
        pinned: int_to_bool(row.get("pinned")?, "items.pinned")?,
        mastery,
        review_enabled: int_to_bool(row.get("review_enabled")?, "items.review_enabled")?,
        review_stage: row.get("review_stage")?,
        next_review_at: row.get("next_review_at")?,
        last_reviewed_at: row.get("last_reviewed_at")?,
        last_touched_at: row.get("last_touched_at")?,
        resource_id: row.get("resource_id")?,
        document_id: row.get("document_id")?,
        created_at: row.get("created_at")?,
    };
    item.validate()
        .map_err(|err| StoreError::InvalidData(err.to_string()))?;
    Ok(item)
}

pub(crate) fn item_type_to_db(kind: ItemType) -> &'static str {
    match kind {
        ItemType::Resource => "resource",
        ItemType::Document => "document",
        ItemType::Link => "link",
        ItemType::Note => "note",
    }
}

pub(crate) fn parse_item_type(value: &str) -> Option<ItemType> {
    match value {
        "resource" => Some(ItemType::Resource),
        "document" => Some(ItemType::Document),
        "link" => Some(ItemType::Link),
        "note" => Some(ItemType::Note),
        _ => None,
    }
}

pub(crate) fn item_status_to_db(status: ItemStatus) -> &'static str {
    match status {
        ItemStatus::Active => "active",
        ItemStatus::Saved => "saved",
        ItemStatus::Completed => "completed",
        ItemStatus::Archived => "archived",
    }
}

pub(crate) fn parse_item_status(value: &str) -> Option<ItemStatus> {
    match value {
        "active" => Some(ItemStatus::Active),
        "saved" => Some(ItemStatus::Saved),
        "completed" => Some(ItemStatus::Completed),
        "archived" => Some(ItemStatus::Archived),
        _ => None,
    }
}

pub(crate) fn mastery_to_db(mastery: Mastery) -> &'static str {
    match mastery {
        Mastery::None => "none",
        Mastery::Understand => "understand",
        Mastery::Implement => "implement",
        Mastery::Teach => "teach",
    }
}

pub(crate) fn parse_mastery(value: &str) -> Option<Mastery> {
    match value {
        "none" => Some(Mastery::None),
        "understand" => Some(Mastery::Understand),
        "implement" => Some(Mastery::Implement),
        "teach" => Some(Mastery::Teach),
        _ => None,
    }
}
