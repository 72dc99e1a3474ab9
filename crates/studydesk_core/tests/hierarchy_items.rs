use studydesk_core::db::open_db_in_memory;
use studydesk_core::{
    CoreError, CreateItemRequest, CreateTodoRequest, CreateWorkspaceRequest, FixedClock, FocusKind,
    FocusService, HierarchyService, ItemListQuery, ItemPatch, ItemStatus, ItemType, Mastery,
    SqliteHierarchyRepository, SqliteTodoRepository, SqliteWorkspaceRepository, TodoService,
    Workspace, WorkspaceService,
};
use uuid::Uuid;

const T0: i64 = 1_700_049_600_000;
const OWNER: &str = "owner-1";

fn setup() -> rusqlite::Connection {
    open_db_in_memory().unwrap()
}

fn make_workspace(conn: &rusqlite::Connection, clock: &FixedClock, title: &str) -> Workspace {
    let service = WorkspaceService::new(SqliteWorkspaceRepository::try_new(conn).unwrap(), clock);
    service
        .create_workspace(
            OWNER,
            &CreateWorkspaceRequest {
                title: title.to_string(),
                goal: None,
                emoji: None,
            },
        )
        .unwrap()
}

fn item_request(workspace_uuid: Uuid, title: &str) -> CreateItemRequest {
    CreateItemRequest {
        workspace_uuid,
        folder_uuid: None,
        kind: ItemType::Link,
        title: title.to_string(),
        url: Some("https://example.com".to_string()),
        note: None,
        tags: Vec::new(),
        resource_id: None,
        document_id: None,
    }
}

#[test]
fn folders_list_in_insertion_order() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let workspace = make_workspace(&conn, &clock, "Ordering");
    let service = HierarchyService::new(SqliteHierarchyRepository::try_new(&conn).unwrap(), &clock);

    let alpha = service.create_folder(OWNER, workspace.uuid, "Alpha").unwrap();
    let beta = service.create_folder(OWNER, workspace.uuid, "Beta").unwrap();

    let folders = service.list_folders(OWNER, workspace.uuid).unwrap();
    assert_eq!(folders.len(), 2);
    assert_eq!(folders[0].uuid, alpha.uuid);
    assert_eq!(folders[1].uuid, beta.uuid);
    assert_eq!(folders[0].sort_order, 0);
    assert_eq!(folders[1].sort_order, 1);
}

#[test]
fn item_in_foreign_workspace_folder_is_rejected() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let workspace_a = make_workspace(&conn, &clock, "A");
    let workspace_b = make_workspace(&conn, &clock, "B");
    let service = HierarchyService::new(SqliteHierarchyRepository::try_new(&conn).unwrap(), &clock);

    let foreign_folder = service.create_folder(OWNER, workspace_b.uuid, "Elsewhere").unwrap();

    let mut request = item_request(workspace_a.uuid, "Crossed wires");
    request.folder_uuid = Some(foreign_folder.uuid);
    let err = service.create_item(OWNER, &request).unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    let mut request = item_request(workspace_a.uuid, "Dangling folder");
    request.folder_uuid = Some(Uuid::new_v4());
    let err = service.create_item(OWNER, &request).unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[test]
fn moving_an_item_revalidates_folder_parentage() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let workspace_a = make_workspace(&conn, &clock, "A");
    let workspace_b = make_workspace(&conn, &clock, "B");
    let service = HierarchyService::new(SqliteHierarchyRepository::try_new(&conn).unwrap(), &clock);

    let own_folder = service.create_folder(OWNER, workspace_a.uuid, "Here").unwrap();
    let foreign_folder = service.create_folder(OWNER, workspace_b.uuid, "There").unwrap();
    let item = service
        .create_item(OWNER, &item_request(workspace_a.uuid, "Movable"))
        .unwrap();

    let moved = service
        .update_item(
            OWNER,
            item.uuid,
            &ItemPatch {
                folder_uuid: Some(Some(own_folder.uuid)),
                ..ItemPatch::default()
            },
        )
        .unwrap();
    assert_eq!(moved.folder_uuid, Some(own_folder.uuid));

    let err = service
        .update_item(
            OWNER,
            item.uuid,
            &ItemPatch {
                folder_uuid: Some(Some(foreign_folder.uuid)),
                ..ItemPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn successful_update_stamps_last_touched_at() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let workspace = make_workspace(&conn, &clock, "Touch");
    let service = HierarchyService::new(SqliteHierarchyRepository::try_new(&conn).unwrap(), &clock);

    let item = service
        .create_item(OWNER, &item_request(workspace.uuid, "Stamped"))
        .unwrap();
    assert_eq!(item.last_touched_at, T0);

    clock.advance_ms(5_000);
    let updated = service
        .update_item(
            OWNER,
            item.uuid,
            &ItemPatch {
                progress_percent: Some(40),
                ..ItemPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.progress_percent, 40);
    assert_eq!(updated.last_touched_at, T0 + 5_000);
}

#[test]
fn review_toggle_on_makes_item_immediately_due_and_off_keeps_history() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let workspace = make_workspace(&conn, &clock, "Toggles");
    let service = HierarchyService::new(SqliteHierarchyRepository::try_new(&conn).unwrap(), &clock);

    let item = service
        .create_item(OWNER, &item_request(workspace.uuid, "Toggled"))
        .unwrap();

    let enabled = service
        .update_item(
            OWNER,
            item.uuid,
            &ItemPatch {
                review_enabled: Some(true),
                ..ItemPatch::default()
            },
        )
        .unwrap();
    assert!(enabled.review_enabled);
    assert_eq!(enabled.review_stage, 0);
    assert_eq!(enabled.next_review_at, Some(T0));

    let disabled = service
        .update_item(
            OWNER,
            item.uuid,
            &ItemPatch {
                review_enabled: Some(false),
                ..ItemPatch::default()
            },
        )
        .unwrap();
    assert!(!disabled.review_enabled);
    assert_eq!(disabled.next_review_at, None);
    assert_eq!(disabled.review_stage, 0);

    // Re-sending the current value is a no-op, not a reset.
    let unchanged = service
        .update_item(
            OWNER,
            item.uuid,
            &ItemPatch {
                review_enabled: Some(false),
                ..ItemPatch::default()
            },
        )
        .unwrap();
    assert_eq!(unchanged.next_review_at, None);
}

#[test]
fn cycle_mastery_walks_the_ring_and_wraps() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let workspace = make_workspace(&conn, &clock, "Mastery");
    let service = HierarchyService::new(SqliteHierarchyRepository::try_new(&conn).unwrap(), &clock);

    let item = service
        .create_item(OWNER, &item_request(workspace.uuid, "Ringed"))
        .unwrap();
    assert_eq!(item.mastery, Mastery::None);

    let expected = [
        Mastery::Understand,
        Mastery::Implement,
        Mastery::Teach,
        Mastery::None,
    ];
    for stage in expected {
        let cycled = service.cycle_mastery(OWNER, item.uuid).unwrap();
        assert_eq!(cycled.mastery, stage);
    }
}

#[test]
fn list_items_filters_by_status_and_folder() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let workspace = make_workspace(&conn, &clock, "Filters");
    let service = HierarchyService::new(SqliteHierarchyRepository::try_new(&conn).unwrap(), &clock);

    let folder = service.create_folder(OWNER, workspace.uuid, "Inbox").unwrap();
    let mut in_folder = item_request(workspace.uuid, "In folder");
    in_folder.folder_uuid = Some(folder.uuid);
    let in_folder = service.create_item(OWNER, &in_folder).unwrap();
    let loose = service
        .create_item(OWNER, &item_request(workspace.uuid, "Loose"))
        .unwrap();

    service
        .update_item(
            OWNER,
            loose.uuid,
            &ItemPatch {
                status: Some(ItemStatus::Archived),
                ..ItemPatch::default()
            },
        )
        .unwrap();

    let all = service
        .list_items(
            OWNER,
            &ItemListQuery {
                workspace_uuid: workspace.uuid,
                status: None,
                folder_uuid: None,
            },
        )
        .unwrap();
    assert_eq!(all.len(), 2);

    let archived = service
        .list_items(
            OWNER,
            &ItemListQuery {
                workspace_uuid: workspace.uuid,
                status: Some(ItemStatus::Archived),
                folder_uuid: None,
            },
        )
        .unwrap();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].uuid, loose.uuid);

    let foldered = service
        .list_items(
            OWNER,
            &ItemListQuery {
                workspace_uuid: workspace.uuid,
                status: None,
                folder_uuid: Some(folder.uuid),
            },
        )
        .unwrap();
    assert_eq!(foldered.len(), 1);
    assert_eq!(foldered[0].uuid, in_folder.uuid);
}

#[test]
fn tags_are_normalized_and_deduplicated() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let workspace = make_workspace(&conn, &clock, "Tags");
    let service = HierarchyService::new(SqliteHierarchyRepository::try_new(&conn).unwrap(), &clock);

    let mut request = item_request(workspace.uuid, "Tagged");
    request.tags = vec![
        " Rust ".to_string(),
        "rust".to_string(),
        "ASYNC".to_string(),
        "  ".to_string(),
    ];
    let item = service.create_item(OWNER, &request).unwrap();
    assert_eq!(item.tags, ["async", "rust"]);

    let loaded = service.get_item(OWNER, item.uuid).unwrap();
    assert_eq!(loaded.tags, ["async", "rust"]);
}

#[test]
fn deleting_a_folder_detaches_its_items() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let workspace = make_workspace(&conn, &clock, "Detach");
    let service = HierarchyService::new(SqliteHierarchyRepository::try_new(&conn).unwrap(), &clock);

    let folder = service.create_folder(OWNER, workspace.uuid, "Doomed").unwrap();
    let mut request = item_request(workspace.uuid, "Survivor");
    request.folder_uuid = Some(folder.uuid);
    let item = service.create_item(OWNER, &request).unwrap();

    service.delete_folder(OWNER, folder.uuid).unwrap();

    let survivor = service.get_item(OWNER, item.uuid).unwrap();
    assert_eq!(survivor.folder_uuid, None);
    assert!(service.list_folders(OWNER, workspace.uuid).unwrap().is_empty());
}

#[test]
fn deleting_an_item_cascades_to_todos_and_focus_entries() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let workspace = make_workspace(&conn, &clock, "Cascade");
    let hierarchy =
        HierarchyService::new(SqliteHierarchyRepository::try_new(&conn).unwrap(), &clock);
    let todos = TodoService::new(
        SqliteTodoRepository::try_new(&conn).unwrap(),
        SqliteWorkspaceRepository::try_new(&conn).unwrap(),
        &clock,
    );
    let focus = FocusService::new(SqliteWorkspaceRepository::try_new(&conn).unwrap(), &clock);

    let doomed = hierarchy
        .create_item(OWNER, &item_request(workspace.uuid, "Doomed"))
        .unwrap();
    let bystander = hierarchy
        .create_item(OWNER, &item_request(workspace.uuid, "Bystander"))
        .unwrap();

    let attached_todo = todos
        .create_todo(
            OWNER,
            &CreateTodoRequest {
                workspace_uuid: workspace.uuid,
                item_uuid: Some(doomed.uuid),
                text: "Dies with the item".to_string(),
                due_at: None,
                priority: None,
                kind: None,
            },
        )
        .unwrap();
    let loose_todo = todos
        .create_todo(
            OWNER,
            &CreateTodoRequest {
                workspace_uuid: workspace.uuid,
                item_uuid: None,
                text: "Stays".to_string(),
                due_at: None,
                priority: None,
                kind: None,
            },
        )
        .unwrap();

    focus.add_focus(OWNER, workspace.uuid, FocusKind::Item, doomed.uuid).unwrap();
    focus
        .add_focus(OWNER, workspace.uuid, FocusKind::Todo, attached_todo.uuid)
        .unwrap();
    focus
        .add_focus(OWNER, workspace.uuid, FocusKind::Todo, loose_todo.uuid)
        .unwrap();

    hierarchy.delete_item(OWNER, doomed.uuid).unwrap();

    let err = hierarchy.get_item(OWNER, doomed.uuid).unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
    let err = todos.get_todo(OWNER, attached_todo.uuid).unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));

    // The loose todo and its focus entry are untouched.
    assert_eq!(todos.get_todo(OWNER, loose_todo.uuid).unwrap().text, "Stays");
    let remaining = focus.focus_list(OWNER, workspace.uuid).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].ref_uuid, loose_todo.uuid);

    // Sibling items survive the cascade.
    assert!(hierarchy.get_item(OWNER, bystander.uuid).is_ok());
}

#[test]
fn cross_owner_item_reads_as_not_found() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let workspace = make_workspace(&conn, &clock, "Private");
    let service = HierarchyService::new(SqliteHierarchyRepository::try_new(&conn).unwrap(), &clock);

    let item = service
        .create_item(OWNER, &item_request(workspace.uuid, "Secret"))
        .unwrap();

    let err = service.get_item("someone-else", item.uuid).unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
    let err = service.delete_item("someone-else", item.uuid).unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[test]
fn progress_patch_above_hundred_is_rejected() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let workspace = make_workspace(&conn, &clock, "Bounds");
    let service = HierarchyService::new(SqliteHierarchyRepository::try_new(&conn).unwrap(), &clock);

    let item = service
        .create_item(OWNER, &item_request(workspace.uuid, "Bounded"))
        .unwrap();

    let err = service
        .update_item(
            OWNER,
            item.uuid,
            &ItemPatch {
                progress_percent: Some(120),
                ..ItemPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    // Progress is user-settable and non-monotonic; lowering is fine.
    let raised = service
        .update_item(
            OWNER,
            item.uuid,
            &ItemPatch {
                progress_percent: Some(80),
                ..ItemPatch::default()
            },
        )
        .unwrap();
    assert_eq!(raised.progress_percent, 80);
    let lowered = service
        .update_item(
            OWNER,
            item.uuid,
            &ItemPatch {
                progress_percent: Some(30),
                ..ItemPatch::default()
            },
        )
        .unwrap();
    assert_eq!(lowered.progress_percent, 30);
}
