use studydesk_core::db::open_db_in_memory;
use studydesk_core::{
    BuiltinTemplateCatalog, CoreError, CreateWorkspaceRequest, FixedClock, HierarchyRepository,
    ItemListQuery, SqliteHierarchyRepository, SqliteTodoRepository, SqliteWorkspaceRepository,
    TemplateService, TodoListQuery, TodoRepository, WorkspaceService, MAX_WORKSPACES_PER_OWNER,
};

const T0: i64 = 1_700_049_600_000;
const OWNER: &str = "owner-1";

fn setup() -> rusqlite::Connection {
    open_db_in_memory().unwrap()
}

fn template_service<'a>(
    conn: &'a rusqlite::Connection,
    clock: &'a FixedClock,
) -> TemplateService<SqliteWorkspaceRepository<'a>, BuiltinTemplateCatalog, &'a FixedClock> {
    TemplateService::new(
        SqliteWorkspaceRepository::try_new(conn).unwrap(),
        BuiltinTemplateCatalog::new(),
        clock,
    )
}

fn table_count(conn: &rusqlite::Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn listing_exposes_the_builtin_templates() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let templates = template_service(&conn, &clock);

    let summaries = templates.list_templates();
    assert_eq!(summaries.len(), 3);
    assert!(summaries
        .iter()
        .any(|summary| summary.template_id == "interview-prep"));
}

#[test]
fn instantiation_creates_the_whole_bundle() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let templates = template_service(&conn, &clock);

    let workspace = templates.instantiate(OWNER, "nodejs-backend").unwrap();
    assert_eq!(workspace.title, "Node.js Backend");
    assert_eq!(workspace.xp, 0);
    assert_eq!(workspace.level(), 1);

    let hierarchy = SqliteHierarchyRepository::try_new(&conn).unwrap();
    let folders = hierarchy.list_folders(OWNER, workspace.uuid).unwrap();
    assert_eq!(folders.len(), 2);

    let items = hierarchy
        .list_items(
            OWNER,
            &ItemListQuery {
                workspace_uuid: workspace.uuid,
                status: None,
                folder_uuid: None,
            },
        )
        .unwrap();
    assert!(!items.is_empty());
    for item in &items {
        // Every seeded item sits in a folder of the same workspace.
        let folder_uuid = item.folder_uuid.unwrap();
        assert!(folders.iter().any(|folder| folder.uuid == folder_uuid));
        assert_eq!(item.workspace_uuid, workspace.uuid);
    }

    // Seeded review items are immediately due.
    assert!(items
        .iter()
        .filter(|item| item.review_enabled)
        .all(|item| item.next_review_at == Some(T0)));

    let todos = SqliteTodoRepository::try_new(&conn).unwrap();
    let seeded_todos = todos
        .list_todos(
            OWNER,
            &TodoListQuery {
                workspace_uuid: workspace.uuid,
                item_uuid: None,
            },
        )
        .unwrap();
    assert!(!seeded_todos.is_empty());
    for todo in &seeded_todos {
        let parent = todo.item_uuid.unwrap();
        assert!(items.iter().any(|item| item.uuid == parent));
    }
}

#[test]
fn unknown_template_is_not_found() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let templates = template_service(&conn, &clock);

    let err = templates.instantiate(OWNER, "does-not-exist").unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[test]
fn instantiation_at_the_workspace_cap_leaves_nothing_behind() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let workspaces =
        WorkspaceService::new(SqliteWorkspaceRepository::try_new(&conn).unwrap(), &clock);
    let templates = template_service(&conn, &clock);

    for index in 0..MAX_WORKSPACES_PER_OWNER {
        workspaces
            .create_workspace(
                OWNER,
                &CreateWorkspaceRequest {
                    title: format!("Topic {index}"),
                    goal: None,
                    emoji: None,
                },
            )
            .unwrap();
    }

    let workspaces_before = table_count(&conn, "workspaces");
    let folders_before = table_count(&conn, "folders");
    let items_before = table_count(&conn, "items");
    let todos_before = table_count(&conn, "todos");

    let err = templates.instantiate(OWNER, "interview-prep").unwrap_err();
    assert!(matches!(err, CoreError::LimitExceeded { .. }));

    // All-or-nothing: no partial workspace, folder, item, or todo survives.
    assert_eq!(table_count(&conn, "workspaces"), workspaces_before);
    assert_eq!(table_count(&conn, "folders"), folders_before);
    assert_eq!(table_count(&conn, "items"), items_before);
    assert_eq!(table_count(&conn, "todos"), todos_before);
    assert_eq!(
        workspaces.list_workspaces(OWNER).unwrap().len(),
        MAX_WORKSPACES_PER_OWNER as usize
    );
}
