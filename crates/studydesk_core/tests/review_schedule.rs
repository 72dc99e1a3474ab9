use studydesk_core::clock::MS_PER_DAY;
use studydesk_core::db::open_db_in_memory;
use studydesk_core::{
    CoreError, CreateItemRequest, CreateWorkspaceRequest, FixedClock, HierarchyService, ItemPatch,
    ItemType, ReviewService, SqliteHierarchyRepository, SqliteWorkspaceRepository, Workspace,
    WorkspaceService,
};
use uuid::Uuid;

const T0: i64 = 1_700_049_600_000;
const OWNER: &str = "owner-1";

fn setup() -> rusqlite::Connection {
    open_db_in_memory().unwrap()
}

fn make_workspace(conn: &rusqlite::Connection, clock: &FixedClock) -> Workspace {
    let service = WorkspaceService::new(SqliteWorkspaceRepository::try_new(conn).unwrap(), clock);
    service
        .create_workspace(
            OWNER,
            &CreateWorkspaceRequest {
                title: "Spaced".to_string(),
                goal: None,
                emoji: None,
            },
        )
        .unwrap()
}

fn make_review_item(
    conn: &rusqlite::Connection,
    clock: &FixedClock,
    workspace_uuid: Uuid,
    title: &str,
) -> Uuid {
    let service = HierarchyService::new(SqliteHierarchyRepository::try_new(conn).unwrap(), clock);
    let item = service
        .create_item(
            OWNER,
            &CreateItemRequest {
                workspace_uuid,
                folder_uuid: None,
                kind: ItemType::Note,
                title: title.to_string(),
                url: None,
                note: None,
                tags: Vec::new(),
                resource_id: None,
                document_id: None,
            },
        )
        .unwrap();
    service
        .update_item(
            OWNER,
            item.uuid,
            &ItemPatch {
                review_enabled: Some(true),
                ..ItemPatch::default()
            },
        )
        .unwrap();
    item.uuid
}

#[test]
fn record_review_requires_review_enabled() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let workspace = make_workspace(&conn, &clock);
    let hierarchy =
        HierarchyService::new(SqliteHierarchyRepository::try_new(&conn).unwrap(), &clock);
    let reviews = ReviewService::new(
        SqliteHierarchyRepository::try_new(&conn).unwrap(),
        SqliteWorkspaceRepository::try_new(&conn).unwrap(),
        &clock,
    );

    let plain = hierarchy
        .create_item(
            OWNER,
            &CreateItemRequest {
                workspace_uuid: workspace.uuid,
                folder_uuid: None,
                kind: ItemType::Note,
                title: "Not scheduled".to_string(),
                url: None,
                note: None,
                tags: Vec::new(),
                resource_id: None,
                document_id: None,
            },
        )
        .unwrap();

    let err = reviews.record_review(OWNER, plain.uuid).unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn successive_reviews_double_the_interval_up_to_the_cap() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let workspace = make_workspace(&conn, &clock);
    let item_uuid = make_review_item(&conn, &clock, workspace.uuid, "Doubling");
    let reviews = ReviewService::new(
        SqliteHierarchyRepository::try_new(&conn).unwrap(),
        SqliteWorkspaceRepository::try_new(&conn).unwrap(),
        &clock,
    );

    // Nth call (stage N-1 before the call): interval = min(60, 2^(N-1)).
    let expected_days = [1, 2, 4, 8, 16, 32, 60, 60, 60];
    for (call, expected) in expected_days.iter().enumerate() {
        let reviewed = reviews.record_review(OWNER, item_uuid).unwrap();
        assert_eq!(reviewed.review_stage as usize, call + 1);
        let next = reviewed.next_review_at.unwrap();
        let last = reviewed.last_reviewed_at.unwrap();
        assert_eq!(next - last, expected * MS_PER_DAY, "call {}", call + 1);
    }
}

#[test]
fn scenario_two_immediate_reviews() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let workspace = make_workspace(&conn, &clock);
    let item_uuid = make_review_item(&conn, &clock, workspace.uuid, "Fresh");
    let reviews = ReviewService::new(
        SqliteHierarchyRepository::try_new(&conn).unwrap(),
        SqliteWorkspaceRepository::try_new(&conn).unwrap(),
        &clock,
    );

    let first = reviews.record_review(OWNER, item_uuid).unwrap();
    assert_eq!(first.review_stage, 1);
    assert_eq!(first.next_review_at, Some(T0 + MS_PER_DAY));

    // Early review: the item is not due, but the schedule still advances.
    let second = reviews.record_review(OWNER, item_uuid).unwrap();
    assert_eq!(second.review_stage, 2);
    assert_eq!(second.next_review_at, Some(T0 + 2 * MS_PER_DAY));
}

#[test]
fn due_now_orders_most_overdue_first_and_treats_absent_as_due() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let workspace = make_workspace(&conn, &clock);
    let reviews = ReviewService::new(
        SqliteHierarchyRepository::try_new(&conn).unwrap(),
        SqliteWorkspaceRepository::try_new(&conn).unwrap(),
        &clock,
    );

    let overdue_far = make_review_item(&conn, &clock, workspace.uuid, "Very overdue");
    let overdue_near = make_review_item(&conn, &clock, workspace.uuid, "Slightly overdue");
    let not_due = make_review_item(&conn, &clock, workspace.uuid, "Future");
    let legacy = make_review_item(&conn, &clock, workspace.uuid, "Legacy row");

    // Shape the queue directly: due-dates in the past, future, and a
    // review-enabled row that predates scheduling (no due date at all).
    conn.execute(
        "UPDATE items SET next_review_at = ?1 WHERE item_uuid = ?2;",
        rusqlite::params![T0 - 3 * MS_PER_DAY, overdue_far.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE items SET next_review_at = ?1 WHERE item_uuid = ?2;",
        rusqlite::params![T0 - MS_PER_DAY, overdue_near.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE items SET next_review_at = ?1 WHERE item_uuid = ?2;",
        rusqlite::params![T0 + 5 * MS_PER_DAY, not_due.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE items SET next_review_at = NULL WHERE item_uuid = ?1;",
        [legacy.to_string()],
    )
    .unwrap();

    let due = reviews.due_now(OWNER, workspace.uuid).unwrap();
    let ids: Vec<Uuid> = due.iter().map(|item| item.uuid).collect();
    assert_eq!(ids, [legacy, overdue_far, overdue_near]);
}

#[test]
fn toggling_off_then_on_resets_stage_but_keeps_history() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let workspace = make_workspace(&conn, &clock);
    let item_uuid = make_review_item(&conn, &clock, workspace.uuid, "Toggled");
    let hierarchy =
        HierarchyService::new(SqliteHierarchyRepository::try_new(&conn).unwrap(), &clock);
    let reviews = ReviewService::new(
        SqliteHierarchyRepository::try_new(&conn).unwrap(),
        SqliteWorkspaceRepository::try_new(&conn).unwrap(),
        &clock,
    );

    for _ in 0..3 {
        reviews.record_review(OWNER, item_uuid).unwrap();
    }
    let reviewed = hierarchy.get_item(OWNER, item_uuid).unwrap();
    assert_eq!(reviewed.review_stage, 3);
    let history = reviewed.last_reviewed_at.unwrap();

    let disabled = hierarchy
        .update_item(
            OWNER,
            item_uuid,
            &ItemPatch {
                review_enabled: Some(false),
                ..ItemPatch::default()
            },
        )
        .unwrap();
    assert_eq!(disabled.next_review_at, None);
    assert_eq!(disabled.review_stage, 3);
    assert_eq!(disabled.last_reviewed_at, Some(history));

    clock.advance_days(10);
    let reenabled = hierarchy
        .update_item(
            OWNER,
            item_uuid,
            &ItemPatch {
                review_enabled: Some(true),
                ..ItemPatch::default()
            },
        )
        .unwrap();
    assert_eq!(reenabled.review_stage, 0);
    assert_eq!(reenabled.next_review_at, Some(T0 + 10 * MS_PER_DAY));
    assert_eq!(reenabled.last_reviewed_at, Some(history));

    // Immediately due again.
    let due = reviews.due_now(OWNER, workspace.uuid).unwrap();
    assert!(due.iter().any(|item| item.uuid == item_uuid));
}

#[test]
fn due_now_for_foreign_workspace_is_not_found() {
    let conn = setup();
    let clock = FixedClock::new(T0);
    let workspace = make_workspace(&conn, &clock);
    let reviews = ReviewService::new(
        SqliteHierarchyRepository::try_new(&conn).unwrap(),
        SqliteWorkspaceRepository::try_new(&conn).unwrap(),
        &clock,
    );

    let err = reviews.due_now("someone-else", workspace.uuid).unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}
