//! CLI smoke entry point.
//!
//! # Responsibility
//! - Exercise the core service stack end-to-end against an in-memory store.
//! - Keep output deterministic for quick local sanity checks.

use studydesk_core::db::open_db_in_memory;
use studydesk_core::{
    BuiltinTemplateCatalog, CreateTodoRequest, FocusKind, FocusService, ReviewService,
    SqliteHierarchyRepository, SqliteTodoRepository, SqliteWorkspaceRepository, SystemClock,
    TemplateService, TodoPatch, TodoService, WorkspaceService,
};

fn main() {
    if let Err(err) = run() {
        eprintln!("studydesk smoke probe failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    const OWNER: &str = "smoke-probe";
    let clock = SystemClock;

    let conn = open_db_in_memory()?;
    let workspaces = SqliteWorkspaceRepository::try_new(&conn)?;
    let hierarchy = SqliteHierarchyRepository::try_new(&conn)?;
    let todos = SqliteTodoRepository::try_new(&conn)?;

    let workspace_service = WorkspaceService::new(SqliteWorkspaceRepository::try_new(&conn)?, clock);
    let template_service =
        TemplateService::new(workspaces, BuiltinTemplateCatalog::new(), clock);
    let review_service = ReviewService::new(
        hierarchy,
        SqliteWorkspaceRepository::try_new(&conn)?,
        clock,
    );
    let todo_service = TodoService::new(todos, SqliteWorkspaceRepository::try_new(&conn)?, clock);
    let focus_service = FocusService::new(SqliteWorkspaceRepository::try_new(&conn)?, clock);

    println!("studydesk_core version={}", studydesk_core::core_version());

    let workspace = template_service.instantiate(OWNER, "rust-fundamentals")?;
    println!(
        "instantiated template=rust-fundamentals mode={:?} level={}",
        workspace.mode,
        workspace.level()
    );

    let due_before = review_service.due_now(OWNER, workspace.uuid)?;
    println!("due_before_review={}", due_before.len());

    let first_due = due_before
        .first()
        .ok_or("template should seed at least one due item")?;
    let reviewed = review_service.record_review(OWNER, first_due.uuid)?;
    println!(
        "reviewed item stage={} next_in_queue={}",
        reviewed.review_stage,
        review_service.due_now(OWNER, workspace.uuid)?.len()
    );

    let todo = todo_service.create_todo(
        OWNER,
        &CreateTodoRequest {
            workspace_uuid: workspace.uuid,
            item_uuid: Some(reviewed.uuid),
            text: "Re-derive the borrow checker rules".to_string(),
            due_at: None,
            priority: None,
            kind: None,
        },
    )?;
    todo_service.update_todo(
        OWNER,
        todo.uuid,
        &TodoPatch {
            done: Some(true),
            ..TodoPatch::default()
        },
    )?;

    focus_service.add_focus(OWNER, workspace.uuid, FocusKind::Item, reviewed.uuid)?;
    println!(
        "focus_size={}",
        focus_service.focus_list(OWNER, workspace.uuid)?.len()
    );

    let refreshed = workspace_service.get_workspace(OWNER, workspace.uuid)?;
    println!(
        "xp={} level={} streak={}",
        refreshed.xp,
        refreshed.level(),
        refreshed.streak_count
    );

    Ok(())
}
