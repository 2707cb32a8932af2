use chrono::{DateTime, Duration, TimeZone, Utc};
use rusqlite::Connection;
use uuid::Uuid;
use zentask_core::db::open_db_in_memory;
use zentask_core::{
    NewProject, NewTask, Pagination, ProjectService, RecordKind, ServiceError,
    SqliteProjectRepository, SqliteTaskRepository, Task, TaskFilter, TaskPatch, TaskPriority,
    TaskService, TaskStatus, ValidationError,
};

fn new_project(conn: &Connection, name: &str) -> Uuid {
    ProjectService::new(SqliteProjectRepository::new(conn))
        .create_project(&NewProject::named(name), None)
        .unwrap()
        .id
}

fn sept(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, day, 0, 0, 0).unwrap()
}

fn payload(project_id: Uuid, title: &str, deadline: DateTime<Utc>) -> NewTask {
    NewTask {
        title: Some(title.to_string()),
        status: None,
        priority: None,
        deadline: Some(deadline.to_rfc3339()),
        project_id: Some(project_id.to_string()),
    }
}

fn titles(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.title.as_str()).collect()
}

#[test]
fn create_fetch_update_delete_scenario() {
    let conn = open_db_in_memory().unwrap();
    let project_id = new_project(&conn, "Test Project");
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let created = service
        .create_task(&NewTask {
            status: Some(TaskStatus::Todo),
            priority: Some(TaskPriority::Medium),
            ..payload(project_id, "Test Task", sept(30))
        })
        .unwrap();
    assert_eq!(created.title, "Test Task");
    assert_eq!(created.status, TaskStatus::Todo);

    let listed = service
        .list_project_tasks(project_id, &TaskFilter::default(), Pagination::default())
        .unwrap();
    assert!(listed.iter().any(|task| task.id == created.id));

    let updated = service
        .update_task(
            created.id,
            &TaskPatch {
                status: Some(TaskStatus::InProgress),
                title: Some("Updated Task".to_string()),
                ..TaskPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.title, "Updated Task");
    assert_eq!(service.get_task(created.id).unwrap(), updated);

    service.delete_task(created.id).unwrap();
    let listed = service
        .list_project_tasks(project_id, &TaskFilter::default(), Pagination::default())
        .unwrap();
    assert!(listed.iter().all(|task| task.id != created.id));
}

#[test]
fn create_requires_title_and_project() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let err = service
        .create_task(&NewTask {
            title: None,
            ..payload(Uuid::new_v4(), "", sept(1))
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::MissingField("Task title is required"))
    ));

    let err = service
        .create_task(&NewTask {
            project_id: None,
            ..payload(Uuid::new_v4(), "no project", sept(1))
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "Project ID is required");

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn project_scope_only_returns_that_project() {
    let conn = open_db_in_memory().unwrap();
    let ours = new_project(&conn, "ours");
    let theirs = new_project(&conn, "theirs");
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    for i in 0..3 {
        service.create_task(&payload(ours, &format!("ours {i}"), sept(1))).unwrap();
        service.create_task(&payload(theirs, &format!("theirs {i}"), sept(1))).unwrap();
    }

    let listed = service
        .list_project_tasks(ours, &TaskFilter::default(), Pagination::new(None, Some(50)))
        .unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed.iter().all(|task| task.project_id == ours));

    let everything = service
        .list_all_tasks(&TaskFilter::default(), Pagination::new(None, Some(50)))
        .unwrap();
    assert_eq!(everything.len(), 6);
}

#[test]
fn pagination_windows_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let project_id = new_project(&conn, "paged");
    let service = TaskService::new(SqliteTaskRepository::new(&conn));
    for i in 0..23 {
        service
            .create_task(&payload(project_id, &format!("task {i:02}"), sept(1)))
            .unwrap();
    }

    let all = service
        .list_project_tasks(project_id, &TaskFilter::default(), Pagination::new(None, Some(100)))
        .unwrap();
    assert_eq!(all.first().map(|task| task.title.as_str()), Some("task 22"));
    assert_eq!(all.last().map(|task| task.title.as_str()), Some("task 00"));

    for (page, limit) in [(1, 10), (2, 10), (3, 10), (4, 10), (1, 1), (5, 5), (2, 30)] {
        let window = Pagination::new(Some(page), Some(limit));
        let got = service
            .list_project_tasks(project_id, &TaskFilter::default(), window)
            .unwrap();
        assert!(got.len() <= limit as usize);
        assert_eq!(titles(&got), titles(window.window(&all)), "page={page} limit={limit}");
    }

    let defaults = service
        .list_project_tasks(project_id, &TaskFilter::default(), Pagination::new(Some(0), Some(-1)))
        .unwrap();
    assert_eq!(defaults.len(), 10);
}

#[test]
fn filters_match_in_memory_predicate() {
    let conn = open_db_in_memory().unwrap();
    let project_id = new_project(&conn, "filtered");
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let statuses = TaskStatus::ALL;
    let priorities = TaskPriority::ALL;
    for day in 1..=12u32 {
        service
            .create_task(&NewTask {
                status: Some(statuses[day as usize % 3]),
                priority: Some(priorities[(day as usize / 3) % 3]),
                ..payload(project_id, &format!("day {day}"), sept(day))
            })
            .unwrap();
    }
    let all = service
        .list_project_tasks(project_id, &TaskFilter::default(), Pagination::new(None, Some(100)))
        .unwrap();

    let filters = [
        TaskFilter {
            status: Some(TaskStatus::Done),
            ..TaskFilter::default()
        },
        TaskFilter {
            priority: Some(TaskPriority::High),
            status: Some(TaskStatus::Todo),
            ..TaskFilter::default()
        },
        TaskFilter {
            deadline_from: Some(sept(4)),
            deadline_to: Some(sept(9)),
            ..TaskFilter::default()
        },
        TaskFilter {
            deadline_to: Some(sept(2)),
            ..TaskFilter::default()
        },
    ];
    for filter in filters {
        let got = service
            .list_project_tasks(project_id, &filter, Pagination::new(None, Some(100)))
            .unwrap();
        let expected: Vec<&Task> = all.iter().filter(|task| filter.matches(task)).collect();
        assert_eq!(got.iter().collect::<Vec<_>>(), expected, "{filter:?}");
    }
}

#[test]
fn start_date_bound_is_inclusive() {
    let conn = open_db_in_memory().unwrap();
    let project_id = new_project(&conn, "bounds");
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let on_start = service.create_task(&payload(project_id, "on start", sept(10))).unwrap();
    let day_before = service
        .create_task(&payload(project_id, "day before", sept(10) - Duration::days(1)))
        .unwrap();

    let filter = TaskFilter {
        deadline_from: Some(sept(10)),
        ..TaskFilter::default()
    };
    let got = service
        .list_project_tasks(project_id, &filter, Pagination::default())
        .unwrap();
    assert!(got.iter().any(|task| task.id == on_start.id));
    assert!(got.iter().all(|task| task.id != day_before.id));
}

#[test]
fn move_task_allows_free_transitions() {
    let conn = open_db_in_memory().unwrap();
    let project_id = new_project(&conn, "board");
    let service = TaskService::new(SqliteTaskRepository::new(&conn));
    let task = service.create_task(&payload(project_id, "card", sept(5))).unwrap();

    for status in [TaskStatus::Done, TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done] {
        let moved = service.move_task(task.id, status).unwrap();
        assert_eq!(moved.status, status);
        assert_eq!(moved.title, "card");
    }

    let board = service.project_board(project_id, &TaskFilter::default()).unwrap();
    assert_eq!(board.column(TaskStatus::Done).tasks.len(), 1);
    assert!(board.column(TaskStatus::Todo).tasks.is_empty());
}

#[test]
fn update_and_delete_missing_task_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let project_id = new_project(&conn, "missing");
    let service = TaskService::new(SqliteTaskRepository::new(&conn));
    let task = service.create_task(&payload(project_id, "short lived", sept(5))).unwrap();

    service.delete_task(task.id).unwrap();
    let err = service.delete_task(task.id).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            kind: RecordKind::Task,
            ..
        }
    ));
    assert_eq!(err.to_string(), "Task not found");

    let err = service
        .update_task(task.id, &TaskPatch::status(TaskStatus::Done))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { id, .. } if id == task.id));
}
