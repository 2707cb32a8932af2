use tokio::net::TcpListener;
use uuid::Uuid;
use zentask_cli::{ApiClient, ClientError, Session};
use zentask_core::db::open_db_in_memory;
use zentask_core::{
    LoginRequest, NewProject, NewTask, SignupRequest, TaskPatch, TaskQueryParams, TaskStatus,
    TokenKeys,
};
use zentask_server::{build_router, AppState, Store};

async fn start_server() -> Session {
    let store = Store::from_connection(open_db_in_memory().unwrap());
    let app = build_router(AppState::new(store, TokenKeys::from_secret("cli-secret")));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Session::anonymous(format!("http://{addr}"))
}

async fn logged_in(client: &ApiClient, anonymous: &Session) -> Session {
    let signup = SignupRequest {
        name: Some("Cli".to_string()),
        email: Some("cli@example.com".to_string()),
        password: Some("password123".to_string()),
    };
    let auth = client.signup(anonymous, &signup).await.unwrap();
    anonymous.clone().with_token(auth.token)
}

fn new_task(project_id: Uuid, title: &str) -> NewTask {
    NewTask {
        title: Some(title.to_string()),
        deadline: Some("2025-09-30".to_string()),
        project_id: Some(project_id.to_string()),
        ..NewTask::default()
    }
}

#[tokio::test]
async fn protected_calls_need_a_token() {
    let anonymous = start_server().await;
    let client = ApiClient::new();

    let err = client.list_projects(&anonymous).await.unwrap_err();
    assert!(matches!(err, ClientError::NotLoggedIn));

    let forged = anonymous.clone().with_token("not-a-jwt");
    let err = client.list_projects(&forged).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn login_errors_carry_the_server_message() {
    let anonymous = start_server().await;
    let client = ApiClient::new();
    logged_in(&client, &anonymous).await;

    let err = client
        .login(
            &anonymous,
            &LoginRequest {
                email: Some("cli@example.com".to_string()),
                password: Some("nope".to_string()),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().starts_with("Invalid email or password"));

    assert_eq!(client.logout(&anonymous).await.unwrap(), "Logged out successfully");
}

#[tokio::test]
async fn project_and_task_round_trip() {
    let anonymous = start_server().await;
    let client = ApiClient::new();
    let session = logged_in(&client, &anonymous).await;

    let project = client
        .create_project(&session, &NewProject::named("Client Project"))
        .await
        .unwrap();
    let task = client
        .create_task(&session, &new_task(project.id, "first"))
        .await
        .unwrap();
    assert_eq!(task.status, TaskStatus::Todo);

    let params = TaskQueryParams {
        status: Some("todo".to_string()),
        ..TaskQueryParams::default()
    };
    let listed = client
        .list_tasks(&session, Some(project.id), &params)
        .await
        .unwrap();
    assert_eq!(listed, vec![task.clone()]);

    let patch = TaskPatch {
        title: Some("renamed".to_string()),
        ..TaskPatch::default()
    };
    let updated = client.update_task(&session, task.id, &patch).await.unwrap();
    assert_eq!(updated.title, "renamed");

    let message = client.delete_task(&session, task.id).await.unwrap();
    assert_eq!(message, "Task deleted successfully");
    let err = client.delete_task(&session, task.id).await.unwrap_err();
    assert_eq!(err.status(), Some(404));

    let fetched = client.get_project(&session, project.id).await.unwrap();
    assert_eq!(fetched, project);

    let deleted = client.delete_project(&session, project.id).await.unwrap();
    assert_eq!(deleted.id, project.id);
    assert!(client.list_projects(&session).await.unwrap().is_empty());
    let err = client.get_project(&session, project.id).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn board_move_commits_on_success() {
    let anonymous = start_server().await;
    let client = ApiClient::new();
    let session = logged_in(&client, &anonymous).await;
    let project = client
        .create_project(&session, &NewProject::named("Board"))
        .await
        .unwrap();
    let task = client
        .create_task(&session, &new_task(project.id, "card"))
        .await
        .unwrap();

    let mut board = client
        .board(&session, project.id, &TaskQueryParams::default())
        .await
        .unwrap();
    let moved = client
        .move_task(&session, &mut board, task.id, TaskStatus::InProgress)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(moved.status, TaskStatus::InProgress);
    assert!(board.column(TaskStatus::Todo).tasks.is_empty());
    assert_eq!(board.column(TaskStatus::InProgress).tasks, vec![moved.clone()]);

    let fresh = client
        .board(&session, project.id, &TaskQueryParams::default())
        .await
        .unwrap();
    assert_eq!(fresh, board);

    let unchanged = client
        .move_task(&session, &mut board, task.id, TaskStatus::InProgress)
        .await
        .unwrap();
    assert!(unchanged.is_none());
}

#[tokio::test]
async fn board_move_rolls_back_when_server_rejects() {
    let anonymous = start_server().await;
    let client = ApiClient::new();
    let session = logged_in(&client, &anonymous).await;
    let project = client
        .create_project(&session, &NewProject::named("Board"))
        .await
        .unwrap();
    let keep = client
        .create_task(&session, &new_task(project.id, "keep"))
        .await
        .unwrap();
    let gone = client
        .create_task(&session, &new_task(project.id, "gone"))
        .await
        .unwrap();

    let mut board = client
        .board(&session, project.id, &TaskQueryParams::default())
        .await
        .unwrap();
    let before = board.clone();
    client.delete_task(&session, gone.id).await.unwrap();

    let err = client
        .move_task(&session, &mut board, gone.id, TaskStatus::Done)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(board, before);
    assert!(board.find(keep.id).is_some());

    let err = client
        .move_task(&session, &mut board, Uuid::new_v4(), TaskStatus::Done)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Board(_)));
    assert_eq!(board, before);
}

#[tokio::test]
async fn dashboard_summarizes_everything() {
    let anonymous = start_server().await;
    let client = ApiClient::new();
    let session = logged_in(&client, &anonymous).await;
    let project = client
        .create_project(&session, &NewProject::named("Dash"))
        .await
        .unwrap();
    client
        .create_task(&session, &new_task(project.id, "old"))
        .await
        .unwrap();

    let stats = client.dashboard(&session).await.unwrap();
    assert_eq!(stats.total_projects, 1);
    assert_eq!(stats.total_tasks, 1);
    assert_eq!(stats.by_status.todo, 1);
    assert_eq!(stats.overdue.len(), 1);
}
