mod common;

use common::spawn_app;
use serde_json::{json, Value};
use uuid::Uuid;

#[tokio::test]
async fn projects_list_newest_first_with_owner() {
    let app = spawn_app().await;
    let token = app.token("owner@example.com").await;

    let first = app.create_project(&token, "First").await;
    app.create_project(&token, "Second").await;
    assert!(first["owner"].is_string());
    assert!(first["createdAt"].is_string());

    let (status, listed) = app.get_json(&token, "/api/projects").await;
    assert_eq!(status, 200);
    let names: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|project| project["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Second", "First"]);
}

#[tokio::test]
async fn project_name_is_required() {
    let app = spawn_app().await;
    let token = app.token("owner@example.com").await;

    let response = app
        .client
        .post(app.url("/api/projects"))
        .bearer_auth(&token)
        .json(&json!({ "name": "  ", "description": "blank" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Project name is required");
}

#[tokio::test]
async fn get_project_by_id() {
    let app = spawn_app().await;
    let token = app.token("owner@example.com").await;
    let project = app.create_project(&token, "Lookup").await;
    let id = project["id"].as_str().unwrap();

    let (status, fetched) = app.get_json(&token, &format!("/api/projects/{id}")).await;
    assert_eq!(status, 200);
    assert_eq!(fetched["name"], "Lookup");
    assert_eq!(fetched["id"], project["id"]);

    for id in ["nope".to_string(), Uuid::new_v4().to_string()] {
        let (status, body) = app.get_json(&token, &format!("/api/projects/{id}")).await;
        assert_eq!(status, 404);
        assert_eq!(body["message"], "Project not found");
    }

    let response = app
        .client
        .get(app.url(&format!("/api/projects/{}", project["id"].as_str().unwrap())))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn delete_project_returns_it_once() {
    let app = spawn_app().await;
    let token = app.token("owner@example.com").await;
    let project = app.create_project(&token, "Doomed").await;
    let path = format!("/api/projects/{}", project["id"].as_str().unwrap());

    let response = app
        .client
        .delete(app.url(&path))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "Doomed");

    let response = app
        .client
        .delete(app.url(&path))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    for id in ["nope".to_string(), Uuid::new_v4().to_string()] {
        let response = app
            .client
            .delete(app.url(&format!("/api/projects/{id}")))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }
}

#[tokio::test]
async fn dashboard_counts_statuses_and_overdue_tasks() {
    let app = spawn_app().await;
    let token = app.token("owner@example.com").await;
    let project = app.create_project(&token, "Dash").await;
    let project_id = project["id"].as_str().unwrap();

    for (title, status, deadline) in [
        ("past todo", "todo", "2020-01-02T00:00:00Z"),
        ("past done", "done", "2020-01-01T00:00:00Z"),
        ("future", "in-progress", "2099-01-01T00:00:00Z"),
    ] {
        let response = app
            .create_task(
                &token,
                json!({ "title": title, "status": status, "deadline": deadline,
                    "projectId": project_id }),
            )
            .await;
        assert_eq!(response.status(), 201);
    }

    let (status, stats) = app.get_json(&token, "/api/dashboard").await;
    assert_eq!(status, 200);
    assert_eq!(stats["totalProjects"], 1);
    assert_eq!(stats["totalTasks"], 3);
    assert_eq!(stats["byStatus"]["todo"], 1);
    assert_eq!(stats["byStatus"]["in-progress"], 1);
    assert_eq!(stats["byStatus"]["done"], 1);
    let overdue: Vec<&str> = stats["overdue"]
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap())
        .collect();
    assert_eq!(overdue, vec!["past done", "past todo"]);
}
