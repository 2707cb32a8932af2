#![allow(dead_code)]

use reqwest::Client;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use zentask_core::db::open_db_in_memory;
use zentask_core::TokenKeys;
use zentask_server::{build_router, AppState, Store};

pub const SECRET: &str = "integration-secret";

pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Signs up a fresh account and returns its bearer token.
    pub async fn token(&self, email: &str) -> String {
        let response = self
            .client
            .post(self.url("/api/auth/signup"))
            .json(&json!({ "name": "Tester", "email": email, "password": "password123" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
        let body: Value = response.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn create_project(&self, token: &str, name: &str) -> Value {
        let response = self
            .client
            .post(self.url("/api/projects"))
            .bearer_auth(token)
            .json(&json!({ "name": name }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
        response.json().await.unwrap()
    }

    pub async fn create_task(&self, token: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/tasks"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn get_json(&self, token: &str, path: &str) -> (u16, Value) {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }
}

/// Starts the full router over a fresh in-memory database on a random port.
pub async fn spawn_app() -> TestApp {
    let store = Store::from_connection(open_db_in_memory().unwrap());
    let app = build_router(AppState::new(store, TokenKeys::from_secret(SECRET)));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        addr,
        client: Client::new(),
    }
}
