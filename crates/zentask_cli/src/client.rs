//! Typed HTTP client for the Zentask API.
//!
//! # Responsibility
//! - Map every endpoint to one async method taking an explicit [`Session`].
//! - Surface the server's `{message}` on failures.
//! - Drive board moves pessimistically: apply locally, call the server, then
//!   commit or roll back.

use crate::session::Session;
use log::{debug, warn};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use zentask_core::{
    AuthSession, Board, BoardError, DashboardStats, LoginRequest, NewProject, NewTask, Project,
    ProjectId, SignupRequest, Task, TaskId, TaskPatch, TaskQueryParams, TaskStatus,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("not logged in; run `zentask login` first")]
    NotLoggedIn,
    /// Non-success response; `message` is the server's own text.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Board(#[from] BoardError),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ApiClient {
    http: Client,
}

impl ApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn signup(
        &self,
        session: &Session,
        request: &SignupRequest,
    ) -> Result<AuthSession, ClientError> {
        let builder = self.http.post(session.url("/api/auth/signup")).json(request);
        self.send(builder).await
    }

    pub async fn login(
        &self,
        session: &Session,
        request: &LoginRequest,
    ) -> Result<AuthSession, ClientError> {
        let builder = self.http.post(session.url("/api/auth/login")).json(request);
        self.send(builder).await
    }

    /// Returns the server's acknowledgement text.
    pub async fn logout(&self, session: &Session) -> Result<String, ClientError> {
        let builder = self.http.post(session.url("/api/auth/logout"));
        let body: MessageBody = self.send(builder).await?;
        Ok(body.message)
    }

    pub async fn list_projects(&self, session: &Session) -> Result<Vec<Project>, ClientError> {
        let builder = self.authed(session, Method::GET, "/api/projects")?;
        self.send(builder).await
    }

    pub async fn create_project(
        &self,
        session: &Session,
        payload: &NewProject,
    ) -> Result<Project, ClientError> {
        let builder = self
            .authed(session, Method::POST, "/api/projects")?
            .json(payload);
        self.send(builder).await
    }

    pub async fn get_project(&self, session: &Session, id: ProjectId) -> Result<Project, ClientError> {
        let builder = self.authed(session, Method::GET, &format!("/api/projects/{id}"))?;
        self.send(builder).await
    }

    pub async fn delete_project(
        &self,
        session: &Session,
        id: ProjectId,
    ) -> Result<Project, ClientError> {
        let builder = self.authed(session, Method::DELETE, &format!("/api/projects/{id}"))?;
        self.send(builder).await
    }

    /// Lists tasks of one project, or of every project when `project` is `None`.
    pub async fn list_tasks(
        &self,
        session: &Session,
        project: Option<ProjectId>,
        params: &TaskQueryParams,
    ) -> Result<Vec<Task>, ClientError> {
        let path = match project {
            Some(id) => format!("/api/tasks/project/{id}"),
            None => "/api/tasks".to_string(),
        };
        let builder = self.authed(session, Method::GET, &path)?.query(params);
        self.send(builder).await
    }

    pub async fn create_task(&self, session: &Session, payload: &NewTask) -> Result<Task, ClientError> {
        let builder = self.authed(session, Method::POST, "/api/tasks")?.json(payload);
        self.send(builder).await
    }

    pub async fn update_task(
        &self,
        session: &Session,
        id: TaskId,
        patch: &TaskPatch,
    ) -> Result<Task, ClientError> {
        let builder = self
            .authed(session, Method::PUT, &format!("/api/tasks/{id}"))?
            .json(patch);
        self.send(builder).await
    }

    pub async fn delete_task(&self, session: &Session, id: TaskId) -> Result<String, ClientError> {
        let builder = self.authed(session, Method::DELETE, &format!("/api/tasks/{id}"))?;
        let body: MessageBody = self.send(builder).await?;
        Ok(body.message)
    }

    pub async fn board(
        &self,
        session: &Session,
        project: ProjectId,
        params: &TaskQueryParams,
    ) -> Result<Board, ClientError> {
        let builder = self
            .authed(session, Method::GET, &format!("/api/tasks/project/{project}/board"))?
            .query(params);
        self.send(builder).await
    }

    pub async fn dashboard(&self, session: &Session) -> Result<DashboardStats, ClientError> {
        let builder = self.authed(session, Method::GET, "/api/dashboard")?;
        self.send(builder).await
    }

    /// Moves a card on `board` and persists the new status.
    ///
    /// The board shows the move while the request is in flight. On success the
    /// server's record replaces the local card; on failure the board is
    /// restored exactly and the server error is returned. `Ok(None)` means the
    /// card was already in `to` and no request was made.
    pub async fn move_task(
        &self,
        session: &Session,
        board: &mut Board,
        task_id: TaskId,
        to: TaskStatus,
    ) -> Result<Option<Task>, ClientError> {
        let Some(pending) = board.apply_move(task_id, to)? else {
            return Ok(None);
        };

        match self.update_task(session, task_id, &TaskPatch::status(to)).await {
            Ok(confirmed) => {
                board.commit(pending, confirmed.clone())?;
                debug!("event=board_move module=client status=ok task_id={task_id} to={to}");
                Ok(Some(confirmed))
            }
            Err(err) => {
                board.rollback(pending)?;
                warn!("event=board_move module=client status=error task_id={task_id} to={to} error={err}");
                Err(err)
            }
        }
    }

    fn authed(
        &self,
        session: &Session,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, ClientError> {
        let token = session.token.as_deref().ok_or(ClientError::NotLoggedIn)?;
        Ok(self.http.request(method, session.url(path)).bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<MessageBody>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
