//! `zentask` command-line entry point.
//!
//! # Responsibility
//! - Parse commands and global options.
//! - Load the saved session, call the API, print results.
//! - Persist or clear the session on login, signup and logout.

use anyhow::{anyhow, bail, Context};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use uuid::Uuid;
use zentask_cli::render::{project_line, render_board, render_dashboard, render_tasks, task_line};
use zentask_cli::{default_session_path, ApiClient, Session, DEFAULT_BASE_URL};
use zentask_core::model::time::parse_timestamp;
use zentask_core::{
    init_logging, LoginRequest, NewProject, NewTask, SignupRequest, TaskPatch, TaskPriority,
    TaskQueryParams, TaskStatus,
};

#[derive(Parser)]
#[command(name = "zentask", version, about = "Projects, tasks and a kanban board from your terminal")]
struct Cli {
    /// API base URL; overrides the saved session
    #[arg(long, env = "ZENTASK_URL", global = true)]
    base_url: Option<String>,

    /// Session file path
    #[arg(long, env = "ZENTASK_SESSION_FILE", global = true)]
    session: Option<PathBuf>,

    /// Log level written to stderr: trace|debug|info|warn|error
    #[arg(long, env = "ZENTASK_LOG_LEVEL", global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Log in and save the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Forget the saved session
    Logout,

    /// Manage projects
    #[command(subcommand)]
    Projects(ProjectCommands),

    /// Manage tasks
    #[command(subcommand)]
    Tasks(TaskCommands),

    /// Show a project's kanban board
    Board {
        project: Uuid,
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Move a task to another board column
    Move {
        project: Uuid,
        task: Uuid,
        #[arg(value_enum)]
        to: StatusArg,
    },

    /// Show project and task totals plus overdue tasks
    Dashboard,
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// List every project, newest first
    List,
    /// Create a project
    Create {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Show one project
    Show { id: Uuid },
    /// Delete a project (its tasks are kept)
    Delete { id: Uuid },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List tasks, optionally for one project
    List {
        #[arg(short, long)]
        project: Option<Uuid>,
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Add a task to a project
    Add {
        #[arg(short, long)]
        project: Uuid,
        title: String,
        /// RFC 3339 timestamp or YYYY-MM-DD
        #[arg(short, long)]
        deadline: String,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
    },
    /// Change fields of a task
    Update {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
        #[arg(long)]
        deadline: Option<String>,
    },
    /// Delete a task
    Delete { id: Uuid },
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long, value_enum)]
    status: Option<StatusArg>,
    #[arg(long, value_enum)]
    priority: Option<PriorityArg>,
    /// Inclusive lower deadline bound
    #[arg(long)]
    from: Option<String>,
    /// Inclusive upper deadline bound
    #[arg(long)]
    to: Option<String>,
}

impl FilterArgs {
    fn query(&self, page: Option<u32>, limit: Option<u32>) -> TaskQueryParams {
        TaskQueryParams {
            status: self.status.map(|status| TaskStatus::from(status).as_str().to_string()),
            priority: self
                .priority
                .map(|priority| TaskPriority::from(priority).as_str().to_string()),
            start_date: self.from.clone(),
            end_date: self.to.clone(),
            page: page.map(|value| value.to_string()),
            limit: limit.map(|value| value.to_string()),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Todo,
    InProgress,
    Done,
}

impl From<StatusArg> for TaskStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Todo => Self::Todo,
            StatusArg::InProgress => Self::InProgress,
            StatusArg::Done => Self::Done,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for TaskPriority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::Low => Self::Low,
            PriorityArg::Medium => Self::Medium,
            PriorityArg::High => Self::High,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(&cli.log_level, None)
        .map_err(|message| anyhow!("logging init failed: {message}"))?;

    let session_path = cli.session.clone().unwrap_or_else(default_session_path);
    let saved = Session::load(&session_path)
        .with_context(|| format!("failed to read session `{}`", session_path.display()))?;
    let session = match (saved, cli.base_url.as_deref()) {
        (Some(saved), Some(url)) => Session {
            base_url: Session::anonymous(url).base_url,
            ..saved
        },
        (Some(saved), None) => saved,
        (None, url) => Session::anonymous(url.unwrap_or(DEFAULT_BASE_URL)),
    };

    let client = ApiClient::new();
    match cli.command {
        Commands::Signup {
            name,
            email,
            password,
        } => {
            let request = SignupRequest {
                name: Some(name),
                email: Some(email),
                password: Some(password),
            };
            let auth = client.signup(&session, &request).await?;
            session.with_token(auth.token).save(&session_path)?;
            println!("signed up as {} <{}>", auth.user.name, auth.user.email);
        }
        Commands::Login { email, password } => {
            let request = LoginRequest {
                email: Some(email),
                password: Some(password),
            };
            let auth = client.login(&session, &request).await?;
            session.with_token(auth.token).save(&session_path)?;
            println!("logged in as {} <{}>", auth.user.name, auth.user.email);
        }
        Commands::Logout => {
            let message = client.logout(&session).await?;
            Session::clear(&session_path)?;
            println!("{message}");
        }
        Commands::Projects(command) => run_projects(&client, &session, command).await?,
        Commands::Tasks(command) => run_tasks(&client, &session, command).await?,
        Commands::Board { project, filters } => {
            let board = client.board(&session, project, &filters.query(None, None)).await?;
            print!("{}", render_board(&board));
        }
        Commands::Move { project, task, to } => {
            let mut board = client
                .board(&session, project, &TaskQueryParams::default())
                .await?;
            match client.move_task(&session, &mut board, task, to.into()).await {
                Ok(Some(moved)) => println!("moved: {}", task_line(&moved)),
                Ok(None) => println!("task already in that column"),
                Err(err) => {
                    print!("{}", render_board(&board));
                    bail!("move failed, board restored: {err}");
                }
            }
            print!("{}", render_board(&board));
        }
        Commands::Dashboard => {
            let stats = client.dashboard(&session).await?;
            print!("{}", render_dashboard(&stats, Utc::now()));
        }
    }
    Ok(())
}

async fn run_projects(
    client: &ApiClient,
    session: &Session,
    command: ProjectCommands,
) -> anyhow::Result<()> {
    match command {
        ProjectCommands::List => {
            for project in client.list_projects(session).await? {
                println!("{}", project_line(&project));
            }
        }
        ProjectCommands::Create { name, description } => {
            let payload = NewProject {
                name: Some(name),
                description,
            };
            let project = client.create_project(session, &payload).await?;
            println!("created {}", project_line(&project));
        }
        ProjectCommands::Show { id } => {
            let project = client.get_project(session, id).await?;
            println!("{}", project_line(&project));
        }
        ProjectCommands::Delete { id } => {
            let project = client.delete_project(session, id).await?;
            println!("deleted {}", project_line(&project));
        }
    }
    Ok(())
}

async fn run_tasks(
    client: &ApiClient,
    session: &Session,
    command: TaskCommands,
) -> anyhow::Result<()> {
    match command {
        TaskCommands::List {
            project,
            filters,
            page,
            limit,
        } => {
            let tasks = client
                .list_tasks(session, project, &filters.query(page, limit))
                .await?;
            print!("{}", render_tasks(&tasks));
        }
        TaskCommands::Add {
            project,
            title,
            deadline,
            status,
            priority,
        } => {
            let payload = NewTask {
                title: Some(title),
                status: status.map(Into::into),
                priority: priority.map(Into::into),
                deadline: Some(checked_deadline(deadline)?),
                project_id: Some(project.to_string()),
            };
            let task = client.create_task(session, &payload).await?;
            println!("created {}", task_line(&task));
        }
        TaskCommands::Update {
            id,
            title,
            status,
            priority,
            deadline,
        } => {
            let patch = TaskPatch {
                title,
                status: status.map(Into::into),
                priority: priority.map(Into::into),
                deadline: deadline.map(checked_deadline).transpose()?,
                project_id: None,
            };
            let task = client.update_task(session, id, &patch).await?;
            println!("updated {}", task_line(&task));
        }
        TaskCommands::Delete { id } => {
            println!("{}", client.delete_task(session, id).await?);
        }
    }
    Ok(())
}

/// Rejects unparseable deadlines before a request is made; the server parses them again.
fn checked_deadline(raw: String) -> anyhow::Result<String> {
    if parse_timestamp(&raw).is_none() {
        bail!("invalid deadline `{raw}`; expected RFC 3339 timestamp or YYYY-MM-DD");
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::{checked_deadline, Cli, Commands};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_level_flag_is_global() {
        let cli = Cli::try_parse_from(["zentask", "dashboard", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, "debug");
        assert!(matches!(cli.command, Commands::Dashboard));

        let cli = Cli::try_parse_from(["zentask", "--log-level", "trace", "logout"]).unwrap();
        assert_eq!(cli.log_level, "trace");
    }

    #[test]
    fn deadlines_are_checked_but_sent_as_typed() {
        assert_eq!(checked_deadline("2025-09-30".to_string()).unwrap(), "2025-09-30");
        assert!(checked_deadline("someday".to_string()).is_err());
    }
}
