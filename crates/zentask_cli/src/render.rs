//! Plain-text rendering for terminal output.

use chrono::{DateTime, Utc};
use std::fmt::Write;
use zentask_core::{Board, DashboardStats, Project, Task, TaskStatus};

pub fn project_line(project: &Project) -> String {
    match project.description.as_deref() {
        Some(description) if !description.is_empty() => {
            format!("{}  {}  - {}", project.id, project.name, description)
        }
        _ => format!("{}  {}", project.id, project.name),
    }
}

pub fn task_line(task: &Task) -> String {
    format!(
        "{}  [{}] {} ({}, due {})",
        task.id,
        task.status,
        task.title,
        task.priority.as_str(),
        task.deadline.format("%Y-%m-%d")
    )
}

pub fn render_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "no tasks\n".to_string();
    }
    tasks.iter().map(|task| task_line(task) + "\n").collect()
}

pub fn render_board(board: &Board) -> String {
    let mut out = String::new();
    for column in &board.columns {
        let _ = writeln!(out, "== {} ({}) ==", column.label, column.tasks.len());
        for task in &column.tasks {
            let _ = writeln!(
                out,
                "  {}  {} ({}, due {})",
                task.id,
                task.title,
                task.priority.as_str(),
                task.deadline.format("%Y-%m-%d")
            );
        }
    }
    out
}

pub fn render_dashboard(stats: &DashboardStats, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Projects: {}", stats.total_projects);
    let _ = writeln!(out, "Tasks:    {}", stats.total_tasks);
    for status in TaskStatus::ALL {
        let _ = writeln!(out, "  {:<12} {}", status.label(), stats.by_status.get(status));
    }
    let _ = writeln!(out, "Overdue:  {}", stats.overdue.len());
    for task in &stats.overdue {
        let days = (now - task.deadline).num_days();
        let _ = writeln!(out, "  {}  {} ({days}d late)", task.id, task.title);
    }
    out
}
