//! Dashboard summary over projects and tasks.

use crate::model::project::Project;
use crate::model::task::{Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub todo: usize,
    #[serde(rename = "in-progress")]
    pub in_progress: usize,
    pub done: usize,
}

impl StatusCounts {
    pub fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Done => self.done,
        }
    }

    fn bump(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Todo => self.todo += 1,
            TaskStatus::InProgress => self.in_progress += 1,
            TaskStatus::Done => self.done += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: usize,
    pub total_tasks: usize,
    pub by_status: StatusCounts,
    /// Tasks past their deadline, earliest deadline first. Done tasks count too.
    pub overdue: Vec<Task>,
}

impl DashboardStats {
    pub fn compute(projects: &[Project], tasks: &[Task], now: DateTime<Utc>) -> Self {
        let mut by_status = StatusCounts::default();
        let mut overdue = Vec::new();
        for task in tasks {
            by_status.bump(task.status);
            if task.is_overdue(now) {
                overdue.push(task.clone());
            }
        }
        overdue.sort_by(|a, b| a.deadline.cmp(&b.deadline).then(a.id.cmp(&b.id)));

        Self {
            total_projects: projects.len(),
            total_tasks: tasks.len(),
            by_status,
            overdue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DashboardStats;
    use crate::model::project::NewProject;
    use crate::model::task::{NewTask, Task, TaskStatus};
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn task(status: TaskStatus, days_from_epoch: i64) -> Task {
        let deadline = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
            + Duration::days(days_from_epoch);
        NewTask {
            title: Some(format!("{status} {days_from_epoch}")),
            status: Some(status),
            deadline: Some(deadline.to_rfc3339()),
            project_id: Some(Uuid::new_v4().to_string()),
            ..NewTask::default()
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn compute_counts_statuses_and_sorts_overdue() {
        let projects = vec![NewProject::named("one").validate(None).unwrap()];
        let tasks = vec![
            task(TaskStatus::Todo, 10),
            task(TaskStatus::Done, 2),
            task(TaskStatus::InProgress, 40),
            task(TaskStatus::Todo, 5),
        ];
        let now = Utc.with_ymd_and_hms(2025, 1, 20, 0, 0, 0).unwrap();

        let stats = DashboardStats::compute(&projects, &tasks, now);
        assert_eq!(stats.total_projects, 1);
        assert_eq!(stats.total_tasks, 4);
        assert_eq!(stats.by_status.get(TaskStatus::Todo), 2);
        assert_eq!(stats.by_status.in_progress, 1);
        assert_eq!(stats.by_status.done, 1);

        let overdue_days: Vec<i64> = stats
            .overdue
            .iter()
            .map(|task| (task.deadline - Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()).num_days())
            .collect();
        assert_eq!(overdue_days, vec![2, 5, 10]);
        assert_eq!(stats.overdue[0].status, TaskStatus::Done);
    }

    #[test]
    fn status_counts_serialize_with_board_names() {
        let stats = DashboardStats::compute(&[], &[], Utc::now());
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["byStatus"]["in-progress"], 0);
        assert_eq!(json["totalTasks"], 0);
    }
}
