//! Status aggregation
//!
//! Pure computation of a project's normalized status/progress view from its
//! task records. Persisting a corrected status (lazy reconciliation) is the
//! orchestrator's concern; nothing here mutates.

use chrono::{DateTime, Duration, Utc};

use crate::domain::project::{Project, ProjectStatus};
use crate::domain::task::{Task, TaskStatus};
use crate::dto::report::{StatusReport, TaskBrief, TaskSummary};

/// Compute the status report for a project from its current task list.
///
/// `per_task_minutes` is the fixed per-stage duration used for the completion
/// estimate.
pub fn compute(
    project: &Project,
    tasks: &[Task],
    now: DateTime<Utc>,
    per_task_minutes: i64,
) -> StatusReport {
    let summary = summarize(tasks);
    let status = derive_status(project.status, &summary);
    let progress = if status == ProjectStatus::Completed {
        100
    } else {
        compute_progress(tasks, &summary)
    };

    StatusReport {
        project_id: project.id,
        status,
        progress,
        current_task: current_task(tasks),
        estimated_completion: estimate_completion(&summary, now, per_task_minutes),
        task_summary: summary,
    }
}

fn summarize(tasks: &[Task]) -> TaskSummary {
    let mut summary = TaskSummary {
        total: tasks.len(),
        ..TaskSummary::default()
    };
    for task in tasks {
        match task.status {
            TaskStatus::Todo => summary.todo += 1,
            TaskStatus::InProgress => summary.in_progress += 1,
            TaskStatus::Done => summary.done += 1,
            TaskStatus::Failed => summary.failed += 1,
            TaskStatus::PendingApproval => summary.pending_approval += 1,
        }
    }
    summary
}

/// Status precedence: Failed > Completed > InProgress > stored status.
fn derive_status(stored: ProjectStatus, summary: &TaskSummary) -> ProjectStatus {
    if summary.failed > 0 {
        ProjectStatus::Failed
    } else if summary.total > 0 && summary.done == summary.total {
        ProjectStatus::Completed
    } else if summary.in_progress > 0 || summary.pending_approval > 0 || summary.done > 0 {
        ProjectStatus::InProgress
    } else {
        stored
    }
}

/// Completed-ratio baseline plus the single in-progress task's fractional
/// contribution, floored to a whole percent.
fn compute_progress(tasks: &[Task], summary: &TaskSummary) -> u8 {
    if summary.total == 0 {
        return 0;
    }

    let mut points = (summary.done * 100) as f64;
    if summary.in_progress == 1 {
        let sub = tasks
            .iter()
            .find(|t| t.status == TaskStatus::InProgress)
            .and_then(|t| t.progress);
        if let Some(sub) = sub {
            points += f64::from(sub.min(100));
        }
    }

    let progress = (points / summary.total as f64).floor();
    progress.clamp(0.0, 100.0) as u8
}

/// The task a client should be told about: a failed task wins (it carries the
/// terminal error), otherwise the one currently running or paused on approval.
fn current_task(tasks: &[Task]) -> Option<TaskBrief> {
    tasks
        .iter()
        .find(|t| t.status == TaskStatus::Failed)
        .or_else(|| tasks.iter().find(|t| t.status == TaskStatus::InProgress))
        .or_else(|| {
            tasks
                .iter()
                .find(|t| t.status == TaskStatus::PendingApproval)
        })
        .map(brief)
}

fn brief(task: &Task) -> TaskBrief {
    TaskBrief {
        task_id: task.id,
        worker: task.worker.clone(),
        progress: task.progress,
        error: task.error.clone(),
    }
}

fn estimate_completion(
    summary: &TaskSummary,
    now: DateTime<Utc>,
    per_task_minutes: i64,
) -> Option<DateTime<Utc>> {
    if summary.in_progress == 0 {
        return None;
    }
    let remaining = (summary.total - summary.done) as i64;
    Some(now + Duration::minutes(remaining * per_task_minutes))
}
