use time::Date;

use crate::{
    core::db::{Task, TaskRepository, TaskStatus, TaskUpdate},
    filter::task_progress,
    timer::{CompletedSession, format_hours_minutes},
    views::Lookup,
};

/// A task the viewer can start the stopwatch on.
#[derive(Debug, Clone)]
pub struct TrackableTask {
    pub task: Task,
    pub progress: f64,
}

/// Open tasks assigned to `assignee`.
pub async fn trackable_tasks<R: TaskRepository>(
    repo: &R,
    assignee: &str,
) -> anyhow::Result<Vec<TrackableTask>> {
    Ok(repo
        .get_tasks()
        .await?
        .into_iter()
        .filter(|t| t.assignee == assignee && t.status != TaskStatus::Completed)
        .map(|task| TrackableTask {
            progress: task_progress(task.tracked_hours, task.estimated_hours),
            task,
        })
        .collect())
}

/// Sessions stopped during this run.
#[derive(Debug, Clone, Default)]
pub struct TimeLog {
    entries: Vec<CompletedSession>,
}

impl TimeLog {
    pub fn record(&mut self, session: CompletedSession) {
        self.entries.push(session);
    }

    pub fn entries(&self) -> &[CompletedSession] {
        &self.entries
    }

    pub fn total_seconds_on(&self, day: Date) -> u64 {
        self.entries
            .iter()
            .filter(|e| e.stopped_at.date() == day)
            .map(|e| e.duration_seconds)
            .sum()
    }

    pub fn summary_on(&self, day: Date) -> String {
        format_hours_minutes(self.total_seconds_on(day))
    }

    pub fn activities(&self) -> usize {
        let mut labels: Vec<&str> = self
            .entries
            .iter()
            .filter_map(|e| e.label.as_deref())
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels.len()
    }
}

/// Add a finished session to the task's tracked hours.
pub async fn book_session<R: TaskRepository>(
    repo: &R,
    task_id: i64,
    session: &CompletedSession,
) -> anyhow::Result<Lookup<Task>> {
    let Some(task) = repo.get_task_by_id(task_id).await? else {
        return Ok(Lookup::NotFound {
            kind: "task",
            id: task_id,
        });
    };
    let hours = task.tracked_hours + session.duration_seconds as f64 / 3600.0;
    let update = TaskUpdate {
        tracked_hours: Some(hours),
        ..Default::default()
    };
    Ok(Lookup::Found(repo.update_task(&task, &update).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::db::MemoryDb,
        timer::{ManualClock, Stopwatch},
    };
    use time::{
        Duration,
        macros::{date, datetime},
    };

    #[tokio::test]
    async fn assigned_open_tasks_only() -> anyhow::Result<()> {
        let db = MemoryDb::seeded();
        let tasks = trackable_tasks(&db, "John Doe").await?;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task.id, 1);
        assert!(trackable_tasks(&db, "Bob Wilson").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn stopped_session_is_booked_on_task() -> anyhow::Result<()> {
        let db = MemoryDb::seeded();
        let clock = ManualClock::new(datetime!(2024-07-21 09:00 UTC));
        let mut watch = Stopwatch::new(clock.clone());
        watch.start_for("Update user interface design");
        clock.advance(Duration::minutes(90));
        let session = watch.stop().expect("running");

        let mut log = TimeLog::default();
        log.record(session.clone());
        assert_eq!(log.summary_on(date!(2024 - 07 - 21)), "1h 30m");
        assert_eq!(log.total_seconds_on(date!(2024 - 07 - 22)), 0);
        assert_eq!(log.activities(), 1);

        let task = book_session(&db, 1, &session).await?.found().expect("task 1");
        assert_eq!(task.tracked_hours, 10.0);
        assert!(!book_session(&db, 9, &session).await?.is_found());
        Ok(())
    }
}
