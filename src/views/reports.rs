use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::Serialize;
use time::{Date, macros::date};

use crate::{
    core::db::{ParseError, Priority, Task, TaskStatus},
    filter::{Category, DateRange},
};

/// One slice or bar handed to the chart component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDatum {
    pub name: String,
    pub value: f64,
}

impl ChartDatum {
    fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Hours logged on one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyHours {
    pub date: Date,
    pub hours: f64,
    pub productive: f64,
}

pub fn sample_daily_hours() -> Vec<DailyHours> {
    let day = |date, hours, productive| DailyHours {
        date,
        hours,
        productive,
    };
    vec![
        day(date!(2024 - 07 - 01), 8.2, 7.8),
        day(date!(2024 - 07 - 02), 7.5, 7.1),
        day(date!(2024 - 07 - 03), 8.8, 8.2),
        day(date!(2024 - 07 - 04), 6.2, 5.8),
        day(date!(2024 - 07 - 05), 8.0, 7.6),
        day(date!(2024 - 07 - 08), 8.5, 8.0),
        day(date!(2024 - 07 - 09), 7.8, 7.3),
    ]
}

#[derive(Debug, Clone, Default)]
pub struct ReportQuery {
    pub range: Option<DateRange>,
    pub project: Category<i64>,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub status_distribution: Vec<ChartDatum>,
    pub priority_distribution: Vec<ChartDatum>,
    pub hours_by_assignee: Vec<ChartDatum>,
    pub daily_hours: Vec<DailyHours>,
    pub total_hours: f64,
}

fn label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "To Do",
        TaskStatus::Pending => "Pending",
        TaskStatus::InProgress => "In Progress",
        TaskStatus::Review => "Review",
        TaskStatus::Blocked => "Blocked",
        TaskStatus::Completed => "Completed",
    }
}

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "Low",
        Priority::Medium => "Medium",
        Priority::High => "High",
        Priority::Urgent => "Urgent",
    }
}

/// Counts per status, skipping statuses with no tasks.
pub fn status_distribution(tasks: &[&Task]) -> Vec<ChartDatum> {
    TaskStatus::ALL
        .iter()
        .map(|s| (s, tasks.iter().filter(|t| t.status == *s).count()))
        .filter(|(_, n)| *n > 0)
        .map(|(s, n)| ChartDatum::new(label(*s), n as f64))
        .collect()
}

pub fn priority_distribution(tasks: &[&Task]) -> Vec<ChartDatum> {
    Priority::ALL
        .iter()
        .map(|p| (p, tasks.iter().filter(|t| t.priority == *p).count()))
        .filter(|(_, n)| *n > 0)
        .map(|(p, n)| ChartDatum::new(priority_label(*p), n as f64))
        .collect()
}

/// Tracked hours per assignee, alphabetical.
pub fn hours_by_assignee(tasks: &[&Task]) -> Vec<ChartDatum> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for task in tasks {
        *totals.entry(task.assignee.as_str()).or_default() += task.tracked_hours;
    }
    totals
        .into_iter()
        .map(|(name, hours)| ChartDatum::new(name, hours))
        .collect()
}

pub fn build(tasks: &[Task], daily: &[DailyHours], query: &ReportQuery) -> Report {
    let tasks: Vec<&Task> = tasks
        .iter()
        .filter(|t| query.project.matches(&t.project_id))
        .collect();
    let daily_hours: Vec<DailyHours> = daily
        .iter()
        .filter(|d| query.range.is_none_or(|r| r.contains(d.date)))
        .copied()
        .collect();
    let total_hours = daily_hours.iter().map(|d| d.hours).sum();
    Report {
        status_distribution: status_distribution(&tasks),
        priority_distribution: priority_distribution(&tasks),
        hours_by_assignee: hours_by_assignee(&tasks),
        daily_hours,
        total_hours,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Pdf => "PDF",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(ParseError {
                kind: "export format",
                value: s.to_string(),
            }),
        }
    }
}

/// Acknowledges an export request. No file is produced.
pub fn export(format: ExportFormat) -> String {
    tracing::info!(%format, "report export requested");
    format!("Report exported as {format}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db::{MemoryDb, TaskRepository};

    #[tokio::test]
    async fn distributions_for_one_project() -> anyhow::Result<()> {
        let tasks = MemoryDb::seeded().get_tasks().await?;
        let query = ReportQuery {
            range: None,
            project: Category::Only(1),
        };
        let report = build(&tasks, &[], &query);
        assert_eq!(
            report.status_distribution,
            [
                ChartDatum::new("In Progress", 1.0),
                ChartDatum::new("Blocked", 1.0)
            ]
        );
        assert_eq!(
            report.priority_distribution,
            [ChartDatum::new("Medium", 1.0), ChartDatum::new("High", 1.0)]
        );
        assert_eq!(
            report.hours_by_assignee,
            [
                ChartDatum::new("Carol Brown", 3.0),
                ChartDatum::new("John Doe", 8.5)
            ]
        );
        Ok(())
    }

    #[test]
    fn daily_hours_respect_range() {
        let query = ReportQuery {
            range: Some(DateRange {
                from: date!(2024 - 07 - 03),
                to: date!(2024 - 07 - 05),
            }),
            project: Category::All,
        };
        let report = build(&[], &sample_daily_hours(), &query);
        assert_eq!(report.daily_hours.len(), 3);
        assert!((report.total_hours - 23.0).abs() < 1e-9);
        assert!(report.status_distribution.is_empty());
    }

    #[test]
    fn export_is_acknowledged() {
        let format: ExportFormat = "PDF".parse().unwrap();
        assert_eq!(export(format), "Report exported as PDF");
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }
}
