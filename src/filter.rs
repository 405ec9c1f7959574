//! Pure helpers that narrow and summarise record collections.

use std::{cmp::Ordering, str::FromStr};

use time::{Date, OffsetDateTime, Time};

use crate::core::db::{Priority, Project, Task, User};

const MILLIS_PER_DAY: i128 = 86_400_000;

/// Records with text that a search box looks through.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Project {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

impl Searchable for Task {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.description.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}

impl Searchable for User {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }
}

/// Case-insensitive substring match against any field. An empty query
/// matches everything.
pub fn matches_text<T: Searchable + ?Sized>(record: &T, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn filter_text<'a, T: Searchable>(records: &'a [T], query: &str) -> Vec<&'a T> {
    records.iter().filter(|r| matches_text(*r, query)).collect()
}

/// A select box value: either the `"all"` sentinel or one specific value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Category<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Category::All => true,
            Category::Only(selected) => selected == value,
        }
    }
}

impl<T: FromStr> FromStr for Category<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(Category::All)
        } else {
            s.parse().map(Category::Only)
        }
    }
}

impl<T> From<Option<T>> for Category<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Category::All, Category::Only)
    }
}

pub fn filter_category<'a, T, V, F>(
    records: &'a [T],
    category: &Category<V>,
    field: F,
) -> Vec<&'a T>
where
    V: PartialEq,
    F: Fn(&T) -> &V,
{
    records
        .iter()
        .filter(|r| category.matches(field(*r)))
        .collect()
}

pub fn count_where<T>(records: &[T], predicate: impl Fn(&T) -> bool) -> usize {
    records.iter().filter(|r| predicate(*r)).count()
}

/// `part / whole` as a whole percentage, rounded half up. Zero when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

/// Signed whole days from `now` until the start of `deadline` (UTC), rounded
/// up. Negative once the deadline has passed.
pub fn days_until(deadline: Date, now: OffsetDateTime) -> i64 {
    let deadline = deadline.with_time(Time::MIDNIGHT).assume_utc();
    let millis = (deadline - now).whole_milliseconds();
    let days = millis / MILLIS_PER_DAY;
    let days = if millis % MILLIS_PER_DAY > 0 { days + 1 } else { days };
    days as i64
}

/// Inclusive date window used by the reports view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: Date,
    pub to: Date,
}

impl DateRange {
    pub fn contains(&self, date: Date) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Share of estimated hours already tracked, capped at 100.
pub fn task_progress(tracked_hours: f64, estimated_hours: f64) -> f64 {
    if estimated_hours > 0.0 {
        (tracked_hours / estimated_hours * 100.0).min(100.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSort {
    #[default]
    Deadline,
    Priority,
    Title,
    Assignee,
}

impl FromStr for TaskSort {
    type Err = crate::core::db::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deadline" => Ok(TaskSort::Deadline),
            "priority" => Ok(TaskSort::Priority),
            "title" => Ok(TaskSort::Title),
            "assignee" => Ok(TaskSort::Assignee),
            _ => Err(crate::core::db::ParseError {
                kind: "sort key",
                value: s.to_string(),
            }),
        }
    }
}

fn compare_priority(a: Priority, b: Priority) -> Ordering {
    b.weight().cmp(&a.weight())
}

/// Stable sort, so ties keep their incoming order.
pub fn sort_tasks(tasks: &mut [&Task], sort: TaskSort) {
    tasks.sort_by(|a, b| match sort {
        TaskSort::Deadline => a.deadline.cmp(&b.deadline),
        TaskSort::Priority => compare_priority(a.priority, b.priority),
        TaskSort::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        TaskSort::Assignee => a.assignee.to_lowercase().cmp(&b.assignee.to_lowercase()),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[derive(Debug, PartialEq)]
    struct Item {
        title: &'static str,
        status: &'static str,
    }

    impl Searchable for Item {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.title]
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                title: "Write docs",
                status: "todo",
            },
            Item {
                title: "Fix login",
                status: "done",
            },
            Item {
                title: "Ship DOCS site",
                status: "done",
            },
        ]
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let items = items();
        let found = filter_text(&items, "");
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].title, "Write docs");
        assert_eq!(found[2].title, "Ship DOCS site");
    }

    #[test]
    fn text_match_ignores_case() {
        let items = items();
        let found = filter_text(&items, "Docs");
        let titles: Vec<_> = found.iter().map(|i| i.title).collect();
        assert_eq!(titles, ["Write docs", "Ship DOCS site"]);
    }

    #[test]
    fn category_all_and_exact() {
        let items = items();
        let all: Category<&str> = Category::All;
        assert_eq!(filter_category(&items, &all, |i| &i.status).len(), 3);

        let done = Category::Only("done");
        let found = filter_category(&items, &done, |i| &i.status);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|i| i.status == "done"));
    }

    #[test]
    fn category_parses_sentinel() {
        use crate::core::db::TaskStatus;
        assert_eq!("all".parse::<Category<TaskStatus>>().unwrap(), Category::All);
        assert_eq!(
            "review".parse::<Category<TaskStatus>>().unwrap(),
            Category::Only(TaskStatus::Review)
        );
        assert!("nope".parse::<Category<TaskStatus>>().is_err());
    }

    #[test]
    fn done_scenario_counts_and_rounds() {
        let items = items();
        let done = count_where(&items, |i| i.status == "done");
        assert_eq!(done, 2);
        assert_eq!(percentage(done, items.len()), 67);
        assert_eq!(percentage(1, 0), 0);
        assert_eq!(percentage(1, 2), 50);
    }

    #[test]
    fn deadline_math() {
        let now = datetime!(2024-07-21 10:30 UTC);
        assert_eq!(days_until(date!(2024 - 07 - 28), now), 7);
        assert!(days_until(date!(2024 - 07 - 20), now) < 0);
        assert_eq!(days_until(date!(2024 - 07 - 20), now), -1);

        let midnight = datetime!(2024-07-21 0:00 UTC);
        assert_eq!(days_until(date!(2024 - 07 - 28), midnight), 7);
        assert_eq!(days_until(date!(2024 - 07 - 21), midnight), 0);
    }

    #[test]
    fn date_range_is_inclusive() {
        let july = DateRange {
            from: date!(2024 - 07 - 01),
            to: date!(2024 - 07 - 31),
        };
        assert!(july.contains(date!(2024 - 07 - 01)));
        assert!(july.contains(date!(2024 - 07 - 31)));
        assert!(!july.contains(date!(2024 - 08 - 01)));
    }

    #[test]
    fn progress_caps_and_guards() {
        assert_eq!(task_progress(8.0, 16.0), 50.0);
        assert_eq!(task_progress(28.0, 24.0), 100.0);
        assert_eq!(task_progress(3.0, 0.0), 0.0);
    }
}
