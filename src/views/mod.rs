//! Data behind each dashboard screen. Every function here returns plain
//! records; drawing them is the caller's business.

pub mod dashboard;
pub mod kanban;
pub mod navigation;
pub mod projects;
pub mod reports;
pub mod settings;
pub mod tasks;
pub mod time_tracking;
pub mod users;

/// Result of looking a record up by id.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound { kind: &'static str, id: i64 },
}

impl<T> Lookup<T> {
    pub fn from_option(value: Option<T>, kind: &'static str, id: i64) -> Self {
        match value {
            Some(v) => Lookup::Found(v),
            None => Lookup::NotFound { kind, id },
        }
    }

    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(v) => Some(v),
            Lookup::NotFound { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(v) => Lookup::Found(f(v)),
            Lookup::NotFound { kind, id } => Lookup::NotFound { kind, id },
        }
    }
}
