use std::collections::BTreeMap;

use crate::core::permissions::Permission;

#[derive(Debug, thiserror::Error)]
pub enum TaskboardError {
    #[error("{kind} with id {id} not found")]
    NotFound { kind: &'static str, id: i64 },
    #[error("comment is empty")]
    EmptyComment,
    #[error("missing permission {0:?}")]
    PermissionDenied(Permission),
}

/// Per-field messages collected by a form check.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .fields.len())]
pub struct ValidationErrors {
    pub fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
