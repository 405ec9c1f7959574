use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} value: {value:?}")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a fieldless enum whose variants map one-to-one onto the
/// lowercase labels used in the stored records.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident as $kind:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant
            ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    _ => Err(ParseError {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

labelled_enum! {
    pub enum Role as "role" {
        Employee => "employee",
        Manager => "manager",
        Admin => "admin",
    }
}

labelled_enum! {
    pub enum UserStatus as "user status" {
        Active => "active",
        Inactive => "inactive",
    }
}

labelled_enum! {
    pub enum ProjectStatus as "project status" {
        Active => "active",
        Review => "review",
        Completed => "completed",
        OnHold => "on-hold",
    }
}

labelled_enum! {
    pub enum TaskStatus as "task status" {
        Todo => "todo",
        Pending => "pending",
        InProgress => "in-progress",
        Review => "review",
        Blocked => "blocked",
        Completed => "completed",
    }
}

labelled_enum! {
    pub enum Priority as "priority" {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

impl Priority {
    /// Sort weight, highest first. Urgent shares the top slot with high.
    pub fn weight(&self) -> u8 {
        match self {
            Priority::Urgent | Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

impl UserStatus {
    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Inactive,
            UserStatus::Inactive => UserStatus::Active,
        }
    }
}
