pub mod core;
pub mod error;
pub mod filter;
pub mod timer;
pub mod validation;
pub mod views;

pub use crate::core::db::{MemoryDb, StorageState};
pub use crate::core::permissions::Permission;
pub use crate::core::session::{AuthSession, SessionStore, SessionUser};
pub use error::{TaskboardError, ValidationErrors};
pub use timer::{Stopwatch, Ticker, TimerState};
