pub mod db;
pub mod permissions;
pub mod session;
