pub mod adapters;
pub mod config;
pub mod error;
pub mod manager;

pub use manager::{SessionManager, SessionStatus};
