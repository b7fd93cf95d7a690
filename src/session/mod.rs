//! Per-project session registry.
//!
//! Gives each project/session identifier its own [`crate::MemoryStore`],
//! owned by an explicit manager object instead of process-global state.

pub mod manager;

pub use manager::{ProjectSession, SessionManager};
