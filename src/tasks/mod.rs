//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry cleanup: drops the cached collection once its sliding window elapses

mod cleanup;

pub use cleanup::{spawn_cleanup_every, spawn_cleanup_task};
