//! Background Tasks Module
//!
//! Contains background tasks the hosting process starts and stops.
//!
//! # Tasks
//! - TTL Cleanup: Removes expired cache entries at a fixed interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
