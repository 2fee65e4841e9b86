//! Cache Module
//!
//! Provides an in-memory, size-bounded cache with TTL expiration and
//! oldest-first eviction.

mod entry;
mod order;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use order::InsertionOrder;
pub use stats::CacheStats;
pub use store::{CacheStore, SharedCache};

// == Public Constants ==
/// Default entry lifetime
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Default capacity
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Default period of the background sweep
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300;
