//! SQLite storage layer.
//!
//! The zero-config default store: a single file in WAL mode with split
//! read/write connection pools.

pub mod pool;
pub mod shortlist;
