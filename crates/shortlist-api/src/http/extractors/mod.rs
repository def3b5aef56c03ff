//! Request extractors.

pub mod query;
pub mod session;
