//! Shortlist exports.

pub mod markdown;
