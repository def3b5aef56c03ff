//! Shared domain types for the vendor shortlist service.
//!
//! Shortlist records and results, LLM request/response shapes, health
//! report types, configuration, and the error enums shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod health;
pub mod llm;
pub mod shortlist;
