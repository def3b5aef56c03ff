//! Business logic and repository trait definitions for the shortlist service.
//!
//! This crate defines the "ports" (repository and LLM provider traits) that
//! the infrastructure layer implements. It depends only on `shortlist-types`
//! -- never on `shortlist-infra` or any database/HTTP crate.

pub mod catalog;
pub mod export;
pub mod llm;
pub mod prompt;
pub mod repository;
pub mod service;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;
