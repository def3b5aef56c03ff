//! Infrastructure layer for the vendor shortlist service.
//!
//! Implements the ports defined in `shortlist-core`: SQLite and PostgreSQL
//! shortlist stores, the Groq (OpenAI-compatible) LLM client, and the
//! `config.toml` loader.

pub mod config;
pub mod llm;
pub mod postgres;
pub mod sqlite;
pub mod store;
