//! Business logic services (use cases).
//!
//! Services orchestrate repository and provider calls. They depend on
//! traits (ports) -- never on concrete infrastructure implementations.

pub mod health;
pub mod shortlist;
