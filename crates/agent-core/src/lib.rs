//! Core abstractions shared by the agent client crates
//!
//! This crate defines the `Agent` trait driven by the chat loop, the per-turn
//! `Context`, and the common error type.

pub mod agent;
pub mod context;
pub mod error;

pub use agent::Agent;
pub use context::Context;
pub use error::{Error, Result};
