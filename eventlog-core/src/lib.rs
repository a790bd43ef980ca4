//! Core types for the eventlog client.
//!
//! This crate provides the types shared by the client library and the CLI:
//! - `Event`, `EventPhoto` and the tri-state `Success` outcome
//! - `form` and `account` schemas that validate user input at submission time
//! - `protocol` module for the REST request/response bodies

pub mod account;
pub mod config;
pub mod error;
pub mod event;
pub mod form;
pub mod photo;
pub mod protocol;
pub mod success;
pub mod validation;

// Re-export event types at crate root for convenience
pub use event::*;
pub use success::Success;
