//! Client library for the eventlog API.
//!
//! - `backend`: the [`EventsBackend`] seam and its reqwest implementation in `http`
//! - `saga`: the edit-event save sequence (signed slot, upload, patch)
//! - `controller`: new/edit form controllers with double-submit gating
//! - `account`: registration, login and password reset against an identity provider

pub mod account;
pub mod backend;
pub mod controller;
pub mod error;
pub mod http;
pub mod notify;
pub mod saga;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::EventsBackend;
pub use error::{ClientError, ClientResult};
pub use http::HttpBackend;
pub use notify::{Notification, Notifier, Severity};
pub use session::{CurrentUser, SessionToken};
