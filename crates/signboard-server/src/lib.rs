//! Remote trigger endpoint for Signboard.
//!
//! A [`StreamRegistry`] owns the open/closed state of each stream view and
//! forwards open/close commands to the attached display. [`router`] exposes it
//! over HTTP.

pub mod config;
pub mod registry;
pub mod routes;

pub use config::ServerArgs;
pub use registry::{RegistryError, StreamRegistry, StreamView, ToggleOutcome, ViewCommand, ViewState};
pub use routes::router;
