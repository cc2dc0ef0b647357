//! Billfold REST server library.
//!
//! Exposed as a library so the integration tests can build the router
//! in-process and drive it with `tower::ServiceExt::oneshot`.

pub mod api;
pub mod config;
pub mod error;
pub mod main_lib;
pub mod scheduler;

pub use config::Config;
pub use main_lib::{build_state, init_tracing, AppState};
