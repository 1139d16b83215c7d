//! Clinic REST API.
//!
//! Maps HTTP verbs and paths onto the services. All handlers share one
//! `ApiContext`; every request passes through the audit logger and a
//! request deadline.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server_on, ApiServer, ServerError};
pub use types::ApiContext;
