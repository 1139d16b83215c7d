//! Endpoint handlers, one module per resource.
//!
//! Handlers are thin: extract, call the service under the connection lock,
//! map the result. Extractor rejections are turned into the JSON error
//! envelope via `ApiError`.

pub mod claims;
pub mod dentists;
pub mod diagnoses;
pub mod health;
pub mod patients;
pub mod procedures;
