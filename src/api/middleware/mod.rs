//! HTTP middleware.

pub mod audit;
pub mod deadline;
