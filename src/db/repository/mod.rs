//! Repository layer: entity-scoped database operations.
//!
//! One sub-module per table. Every function takes a borrowed connection and
//! performs a single statement; cross-table checks belong to the services.
//! Listings are ordered by id, i.e. insertion order.

mod claim;
mod dentist;
mod diagnosis;
mod patient;
mod procedure;

pub use claim::*;
pub use dentist::*;
pub use diagnosis::*;
pub use patient::*;
pub use procedure::*;
