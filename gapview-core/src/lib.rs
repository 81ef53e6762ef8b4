//! Core types and aggregation engine for the gapview country-panel dashboard.

/// Grouped reductions and year-slice projections over a normalized table.
pub mod aggregate;
/// Domain models and the column-schema contract shared by all sources.
pub mod model;
/// Trait describing dataset backends and the errors they can raise.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;

pub use aggregate::*;
pub use model::*;
pub use ports::*;
pub use service::*;
