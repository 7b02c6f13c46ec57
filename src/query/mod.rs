//! Read-only query service over the exported tables
//!
//! Table access behind an async trait, the query logic, and the Axum server
//! exposing it as JSON.

pub mod server;
pub mod service;
pub mod source;

pub use server::{create_router, QueryServer, ServerState};
pub use service::{
    neighbor_window, BoutResult, CompetitorProfile, HistoryEntry, QueryService, RankedEntry,
    DEFAULT_NEIGHBOR_RADIUS, DEFAULT_SEARCH_LIMIT,
};
pub use source::{FileTableSource, StaticTableSource, TableResult, TableSource};
