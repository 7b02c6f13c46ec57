//! Match log parsing
//!
//! This module resolves the log layout and converts raw rows into typed
//! match records, reporting the rows it had to drop.

pub mod columns;
pub mod log;

// Re-export commonly used types
pub use columns::{ColumnIndex, SideColumns};
pub use log::{DroppedRow, MatchLogParser, ParseReport};
