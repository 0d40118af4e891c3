//! Logpulse core library - access-log aggregation and report rendering

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Aggregation is a single pass over the line source
// - No global mutable state; results depend only on input content
// - Deterministic ordering in every rendered output
// - Identical input yields byte-for-byte identical output

pub mod aggregate;
pub mod config;
pub mod html;
pub mod parser;
pub mod report;

pub use aggregate::{aggregate_file, aggregate_lines, AddressCount, HourCount, TrafficSummary};
pub use config::ResolvedConfig;
pub use report::{render_json, render_text};
