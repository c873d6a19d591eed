//! Aggregation and threshold classification of normalized ratings.
//!
//! Every query here is a pure function of the normalized table: the
//! ratings a student gave or received, per-group spread, and the content
//! of the per-student export report.

pub mod aggregate;
pub mod classify;
pub mod report;
pub mod types;
pub mod utility;
