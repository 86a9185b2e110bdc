//! Shared building blocks for the lanmap workspace.
//!
//! * [`network`] holds the data model of a scan (hosts, subnets, interfaces).
//! * [`config`] carries the knobs the display surface can turn.
//! * [`error`] is the fatal error taxonomy of a scan.
//! * [`log`] exports the logging macros used across the crates.

pub mod config;
pub mod error;
pub mod log;
pub mod network;
