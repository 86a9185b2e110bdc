//! LAN discovery engine: sweeps a subnet for live hosts, classifies them and
//! merges in devices that announce themselves.

pub mod cancel;
pub mod classify;
pub mod passive;
pub mod probe;
pub mod scanner;

pub use cancel::CancelToken;
pub use scanner::{Orchestrator, ScanEvent, ScanObserver, ScanPhase, run_scan, run_scan_observed};
