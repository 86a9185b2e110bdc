use std::time::Duration;

pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_DESCRIPTOR_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_PRINTER_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_DISCOVERY_WINDOW: Duration = Duration::from_secs(3);
pub const DEFAULT_WORKERS: usize = 64;

/// Tuning for a single discovery run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// How long the reachability probe waits for an echo reply.
    pub ping_timeout: Duration,
    /// Budget of the set-top box descriptor request.
    pub descriptor_timeout: Duration,
    /// Budget of the printer status session.
    pub printer_timeout: Duration,
    /// How long the passive listener stays open.
    pub discovery_window: Duration,
    /// Upper bound of addresses probed or classified at the same time.
    pub workers: usize,
    /// Runs the classifier chain on live hosts. When disabled every
    /// live host other than the gateway is reported as a computer.
    pub classify: bool,
    /// Runs the passive cast listener next to the sweep.
    pub passive: bool,
    /// Case-insensitive fragments of a set-top box friendly name.
    pub set_top_box_needles: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ping_timeout: DEFAULT_PING_TIMEOUT,
            descriptor_timeout: DEFAULT_DESCRIPTOR_TIMEOUT,
            printer_timeout: DEFAULT_PRINTER_TIMEOUT,
            discovery_window: DEFAULT_DISCOVERY_WINDOW,
            workers: DEFAULT_WORKERS,
            classify: true,
            passive: true,
            set_top_box_needles: vec![String::from("décodeur")],
        }
    }
}

impl ScanConfig {
    /// Worker count clamped to at least one, `buffer_unordered(0)` never polls.
    pub fn worker_limit(&self) -> usize {
        self.workers.max(1)
    }
}
