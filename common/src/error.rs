use thiserror::Error;

/// Fatal failures of a scan. All of them surface before any probe leaves the host.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    /// The interface exists but cannot be scanned (no IPv4 network attached).
    #[error("interface {interface} cannot be scanned: {reason}")]
    Configuration { interface: String, reason: String },

    /// No interface matched the requested selector.
    #[error("no network interface matches '{selector}'")]
    InterfaceResolution { selector: String },

    /// The platform could not map an interface id to a display name.
    #[error("adapter '{interface_id}' not found")]
    AdapterNotFound { interface_id: String },
}
