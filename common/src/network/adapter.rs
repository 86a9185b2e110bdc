//! Human readable adapter names.
//!
//! Operating systems name interfaces for the kernel (`wlp3s0`, `en0`, a GUID
//! on Windows) and separately for the user (`Wi-Fi`, `Ethernet`). Discovery
//! only depends on [`AdapterNameResolver`]; each platform brings its own lookup.

use std::collections::HashMap;

use crate::error::DiscoveryError;

pub trait AdapterNameResolver: Send + Sync {
    /// Maps an OS interface id to the name shown to the user.
    fn resolve_adapter_name(&self, interface_id: &str) -> Result<String, DiscoveryError>;
}

/// Resolver backed by the running operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAdapterNames;

fn not_found(interface_id: &str) -> DiscoveryError {
    DiscoveryError::AdapterNotFound {
        interface_id: interface_id.to_string(),
    }
}

#[cfg(target_os = "linux")]
impl AdapterNameResolver for SystemAdapterNames {
    fn resolve_adapter_name(&self, interface_id: &str) -> Result<String, DiscoveryError> {
        use std::path::Path;

        let base = Path::new("/sys/class/net").join(interface_id);
        if interface_id.is_empty() || !base.exists() {
            return Err(not_found(interface_id));
        }

        let alias: Option<String> = std::fs::read_to_string(base.join("ifalias"))
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|alias| !alias.is_empty());

        Ok(alias.unwrap_or_else(|| interface_id.to_string()))
    }
}

#[cfg(target_os = "macos")]
impl AdapterNameResolver for SystemAdapterNames {
    fn resolve_adapter_name(&self, interface_id: &str) -> Result<String, DiscoveryError> {
        use std::process::Command;
        use std::sync::OnceLock;

        static PORTS: OnceLock<HashMap<String, String>> = OnceLock::new();

        let ports = PORTS.get_or_init(|| {
            Command::new("networksetup")
                .arg("-listallhardwareports")
                .output()
                .map(|output| parse_hardware_ports(&String::from_utf8_lossy(&output.stdout)))
                .unwrap_or_default()
        });

        if let Some(port) = ports.get(interface_id) {
            return Ok(port.clone());
        }

        let exists = pnet::datalink::interfaces()
            .iter()
            .any(|intf| intf.name == interface_id);
        if exists {
            Ok(interface_id.to_string())
        } else {
            Err(not_found(interface_id))
        }
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
impl AdapterNameResolver for SystemAdapterNames {
    fn resolve_adapter_name(&self, interface_id: &str) -> Result<String, DiscoveryError> {
        // Windows reports the connection name as the adapter description.
        pnet::datalink::interfaces()
            .into_iter()
            .find(|intf| intf.name == interface_id)
            .map(|intf| {
                if intf.description.is_empty() {
                    intf.name
                } else {
                    intf.description
                }
            })
            .ok_or_else(|| not_found(interface_id))
    }
}

/// Parses `networksetup -listallhardwareports` into device -> port name.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn parse_hardware_ports(stdout: &str) -> HashMap<String, String> {
    let mut ports: HashMap<String, String> = HashMap::new();
    let mut current_port: Option<String> = None;

    for line in stdout.lines() {
        let line = line.trim();
        if let Some(port) = line.strip_prefix("Hardware Port: ") {
            current_port = Some(port.trim().to_string());
        } else if let Some(device) = line.strip_prefix("Device: ")
            && let Some(port) = current_port.take()
        {
            ports.insert(device.trim().to_string(), port);
        }
    }

    ports
}

/// Fixed id -> name table. Used where the platform lookup is unavailable.
#[derive(Debug, Default, Clone)]
pub struct StaticAdapterNames {
    names: HashMap<String, String>,
}

impl StaticAdapterNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, interface_id: &str, name: &str) -> Self {
        self.names.insert(interface_id.to_string(), name.to_string());
        self
    }
}

impl AdapterNameResolver for StaticAdapterNames {
    fn resolve_adapter_name(&self, interface_id: &str) -> Result<String, DiscoveryError> {
        self.names
            .get(interface_id)
            .cloned()
            .ok_or_else(|| not_found(interface_id))
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    const HARDWARE_PORTS: &str = "
Hardware Port: Ethernet
Device: en0
Ethernet Address: a8:a1:59:13:41:46

Hardware Port: Wi-Fi
Device: en1
Ethernet Address: 34:cf:f6:9a:11:22

VLAN Configurations
===================
";

    #[test]
    fn parse_hardware_ports_maps_devices_to_ports() {
        let ports = parse_hardware_ports(HARDWARE_PORTS);
        assert_eq!(ports.len(), 2);
        assert_eq!(ports.get("en0").map(String::as_str), Some("Ethernet"));
        assert_eq!(ports.get("en1").map(String::as_str), Some("Wi-Fi"));
    }

    #[test]
    fn static_names_report_missing_adapter() {
        let names = StaticAdapterNames::new().with("{4D36E972}", "Wi-Fi");
        assert_eq!(names.resolve_adapter_name("{4D36E972}").unwrap(), "Wi-Fi");
        assert_eq!(
            names.resolve_adapter_name("eth9"),
            Err(DiscoveryError::AdapterNotFound {
                interface_id: "eth9".into()
            })
        );
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn system_names_reject_unknown_interface() {
        let result = SystemAdapterNames.resolve_adapter_name("definitely-not-an-iface0");
        assert!(matches!(result, Err(DiscoveryError::AdapterNotFound { .. })));
    }
}
