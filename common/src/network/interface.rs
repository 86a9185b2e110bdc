use std::fmt;
use std::str::FromStr;

use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::{IpNetwork, Ipv4Network};

use crate::error::DiscoveryError;
use crate::network::adapter::AdapterNameResolver;

#[cfg(target_os = "linux")]
use linux_impl::{is_physical, is_wireless};
#[cfg(target_os = "macos")]
use macos_impl::{is_physical, is_wireless};
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
use generic_impl::{is_physical, is_wireless};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    IsDown,
    /// The interface was filtered out as "not physical" by the provided logic.
    NotPhysical,
    /// The interface does not have a MAC address.
    NoMacAddress,
    /// The interface does not support broadcast.
    NotBroadcast,
    /// The interface is a point-to-point link (e.g., a VPN).
    IsPointToPoint,
    /// The interface has no private IPv4 address.
    NoValidLanIp,
}

/// Which interface a scan should run on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InterfaceSelector {
    /// Pick the best LAN interface, wired before wireless.
    #[default]
    Auto,
    /// Match an OS interface id or its display name, case-insensitively.
    Name(String),
}

impl FromStr for InterfaceSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(String::from("interface name cannot be empty"));
        }
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(InterfaceSelector::Auto);
        }
        Ok(InterfaceSelector::Name(trimmed.to_string()))
    }
}

impl fmt::Display for InterfaceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceSelector::Auto => f.write_str("auto"),
            InterfaceSelector::Name(name) => f.write_str(name),
        }
    }
}

/// Resolves `selector` against `interfaces`.
pub fn select<'a>(
    selector: &InterfaceSelector,
    interfaces: &'a [NetworkInterface],
    names: &dyn AdapterNameResolver,
) -> Result<&'a NetworkInterface, DiscoveryError> {
    let selected = match selector {
        InterfaceSelector::Auto => auto_select(interfaces),
        InterfaceSelector::Name(wanted) => select_by_name(interfaces, wanted, names),
    };

    selected.ok_or_else(|| DiscoveryError::InterfaceResolution {
        selector: selector.to_string(),
    })
}

/// The interface [`InterfaceSelector::Auto`] would scan.
pub fn auto_select(interfaces: &[NetworkInterface]) -> Option<&NetworkInterface> {
    let viable: Vec<&NetworkInterface> = interfaces
        .iter()
        .filter(|interface| is_viable_lan_interface(interface, is_physical).is_ok())
        .collect();

    select_best_lan_interface(viable, is_wired)
}

fn select_by_name<'a>(
    interfaces: &'a [NetworkInterface],
    wanted: &str,
    names: &dyn AdapterNameResolver,
) -> Option<&'a NetworkInterface> {
    let wanted_lower: String = wanted.to_lowercase();

    interfaces
        .iter()
        .find(|interface| interface.name.eq_ignore_ascii_case(wanted))
        .or_else(|| {
            interfaces.iter().find(|interface| {
                names
                    .resolve_adapter_name(&interface.name)
                    .is_ok_and(|display| display.to_lowercase() == wanted_lower)
            })
        })
}

/// First IPv4 network of the interface, preferring private addresses.
pub fn ipv4_network(interface: &NetworkInterface) -> Option<Ipv4Network> {
    let v4_nets: Vec<Ipv4Network> = interface
        .ips
        .iter()
        .filter_map(|net| match net {
            IpNetwork::V4(v4) if !v4.ip().is_loopback() && !v4.ip().is_unspecified() => Some(*v4),
            _ => None,
        })
        .collect();

    v4_nets
        .iter()
        .find(|net| net.ip().is_private())
        .or_else(|| v4_nets.first())
        .copied()
}

fn is_viable_lan_interface(
    interface: &NetworkInterface,
    is_physical: impl Fn(&NetworkInterface) -> bool,
) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if !is_physical(interface) {
        return Err(ViabilityError::NotPhysical);
    }
    if interface.is_loopback() {
        return Err(ViabilityError::NotPhysical);
    }
    if interface.mac.is_none() {
        return Err(ViabilityError::NoMacAddress);
    }
    if !interface.is_broadcast() {
        return Err(ViabilityError::NotBroadcast);
    }
    if interface.is_point_to_point() {
        return Err(ViabilityError::IsPointToPoint);
    }
    let has_valid_ip = interface.ips.iter().any(|net| match net {
        IpNetwork::V4(ipv4) => ipv4.ip().is_private(),
        IpNetwork::V6(_) => false,
    });
    if !has_valid_ip {
        return Err(ViabilityError::NoValidLanIp);
    }

    Ok(())
}

fn select_best_lan_interface<'a>(
    interfaces: Vec<&'a NetworkInterface>,
    is_wired: impl Fn(&NetworkInterface) -> bool,
) -> Option<&'a NetworkInterface> {
    interfaces
        .iter()
        .find(|interface| is_wired(interface))
        .or(interfaces.first())
        .copied()
}

fn is_wired(interface: &NetworkInterface) -> bool {
    is_physical(interface) && !is_wireless(interface)
}

#[cfg(target_os = "linux")]
mod linux_impl {
    use super::*;
    use std::path::Path;

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/device", interface.name)).exists()
    }

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/wireless", interface.name)).exists()
    }
}

#[cfg(target_os = "macos")]
mod macos_impl {
    use super::*;
    use std::collections::HashSet;
    use std::process::Command;
    use std::sync::OnceLock;

    struct HardwareInfo {
        physical_devices: HashSet<String>,
        wireless_devices: HashSet<String>,
    }

    /// Runs the shell commands only once on first access.
    fn get_hardware_info() -> &'static HardwareInfo {
        static HARDWARE_INFO: OnceLock<HardwareInfo> = OnceLock::new();

        HARDWARE_INFO.get_or_init(|| {
            let mut physical = HashSet::new();
            let mut wireless = HashSet::new();

            if let Ok(output) = Command::new("networksetup").arg("-listallhardwareports").output() {
                let stdout = String::from_utf8_lossy(&output.stdout);
                for line in stdout.lines() {
                    if let Some(device) = line.strip_prefix("Device: ") {
                        physical.insert(device.trim().to_string());
                    }
                }
            }

            for device in &physical {
                let is_wifi = Command::new("networksetup")
                    .arg("-getairportnetwork")
                    .arg(device)
                    .output()
                    .map(|out| out.status.success())
                    .unwrap_or(false);

                if is_wifi {
                    wireless.insert(device.clone());
                }
            }

            HardwareInfo {
                physical_devices: physical,
                wireless_devices: wireless,
            }
        })
    }

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        get_hardware_info().physical_devices.contains(&interface.name)
    }

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        get_hardware_info().wireless_devices.contains(&interface.name)
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
mod generic_impl {
    use super::*;

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        !interface.is_loopback()
    }

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        let description = interface.description.to_lowercase();
        description.contains("wi-fi") || description.contains("wireless")
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
