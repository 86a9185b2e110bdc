//! # Subnet Enumeration
//!
//! Turns an [`InterfaceSelector`] into the [`SubnetDescriptor`] a scan runs
//! against: the chosen interface, the address this host holds on it, the
//! attached IPv4 network and its default gateway.

use std::net::Ipv4Addr;

use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::Ipv4Network;

use crate::error::DiscoveryError;
use crate::network::adapter::AdapterNameResolver;
use crate::network::gateway;
use crate::network::interface::{self, InterfaceSelector};
use crate::network::range::{self, Ipv4Range};

/// Smallest prefix a sweep accepts. Anything wider than a /16 would take hours.
pub const MIN_SCAN_PREFIX: u8 = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetDescriptor {
    interface: String,
    display_name: String,
    network: Ipv4Network,
    gateway: Option<Ipv4Addr>,
}

impl SubnetDescriptor {
    /// `network` must carry this host's own address, as interface networks do.
    pub fn new(
        interface: impl Into<String>,
        display_name: impl Into<String>,
        network: Ipv4Network,
        gateway: Option<Ipv4Addr>,
    ) -> Self {
        Self {
            interface: interface.into(),
            display_name: display_name.into(),
            network,
            gateway,
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn local_addr(&self) -> Ipv4Addr {
        self.network.ip()
    }

    pub fn network(&self) -> Ipv4Network {
        self.network
    }

    pub fn prefix(&self) -> u8 {
        self.network.prefix()
    }

    pub fn gateway(&self) -> Option<Ipv4Addr> {
        self.gateway
    }

    /// Every host address of the network, this host's own included.
    pub fn candidates(&self) -> Ipv4Range {
        range::host_range(&self.network)
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates().len()
    }
}

/// Describes the subnet attached to the interface picked by `selector` on this machine.
pub fn enumerate(
    selector: &InterfaceSelector,
    names: &dyn AdapterNameResolver,
) -> Result<SubnetDescriptor, DiscoveryError> {
    let interfaces: Vec<NetworkInterface> = pnet::datalink::interfaces();
    describe(selector, &interfaces, names, gateway::default_gateway)
}

/// Same as [`enumerate`] against an explicit interface list and gateway lookup.
pub fn describe(
    selector: &InterfaceSelector,
    interfaces: &[NetworkInterface],
    names: &dyn AdapterNameResolver,
    gateway_of: impl Fn(&str) -> Option<Ipv4Addr>,
) -> Result<SubnetDescriptor, DiscoveryError> {
    let intf: &NetworkInterface = interface::select(selector, interfaces, names)?;

    let network: Ipv4Network =
        interface::ipv4_network(intf).ok_or_else(|| DiscoveryError::Configuration {
            interface: intf.name.clone(),
            reason: String::from("no IPv4 address assigned"),
        })?;

    if network.prefix() < MIN_SCAN_PREFIX {
        return Err(DiscoveryError::Configuration {
            interface: intf.name.clone(),
            reason: format!("/{} network is too large to sweep", network.prefix()),
        });
    }

    let display_name: String = names.resolve_adapter_name(&intf.name)?;
    let gateway: Option<Ipv4Addr> = gateway_of(&intf.name)
        .filter(|gw| network.contains(*gw) && *gw != network.ip());

    Ok(SubnetDescriptor::new(
        intf.name.clone(),
        display_name,
        network,
        gateway,
    ))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
