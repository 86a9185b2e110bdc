use crate::terminal::colors;
use colored::*;
use lanmap_common::network::host::{DeviceType, DiscoverySource, HostRecord};
use std::net::{IpAddr, Ipv6Addr};
use std::time::Duration;

pub type Detail = (String, ColoredString);

pub fn ipv6_to_type_str(ipv6_addr: &Ipv6Addr) -> &'static str {
    if is_global_unicast(ipv6_addr) {
        return "GUA";
    }
    if ipv6_addr.is_unique_local() {
        return "ULA";
    }
    if ipv6_addr.is_unicast_link_local() {
        return "LLA";
    }
    "IPv6"
}

/// 2000::/3
fn is_global_unicast(ipv6_addr: &Ipv6Addr) -> bool {
    let first_byte = ipv6_addr.octets()[0];
    (0x20..=0x3F).contains(&first_byte)
}

pub fn ip_to_detail(ip: IpAddr) -> Detail {
    match ip {
        IpAddr::V4(ipv4_addr) => ("IPv4".to_string(), ipv4_addr.to_string().color(colors::IPV4_ADDR)),
        IpAddr::V6(ipv6_addr) => (
            ipv6_to_type_str(&ipv6_addr).to_string(),
            ipv6_addr.to_string().color(colors::IPV6_ADDR),
        ),
    }
}

pub fn device_color(device_type: DeviceType) -> Color {
    match device_type {
        DeviceType::Router => colors::ROUTER,
        DeviceType::Printer => colors::PRINTER,
        DeviceType::SetTopBox => colors::SET_TOP_BOX,
        DeviceType::SmartTv => colors::SMART_TV,
        DeviceType::Computer => colors::COMPUTER,
        DeviceType::Unknown => colors::UNKNOWN,
    }
}

pub fn host_details(host: &HostRecord, is_self: bool) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![ip_to_detail(IpAddr::V4(host.ip))];

    let mut kind: ColoredString = host.device_type.label().color(device_color(host.device_type)).bold();
    if is_self {
        kind = format!("{kind} {}", "(this device)".color(colors::SEPARATOR)).normal();
    }
    details.push(("Type".to_string(), kind));

    let source: ColoredString = match host.source {
        DiscoverySource::Sweep => host.source.to_string().color(colors::TEXT_DEFAULT),
        DiscoverySource::Passive => host.source.to_string().color(colors::ACCENT),
    };
    details.push(("Source".to_string(), source));

    if let Some(name) = &host.name {
        details.push(("Name".to_string(), name.color(colors::SECONDARY)));
    }

    details
}

pub fn duration(total: Duration) -> String {
    format!("{:.2}s", total.as_secs_f64())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
