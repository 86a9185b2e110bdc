use std::net::Ipv4Addr;

const RTF_UP: u32 = 0x1;
const RTF_GATEWAY: u32 = 0x2;

/// Default IPv4 gateway routed through `interface`, if the OS exposes one.
#[cfg(target_os = "linux")]
pub fn default_gateway(interface: &str) -> Option<Ipv4Addr> {
    let content = std::fs::read_to_string("/proc/net/route").ok()?;
    parse_proc_route(&content, interface)
}

#[cfg(target_os = "macos")]
pub fn default_gateway(interface: &str) -> Option<Ipv4Addr> {
    let output = std::process::Command::new("route")
        .args(["-n", "get", "default"])
        .output()
        .ok()?;
    parse_route_get(&String::from_utf8_lossy(&output.stdout), interface)
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub fn default_gateway(_interface: &str) -> Option<Ipv4Addr> {
    None
}

/// Finds the default route of `interface` in `/proc/net/route`.
///
/// Destination must be `00000000` with both `RTF_UP` and `RTF_GATEWAY` set.
/// The gateway column is the address in little-endian hex.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_proc_route(content: &str, interface: &str) -> Option<Ipv4Addr> {
    content.lines().skip(1).find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 || fields[0] != interface || fields[1] != "00000000" {
            return None;
        }

        let flags = u32::from_str_radix(fields[3], 16).ok()?;
        if flags & (RTF_UP | RTF_GATEWAY) != RTF_UP | RTF_GATEWAY {
            return None;
        }

        let raw = u32::from_str_radix(fields[2], 16).ok()?;
        let [a, b, c, d] = raw.to_le_bytes();
        Some(Ipv4Addr::new(a, b, c, d))
    })
}

/// Reads `gateway:` from `route -n get default` when the route leaves through `interface`.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn parse_route_get(stdout: &str, interface: &str) -> Option<Ipv4Addr> {
    let mut gateway: Option<Ipv4Addr> = None;
    let mut route_interface: Option<&str> = None;

    for line in stdout.lines() {
        let Some((key, value)) = line.trim().split_once(':') else {
            continue;
        };
        match key.trim() {
            "gateway" => gateway = value.trim().parse().ok(),
            "interface" => route_interface = Some(value.trim()),
            _ => {}
        }
    }

    match route_interface {
        Some(name) if name != interface => None,
        _ => gateway,
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
