use std::net::Ipv4Addr;

use pnet::ipnetwork::Ipv4Network;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    pub fn to_iter(&self) -> impl Iterator<Item = Ipv4Addr> + use<> {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        (start..=end).map(Ipv4Addr::from)
    }

    pub fn len(&self) -> usize {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        if start > end {
            return 0;
        }
        (end - start) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        let addr: u32 = addr.into();
        u32::from(self.start_addr) <= addr && addr <= u32::from(self.end_addr)
    }
}

/// Usable host addresses of `net`, network and broadcast addresses stripped.
///
/// Point-to-point (/31) and single host (/32) networks have nothing to strip
/// and are returned whole.
pub fn host_range(net: &Ipv4Network) -> Ipv4Range {
    let net_u32: u32 = u32::from(net.network());
    let broadcast_u32: u32 = u32::from(net.broadcast());

    if net.prefix() >= 31 {
        return Ipv4Range::new(net.network(), net.broadcast());
    }

    let start_u32 = net_u32.saturating_add(1);
    let end_u32 = broadcast_u32.saturating_sub(1);
    Ipv4Range::new(Ipv4Addr::from(start_u32), Ipv4Addr::from(end_u32))
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

    fn net(a: u8, b: u8, c: u8, d: u8, prefix: u8) -> Ipv4Network {
        Ipv4Network::new(Ipv4Addr::new(a, b, c, d), prefix).unwrap()
    }

    #[test]
    fn host_range_strips_network_and_broadcast() {
        let range: Ipv4Range = host_range(&net(192, 168, 1, 50, 24));
        assert_eq!(range.start_addr, Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(range.end_addr, Ipv4Addr::new(192, 168, 1, 254));
        assert_eq!(range.len(), 254);
        assert!(!range.contains(Ipv4Addr::new(192, 168, 1, 0)));
        assert!(!range.contains(Ipv4Addr::new(192, 168, 1, 255)));
    }

    #[test]
    fn host_range_of_slash_30_has_two_hosts() {
        let hosts: Vec<Ipv4Addr> = host_range(&net(10, 0, 0, 1, 30)).to_iter().collect();
        assert_eq!(hosts, vec![Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)]);
    }

    #[test]
    fn host_range_keeps_point_to_point_links_whole() {
        assert_eq!(host_range(&net(10, 0, 0, 0, 31)).len(), 2);
        let single: Ipv4Range = host_range(&net(10, 0, 0, 7, 32));
        assert_eq!(single.len(), 1);
        assert_eq!(single.start_addr, Ipv4Addr::new(10, 0, 0, 7));
    }

    #[test]
    fn reversed_range_is_empty() {
        let range = Ipv4Range::new(Ipv4Addr::new(10, 0, 0, 9), Ipv4Addr::new(10, 0, 0, 1));
        assert!(range.is_empty());
        assert_eq!(range.to_iter().count(), 0);
    }
}
