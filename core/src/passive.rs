//! # Passive discovery
//!
//! Cast-capable TVs and dongles announce themselves over mDNS. A
//! [`CastScanner`] sends one query for the cast service and collects every
//! answer that arrives within the discovery window. Its socket lives exactly
//! as long as that window, or until the scan is cancelled.

use std::collections::BTreeMap;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use async_trait::async_trait;
use lanmap_common::network::host::{DeviceType, DiscoverySource, HostRecord};
use lanmap_common::{debug, warn};
use lanmap_protocols::mdns::{self, CAST_SERVICE, MDNS_ADDR, MDNS_PORT};
use tokio::net::UdpSocket;

use crate::cancel::CancelToken;

/// Large enough for any mDNS datagram on a standard Ethernet link.
const RECV_BUFFER: usize = 9_000;

/// A device that announced itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sighting {
    pub addr: Ipv4Addr,
    pub device_type: DeviceType,
    pub name: Option<String>,
}

impl Sighting {
    pub fn smart_tv(addr: Ipv4Addr, name: Option<String>) -> Self {
        Self {
            addr,
            device_type: DeviceType::SmartTv,
            name,
        }
    }

    pub fn into_record(self) -> HostRecord {
        HostRecord::new(self.addr, self.device_type, DiscoverySource::Passive).with_name(self.name)
    }
}

#[async_trait]
pub trait PassiveScanner: Send + Sync {
    /// Listens for at most `window`, returning early once `cancel` fires.
    async fn listen(&self, window: Duration, cancel: CancelToken) -> Vec<Sighting>;
}

pub struct CastScanner {
    bind_addr: Ipv4Addr,
    target: SocketAddrV4,
}

impl CastScanner {
    /// Queries from `bind_addr`, the scanning host's address on the chosen interface.
    pub fn new(bind_addr: Ipv4Addr) -> Self {
        Self {
            bind_addr,
            target: SocketAddrV4::new(MDNS_ADDR, MDNS_PORT),
        }
    }

    pub fn with_target(mut self, target: SocketAddrV4) -> Self {
        self.target = target;
        self
    }

    async fn open_socket(&self) -> anyhow::Result<UdpSocket> {
        let socket = UdpSocket::bind(SocketAddrV4::new(self.bind_addr, 0)).await?;
        if self.target.ip().is_multicast() {
            socket.set_multicast_ttl_v4(255)?;
        }

        let query: Vec<u8> = mdns::create_query(CAST_SERVICE, rand::random::<u16>())?;
        socket.send_to(&query, self.target).await?;
        Ok(socket)
    }
}

#[async_trait]
impl PassiveScanner for CastScanner {
    async fn listen(&self, window: Duration, cancel: CancelToken) -> Vec<Sighting> {
        let socket: UdpSocket = match self.open_socket().await {
            Ok(socket) => socket,
            Err(e) => {
                warn!("Passive discovery unavailable: {e:#}");
                return Vec::new();
            }
        };

        let mut found: BTreeMap<Ipv4Addr, Sighting> = BTreeMap::new();
        let mut buf = vec![0u8; RECV_BUFFER];
        let deadline = tokio::time::sleep(window);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut deadline => break,
                _ = cancel.cancelled() => break,
                received = socket.recv_from(&mut buf) => match received {
                    Ok((len, SocketAddr::V4(source))) => {
                        for sighting in sightings_from(&buf[..len], *source.ip()) {
                            found.entry(sighting.addr).or_insert(sighting);
                        }
                    }
                    Ok(_) => {}
                    Err(e) => debug!("mDNS receive failed: {e}"),
                },
            }
        }

        drop(socket);
        found.into_values().collect()
    }
}

/// Cast devices described by one datagram received from `source`.
///
/// A-record addresses win, the datagram source is used when there are none.
pub fn sightings_from(data: &[u8], source: Ipv4Addr) -> Vec<Sighting> {
    let announcement = match mdns::extract_cast_announcement(data) {
        Ok(announcement) => announcement,
        Err(e) => {
            debug!("Ignoring datagram from {source}: {e:#}");
            return Vec::new();
        }
    };

    if !announcement.service_matched {
        return Vec::new();
    }

    let name: Option<String> = announcement.label();
    let addrs: Vec<Ipv4Addr> = match announcement.ips.is_empty() {
        true => vec![source],
        false => announcement.ips,
    };

    addrs
        .into_iter()
        .map(|addr| Sighting::smart_tv(addr, name.clone()))
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
