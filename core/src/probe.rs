//! # Reachability probing
//!
//! A [`Prober`] answers one question: did `addr` answer within `timeout`?
//! Unreachable hosts are a normal `false`, never an error.
//!
//! [`IcmpProber`] sends a single echo request and needs a raw or datagram
//! ICMP socket. When the OS refuses one, [`system_prober`] falls back to
//! [`TcpProber`], which treats a completed or refused handshake as proof of life.

use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use lanmap_common::{debug, warn};
use surge_ping::{Client, Config, PingIdentifier, PingSequence};
use tokio::net::TcpStream;

const ECHO_PAYLOAD: [u8; 56] = [0; 56];

/// Ports tried by the TCP fallback. Any answer, even a refusal, means a host is there.
pub const HANDSHAKE_PORTS: [u16; 4] = [443, 80, 22, 445];

#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, addr: Ipv4Addr, timeout: Duration) -> bool;
}

/// ICMP echo prober. The client is shared, every probe carries its own identifier.
pub struct IcmpProber {
    client: Arc<Client>,
}

impl IcmpProber {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::new(&Config::default()).context("opening ICMP socket")?;
        Ok(Self {
            client: Arc::new(client),
        })
    }
}

#[async_trait]
impl Prober for IcmpProber {
    async fn probe(&self, addr: Ipv4Addr, timeout: Duration) -> bool {
        let identifier = PingIdentifier(rand::random::<u16>());
        let mut pinger = self.client.pinger(IpAddr::V4(addr), identifier).await;

        match pinger
            .timeout(timeout)
            .ping(PingSequence(0), &ECHO_PAYLOAD)
            .await
        {
            Ok((_, rtt)) => {
                debug!("{addr} answered echo in {rtt:?}");
                true
            }
            Err(_) => false,
        }
    }
}

/// Handshake prober used when ICMP sockets are unavailable.
pub struct TcpProber {
    ports: Vec<u16>,
}

impl Default for TcpProber {
    fn default() -> Self {
        Self::new(HANDSHAKE_PORTS.to_vec())
    }
}

impl TcpProber {
    pub fn new(ports: Vec<u16>) -> Self {
        Self { ports }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, addr: Ipv4Addr, timeout: Duration) -> bool {
        if self.ports.is_empty() {
            return false;
        }

        let attempts = self
            .ports
            .iter()
            .map(|port| Box::pin(handshake_probe(SocketAddr::new(IpAddr::V4(addr), *port), timeout)));

        futures::future::select_ok(attempts).await.is_ok()
    }
}

/// Succeeds when something at `target` completed or actively refused the handshake.
async fn handshake_probe(target: SocketAddr, timeout: Duration) -> anyhow::Result<()> {
    match tokio::time::timeout(timeout, TcpStream::connect(target)).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => Ok(()),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => anyhow::bail!("{target} timed out"),
    }
}

/// ICMP when the process may open an ICMP socket, TCP handshakes otherwise.
///
/// Must be called from within a tokio runtime.
pub fn system_prober() -> Arc<dyn Prober> {
    match IcmpProber::new() {
        Ok(prober) => Arc::new(prober),
        Err(e) => {
            warn!("ICMP unavailable ({e:#}), falling back to TCP handshake probing");
            Arc::new(TcpProber::default())
        }
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
