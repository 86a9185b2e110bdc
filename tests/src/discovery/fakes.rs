use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use lanmap_common::network::host::DeviceType;
use lanmap_common::network::subnet::SubnetDescriptor;
use lanmap_core::CancelToken;
use lanmap_core::classify::{Classifier, Verdict};
use lanmap_core::passive::{PassiveScanner, Sighting};
use lanmap_core::probe::Prober;
use pnet::ipnetwork::Ipv4Network;

pub fn ip(last: u8) -> Ipv4Addr {
    Ipv4Addr::new(192, 168, 1, last)
}

/// 192.168.1.0/24, this host at .50, gateway at .1.
pub fn home_subnet() -> SubnetDescriptor {
    let network = Ipv4Network::new(ip(50), 24).unwrap();
    SubnetDescriptor::new("eth0", "Ethernet", network, Some(ip(1)))
}

/// Answers for a fixed set of addresses after `delay`.
pub struct FakeProber {
    live: HashSet<Ipv4Addr>,
    delay: Duration,
    pub probes: AtomicUsize,
}

impl FakeProber {
    pub fn new(live: &[Ipv4Addr]) -> Self {
        Self::slow(live, Duration::ZERO)
    }

    pub fn slow(live: &[Ipv4Addr], delay: Duration) -> Self {
        Self {
            live: live.iter().copied().collect(),
            delay,
            probes: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Prober for FakeProber {
    async fn probe(&self, addr: Ipv4Addr, timeout: Duration) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay.min(timeout)).await;
        }
        self.live.contains(&addr)
    }
}

/// Reports the same sightings on every run.
pub struct FakePassive {
    sightings: Vec<Sighting>,
}

impl FakePassive {
    pub fn new(sightings: Vec<Sighting>) -> Self {
        Self { sightings }
    }
}

#[async_trait]
impl PassiveScanner for FakePassive {
    async fn listen(&self, window: Duration, cancel: CancelToken) -> Vec<Sighting> {
        tokio::select! {
            _ = tokio::time::sleep(window) => {}
            _ = cancel.cancelled() => {}
        }
        self.sightings.clone()
    }
}

/// Classifier that counts its invocations and always declines.
pub struct CountingDecline {
    pub calls: Arc<AtomicUsize>,
}

impl CountingDecline {
    pub fn new() -> (Arc<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Arc::new(Self {
                calls: Arc::clone(&calls),
            }),
            calls,
        )
    }
}

#[async_trait]
impl Classifier for CountingDecline {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(1)
    }

    async fn classify(&self, _addr: Ipv4Addr) -> anyhow::Result<Verdict> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Verdict::Decline)
    }
}

/// Claims a single address as the given type.
pub struct ClaimOne {
    pub addr: Ipv4Addr,
    pub device_type: DeviceType,
}

#[async_trait]
impl Classifier for ClaimOne {
    fn name(&self) -> &'static str {
        "claim-one"
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(1)
    }

    async fn classify(&self, addr: Ipv4Addr) -> anyhow::Result<Verdict> {
        match addr == self.addr {
            true => Ok(Verdict::matched(self.device_type)),
            false => Ok(Verdict::Decline),
        }
    }
}
