//! # Scan orchestration
//!
//! Drives one discovery run over a [`SubnetDescriptor`]:
//!
//! 1. **Sweeping**: every candidate except our own address is probed, at most
//!    `workers` at a time. The passive listener starts alongside.
//! 2. **Classifying**: live addresses walk the [`ClassifierChain`], bounded the same way.
//! 3. **PassiveDiscovering**: waits for the passive listener's window to close.
//! 4. **Merging**: sightings are upserted; passive types win except for pinned
//!    identities (our own address and the gateway).
//!
//! The orchestrator is the only writer of the [`HostTable`].

use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use lanmap_common::config::ScanConfig;
use lanmap_common::error::DiscoveryError;
use lanmap_common::network::adapter::SystemAdapterNames;
use lanmap_common::network::host::{DeviceType, DiscoverySource, HostRecord, HostTable, ScanResult};
use lanmap_common::network::interface::InterfaceSelector;
use lanmap_common::network::subnet::{self, SubnetDescriptor};
use lanmap_common::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::classify::ClassifierChain;
use crate::passive::{CastScanner, PassiveScanner, Sighting};
use crate::probe::{self, Prober};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPhase {
    #[default]
    Idle,
    Enumerating,
    Sweeping,
    Classifying,
    PassiveDiscovering,
    Merging,
    Done,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScanPhase::Idle => "idle",
            ScanPhase::Enumerating => "enumerating interfaces",
            ScanPhase::Sweeping => "sweeping subnet",
            ScanPhase::Classifying => "classifying hosts",
            ScanPhase::PassiveDiscovering => "listening for announcements",
            ScanPhase::Merging => "merging results",
            ScanPhase::Done => "done",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Phase(ScanPhase),
    /// `total` counts live addresses seen so far, our own excluded.
    HostAlive { addr: Ipv4Addr, total: usize },
}

pub type ScanObserver = Arc<dyn Fn(ScanEvent) + Send + Sync>;

pub struct Orchestrator {
    config: ScanConfig,
    prober: Arc<dyn Prober>,
    chain: ClassifierChain,
    passive: Option<Arc<dyn PassiveScanner>>,
    observer: Option<ScanObserver>,
}

impl Orchestrator {
    pub fn new(config: ScanConfig, prober: Arc<dyn Prober>, chain: ClassifierChain) -> Self {
        Self {
            config,
            prober,
            chain,
            passive: None,
            observer: None,
        }
    }

    pub fn with_passive(mut self, scanner: Arc<dyn PassiveScanner>) -> Self {
        self.passive = Some(scanner);
        self
    }

    pub fn with_observer(mut self, observer: Option<ScanObserver>) -> Self {
        self.observer = observer;
        self
    }

    fn emit(&self, event: ScanEvent) {
        if let Some(observer) = &self.observer {
            observer(event);
        }
    }

    /// Runs every phase against `subnet`. A cancelled run returns what it had so far.
    pub async fn run(&self, subnet: SubnetDescriptor, cancel: &CancelToken) -> ScanResult {
        let started = Instant::now();
        let mut table = HostTable::new();
        table.pin(HostRecord::new(
            subnet.local_addr(),
            DeviceType::Computer,
            DiscoverySource::Sweep,
        ));

        let listener = self.spawn_passive(cancel);

        self.emit(ScanEvent::Phase(ScanPhase::Sweeping));
        let live: Vec<Ipv4Addr> = self.sweep(&subnet, cancel).await;
        debug!("{} of {} candidates answered", live.len(), subnet.candidate_count());

        self.emit(ScanEvent::Phase(ScanPhase::Classifying));
        for record in self.classify(&subnet, live, cancel).await {
            if Some(record.ip) == subnet.gateway() {
                table.pin(record);
            } else {
                table.upsert(record);
            }
        }

        self.emit(ScanEvent::Phase(ScanPhase::PassiveDiscovering));
        let sightings: Vec<Sighting> = match listener {
            Some(task) => task.await.unwrap_or_else(|e| {
                warn!("Passive discovery task failed: {e}");
                Vec::new()
            }),
            None => Vec::new(),
        };

        self.emit(ScanEvent::Phase(ScanPhase::Merging));
        for sighting in sightings {
            if !subnet.network().contains(sighting.addr) {
                debug!("Ignoring announcement from {} outside {}", sighting.addr, subnet.network());
                continue;
            }
            table.upsert(sighting.into_record());
        }

        let result: ScanResult = table.finalize(subnet, started.elapsed(), cancel.is_cancelled());
        self.emit(ScanEvent::Phase(ScanPhase::Done));
        result
    }

    fn spawn_passive(&self, cancel: &CancelToken) -> Option<tokio::task::JoinHandle<Vec<Sighting>>> {
        if !self.config.passive {
            return None;
        }

        let scanner: Arc<dyn PassiveScanner> = Arc::clone(self.passive.as_ref()?);
        let window = self.config.discovery_window;
        let cancel = cancel.clone();
        Some(tokio::spawn(async move { scanner.listen(window, cancel).await }))
    }

    async fn sweep(&self, subnet: &SubnetDescriptor, cancel: &CancelToken) -> Vec<Ipv4Addr> {
        let own_addr: Ipv4Addr = subnet.local_addr();
        let timeout = self.config.ping_timeout;
        let mut alive: usize = 0;

        stream::iter(subnet.candidates().to_iter().filter(move |addr| *addr != own_addr))
            .map(|addr| async move {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    reachable = self.prober.probe(addr, timeout) => reachable.then_some(addr),
                }
            })
            .buffer_unordered(self.config.worker_limit())
            .filter_map(std::future::ready)
            .inspect(|addr| {
                alive += 1;
                self.emit(ScanEvent::HostAlive {
                    addr: *addr,
                    total: alive,
                });
            })
            .collect()
            .await
    }

    async fn classify(
        &self,
        subnet: &SubnetDescriptor,
        live: Vec<Ipv4Addr>,
        cancel: &CancelToken,
    ) -> Vec<HostRecord> {
        let gateway: Option<Ipv4Addr> = subnet.gateway();

        stream::iter(live)
            .map(|addr| async move {
                if Some(addr) == gateway {
                    return HostRecord::new(addr, DeviceType::Router, DiscoverySource::Sweep);
                }
                if !self.config.classify {
                    return HostRecord::new(addr, DeviceType::Computer, DiscoverySource::Sweep);
                }

                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        HostRecord::new(addr, DeviceType::Unknown, DiscoverySource::Sweep)
                    }
                    record = self.chain.classify(addr) => record,
                }
            })
            .buffer_unordered(self.config.worker_limit())
            .collect()
            .await
    }
}

/// Scans the subnet attached to the interface picked by `selector`.
///
/// Fails before any traffic is sent when the interface cannot be resolved or
/// has no usable IPv4 network.
pub async fn run_scan(
    selector: &InterfaceSelector,
    config: ScanConfig,
    cancel: &CancelToken,
) -> Result<ScanResult, DiscoveryError> {
    run_scan_observed(selector, config, cancel, None).await
}

/// [`run_scan`] reporting phases and live hosts to `observer`.
pub async fn run_scan_observed(
    selector: &InterfaceSelector,
    config: ScanConfig,
    cancel: &CancelToken,
    observer: Option<ScanObserver>,
) -> Result<ScanResult, DiscoveryError> {
    if let Some(observer) = &observer {
        observer(ScanEvent::Phase(ScanPhase::Enumerating));
    }

    let subnet: SubnetDescriptor = subnet::enumerate(selector, &SystemAdapterNames)?;
    info!(
        "Scanning {} on {} ({} candidates)",
        subnet.network(),
        subnet.display_name(),
        subnet.candidate_count()
    );
    if subnet.gateway().is_none() {
        warn!("No default gateway found on {}", subnet.interface());
    }

    let chain: ClassifierChain = match config.classify {
        true => ClassifierChain::standard(&subnet, &config).map_err(|e| {
            DiscoveryError::Configuration {
                interface: subnet.interface().to_string(),
                reason: format!("{e:#}"),
            }
        })?,
        false => ClassifierChain::default(),
    };
    debug!("Classifier chain: [{}]", chain.names().join(", "));

    let passive: Arc<dyn PassiveScanner> = Arc::new(CastScanner::new(subnet.local_addr()));
    let orchestrator = Orchestrator::new(config, probe::system_prober(), chain)
        .with_passive(passive)
        .with_observer(observer);

    Ok(orchestrator.run(subnet, cancel).await)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
