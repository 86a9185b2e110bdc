//! # Device classification
//!
//! Every live address walks an ordered [`ClassifierChain`]. Each link either
//! names the device or declines, and the first verdict wins. An address
//! nobody claims is a [`DeviceType::Computer`].
//!
//! Links never abort a scan: errors, timeouts and panics are logged at debug
//! level and the chain moves on to the next link.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lanmap_common::config::ScanConfig;
use lanmap_common::debug;
use lanmap_common::network::host::{DeviceType, DiscoverySource, HostRecord};
use lanmap_common::network::subnet::SubnetDescriptor;

pub mod gateway;
pub mod printer;
pub mod set_top_box;

#[cfg(test)]
mod http_stub;

pub use gateway::GatewayClassifier;
pub use printer::PrinterClassifier;
pub use set_top_box::SetTopBoxClassifier;

/// Outcome of one link of the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Match {
        device_type: DeviceType,
        name: Option<String>,
    },
    Decline,
}

impl Verdict {
    pub fn matched(device_type: DeviceType) -> Self {
        Verdict::Match {
            device_type,
            name: None,
        }
    }

    pub fn named(device_type: DeviceType, name: Option<String>) -> Self {
        Verdict::Match { device_type, name }
    }
}

#[async_trait]
pub trait Classifier: Send + Sync {
    fn name(&self) -> &'static str;

    /// Budget for one [`classify`](Classifier::classify) call, independent of the ping timeout.
    fn timeout(&self) -> Duration;

    async fn classify(&self, addr: Ipv4Addr) -> anyhow::Result<Verdict>;
}

#[derive(Clone, Default)]
pub struct ClassifierChain {
    links: Vec<Arc<dyn Classifier>>,
}

impl ClassifierChain {
    pub fn new(links: Vec<Arc<dyn Classifier>>) -> Self {
        Self { links }
    }

    /// Gateway check, set-top box descriptor, then IPP printer.
    pub fn standard(subnet: &SubnetDescriptor, config: &ScanConfig) -> anyhow::Result<Self> {
        Ok(Self::new(vec![
            Arc::new(GatewayClassifier::new(subnet.gateway())),
            Arc::new(SetTopBoxClassifier::new(
                config.descriptor_timeout,
                config.set_top_box_needles.clone(),
            )?),
            Arc::new(PrinterClassifier::new(config.printer_timeout)?),
        ]))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.links.iter().map(|link| link.name()).collect()
    }

    pub async fn classify(&self, addr: Ipv4Addr) -> HostRecord {
        for link in &self.links {
            let name: &'static str = link.name();
            match run_link(Arc::clone(link), addr).await {
                Some(Verdict::Match { device_type, name: label }) => {
                    debug!("{addr} classified as {device_type} by {name}");
                    return HostRecord::new(addr, device_type, DiscoverySource::Sweep)
                        .with_name(label);
                }
                Some(Verdict::Decline) | None => continue,
            }
        }

        HostRecord::new(addr, DeviceType::Computer, DiscoverySource::Sweep)
    }
}

/// Runs one link on its own task so a panic stays contained, within the link's timeout.
async fn run_link(link: Arc<dyn Classifier>, addr: Ipv4Addr) -> Option<Verdict> {
    let name: &'static str = link.name();
    let budget: Duration = link.timeout();
    let task = tokio::spawn(async move { link.classify(addr).await });
    let abort = task.abort_handle();

    match tokio::time::timeout(budget, task).await {
        Ok(Ok(Ok(verdict))) => Some(verdict),
        Ok(Ok(Err(e))) => {
            debug!("{name} failed for {addr}: {e:#}");
            None
        }
        Ok(Err(join_err)) => {
            debug!("{name} crashed for {addr}: {join_err}");
            None
        }
        Err(_) => {
            abort.abort();
            debug!("{name} timed out for {addr} after {budget:?}");
            None
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
