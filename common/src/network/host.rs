//! # Host Table
//!
//! The records a scan produces and the table that merges them.
//!
//! Every record is keyed by its IPv4 address. The sweep and the passive
//! listener both feed the same [`HostTable`]; [`HostTable::upsert`] decides
//! which source wins when they disagree about an address.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

use crate::network::subnet::SubnetDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Router,
    Printer,
    SetTopBox,
    SmartTv,
    Computer,
    Unknown,
}

impl DeviceType {
    pub fn label(&self) -> &'static str {
        match self {
            DeviceType::Router => "Router",
            DeviceType::Printer => "Printer",
            DeviceType::SetTopBox => "Set-top box",
            DeviceType::SmartTv => "Smart TV",
            DeviceType::Computer => "Computer",
            DeviceType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiscoverySource {
    /// Answered the reachability probe during the address sweep.
    Sweep,
    /// Announced itself to the passive listener.
    Passive,
}

impl DiscoverySource {
    /// Rank used when two sources report the same address. Self announcement
    /// outranks anything inferred by the sweep.
    fn priority(&self) -> u8 {
        match self {
            DiscoverySource::Sweep => 0,
            DiscoverySource::Passive => 1,
        }
    }
}

impl fmt::Display for DiscoverySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoverySource::Sweep => f.write_str("sweep"),
            DiscoverySource::Passive => f.write_str("passive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    pub ip: Ipv4Addr,
    pub device_type: DeviceType,
    pub source: DiscoverySource,
    /// Name the device reported about itself, if any probe got one.
    pub name: Option<String>,
}

impl HostRecord {
    pub fn new(ip: Ipv4Addr, device_type: DeviceType, source: DiscoverySource) -> Self {
        Self {
            ip,
            device_type,
            source,
            name: None,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn ip_string(&self) -> String {
        self.ip.to_string()
    }
}

/// Outcome of [`HostTable::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
    Kept,
}

/// Address keyed table with a single writer.
#[derive(Debug, Default)]
pub struct HostTable {
    hosts: BTreeMap<Ipv4Addr, HostRecord>,
    pinned: HashSet<Ipv4Addr>,
}

impl HostTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record no later upsert may change.
    ///
    /// Used for identities the scan knows for certain: its own address and
    /// the default gateway.
    pub fn pin(&mut self, record: HostRecord) {
        self.pinned.insert(record.ip);
        self.hosts.insert(record.ip, record);
    }

    /// Inserts `record`, or merges it into the record already stored for its address.
    ///
    /// The stored record is replaced only when the incoming source ranks at
    /// least as high. A name already known survives an update that carries none.
    pub fn upsert(&mut self, record: HostRecord) -> Upsert {
        if self.pinned.contains(&record.ip) {
            return Upsert::Kept;
        }

        let Some(existing) = self.hosts.get_mut(&record.ip) else {
            self.hosts.insert(record.ip, record);
            return Upsert::Inserted;
        };

        if record.source.priority() < existing.source.priority() {
            if existing.name.is_none() {
                existing.name = record.name;
            }
            return Upsert::Kept;
        }

        existing.device_type = record.device_type;
        existing.source = record.source;
        if record.name.is_some() {
            existing.name = record.name;
        }
        Upsert::Updated
    }

    pub fn get(&self, ip: &Ipv4Addr) -> Option<&HostRecord> {
        self.hosts.get(ip)
    }

    /// Freezes the table into a [`ScanResult`].
    pub fn finalize(self, subnet: SubnetDescriptor, duration: Duration, cancelled: bool) -> ScanResult {
        ScanResult {
            subnet,
            hosts: self.hosts.into_values().collect(),
            duration,
            cancelled,
        }
    }
}

/// Finished scan, ordered by address. Read-only once built.
#[derive(Debug, Clone)]
pub struct ScanResult {
    subnet: SubnetDescriptor,
    hosts: Vec<HostRecord>,
    duration: Duration,
    cancelled: bool,
}

impl ScanResult {
    pub fn subnet(&self) -> &SubnetDescriptor {
        &self.subnet
    }

    pub fn hosts(&self) -> &[HostRecord] {
        &self.hosts
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// True when the caller stopped the scan before it reached the end.
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn get(&self, ip: Ipv4Addr) -> Option<&HostRecord> {
        self.hosts
            .binary_search_by_key(&ip, |host| host.ip)
            .ok()
            .map(|idx| &self.hosts[idx])
    }

    pub fn addresses(&self) -> BTreeSet<Ipv4Addr> {
        self.hosts.iter().map(|host| host.ip).collect()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
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
