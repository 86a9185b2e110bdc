pub mod discover;
pub mod interfaces;

use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use lanmap_common::config::{DEFAULT_WORKERS, ScanConfig};
use lanmap_common::network::interface::InterfaceSelector;

#[derive(Parser)]
#[command(name = "lanmap", version)]
#[command(about = "Maps the devices of your local network.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Interface to scan: an OS name such as eth0, a display name such as Wi-Fi, or "auto"
    #[arg(short, long, global = true, default_value = "auto")]
    pub interface: InterfaceSelector,

    /// How long each address may take to answer an echo request
    #[arg(long, global = true, value_name = "MS", default_value_t = 1_000)]
    pub ping_timeout: u64,

    /// Addresses probed or classified at the same time
    #[arg(long, global = true, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// How long to listen for devices announcing themselves
    #[arg(long, global = true, value_name = "MS", default_value_t = 3_000)]
    pub window: u64,

    /// Skip listening for self-announcing devices
    #[arg(long, global = true)]
    pub no_passive: bool,

    /// Report every live host as a computer without probing its services
    #[arg(long, global = true)]
    pub no_classify: bool,

    /// Reduce output, repeat for less
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    #[arg(long, global = true)]
    pub no_banner: bool,

    /// Do not read the keyboard while scanning
    #[arg(long, global = true)]
    pub disable_input: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover and classify the hosts of the local subnet
    #[command(alias = "d")]
    Discover,
    /// List the network interfaces of this device
    #[command(alias = "i")]
    Interfaces,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            ping_timeout: Duration::from_millis(self.ping_timeout),
            discovery_window: Duration::from_millis(self.window),
            workers: self.workers,
            classify: !self.no_classify,
            passive: !self.no_passive,
            ..ScanConfig::default()
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
