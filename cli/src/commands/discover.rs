use std::time::Duration;

use anyhow::Context;
use colored::*;
use is_root::is_root;
use lanmap_common::network::host::{HostRecord, ScanResult};
use lanmap_common::{success, warn};
use lanmap_core::{CancelToken, ScanObserver, run_scan_observed};
use tracing::{Instrument, info_span};

use crate::commands::CommandLine;
use crate::mprint;
use crate::terminal::input::InputHandle;
use crate::terminal::{colors, format, print, spinner};

pub async fn discover(cmd: &CommandLine) -> anyhow::Result<()> {
    if !is_root() {
        warn!("Not running as root: if ICMP is refused, liveness falls back to TCP handshakes");
    }

    let cancel = CancelToken::new();
    let input: Option<InputHandle> = match cmd.disable_input {
        true => None,
        false => InputHandle::start(cancel.clone())
            .inspect_err(|e| warn!("Keyboard input unavailable: {e:#}"))
            .ok(),
    };

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let span = info_span!("discovery", indicatif.pb_show = true);
    let observer: ScanObserver = spinner::observer(span.clone(), input.is_some());

    let outcome = run_scan_observed(&cmd.interface, cmd.scan_config(), &cancel, Some(observer))
        .instrument(span)
        .await;

    drop(input);

    let result: ScanResult = outcome.context("discovery aborted")?;
    discovery_ends(&result, cmd.quiet);
    Ok(())
}

fn discovery_ends(result: &ScanResult, q_level: u8) {
    if result.was_cancelled() {
        warn!("Scan cancelled, showing partial results");
    }

    let own_addr = result.subnet().local_addr();
    if result.hosts().iter().all(|host| host.ip == own_addr) {
        no_hosts_found(q_level);
        return;
    }

    if q_level > 0 {
        mprint!();
    }

    print::header("Network Discovery", q_level);
    print_subnet(result, q_level);
    print_hosts(result.hosts(), own_addr, q_level);
    print_summary(result.len(), result.duration(), q_level);
}

fn no_hosts_found(q_level: u8) {
    print::header("ZERO HOSTS DETECTED", q_level);
    print::no_results();
}

fn print_subnet(result: &ScanResult, q_level: u8) {
    if q_level > 0 {
        return;
    }

    let subnet = result.subnet();
    let width: usize = "Interface".len();
    let interface = format!("{} ({})", subnet.display_name(), subnet.interface());
    print::aligned_line("Interface", width, interface.color(colors::TEXT_DEFAULT));
    print::aligned_line("Network", width, subnet.network().to_string().color(colors::IPV4_ADDR));
    let gateway: ColoredString = match subnet.gateway() {
        Some(gateway) => gateway.to_string().color(colors::IPV4_ADDR),
        None => "unknown".color(colors::TEXT_DEFAULT),
    };
    print::aligned_line("Gateway", width, gateway);
    mprint!();
}

fn print_hosts(hosts: &[HostRecord], own_addr: std::net::Ipv4Addr, q_level: u8) {
    for (idx, host) in hosts.iter().enumerate() {
        match q_level {
            2.. => {}
            _ => print_host_tree(host, idx, host.ip == own_addr),
        }
        if q_level < 2 && idx + 1 != hosts.len() {
            mprint!();
        }
    }
}

fn print_host_tree(host: &HostRecord, idx: usize, is_self: bool) {
    let title: String = match &host.name {
        Some(name) => name.clone(),
        None => host.ip_string(),
    };
    print::tree_head(idx, &title);
    print::tree_rows(&format::host_details(host, is_self));
}

fn print_summary(hosts_len: usize, total_time: Duration, q_level: u8) {
    let active_hosts: ColoredString = format!("{hosts_len} active hosts").bold().green();
    let total_time: ColoredString = format::duration(total_time).bold().yellow();
    let output: ColoredString =
        format!("Discovery Complete: {active_hosts} identified in {total_time}")
            .color(colors::TEXT_DEFAULT);

    match q_level {
        0 => {
            print::fat_separator();
            print::centerln(&output.to_string());
        }
        _ => {
            mprint!();
            success!("{}", output)
        }
    }
}
