use std::sync::{Arc, Mutex};

use colored::*;
use indicatif::ProgressStyle;
use lanmap_core::{ScanEvent, ScanObserver, ScanPhase};
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::terminal::colors;

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

pub const CANCEL_TIP: &str = "You can press 'q' to finish early";

pub fn style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS)
}

/// Feeds scan progress into the spinner attached to `span`.
pub fn observer(span: Span, show_tip: bool) -> ScanObserver {
    let mut hosts: usize = 0;
    let progress = Mutex::new(move |event: ScanEvent| {
        let message: String = match event {
            ScanEvent::Phase(phase) => phase_message(phase, hosts, show_tip),
            ScanEvent::HostAlive { total, .. } => {
                hosts = total;
                hosts_message(total)
            }
        };
        span.pb_set_message(&message);
    });

    Arc::new(move |event| {
        if let Ok(mut update) = progress.lock() {
            update(event);
        }
    })
}

fn phase_message(phase: ScanPhase, hosts: usize, show_tip: bool) -> String {
    let phase: String = format!("{}{}", capitalize(&phase.to_string()), "...");
    let mut message: String = format!("{}", phase.color(colors::TEXT_DEFAULT));
    if hosts > 0 {
        message = format!("{message} {}", hosts_message(hosts));
    }
    if show_tip {
        message = format!("{message} {}", format!("({CANCEL_TIP})").italic().bright_black());
    }
    message
}

pub fn hosts_message(count: usize) -> String {
    format!(
        "Identified {} so far...",
        format!("{count} hosts").green().bold()
    )
    .color(colors::TEXT_DEFAULT)
    .to_string()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
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
