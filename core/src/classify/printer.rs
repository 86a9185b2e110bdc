//! Printers are recognised by answering an IPP `Get-Printer-Attributes`
//! request on the standard print queue.
//!
//! A refused connection is conclusive: nothing speaks IPP there, so the host
//! is a [`DeviceType::Computer`]. Timeouts, HTTP errors and undecodable
//! bodies are inconclusive and decline.

use std::net::Ipv4Addr;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use lanmap_common::debug;
use lanmap_common::network::host::DeviceType;
use lanmap_protocols::ipp;
use reqwest::header::CONTENT_TYPE;

use super::{Classifier, Verdict};

pub const PRINTER_PATH: &str = "/ipp/print";

pub struct PrinterClassifier {
    client: reqwest::Client,
    port: u16,
    timeout: Duration,
}

impl PrinterClassifier {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .context("building IPP HTTP client")?;

        Ok(Self {
            client,
            port: ipp::IPP_PORT,
            timeout,
        })
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    fn queue_url(&self, addr: Ipv4Addr) -> String {
        format!("http://{addr}:{}{PRINTER_PATH}", self.port)
    }
}

#[async_trait]
impl Classifier for PrinterClassifier {
    fn name(&self) -> &'static str {
        "printer"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn classify(&self, addr: Ipv4Addr) -> anyhow::Result<Verdict> {
        let request_id: u32 = rand::random_range(1..=0x7FFF_FFFF);
        let body: Vec<u8> = ipp::create_get_printer_attributes(&addr.to_string(), request_id);

        let sent = self
            .client
            .post(self.queue_url(addr))
            .header(CONTENT_TYPE, ipp::IPP_CONTENT_TYPE)
            .body(body)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Ok(Verdict::Decline),
            Err(e) if e.is_connect() => return Ok(Verdict::matched(DeviceType::Computer)),
            Err(e) => return Err(e.into()),
        };

        if !response.status().is_success() {
            return Ok(Verdict::Decline);
        }

        let payload = response.bytes().await?;
        let reply = match ipp::parse_response(&payload) {
            Ok(reply) => reply,
            Err(e) => {
                debug!("{addr} sent an unreadable IPP reply: {e:#}");
                return Ok(Verdict::Decline);
            }
        };

        if !reply.is_successful() {
            return Ok(Verdict::Decline);
        }

        Ok(Verdict::named(DeviceType::Printer, reply.printer_label()))
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
