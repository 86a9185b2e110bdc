//! Set-top boxes publish a UPnP device description on a fixed port. The box
//! is recognised by a substring of its `friendlyName`.

use std::net::Ipv4Addr;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use lanmap_common::network::host::DeviceType;
use lanmap_protocols::upnp;

use super::{Classifier, Verdict};

pub const DESCRIPTOR_PORT: u16 = 8080;
pub const DESCRIPTOR_PATH: &str = "/BasicDeviceDescription.xml";

pub struct SetTopBoxClassifier {
    client: reqwest::Client,
    port: u16,
    timeout: Duration,
    needles: Vec<String>,
}

impl SetTopBoxClassifier {
    pub fn new(timeout: Duration, needles: Vec<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .context("building descriptor HTTP client")?;

        Ok(Self {
            client,
            port: DESCRIPTOR_PORT,
            timeout,
            needles: needles.iter().map(|n| n.to_lowercase()).collect(),
        })
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    fn descriptor_url(&self, addr: Ipv4Addr) -> String {
        format!("http://{addr}:{}{DESCRIPTOR_PATH}", self.port)
    }

    fn is_set_top_box(&self, friendly_name: &str) -> bool {
        let name = friendly_name.to_lowercase();
        self.needles.iter().any(|needle| name.contains(needle.as_str()))
    }
}

#[async_trait]
impl Classifier for SetTopBoxClassifier {
    fn name(&self) -> &'static str {
        "set-top box"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn classify(&self, addr: Ipv4Addr) -> anyhow::Result<Verdict> {
        let response = match self.client.get(self.descriptor_url(addr)).send().await {
            Ok(response) => response,
            Err(e) if e.is_connect() || e.is_timeout() => return Ok(Verdict::Decline),
            Err(e) => return Err(e.into()),
        };

        if !response.status().is_success() {
            return Ok(Verdict::Decline);
        }

        let document: String = response.text().await?;
        match upnp::friendly_name(&document) {
            Some(name) if self.is_set_top_box(&name) => {
                Ok(Verdict::named(DeviceType::SetTopBox, Some(name)))
            }
            _ => Ok(Verdict::Decline),
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
