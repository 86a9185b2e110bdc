use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use lanmap_common::network::host::DeviceType;

use super::{Classifier, Verdict};

/// Claims the subnet's default gateway as a [`DeviceType::Router`] without sending anything.
pub struct GatewayClassifier {
    gateway: Option<Ipv4Addr>,
}

impl GatewayClassifier {
    pub fn new(gateway: Option<Ipv4Addr>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Classifier for GatewayClassifier {
    fn name(&self) -> &'static str {
        "gateway"
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(1)
    }

    async fn classify(&self, addr: Ipv4Addr) -> anyhow::Result<Verdict> {
        match self.gateway {
            Some(gateway) if gateway == addr => Ok(Verdict::matched(DeviceType::Router)),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn gateway_is_router() {
        let classifier = GatewayClassifier::new(Some(Ipv4Addr::new(192, 168, 1, 1)));
        let verdict = classifier.classify(Ipv4Addr::new(192, 168, 1, 1)).await.unwrap();
        assert_eq!(verdict, Verdict::matched(DeviceType::Router));
    }

    #[tokio::test]
    async fn other_addresses_are_declined() {
        let classifier = GatewayClassifier::new(Some(Ipv4Addr::new(192, 168, 1, 1)));
        let verdict = classifier.classify(Ipv4Addr::new(192, 168, 1, 2)).await.unwrap();
        assert_eq!(verdict, Verdict::Decline);
    }

    #[tokio::test]
    async fn unknown_gateway_never_matches() {
        let classifier = GatewayClassifier::new(None);
        let verdict = classifier.classify(Ipv4Addr::new(192, 168, 1, 1)).await.unwrap();
        assert_eq!(verdict, Verdict::Decline);
    }
}
