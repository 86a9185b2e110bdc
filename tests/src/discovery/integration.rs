use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use lanmap_common::config::ScanConfig;
use lanmap_common::error::DiscoveryError;
use lanmap_common::network::host::{DeviceType, DiscoverySource, ScanResult};
use lanmap_common::network::interface::InterfaceSelector;
use lanmap_common::network::subnet::SubnetDescriptor;
use lanmap_core::classify::{Classifier, ClassifierChain, GatewayClassifier, SetTopBoxClassifier};
use lanmap_core::passive::Sighting;
use lanmap_core::{CancelToken, Orchestrator, run_scan};
use pnet::ipnetwork::Ipv4Network;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use super::fakes::{ClaimOne, CountingDecline, FakePassive, FakeProber, home_subnet, ip};

fn config() -> ScanConfig {
    ScanConfig {
        discovery_window: Duration::from_millis(50),
        ..ScanConfig::default()
    }
}

async fn scan(orchestrator: &Orchestrator, subnet: SubnetDescriptor) -> ScanResult {
    orchestrator.run(subnet, &CancelToken::new()).await
}

#[tokio::test]
async fn gateway_and_self_only() {
    let subnet = home_subnet();
    let prober = Arc::new(FakeProber::new(&[ip(1), ip(50)]));
    let chain = ClassifierChain::new(vec![Arc::new(GatewayClassifier::new(subnet.gateway()))]);
    let orchestrator = Orchestrator::new(config(), prober.clone(), chain);

    let result = scan(&orchestrator, subnet).await;

    assert_eq!(result.len(), 2);
    assert_eq!(result.get(ip(1)).unwrap().device_type, DeviceType::Router);
    assert_eq!(result.get(ip(50)).unwrap().device_type, DeviceType::Computer);
    assert!(result.duration() < Duration::from_secs(2));
    // Own address is never probed.
    assert_eq!(prober.probes.load(Ordering::SeqCst), 253);
}

#[tokio::test]
async fn gateway_skips_classifier_chain() {
    let prober = Arc::new(FakeProber::new(&[ip(1), ip(9)]));
    let (counting, calls) = CountingDecline::new();
    let chain = ClassifierChain::new(vec![
        Arc::new(ClaimOne {
            addr: ip(1),
            device_type: DeviceType::Printer,
        }) as Arc<dyn Classifier>,
        counting as Arc<dyn Classifier>,
    ]);
    let orchestrator = Orchestrator::new(config(), prober, chain);

    let result = scan(&orchestrator, home_subnet()).await;

    assert_eq!(result.get(ip(1)).unwrap().device_type, DeviceType::Router);
    assert_eq!(result.get(ip(9)).unwrap().device_type, DeviceType::Computer);
    // Only .9 reached the chain.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn passive_type_wins_over_sweep() {
    let prober = Arc::new(FakeProber::new(&[ip(1), ip(30)]));
    let passive = Arc::new(FakePassive::new(vec![Sighting::smart_tv(
        ip(30),
        Some("Living Room TV".into()),
    )]));
    let orchestrator =
        Orchestrator::new(config(), prober, ClassifierChain::default()).with_passive(passive);

    let result = scan(&orchestrator, home_subnet()).await;
    let tv = result.get(ip(30)).unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(tv.device_type, DeviceType::SmartTv);
    assert_eq!(tv.source, DiscoverySource::Passive);
    assert_eq!(tv.name.as_deref(), Some("Living Room TV"));
}

#[tokio::test]
async fn passive_only_hosts_are_added_once() {
    let prober = Arc::new(FakeProber::new(&[ip(1)]));
    let passive = Arc::new(FakePassive::new(vec![
        Sighting::smart_tv(ip(77), None),
        Sighting::smart_tv(ip(77), Some("Kitchen".into())),
    ]));
    let orchestrator =
        Orchestrator::new(config(), prober, ClassifierChain::default()).with_passive(passive);

    let result = scan(&orchestrator, home_subnet()).await;

    assert_eq!(result.len(), 3);
    let tv = result.get(ip(77)).unwrap();
    assert_eq!(tv.source, DiscoverySource::Passive);
    assert_eq!(tv.name.as_deref(), Some("Kitchen"));
}

#[tokio::test]
async fn passive_never_retypes_self_or_gateway() {
    let prober = Arc::new(FakeProber::new(&[ip(1)]));
    let passive = Arc::new(FakePassive::new(vec![
        Sighting::smart_tv(ip(1), None),
        Sighting::smart_tv(ip(50), None),
    ]));
    let orchestrator =
        Orchestrator::new(config(), prober, ClassifierChain::default()).with_passive(passive);

    let result = scan(&orchestrator, home_subnet()).await;

    assert_eq!(result.len(), 2);
    assert_eq!(result.get(ip(1)).unwrap().device_type, DeviceType::Router);
    assert_eq!(result.get(ip(50)).unwrap().device_type, DeviceType::Computer);
}

#[tokio::test]
async fn passive_outside_subnet_is_ignored() {
    let prober = Arc::new(FakeProber::new(&[]));
    let passive = Arc::new(FakePassive::new(vec![Sighting::smart_tv(
        Ipv4Addr::new(10, 9, 8, 7),
        None,
    )]));
    let orchestrator =
        Orchestrator::new(config(), prober, ClassifierChain::default()).with_passive(passive);

    let result = scan(&orchestrator, home_subnet()).await;

    assert_eq!(result.addresses().into_iter().collect::<Vec<_>>(), vec![ip(50)]);
}

#[tokio::test]
async fn passive_disabled_skips_listener() {
    let prober = Arc::new(FakeProber::new(&[]));
    let passive = Arc::new(FakePassive::new(vec![Sighting::smart_tv(ip(77), None)]));
    let config = ScanConfig {
        passive: false,
        ..config()
    };
    let orchestrator =
        Orchestrator::new(config, prober, ClassifierChain::default()).with_passive(passive);

    let result = scan(&orchestrator, home_subnet()).await;

    assert!(result.get(ip(77)).is_none());
}

#[tokio::test]
async fn unclaimed_hosts_default_to_computer() {
    let prober = Arc::new(FakeProber::new(&[ip(1), ip(20), ip(21)]));
    let chain = ClassifierChain::new(vec![Arc::new(ClaimOne {
        addr: ip(20),
        device_type: DeviceType::Printer,
    })]);
    let orchestrator = Orchestrator::new(config(), prober, chain);

    let result = scan(&orchestrator, home_subnet()).await;

    assert_eq!(result.get(ip(20)).unwrap().device_type, DeviceType::Printer);
    assert_eq!(result.get(ip(21)).unwrap().device_type, DeviceType::Computer);
    assert!(result.hosts().iter().all(|host| host.device_type != DeviceType::Unknown));
}

#[tokio::test]
async fn repeated_scans_find_the_same_addresses() {
    let prober = Arc::new(FakeProber::new(&[ip(1), ip(20), ip(200)]));
    let passive = Arc::new(FakePassive::new(vec![Sighting::smart_tv(ip(30), None)]));
    let orchestrator =
        Orchestrator::new(config(), prober, ClassifierChain::default()).with_passive(passive);

    let first = scan(&orchestrator, home_subnet()).await;
    let second = scan(&orchestrator, home_subnet()).await;

    assert_eq!(first.addresses(), second.addresses());
    assert_eq!(first.len(), 5);
}

#[tokio::test]
async fn sweep_duration_is_bounded_by_worker_pool() {
    let delay = Duration::from_millis(20);
    let prober = Arc::new(FakeProber::slow(&[ip(1)], delay));
    let config = ScanConfig {
        workers: 64,
        ping_timeout: delay,
        passive: false,
        ..config()
    };
    let orchestrator = Orchestrator::new(config, prober, ClassifierChain::default());

    let result = scan(&orchestrator, home_subnet()).await;

    // 253 candidates over 64 workers is four rounds of one timeout each.
    assert!(result.duration() < Duration::from_secs(2), "took {:?}", result.duration());
}

#[tokio::test]
async fn cancellation_returns_partial_table() {
    let prober = Arc::new(FakeProber::slow(&[ip(1), ip(2)], Duration::from_secs(30)));
    let passive = Arc::new(FakePassive::new(Vec::new()));
    let config = ScanConfig {
        ping_timeout: Duration::from_secs(30),
        discovery_window: Duration::from_secs(30),
        ..config()
    };
    let orchestrator =
        Orchestrator::new(config, prober, ClassifierChain::default()).with_passive(passive);

    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let result = orchestrator.run(home_subnet(), &cancel).await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(result.was_cancelled());
    assert_eq!(result.get(ip(50)).unwrap().device_type, DeviceType::Computer);
}

async fn descriptor_server(friendly: &'static str) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
        }

        let body = format!(
            "<root xmlns=\"urn:schemas-upnp-org:device-1-0\"><device><friendlyName>{friendly}</friendlyName></device></root>"
        );
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;
    });

    port
}

#[tokio::test]
async fn set_top_box_stops_the_chain() {
    let port = descriptor_server("Décodeur TV Orange").await;
    let set_top_box = SetTopBoxClassifier::new(Duration::from_secs(2), vec!["décodeur".into()])
        .unwrap()
        .with_port(port);
    let (printer, printer_calls) = CountingDecline::new();
    let chain = ClassifierChain::new(vec![
        Arc::new(set_top_box) as Arc<dyn Classifier>,
        printer as Arc<dyn Classifier>,
    ]);

    let network = Ipv4Network::new(Ipv4Addr::new(127, 0, 0, 2), 29).unwrap();
    let subnet = SubnetDescriptor::new("lo", "Loopback", network, None);
    let prober = Arc::new(FakeProber::new(&[Ipv4Addr::LOCALHOST]));
    let orchestrator = Orchestrator::new(config(), prober, chain);

    let result = scan(&orchestrator, subnet).await;
    let decoder = result.get(Ipv4Addr::LOCALHOST).unwrap();

    assert_eq!(decoder.device_type, DeviceType::SetTopBox);
    assert_eq!(decoder.name.as_deref(), Some("Décodeur TV Orange"));
    assert_eq!(printer_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_interface_fails_before_scanning() {
    let selector = InterfaceSelector::Name("no-such-adapter-0".into());
    let err = run_scan(&selector, config(), &CancelToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        DiscoveryError::InterfaceResolution {
            selector: "no-such-adapter-0".into()
        }
    );
}
