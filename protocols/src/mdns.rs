//! mDNS cast service queries and announcement parsing.

use anyhow::{Context, Result, anyhow};
use dns_parser::{Builder, Packet, QueryClass, QueryType, RData};
use std::net::Ipv4Addr;

pub const MDNS_ADDR: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 251);
pub const MDNS_PORT: u16 = 5353;
pub const CAST_SERVICE: &str = "_googlecast._tcp.local";

/// Everything a single response tells us about one cast device.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CastAnnouncement {
    pub instance: Option<String>,
    pub friendly_name: Option<String>,
    pub ips: Vec<Ipv4Addr>,
    pub service_matched: bool,
}

impl CastAnnouncement {
    /// Best human label: the TXT `fn` entry, else the instance name up to the service suffix.
    pub fn label(&self) -> Option<String> {
        if let Some(name) = &self.friendly_name {
            return Some(name.clone());
        }
        self.instance.as_ref().map(|instance| {
            instance
                .strip_suffix(CAST_SERVICE)
                .map(|s| s.trim_end_matches('.'))
                .unwrap_or(instance)
                .to_string()
        })
    }
}

pub fn create_query(service: &str, id: u16) -> Result<Vec<u8>> {
    let mut builder = Builder::new_query(id, false);
    builder.add_question(service, true, QueryType::PTR, QueryClass::IN);
    builder
        .build()
        .map_err(|_| anyhow!("mDNS query for {service} was truncated"))
}

pub fn extract_cast_announcement(data: &[u8]) -> Result<CastAnnouncement> {
    let packet = Packet::parse(data).context("failed to parse mDNS packet")?;
    let mut announcement = CastAnnouncement::default();

    for record in packet.answers.iter().chain(packet.additional.iter()) {
        let owner: String = record.name.to_string();

        match &record.data {
            RData::PTR(ptr) if owner.eq_ignore_ascii_case(CAST_SERVICE) => {
                announcement.service_matched = true;
                announcement.instance = Some(ptr.0.to_string());
            }

            RData::SRV(_) | RData::TXT(_) if is_cast_instance(&owner) => {
                announcement.service_matched = true;
                if announcement.instance.is_none() {
                    announcement.instance = Some(owner.clone());
                }
                if let RData::TXT(txt) = &record.data {
                    for entry in txt.iter() {
                        apply_txt_entry(&mut announcement, entry);
                    }
                }
            }

            RData::A(a) => {
                if !announcement.ips.contains(&a.0) {
                    announcement.ips.push(a.0);
                }
            }

            _ => {}
        }
    }

    Ok(announcement)
}

fn is_cast_instance(owner: &str) -> bool {
    owner.len() > CAST_SERVICE.len()
        && owner
            .to_ascii_lowercase()
            .ends_with(&format!(".{CAST_SERVICE}"))
}

fn apply_txt_entry(announcement: &mut CastAnnouncement, entry: &[u8]) {
    let entry = String::from_utf8_lossy(entry);
    let Some((key, value)) = entry.split_once('=') else {
        return;
    };
    if value.is_empty() {
        return;
    }
    if key == "fn" {
        announcement.friendly_name = Some(value.to_string());
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

    const TYPE_A: u16 = 1;
    const TYPE_PTR: u16 = 12;
    const TYPE_TXT: u16 = 16;
    const TYPE_SRV: u16 = 33;

    fn encode_name(name: &str) -> Vec<u8> {
        let mut out = Vec::new();
        for label in name.split('.') {
            out.push(label.len() as u8);
            out.extend_from_slice(label.as_bytes());
        }
        out.push(0);
        out
    }

    fn record(name: &str, rtype: u16, rdata: &[u8]) -> Vec<u8> {
        let mut out = encode_name(name);
        out.extend_from_slice(&rtype.to_be_bytes());
        out.extend_from_slice(&1u16.to_be_bytes());
        out.extend_from_slice(&120u32.to_be_bytes());
        out.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        out.extend_from_slice(rdata);
        out
    }

    fn response(answers: &[Vec<u8>], additional: &[Vec<u8>]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&0x8400u16.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&(answers.len() as u16).to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&(additional.len() as u16).to_be_bytes());
        for rr in answers.iter().chain(additional) {
            out.extend_from_slice(rr);
        }
        out
    }

    fn txt(entries: &[&str]) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in entries {
            out.push(entry.len() as u8);
            out.extend_from_slice(entry.as_bytes());
        }
        out
    }

    /// A full cast reply from `addr` advertising `friendly`.
    fn cast_response(addr: Ipv4Addr, friendly: &str) -> Vec<u8> {
        let instance = format!("Chromecast-1234.{CAST_SERVICE}");
        let mut srv = Vec::new();
        srv.extend_from_slice(&0u16.to_be_bytes());
        srv.extend_from_slice(&0u16.to_be_bytes());
        srv.extend_from_slice(&8009u16.to_be_bytes());
        srv.extend_from_slice(&encode_name("chromecast-1234.local"));

        response(
            &[record(CAST_SERVICE, TYPE_PTR, &encode_name(&instance))],
            &[
                record(&instance, TYPE_TXT, &txt(&["id=1234", &format!("fn={friendly}"), "md=Chromecast"])),
                record(&instance, TYPE_SRV, &srv),
                record("chromecast-1234.local", TYPE_A, &addr.octets()),
            ],
        )
    }

    #[test]
    fn create_query_asks_for_cast_ptr() {
        let query = create_query(CAST_SERVICE, 0x1234).unwrap();
        let packet = Packet::parse(&query).unwrap();

        assert_eq!(packet.header.id, 0x1234);
        assert!(packet.header.query);
        assert_eq!(packet.questions.len(), 1);
        assert_eq!(packet.questions[0].qname.to_string(), CAST_SERVICE);
        assert_eq!(packet.questions[0].qtype, QueryType::PTR);
    }

    #[test]
    fn extract_reads_full_cast_response() {
        let data = cast_response(Ipv4Addr::new(192, 168, 1, 42), "Living Room TV");
        let found = extract_cast_announcement(&data).unwrap();

        assert!(found.service_matched);
        assert_eq!(found.friendly_name.as_deref(), Some("Living Room TV"));
        assert_eq!(found.ips, vec![Ipv4Addr::new(192, 168, 1, 42)]);
        assert_eq!(found.label().as_deref(), Some("Living Room TV"));
    }

    #[test]
    fn extract_ignores_unrelated_services() {
        let data = response(
            &[record(
                "_ipp._tcp.local",
                TYPE_PTR,
                &encode_name("Office._ipp._tcp.local"),
            )],
            &[],
        );
        let found = extract_cast_announcement(&data).unwrap();
        assert!(!found.service_matched);
        assert_eq!(found.instance, None);
    }

    #[test]
    fn label_falls_back_to_instance_name() {
        let announcement = CastAnnouncement {
            instance: Some(format!("Bedroom.{CAST_SERVICE}")),
            ..Default::default()
        };
        assert_eq!(announcement.label().as_deref(), Some("Bedroom"));
    }

    #[test]
    fn extract_rejects_garbage() {
        assert!(extract_cast_announcement(&[0x00, 0x01, 0x02]).is_err());
    }
}
