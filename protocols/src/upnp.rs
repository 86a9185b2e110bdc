//! UPnP device description documents.
//!
//! Devices publish an XML document describing themselves. Element lookup is
//! namespace-agnostic: `<friendlyName>` and `<d:friendlyName>` both match.

pub const DEVICE_NAMESPACE: &str = "urn:schemas-upnp-org:device-1-0";

pub fn friendly_name(xml: &str) -> Option<String> {
    extract_element(xml, "friendlyName")
}

/// Text of the first element whose local name is `local_name`.
pub fn extract_element(xml: &str, local_name: &str) -> Option<String> {
    let mut cursor: usize = 0;

    while let Some(offset) = xml[cursor..].find('<') {
        let tag_start = cursor + offset + 1;
        let tag_len = xml[tag_start..].find('>')?;
        let tag = &xml[tag_start..tag_start + tag_len];
        cursor = tag_start + tag_len + 1;

        if tag.starts_with(['/', '?', '!']) || tag.ends_with('/') {
            continue;
        }

        let qualified = tag.split_whitespace().next().unwrap_or_default();
        let local = qualified.rsplit(':').next().unwrap_or(qualified);
        if local != local_name {
            continue;
        }

        let body = &xml[cursor..];
        let text: String = match body.trim_start().strip_prefix("<![CDATA[") {
            Some(cdata) => cdata[..cdata.find("]]>")?].trim().to_string(),
            None => decode_entities(body[..body.find("</")?].trim()),
        };
        return (!text.is_empty()).then_some(text);
    }

    None
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        let after = &rest[amp..];

        let Some(semi) = after.find(';') else {
            decoded.push_str(after);
            return decoded;
        };

        let entity = &after[1..semi];
        match decode_entity(entity) {
            Some(ch) => decoded.push(ch),
            None => decoded.push_str(&after[..=semi]),
        }
        rest = &after[semi + 1..];
    }

    decoded.push_str(rest);
    decoded
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)
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
