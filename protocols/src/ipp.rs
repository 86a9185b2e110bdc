//! Internet Printing Protocol messages (RFC 8010 encoding).
//!
//! Only what a status query needs: building a `Get-Printer-Attributes`
//! request and decoding the attribute groups of any response.

use anyhow::{Context, bail, ensure};

pub const IPP_PORT: u16 = 631;
pub const IPP_CONTENT_TYPE: &str = "application/ipp";
pub const IPP_VERSION: (u8, u8) = (2, 0);

pub const OP_GET_PRINTER_ATTRIBUTES: u16 = 0x000B;

pub const TAG_OPERATION_ATTRIBUTES: u8 = 0x01;
pub const TAG_END_OF_ATTRIBUTES: u8 = 0x03;
pub const TAG_PRINTER_ATTRIBUTES: u8 = 0x04;

pub const VALUE_INTEGER: u8 = 0x21;
pub const VALUE_BOOLEAN: u8 = 0x22;
pub const VALUE_ENUM: u8 = 0x23;
pub const VALUE_TEXT: u8 = 0x41;
pub const VALUE_NAME: u8 = 0x42;
pub const VALUE_KEYWORD: u8 = 0x44;
pub const VALUE_URI: u8 = 0x45;
pub const VALUE_CHARSET: u8 = 0x47;
pub const VALUE_NATURAL_LANGUAGE: u8 = 0x48;

const HEADER_LEN: usize = 8;

const REQUESTED_ATTRIBUTES: &[&str] = &["printer-name", "printer-make-and-model", "printer-state"];

/// Serializes an IPP message one attribute at a time.
pub struct IppWriter {
    buffer: Vec<u8>,
}

impl IppWriter {
    /// `code` is the operation id of a request or the status code of a response.
    pub fn new(code: u16, request_id: u32) -> Self {
        let mut buffer: Vec<u8> = Vec::with_capacity(256);
        buffer.push(IPP_VERSION.0);
        buffer.push(IPP_VERSION.1);
        buffer.extend_from_slice(&code.to_be_bytes());
        buffer.extend_from_slice(&request_id.to_be_bytes());
        Self { buffer }
    }

    pub fn group(mut self, tag: u8) -> Self {
        self.buffer.push(tag);
        self
    }

    pub fn attribute(mut self, value_tag: u8, name: &str, value: &[u8]) -> Self {
        self.buffer.push(value_tag);
        self.buffer.extend_from_slice(&(name.len() as u16).to_be_bytes());
        self.buffer.extend_from_slice(name.as_bytes());
        self.buffer.extend_from_slice(&(value.len() as u16).to_be_bytes());
        self.buffer.extend_from_slice(value);
        self
    }

    /// Extra value of the attribute written last (a "1setOf" member).
    pub fn additional_value(self, value_tag: u8, value: &[u8]) -> Self {
        self.attribute(value_tag, "", value)
    }

    pub fn text(self, value_tag: u8, name: &str, value: &str) -> Self {
        self.attribute(value_tag, name, value.as_bytes())
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.buffer.push(TAG_END_OF_ATTRIBUTES);
        self.buffer
    }
}

/// `ipp://` URI of the default print queue of `host`.
pub fn printer_uri(host: &str) -> String {
    format!("ipp://{host}:{IPP_PORT}/ipp/print")
}

/// Builds a `Get-Printer-Attributes` request asking for name, model and state.
pub fn create_get_printer_attributes(host: &str, request_id: u32) -> Vec<u8> {
    let mut writer = IppWriter::new(OP_GET_PRINTER_ATTRIBUTES, request_id)
        .group(TAG_OPERATION_ATTRIBUTES)
        .text(VALUE_CHARSET, "attributes-charset", "utf-8")
        .text(VALUE_NATURAL_LANGUAGE, "attributes-natural-language", "en")
        .text(VALUE_URI, "printer-uri", &printer_uri(host));

    for (idx, keyword) in REQUESTED_ATTRIBUTES.iter().enumerate() {
        writer = match idx {
            0 => writer.text(VALUE_KEYWORD, "requested-attributes", keyword),
            _ => writer.additional_value(VALUE_KEYWORD, keyword.as_bytes()),
        };
    }

    writer.finish()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IppValue {
    Text(String),
    Integer(i32),
    Boolean(bool),
    Other { tag: u8, bytes: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IppAttribute {
    pub group: u8,
    pub name: String,
    pub values: Vec<IppValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IppResponse {
    pub version: (u8, u8),
    pub status_code: u16,
    pub request_id: u32,
    pub attributes: Vec<IppAttribute>,
}

impl IppResponse {
    /// `successful-ok` and its variants occupy 0x0000..=0x00FF.
    pub fn is_successful(&self) -> bool {
        self.status_code <= 0x00FF
    }

    pub fn attribute(&self, name: &str) -> Option<&IppAttribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.attribute(name)?.values.iter().find_map(|value| match value {
            IppValue::Text(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn integer(&self, name: &str) -> Option<i32> {
        self.attribute(name)?.values.iter().find_map(|value| match value {
            IppValue::Integer(int) => Some(*int),
            _ => None,
        })
    }

    /// Best human readable label: make and model, then queue name.
    pub fn printer_label(&self) -> Option<String> {
        self.text("printer-make-and-model")
            .or_else(|| self.text("printer-name"))
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(String::from)
    }
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, len: usize) -> anyhow::Result<&'a [u8]> {
        let end = self.pos.checked_add(len).context("IPP length overflow")?;
        ensure!(end <= self.data.len(), "truncated IPP message at byte {}", self.pos);
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> anyhow::Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> anyhow::Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }
}

/// Decodes an IPP response body.
pub fn parse_response(data: &[u8]) -> anyhow::Result<IppResponse> {
    ensure!(data.len() >= HEADER_LEN, "IPP message shorter than its header");

    let version = (data[0], data[1]);
    ensure!(
        version.0 == 1 || version.0 == 2,
        "unsupported IPP version {}.{}",
        version.0,
        version.1
    );
    let status_code = u16::from_be_bytes([data[2], data[3]]);
    let request_id = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);

    let mut cursor = Cursor {
        data,
        pos: HEADER_LEN,
    };
    let mut attributes: Vec<IppAttribute> = Vec::new();
    let mut group: Option<u8> = None;

    loop {
        let tag: u8 = cursor.u8().context("missing end-of-attributes tag")?;

        if tag == TAG_END_OF_ATTRIBUTES {
            break;
        }
        if tag <= 0x0F {
            group = Some(tag);
            continue;
        }

        let Some(current_group) = group else {
            bail!("attribute value before any attribute group");
        };

        let name_len = cursor.u16()? as usize;
        let name = std::str::from_utf8(cursor.take(name_len)?)
            .context("attribute name is not UTF-8")?
            .to_string();
        let value_len = cursor.u16()? as usize;
        let value = decode_value(tag, cursor.take(value_len)?);

        if name.is_empty() {
            let Some(previous) = attributes.last_mut() else {
                bail!("additional value without an attribute");
            };
            previous.values.push(value);
        } else {
            attributes.push(IppAttribute {
                group: current_group,
                name,
                values: vec![value],
            });
        }
    }

    Ok(IppResponse {
        version,
        status_code,
        request_id,
        attributes,
    })
}

fn decode_value(tag: u8, bytes: &[u8]) -> IppValue {
    match tag {
        VALUE_INTEGER | VALUE_ENUM if bytes.len() == 4 => {
            IppValue::Integer(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        }
        VALUE_BOOLEAN if bytes.len() == 1 => IppValue::Boolean(bytes[0] != 0),
        0x41..=0x49 => IppValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        _ => IppValue::Other {
            tag,
            bytes: bytes.to_vec(),
        },
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
