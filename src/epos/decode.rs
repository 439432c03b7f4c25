//! ePOS-Print XML → IR decoding.
//!
//! The body element is found by local name, so both a SOAP envelope
//!
//! ```xml
//! <s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
//!   <s:Body>
//!     <epos-print xmlns="http://www.epson-pos.com/schemas/2011/03/epos-print">
//!       <text align="center">HELLO</text>
//!       <feed line="2"/>
//!     </epos-print>
//!   </s:Body>
//! </s:Envelope>
//! ```
//!
//! and a bare `<epos-print>` root are accepted. Only direct children of the
//! body become ops; anything else is skipped.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use super::DecodeError;
use crate::ir::{Op, Program};
use crate::protocol::text::Alignment;

const BODY_ELEMENT: &[u8] = b"epos-print";

/// Largest `<feed line="n"/>` the ePOS-Print schema allows (0 to 255).
pub const MAX_FEED_LINES: u32 = 255;

/// Element kinds understood inside the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    Feed,
    Text,
    Image,
    Unknown,
}

impl ElementKind {
    fn from_local_name(name: &[u8]) -> Self {
        match name {
            b"feed" => ElementKind::Feed,
            b"text" => ElementKind::Text,
            b"image" => ElementKind::Image,
            _ => ElementKind::Unknown,
        }
    }
}

/// A direct child of the body whose end tag has not been seen yet.
struct PendingElement {
    kind: ElementKind,
    attrs: HashMap<String, String>,
    text: String,
}

impl PendingElement {
    fn open(start: &BytesStart<'_>) -> Result<Self, DecodeError> {
        let kind = ElementKind::from_local_name(start.local_name().as_ref());
        let attrs = if kind == ElementKind::Unknown {
            HashMap::new()
        } else {
            read_attributes(start)?
        };
        Ok(Self {
            kind,
            attrs,
            text: String::new(),
        })
    }

    fn finish(self) -> Result<Option<Op>, DecodeError> {
        match self.kind {
            ElementKind::Feed => {
                let lines = match self.attrs.get("line") {
                    Some(value) => parse_number::<u32>("feed", "line", value)?,
                    None => 1,
                };
                if lines > MAX_FEED_LINES {
                    return Err(DecodeError::MalformedDocument(format!(
                        "<feed> attribute line={} exceeds {}",
                        lines, MAX_FEED_LINES
                    )));
                }
                Ok(Some(Op::Feed { lines }))
            }
            ElementKind::Text => {
                let align = self
                    .attrs
                    .get("align")
                    .map(|value| Alignment::from_attr(value))
                    .unwrap_or_default();
                Ok(Some(Op::Text {
                    content: self.text,
                    align,
                }))
            }
            ElementKind::Image => decode_image(&self.attrs, &self.text),
            ElementKind::Unknown => Ok(None),
        }
    }
}

/// Decode an ePOS-Print document into a program.
///
/// ## Errors
///
/// - [`DecodeError::MalformedDocument`] if the XML is not well formed, has no
///   `epos-print` element, or carries a bad numeric attribute or payload.
/// - [`DecodeError::ImageDimensionMismatch`] if an image payload cannot be
///   split evenly into `height` rows.
pub fn decode(xml: &str) -> Result<Program, DecodeError> {
    let mut reader = Reader::from_str(xml);

    let mut program = Program::new();
    let mut depth = 0usize;
    let mut body_depth: Option<usize> = None;
    let mut pending: Option<PendingElement> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            DecodeError::MalformedDocument(format!(
                "XML error at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(start) => {
                depth += 1;
                match body_depth {
                    None if start.local_name().as_ref() == BODY_ELEMENT => {
                        body_depth = Some(depth);
                    }
                    Some(body) if depth == body + 1 => {
                        pending = Some(PendingElement::open(&start)?);
                    }
                    _ => {}
                }
            }

            Event::Empty(start) => match body_depth {
                None if start.local_name().as_ref() == BODY_ELEMENT => {
                    debug!("Empty epos-print body");
                    return Ok(program);
                }
                Some(body) if depth == body => {
                    if let Some(op) = PendingElement::open(&start)?.finish()? {
                        program.push(op);
                    }
                }
                _ => {}
            },

            Event::Text(text) => {
                if let (Some(body), Some(element)) = (body_depth, pending.as_mut()) {
                    if depth == body + 1 {
                        let unescaped = text.unescape().map_err(|e| {
                            DecodeError::MalformedDocument(format!("Invalid text content: {}", e))
                        })?;
                        element.text.push_str(&unescaped);
                    }
                }
            }

            Event::CData(cdata) => {
                if let (Some(body), Some(element)) = (body_depth, pending.as_mut()) {
                    if depth == body + 1 {
                        let raw = std::str::from_utf8(&cdata).map_err(|e| {
                            DecodeError::MalformedDocument(format!("Invalid CDATA content: {}", e))
                        })?;
                        element.text.push_str(raw);
                    }
                }
            }

            Event::End(_) => {
                match body_depth {
                    Some(body) if depth == body => {
                        debug!(ops = program.len(), "Decoded epos-print body");
                        return Ok(program);
                    }
                    Some(body) if depth == body + 1 => {
                        if let Some(element) = pending.take() {
                            if let Some(op) = element.finish()? {
                                program.push(op);
                            }
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }

            Event::Eof => {
                return Err(match body_depth {
                    None => DecodeError::MalformedDocument("<epos-print> not found".to_string()),
                    Some(_) => DecodeError::MalformedDocument(
                        "Unexpected end of document inside <epos-print>".to_string(),
                    ),
                });
            }

            _ => {}
        }
    }
}

fn read_attributes(start: &BytesStart<'_>) -> Result<HashMap<String, String>, DecodeError> {
    let mut attrs = HashMap::new();
    for attr in start.attributes() {
        let attr = attr
            .map_err(|e| DecodeError::MalformedDocument(format!("Invalid attribute: {}", e)))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| DecodeError::MalformedDocument(format!("Invalid attribute value: {}", e)))?
            .into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

fn parse_number<T: std::str::FromStr>(
    element: &str,
    attribute: &str,
    value: &str,
) -> Result<T, DecodeError> {
    value.trim().parse::<T>().map_err(|_| {
        DecodeError::MalformedDocument(format!(
            "<{}> attribute {}={:?} is not an integer",
            element, attribute, value
        ))
    })
}

fn decode_image(attrs: &HashMap<String, String>, text: &str) -> Result<Option<Op>, DecodeError> {
    let payload: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if payload.is_empty() {
        debug!("Skipping image with empty payload");
        return Ok(None);
    }

    let raw = BASE64
        .decode(payload.as_bytes())
        .map_err(|e| DecodeError::MalformedDocument(format!("Invalid image base64: {}", e)))?;

    let height = attrs
        .get("height")
        .ok_or_else(|| DecodeError::MalformedDocument("<image> missing height".to_string()))
        .and_then(|value| parse_number::<usize>("image", "height", value))?;

    let mismatch = DecodeError::ImageDimensionMismatch {
        len: raw.len(),
        height,
    };
    if height == 0 || raw.len() % height != 0 {
        return Err(mismatch);
    }

    let (Ok(width_bytes), Ok(height_rows)) =
        (u16::try_from(raw.len() / height), u16::try_from(height))
    else {
        return Err(mismatch);
    };

    Ok(Some(Op::Image {
        pixels: raw,
        width_bytes,
        height: height_rows,
    }))
}
