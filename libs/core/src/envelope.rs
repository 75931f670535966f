use std::fmt;
use std::sync::LazyLock;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use regex::Regex;
use serde::Serialize;

use crate::codec::{Codec, XmlCodec};
use crate::error::{Error, Result};
use crate::fault::Fault;

/// Namespace of the SOAP 1.1 envelope
pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

const ENVELOPE_TAG: &str = "soapenv:Envelope";
const HEADER_TAG: &str = "soapenv:Header";
const BODY_TAG: &str = "soapenv:Body";
const INDENT: usize = 4;

static EMPTY_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<soapenv:Header>\s*</soapenv:Header>").expect("empty header pattern is valid")
});

/// Outbound envelope borrowing the caller's header and body values
///
/// The header and body are serialized independently of the envelope frame
/// and then nested inside it, so the envelope never needs to know the shape
/// of either.
#[derive(Debug)]
pub struct RequestEnvelope<'a, H: ?Sized, B: ?Sized> {
    header: Option<&'a H>,
    body: Option<&'a B>,
}

impl<'a, H, B> RequestEnvelope<'a, H, B>
where
    H: Serialize + ?Sized,
    B: Serialize + ?Sized,
{
    pub fn new(header: Option<&'a H>, body: Option<&'a B>) -> Self {
        Self { header, body }
    }

    /// Serialize the envelope to pretty-printed XML
    ///
    /// An absent header produces no `soapenv:Header` element. A header that
    /// serializes to nothing always comes out as `<soapenv:Header/>`.
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.encode_with(&XmlCodec)
    }

    /// Like [`encode`](Self::encode), serializing header and body with
    /// `codec`
    ///
    /// The codec should produce compact output: whitespace between its
    /// elements is kept as text and breaks the envelope's indentation.
    pub fn encode_with<K: Codec>(&self, codec: &K) -> Result<Vec<u8>> {
        let header = self.header.map(|h| codec.encode(h)).transpose()?;
        let body = self.body.map(|b| codec.encode(b)).transpose()?;

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);
        let root = BytesStart::new(ENVELOPE_TAG).with_attributes([("xmlns:soapenv", SOAP_ENV_NS)]);
        writer
            .write_event(Event::Start(root))
            .map_err(Error::encode)?;

        if let Some(header) = &header {
            write_section(&mut writer, HEADER_TAG, header)?;
        }
        match &body {
            Some(body) => write_section(&mut writer, BODY_TAG, body)?,
            None => writer
                .write_event(Event::Empty(BytesStart::new(BODY_TAG)))
                .map_err(Error::encode)?,
        }

        writer
            .write_event(Event::End(BytesEnd::new(ENVELOPE_TAG)))
            .map_err(Error::encode)?;

        let xml = String::from_utf8(writer.into_inner()).map_err(Error::encode)?;
        Ok(collapse_empty_header(&xml).into_bytes())
    }
}

/// Write `<tag>fragment</tag>`, replaying the fragment's events so that it
/// picks up the frame's indentation without touching its text content
fn write_section(writer: &mut Writer<Vec<u8>>, tag: &str, fragment: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(Error::encode)?;

    let mut reader = Reader::from_str(fragment);
    loop {
        match reader.read_event().map_err(Error::encode)? {
            Event::Eof => break,
            event => writer.write_event(event).map_err(Error::encode)?,
        }
    }

    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(Error::encode)
}

fn collapse_empty_header(xml: &str) -> String {
    EMPTY_HEADER
        .replace_all(xml, "<soapenv:Header/>")
        .into_owned()
}

/// Inbound envelope as parsed from the wire
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseEnvelope {
    /// Raw inner content of the header, if the server sent one
    pub header: Option<String>,
    pub body: Body,
}

/// Envelope body: raw payload text plus an optional fault
///
/// Both slots exist side by side. When a fault is present it wins and the
/// content is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    pub fault: Option<Fault>,
    /// Everything between `<Body>` and `</Body>`, byte for byte
    pub content: String,
}

/// What a response turned out to carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Empty(EmptyReason),
    Fault(Fault),
    Payload(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The transport returned zero bytes
    NoContent,
    /// The envelope body had neither a fault nor any content
    EmptyBody,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoContent => f.write_str("empty response"),
            Self::EmptyBody => f.write_str("empty response body"),
        }
    }
}

impl ResponseEnvelope {
    /// Parse raw bytes into an envelope
    ///
    /// Only local names are checked (`Envelope`, `Header`, `Body`), so any
    /// namespace prefix is accepted. Unknown children of the envelope are
    /// skipped.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(raw).map_err(Error::decode)?;
        // The reader skips a byte order mark; drop it here too so its spans
        // index into the same text
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut reader = Reader::from_str(text);
        let mut in_envelope = false;
        let mut header = None;
        let mut body = None;

        loop {
            match reader.read_event().map_err(Error::decode)? {
                Event::Start(e) if !in_envelope => {
                    if e.local_name().as_ref() != b"Envelope" {
                        return Err(unexpected_root(&e));
                    }
                    in_envelope = true;
                }
                Event::Empty(e) if !in_envelope => {
                    if e.local_name().as_ref() != b"Envelope" {
                        return Err(unexpected_root(&e));
                    }
                    break;
                }
                Event::Start(e) => {
                    let span = reader.read_to_end(e.name()).map_err(Error::decode)?;
                    let inner = &text[span];
                    match e.local_name().as_ref() {
                        b"Header" => header = Some(inner.to_owned()),
                        b"Body" => body = Some(Body::parse(inner)?),
                        _ => {}
                    }
                }
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"Header" => header = Some(String::new()),
                    b"Body" => body = Some(Body::default()),
                    _ => {}
                },
                Event::End(_) => break,
                Event::Eof if in_envelope => {
                    return Err(Error::decode("unexpected end of envelope"));
                }
                Event::Eof => return Err(Error::decode("no Envelope element")),
                _ => {}
            }
        }

        let body = body.ok_or_else(|| Error::decode("envelope has no Body"))?;
        Ok(Self { header, body })
    }

    /// Classify the envelope, giving a fault precedence over any content
    pub fn outcome(self) -> Outcome {
        if let Some(fault) = self.body.fault {
            return Outcome::Fault(fault);
        }
        if self.body.content.trim().is_empty() {
            return Outcome::Empty(EmptyReason::EmptyBody);
        }
        Outcome::Payload(self.body.content)
    }
}

fn unexpected_root(e: &BytesStart<'_>) -> Error {
    Error::decode(format!(
        "unexpected root element `{}`",
        String::from_utf8_lossy(e.name().as_ref())
    ))
}

impl Body {
    fn parse(content: &str) -> Result<Self> {
        let mut reader = Reader::from_str(content);
        let mut fault = None;

        loop {
            match reader.read_event().map_err(Error::decode)? {
                Event::Start(e) => {
                    let span = reader.read_to_end(e.name()).map_err(Error::decode)?;
                    if fault.is_none() && e.local_name().as_ref() == b"Fault" {
                        fault = Some(parse_fault(&content[span])?);
                    }
                }
                Event::Empty(e) if e.local_name().as_ref() == b"Fault" => {
                    fault.get_or_insert_with(Fault::default);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self {
            fault,
            content: content.to_owned(),
        })
    }
}

fn parse_fault(inner: &str) -> Result<Fault> {
    let mut reader = Reader::from_str(inner);
    let mut fault = Fault::default();

    loop {
        match reader.read_event().map_err(Error::decode)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"faultcode" => fault.code = Some(read_char_data(&mut reader)?),
                b"faultstring" => fault.message = Some(read_char_data(&mut reader)?),
                b"faultactor" => fault.actor = Some(read_char_data(&mut reader)?),
                b"detail" => {
                    let span = reader.read_to_end(e.name()).map_err(Error::decode)?;
                    fault.detail = Some(inner[span].trim().to_owned());
                }
                _ => {
                    reader.read_to_end(e.name()).map_err(Error::decode)?;
                }
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(fault)
}

/// Collect the character data of the element just opened, up to its end tag
///
/// Text is unescaped and CDATA taken as is. Comments, processing
/// instructions and nested elements contribute nothing.
fn read_char_data(reader: &mut Reader<&[u8]>) -> Result<String> {
    let mut out = String::new();

    loop {
        match reader.read_event().map_err(Error::decode)? {
            Event::Text(t) => out.push_str(&t.unescape().map_err(Error::decode)?),
            Event::CData(c) => out.push_str(std::str::from_utf8(&c).map_err(Error::decode)?),
            Event::Start(e) => {
                reader.read_to_end(e.name()).map_err(Error::decode)?;
            }
            Event::End(_) => break,
            Event::Eof => return Err(Error::decode("unexpected end of fault")),
            _ => {}
        }
    }

    Ok(out)
}

/// Build and serialize a request envelope
pub fn encode<H, B>(header: Option<&H>, body: Option<&B>) -> Result<Vec<u8>>
where
    H: Serialize + ?Sized,
    B: Serialize + ?Sized,
{
    RequestEnvelope::new(header, body).encode()
}

/// Decode raw response bytes
///
/// A zero-length response is not parsed at all and yields
/// [`Outcome::Empty`] with [`EmptyReason::NoContent`].
pub fn decode(raw: &[u8]) -> Result<Outcome> {
    if raw.is_empty() {
        return Ok(Outcome::Empty(EmptyReason::NoContent));
    }
    Ok(ResponseEnvelope::parse(raw)?.outcome())
}
