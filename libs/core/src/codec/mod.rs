use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

pub mod xml;

pub use self::xml::XmlCodec;

/// Codec trait for the application payload carried inside an envelope
///
/// Works on structured text rather than bytes: the encoded form is nested
/// verbatim inside the envelope, and the decoded form is read back out of
/// the raw inner body content.
pub trait Codec: Send + Sync {
    /// Encode a value into a standalone document fragment
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String>;

    /// Decode a document fragment into a value
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T>;
}
