use serde::{de::DeserializeOwned, Serialize};

use crate::codec::Codec;
use crate::error::{Error, Result};

/// XML codec backed by quick-xml's serde support
///
/// Structs are written with their type name as the root element, so a
/// `GetUser { id: 7 }` becomes `<GetUser><id>7</id></GetUser>`. Output is
/// compact; the envelope takes care of indentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlCodec;

impl Codec for XmlCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        quick_xml::se::to_string(value).map_err(Error::encode)
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        quick_xml::de::from_str(text).map_err(Error::decode)
    }
}
