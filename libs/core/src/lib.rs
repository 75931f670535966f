//! Soapbox Core - SOAP envelope codec
//!
//! Pure, I/O-free building blocks for talking SOAP 1.1:
//!
//! - [`envelope`]: wrap a header and body into a request envelope, parse a
//!   response envelope into a payload, a fault or nothing
//! - [`sanitize`]: strip `xsi:nil` markers serde cannot express
//! - [`codec`]: the application payload codec ([`XmlCodec`])
//!
//! # Example
//!
//! ```
//! use soapbox_core::envelope::{self, Outcome};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Ping {
//!     seq: u32,
//! }
//!
//! let bytes = envelope::encode(None::<&()>, Some(&Ping { seq: 1 })).unwrap();
//! assert!(String::from_utf8(bytes).unwrap().contains("<seq>1</seq>"));
//!
//! let reply = br#"<Envelope><Body><Pong/></Body></Envelope>"#;
//! assert_eq!(
//!     envelope::decode(reply).unwrap(),
//!     Outcome::Payload("<Pong/>".to_string())
//! );
//! ```

pub mod codec;
pub mod envelope;
pub mod error;
pub mod fault;
pub mod sanitize;

pub use codec::{Codec, XmlCodec};
pub use envelope::{EmptyReason, Outcome, RequestEnvelope, ResponseEnvelope};
pub use error::{Error, Result};
pub use fault::Fault;
