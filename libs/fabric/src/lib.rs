//! Soapbox Fabric - SOAP calls over HTTP
//!
//! Ties the envelope codec from `soapbox-core` to a transport: encode the
//! request, post it, read the reply, then hand back the decoded payload or
//! the server's fault.
//!
//! # Example
//!
//! ```no_run
//! use soapbox_fabric::{SoapClient, TracingDiagnostics};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize)]
//! struct GetUser { id: u32 }
//!
//! #[derive(Deserialize)]
//! struct User { name: String }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // One-off call
//! let user: Option<User> = soapbox_fabric::request::call(
//!     "https://example.com/users.asmx",
//!     false,
//!     "urn:GetUser",
//!     &GetUser { id: 7 },
//! )
//! .await?;
//!
//! // Or keep a client around
//! let client = SoapClient::new("https://example.com/users.asmx", false)
//!     .with_diagnostics(TracingDiagnostics);
//! let user: Option<User> = client.call("urn:GetUser", &GetUser { id: 7 }).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod diagnostics;
pub mod error;
pub mod request;
pub mod transport;

// Re-exports for convenience
pub use client::SoapClient;
pub use diagnostics::{Diagnostics, NoopDiagnostics, TracingDiagnostics};
pub use error::{Error, Result};
pub use soapbox_core::{EmptyReason, Fault, Outcome, ResponseEnvelope};
