use crate::error::Result;

pub mod http;

pub use self::http::{HttpTransport, HttpTransportBuilder};

/// Transport trait for a single SOAP request/response exchange
///
/// Each transport instance represents a single connection and carries one
/// call; it is not reused afterwards.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send a serialized envelope
    ///
    /// An empty `action` means no action header is sent.
    async fn send(&mut self, action: &str, bytes: &[u8]) -> Result<()>;

    /// Receive the raw response bytes for the envelope just sent
    async fn receive(&mut self) -> Result<Vec<u8>>;

    /// Close the transport connection
    async fn close(&mut self) -> Result<()>;
}

/// Opens a fresh [`Transport`] for every call
#[async_trait::async_trait]
pub trait TransportConnector: Send + Sync {
    type Transport: Transport;

    async fn connect(&self) -> Result<Self::Transport>;
}
