use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use soapbox_core::envelope::{EmptyReason, Outcome, RequestEnvelope, ResponseEnvelope};
use soapbox_core::sanitize::remove_nil_elements;
use soapbox_core::{Codec, XmlCodec};

use crate::diagnostics::{Diagnostics, NoopDiagnostics};
use crate::error::{Error, Result};
use crate::transport::{HttpTransport, HttpTransportBuilder, Transport, TransportConnector};

/// SOAP client
///
/// Combines a transport connector, a payload codec and a diagnostics sink.
/// Holds no per-call state: every call opens its own transport, so one
/// client can serve concurrent calls.
pub struct SoapClient<C = HttpTransportBuilder, K = XmlCodec> {
    connector: C,
    codec: K,
    diagnostics: Arc<dyn Diagnostics>,
}

impl SoapClient {
    /// Create an HTTP client for `url`
    ///
    /// `skip_verify` turns off TLS certificate verification.
    pub fn new(url: impl Into<String>, skip_verify: bool) -> Self {
        Self::from_connector(HttpTransport::builder().url(url).skip_verify(skip_verify))
    }
}

impl<C: TransportConnector> SoapClient<C> {
    /// Create a client from any transport connector
    pub fn from_connector(connector: C) -> Self {
        Self {
            connector,
            codec: XmlCodec,
            diagnostics: Arc::new(NoopDiagnostics),
        }
    }
}

impl<C, K> SoapClient<C, K>
where
    C: TransportConnector,
    K: Codec,
{
    /// Replace the payload codec
    pub fn with_codec<K2: Codec>(self, codec: K2) -> SoapClient<C, K2> {
        SoapClient {
            connector: self.connector,
            codec,
            diagnostics: self.diagnostics,
        }
    }

    /// Attach a diagnostics sink
    pub fn with_diagnostics(mut self, diagnostics: impl Diagnostics + 'static) -> Self {
        self.diagnostics = Arc::new(diagnostics);
        self
    }

    /// Invoke `action` with `request` as the body and no header
    ///
    /// Returns `Ok(None)` when the server answers with nothing to decode.
    pub async fn call<Req, Res>(&self, action: &str, request: &Req) -> Result<Option<Res>>
    where
        Req: Serialize + Sync + ?Sized,
        Res: DeserializeOwned,
    {
        self.call_with_header(action, None::<&()>, Some(request))
            .await
    }

    /// Invoke `action` with an optional header and an optional body
    ///
    /// The call runs once, start to finish, with no retries:
    ///
    /// 1. encode the envelope (nothing is sent if this fails)
    /// 2. send it over a fresh transport
    /// 3. read the raw response
    /// 4. parse the envelope; an empty response ends the call with
    ///    `Ok(None)` and a fault ends it with [`Error::Fault`]
    /// 5. strip `xsi:nil` markers from the body content
    /// 6. decode the content into `Res`
    pub async fn call_with_header<H, Req, Res>(
        &self,
        action: &str,
        header: Option<&H>,
        request: Option<&Req>,
    ) -> Result<Option<Res>>
    where
        H: Serialize + Sync + ?Sized,
        Req: Serialize + Sync + ?Sized,
        Res: DeserializeOwned,
    {
        let envelope = RequestEnvelope::new(header, request).encode_with(&self.codec)?;
        self.diagnostics
            .request(action, &String::from_utf8_lossy(&envelope));

        let raw = self.exchange(action, &envelope).await?;
        if raw.is_empty() {
            self.diagnostics.empty_response(EmptyReason::NoContent);
            return Ok(None);
        }

        let response = ResponseEnvelope::parse(&raw)?;
        self.diagnostics.response(&response);

        match response.outcome() {
            Outcome::Empty(reason) => {
                self.diagnostics.empty_response(reason);
                Ok(None)
            }
            Outcome::Fault(fault) => Err(Error::Fault(fault)),
            Outcome::Payload(content) => {
                let content = remove_nil_elements(&content);
                Ok(Some(self.codec.decode(&content)?))
            }
        }
    }

    async fn exchange(&self, action: &str, envelope: &[u8]) -> Result<Vec<u8>> {
        let mut transport = self.connector.connect().await?;

        let received = async {
            transport.send(action, envelope).await?;
            transport.receive().await
        }
        .await;
        let closed = transport.close().await;

        let raw = received?;
        closed?;
        Ok(raw)
    }
}
