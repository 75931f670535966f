use std::time::Duration;

use reqwest::header::{CONNECTION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response, Url};

use crate::error::{Error, Result};
use crate::transport::{Transport, TransportConnector};

/// Content type of every outbound envelope
pub const CONTENT_TYPE_XML: &str = r#"text/xml; charset="utf-8""#;

/// Header naming the operation being invoked
pub const SOAP_ACTION: &str = "SOAPAction";

/// Client-identifying `User-Agent` sent unless overridden
pub const DEFAULT_USER_AGENT: &str = concat!("soapbox/", env!("CARGO_PKG_VERSION"));

/// HTTP transport posting one envelope per connection
///
/// Every transport owns its own connection pool with no idle slots and asks
/// the server to close the connection, so nothing is kept alive between
/// calls.
pub struct HttpTransport {
    client: Client,
    url: Url,
    user_agent: String,
    response: Option<Response>,
    send_timeout: Option<Duration>,
    receive_timeout: Option<Duration>,
}

impl HttpTransport {
    /// Connect to a SOAP endpoint with no timeouts
    pub async fn connect(url: impl Into<String>, skip_verify: bool) -> Result<Self> {
        Self::builder()
            .url(url)
            .skip_verify(skip_verify)
            .connect()
            .await
    }

    /// Create a builder for configuring the transport
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::new()
    }

    /// Get the endpoint this transport posts to
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&mut self, action: &str, bytes: &[u8]) -> Result<()> {
        let mut request = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, CONTENT_TYPE_XML)
            .header(USER_AGENT, self.user_agent.as_str())
            .header(CONNECTION, "close")
            .body(bytes.to_vec());

        if !action.is_empty() {
            request = request.header(SOAP_ACTION, action);
        }

        // Status codes are not interpreted: faults usually come back as 500
        let send_op = request.send();
        let response = if let Some(timeout) = self.send_timeout {
            tokio::time::timeout(timeout, send_op)
                .await
                .map_err(|_| Error::Timeout("Send"))??
        } else {
            send_op.await?
        };

        self.response = Some(response);
        Ok(())
    }

    async fn receive(&mut self) -> Result<Vec<u8>> {
        let response = self
            .response
            .take()
            .ok_or_else(|| Error::Transport("nothing sent on this transport".to_string()))?;

        let receive_op = response.bytes();
        let bytes = if let Some(timeout) = self.receive_timeout {
            tokio::time::timeout(timeout, receive_op)
                .await
                .map_err(|_| Error::Timeout("Receive"))??
        } else {
            receive_op.await?
        };

        Ok(bytes.to_vec())
    }

    async fn close(&mut self) -> Result<()> {
        // Dropping an unread response releases the connection
        self.response = None;
        Ok(())
    }
}

/// Builder for configuring HTTP transport
///
/// TLS certificate verification has no default: [`skip_verify`] must be set
/// explicitly, otherwise [`connect`] fails.
///
/// [`skip_verify`]: HttpTransportBuilder::skip_verify
/// [`connect`]: HttpTransportBuilder::connect
#[derive(Debug, Clone, Default)]
pub struct HttpTransportBuilder {
    url: Option<String>,
    skip_verify: Option<bool>,
    user_agent: Option<String>,
    connect_timeout: Option<Duration>,
    send_timeout: Option<Duration>,
    receive_timeout: Option<Duration>,
}

impl HttpTransportBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Accept invalid TLS certificates when `true`
    pub fn skip_verify(mut self, skip_verify: bool) -> Self {
        self.skip_verify = Some(skip_verify);
        self
    }

    /// Override the `User-Agent` header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the timeout for sending the request and getting response headers
    pub fn send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = Some(timeout);
        self
    }

    /// Set the timeout for reading the response body
    pub fn receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = Some(timeout);
        self
    }

    /// Build the transport with the configured settings
    pub async fn connect(self) -> Result<HttpTransport> {
        let url = self
            .url
            .ok_or_else(|| Error::Config("URL not set".to_string()))?;
        let url = Url::parse(&url).map_err(|e| Error::Config(format!("invalid URL {url}: {e}")))?;
        let skip_verify = self.skip_verify.ok_or_else(|| {
            Error::Config("TLS verification policy not set".to_string())
        })?;

        let mut builder = Client::builder()
            .danger_accept_invalid_certs(skip_verify)
            .pool_max_idle_per_host(0);
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        Ok(HttpTransport {
            client: builder.build()?,
            url,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            response: None,
            send_timeout: self.send_timeout,
            receive_timeout: self.receive_timeout,
        })
    }
}

#[async_trait::async_trait]
impl TransportConnector for HttpTransportBuilder {
    type Transport = HttpTransport;

    async fn connect(&self) -> Result<HttpTransport> {
        self.clone().connect().await
    }
}
