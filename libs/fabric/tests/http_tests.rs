use std::time::Duration;

use serde::{Deserialize, Serialize};
use soapbox_fabric::transport::http::{CONTENT_TYPE_XML, DEFAULT_USER_AGENT};
use soapbox_fabric::transport::{HttpTransport, Transport, TransportConnector};
use soapbox_fabric::{Error, SoapClient, TracingDiagnostics};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Serialize)]
struct Lookup {
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
struct LookupResult {
    #[serde(rename = "Name")]
    name: String,
}

fn lookup() -> Lookup {
    Lookup {
        name: "x".to_string(),
    }
}

fn envelope(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>{body}</soap:Body>
</soap:Envelope>"#
    )
}

#[tokio::test]
async fn posts_envelope_with_soap_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/service"))
        .and(header("Content-Type", CONTENT_TYPE_XML))
        .and(header("SOAPAction", "urn:Lookup"))
        .and(header("User-Agent", DEFAULT_USER_AGENT))
        .and(header("Connection", "close"))
        .and(body_string_contains("<Name>x</Name>"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(envelope("<Result><Name>y</Name></Result>")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = SoapClient::new(format!("{}/service", server.uri()), false);
    let result: Option<LookupResult> = client.call("urn:Lookup", &lookup()).await.unwrap();

    assert_eq!(
        result,
        Some(LookupResult {
            name: "y".to_string()
        })
    );
}

#[tokio::test]
async fn empty_action_sends_no_action_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = SoapClient::new(server.uri(), false);
    let result: Option<LookupResult> = client.call("", &lookup()).await.unwrap();
    assert_eq!(result, None);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("SOAPAction").is_none());
}

#[tokio::test]
async fn server_fault_with_500_status_is_fault_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string(envelope(
            "<soap:Fault><faultcode>500</faultcode><faultstring>bad request</faultstring></soap:Fault>",
        )))
        .mount(&server)
        .await;

    let client = SoapClient::new(server.uri(), false);
    let err = client
        .call::<_, LookupResult>("urn:Lookup", &lookup())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Fault(_)));
    assert_eq!(err.to_string(), "bad request");
}

#[tokio::test]
async fn slow_server_hits_send_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let connector = HttpTransport::builder()
        .url(server.uri())
        .skip_verify(false)
        .send_timeout(Duration::from_millis(100));
    let client = SoapClient::from_connector(connector);

    let err = client
        .call::<_, LookupResult>("urn:Lookup", &lookup())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout("Send")));
    assert!(err.is_transport());
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    // Grab a free port, then release it so nothing is listening
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let client = SoapClient::new(format!("http://{addr}/service"), false);
    let err = client
        .call::<_, LookupResult>("urn:Lookup", &lookup())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn builder_requires_tls_policy() {
    let result = HttpTransport::builder()
        .url("https://example.com/service")
        .connect()
        .await;

    match result {
        Err(Error::Config(msg)) => assert!(msg.contains("TLS")),
        _ => panic!("Expected configuration error"),
    }
}

#[tokio::test]
async fn builder_rejects_invalid_url() {
    let result = HttpTransport::connect("not a url", false).await;
    assert!(matches!(result, Err(Error::Config(_))));
}

#[tokio::test]
async fn receive_before_send_is_transport_error() {
    let connector = HttpTransport::builder()
        .url("http://127.0.0.1:1/service")
        .skip_verify(true);
    let mut transport = TransportConnector::connect(&connector).await.unwrap();

    let result = transport.receive().await;
    assert!(matches!(result, Err(Error::Transport(_))));
    transport.close().await.unwrap();
}

#[tokio::test]
async fn custom_user_agent_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("User-Agent", "billing-sync/2.1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let connector = HttpTransport::builder()
        .url(server.uri())
        .skip_verify(false)
        .user_agent("billing-sync/2.1");
    let client = SoapClient::from_connector(connector);

    let result: Option<LookupResult> = client.call("urn:Lookup", &lookup()).await.unwrap();
    assert_eq!(result, None);
}

#[tokio::test]
async fn tracing_diagnostics_do_not_change_outcome() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(envelope(r#"<Result><Name xsi:nil="true" /></Result>"#)),
        )
        .mount(&server)
        .await;

    let client = SoapClient::new(server.uri(), false).with_diagnostics(TracingDiagnostics);
    let result: Option<LookupResult> = client.call("urn:Lookup", &lookup()).await.unwrap();

    assert_eq!(result, Some(LookupResult::default()));
}

#[tokio::test]
async fn one_off_call_with_header() {
    #[derive(Serialize)]
    struct Session {
        #[serde(rename = "Token")]
        token: String,
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("<Token>abc</Token>"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(envelope("<Result><Name>y</Name></Result>")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = Session {
        token: "abc".to_string(),
    };
    let result: Option<LookupResult> = soapbox_fabric::request::call_with_header(
        &server.uri(),
        false,
        "urn:Lookup",
        &session,
        &lookup(),
    )
    .await
    .unwrap();

    assert_eq!(result.unwrap().name, "y");
}

#[tokio::test]
async fn one_off_send_ignores_payload_but_reports_faults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ok"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(envelope("<Ack><Id>1</Id><Extra/></Ack>")),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/fail"))
        .respond_with(ResponseTemplate::new(500).set_body_string(envelope(
            "<soap:Fault><faultstring>denied</faultstring></soap:Fault>",
        )))
        .mount(&server)
        .await;

    let ok = format!("{}/ok", server.uri());
    soapbox_fabric::request::send(&ok, false, "urn:Notify", &lookup())
        .await
        .unwrap();

    let fail = format!("{}/fail", server.uri());
    let err = soapbox_fabric::request::send(&fail, false, "urn:Notify", &lookup())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "denied");
}
