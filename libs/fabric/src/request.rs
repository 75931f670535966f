use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;

use crate::client::SoapClient;
use crate::error::Result;

/// Perform a one-off SOAP call over HTTP
///
/// Builds a client, makes the call and drops the client again. Returns
/// `Ok(None)` when the response carried nothing to decode.
pub async fn call<Req, Res>(
    url: &str,
    skip_verify: bool,
    action: &str,
    request: &Req,
) -> Result<Option<Res>>
where
    Req: Serialize + Sync + ?Sized,
    Res: DeserializeOwned,
{
    SoapClient::new(url, skip_verify).call(action, request).await
}

/// Perform a one-off SOAP call over HTTP with a header
pub async fn call_with_header<H, Req, Res>(
    url: &str,
    skip_verify: bool,
    action: &str,
    header: &H,
    request: &Req,
) -> Result<Option<Res>>
where
    H: Serialize + Sync + ?Sized,
    Req: Serialize + Sync + ?Sized,
    Res: DeserializeOwned,
{
    SoapClient::new(url, skip_verify)
        .call_with_header(action, Some(header), Some(request))
        .await
}

/// Send a request whose response payload is of no interest
///
/// Faults and transport errors are still reported.
pub async fn send<Req>(url: &str, skip_verify: bool, action: &str, request: &Req) -> Result<()>
where
    Req: Serialize + Sync + ?Sized,
{
    call::<Req, IgnoredAny>(url, skip_verify, action, request).await?;
    Ok(())
}
