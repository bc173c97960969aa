//! The transport collaborator: posts a request body to an evaluator address
//! and hands back the raw response bytes.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::errors::Error;

/// Failures below the JSON-RPC layer.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport timed out")]
    Timeout,
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if let Some(status) = e.status() {
            TransportError::Status(status.as_u16())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

impl TransportError {
    /// Transport failures are local failures, except for a timeout which is
    /// reported against `deadline`, the bound the caller put on the call.
    pub fn into_error(self, deadline: Duration) -> Error {
        match self {
            TransportError::Timeout => Error::Timeout(deadline),
            other => Error::ClientInternal(other.to_string()),
        }
    }
}

/// Sends one request and waits for the whole response body.
pub trait Transport: Send + Sync {
    fn post(
        &self,
        addr: &str,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}

/// HTTP POST with an `application/json` body.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        HttpTransport { client }
    }
}

impl Transport for HttpTransport {
    async fn post(&self, addr: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .post(addr)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(response.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_reports_the_deadline() {
        let deadline = Duration::from_secs(7);
        assert!(matches!(
            TransportError::Timeout.into_error(deadline),
            Error::Timeout(d) if d == deadline
        ));
    }

    #[test]
    fn other_failures_are_internal() {
        let deadline = Duration::from_secs(7);
        assert!(matches!(
            TransportError::Status(500).into_error(deadline),
            Error::ClientInternal(m) if m.contains("500")
        ));
        assert!(matches!(
            TransportError::Request(String::from("connection refused")).into_error(deadline),
            Error::ClientInternal(_)
        ));
    }
}
