use std::time::Duration;

use thiserror::Error;

/// Every failure the OPRF client can surface. Nothing in the crate retries or
/// recovers locally: the first error of a round is returned to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// A requested parameter (batch size, ciphersuite, protocol mode) is not
    /// supported. Raised before any network activity.
    #[error("unsupported parameter: {0}")]
    UnsupportedParameter(String),

    /// A local computation failed: randomness, hash-to-curve, encoding or
    /// decoding of group elements, or the transport itself.
    #[error("internal client error: {0}")]
    ClientInternal(String),

    /// A point failed the on-curve check.
    #[error("invalid group element")]
    InvalidGroupElement,

    /// The server answered, but with neither a success nor an error envelope.
    #[error("malformed server response")]
    ServerResponse,

    /// The server explicitly reported an error.
    #[error("server error {code}: {message}")]
    ServerReportedError { code: i64, message: String },

    /// The transport did not answer within the session deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the round.
    #[error("request cancelled")]
    Cancelled,
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn err_internal(reason: impl Into<String>) -> Error {
    Error::ClientInternal(reason.into())
}

pub(crate) fn err_unsupported(reason: impl Into<String>) -> Error {
    Error::UnsupportedParameter(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_is_passed_through() {
        let e = Error::ServerReportedError {
            code: -32602,
            message: String::from("bad input"),
        };
        assert_eq!(e.to_string(), "server error -32602: bad input");
    }

    #[test]
    fn helpers_pick_the_right_kind() {
        assert!(matches!(err_internal("rng"), Error::ClientInternal(m) if m == "rng"));
        assert!(matches!(err_unsupported("n=2"), Error::UnsupportedParameter(m) if m == "n=2"));
    }
}
