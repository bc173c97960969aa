//! JSON-RPC 2.0 flavoured envelope exchanged with the OPRF evaluator.
//!
//! Group elements travel as lowercase hex strings of their SEC1 encoding.

use serde::{Deserialize, Serialize};

/// Protocol version carried by every request.
pub const VERSION: &str = "2.0";
/// The only method the evaluator exposes.
pub const METHOD_EVAL: &str = "eval";

/// An evaluation request: one hex encoded blinded element per token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(rename = "jsonrpc")]
    pub version: String,
    pub method: String,
    pub params: Vec<String>,
    pub id: u64,
}

impl Request {
    pub fn eval(params: Vec<String>, id: u64) -> Self {
        Request {
            version: VERSION.to_owned(),
            method: METHOD_EVAL.to_owned(),
            params,
            id,
        }
    }
}

/// The success shape. An absent `result` parses as empty, which is how an
/// error response is told apart from a success.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSuccess {
    #[serde(default)]
    pub result: Vec<String>,
}

/// The error shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    pub error: ErrorObject,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_wire_shape() {
        let req = Request::eval(vec![String::from("02ab")], 1);
        let json: serde_json::Value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "jsonrpc": "2.0",
                "method": "eval",
                "params": ["02ab"],
                "id": 1
            })
        );
    }

    #[test]
    fn error_body_parses_as_empty_success() {
        let body = br#"{"error":{"code":1,"message":"bad input"}}"#;
        let ok: ResponseSuccess = serde_json::from_slice(body).unwrap();
        assert!(ok.result.is_empty());
        let err: ResponseError = serde_json::from_slice(body).unwrap();
        assert_eq!(err.error.code, 1);
        assert_eq!(err.error.message, "bad input");
    }

    #[test]
    fn success_ignores_extra_members() {
        let body = br#"{"jsonrpc":"2.0","result":["03ff"],"id":7}"#;
        let ok: ResponseSuccess = serde_json::from_slice(body).unwrap();
        assert_eq!(ok.result, vec![String::from("03ff")]);
    }

    #[test]
    fn error_without_message_defaults_to_empty() {
        let err: ResponseError = serde_json::from_slice(br#"{"error":{"code":-1}}"#).unwrap();
        assert!(err.error.message.is_empty());
    }
}
