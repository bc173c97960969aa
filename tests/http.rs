use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use oprf_poc::client::Config;
use oprf_poc::errors::Error;
use oprf_poc::jsonrpc::Request;
use oprf_poc::oprf::groups::nist::P384;
use oprf_poc::oprf::groups::PrimeOrderGroup;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

const SUITE: &str = "OPRF-P384-HKDF-SHA512-SSWU-RO";

async fn eval(State(key): State<Arc<Vec<u8>>>, Json(req): Json<Request>) -> Json<Value> {
    let pog = P384;
    let mut result = Vec::with_capacity(req.params.len());
    for p in &req.params {
        let decoded = hex::decode(p).ok().and_then(|b| pog.deserialize(&b).ok());
        let Some(m) = decoded else {
            return Json(json!({ "error": { "code": -32602, "message": "invalid params" } }));
        };
        let z = pog.scalar_mult(&m, &key).expect("valid key");
        let mut out = Vec::new();
        pog.serialize(&z, true, &mut out);
        result.push(hex::encode(out));
    }
    Json(json!({ "jsonrpc": "2.0", "result": result, "id": req.id }))
}

async fn refuse() -> Json<Value> {
    Json(json!({ "error": { "code": 3, "message": "rate limited" } }))
}

async fn broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn spawn_evaluator() -> SocketAddr {
    let mut key = Vec::new();
    P384.uniform_bytes(&mut key).unwrap();
    let app = Router::new()
        .route("/", post(eval))
        .route("/refuse", post(refuse))
        .route("/broken", post(broken))
        .with_state(Arc::new(key));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn round_over_http() {
    let addr = spawn_evaluator().await;
    let session = Config::create_config(SUITE, P384, 1)
        .unwrap()
        .with_addr(addr.to_string())
        .with_timeout(Duration::from_secs(5));
    let outputs = session
        .send_oprf_request(&CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].len(), 64);
}

#[tokio::test]
async fn server_reported_error_over_http() {
    let addr = spawn_evaluator().await;
    let session = Config::create_config(SUITE, P384, 1)
        .unwrap()
        .with_addr(format!("http://{addr}/refuse"));
    match session.send_oprf_request(&CancellationToken::new()).await {
        Err(Error::ServerReportedError { code, message }) => {
            assert_eq!(code, 3);
            assert_eq!(message, "rate limited");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn non_success_status_is_internal() {
    let addr = spawn_evaluator().await;
    let session = Config::create_config(SUITE, P384, 1)
        .unwrap()
        .with_addr(format!("{addr}/broken"));
    assert!(matches!(
        session.send_oprf_request(&CancellationToken::new()).await,
        Err(Error::ClientInternal(_))
    ));
}

#[tokio::test]
async fn connection_refused_is_internal() {
    // bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let session = Config::create_config(SUITE, P384, 1)
        .unwrap()
        .with_addr(addr.to_string());
    assert!(matches!(
        session.send_oprf_request(&CancellationToken::new()).await,
        Err(Error::ClientInternal(_))
    ));
}
