//! Session orchestration: one [`Config`] per evaluator, any number of rounds.
//!
//! A round samples fresh inputs, blinds them, ships the blinded elements to
//! the evaluator, then unblinds and finalizes whatever comes back. All
//! per-round state lives in the round itself, so a session can run rounds
//! concurrently.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::errors::{err_internal, err_unsupported, Error, Result};
use crate::jsonrpc::{Request, ResponseError, ResponseSuccess};
use crate::oprf::ciphersuite::Ciphersuite;
use crate::oprf::groups::PrimeOrderGroup;
use crate::oprf::{Client, Input};
use crate::transport::{HttpTransport, Transport};
use crate::utils::rand_bytes;

/// Evaluator address used when none is configured.
pub const DEFAULT_ADDR: &str = "localhost:3001";
/// Upper bound on a single transport call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Domain separation string mixed into every finalized output.
pub const OPRF_FINALIZE_AUX: &[u8] = b"oprf_finalization_step";
/// Length of the random inputs sampled for each token.
pub const INPUT_LENGTH: usize = 32;
/// Largest batch a round may request.
pub const MAX_BATCH_SIZE: usize = 1;

/// A client session bound to one ciphersuite, batch size and evaluator.
pub struct Config<G: PrimeOrderGroup, T: Transport = HttpTransport> {
    ocli: Client<G>,
    n: usize,
    addr: String,
    timeout: Duration,
    transport: T,
    next_id: AtomicU64,
}

impl<G: PrimeOrderGroup> Config<G, HttpTransport> {
    /// Builds a session for `ciphersuite` over `pog` requesting `n` tokens per
    /// round. Only `n` in `{0, 1}` is supported.
    pub fn create_config(ciphersuite: &str, pog: G, n: usize) -> Result<Self> {
        if n > MAX_BATCH_SIZE {
            return Err(err_unsupported(format!(
                "batch size {n} exceeds the maximum of {MAX_BATCH_SIZE}"
            )));
        }
        let ciph = Ciphersuite::from_name(ciphersuite, pog)?;
        let ocli = Client::setup(ciph)?;
        Ok(Config {
            ocli,
            n,
            addr: DEFAULT_ADDR.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            transport: HttpTransport::default(),
            next_id: AtomicU64::new(1),
        })
    }
}

impl<G: PrimeOrderGroup, T: Transport> Config<G, T> {
    pub fn with_addr(mut self, addr: impl Into<String>) -> Self {
        self.addr = addr.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Swaps the transport, keeping everything else.
    pub fn with_transport<U: Transport>(self, transport: U) -> Config<G, U> {
        Config {
            ocli: self.ocli,
            n: self.n,
            addr: self.addr,
            timeout: self.timeout,
            transport,
            next_id: self.next_id,
        }
    }

    pub fn client(&self) -> &Client<G> {
        &self.ocli
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The URL requests are posted to. Bare `host:port` addresses get an
    /// `http://` scheme.
    pub fn url(&self) -> String {
        if self.addr.contains("://") {
            self.addr.clone()
        } else {
            format!("http://{}", self.addr)
        }
    }

    /// Samples `n` random inputs and blinds them. Returns the request to send
    /// together with the round state needed to process the answer.
    pub fn create_oprf_request(&self) -> Result<(Request, Vec<Input<G::Element>>)> {
        let mut data = Vec::with_capacity(self.n);
        for _ in 0..self.n {
            let mut x: Vec<u8> = Vec::new();
            rand_bytes(INPUT_LENGTH, &mut x)?;
            data.push(x);
        }
        self.blind_request(&data)
    }

    /// Blinds caller supplied inputs into an eval request.
    pub fn blind_request(&self, data: &[Vec<u8>]) -> Result<(Request, Vec<Input<G::Element>>)> {
        if data.len() > MAX_BATCH_SIZE {
            return Err(err_unsupported(format!(
                "batch size {} exceeds the maximum of {MAX_BATCH_SIZE}",
                data.len()
            )));
        }
        let inputs = self.ocli.blind_batch(data)?;
        let params = inputs
            .iter()
            .map(|input| hex::encode(self.ocli.serialize_element(&input.elem)))
            .collect();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        Ok((Request::eval(params, id), inputs))
    }

    /// Unblinds and finalizes the evaluated elements, pairing `result[i]`
    /// with `inputs[i]`.
    pub fn process_server_response(
        &self,
        resp: &ResponseSuccess,
        inputs: &[Input<G::Element>],
    ) -> Result<Vec<Vec<u8>>> {
        if resp.result.len() != inputs.len() {
            tracing::debug!(
                expected = inputs.len(),
                got = resp.result.len(),
                "result count mismatch"
            );
            return Err(Error::ServerResponse);
        }
        let mut evals = Vec::with_capacity(inputs.len());
        for elem in &resp.result {
            let buf = hex::decode(elem).map_err(|_| Error::ServerResponse)?;
            evals.push(self.ocli.deserialize_element(&buf)?);
        }
        let unblinded = self.ocli.unblind_batch(inputs, &evals)?;
        inputs
            .iter()
            .zip(&unblinded)
            .map(|(input, n)| self.ocli.finalize(n, &input.data, OPRF_FINALIZE_AUX))
            .collect()
    }

    /// Runs one full round on `n` freshly sampled inputs and returns the PRF
    /// outputs in request order.
    pub async fn send_oprf_request(&self, cancel: &CancellationToken) -> Result<Vec<Vec<u8>>> {
        if self.n == 0 {
            tracing::debug!("empty batch, nothing to send");
            return Ok(Vec::new());
        }
        let (req, inputs) = self.create_oprf_request()?;
        self.run_round(req, inputs, cancel).await
    }

    /// Runs one full round on `data` and returns the PRF outputs in order.
    pub async fn evaluate(
        &self,
        data: &[Vec<u8>],
        cancel: &CancellationToken,
    ) -> Result<Vec<Vec<u8>>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let (req, inputs) = self.blind_request(data)?;
        self.run_round(req, inputs, cancel).await
    }

    #[instrument(
        level = "debug",
        skip_all,
        fields(ciphersuite = %self.ocli.ciphersuite().name, id = req.id, n = inputs.len())
    )]
    async fn run_round(
        &self,
        req: Request,
        inputs: Vec<Input<G::Element>>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Vec<u8>>> {
        tracing::debug!("sending eval request");
        let body = serde_json::to_vec(&req)
            .map_err(|e| err_internal(format!("cannot encode request: {e}")))?;

        let url = self.url();
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            res = tokio::time::timeout(self.timeout, self.transport.post(&url, body)) => res,
        };
        let raw = match response {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => return Err(e.into_error(self.timeout)),
            Err(_) => return Err(Error::Timeout(self.timeout)),
        };

        let success = parse_jsonrpc_response(&raw)?;
        tracing::trace!(elements = success.result.len(), "got eval response");
        self.process_server_response(&success, &inputs)
    }
}

/// Tries the success shape first. A missing or empty `result` means the body
/// should be an error object, which must carry a non-empty message to be
/// passed through.
pub fn parse_jsonrpc_response(body: &[u8]) -> Result<ResponseSuccess> {
    let success: ResponseSuccess =
        serde_json::from_slice(body).map_err(|_| Error::ServerResponse)?;
    if !success.result.is_empty() {
        return Ok(success);
    }
    match serde_json::from_slice::<ResponseError>(body) {
        Ok(resp) if !resp.error.message.is_empty() => Err(Error::ServerReportedError {
            code: resp.error.code,
            message: resp.error.message,
        }),
        _ => Err(Error::ServerResponse),
    }
}
