/// The `oprf` module provides the client side of the OPRF protocol from
/// [draft-irtf-cfrg-voprf](https://datatracker.ietf.org/doc/draft-irtf-cfrg-voprf/),
/// over the NIST P-384 and P-521 groups.
///
/// # Example
///
/// Provides a local end-to-end example of the OPRF protocol interaction
/// between a client and an evaluator holding the key `k`.
///
/// ```
/// use oprf_poc::oprf::groups::{PrimeOrderGroup, nist::P384};
/// use oprf_poc::oprf::ciphersuite::Ciphersuite;
/// use oprf_poc::oprf::Client;
///
/// let pog = P384;
/// let ciph = Ciphersuite::new(pog.clone(), false);
/// let cli = Client::setup(ciph.clone()).unwrap();
///
/// // evaluator key
/// let mut k: Vec<u8> = Vec::new();
/// pog.uniform_bytes(&mut k).unwrap();
///
/// // client generates and blinds a token
/// let mut x: Vec<u8> = Vec::new();
/// oprf_poc::utils::rand_bytes(32, &mut x).unwrap();
/// let input_vec = cli.blind_batch(&[x]).unwrap();
///
/// // evaluator computes k * M
/// let eval = vec![pog.scalar_mult(&input_vec[0].elem, &k).unwrap()];
///
/// // client unblinds and finalizes the response
/// let u = cli.unblind_batch(&input_vec, &eval).unwrap();
/// let aux = b"auxiliary_data";
/// let out = cli.finalize(&u[0], &input_vec[0].data, aux).unwrap();
///
/// // same as evaluating the unblinded input directly
/// let direct = pog.scalar_mult(&ciph.h1(&input_vec[0].data).unwrap(), &k).unwrap();
/// assert_eq!(out, cli.finalize(&direct, &input_vec[0].data, aux).unwrap());
/// ```
pub mod oprf;

/// The `client` module runs full protocol rounds against a remote evaluator.
pub mod client;

/// The `jsonrpc` module describes the request and response envelopes
/// exchanged with the evaluator.
pub mod jsonrpc;

/// The `transport` module moves encoded envelopes to the evaluator and back.
pub mod transport;

/// Command line and environment configuration of the `oprf-client` binary.
pub mod config;

/// The `utils` module provides access to a small number of utility functions
/// for processing data, and performing generic cryptographic operations.
pub mod utils;

/// The `errors` module describes (exhaustively) the high-level error types that
/// occur during the OPRF protocol.
pub mod errors;
