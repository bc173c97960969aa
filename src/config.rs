use std::time::Duration;

use clap::Parser;

use crate::client::DEFAULT_ADDR;

/// The configuration for the OPRF client.
///
/// It can be configured via environment variables or command line arguments using `clap`.
#[derive(Parser, Debug, Clone)]
pub struct OprfClientConfig {
    /// The ciphersuite to run, e.g. `OPRF-P521-HKDF-SHA512-SSWU-RO`
    #[clap(
        long,
        env = "OPRF_CLIENT_CIPHERSUITE",
        default_value = "OPRF-P384-HKDF-SHA512-SSWU-RO"
    )]
    pub ciphersuite: String,

    /// Number of tokens per round (0 or 1)
    #[clap(long, env = "OPRF_CLIENT_N", default_value_t = 1)]
    pub n: usize,

    /// Address of the OPRF evaluator
    #[clap(long, env = "OPRF_CLIENT_ADDR", default_value = DEFAULT_ADDR)]
    pub addr: String,

    /// Deadline for one request, in seconds
    #[clap(long, env = "OPRF_CLIENT_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,
}

impl OprfClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The group identifier embedded in the ciphersuite name, e.g. `P384`.
    pub fn group_id(&self) -> Option<&str> {
        self.ciphersuite.split('-').nth(1)
    }
}
