use clap::Parser;
use eyre::Context;
use oprf_poc::client::Config;
use oprf_poc::config::OprfClientConfig;
use oprf_poc::oprf::groups::nist::{P384, P521};
use oprf_poc::oprf::groups::PrimeOrderGroup;
use tokio_util::sync::CancellationToken;

fn install_tracing() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{
        EnvFilter,
        fmt::{self},
    };

    let fmt_layer = fmt::layer().with_target(false).with_line_number(false);
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

async fn run<G: PrimeOrderGroup>(config: &OprfClientConfig, pog: G) -> eyre::Result<()> {
    let session = Config::create_config(&config.ciphersuite, pog, config.n)
        .context("while creating session")?
        .with_addr(config.addr.clone())
        .with_timeout(config.timeout());

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    tracing::info!("requesting {} token(s) from {}", config.n, session.url());
    let outputs = session
        .send_oprf_request(&cancel)
        .await
        .context("while running OPRF round")?;
    for out in outputs {
        println!("{}", hex::encode(out));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_tracing();
    let config = OprfClientConfig::parse();
    tracing::debug!("{config:?}");

    match config.group_id() {
        Some("P384") => run(&config, P384).await,
        Some("P521") => run(&config, P521).await,
        _ => eyre::bail!("unsupported ciphersuite: {}", config.ciphersuite),
    }
}
