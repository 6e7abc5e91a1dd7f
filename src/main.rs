//! Odos swapper
//!
//! Wraps a configured amount of native token and swaps it through the
//! Odos router on one EVM network, then exits.
//!
//! # Architecture Overview
//!
//! ```text
//!   settings.toml ─┐
//!   networks.toml ─┼─▶ config ─▶ lifecycle::bootstrap ─▶ pipeline
//!   SWAP_PRIVATE_KEY┘               │                      │
//!                                   ▼                      ▼
//!                            net::proxy probe     blockchain (RPC, signing,
//!                                                 fees, receipts) + quoting
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use odos_swapper::config::{load_config, load_networks, resolve_network};
use odos_swapper::lifecycle::signals::spawn_ctrl_c_handler;
use odos_swapper::lifecycle::{bootstrap, Shutdown, StartupOptions};
use odos_swapper::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "odos-swapper", version, about = "Wrap and swap native token via Odos")]
struct Cli {
    /// Settings file
    #[arg(short, long, default_value = "settings.toml")]
    config: PathBuf,

    /// Network constants file
    #[arg(short, long, default_value = "networks.toml")]
    networks: PathBuf,

    /// Do not probe the proxy at startup
    #[arg(long)]
    skip_proxy_check: bool,

    /// Price approve and wrap with legacy gasPrice
    #[arg(long)]
    legacy_fees: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(2);
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!("odos-swapper v{} starting", env!("CARGO_PKG_VERSION"));

    if let Some(address) = &config.observability.metrics_address {
        match address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Metrics exporter not started");
                }
            }
            Err(_) => tracing::error!(metrics_address = %address, "Failed to parse metrics address"),
        }
    }

    let network = match load_networks(&cli.networks)
        .and_then(|networks| resolve_network(&networks, &config.swap.network))
    {
        Ok(network) => network,
        Err(e) => {
            tracing::error!(error = %e, "Network configuration error");
            return ExitCode::from(2);
        }
    };

    let options = StartupOptions {
        skip_proxy_check: cli.skip_proxy_check,
        legacy_fees: cli.legacy_fees,
    };
    let pipeline = match bootstrap(&config, &network, &options).await {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::from(e.exit_code());
        }
    };

    let shutdown = Arc::new(Shutdown::new());
    spawn_ctrl_c_handler(shutdown.clone());

    match pipeline.execute(shutdown.subscribe()).await {
        Ok(report) => {
            tracing::info!(
                run_id = %report.run_id,
                approve_tx = ?report.approve_tx,
                wrap_tx = ?report.wrap_tx,
                swap_tx = ?report.swap_tx,
                "Swap succeeded"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "{}", e.headline());
            ExitCode::from(e.exit_code())
        }
    }
}
