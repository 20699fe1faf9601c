mod bundle;
mod cli;
mod commands;
mod config;
mod content;
mod env;
mod error;
mod filter;
mod host;
mod import;
mod llm;
mod output;
mod repo;
mod template;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// ログ出力を初期化
///
/// 1. `--debug` なら tim=debug
/// 2. RUST_LOG があればそれに従う
/// 3. 既定は tim=info
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("tim=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tim=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    init_tracing(cli.debug);

    if let Err(err) = commands::dispatch(cli).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
