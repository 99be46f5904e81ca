use std::process::ExitCode;

use clap::Parser;
use playground_server::config::Config;
use playground_server::error::StartupError;
use playground_server::{logger, server};

/// Static-content server for the code playground
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Configuration file, extension optional
    #[arg(short, long, default_value = "config", env = "PLAYGROUND_CONFIG")]
    config: String,

    /// Directory to serve, overrides `site.root`
    #[arg(short, long)]
    root: Option<String>,

    /// Port to listen on, overrides `server.port`
    #[arg(short, long)]
    port: Option<u16>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match start(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn start(args: Args) -> Result<(), StartupError> {
    let mut cfg = Config::load_from(&args.config)?;
    cfg.apply_overrides(args.root, args.port);

    logger::init(&cfg.logging).map_err(StartupError::Logger)?;

    // Worker threads follow the configuration, defaulting to one per core
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build().map_err(StartupError::Runtime)?;

    runtime.block_on(server::run(cfg))
}
