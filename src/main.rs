use chrono::Local;
use clap::Parser;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use savings_advisor::cli::{Cli, Commands, render_advice};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so `advise` output stays pipeable.
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            if let Err(e) = savings_advisor::api::run_http_server(host, port).await {
                error!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Commands::Advise(args) => match render_advice(args, Local::now().date_naive()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("{e}");
                std::process::exit(1);
            }
        },
    }
}
