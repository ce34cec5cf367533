//! `error-pages` binary: serves error pages or checks a running instance.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tokio::net::TcpListener;

use error_pages::config::ConfigWatcher;
use error_pages::lifecycle::signals::spawn_signal_handler;
use error_pages::lifecycle::startup::{apply_startup_rotation, load_or_default};
use error_pages::observability::logging::{init_logging, LogFormat};
use error_pages::observability::metrics;
use error_pages::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "error-pages")]
#[command(about = "Serves HTTP error pages in JSON, XML, HTML and plain text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve(ServeArgs),
    /// Check that a running server answers on /healthz
    Healthcheck {
        #[arg(long, default_value = "http://127.0.0.1:8080/healthz")]
        url: String,
    },
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides listener.bind_address
    #[arg(short, long)]
    listen: Option<String>,

    /// Log output format, overrides observability.log_format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// Reload the configuration file when it changes
    #[arg(long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::Serve(args) => serve(args).await,
        Command::Healthcheck { url } => healthcheck(&url).await,
    }
}

async fn serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_or_default(args.config.as_deref())?;

    if let Some(listen) = args.listen {
        config.listener.bind_address = listen;
    }
    if let Some(format) = args.log_format {
        config.observability.log_format = format;
    }

    init_logging(&config.observability.log_level, config.observability.log_format);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "error-pages starting");

    if let Some(name) = apply_startup_rotation(&mut config) {
        tracing::info!(template = %name, "Picked random template for this run");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        default_code = config.default_code,
        default_format = config.default_format.as_str(),
        rotation_mode = ?config.rotation_mode,
        templates = config.templates.len(),
        "Configuration ready"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    // The watcher handle must outlive the server.
    let (_watcher, updates) = match (args.watch, args.config.as_deref()) {
        (true, Some(path)) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), Some(updates))
        }
        _ => (None, None),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone());

    HttpServer::new(config).run(listener, updates, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn healthcheck(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let response = reqwest::get(url).await?;
    let status = response.status();

    if status.is_success() {
        println!("OK");
        Ok(())
    } else {
        Err(format!("health check returned status {}", status).into())
    }
}
