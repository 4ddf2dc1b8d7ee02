//! locktable Server Binary
//!
//! Starts the HTTP server for locktable.

use std::path::PathBuf;

use clap::Parser;
use locktable::network::Server;
use locktable::{Config, Dispatcher};
use tracing_subscriber::{fmt, EnvFilter};

/// locktable Server
#[derive(Parser, Debug)]
#[command(name = "locktable-server")]
#[command(about = "In-memory DynamoDB-compatible lock table")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "0.0.0.0:8000")]
    listen: String,

    /// Attribute holding the lock key
    #[arg(short = 'K', long, default_value = "LockID")]
    key_attribute: String,

    /// API version prefix expected in X-Amz-Target
    #[arg(long, default_value = "DynamoDB_20120810")]
    target_prefix: String,

    /// Maximum request body size in KB
    #[arg(short, long, default_value = "16384")]
    max_request_kb: usize,

    /// TLS certificate (PEM); requires --key
    #[arg(short = 'c', long)]
    cert: Option<PathBuf>,

    /// TLS private key (PEM); requires --cert
    #[arg(short = 'k', long)]
    key: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,locktable=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("locktable Server v{}", locktable::VERSION);
    tracing::info!("Listen address: {}", args.listen);
    tracing::info!("Key attribute: {}", args.key_attribute);

    // Build config from args
    let mut config = Config::builder()
        .listen_addr(&args.listen)
        .key_attribute(&args.key_attribute)
        .target_prefix(&args.target_prefix)
        .max_request_bytes(args.max_request_kb * 1024)
        .build();
    config.tls_cert = args.cert;
    config.tls_key = args.key;

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    tracing::info!("TLS: {}", config.is_tls_configured());

    let dispatcher = Dispatcher::from_config(&config);

    // Start server
    let server = Server::new(config, dispatcher);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
