//! HTTP Server
//!
//! Accepts item requests and dispatches them on the tokio runtime.
//!
//! Plain HTTP by default; HTTPS when the config names both a certificate and a
//! private key.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower_http::trace::TraceLayer;

use super::handler::{handle_request, method_not_allowed, route_not_found};
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{LockTableError, Result};

/// State shared by every request
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) dispatcher: Dispatcher,
    pub(crate) target_prefix: Arc<str>,
    pub(crate) max_request_bytes: usize,
}

/// HTTP server for locktable
pub struct Server {
    config: Config,
    dispatcher: Dispatcher,
    shutdown: Arc<Notify>,
}

/// Stops a running server from another task
#[derive(Clone)]
pub struct ShutdownHandle {
    shutdown: Arc<Notify>,
}

impl ShutdownHandle {
    /// Signal the server to shutdown gracefully
    ///
    /// In-flight requests complete; the listener stops accepting.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}

impl Server {
    /// Create a new server with the given config and dispatcher
    pub fn new(config: Config, dispatcher: Dispatcher) -> Self {
        Self {
            config,
            dispatcher,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Build the axum router
    pub fn router(&self) -> Router {
        let state = AppState {
            dispatcher: self.dispatcher.clone(),
            target_prefix: Arc::from(self.config.target_prefix.as_str()),
            max_request_bytes: self.config.max_request_bytes,
        };

        Router::new()
            .route("/", post(handle_request).fallback(method_not_allowed))
            .fallback(route_not_found)
            .layer(DefaultBodyLimit::max(self.config.max_request_bytes))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            shutdown: Arc::clone(&self.shutdown),
        }
    }

    /// Bind the configured address and serve until shutdown
    pub async fn run(self) -> Result<()> {
        self.config.validate()?;
        let listener = TcpListener::bind(&self.config.listen_addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already-bound listener until shutdown
    ///
    /// Shutdown is triggered by Ctrl+C or by a [`ShutdownHandle`].
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let addr: SocketAddr = listener.local_addr()?;
        let tls = self.load_tls().await?;
        let app = self.router();
        let shutdown = shutdown_signal(Arc::clone(&self.shutdown));

        match tls {
            Some(tls) => {
                tracing::info!("Listening on https://{}", addr);

                let handle = axum_server::Handle::new();
                let stopper = handle.clone();
                tokio::spawn(async move {
                    shutdown.await;
                    stopper.graceful_shutdown(None);
                });

                axum_server::from_tcp_rustls(listener.into_std()?, tls)
                    .handle(handle)
                    .serve(app.into_make_service())
                    .await?;
            }
            None => {
                tracing::info!("Listening on http://{}", addr);

                axum::serve(listener, app)
                    .with_graceful_shutdown(shutdown)
                    .await?;
            }
        }

        tracing::info!("Server on {} stopped", addr);
        Ok(())
    }

    /// Read the PEM certificate and key, if TLS is configured
    async fn load_tls(&self) -> Result<Option<RustlsConfig>> {
        let (Some(cert), Some(key)) = (&self.config.tls_cert, &self.config.tls_key) else {
            return Ok(None);
        };

        // Fails only if a provider is already installed, which is fine
        let _ = rustls::crypto::ring::default_provider().install_default();

        let tls = RustlsConfig::from_pem_file(cert, key).await.map_err(|e| {
            LockTableError::Config(format!(
                "failed to load TLS certificate {} / key {}: {}",
                cert.display(),
                key.display(),
                e
            ))
        })?;
        Ok(Some(tls))
    }
}

/// Resolves on an explicit shutdown request or on Ctrl+C
fn shutdown_signal(shutdown: Arc<Notify>) -> impl Future<Output = ()> + Send + 'static {
    async move {
        tokio::select! {
            _ = shutdown.notified() => {
                tracing::info!("Shutdown requested");
            }
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::warn!("Failed to listen for Ctrl+C: {}", e);
                    // Keep serving until an explicit shutdown
                    shutdown.notified().await;
                } else {
                    tracing::info!("Received Ctrl+C, initiating shutdown...");
                }
            }
        }
    }
}
