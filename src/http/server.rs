//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the health route and the error page fallback
//! - Wire up middleware (tracing, request timeout)
//! - Own the shared request state (config, cache, rotation, renderer)
//! - Run the cache sweeper for as long as the server runs
//! - Swap in hot-reloaded configurations

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{routing::get, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::cache::{CacheSweeper, RenderedCache};
use crate::config::ErrorPagesConfig;
use crate::http::handler;
use crate::http::request::site_code_from_env;
use crate::lifecycle::shutdown::{self, Shutdown};
use crate::lifecycle::startup::apply_startup_rotation;
use crate::render::{Renderer, TemplateEngine};
use crate::rotation::TemplateRotator;

/// Error type for serving.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ArcSwap<ErrorPagesConfig>>,
    pub cache: RenderedCache,
    pub rotator: Arc<TemplateRotator>,
    pub renderer: Arc<dyn Renderer>,
    pub site_code: Arc<str>,
}

impl AppState {
    pub fn new(config: ErrorPagesConfig, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            cache: RenderedCache::default(),
            rotator: Arc::new(TemplateRotator::new()),
            renderer,
            site_code: Arc::from(site_code_from_env()),
        }
    }

    /// Replace the site code read from the environment.
    pub fn with_site_code(mut self, site_code: &str) -> Self {
        self.site_code = Arc::from(site_code);
        self
    }
}

/// HTTP server for error pages.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server rendering with the built-in template engine.
    pub fn new(config: ErrorPagesConfig) -> Self {
        Self::with_renderer(config, Arc::new(TemplateEngine::new()))
    }

    pub fn with_renderer(config: ErrorPagesConfig, renderer: Arc<dyn Renderer>) -> Self {
        Self::from_state(AppState::new(config, renderer))
    }

    pub fn from_state(state: AppState) -> Self {
        let request_timeout = Duration::from_secs(state.config.load().timeouts.request_secs);
        let router = build_router(state.clone(), request_timeout);
        Self { router, state }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server until `shutdown` fires.
    ///
    /// New configurations arriving on `config_updates` replace the current one;
    /// requests already in flight keep the snapshot they started with. The
    /// request timeout is fixed when the server is built.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: Option<mpsc::UnboundedReceiver<ErrorPagesConfig>>,
        shutdown: Shutdown,
    ) -> Result<(), ServeError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let sweeper = CacheSweeper::spawn(self.state.cache.clone());

        let reloader = config_updates.map(|updates| {
            tokio::spawn(apply_updates(
                self.state.config.clone(),
                updates,
                shutdown.subscribe(),
            ))
        });

        let served = axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown.subscribe()))
            .await;

        sweeper.stop().await;
        shutdown.trigger();
        if let Some(task) = reloader {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Config reload task failed");
            }
        }

        served?;
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/healthz", get(healthz).fallback(handler::error_page))
        .fallback(handler::error_page)
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "OK"
}

async fn apply_updates(
    config: Arc<ArcSwap<ErrorPagesConfig>>,
    mut updates: mpsc::UnboundedReceiver<ErrorPagesConfig>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(mut next) = update else { break };
                if let Some(name) = apply_startup_rotation(&mut next) {
                    tracing::info!(template = %name, "Picked random template for reloaded config");
                }
                config.store(Arc::new(next));
                tracing::info!("Configuration reloaded");
            }
            _ = shutdown.recv() => break,
        }
    }
}
