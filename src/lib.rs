//! Error pages server library.
//!
//! Serves HTTP error pages (status code, message and description) as JSON,
//! XML, HTML or plain text, rendered from configurable templates.
//!
//! # Architecture Overview
//!
//! ```text
//!     request ──▶ http::server ──▶ http::handler ──▶ rotation (HTML only)
//!                                        │
//!                                        ▼
//!                                  cache::RenderedCache ──miss──▶ render
//!                                        │                          │
//!     response ◀── http::response ◀──────┴──────────── put ◀────────┘
//!
//!     cross-cutting: config (load, validate, hot reload),
//!                    lifecycle (startup, signals, shutdown),
//!                    observability (logging, metrics)
//! ```

pub mod cache;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod render;
pub mod rotation;

pub use config::ErrorPagesConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
