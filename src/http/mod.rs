//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, /healthz)
//!     → handler.rs (error page dispatcher)
//!         → request.rs (status code, format, request ID)
//!         → format.rs (content types, media type parsing)
//!         → response.rs (headers, fallback bodies)
//!     → Send to client
//! ```

pub mod format;
pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use format::Format;
pub use server::{AppState, HttpServer, ServeError};
