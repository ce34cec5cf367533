//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ErrorPagesConfig (validated, immutable)
//!     → shared via ArcSwap with the request dispatcher
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → published over a channel
//!     → server swaps the Arc<ErrorPagesConfig>
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults, an empty file is a valid config
//! - Built-in templates and code descriptions live in defaults.rs
//! - Validation separates syntactic (serde) from semantic checks

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{CodeDescription, Codes, ErrorPagesConfig, FormatsConfig, ListenerConfig, Templates};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
