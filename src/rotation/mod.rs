//! HTML template rotation.
//!
//! # Data Flow
//! ```text
//! HTML request
//!     → selector.rs (mode from config)
//!         - disabled / random-on-startup → configured name
//!         - random-on-each-request       → fresh random pick
//!         - random-hourly / random-daily → shared RotationState,
//!                                          re-picked on boundary change
//!     → template name looked up in the configured set
//! ```
//!
//! # Design Decisions
//! - Rotation state is one atomically swapped value (name + timestamp),
//!   so readers never see a name from one period with the time of another
//! - The selector is owned by the server state, not a global

pub mod selector;

use serde::{Deserialize, Serialize};

pub use selector::{RotationState, TemplateRotator};

/// How the active HTML template changes over time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RotationMode {
    /// Always use the configured template.
    #[default]
    Disabled,
    /// Pick one random template when the process starts.
    RandomOnStartup,
    /// Pick a random template for every request.
    RandomOnEachRequest,
    /// Pick a random template once per clock hour.
    RandomHourly,
    /// Pick a random template once per calendar day.
    RandomDaily,
}
