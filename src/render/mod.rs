//! Template rendering subsystem.
//!
//! # Data Flow
//! ```text
//! RenderProperties + template source
//!     → engine.rs (minijinja render)
//!     → minify.rs (HTML only, best-effort)
//!     → bytes handed to the rendered-output cache
//! ```
//!
//! # Design Decisions
//! - Rendering sits behind the `Renderer` trait so the dispatcher can be
//!   exercised with failing or counting renderers
//! - Rendering is a pure function of (template, properties), which is what
//!   makes the output cacheable

pub mod engine;
pub mod minify;
pub mod props;

use thiserror::Error;

pub use engine::TemplateEngine;
pub use props::RenderProperties;

/// Errors produced while turning a template into output.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template failed to parse or evaluate.
    #[error("{0}")]
    Template(#[from] minijinja::Error),

    /// HTML minification failed.
    #[error("minification failed: {0}")]
    Minify(String),
}

/// Turns a template source plus properties into output.
pub trait Renderer: Send + Sync {
    /// Render `template` with `props` as its context.
    fn render(&self, template: &str, props: &RenderProperties) -> Result<String, RenderError>;

    /// Minify rendered HTML.
    fn minify_html(&self, content: &str) -> Result<String, RenderError> {
        minify::minify_html(content)
    }
}
