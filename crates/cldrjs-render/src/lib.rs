//! # cldrjs-render - Template Layer for Generated Scripts
//!
//! `cldrjs-render` turns named templates plus a serializable context into
//! source text. It is the rendering foundation for the `cldrjs` bundle
//! compiler, but can be used on its own by anything that generates code from
//! templates.
//!
//! ## Core Concepts
//!
//! - [`TemplateEngine`]: The rendering contract (`render(name, context) -> String`)
//! - [`MiniJinjaEngine`]: The default engine, configured for code generation
//!   (no HTML auto-escaping, trailing newlines kept, block whitespace trimmed)
//! - [`TemplateRegistry`]: Name resolution for inline and embedded templates
//! - [`RenderError`]: Stable error type over the engine's internals
//!
//! ## Quick Start
//!
//! ```rust
//! use cldrjs_render::{MiniJinjaEngine, TemplateEngine, TemplateRegistry};
//! use serde_json::json;
//!
//! let entries: &[(&str, &str)] = &[
//!     ("greeting.jinja", "var greeting = {{ text | tojs }};"),
//! ];
//! let registry = TemplateRegistry::from_embedded_entries(entries);
//! let engine = MiniJinjaEngine::from_registry(&registry).unwrap();
//!
//! let output = engine
//!     .render_named("greeting", &json!({ "text": "hello \"world\"" }))
//!     .unwrap();
//! assert_eq!(output, r#"var greeting = "hello \"world\"";"#);
//! ```

mod engine;
mod error;
pub mod registry;

pub use engine::{register_filters, MiniJinjaEngine, TemplateEngine};
pub use error::RenderError;
pub use registry::{
    extension_priority, strip_extension, RegistryError, TemplateRegistry, TEMPLATE_EXTENSIONS,
};
