//! Template engine abstraction.
//!
//! This module defines the [`TemplateEngine`] trait which allows the bundle
//! compiler to work with different template backends. The default implementation
//! is [`MiniJinjaEngine`], configured for emitting source code rather than markup.

use minijinja::{AutoEscape, Environment, Value};

use crate::error::RenderError;
use crate::registry::TemplateRegistry;

/// A template engine that renders named templates with a context object.
///
/// Implementations must be deterministic: the same template and the same
/// context always produce byte-identical output.
pub trait TemplateEngine: Send + Sync {
    /// Renders a template string with the given data.
    ///
    /// This compiles and renders the template in one step. For repeated
    /// rendering of the same template, use [`add_template`](Self::add_template)
    /// and [`render_named`](Self::render_named).
    fn render_template(&self, template: &str, data: &serde_json::Value) -> Result<String, RenderError>;

    /// Adds a named template to the engine.
    ///
    /// The template is compiled and cached for later use via [`render_named`](Self::render_named).
    fn add_template(&mut self, name: &str, source: &str) -> Result<(), RenderError>;

    /// Renders a previously registered template.
    fn render_named(&self, name: &str, data: &serde_json::Value) -> Result<String, RenderError>;

    /// Checks if a template with the given name exists.
    fn has_template(&self, name: &str) -> bool;
}

/// MiniJinja-based template engine.
///
/// The environment is tuned for code generation:
/// - auto-escaping is off for every template name
/// - `trim_blocks` and `lstrip_blocks` keep block tags from leaving blank lines
/// - trailing newlines are kept so rendered fragments end on a line boundary
///
/// # Example
///
/// ```rust
/// use cldrjs_render::{MiniJinjaEngine, TemplateEngine};
/// use serde_json::json;
///
/// let engine = MiniJinjaEngine::new();
/// let output = engine
///     .render_template("var n = {{ n }};", &json!({ "n": 3 }))
///     .unwrap();
/// assert_eq!(output, "var n = 3;");
/// ```
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Creates a new engine with the `tojs` filter registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        register_filters(&mut env);
        Self { env }
    }

    /// Creates an engine preloaded with every template in `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::TemplateError`] if any template fails to compile.
    pub fn from_registry(registry: &TemplateRegistry) -> Result<Self, RenderError> {
        let mut engine = Self::new();
        for (name, source) in registry.entries() {
            engine.add_template(name, source)?;
        }
        Ok(engine)
    }

    /// Returns a reference to the underlying MiniJinja environment.
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// Returns a mutable reference to the underlying MiniJinja environment.
    ///
    /// This allows registering extra filters or functions.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MiniJinjaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiniJinjaEngine").finish_non_exhaustive()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render_template(&self, template: &str, data: &serde_json::Value) -> Result<String, RenderError> {
        let value = Value::from_serialize(data);
        Ok(self.env.render_str(template, value)?)
    }

    fn add_template(&mut self, name: &str, source: &str) -> Result<(), RenderError> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())?;
        Ok(())
    }

    fn render_named(&self, name: &str, data: &serde_json::Value) -> Result<String, RenderError> {
        let tmpl = self.env.get_template(name)?;
        let value = Value::from_serialize(data);
        Ok(tmpl.render(value)?)
    }

    fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }
}

/// Registers the code-generation filter with a MiniJinja environment.
///
/// `tojs` serializes any value to a JSON literal, which is also a valid script
/// literal. Map entries keep their insertion order.
///
/// This is called automatically by [`MiniJinjaEngine::new`].
pub fn register_filters(env: &mut Environment<'static>) {
    use minijinja::{Error, ErrorKind};

    env.add_filter("tojs", |value: Value| -> Result<String, Error> {
        serde_json::to_string(&value)
            .map_err(|e| Error::new(ErrorKind::BadSerialization, e.to_string()))
    });
}
