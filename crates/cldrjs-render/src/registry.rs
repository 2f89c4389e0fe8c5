//! Template registry for embedded and inline templates.
//!
//! This module provides [`TemplateRegistry`], which resolves template names to
//! their source text. Templates usually arrive as compile-time embedded entries
//! (`include_str!` tables), with inline templates layered on top.
//!
//! # Template Resolution
//!
//! 1. Inline templates (added via [`TemplateRegistry::add_inline`]) have highest priority
//! 2. Embedded templates are checked next
//! 3. Names can be specified with or without extension: both `"bundle"` and
//!    `"bundle.jinja"` resolve
//!
//! # Supported Extensions
//!
//! | Priority | Extension | Description |
//! |----------|-----------|-------------|
//! | 1 (highest) | `.jinja` | Standard Jinja extension |
//! | 2 | `.jinja2` | Full Jinja2 extension |
//! | 3 (lowest) | `.j2` | Short Jinja2 extension |
//!
//! If multiple entries share a base name with different extensions
//! (e.g., `bundle.jinja` and `bundle.j2`), the higher-priority extension wins
//! for the extensionless name. Both remain reachable by full name.

use std::collections::{BTreeMap, HashSet};

/// Recognized template file extensions in priority order.
pub const TEMPLATE_EXTENSIONS: &[&str] = &[".jinja", ".jinja2", ".j2"];

/// Error type for template registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Template not found in registry.
    NotFound {
        /// The name that was requested
        name: String,
    },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::NotFound { name } => {
                write!(f, "Template not found: \"{}\"", name)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Returns the extension priority for a name (lower = higher priority).
///
/// Returns `usize::MAX` if no extension in `extensions` matches.
///
/// ```rust
/// use cldrjs_render::extension_priority;
///
/// assert_eq!(extension_priority("bundle.jinja", &[".jinja", ".j2"]), 0);
/// assert_eq!(extension_priority("bundle.j2", &[".jinja", ".j2"]), 1);
/// assert_eq!(extension_priority("bundle.txt", &[".jinja", ".j2"]), usize::MAX);
/// ```
pub fn extension_priority(name: &str, extensions: &[&str]) -> usize {
    for (i, ext) in extensions.iter().enumerate() {
        if name.ends_with(ext) {
            return i;
        }
    }
    usize::MAX
}

/// Strips a recognized extension from a name.
///
/// ```rust
/// use cldrjs_render::strip_extension;
///
/// assert_eq!(strip_extension("fragments/range.jinja", &[".jinja"]), "fragments/range");
/// assert_eq!(strip_extension("README", &[".jinja"]), "README");
/// ```
pub fn strip_extension(name: &str, extensions: &[&str]) -> String {
    for ext in extensions {
        if let Some(base) = name.strip_suffix(ext) {
            return base.to_string();
        }
    }
    name.to_string()
}

/// Registry for template resolution from inline and embedded sources.
///
/// Names are kept in sorted maps so iteration order (and therefore engine
/// loading order) is stable between runs.
///
/// # Example
///
/// ```rust
/// use cldrjs_render::TemplateRegistry;
///
/// let entries: &[(&str, &str)] = &[
///     ("bundle.jinja", "{{ contents }}"),
///     ("fragments/range.jinja", "var Range = {};"),
/// ];
///
/// let mut registry = TemplateRegistry::from_embedded_entries(entries);
/// registry.add_inline("bundle", "/* override */ {{ contents }}");
///
/// assert_eq!(registry.get("bundle").unwrap(), "/* override */ {{ contents }}");
/// assert_eq!(registry.get("fragments/range.jinja").unwrap(), "var Range = {};");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    /// Inline templates (highest priority).
    inline: BTreeMap<String, String>,

    /// Embedded templates, registered under base name and full name.
    embedded: BTreeMap<String, String>,
}

impl TemplateRegistry {
    /// Creates an empty template registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry from embedded template entries.
    ///
    /// Each entry is a `(name_with_ext, content)` pair, typically built from an
    /// `include_str!` table. Processing:
    ///
    /// 1. Extension stripping: `"fragments/range.jinja"` → `"fragments/range"`
    /// 2. Extension priority: when several entries share a base name, the
    ///    higher-priority extension wins (see [`TEMPLATE_EXTENSIONS`])
    /// 3. Dual registration: each template is reachable by base name and by
    ///    full name with extension
    pub fn from_embedded_entries(entries: &[(&str, &str)]) -> Self {
        let mut registry = Self::new();

        // Sort by extension priority so higher-priority extensions are processed first
        let mut sorted: Vec<_> = entries.iter().collect();
        sorted.sort_by_key(|(name, _)| extension_priority(name, TEMPLATE_EXTENSIONS));

        let mut seen_base_names = HashSet::new();
        for (name_with_ext, content) in sorted {
            let base_name = strip_extension(name_with_ext, TEMPLATE_EXTENSIONS);
            registry
                .embedded
                .insert((*name_with_ext).to_string(), (*content).to_string());
            if seen_base_names.insert(base_name.clone()) {
                registry.embedded.insert(base_name, (*content).to_string());
            }
        }

        registry
    }

    /// Adds an inline template with the given name.
    ///
    /// Inline templates shadow embedded templates with the same name.
    pub fn add_inline(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.inline.insert(name.into(), content.into());
    }

    /// Looks up a template's source by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the template doesn't exist.
    pub fn get(&self, name: &str) -> Result<&str, RegistryError> {
        self.inline
            .get(name)
            .or_else(|| self.embedded.get(name))
            .map(String::as_str)
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
            })
    }

    /// Returns every resolvable `(name, source)` pair, inline entries
    /// replacing embedded entries of the same name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.embedded
            .iter()
            .filter(|(name, _)| !self.inline.contains_key(*name))
            .chain(self.inline.iter())
            .map(|(name, source)| (name.as_str(), source.as_str()))
    }

    /// Returns the number of resolvable names.
    ///
    /// This counts both extensionless and with-extension entries.
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    /// Returns true if no templates are registered.
    pub fn is_empty(&self) -> bool {
        self.inline.is_empty() && self.embedded.is_empty()
    }

    /// Returns an iterator over all resolvable template names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries().map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_add_inline() {
        let mut registry = TemplateRegistry::new();
        registry.add_inline("header", "/* {{ title }} */");

        assert_eq!(registry.get("header").unwrap(), "/* {{ title }} */");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_not_found() {
        let registry = TemplateRegistry::new();
        let err = registry.get("missing").unwrap_err();
        assert_eq!(
            err,
            RegistryError::NotFound {
                name: "missing".into()
            }
        );
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_embedded_dual_registration() {
        let registry =
            TemplateRegistry::from_embedded_entries(&[("fragments/token.jinja", "var Token;")]);

        assert_eq!(registry.get("fragments/token").unwrap(), "var Token;");
        assert_eq!(registry.get("fragments/token.jinja").unwrap(), "var Token;");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_embedded_extension_priority() {
        // Listed lowest-priority first to prove sorting happens
        let registry = TemplateRegistry::from_embedded_entries(&[
            ("bundle.j2", "from j2"),
            ("bundle.jinja", "from jinja"),
        ]);

        assert_eq!(registry.get("bundle").unwrap(), "from jinja");
        assert_eq!(registry.get("bundle.j2").unwrap(), "from j2");
    }

    #[test]
    fn test_inline_shadows_embedded() {
        let mut registry = TemplateRegistry::from_embedded_entries(&[("bundle.jinja", "embedded")]);
        registry.add_inline("bundle", "inline");

        assert_eq!(registry.get("bundle").unwrap(), "inline");
        let bundle_entries: Vec<_> = registry.entries().filter(|(n, _)| *n == "bundle").collect();
        assert_eq!(bundle_entries, vec![("bundle", "inline")]);
    }

    #[test]
    fn test_names_are_sorted_within_source() {
        let registry =
            TemplateRegistry::from_embedded_entries(&[("b.jinja", "b"), ("a.jinja", "a")]);
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["a", "a.jinja", "b", "b.jinja"]);
    }
}
