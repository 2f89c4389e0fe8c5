//! Locale tags and the locale data store.
//!
//! The compiler only reads locale data: renderer units ask the store for one
//! data category of one locale (`plurals`, `numbers`, ...) and embed what they
//! get back. [`LocaleStore`] is that read-only contract; [`MemoryLocaleStore`]
//! is the in-memory implementation, usually loaded from YAML.
//!
//! # Document Format
//!
//! ```yaml
//! locales:
//!   en:
//!     plurals:
//!       one: "n == 1"
//!     lists:
//!       two: "{0} and {1}"
//! external_tags:
//!   zh-Hant: zh-tw
//! ```
//!
//! Locales keep document order, which is also the order
//! [`LocaleStore::supported_locales`] reports them in.

use std::borrow::Borrow;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Identifier selecting which locale's data a render pass embeds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleTag(String);

impl LocaleTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocaleTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for LocaleTag {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

impl Borrow<str> for LocaleTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Internal locale tags whose externally published tag is not simply the
/// lowercased internal tag.
pub const DEFAULT_EXTERNAL_TAGS: &[(&str, &str)] = &[
    ("zh", "zh-cn"),
    ("zh-Hant", "zh-tw"),
    ("ms", "msa"),
    ("nb", "no"),
    ("en-GB", "en-gb"),
];

/// Read-only access to locale data.
pub trait LocaleStore: Send + Sync {
    /// Returns the data for one category of one locale, if present.
    fn get(&self, locale: &LocaleTag, category: &str) -> Option<&serde_json::Value>;

    /// Returns every locale the store has data for, in a stable order.
    fn supported_locales(&self) -> Vec<LocaleTag>;

    /// Maps an internal locale tag to the tag used when publishing output
    /// for that locale.
    fn external_tag(&self, locale: &LocaleTag) -> String;
}

/// In-memory [`LocaleStore`].
///
/// # Example
///
/// ```rust
/// use cldrjs::{LocaleStore, LocaleTag, MemoryLocaleStore};
/// use serde_json::json;
///
/// let store = MemoryLocaleStore::new()
///     .with("en", "plurals", json!({ "one": "n == 1" }))
///     .with("zh-Hant", "plurals", json!({}));
///
/// assert_eq!(store.supported_locales(), vec![LocaleTag::new("en"), LocaleTag::new("zh-Hant")]);
/// assert_eq!(store.external_tag(&LocaleTag::new("zh-Hant")), "zh-tw");
/// assert!(store.get(&LocaleTag::new("en"), "numbers").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemoryLocaleStore {
    locales: IndexMap<LocaleTag, IndexMap<String, serde_json::Value>>,
    external_tags: IndexMap<LocaleTag, String>,
}

impl MemoryLocaleStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a store from a YAML document (see the module docs for the shape).
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Config`](crate::CompileError::Config) if the
    /// document is not valid YAML or does not match the expected shape.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Inserts (or replaces) one category of one locale.
    pub fn insert(
        &mut self,
        locale: impl Into<LocaleTag>,
        category: impl Into<String>,
        data: serde_json::Value,
    ) {
        self.locales
            .entry(locale.into())
            .or_default()
            .insert(category.into(), data);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(
        mut self,
        locale: impl Into<LocaleTag>,
        category: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        self.insert(locale, category, data);
        self
    }

    /// Overrides the external tag for a locale.
    pub fn with_external_tag(mut self, locale: impl Into<LocaleTag>, tag: impl Into<String>) -> Self {
        self.external_tags.insert(locale.into(), tag.into());
        self
    }

    /// Returns the categories present for a locale.
    pub fn categories(&self, locale: &LocaleTag) -> impl Iterator<Item = &str> {
        self.locales
            .get(locale)
            .into_iter()
            .flat_map(|categories| categories.keys().map(String::as_str))
    }
}

impl LocaleStore for MemoryLocaleStore {
    fn get(&self, locale: &LocaleTag, category: &str) -> Option<&serde_json::Value> {
        self.locales.get(locale)?.get(category)
    }

    fn supported_locales(&self) -> Vec<LocaleTag> {
        self.locales.keys().cloned().collect()
    }

    fn external_tag(&self, locale: &LocaleTag) -> String {
        if let Some(tag) = self.external_tags.get(locale) {
            return tag.clone();
        }
        DEFAULT_EXTERNAL_TAGS
            .iter()
            .find(|(internal, _)| *internal == locale.as_str())
            .map(|(_, external)| (*external).to_string())
            .unwrap_or_else(|| locale.as_str().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const YAML: &str = r#"
locales:
  en:
    plurals:
      one: "n == 1"
    lists:
      two: "{0} and {1}"
  de:
    plurals:
      one: "n == 1"
external_tags:
  de: deu
"#;

    #[test]
    fn test_from_yaml_keeps_document_order() {
        let store = MemoryLocaleStore::from_yaml(YAML).unwrap();
        assert_eq!(
            store.supported_locales(),
            vec![LocaleTag::new("en"), LocaleTag::new("de")]
        );
        assert_eq!(
            store.get(&LocaleTag::new("en"), "lists"),
            Some(&json!({ "two": "{0} and {1}" }))
        );
        let categories: Vec<_> = store.categories(&LocaleTag::new("en")).collect();
        assert_eq!(categories, vec!["plurals", "lists"]);
    }

    #[test]
    fn test_category_content_keeps_document_order() {
        let store = MemoryLocaleStore::from_yaml(
            "locales:\n  en:\n    currencies:\n      USD: { symbol: \"$\" }\n      EUR: { symbol: \"€\" }\n      AUD: { symbol: \"A$\" }\n",
        )
        .unwrap();
        let currencies = store.get(&LocaleTag::new("en"), "currencies").unwrap();
        let codes: Vec<_> = currencies.as_object().unwrap().keys().cloned().collect();
        assert_eq!(codes, vec!["USD", "EUR", "AUD"]);
    }

    #[test]
    fn test_from_yaml_rejects_unknown_sections() {
        let result = MemoryLocaleStore::from_yaml("regions: {}\n");
        assert!(matches!(result, Err(crate::CompileError::Config(_))));
    }

    #[test]
    fn test_missing_category_and_locale() {
        let store = MemoryLocaleStore::from_yaml(YAML).unwrap();
        assert!(store.get(&LocaleTag::new("de"), "lists").is_none());
        assert!(store.get(&LocaleTag::new("fr"), "plurals").is_none());
    }

    #[test]
    fn test_external_tag_resolution_order() {
        let store = MemoryLocaleStore::from_yaml(YAML)
            .unwrap()
            .with_external_tag("zh", "zh-hans");

        // explicit entries first
        assert_eq!(store.external_tag(&LocaleTag::new("de")), "deu");
        assert_eq!(store.external_tag(&LocaleTag::new("zh")), "zh-hans");
        // then the built-in alias table
        assert_eq!(store.external_tag(&LocaleTag::new("nb")), "no");
        assert_eq!(store.external_tag(&LocaleTag::new("en-GB")), "en-gb");
        // then lowercase
        assert_eq!(store.external_tag(&LocaleTag::new("pt-BR")), "pt-br");
    }

    #[test]
    fn test_insert_replaces_category() {
        let mut store = MemoryLocaleStore::new();
        store.insert("en", "numbers", json!({ "decimal": "," }));
        store.insert("en", "numbers", json!({ "decimal": "." }));
        assert_eq!(
            store.get(&LocaleTag::new("en"), "numbers"),
            Some(&json!({ "decimal": "." }))
        );
    }
}
