//! Feature keys, renderer units and the registries that map one to the other.
//!
//! A renderer unit is a plain function: given a [`RenderConfig`] (locale,
//! prerender flag and the collaborators it may consult) it returns one source
//! fragment. Registries are immutable, ordered tables from [`FeatureKey`] to
//! unit; registration order is the default feature selection order.
//!
//! Looking up a key the registry does not contain yields `None`. Bundle
//! assembly treats that as "omit this feature", never as an error.

mod catalog;

use std::borrow::{Borrow, Cow};
use std::fmt;

use indexmap::IndexMap;
use log::trace;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use cldrjs_render::TemplateEngine;

use crate::error::{CompileError, Result};
use crate::locale::{LocaleStore, LocaleTag};

pub use catalog::{implementation_renderers, test_helper_renderers};

/// Symbolic name of one renderer, unique within a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureKey(Cow<'static, str>);

impl FeatureKey {
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    pub fn new(key: impl Into<String>) -> Self {
        Self(Cow::Owned(key.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeatureKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for FeatureKey {
    fn from(key: String) -> Self {
        Self(Cow::Owned(key))
    }
}

impl Borrow<str> for FeatureKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Collaborators shared by every unit rendered for one bundle.
#[derive(Clone, Copy)]
pub struct RenderEnv<'a> {
    pub engine: &'a dyn TemplateEngine,
    pub store: &'a dyn LocaleStore,
    pub prerender: bool,
}

impl<'a> RenderEnv<'a> {
    /// Binds the environment to one locale (or to none).
    pub fn for_locale<'b>(&self, locale: Option<&'b LocaleTag>) -> RenderConfig<'b>
    where
        'a: 'b,
    {
        RenderConfig {
            locale,
            prerender: self.prerender,
            engine: self.engine,
            store: self.store,
        }
    }
}

/// Everything a renderer unit sees for one render call.
///
/// `locale: None` asks for locale-independent output: data-bound units then
/// embed every supported locale that has their category. `prerender` inlines
/// data at the point of use instead of registering it for a runtime lookup;
/// both forms behave the same once loaded.
#[derive(Clone, Copy)]
pub struct RenderConfig<'a> {
    pub locale: Option<&'a LocaleTag>,
    pub prerender: bool,
    pub engine: &'a dyn TemplateEngine,
    pub store: &'a dyn LocaleStore,
}

impl fmt::Debug for RenderConfig<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderConfig")
            .field("locale", &self.locale)
            .field("prerender", &self.prerender)
            .finish_non_exhaustive()
    }
}

/// A renderer unit.
pub type RenderFn = fn(&RenderConfig<'_>) -> Result<String>;

/// Immutable, ordered mapping from feature key to renderer unit.
///
/// # Example
///
/// ```rust
/// use cldrjs::{RenderConfig, RendererRegistry};
///
/// fn noop(_: &RenderConfig<'_>) -> cldrjs::Result<String> {
///     Ok(String::new())
/// }
///
/// let registry = RendererRegistry::builder()
///     .register("range", noop)
///     .register("token", noop)
///     .build();
///
/// assert!(registry.lookup("range").is_some());
/// assert!(registry.lookup("bogus").is_none());
/// let keys: Vec<_> = registry.keys().map(|k| k.as_str()).collect();
/// assert_eq!(keys, vec!["range", "token"]);
/// ```
#[derive(Clone, Default)]
pub struct RendererRegistry {
    entries: IndexMap<FeatureKey, RenderFn>,
}

impl RendererRegistry {
    /// Starts building a registry.
    pub fn builder() -> RendererRegistryBuilder {
        RendererRegistryBuilder::default()
    }

    /// Returns the unit registered for `key`, if any.
    pub fn lookup(&self, key: &str) -> Option<RenderFn> {
        self.entries.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &FeatureKey> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

/// Builder for [`RendererRegistry`]. Registering a key twice keeps the
/// original position and replaces the unit.
#[derive(Default)]
pub struct RendererRegistryBuilder {
    entries: IndexMap<FeatureKey, RenderFn>,
}

impl RendererRegistryBuilder {
    pub fn register(mut self, key: impl Into<FeatureKey>, unit: RenderFn) -> Self {
        self.entries.insert(key.into(), unit);
        self
    }

    pub fn build(self) -> RendererRegistry {
        RendererRegistry {
            entries: self.entries,
        }
    }
}

/// Which locale data a renderer unit embeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DataBinding<'c> {
    /// Pure code, no locale data.
    Code,
    /// `category` for the bundle locale, or for every supported locale that
    /// has it when the bundle is locale-independent.
    Locale(&'c str),
    /// `category` for every supported locale that has it, even inside a
    /// per-locale bundle.
    AllLocales(&'c str),
}

impl<'c> DataBinding<'c> {
    fn category(self) -> Option<&'c str> {
        match self {
            DataBinding::Code => None,
            DataBinding::Locale(category) | DataBinding::AllLocales(category) => Some(category),
        }
    }
}

/// Renders `template` for `feature` with the locale data `binding` selects.
///
/// The template context is:
///
/// | Key | Value |
/// |-----|-------|
/// | `feature` | the feature key |
/// | `locale` | the locale tag, or `none` |
/// | `prerender` | the prerender flag |
/// | `category` | the data category, or `none` |
/// | `resources` | map of locale tag to category data, in locale order |
///
/// # Errors
///
/// Returns [`CompileError::MissingLocaleData`] if a [`DataBinding::Locale`]
/// unit renders for a locale that has no data for its category.
pub(crate) fn render_fragment(
    config: &RenderConfig<'_>,
    feature: &str,
    template: &str,
    binding: DataBinding<'_>,
) -> Result<String> {
    let resources = match binding {
        DataBinding::Code => Map::new(),
        DataBinding::Locale(category) => match config.locale {
            Some(locale) => locale_resources(config, locale, category)?,
            None => all_resources(config, category),
        },
        DataBinding::AllLocales(category) => all_resources(config, category),
    };
    let context = json!({
        "feature": feature,
        "locale": config.locale.map(LocaleTag::as_str),
        "prerender": config.prerender,
        "category": binding.category(),
        "resources": resources,
    });
    let fragment = config.engine.render_named(template, &context)?;
    trace!("rendered {} ({} bytes)", feature, fragment.len());
    Ok(fragment)
}

fn locale_resources(
    config: &RenderConfig<'_>,
    locale: &LocaleTag,
    category: &str,
) -> Result<Map<String, Value>> {
    let data = config
        .store
        .get(locale, category)
        .ok_or_else(|| CompileError::MissingLocaleData {
            locale: locale.clone(),
            category: category.to_string(),
        })?;
    let mut resources = Map::new();
    resources.insert(locale.to_string(), data.clone());
    Ok(resources)
}

fn all_resources(config: &RenderConfig<'_>, category: &str) -> Map<String, Value> {
    config
        .store
        .supported_locales()
        .into_iter()
        .filter_map(|locale| {
            let data = config.store.get(&locale, category)?.clone();
            Some((locale.to_string(), data))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::MemoryLocaleStore;
    use cldrjs_render::MiniJinjaEngine;

    fn engine() -> MiniJinjaEngine {
        let mut engine = MiniJinjaEngine::new();
        engine
            .add_template("fragment", "{{ feature }}|{{ locale }}|{{ prerender }}|{{ resources | tojs }}")
            .unwrap();
        engine
    }

    fn store() -> MemoryLocaleStore {
        MemoryLocaleStore::new()
            .with("en", "lists", json!({ "two": "{0} and {1}" }))
            .with("de", "lists", json!({ "two": "{0} und {1}" }))
            .with("ja", "numbers", json!({}))
    }

    fn ok_unit(_: &RenderConfig<'_>) -> Result<String> {
        Ok("ok".into())
    }

    #[test]
    fn test_feature_key_borrows_as_str() {
        let registry = RendererRegistry::builder().register("lists", ok_unit).build();
        assert!(registry.contains("lists"));
        assert_eq!(FeatureKey::from_static("lists"), FeatureKey::from("lists"));
    }

    #[test]
    fn test_registry_reregistration_keeps_position() {
        fn other(_: &RenderConfig<'_>) -> Result<String> {
            Ok("other".into())
        }
        let registry = RendererRegistry::builder()
            .register("a", ok_unit)
            .register("b", ok_unit)
            .register("a", other)
            .build();
        let keys: Vec<_> = registry.keys().map(FeatureKey::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_render_fragment_single_locale() {
        let (engine, store) = (engine(), store());
        let en = LocaleTag::new("en");
        let env = RenderEnv {
            engine: &engine,
            store: &store,
            prerender: true,
        };
        let output = render_fragment(&env.for_locale(Some(&en)), "lists", "fragment", DataBinding::Locale("lists")).unwrap();
        assert_eq!(output, r#"lists|en|true|{"en":{"two":"{0} and {1}"}}"#);
    }

    #[test]
    fn test_render_fragment_without_locale_embeds_all_that_have_data() {
        let (engine, store) = (engine(), store());
        let env = RenderEnv {
            engine: &engine,
            store: &store,
            prerender: false,
        };
        let output = render_fragment(&env.for_locale(None), "lists", "fragment", DataBinding::Locale("lists")).unwrap();
        assert!(output.starts_with("lists|none|false|"));
        assert!(output.contains(r#""de":{"two":"{0} und {1}"}"#));
        assert!(output.contains(r#""en":{"two":"{0} and {1}"}"#));
        assert!(!output.contains("\"ja\""));
    }

    #[test]
    fn test_render_fragment_missing_locale_data() {
        let (engine, store) = (engine(), store());
        let ja = LocaleTag::new("ja");
        let env = RenderEnv {
            engine: &engine,
            store: &store,
            prerender: true,
        };
        let err = render_fragment(&env.for_locale(Some(&ja)), "lists", "fragment", DataBinding::Locale("lists")).unwrap_err();
        assert!(matches!(
            err,
            CompileError::MissingLocaleData { ref locale, ref category }
                if locale.as_str() == "ja" && category == "lists"
        ));
    }

    #[test]
    fn test_render_fragment_all_locales_inside_a_locale_bundle() {
        let (engine, store) = (engine(), store());
        let en = LocaleTag::new("en");
        let env = RenderEnv {
            engine: &engine,
            store: &store,
            prerender: true,
        };
        let output = render_fragment(
            &env.for_locale(Some(&en)),
            "lists",
            "fragment",
            DataBinding::AllLocales("lists"),
        )
        .unwrap();
        assert_eq!(
            output,
            r#"lists|en|true|{"en":{"two":"{0} and {1}"},"de":{"two":"{0} und {1}"}}"#
        );
    }

    #[test]
    fn test_render_fragment_all_locales_tolerates_gaps() {
        let (engine, store) = (engine(), store());
        let fr = LocaleTag::new("fr");
        let env = RenderEnv {
            engine: &engine,
            store: &store,
            prerender: true,
        };
        let output = render_fragment(
            &env.for_locale(Some(&fr)),
            "numbers",
            "fragment",
            DataBinding::AllLocales("numbers"),
        )
        .unwrap();
        assert_eq!(output, r#"numbers|fr|true|{"ja":{}}"#);
    }

    #[test]
    fn test_render_fragment_pure_code_ignores_locale_data() {
        let (engine, store) = (engine(), store());
        let fr = LocaleTag::new("fr");
        let env = RenderEnv {
            engine: &engine,
            store: &store,
            prerender: true,
        };
        let output = render_fragment(&env.for_locale(Some(&fr)), "range", "fragment", DataBinding::Code).unwrap();
        assert_eq!(output, "range|fr|true|{}");
    }
}
