//! Compiler configuration.
//!
//! [`CompilerConfig`] fixes everything about a [`Compiler`](crate::Compiler)
//! that does not change between calls: which locales and features to build
//! and how. [`CompileOptions`] carries the per-call switches.
//!
//! Configuration can be built fluently or read from YAML:
//!
//! ```yaml
//! locales: [en, de]
//! features: [plural_rules, lists]
//! prerender: false
//! source_map: true
//! ```
//!
//! Absent lists mean "everything": all locales the store supports, all
//! registered implementation features, all registered test helpers.

use serde::Deserialize;

use crate::error::Result;
use crate::features::FeatureKey;
use crate::locale::LocaleTag;

/// Construction-time settings for a [`Compiler`](crate::Compiler).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Locales to compile. `None` compiles every supported locale.
    pub locales: Option<Vec<LocaleTag>>,
    /// Implementation features to include, in order.
    pub features: Option<Vec<FeatureKey>>,
    /// Test helpers to include, in order.
    pub test_helpers: Option<Vec<FeatureKey>>,
    /// Inline locale data at the point of use.
    pub prerender: bool,
    /// Ask the script compiler for a source map.
    pub source_map: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            locales: None,
            features: None,
            test_helpers: None,
            prerender: true,
            source_map: false,
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Config`](crate::CompileError::Config) on invalid
    /// YAML or unknown keys.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn with_locales<I, T>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<LocaleTag>,
    {
        self.locales = Some(locales.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_features<I, T>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<FeatureKey>,
    {
        self.features = Some(features.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_test_helpers<I, T>(mut self, helpers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<FeatureKey>,
    {
        self.test_helpers = Some(helpers.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_prerender(mut self, prerender: bool) -> Self {
        self.prerender = prerender;
        self
    }

    pub fn with_source_map(mut self, source_map: bool) -> Self {
        self.source_map = source_map;
        self
    }
}

/// Per-call switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Run the minifier after module-definition substitution.
    pub minify: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { minify: true }
    }
}

impl CompileOptions {
    pub fn minified() -> Self {
        Self { minify: true }
    }

    pub fn unminified() -> Self {
        Self { minify: false }
    }
}
