//! Bundles: ordered fragment containers and their outer template.
//!
//! A [`Bundle`] starts empty, tagged with a kind, an optional locale and the
//! source-map flag. [`Bundle::assemble`] appends one fragment per selected
//! feature, in selection order, and [`Bundle::render`] stitches the fragments
//! into the kind's outer template to produce one script.

use std::fmt;

use log::debug;
use serde_json::json;

use cldrjs_render::TemplateEngine;

use crate::error::Result;
use crate::features::{FeatureKey, RenderEnv, RendererRegistry};
use crate::locale::LocaleTag;

/// Version stamped into every rendered bundle.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Which outer template a bundle renders through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BundleKind {
    /// The deliverable library, one per locale.
    Implementation,
    /// Test-support helpers, locale independent.
    Test,
}

impl BundleKind {
    pub fn template_name(self) -> &'static str {
        match self {
            BundleKind::Implementation => "bundle",
            BundleKind::Test => "test_bundle",
        }
    }
}

impl fmt::Display for BundleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BundleKind::Implementation => f.write_str("implementation"),
            BundleKind::Test => f.write_str("test"),
        }
    }
}

/// One rendered slot of a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub key: FeatureKey,
    pub text: String,
}

/// An ordered accumulation of rendered fragments plus bundle metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    kind: BundleKind,
    locale: Option<LocaleTag>,
    source_map: bool,
    fragments: Vec<Fragment>,
}

impl Bundle {
    /// Creates an empty, locale-independent bundle without a source map.
    pub fn new(kind: BundleKind) -> Self {
        Self {
            kind,
            locale: None,
            source_map: false,
            fragments: Vec::new(),
        }
    }

    pub fn implementation() -> Self {
        Self::new(BundleKind::Implementation)
    }

    pub fn test() -> Self {
        Self::new(BundleKind::Test)
    }

    pub fn with_locale(mut self, locale: impl Into<LocaleTag>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_source_map(mut self, requested: bool) -> Self {
        self.source_map = requested;
        self
    }

    pub fn kind(&self) -> BundleKind {
        self.kind
    }

    pub fn locale(&self) -> Option<&LocaleTag> {
        self.locale.as_ref()
    }

    pub fn source_map_requested(&self) -> bool {
        self.source_map
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Keys of the fragments rendered so far, in slot order.
    pub fn feature_keys(&self) -> impl Iterator<Item = &FeatureKey> {
        self.fragments.iter().map(|fragment| &fragment.key)
    }

    /// All fragment text concatenated in slot order.
    pub fn contents(&self) -> String {
        self.fragments
            .iter()
            .map(|fragment| fragment.text.as_str())
            .collect()
    }

    /// Name the compiled script is published under, used for source maps.
    pub fn source_name(&self) -> String {
        match (self.kind, &self.locale) {
            (BundleKind::Implementation, Some(locale)) => format!("twitter_cldr_{}", locale),
            (BundleKind::Implementation, None) => "twitter_cldr".to_string(),
            (BundleKind::Test, _) => "twitter_cldr_test_helpers".to_string(),
        }
    }

    /// Renders each selected feature into a new slot.
    ///
    /// Keys are visited in the given order. Keys the registry does not know
    /// are skipped; duplicates render twice.
    ///
    /// # Errors
    ///
    /// Propagates the first unit failure, typically
    /// [`CompileError::MissingLocaleData`](crate::CompileError::MissingLocaleData).
    pub fn assemble<'k, I>(
        &mut self,
        selection: I,
        registry: &RendererRegistry,
        env: &RenderEnv<'_>,
    ) -> Result<()>
    where
        I: IntoIterator<Item = &'k FeatureKey>,
    {
        let locale = self.locale.clone();
        let config = env.for_locale(locale.as_ref());
        for key in selection {
            let Some(unit) = registry.lookup(key.as_str()) else {
                debug!("skipping unknown feature `{}` in {} bundle", key, self.kind);
                continue;
            };
            let text = unit(&config)?;
            self.fragments.push(Fragment {
                key: key.clone(),
                text,
            });
        }
        Ok(())
    }

    /// Renders the bundle's outer template around its contents.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Render`](crate::CompileError::Render) if the
    /// outer template is missing or fails.
    pub fn render(&self, engine: &dyn TemplateEngine) -> Result<String> {
        let features: Vec<&str> = self.feature_keys().map(FeatureKey::as_str).collect();
        let context = json!({
            "version": VERSION,
            "locale": self.locale.as_ref().map(LocaleTag::as_str),
            "features": features,
            "contents": self.contents(),
            "source_map": self.source_map,
            "source_name": self.source_name(),
        });
        Ok(engine.render_named(self.kind.template_name(), &context)?)
    }
}
