//! The bundle compiler.
//!
//! [`Compiler`] ties the pieces together. For each bundle it renders the
//! selected features, stitches them into the bundle template, runs the script
//! compiler, substitutes the module-definition marker and, when asked,
//! minifies. Every stage failure aborts the whole bundle.
//!
//! # Example
//!
//! ```rust
//! use cldrjs::{CompileOptions, Compiler, CompilerConfig, MemoryLocaleStore};
//! use serde_json::json;
//!
//! let store = MemoryLocaleStore::new()
//!     .with("en", "lists", json!({ "two": "{0} and {1}", "start": "{0}, {1}", "middle": "{0}, {1}", "end": "{0}, and {1}" }));
//! let config = CompilerConfig::new().with_features(["lists"]);
//! let compiler = Compiler::new(config, store).unwrap();
//!
//! for result in compiler.compile_each(CompileOptions::unminified()) {
//!     let (file, tag) = result.unwrap();
//!     assert_eq!(tag, "en");
//!     assert!(file.source().contains("/* feature: lists */"));
//!     assert!(file.source_map().is_none());
//! }
//! ```

use log::{debug, info};
use once_cell::sync::OnceCell;

use cldrjs_render::TemplateEngine;

use crate::bundle::Bundle;
use crate::config::{CompileOptions, CompilerConfig};
use crate::error::Result;
use crate::features::{self, FeatureKey, RenderEnv, RendererRegistry};
use crate::locale::{LocaleStore, LocaleTag};
use crate::pipeline::{
    run_transforms, CompiledFile, MinifyTransform, ModuleDefSubstitution, Stage, Transform,
    HOST_COMMENT_PREFIXES,
};
use crate::script::{CompileRequest, Condenser, Minifier, ScriptCompiler, WrapCompiler};
use crate::templates;

/// File name a per-locale build is published under.
///
/// ```rust
/// assert_eq!(cldrjs::output_file_name("zh-tw", false), "twitter_cldr_zh-tw.js");
/// assert_eq!(cldrjs::output_file_name("en", true), "twitter_cldr_en.min.js");
/// ```
pub fn output_file_name(external_tag: &str, minified: bool) -> String {
    if minified {
        format!("twitter_cldr_{}.min.js", external_tag)
    } else {
        format!("twitter_cldr_{}.js", external_tag)
    }
}

/// Orchestrates bundle compilation for a fixed configuration.
pub struct Compiler {
    config: CompilerConfig,
    store: Box<dyn LocaleStore>,
    engine: Box<dyn TemplateEngine>,
    script_compiler: Box<dyn ScriptCompiler>,
    minifier: Box<dyn Minifier>,
    implementation: OnceCell<RendererRegistry>,
    test_helpers: OnceCell<RendererRegistry>,
}

impl Compiler {
    /// Creates a compiler with the embedded templates, [`WrapCompiler`] and a
    /// [`Condenser`] that keeps the module-definition comments.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Render`](crate::CompileError::Render) if an
    /// embedded template fails to parse.
    pub fn new(config: CompilerConfig, store: impl LocaleStore + 'static) -> Result<Self> {
        let minifier = HOST_COMMENT_PREFIXES
            .iter()
            .fold(Condenser::new(), |condenser, prefix| condenser.preserving(*prefix));
        Ok(Self {
            config,
            store: Box::new(store),
            engine: Box::new(templates::engine()?),
            script_compiler: Box::new(WrapCompiler::new()),
            minifier: Box::new(minifier),
            implementation: OnceCell::new(),
            test_helpers: OnceCell::new(),
        })
    }

    /// Replaces the template engine. It must provide the `bundle`,
    /// `test_bundle` and fragment templates the renderers name.
    pub fn with_engine(mut self, engine: impl TemplateEngine + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }

    pub fn with_script_compiler(mut self, compiler: impl ScriptCompiler + 'static) -> Self {
        self.script_compiler = Box::new(compiler);
        self
    }

    pub fn with_minifier(mut self, minifier: impl Minifier + 'static) -> Self {
        self.minifier = Box::new(minifier);
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn LocaleStore {
        self.store.as_ref()
    }

    /// Configured locales, or every supported locale.
    pub fn locales(&self) -> Vec<LocaleTag> {
        self.config
            .locales
            .clone()
            .unwrap_or_else(|| self.store.supported_locales())
    }

    /// Configured features, or every registered implementation feature.
    pub fn features(&self) -> Vec<FeatureKey> {
        self.config
            .features
            .clone()
            .unwrap_or_else(|| self.implementation_renderers().keys().cloned().collect())
    }

    /// Configured test helpers, or every registered test helper.
    pub fn test_helpers(&self) -> Vec<FeatureKey> {
        self.config
            .test_helpers
            .clone()
            .unwrap_or_else(|| self.test_helper_renderers().keys().cloned().collect())
    }

    pub fn implementation_renderers(&self) -> &RendererRegistry {
        self.implementation
            .get_or_init(features::implementation_renderers)
    }

    pub fn test_helper_renderers(&self) -> &RendererRegistry {
        self.test_helpers.get_or_init(features::test_helper_renderers)
    }

    /// Compiles one bundle.
    ///
    /// `selection` is rendered into `bundle` in order, resolving keys through
    /// `registry`; unknown keys are skipped. Whether a source map is requested
    /// comes from the compiler configuration, overriding any flag already on
    /// `bundle`. The map survives minification unchanged.
    ///
    /// # Errors
    ///
    /// The first failure of any stage: missing locale data, template
    /// rendering, script compilation or minification.
    pub fn compile_bundle(
        &self,
        bundle: Bundle,
        selection: &[FeatureKey],
        registry: &RendererRegistry,
        options: CompileOptions,
    ) -> Result<CompiledFile> {
        let env = RenderEnv {
            engine: self.engine.as_ref(),
            store: self.store.as_ref(),
            prerender: self.config.prerender,
        };

        debug!("stage {}", Stage::Assembling);
        let mut bundle = bundle.with_source_map(self.config.source_map);
        bundle.assemble(selection, registry, &env)?;

        debug!("stage {}", Stage::Serializing);
        let source = bundle.render(self.engine.as_ref())?;

        debug!("stage {}", Stage::Compiling);
        let source_name = bundle.source_name();
        let request = CompileRequest {
            bare: false,
            source_map: bundle.source_map_requested(),
            source_name: &source_name,
        };
        let file = CompiledFile::from(self.script_compiler.compile(&source, &request)?);

        let minify = MinifyTransform::new(self.minifier.as_ref());
        let mut transforms: Vec<&dyn Transform> = Vec::with_capacity(2);
        transforms.push(&ModuleDefSubstitution);
        if options.minify {
            transforms.push(&minify);
        }
        let file = run_transforms(file, &transforms)?;

        debug!("stage {}", Stage::Done);
        Ok(file)
    }

    /// Compiles one implementation bundle per locale, lazily.
    ///
    /// Yields `(file, external_tag)` in locale order. Each call starts over
    /// from the configuration; one locale failing does not stop the iterator.
    pub fn compile_each(
        &self,
        options: CompileOptions,
    ) -> impl Iterator<Item = Result<(CompiledFile, String)>> + '_ {
        let features = self.features();
        self.locales().into_iter().map(move |locale| {
            info!("compiling locale {} ({} features)", locale, features.len());
            let external = self.store.external_tag(&locale);
            let bundle = Bundle::implementation().with_locale(locale);
            let file = self.compile_bundle(bundle, &features, self.implementation_renderers(), options)?;
            Ok((file, external))
        })
    }

    /// Compiles every locale, aborting the run on the first failure.
    pub fn compile_all(&self, options: CompileOptions) -> Result<Vec<(CompiledFile, String)>> {
        self.compile_each(options).collect()
    }

    /// Compiles the locale-independent test-helper bundle and returns its source.
    pub fn compile_test(&self, options: CompileOptions) -> Result<String> {
        info!("compiling test helpers");
        let file = self.compile_bundle(
            Bundle::test(),
            &self.test_helpers(),
            self.test_helper_renderers(),
            options,
        )?;
        Ok(file.into_source())
    }
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
