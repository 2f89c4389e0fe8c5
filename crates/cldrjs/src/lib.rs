//! # cldrjs - Locale-Specialized Script Bundles
//!
//! `cldrjs` builds the JavaScript distribution of a CLDR formatting library:
//! one script per locale, each holding only the features you select and only
//! that locale's data, plus a locale-independent bundle of test helpers.
//!
//! ## Core Concepts
//!
//! - [`RendererRegistry`]: fixed, ordered catalog from [`FeatureKey`] to a
//!   renderer unit (a plain function producing one source fragment)
//! - [`Bundle`]: the ordered fragments of one output script plus its locale
//!   and source-map flag
//! - [`Compiler`]: assembles bundles, then runs them through the script
//!   compiler, the module-definition substitution and the optional minifier
//! - [`CompiledFile`]: the artifact, source text plus an optional source map
//!
//! Locale data comes from a [`LocaleStore`]; the script compiler and minifier
//! are the [`ScriptCompiler`] and [`Minifier`] traits, with [`WrapCompiler`]
//! and [`Condenser`] as the shipped implementations.
//!
//! ## Pipeline
//!
//! ```text
//! ASSEMBLING -> SERIALIZING -> COMPILING -> POST_SUBSTITUTING -> (MINIFYING) -> DONE
//! ```
//!
//! Unknown feature keys are skipped during assembly. Any other failure aborts
//! the bundle; no partial [`CompiledFile`] is returned. Minification rewrites
//! the source only, so a source map produced alongside a minified build still
//! describes the unminified code.
//!
//! ## Quick Start
//!
//! ```rust
//! use cldrjs::{CompileOptions, Compiler, CompilerConfig, MemoryLocaleStore};
//!
//! let store = MemoryLocaleStore::from_yaml(r#"
//! locales:
//!   en:
//!     plurals:
//!       one: "n == 1"
//! "#).unwrap();
//!
//! let config = CompilerConfig::new()
//!     .with_features(["range", "plural_rules"])
//!     .with_source_map(true);
//! let compiler = Compiler::new(config, store).unwrap();
//!
//! let builds = compiler.compile_all(CompileOptions::minified()).unwrap();
//! let (file, tag) = &builds[0];
//! assert_eq!(cldrjs::output_file_name(tag, true), "twitter_cldr_en.min.js");
//! assert!(file.source().starts_with("(function(){\n/*-module-*/"));
//! assert!(file.source_map().is_some());
//! ```

mod bundle;
mod compiler;
mod config;
mod error;
mod features;
mod locale;
mod pipeline;
pub mod script;
mod templates;

pub use bundle::{Bundle, BundleKind, Fragment, VERSION};
pub use compiler::{output_file_name, Compiler};
pub use config::{CompileOptions, CompilerConfig};
pub use error::{CompileError, MinifyError, Result, SourceCompileError};
pub use features::{
    implementation_renderers, test_helper_renderers, FeatureKey, RenderConfig, RenderEnv,
    RenderFn, RendererRegistry, RendererRegistryBuilder,
};
pub use locale::{LocaleStore, LocaleTag, MemoryLocaleStore, DEFAULT_EXTERNAL_TAGS};
pub use pipeline::{
    run_transforms, CompiledFile, MinifyTransform, ModuleDefSubstitution, Stage, Transform,
    HOST_COMMENT_PREFIXES, MODULE_DEF_REPLACEMENT,
};
pub use script::{
    CompileOutput, CompileRequest, Condenser, Minifier, ScriptCompiler, SourceMap, WrapCompiler,
};
pub use templates::TEMPLATES;
