//! Pipeline stages and the compiled artifact.
//!
//! A bundle compile moves through [`Stage`]s strictly in order. Everything
//! after the compile stage is a [`Transform`] from one [`CompiledFile`] to the
//! next; [`run_transforms`] chains them and stops at the first failure.

use std::fmt;

use log::debug;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::error::Result;
use crate::script::{CompileOutput, Minifier};

/// Block that replaces the host-integration marker.
pub const MODULE_DEF_REPLACEMENT: &str = "/*-module-*/\n/*_lib/twitter_cldr_*/";

/// Comment prefixes of [`MODULE_DEF_REPLACEMENT`]; minifiers must keep them.
pub const HOST_COMMENT_PREFIXES: &[&str] = &["-module-", "_lib/"];

static MODULE_DEF_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\*<<module_def>>\s+\*/").expect("module_def pattern is valid"));

/// The result of compiling one bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFile {
    source: String,
    source_map: Option<String>,
}

impl CompiledFile {
    pub fn new(source: impl Into<String>, source_map: Option<String>) -> Self {
        Self {
            source: source.into(),
            source_map,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The map produced by the compile stage.
    ///
    /// After minification this still describes the unminified source.
    pub fn source_map(&self) -> Option<&str> {
        self.source_map.as_deref()
    }

    pub fn into_source(self) -> String {
        self.source
    }

    pub fn into_parts(self) -> (String, Option<String>) {
        (self.source, self.source_map)
    }

    fn with_source(self, source: String) -> Self {
        Self { source, ..self }
    }
}

impl From<CompileOutput> for CompiledFile {
    fn from(output: CompileOutput) -> Self {
        match output {
            CompileOutput::Code(code) => Self::new(code, None),
            CompileOutput::Mapped { code, map } => Self::new(code, Some(map)),
        }
    }
}

/// States of one bundle compile, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Assembling,
    Serializing,
    Compiling,
    PostSubstituting,
    Minifying,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Assembling => "ASSEMBLING",
            Stage::Serializing => "SERIALIZING",
            Stage::Compiling => "COMPILING",
            Stage::PostSubstituting => "POST_SUBSTITUTING",
            Stage::Minifying => "MINIFYING",
            Stage::Done => "DONE",
        };
        f.write_str(name)
    }
}

/// A fallible step applied to a compiled file.
pub trait Transform {
    fn stage(&self) -> Stage;

    fn apply(&self, file: CompiledFile) -> Result<CompiledFile>;
}

/// Replaces every host-integration marker with [`MODULE_DEF_REPLACEMENT`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleDefSubstitution;

impl Transform for ModuleDefSubstitution {
    fn stage(&self) -> Stage {
        Stage::PostSubstituting
    }

    fn apply(&self, file: CompiledFile) -> Result<CompiledFile> {
        let source = MODULE_DEF_MARKER
            .replace_all(file.source(), NoExpand(MODULE_DEF_REPLACEMENT))
            .into_owned();
        Ok(file.with_source(source))
    }
}

/// Runs a [`Minifier`] over the source. The source map is left as is.
pub struct MinifyTransform<'a> {
    minifier: &'a dyn Minifier,
}

impl<'a> MinifyTransform<'a> {
    pub fn new(minifier: &'a dyn Minifier) -> Self {
        Self { minifier }
    }
}

impl Transform for MinifyTransform<'_> {
    fn stage(&self) -> Stage {
        Stage::Minifying
    }

    fn apply(&self, file: CompiledFile) -> Result<CompiledFile> {
        let source = self.minifier.minify(file.source())?;
        Ok(file.with_source(source))
    }
}

/// Applies `transforms` in order, stopping at the first error.
pub fn run_transforms(file: CompiledFile, transforms: &[&dyn Transform]) -> Result<CompiledFile> {
    transforms.iter().try_fold(file, |file, transform| {
        debug!("stage {}", transform.stage());
        transform.apply(file)
    })
}
