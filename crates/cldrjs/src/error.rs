//! Error types for the bundle compiler.

use thiserror::Error;

use cldrjs_render::RenderError;

use crate::locale::LocaleTag;

/// Errors that abort a bundle compilation.
///
/// Every variant is a hard failure of the enclosing
/// [`Compiler::compile_bundle`](crate::Compiler::compile_bundle) call; no
/// partial [`CompiledFile`](crate::CompiledFile) is ever returned alongside one.
/// Unknown feature keys are not errors: they are skipped during assembly.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A renderer unit needed a data category the locale does not provide.
    #[error("no `{category}` data for locale `{locale}`")]
    MissingLocaleData { locale: LocaleTag, category: String },

    /// A fragment or bundle template failed to render.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// The composed bundle source was rejected by the script compiler.
    #[error(transparent)]
    SourceCompile(#[from] SourceCompileError),

    /// The minifier rejected the compiled source.
    #[error(transparent)]
    Minify(#[from] MinifyError),

    /// A configuration or locale data document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),
}

/// Malformed composite source, reported at a 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at line {line}, column {column}: {message}")]
pub struct SourceCompileError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl SourceCompileError {
    /// Builds an error for the byte `offset` of `source`.
    pub fn at_offset(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Source the minifier could not process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("minify error at offset {offset}: {message}")]
pub struct MinifyError {
    pub offset: usize,
    pub message: String,
}

/// Result type for compiler operations.
pub type Result<T, E = CompileError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_compile_error_position() {
        let source = "var a = 1;\nvar b = (2;\n";
        let offset = source.find('(').unwrap();
        let err = SourceCompileError::at_offset(source, offset, "unclosed `(`");
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 9);
        assert_eq!(
            err.to_string(),
            "syntax error at line 2, column 9: unclosed `(`"
        );
    }

    #[test]
    fn test_source_compile_error_counts_chars_not_bytes() {
        let source = "var é = (";
        let err = SourceCompileError::at_offset(source, source.len() - 1, "unclosed `(`");
        assert_eq!((err.line, err.column), (1, 9));
    }

    #[test]
    fn test_missing_locale_data_display() {
        let err = CompileError::MissingLocaleData {
            locale: LocaleTag::new("fr"),
            category: "plurals".into(),
        };
        assert_eq!(err.to_string(), "no `plurals` data for locale `fr`");
    }

    #[test]
    fn test_minify_error_converts() {
        let err: CompileError = MinifyError {
            offset: 4,
            message: "unterminated string literal".into(),
        }
        .into();
        assert!(matches!(err, CompileError::Minify(_)));
        assert!(err.to_string().contains("offset 4"));
    }
}
