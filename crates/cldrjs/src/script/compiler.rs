//! The script compile stage.

use log::trace;

use super::scanner::{scan, SegmentKind};
use super::source_map::SourceMap;
use crate::error::SourceCompileError;

const WRAPPER_HEAD: &str = "(function() {\n";
const WRAPPER_TAIL: &str = "}).call(this);\n";

/// Switches for one compile call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileRequest<'a> {
    /// Emit the code without the top-level function wrapper.
    pub bare: bool,
    /// Produce a source map alongside the code.
    pub source_map: bool,
    /// Name recorded in the source map.
    pub source_name: &'a str,
}

/// What a [`ScriptCompiler`] hands back: plain code, or code plus its map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutput {
    Code(String),
    Mapped { code: String, map: String },
}

impl CompileOutput {
    pub fn code(&self) -> &str {
        match self {
            CompileOutput::Code(code) | CompileOutput::Mapped { code, .. } => code,
        }
    }
}

/// Turns a composed bundle into target script.
///
/// Implementations return [`CompileOutput::Mapped`] when, and only when,
/// `request.source_map` is set.
pub trait ScriptCompiler: Send + Sync {
    fn compile(
        &self,
        source: &str,
        request: &CompileRequest<'_>,
    ) -> Result<CompileOutput, SourceCompileError>;
}

/// Validating compiler that wraps the bundle in a function scope.
///
/// The source is scanned for unterminated literals and comments and for
/// unbalanced `()`, `[]` and `{}` outside literals. Valid source is returned
/// unchanged inside `(function() { ... }).call(this);`, so every source line
/// lands on a known generated line and the map is line for line.
#[derive(Debug, Clone, Copy, Default)]
pub struct WrapCompiler;

impl WrapCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptCompiler for WrapCompiler {
    fn compile(
        &self,
        source: &str,
        request: &CompileRequest<'_>,
    ) -> Result<CompileOutput, SourceCompileError> {
        check_delimiters(source)?;

        let mut code = String::with_capacity(source.len() + WRAPPER_HEAD.len() + WRAPPER_TAIL.len());
        if !request.bare {
            code.push_str(WRAPPER_HEAD);
        }
        code.push_str(source);
        if !source.is_empty() && !source.ends_with('\n') {
            code.push('\n');
        }
        if !request.bare {
            code.push_str(WRAPPER_TAIL);
        }
        trace!("compiled {} ({} bytes)", request.source_name, code.len());

        if !request.source_map {
            return Ok(CompileOutput::Code(code));
        }
        let leading = if request.bare { 0 } else { 1 };
        let map = SourceMap::line_for_line(request.source_name, source, leading)
            .to_json()
            .map_err(|e| SourceCompileError::at_offset(source, 0, e.to_string()))?;
        Ok(CompileOutput::Mapped { code, map })
    }
}

fn check_delimiters(source: &str) -> Result<(), SourceCompileError> {
    let segments = scan(source)
        .map_err(|e| SourceCompileError::at_offset(source, e.offset, e.to_string()))?;

    let mut open: Vec<(u8, usize)> = Vec::new();
    for segment in segments.iter().filter(|s| s.kind == SegmentKind::Code) {
        for (i, b) in segment.text.bytes().enumerate() {
            let offset = segment.start + i;
            match b {
                b'(' | b'[' | b'{' => open.push((b, offset)),
                b')' | b']' | b'}' => {
                    let expected = match b {
                        b')' => b'(',
                        b']' => b'[',
                        _ => b'{',
                    };
                    match open.pop() {
                        Some((opener, _)) if opener == expected => {}
                        _ => {
                            return Err(SourceCompileError::at_offset(
                                source,
                                offset,
                                format!("unexpected `{}`", b as char),
                            ))
                        }
                    }
                }
                _ => {}
            }
        }
    }

    match open.pop() {
        Some((opener, offset)) => Err(SourceCompileError::at_offset(
            source,
            offset,
            format!("unclosed `{}`", opener as char),
        )),
        None => Ok(()),
    }
}
