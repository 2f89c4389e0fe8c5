//! Script-level collaborators: the compile stage and the minify stage.
//!
//! Both are traits so callers can plug in a real transpiler or minifier. The
//! shipped implementations, [`WrapCompiler`] and [`Condenser`], share one
//! lexical scanner that knows where literals and comments begin and end.

mod compiler;
mod minify;
mod scanner;
mod source_map;

pub use compiler::{CompileOutput, CompileRequest, ScriptCompiler, WrapCompiler};
pub use minify::{Condenser, Minifier};
pub use source_map::{encode_vlq, SourceMap};
