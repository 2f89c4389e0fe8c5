//! Rendering errors.
//!
//! [`RenderError`] is what every engine and registry call returns. MiniJinja
//! errors are classified into it by kind, so callers never match on engine
//! internals.

use std::fmt;

use crate::registry::RegistryError;

/// A template could not be found, parsed or rendered.
#[derive(Debug)]
pub enum RenderError {
    /// Syntax error, or a reference to an unknown filter, test or variable.
    TemplateError(String),

    /// No template is registered under the requested name.
    TemplateNotFound(String),

    /// A context value could not be serialized into a script literal.
    SerializationError(String),

    /// Any other engine failure.
    OperationError(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::TemplateError(msg) => write!(f, "template error: {}", msg),
            RenderError::TemplateNotFound(name) => write!(f, "template not found: {}", name),
            RenderError::SerializationError(msg) => write!(f, "serialization error: {}", msg),
            RenderError::OperationError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::SerializationError(err.to_string())
    }
}

impl From<RegistryError> for RenderError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound { name } => RenderError::TemplateNotFound(name),
        }
    }
}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        use minijinja::ErrorKind;

        match err.kind() {
            ErrorKind::TemplateNotFound => RenderError::TemplateNotFound(err.to_string()),
            ErrorKind::SyntaxError
            | ErrorKind::BadEscape
            | ErrorKind::UndefinedError
            | ErrorKind::UnknownTest
            | ErrorKind::UnknownFunction
            | ErrorKind::UnknownFilter
            | ErrorKind::UnknownMethod => RenderError::TemplateError(err.to_string()),
            ErrorKind::BadSerialization => RenderError::SerializationError(err.to_string()),
            _ => RenderError::OperationError(err.to_string()),
        }
    }
}
