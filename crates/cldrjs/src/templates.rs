//! Templates embedded into the binary.
//!
//! Every bundle, fragment and test-helper template is compiled in with
//! `include_str!` and resolved through a [`TemplateRegistry`], so callers never
//! depend on files being present at run time.

use cldrjs_render::{MiniJinjaEngine, RenderError, TemplateRegistry};

macro_rules! embedded {
    ($($name:literal),* $(,)?) => {
        &[$(($name, include_str!(concat!("../templates/", $name)))),*]
    };
}

/// `(name_with_extension, source)` pairs for every embedded template.
pub const TEMPLATES: &[(&str, &str)] = embedded![
    "bundle.jinja",
    "test_bundle.jinja",
    "partials/resource.jinja",
    "fragments/range.jinja",
    "fragments/code_points.jinja",
    "fragments/token.jinja",
    "fragments/number_tokenizer.jinja",
    "fragments/plural_rules.jinja",
    "fragments/numbers.jinja",
    "fragments/number_data_reader.jinja",
    "fragments/rbnf.jinja",
    "fragments/currencies.jinja",
    "fragments/lists.jinja",
    "fragments/timespan.jinja",
    "fragments/datetime.jinja",
    "fragments/languages.jinja",
    "test_helpers/plural_rules.jinja",
    "test_helpers/numbers.jinja",
    "test_helpers/lists.jinja",
    "test_helpers/rbnf.jinja",
];

/// Registry over [`TEMPLATES`].
pub fn registry() -> TemplateRegistry {
    TemplateRegistry::from_embedded_entries(TEMPLATES)
}

/// Engine preloaded with every embedded template.
///
/// # Errors
///
/// Returns [`RenderError::TemplateError`] if an embedded template fails to parse.
pub fn engine() -> Result<MiniJinjaEngine, RenderError> {
    MiniJinjaEngine::from_registry(&registry())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cldrjs_render::TemplateEngine;

    #[test]
    fn test_embedded_templates_parse() {
        let engine = engine().unwrap();
        for name in ["bundle", "test_bundle", "partials/resource", "fragments/range"] {
            assert!(engine.has_template(name), "{} missing", name);
        }
    }

    #[test]
    fn test_bundle_template_carries_module_def_marker() {
        let source = registry().get("bundle").unwrap().to_string();
        assert!(source.starts_with("/*<<module_def>> */"));
    }
}
