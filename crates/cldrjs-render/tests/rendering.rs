//! Integration tests for rendering embedded template sets.

use cldrjs_render::{MiniJinjaEngine, RenderError, TemplateEngine, TemplateRegistry};
use proptest::prelude::*;
use serde_json::json;

const ENTRIES: &[(&str, &str)] = &[
    (
        "partials/resource.jinja",
        "var resources = {{ resources | tojs }};\n",
    ),
    (
        "fragment.jinja",
        "/* feature: {{ key }} */\n{% include \"partials/resource\" %}\n",
    ),
    ("wrapper.jinja", "(function() {\n{{ contents }}\n}).call(this);\n"),
];

fn engine() -> MiniJinjaEngine {
    MiniJinjaEngine::from_registry(&TemplateRegistry::from_embedded_entries(ENTRIES)).unwrap()
}

#[test]
fn fragment_includes_shared_partial() {
    let output = engine()
        .render_named(
            "fragment",
            &json!({ "key": "lists", "resources": { "en": { "two": "{0} and {1}" } } }),
        )
        .unwrap();

    assert_eq!(
        output,
        "/* feature: lists */\nvar resources = {\"en\":{\"two\":\"{0} and {1}\"}};\n"
    );
}

#[test]
fn rendered_output_nests_inside_wrapper() {
    let engine = engine();
    let inner = engine
        .render_named("fragment", &json!({ "key": "range", "resources": {} }))
        .unwrap();
    let outer = engine
        .render_named("wrapper", &json!({ "contents": inner }))
        .unwrap();

    assert!(outer.starts_with("(function() {\n/* feature: range */"));
    assert!(outer.ends_with("}).call(this);\n"));
}

#[test]
fn unknown_template_is_reported_by_name() {
    let err = engine()
        .render_named("fragments/nope", &json!({}))
        .unwrap_err();
    assert!(matches!(err, RenderError::TemplateNotFound(_)));
    assert!(err.to_string().contains("fragments/nope"));
}

#[test]
fn rendering_is_deterministic() {
    let engine = engine();
    let ctx = json!({ "key": "numbers", "resources": { "de": { "decimal": "," }, "en": { "decimal": "." } } });
    let first = engine.render_named("fragment", &ctx).unwrap();
    let second = engine.render_named("fragment", &ctx).unwrap();
    assert_eq!(first, second);
}

proptest! {
    /// Any string embedded through `tojs` reads back as the same string.
    #[test]
    fn tojs_embeds_strings_losslessly(text in any::<String>()) {
        let engine = MiniJinjaEngine::new();
        let output = engine
            .render_template("{{ text | tojs }}", &json!({ "text": text.clone() }))
            .unwrap();
        let parsed: String = serde_json::from_str(&output).unwrap();
        prop_assert_eq!(parsed, text);
    }
}
