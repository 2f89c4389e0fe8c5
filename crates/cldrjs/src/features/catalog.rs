//! The built-in feature catalog.
//!
//! Implementation units emit the `Cldr` runtime pieces; test-helper units emit
//! fixtures under `CldrTestHelpers`. Registration order matters: later units
//! may use what earlier ones define (`timespan` consults `Cldr.PluralRules`
//! when it is present), so the default selection follows this order.
//!
//! Most data-bound units embed the bundle locale's data only.
//! `number_data_reader` is the exception: it carries the `numbers` data of
//! every supported locale in every bundle.

use super::{render_fragment, DataBinding, RenderConfig, RendererRegistry};
use crate::error::Result;

/// Registry of deliverable library features, in default selection order.
pub fn implementation_renderers() -> RendererRegistry {
    RendererRegistry::builder()
        .register("range", range)
        .register("code_points", code_points)
        .register("token", token)
        .register("number_tokenizer", number_tokenizer)
        .register("plural_rules", plural_rules)
        .register("numbers", numbers)
        .register("number_data_reader", number_data_reader)
        .register("rbnf", rbnf)
        .register("currencies", currencies)
        .register("lists", lists)
        .register("timespan", timespan)
        .register("datetime", datetime)
        .register("languages", languages)
        .build()
}

/// Registry of test-support helpers.
pub fn test_helper_renderers() -> RendererRegistry {
    RendererRegistry::builder()
        .register("plural_rules", plural_rules_helper)
        .register("numbers", numbers_helper)
        .register("lists", lists_helper)
        .register("rbnf", rbnf_helper)
        .build()
}

fn range(config: &RenderConfig<'_>) -> Result<String> {
    render_fragment(config, "range", "fragments/range", DataBinding::Code)
}

fn code_points(config: &RenderConfig<'_>) -> Result<String> {
    render_fragment(config, "code_points", "fragments/code_points", DataBinding::Code)
}

fn token(config: &RenderConfig<'_>) -> Result<String> {
    render_fragment(config, "token", "fragments/token", DataBinding::Code)
}

fn plural_rules(config: &RenderConfig<'_>) -> Result<String> {
    render_fragment(config, "plural_rules", "fragments/plural_rules", DataBinding::Locale("plurals"))
}

fn numbers(config: &RenderConfig<'_>) -> Result<String> {
    render_fragment(config, "numbers", "fragments/numbers", DataBinding::Locale("numbers"))
}

fn number_tokenizer(config: &RenderConfig<'_>) -> Result<String> {
    render_fragment(config, "number_tokenizer", "fragments/number_tokenizer", DataBinding::Code)
}

fn number_data_reader(config: &RenderConfig<'_>) -> Result<String> {
    render_fragment(
        config,
        "number_data_reader",
        "fragments/number_data_reader",
        DataBinding::AllLocales("numbers"),
    )
}

fn rbnf(config: &RenderConfig<'_>) -> Result<String> {
    render_fragment(config, "rbnf", "fragments/rbnf", DataBinding::Locale("rbnf"))
}

fn currencies(config: &RenderConfig<'_>) -> Result<String> {
    render_fragment(config, "currencies", "fragments/currencies", DataBinding::Locale("currencies"))
}

fn lists(config: &RenderConfig<'_>) -> Result<String> {
    render_fragment(config, "lists", "fragments/lists", DataBinding::Locale("lists"))
}

fn timespan(config: &RenderConfig<'_>) -> Result<String> {
    render_fragment(config, "timespan", "fragments/timespan", DataBinding::Locale("units"))
}

fn datetime(config: &RenderConfig<'_>) -> Result<String> {
    render_fragment(config, "datetime", "fragments/datetime", DataBinding::Locale("calendars"))
}

fn languages(config: &RenderConfig<'_>) -> Result<String> {
    render_fragment(config, "languages", "fragments/languages", DataBinding::Locale("languages"))
}

fn plural_rules_helper(config: &RenderConfig<'_>) -> Result<String> {
    render_fragment(config, "plural_rules", "test_helpers/plural_rules", DataBinding::Locale("plurals"))
}

fn numbers_helper(config: &RenderConfig<'_>) -> Result<String> {
    render_fragment(config, "numbers", "test_helpers/numbers", DataBinding::Locale("numbers"))
}

fn lists_helper(config: &RenderConfig<'_>) -> Result<String> {
    render_fragment(config, "lists", "test_helpers/lists", DataBinding::Locale("lists"))
}

fn rbnf_helper(config: &RenderConfig<'_>) -> Result<String> {
    render_fragment(config, "rbnf", "test_helpers/rbnf", DataBinding::Locale("rbnf"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureKey, RenderEnv};
    use crate::locale::{LocaleTag, MemoryLocaleStore};
    use crate::templates;

    fn fixture_store() -> MemoryLocaleStore {
        MemoryLocaleStore::from_yaml(include_str!("../../tests/fixtures/locales.yaml")).unwrap()
    }

    #[test]
    fn test_every_unit_template_exists() {
        let engine = templates::engine().unwrap();
        let store = fixture_store();
        let en = LocaleTag::new("en");
        let env = RenderEnv {
            engine: &engine,
            store: &store,
            prerender: true,
        };
        for registry in [implementation_renderers(), test_helper_renderers()] {
            for key in registry.keys() {
                let unit = registry.lookup(key.as_str()).unwrap();
                let fragment = unit(&env.for_locale(Some(&en))).unwrap();
                assert!(
                    fragment.starts_with(&format!("/* feature: {} */\n", key)),
                    "fragment for {} lacks its marker",
                    key
                );
            }
        }
    }

    #[test]
    fn test_default_order() {
        let keys: Vec<_> = implementation_renderers()
            .keys()
            .map(FeatureKey::as_str)
            .map(str::to_owned)
            .collect();
        let plural = keys.iter().position(|k| k == "plural_rules").unwrap();
        let timespan = keys.iter().position(|k| k == "timespan").unwrap();
        assert!(plural < timespan);
        assert_eq!(keys.len(), 13);
    }

    #[test]
    fn test_number_data_reader_embeds_every_locale() {
        let engine = templates::engine().unwrap();
        let store = fixture_store();
        let de = LocaleTag::new("de");
        for prerender in [true, false] {
            let env = RenderEnv {
                engine: &engine,
                store: &store,
                prerender,
            };
            let fragment = number_data_reader(&env.for_locale(Some(&de))).unwrap();
            assert!(fragment.contains(r#"var locales = ["en","de","ru"];"#));
            let per_locale = numbers(&env.for_locale(Some(&de))).unwrap();
            assert!(!per_locale.contains("\"en\""));
        }
    }

    #[test]
    fn test_number_tokenizer_is_pure_code() {
        let engine = templates::engine().unwrap();
        let store = MemoryLocaleStore::new();
        let xx = LocaleTag::new("xx");
        let env = RenderEnv {
            engine: &engine,
            store: &store,
            prerender: true,
        };
        let fragment = number_tokenizer(&env.for_locale(Some(&xx))).unwrap();
        assert!(fragment.contains("Cldr.NumberTokenizer"));
    }

    #[test]
    fn test_test_helpers_are_a_subset_of_implementation_keys() {
        let implementation = implementation_renderers();
        for key in test_helper_renderers().keys() {
            assert!(implementation.contains(key.as_str()));
        }
    }
}
