//! Fixed prompts and JSON schemas for the structured-output calls.
//!
//! Every schema is strict: all properties are required and no extra keys are allowed.

use adlab_schema::records::ContentRule;
use serde_json::{Value, json};

pub const HEADLINE_LIST: &str = "headline_list";
pub const RECONCILED_REGIONS: &str = "reconciled_regions";
pub const HEADLINE_VARIANTS: &str = "headline_variants";
pub const VARIANT_METRICS: &str = "variant_metrics";
pub const MATERIAL_ANALYSIS: &str = "material_analysis";

pub const EXTRACT_SYSTEM: &str = "You read advertising images. List every headline in the image \
exactly as written, one entry per headline. A headline is prominent marketing copy: the main \
claim, offer or call to action. Ignore logos, legal fine print and UI chrome. Return an empty \
list when the image has no headline.";

pub const RECONCILE_SYSTEM: &str = "You merge two sources describing text in the same image. \
Source 1 lists headlines with accurate text and no coordinates. Source 2 lists OCR fragments \
with accurate pixel coordinates and noisy text. For each headline in source 1, pick the OCR \
fragments that spell it and return the headline text from source 1 with one bounding box that \
encloses all of those fragments (min left and top, max right and bottom). Drop headlines with \
no matching fragment and drop fragments that belong to no headline. Never invent text or \
coordinates.";

pub const VARIANTS_SYSTEM: &str = "You are a performance copywriter. Rewrite the given ad \
headline into distinct alternatives that keep the offer intact and could replace the original \
in the same space. Respect every content rule. Give a one-sentence rationale per variant.";

pub const METRICS_SYSTEM: &str = "You estimate ad performance. Given an original headline and a \
rewritten variant, predict impressions, clicks and conversions for a 30-day run of a mid-sized \
display campaign, the resulting click-through and conversion rates as fractions, and your \
confidence between 0 and 1.";

pub const MATERIAL_SYSTEM: &str = "You analyze brand documents. Summarize the material in a \
short paragraph and derive concrete content rules a copywriter must follow. Each rule has a \
type (tone, formatting, keyword, length, audience or compliance), a short name, a description \
and a value such as a word, a limit or a style.";

pub fn rules_block(rules: &[ContentRule]) -> String {
    if rules.is_empty() {
        return "Content rules: none.".to_string();
    }
    let lines: Vec<String> = rules.iter().map(ContentRule::prompt_line).collect();
    format!("Content rules:\n{}", lines.join("\n"))
}

pub fn extract_user(rules: &[ContentRule]) -> String {
    format!(
        "Extract the headlines from this ad image.\n{}",
        rules_block(rules)
    )
}

pub fn variants_user(headline: &str, count: u8, rules: &[ContentRule]) -> String {
    format!(
        "Original headline: {headline:?}\nWrite exactly {count} variants.\n{}",
        rules_block(rules)
    )
}

pub fn metrics_user(original: &str, variant: &str) -> String {
    format!("Original headline: {original:?}\nVariant: {variant:?}")
}

pub fn material_user(url: &str, markdown: &str) -> String {
    format!("Source: {url}\n\n{markdown}")
}

fn point() -> Value {
    json!({
        "type": "array",
        "items": {"type": "number"},
        "minItems": 2,
        "maxItems": 2
    })
}

fn string_list(key: &str) -> Value {
    json!({
        "type": "object",
        "properties": {key: {"type": "array", "items": {"type": "string"}}},
        "required": [key],
        "additionalProperties": false
    })
}

pub fn headline_list_schema() -> Value {
    string_list("headlines")
}

pub fn reconciled_regions_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "regions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "text": {"type": "string"},
                        "bounding_box": {
                            "type": "object",
                            "properties": {
                                "top_left": point(),
                                "top_right": point(),
                                "bottom_right": point(),
                                "bottom_left": point(),
                                "center": point(),
                                "width": {"type": "number"},
                                "height": {"type": "number"}
                            },
                            "required": [
                                "top_left", "top_right", "bottom_right", "bottom_left",
                                "center", "width", "height"
                            ],
                            "additionalProperties": false
                        },
                        "area": {"type": "number"},
                        "aspect_ratio": {"type": "number"}
                    },
                    "required": ["text", "bounding_box", "area", "aspect_ratio"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["regions"],
        "additionalProperties": false
    })
}

pub fn headline_variants_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "variants": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "new_headline": {"type": "string"},
                        "rationale": {"type": "string"}
                    },
                    "required": ["new_headline", "rationale"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["variants"],
        "additionalProperties": false
    })
}

pub fn variant_metrics_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "impressions": {"type": "integer"},
            "clicks": {"type": "integer"},
            "ctr": {"type": "number"},
            "conversions": {"type": "integer"},
            "conversion_rate": {"type": "number"},
            "confidence": {"type": "number"}
        },
        "required": [
            "impressions", "clicks", "ctr", "conversions", "conversion_rate", "confidence"
        ],
        "additionalProperties": false
    })
}

pub fn material_analysis_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "summary": {"type": "string"},
            "content_rules": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "type": {"type": "string"},
                        "name": {"type": "string"},
                        "description": {"type": "string"},
                        "value": {"type": "string"}
                    },
                    "required": ["type", "name", "description", "value"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["summary", "content_rules"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_strict(schema: &Value) {
        if let Some(props) = schema.get("properties").and_then(Value::as_object) {
            let required: Vec<&str> = schema["required"]
                .as_array()
                .expect("object schema lists required keys")
                .iter()
                .filter_map(Value::as_str)
                .collect();
            for (key, child) in props {
                assert!(required.contains(&key.as_str()), "{key} is not required");
                assert_strict(child);
            }
            assert_eq!(schema["additionalProperties"], Value::Bool(false));
        }
        if let Some(items) = schema.get("items") {
            assert_strict(items);
        }
    }

    #[test]
    fn every_schema_is_strict() {
        for schema in [
            headline_list_schema(),
            reconciled_regions_schema(),
            headline_variants_schema(),
            variant_metrics_schema(),
            material_analysis_schema(),
        ] {
            assert_strict(&schema);
        }
    }

    #[test]
    fn rules_block_lists_one_rule_per_line() {
        let rules = vec![
            ContentRule::new("tone", "Friendly", "Keep it warm", "casual"),
            ContentRule::new("length", "Short", "", "40"),
        ];
        assert_eq!(
            rules_block(&rules),
            "Content rules:\n- [tone] Friendly: Keep it warm (value: casual)\n- [length] Short (value: 40)"
        );
        assert_eq!(rules_block(&[]), "Content rules: none.");
    }
}
