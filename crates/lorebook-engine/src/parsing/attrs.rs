//! Attribute extraction for the custom tag blocks.
//!
//! These run on the isolated raw text of a scanned tag, never on whole
//! documents. The recipe slot array uses a JSX array literal
//! (`slots={['a','b']}`) that plain attribute parsing cannot survive, so it
//! is pulled out by regex first and the remainder goes through the generic
//! `key="value"` / `key={value}` extractor. All of this is infallible:
//! missing or malformed attributes fall back to defaults.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

fn slots_regex() -> &'static Regex {
    static SLOTS_REGEX: OnceLock<Regex> = OnceLock::new();
    SLOTS_REGEX.get_or_init(|| Regex::new(r"slots=\{\[(.*?)\]\}").expect("Invalid slots regex"))
}

fn attr_regex() -> &'static Regex {
    static ATTR_REGEX: OnceLock<Regex> = OnceLock::new();
    ATTR_REGEX.get_or_init(|| {
        Regex::new(r#"([A-Za-z_][A-Za-z0-9_-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|\{([^{}]*)\}|([^\s"'{}<>/]+))"#)
            .expect("Invalid attribute regex")
    })
}

/// Parsed `<CraftingRecipe .../>` attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeTag {
    /// Item ids in grid order. Renderable recipes carry exactly 9.
    pub slots: Vec<String>,
    pub result: String,
    pub count: u32,
}

/// Parsed `<Asset .../>` or `<ModAsset .../>` attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTag {
    pub location: String,
    /// Raw width expression, e.g. `50%` or `256`. Converted to a fraction
    /// at lowering time.
    pub width: String,
    pub mod_asset: bool,
}

pub(crate) fn parse_recipe(raw: &str) -> RecipeTag {
    // The raw text may spread the array over several lines.
    let joined = raw.replace('\n', " ");

    let slots = slots_regex()
        .captures(&joined)
        .and_then(|c| c.get(1))
        .map(|m| split_slot_array(m.as_str()))
        .unwrap_or_default();

    // Strip the array literal so it cannot confuse the attribute extractor.
    let remainder = slots_regex().replace_all(&joined, "");
    let attrs = parse_tag_attrs(&remainder);

    let result = attrs.get("result").cloned().unwrap_or_default();
    let count = attrs
        .get("count")
        .map(|c| c.replace(['{', '}'], ""))
        .and_then(|c| c.trim().parse().ok())
        .unwrap_or(1);

    RecipeTag { slots, result, count }
}

pub(crate) fn parse_asset(raw: &str, mod_asset: bool) -> AssetTag {
    let joined = raw.replace('\n', " ");
    let attrs = parse_tag_attrs(&joined);

    let location = attrs.get("location").cloned().unwrap_or_default();
    let width = attrs
        .get("width")
        .map(|w| w.replace(['{', '}'], ""))
        .filter(|w| !w.is_empty())
        .unwrap_or_else(|| "50%".to_string());

    AssetTag {
        location,
        width,
        mod_asset,
    }
}

pub(crate) fn parse_callout_variant(opening_line: &str) -> String {
    parse_tag_attrs(opening_line)
        .get("variant")
        .cloned()
        .unwrap_or_else(|| "info".to_string())
}

fn split_slot_array(inner: &str) -> Vec<String> {
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner
        .split(',')
        .map(|item| item.trim().replace(['\'', '"'], ""))
        .collect()
}

fn parse_tag_attrs(text: &str) -> HashMap<String, String> {
    attr_regex()
        .captures_iter(text)
        .map(|c| {
            let key = c[1].to_string();
            let value = c
                .get(2)
                .or_else(|| c.get(3))
                .or_else(|| c.get(4))
                .or_else(|| c.get(5))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            (key, value)
        })
        .collect()
}
