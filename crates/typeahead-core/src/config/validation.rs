//! Config validation - warns about unknown fields

use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

/// Option names recognised by `WidgetConfig`, camelCase and snake_case aliases
const KNOWN_OPTIONS: &[&str] = &[
    "source",
    "delay",
    "highlight",
    "fadeIn",
    "fade_in",
    "fadeOut",
    "fade_out",
    "menuClass",
    "menu_class",
    "labelClass",
    "label_class",
    "categoryClass",
    "category_class",
    "itemClass",
    "item_class",
    "labelName",
    "label_name",
    "categoryName",
    "category_name",
    "blurGrace",
    "blur_grace",
    "fetchTimeout",
    "fetch_timeout",
];

/// Options that only make sense as host callbacks and are ignored in JSON
const HOOK_OPTIONS: &[&str] = &["format", "menu_placement", "menuPlacement"];

/// Validate JSON config and warn about unknown fields.
pub fn warn_unknown_fields(content: &str, config_name: &str) {
    let Ok(value) = serde_json::from_str::<Value>(content) else {
        return;
    };

    for key in find_unknown_keys(&value) {
        if HOOK_OPTIONS.contains(&key.as_str()) {
            warn!("Config field {key} in {config_name} must be supplied as a hook, ignoring");
        } else {
            warn!("Unknown config field in {config_name}: {key}");
        }
    }
}

/// Top-level keys of `value` that are not widget options
fn find_unknown_keys(value: &Value) -> Vec<String> {
    let Value::Object(obj) = value else {
        return Vec::new();
    };

    let known: HashSet<&str> = KNOWN_OPTIONS.iter().copied().collect();
    obj.keys()
        .filter(|key| !known.contains(key.as_str()))
        .cloned()
        .collect()
}
