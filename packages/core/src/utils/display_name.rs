//! Display name generation for JSON objects
//!
//! Save and definition records have no single "name" field. The display name
//! is composed from whichever identifying fields a record carries, in a fixed
//! priority order, so that the same record always renders the same way.

use serde_json::{Map, Value};

/// Name used when an object carries none of the identifying fields.
pub const FALLBACK_DISPLAY_NAME: &str = "Object";

/// Fields tried, in order, after `Registration` + `Name`.
const NAME_FIELDS: &[&str] = &[
    "GameName",
    "CategoryName",
    "name",
    "PrefabPath",
    "RuleName",
    "TierName",
    "GroupName",
];

/// Names shorter than this get the `ItemID` appended.
const SHORT_NAME_LEN: usize = 8;

/// Compose a display name for a JSON object.
///
/// Tries `Registration + " " + Name`, then each of [`NAME_FIELDS`]; the first
/// non-empty result wins. `ItemID` is appended when the result is still
/// shorter than eight characters. Falls back to [`FALLBACK_DISPLAY_NAME`].
///
/// # Examples
///
/// ```rust
/// use hellion_core::utils::generate_display_name;
/// use serde_json::json;
///
/// let ship = json!({"Registration": "AM-1", "Name": "Arges"});
/// assert_eq!(generate_display_name(ship.as_object().unwrap()), "AM-1 Arges");
///
/// let item = json!({"ItemID": 42});
/// assert_eq!(generate_display_name(item.as_object().unwrap()), "42");
/// ```
pub fn generate_display_name(object: &Map<String, Value>) -> String {
    let registration = field_text(object, "Registration");
    let name = field_text(object, "Name");

    let mut composed = match (registration, name) {
        (Some(registration), Some(name)) => format!("{} {}", registration, name),
        (Some(single), None) | (None, Some(single)) => single,
        (None, None) => String::new(),
    };

    if composed.is_empty() {
        composed = NAME_FIELDS
            .iter()
            .find_map(|key| field_text(object, key))
            .unwrap_or_default();
    }

    if composed.chars().count() < SHORT_NAME_LEN {
        if let Some(item_id) = field_text(object, "ItemID") {
            composed = format!("{} {}", composed, item_id);
        }
    }

    let composed = composed.trim();
    if composed.is_empty() {
        FALLBACK_DISPLAY_NAME.to_string()
    } else {
        composed.to_string()
    }
}

/// Text form of a scalar JSON value: strings unquoted, everything else as
/// JSON. Containers render as an empty string.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null | Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Trimmed, non-empty text of a scalar field.
fn field_text(object: &Map<String, Value>, key: &str) -> Option<String> {
    let value = object.get(key)?;
    if value.is_null() {
        return None;
    }
    let text = scalar_text(value);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn name_of(value: Value) -> String {
        generate_display_name(value.as_object().unwrap())
    }

    #[test]
    fn test_registration_and_name() {
        assert_eq!(
            name_of(json!({"Registration": "AM-1", "Name": "Arges", "GameName": "x"})),
            "AM-1 Arges"
        );
        assert_eq!(name_of(json!({"Registration": "AM-1"})), "AM-1");
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            name_of(json!({"GroupName": "Group", "CategoryName": "Category"})),
            "Category"
        );
        assert_eq!(
            name_of(json!({"PrefabPath": "Assets/Prefabs/Hull", "name": "hull"})),
            "hull"
        );
        assert_eq!(name_of(json!({"TierName": "Tier 2"})), "Tier 2");
    }

    #[test]
    fn test_empty_fields_are_skipped() {
        assert_eq!(
            name_of(json!({"Name": "  ", "GameName": "", "RuleName": "Spawn Rule"})),
            "Spawn Rule"
        );
    }

    #[test]
    fn test_item_id_appended_when_short() {
        assert_eq!(name_of(json!({"name": "Gun", "ItemID": 7})), "Gun 7");
        assert_eq!(
            name_of(json!({"name": "Long enough name", "ItemID": 7})),
            "Long enough name"
        );
        assert_eq!(name_of(json!({"ItemID": "12"})), "12");
    }

    #[test]
    fn test_fallback() {
        assert_eq!(name_of(json!({})), FALLBACK_DISPLAY_NAME);
        assert_eq!(name_of(json!({"Name": null, "Other": 1})), FALLBACK_DISPLAY_NAME);
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&json!("text")), "text");
        assert_eq!(scalar_text(&json!(1.5)), "1.5");
        assert_eq!(scalar_text(&json!(true)), "true");
        assert_eq!(scalar_text(&json!(null)), "null");
        assert_eq!(scalar_text(&json!([1])), "");
    }
}
