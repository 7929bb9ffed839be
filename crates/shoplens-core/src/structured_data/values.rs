//! Normalizers for loosely shaped schema.org values
//!
//! Sites emit `brand`, `image`, `author` and friends as a string, an object or
//! an array of either. `SchemaValue` classifies the shape once and the
//! normalizers below reduce it to a single canonical string.

use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;

use crate::text::collapse_whitespace;

/// The shapes a schema.org property value can take
#[derive(Debug, Clone, Copy)]
pub enum SchemaValue<'a> {
    Text(&'a str),
    Object(&'a Map<String, JsonValue>),
    List(&'a [JsonValue]),
    Other,
}

impl<'a> From<&'a JsonValue> for SchemaValue<'a> {
    fn from(value: &'a JsonValue) -> Self {
        match value {
            JsonValue::String(s) => SchemaValue::Text(s),
            JsonValue::Object(map) => SchemaValue::Object(map),
            JsonValue::Array(items) => SchemaValue::List(items),
            _ => SchemaValue::Other,
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = collapse_whitespace(s);
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Brand or organization name from a string, `{name}` object, or array of either.
///
/// Used for `brand`, `manufacturer` and review `author`.
pub fn extract_brand_name(value: &JsonValue) -> Option<String> {
    match SchemaValue::from(value) {
        SchemaValue::Text(s) => non_empty(s),
        SchemaValue::Object(map) => map.get("name").and_then(text_value),
        SchemaValue::List(items) => items.iter().find_map(|item| match SchemaValue::from(item) {
            SchemaValue::Text(s) => non_empty(s),
            SchemaValue::Object(map) => map.get("name").and_then(text_value),
            _ => None,
        }),
        SchemaValue::Other => None,
    }
}

/// Image URL from a string, an array (first element), or an `ImageObject`
pub fn extract_image_url(value: &JsonValue) -> Option<String> {
    match SchemaValue::from(value) {
        SchemaValue::Text(s) => non_empty(s),
        SchemaValue::Object(map) => image_object_url(map),
        SchemaValue::List(items) => items.first().and_then(|first| match SchemaValue::from(first) {
            SchemaValue::Text(s) => non_empty(s),
            SchemaValue::Object(map) => image_object_url(map),
            _ => None,
        }),
        SchemaValue::Other => None,
    }
}

/// Every image URL in an `image` property, in order
pub fn extract_image_urls(value: &JsonValue) -> Vec<String> {
    match value {
        JsonValue::Array(items) => items.iter().filter_map(extract_image_url).collect(),
        other => extract_image_url(other).into_iter().collect(),
    }
}

fn image_object_url(map: &Map<String, JsonValue>) -> Option<String> {
    map.get("url")
        .or_else(|| map.get("contentUrl"))
        .and_then(text_value)
}

/// Scalar text: strings, numbers, or JSON-LD `{"@value": ...}` wrappers
pub fn text_value(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => non_empty(s),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Object(map) => map.get("@value").and_then(text_value),
        JsonValue::Array(items) => items.iter().find_map(text_value),
        JsonValue::Null => None,
    }
}

/// Numeric value from a number or a numeric string such as "4.5" or "1,204"
pub fn number_value(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        JsonValue::Object(map) => map.get("@value").and_then(number_value),
        JsonValue::Array(items) => items.first().and_then(number_value),
        _ => None,
    }
}

/// `QuantitativeValue` or plain text, rendered as "12 cm"
pub fn quantity_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Object(map) if map.contains_key("value") => {
            let amount = map.get("value").and_then(text_value)?;
            let unit = map
                .get("unitText")
                .or_else(|| map.get("unitCode"))
                .and_then(text_value);
            Some(match unit {
                Some(unit) => format!("{amount} {unit}"),
                None => amount,
            })
        }
        other => text_value(other),
    }
}

/// Lowercased short type name. An array of types uses its first element and
/// IRIs are shortened, so `https://schema.org/Product` becomes `product`.
pub fn schema_type(value: &JsonValue) -> Option<String> {
    let raw = match value.get("@type")? {
        JsonValue::String(s) => s.as_str(),
        JsonValue::Array(items) => items.first()?.as_str()?,
        _ => return None,
    };
    let short = raw.rsplit('/').next().unwrap_or(raw);
    let short = short.rsplit(':').next().unwrap_or(short);
    let short = short.trim();
    if short.is_empty() {
        None
    } else {
        Some(short.to_ascii_lowercase())
    }
}

/// Last path segment of an enumeration IRI ("https://schema.org/InStock" -> "InStock")
pub fn enum_value(value: &JsonValue) -> Option<String> {
    let text = text_value(value)?;
    let short = text.rsplit('/').next().unwrap_or(&text).to_string();
    if short.is_empty() { None } else { Some(short) }
}

/// Index of `@id` -> node for one JSON-LD block
#[derive(Debug, Default)]
pub struct IdIndex<'a> {
    nodes: HashMap<&'a str, &'a JsonValue>,
}

impl<'a> IdIndex<'a> {
    /// Register every node that carries an `@id` plus at least one other
    /// property. Bare `{"@id": ...}` objects are references, not nodes.
    pub fn build(entities: &[&'a JsonValue]) -> Self {
        let mut index = IdIndex::default();
        for entity in entities {
            index.register(entity);
        }
        index
    }

    fn register(&mut self, value: &'a JsonValue) {
        match value {
            JsonValue::Object(map) => {
                if let Some(id) = map.get("@id").and_then(JsonValue::as_str)
                    && map.len() > 1
                {
                    self.nodes.entry(id).or_insert(value);
                }
                for child in map.values() {
                    self.register(child);
                }
            }
            JsonValue::Array(items) => {
                for item in items {
                    self.register(item);
                }
            }
            _ => {}
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Follow a `{"@id": "#x"}` reference; anything else is returned as is
    pub fn resolve(&self, value: &'a JsonValue) -> &'a JsonValue {
        if let JsonValue::Object(map) = value
            && map.len() == 1
            && let Some(id) = map.get("@id").and_then(JsonValue::as_str)
            && let Some(node) = self.nodes.get(id).copied()
        {
            return node;
        }
        value
    }

    /// Property of an entity with references resolved
    pub fn prop(&self, entity: &'a JsonValue, key: &str) -> Option<&'a JsonValue> {
        entity.get(key).map(|v| self.resolve(v))
    }

    /// Property as a list of resolved objects, whether given as one value or an array
    pub fn prop_list(&self, entity: &'a JsonValue, key: &str) -> Vec<&'a JsonValue> {
        match self.prop(entity, key) {
            Some(JsonValue::Array(items)) => items.iter().map(|v| self.resolve(v)).collect(),
            Some(JsonValue::Null) | None => Vec::new(),
            Some(single) => vec![single],
        }
    }

    pub fn prop_text(&self, entity: &'a JsonValue, key: &str) -> Option<String> {
        self.prop(entity, key).and_then(text_value)
    }
}
