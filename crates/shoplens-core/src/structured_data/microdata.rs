//! Microdata (`itemscope`/`itemprop`/`itemtype`) extraction
//!
//! Each top-level item becomes a JSON object shaped like a JSON-LD node
//! (`@type`, `@id`, properties), so the JSON-LD classifier handles both.

use scraper::ElementRef;
use serde_json::{Map, Value as JsonValue};

use super::jsonld::{breadcrumb_item, classify};
use super::values::{IdIndex, schema_type};
use super::{BreadcrumbEntity, SchemaRecord};
use crate::document::{PageDocument, element_text};
use crate::types::Source;

/// Top-level items: `[itemscope]` elements with no scoped ancestor
pub(crate) fn microdata_items(doc: &PageDocument) -> Vec<JsonValue> {
    doc.select("[itemscope]")
        .into_iter()
        .filter(|el| {
            !el.ancestors()
                .filter_map(ElementRef::wrap)
                .any(|a| a.value().attr("itemscope").is_some())
        })
        .map(|el| item_to_json(&el))
        .collect()
}

/// Records for all items, plus a breadcrumb rebuilt from loose `ListItem`s
/// when the page has no `BreadcrumbList` container
pub(crate) fn microdata_records(
    doc: &PageDocument,
    items: &[JsonValue],
    types_found: &mut Vec<String>,
) -> Vec<SchemaRecord> {
    let entities: Vec<&JsonValue> = items.iter().collect();
    let index = IdIndex::build(&entities);

    let mut records = Vec::new();
    for item in entities.iter().copied() {
        classify(item, &index, Source::Microdata, 0, types_found, &mut records);
    }

    let has_breadcrumb = records
        .iter()
        .any(|r| matches!(r, SchemaRecord::Breadcrumb(_)));
    if !has_breadcrumb && let Some(breadcrumb) = standalone_breadcrumb(doc) {
        records.push(SchemaRecord::Breadcrumb(breadcrumb));
    }

    records
}

fn standalone_breadcrumb(doc: &PageDocument) -> Option<BreadcrumbEntity> {
    let list_items: Vec<JsonValue> = doc
        .select("[itemscope][itemtype]")
        .into_iter()
        .map(|el| item_to_json(&el))
        .filter(|item| schema_type(item).as_deref() == Some("listitem"))
        .collect();
    if list_items.is_empty() {
        return None;
    }

    let index = IdIndex::default();
    let items = list_items
        .iter()
        .map(|item| breadcrumb_item(item, &index))
        .collect();
    Some(BreadcrumbEntity::new(items, Source::Microdata))
}

fn item_to_json(scope: &ElementRef<'_>) -> JsonValue {
    let mut map = Map::new();
    let value = scope.value();

    if let Some(item_type) = value.attr("itemtype").and_then(|t| t.split_whitespace().next()) {
        let short = item_type.rsplit('/').next().unwrap_or(item_type);
        map.insert("@type".to_string(), JsonValue::String(short.to_string()));
    }
    if let Some(item_id) = value.attr("itemid").map(str::trim).filter(|id| !id.is_empty()) {
        map.insert("@id".to_string(), JsonValue::String(item_id.to_string()));
    }

    collect_properties(scope, &mut map);
    JsonValue::Object(map)
}

/// Walk descendants until another scope starts. A scoped element that is
/// itself an `itemprop` becomes a nested item under that property.
fn collect_properties(parent: &ElementRef<'_>, map: &mut Map<String, JsonValue>) {
    for child in parent.children().filter_map(ElementRef::wrap) {
        let is_scope = child.value().attr("itemscope").is_some();

        if let Some(names) = child.value().attr("itemprop") {
            let value = if is_scope {
                item_to_json(&child)
            } else {
                property_value(&child)
            };
            for name in names.split_whitespace() {
                insert_property(map, name, value.clone());
            }
        }

        if !is_scope {
            collect_properties(&child, map);
        }
    }
}

fn insert_property(map: &mut Map<String, JsonValue>, name: &str, value: JsonValue) {
    match map.get_mut(name) {
        Some(JsonValue::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = JsonValue::Array(vec![first, value]);
        }
        None => {
            map.insert(name.to_string(), value);
        }
    }
}

fn property_value(element: &ElementRef<'_>) -> JsonValue {
    let el = element.value();
    let attr = |name: &str| el.attr(name).map(|v| v.trim().to_string());

    let raw = match el.name() {
        "meta" => attr("content"),
        "a" | "link" | "area" => attr("href"),
        "img" | "audio" | "video" | "source" | "embed" | "iframe" | "track" => attr("src"),
        "object" => attr("data"),
        "time" => attr("datetime").or_else(|| Some(element_text(element))),
        "data" | "meter" => attr("value"),
        _ => attr("content").or_else(|| Some(element_text(element))),
    };

    JsonValue::String(raw.unwrap_or_default())
}
