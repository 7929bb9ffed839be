//! JSON-LD entity classification
//!
//! A block may be a bare array of entities, an object holding `@graph`, or a
//! single entity. All three are flattened to one entity list before any type
//! matching happens, so they resolve identically.

use serde_json::Value as JsonValue;

use super::values::{
    IdIndex, enum_value, extract_brand_name, extract_image_url, extract_image_urls,
    number_value, quantity_text, schema_type, text_value,
};
use super::{
    AggregateRatingEntity, BrandEntity, BreadcrumbEntity, BreadcrumbItem, FaqEntity,
    FaqQuestion, OfferEntity, OrganizationEntity, ProductEntity, ProductRecord, PropertyValue,
    ReviewEntity, SchemaDates, SchemaRecord,
};
use crate::text::strip_tags;
use crate::types::Source;

const GTIN_KEYS: &[&str] = &["gtin", "gtin13", "gtin12", "gtin14", "gtin8", "isbn"];
const ORGANIZATION_TYPES: &[&str] = &[
    "organization",
    "corporation",
    "onlinestore",
    "onlinebusiness",
    "store",
    "localbusiness",
];
const PAGE_TYPES: &[&str] = &["webpage", "itempage", "productpage", "collectionpage"];
const MAX_MAIN_ENTITY_DEPTH: usize = 3;

/// Entities of one block, whatever its top-level shape
pub(crate) fn block_entities(block: &JsonValue) -> Vec<&JsonValue> {
    match block {
        JsonValue::Array(items) => items
            .iter()
            .flat_map(|item| match item.get("@graph") {
                Some(graph) => graph_items(graph),
                None => vec![item],
            })
            .filter(|item| item.is_object())
            .collect(),
        JsonValue::Object(map) => match map.get("@graph") {
            Some(graph) => graph_items(graph)
                .into_iter()
                .filter(|item| item.is_object())
                .collect(),
            None => vec![block],
        },
        _ => Vec::new(),
    }
}

fn graph_items(graph: &JsonValue) -> Vec<&JsonValue> {
    match graph {
        JsonValue::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// Candidate records for one parsed JSON-LD block
pub(crate) fn block_records(block: &JsonValue, types_found: &mut Vec<String>) -> Vec<SchemaRecord> {
    let entities = block_entities(block);
    let index = IdIndex::build(&entities);
    let mut records = Vec::new();
    for entity in entities {
        classify(entity, &index, Source::Schema, 0, types_found, &mut records);
    }
    records
}

/// Turn one entity into zero or more records.
///
/// Shared with Microdata, whose items are converted to the same JSON shape.
pub(crate) fn classify<'a>(
    entity: &'a JsonValue,
    index: &IdIndex<'a>,
    source: Source,
    depth: usize,
    types_found: &mut Vec<String>,
    out: &mut Vec<SchemaRecord>,
) {
    let Some(ty) = schema_type(entity) else {
        return;
    };
    if !types_found.contains(&ty) {
        types_found.push(ty.clone());
    }

    match ty.as_str() {
        "product" | "productgroup" | "productmodel" | "individualproduct" => {
            out.push(SchemaRecord::Product(Box::new(product_record(
                entity,
                index,
                source,
                ty == "productgroup",
            ))));
        }
        "aggregaterating" => {
            if let Some(rating) = rating_entity(entity, index, source) {
                out.push(SchemaRecord::AggregateRating(rating));
            }
        }
        "review" => out.push(SchemaRecord::Review(review_entity(entity, index, source))),
        "offer" | "aggregateoffer" => {
            let offers = offers_from(entity, index, source);
            if !offers.is_empty() {
                out.push(SchemaRecord::Offers(offers));
            }
        }
        "faqpage" => {
            if let Some(faq) = faq_entity(entity, index, source) {
                out.push(SchemaRecord::Faq(faq));
            }
        }
        "breadcrumblist" => {
            out.push(SchemaRecord::Breadcrumb(breadcrumb_entity(entity, index, source)));
        }
        "brand" => out.push(SchemaRecord::Brand(BrandEntity {
            name: index.prop_text(entity, "name"),
            source,
        })),
        "imageobject" => {
            if let Some(url) = extract_image_url(entity) {
                out.push(SchemaRecord::Image(url));
            }
        }
        t if ORGANIZATION_TYPES.contains(&t) => {
            out.push(SchemaRecord::Organization(organization_entity(entity, index, source)));
        }
        t if PAGE_TYPES.contains(&t) && depth < MAX_MAIN_ENTITY_DEPTH => {
            for key in ["mainEntity", "breadcrumb"] {
                for child in index.prop_list(entity, key) {
                    classify(child, index, source, depth + 1, types_found, out);
                }
            }
        }
        _ => {}
    }

    if let Some(dates) = dates_of(entity, index, source) {
        out.push(SchemaRecord::Dates(dates));
    }
}

fn product_record<'a>(
    entity: &'a JsonValue,
    index: &IdIndex<'a>,
    source: Source,
    is_product_group: bool,
) -> ProductRecord {
    let variants = index.prop_list(entity, "hasVariant");

    let mut sku = index.prop_text(entity, "sku");
    if sku.is_none() && is_product_group {
        sku = index.prop_text(entity, "productGroupID");
    }
    let gtin = gtin_of(entity, index).or_else(|| variants.iter().find_map(|v| gtin_of(v, index)));
    let mpn = index
        .prop_text(entity, "mpn")
        .or_else(|| variants.iter().find_map(|v| index.prop_text(v, "mpn")));

    let direct_offers = index.prop(entity, "offers");
    let offers = match direct_offers {
        Some(value) => offers_from(value, index, source),
        None => variants
            .iter()
            .find_map(|variant| index.prop(variant, "offers"))
            .map(|value| offers_from(value, index, source))
            .unwrap_or_default(),
    };

    let rating = index
        .prop(entity, "aggregateRating")
        .filter(|v| v.is_object())
        .and_then(|v| rating_entity(v, index, source));

    let mut reviews: Vec<ReviewEntity> = index
        .prop_list(entity, "review")
        .into_iter()
        .chain(index.prop_list(entity, "reviews"))
        .filter(|v| v.is_object())
        .map(|v| review_entity(v, index, source))
        .collect();
    reviews.dedup();

    let brand_value = index.prop(entity, "brand");
    let manufacturer_value = index.prop(entity, "manufacturer");
    let brand = brand_value
        .and_then(extract_brand_name)
        .or_else(|| manufacturer_value.and_then(extract_brand_name));

    let mut nested_brand = None;
    let mut nested_organization = None;
    for value in [brand_value, manufacturer_value].into_iter().flatten() {
        match schema_type(value).as_deref() {
            Some("brand") if nested_brand.is_none() => {
                nested_brand = Some(BrandEntity {
                    name: extract_brand_name(value),
                    source: Source::ProductNested,
                });
            }
            Some(t) if ORGANIZATION_TYPES.contains(&t) && nested_organization.is_none() => {
                nested_organization = Some(OrganizationEntity {
                    source: Source::ProductNested,
                    ..organization_entity(value, index, source)
                });
            }
            _ => {}
        }
    }

    let additional_properties = index
        .prop_list(entity, "additionalProperty")
        .into_iter()
        .filter_map(|prop| {
            let name = index.prop_text(prop, "name")?;
            let value = index.prop(prop, "value").and_then(quantity_text)?;
            let value = match index.prop_text(prop, "unitText") {
                Some(unit) if !value.ends_with(&unit) => format!("{value} {unit}"),
                _ => value,
            };
            Some(PropertyValue { name, value })
        })
        .collect();

    let dimensions = {
        let parts: Vec<String> = ["width", "height", "depth"]
            .iter()
            .filter_map(|key| index.prop(entity, key).and_then(quantity_text))
            .collect();
        if parts.is_empty() { None } else { Some(parts.join(" x ")) }
    };

    let image_value = index.prop(entity, "image");
    let product = ProductEntity {
        name: index.prop_text(entity, "name"),
        description: index
            .prop_text(entity, "description")
            .map(|d| strip_tags(&d))
            .filter(|d| !d.is_empty()),
        image: image_value.and_then(extract_image_url),
        sku,
        gtin,
        mpn,
        brand,
        has_offer: !offers.is_empty(),
        has_rating: rating.is_some(),
        is_product_group,
        variant_count: variants.len(),
        category: index
            .prop(entity, "category")
            .and_then(extract_brand_name),
        material: index.prop(entity, "material").and_then(extract_brand_name),
        color: index.prop_text(entity, "color"),
        weight: index.prop(entity, "weight").and_then(quantity_text),
        dimensions,
        additional_properties,
        source,
    };

    ProductRecord {
        product,
        offers,
        rating,
        reviews,
        images: image_value.map(extract_image_urls).unwrap_or_default(),
        nested_brand,
        nested_organization,
    }
}

fn gtin_of<'a>(entity: &'a JsonValue, index: &IdIndex<'a>) -> Option<String> {
    GTIN_KEYS.iter().find_map(|key| index.prop_text(entity, key))
}

fn offers_from<'a>(value: &'a JsonValue, index: &IdIndex<'a>, source: Source) -> Vec<OfferEntity> {
    match index.resolve(value) {
        JsonValue::Array(items) => items
            .iter()
            .flat_map(|item| offers_from(item, index, source))
            .collect(),
        offer @ JsonValue::Object(_) => {
            let is_aggregate = schema_type(offer).as_deref() == Some("aggregateoffer");
            let price_spec = index.prop(offer, "priceSpecification");
            let price = index
                .prop_text(offer, "price")
                .or_else(|| is_aggregate.then(|| index.prop_text(offer, "lowPrice")).flatten())
                .or_else(|| price_spec.and_then(|spec| index.prop_text(spec, "price")));
            let currency = index
                .prop_text(offer, "priceCurrency")
                .or_else(|| price_spec.and_then(|spec| index.prop_text(spec, "priceCurrency")));
            let availability = index.prop(offer, "availability").and_then(enum_value);

            if price.is_none() && currency.is_none() && availability.is_none() {
                // AggregateOffer wrapping individual offers
                return index
                    .prop(offer, "offers")
                    .map(|inner| offers_from(inner, index, source))
                    .unwrap_or_default();
            }

            vec![OfferEntity {
                price,
                currency,
                availability,
                source,
            }]
        }
        _ => Vec::new(),
    }
}

fn rating_entity<'a>(
    entity: &'a JsonValue,
    index: &IdIndex<'a>,
    source: Source,
) -> Option<AggregateRatingEntity> {
    let rating_value = index.prop(entity, "ratingValue").and_then(number_value);
    let review_count = index
        .prop(entity, "reviewCount")
        .or_else(|| index.prop(entity, "ratingCount"))
        .and_then(number_value)
        .filter(|n| *n >= 0.0)
        .map(|n| n as u64);
    // A dangling @id reference resolves to a bare {"@id": ...} object
    if rating_value.is_none() && review_count.is_none() {
        return None;
    }

    Some(AggregateRatingEntity {
        rating_value,
        review_count,
        best_rating: index
            .prop(entity, "bestRating")
            .and_then(number_value)
            .unwrap_or(5.0),
        source,
    })
}

fn review_entity<'a>(entity: &'a JsonValue, index: &IdIndex<'a>, source: Source) -> ReviewEntity {
    ReviewEntity {
        author: index.prop(entity, "author").and_then(extract_brand_name),
        date_published: index.prop_text(entity, "datePublished"),
        body: index
            .prop_text(entity, "reviewBody")
            .or_else(|| index.prop_text(entity, "description"))
            .map(|b| strip_tags(&b)),
        rating: index
            .prop(entity, "reviewRating")
            .and_then(|r| index.prop(r, "ratingValue"))
            .and_then(number_value),
        source,
    }
}

fn faq_entity<'a>(entity: &'a JsonValue, index: &IdIndex<'a>, source: Source) -> Option<FaqEntity> {
    let questions: Vec<FaqQuestion> = index
        .prop_list(entity, "mainEntity")
        .into_iter()
        .filter_map(|q| {
            let question = index
                .prop_text(q, "name")
                .or_else(|| index.prop_text(q, "text"))?;
            let answer = index
                .prop(q, "acceptedAnswer")
                .and_then(|a| match a {
                    JsonValue::Array(items) => items.first().map(|first| index.resolve(first)),
                    other => Some(other),
                })
                .and_then(|a| index.prop_text(a, "text"))
                .map(|a| strip_tags(&a));
            Some(FaqQuestion { question, answer })
        })
        .collect();
    if questions.is_empty() {
        return None;
    }

    Some(FaqEntity {
        question_count: questions.len(),
        questions,
        source,
    })
}

fn breadcrumb_entity<'a>(
    entity: &'a JsonValue,
    index: &IdIndex<'a>,
    source: Source,
) -> BreadcrumbEntity {
    let items = index
        .prop_list(entity, "itemListElement")
        .into_iter()
        .map(|item| breadcrumb_item(item, index))
        .collect();
    BreadcrumbEntity::new(items, source)
}

pub(crate) fn breadcrumb_item<'a>(item: &'a JsonValue, index: &IdIndex<'a>) -> BreadcrumbItem {
    let target = index.prop(item, "item");
    let name = index
        .prop_text(item, "name")
        .or_else(|| target.and_then(|t| index.prop_text(t, "name")));
    let url = target.and_then(|t| match t {
        JsonValue::String(s) => Some(s.trim().to_string()),
        other => index
            .prop_text(other, "@id")
            .or_else(|| index.prop_text(other, "url")),
    });

    BreadcrumbItem {
        position: index
            .prop(item, "position")
            .and_then(number_value)
            .filter(|p| *p >= 0.0)
            .map(|p| p as u32),
        name,
        url,
    }
}

fn organization_entity<'a>(
    entity: &'a JsonValue,
    index: &IdIndex<'a>,
    source: Source,
) -> OrganizationEntity {
    OrganizationEntity {
        name: index.prop_text(entity, "name"),
        url: index.prop_text(entity, "url"),
        logo: index.prop(entity, "logo").and_then(extract_image_url),
        same_as: index
            .prop_list(entity, "sameAs")
            .into_iter()
            .filter_map(text_value)
            .collect(),
        source,
    }
}

fn dates_of<'a>(entity: &'a JsonValue, index: &IdIndex<'a>, source: Source) -> Option<SchemaDates> {
    let dates = SchemaDates {
        date_modified: index.prop_text(entity, "dateModified"),
        date_published: index.prop_text(entity, "datePublished"),
        date_created: index.prop_text(entity, "dateCreated"),
        source,
    };
    // Review dates describe the review, not the page
    let is_review = schema_type(entity).as_deref() == Some("review");
    if is_review || dates.best().is_none() {
        None
    } else {
        Some(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::super::SchemaEntitySet;
    use super::*;
    use serde_json::json;

    fn resolve(block: JsonValue) -> SchemaEntitySet {
        let mut types = Vec::new();
        SchemaEntitySet::from_records(block_records(&block, &mut types))
    }

    #[test]
    fn test_block_shapes_resolve_identically() {
        let entity = json!({
            "@context": "https://schema.org",
            "@type": "Product",
            "name": "Trail Tee",
            "sku": "TT-1",
            "offers": {"@type": "Offer", "price": "25.00", "priceCurrency": "USD"}
        });

        let bare_array = resolve(json!([entity.clone()]));
        let graph = resolve(json!({"@context": "https://schema.org", "@graph": [entity.clone()]}));
        let single = resolve(entity);

        assert!(single.product.is_some());
        assert_eq!(bare_array.product, single.product);
        assert_eq!(graph.product, single.product);
    }

    #[test]
    fn test_product_group_rating_by_reference() {
        let set = resolve(json!({
            "@graph": [
                {"@type": "ProductGroup", "@id": "#pg", "name": "Runner", "productGroupID": "RUN",
                 "aggregateRating": {"@id": "#r"}},
                {"@type": "AggregateRating", "@id": "#r", "ratingValue": "4.7", "reviewCount": 128}
            ]
        }));

        let rating = set.aggregate_rating.unwrap();
        assert_eq!(rating.rating_value, Some(4.7));
        assert_eq!(rating.review_count, Some(128));
        let product = set.product.unwrap();
        assert!(product.is_product_group);
        assert!(product.has_rating);
        assert_eq!(product.sku.as_deref(), Some("RUN"));
    }

    #[test]
    fn test_dangling_rating_reference_falls_back_to_standalone() {
        let set = resolve(json!({
            "@graph": [
                {"@type": "Product", "name": "Runner", "aggregateRating": {"@id": "#missing"}},
                {"@type": "AggregateRating", "ratingValue": 4.2, "reviewCount": 31}
            ]
        }));

        let rating = set.aggregate_rating.unwrap();
        assert_eq!(rating.rating_value, Some(4.2));
        assert_eq!(rating.review_count, Some(31));
        assert!(set.product.unwrap().has_rating);

        let set = resolve(json!({"@type": "Product", "name": "Runner", "aggregateRating": {"@id": "#missing"}}));
        assert!(set.aggregate_rating.is_none());
        assert!(!set.product.unwrap().has_rating);
    }

    #[test]
    fn test_faq_page_without_questions_is_ignored() {
        let set = resolve(json!({"@context": "https://schema.org", "@type": "FAQPage"}));
        assert!(set.faq.is_none());

        let set = resolve(json!({"@type": "FAQPage", "mainEntity": []}));
        assert!(set.faq.is_none());
    }

    #[test]
    fn test_product_group_identifiers_from_variants() {
        let set = resolve(json!({
            "@type": "ProductGroup",
            "name": "Runner",
            "hasVariant": [
                {"@type": "Product", "name": "Runner 8"},
                {"@type": "Product", "name": "Runner 9", "mpn": "R9"},
                {"@type": "Product", "name": "Runner 10", "gtin": "012345678905",
                 "offers": {"@type": "Offer", "price": 120, "priceCurrency": "EUR",
                            "availability": "https://schema.org/InStock"}}
            ]
        }));

        let product = set.product.unwrap();
        assert_eq!(product.gtin.as_deref(), Some("012345678905"));
        assert_eq!(product.mpn.as_deref(), Some("R9"));
        assert_eq!(product.variant_count, 3);
        assert_eq!(set.offers.len(), 1);
        assert_eq!(set.offers[0].price.as_deref(), Some("120"));
        assert_eq!(set.offers[0].availability.as_deref(), Some("InStock"));
    }

    #[test]
    fn test_direct_offers_preferred_over_variants() {
        let set = resolve(json!({
            "@type": "ProductGroup",
            "offers": {"@type": "AggregateOffer", "lowPrice": "10", "priceCurrency": "USD"},
            "hasVariant": [{"@type": "Product", "offers": {"price": "99"}}]
        }));
        assert_eq!(set.offers[0].price.as_deref(), Some("10"));
    }

    #[test]
    fn test_type_matching_is_case_insensitive() {
        let set = resolve(json!({"@type": ["PRODUCT", "Thing"], "name": "Loud"}));
        assert_eq!(set.product.unwrap().name.as_deref(), Some("Loud"));
    }

    #[test]
    fn test_nested_brand_and_manufacturer() {
        let set = resolve(json!({
            "@type": "Product",
            "name": "Kettle",
            "brand": {"@type": "Brand", "name": "Boil"},
            "manufacturer": {"@type": "Organization", "name": "Boil Industries"}
        }));

        assert_eq!(set.product.unwrap().brand.as_deref(), Some("Boil"));
        let brand = set.brand.unwrap();
        assert_eq!(brand.source, Source::ProductNested);
        let org = set.organization.unwrap();
        assert_eq!(org.name.as_deref(), Some("Boil Industries"));
        assert_eq!(org.source, Source::ProductNested);
    }

    #[test]
    fn test_faq_breadcrumb_and_page_wrapper() {
        let set = resolve(json!([
            {"@type": "FAQPage", "mainEntity": [
                {"@type": "Question", "name": "Is it washable?",
                 "acceptedAnswer": {"@type": "Answer", "text": "<p>Yes, cold wash.</p>"}},
                {"@type": "Question", "name": "Does it shrink?"}
            ]},
            {"@type": "BreadcrumbList", "itemListElement": [
                {"@type": "ListItem", "position": 2, "name": "Tees", "item": "https://x/tees"},
                {"@type": "ListItem", "position": 1, "item": {"@id": "https://x/", "name": "Home"}}
            ]},
            {"@type": "WebPage", "dateModified": "2024-04-02",
             "mainEntity": {"@type": "Product", "name": "Wrapped"}}
        ]));

        let faq = set.faq.unwrap();
        assert_eq!(faq.question_count, 2);
        assert_eq!(faq.questions[0].answer.as_deref(), Some("Yes, cold wash."));

        let crumbs = set.breadcrumb.unwrap();
        assert_eq!(crumbs.item_count, 2);
        assert_eq!(crumbs.items[0].name.as_deref(), Some("Home"));
        assert_eq!(crumbs.items[0].url.as_deref(), Some("https://x/"));

        assert_eq!(set.product.unwrap().name.as_deref(), Some("Wrapped"));
        assert_eq!(
            set.dates.unwrap().date_modified.as_deref(),
            Some("2024-04-02")
        );
    }

    #[test]
    fn test_additional_properties_and_reviews() {
        let set = resolve(json!({
            "@type": "Product",
            "name": "Drill",
            "additionalProperty": [
                {"@type": "PropertyValue", "name": "Voltage", "value": 18, "unitText": "V"},
                {"@type": "PropertyValue", "name": "Chuck size", "value": "13 mm"}
            ],
            "review": [{"@type": "Review", "author": {"@type": "Person", "name": "Sam"},
                        "datePublished": "2024-01-02", "reviewBody": "Strong.",
                        "reviewRating": {"@type": "Rating", "ratingValue": 5}}]
        }));

        let product = set.product.unwrap();
        assert_eq!(product.additional_properties.len(), 2);
        assert_eq!(product.additional_properties[0].value, "18 V");
        assert_eq!(set.reviews.len(), 1);
        assert_eq!(set.reviews[0].author.as_deref(), Some("Sam"));
        assert_eq!(set.reviews[0].rating, Some(5.0));
        // Review dates are not page dates
        assert!(set.dates.is_none());
    }
}
