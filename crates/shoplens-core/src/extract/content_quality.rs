//! Content quality: description, specifications, features, FAQ and product
//! details
//!
//! Every signal uses the same two tiers. Tier 1 walks an ordered selector list
//! (generic, then platform-specific, then attribute-substring) and takes the
//! first sufficient match. Tier 2 reads the Product entity and its
//! `additionalProperty` entries, and only runs when tier 1 comes up short.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use serde::{Deserialize, Serialize};

use super::trust::detect_warranty;
use crate::document::{PageDocument, element_text, has_ancestor, select_in};
use crate::structured_data::{ProductEntity, PropertyValue, SchemaEntitySet};
use crate::text::{snippet, strip_tags, word_count};
use crate::types::{PatternMatch, Source};

/// Minimum description length, in characters, for a DOM match to count
pub const MIN_DESCRIPTION_CHARS: usize = 50;

/// Fewer DOM specifications than this lets the schema tier take over
const MIN_DOM_SPECS: usize = 3;

const DESCRIPTION_SELECTORS: &[&str] = &[
    "[itemprop='description']",
    ".product-description",
    "#product-description",
    "#description",
    // Shopify
    ".product__description",
    ".product-single__description",
    // WooCommerce
    ".woocommerce-product-details__short-description",
    "#tab-description",
    // Magento
    ".product.attribute.description",
    "[data-product-description]",
    "[class*='product-description']",
    "[class*='description']",
    "[id*='description']",
];

const SPEC_CONTAINER_SELECTORS: &[&str] = &[
    "#specifications",
    ".specifications",
    ".product-specs",
    ".product-specifications",
    ".spec-table",
    "#tab-additional_information",
    ".additional-attributes",
    "[class*='spec']",
    "[id*='spec']",
    "[class*='technical']",
    "[class*='attributes']",
];

const FEATURE_SELECTORS: &[&str] = &[
    ".product-features li",
    ".features li",
    "#features li",
    "[class*='feature'] li",
    "[class*='benefit'] li",
    "[class*='highlight'] li",
    "[class*='key-points'] li",
];

const FAQ_SELECTORS: &[&str] = &[
    "[itemtype*='schema.org/Question']",
    "[class*='faq'] details summary",
    "[id*='faq'] details summary",
    "[class*='faq'] [class*='question']",
    "[id*='faq'] [class*='question']",
    "[class*='faq'] dt",
    "[id*='faq'] dt",
    "[class*='faq'] h3",
    "[id*='faq'] h3",
    "[class*='faq'] h4",
];

const CHROME_TAGS: &[&str] = &["nav", "header", "footer"];
const CHROME_ROLES: &[&str] = &["navigation", "banner", "contentinfo"];

static RE_SPEC_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^:\n\r]{2,40}):[^\S\r\n]*([^\n\r]{1,120})$").expect("invalid spec line regex")
});

static RE_EMPHASIS_DASH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\n\r\-\x{2013}\x{2014}]{2,60}[^\S\r\n]+[\-\x{2013}\x{2014}][^\S\r\n]+\S")
        .expect("invalid emphasis dash regex")
});

static RE_BENEFIT_OPENER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:keeps|provides|delivers|offers|helps|ensures|protects|reduces|improves|allows|lets|makes|gives|prevents|supports|designed[^\S\r\n]+(?:to|for)|made[^\S\r\n]+(?:to|for)|perfect[^\S\r\n]+for|ideal[^\S\r\n]+for|built[^\S\r\n]+(?:to|for))\b",
    )
    .expect("invalid benefit regex")
});

static RE_DIMENSIONS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:dimensions?|measurements?|size)[^\S\r\n]*:[^\n\r]{1,60}",
        r#"(?i)\b\d+(?:[.,]\d+)?[^\S\r\n]*(?:x|\x{00d7})[^\S\r\n]*\d+(?:[.,]\d+)?(?:[^\S\r\n]*(?:x|\x{00d7})[^\S\r\n]*\d+(?:[.,]\d+)?)?[^\S\r\n]*(?:mm|cm|m|in|inches|inch|ft|")"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid dimensions regex"))
    .collect()
});

static RE_MATERIALS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:made[^\S\r\n]+(?:of|from|with)|materials?[^\S\r\n]*:|fabric[^\S\r\n]*:|composition[^\S\r\n]*:|constructed[^\S\r\n]+(?:of|from))[^\n\r]{1,60}",
        r"(?i)\b\d{1,3}%[^\S\r\n]+(?:organic[^\S\r\n]+|recycled[^\S\r\n]+)?(?:cotton|polyester|wool|linen|silk|nylon|leather|bamboo|cashmere|spandex|elastane|merino)\b[^\n\r]{0,40}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid materials regex"))
    .collect()
});

static RE_CARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:care[^\S\r\n]+instructions?|machine[^\S\r\n]+wash(?:able)?|hand[^\S\r\n]+wash|dry[^\S\r\n]+clean(?:[^\S\r\n]+only)?|dishwasher[^\S\r\n]+safe|do[^\S\r\n]+not[^\S\r\n]+bleach|tumble[^\S\r\n]+dry|wipe[^\S\r\n]+clean)\b[^\n\r]{0,60}",
    )
    .expect("invalid care regex")
});

static RE_COMPATIBILITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:not[^\S\r\n]+)?compatible[^\S\r\n]+with|compatibility[^\S\r\n]*:|works[^\S\r\n]+with|fits[^\S\r\n]+(?:models?|all|most)|designed[^\S\r\n]+for[^\S\r\n]+use[^\S\r\n]+with|for[^\S\r\n]+use[^\S\r\n]+with|replacement[^\S\r\n]+for)\b[^\n\r]{1,80}",
    )
    .expect("invalid compatibility regex")
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionSignal {
    pub found: bool,
    /// Opening of the description, truncated for display
    pub preview: Option<String>,
    pub length: usize,
    pub word_count: usize,
    pub source: Option<Source>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specification {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificationSignal {
    pub count: usize,
    pub items: Vec<Specification>,
    pub has_table: bool,
    pub source: Option<Source>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSignal {
    pub count: usize,
    pub items: Vec<String>,
    pub source: Option<Source>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqSignal {
    pub count: usize,
    /// FAQPage markup exists, whatever the DOM shows
    pub has_schema: bool,
    pub questions: Vec<String>,
    pub source: Option<Source>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub dimensions: Option<PatternMatch>,
    pub materials: Option<PatternMatch>,
    pub care_instructions: Option<PatternMatch>,
    pub warranty: Option<PatternMatch>,
    pub compatibility: Option<PatternMatch>,
}

impl ProductDetails {
    /// How many of the five detail kinds were found
    pub fn count(&self) -> usize {
        [
            &self.dimensions,
            &self.materials,
            &self.care_instructions,
            &self.warranty,
            &self.compatibility,
        ]
        .iter()
        .filter(|d| d.is_some())
        .count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentQuality {
    pub description: DescriptionSignal,
    pub specifications: SpecificationSignal,
    pub features: FeatureSignal,
    pub faq: FaqSignal,
    pub details: ProductDetails,
    /// Words of visible page text
    pub word_count: usize,
}

pub fn extract_content_quality(doc: &PageDocument, schemas: &SchemaEntitySet) -> ContentQuality {
    let product = schemas.product.as_ref();

    ContentQuality {
        description: description(doc, product),
        specifications: specifications(doc, product),
        features: features(doc, product),
        faq: faq(doc, schemas),
        details: product_details(doc.page_text(), product),
        word_count: word_count(doc.page_text()),
    }
}

fn description(doc: &PageDocument, product: Option<&ProductEntity>) -> DescriptionSignal {
    let dom = DESCRIPTION_SELECTORS.iter().find_map(|selector| {
        doc.select(selector).into_iter().find_map(|el| {
            let text = match el.value().name() {
                "meta" => el.value().attr("content").unwrap_or_default().trim().to_string(),
                _ => element_text(&el),
            };
            (text.chars().count() > MIN_DESCRIPTION_CHARS).then_some(text)
        })
    });

    let (text, source) = match dom {
        Some(text) => (text, Source::Dom),
        None => match product.and_then(|p| p.description.as_deref()).map(strip_tags) {
            Some(text) if !text.is_empty() => {
                log::debug!("description falls back to structured data");
                (text, product.map_or(Source::Schema, |p| p.source))
            }
            _ => return DescriptionSignal::default(),
        },
    };

    DescriptionSignal {
        found: true,
        preview: Some(snippet(&text)),
        length: text.chars().count(),
        word_count: word_count(&text),
        source: Some(source),
    }
}

/// A short "Label: Value" line
fn spec_line(text: &str) -> Option<Specification> {
    let caps = RE_SPEC_LINE.captures(text.trim())?;
    let name = caps[1].trim().to_string();
    let value = caps[2].trim().to_string();
    if name.is_empty() || value.is_empty() {
        return None;
    }
    Some(Specification { name, value })
}

fn is_chrome(el: &ElementRef<'_>) -> bool {
    has_ancestor(el, CHROME_TAGS, CHROME_ROLES)
}

fn table_specs(scope: &ElementRef<'_>) -> Vec<Specification> {
    select_in(scope, "tr")
        .iter()
        .filter_map(|row| {
            let cells: Vec<String> = row
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|c| matches!(c.value().name(), "th" | "td"))
                .map(|c| element_text(&c))
                .collect();
            match cells.as_slice() {
                [name, value] if !name.is_empty() && !value.is_empty() && name.chars().count() <= 60 => {
                    Some(Specification {
                        name: name.trim_end_matches(':').to_string(),
                        value: value.clone(),
                    })
                }
                _ => None,
            }
        })
        .collect()
}

fn definition_specs(scope: &ElementRef<'_>) -> Vec<Specification> {
    select_in(scope, "dt")
        .iter()
        .filter_map(|dt| {
            let dd = dt
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .next()
                .filter(|sibling| sibling.value().name() == "dd")?;
            let name = element_text(dt);
            let value = element_text(&dd);
            (!name.is_empty() && !value.is_empty()).then(|| Specification {
                name: name.trim_end_matches(':').to_string(),
                value,
            })
        })
        .collect()
}

fn list_specs(scope: &ElementRef<'_>) -> Vec<Specification> {
    select_in(scope, "li")
        .iter()
        .filter(|li| !is_chrome(li))
        .filter_map(|li| spec_line(&element_text(li)))
        .collect()
}

fn specs_in(scope: &ElementRef<'_>) -> (Vec<Specification>, bool) {
    let from_table = table_specs(scope);
    let has_table = !from_table.is_empty();
    let mut items = from_table;
    items.extend(definition_specs(scope));
    items.extend(list_specs(scope));
    (items, has_table)
}

fn dedup_specs(items: &mut Vec<Specification>) {
    let mut seen = std::collections::HashSet::new();
    items.retain(|s| seen.insert(s.name.to_lowercase()));
}

fn schema_specs(product: &ProductEntity) -> Vec<Specification> {
    let mut items: Vec<Specification> = product
        .additional_properties
        .iter()
        .map(|PropertyValue { name, value }| Specification {
            name: name.clone(),
            value: value.clone(),
        })
        .collect();

    let fields = [
        ("Material", &product.material),
        ("Color", &product.color),
        ("Weight", &product.weight),
        ("Dimensions", &product.dimensions),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            items.push(Specification {
                name: name.to_string(),
                value: value.clone(),
            });
        }
    }

    dedup_specs(&mut items);
    items
}

fn specifications(doc: &PageDocument, product: Option<&ProductEntity>) -> SpecificationSignal {
    let mut dom = SPEC_CONTAINER_SELECTORS
        .iter()
        .flat_map(|selector| doc.select(selector))
        .filter(|el| !is_chrome(el))
        .map(|el| specs_in(&el))
        .find(|(items, _)| !items.is_empty());

    // No labelled container: any two-column table or definition list
    if dom.is_none() {
        let root = doc.html().root_element();
        let tables: Vec<Specification> = select_in(&root, "table")
            .iter()
            .filter(|t| !is_chrome(t))
            .flat_map(table_specs)
            .collect();
        let has_table = !tables.is_empty();
        let mut items = tables;
        items.extend(
            select_in(&root, "dl")
                .iter()
                .filter(|dl| !is_chrome(dl))
                .flat_map(definition_specs),
        );
        if !items.is_empty() {
            dom = Some((items, has_table));
        }
    }

    let (mut items, has_table) = dom.unwrap_or_default();
    dedup_specs(&mut items);

    let schema_items = product.map(schema_specs).unwrap_or_default();
    if items.len() < MIN_DOM_SPECS && schema_items.len() > items.len() {
        log::debug!(
            "specifications fall back to structured data ({} DOM, {} schema)",
            items.len(),
            schema_items.len()
        );
        return SpecificationSignal {
            count: schema_items.len(),
            items: schema_items,
            has_table,
            source: product.map(|p| p.source),
        };
    }

    SpecificationSignal {
        count: items.len(),
        source: (!items.is_empty()).then_some(Source::Dom),
        items,
        has_table,
    }
}

/// A list item that reads like a benefit rather than a spec
fn is_feature_item(li: &ElementRef<'_>, text: &str) -> bool {
    if spec_line(text).is_some() {
        return false;
    }
    let emphasized = !select_in(li, "strong, b, em").is_empty();
    (emphasized && RE_EMPHASIS_DASH.is_match(text)) || RE_BENEFIT_OPENER.is_match(text)
}

fn features(doc: &PageDocument, product: Option<&ProductEntity>) -> FeatureSignal {
    let usable = |text: &str| {
        let len = text.chars().count();
        (3..=300).contains(&len) && spec_line(text).is_none()
    };

    let mut items: Vec<String> = FEATURE_SELECTORS
        .iter()
        .map(|selector| {
            doc.select(selector)
                .into_iter()
                .filter(|li| !is_chrome(li))
                .map(|li| element_text(&li))
                .filter(|text| usable(text))
                .collect::<Vec<_>>()
        })
        .find(|found| !found.is_empty())
        .unwrap_or_default();

    // Unlabelled lists: only items that read like features
    if items.is_empty() {
        items = doc
            .select("li")
            .into_iter()
            .filter(|li| !is_chrome(li))
            .filter_map(|li| {
                let text = element_text(&li);
                (usable(&text) && is_feature_item(&li, &text)).then_some(text)
            })
            .collect();
    }

    let mut seen = std::collections::HashSet::new();
    items.retain(|item| seen.insert(item.to_lowercase()));

    if !items.is_empty() {
        return FeatureSignal {
            count: items.len(),
            items,
            source: Some(Source::Dom),
        };
    }

    let schema_items: Vec<String> = product
        .map(|p| {
            p.additional_properties
                .iter()
                .filter(|prop| {
                    let name = prop.name.to_lowercase();
                    name.contains("feature") || name.contains("highlight")
                })
                .flat_map(|prop| {
                    prop.value
                        .split([';', '|'])
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty())
                        .collect::<Vec<_>>()
                })
                .collect()
        })
        .unwrap_or_default();

    FeatureSignal {
        count: schema_items.len(),
        source: (!schema_items.is_empty()).then(|| product.map_or(Source::Schema, |p| p.source)),
        items: schema_items,
    }
}

fn question_text(el: &ElementRef<'_>) -> String {
    select_in(el, "[itemprop='name']")
        .first()
        .map(element_text)
        .unwrap_or_else(|| element_text(el))
}

fn faq(doc: &PageDocument, schemas: &SchemaEntitySet) -> FaqSignal {
    let has_schema = schemas.faq.is_some();

    let mut questions: Vec<String> = FAQ_SELECTORS
        .iter()
        .map(|selector| {
            doc.select(selector)
                .into_iter()
                .filter(|el| !is_chrome(el))
                .map(|el| question_text(&el))
                .filter(|q| !q.is_empty())
                .collect::<Vec<_>>()
        })
        .find(|found| !found.is_empty())
        .unwrap_or_default();

    // Question-shaped disclosure headings with no FAQ container
    if questions.is_empty() {
        let asked: Vec<String> = doc
            .select("details summary, dt, h2, h3, h4")
            .into_iter()
            .filter(|el| !is_chrome(el))
            .map(|el| element_text(&el))
            .filter(|q| q.ends_with('?'))
            .collect();
        if asked.len() >= 2 {
            questions = asked;
        }
    }

    let mut seen = std::collections::HashSet::new();
    questions.retain(|q| seen.insert(q.to_lowercase()));

    if !questions.is_empty() {
        return FaqSignal {
            count: questions.len(),
            has_schema,
            questions,
            source: Some(Source::Dom),
        };
    }

    match &schemas.faq {
        Some(faq) if faq.question_count > 0 => FaqSignal {
            count: faq.question_count,
            has_schema,
            questions: faq.questions.iter().map(|q| q.question.clone()).collect(),
            source: Some(faq.source),
        },
        _ => FaqSignal {
            has_schema,
            ..Default::default()
        },
    }
}

fn first_match(patterns: &[Regex], text: &str, label: &str) -> Option<PatternMatch> {
    patterns.iter().find_map(|re| re.find(text)).map(|m| PatternMatch {
        label: label.to_string(),
        text: snippet(m.as_str()),
        source: Source::Dom,
    })
}

fn schema_detail(product: Option<&ProductEntity>, label: &str, value: Option<&str>) -> Option<PatternMatch> {
    let product = product?;
    let value = value?;
    Some(PatternMatch {
        label: label.to_string(),
        text: snippet(value),
        source: product.source,
    })
}

fn property_named<'p>(product: Option<&'p ProductEntity>, needle: &str) -> Option<&'p str> {
    product?
        .additional_properties
        .iter()
        .find(|p| p.name.to_lowercase().contains(needle))
        .map(|p| p.value.as_str())
}

fn product_details(text: &str, product: Option<&ProductEntity>) -> ProductDetails {
    let dimensions = first_match(&RE_DIMENSIONS, text, "dimensions").or_else(|| {
        let value = product.and_then(|p| p.dimensions.as_deref().or(p.weight.as_deref()));
        schema_detail(product, "dimensions", value)
    });

    let materials = first_match(&RE_MATERIALS, text, "materials").or_else(|| {
        let value = product
            .and_then(|p| p.material.as_deref())
            .or_else(|| property_named(product, "material"));
        schema_detail(product, "materials", value)
    });

    let care_instructions = first_match(std::slice::from_ref(&*RE_CARE), text, "care")
        .or_else(|| schema_detail(product, "care", property_named(product, "care")));

    // A negated warranty statement suppresses the schema tier too
    let warranty_signal = detect_warranty(text);
    let warranty = if warranty_signal.has_warranty {
        warranty_signal.text.map(|text| PatternMatch {
            label: "warranty".to_string(),
            text,
            source: Source::Dom,
        })
    } else if warranty_signal.negated {
        None
    } else {
        schema_detail(product, "warranty", property_named(product, "warrant"))
    };

    let compatibility = first_match(std::slice::from_ref(&*RE_COMPATIBILITY), text, "compatibility")
        .or_else(|| schema_detail(product, "compatibility", property_named(product, "compatib")));

    ProductDetails {
        dimensions,
        materials,
        care_instructions,
        warranty,
        compatibility,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured_data::resolve_structured_data;
    use chrono::Utc;

    fn quality(html: &str) -> ContentQuality {
        let doc = PageDocument::parse(html, "https://shop.example.com/products/drill", Utc::now());
        let sd = resolve_structured_data(&doc);
        extract_content_quality(&doc, &sd.schemas)
    }

    const LONG_TEXT: &str = "A compact cordless drill with a brushless motor, two batteries \
        and a fast charger for weekend projects around the house.";

    #[test]
    fn test_description_from_dom() {
        let cq = quality(&format!(
            r#"<div class="product__description"><p>{LONG_TEXT}</p></div>"#
        ));
        assert!(cq.description.found);
        assert_eq!(cq.description.source, Some(Source::Dom));
        assert!(cq.description.word_count > 15);
    }

    #[test]
    fn test_short_dom_description_falls_back_to_schema() {
        let cq = quality(&format!(
            r#"<div class="product-description">Great drill.</div>
            <script type="application/ld+json">
            {{"@type": "Product", "name": "Drill", "description": "<p>{LONG_TEXT}</p>"}}
            </script>"#
        ));
        assert!(cq.description.found);
        assert_eq!(cq.description.source, Some(Source::Schema));
        assert!(!cq.description.preview.unwrap().contains("<p>"));
    }

    #[test]
    fn test_specifications_from_table_and_colon_lines() {
        let cq = quality(r#"
            <section id="specifications">
                <table>
                    <tr><th>Voltage</th><td>18 V</td></tr>
                    <tr><th>Chuck</th><td>13 mm</td></tr>
                </table>
                <ul><li>Weight: 1.4 kg</li></ul>
            </section>
        "#);
        let specs = cq.specifications;
        assert_eq!(specs.count, 3);
        assert!(specs.has_table);
        assert_eq!(specs.source, Some(Source::Dom));
        assert_eq!(specs.items[2].name, "Weight");
    }

    #[test]
    fn test_specifications_fall_back_to_additional_property() {
        let cq = quality(r#"
            <script type="application/ld+json">
            {"@type": "Product", "name": "Drill",
             "additionalProperty": [
                {"@type": "PropertyValue", "name": "Voltage", "value": "18", "unitText": "V"},
                {"@type": "PropertyValue", "name": "Torque", "value": "60", "unitText": "Nm"},
                {"@type": "PropertyValue", "name": "Speeds", "value": "2"}
             ]}
            </script>
        "#);
        assert_eq!(cq.specifications.count, 3);
        assert_eq!(cq.specifications.source, Some(Source::Schema));
    }

    #[test]
    fn test_features_skip_navigation_and_specs() {
        let cq = quality(r#"
            <nav><ul class="feature-menu"><li>Shop all features</li></ul></nav>
            <ul>
                <li><strong>Brushless motor</strong> - runs cooler and lasts longer</li>
                <li>Provides 60 Nm of torque for tough screws</li>
                <li>Voltage: 18 V</li>
                <li>Contact us</li>
            </ul>
        "#);
        let features = cq.features;
        assert_eq!(features.count, 2);
        assert!(features.items.iter().all(|f| !f.contains("Shop all")));
        assert!(features.items.iter().all(|f| !f.starts_with("Voltage")));
    }

    #[test]
    fn test_labelled_feature_list() {
        let cq = quality(r#"
            <div class="product-features"><ul>
                <li>LED work light</li><li>Belt clip</li><li>Keyless chuck</li>
            </ul></div>
        "#);
        assert_eq!(cq.features.count, 3);
    }

    #[test]
    fn test_faq_dom_then_schema() {
        let cq = quality(r#"
            <div class="faq">
                <details><summary>Does it include batteries?</summary><p>Yes, two.</p></details>
                <details><summary>Is there a warranty?</summary><p>Three years.</p></details>
            </div>
        "#);
        assert_eq!(cq.faq.count, 2);
        assert_eq!(cq.faq.source, Some(Source::Dom));
        assert!(!cq.faq.has_schema);

        let cq = quality(r#"
            <script type="application/ld+json">
            {"@type": "FAQPage", "mainEntity": [
                {"@type": "Question", "name": "Does it fit 1/4 in bits?",
                 "acceptedAnswer": {"@type": "Answer", "text": "Yes."}}
            ]}
            </script>
        "#);
        assert_eq!(cq.faq.count, 1);
        assert!(cq.faq.has_schema);
        assert_eq!(cq.faq.source, Some(Source::Schema));
    }

    #[test]
    fn test_product_details() {
        let cq = quality(r#"
            <p>Dimensions: 20 x 8 x 22 cm</p>
            <p>Made from glass-filled nylon.</p>
            <p>Wipe clean with a damp cloth.</p>
            <p>Backed by a 3-year warranty.</p>
            <p>Compatible with all 18V batteries from the same range.</p>
        "#);
        let details = cq.details;
        assert_eq!(details.count(), 5);
        assert!(details.compatibility.unwrap().text.starts_with("Compatible with"));
        assert!(details.warranty.unwrap().text.contains("3-year warranty"));
    }

    #[test]
    fn test_negated_warranty_skips_schema() {
        let cq = quality(r#"
            <p>Sold without warranty.</p>
            <script type="application/ld+json">
            {"@type": "Product", "name": "Drill",
             "additionalProperty": [{"@type": "PropertyValue", "name": "Warranty", "value": "1 year"}]}
            </script>
        "#);
        assert!(cq.details.warranty.is_none());
    }

    #[test]
    fn test_empty_document() {
        let cq = quality("");
        assert_eq!(cq, ContentQuality::default());
    }
}
