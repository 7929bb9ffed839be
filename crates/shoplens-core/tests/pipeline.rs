//! End-to-end properties of the extraction, scoring and recommendation pipeline

use chrono::{DateTime, TimeZone, Utc};
use shoplens_core::extract::trust::detect_warranty;
use shoplens_core::scoring::factor_names::{FAQ_SCHEMA, OG_IMAGE_FORMAT, PRODUCT_SCHEMA};
use shoplens_core::scoring::weights::CATEGORY_WEIGHTS;
use shoplens_core::{
    AnalysisOptions, Category, Grade, NetworkFacts, PageDocument, PurchaseContext, Status, analyze,
    resolve_structured_data,
};

const URL: &str = "https://shop.example.com/products/trail-lantern";

fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
}

fn options(context: PurchaseContext) -> AnalysisOptions {
    AnalysisOptions::new(URL)
        .with_context(context)
        .with_timestamp(timestamp())
}

fn page(head: &str, body: &str) -> String {
    format!("<!DOCTYPE html><html lang=\"en\"><head>{head}</head><body>{body}</body></html>")
}

const FULL_PAGE_HEAD: &str = r#"
    <title>Trail Lantern 400 | Example Outdoor</title>
    <meta name="description" content="The Trail Lantern 400 is a rechargeable camping lantern with 400 lumens and a 40-hour runtime.">
    <link rel="canonical" href="https://shop.example.com/products/trail-lantern">
    <meta property="og:title" content="Trail Lantern 400">
    <meta property="og:description" content="Rechargeable 400 lumen camping lantern">
    <meta property="og:type" content="product">
    <meta property="og:url" content="https://shop.example.com/products/trail-lantern">
    <meta property="og:image" content="https://cdn.example.com/lantern.jpg">
"#;

const FULL_PAGE_BODY: &str = r#"
    <main>
      <h1>Trail Lantern 400</h1>
      <div class="product-description">
        The Trail Lantern 400 lights a whole campsite with 400 lumens of warm light and
        runs for up to 40 hours on its lowest setting. Charge it over USB-C.
      </div>
      <table class="specifications">
        <tr><th>Brightness</th><td>400 lm</td></tr>
        <tr><th>Runtime</th><td>40 h</td></tr>
        <tr><th>Battery</th><td>5200 mAh</td></tr>
        <tr><th>Weight</th><td>310 g</td></tr>
      </table>
      <p>Compatible with any USB-C charger and most power banks.</p>
      <p>Backed by a 2-year warranty.</p>
    </main>
    <script type="application/ld+json">
    {"@context":"https://schema.org","@type":"Product","name":"Trail Lantern 400",
     "gtin13":"4006381333931","sku":"TL-400","brand":{"@type":"Brand","name":"Example Outdoor"},
     "offers":{"@type":"Offer","price":"49.00","priceCurrency":"EUR","availability":"https://schema.org/InStock"}}
    </script>
"#;

#[test]
fn test_pipeline_is_idempotent() {
    let html = page(FULL_PAGE_HEAD, FULL_PAGE_BODY);
    let facts = NetworkFacts::default();

    let first = analyze(&html, &options(PurchaseContext::Hybrid), &facts);
    let second = analyze(&html, &options(PurchaseContext::Hybrid), &facts);

    assert_eq!(
        serde_json::to_string(&first.score).unwrap(),
        serde_json::to_string(&second.score).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&first.recommendations).unwrap(),
        serde_json::to_string(&second.recommendations).unwrap()
    );
}

#[test]
fn test_weights_and_category_bounds_hold_for_every_context() {
    let total: u32 = CATEGORY_WEIGHTS.iter().map(|(_, w)| w).sum();
    assert_eq!(total, 100);

    let html = page(FULL_PAGE_HEAD, FULL_PAGE_BODY);
    for context in PurchaseContext::ALL {
        let analysis = analyze(&html, &options(context), &NetworkFacts::default());
        let weight_sum: f64 = analysis.score.categories.iter().map(|c| c.weight).sum();
        assert!((weight_sum - 1.0).abs() < 1e-9);
        for category in analysis.score.categories.iter() {
            assert!(category.score <= 100, "{} out of range", category.name);
        }
        assert!(analysis.score.total_score <= 100);
    }
}

#[test]
fn test_json_ld_shapes_resolve_identically() {
    let entity = r#"{"@type":"Product","name":"Trail Lantern","sku":"TL-400","offers":{"@type":"Offer","price":"49.00"}}"#;
    let shapes = [
        format!("[{entity}]"),
        format!(r#"{{"@context":"https://schema.org","@graph":[{entity}]}}"#),
        entity.to_string(),
    ];

    let products: Vec<_> = shapes
        .iter()
        .map(|json| {
            let html = page("", &format!(r#"<script type="application/ld+json">{json}</script>"#));
            let doc = PageDocument::parse(&html, URL, timestamp());
            resolve_structured_data(&doc).schemas.product
        })
        .collect();

    assert!(products[0].is_some());
    assert_eq!(products[0], products[1]);
    assert_eq!(products[1], products[2]);
}

#[test]
fn test_id_reference_resolves_rating() {
    let json = r##"{"@context":"https://schema.org","@graph":[
        {"@type":"ProductGroup","name":"Trail Lantern","productGroupID":"TL",
         "aggregateRating":{"@id":"#r"}},
        {"@type":"AggregateRating","@id":"#r","ratingValue":"4.7","reviewCount":"58"}
    ]}"##;
    let html = page("", &format!(r#"<script type="application/ld+json">{json}</script>"#));
    let doc = PageDocument::parse(&html, URL, timestamp());
    let schemas = resolve_structured_data(&doc).schemas;

    let product = schemas.product.unwrap();
    assert!(product.is_product_group);
    assert_eq!(schemas.aggregate_rating.unwrap().rating_value, Some(4.7));
}

#[test]
fn test_negative_warranty_guard() {
    let signal = detect_warranty("This product has no warranty");
    assert!(!signal.has_warranty);

    let signal = detect_warranty("Includes a 12-month warranty on parts");
    assert!(signal.has_warranty);
    assert!(signal.text.unwrap().contains("12-month warranty"));

    let analysis = analyze(
        &page("", "<p>This product has no warranty</p>"),
        &options(PurchaseContext::Hybrid),
        &NetworkFacts::default(),
    );
    assert!(!analysis.extraction.trust_signals.warranty.has_warranty);
    assert!(analysis.extraction.content_quality.details.warranty.is_none());
}

#[test]
fn test_webp_og_image_gates_format_factor() {
    let facts = NetworkFacts::from_json(
        r#"{"imageFormat":{"isWebP":true,"isValidFormat":false,"format":"webp","accessible":true}}"#,
    )
    .unwrap();
    let analysis = analyze(
        &page(FULL_PAGE_HEAD, FULL_PAGE_BODY),
        &options(PurchaseContext::Hybrid),
        &facts,
    );

    let format = analysis.score.categories.factor(OG_IMAGE_FORMAT).unwrap();
    assert_eq!(format.status, Status::Fail);
    assert_eq!(format.points, 0);
    assert!(format.critical);
    assert!(analysis.score.categories.protocol_meta.score <= 20);
    assert_eq!(analysis.recommendations.get("og-image-webp").unwrap().priority, 1);
}

#[test]
fn test_single_faq_recommendation_without_faq() {
    let analysis = analyze(
        &page(FULL_PAGE_HEAD, FULL_PAGE_BODY),
        &options(PurchaseContext::Hybrid),
        &NetworkFacts::default(),
    );
    assert_eq!(analysis.extraction.content_quality.faq.count, 0);

    let faq_ids: Vec<&str> = analysis
        .recommendations
        .iter()
        .map(|r| r.id.as_str())
        .filter(|id| id.starts_with("faq-"))
        .collect();
    assert_eq!(faq_ids, ["faq-missing"]);
}

#[test]
fn test_empty_faq_page_schema_counts_as_no_faq() {
    let body = format!(
        r#"{FULL_PAGE_BODY}<script type="application/ld+json">{{"@context":"https://schema.org","@type":"FAQPage"}}</script>"#
    );
    let analysis = analyze(
        &page(FULL_PAGE_HEAD, &body),
        &options(PurchaseContext::Hybrid),
        &NetworkFacts::default(),
    );

    assert!(analysis.extraction.structured_data.schemas.faq.is_none());
    assert!(!analysis.extraction.content_quality.faq.has_schema);
    let faq_schema = analysis.score.categories.factor(FAQ_SCHEMA).unwrap();
    assert_ne!(faq_schema.status, Status::Pass);
    assert_eq!(faq_schema.points, 0);
    assert!(analysis.recommendations.get("faq-missing").is_some());
}

#[test]
fn test_bare_minimum_page() {
    let analysis = analyze("", &options(PurchaseContext::Hybrid), &NetworkFacts::default());
    let score = &analysis.score;

    assert!(score.total_score < 15, "total {}", score.total_score);
    assert_eq!(score.grade, Grade::F);
    assert_eq!(score.categories.factor(PRODUCT_SCHEMA).unwrap().status, Status::Fail);
    assert!(score.categories.get(Category::StructuredData).has_critical());

    let recs = &analysis.recommendations;
    assert_eq!(recs.get("product-schema-missing").unwrap().priority, 1);
    assert_eq!(recs.get("og-image-missing").unwrap().priority, 1);
    assert_eq!(recs.top(1)[0].priority, 1);
}

#[test]
fn test_product_group_takes_gtin_from_later_variant() {
    let json = r#"{"@context":"https://schema.org","@type":"ProductGroup","name":"Trail Lantern",
        "productGroupID":"TL","hasVariant":[
            {"@type":"Product","name":"Trail Lantern Red","sku":"TL-R"},
            {"@type":"Product","name":"Trail Lantern Blue","sku":"TL-B"},
            {"@type":"Product","name":"Trail Lantern Green","gtin":"012345678905"}
        ]}"#;
    let html = page("", &format!(r#"<script type="application/ld+json">{json}</script>"#));
    let doc = PageDocument::parse(&html, URL, timestamp());
    let product = resolve_structured_data(&doc).schemas.product.unwrap();

    assert_eq!(product.gtin.as_deref(), Some("012345678905"));
    assert_eq!(product.sku.as_deref(), Some("TL"));
    assert_eq!(product.variant_count, 3);
}

#[test]
fn test_context_swap_changes_content_quality() {
    let html = page(FULL_PAGE_HEAD, FULL_PAGE_BODY);
    let want = analyze(&html, &options(PurchaseContext::Want), &NetworkFacts::default());
    let need = analyze(&html, &options(PurchaseContext::Need), &NetworkFacts::default());

    // Same extraction, different weighting
    assert_eq!(
        serde_json::to_string(&want.extraction.content_quality).unwrap(),
        serde_json::to_string(&need.extraction.content_quality).unwrap()
    );
    assert!(need.score.categories.content_quality.score > want.score.categories.content_quality.score);
    assert_eq!(want.score.context, PurchaseContext::Want);
}
