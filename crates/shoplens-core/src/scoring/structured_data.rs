//! Structured Data category

use super::factor_names::*;
use super::{Category, CategoryScore, Factor, Status};
use crate::extract::ExtractionResult;
use crate::structured_data::ProductEntity;

/// Per-field sub-weights of the Product Schema factor
const PRODUCT_FIELDS: &[(&str, f64)] = &[
    ("name", 3.0),
    ("description", 2.0),
    ("image", 2.0),
    ("offers", 2.0),
    ("brand", 1.0),
    ("identifiers", 1.0),
    ("rating", 1.0),
];

pub(super) fn score(extraction: &ExtractionResult) -> CategoryScore {
    let schemas = &extraction.structured_data.schemas;
    let product = schemas.product.as_ref();

    let mut factors = vec![product_schema(product)];

    factors.push(match schemas.offers.first() {
        None => Factor::fail(OFFER_DETAILS, 15, "No Offer with price and availability"),
        Some(offer) => {
            let points = [
                (offer.price.is_some(), 6.0),
                (offer.currency.is_some(), 4.0),
                (offer.availability.is_some(), 5.0),
            ]
            .iter()
            .filter(|(present, _)| *present)
            .map(|(_, w)| w)
            .sum::<f64>();
            let status = if points >= 15.0 { Status::Pass } else { Status::Warning };
            Factor::new(
                OFFER_DETAILS,
                15,
                points,
                status,
                format!(
                    "{} offer(s); price {}, currency {}, availability {}",
                    schemas.offers.len(),
                    offer.price.as_deref().unwrap_or("missing"),
                    offer.currency.as_deref().unwrap_or("missing"),
                    offer.availability.as_deref().unwrap_or("missing"),
                ),
            )
        }
    });

    let identifiers = product.map_or(0, ProductEntity::identifier_count);
    factors.push(match identifiers {
        0 => Factor::fail(PRODUCT_IDENTIFIERS, 10, "No GTIN, MPN or SKU"),
        1 => Factor::new(PRODUCT_IDENTIFIERS, 10, 5.0, Status::Warning, "Only one of GTIN, MPN, SKU"),
        n => Factor::new(PRODUCT_IDENTIFIERS, 10, 10.0, Status::Pass, format!("{n} identifiers")),
    });

    factors.push(match &schemas.aggregate_rating {
        Some(rating) if rating.rating_value.is_some() && rating.review_count.is_some_and(|c| c > 0) => {
            Factor::new(
                AGGREGATE_RATING,
                15,
                15.0,
                Status::Pass,
                format!(
                    "{:.1} from {} reviews ({})",
                    rating.rating_value.unwrap_or_default(),
                    rating.review_count.unwrap_or_default(),
                    rating.source
                ),
            )
        }
        Some(rating) if rating.rating_value.is_some() => Factor::new(
            AGGREGATE_RATING,
            15,
            10.0,
            Status::Warning,
            "Rating without reviewCount",
        ),
        _ => Factor::fail(AGGREGATE_RATING, 15, "No AggregateRating"),
    });

    factors.push(match &schemas.breadcrumb {
        Some(b) if b.item_count >= 2 => Factor::new(
            BREADCRUMB_SCHEMA,
            10,
            10.0,
            Status::Pass,
            format!("{} levels ({})", b.item_count, b.source),
        ),
        Some(_) => Factor::new(BREADCRUMB_SCHEMA, 10, 5.0, Status::Warning, "Single-level breadcrumb"),
        None => Factor::fail(BREADCRUMB_SCHEMA, 10, "No BreadcrumbList"),
    });

    let has_org = schemas.organization.is_some();
    let has_brand = schemas.brand.is_some() || product.is_some_and(|p| p.brand.is_some());
    let org_points = if has_org { 5.0 } else { 0.0 } + if has_brand { 5.0 } else { 0.0 };
    factors.push(Factor::new(
        ORGANIZATION_BRAND,
        10,
        org_points,
        match (has_org, has_brand) {
            (true, true) => Status::Pass,
            (false, false) => Status::Fail,
            _ => Status::Warning,
        },
        format!(
            "Organization {}, brand {}",
            if has_org { "present" } else { "missing" },
            if has_brand { "present" } else { "missing" }
        ),
    ));

    let faq_count = extraction.content_quality.faq.count;
    factors.push(match &schemas.faq {
        Some(faq) => Factor::new(
            FAQ_SCHEMA,
            10,
            10.0,
            Status::Pass,
            format!("FAQPage with {} questions", faq.question_count),
        ),
        None if faq_count > 0 => Factor::fail(
            FAQ_SCHEMA,
            10,
            format!("{faq_count} FAQ questions on the page without FAQPage markup"),
        ),
        None => Factor::new(FAQ_SCHEMA, 10, 0.0, Status::Warning, "No FAQ content"),
    });

    CategoryScore::from_factors(Category::StructuredData, factors)
}

fn product_schema(product: Option<&ProductEntity>) -> Factor {
    let Some(product) = product else {
        return Factor::critical_fail(PRODUCT_SCHEMA, 30, "No Product or ProductGroup schema found");
    };

    let present = |field: &str| match field {
        "name" => product.name.is_some(),
        "description" => product.description.is_some(),
        "image" => product.image.is_some(),
        "offers" => product.has_offer,
        "brand" => product.brand.is_some(),
        "identifiers" => product.identifier_count() > 0,
        "rating" => product.has_rating,
        _ => false,
    };

    let total: f64 = PRODUCT_FIELDS.iter().map(|(_, w)| w).sum();
    let earned: f64 = PRODUCT_FIELDS
        .iter()
        .filter(|(field, _)| present(field))
        .map(|(_, w)| w)
        .sum();
    let missing: Vec<&str> = PRODUCT_FIELDS
        .iter()
        .filter(|(field, _)| !present(field))
        .map(|(field, _)| *field)
        .collect();

    let kind = if product.is_product_group { "ProductGroup" } else { "Product" };
    let details = if missing.is_empty() {
        format!("{kind} ({}) with all key fields", product.source)
    } else {
        format!("{kind} ({}) missing {}", product.source, missing.join(", "))
    };
    let status = if earned >= 10.0 { Status::Pass } else { Status::Warning };

    Factor::new(PRODUCT_SCHEMA, 30, earned / total * 30.0, status, details)
}
