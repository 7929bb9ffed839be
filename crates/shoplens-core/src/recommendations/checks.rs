//! One check function per scoring category

use super::{CheckInput, Finding};
use crate::scoring::Status;
use crate::scoring::factor_names::*;
use crate::scoring::weights::ContextFactor;

const OG_IMAGE_MIN_WIDTH: u32 = 1200;
const OG_IMAGE_MIN_HEIGHT: u32 = 630;

fn factor_status(input: &CheckInput<'_>, name: &str) -> Option<Status> {
    input.score.categories.factor(name).map(|f| f.status)
}

pub(super) fn structured_data(input: &CheckInput<'_>) -> Vec<Finding> {
    let sd = &input.extraction.structured_data;
    let schemas = &sd.schemas;
    let mut out = Vec::new();

    if !sd.parse_errors.is_empty() {
        out.push(
            Finding::new("json-ld-parse-errors")
                .current(format!("{} of {} blocks invalid", sd.parse_errors.len(), sd.json_ld_blocks)),
        );
    }

    match &schemas.product {
        None => out.push(
            Finding::new("product-schema-missing")
                .current("No Product schema")
                .target("Product with name, image, offers, brand, identifiers and rating"),
        ),
        Some(product) => {
            if schemas.offers.is_empty() {
                out.push(Finding::new("offer-schema-missing"));
            }
            let ids = product.identifier_count();
            if ids < 2 {
                out.push(
                    Finding::new("product-identifiers-missing")
                        .current(format!("{ids} of GTIN, MPN, SKU"))
                        .target("At least 2 identifiers"),
                );
            }
        }
    }

    let reviews_on_page = input.extraction.trust_signals.reviews.count;
    if schemas.aggregate_rating.is_none() && reviews_on_page > 0 {
        out.push(
            Finding::new("aggregate-rating-missing")
                .current(format!("{reviews_on_page} reviews without AggregateRating")),
        );
    }

    if schemas.breadcrumb.is_none() {
        out.push(Finding::new("breadcrumb-schema-missing"));
    }
    if schemas.organization.is_none() {
        out.push(Finding::new("organization-schema-missing"));
    }

    // faq-missing and faq-thin cover the smaller counts
    let faq = &input.extraction.content_quality.faq;
    if faq.count >= 3 && !faq.has_schema {
        out.push(
            Finding::new("faq-schema-missing").current(format!("{} questions without FAQPage", faq.count)),
        );
    }

    out
}

pub(super) fn protocol_meta(input: &CheckInput<'_>) -> Vec<Finding> {
    let meta = &input.extraction.meta_tags;
    let og = &meta.open_graph;
    let mut out = Vec::new();

    match &og.image {
        None => out.push(Finding::new("og-image-missing").current("No og:image")),
        Some(_) => {
            if let Some(fact) = input.facts.image_format.as_ref().filter(|f| f.accessible) {
                if fact.is_webp {
                    out.push(
                        Finding::new("og-image-webp")
                            .current("og:image is WebP")
                            .target("JPEG or PNG"),
                    );
                } else if !fact.is_valid_format {
                    out.push(Finding::new("og-image-format").current(format!("og:image is {}", fact.format)));
                }
            }
            let large_enough = matches!(
                (og.image_width, og.image_height),
                (Some(w), Some(h)) if w >= OG_IMAGE_MIN_WIDTH && h >= OG_IMAGE_MIN_HEIGHT
            );
            if !large_enough || og.image_alt.is_none() {
                let current = match (og.image_width, og.image_height) {
                    (Some(w), Some(h)) => format!("{w}x{h}"),
                    _ => "No declared dimensions".to_string(),
                };
                out.push(
                    Finding::new("og-image-dimensions")
                        .current(current)
                        .target(format!("{OG_IMAGE_MIN_WIDTH}x{OG_IMAGE_MIN_HEIGHT} with og:image:alt")),
                );
            }
        }
    }

    let missing_og: Vec<&str> = [
        ("og:title", og.title.is_none()),
        ("og:description", og.description.is_none()),
        ("og:type", og.og_type.is_none()),
        ("og:url", og.url.is_none()),
    ]
    .into_iter()
    .filter(|(_, missing)| *missing)
    .map(|(name, _)| name)
    .collect();
    if !missing_og.is_empty() {
        out.push(Finding::new("og-tags-incomplete").current(format!("Missing {}", missing_og.join(", "))));
    }

    if meta.twitter.card.is_none() {
        out.push(Finding::new("twitter-card-missing"));
    }

    match &meta.description {
        None => out.push(Finding::new("meta-description-missing")),
        Some(_) if factor_status(input, META_DESCRIPTION) == Some(Status::Warning) => {
            let len = meta.description.as_deref().map_or(0, |d| d.chars().count());
            out.push(
                Finding::new("meta-description-length")
                    .current(format!("{len} characters"))
                    .target("50-160 characters"),
            );
        }
        Some(_) => {}
    }

    match &meta.title {
        None => out.push(Finding::new("title-missing")),
        Some(title) if factor_status(input, TITLE_TAG) == Some(Status::Warning) => out.push(
            Finding::new("title-length")
                .current(format!("{} characters", title.chars().count()))
                .target("20-70 characters"),
        ),
        Some(_) => {}
    }

    match &meta.canonical {
        None => out.push(Finding::new("canonical-missing")),
        Some(canonical) if !meta.canonical_valid => out.push(
            Finding::new("canonical-mismatch")
                .current(canonical.clone())
                .target(input.extraction.page_info.url.clone()),
        ),
        Some(_) => {}
    }

    if meta.noindex {
        out.push(Finding::new("robots-noindex").current(meta.robots.clone().unwrap_or_default()));
    }

    out
}

pub(super) fn content_quality(input: &CheckInput<'_>) -> Vec<Finding> {
    let cq = &input.extraction.content_quality;
    let mut out = Vec::new();

    if !cq.description.found {
        out.push(Finding::new("description-missing"));
    } else if cq.description.word_count < 75 {
        out.push(
            Finding::new("description-thin")
                .current(format!("{} words", cq.description.word_count))
                .target("150+ words"),
        );
    }

    if cq.specifications.count < 3 {
        out.push(
            Finding::new("specifications-missing")
                .contextual(ContextFactor::TechnicalSpecifications)
                .current(format!("{} specifications", cq.specifications.count))
                .target("8+ specifications"),
        );
    }

    if cq.details.compatibility.is_none() {
        out.push(Finding::new("compatibility-missing").contextual(ContextFactor::CompatibilityInfo));
    }

    if cq.features.count < 3 {
        out.push(
            Finding::new("features-missing")
                .contextual(ContextFactor::FeatureList)
                .current(format!("{} features", cq.features.count))
                .target("5+ features"),
        );
    }

    // Mutually exclusive, so at most one FAQ recommendation appears
    let faq = &cq.faq;
    if faq.count == 0 && !faq.has_schema {
        out.push(Finding::new("faq-missing").contextual(ContextFactor::FaqContent));
    } else if faq.count > 0 && faq.count < 3 {
        out.push(
            Finding::new("faq-thin")
                .contextual(ContextFactor::FaqContent)
                .current(format!("{} questions", faq.count))
                .target("3-5 questions"),
        );
    }

    let details = &cq.details;
    let stated = [
        details.dimensions.is_some(),
        details.materials.is_some(),
        details.care_instructions.is_some(),
        details.warranty.is_some(),
    ]
    .into_iter()
    .filter(|found| *found)
    .count();
    if stated < 2 {
        out.push(Finding::new("product-details-incomplete").current(format!("{stated} of 4 details")));
    }

    out
}

pub(super) fn content_structure(input: &CheckInput<'_>) -> Vec<Finding> {
    let cs = &input.extraction.content_structure;
    let mut out = Vec::new();

    match cs.headings.h1_count {
        0 => out.push(Finding::new("h1-missing")),
        1 => {}
        n => out.push(Finding::new("h1-multiple").current(format!("{n} h1 elements"))),
    }
    let any_heading = cs.headings.distribution.iter().any(|&n| n > 0);
    if any_heading && !cs.headings.proper_hierarchy {
        out.push(Finding::new("heading-hierarchy").current(cs.headings.hierarchy_issues.join("; ")));
    }

    if !cs.landmarks.has_main {
        out.push(Finding::new("main-landmark-missing"));
    }

    let images = &cs.images;
    if images.images_missing_alt > 0 {
        out.push(
            Finding::new("image-alt-missing")
                .current(format!("{} of {} images without alt", images.images_missing_alt, images.total_images)),
        );
    }

    if cs.js.js_dependent {
        out.push(Finding::new("js-dependent-content").current(match &cs.js.framework {
            Some(framework) => format!("{framework} root with {} characters", cs.js.root_text_length),
            None => format!("{} characters of body text", cs.js.body_text_length),
        }));
    }

    out
}

pub(super) fn authority_trust(input: &CheckInput<'_>) -> Vec<Finding> {
    let trust = &input.extraction.trust_signals;
    let reviews = &trust.reviews;
    let mut out = Vec::new();

    if reviews.count == 0 {
        out.push(Finding::new("reviews-missing").contextual(ContextFactor::ReviewCount));
    } else {
        match (reviews.most_recent, factor_status(input, REVIEW_RECENCY)) {
            (None, _) => out.push(Finding::new("review-dates-missing")),
            (Some(date), Some(Status::Warning)) => out.push(
                Finding::new("reviews-stale")
                    .current(format!("Most recent review {date}"))
                    .target("A review within the last 90 days"),
            ),
            _ => {}
        }
        if let Some(avg) = reviews.avg_word_count
            && avg < 50.0
        {
            out.push(
                Finding::new("reviews-shallow")
                    .contextual(ContextFactor::ReviewDepth)
                    .current(format!("{avg:.0} words on average"))
                    .target("50+ words"),
            );
        }
    }

    if trust.brand.name.is_none() {
        out.push(Finding::new("brand-missing"));
    }

    // A page that says "no warranty" is accurate, not incomplete
    if !trust.warranty.has_warranty && !trust.warranty.negated {
        out.push(Finding::new("warranty-missing"));
    }
    if !trust.return_policy.has_policy && !trust.return_policy.final_sale {
        out.push(Finding::new("return-policy-missing"));
    }

    if trust.certifications.is_empty() {
        out.push(Finding::new("certifications-missing").contextual(ContextFactor::Certifications));
    }

    out
}

pub(super) fn ai_discoverability(input: &CheckInput<'_>) -> Vec<Finding> {
    let ai = &input.extraction.ai_discoverability;
    let mut out = Vec::new();

    if let Some(robots) = input.facts.robots.as_ref().filter(|r| r.accessible && r.exists)
        && !robots.blocked_crawlers.is_empty()
    {
        let blocked = robots.blocked_crawlers.join(", ");
        if robots.allowed_crawlers.is_empty() {
            out.push(Finding::new("ai-crawlers-blocked").current(format!("Blocked: {blocked}")));
        } else {
            out.push(Finding::new("ai-crawlers-partially-blocked").current(format!("Blocked: {blocked}")));
        }
    }

    if ai.entities.schema_name.is_some()
        && factor_status(input, ENTITY_CONSISTENCY).is_some_and(|s| s != Status::Pass)
    {
        let details = input
            .score
            .categories
            .factor(ENTITY_CONSISTENCY)
            .map(|f| f.details.clone())
            .unwrap_or_default();
        out.push(Finding::new("entity-inconsistent").current(details));
    }

    if ai.answer_format.signal_count() < 2 {
        out.push(
            Finding::new("answer-format-missing")
                .current(format!("{}/4 answer formats", ai.answer_format.signal_count())),
        );
    }

    if ai.answer_format.use_cases.is_empty() {
        out.push(Finding::new("use-cases-missing").contextual(ContextFactor::UseCases));
    }

    match factor_status(input, CONTENT_FRESHNESS) {
        Some(Status::Fail) => out.push(Finding::new("freshness-missing")),
        Some(Status::Warning) => {
            let details = input
                .score
                .categories
                .factor(CONTENT_FRESHNESS)
                .map(|f| f.details.clone())
                .unwrap_or_default();
            out.push(Finding::new("content-stale").current(details));
        }
        _ => {}
    }

    if input.facts.llms_txt.as_ref().is_some_and(|l| !l.found) {
        out.push(Finding::new("llms-txt-missing"));
    }

    out
}
