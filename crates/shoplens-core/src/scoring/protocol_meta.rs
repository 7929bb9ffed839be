//! Protocol & Meta category: Open Graph, Twitter, title, description,
//! canonical and robots directives

use super::factor_names::*;
use super::{Category, CategoryScore, Factor, Status};
use crate::extract::ExtractionResult;
use crate::facts::NetworkFacts;

const DESCRIPTION_RANGE: std::ops::RangeInclusive<usize> = 50..=160;
const TITLE_RANGE: std::ops::RangeInclusive<usize> = 20..=70;
const OG_IMAGE_MIN_WIDTH: u32 = 1200;
const OG_IMAGE_MIN_HEIGHT: u32 = 630;

pub(super) fn score(extraction: &ExtractionResult, facts: &NetworkFacts) -> CategoryScore {
    let meta = &extraction.meta_tags;
    let og = &meta.open_graph;
    let mut factors = Vec::with_capacity(8);

    // og:image presence and declared quality
    factors.push(match &og.image {
        None => Factor::fail(OG_IMAGE, 15, "No og:image; shared links render without a preview"),
        Some(url) => {
            let mut points = 10.0;
            let mut notes = vec![format!("og:image {url}")];
            match (og.image_width, og.image_height) {
                (Some(w), Some(h)) if w >= OG_IMAGE_MIN_WIDTH && h >= OG_IMAGE_MIN_HEIGHT => {
                    points += 3.0;
                    notes.push(format!("{w}x{h}"));
                }
                (Some(w), Some(h)) => {
                    points += 1.0;
                    notes.push(format!("{w}x{h} is below {OG_IMAGE_MIN_WIDTH}x{OG_IMAGE_MIN_HEIGHT}"));
                }
                _ => notes.push("no og:image:width/height".to_string()),
            }
            if og.image_alt.is_some() {
                points += 2.0;
            } else {
                notes.push("no og:image:alt".to_string());
            }
            let status = if points >= 13.0 { Status::Pass } else { Status::Warning };
            Factor::new(OG_IMAGE, 15, points, status, notes.join("; "))
        }
    });

    // WebP previews are dropped by several link unfurlers
    factors.push(match (&og.image, &facts.image_format) {
        (None, _) => Factor::new(OG_IMAGE_FORMAT, 15, 0.0, Status::Unknown, "No og:image to check"),
        (Some(_), None) => Factor::new(
            OG_IMAGE_FORMAT,
            15,
            7.5,
            Status::Unknown,
            "Image format not verified (offline)",
        ),
        (Some(_), Some(fact)) if !fact.accessible => Factor::new(
            OG_IMAGE_FORMAT,
            15,
            7.5,
            Status::Unknown,
            format!(
                "og:image could not be fetched: {}",
                fact.error.as_deref().unwrap_or("unknown error")
            ),
        ),
        (Some(_), Some(fact)) if fact.is_webp => Factor::critical_fail(
            OG_IMAGE_FORMAT,
            15,
            "og:image is WebP; many social and chat previews will not render it",
        ),
        (Some(_), Some(fact)) if fact.is_valid_format => {
            Factor::new(OG_IMAGE_FORMAT, 15, 15.0, Status::Pass, format!("og:image is {}", fact.format))
        }
        (Some(_), Some(fact)) => Factor::new(
            OG_IMAGE_FORMAT,
            15,
            5.0,
            Status::Warning,
            format!("og:image format {} is not widely supported", fact.format),
        ),
    });

    let og_fields = [
        ("og:title", og.title.is_some(), 4.0),
        ("og:description", og.description.is_some(), 4.0),
        ("og:type", og.og_type.is_some(), 3.0),
        ("og:url", og.url.is_some(), 2.0),
        ("og:site_name", og.site_name.is_some(), 2.0),
    ];
    let og_points: f64 = og_fields.iter().filter(|(_, p, _)| *p).map(|(_, _, w)| w).sum();
    let og_missing: Vec<&str> = og_fields.iter().filter(|(_, p, _)| !p).map(|(n, _, _)| *n).collect();
    factors.push(Factor::new(
        OPEN_GRAPH_TAGS,
        15,
        og_points,
        match og_points {
            p if p >= 12.0 => Status::Pass,
            p if p > 0.0 => Status::Warning,
            _ => Status::Fail,
        },
        if og_missing.is_empty() {
            "All core Open Graph tags present".to_string()
        } else {
            format!("Missing {}", og_missing.join(", "))
        },
    ));

    let twitter = &meta.twitter;
    let twitter_points = if twitter.card.is_some() { 3.0 } else { 0.0 }
        + if twitter.title.is_some() || twitter.image.is_some() { 2.0 } else { 0.0 };
    factors.push(Factor::new(
        TWITTER_CARD,
        5,
        twitter_points,
        if twitter_points >= 5.0 { Status::Pass } else { Status::Warning },
        match &twitter.card {
            Some(card) => format!("twitter:card {card}"),
            None => "No twitter:card; platforms fall back to Open Graph".to_string(),
        },
    ));

    factors.push(match &meta.description {
        None => Factor::fail(META_DESCRIPTION, 15, "No meta description"),
        Some(d) => {
            let len = d.chars().count();
            if DESCRIPTION_RANGE.contains(&len) {
                Factor::new(META_DESCRIPTION, 15, 15.0, Status::Pass, format!("{len} characters"))
            } else {
                Factor::new(
                    META_DESCRIPTION,
                    15,
                    9.0,
                    Status::Warning,
                    format!(
                        "{len} characters; aim for {}-{}",
                        DESCRIPTION_RANGE.start(),
                        DESCRIPTION_RANGE.end()
                    ),
                )
            }
        }
    });

    factors.push(match &meta.title {
        None => Factor::fail(TITLE_TAG, 10, "No <title>"),
        Some(t) => {
            let len = t.chars().count();
            if TITLE_RANGE.contains(&len) {
                Factor::new(TITLE_TAG, 10, 10.0, Status::Pass, format!("{len} characters"))
            } else {
                Factor::new(
                    TITLE_TAG,
                    10,
                    6.0,
                    Status::Warning,
                    format!("{len} characters; aim for {}-{}", TITLE_RANGE.start(), TITLE_RANGE.end()),
                )
            }
        }
    });

    factors.push(match &meta.canonical {
        None => Factor::fail(CANONICAL_URL, 10, "No canonical link"),
        Some(c) if meta.canonical_valid => {
            Factor::new(CANONICAL_URL, 10, 10.0, Status::Pass, format!("Canonical {c}"))
        }
        Some(c) => Factor::new(
            CANONICAL_URL,
            10,
            4.0,
            Status::Warning,
            format!("Canonical {c} does not match the page URL"),
        ),
    });

    factors.push(if meta.noindex {
        Factor::critical_fail(ROBOTS_META, 15, "Page is marked noindex")
    } else if meta.nofollow {
        Factor::new(ROBOTS_META, 15, 10.0, Status::Warning, "Page is marked nofollow")
    } else {
        Factor::new(
            ROBOTS_META,
            15,
            15.0,
            Status::Pass,
            meta.robots.clone().unwrap_or_else(|| "Indexable".to_string()),
        )
    });

    CategoryScore::from_factors(Category::ProtocolMeta, factors)
}
