//! Authority and trust signals: reviews, brand, certifications, awards,
//! warranty, return policy and trust badges
//!
//! Certification and warranty detection test a negative pattern first ("not
//! FDA approved", "no warranty", "void the warranty"). A negative hit
//! suppresses every positive hit for that category.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use serde::{Deserialize, Serialize};

use crate::dates::parse_loose_date;
use crate::document::{PageDocument, element_text, has_ancestor, select_in};
use crate::structured_data::SchemaEntitySet;
use crate::text::{snippet, strip_tags, word_count};
use crate::types::{PatternMatch, Source};

/// Review containers used by common storefronts and review apps
const REVIEW_SELECTORS: &[&str] = &[
    "[itemprop='review']",
    "[data-review-id]",
    ".review-item",
    ".spr-review",
    ".jdgm-rev",
    ".yotpo-review",
    ".stamped-review",
    ".okeReviews-review-item",
    ".commentlist li.review",
    "#reviews .review",
    "[class*='review-card']",
    "[class*='reviewItem']",
];

const REVIEW_BODY_SELECTORS: &str = "[itemprop='reviewBody'], [class*='review-body'], \
     [class*='review-content'], [class*='review__content'], .spr-review-content-body, \
     .jdgm-rev__body, .content-review, p";

const BRAND_SELECTORS: &[&str] = &[
    "[itemprop='brand']",
    ".product-brand",
    ".product__vendor",
    ".product-vendor",
    ".product-single__vendor",
    "[data-product-brand]",
    "[class*='brand-name']",
];

const TRUST_BADGE_SELECTORS: &[&str] = &[
    "[class*='trust-badge']",
    "[class*='trust_badge']",
    "[class*='trustbadge']",
    "[class*='trust-seal']",
    "[class*='secure-checkout']",
    "[class*='payment-icons']",
    "[class*='guarantee-badge']",
];

const BADGE_ALT_KEYWORDS: &[&str] = &[
    "secure", "ssl", "norton", "mcafee", "trustpilot", "verified", "guarantee", "bbb",
    "trusted",
];

static RE_RATING_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([0-5](?:[.,]\d)?)[^\S\r\n]*(?:out[^\S\r\n]+of|/)[^\S\r\n]*5(?:[^\S\r\n]+stars?)?\b")
        .expect("invalid rating regex")
});

static RE_REVIEW_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{2,4}|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?[^\S\r\n]+\d{1,2},?[^\S\r\n]+\d{4}|\d{1,2}[^\S\r\n]+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*[^\S\r\n]+\d{4})\b",
    )
    .expect("invalid review date regex")
});

static RE_WARRANTY_NEGATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:no[^\S\r\n]+(?:manufacturer'?s?[^\S\r\n]+)?warrant(?:y|ies)|without[^\S\r\n]+(?:a[^\S\r\n]+|any[^\S\r\n]+)?warranty|voids?[^\S\r\n]+(?:the|your|any)[^\S\r\n]+warranty|void(?:ed|s)?[^\S\r\n]+warranty|warranty[^\S\r\n]+(?:is[^\S\r\n]+)?not[^\S\r\n]+(?:included|available|provided|offered)|not[^\S\r\n]+covered[^\S\r\n]+by[^\S\r\n]+(?:a|any|the)[^\S\r\n]+warranty|sold[^\S\r\n]+as[^\S\r\n]+is)\b",
    )
    .expect("invalid warranty negative regex")
});

static RE_WARRANTY_POSITIVE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:\d{1,3}|one|two|three|four|five|ten)(?:-|[^\S\r\n])(?:year|yr|month|day)s?(?:(?:-|[^\S\r\n])limited)?(?:-|[^\S\r\n])warrant(?:y|ies)\b[^\n\r.]{0,60}",
        r"(?i)\blifetime[^\S\r\n]+(?:limited[^\S\r\n]+)?warranty\b[^\n\r.]{0,60}",
        r"(?i)\bwarrant(?:y|ied)[^\S\r\n]+(?:for|of)[^\S\r\n]+(?:\d{1,3}|one|two|three|four|five|ten)[^\S\r\n]+(?:year|month)s?\b",
        r"(?i)\b(?:limited|manufacturer'?s?|full|extended)[^\S\r\n]+warranty\b[^\n\r.]{0,60}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid warranty regex"))
    .collect()
});

static RE_RETURN_NEGATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:no[^\S\r\n]+returns|final[^\S\r\n]+sale|non(?:-|[^\S\r\n])returnable|returns?[^\S\r\n]+(?:are[^\S\r\n]+)?not[^\S\r\n]+accepted)\b",
    )
    .expect("invalid return negative regex")
});

static RE_RETURN_POSITIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(\d{1,3})(?:-|[^\S\r\n])day[^\S\r\n]+(?:free[^\S\r\n]+|easy[^\S\r\n]+)?returns?|returns?[^\S\r\n]+(?:within|in)[^\S\r\n]+(\d{1,3})[^\S\r\n]+days|(?:free|easy|hassle(?:-|[^\S\r\n])free)[^\S\r\n]+returns?|return[^\S\r\n]+policy|money(?:-|[^\S\r\n])back[^\S\r\n]+guarantee)\b[^\n\r.]{0,40}",
    )
    .expect("invalid return regex")
});

static RE_AWARDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:award(?:-|[^\S\r\n])winning[^\n\r.]{0,40}|winner[^\S\r\n]+of[^\S\r\n]+(?:the[^\S\r\n]+)?[^\n\r.]{3,60}|(?:won|received|awarded)[^\S\r\n]+(?:the[^\S\r\n]+|an?[^\S\r\n]+)?[^\n\r.]{0,50}?award|editor'?s'?[^\S\r\n]+choice|best[^\S\r\n]+of[^\S\r\n]+\d{4}|(?:gold|silver|bronze)[^\S\r\n]+medal)",
    )
    .expect("invalid awards regex")
});

struct CertificationRule {
    label: &'static str,
    positive: &'static str,
    negative: Option<&'static str>,
}

const CERTIFICATION_RULES: &[CertificationRule] = &[
    CertificationRule {
        label: "FDA",
        positive: r"\bFDA(?:-|[^\S\r\n])(?:approved|cleared|registered|compliant)\b",
        negative: Some(
            r"(?i)\b(?:not[^\S\r\n]+(?:been[^\S\r\n]+)?(?:evaluated|approved|cleared)[^\S\r\n]+by[^\S\r\n]+the[^\S\r\n]+FDA|not[^\S\r\n]+FDA(?:-|[^\S\r\n])(?:approved|cleared)|FDA[^\S\r\n]+has[^\S\r\n]+not)\b",
        ),
    },
    CertificationRule {
        label: "CE",
        positive: r"\bCE(?:-|[^\S\r\n])(?:certified|marked|marking|mark|compliant)\b",
        negative: Some(r"(?i)\bnot[^\S\r\n]+CE(?:-|[^\S\r\n])(?:certified|marked)\b"),
    },
    CertificationRule {
        label: "UL",
        positive: r"\bUL(?:-|[^\S\r\n])(?:listed|certified|recognized)\b",
        negative: Some(r"(?i)\bnot[^\S\r\n]+UL(?:-|[^\S\r\n])(?:listed|certified)\b"),
    },
    CertificationRule {
        label: "Energy Star",
        positive: r"(?i)\benergy[^\S\r\n]+star\b(?:(?:-|[^\S\r\n])(?:certified|rated|qualified))?",
        negative: Some(r"(?i)\bnot[^\S\r\n]+energy[^\S\r\n]+star\b"),
    },
    CertificationRule {
        label: "Organic",
        positive: r"(?i)\b(?:USDA|certified)[^\S\r\n]+organic\b",
        negative: Some(r"(?i)\bnot[^\S\r\n]+(?:certified[^\S\r\n]+)?organic\b"),
    },
    CertificationRule {
        label: "ISO",
        positive: r"\bISO[^\S\r\n]?\d{4,5}(?::\d{4})?\b",
        negative: None,
    },
    CertificationRule {
        label: "FSC",
        positive: r"\bFSC(?:(?:-|[^\S\r\n])certified|®)?\b",
        negative: Some(r"(?i)\bnot[^\S\r\n]+FSC\b"),
    },
    CertificationRule {
        label: "Fair Trade",
        positive: r"(?i)\bfair[^\S\r\n]*trade\b(?:[^\S\r\n]+certified)?",
        negative: Some(r"(?i)\bnot[^\S\r\n]+fair[^\S\r\n]*trade\b"),
    },
    CertificationRule {
        label: "OEKO-TEX",
        positive: r"(?i)\boeko(?:-|[^\S\r\n])?tex\b(?:[^\S\r\n]+standard[^\S\r\n]+100)?",
        negative: Some(r"(?i)\bnot[^\S\r\n]+oeko(?:-|[^\S\r\n])?tex\b"),
    },
    CertificationRule {
        label: "Cruelty Free",
        positive: r"(?i)\b(?:cruelty(?:-|[^\S\r\n])free|leaping[^\S\r\n]+bunny)\b",
        negative: Some(r"(?i)\bnot[^\S\r\n]+cruelty(?:-|[^\S\r\n])free\b"),
    },
    CertificationRule {
        label: "B Corp",
        positive: r"\b(?:[Cc]ertified[^\S\r\n]+)?B(?:-|[^\S\r\n])?Corp(?:oration)?\b",
        negative: None,
    },
];

static CERTIFICATIONS: Lazy<Vec<(&'static str, Regex, Option<Regex>)>> = Lazy::new(|| {
    CERTIFICATION_RULES
        .iter()
        .map(|rule| {
            (
                rule.label,
                Regex::new(rule.positive).expect("invalid certification regex"),
                rule.negative
                    .map(|n| Regex::new(n).expect("invalid certification negative regex")),
            )
        })
        .collect()
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSignals {
    /// Best available review count: aggregate `reviewCount`, else schema
    /// reviews, else review elements in the DOM
    pub count: u64,
    pub count_source: Option<Source>,
    /// Average rating on a 5-point scale
    pub rating: Option<f64>,
    pub rating_source: Option<Source>,
    /// Review dates found, newest first
    pub dates: Vec<NaiveDate>,
    pub most_recent: Option<NaiveDate>,
    /// Reviews with readable text
    pub text_reviews: usize,
    /// Mean words per review text; `None` when no review text was found
    pub avg_word_count: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandSignal {
    pub name: Option<String>,
    pub source: Option<Source>,
    pub has_organization_schema: bool,
    pub has_logo: bool,
    pub same_as_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarrantySignal {
    pub has_warranty: bool,
    /// Literal matched text, truncated for display
    pub text: Option<String>,
    /// A negative statement ("no warranty") was found and won
    pub negated: bool,
    pub source: Option<Source>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnPolicySignal {
    pub has_policy: bool,
    pub text: Option<String>,
    pub window_days: Option<u32>,
    /// "final sale" / "non-returnable" language was found
    pub final_sale: bool,
    pub source: Option<Source>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustSignals {
    pub reviews: ReviewSignals,
    pub brand: BrandSignal,
    pub certifications: Vec<PatternMatch>,
    pub awards: Vec<PatternMatch>,
    pub warranty: WarrantySignal,
    pub return_policy: ReturnPolicySignal,
    pub trust_badges: usize,
}

pub fn extract_trust_signals(doc: &PageDocument, schemas: &SchemaEntitySet) -> TrustSignals {
    let text = doc.page_text();

    TrustSignals {
        reviews: review_signals(doc, schemas),
        brand: brand_signal(doc, schemas),
        certifications: detect_certifications(text),
        awards: detect_awards(text),
        warranty: detect_warranty(text),
        return_policy: detect_return_policy(doc, text),
        trust_badges: count_trust_badges(doc),
    }
}

/// Warranty detection with negative-first guard
pub fn detect_warranty(text: &str) -> WarrantySignal {
    if let Some(negative) = RE_WARRANTY_NEGATIVE.find(text) {
        return WarrantySignal {
            has_warranty: false,
            text: Some(snippet(negative.as_str())),
            negated: true,
            source: Some(Source::Dom),
        };
    }

    RE_WARRANTY_POSITIVE
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| WarrantySignal {
            has_warranty: true,
            text: Some(snippet(m.as_str())),
            negated: false,
            source: Some(Source::Dom),
        })
        .unwrap_or_default()
}

/// Certifications mentioned in page text, one per label
pub fn detect_certifications(text: &str) -> Vec<PatternMatch> {
    CERTIFICATIONS
        .iter()
        .filter(|(_, _, negative)| !negative.as_ref().is_some_and(|n| n.is_match(text)))
        .filter_map(|(label, positive, _)| {
            positive.find(text).map(|m| PatternMatch {
                label: label.to_string(),
                text: snippet(m.as_str()),
                source: Source::Dom,
            })
        })
        .collect()
}

fn detect_awards(text: &str) -> Vec<PatternMatch> {
    let mut awards: Vec<PatternMatch> = Vec::new();
    for m in RE_AWARDS.find_iter(text) {
        let text = snippet(m.as_str());
        if awards.iter().any(|a| a.text == text) {
            continue;
        }
        awards.push(PatternMatch {
            label: "award".to_string(),
            text,
            source: Source::Dom,
        });
        if awards.len() == 5 {
            break;
        }
    }
    awards
}

fn detect_return_policy(doc: &PageDocument, text: &str) -> ReturnPolicySignal {
    if let Some(negative) = RE_RETURN_NEGATIVE.find(text) {
        return ReturnPolicySignal {
            has_policy: false,
            text: Some(snippet(negative.as_str())),
            window_days: None,
            final_sale: true,
            source: Some(Source::Dom),
        };
    }

    if let Some(caps) = RE_RETURN_POSITIVE.captures(text) {
        let window_days = caps
            .get(1)
            .or_else(|| caps.get(2))
            .and_then(|d| d.as_str().parse::<u32>().ok());
        return ReturnPolicySignal {
            has_policy: true,
            text: caps.get(0).map(|m| snippet(m.as_str())),
            window_days,
            final_sale: false,
            source: Some(Source::Dom),
        };
    }

    // A linked returns page still counts as a discoverable policy
    let link = doc.select("a[href]").into_iter().find(|a| {
        let href = a.value().attr("href").unwrap_or_default().to_ascii_lowercase();
        (href.contains("return") || href.contains("refund")) && !href.starts_with("javascript:")
    });
    match link {
        Some(a) => ReturnPolicySignal {
            has_policy: true,
            text: Some(snippet(&element_text(&a))).filter(|t| !t.is_empty()),
            window_days: None,
            final_sale: false,
            source: Some(Source::Dom),
        },
        None => ReturnPolicySignal::default(),
    }
}

fn count_trust_badges(doc: &PageDocument) -> usize {
    let by_class: usize = TRUST_BADGE_SELECTORS.iter().map(|s| doc.count(s)).sum();
    let by_alt = doc
        .select("img[alt]")
        .into_iter()
        .filter(|img| {
            let alt = img.value().attr("alt").unwrap_or_default().to_ascii_lowercase();
            BADGE_ALT_KEYWORDS.iter().any(|k| alt.contains(k))
        })
        .count();
    by_class + by_alt
}

fn review_signals(doc: &PageDocument, schemas: &SchemaEntitySet) -> ReviewSignals {
    let dom_reviews = dom_review_elements(doc);
    let mut signals = ReviewSignals::default();

    // Count
    if let Some(count) = schemas
        .aggregate_rating
        .as_ref()
        .and_then(|r| r.review_count.map(|c| (c, r.source)))
        .filter(|(c, _)| *c > 0)
    {
        signals.count = count.0;
        signals.count_source = Some(count.1);
    } else if let Some(first) = schemas.reviews.first() {
        signals.count = schemas.reviews.len() as u64;
        signals.count_source = Some(first.source);
    } else if !dom_reviews.is_empty() {
        signals.count = dom_reviews.len() as u64;
        signals.count_source = Some(Source::Dom);
    }

    // Rating, normalized to five stars
    if let Some(rating) = schemas.aggregate_rating.as_ref()
        && let Some(value) = rating.rating_value
    {
        let best = if rating.best_rating > 0.0 { rating.best_rating } else { 5.0 };
        signals.rating = Some((value / best * 5.0 * 10.0).round() / 10.0);
        signals.rating_source = Some(rating.source);
    } else if let Some(caps) = RE_RATING_TEXT.captures(doc.page_text())
        && let Ok(value) = caps[1].replace(',', ".").parse::<f64>()
    {
        signals.rating = Some(value);
        signals.rating_source = Some(Source::Dom);
    }

    // Dates and text: schema reviews first, then DOM review elements
    let schema_texts: Vec<String> = schemas
        .reviews
        .iter()
        .filter_map(|r| r.body.as_deref().map(strip_tags))
        .filter(|b| !b.is_empty())
        .collect();
    let mut dates: Vec<NaiveDate> = schemas
        .reviews
        .iter()
        .filter_map(|r| r.date_published.as_deref().and_then(parse_loose_date))
        .collect();

    let texts = if schema_texts.is_empty() {
        dom_reviews.iter().map(review_body_text).filter(|t| !t.is_empty()).collect()
    } else {
        schema_texts
    };
    if dates.is_empty() {
        dates = dom_reviews.iter().filter_map(review_date).collect();
    }

    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.dedup();
    signals.most_recent = dates.first().copied();
    signals.dates = dates;

    signals.text_reviews = texts.len();
    if !texts.is_empty() {
        let total: usize = texts.iter().map(|t| word_count(t)).sum();
        signals.avg_word_count = Some(total as f64 / texts.len() as f64);
    }

    signals
}

/// Review containers from the first selector that matches, outside of nav chrome
fn dom_review_elements(doc: &PageDocument) -> Vec<ElementRef<'_>> {
    REVIEW_SELECTORS
        .iter()
        .map(|selector| {
            doc.select(selector)
                .into_iter()
                .filter(|el| !has_ancestor(el, &["nav", "header"], &["navigation", "banner"]))
                .collect::<Vec<_>>()
        })
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}

fn review_body_text(review: &ElementRef<'_>) -> String {
    select_in(review, REVIEW_BODY_SELECTORS)
        .first()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| element_text(review))
}

fn review_date(review: &ElementRef<'_>) -> Option<NaiveDate> {
    let from_attr = select_in(review, "time[datetime], [itemprop='datePublished']")
        .iter()
        .find_map(|el| {
            el.value()
                .attr("datetime")
                .or_else(|| el.value().attr("content"))
                .and_then(parse_loose_date)
        });

    from_attr.or_else(|| {
        RE_REVIEW_DATE
            .find(&element_text(review))
            .and_then(|m| parse_loose_date(m.as_str()))
    })
}

fn brand_signal(doc: &PageDocument, schemas: &SchemaEntitySet) -> BrandSignal {
    let organization = schemas.organization.as_ref();
    let mut signal = BrandSignal {
        has_organization_schema: organization.is_some(),
        has_logo: organization.is_some_and(|o| o.logo.is_some()),
        same_as_count: organization.map_or(0, |o| o.same_as.len()),
        ..Default::default()
    };

    let schema_brand = schemas
        .product
        .as_ref()
        .and_then(|p| p.brand.clone().map(|b| (b, p.source)))
        .or_else(|| {
            schemas
                .brand
                .as_ref()
                .and_then(|b| b.name.clone().map(|n| (n, b.source)))
        });

    let found = schema_brand.or_else(|| {
        BRAND_SELECTORS.iter().find_map(|selector| {
            doc.select(selector).into_iter().find_map(|el| {
                let text = el
                    .value()
                    .attr("content")
                    .map(str::to_string)
                    .unwrap_or_else(|| element_text(&el));
                (!text.is_empty() && text.chars().count() <= 60).then_some((text, Source::Dom))
            })
        })
    });

    let found = found.or_else(|| {
        organization
            .and_then(|o| o.name.clone().map(|n| (n, o.source)))
            .or_else(|| doc.meta_property("og:site_name").map(|n| (n, Source::Meta)))
    });

    if let Some((name, source)) = found {
        signal.name = Some(name);
        signal.source = Some(source);
    }
    signal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured_data::resolve_structured_data;
    use chrono::Utc;

    fn trust(html: &str) -> TrustSignals {
        let doc = PageDocument::parse(html, "https://shop.example.com/products/kettle", Utc::now());
        let sd = resolve_structured_data(&doc);
        extract_trust_signals(&doc, &sd.schemas)
    }

    #[test]
    fn test_warranty_negative_guard() {
        let signal = detect_warranty("This product has no warranty");
        assert!(!signal.has_warranty);
        assert!(signal.negated);

        let signal = detect_warranty("Covered by a 12-month warranty on parts");
        assert!(signal.has_warranty);
        assert!(signal.text.unwrap().contains("12-month warranty"));
    }

    #[test]
    fn test_warranty_void_suppresses_positive() {
        let signal = detect_warranty(
            "Includes a 2-year limited warranty.\nOpening the casing will void the warranty.",
        );
        assert!(!signal.has_warranty);
        assert!(signal.negated);
    }

    #[test]
    fn test_warranty_does_not_cross_lines() {
        let signal = detect_warranty("Lifetime warranty\r\nSecond line text");
        let text = signal.text.unwrap();
        assert!(text.starts_with("Lifetime warranty"));
        assert!(!text.contains("Second"));

        let signal = detect_warranty("Ships in 3-year\nwarranty-free packaging");
        assert!(!signal.has_warranty);
        let signal = detect_warranty("Covered by a 2\r\nyear warranty");
        assert!(!signal.has_warranty);
        let signal = detect_warranty("Covered by a 2-year limited warranty");
        assert!(signal.has_warranty);
        assert!(signal.text.unwrap().starts_with("2-year limited warranty"));
    }

    #[test]
    fn test_return_policy_does_not_cross_lines() {
        assert!(!RE_RETURN_POSITIVE.is_match("Order by 30\nday returns ship"));
        assert!(!RE_RETURN_POSITIVE.is_match("Get your money\r\nback guarantee cards"));
        assert!(!RE_RETURN_NEGATIVE.is_match("non\nreturnable"));

        let signals = trust("<p>30-day free returns on every order</p>");
        assert!(signals.return_policy.has_policy);
        assert_eq!(signals.return_policy.window_days, Some(30));
    }

    #[test]
    fn test_certifications_with_guard() {
        let found = detect_certifications(
            "UL-listed power cord. These statements have not been evaluated by the FDA. \
             OEKO-TEX Standard 100 fabric.",
        );
        let labels: Vec<&str> = found.iter().map(|c| c.label.as_str()).collect();
        assert!(labels.contains(&"UL"));
        assert!(labels.contains(&"OEKO-TEX"));
        assert!(!labels.contains(&"FDA"));
    }

    #[test]
    fn test_fda_negative_suppresses_approved() {
        let found = detect_certifications("FDA-cleared device. Not FDA approved for children.");
        assert!(found.iter().all(|c| c.label != "FDA"));
    }

    #[test]
    fn test_reviews_from_schema() {
        let signals = trust(r#"
            <script type="application/ld+json">
            {"@type": "Product", "name": "Kettle",
             "aggregateRating": {"@type": "AggregateRating", "ratingValue": "9", "bestRating": "10", "reviewCount": "42"},
             "review": [
                {"@type": "Review", "datePublished": "2024-03-01", "reviewBody": "Boils fast and the handle stays cool."},
                {"@type": "Review", "datePublished": "2024-05-20", "reviewBody": "Great."}
             ]}
            </script>
        "#);

        let reviews = signals.reviews;
        assert_eq!(reviews.count, 42);
        assert_eq!(reviews.count_source, Some(Source::Schema));
        assert_eq!(reviews.rating, Some(4.5));
        assert_eq!(reviews.most_recent, NaiveDate::from_ymd_opt(2024, 5, 20));
        assert_eq!(reviews.text_reviews, 2);
        assert_eq!(reviews.avg_word_count, Some(4.0));
    }

    #[test]
    fn test_reviews_from_dom() {
        let signals = trust(r#"
            <div id="reviews">
                <div class="review"><time datetime="2024-01-10">Jan 10</time><p>Solid kettle, pours cleanly.</p></div>
                <div class="review"><span>March 3, 2024</span><p>Too loud.</p></div>
            </div>
            <p>Rated 4.3 out of 5 stars</p>
        "#);

        let reviews = signals.reviews;
        assert_eq!(reviews.count, 2);
        assert_eq!(reviews.count_source, Some(Source::Dom));
        assert_eq!(reviews.rating, Some(4.3));
        assert_eq!(reviews.most_recent, NaiveDate::from_ymd_opt(2024, 3, 3));
    }

    #[test]
    fn test_no_reviews() {
        let signals = trust("<p>Nothing to see</p>");
        assert_eq!(signals.reviews.count, 0);
        assert!(signals.reviews.most_recent.is_none());
        assert!(signals.reviews.avg_word_count.is_none());
    }

    #[test]
    fn test_return_policy_and_badges() {
        let signals = trust(r#"
            <p>Enjoy 30-day free returns on all orders.</p>
            <div class="trust-badge">Secure</div>
            <img src="norton.png" alt="Norton Secured">
        "#);
        assert!(signals.return_policy.has_policy);
        assert_eq!(signals.return_policy.window_days, Some(30));
        assert_eq!(signals.trust_badges, 2);
    }

    #[test]
    fn test_final_sale_is_not_a_policy() {
        let signals = trust("<p>All clearance items are final sale.</p>");
        assert!(!signals.return_policy.has_policy);
        assert!(signals.return_policy.final_sale);
    }

    #[test]
    fn test_brand_fallbacks() {
        let signals = trust(r#"<div class="product__vendor">Kettle Co</div>"#);
        assert_eq!(signals.brand.name.as_deref(), Some("Kettle Co"));
        assert_eq!(signals.brand.source, Some(Source::Dom));

        let signals = trust(r#"<meta property="og:site_name" content="Kettle Shop">"#);
        assert_eq!(signals.brand.source, Some(Source::Meta));
    }

    #[test]
    fn test_awards() {
        let signals = trust("<p>Editor's Choice 2023. Winner of the Good Design Award.</p>");
        assert!(!signals.awards.is_empty());
    }
}
