//! Authority & Trust category

use chrono::NaiveDate;

use super::factor_names::*;
use super::weights::ContextFactor;
use super::{Category, CategoryScore, Factor, ScoringEngine, Status, age_in_days};
use crate::extract::ExtractionResult;

/// Reviews newer than this count as recent
const RECENT_REVIEW_DAYS: i64 = 90;
const STALE_REVIEW_DAYS: i64 = 365;
/// Average words per review for full depth credit
const DEEP_REVIEW_WORDS: f64 = 50.0;

pub(super) fn score(extraction: &ExtractionResult, engine: &ScoringEngine, today: NaiveDate) -> CategoryScore {
    let trust = &extraction.trust_signals;
    let reviews = &trust.reviews;
    let mut factors = Vec::with_capacity(8);

    let (count_points, count_status) = match reviews.count {
        25.. => (20.0, Status::Pass),
        10..=24 => (15.0, Status::Pass),
        1..=9 => (8.0, Status::Warning),
        0 => (0.0, Status::Fail),
    };
    factors.push(Factor::contextual(
        REVIEW_COUNT,
        20,
        count_points,
        engine.multiplier(ContextFactor::ReviewCount),
        count_status,
        match reviews.count_source {
            Some(source) => format!("{} reviews ({source})", reviews.count),
            None => "No reviews found".to_string(),
        },
    ));

    factors.push(match reviews.rating {
        None => Factor::fail(AVERAGE_RATING, 10, "No average rating"),
        Some(r) if r >= 4.0 => Factor::new(AVERAGE_RATING, 10, 10.0, Status::Pass, format!("{r:.1} / 5")),
        Some(r) if r >= 3.0 => Factor::new(AVERAGE_RATING, 10, 6.0, Status::Warning, format!("{r:.1} / 5")),
        Some(r) => Factor::new(AVERAGE_RATING, 10, 2.0, Status::Warning, format!("{r:.1} / 5")),
    });

    factors.push(match reviews.most_recent {
        None => Factor::fail(REVIEW_RECENCY, 15, "No dated reviews"),
        Some(date) => {
            let age = age_in_days(date, today);
            let (points, status) = match age {
                a if a <= RECENT_REVIEW_DAYS => (15.0, Status::Pass),
                a if a <= STALE_REVIEW_DAYS => (8.0, Status::Warning),
                _ => (3.0, Status::Warning),
            };
            Factor::new(
                REVIEW_RECENCY,
                15,
                points,
                status,
                format!("Most recent review {date} ({age} days ago)"),
            )
        }
    });

    let depth_multiplier = engine.multiplier(ContextFactor::ReviewDepth);
    factors.push(match reviews.avg_word_count {
        None => Factor {
            contextual: true,
            ..Factor::fail(REVIEW_DEPTH, 15, "No review text on the page")
        },
        Some(avg) => {
            let (raw, status) = match avg {
                a if a >= DEEP_REVIEW_WORDS => (15.0, Status::Pass),
                a if a >= 20.0 => (9.0, Status::Warning),
                _ => (4.0, Status::Warning),
            };
            Factor::contextual(
                REVIEW_DEPTH,
                15,
                raw,
                depth_multiplier,
                status,
                format!("{} text reviews averaging {avg:.0} words", reviews.text_reviews),
            )
        }
    });

    let brand = &trust.brand;
    let brand_points = if brand.name.is_some() { 6.0 } else { 0.0 }
        + if brand.has_organization_schema { 4.0 } else { 0.0 };
    factors.push(Factor::new(
        BRAND_CLARITY,
        10,
        brand_points,
        match brand_points {
            p if p >= 10.0 => Status::Pass,
            p if p > 0.0 => Status::Warning,
            _ => Status::Fail,
        },
        match (&brand.name, brand.source) {
            (Some(name), Some(source)) => format!("Brand {name} ({source})"),
            (Some(name), None) => format!("Brand {name}"),
            (None, _) => "No brand identified".to_string(),
        },
    ));

    let certs = &trust.certifications;
    factors.push(Factor::contextual(
        CERTIFICATIONS,
        10,
        match certs.len() {
            0 => 0.0,
            1 => 7.0,
            _ => 10.0,
        },
        engine.multiplier(ContextFactor::Certifications),
        if certs.is_empty() { Status::Warning } else { Status::Pass },
        if certs.is_empty() {
            "No certifications mentioned".to_string()
        } else {
            certs.iter().map(|c| c.label.as_str()).collect::<Vec<_>>().join(", ")
        },
    ));

    factors.push(if trust.awards.is_empty() {
        Factor::new(AWARDS, 5, 0.0, Status::Warning, "No awards or press mentions")
    } else {
        Factor::new(
            AWARDS,
            5,
            5.0,
            Status::Pass,
            trust.awards.iter().map(|a| a.text.as_str()).collect::<Vec<_>>().join("; "),
        )
    });

    let warranty = &trust.warranty;
    let returns = &trust.return_policy;
    let mut notes = Vec::new();
    let mut wr_points = 0.0;
    if warranty.has_warranty {
        wr_points += 8.0;
        notes.push(warranty.text.clone().unwrap_or_else(|| "Warranty".to_string()));
    } else if warranty.negated {
        notes.push("Page states no warranty".to_string());
    } else {
        notes.push("No warranty information".to_string());
    }
    if returns.has_policy {
        wr_points += 7.0;
        notes.push(match returns.window_days {
            Some(days) => format!("{days}-day returns"),
            None => returns.text.clone().unwrap_or_else(|| "Return policy".to_string()),
        });
    } else if returns.final_sale {
        notes.push("Final sale, no returns".to_string());
    } else {
        notes.push("No return policy".to_string());
    }
    factors.push(Factor::new(
        WARRANTY_RETURNS,
        15,
        wr_points,
        match wr_points {
            p if p >= 15.0 => Status::Pass,
            p if p > 0.0 => Status::Warning,
            _ => Status::Fail,
        },
        notes.join("; "),
    ));

    CategoryScore::from_factors(Category::AuthorityTrust, factors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PageDocument;
    use crate::extract::extract_page;
    use crate::facts::NetworkFacts;
    use crate::recommendations::RecommendationEngine;
    use crate::types::PurchaseContext;
    use chrono::{TimeZone, Utc};

    const REVIEWED: &str = r#"
        <html><body>
          <h1>Merino Hoodie</h1>
          <script type="application/ld+json">
          {"@context":"https://schema.org","@type":"Product","name":"Merino Hoodie",
           "brand":{"@type":"Brand","name":"Fjellwear"},
           "aggregateRating":{"@type":"AggregateRating","ratingValue":"4.6","reviewCount":"132"},
           "review":[
             {"@type":"Review","datePublished":"2024-05-20","reviewBody":"Warm without being bulky, and it still looks new after a winter of hiking."},
             {"@type":"Review","datePublished":"2023-01-02","reviewBody":"Nice."}
           ]}
          </script>
          <p>Backed by a 2-year warranty. Free 30-day returns.</p>
        </body></html>
    "#;

    const TWENTY_FIVE_WORDS: &str = "Fits true to size and the sleeves are long enough for climbing. \
        The wool breathes well on warm afternoons and has not pilled after two months of wear.";

    fn reviewed_on(reviews: &[(&str, &str)]) -> String {
        let items: Vec<String> = reviews
            .iter()
            .map(|(date, body)| {
                format!(r#"{{"@type":"Review","datePublished":"{date}","reviewBody":"{body}"}}"#)
            })
            .collect();
        format!(
            r#"<html><body><h1>Merino Hoodie</h1>
            <script type="application/ld+json">
            {{"@context":"https://schema.org","@type":"Product","name":"Merino Hoodie",
             "aggregateRating":{{"@type":"AggregateRating","ratingValue":"4.4","reviewCount":"12"}},
             "review":[{}]}}
            </script></body></html>"#,
            items.join(",")
        )
    }

    fn extraction(html: &str) -> ExtractionResult {
        let timestamp = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
        let doc = PageDocument::parse(html, "https://shop.example.com/p/hoodie", timestamp);
        extract_page(&doc)
    }

    fn category(html: &str, context: PurchaseContext) -> CategoryScore {
        let extraction = extraction(html);
        let today = extraction.page_info.timestamp.date_naive();
        score(&extraction, &ScoringEngine::new(context), today)
    }

    #[test]
    fn test_reviewed_product() {
        let result = category(REVIEWED, PurchaseContext::Hybrid);
        let count = result.factor(REVIEW_COUNT).unwrap();
        assert_eq!(count.status, Status::Pass);
        // 20 x 1.15
        assert_eq!(count.points, 23);
        assert_eq!(result.factor(AVERAGE_RATING).unwrap().points, 10);

        let recency = result.factor(REVIEW_RECENCY).unwrap();
        assert_eq!(recency.status, Status::Pass);
        assert!(recency.details.contains("2024-05-20"));

        assert_eq!(result.factor(WARRANTY_RETURNS).unwrap().status, Status::Pass);
    }

    #[test]
    fn test_review_recency_tiers() {
        let html = reviewed_on(&[("2023-12-01", TWENTY_FIVE_WORDS)]);
        let recency = category(&html, PurchaseContext::Hybrid);
        let recency = recency.factor(REVIEW_RECENCY).unwrap();
        assert_eq!(recency.status, Status::Warning);
        assert_eq!(recency.points, 8);
        assert!(recency.details.contains("212 days ago"));

        let html = reviewed_on(&[("2022-11-15", TWENTY_FIVE_WORDS)]);
        let recency = category(&html, PurchaseContext::Hybrid);
        let recency = recency.factor(REVIEW_RECENCY).unwrap();
        assert_eq!(recency.status, Status::Warning);
        assert_eq!(recency.points, 3);
    }

    #[test]
    fn test_review_depth_tiers() {
        let html = reviewed_on(&[("2024-06-01", TWENTY_FIVE_WORDS)]);
        let depth = category(&html, PurchaseContext::Need);
        let depth = depth.factor(REVIEW_DEPTH).unwrap();
        assert_eq!(depth.status, Status::Warning);
        assert_eq!(depth.points, 9);

        let html = reviewed_on(&[("2024-06-01", "Love it."), ("2024-05-01", "Warm and soft.")]);
        let depth = category(&html, PurchaseContext::Need);
        let depth = depth.factor(REVIEW_DEPTH).unwrap();
        assert_eq!(depth.status, Status::Warning);
        assert_eq!(depth.points, 4);
    }

    #[test]
    fn test_stale_shallow_reviews_are_recommended() {
        let extraction = extraction(&reviewed_on(&[("2023-12-01", "Love it.")]));
        let facts = NetworkFacts::default();
        let score = ScoringEngine::new(PurchaseContext::Hybrid).score(&extraction, &facts);
        let recs = RecommendationEngine::new(PurchaseContext::Hybrid).generate(&score, &extraction, &facts);

        let stale = recs.get("reviews-stale").unwrap();
        assert_eq!(stale.priority, 3);
        assert!(stale.current_state.as_deref().unwrap().contains("2023-12-01"));

        let shallow = recs.get("reviews-shallow").unwrap();
        assert_eq!(shallow.priority, 3);
        assert!(recs.get("reviews-missing").is_none());
        assert!(recs.get("review-dates-missing").is_none());
    }

    #[test]
    fn test_recent_deep_reviews_are_not_recommended() {
        let body = format!("{TWENTY_FIVE_WORDS} {TWENTY_FIVE_WORDS}");
        let extraction = extraction(&reviewed_on(&[("2024-06-20", &body)]));
        let facts = NetworkFacts::default();
        let score = ScoringEngine::new(PurchaseContext::Hybrid).score(&extraction, &facts);
        let recs = RecommendationEngine::new(PurchaseContext::Hybrid).generate(&score, &extraction, &facts);
        assert!(recs.get("reviews-stale").is_none());
        assert!(recs.get("reviews-shallow").is_none());
    }

    #[test]
    fn test_want_context_weights_reviews_up() {
        let want = category(REVIEWED, PurchaseContext::Want);
        let need = category(REVIEWED, PurchaseContext::Need);
        assert!(want.factor(REVIEW_COUNT).unwrap().points > need.factor(REVIEW_COUNT).unwrap().points);
        assert!(want.factor(REVIEW_DEPTH).unwrap().points > need.factor(REVIEW_DEPTH).unwrap().points);
    }

    #[test]
    fn test_no_reviews() {
        let result = category("<html><body><h1>Plain</h1></body></html>", PurchaseContext::Hybrid);
        assert_eq!(result.factor(REVIEW_COUNT).unwrap().status, Status::Fail);
        assert_eq!(result.factor(REVIEW_RECENCY).unwrap().status, Status::Fail);
        assert_eq!(result.factor(REVIEW_DEPTH).unwrap().points, 0);
        assert_eq!(result.factor(WARRANTY_RETURNS).unwrap().status, Status::Fail);
    }
}
