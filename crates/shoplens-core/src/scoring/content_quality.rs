//! Content Quality category

use super::factor_names::*;
use super::weights::ContextFactor;
use super::{Category, CategoryScore, Factor, ScoringEngine, Status};
use crate::extract::ExtractionResult;
use crate::types::PurchaseContext;

/// Tiered points: the first `(minimum, points)` step the count reaches
fn tier(count: usize, steps: &[(usize, f64)]) -> f64 {
    steps
        .iter()
        .find(|(min, _)| count >= *min)
        .map_or(0.0, |(_, points)| *points)
}

pub(super) fn score(extraction: &ExtractionResult, engine: &ScoringEngine) -> CategoryScore {
    let cq = &extraction.content_quality;
    let mut factors = Vec::with_capacity(6);

    let description = &cq.description;
    factors.push(if !description.found {
        Factor::fail(PRODUCT_DESCRIPTION, 20, "No product description found")
    } else {
        let words = description.word_count;
        let (points, status) = match words {
            150.. => (20.0, Status::Pass),
            75..=149 => (16.0, Status::Pass),
            _ => (10.0, Status::Warning),
        };
        Factor::new(PRODUCT_DESCRIPTION, 20, points, status, format!("{words} words"))
    });

    let specs = &cq.specifications;
    factors.push(Factor::contextual(
        TECHNICAL_SPECIFICATIONS,
        20,
        tier(specs.count, &[(8, 20.0), (3, 14.0), (1, 7.0)]),
        engine.multiplier(ContextFactor::TechnicalSpecifications),
        match specs.count {
            0 => Status::Fail,
            1..=2 => Status::Warning,
            _ => Status::Pass,
        },
        match specs.count {
            0 => "No specifications found".to_string(),
            n if specs.has_table => format!("{n} specifications in a table"),
            n => format!("{n} specifications"),
        },
    ));

    let features = &cq.features;
    factors.push(Factor::contextual(
        FEATURE_LIST,
        15,
        tier(features.count, &[(5, 15.0), (3, 11.0), (1, 6.0)]),
        engine.multiplier(ContextFactor::FeatureList),
        match features.count {
            0 => Status::Fail,
            1..=2 => Status::Warning,
            _ => Status::Pass,
        },
        format!("{} features", features.count),
    ));

    let faq = &cq.faq;
    factors.push(Factor::contextual(
        FAQ_CONTENT,
        15,
        tier(faq.count, &[(5, 15.0), (3, 11.0), (1, 6.0)]),
        engine.multiplier(ContextFactor::FaqContent),
        match faq.count {
            0 => Status::Fail,
            1..=2 => Status::Warning,
            _ => Status::Pass,
        },
        match faq.count {
            0 => "No FAQ content".to_string(),
            n if faq.has_schema => format!("{n} questions (FAQPage schema)"),
            n => format!("{n} questions"),
        },
    ));

    // Missing compatibility only counts as a failure for need purchases
    let compatibility = &cq.details.compatibility;
    factors.push(Factor::contextual(
        COMPATIBILITY_INFO,
        10,
        if compatibility.is_some() { 10.0 } else { 0.0 },
        engine.multiplier(ContextFactor::CompatibilityInfo),
        match (compatibility, engine.context()) {
            (Some(_), _) => Status::Pass,
            (None, PurchaseContext::Need) => Status::Fail,
            (None, _) => Status::Warning,
        },
        match compatibility {
            Some(m) => m.text.clone(),
            None => "No compatibility information".to_string(),
        },
    ));

    let details = &cq.details;
    let present: Vec<&str> = [
        ("dimensions", details.dimensions.is_some()),
        ("materials", details.materials.is_some()),
        ("care instructions", details.care_instructions.is_some()),
        ("warranty", details.warranty.is_some()),
    ]
    .into_iter()
    .filter(|(_, found)| *found)
    .map(|(label, _)| label)
    .collect();
    factors.push(Factor::new(
        PRODUCT_DETAILS,
        20,
        present.len() as f64 * 5.0,
        match present.len() {
            0 => Status::Fail,
            1..=2 => Status::Warning,
            _ => Status::Pass,
        },
        if present.is_empty() {
            "No dimensions, materials, care or warranty details".to_string()
        } else {
            format!("Found {}", present.join(", "))
        },
    ));

    CategoryScore::from_factors(Category::ContentQuality, factors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PageDocument;
    use crate::extract::extract_page;
    use chrono::Utc;

    const SPEC_PAGE: &str = r#"
        <html><body>
          <h1>USB-C Charger 65W</h1>
          <table class="specifications">
            <tr><th>Output</th><td>65W</td></tr>
            <tr><th>Ports</th><td>2x USB-C</td></tr>
            <tr><th>Input</th><td>100-240V</td></tr>
            <tr><th>Weight</th><td>120 g</td></tr>
          </table>
          <p>Compatible with MacBook Air, Pixel 8 and Galaxy S24.</p>
        </body></html>
    "#;

    fn category(html: &str, context: PurchaseContext) -> CategoryScore {
        let doc = PageDocument::parse(html, "https://shop.example.com/p/charger", Utc::now());
        score(&extract_page(&doc), &ScoringEngine::new(context))
    }

    #[test]
    fn test_tier() {
        let steps = [(8, 20.0), (3, 14.0), (1, 7.0)];
        assert_eq!(tier(0, &steps), 0.0);
        assert_eq!(tier(2, &steps), 7.0);
        assert_eq!(tier(3, &steps), 14.0);
        assert_eq!(tier(12, &steps), 20.0);
    }

    #[test]
    fn test_need_context_rewards_specs_and_compatibility() {
        let need = category(SPEC_PAGE, PurchaseContext::Need);
        let want = category(SPEC_PAGE, PurchaseContext::Want);

        let need_specs = need.factor(TECHNICAL_SPECIFICATIONS).unwrap();
        let want_specs = want.factor(TECHNICAL_SPECIFICATIONS).unwrap();
        assert!(need_specs.contextual);
        assert!(need_specs.points > want_specs.points);

        let need_compat = need.factor(COMPATIBILITY_INFO).unwrap();
        assert_eq!(need_compat.status, Status::Pass);
        assert_eq!(need_compat.points, 15);
        assert_eq!(want.factor(COMPATIBILITY_INFO).unwrap().points, 6);
    }

    #[test]
    fn test_missing_compatibility_fails_only_for_need() {
        let html = "<html><body><h1>Scented Candle</h1></body></html>";
        let need = category(html, PurchaseContext::Need);
        let want = category(html, PurchaseContext::Want);
        assert_eq!(need.factor(COMPATIBILITY_INFO).unwrap().status, Status::Fail);
        assert_eq!(want.factor(COMPATIBILITY_INFO).unwrap().status, Status::Warning);
    }

    #[test]
    fn test_empty_page_scores_zero() {
        let result = category("<html><body></body></html>", PurchaseContext::Hybrid);
        assert_eq!(result.score, 0);
        assert_eq!(result.factor(PRODUCT_DESCRIPTION).unwrap().status, Status::Fail);
    }
}
