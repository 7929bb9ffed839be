//! AI Discoverability category: crawler access, entity consistency, answer
//! formats, freshness and llms.txt

use chrono::NaiveDate;

use super::factor_names::*;
use super::weights::ContextFactor;
use super::{Category, CategoryScore, Factor, ScoringEngine, Status, age_in_days};
use crate::dates::parse_loose_date;
use crate::extract::ExtractionResult;
use crate::extract::ai_discoverability::EntitySurfaces;
use crate::facts::{NetworkFacts, RobotsFact};
use crate::text::{collapse_whitespace, significant_words};

const FRESH_DAYS: i64 = 90;
const AGING_DAYS: i64 = 365;
/// Share of the name's significant words a meta description must repeat
const DESCRIPTION_OVERLAP: f64 = 0.6;

pub(super) fn score(
    extraction: &ExtractionResult,
    facts: &NetworkFacts,
    engine: &ScoringEngine,
    today: NaiveDate,
) -> CategoryScore {
    let ai = &extraction.ai_discoverability;
    let mut factors = Vec::with_capacity(6);

    factors.push(crawler_access(facts.robots.as_ref()));
    factors.push(entity_consistency(&ai.entities));

    let answers = &ai.answer_format;
    let signals = answers.signal_count();
    let mut present = Vec::new();
    if !answers.best_for.is_empty() {
        present.push("best-for");
    }
    if answers.has_comparison() {
        present.push("comparison");
    }
    if answers.has_how_to() {
        present.push("how-to");
    }
    if !answers.use_cases.is_empty() {
        present.push("use cases");
    }
    factors.push(Factor::new(
        ANSWER_FORMAT,
        15,
        signals as f64 / 4.0 * 15.0,
        match signals {
            3.. => Status::Pass,
            1..=2 => Status::Warning,
            0 => Status::Fail,
        },
        if present.is_empty() {
            "No best-for, comparison, how-to or use-case phrasing".to_string()
        } else {
            format!("{signals}/4 answer formats: {}", present.join(", "))
        },
    ));

    let use_cases = answers.use_cases.len();
    factors.push(Factor::contextual(
        USE_CASES,
        10,
        match use_cases {
            0 => 0.0,
            1..=2 => 6.0,
            _ => 10.0,
        },
        engine.multiplier(ContextFactor::UseCases),
        if use_cases == 0 { Status::Warning } else { Status::Pass },
        format!("{use_cases} use-case statements"),
    ));

    factors.push(freshness(extraction, facts, today));

    factors.push(match &facts.llms_txt {
        None => Factor::new(LLMS_TXT, 10, 5.0, Status::Unknown, "llms.txt not checked (offline)"),
        Some(llms) if llms.found => {
            let files: Vec<&str> = [
                (llms.llms_txt.found, "llms.txt"),
                (llms.llms_full_txt.found, "llms-full.txt"),
            ]
            .into_iter()
            .filter(|(found, _)| *found)
            .map(|(_, name)| name)
            .collect();
            Factor::new(LLMS_TXT, 10, 10.0, Status::Pass, format!("Found {}", files.join(" and ")))
        }
        Some(_) => Factor::new(LLMS_TXT, 10, 0.0, Status::Warning, "No llms.txt at the site root"),
    });

    CategoryScore::from_factors(Category::AiDiscoverability, factors)
}

fn crawler_access(robots: Option<&RobotsFact>) -> Factor {
    let Some(robots) = robots else {
        return Factor::new(AI_CRAWLER_ACCESS, 25, 12.5, Status::Unknown, "robots.txt not checked (offline)");
    };
    if !robots.accessible {
        return Factor::new(
            AI_CRAWLER_ACCESS,
            25,
            12.5,
            Status::Warning,
            format!(
                "robots.txt could not be fetched: {}",
                robots.error.as_deref().unwrap_or("unknown error")
            ),
        );
    }
    if !robots.exists {
        return Factor::new(AI_CRAWLER_ACCESS, 25, 25.0, Status::Pass, "No robots.txt; all crawlers allowed");
    }

    let blocked = robots.blocked_crawlers.len();
    let total = blocked + robots.allowed_crawlers.len();
    if blocked == 0 || total == 0 {
        return Factor::new(AI_CRAWLER_ACCESS, 25, 25.0, Status::Pass, "All AI crawlers allowed");
    }
    if blocked == total {
        return Factor::critical_fail(
            AI_CRAWLER_ACCESS,
            25,
            format!("robots.txt blocks every AI crawler: {}", robots.blocked_crawlers.join(", ")),
        );
    }

    let allowed = total - blocked;
    Factor::new(
        AI_CRAWLER_ACCESS,
        25,
        allowed as f64 / total as f64 * 25.0,
        Status::Warning,
        format!("Blocked: {}", robots.blocked_crawlers.join(", ")),
    )
}

fn normalize(text: &str) -> String {
    collapse_whitespace(text).to_lowercase()
}

/// Containment either way, so "Ridge 30L Daypack | Summit Gear" matches
fn surface_matches(name: &str, surface: &str) -> bool {
    let surface = normalize(surface);
    if surface.chars().count() < 3 {
        return false;
    }
    surface.contains(name) || name.contains(&surface)
}

fn description_matches(name: &str, description: &str) -> bool {
    let description = normalize(description);
    if description.contains(name) {
        return true;
    }
    let wanted = significant_words(name);
    if wanted.is_empty() {
        return false;
    }
    let present = significant_words(&description);
    let hits = wanted.iter().filter(|w| present.contains(w)).count();
    hits as f64 / wanted.len() as f64 >= DESCRIPTION_OVERLAP
}

fn entity_consistency(entities: &EntitySurfaces) -> Factor {
    let Some(name) = entities.schema_name.as_deref().map(normalize).filter(|n| !n.is_empty()) else {
        return Factor::fail(ENTITY_CONSISTENCY, 20, "No product name in structured data to compare");
    };

    let checks = [
        ("h1", entities.h1.as_deref().is_some_and(|s| surface_matches(&name, s))),
        ("og:title", entities.og_title.as_deref().is_some_and(|s| surface_matches(&name, s))),
        (
            "meta description",
            entities.meta_description.as_deref().is_some_and(|s| description_matches(&name, s)),
        ),
        ("title", entities.title.as_deref().is_some_and(|s| surface_matches(&name, s))),
    ];
    let matched = checks.iter().filter(|(_, ok)| *ok).count();
    let missing: Vec<&str> = checks.iter().filter(|(_, ok)| !ok).map(|(s, _)| *s).collect();

    Factor::new(
        ENTITY_CONSISTENCY,
        20,
        matched as f64 / checks.len() as f64 * 20.0,
        match matched {
            3.. => Status::Pass,
            2 => Status::Warning,
            _ => Status::Fail,
        },
        if missing.is_empty() {
            "Product name consistent across h1, og:title, meta description and title".to_string()
        } else {
            format!("{matched}/4 surfaces match; differs in {}", missing.join(", "))
        },
    )
}

fn freshness(extraction: &ExtractionResult, facts: &NetworkFacts, today: NaiveDate) -> Factor {
    let page_date = extraction.ai_discoverability.freshness.most_recent();
    let header_date = facts
        .last_modified
        .as_ref()
        .filter(|f| f.accessible)
        .and_then(|f| f.last_modified.as_deref())
        .and_then(parse_loose_date);

    let newest = match (page_date, header_date) {
        (Some(p), Some(h)) if h > p => Some((h, "Last-Modified header")),
        (Some(p), _) => Some((p, "page")),
        (None, Some(h)) => Some((h, "Last-Modified header")),
        (None, None) => None,
    };

    let Some((date, origin)) = newest else {
        return Factor::fail(CONTENT_FRESHNESS, 20, "No publication or update date found");
    };
    let age = age_in_days(date, today);
    let (points, status) = match age {
        a if a <= FRESH_DAYS => (20.0, Status::Pass),
        a if a <= AGING_DAYS => (12.0, Status::Warning),
        _ => (5.0, Status::Warning),
    };
    Factor::new(
        CONTENT_FRESHNESS,
        20,
        points,
        status,
        format!("Newest date {date} from {origin} ({age} days old)"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PageDocument;
    use crate::extract::extract_page;
    use crate::facts::{LastModifiedFact, LlmsFileFact, LlmsTxtFact};
    use crate::types::PurchaseContext;
    use chrono::{TimeZone, Utc};

    const PAGE: &str = r#"
        <html><head>
          <title>Ridge 30L Daypack | Summit Gear</title>
          <meta property="og:title" content="Ridge 30L Daypack">
          <meta name="description" content="The Ridge daypack carries 30L of gear for a full day outside.">
        </head><body>
          <h1>Ridge 30L Daypack</h1>
          <script type="application/ld+json">
            {"@context":"https://schema.org","@type":"Product","name":"Ridge 30L Daypack","dateModified":"2024-06-01"}
          </script>
          <p>Best for day hikes and commuting.</p>
          <p>Perfect for travelers who want one bag.</p>
        </body></html>
    "#;

    fn category(html: &str, facts: &NetworkFacts) -> CategoryScore {
        let timestamp = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
        let doc = PageDocument::parse(html, "https://shop.example.com/products/ridge", timestamp);
        let extraction = extract_page(&doc);
        score(
            &extraction,
            facts,
            &ScoringEngine::new(PurchaseContext::Hybrid),
            timestamp.date_naive(),
        )
    }

    fn robots(blocked: &[&str], allowed: &[&str]) -> RobotsFact {
        RobotsFact {
            accessible: true,
            exists: true,
            error: None,
            blocked_crawlers: blocked.iter().map(|s| s.to_string()).collect(),
            allowed_crawlers: allowed.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_entity_matching() {
        assert!(surface_matches("ridge 30l daypack", "Ridge 30L Daypack | Summit Gear"));
        assert!(surface_matches("ridge 30l daypack - blue", "Ridge 30L Daypack"));
        assert!(!surface_matches("ridge 30l daypack", "Summit Gear"));
        assert!(description_matches(
            "ridge 30l daypack",
            "The Ridge daypack carries 30L of gear."
        ));
        assert!(!description_matches("ridge 30l daypack", "Shop our range of bags."));
    }

    #[test]
    fn test_consistent_page() {
        let result = category(PAGE, &NetworkFacts::default());
        let entity = result.factor(ENTITY_CONSISTENCY).unwrap();
        assert_eq!(entity.status, Status::Pass);
        assert_eq!(entity.points, 20);

        let freshness = result.factor(CONTENT_FRESHNESS).unwrap();
        assert_eq!(freshness.status, Status::Pass);

        assert_eq!(result.factor(AI_CRAWLER_ACCESS).unwrap().status, Status::Unknown);
        assert_eq!(result.factor(LLMS_TXT).unwrap().status, Status::Unknown);
    }

    #[test]
    fn test_all_crawlers_blocked_is_critical() {
        let facts = NetworkFacts {
            robots: Some(robots(&["GPTBot", "ClaudeBot"], &[])),
            ..Default::default()
        };
        let result = category(PAGE, &facts);
        assert!(result.factor(AI_CRAWLER_ACCESS).unwrap().critical);
        assert!(result.score <= 20);
    }

    #[test]
    fn test_partial_block_is_proportional() {
        let facts = NetworkFacts {
            robots: Some(robots(&["GPTBot"], &["ClaudeBot", "PerplexityBot", "Google-Extended"])),
            ..Default::default()
        };
        let access = category(PAGE, &facts);
        let access = access.factor(AI_CRAWLER_ACCESS).unwrap();
        assert_eq!(access.status, Status::Warning);
        assert_eq!(access.points, 19);
    }

    #[test]
    fn test_missing_robots_allows_everything() {
        let facts = NetworkFacts {
            robots: Some(RobotsFact::not_found()),
            llms_txt: Some(LlmsTxtFact::new(
                LlmsFileFact {
                    found: true,
                    url: "https://shop.example.com/llms.txt".to_string(),
                    size: Some(512),
                },
                LlmsFileFact::default(),
            )),
            ..Default::default()
        };
        let result = category(PAGE, &facts);
        assert_eq!(result.factor(AI_CRAWLER_ACCESS).unwrap().points, 25);
        assert_eq!(result.factor(LLMS_TXT).unwrap().points, 10);
    }

    #[test]
    fn test_last_modified_header_counts_for_freshness() {
        let html = "<html><body><h1>Undated</h1></body></html>";
        assert_eq!(
            category(html, &NetworkFacts::default()).factor(CONTENT_FRESHNESS).unwrap().status,
            Status::Fail
        );

        let facts = NetworkFacts {
            last_modified: Some(LastModifiedFact {
                accessible: true,
                last_modified: Some("Mon, 10 Jun 2024 08:00:00 GMT".to_string()),
                error: None,
            }),
            ..Default::default()
        };
        let freshness = category(html, &facts);
        let freshness = freshness.factor(CONTENT_FRESHNESS).unwrap();
        assert_eq!(freshness.status, Status::Pass);
        assert!(freshness.details.contains("Last-Modified"));
    }
}
