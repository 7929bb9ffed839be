//! Scoring engine
//!
//! Six weighted categories, each an ordered list of factors. Contextual
//! factors are multiplied by the active purchase context's multiplier and
//! clamped at 1.5x their max. The category score is the clamped percentage of
//! points over max points, and a failing critical factor caps it at 20.
//! The total is the weight-averaged category score.

mod ai_discoverability;
mod authority_trust;
mod content_quality;
mod content_structure;
mod protocol_meta;
mod structured_data;
pub mod weights;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::extract::ExtractionResult;
use crate::facts::NetworkFacts;
use crate::types::PurchaseContext;
use weights::{CONTEXTUAL_OVERFLOW, CRITICAL_CATEGORY_CAP, ContextFactor, multiplier, weight_percent};

/// Factor names, shared with the recommendation checks
pub mod factor_names {
    // Structured Data
    pub const PRODUCT_SCHEMA: &str = "Product Schema";
    pub const OFFER_DETAILS: &str = "Offer Details";
    pub const PRODUCT_IDENTIFIERS: &str = "Product Identifiers";
    pub const AGGREGATE_RATING: &str = "Aggregate Rating";
    pub const BREADCRUMB_SCHEMA: &str = "Breadcrumb Schema";
    pub const ORGANIZATION_BRAND: &str = "Organization & Brand";
    pub const FAQ_SCHEMA: &str = "FAQ Schema";

    // Protocol & Meta
    pub const OG_IMAGE: &str = "og:image";
    pub const OG_IMAGE_FORMAT: &str = "og:image Format";
    pub const OPEN_GRAPH_TAGS: &str = "Open Graph Tags";
    pub const TWITTER_CARD: &str = "Twitter Card";
    pub const META_DESCRIPTION: &str = "Meta Description";
    pub const TITLE_TAG: &str = "Title Tag";
    pub const CANONICAL_URL: &str = "Canonical URL";
    pub const ROBOTS_META: &str = "Robots Meta";

    // Content Quality
    pub const PRODUCT_DESCRIPTION: &str = "Product Description";
    pub const TECHNICAL_SPECIFICATIONS: &str = "Technical Specifications";
    pub const FEATURE_LIST: &str = "Feature List";
    pub const FAQ_CONTENT: &str = "FAQ Content";
    pub const COMPATIBILITY_INFO: &str = "Compatibility Info";
    pub const PRODUCT_DETAILS: &str = "Product Details";

    // Content Structure
    pub const HEADING_STRUCTURE: &str = "Heading Structure";
    pub const SEMANTIC_LANDMARKS: &str = "Semantic Landmarks";
    pub const IMAGE_ALT_TEXT: &str = "Image Alt Text";
    pub const ACCESSIBILITY: &str = "Accessibility";
    pub const LISTS_TABLES: &str = "Lists & Tables";
    pub const JS_DEPENDENCY: &str = "JavaScript Dependency";
    pub const BREADCRUMB_NAVIGATION: &str = "Breadcrumb Navigation";

    // Authority & Trust
    pub const REVIEW_COUNT: &str = "Review Count";
    pub const AVERAGE_RATING: &str = "Average Rating";
    pub const REVIEW_RECENCY: &str = "Review Recency";
    pub const REVIEW_DEPTH: &str = "Review Depth";
    pub const BRAND_CLARITY: &str = "Brand Clarity";
    pub const CERTIFICATIONS: &str = "Certifications";
    pub const AWARDS: &str = "Awards";
    pub const WARRANTY_RETURNS: &str = "Warranty & Returns";

    // AI Discoverability
    pub const AI_CRAWLER_ACCESS: &str = "AI Crawler Access";
    pub const ENTITY_CONSISTENCY: &str = "Entity Consistency";
    pub const ANSWER_FORMAT: &str = "Answer Format Content";
    pub const USE_CASES: &str = "Use Cases";
    pub const CONTENT_FRESHNESS: &str = "Content Freshness";
    pub const LLMS_TXT: &str = "llms.txt";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Warning,
    Fail,
    /// Could not be verified either way
    Unknown,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Pass => "pass",
            Status::Warning => "warning",
            Status::Fail => "fail",
            Status::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// One atomic scoring unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Factor {
    pub name: String,
    pub status: Status,
    /// Awarded points. Contextual factors may exceed `max_points`, up to 1.5x.
    pub points: u32,
    pub max_points: u32,
    /// A failing gate that caps the whole category
    pub critical: bool,
    pub details: String,
    /// A context multiplier was applied
    pub contextual: bool,
}

impl Factor {
    /// Graduated factor; `points` is rounded and clamped to `[0, max]`
    pub fn new(name: &str, max_points: u32, points: f64, status: Status, details: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            points: points.round().clamp(0.0, max_points as f64) as u32,
            max_points,
            critical: false,
            details: details.into(),
            contextual: false,
        }
    }

    /// Factor scaled by a context multiplier, clamped at 1.5x its max
    pub fn contextual(
        name: &str,
        max_points: u32,
        raw_points: f64,
        multiplier: f64,
        status: Status,
        details: impl Into<String>,
    ) -> Self {
        let ceiling = max_points as f64 * CONTEXTUAL_OVERFLOW;
        Self {
            name: name.to_string(),
            status,
            points: (raw_points * multiplier).clamp(0.0, ceiling).round() as u32,
            max_points,
            critical: false,
            details: details.into(),
            contextual: true,
        }
    }

    /// Critical gate: status becomes `Fail` and points zero
    pub fn critical_fail(name: &str, max_points: u32, details: impl Into<String>) -> Self {
        Self {
            critical: true,
            ..Factor::new(name, max_points, 0.0, Status::Fail, details)
        }
    }

    pub fn fail(name: &str, max_points: u32, details: impl Into<String>) -> Self {
        Factor::new(name, max_points, 0.0, Status::Fail, details)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    StructuredData,
    ProtocolMeta,
    ContentQuality,
    ContentStructure,
    AuthorityTrust,
    AiDiscoverability,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::StructuredData,
        Category::ProtocolMeta,
        Category::ContentQuality,
        Category::ContentStructure,
        Category::AuthorityTrust,
        Category::AiDiscoverability,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::StructuredData => "Structured Data",
            Category::ProtocolMeta => "Protocol & Meta",
            Category::ContentQuality => "Content Quality",
            Category::ContentStructure => "Content Structure",
            Category::AuthorityTrust => "Authority & Trust",
            Category::AiDiscoverability => "AI Discoverability",
        }
    }

    /// Fraction of the total score, 0.0 to 1.0
    pub fn weight(&self) -> f64 {
        weight_percent(*self) as f64 / 100.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category: Category,
    pub name: String,
    /// 0 to 100
    pub score: u32,
    pub weight: f64,
    pub factors: Vec<Factor>,
}

impl CategoryScore {
    pub fn from_factors(category: Category, factors: Vec<Factor>) -> Self {
        let earned: u32 = factors.iter().map(|f| f.points).sum();
        let possible: u32 = factors.iter().map(|f| f.max_points).sum();

        let mut score = if possible == 0 {
            0
        } else {
            ((earned as f64 / possible as f64) * 100.0).round().min(100.0) as u32
        };
        if factors.iter().any(|f| f.critical) {
            score = score.min(CRITICAL_CATEGORY_CAP);
        }

        Self {
            category,
            name: category.name().to_string(),
            score,
            weight: category.weight(),
            factors,
        }
    }

    pub fn factor(&self, name: &str) -> Option<&Factor> {
        self.factors.iter().find(|f| f.name == name)
    }

    pub fn has_critical(&self) -> bool {
        self.factors.iter().any(|f| f.critical)
    }
}

/// The six category scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Categories {
    pub structured_data: CategoryScore,
    pub protocol_meta: CategoryScore,
    pub content_quality: CategoryScore,
    pub content_structure: CategoryScore,
    pub authority_trust: CategoryScore,
    pub ai_discoverability: CategoryScore,
}

impl Categories {
    pub fn get(&self, category: Category) -> &CategoryScore {
        match category {
            Category::StructuredData => &self.structured_data,
            Category::ProtocolMeta => &self.protocol_meta,
            Category::ContentQuality => &self.content_quality,
            Category::ContentStructure => &self.content_structure,
            Category::AuthorityTrust => &self.authority_trust,
            Category::AiDiscoverability => &self.ai_discoverability,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryScore> {
        Category::ALL.into_iter().map(|c| self.get(c))
    }

    /// Look up a factor by name in any category
    pub fn factor(&self, name: &str) -> Option<&Factor> {
        self.iter().find_map(|c| c.factor(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Grade::A => "Excellent: well optimized for AI discovery",
            Grade::B => "Good: minor improvements possible",
            Grade::C => "Fair: several gaps to address",
            Grade::D => "Poor: significant optimization needed",
            Grade::F => "Failing: major issues block AI discovery",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub total_score: u32,
    pub grade: Grade,
    pub grade_description: String,
    pub context: PurchaseContext,
    pub categories: Categories,
    /// Main content sits in an unrendered framework root; extracted signals
    /// may understate the page
    pub js_dependent: bool,
    pub timestamp: DateTime<Utc>,
}

/// Scores one extraction under a fixed purchase context
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine {
    context: PurchaseContext,
}

impl ScoringEngine {
    pub fn new(context: PurchaseContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> PurchaseContext {
        self.context
    }

    pub fn multiplier(&self, factor: ContextFactor) -> f64 {
        multiplier(self.context, factor)
    }

    pub fn score(&self, extraction: &ExtractionResult, facts: &NetworkFacts) -> ScoreResult {
        let today = extraction.page_info.timestamp.date_naive();

        let categories = Categories {
            structured_data: structured_data::score(extraction),
            protocol_meta: protocol_meta::score(extraction, facts),
            content_quality: content_quality::score(extraction, self),
            content_structure: content_structure::score(extraction),
            authority_trust: authority_trust::score(extraction, self, today),
            ai_discoverability: ai_discoverability::score(extraction, facts, self, today),
        };

        let weighted: u32 = categories
            .iter()
            .map(|c| c.score * weight_percent(c.category))
            .sum();
        let total_score = (weighted as f64 / 100.0).round() as u32;
        let grade = Grade::from_score(total_score);

        log::debug!(
            "scored {} under {} context: {} ({})",
            extraction.page_info.url,
            self.context,
            total_score,
            grade
        );

        ScoreResult {
            total_score,
            grade,
            grade_description: grade.description().to_string(),
            context: self.context,
            categories,
            js_dependent: extraction.content_structure.js.js_dependent,
            timestamp: extraction.page_info.timestamp,
        }
    }
}

/// Days from `date` to `today`; future dates count as today
pub(crate) fn age_in_days(date: NaiveDate, today: NaiveDate) -> i64 {
    (today - date).num_days().max(0)
}

/// Share of `count` against a target, capped at 1.0
pub(crate) fn ratio(count: usize, target: usize) -> f64 {
    if target == 0 {
        return 1.0;
    }
    (count as f64 / target as f64).min(1.0)
}
