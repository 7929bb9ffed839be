//! # shoplens-core
//!
//! Core library for scoring eCommerce product pages for AI discoverability.
//!
//! This library provides:
//! - JSON-LD and Microdata resolution into one normalized entity set
//!   (`@graph`, `@id` references, ProductGroup variants)
//! - Five signal extractors: meta tags, content quality, content structure,
//!   trust signals and AI discoverability
//! - A weighted scoring engine with purchase-context multipliers and grades
//! - A recommendation engine with impact x effort prioritization
//!
//! The core performs no network I/O. Facts that need a fetch (og:image
//! format, robots.txt, llms.txt, Last-Modified) are passed in as
//! [`NetworkFacts`].
//!
//! ## Example
//!
//! ```
//! use shoplens_core::{AnalysisOptions, NetworkFacts, PurchaseContext, analyze};
//!
//! let html = r#"
//!     <html><head><title>Trail Lantern</title></head><body>
//!     <h1>Trail Lantern</h1>
//!     <script type="application/ld+json">
//!     {"@context": "https://schema.org", "@type": "Product", "name": "Trail Lantern"}
//!     </script>
//!     </body></html>
//! "#;
//!
//! let options = AnalysisOptions::new("https://shop.example.com/products/lantern")
//!     .with_context(PurchaseContext::Need);
//! let analysis = analyze(html, &options, &NetworkFacts::default());
//!
//! assert!(analysis.score.total_score <= 100);
//! assert!(analysis.extraction.structured_data.schemas.product.is_some());
//! ```

pub mod dates;
pub mod document;
pub mod error;
pub mod extract;
pub mod facts;
pub mod recommendations;
pub mod robots;
pub mod scoring;
pub mod structured_data;
pub mod text;
pub mod types;
pub mod url_utils;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use document::PageDocument;
pub use error::CoreError;
pub use extract::{ExtractionResult, extract_page};
pub use facts::{ImageFormatFact, LastModifiedFact, LlmsFileFact, LlmsTxtFact, NetworkFacts, RobotsFact};
pub use recommendations::{Level, Recommendation, RecommendationEngine, Recommendations};
pub use robots::{AI_CRAWLERS, parse_robots_txt};
pub use scoring::{Category, CategoryScore, Factor, Grade, ScoreResult, ScoringEngine, Status};
pub use structured_data::{SchemaEntitySet, StructuredDataResult, resolve_structured_data};
pub use types::{PatternMatch, PurchaseContext, Source};

/// Configuration for one analysis pass
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    pub url: String,
    pub context: PurchaseContext,
    /// Stamped on the result and used as "today" for age checks
    pub timestamp: DateTime<Utc>,
}

impl AnalysisOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            context: PurchaseContext::default(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_context(mut self, context: PurchaseContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Extraction, score and recommendations for one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub extraction: ExtractionResult,
    pub score: ScoreResult,
    pub recommendations: Recommendations,
}

/// Run the full pipeline over one HTML document.
///
/// Never fails: malformed markup is recorded on the extraction result and
/// missing signals score as failures.
pub fn analyze(html: &str, options: &AnalysisOptions, facts: &NetworkFacts) -> Analysis {
    let doc = PageDocument::parse(html, &options.url, options.timestamp);
    let extraction = extract_page(&doc);
    // The document, and with it the JSON-LD cache, ends with the pass
    drop(doc);

    let score = ScoringEngine::new(options.context).score(&extraction, facts);
    let recommendations = RecommendationEngine::new(options.context).generate(&score, &extraction, facts);

    log::info!(
        "{}: {} ({}), {} recommendations",
        options.url,
        score.total_score,
        score.grade,
        recommendations.len()
    );

    Analysis {
        extraction,
        score,
        recommendations,
    }
}
