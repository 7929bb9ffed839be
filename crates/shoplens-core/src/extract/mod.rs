//! Signal extractors
//!
//! Five independent extractors run over one [`PageDocument`]. Each is a pure
//! function of the document (plus the resolved schema entities) and tags what
//! it finds with a [`Source`](crate::types::Source) so later stages can say
//! where a fact came from.

pub mod ai_discoverability;
pub mod content_quality;
pub mod content_structure;
pub mod meta;
pub mod trust;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::PageDocument;
use crate::structured_data::{StructuredDataResult, resolve_structured_data};
use crate::url_utils::{domain_of, url_path};

pub use ai_discoverability::AiDiscoverability;
pub use content_quality::ContentQuality;
pub use content_structure::ContentStructure;
pub use meta::MetaTags;
pub use trust::TrustSignals;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub url: String,
    pub title: Option<String>,
    pub domain: String,
    pub path: String,
    pub timestamp: DateTime<Utc>,
}

/// Snapshot of one extraction pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub structured_data: StructuredDataResult,
    pub meta_tags: MetaTags,
    pub content_quality: ContentQuality,
    pub content_structure: ContentStructure,
    pub trust_signals: TrustSignals,
    pub ai_discoverability: AiDiscoverability,
    pub page_info: PageInfo,
}

/// Run the structured-data resolver and all five extractors
pub fn extract_page(doc: &PageDocument) -> ExtractionResult {
    let structured_data = resolve_structured_data(doc);
    let schemas = &structured_data.schemas;

    let meta_tags = meta::extract_meta_tags(doc);
    let content_quality = content_quality::extract_content_quality(doc, schemas);
    let content_structure = content_structure::extract_content_structure(doc);
    let trust_signals = trust::extract_trust_signals(doc, schemas);
    let ai_discoverability = ai_discoverability::extract_ai_discoverability(doc, schemas);

    let page_info = PageInfo {
        url: doc.url().to_string(),
        title: doc.title(),
        domain: domain_of(doc.url()),
        path: url_path(doc.url()),
        timestamp: doc.timestamp(),
    };

    log::debug!(
        "extracted {}: {} specs, {} features, {} FAQ, {} reviews",
        page_info.url,
        content_quality.specifications.count,
        content_quality.features.count,
        content_quality.faq.count,
        trust_signals.reviews.count
    );

    ExtractionResult {
        structured_data,
        meta_tags,
        content_quality,
        content_structure,
        trust_signals,
        ai_discoverability,
        page_info,
    }
}
