//! Static scoring configuration: category weights and context multipliers

use serde::{Deserialize, Serialize};

use super::Category;
use crate::types::PurchaseContext;

/// Category weights in whole percent; they sum to exactly 100
pub const CATEGORY_WEIGHTS: [(Category, u32); 6] = [
    (Category::StructuredData, 20),
    (Category::ProtocolMeta, 15),
    (Category::ContentQuality, 25),
    (Category::ContentStructure, 15),
    (Category::AuthorityTrust, 10),
    (Category::AiDiscoverability, 15),
];

/// A contextual factor may reach this multiple of its max before the
/// category clamp
pub const CONTEXTUAL_OVERFLOW: f64 = 1.5;

/// Category score ceiling while one of its critical factors is failing
pub const CRITICAL_CATEGORY_CAP: u32 = 20;

pub fn weight_percent(category: Category) -> u32 {
    CATEGORY_WEIGHTS
        .iter()
        .find(|(c, _)| *c == category)
        .map_or(0, |(_, w)| *w)
}

/// Factors whose weight depends on the purchase context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContextFactor {
    TechnicalSpecifications,
    CompatibilityInfo,
    FeatureList,
    FaqContent,
    ReviewCount,
    ReviewDepth,
    Certifications,
    UseCases,
}

impl ContextFactor {
    pub const ALL: [ContextFactor; 8] = [
        ContextFactor::TechnicalSpecifications,
        ContextFactor::CompatibilityInfo,
        ContextFactor::FeatureList,
        ContextFactor::FaqContent,
        ContextFactor::ReviewCount,
        ContextFactor::ReviewDepth,
        ContextFactor::Certifications,
        ContextFactor::UseCases,
    ];
}

/// Multiplier applied to a contextual factor's raw points
pub fn multiplier(context: PurchaseContext, factor: ContextFactor) -> f64 {
    use ContextFactor::*;
    use PurchaseContext::*;

    match (factor, context) {
        (TechnicalSpecifications, Want) => 0.6,
        (TechnicalSpecifications, Need) => 1.5,
        (TechnicalSpecifications, Hybrid) => 1.0,

        (CompatibilityInfo, Want) => 0.6,
        (CompatibilityInfo, Need) => 2.0,
        (CompatibilityInfo, Hybrid) => 1.0,

        (FeatureList, Want) => 1.3,
        (FeatureList, Need) => 0.9,
        (FeatureList, Hybrid) => 1.0,

        (FaqContent, Want) => 1.0,
        (FaqContent, Need) => 1.2,
        (FaqContent, Hybrid) => 1.1,

        (ReviewCount, Want) => 1.3,
        (ReviewCount, Need) => 1.0,
        (ReviewCount, Hybrid) => 1.15,

        (ReviewDepth, Want) => 1.4,
        (ReviewDepth, Need) => 1.0,
        (ReviewDepth, Hybrid) => 1.2,

        (Certifications, Want) => 0.8,
        (Certifications, Need) => 1.3,
        (Certifications, Hybrid) => 1.0,

        (UseCases, Want) => 1.3,
        (UseCases, Need) => 0.8,
        (UseCases, Hybrid) => 1.0,
    }
}
