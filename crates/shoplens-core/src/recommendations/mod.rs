//! Recommendation engine
//!
//! Six check functions, one per scoring category, inspect the score and the
//! extraction for fixed failure conditions. Each hit names a template id; the
//! engine instantiates the template, adjusts impact for the purchase context,
//! assigns a priority from the impact x effort matrix and sorts the result.

mod checks;
mod templates;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;
use crate::extract::ExtractionResult;
use crate::facts::NetworkFacts;
use crate::scoring::weights::ContextFactor;
use crate::scoring::{Category, ScoreResult, ScoringEngine};
use crate::types::PurchaseContext;

/// Impact or effort level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Medium,
    Low,
}

impl Level {
    fn raised(self) -> Self {
        match self {
            Level::Low => Level::Medium,
            _ => Level::High,
        }
    }

    fn lowered(self) -> Self {
        match self {
            Level::High => Level::Medium,
            _ => Level::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::High => "high",
            Level::Medium => "medium",
            Level::Low => "low",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority from 1 (do first) to 5
pub fn priority(impact: Level, effort: Level) -> u8 {
    use Level::*;

    match (impact, effort) {
        (High, Low) => 1,
        (High, Medium) => 2,
        (High, High) => 3,
        (Medium, Low) => 2,
        (Medium, Medium) => 3,
        (Medium, High) => 4,
        (Low, Low) => 3,
        (Low, Medium) => 4,
        (Low, High) => 5,
    }
}

/// Impact adjusted by a context multiplier: a strong weight escalates, a weak
/// one demotes
pub fn contextual_impact(base: Level, multiplier: f64) -> Level {
    if multiplier >= 1.5 {
        Level::High
    } else if multiplier >= 1.25 {
        base.raised()
    } else if multiplier <= 0.8 {
        base.lowered()
    } else {
        base
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Template id, e.g. `og-image-webp`
    pub id: String,
    pub title: String,
    pub description: String,
    pub impact: Level,
    pub effort: Level,
    pub category: Category,
    /// 1 (highest) to 5 (lowest)
    pub priority: u8,
    /// How to fix it
    pub implementation: String,
    /// Why the purchase context changed the impact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contextual: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_state: Option<String>,
}

/// One failed check, before template lookup
#[derive(Debug, Clone, Default)]
pub(crate) struct Finding {
    pub id: &'static str,
    /// Context factor whose multiplier re-derives the impact
    pub context_factor: Option<ContextFactor>,
    pub current_state: Option<String>,
    pub target_state: Option<String>,
}

impl Finding {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn contextual(mut self, factor: ContextFactor) -> Self {
        self.context_factor = Some(factor);
        self
    }

    pub fn current(mut self, state: impl Into<String>) -> Self {
        self.current_state = Some(state.into());
        self
    }

    pub fn target(mut self, state: impl Into<String>) -> Self {
        self.target_state = Some(state.into());
        self
    }
}

/// Sorted recommendations with derived views
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recommendations(Vec<Recommendation>);

impl Recommendations {
    /// Sort by priority, then impact; equal entries keep check order
    fn sorted(mut items: Vec<Recommendation>) -> Self {
        items.sort_by_key(|r| (r.priority, r.impact));
        Self(items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recommendation> {
        self.0.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Recommendation> {
        self.0.iter().find(|r| r.id == id)
    }

    pub fn top(&self, n: usize) -> &[Recommendation] {
        &self.0[..n.min(self.0.len())]
    }

    pub fn by_category(&self, category: Category) -> Vec<&Recommendation> {
        self.0.iter().filter(|r| r.category == category).collect()
    }

    /// High-impact items
    pub fn critical(&self) -> Vec<&Recommendation> {
        self.0.iter().filter(|r| r.impact == Level::High).collect()
    }

    /// High or medium impact at low effort
    pub fn quick_wins(&self) -> Vec<&Recommendation> {
        self.0
            .iter()
            .filter(|r| r.impact != Level::Low && r.effort == Level::Low)
            .collect()
    }

    pub fn into_vec(self) -> Vec<Recommendation> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Recommendations {
    type Item = &'a Recommendation;
    type IntoIter = std::slice::Iter<'a, Recommendation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Everything the checks read
pub(crate) struct CheckInput<'a> {
    pub score: &'a ScoreResult,
    pub extraction: &'a ExtractionResult,
    pub facts: &'a NetworkFacts,
}

pub struct RecommendationEngine {
    scoring: ScoringEngine,
}

impl RecommendationEngine {
    pub fn new(context: PurchaseContext) -> Self {
        Self {
            scoring: ScoringEngine::new(context),
        }
    }

    pub fn generate(
        &self,
        score: &ScoreResult,
        extraction: &ExtractionResult,
        facts: &NetworkFacts,
    ) -> Recommendations {
        let input = CheckInput {
            score,
            extraction,
            facts,
        };

        let findings = [
            checks::structured_data(&input),
            checks::protocol_meta(&input),
            checks::content_quality(&input),
            checks::content_structure(&input),
            checks::authority_trust(&input),
            checks::ai_discoverability(&input),
        ];

        let items: Vec<Recommendation> = findings
            .into_iter()
            .flatten()
            .filter_map(|finding| self.instantiate(finding))
            .collect();

        log::debug!("{} recommendations for {}", items.len(), extraction.page_info.url);
        Recommendations::sorted(items)
    }

    fn instantiate(&self, finding: Finding) -> Option<Recommendation> {
        let Some(template) = templates::template(finding.id) else {
            log::warn!("{}", CoreError::UnknownRecommendation(finding.id.to_string()));
            return None;
        };

        let mut impact = template.impact;
        let mut contextual = None;
        if let Some(factor) = finding.context_factor {
            let multiplier = self.scoring.multiplier(factor);
            impact = contextual_impact(template.impact, multiplier);
            if impact != template.impact {
                contextual = Some(format!(
                    "Impact {} for {} purchases (weight x{multiplier})",
                    if impact < template.impact { "raised" } else { "lowered" },
                    self.scoring.context()
                ));
            }
        }

        Some(Recommendation {
            id: template.id.to_string(),
            title: template.title.to_string(),
            description: template.description.to_string(),
            impact,
            effort: template.effort,
            category: template.category,
            priority: priority(impact, template.effort),
            implementation: template.implementation.to_string(),
            contextual,
            current_state: finding.current_state,
            target_state: finding.target_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, impact: Level, effort: Level) -> Recommendation {
        Recommendation {
            id: id.to_string(),
            title: String::new(),
            description: String::new(),
            impact,
            effort,
            category: Category::StructuredData,
            priority: priority(impact, effort),
            implementation: String::new(),
            contextual: None,
            current_state: None,
            target_state: None,
        }
    }

    #[test]
    fn test_priority_matrix() {
        assert_eq!(priority(Level::High, Level::Low), 1);
        assert_eq!(priority(Level::High, Level::High), 3);
        assert_eq!(priority(Level::Medium, Level::Low), 2);
        assert_eq!(priority(Level::Low, Level::Low), 3);
        assert_eq!(priority(Level::Low, Level::High), 5);
    }

    #[test]
    fn test_contextual_impact() {
        assert_eq!(contextual_impact(Level::Medium, 2.0), Level::High);
        assert_eq!(contextual_impact(Level::Low, 1.5), Level::High);
        assert_eq!(contextual_impact(Level::Low, 1.3), Level::Medium);
        assert_eq!(contextual_impact(Level::Medium, 1.0), Level::Medium);
        assert_eq!(contextual_impact(Level::Medium, 0.6), Level::Low);
        assert_eq!(contextual_impact(Level::Low, 0.8), Level::Low);
    }

    #[test]
    fn test_sort_priority_then_impact_stable() {
        let list = Recommendations::sorted(vec![
            rec("low-low", Level::Low, Level::Low),         // 3
            rec("high-high", Level::High, Level::High),     // 3
            rec("medium-low", Level::Medium, Level::Low),   // 2
            rec("high-medium", Level::High, Level::Medium), // 2
            rec("high-low-a", Level::High, Level::Low),     // 1
            rec("high-low-b", Level::High, Level::Low),     // 1
        ]);
        let ids: Vec<&str> = list.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            ["high-low-a", "high-low-b", "high-medium", "medium-low", "high-high", "low-low"]
        );
    }

    #[test]
    fn test_views() {
        let list = Recommendations::sorted(vec![
            rec("a", Level::High, Level::Low),
            rec("b", Level::Medium, Level::Low),
            rec("c", Level::Low, Level::Low),
            rec("d", Level::High, Level::High),
        ]);
        assert_eq!(list.top(2).len(), 2);
        assert_eq!(list.top(10).len(), 4);
        assert_eq!(list.critical().len(), 2);
        let quick: Vec<&str> = list.quick_wins().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(quick, ["a", "b"]);
        assert_eq!(list.by_category(Category::StructuredData).len(), 4);
        assert_eq!(list.by_category(Category::ProtocolMeta).len(), 0);
    }

    #[test]
    fn test_unknown_template_is_skipped() {
        let engine = RecommendationEngine::new(PurchaseContext::Hybrid);
        assert!(engine.instantiate(Finding::new("no-such-template")).is_none());
        let found = engine.instantiate(Finding::new("og-image-missing")).unwrap();
        assert_eq!(found.priority, 1);
    }

    #[test]
    fn test_need_escalates_compatibility() {
        let need = RecommendationEngine::new(PurchaseContext::Need);
        let finding = Finding::new("compatibility-missing").contextual(ContextFactor::CompatibilityInfo);
        let rec = need.instantiate(finding.clone()).unwrap();
        assert_eq!(rec.impact, Level::High);
        assert_eq!(rec.priority, 1);
        assert!(rec.contextual.unwrap().contains("need"));

        let want = RecommendationEngine::new(PurchaseContext::Want);
        let rec = want.instantiate(finding).unwrap();
        assert_eq!(rec.impact, Level::Low);
    }
}
