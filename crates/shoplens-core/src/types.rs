//! Common types used across shoplens-core

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where an extracted fact came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    /// Visible page markup
    Dom,
    /// JSON-LD structured data
    Schema,
    /// Microdata (`itemscope`/`itemprop`)
    Microdata,
    /// A brand/manufacturer object nested inside a Product entity
    ProductNested,
    /// `<meta>` tags
    Meta,
    /// A network-verified fact supplied by the caller
    Network,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Source::Dom => "dom",
            Source::Schema => "schema",
            Source::Microdata => "microdata",
            Source::ProductNested => "product-nested",
            Source::Meta => "meta",
            Source::Network => "network",
        };
        f.write_str(label)
    }
}

/// Purchase motivation used to reweight which content signals matter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseContext {
    /// Emotional, aspirational purchases (fashion, gifts, decor)
    Want,
    /// Functional purchases driven by specs and fit (parts, tools, electronics)
    Need,
    /// Mixed motivation
    #[default]
    Hybrid,
}

impl PurchaseContext {
    pub const ALL: [PurchaseContext; 3] = [
        PurchaseContext::Want,
        PurchaseContext::Need,
        PurchaseContext::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseContext::Want => "want",
            PurchaseContext::Need => "need",
            PurchaseContext::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for PurchaseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PurchaseContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "want" => Ok(PurchaseContext::Want),
            "need" => Ok(PurchaseContext::Need),
            "hybrid" => Ok(PurchaseContext::Hybrid),
            other => Err(format!(
                "unknown context '{other}' (expected want, need or hybrid)"
            )),
        }
    }
}

/// A regex hit kept for display: which rule matched and the literal text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMatch {
    pub label: String,
    pub text: String,
    pub source: Source,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_str() {
        assert_eq!("want".parse::<PurchaseContext>(), Ok(PurchaseContext::Want));
        assert_eq!(" NEED ".parse::<PurchaseContext>(), Ok(PurchaseContext::Need));
        assert!("maybe".parse::<PurchaseContext>().is_err());
    }

    #[test]
    fn test_source_serializes_kebab_case() {
        let json = serde_json::to_string(&Source::ProductNested).unwrap();
        assert_eq!(json, "\"product-nested\"");
        assert_eq!(Source::ProductNested.to_string(), "product-nested");
    }
}
