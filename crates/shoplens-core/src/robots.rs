//! Robots.txt parser for AI crawler access
//!
//! Parses robots.txt text into per-agent rules and reports which of the
//! monitored AI crawlers may fetch a given product path. Fetching the file is
//! the caller's job; the result is handed to scoring as a [`RobotsFact`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::facts::RobotsFact;

/// AI crawler user agents whose access is scored
pub const AI_CRAWLERS: &[&str] = &[
    "GPTBot",            // OpenAI training
    "ChatGPT-User",      // OpenAI ChatGPT browsing
    "OAI-SearchBot",     // OpenAI search
    "ClaudeBot",         // Anthropic Claude
    "Claude-Web",        // Anthropic Claude web
    "anthropic-ai",      // Anthropic general
    "PerplexityBot",     // Perplexity AI
    "Google-Extended",   // Google Gemini
    "Applebot-Extended", // Apple Intelligence
    "CCBot",             // Common Crawl
    "Bytespider",        // ByteDance
    "Amazonbot",         // Amazon
];

/// Rules for a specific user agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRules {
    pub disallow: Vec<String>,
    pub allow: Vec<String>,
}

impl AgentRules {
    /// Longest-match wins; `Allow` wins ties
    pub fn allows(&self, path: &str) -> bool {
        let longest = |rules: &[String]| {
            rules
                .iter()
                .filter(|rule| path.starts_with(rule.trim_end_matches('*')))
                .map(|rule| rule.len())
                .max()
        };

        match (longest(&self.allow), longest(&self.disallow)) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(allow), Some(disallow)) => allow >= disallow,
        }
    }
}

/// Access level for a crawler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// May fetch the path
    Allowed,
    /// Disallowed for the path
    Blocked,
    /// No group names the crawler and there is no `*` group
    Default,
}

/// Status for a specific AI crawler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiCrawlerStatus {
    pub name: String,
    pub access: AccessLevel,
    /// Which group decided: the crawler's own name or `*`
    pub matched_group: Option<String>,
}

/// Parsed robots.txt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotsTxtAnalysis {
    /// Rules keyed by lowercased user agent
    pub agent_rules: HashMap<String, AgentRules>,
    pub sitemaps: Vec<String>,
}

/// Parse robots.txt content.
///
/// Consecutive `User-agent` lines form one group that shares the rules
/// following them.
pub fn parse_robots_txt(content: &str) -> RobotsTxtAnalysis {
    let mut analysis = RobotsTxtAnalysis::default();
    let mut group_agents: Vec<String> = Vec::new();
    let mut group_rules = AgentRules::default();
    let mut in_rules = false;

    let flush = |analysis: &mut RobotsTxtAnalysis, agents: &[String], rules: &AgentRules| {
        for agent in agents {
            let entry = analysis.agent_rules.entry(agent.clone()).or_default();
            entry.disallow.extend(rules.disallow.iter().cloned());
            entry.allow.extend(rules.allow.iter().cloned());
        }
    };

    for line in content.lines() {
        // Strip comments
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let Some((directive, value)) = line.split_once(':') else {
            continue;
        };
        let directive = directive.trim().to_ascii_lowercase();
        let value = value.trim();

        match directive.as_str() {
            "user-agent" => {
                if in_rules {
                    flush(&mut analysis, &group_agents, &group_rules);
                    group_agents.clear();
                    group_rules = AgentRules::default();
                    in_rules = false;
                }
                group_agents.push(value.to_ascii_lowercase());
            }
            "disallow" => {
                in_rules = true;
                if !value.is_empty() {
                    group_rules.disallow.push(value.to_string());
                }
            }
            "allow" => {
                in_rules = true;
                if !value.is_empty() {
                    group_rules.allow.push(value.to_string());
                }
            }
            "sitemap" => {
                if !value.is_empty() {
                    analysis.sitemaps.push(value.to_string());
                }
            }
            _ => {
                // crawl-delay, host and friends do not affect access
            }
        }
    }

    flush(&mut analysis, &group_agents, &group_rules);
    analysis
}

impl RobotsTxtAnalysis {
    /// Access for one crawler to `path`; a named group overrides `*`
    pub fn crawler_status(&self, crawler: &str, path: &str) -> AiCrawlerStatus {
        let own = crawler.to_ascii_lowercase();
        let (group, rules) = match self.agent_rules.get(&own) {
            Some(rules) => (Some(crawler.to_string()), Some(rules)),
            None => match self.agent_rules.get("*") {
                Some(rules) => (Some("*".to_string()), Some(rules)),
                None => (None, None),
            },
        };

        let access = match rules {
            Some(rules) if rules.allows(path) => AccessLevel::Allowed,
            Some(_) => AccessLevel::Blocked,
            None => AccessLevel::Default,
        };

        AiCrawlerStatus {
            name: crawler.to_string(),
            access,
            matched_group: group,
        }
    }

    /// Status of every monitored AI crawler for `path`
    pub fn ai_crawler_status(&self, path: &str) -> Vec<AiCrawlerStatus> {
        AI_CRAWLERS
            .iter()
            .map(|crawler| self.crawler_status(crawler, path))
            .collect()
    }

    /// Summarize for scoring
    pub fn to_fact(&self, path: &str) -> RobotsFact {
        let (blocked, allowed): (Vec<_>, Vec<_>) = self
            .ai_crawler_status(path)
            .into_iter()
            .partition(|status| status.access == AccessLevel::Blocked);

        RobotsFact {
            accessible: true,
            exists: true,
            error: None,
            blocked_crawlers: blocked.into_iter().map(|s| s.name).collect(),
            allowed_crawlers: allowed.into_iter().map(|s| s.name).collect(),
        }
    }
}
