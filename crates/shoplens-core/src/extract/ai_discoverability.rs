//! AI discoverability signals taken from the page itself
//!
//! Entity surfaces (the places a product name should appear), answer-format
//! patterns an assistant can quote, and freshness dates. Crawler access and
//! llms.txt are network facts and arrive separately at scoring time.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dates::parse_loose_date;
use crate::document::{PageDocument, element_text};
use crate::structured_data::{SchemaDates, SchemaEntitySet};
use crate::text::snippet;
use crate::types::{PatternMatch, Source};

/// Most visible dates kept per page
const MAX_VISIBLE_DATES: usize = 10;

/// Most answer-format matches kept per pattern
const MAX_MATCHES: usize = 10;

const DATE_TOKEN: &str = r"(\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{2,4}|[A-Za-z]{3,9}\.?[^\S\r\n]+\d{1,2},?[^\S\r\n]+\d{4}|\d{1,2}[^\S\r\n]+[A-Za-z]{3,9}\.?[^\S\r\n]+\d{4})";

/// Coarse classification of a visible date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateType {
    Updated,
    Published,
    Modified,
    AsOf,
    Generic,
}

/// Visible-date patterns, in priority order
static RE_VISIBLE_DATES: Lazy<Vec<(DateType, Regex)>> = Lazy::new(|| {
    [
        (
            DateType::Updated,
            r"(?i)\b(?:last[^\S\r\n]+)?updated(?:[^\S\r\n]+on)?[^\S\r\n]*:?[^\S\r\n]*",
        ),
        (
            DateType::Published,
            r"(?i)\b(?:published|posted)(?:[^\S\r\n]+on)?[^\S\r\n]*:?[^\S\r\n]*",
        ),
        (
            DateType::Modified,
            r"(?i)\blast[^\S\r\n]+modified(?:[^\S\r\n]+on)?[^\S\r\n]*:?[^\S\r\n]*",
        ),
        (DateType::AsOf, r"(?i)\bas[^\S\r\n]+of[^\S\r\n]+"),
        (DateType::Generic, r"(?i)\bdate[^\S\r\n]*:[^\S\r\n]*"),
    ]
    .into_iter()
    .map(|(date_type, prefix)| {
        let re = Regex::new(&format!("{prefix}{DATE_TOKEN}")).expect("invalid visible date regex");
        (date_type, re)
    })
    .collect()
});

static RE_BEST_FOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:best(?:[^\S\r\n]+suited)?|ideal|recommended)[^\S\r\n]+for[^\S\r\n]+[^\n\r.,;]{3,60}",
    )
    .expect("invalid best-for regex")
});

static RE_COMPARISON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:compared[^\S\r\n]+(?:to|with)|vs\.?|versus|unlike[^\S\r\n]+(?:other|most|traditional|standard)|(?:better|lighter|stronger|faster|quieter|longer|softer|warmer|smaller|cheaper)[^\S\r\n]+than)\b[^\n\r]{0,60}",
    )
    .expect("invalid comparison regex")
});

static RE_HOW_TO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:how[^\S\r\n]+to[^\S\r\n]+\w+|step[^\S\r\n]+\d+|instructions[^\S\r\n]*:|directions[^\S\r\n]*:|getting[^\S\r\n]+started)[^\n\r]{0,60}",
    )
    .expect("invalid how-to regex")
});

static RE_USE_CASES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:perfect[^\S\r\n]+for|great[^\S\r\n]+for|suitable[^\S\r\n]+for|works[^\S\r\n]+well[^\S\r\n]+for|use[^\S\r\n]+it[^\S\r\n]+(?:for|to|when)|use[^\S\r\n]+cases?[^\S\r\n]*:|whether[^\S\r\n]+you(?:'re|[^\S\r\n]+are))[^\n\r.]{3,80}",
    )
    .expect("invalid use-case regex")
});

/// The independent places a product's name should appear
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySurfaces {
    pub schema_name: Option<String>,
    pub h1: Option<String>,
    pub og_title: Option<String>,
    pub meta_description: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFormat {
    pub best_for: Vec<PatternMatch>,
    pub comparison: Option<PatternMatch>,
    pub how_to: Option<PatternMatch>,
    pub use_cases: Vec<PatternMatch>,
}

impl AnswerFormat {
    pub fn has_comparison(&self) -> bool {
        self.comparison.is_some()
    }

    pub fn has_how_to(&self) -> bool {
        self.how_to.is_some()
    }

    /// How many of the four answer-format signals are present
    pub fn signal_count(&self) -> usize {
        [
            !self.best_for.is_empty(),
            self.has_comparison(),
            self.has_how_to(),
            !self.use_cases.is_empty(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleDate {
    pub date_type: DateType,
    pub text: String,
    pub date: Option<NaiveDate>,
    /// Came from a `<time datetime>` element rather than a text pattern
    pub from_markup: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Freshness {
    /// JSON-LD dates, else Microdata dates, else date meta tags
    pub schema_dates: Option<SchemaDates>,
    pub visible_dates: Vec<VisibleDate>,
}

impl Freshness {
    /// Newest parseable date among schema and visible dates
    pub fn most_recent(&self) -> Option<NaiveDate> {
        let schema = self.schema_dates.iter().flat_map(|d| {
            [&d.date_modified, &d.date_published, &d.date_created]
                .into_iter()
                .filter_map(|v| v.as_deref().and_then(parse_loose_date))
        });
        let visible = self.visible_dates.iter().filter_map(|v| v.date);
        schema.chain(visible).max()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiDiscoverability {
    pub entities: EntitySurfaces,
    pub answer_format: AnswerFormat,
    pub freshness: Freshness,
}

pub fn extract_ai_discoverability(doc: &PageDocument, schemas: &SchemaEntitySet) -> AiDiscoverability {
    let text = doc.page_text();

    AiDiscoverability {
        entities: EntitySurfaces {
            schema_name: schemas.product.as_ref().and_then(|p| p.name.clone()),
            h1: doc
                .first("h1")
                .map(|h1| element_text(&h1))
                .filter(|t| !t.is_empty()),
            og_title: doc.meta_property("og:title"),
            meta_description: doc.meta_name("description"),
            title: doc.title(),
        },
        answer_format: answer_format(text),
        freshness: Freshness {
            schema_dates: schemas.dates.clone().or_else(|| meta_dates(doc)),
            visible_dates: visible_dates(doc, text),
        },
    }
}

fn matches(re: &Regex, text: &str, label: &str) -> Vec<PatternMatch> {
    re.find_iter(text)
        .take(MAX_MATCHES)
        .map(|m| PatternMatch {
            label: label.to_string(),
            text: snippet(m.as_str()),
            source: Source::Dom,
        })
        .collect()
}

fn answer_format(text: &str) -> AnswerFormat {
    AnswerFormat {
        best_for: matches(&RE_BEST_FOR, text, "best-for"),
        comparison: matches(&RE_COMPARISON, text, "comparison").into_iter().next(),
        how_to: matches(&RE_HOW_TO, text, "how-to").into_iter().next(),
        use_cases: matches(&RE_USE_CASES, text, "use-case"),
    }
}

/// Date meta tags, the last tier behind JSON-LD and Microdata
fn meta_dates(doc: &PageDocument) -> Option<SchemaDates> {
    let first_of = |keys: &[&str]| keys.iter().find_map(|key| doc.meta_property(key));

    let dates = SchemaDates {
        date_modified: first_of(&[
            "article:modified_time",
            "og:updated_time",
            "last-modified",
            "dcterms.modified",
        ]),
        date_published: first_of(&["article:published_time", "date", "dc.date", "dcterms.created"]),
        date_created: None,
        source: Source::Meta,
    };
    (dates.date_modified.is_some() || dates.date_published.is_some()).then_some(dates)
}

fn classify_context(context: &str) -> DateType {
    let context = context.to_lowercase();
    if context.contains("updated") {
        DateType::Updated
    } else if context.contains("published") || context.contains("posted") {
        DateType::Published
    } else if context.contains("modified") {
        DateType::Modified
    } else if context.contains("as of") {
        DateType::AsOf
    } else {
        DateType::Generic
    }
}

fn visible_dates(doc: &PageDocument, text: &str) -> Vec<VisibleDate> {
    let mut dates = Vec::new();

    for (date_type, re) in RE_VISIBLE_DATES.iter() {
        for caps in re.captures_iter(text) {
            let (Some(whole), Some(token)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            // "Last updated" also matches the Generic "date:" rule; keep the first
            if dates
                .iter()
                .any(|d: &VisibleDate| d.text.contains(token.as_str().trim()))
            {
                continue;
            }
            dates.push(VisibleDate {
                date_type: *date_type,
                text: snippet(whole.as_str()),
                date: parse_loose_date(token.as_str()),
                from_markup: false,
            });
        }
    }

    for time in doc.select("time[datetime]") {
        let Some(datetime) = time.value().attr("datetime") else {
            continue;
        };
        let context = time
            .parent()
            .and_then(scraper::ElementRef::wrap)
            .map(|p| element_text(&p))
            .unwrap_or_default();
        dates.push(VisibleDate {
            date_type: classify_context(&context),
            text: snippet(datetime),
            date: parse_loose_date(datetime),
            from_markup: true,
        });
    }

    dates.truncate(MAX_VISIBLE_DATES);
    dates
}
