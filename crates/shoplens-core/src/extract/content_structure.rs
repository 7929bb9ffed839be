//! Content structure: headings, landmarks, accessibility, images, lists and
//! tables, and client-side rendering dependency
//!
//! Semantic elements and ARIA attributes tell an AI reader which part of the
//! page is the product. A page whose content lives in an empty framework root
//! may be understated by every other extractor.

use serde::{Deserialize, Serialize};

use crate::document::{PageDocument, block_text, element_text};

/// Mount points used by client-rendered storefront frameworks
const FRAMEWORK_ROOTS: &[(&str, &str)] = &[
    ("#__next", "Next.js"),
    ("#__nuxt", "Nuxt"),
    ("#___gatsby", "Gatsby"),
    ("[data-reactroot]", "React"),
    ("[ng-version]", "Angular"),
    ("#root", "React"),
    ("#app", "Vue"),
];

/// A framework root with less text than this is treated as an unrendered shell
const MIN_RENDERED_CHARS: usize = 200;

/// Heading hierarchy analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingAnalysis {
    pub h1_count: usize,
    /// Text of the first `<h1>`
    pub h1_text: Option<String>,
    /// Heading distribution (h1, h2, h3, h4, h5, h6)
    pub distribution: Vec<usize>,
    /// Has proper hierarchy (no skipped levels)
    pub proper_hierarchy: bool,
    pub hierarchy_issues: Vec<String>,
}

impl HeadingAnalysis {
    pub fn has_single_h1(&self) -> bool {
        self.h1_count == 1
    }
}

/// Landmark region analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkAnalysis {
    /// Has <main> or role="main"
    pub has_main: bool,
    /// Has <nav> or role="navigation"
    pub has_navigation: bool,
    /// Has <header> or role="banner"
    pub has_header: bool,
    /// Has <footer> or role="contentinfo"
    pub has_footer: bool,
    pub article_count: usize,
    pub section_count: usize,
    pub aside_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityAnalysis {
    pub lang: Option<String>,
    /// Elements with aria-label or aria-labelledby
    pub labeled_elements: usize,
    pub described_elements: usize,
    pub live_regions: usize,
    pub has_skip_link: bool,
    pub total_inputs: usize,
    pub labeled_inputs: usize,
}

/// Image accessibility
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    pub total_images: usize,
    pub images_with_alt: usize,
    /// Decorative images (alt="")
    pub decorative_images: usize,
    pub images_missing_alt: usize,
    pub lazy_loaded: usize,
}

impl ImageAnalysis {
    /// Share of images carrying a non-empty alt, 0.0 to 1.0
    pub fn alt_coverage(&self) -> f64 {
        if self.total_images == 0 {
            return 0.0;
        }
        self.images_with_alt.saturating_sub(self.decorative_images) as f64
            / self.total_images as f64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTableAnalysis {
    pub lists: usize,
    pub list_items: usize,
    pub tables: usize,
    pub definition_lists: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsDependency {
    /// Framework that owns the mount point, if one was found
    pub framework: Option<String>,
    pub root_text_length: usize,
    pub body_text_length: usize,
    pub script_count: usize,
    pub js_dependent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStructure {
    pub headings: HeadingAnalysis,
    pub landmarks: LandmarkAnalysis,
    pub accessibility: AccessibilityAnalysis,
    pub images: ImageAnalysis,
    pub lists_tables: ListTableAnalysis,
    pub js: JsDependency,
    /// Breadcrumb navigation rendered in the page
    pub has_breadcrumb_nav: bool,
}

pub fn extract_content_structure(doc: &PageDocument) -> ContentStructure {
    ContentStructure {
        headings: analyze_headings(doc),
        landmarks: analyze_landmarks(doc),
        accessibility: analyze_accessibility(doc),
        images: analyze_images(doc),
        lists_tables: ListTableAnalysis {
            lists: doc.count("ul, ol"),
            list_items: doc.count("li"),
            tables: doc.count("table"),
            definition_lists: doc.count("dl"),
        },
        js: analyze_js_dependency(doc),
        has_breadcrumb_nav: doc.exists(
            "nav[aria-label*='readcrumb'], [class*='breadcrumb'], [id*='breadcrumb']",
        ),
    }
}

fn analyze_headings(doc: &PageDocument) -> HeadingAnalysis {
    let distribution: Vec<usize> = (1..=6).map(|level| doc.count(&format!("h{level}"))).collect();
    let h1_text = doc
        .first("h1")
        .map(|h1| element_text(&h1))
        .filter(|t| !t.is_empty());

    // Check hierarchy (no skipped levels)
    let mut proper_hierarchy = true;
    let mut hierarchy_issues = Vec::new();
    let mut last_level = 0;

    for (level, &count) in distribution.iter().enumerate() {
        if count > 0 {
            let current_level = level + 1;
            if last_level > 0 && current_level > last_level + 1 {
                proper_hierarchy = false;
                hierarchy_issues.push(format!(
                    "Heading hierarchy jumps from <h{last_level}> to <h{current_level}>"
                ));
            }
            last_level = current_level;
        }
    }

    let h1_count = distribution[0];
    if h1_count == 0 && distribution.iter().any(|&c| c > 0) {
        proper_hierarchy = false;
        hierarchy_issues.push("Headings present but no <h1>".to_string());
    }

    HeadingAnalysis {
        h1_count,
        h1_text,
        distribution,
        proper_hierarchy,
        hierarchy_issues,
    }
}

fn analyze_landmarks(doc: &PageDocument) -> LandmarkAnalysis {
    LandmarkAnalysis {
        has_main: doc.exists("main, [role='main']"),
        has_navigation: doc.exists("nav, [role='navigation']"),
        has_header: doc.exists("header, [role='banner']"),
        has_footer: doc.exists("footer, [role='contentinfo']"),
        article_count: doc.count("article, [role='article']"),
        section_count: doc.count("section"),
        aside_count: doc.count("aside, [role='complementary']"),
    }
}

fn analyze_accessibility(doc: &PageDocument) -> AccessibilityAnalysis {
    let total_inputs = doc.count("input:not([type='hidden']), select, textarea");

    // Inputs with an aria label, a wrapping label, or a label[for] pointing at them
    let label_targets: Vec<String> = doc
        .select("label[for]")
        .into_iter()
        .filter_map(|l| l.value().attr("for").map(str::to_string))
        .collect();
    let labeled_inputs = doc
        .select("input:not([type='hidden']), select, textarea")
        .into_iter()
        .filter(|input| {
            let value = input.value();
            value.attr("aria-label").is_some()
                || value.attr("aria-labelledby").is_some()
                || value.attr("id").is_some_and(|id| label_targets.iter().any(|t| t == id))
                || crate::document::has_ancestor(input, &["label"], &[])
        })
        .count();

    AccessibilityAnalysis {
        lang: doc.lang(),
        labeled_elements: doc.count("[aria-label], [aria-labelledby]"),
        described_elements: doc.count("[aria-describedby]"),
        live_regions: doc.count("[aria-live]"),
        has_skip_link: doc.exists("a[href='#main'], a[href='#content'], a[href='#MainContent'], a[class*='skip']"),
        total_inputs,
        labeled_inputs,
    }
}

fn analyze_images(doc: &PageDocument) -> ImageAnalysis {
    let total_images = doc.count("img");
    let images_with_alt = doc.count("img[alt]");
    let decorative_images = doc.count("img[alt='']");

    ImageAnalysis {
        total_images,
        images_with_alt,
        decorative_images,
        images_missing_alt: total_images.saturating_sub(images_with_alt),
        lazy_loaded: doc.count("img[loading='lazy'], img[data-src], img[data-srcset]"),
    }
}

fn analyze_js_dependency(doc: &PageDocument) -> JsDependency {
    let body_text_length = doc.page_text().chars().count();
    let script_count = doc.count("script[src], script:not([type])");

    let root = FRAMEWORK_ROOTS
        .iter()
        .find_map(|(selector, name)| doc.first(selector).map(|el| (el, *name)));

    let Some((root, framework)) = root else {
        // No mount point, but a script-heavy page with almost no text
        let js_dependent = body_text_length < MIN_RENDERED_CHARS / 2 && script_count >= 5;
        return JsDependency {
            framework: None,
            root_text_length: 0,
            body_text_length,
            script_count,
            js_dependent,
        };
    };

    let root_text_length = block_text(&root).chars().count();
    let js_dependent = root_text_length < MIN_RENDERED_CHARS;
    if js_dependent {
        log::debug!("{framework} root holds only {root_text_length} chars of text");
    }

    JsDependency {
        framework: Some(framework.to_string()),
        root_text_length,
        body_text_length,
        script_count,
        js_dependent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn structure(html: &str) -> ContentStructure {
        extract_content_structure(&PageDocument::parse(html, "https://shop.example.com/p", Utc::now()))
    }

    #[test]
    fn test_good_semantic_html() {
        let cs = structure(r#"
        <!DOCTYPE html>
        <html lang="en">
        <head><title>Test</title></head>
        <body>
            <header><h1>Trail Lantern</h1></header>
            <nav aria-label="Breadcrumb"><a href="/">Home</a></nav>
            <main>
                <article>
                    <h2>Details</h2>
                    <img src="a.jpg" alt="Lantern on a table">
                    <img src="b.jpg" alt="" loading="lazy">
                    <ul><li>One</li></ul>
                </article>
            </main>
            <footer>Footer</footer>
        </body>
        </html>
        "#);

        assert!(cs.landmarks.has_main);
        assert!(cs.landmarks.has_navigation);
        assert!(cs.headings.has_single_h1());
        assert_eq!(cs.headings.h1_text.as_deref(), Some("Trail Lantern"));
        assert!(cs.headings.proper_hierarchy);
        assert_eq!(cs.images.decorative_images, 1);
        assert_eq!(cs.images.lazy_loaded, 1);
        assert!((cs.images.alt_coverage() - 0.5).abs() < f64::EPSILON);
        assert!(cs.has_breadcrumb_nav);
        assert_eq!(cs.accessibility.lang.as_deref(), Some("en"));
        assert!(!cs.js.js_dependent);
    }

    #[test]
    fn test_poor_semantic_html() {
        let cs = structure(r#"
            <div class="header"><div class="title">Title</div></div>
            <h3>Skipped</h3>
            <img src="x.jpg">
        "#);

        assert!(!cs.landmarks.has_main);
        assert!(!cs.headings.has_single_h1());
        assert!(!cs.headings.proper_hierarchy);
        assert_eq!(cs.images.images_missing_alt, 1);
    }

    #[test]
    fn test_hierarchy_jump() {
        let cs = structure("<h1>A</h1><h3>B</h3>");
        assert!(!cs.headings.proper_hierarchy);
        assert_eq!(cs.headings.hierarchy_issues.len(), 1);
    }

    #[test]
    fn test_empty_framework_root_is_js_dependent() {
        let cs = structure(r#"<body><div id="__next"><div class="spinner">Loading…</div></div>
            <script src="/_next/main.js"></script></body>"#);
        assert!(cs.js.js_dependent);
        assert_eq!(cs.js.framework.as_deref(), Some("Next.js"));
    }

    #[test]
    fn test_rendered_framework_root_is_not_js_dependent() {
        let body = "Hand-poured soy candle with a cotton wick. ".repeat(10);
        let cs = structure(&format!(r#"<body><div id="root"><p>{body}</p></div></body>"#));
        assert!(!cs.js.js_dependent);
        assert_eq!(cs.js.framework.as_deref(), Some("React"));
    }

    #[test]
    fn test_form_labels() {
        let cs = structure(r#"
            <label for="qty">Quantity</label><input id="qty" type="number">
            <label>Gift note <input type="text"></label>
            <input type="email">
            <input type="hidden" name="token">
        "#);
        assert_eq!(cs.accessibility.total_inputs, 3);
        assert_eq!(cs.accessibility.labeled_inputs, 2);
    }
}
