//! Protocol and meta tags: title, description, canonical, robots, Open Graph,
//! Twitter cards and product price meta

use serde::{Deserialize, Serialize};

use crate::document::PageDocument;
use crate::url_utils::{canonical_matches, resolve_href};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub og_type: Option<String>,
    pub url: Option<String>,
    pub site_name: Option<String>,
    /// Declared `og:image`, resolved against the page URL
    pub image: Option<String>,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
    pub image_alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterCard {
    pub card: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// `product:price:*` Open Graph extensions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMeta {
    pub price: Option<String>,
    pub currency: Option<String>,
    pub availability: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTags {
    pub title: Option<String>,
    pub description: Option<String>,
    pub canonical: Option<String>,
    /// Canonical points at this page (or a flatter URL of the same product)
    pub canonical_valid: bool,
    pub robots: Option<String>,
    pub noindex: bool,
    pub nofollow: bool,
    pub viewport: Option<String>,
    pub lang: Option<String>,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    pub product: ProductMeta,
}

pub fn extract_meta_tags(doc: &PageDocument) -> MetaTags {
    let canonical = doc.link_href("canonical").map(|href| resolve_href(doc.url(), &href));
    let canonical_valid = canonical
        .as_deref()
        .is_some_and(|c| canonical_matches(doc.url(), c));

    // `googlebot` directives count too; either one can deindex the page
    let robots = [doc.meta_name("robots"), doc.meta_name("googlebot")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    let directives = robots.join(",").to_ascii_lowercase();
    let has_directive = |name: &str| {
        directives
            .split(',')
            .any(|d| d.trim() == name || d.trim() == "none")
    };

    MetaTags {
        title: doc.title(),
        description: doc.meta_name("description"),
        canonical,
        canonical_valid,
        robots: if robots.is_empty() {
            None
        } else {
            Some(robots.join(", "))
        },
        noindex: has_directive("noindex"),
        nofollow: has_directive("nofollow"),
        viewport: doc.meta_name("viewport"),
        lang: doc.lang(),
        open_graph: open_graph(doc),
        twitter: TwitterCard {
            card: doc.meta_name("twitter:card"),
            title: doc.meta_name("twitter:title"),
            description: doc.meta_name("twitter:description"),
            image: doc.meta_name("twitter:image"),
        },
        product: ProductMeta {
            price: doc
                .meta_property("product:price:amount")
                .or_else(|| doc.meta_property("og:price:amount")),
            currency: doc
                .meta_property("product:price:currency")
                .or_else(|| doc.meta_property("og:price:currency")),
            availability: doc
                .meta_property("product:availability")
                .or_else(|| doc.meta_property("og:availability")),
        },
    }
}

fn open_graph(doc: &PageDocument) -> OpenGraph {
    let dimension = |key: &str| {
        doc.meta_property(key)
            .and_then(|v| v.trim().trim_end_matches("px").parse::<u32>().ok())
    };

    OpenGraph {
        title: doc.meta_property("og:title"),
        description: doc.meta_property("og:description"),
        og_type: doc.meta_property("og:type"),
        url: doc.meta_property("og:url"),
        site_name: doc.meta_property("og:site_name"),
        image: doc
            .meta_property("og:image")
            .or_else(|| doc.meta_property("og:image:secure_url"))
            .or_else(|| doc.meta_property("og:image:url"))
            .map(|src| resolve_href(doc.url(), &src)),
        image_width: dimension("og:image:width"),
        image_height: dimension("og:image:height"),
        image_alt: doc.meta_property("og:image:alt"),
    }
}
