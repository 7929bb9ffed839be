use url::Url;

/// Normalize a page URL for comparison: lowercase host, no fragment, no query,
/// no trailing slash on the path.
///
/// Falls back to trimming trailing slashes if the input cannot be parsed.
pub fn normalize_url(input: &str) -> String {
    match Url::parse(input.trim()) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.set_query(None);
            parsed.as_str().trim_end_matches('/').to_string()
        }
        Err(_) => input.trim().trim_end_matches('/').to_string(),
    }
}

/// Resolve a possibly relative href against the page URL
pub fn resolve_href(page_url: &str, href: &str) -> String {
    Url::parse(page_url)
        .and_then(|base| base.join(href.trim()))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.trim().to_string())
}

/// Path component of a URL without trailing slash; empty for the root
pub fn url_path(input: &str) -> String {
    match Url::parse(input.trim()) {
        Ok(parsed) => parsed.path().trim_end_matches('/').to_string(),
        Err(_) => String::new(),
    }
}

/// A canonical link is valid when it is the current page, or when the current
/// path ends with the canonical's path. Storefronts such as Shopify serve
/// `/collections/x/products/y` and canonicalize to `/products/y`.
pub fn canonical_matches(current_url: &str, canonical: &str) -> bool {
    let canonical = resolve_href(current_url, canonical);
    if normalize_url(current_url) == normalize_url(&canonical) {
        return true;
    }

    let current_path = url_path(current_url);
    let canonical_path = url_path(&canonical);
    if canonical_path.is_empty() {
        return false;
    }

    // Paths always start with '/', so a suffix match falls on a segment boundary
    current_path.ends_with(&canonical_path)
}

/// Host without a leading `www.`
pub fn domain_of(input: &str) -> String {
    Url::parse(input.trim())
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_standard_url() {
        let url = "https://Example.com/products/shoe/?variant=1#reviews";
        assert_eq!(normalize_url(url), "https://example.com/products/shoe");
    }

    #[test]
    fn trims_trailing_slash_when_parse_fails() {
        assert_eq!(normalize_url("example.com/"), "example.com");
    }

    #[test]
    fn canonical_exact_match() {
        assert!(canonical_matches(
            "https://shop.example.com/products/tee?utm_source=x",
            "https://shop.example.com/products/tee"
        ));
    }

    #[test]
    fn canonical_collection_scoped_url() {
        assert!(canonical_matches(
            "https://shop.example.com/collections/summer/products/tee",
            "https://shop.example.com/products/tee"
        ));
        assert!(canonical_matches(
            "https://shop.example.com/collections/summer/products/tee",
            "/products/tee"
        ));
    }

    #[test]
    fn canonical_different_page() {
        assert!(!canonical_matches(
            "https://shop.example.com/products/tee",
            "https://shop.example.com/products/hoodie"
        ));
        // Suffix must fall on a segment boundary
        assert!(!canonical_matches(
            "https://shop.example.com/products/big-tee",
            "https://shop.example.com/tee"
        ));
        assert!(!canonical_matches(
            "https://shop.example.com/products/tee",
            "https://shop.example.com/"
        ));
    }

    #[test]
    fn domain_strips_www() {
        assert_eq!(domain_of("https://www.example.com/a"), "example.com");
        assert_eq!(domain_of("not a url"), "");
    }
}
