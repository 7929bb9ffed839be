//! Static recommendation templates, keyed by id

use super::Level::{self, High, Low, Medium};
use crate::scoring::Category::{self, *};

pub(crate) struct Template {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub impact: Level,
    pub effort: Level,
    pub category: Category,
    pub implementation: &'static str,
}

const fn t(
    id: &'static str,
    category: Category,
    impact: Level,
    effort: Level,
    title: &'static str,
    description: &'static str,
    implementation: &'static str,
) -> Template {
    Template {
        id,
        title,
        description,
        impact,
        effort,
        category,
        implementation,
    }
}

pub(crate) static TEMPLATES: &[Template] = &[
    // Structured Data
    t(
        "product-schema-missing",
        StructuredData,
        High,
        Low,
        "Add Product structured data",
        "No Product or ProductGroup JSON-LD was found. AI answer engines rely on it to identify the product, its price and its ratings.",
        "Add a <script type=\"application/ld+json\"> block with @type Product including name, description, image, brand, sku/gtin, offers and aggregateRating.",
    ),
    t(
        "json-ld-parse-errors",
        StructuredData,
        High,
        Low,
        "Fix invalid JSON-LD",
        "At least one JSON-LD block could not be parsed and is ignored by every consumer.",
        "Validate each block with a JSON linter or the Schema Markup Validator; look for trailing commas, unescaped quotes and template placeholders.",
    ),
    t(
        "offer-schema-missing",
        StructuredData,
        High,
        Low,
        "Add an Offer with price and availability",
        "The Product has no offers, so price and stock status cannot be quoted.",
        "Add \"offers\": {\"@type\": \"Offer\", \"price\", \"priceCurrency\", \"availability\"} to the Product. For ProductGroups, put offers on each variant.",
    ),
    t(
        "product-identifiers-missing",
        StructuredData,
        Medium,
        Low,
        "Add product identifiers",
        "Fewer than two of GTIN, MPN and SKU are present. Identifiers let AI systems match the product across retailers.",
        "Add gtin13 (or gtin), mpn and sku to the Product. Use the manufacturer's barcode for GTIN.",
    ),
    t(
        "aggregate-rating-missing",
        StructuredData,
        High,
        Medium,
        "Mark up review ratings",
        "Reviews are visible on the page but there is no AggregateRating in the structured data.",
        "Add \"aggregateRating\": {\"@type\": \"AggregateRating\", \"ratingValue\", \"reviewCount\"} to the Product, fed from your review platform.",
    ),
    t(
        "breadcrumb-schema-missing",
        StructuredData,
        Medium,
        Low,
        "Add BreadcrumbList structured data",
        "No BreadcrumbList was found. Breadcrumbs place the product in your category tree.",
        "Emit a BreadcrumbList with one ListItem per level (position, name, item URL).",
    ),
    t(
        "organization-schema-missing",
        StructuredData,
        Low,
        Low,
        "Add Organization structured data",
        "No Organization entity identifies the seller.",
        "Add an Organization block with name, url, logo and sameAs links to your official profiles, usually in the site-wide layout.",
    ),
    t(
        "faq-schema-missing",
        StructuredData,
        Medium,
        Low,
        "Mark up the FAQ section",
        "The page has FAQ content but no FAQPage structured data.",
        "Wrap the questions in a FAQPage JSON-LD block with one Question/acceptedAnswer pair per entry.",
    ),
    // Protocol & Meta
    t(
        "og-image-missing",
        ProtocolMeta,
        High,
        Low,
        "Add an og:image",
        "Without og:image, shared links and AI citations show no product image.",
        "Add <meta property=\"og:image\" content=\"https://...\"> pointing to a JPEG or PNG product photo of at least 1200x630.",
    ),
    t(
        "og-image-webp",
        ProtocolMeta,
        High,
        Low,
        "Serve og:image as JPEG or PNG",
        "The og:image is WebP, which many chat apps and social platforms do not render in link previews.",
        "Point og:image at a JPEG or PNG rendition. Keep WebP for on-page <img> elements.",
    ),
    t(
        "og-image-format",
        ProtocolMeta,
        Medium,
        Low,
        "Use a widely supported og:image format",
        "The og:image format is not one that link unfurlers reliably support.",
        "Serve og:image as JPEG, PNG or GIF.",
    ),
    t(
        "og-image-dimensions",
        ProtocolMeta,
        Low,
        Low,
        "Declare og:image dimensions and alt text",
        "og:image:width/height are missing or below 1200x630, or og:image:alt is missing.",
        "Add og:image:width, og:image:height and og:image:alt meta tags and use an image of at least 1200x630.",
    ),
    t(
        "og-tags-incomplete",
        ProtocolMeta,
        Medium,
        Low,
        "Complete the Open Graph tags",
        "Core Open Graph tags are missing.",
        "Add og:title, og:description, og:type (product), og:url and og:site_name.",
    ),
    t(
        "twitter-card-missing",
        ProtocolMeta,
        Low,
        Low,
        "Add Twitter Card tags",
        "No twitter:card tag was found.",
        "Add <meta name=\"twitter:card\" content=\"summary_large_image\"> plus twitter:title and twitter:image.",
    ),
    t(
        "meta-description-missing",
        ProtocolMeta,
        High,
        Low,
        "Add a meta description",
        "The page has no meta description, so summaries are guessed from body text.",
        "Write a 50-160 character description naming the product and its main benefit.",
    ),
    t(
        "meta-description-length",
        ProtocolMeta,
        Low,
        Low,
        "Adjust the meta description length",
        "The meta description is shorter than 50 or longer than 160 characters.",
        "Rewrite it to 50-160 characters, leading with the product name.",
    ),
    t(
        "title-missing",
        ProtocolMeta,
        High,
        Low,
        "Add a title tag",
        "The page has no <title>.",
        "Add a <title> with the product name, a key attribute and the store name.",
    ),
    t(
        "title-length",
        ProtocolMeta,
        Low,
        Low,
        "Adjust the title length",
        "The title is shorter than 20 or longer than 70 characters.",
        "Keep the title between 20 and 70 characters: product name first, brand or store last.",
    ),
    t(
        "canonical-missing",
        ProtocolMeta,
        Medium,
        Low,
        "Add a canonical URL",
        "No rel=canonical link was found; variant and tracking URLs may split signals.",
        "Add <link rel=\"canonical\" href=\"...\"> with the preferred product URL.",
    ),
    t(
        "canonical-mismatch",
        ProtocolMeta,
        Medium,
        Low,
        "Fix the canonical URL",
        "The canonical URL points somewhere other than this product page.",
        "Make the canonical point at this product's preferred URL, not the home page or a category.",
    ),
    t(
        "robots-noindex",
        ProtocolMeta,
        High,
        Low,
        "Remove noindex",
        "The page tells crawlers not to index it, so it cannot appear in search or AI answers.",
        "Remove noindex from the robots meta tag (and any X-Robots-Tag header) on product pages.",
    ),
    // Content Quality
    t(
        "description-missing",
        ContentQuality,
        High,
        Medium,
        "Add a product description",
        "No product description was found in the page or the structured data.",
        "Write at least 150 words covering what the product is, who it is for and what makes it different, in a clearly marked description block.",
    ),
    t(
        "description-thin",
        ContentQuality,
        Medium,
        Medium,
        "Expand the product description",
        "The description is under 75 words, too short to answer most shopper questions.",
        "Extend the description to 150+ words: materials, use, fit or sizing, and what is in the box.",
    ),
    t(
        "specifications-missing",
        ContentQuality,
        Medium,
        Medium,
        "Add a specifications table",
        "Fewer than three technical specifications were found.",
        "Add a two-column table (or <dl>) of specifications and mirror them as additionalProperty entries in the Product schema.",
    ),
    t(
        "compatibility-missing",
        ContentQuality,
        Medium,
        Low,
        "State compatibility",
        "The page never says what the product is compatible with or fits.",
        "Add a \"Compatible with\" line listing supported models, sizes or systems.",
    ),
    t(
        "features-missing",
        ContentQuality,
        Medium,
        Low,
        "Add a feature list",
        "Fewer than three product features were found.",
        "Add a bulleted list of key features, each leading with the benefit (\"Keeps drinks cold for 24 hours\").",
    ),
    t(
        "faq-missing",
        ContentQuality,
        Medium,
        Medium,
        "Add an FAQ section",
        "The page has no FAQ content and no FAQPage schema.",
        "Answer the five questions customers ask most, on the page and in FAQPage JSON-LD.",
    ),
    t(
        "faq-thin",
        ContentQuality,
        Low,
        Low,
        "Expand the FAQ section",
        "The FAQ has fewer than three questions.",
        "Add questions from support tickets and reviews until the FAQ covers at least three to five topics.",
    ),
    t(
        "product-details-incomplete",
        ContentQuality,
        Low,
        Low,
        "Add product details",
        "Fewer than two of dimensions, materials, care instructions and warranty are stated.",
        "State dimensions, materials, care instructions and warranty explicitly, e.g. \"Dimensions: 30 x 20 x 10 cm\".",
    ),
    // Content Structure
    t(
        "h1-missing",
        ContentStructure,
        High,
        Low,
        "Add an h1 with the product name",
        "The page has no <h1>.",
        "Render the product name in a single <h1>.",
    ),
    t(
        "h1-multiple",
        ContentStructure,
        Medium,
        Low,
        "Use a single h1",
        "The page has more than one <h1>, which blurs what the page is about.",
        "Keep the product name as the only <h1> and demote the others to <h2>.",
    ),
    t(
        "heading-hierarchy",
        ContentStructure,
        Low,
        Low,
        "Fix the heading hierarchy",
        "Heading levels are skipped.",
        "Nest headings without gaps: h1, then h2 sections, then h3 subsections.",
    ),
    t(
        "main-landmark-missing",
        ContentStructure,
        Medium,
        Low,
        "Wrap the product in <main>",
        "No <main> landmark marks the primary content.",
        "Wrap the product content in <main> so readers can skip navigation and footer chrome.",
    ),
    t(
        "image-alt-missing",
        ContentStructure,
        Medium,
        Low,
        "Add alt text to images",
        "Some images have no alt attribute.",
        "Describe each product image in its alt text (colour, angle, feature shown); use alt=\"\" for decorative images.",
    ),
    t(
        "js-dependent-content",
        ContentStructure,
        High,
        High,
        "Render product content on the server",
        "The main content lives in an empty client-side framework root. Crawlers that do not run JavaScript see almost nothing.",
        "Enable server-side rendering or static generation for product pages so the HTML response contains the content.",
    ),
    // Authority & Trust
    t(
        "reviews-missing",
        AuthorityTrust,
        High,
        High,
        "Collect and show customer reviews",
        "No reviews were found on the page or in the structured data.",
        "Install a review platform, request reviews after delivery and render them in the page HTML with Review markup.",
    ),
    t(
        "reviews-stale",
        AuthorityTrust,
        Medium,
        Medium,
        "Refresh reviews",
        "The most recent review is more than 90 days old.",
        "Send post-purchase review requests and show the newest reviews first.",
    ),
    t(
        "review-dates-missing",
        AuthorityTrust,
        Low,
        Low,
        "Show review dates",
        "Reviews are shown without dates, so their recency cannot be judged.",
        "Render each review's date in a <time datetime> element and add datePublished to Review markup.",
    ),
    t(
        "reviews-shallow",
        AuthorityTrust,
        Medium,
        Medium,
        "Encourage detailed reviews",
        "Reviews average fewer than 50 words.",
        "Prompt reviewers with questions (fit, durability, use case) and show review text, not just stars.",
    ),
    t(
        "brand-missing",
        AuthorityTrust,
        Medium,
        Low,
        "Name the brand",
        "No brand was identified in the structured data or on the page.",
        "Add brand to the Product schema and show the brand name near the title.",
    ),
    t(
        "warranty-missing",
        AuthorityTrust,
        Medium,
        Low,
        "State the warranty",
        "The page does not mention a warranty.",
        "State the warranty term explicitly, e.g. \"2-year manufacturer's warranty\".",
    ),
    t(
        "return-policy-missing",
        AuthorityTrust,
        Medium,
        Low,
        "State the return policy",
        "No return policy or returns link was found.",
        "Show the return window on the product page (\"30-day free returns\") and link to the full policy.",
    ),
    t(
        "certifications-missing",
        AuthorityTrust,
        Low,
        Medium,
        "List certifications",
        "No certifications (CE, UL, Energy Star, OEKO-TEX, ...) are mentioned.",
        "List the certifications the product holds, with certificate numbers where available.",
    ),
    // AI Discoverability
    t(
        "ai-crawlers-blocked",
        AiDiscoverability,
        High,
        Low,
        "Allow AI crawlers",
        "robots.txt blocks every monitored AI crawler, so the page cannot be used in AI answers.",
        "Remove the Disallow rules for GPTBot, ClaudeBot, PerplexityBot, Google-Extended and similar agents, or add explicit Allow rules for product paths.",
    ),
    t(
        "ai-crawlers-partially-blocked",
        AiDiscoverability,
        Medium,
        Low,
        "Review AI crawler rules",
        "robots.txt blocks some AI crawlers.",
        "Decide per crawler whether blocking is intended; allow those whose answer engines you want to appear in.",
    ),
    t(
        "entity-inconsistent",
        AiDiscoverability,
        Medium,
        Low,
        "Use the product name consistently",
        "The product name in the structured data does not match the h1, og:title, meta description and title.",
        "Use the same product name in the Product schema, <h1>, og:title, <title> and meta description.",
    ),
    t(
        "answer-format-missing",
        AiDiscoverability,
        Medium,
        Medium,
        "Write answer-ready content",
        "The page has little \"best for\", comparison or how-to phrasing that AI systems can quote.",
        "Add sentences like \"Best for ...\", a short comparison with alternatives and a how-to-use section.",
    ),
    t(
        "use-cases-missing",
        AiDiscoverability,
        Low,
        Low,
        "Describe use cases",
        "No use-case statements were found.",
        "Add \"Ideal for ...\" or \"Perfect for ...\" sentences naming concrete situations and users.",
    ),
    t(
        "freshness-missing",
        AiDiscoverability,
        Medium,
        Low,
        "Publish an update date",
        "No dateModified, visible update date or Last-Modified header was found.",
        "Add dateModified to the Product or WebPage schema and show \"Updated <date>\" on the page.",
    ),
    t(
        "content-stale",
        AiDiscoverability,
        Low,
        Medium,
        "Refresh the page content",
        "The newest date on the page is more than 90 days old.",
        "Review the content, update prices, specs and FAQs, then bump dateModified.",
    ),
    t(
        "llms-txt-missing",
        AiDiscoverability,
        Low,
        Low,
        "Publish llms.txt",
        "The site has no /llms.txt guide for language models.",
        "Add /llms.txt with a short site summary and links to key category and product pages.",
    ),
];

pub(crate) fn template(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_template_ids_unique() {
        let mut seen = HashSet::new();
        for template in TEMPLATES {
            assert!(seen.insert(template.id), "duplicate template id {}", template.id);
        }
    }

    #[test]
    fn test_lookup() {
        let template = template("og-image-webp").unwrap();
        assert_eq!(template.category, Category::ProtocolMeta);
        assert_eq!(template.impact, Level::High);
        assert!(super::template("no-such-id").is_none());
    }
}
