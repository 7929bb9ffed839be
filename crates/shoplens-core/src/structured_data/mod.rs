//! Structured-data resolution
//!
//! Turns the page's JSON-LD blocks and Microdata scopes into one normalized
//! [`SchemaEntitySet`]. Resolution is a fold over an ordered list of candidate
//! records with explicit precedence per slot:
//!
//! - `product`: first Product/ProductGroup found wins.
//! - `aggregateRating`: the winning product's own rating, else the first
//!   standalone AggregateRating node.
//! - `offers`: the winning product's offers, else standalone Offer nodes.
//! - `organization` / `brand`: first standalone entity wins; objects nested in
//!   a product's `brand`/`manufacturer` only fill an empty slot.
//! - JSON-LD beats Microdata: Microdata only fills slots JSON-LD left empty.

mod jsonld;
mod microdata;
pub mod values;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::document::PageDocument;
use crate::types::Source;

pub use values::{extract_brand_name, extract_image_url};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyValue {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductEntity {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub sku: Option<String>,
    pub gtin: Option<String>,
    pub mpn: Option<String>,
    pub brand: Option<String>,
    pub has_offer: bool,
    pub has_rating: bool,
    pub is_product_group: bool,
    pub variant_count: usize,
    pub category: Option<String>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub weight: Option<String>,
    pub dimensions: Option<String>,
    pub additional_properties: Vec<PropertyValue>,
    pub source: Source,
}

impl ProductEntity {
    /// How many of GTIN, MPN and SKU are present
    pub fn identifier_count(&self) -> usize {
        [&self.gtin, &self.mpn, &self.sku]
            .iter()
            .filter(|id| id.is_some())
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferEntity {
    pub price: Option<String>,
    pub currency: Option<String>,
    pub availability: Option<String>,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRatingEntity {
    pub rating_value: Option<f64>,
    pub review_count: Option<u64>,
    pub best_rating: f64,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntity {
    pub author: Option<String>,
    pub date_published: Option<String>,
    pub body: Option<String>,
    pub rating: Option<f64>,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqQuestion {
    pub question: String,
    pub answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqEntity {
    pub question_count: usize,
    pub questions: Vec<FaqQuestion>,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbItem {
    pub position: Option<u32>,
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbEntity {
    pub item_count: usize,
    pub items: Vec<BreadcrumbItem>,
    pub source: Source,
}

impl BreadcrumbEntity {
    pub(crate) fn new(mut items: Vec<BreadcrumbItem>, source: Source) -> Self {
        // Stable: items without a position keep document order at the end
        items.sort_by_key(|item| item.position.unwrap_or(u32::MAX));
        Self {
            item_count: items.len(),
            items,
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationEntity {
    pub name: Option<String>,
    pub url: Option<String>,
    pub logo: Option<String>,
    pub same_as: Vec<String>,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandEntity {
    pub name: Option<String>,
    pub source: Source,
}

/// `dateModified` / `datePublished` / `dateCreated` from the first entity that has any
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDates {
    pub date_modified: Option<String>,
    pub date_published: Option<String>,
    pub date_created: Option<String>,
    pub source: Source,
}

impl SchemaDates {
    /// Most relevant date for freshness: modified, then published, then created
    pub fn best(&self) -> Option<(&'static str, &str)> {
        if let Some(d) = &self.date_modified {
            return Some(("dateModified", d));
        }
        if let Some(d) = &self.date_published {
            return Some(("datePublished", d));
        }
        self.date_created.as_deref().map(|d| ("dateCreated", d))
    }
}

/// Normalized schema entities for one page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaEntitySet {
    pub product: Option<ProductEntity>,
    pub offers: Vec<OfferEntity>,
    pub aggregate_rating: Option<AggregateRatingEntity>,
    pub reviews: Vec<ReviewEntity>,
    pub faq: Option<FaqEntity>,
    pub breadcrumb: Option<BreadcrumbEntity>,
    pub organization: Option<OrganizationEntity>,
    pub brand: Option<BrandEntity>,
    pub images: Vec<String>,
    pub dates: Option<SchemaDates>,
}

/// Everything a Product/ProductGroup node contributes
#[derive(Debug, Clone)]
pub(crate) struct ProductRecord {
    pub product: ProductEntity,
    pub offers: Vec<OfferEntity>,
    pub rating: Option<AggregateRatingEntity>,
    pub reviews: Vec<ReviewEntity>,
    pub images: Vec<String>,
    pub nested_brand: Option<BrandEntity>,
    pub nested_organization: Option<OrganizationEntity>,
}

/// One candidate entity, in document order
#[derive(Debug, Clone)]
pub(crate) enum SchemaRecord {
    Product(Box<ProductRecord>),
    AggregateRating(AggregateRatingEntity),
    Review(ReviewEntity),
    Offers(Vec<OfferEntity>),
    Faq(FaqEntity),
    Breadcrumb(BreadcrumbEntity),
    Organization(OrganizationEntity),
    Brand(BrandEntity),
    Image(String),
    Dates(SchemaDates),
}

impl SchemaEntitySet {
    /// Fold ordered candidate records into one set
    pub(crate) fn from_records(records: Vec<SchemaRecord>) -> Self {
        let mut set = SchemaEntitySet::default();
        let mut standalone_ratings = Vec::new();
        let mut standalone_offers = Vec::new();
        let mut nested_brands = Vec::new();
        let mut nested_organizations = Vec::new();

        for record in records {
            match record {
                SchemaRecord::Product(record) => {
                    let ProductRecord {
                        product,
                        offers,
                        rating,
                        reviews,
                        images,
                        nested_brand,
                        nested_organization,
                    } = *record;
                    nested_brands.extend(nested_brand);
                    nested_organizations.extend(nested_organization);
                    if set.product.is_some() {
                        continue;
                    }
                    set.product = Some(product);
                    set.offers = offers;
                    set.aggregate_rating = rating;
                    set.reviews.extend(reviews);
                    set.images.extend(images);
                }
                SchemaRecord::AggregateRating(rating) => standalone_ratings.push(rating),
                SchemaRecord::Review(review) => set.reviews.push(review),
                SchemaRecord::Offers(offers) => standalone_offers.extend(offers),
                SchemaRecord::Faq(faq) => {
                    set.faq.get_or_insert(faq);
                }
                SchemaRecord::Breadcrumb(breadcrumb) => {
                    set.breadcrumb.get_or_insert(breadcrumb);
                }
                SchemaRecord::Organization(org) => {
                    set.organization.get_or_insert(org);
                }
                SchemaRecord::Brand(brand) => {
                    set.brand.get_or_insert(brand);
                }
                SchemaRecord::Image(url) => set.images.push(url),
                SchemaRecord::Dates(dates) => {
                    set.dates.get_or_insert(dates);
                }
            }
        }

        if set.aggregate_rating.is_none() {
            set.aggregate_rating = standalone_ratings.into_iter().next();
        }
        if set.offers.is_empty() {
            set.offers = standalone_offers;
        }
        if set.organization.is_none() {
            set.organization = nested_organizations.into_iter().next();
        }
        if set.brand.is_none() {
            set.brand = nested_brands.into_iter().next();
        }

        set.finish();
        set
    }

    /// Fill every slot this set left empty from a lower-precedence set
    pub(crate) fn fill_missing(&mut self, fallback: SchemaEntitySet) {
        let SchemaEntitySet {
            product,
            offers,
            aggregate_rating,
            reviews,
            faq,
            breadcrumb,
            organization,
            brand,
            images,
            dates,
        } = fallback;

        if self.product.is_none() {
            self.product = product;
        }
        if self.offers.is_empty() {
            self.offers = offers;
        }
        if self.aggregate_rating.is_none() {
            self.aggregate_rating = aggregate_rating;
        }
        if self.reviews.is_empty() {
            self.reviews = reviews;
        }
        if self.faq.is_none() {
            self.faq = faq;
        }
        if self.breadcrumb.is_none() {
            self.breadcrumb = breadcrumb;
        }
        if self.organization.is_none() {
            self.organization = organization;
        }
        if self.brand.is_none() {
            self.brand = brand;
        }
        if self.images.is_empty() {
            self.images = images;
        }
        if self.dates.is_none() {
            self.dates = dates;
        }

        self.finish();
    }

    fn finish(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.images.retain(|url| seen.insert(url.clone()));

        let has_offer = !self.offers.is_empty();
        let has_rating = self.aggregate_rating.is_some();
        if let Some(product) = self.product.as_mut() {
            product.has_offer = has_offer;
            product.has_rating = has_rating;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == SchemaEntitySet::default()
    }
}

/// Structured data found on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDataResult {
    /// Number of JSON-LD script blocks on the page
    pub json_ld_blocks: usize,
    /// Parsed JSON-LD blocks, verbatim
    pub raw: Vec<JsonValue>,
    /// One message per JSON-LD block that could not be used
    pub parse_errors: Vec<String>,
    /// Number of top-level Microdata items
    pub microdata_items: usize,
    /// Every schema.org type seen, in first-seen order
    pub types_found: Vec<String>,
    pub schemas: SchemaEntitySet,
}

/// Resolve JSON-LD and Microdata into a normalized entity set.
///
/// Best-effort: malformed blocks are recorded and skipped, missing entities
/// are `None`.
pub fn resolve_structured_data(doc: &PageDocument) -> StructuredDataResult {
    let cache = doc.json_ld();
    let mut types_found = Vec::new();

    let mut records = Vec::new();
    for block in &cache.blocks {
        records.extend(jsonld::block_records(block, &mut types_found));
    }
    let mut schemas = SchemaEntitySet::from_records(records);

    let items = microdata::microdata_items(doc);
    let microdata_records = microdata::microdata_records(doc, &items, &mut types_found);
    schemas.fill_missing(SchemaEntitySet::from_records(microdata_records));

    log::debug!(
        "resolved structured data: {} JSON-LD blocks, {} microdata items, product={}",
        cache.block_count,
        items.len(),
        schemas.product.is_some()
    );

    StructuredDataResult {
        json_ld_blocks: cache.block_count,
        raw: cache.blocks.clone(),
        parse_errors: cache.errors.clone(),
        microdata_items: items.len(),
        types_found,
        schemas,
    }
}
