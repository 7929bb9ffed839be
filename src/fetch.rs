//! Network collaborators: the page itself and the facts the core cannot see
//! in the HTML. Apart from the page fetch, nothing here returns an error; a
//! failed request becomes an inaccessible fact.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{CONTENT_TYPE, LAST_MODIFIED, RANGE};
use reqwest::{Client, Response, StatusCode};
use shoplens_core::{
    ImageFormatFact, LastModifiedFact, LlmsFileFact, LlmsTxtFact, NetworkFacts, RobotsFact, parse_robots_txt,
};
use url::Url;

const USER_AGENT: &str = concat!("shoplens/", env!("CARGO_PKG_VERSION"));
const TIMEOUT: Duration = Duration::from_secs(15);
/// Enough for every magic number `ImageFormatFact::classify` knows
const SNIFF_BYTES: usize = 32;

pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }

    pub async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed to fetch {}", url))?;

        response
            .error_for_status()
            .with_context(|| format!("non-success status from {}", url))?
            .text()
            .await
            .with_context(|| format!("failed to read response body from {}", url))
    }

    /// Collect all network facts for one page concurrently
    pub async fn fetch_facts(&self, page_url: &Url, og_image: Option<&str>) -> NetworkFacts {
        let image = async {
            match og_image {
                Some(image_url) => Some(self.image_format(image_url).await),
                None => None,
            }
        };

        let (image_format, robots, llms_txt, last_modified) = tokio::join!(
            image,
            self.robots(page_url),
            self.llms_txt(page_url),
            self.last_modified(page_url.as_str()),
        );

        NetworkFacts {
            image_format,
            robots: Some(robots),
            llms_txt: Some(llms_txt),
            last_modified: Some(last_modified),
        }
    }

    async fn image_format(&self, image_url: &str) -> ImageFormatFact {
        match self.sniff_image(image_url).await {
            Ok(fact) => {
                log::debug!("og:image {} is {}", image_url, fact.format);
                fact
            }
            Err(err) => {
                log::warn!("og:image check failed: {err:#}");
                ImageFormatFact::inaccessible(format!("{err:#}"))
            }
        }
    }

    /// Content-Type from a HEAD request, confirmed against the first bytes
    /// of the file
    async fn sniff_image(&self, image_url: &str) -> Result<ImageFormatFact> {
        let head = self
            .client
            .head(image_url)
            .send()
            .await
            .and_then(Response::error_for_status)
            .ok();
        let head_type = head.as_ref().and_then(|r| header_str(r, CONTENT_TYPE));

        let response = self
            .client
            .get(image_url)
            .header(RANGE, format!("bytes=0-{}", SNIFF_BYTES - 1))
            .send()
            .await
            .with_context(|| format!("failed to fetch {}", image_url))?
            .error_for_status()
            .with_context(|| format!("non-success status from {}", image_url))?;
        let content_type = head_type.or_else(|| header_str(&response, CONTENT_TYPE));
        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("failed to read response body from {}", image_url))?;

        let head_bytes = &bytes[..bytes.len().min(SNIFF_BYTES)];
        let by_header = ImageFormatFact::classify(content_type.as_deref(), head_bytes);
        let by_magic = ImageFormatFact::classify(None, head_bytes);
        // A CDN may label a WebP body as image/jpeg
        if by_magic.format != "unknown" && by_magic.format != by_header.format {
            log::debug!(
                "{} declared as {} but starts like {}",
                image_url,
                by_header.format,
                by_magic.format
            );
            return Ok(by_magic);
        }
        Ok(by_header)
    }

    async fn robots(&self, page_url: &Url) -> RobotsFact {
        let robots_url = match site_file_url(page_url, "/robots.txt") {
            Ok(url) => url,
            Err(err) => return RobotsFact::inaccessible(format!("{err:#}")),
        };

        let response = match self.client.get(robots_url.as_str()).send().await {
            Ok(response) => response,
            Err(err) => {
                log::warn!("robots.txt fetch failed: {err}");
                return RobotsFact::inaccessible(err.to_string());
            }
        };

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::GONE => RobotsFact::not_found(),
            status if !status.is_success() => RobotsFact::inaccessible(format!("HTTP {status}")),
            _ => match response.text().await {
                Ok(body) => parse_robots_txt(&body).to_fact(page_url.path()),
                Err(err) => RobotsFact::inaccessible(err.to_string()),
            },
        }
    }

    async fn llms_txt(&self, page_url: &Url) -> LlmsTxtFact {
        let (llms, full) = tokio::join!(
            self.llms_file(page_url, "/llms.txt"),
            self.llms_file(page_url, "/llms-full.txt"),
        );
        LlmsTxtFact::new(llms, full)
    }

    async fn llms_file(&self, page_url: &Url, path: &str) -> LlmsFileFact {
        let Ok(url) = site_file_url(page_url, path) else {
            return LlmsFileFact::default();
        };

        let mut fact = LlmsFileFact {
            found: false,
            url: url.to_string(),
            size: None,
        };
        match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => {
                // Soft 404 pages come back as HTML
                let is_html = header_str(&response, CONTENT_TYPE).is_some_and(|ct| ct.contains("text/html"));
                if let Ok(body) = response.text().await
                    && !is_html
                    && !body.trim().is_empty()
                {
                    fact.found = true;
                    fact.size = Some(body.len() as u64);
                }
            }
            Ok(response) => log::debug!("{} answered {}", fact.url, response.status()),
            Err(err) => log::debug!("{} unreachable: {err}", fact.url),
        }
        fact
    }

    async fn last_modified(&self, page_url: &str) -> LastModifiedFact {
        match self.client.head(page_url).send().await {
            Ok(response) => LastModifiedFact {
                accessible: true,
                last_modified: header_str(&response, LAST_MODIFIED),
                error: None,
            },
            Err(err) => LastModifiedFact {
                accessible: false,
                last_modified: None,
                error: Some(err.to_string()),
            },
        }
    }
}

fn header_str(response: &Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Well-known file at the site root of the page
fn site_file_url(page_url: &Url, path: &str) -> Result<Url> {
    page_url
        .join(path)
        .with_context(|| format!("cannot resolve {} against {}", path, page_url))
}
