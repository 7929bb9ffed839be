use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use shoplens_core::extract::meta::extract_meta_tags;
use shoplens_core::{AnalysisOptions, NetworkFacts, PageDocument, PurchaseContext, analyze};
use url::Url;

mod cli;
mod fetch;
mod report;

use cli::{Args, FactSource};
use fetch::Fetcher;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    let parsed_url = Url::parse(&args.url).context("invalid URL")?;
    let fetcher = Fetcher::new()?;

    let html = match args.html.as_deref() {
        Some(path) => read_file(path)?,
        None => fetcher.fetch_html(parsed_url.as_str()).await?,
    };

    let facts = match args.fact_source() {
        FactSource::File(path) => NetworkFacts::from_json(&read_file(&path)?)?,
        FactSource::Offline => NetworkFacts::default(),
        FactSource::Fetch => {
            let og_image = og_image_url(&html, parsed_url.as_str());
            fetcher.fetch_facts(&parsed_url, og_image.as_deref()).await
        }
    };

    let options = AnalysisOptions::new(parsed_url.as_str())
        .with_context(PurchaseContext::from(args.context))
        .with_timestamp(Utc::now());
    let analysis = analyze(&html, &options, &facts);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", report::render(&analysis, args.top));
    }

    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// The og:image the page declares, needed before facts can be fetched
fn og_image_url(html: &str, url: &str) -> Option<String> {
    let doc = PageDocument::parse(html, url, Utc::now());
    extract_meta_tags(&doc).open_graph.image
}
