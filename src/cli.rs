use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use shoplens_core::PurchaseContext;

#[derive(Parser, Debug)]
#[command(name = "shoplens")]
#[command(author = "Pon Datalab")]
#[command(about = "Score a product page for AI discoverability and list what to fix")]
#[command(version)]
pub struct Args {
    /// Product page URL
    pub url: String,

    /// Analyze a saved HTML file instead of fetching the page
    #[arg(long, value_name = "FILE")]
    pub html: Option<PathBuf>,

    /// Purchase context used to weight specs, reviews and use cases
    #[arg(short, long, value_enum, default_value_t = ContextArg::Hybrid)]
    pub context: ContextArg,

    /// Pre-computed network facts as JSON (skips fact fetching)
    #[arg(long, value_name = "FILE", conflicts_with = "offline")]
    pub facts: Option<PathBuf>,

    /// Do not fetch robots.txt, llms.txt, og:image or Last-Modified
    #[arg(long)]
    pub offline: bool,

    /// Print the full analysis as JSON
    #[arg(long)]
    pub json: bool,

    /// Number of recommendations to show
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ContextArg {
    Want,
    Need,
    Hybrid,
}

impl From<ContextArg> for PurchaseContext {
    fn from(arg: ContextArg) -> Self {
        match arg {
            ContextArg::Want => PurchaseContext::Want,
            ContextArg::Need => PurchaseContext::Need,
            ContextArg::Hybrid => PurchaseContext::Hybrid,
        }
    }
}

/// Where the network facts come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactSource {
    Fetch,
    File(PathBuf),
    Offline,
}

impl Args {
    pub fn fact_source(&self) -> FactSource {
        match (&self.facts, self.offline) {
            (Some(path), _) => FactSource::File(path.clone()),
            (None, true) => FactSource::Offline,
            (None, false) => FactSource::Fetch,
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("shoplens").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["https://shop.example.com/p/kettle"]).unwrap();
        assert_eq!(args.url, "https://shop.example.com/p/kettle");
        assert_eq!(PurchaseContext::from(args.context), PurchaseContext::Hybrid);
        assert_eq!(args.top, 10);
        assert!(!args.json);
        assert_eq!(args.fact_source(), FactSource::Fetch);
        assert_eq!(args.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_all_flags() {
        let args = parse(&[
            "--html",
            "page.html",
            "--context",
            "need",
            "--facts",
            "facts.json",
            "--json",
            "--top",
            "3",
            "-v",
            "https://shop.example.com/p/kettle",
        ])
        .unwrap();
        assert_eq!(args.html, Some(PathBuf::from("page.html")));
        assert_eq!(PurchaseContext::from(args.context), PurchaseContext::Need);
        assert_eq!(args.fact_source(), FactSource::File(PathBuf::from("facts.json")));
        assert!(args.json);
        assert_eq!(args.top, 3);
        assert_eq!(args.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_offline() {
        let args = parse(&["--offline", "https://shop.example.com/p/kettle"]).unwrap();
        assert_eq!(args.fact_source(), FactSource::Offline);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["--context", "maybe", "https://shop.example.com/p"]).is_err());
        assert!(parse(&["--facts", "f.json", "--offline", "https://shop.example.com/p"]).is_err());
    }
}
