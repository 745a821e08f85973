//! Carousel extraction command implementation.

use crate::carousel::CarouselScraper;
use crate::config::Config;
use crate::format::Formatter;
use crate::page::{HtmlPage, PageQuery};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Markup for the next page of one carousel, given as `CONTAINER_ID=FILE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTurn {
    /// `id` of the carousel container whose next arrow loads this page
    pub container_id: String,
    /// File holding the list entries of that page
    pub path: PathBuf,
}

impl FromStr for PageTurn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((id, path)) if !id.is_empty() && !path.is_empty() => {
                Ok(Self { container_id: id.to_string(), path: PathBuf::from(path) })
            }
            _ => Err(format!("Invalid page turn: '{}'. Use CONTAINER_ID=FILE", s)),
        }
    }
}

/// Extracts recommendation carousels from a rendered product page.
pub struct ExtractCommand {
    config: Config,
}

impl ExtractCommand {
    /// Creates a new extract command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Loads a saved page (and any queued page turns) and returns formatted output.
    pub async fn execute(&self, html_path: &Path, url: &str, page_turns: &[PageTurn]) -> Result<String> {
        let html = std::fs::read_to_string(html_path)
            .with_context(|| format!("Failed to read page: {}", html_path.display()))?;

        let mut page = HtmlPage::parse(url, &html);
        for turn in page_turns {
            let markup = std::fs::read_to_string(&turn.path)
                .with_context(|| format!("Failed to read page turn: {}", turn.path.display()))?;
            page = page.with_page_turns(turn.container_id.as_str(), [markup]);
        }

        self.execute_with_page(&page).await
    }

    /// Extracts from a provided page (for testing).
    pub async fn execute_with_page(&self, page: &impl PageQuery) -> Result<String> {
        info!("Extracting carousels from {}", page.url());

        let scraper = CarouselScraper::new(&self.config);
        let result = scraper.scrape(page).await.context("Carousel extraction failed")?;

        info!("Found {} carousels with {} items", result.len(), result.item_count());

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_recommendations(&result))
    }
}
