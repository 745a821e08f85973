//! End-to-end carousel extraction for one product page.

use super::locator::CarouselLocator;
use super::models::{Carousel, Recommendations};
use super::pagination::{ClickNextPage, PaginationAction, PaginationDriver};
use super::scroller::LazyLoadScroller;
use super::seed::SeedItemReader;
use crate::config::Config;
use crate::page::{PageQuery, PageResult};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Drives seed reading, scrolling, carousel discovery and pagination.
///
/// Generic over the pagination strategy so a host can swap the default
/// "click next arrow" for whatever its page binding supports.
#[derive(Debug, Clone)]
pub struct CarouselScraper<A = ClickNextPage> {
    seed_reader: SeedItemReader,
    scroller: LazyLoadScroller,
    locator: CarouselLocator,
    driver: PaginationDriver,
    action: A,
}

impl CarouselScraper<ClickNextPage> {
    /// Creates a scraper with bounds and timings from `config`.
    pub fn new(config: &Config) -> Self {
        Self {
            seed_reader: SeedItemReader::new(),
            scroller: LazyLoadScroller::new(
                config.scroll_step,
                Duration::from_millis(config.scroll_delay_ms),
            ),
            locator: CarouselLocator::new(),
            driver: PaginationDriver::from_config(config),
            action: ClickNextPage,
        }
    }
}

impl<A: PaginationAction> CarouselScraper<A> {
    /// Replaces the pagination strategy.
    pub fn with_action<B: PaginationAction>(self, action: B) -> CarouselScraper<B> {
        CarouselScraper {
            seed_reader: self.seed_reader,
            scroller: self.scroller,
            locator: self.locator,
            driver: self.driver,
            action,
        }
    }

    /// Extracts every accepted carousel on the page.
    ///
    /// Pages without a product title yield an empty result. Carousels that
    /// share a name overwrite each other; the last one in document order wins.
    pub async fn scrape<P: PageQuery>(&self, page: &P) -> PageResult<Recommendations> {
        let mut result = Recommendations::new();

        let Some(seed) = self.seed_reader.read(page)? else {
            info!("Page has no product title, nothing to extract");
            self.emit(&result);
            return Ok(result);
        };

        self.scroller.scroll_to_bottom(page).await;

        for list in self.locator.candidates(page)? {
            let located = match self.locator.inspect(page, &list)? {
                Ok(located) => located,
                Err(reason) => {
                    debug!("Skipping carousel: {:?}", reason);
                    continue;
                }
            };

            let mut carousel = Carousel::new(located.name.clone(), located.sponsored, seed.clone());
            let report = self.driver.collect(page, &self.action, &located, &mut carousel.items).await?;
            debug!(
                "Carousel '{}': {} items from {} of {} page(s), stopped at {:?}",
                carousel.name,
                carousel.items.len() - 1,
                report.pages_read,
                report.page_count,
                report.end
            );

            if let Some(previous) = result.insert(carousel) {
                debug!("Carousel '{}' replaced an earlier one with the same name", previous.name);
            }
        }

        self.emit(&result);
        Ok(result)
    }

    /// Hands the result to the log as a single JSON document.
    fn emit(&self, result: &Recommendations) {
        match serde_json::to_string(result) {
            Ok(json) => info!(carousels = result.len(), "{}", json),
            Err(e) => warn!("Failed to serialize extraction result: {}", e),
        }
    }
}
