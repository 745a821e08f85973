//! Walks the pages of one carousel under hard page and item bounds.

use super::extractor::ItemExtractor;
use super::locator::LocatedCarousel;
use super::models::Item;
use super::waiter::{AsyncWaiter, WaitOutcome};
use crate::config::Config;
use crate::page::selectors::{card, carousel};
use crate::page::{PageQuery, PageResult};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, trace};

/// Upper bound on pages read per carousel; configuration can only lower it.
pub const MAX_PAGES: u32 = 9;

/// Moves a carousel to its next page.
#[async_trait(?Send)]
pub trait PaginationAction {
    /// Triggers the next page of the carousel in `container`.
    ///
    /// Returns false when the carousel has no next-page control.
    async fn advance<P: PageQuery>(&self, page: &P, container: &P::Node) -> PageResult<bool>;
}

/// Clicks the carousel's "next page" arrow.
#[derive(Debug, Clone, Default)]
pub struct ClickNextPage;

#[async_trait(?Send)]
impl PaginationAction for ClickNextPage {
    async fn advance<P: PageQuery>(&self, page: &P, container: &P::Node) -> PageResult<bool> {
        let Some(button) = page.query_first(Some(container), carousel::NEXT_PAGE)? else {
            return Ok(false);
        };
        page.activate(&button).await?;
        Ok(true)
    }
}

/// Why pagination of a carousel stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationEnd {
    /// Every page up to the (capped) page count was read
    LastPage,
    /// The carousel reached the item limit
    ItemCap,
    /// More pages were reported but there was no control to reach them
    NoNextControl,
}

/// Summary of one carousel's pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationReport {
    /// Page count after applying the cap
    pub page_count: u32,
    /// Pages whose entries were read
    pub pages_read: u32,
    /// Why the walk stopped
    pub end: PaginationEnd,
}

/// Reads a carousel page by page.
#[derive(Debug, Clone)]
pub struct PaginationDriver {
    max_items: usize,
    page_cap: u32,
    settle_delay: Duration,
    waiter: AsyncWaiter,
    extractor: ItemExtractor,
}

impl PaginationDriver {
    /// Creates a driver with explicit bounds. `page_cap` is clamped to
    /// [`MAX_PAGES`].
    pub fn new(max_items: usize, page_cap: u32, settle_delay: Duration, waiter: AsyncWaiter) -> Self {
        let page_cap = page_cap.min(MAX_PAGES);
        Self { max_items, page_cap, settle_delay, waiter, extractor: ItemExtractor::new() }
    }

    /// Creates a driver from the configured bounds and timings.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_carousel_items,
            config.page_cap,
            Duration::from_millis(config.settle_delay_ms),
            AsyncWaiter::new(
                Duration::from_millis(config.poll_interval_ms),
                Duration::from_millis(config.poll_timeout_ms),
            ),
        )
    }

    /// Number of pages to read: the page's own indicator, 1 when missing or
    /// not a number, never more than the cap.
    pub fn page_count<P: PageQuery>(&self, page: &P, container: &P::Node) -> PageResult<u32> {
        let reported = page
            .query_first(Some(container), carousel::PAGE_MAX)?
            .and_then(|node| parse_leading_int(&page.inner_text(&node)))
            .filter(|&count| count > 0)
            .unwrap_or(1);

        Ok(reported.min(self.page_cap))
    }

    /// Appends the carousel's entries to `items`, turning pages with
    /// `action` until a bound is hit.
    ///
    /// `items` normally holds just the seed item; ranks continue from the
    /// last item present.
    pub async fn collect<P, A>(
        &self,
        page: &P,
        action: &A,
        located: &LocatedCarousel<P::Node>,
        items: &mut Vec<Item>,
    ) -> PageResult<PaginationReport>
    where
        P: PageQuery,
        A: PaginationAction,
    {
        let page_count = self.page_count(page, &located.container)?;
        let mut rank = items.last().map_or(1, |last| last.rank + 1);
        let mut current_page = 0;

        debug!("Carousel '{}' has {} page(s)", located.name, page_count);

        let end = loop {
            for entry in page.query_all(Some(&located.list), card::ENTRY)? {
                let Some(scraped) = self.extractor.extract(page, &entry)? else {
                    continue;
                };
                items.push(scraped.into_item(rank));
                rank += 1;

                if items.len() > self.max_items {
                    break;
                }
            }

            current_page += 1;
            trace!("Read page {} of '{}', {} items so far", current_page, located.name, items.len());

            if items.len() >= self.max_items {
                break PaginationEnd::ItemCap;
            }
            if current_page >= page_count {
                break PaginationEnd::LastPage;
            }

            if !action.advance(page, &located.container).await? {
                debug!("Carousel '{}' has no next page control", located.name);
                break PaginationEnd::NoNextControl;
            }

            sleep(self.settle_delay).await;
            let outcome = self.waiter.wait_until(|| page_settled(page, &located.list)).await;
            if outcome == WaitOutcome::TimedOut {
                debug!("Page {} of '{}' did not settle in time", current_page + 1, located.name);
            }
            sleep(self.settle_delay).await;
        };

        Ok(PaginationReport { page_count, pages_read: current_page, end })
    }
}

/// The list is done loading: not busy and no placeholder cards left.
fn page_settled<P: PageQuery>(page: &P, list: &P::Node) -> bool {
    let idle = page.attr(list, carousel::BUSY_ATTR).as_deref() == Some("false");
    idle && matches!(page.query_first(Some(list), card::EMPTY), Ok(None))
}

/// Integer prefix of a text, the way `parseInt` reads it. Saturates at
/// `u32::MAX` on overflow.
fn parse_leading_int(text: &str) -> Option<u32> {
    let digits: String = text.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse().unwrap_or(u32::MAX))
}
