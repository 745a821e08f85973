//! Per-card field extraction with fallbacks.

use super::links;
use super::models::Item;
use crate::page::selectors::card;
use crate::page::{PageQuery, PageResult};
use tracing::trace;

/// Fields read from one carousel card, before a rank is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedEntry {
    pub asin: String,
    pub link: String,
    pub thumbnail: Option<String>,
    pub label: Option<String>,
    pub author: Option<String>,
    pub price: Option<String>,
}

impl ScrapedEntry {
    /// Turns the entry into an item at the given carousel position.
    pub fn into_item(self, rank: u32) -> Item {
        Item {
            asin: self.asin,
            rank,
            link: self.link,
            thumbnail: self.thumbnail,
            label: self.label,
            author: self.author,
            price: self.price,
            is_seed: false,
        }
    }
}

/// Reads item fields out of carousel entry cards.
#[derive(Debug, Clone, Default)]
pub struct ItemExtractor;

impl ItemExtractor {
    /// Creates a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extracts one card. Returns None for cards that do not link to a
    /// product page (ads, interstitials, placeholders).
    pub fn extract<P: PageQuery>(&self, page: &P, entry: &P::Node) -> PageResult<Option<ScrapedEntry>> {
        let Some(link) = self.parse_link(page, entry)? else {
            return Ok(None);
        };

        let asin = page
            .query_first(Some(entry), card::SPONSORED_OFFER)?
            .and_then(|offer| page.attr(&offer, card::ASIN_ATTR))
            .or_else(|| links::third_path_segment(&link).map(String::from))
            .unwrap_or_default();

        let thumbnail =
            page.query_first(Some(entry), card::IMAGE)?.and_then(|img| page.attr(&img, "src"));

        let label = page.query_first(Some(entry), card::LABEL)?.map(|node| {
            page.attr(&node, "title").unwrap_or_else(|| page.inner_text(&node))
        });

        let price = page.query_first(Some(entry), card::PRICE)?.map(|node| page.inner_text(&node));

        let author = self.parse_author(page, entry)?;

        trace!("Extracted card: {} ({})", asin, link);

        Ok(Some(ScrapedEntry { asin, link, thumbnail, label, author, price }))
    }

    /// First normal link of the card, if it points at a product page.
    fn parse_link<P: PageQuery>(&self, page: &P, entry: &P::Node) -> PageResult<Option<String>> {
        let href = page
            .query_first(Some(entry), card::LINK)?
            .and_then(|anchor| page.attr(&anchor, "href"));

        let Some(href) = href else {
            trace!("Skipping card without a link");
            return Ok(None);
        };

        let link = links::strip_query(&href);
        if link.is_empty() || !links::is_product_link(link) {
            trace!("Skipping non-product link: {}", href);
            return Ok(None);
        }

        Ok(Some(link.to_string()))
    }

    /// Byline, falling back to the first small text row when the byline is
    /// present but empty. No byline element means no author.
    fn parse_author<P: PageQuery>(&self, page: &P, entry: &P::Node) -> PageResult<Option<String>> {
        let Some(byline) = page.query_first(Some(entry), card::AUTHOR)? else {
            return Ok(None);
        };

        let text = page.inner_text(&byline);
        if !text.is_empty() {
            return Ok(Some(text));
        }

        Ok(page.query_first(Some(entry), card::SMALL_ROW)?.map(|row| page.inner_text(&row)))
    }
}
