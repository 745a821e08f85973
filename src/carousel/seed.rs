//! Reads the product the page itself is about.

use super::links;
use super::models::Item;
use crate::page::selectors::seed;
use crate::page::{PageQuery, PageResult};
use tracing::{debug, warn};

/// Extracts the seed item from a product page.
#[derive(Debug, Clone, Default)]
pub struct SeedItemReader;

impl SeedItemReader {
    /// Creates a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Returns the seed item, or None when the page has no product title
    /// (i.e. it is not a product page).
    pub fn read<P: PageQuery>(&self, page: &P) -> PageResult<Option<Item>> {
        let Some(title) = page.query_first(None, seed::TITLE)? else {
            debug!("No product title found, not a product page");
            return Ok(None);
        };

        let url = page.url();
        let asin = links::asin_from_url(&url).unwrap_or_default();
        if asin.is_empty() {
            warn!("Could not find an ASIN in page URL: {}", url);
        }

        let price = page.query_first(None, seed::PRICE)?.map(|node| page.inner_text(&node));
        let thumbnail = page.query_first(None, seed::IMAGE)?.and_then(|node| page.attr(&node, "src"));

        let item = Item::seed(
            asin,
            links::strip_query(&url),
            page.inner_text(&title),
            thumbnail,
            price,
        );
        debug!("Seed item: {} - {:?}", item.asin, item.label);

        Ok(Some(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::HtmlPage;

    const URL: &str = "https://www.amazon.com/Some-Book/dp/B000000001/ref=sr_1_1?keywords=book&qid=1";

    #[test]
    fn test_read_full_seed() {
        let page = HtmlPage::parse(
            URL,
            r#"<html><body>
                <span id="productTitle">
                    Some Book: A Novel
                </span>
                <span class="header-price">$12.99</span>
                <img class="frontImage" src="https://images.example/front.jpg">
            </body></html>"#,
        );

        let item = SeedItemReader::new().read(&page).unwrap().unwrap();
        assert!(item.is_seed);
        assert_eq!(item.rank, 0);
        assert_eq!(item.asin, "B000000001");
        assert_eq!(item.link, "https://www.amazon.com/Some-Book/dp/B000000001/ref=sr_1_1");
        assert_eq!(item.label.as_deref(), Some("Some Book: A Novel"));
        assert_eq!(item.price.as_deref(), Some("$12.99"));
        assert_eq!(item.thumbnail.as_deref(), Some("https://images.example/front.jpg"));
        assert!(item.author.is_none());
    }

    #[test]
    fn test_optional_fields_missing() {
        let page = HtmlPage::parse(URL, r#"<span id="productTitle">Bare</span>"#);

        let item = SeedItemReader::new().read(&page).unwrap().unwrap();
        assert_eq!(item.label.as_deref(), Some("Bare"));
        assert!(item.price.is_none());
        assert!(item.thumbnail.is_none());
    }

    #[test]
    fn test_only_header_price_and_front_image_are_read() {
        let page = HtmlPage::parse(
            URL,
            r#"<span id="productTitle">Book</span>
                <div id="corePrice_feature_div"><span class="a-price"><span class="a-offscreen">$1.00</span></span></div>
                <img id="landingImage" src="https://images.example/landing.jpg">
                <span class="header-price">$12.99</span>
                <img class="frontImage" src="https://images.example/front.jpg">"#,
        );

        let item = SeedItemReader::new().read(&page).unwrap().unwrap();
        assert_eq!(item.price.as_deref(), Some("$12.99"));
        assert_eq!(item.thumbnail.as_deref(), Some("https://images.example/front.jpg"));
    }

    #[test]
    fn test_not_a_product_page() {
        let page = HtmlPage::parse(URL, "<html><body><h1>Search results</h1></body></html>");
        assert!(SeedItemReader::new().read(&page).unwrap().is_none());
    }

    #[test]
    fn test_url_without_asin() {
        let page =
            HtmlPage::parse("https://www.amazon.com/s?k=x", r#"<span id="productTitle">T</span>"#);
        let item = SeedItemReader::new().read(&page).unwrap().unwrap();
        assert_eq!(item.asin, "");
        assert_eq!(item.link, "https://www.amazon.com/s");
    }
}
