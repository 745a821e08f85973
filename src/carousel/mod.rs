//! Recommendation carousel extraction.
//!
//! [`CarouselScraper`] ties the pieces together: the seed item is read
//! from the product page, the page is scrolled so lazy widgets render, and
//! every accepted carousel is paginated with its entries extracted into a
//! [`Recommendations`] result.

pub mod extractor;
pub mod links;
pub mod locator;
pub mod models;
pub mod pagination;
pub mod scrape;
pub mod scroller;
pub mod seed;
pub mod waiter;

pub use extractor::{ItemExtractor, ScrapedEntry};
pub use locator::{CarouselLocator, LocatedCarousel, SkipReason};
pub use models::{Carousel, Item, Recommendations};
pub use pagination::{
    ClickNextPage, PaginationAction, PaginationDriver, PaginationEnd, PaginationReport, MAX_PAGES,
};
pub use scrape::CarouselScraper;
pub use scroller::LazyLoadScroller;
pub use seed::SeedItemReader;
pub use waiter::{AsyncWaiter, WaitOutcome};
