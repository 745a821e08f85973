//! amz-recscrape - Amazon recommendation carousel extractor
//!
//! Reads the "customers also bought" style carousels of a rendered product
//! page through the [`page::PageQuery`] capability, and merges extraction
//! results into a recommendation network.

pub mod carousel;
pub mod commands;
pub mod config;
pub mod format;
pub mod graph;
pub mod page;

pub use carousel::{Carousel, CarouselScraper, Item, Recommendations};
pub use config::Config;
pub use graph::RecommendationGraph;
pub use page::{HtmlPage, PageQuery};
