//! CSS selectors and markers for the Amazon product page carousel markup.
//!
//! This file contains every selector the extractor relies on.
//! Update this file when Amazon changes their HTML structure.
//!
//! **Update process**: When extraction comes back empty, capture a rendered
//! page, update selectors, and add a test fixture.

/// Selectors for the page's own product (the seed item).
pub mod seed {
    /// Product title; its absence means this is not a product page.
    pub const TITLE: &str = "#productTitle";

    /// Price shown in the product header.
    pub const PRICE: &str = "span.header-price";

    /// Main product image.
    pub const IMAGE: &str = "img.frontImage";
}

/// Selectors for locating carousel widgets.
pub mod carousel {
    /// The item list of a carousel widget.
    pub const LIST: &str = "ol.a-carousel[role=list]";

    /// Class carried by the widget's outer container.
    pub const CONTAINER_CLASS: &str = "a-carousel-container";

    /// Header text of the carousel.
    pub const HEADER: &str = "div.a-carousel-header-row h2";

    /// Total page count indicator.
    pub const PAGE_MAX: &str = "span.a-carousel-page-max";

    /// "Next page" control.
    pub const NEXT_PAGE: &str = ".a-carousel-goto-nextpage";

    /// Busy flag on the list while a page is loading.
    pub const BUSY_ATTR: &str = "aria-busy";

    /// Substring of the container id for the related videos widget.
    pub const RELATED_VIDEOS_ID: &str = "related-videos";

    /// Link target of the "recently viewed items" header.
    pub const PREVIOUSLY_VIEWED_HREF: &str = "/gp/yourstore/pym/";

    /// Marker in the header text of sponsored carousels.
    pub const SPONSORED_MARKER: &str = "Sponsor";
}

/// Selectors inside one carousel entry card.
pub mod card {
    /// Rendered, non-placeholder entry cards.
    pub const ENTRY: &str = "li.a-carousel-card:not(.a-carousel-card-empty)";

    /// Placeholder cards still waiting for content.
    pub const EMPTY: &str = ".a-carousel-card-empty";

    /// Product link.
    pub const LINK: &str = "a.a-link-normal";

    /// Thumbnail image.
    pub const IMAGE: &str = "img";

    /// Truncated product title.
    pub const LABEL: &str = "div.p13n-sc-truncated";

    /// Sponsored offer block carrying the ASIN.
    pub const SPONSORED_OFFER: &str = "div.sp_offerVertical";

    /// ASIN attribute on the sponsored offer block.
    pub const ASIN_ATTR: &str = "data-asin";

    /// Price text.
    pub const PRICE: &str = "span.a-color-price";

    /// Truncated byline (author, brand).
    pub const AUTHOR: &str = "span.a-truncate-cut";

    /// Small text rows, the byline fallback.
    pub const SMALL_ROW: &str = "div.a-row.a-size-small";
}
