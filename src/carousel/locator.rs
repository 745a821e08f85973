//! Finds carousel widgets worth scraping.

use crate::page::selectors::carousel;
use crate::page::{PageQuery, PageResult};
use tracing::{debug, trace};

/// A carousel that passed every filter.
#[derive(Debug, Clone)]
pub struct LocatedCarousel<N> {
    /// The `ol` holding the entry cards
    pub list: N,
    /// The enclosing `.a-carousel-container`
    pub container: N,
    /// First line of the header text
    pub name: String,
    /// Whether the header marks the carousel as sponsored
    pub sponsored: bool,
}

/// Why a carousel candidate was passed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Not inside a carousel container, so its structure is unknown
    NoContainer,
    /// The related videos widget
    RelatedVideos,
    /// A hidden, half-loaded widget
    Hidden,
    /// No header to name it by
    Unnamed,
    /// The "recently viewed items" widget
    PreviouslyViewed,
}

/// Enumerates and filters carousel widgets.
#[derive(Debug, Clone, Default)]
pub struct CarouselLocator;

impl CarouselLocator {
    /// Creates a new locator.
    pub fn new() -> Self {
        Self
    }

    /// All carousel item lists on the page, in document order.
    pub fn candidates<P: PageQuery>(&self, page: &P) -> PageResult<Vec<P::Node>> {
        let lists = page.query_all(None, carousel::LIST)?;
        debug!("Found {} carousel candidates", lists.len());
        Ok(lists)
    }

    /// Applies the filters to one candidate list.
    pub fn inspect<P: PageQuery>(
        &self,
        page: &P,
        list: &P::Node,
    ) -> PageResult<Result<LocatedCarousel<P::Node>, SkipReason>> {
        let Some(container) = self.find_container(page, list) else {
            return Ok(Err(SkipReason::NoContainer));
        };

        let container_id = page.attr(&container, "id").unwrap_or_default();
        if container_id.contains(carousel::RELATED_VIDEOS_ID) {
            return Ok(Err(SkipReason::RelatedVideos));
        }

        if page.computed_style(&container, "display").as_deref() == Some("none") {
            return Ok(Err(SkipReason::Hidden));
        }

        let Some(header) = page.query_first(Some(&container), carousel::HEADER)? else {
            return Ok(Err(SkipReason::Unnamed));
        };

        if page.inner_html(&header).contains(carousel::PREVIOUSLY_VIEWED_HREF) {
            return Ok(Err(SkipReason::PreviouslyViewed));
        }

        let text = page.inner_text(&header);
        let sponsored = text.contains(carousel::SPONSORED_MARKER);
        let name = text.split('\n').next().unwrap_or_default().to_string();
        if name.is_empty() {
            return Ok(Err(SkipReason::Unnamed));
        }

        Ok(Ok(LocatedCarousel { list: list.clone(), container, name, sponsored }))
    }

    /// Accepted carousels only, in document order.
    pub fn locate<P: PageQuery>(&self, page: &P) -> PageResult<Vec<LocatedCarousel<P::Node>>> {
        let mut located = Vec::new();
        for list in self.candidates(page)? {
            match self.inspect(page, &list)? {
                Ok(carousel) => located.push(carousel),
                Err(reason) => trace!("Skipping carousel: {:?}", reason),
            }
        }
        Ok(located)
    }

    /// Walks up from the list (itself included) to its carousel container.
    fn find_container<P: PageQuery>(&self, page: &P, list: &P::Node) -> Option<P::Node> {
        let mut current = Some(list.clone());
        while let Some(node) = current {
            if page.has_class(&node, carousel::CONTAINER_CLASS) {
                return Some(node);
            }
            current = page.parent(&node);
        }
        None
    }
}
