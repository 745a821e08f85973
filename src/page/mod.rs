//! DOM access capability used by the carousel extractor.
//!
//! The extractor never touches a rendering engine directly. Everything it
//! needs from the live page (selector search, attribute and text reads,
//! computed style, scroll position, synthetic clicks) goes through
//! [`PageQuery`], so the same algorithm runs against a real browser binding
//! or against an [`HtmlPage`] snapshot in tests.

pub mod html;
pub mod selectors;

use async_trait::async_trait;
use thiserror::Error;

pub use html::HtmlPage;

/// Errors raised by a [`PageQuery`] implementation.
///
/// Ordinary markup variation (missing elements, missing attributes) is not an
/// error; these cover broken selectors and handles that no longer resolve.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    #[error("node handle no longer resolves to an element")]
    StaleNode,

    #[error("activation failed: {0}")]
    Activation(String),
}

/// Result alias for page operations.
pub type PageResult<T> = std::result::Result<T, PageError>;

/// Vertical scroll state of the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollMetrics {
    /// Current `scrollTop` of the document element
    pub top: u32,
    /// Total `scrollHeight` of the document element
    pub height: u32,
    /// Height of the viewport (`innerHeight`)
    pub viewport: u32,
}

impl ScrollMetrics {
    /// Returns true once the viewport touches the bottom of the document.
    pub fn at_bottom(&self) -> bool {
        self.top >= self.height.saturating_sub(self.viewport)
    }
}

/// Read-mostly access to a rendered page.
///
/// All reads are synchronous; only activation is async because dispatching
/// an event may have to round-trip through the host. Implementations use
/// interior mutability for scroll and activation, mirroring how a live DOM
/// is mutated through shared handles.
#[async_trait(?Send)]
pub trait PageQuery {
    /// Opaque element handle. Cheap to clone; valid for the page's lifetime.
    type Node: Clone + std::fmt::Debug;

    /// Full URL of the loaded document, including any query string.
    fn url(&self) -> String;

    /// All elements matching `selector` in document order, searched below
    /// `scope` (exclusive) or across the whole document when `scope` is None.
    fn query_all(&self, scope: Option<&Self::Node>, selector: &str) -> PageResult<Vec<Self::Node>>;

    /// First element matching `selector`.
    fn query_first(&self, scope: Option<&Self::Node>, selector: &str) -> PageResult<Option<Self::Node>> {
        Ok(self.query_all(scope, selector)?.into_iter().next())
    }

    /// Parent element, or None at the document root.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Whether the element's class list contains `class`.
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Raw attribute value.
    fn attr(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Rendered text (`innerText`): lines broken at block boundaries.
    fn inner_text(&self, node: &Self::Node) -> String;

    /// Serialized children (`innerHTML`).
    fn inner_html(&self, node: &Self::Node) -> String;

    /// Computed value of a CSS property.
    fn computed_style(&self, node: &Self::Node, property: &str) -> Option<String>;

    /// Current scroll state of the document.
    fn scroll_metrics(&self) -> ScrollMetrics;

    /// Sets the document's `scrollTop`. Implementations may clamp.
    fn set_scroll_top(&self, top: u32);

    /// Dispatches a bubbling synthetic click on the element.
    async fn activate(&self, node: &Self::Node) -> PageResult<()>;
}
