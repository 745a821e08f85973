//! [`PageQuery`] over a rendered HTML snapshot, backed by `scraper`.
//!
//! A snapshot has no layout engine, so a few live-page behaviors are
//! emulated: `innerText` breaks lines at block elements, `display` comes
//! from inline styles and the `hidden` attribute, scroll metrics are set by
//! the caller, and clicking a carousel's next-page control swaps in the next
//! scripted page of cards for that carousel.

use super::selectors::carousel;
use super::{PageError, PageQuery, PageResult, ScrollMetrics};
use async_trait::async_trait;
use ego_tree::iter::Edge;
use ego_tree::{NodeId, NodeRef};
use scraper::{CaseSensitivity, ElementRef, Html, Node, Selector};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, trace};

/// Elements rendered as blocks by default.
const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "html",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tr",
    "ul",
];

/// Elements whose text is never rendered.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// A parsed page snapshot.
pub struct HtmlPage {
    url: String,
    document: RefCell<Html>,
    selectors: RefCell<HashMap<String, Selector>>,
    scroll: Cell<ScrollMetrics>,
    page_turns: RefCell<HashMap<String, VecDeque<String>>>,
    activations: Cell<usize>,
}

impl HtmlPage {
    /// Parses a full document loaded from `url`.
    pub fn parse(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: RefCell::new(Html::parse_document(html)),
            selectors: RefCell::new(HashMap::new()),
            scroll: Cell::new(ScrollMetrics::default()),
            page_turns: RefCell::new(HashMap::new()),
            activations: Cell::new(0),
        }
    }

    /// Sets the document and viewport heights used for scrolling.
    pub fn with_viewport(self, document_height: u32, viewport_height: u32) -> Self {
        self.scroll.set(ScrollMetrics { top: 0, height: document_height, viewport: viewport_height });
        self
    }

    /// Queues the card markup of the following pages of one carousel.
    ///
    /// Each activation inside the container with id `container_id` replaces
    /// the carousel's list entries with the next queued fragment.
    pub fn with_page_turns<I, S>(self, container_id: impl Into<String>, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.page_turns
            .borrow_mut()
            .entry(container_id.into())
            .or_default()
            .extend(pages.into_iter().map(Into::into));
        self
    }

    /// Number of activations dispatched so far.
    pub fn activations(&self) -> usize {
        self.activations.get()
    }

    fn selector(&self, selector: &str) -> PageResult<Selector> {
        if let Some(parsed) = self.selectors.borrow().get(selector) {
            return Ok(parsed.clone());
        }

        let parsed = Selector::parse(selector).map_err(|e| PageError::Selector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })?;
        self.selectors.borrow_mut().insert(selector.to_string(), parsed.clone());
        Ok(parsed)
    }

    fn with_element<T>(&self, node: &NodeId, f: impl FnOnce(ElementRef<'_>) -> T) -> Option<T> {
        let document = self.document.borrow();
        let element = document.tree.get(*node).and_then(ElementRef::wrap)?;
        Some(f(element))
    }

    /// Nearest carousel container at or above `node`.
    fn container_of(&self, node: &NodeId) -> Option<NodeId> {
        let mut current = Some(*node);
        while let Some(id) = current {
            if self.has_class(&id, carousel::CONTAINER_CLASS) {
                return Some(id);
            }
            current = self.parent(&id);
        }
        None
    }

    /// Replaces the children of `list` with the nodes parsed from `markup`.
    fn replace_children(&self, list: NodeId, markup: &str) -> PageResult<()> {
        let fragment = Html::parse_fragment(markup);
        let mut document = self.document.borrow_mut();
        let tree = &mut document.tree;

        let old: Vec<NodeId> = tree
            .get(list)
            .ok_or(PageError::StaleNode)?
            .children()
            .map(|child| child.id())
            .collect();
        for id in old {
            if let Some(mut child) = tree.get_mut(id) {
                child.detach();
            }
        }

        // A parsed fragment is rooted at a synthetic <html> element.
        let root = tree.extend_tree(fragment.tree).id();
        let wrapper = tree
            .get(root)
            .and_then(|r| r.children().find(|child| child.value().is_element()))
            .map(|w| w.id());
        let new: Vec<NodeId> = wrapper
            .and_then(|id| tree.get(id))
            .map(|w| w.children().map(|child| child.id()).collect())
            .unwrap_or_default();

        let mut list_node = tree.get_mut(list).ok_or(PageError::StaleNode)?;
        for id in new {
            list_node.append_id(id);
        }

        Ok(())
    }
}

#[async_trait(?Send)]
impl PageQuery for HtmlPage {
    type Node = NodeId;

    fn url(&self) -> String {
        self.url.clone()
    }

    fn query_all(&self, scope: Option<&NodeId>, selector: &str) -> PageResult<Vec<NodeId>> {
        let selector = self.selector(selector)?;
        let document = self.document.borrow();

        let nodes = match scope {
            Some(id) => {
                let element =
                    document.tree.get(*id).and_then(ElementRef::wrap).ok_or(PageError::StaleNode)?;
                element.select(&selector).map(|e| e.id()).collect()
            }
            // `Html::select` scans the whole arena, detached cards included.
            None => document
                .tree
                .root()
                .descendants()
                .filter_map(ElementRef::wrap)
                .filter(|e| selector.matches(e))
                .map(|e| e.id())
                .collect(),
        };

        Ok(nodes)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        let document = self.document.borrow();
        let parent = document.tree.get(*node)?.parent().and_then(ElementRef::wrap)?;
        Some(parent.id())
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.with_element(node, |e| e.value().has_class(class, CaseSensitivity::CaseSensitive))
            .unwrap_or(false)
    }

    fn attr(&self, node: &NodeId, name: &str) -> Option<String> {
        self.with_element(node, |e| e.value().attr(name).map(String::from)).flatten()
    }

    fn inner_text(&self, node: &NodeId) -> String {
        self.with_element(node, render_inner_text).unwrap_or_default()
    }

    fn inner_html(&self, node: &NodeId) -> String {
        self.with_element(node, |e| e.inner_html()).unwrap_or_default()
    }

    fn computed_style(&self, node: &NodeId, property: &str) -> Option<String> {
        self.with_element(node, |e| {
            let element = e.value();
            if let Some(value) = element.attr("style").and_then(|s| declared_style(s, property)) {
                return Some(value);
            }

            if property != "display" {
                return None;
            }

            if element.attr("hidden").is_some() {
                return Some("none".to_string());
            }

            let display = if BLOCK_ELEMENTS.contains(&element.name()) { "block" } else { "inline" };
            Some(display.to_string())
        })
        .flatten()
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        self.scroll.get()
    }

    fn set_scroll_top(&self, top: u32) {
        let mut metrics = self.scroll.get();
        metrics.top = top.min(metrics.height.saturating_sub(metrics.viewport));
        self.scroll.set(metrics);
    }

    async fn activate(&self, node: &NodeId) -> PageResult<()> {
        if self.with_element(node, |_| ()).is_none() {
            return Err(PageError::StaleNode);
        }
        self.activations.set(self.activations.get() + 1);

        let Some(container) = self.container_of(node) else {
            trace!("Activation outside any carousel container");
            return Ok(());
        };
        let Some(container_id) = self.attr(&container, "id") else {
            trace!("Activated carousel container has no id");
            return Ok(());
        };

        let next = self.page_turns.borrow_mut().get_mut(&container_id).and_then(VecDeque::pop_front);
        let Some(markup) = next else {
            debug!("No further pages scripted for carousel {}", container_id);
            return Ok(());
        };

        let list = self.query_first(Some(&container), carousel::LIST)?.ok_or_else(|| {
            PageError::Activation(format!("carousel {} has no item list", container_id))
        })?;

        trace!("Turning page of carousel {}", container_id);
        self.replace_children(list, &markup)
    }
}

/// Value of `property` in an inline style declaration.
fn declared_style(style: &str, property: &str) -> Option<String> {
    style.split(';').rev().find_map(|declaration| {
        let (name, value) = declaration.split_once(':')?;
        if !name.trim().eq_ignore_ascii_case(property) {
            return None;
        }
        let value = value.trim().trim_end_matches("!important").trim();
        Some(value.to_ascii_lowercase())
    })
}

/// Approximates `innerText`: collapsed whitespace, one line per block.
fn render_inner_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();

    for edge in element.traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Text(text) if !is_raw_text(node) => push_collapsed(&mut raw, text),
                Node::Element(el) if el.name() == "br" || BLOCK_ELEMENTS.contains(&el.name()) => {
                    raw.push('\n')
                }
                _ => {}
            },
            Edge::Close(node) => {
                if node.value().as_element().is_some_and(|el| BLOCK_ELEMENTS.contains(&el.name())) {
                    raw.push('\n');
                }
            }
        }
    }

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_raw_text(node: NodeRef<'_, Node>) -> bool {
    node.parent()
        .and_then(|parent| parent.value().as_element())
        .is_some_and(|el| RAW_TEXT_ELEMENTS.contains(&el.name()))
}

fn push_collapsed(out: &mut String, text: &str) {
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
}
