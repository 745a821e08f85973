//! Recommendation network built from many extraction results.
//!
//! Each ingested [`Recommendations`] contributes one edge per scraped item,
//! from the page's seed product to the recommended product, grouped by
//! carousel title. The network can be written as one Gephi GDF file per
//! carousel title.

use crate::carousel::{links, Item, Recommendations};
use anyhow::{Context, Result};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const NODE_HEADER: &str = "nodedef>id VARCHAR,name VARCHAR,author VARCHAR,url VARCHAR,price VARCHAR,thumbnail VARCHAR,is_seed BOOLEAN";
const EDGE_HEADER: &str = "edgedef>from VARCHAR,to VARCHAR,directed BOOLEAN";

/// Product metadata for one graph node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub asin: String,
    pub label: Option<String>,
    pub author: Option<String>,
    /// Absolute product URL
    pub link: String,
    pub price: Option<String>,
    pub thumbnail: Option<String>,
}

/// Edges and members of one carousel title.
#[derive(Debug, Clone, Default)]
struct EdgeList {
    title: String,
    members: HashSet<String>,
    edges: BTreeSet<(String, String)>,
}

/// Directed product graph keyed by ASIN.
#[derive(Debug, Clone, Default)]
pub struct RecommendationGraph {
    nodes: Vec<GraphNode>,
    index: HashMap<String, usize>,
    lists: Vec<EdgeList>,
    seeds: HashSet<String>,
}

impl RecommendationGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one page's extraction result.
    ///
    /// Node metadata is taken from the first sighting of an ASIN. Items
    /// without an ASIN cannot be keyed and are dropped.
    pub fn ingest(&mut self, result: &Recommendations) {
        for carousel in result {
            let Some(seed) = carousel.items.iter().find(|item| item.is_seed) else {
                warn!("Carousel '{}' has no seed item, skipping", carousel.name);
                continue;
            };
            if seed.asin.is_empty() {
                warn!("Seed of carousel '{}' has no ASIN, skipping", carousel.name);
                continue;
            }

            let host = links::origin(&seed.link).unwrap_or_default().to_string();
            self.seeds.insert(seed.asin.clone());

            let list = self.list_mut(&carousel.name);
            for item in &carousel.items {
                if item.asin.is_empty() {
                    debug!("Dropping item without ASIN: {}", item.link);
                    continue;
                }
                list.members.insert(item.asin.clone());
                if item.asin != seed.asin {
                    list.edges.insert((seed.asin.clone(), item.asin.clone()));
                }
            }

            for item in carousel.items.iter().filter(|item| !item.asin.is_empty()) {
                self.add_node(item, &host);
            }
        }
    }

    /// Number of distinct products.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct edges across all lists.
    pub fn edge_count(&self) -> usize {
        self.lists.iter().map(|list| list.edges.len()).sum()
    }

    /// Looks up a node by ASIN.
    pub fn node(&self, asin: &str) -> Option<&GraphNode> {
        self.index.get(asin).map(|&i| &self.nodes[i])
    }

    /// Carousel titles in the order they were first seen.
    pub fn list_titles(&self) -> Vec<&str> {
        self.lists.iter().map(|list| list.title.as_str()).collect()
    }

    /// Whether `asin` was the seed of an ingested page.
    pub fn is_seed(&self, asin: &str) -> bool {
        self.seeds.contains(asin)
    }

    /// Product links not yet ingested as seeds: the frontier of a deeper crawl.
    pub fn next_seeds(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|node| !self.seeds.contains(&node.asin))
            .map(|node| node.link.as_str())
            .collect()
    }

    /// Renders one carousel title as a GDF document.
    pub fn to_gdf(&self, title: &str) -> Option<String> {
        let list = self.lists.iter().find(|list| list.title == title)?;

        let mut lines = vec![NODE_HEADER.to_string()];
        for node in self.nodes.iter().filter(|node| list.members.contains(&node.asin)) {
            lines.push(format!(
                "{},{},{},{},{},{},{}",
                gdf_escape(Some(&node.asin)),
                gdf_escape(node.label.as_deref()),
                gdf_escape(node.author.as_deref()),
                gdf_escape(Some(&node.link)),
                gdf_escape(node.price.as_deref()),
                gdf_escape(node.thumbnail.as_deref()),
                self.is_seed(&node.asin)
            ));
        }

        lines.push(EDGE_HEADER.to_string());
        for (from, to) in &list.edges {
            lines.push(format!("{},{},true", gdf_escape(Some(from)), gdf_escape(Some(to))));
        }

        lines.push(String::new());
        Some(lines.join("\n"))
    }

    /// Writes one GDF file per carousel title into `dir`.
    pub fn write_gdf(&self, dir: &Path, prefix: Option<&str>) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        for list in &self.lists {
            let Some(gdf) = self.to_gdf(&list.title) else {
                continue;
            };
            let path = dir.join(gdf_file_name(&list.title, prefix));
            std::fs::write(&path, gdf)
                .with_context(|| format!("Failed to write GDF file: {}", path.display()))?;
            debug!("Wrote {}", path.display());
            written.push(path);
        }

        Ok(written)
    }

    fn list_mut(&mut self, title: &str) -> &mut EdgeList {
        let position = match self.lists.iter().position(|list| list.title == title) {
            Some(position) => position,
            None => {
                self.lists.push(EdgeList { title: title.to_string(), ..EdgeList::default() });
                self.lists.len() - 1
            }
        };
        &mut self.lists[position]
    }

    fn add_node(&mut self, item: &Item, host: &str) {
        if self.index.contains_key(&item.asin) {
            return;
        }

        let link = if item.link.starts_with("http") {
            item.link.clone()
        } else {
            format!("{}{}", host, item.link)
        };

        self.index.insert(item.asin.clone(), self.nodes.len());
        self.nodes.push(GraphNode {
            asin: item.asin.clone(),
            label: item.label.clone(),
            author: item.author.clone(),
            link,
            price: item.price.clone(),
            thumbnail: item.thumbnail.clone(),
        });
    }
}

/// File name for a carousel title: spaces and path separators become `-`.
pub fn gdf_file_name(title: &str, prefix: Option<&str>) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c == ' ' || c == '/' || c == '\\' { '-' } else { c })
        .collect();

    match prefix.filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{}-{}.gdf", prefix, stem),
        None => format!("{}.gdf", stem),
    }
}

/// Quotes a GDF string value; missing and empty values become `""`.
fn gdf_escape(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.is_empty() => format!("\"{}\"", s.replace('"', "\\\"")),
        _ => "\"\"".to_string(),
    }
}
