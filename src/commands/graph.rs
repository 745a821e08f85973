//! Recommendation network export command implementation.

use crate::carousel::Recommendations;
use crate::graph::RecommendationGraph;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Merges saved extraction results and writes GDF files.
pub struct GraphCommand {
    out_dir: PathBuf,
    prefix: Option<String>,
}

impl GraphCommand {
    /// Creates a new graph command writing into `out_dir`.
    pub fn new(out_dir: impl Into<PathBuf>, prefix: Option<String>) -> Self {
        Self { out_dir: out_dir.into(), prefix }
    }

    /// Reads JSON results from `inputs`, writes one GDF per carousel title
    /// and returns a summary. With `list_next_seeds`, the summary ends with
    /// the product links not yet extracted as seeds.
    pub fn execute(&self, inputs: &[PathBuf], list_next_seeds: bool) -> Result<String> {
        if inputs.is_empty() {
            bail!("No result files given");
        }

        let mut graph = RecommendationGraph::new();
        for path in inputs {
            graph.ingest(&Self::read_result(path)?);
        }

        info!("Graph has {} products and {} edges", graph.node_count(), graph.edge_count());

        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("Failed to create output directory: {}", self.out_dir.display()))?;
        let written = graph.write_gdf(&self.out_dir, self.prefix.as_deref())?;

        let mut lines = vec![format!(
            "Wrote {} GDF files ({} products, {} edges):",
            written.len(),
            graph.node_count(),
            graph.edge_count()
        )];
        lines.extend(written.iter().map(|path| format!("  {}", path.display())));

        let next_seeds = graph.next_seeds();
        if list_next_seeds {
            lines.push(format!("Next seeds ({}):", next_seeds.len()));
            lines.extend(next_seeds.iter().map(|link| format!("  {}", link)));
        } else {
            lines.push(format!("{} products not yet extracted as seeds", next_seeds.len()));
        }

        Ok(lines.join("\n"))
    }

    fn read_result(path: &Path) -> Result<Recommendations> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read result file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse result file: {}", path.display()))
    }
}
