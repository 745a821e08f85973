//! CLI command implementations.

pub mod extract;
pub mod graph;

pub use extract::{ExtractCommand, PageTurn};
pub use graph::GraphCommand;
