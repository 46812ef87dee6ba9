//! Draw diagnostics derived from the compatibility graph.

use super::types::{CompatibilityGraph, DrawStats};

impl DrawStats {
    /// Graph-level fields; `success` and `steps` are filled in by the search.
    pub fn from_graph(graph: &CompatibilityGraph) -> Self {
        Self {
            total_participants: graph.len(),
            avg_compatibility: graph.avg_degree(),
            min_compatibility: graph.min_degree(),
            has_impossible_constraints: graph.adj.iter().any(Vec::is_empty),
            success: false,
            steps: 0,
        }
    }
}
