pub mod classify;
pub mod play;
pub mod titles;
pub mod train;

use std::path::Path;

use wk_core::LinkGraph;
use wk_models::CentroidClassifier;

/// Load a link graph, reporting the path on failure.
fn load_graph(path: &Path) -> Result<LinkGraph, String> {
    let graph = LinkGraph::load(path)
        .map_err(|e| format!("failed to load graph {}: {e}", path.display()))?;
    if graph.is_empty() {
        return Err(format!("graph {} has no articles", path.display()));
    }
    Ok(graph)
}

/// Load a trained classifier, or fall back to the built-in corpus.
fn load_classifier(path: Option<&Path>) -> Result<CentroidClassifier, String> {
    match path {
        Some(path) => CentroidClassifier::load(path)
            .map_err(|e| format!("failed to load classifier {}: {e}", path.display())),
        None => Ok(CentroidClassifier::with_default_corpus()),
    }
}
