use crate::types::{Edge, Graph, Node};
use std::collections::HashMap;

/// Lookup tables over a [`Graph`] snapshot
///
/// Borrows the graph; built once per compilation and dropped with it.
#[derive(Debug)]
pub struct GraphIndex<'g> {
    nodes: HashMap<&'g str, &'g Node>,
    outgoing: HashMap<&'g str, Vec<&'g Edge>>,
}

impl<'g> GraphIndex<'g> {
    /// Build id→node and id→outgoing-edges maps
    ///
    /// Duplicate node ids: the last one wins. Edges keep their document order
    /// per source and may point at ids that have no node.
    #[must_use]
    pub fn build(graph: &'g Graph) -> Self {
        let mut nodes = HashMap::with_capacity(graph.nodes.len());
        for node in &graph.nodes {
            nodes.insert(node.id.as_str(), node);
        }

        let mut outgoing: HashMap<&'g str, Vec<&'g Edge>> = HashMap::new();
        for edge in &graph.edges {
            outgoing.entry(edge.source.as_str()).or_default().push(edge);
        }

        log::debug!(
            "Indexed graph: {} nodes, {} edge sources",
            nodes.len(),
            outgoing.len()
        );

        Self { nodes, outgoing }
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&'g Node> {
        self.nodes.get(id).copied()
    }

    /// Outgoing edges of `id` in document order
    #[must_use]
    pub fn outgoing(&self, id: &str) -> &[&'g Edge] {
        self.outgoing.get(id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }
}
