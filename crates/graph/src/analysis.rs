use crate::types::{Graph, KindTag};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Edge whose source or target names no node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingEdge {
    pub source: String,
    pub target: String,
}

/// Advisory structural findings about a flowchart
///
/// Code generation never depends on this report; it tolerates every
/// finding listed here and degrades to inline diagnostics instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphReport {
    /// Start nodes in collection order; the first one is the entry point
    pub start_nodes: Vec<String>,
    /// Nodes the entry point cannot reach (empty when there is no entry point)
    pub unreachable: Vec<String>,
    pub dangling_edges: Vec<DanglingEdge>,
    /// Cycles with no Loop node on them, each sorted by id
    pub unmodeled_cycles: Vec<Vec<String>>,
}

impl GraphReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.start_nodes.len() == 1
            && self.unreachable.is_empty()
            && self.dangling_edges.is_empty()
            && self.unmodeled_cycles.is_empty()
    }

    /// Human readable findings, one per line
    #[must_use]
    pub fn findings(&self) -> Vec<String> {
        let mut out = Vec::new();
        match self.start_nodes.len() {
            0 => out.push("no Start node".to_string()),
            1 => {}
            n => out.push(format!(
                "{n} Start nodes; only {} is compiled",
                self.start_nodes[0]
            )),
        }
        if !self.unreachable.is_empty() {
            out.push(format!(
                "unreachable from entry: {}",
                self.unreachable.join(", ")
            ));
        }
        for edge in &self.dangling_edges {
            out.push(format!("dangling edge {} -> {}", edge.source, edge.target));
        }
        for cycle in &self.unmodeled_cycles {
            out.push(format!("cycle without a Loop node: {}", cycle.join(", ")));
        }
        out
    }
}

/// Inspect a graph for structure the compiler will have to work around
#[must_use]
pub fn analyze(graph: &Graph) -> GraphReport {
    let mut digraph: DiGraph<&str, ()> = DiGraph::new();
    let mut indices: HashMap<&str, NodeIndex> = HashMap::new();
    let mut loops: HashSet<&str> = HashSet::new();

    // duplicate ids: the last node wins, as in `GraphIndex`
    for node in &graph.nodes {
        indices
            .entry(node.id.as_str())
            .or_insert_with(|| digraph.add_node(node.id.as_str()));
        if node.tag() == KindTag::Loop {
            loops.insert(node.id.as_str());
        } else {
            loops.remove(node.id.as_str());
        }
    }

    let mut report = GraphReport::default();

    for edge in &graph.edges {
        match (
            indices.get(edge.source.as_str()),
            indices.get(edge.target.as_str()),
        ) {
            (Some(&from), Some(&to)) => {
                digraph.add_edge(from, to, ());
            }
            _ => report.dangling_edges.push(DanglingEdge {
                source: edge.source.clone(),
                target: edge.target.clone(),
            }),
        }
    }

    report.start_nodes = graph
        .nodes
        .iter()
        .filter(|n| n.tag() == KindTag::Start)
        .map(|n| n.id.clone())
        .collect();

    if let Some(&entry) = report
        .start_nodes
        .first()
        .and_then(|id| indices.get(id.as_str()))
    {
        let mut seen = HashSet::new();
        let mut bfs = Bfs::new(&digraph, entry);
        while let Some(idx) = bfs.next(&digraph) {
            seen.insert(idx);
        }
        let mut unreachable: Vec<String> = digraph
            .node_indices()
            .filter(|idx| !seen.contains(idx))
            .map(|idx| digraph[idx].to_string())
            .collect();
        unreachable.sort();
        report.unreachable = unreachable;
    }

    for component in tarjan_scc(&digraph) {
        let is_cycle = component.len() > 1
            || component
                .first()
                .is_some_and(|&idx| digraph.contains_edge(idx, idx));
        if !is_cycle || component.iter().any(|&idx| loops.contains(digraph[idx])) {
            continue;
        }
        let mut ids: Vec<String> = component.iter().map(|&idx| digraph[idx].to_string()).collect();
        ids.sort();
        report.unmodeled_cycles.push(ids);
    }
    report.unmodeled_cycles.sort();

    log::debug!(
        "Analyzed graph: {} unreachable, {} dangling, {} unmodeled cycles",
        report.unreachable.len(),
        report.dangling_edges.len(),
        report.unmodeled_cycles.len()
    );

    report
}
