use crate::builder::GraphIndex;
use std::collections::{HashMap, HashSet, VecDeque};

/// Node ids at which a traversal halts without expanding further
pub type StopSet<'g> = HashSet<&'g str>;

/// Port name editors use for explicit sequential flow
pub const NEXT_PORT: &str = "next";
/// Decision port taken when the condition holds
pub const TRUE_PORT: &str = "t";
pub const FALSE_PORT: &str = "f";
/// Loop port leading into the repeated body
pub const BODY_PORT: &str = "body";
/// Loop port followed once the loop finishes
pub const EXIT_PORT: &str = "exit";

impl<'g> GraphIndex<'g> {
    /// Sequential successor of `id`
    ///
    /// Prefers the first untagged edge, then the first edge tagged `next`,
    /// then whatever edge comes first.
    #[must_use]
    pub fn next(&self, id: &str) -> Option<&'g str> {
        let edges = self.outgoing(id);
        edges
            .iter()
            .find(|e| e.port.is_none())
            .or_else(|| edges.iter().find(|e| e.port.as_deref() == Some(NEXT_PORT)))
            .or_else(|| edges.first())
            .copied()
            .map(|e| e.target.as_str())
    }

    /// Target of the first edge leaving `id` through `port`
    #[must_use]
    pub fn by_port(&self, id: &str, port: &str) -> Option<&'g str> {
        self.outgoing(id)
            .iter()
            .find(|e| e.port.as_deref() == Some(port))
            .copied()
            .map(|e| e.target.as_str())
    }

    /// Shortest edge-count distance from `start` to every reachable id
    ///
    /// Ids in `stop` are recorded but never expanded.
    #[must_use]
    pub fn distances(&self, start: &'g str, stop: &StopSet<'g>) -> HashMap<&'g str, usize> {
        let mut dist = HashMap::new();
        let mut queue = VecDeque::new();
        dist.insert(start, 0);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if stop.contains(current) {
                continue;
            }
            let depth = dist[current];
            for &edge in self.outgoing(current) {
                let target = edge.target.as_str();
                if !dist.contains_key(target) {
                    dist.insert(target, depth + 1);
                    queue.push_back(target);
                }
            }
        }

        dist
    }

    /// Nearest node both branches reach, by combined distance
    ///
    /// Equal scores resolve to the lowest id. `None` when a branch is absent
    /// or the branches never reconverge.
    #[must_use]
    pub fn resolve_merge(
        &self,
        then_start: Option<&'g str>,
        else_start: Option<&'g str>,
        stop: &StopSet<'g>,
    ) -> Option<&'g str> {
        let (then_start, else_start) = (then_start?, else_start?);
        let from_then = self.distances(then_start, stop);
        let from_else = self.distances(else_start, stop);

        from_then
            .iter()
            .filter_map(|(&id, &a)| from_else.get(id).map(|&b| (a + b, id)))
            .min()
            .map(|(_score, id)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, Graph};

    fn chain(edges: &[(&str, &str, Option<&str>)]) -> Graph {
        let mut graph = Graph::new();
        for &(source, target, port) in edges {
            graph.add_edge(match port {
                Some(port) => Edge::port(source, target, port),
                None => Edge::new(source, target),
            });
        }
        graph
    }

    #[test]
    fn next_prefers_untagged_then_next_then_first() {
        let graph = chain(&[
            ("a", "x", Some("t")),
            ("a", "y", None),
            ("b", "x", Some("exit")),
            ("b", "z", Some("next")),
            ("c", "w", Some("body")),
            ("c", "v", Some("exit")),
        ]);
        let index = GraphIndex::build(&graph);

        assert_eq!(index.next("a"), Some("y"));
        assert_eq!(index.next("b"), Some("z"));
        assert_eq!(index.next("c"), Some("w"));
        assert_eq!(index.next("d"), None);
    }

    #[test]
    fn by_port_takes_first_exact_match() {
        let graph = chain(&[
            ("d", "x", Some("t")),
            ("d", "y", Some("t")),
            ("d", "z", Some("f")),
        ]);
        let index = GraphIndex::build(&graph);

        assert_eq!(index.by_port("d", "t"), Some("x"));
        assert_eq!(index.by_port("d", "f"), Some("z"));
        assert_eq!(index.by_port("d", "T"), None);
    }

    #[test]
    fn distances_halt_at_stop_set() {
        let graph = chain(&[("a", "b", None), ("b", "c", None), ("c", "d", None)]);
        let index = GraphIndex::build(&graph);
        let stop: StopSet = ["c"].into_iter().collect();

        let dist = index.distances("a", &stop);

        assert_eq!(dist.get("b"), Some(&1));
        assert_eq!(dist.get("c"), Some(&2));
        assert_eq!(dist.get("d"), None);
    }

    #[test]
    fn distances_survive_cycles() {
        let graph = chain(&[("a", "b", None), ("b", "a", None)]);
        let index = GraphIndex::build(&graph);

        let dist = index.distances("a", &StopSet::new());

        assert_eq!(dist.len(), 2);
        assert_eq!(dist["a"], 0);
    }

    #[test]
    fn merge_is_nearest_common_node() {
        let graph = chain(&[
            ("t", "m", None),
            ("e", "e2", None),
            ("e2", "m", None),
            ("m", "after", None),
        ]);
        let index = GraphIndex::build(&graph);

        assert_eq!(
            index.resolve_merge(Some("t"), Some("e"), &StopSet::new()),
            Some("m")
        );
    }

    #[test]
    fn merge_is_none_without_reconvergence() {
        let graph = chain(&[("t", "r1", None), ("e", "r2", None)]);
        let index = GraphIndex::build(&graph);

        assert_eq!(
            index.resolve_merge(Some("t"), Some("e"), &StopSet::new()),
            None
        );
        assert_eq!(index.resolve_merge(Some("t"), None, &StopSet::new()), None);
    }

    #[test]
    fn merge_ties_resolve_to_lowest_id() {
        // both "m2" and "m1" sit at combined distance 2
        let graph = chain(&[
            ("t", "m2", None),
            ("t", "m1", None),
            ("e", "m2", None),
            ("e", "m1", None),
        ]);
        let index = GraphIndex::build(&graph);

        assert_eq!(
            index.resolve_merge(Some("t"), Some("e"), &StopSet::new()),
            Some("m1")
        );
    }

    #[test]
    fn merge_search_does_not_cross_stop_nodes() {
        // both branches loop back to "l"; the shared tail behind it is out of scope
        let graph = chain(&[("t", "l", None), ("e", "l", None), ("l", "tail", None)]);
        let index = GraphIndex::build(&graph);
        let stop: StopSet = ["l"].into_iter().collect();

        assert_eq!(index.resolve_merge(Some("t"), Some("e"), &stop), Some("l"));
    }
}
