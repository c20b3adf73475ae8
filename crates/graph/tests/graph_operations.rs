//! Tests for graph decoding, indexing and reachability queries

use flowcode_graph::{analyze, Graph, GraphIndex, KindTag, StopSet};
use std::io::Write;

const BRANCHY_FLOW: &str = r#"{
    "nodes": [
        {"id": "start", "type": "start", "position": {"x": 0, "y": 0}},
        {"id": "read", "type": "input", "data": {"vars": "x", "cast": "int"}},
        {"id": "check", "type": "decision", "data": {"cond": "x > 0"}},
        {"id": "pos", "type": "output", "data": {"value": "\"positive\""}},
        {"id": "neg", "type": "output", "data": {"value": "\"not positive\""}},
        {"id": "done", "type": "output", "data": {"value": "\"done\""}},
        {"id": "end", "type": "end"}
    ],
    "edges": [
        {"id": "e1", "source": "start", "target": "read"},
        {"id": "e2", "source": "read", "target": "check"},
        {"id": "e3", "source": "check", "target": "pos", "sourceHandle": "t", "label": "yes"},
        {"id": "e4", "source": "check", "target": "neg", "sourceHandle": "f", "label": "no"},
        {"id": "e5", "source": "pos", "target": "done"},
        {"id": "e6", "source": "neg", "target": "done"},
        {"id": "e7", "source": "done", "target": "end"}
    ]
}"#;

fn branchy() -> Graph {
    Graph::from_json_str(BRANCHY_FLOW).expect("valid flow document")
}

#[test]
fn test_decode_flow_document() {
    let graph = branchy();

    assert_eq!(graph.node_count(), 7);
    assert_eq!(graph.edge_count(), 7);
    assert_eq!(graph.entry_node().map(|n| n.id.as_str()), Some("start"));
    assert_eq!(graph.nodes[2].tag(), KindTag::Decision);
}

#[test]
fn test_decode_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(BRANCHY_FLOW.as_bytes()).unwrap();

    let graph = Graph::from_path(file.path()).unwrap();

    assert_eq!(graph, branchy());
}

#[test]
fn test_decode_rejects_malformed_json() {
    assert!(Graph::from_json_str("{\"nodes\": [").is_err());
    assert!(Graph::from_path("/definitely/not/here.json").is_err());
}

#[test]
fn test_sequential_and_port_successors() {
    let graph = branchy();
    let index = GraphIndex::build(&graph);

    assert_eq!(index.next("start"), Some("read"));
    assert_eq!(index.by_port("check", "t"), Some("pos"));
    assert_eq!(index.by_port("check", "f"), Some("neg"));
    assert_eq!(index.next("end"), None);
}

#[test]
fn test_branches_merge_one_hop_later() {
    let graph = branchy();
    let index = GraphIndex::build(&graph);

    let merge = index.resolve_merge(
        index.by_port("check", "t"),
        index.by_port("check", "f"),
        &StopSet::new(),
    );

    assert_eq!(merge, Some("done"));
}

#[test]
fn test_distances_from_entry() {
    let graph = branchy();
    let index = GraphIndex::build(&graph);

    let dist = index.distances("start", &StopSet::new());

    assert_eq!(dist["check"], 2);
    assert_eq!(dist["done"], 4);
    assert_eq!(dist["end"], 5);
}

#[test]
fn test_report_for_well_formed_flow() {
    let report = analyze(&branchy());

    assert!(report.is_clean(), "{:?}", report.findings());
    assert_eq!(report.start_nodes, vec!["start".to_string()]);
}
