//! Decoding of the editor's JSON flow document into a [`Graph`].

use crate::error::{GraphError, Result};
use crate::types::{CastMode, Edge, Graph, LoopSpec, Node, NodeKind};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct FlowDocument {
    #[serde(default)]
    nodes: Vec<FlowNode>,
    #[serde(default)]
    edges: Vec<FlowEdge>,
}

#[derive(Debug, Deserialize)]
struct FlowNode {
    #[serde(default)]
    id: Value,
    #[serde(rename = "type", default)]
    node_type: Option<String>,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct FlowEdge {
    #[serde(default)]
    source: Value,
    #[serde(default)]
    target: Value,
    #[serde(rename = "sourceHandle", default)]
    source_handle: Option<String>,
    #[serde(default)]
    label: Value,
}

impl Graph {
    /// Decode a flow document (`{"nodes": [...], "edges": [...]}`)
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: FlowDocument = serde_json::from_str(json)?;
        Self::from_document(doc)
    }

    /// Decode an already-parsed flow document
    pub fn from_json_value(value: Value) -> Result<Self> {
        let doc: FlowDocument = serde_json::from_value(value)?;
        Self::from_document(doc)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    fn from_document(doc: FlowDocument) -> Result<Self> {
        let mut graph = Self::new();

        for (position, raw) in doc.nodes.into_iter().enumerate() {
            let id = id_string(&raw.id).ok_or(GraphError::MissingNodeId(position))?;
            let kind = decode_kind(raw.node_type.as_deref(), raw.data);
            graph.add_node(Node::new(id, kind));
        }

        let mut skipped = 0usize;
        for raw in doc.edges {
            let (Some(source), Some(target)) = (id_string(&raw.source), id_string(&raw.target))
            else {
                skipped += 1;
                continue;
            };
            graph.add_edge(Edge {
                source,
                target,
                port: raw.source_handle.filter(|h| !h.is_empty()),
                label: raw.label.as_str().map(str::to_string),
            });
        }

        if skipped > 0 {
            log::warn!("Skipped {skipped} edges without a source or target");
        }

        log::debug!(
            "Decoded flow document: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(graph)
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Stringified field value; missing and null read as empty
fn text(data: &Value, key: &str) -> String {
    match data.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Like [`text`] but blank values fall back to `default`
fn text_or(data: &Value, key: &str, default: &str) -> String {
    let value = text(data, key);
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

fn first_text(data: &Value, keys: &[&str]) -> String {
    keys.iter()
        .map(|key| text(data, key))
        .find(|value| !value.trim().is_empty())
        .unwrap_or_default()
}

fn decode_kind(node_type: Option<&str>, data: Value) -> NodeKind {
    let Some(node_type) = node_type else {
        return NodeKind::Unrecognized {
            kind: "untyped".to_string(),
            data,
        };
    };

    match node_type.to_ascii_lowercase().as_str() {
        "start" => NodeKind::Start,
        "end" => NodeKind::End,
        "terminator" => {
            let title = text(&data, "title").trim().to_ascii_lowercase();
            if matches!(title.as_str(), "end" | "stop") {
                NodeKind::End
            } else {
                NodeKind::Start
            }
        }
        "return" => NodeKind::Return {
            value: text(&data, "value"),
        },
        "note" | "comment" => NodeKind::Note {
            text: text(&data, "text"),
        },
        "process" => NodeKind::Process {
            stmt: text(&data, "stmt"),
        },
        "input" => decode_input(&data),
        "output" => decode_output(&data),
        "io" => {
            if text(&data, "kind").trim().eq_ignore_ascii_case("output") {
                decode_output(&data)
            } else {
                decode_input(&data)
            }
        }
        "call" => NodeKind::Call {
            name: text_or(&data, "name", "S"),
            args: text(&data, "args"),
            assign_to: text(&data, "assignTo"),
        },
        "decision" => NodeKind::Decision {
            cond: text(&data, "cond"),
        },
        "loop" => NodeKind::Loop(decode_loop(&data)),
        _ => NodeKind::Unrecognized {
            kind: node_type.to_string(),
            data,
        },
    }
}

fn decode_input(data: &Value) -> NodeKind {
    NodeKind::Input {
        vars: text(data, "vars"),
        cast: CastMode::parse(&text(data, "cast")),
    }
}

fn decode_output(data: &Value) -> NodeKind {
    NodeKind::Output {
        value: first_text(data, &["value", "expr"]),
    }
}

fn decode_loop(data: &Value) -> LoopSpec {
    let spec = text(data, "spec");

    if text(data, "kind").trim().eq_ignore_ascii_case("while") {
        let cond = first_text(data, &["cond"]);
        let cond = if cond.trim().is_empty() { spec } else { cond };
        return LoopSpec::Conditional {
            cond: if cond.trim().is_empty() {
                "True".to_string()
            } else {
                cond
            },
        };
    }

    let explicit = ["var", "start", "end"]
        .iter()
        .any(|key| !text(data, key).trim().is_empty());

    if !explicit {
        if let Some(parsed) = parse_range_spec(&spec) {
            return parsed;
        }
    }

    LoopSpec::Counted {
        var: text_or(data, "var", "i"),
        start: text_or(data, "start", "0"),
        end: text_or(data, "end", "n"),
        step: text_or(data, "step", "1"),
    }
}

/// Parse loop-spec text of the form `i = 1..n` with an optional `step s` suffix
pub(crate) fn parse_range_spec(spec: &str) -> Option<LoopSpec> {
    let (var, range) = spec.split_once('=')?;
    let var = var.trim();
    if var.is_empty() || !var.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }

    let (range, step) = match range.split_once(" step ") {
        Some((range, step)) => (range, step.trim()),
        None => (range, "1"),
    };
    let (start, end) = range.split_once("..")?;
    let (start, end) = (start.trim(), end.trim());
    if start.is_empty() || end.is_empty() || step.is_empty() {
        return None;
    }

    Some(LoopSpec::Counted {
        var: var.to_string(),
        start: start.to_string(),
        end: end.to_string(),
        step: step.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KindTag;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_editor_aliases() {
        let graph = Graph::from_json_str(
            r#"{
                "nodes": [
                    {"id": "t1", "type": "terminator", "data": {"title": "start"}},
                    {"id": "t2", "type": "terminator", "data": {"title": "End"}},
                    {"id": "io1", "type": "io", "data": {"kind": "Input", "vars": "a, b", "cast": "int"}},
                    {"id": "io2", "type": "io", "data": {"kind": "Output", "expr": "a + b"}},
                    {"id": "c1", "type": "comment", "data": {"text": "sum"}}
                ],
                "edges": []
            }"#,
        )
        .unwrap();

        let tags: Vec<KindTag> = graph.nodes.iter().map(Node::tag).collect();
        assert_eq!(
            tags,
            vec![
                KindTag::Start,
                KindTag::End,
                KindTag::Input,
                KindTag::Output,
                KindTag::Note
            ]
        );
        assert_eq!(
            graph.nodes[2].kind,
            NodeKind::Input {
                vars: "a, b".into(),
                cast: CastMode::Int
            }
        );
        assert_eq!(
            graph.nodes[3].kind,
            NodeKind::Output {
                value: "a + b".into()
            }
        );
    }

    #[test]
    fn edges_keep_order_ports_and_numeric_ids() {
        let graph = Graph::from_json_str(
            r#"{
                "nodes": [{"id": 1, "type": "start"}, {"id": "2", "type": "decision", "data": {"cond": "x"}}],
                "edges": [
                    {"id": "e1", "source": 1, "target": "2", "sourceHandle": null},
                    {"id": "e2", "source": "2", "target": "3", "sourceHandle": "t", "label": "yes"},
                    {"id": "e3", "source": "2", "sourceHandle": "f"},
                    {"id": "e4", "source": "2", "target": "4", "sourceHandle": ""}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(graph.nodes[0].id, "1");
        assert_eq!(
            graph.edges,
            vec![
                Edge::new("1", "2"),
                Edge::port("2", "3", "t").with_label("yes"),
                Edge::new("2", "4"),
            ]
        );
    }

    #[test]
    fn unknown_types_are_kept_with_their_data() {
        let graph = Graph::from_json_str(
            r#"{"nodes": [{"id": "d", "type": "domain", "data": {"templateKey": "dense"}}], "edges": []}"#,
        )
        .unwrap();

        match &graph.nodes[0].kind {
            NodeKind::Unrecognized { kind, data } => {
                assert_eq!(kind, "domain");
                assert_eq!(data["templateKey"], "dense");
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn node_without_id_is_rejected() {
        let err = Graph::from_json_str(r#"{"nodes": [{"type": "start"}]}"#).unwrap_err();
        assert!(matches!(err, GraphError::MissingNodeId(0)));
    }

    #[test]
    fn loop_defaults_and_spec_text() {
        let graph = Graph::from_json_str(
            r#"{"nodes": [
                {"id": "a", "type": "loop", "data": {}},
                {"id": "b", "type": "loop", "data": {"kind": "for", "spec": "k = 1..10 step 2"}},
                {"id": "c", "type": "loop", "data": {"kind": "while", "cond": ""}},
                {"id": "d", "type": "loop", "data": {"var": "j", "end": "m", "spec": "k = 1..10"}}
            ]}"#,
        )
        .unwrap();

        let specs: Vec<&NodeKind> = graph.nodes.iter().map(|n| &n.kind).collect();
        assert_eq!(
            specs[0],
            &NodeKind::Loop(LoopSpec::Counted {
                var: "i".into(),
                start: "0".into(),
                end: "n".into(),
                step: "1".into()
            })
        );
        assert_eq!(
            specs[1],
            &NodeKind::Loop(LoopSpec::Counted {
                var: "k".into(),
                start: "1".into(),
                end: "10".into(),
                step: "2".into()
            })
        );
        assert_eq!(
            specs[2],
            &NodeKind::Loop(LoopSpec::Conditional {
                cond: "True".into()
            })
        );
        assert_eq!(
            specs[3],
            &NodeKind::Loop(LoopSpec::Counted {
                var: "j".into(),
                start: "0".into(),
                end: "m".into(),
                step: "1".into()
            })
        );
    }

    #[test]
    fn malformed_range_spec_is_ignored() {
        assert_eq!(parse_range_spec("i in range(3)"), None);
        assert_eq!(parse_range_spec("a b = 1..2"), None);
        assert_eq!(parse_range_spec("i = 1.."), None);
    }
}
