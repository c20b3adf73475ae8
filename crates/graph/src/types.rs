use serde::{Deserialize, Serialize};

/// Node identifier as written by the editor
pub type NodeId = String;

/// Payload-free node kind shared by every dispatch site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindTag {
    Start,
    End,
    Return,
    Note,
    Process,
    Input,
    Output,
    Call,
    Decision,
    Loop,
    Unrecognized,
}

impl KindTag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Return => "return",
            Self::Note => "note",
            Self::Process => "process",
            Self::Input => "input",
            Self::Output => "output",
            Self::Call => "call",
            Self::Decision => "decision",
            Self::Loop => "loop",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Kinds that end a path without a continuation
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::End | Self::Return)
    }
}

/// How an Input node converts what the user typed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastMode {
    #[default]
    Float,
    Int,
    Str,
    Raw,
}

impl CastMode {
    /// Parse the editor's cast name; anything unknown falls back to `Float`
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Self::Int,
            "str" | "string" => Self::Str,
            "raw" => Self::Raw,
            _ => Self::Float,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Int => "int",
            Self::Str => "str",
            Self::Raw => "raw",
        }
    }
}

/// Loop header description
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopSpec {
    /// Inclusive range `var = start..end` advancing by `step`
    Counted {
        var: String,
        start: String,
        end: String,
        step: String,
    },
    /// Repeats while `cond` holds
    Conditional { cond: String },
}

/// Node kind with its kind-specific payload
///
/// Text fields hold what the user typed. Decoding fills in the editor's
/// defaults for call names and loop headers; any other blank value is left
/// blank for the code generator to substitute.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Start,
    End,
    Return {
        value: String,
    },
    Note {
        text: String,
    },
    Process {
        stmt: String,
    },
    Input {
        vars: String,
        cast: CastMode,
    },
    Output {
        value: String,
    },
    Call {
        name: String,
        args: String,
        assign_to: String,
    },
    Decision {
        cond: String,
    },
    Loop(LoopSpec),
    /// Any node type the compiler has no contract for (domain nodes, try/catch, ...)
    Unrecognized {
        kind: String,
        data: serde_json::Value,
    },
}

impl NodeKind {
    #[must_use]
    pub const fn tag(&self) -> KindTag {
        match self {
            Self::Start => KindTag::Start,
            Self::End => KindTag::End,
            Self::Return { .. } => KindTag::Return,
            Self::Note { .. } => KindTag::Note,
            Self::Process { .. } => KindTag::Process,
            Self::Input { .. } => KindTag::Input,
            Self::Output { .. } => KindTag::Output,
            Self::Call { .. } => KindTag::Call,
            Self::Decision { .. } => KindTag::Decision,
            Self::Loop(_) => KindTag::Loop,
            Self::Unrecognized { .. } => KindTag::Unrecognized,
        }
    }

    /// Type name as the editor writes it in a flow document
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Unrecognized { kind, .. } => kind,
            other => other.tag().as_str(),
        }
    }
}

/// Keys scanned for free-form expression text on nodes the compiler does not model
const UNRECOGNIZED_TEXT_KEYS: [&str; 7] = ["stmt", "cond", "value", "args", "start", "end", "step"];

/// A single flowchart node
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    #[must_use]
    pub const fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    /// Free-form expression text carried by this node
    ///
    /// Labels and comments are not expressions and are left out.
    #[must_use]
    pub fn expression_texts(&self) -> Vec<&str> {
        match &self.kind {
            NodeKind::Start | NodeKind::End | NodeKind::Note { .. } | NodeKind::Input { .. } => {
                Vec::new()
            }
            NodeKind::Return { value } | NodeKind::Output { value } => vec![value.as_str()],
            NodeKind::Process { stmt } => vec![stmt.as_str()],
            NodeKind::Call { args, .. } => vec![args.as_str()],
            NodeKind::Decision { cond } => vec![cond.as_str()],
            NodeKind::Loop(LoopSpec::Counted {
                start, end, step, ..
            }) => vec![start.as_str(), end.as_str(), step.as_str()],
            NodeKind::Loop(LoopSpec::Conditional { cond }) => vec![cond.as_str()],
            NodeKind::Unrecognized { data, .. } => UNRECOGNIZED_TEXT_KEYS
                .iter()
                .filter_map(|key| data.get(key).and_then(serde_json::Value::as_str))
                .collect(),
        }
    }
}

/// Directed connection between two nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    /// Output socket name (`t`/`f`, `body`/`exit`, `next`); `None` is plain sequential flow
    pub port: Option<String>,
    /// Display text only
    pub label: Option<String>,
}

impl Edge {
    /// Untagged sequential edge
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            port: None,
            label: None,
        }
    }

    /// Edge leaving through a named port
    pub fn port(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        port: impl Into<String>,
    ) -> Self {
        Self {
            port: Some(port.into()),
            ..Self::new(source, target)
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Immutable snapshot of a flowchart
///
/// Edge order is significant: among several untagged edges leaving the same
/// node, the first one listed is the sequential successor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    #[must_use]
    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// First Start node in collection order
    #[must_use]
    pub fn entry_node(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.tag() == KindTag::Start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cast_mode_parse_falls_back_to_float() {
        assert_eq!(CastMode::parse("int"), CastMode::Int);
        assert_eq!(CastMode::parse(" STR "), CastMode::Str);
        assert_eq!(CastMode::parse("raw"), CastMode::Raw);
        assert_eq!(CastMode::parse("complex"), CastMode::Float);
        assert_eq!(CastMode::parse(""), CastMode::Float);
    }

    #[test]
    fn unrecognized_nodes_expose_known_text_keys() {
        let node = Node::new(
            "d1",
            NodeKind::Unrecognized {
                kind: "domain".into(),
                data: serde_json::json!({ "stmt": "y = sqrt(x)", "label": "Dense", "step": 2 }),
            },
        );

        assert_eq!(node.expression_texts(), vec!["y = sqrt(x)"]);
        assert_eq!(node.kind.type_name(), "domain");
        assert_eq!(node.tag(), KindTag::Unrecognized);
    }

    #[test]
    fn entry_node_is_first_start_in_order() {
        let graph = Graph::new()
            .with_node(Node::new("p", NodeKind::Process { stmt: "x = 1".into() }))
            .with_node(Node::new("s2", NodeKind::Start))
            .with_node(Node::new("s1", NodeKind::Start));

        assert_eq!(graph.entry_node().map(|n| n.id.as_str()), Some("s2"));
    }
}
