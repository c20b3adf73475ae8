use crate::types::{Graph, LoopSpec, NodeKind};
use serde_json::{json, Value};

pub const PROMPT_PACK_VERSION: u32 = 1;

/// Textual description of a graph for an external code-generation service
#[derive(Debug, Clone)]
pub struct PromptPack {
    pub language: String,
    pub text: String,
    pub text_hash: u64,
}

/// Build a deterministic prompt pack (graph-as-text) for `language`.
///
/// The pack carries instructions describing every node kind, the expected
/// response schema and the flow itself as pretty-printed JSON. Identical
/// graphs always produce identical text and hash.
#[must_use]
pub fn build_prompt_pack(graph: &Graph, language: &str) -> PromptPack {
    let flow = json!({
        "language": language,
        "flow": {
            "nodes": graph.nodes.iter().map(|node| json!({
                "id": node.id,
                "type": node.kind.type_name(),
                "data": node_data(&node.kind),
            })).collect::<Vec<_>>(),
            "edges": graph.edges.iter().map(|edge| json!({
                "source": edge.source,
                "sourceHandle": edge.port,
                "target": edge.target,
            })).collect::<Vec<_>>(),
        },
    });

    let mut lines: Vec<String> = vec![
        format!("prompt_pack_version: {PROMPT_PACK_VERSION}"),
        "Generate a complete program from the flowchart below.".to_string(),
        "Nodes are typed; edges run from source to target in execution order.".to_string(),
        "Node types:".to_string(),
        "- start / end: entry and exit markers".to_string(),
        "- return: return data.value (bare return when empty)".to_string(),
        "- note: annotation data.text, context only".to_string(),
        "- process: one statement, data.stmt".to_string(),
        "- input: read the comma-separated data.vars, converted per data.cast (float|int|str|raw)"
            .to_string(),
        "- output: print data.value".to_string(),
        "- call: call data.name with data.args, assigning to data.assignTo when set".to_string(),
        "- decision: condition data.cond; true branch on handle \"t\", false branch on handle \"f\""
            .to_string(),
        "- loop: data.kind for (data.var from data.start to data.end inclusive, by data.step) or while (data.cond); body on handle \"body\", continuation on handle \"exit\""
            .to_string(),
        "- definition: unified definition node with data.defKind:".to_string(),
        "    - \"function\": data.name, data.params [{name, type, default}], data.returnType, data.body"
            .to_string(),
        "    - \"class\": data.name, data.parent (another class), data.attrs [{name, type, default, visibility}], data.methods [{name, params, returnType, visibility}]"
            .to_string(),
        "    - \"struct\": data.name, data.attrs".to_string(),
        "    - \"enum\": data.name, data.values [{name, value}]".to_string(),
        "    - \"interface\": data.name, data.parent, data.attrs, data.methods".to_string(),
        "- domain: node from a preset catalog:".to_string(),
        "    - data.templateKey: the kind (e.g. \"conv2d\", \"dense\", \"lstm\", \"factory\", \"source_csv\")"
            .to_string(),
        "    - data.label: display name; data.instanceName: user-given instance name".to_string(),
        "    - data.paramValues: {paramName: value} with the configured parameters".to_string(),
        "    - data.outputType / data.inputTypes: type information for connections".to_string(),
        "    - edges between domain nodes carry data (tensor to tensor, dataframe to dataframe, ...)"
            .to_string(),
        "    - a neural network architecture becomes model code (Keras/PyTorch per language)"
            .to_string(),
        "    - a data pipeline becomes ETL code; an API becomes endpoint/service code".to_string(),
        "    - a tensor network becomes contraction code".to_string(),
        "- trycatch: error handling (data.tryBody, data.catchVar, data.catchBody)".to_string(),
        "- any other type: interpret data in context".to_string(),
        String::new(),
        "Visibility codes: \"+\" = public, \"-\" = private, \"#\" = protected".to_string(),
        "When data.parent references another node's name, implement inheritance.".to_string(),
        String::new(),
        "Return STRICT JSON with this schema:".to_string(),
        r#"{"language": "...", "files": [{"path": "...", "content": "..."}], "notes": "..."}"#
            .to_string(),
        String::new(),
        "FLOWCHART_JSON:".to_string(),
    ];
    lines.push(serde_json::to_string_pretty(&flow).unwrap_or_else(|_| flow.to_string()));

    let text = lines.join("\n");
    let text_hash = fnv1a64(text.as_bytes());

    PromptPack {
        language: language.to_string(),
        text,
        text_hash,
    }
}

/// Payload as the editor stores it in the node's `data` object
fn node_data(kind: &NodeKind) -> Value {
    match kind {
        NodeKind::Start | NodeKind::End => json!({}),
        NodeKind::Return { value } | NodeKind::Output { value } => json!({ "value": value }),
        NodeKind::Note { text } => json!({ "text": text }),
        NodeKind::Process { stmt } => json!({ "stmt": stmt }),
        NodeKind::Input { vars, cast } => json!({ "vars": vars, "cast": cast.as_str() }),
        NodeKind::Call {
            name,
            args,
            assign_to,
        } => json!({ "name": name, "args": args, "assignTo": assign_to }),
        NodeKind::Decision { cond } => json!({ "cond": cond }),
        NodeKind::Loop(LoopSpec::Counted {
            var,
            start,
            end,
            step,
        }) => json!({ "kind": "for", "var": var, "start": start, "end": end, "step": step }),
        NodeKind::Loop(LoopSpec::Conditional { cond }) => json!({ "kind": "while", "cond": cond }),
        NodeKind::Unrecognized { data, .. } => data.clone(),
    }
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 14695981039346656037;
    const PRIME: u64 = 1099511628211;
    let mut hash = OFFSET;
    for b in bytes {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
