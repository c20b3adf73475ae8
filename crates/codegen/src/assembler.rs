use crate::emitter::BlockEmitter;
use crate::options::CompileOptions;
use crate::syntax::{Python, Syntax};
use flowcode_graph::{analyze, Graph, GraphIndex, StopSet};

/// Compile `graph` to Python with default options
#[must_use]
pub fn compile(graph: &Graph) -> String {
    compile_with(graph, &CompileOptions::default())
}

/// Compile `graph` to Python
#[must_use]
pub fn compile_with(graph: &Graph, options: &CompileOptions) -> String {
    ProgramAssembler::new(&Python, options).assemble(graph)
}

/// Turns a whole graph into one program text for a target syntax
pub struct ProgramAssembler<'a, S: Syntax + ?Sized> {
    syntax: &'a S,
    options: &'a CompileOptions,
}

impl<'a, S: Syntax + ?Sized> ProgramAssembler<'a, S> {
    pub fn new(syntax: &'a S, options: &'a CompileOptions) -> Self {
        Self { syntax, options }
    }

    /// Never fails: anything malformed shows up as a comment in the output
    #[must_use]
    pub fn assemble(&self, graph: &Graph) -> String {
        let Some(entry) = graph.entry_node() else {
            log::warn!("No Start node among {} nodes", graph.node_count());
            return self.syntax.no_entry_diagnostic();
        };

        let fallback;
        let options = match self.options.validate() {
            Ok(()) => self.options,
            Err(err) => {
                log::warn!("{err}; compiling with default options");
                fallback = CompileOptions::default();
                &fallback
            }
        };

        // Phase 1: index
        let index = GraphIndex::build(graph);
        for finding in analyze(graph).findings() {
            log::warn!("{finding}");
        }

        // Phase 2: emit from the entry point
        log::debug!(
            "Emitting {} from `{}` ({} nodes)",
            self.syntax.name(),
            entry.id,
            index.node_count()
        );
        let mut emitter = BlockEmitter::new(&index, self.syntax, options);
        let body = emitter.emit_block(Some(entry.id.as_str()), 1, &StopSet::new());

        // Phase 3: wrap
        let needs_helper = body.needs_helper
            || graph
                .nodes
                .iter()
                .flat_map(|node| node.expression_texts())
                .any(|text| self.syntax.uses_helper(text));
        log::debug!(
            "Assembled {} body lines (helper import: {needs_helper})",
            body.lines.len()
        );

        self.syntax.program(
            &options.entry_name,
            &body.code(),
            needs_helper,
            &options.pad(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowcode_graph::{Edge, Node, NodeKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn start_to_end_is_an_empty_program() {
        let graph = Graph::new()
            .with_node(Node::new("s", NodeKind::Start))
            .with_node(Node::new("e", NodeKind::End))
            .with_edge(Edge::new("s", "e"));

        assert_eq!(
            compile(&graph),
            "def program():\n    pass\n\nif __name__ == \"__main__\":\n    program()\n"
        );
    }

    #[test]
    fn options_shape_the_wrapper() {
        let graph = Graph::new()
            .with_node(Node::new("s", NodeKind::Start))
            .with_node(Node::new("o", NodeKind::Output { value: "1".into() }))
            .with_edge(Edge::new("s", "o"));
        let options = CompileOptions {
            indent_width: 2,
            entry_name: "main".into(),
            ..CompileOptions::default()
        };

        assert_eq!(
            compile_with(&graph, &options),
            "def main():\n  print(1)\n\nif __name__ == \"__main__\":\n  main()\n"
        );
    }

    #[test]
    fn unreachable_helper_use_still_imports() {
        let graph = Graph::new()
            .with_node(Node::new("s", NodeKind::Start))
            .with_node(Node::new(
                "orphan",
                NodeKind::Process {
                    stmt: "r = math.floor(x)".into(),
                },
            ));

        assert!(compile(&graph).starts_with("import math\ndef program():\n    pass\n"));
    }

    #[test]
    fn invalid_options_fall_back_to_defaults() {
        let graph = Graph::new()
            .with_node(Node::new("s", NodeKind::Start))
            .with_node(Node::new("o", NodeKind::Output { value: "1".into() }))
            .with_edge(Edge::new("s", "o"));

        for options in [
            CompileOptions {
                indent_width: 0,
                ..CompileOptions::default()
            },
            CompileOptions {
                max_steps: 0,
                ..CompileOptions::default()
            },
            CompileOptions {
                entry_name: "not a name".into(),
                ..CompileOptions::default()
            },
        ] {
            assert_eq!(compile_with(&graph, &options), compile(&graph));
        }
    }
}
