use crate::options::CompileOptions;
use crate::syntax::Syntax;
use flowcode_graph::{
    CastMode, GraphIndex, LoopSpec, NodeKind, StopSet, BODY_PORT, EXIT_PORT, FALSE_PORT,
    NEXT_PORT, TRUE_PORT,
};
use std::collections::HashSet;

/// Lines emitted for one run of nodes
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Block<'g> {
    /// Fully indented lines, blank fragments already dropped
    pub lines: Vec<String>,
    /// Where the run halted: a stop-set member, or `None` when the path ran out
    pub end: Option<&'g str>,
    pub needs_helper: bool,
}

impl Block<'_> {
    #[must_use]
    pub fn code(&self) -> String {
        self.lines.join("\n")
    }
}

/// Result of emitting a single node
struct Emission<'g> {
    lines: Vec<String>,
    next: Option<&'g str>,
    needs_helper: bool,
}

impl<'g> Emission<'g> {
    fn step(lines: Vec<String>, next: Option<&'g str>) -> Self {
        Self {
            lines,
            next,
            needs_helper: false,
        }
    }

    fn terminal(lines: Vec<String>) -> Self {
        Self::step(lines, None)
    }

    #[must_use]
    fn with_helper(mut self, needs_helper: bool) -> Self {
        self.needs_helper = needs_helper;
        self
    }
}

/// Walks the graph from a start id and renders structured code
///
/// One emitter serves a whole compilation: the visit guard is shared by
/// every nested block, keyed by `(node id, indent level)`.
pub struct BlockEmitter<'a, 'g, S: Syntax + ?Sized> {
    index: &'a GraphIndex<'g>,
    syntax: &'a S,
    options: &'a CompileOptions,
    visited: HashSet<(&'g str, usize)>,
}

impl<'a, 'g, S: Syntax + ?Sized> BlockEmitter<'a, 'g, S> {
    pub fn new(index: &'a GraphIndex<'g>, syntax: &'a S, options: &'a CompileOptions) -> Self {
        Self {
            index,
            syntax,
            options,
            visited: HashSet::new(),
        }
    }

    /// Emit nodes from `start` until the path ends, reaches `stop`, or the step cap
    pub fn emit_block(
        &mut self,
        start: Option<&'g str>,
        indent: usize,
        stop: &StopSet<'g>,
    ) -> Block<'g> {
        let mut block = Block::default();
        let mut current = start;
        let mut steps = 0;

        while let Some(id) = current {
            if stop.contains(id) {
                break;
            }
            if steps >= self.options.max_steps {
                log::warn!("Emission stopped at `{id}` after {steps} steps");
                block
                    .lines
                    .push(self.line(indent, &self.syntax.comment("[stopped: too many steps]")));
                break;
            }

            let emission = self.emit_one(id, indent, stop);
            block
                .lines
                .extend(emission.lines.into_iter().filter(|l| !l.trim().is_empty()));
            block.needs_helper |= emission.needs_helper;
            current = emission.next;
            steps += 1;
        }

        block.end = current;
        block
    }

    fn emit_one(&mut self, id: &'g str, indent: usize, stop: &StopSet<'g>) -> Emission<'g> {
        let Some(node) = self.index.node(id) else {
            log::warn!("Edge points at missing node `{id}`");
            let note = self.syntax.comment(&format!("[missing node {id}]"));
            // a revisit ends the path so edges between missing ids cannot spin
            let next = if self.visited.insert((id, indent)) {
                self.index.next(id)
            } else {
                None
            };
            return Emission::step(vec![self.line(indent, &note)], next);
        };

        if !self.visited.insert((id, indent)) {
            log::debug!("Cycle at `{id}` (indent {indent})");
            let note = self.syntax.comment(&format!("[cycle detected at {id}]"));
            return Emission::terminal(vec![self.line(indent, &note)]);
        }

        let syntax = self.syntax;
        match &node.kind {
            NodeKind::Start => Emission::step(Vec::new(), self.index.next(id)),
            NodeKind::End => Emission::terminal(Vec::new()),
            NodeKind::Return { value } => {
                let value = value.trim();
                let expr = (!value.is_empty()).then(|| syntax.normalize_expr(value));
                Emission::terminal(vec![self.line(indent, &syntax.return_stmt(expr.as_deref()))])
                    .with_helper(syntax.uses_helper(value))
            }
            NodeKind::Note { text } => {
                let text = text.trim();
                let lines = if text.is_empty() {
                    vec![self.line(indent, &syntax.comment(""))]
                } else {
                    text.lines()
                        .map(|line| self.line(indent, &syntax.comment(line.trim())))
                        .collect()
                };
                Emission::step(lines, self.index.next(id))
            }
            NodeKind::Process { stmt } => {
                Emission::step(self.statement_lines(stmt, indent), self.index.next(id))
                    .with_helper(syntax.uses_helper(stmt))
            }
            NodeKind::Input { vars, cast } => {
                Emission::step(self.input_lines(vars, *cast, indent), self.index.next(id))
            }
            NodeKind::Output { value } => {
                let value = value.trim();
                let expr = (!value.is_empty()).then(|| syntax.normalize_expr(value));
                Emission::step(
                    vec![self.line(indent, &syntax.print_stmt(expr.as_deref()))],
                    self.index.next(id),
                )
                .with_helper(syntax.uses_helper(value))
            }
            NodeKind::Call {
                name,
                args,
                assign_to,
            } => {
                let callee = non_blank_or(name, "S");
                let normalized: Vec<String> = split_list(args)
                    .map(|arg| syntax.normalize_expr(arg))
                    .collect();
                let target = Some(assign_to.trim()).filter(|t| !t.is_empty());
                Emission::step(
                    vec![self.line(indent, &syntax.call_stmt(callee, &normalized, target))],
                    self.index.next(id),
                )
                .with_helper(syntax.uses_helper(args))
            }
            NodeKind::Decision { cond } => self.emit_decision(id, cond, indent, stop),
            NodeKind::Loop(spec) => self.emit_loop(id, spec, indent, stop),
            NodeKind::Unrecognized { kind, .. } => {
                log::debug!("No emission contract for `{kind}` node `{id}`");
                let note = syntax.comment(&format!("[unhandled node type: {kind}]"));
                Emission::step(vec![self.line(indent, &note)], self.index.next(id))
            }
        }
    }

    /// One output line per non-blank statement line, relative indentation kept
    fn statement_lines(&self, stmt: &str, indent: usize) -> Vec<String> {
        let lines = dedent(stmt);
        if lines.is_empty() {
            return vec![self.line(indent, self.syntax.no_op())];
        }
        lines
            .into_iter()
            .map(|line| {
                let code = line.trim_start();
                let lead = &line[..line.len() - code.len()];
                self.line(indent, &format!("{lead}{}", self.syntax.normalize_expr(code)))
            })
            .collect()
    }

    fn input_lines(&self, vars: &str, cast: CastMode, indent: usize) -> Vec<String> {
        let lines: Vec<String> = split_list(vars)
            .map(|var| self.line(indent, &self.syntax.input_stmt(var, cast)))
            .collect();
        if lines.is_empty() {
            vec![self.line(indent, self.syntax.no_op())]
        } else {
            lines
        }
    }

    fn emit_decision(
        &mut self,
        id: &'g str,
        cond: &str,
        indent: usize,
        stop: &StopSet<'g>,
    ) -> Emission<'g> {
        let raw = non_blank_or(cond, "False");
        let header = self.syntax.if_header(&self.syntax.normalize_condition(raw));

        let then_start = self.index.by_port(id, TRUE_PORT);
        let else_start = self.index.by_port(id, FALSE_PORT);
        let merge = self.index.resolve_merge(then_start, else_start, stop);
        log::debug!("Decision `{id}` merges at {merge:?}");

        let mut branch_stop = stop.clone();
        branch_stop.extend(merge);
        let then_block = self.emit_block(then_start, indent + 1, &branch_stop);
        let else_block = self.emit_block(else_start, indent + 1, &branch_stop);
        let needs_helper =
            self.syntax.uses_helper(raw) || then_block.needs_helper || else_block.needs_helper;

        let mut lines = vec![self.line(indent, &header)];
        lines.extend(self.body_or_no_op(then_block, indent + 1));
        lines.push(self.line(indent, &self.syntax.else_header()));
        lines.extend(self.body_or_no_op(else_block, indent + 1));
        lines.extend(self.closing(indent));

        Emission::step(lines, merge).with_helper(needs_helper)
    }

    fn emit_loop(
        &mut self,
        id: &'g str,
        spec: &LoopSpec,
        indent: usize,
        stop: &StopSet<'g>,
    ) -> Emission<'g> {
        let syntax = self.syntax;
        let (header, header_helper) = match spec {
            LoopSpec::Counted {
                var,
                start,
                end,
                step,
            } => {
                let (start, end, step) = (
                    non_blank_or(start, "0"),
                    non_blank_or(end, "n"),
                    non_blank_or(step, "1"),
                );
                let header = syntax.counted_loop_header(
                    non_blank_or(var, "i"),
                    &syntax.normalize_expr(start),
                    &syntax.normalize_expr(end),
                    &syntax.normalize_expr(step),
                );
                let helper = [start, end, step].iter().any(|t| syntax.uses_helper(t));
                (header, helper)
            }
            LoopSpec::Conditional { cond } => {
                let raw = non_blank_or(cond, "True");
                let header = syntax.conditional_loop_header(&syntax.normalize_condition(raw));
                (header, syntax.uses_helper(raw))
            }
        };

        let mut body_stop = stop.clone();
        body_stop.insert(id);
        let body_start = self.index.by_port(id, BODY_PORT);
        let body = self.emit_block(body_start, indent + 1, &body_stop);
        let needs_helper = header_helper || body.needs_helper;

        let after = self
            .index
            .by_port(id, EXIT_PORT)
            .or_else(|| self.index.by_port(id, NEXT_PORT));

        let mut lines = vec![self.line(indent, &header)];
        lines.extend(self.body_or_no_op(body, indent + 1));
        lines.extend(self.closing(indent));

        Emission::step(lines, after).with_helper(needs_helper)
    }

    fn body_or_no_op(&self, block: Block<'g>, indent: usize) -> Vec<String> {
        if block.lines.is_empty() {
            vec![self.line(indent, self.syntax.no_op())]
        } else {
            block.lines
        }
    }

    fn closing(&self, indent: usize) -> Option<String> {
        self.syntax.block_end().map(|end| self.line(indent, end))
    }

    /// `text` at nesting `indent`; embedded newlines get the same pad
    fn line(&self, indent: usize, text: &str) -> String {
        let pad = self.options.pad(indent);
        text.lines()
            .map(|line| {
                if line.trim().is_empty() {
                    String::new()
                } else {
                    format!("{pad}{line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Non-blank lines of `text` with their common leading whitespace removed
fn dedent(text: &str) -> Vec<&str> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let common = lines
        .iter()
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    lines
        .into_iter()
        .map(|l| l.get(common..).unwrap_or_else(|| l.trim_start()))
        .collect()
}

/// Comma separated list with blanks removed
fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|item| !item.is_empty())
}

fn non_blank_or<'s>(text: &'s str, default: &'s str) -> &'s str {
    let text = text.trim();
    if text.is_empty() {
        default
    } else {
        text
    }
}
