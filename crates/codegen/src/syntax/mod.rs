//! Target-language templates.
//!
//! Everything that depends on the output syntax lives behind [`Syntax`]:
//! expression rewriting, statement templates, block headers and the program
//! wrapper. Traversal in [`crate::emitter`] only ever asks for text.

mod python;

pub use python::{normalize_condition, normalize_expr, uses_helper, Python};

use flowcode_graph::CastMode;

pub trait Syntax {
    /// Language name used in logs and prompt packs
    fn name(&self) -> &'static str;

    /// Rewrite a user expression into valid target syntax
    fn normalize_expr(&self, expr: &str) -> String;

    /// Rewrite a user condition (comparison operators included) into valid target syntax
    fn normalize_condition(&self, cond: &str) -> String;

    /// Whether `text` needs the auxiliary helper import
    fn uses_helper(&self, text: &str) -> bool;

    /// Import line for the helper module
    fn helper_import(&self) -> &'static str;

    fn comment(&self, text: &str) -> String;

    /// Statement that does nothing, used for empty bodies
    fn no_op(&self) -> &'static str;

    fn return_stmt(&self, value: Option<&str>) -> String;

    fn print_stmt(&self, value: Option<&str>) -> String;

    fn input_stmt(&self, var: &str, cast: CastMode) -> String;

    fn call_stmt(&self, callee: &str, args: &[String], target: Option<&str>) -> String;

    fn if_header(&self, cond: &str) -> String;

    fn else_header(&self) -> String;

    /// Header of a loop over the inclusive range `start..=end`
    fn counted_loop_header(&self, var: &str, start: &str, end: &str, step: &str) -> String;

    fn conditional_loop_header(&self, cond: &str) -> String;

    /// Closing line for a block, for syntaxes that need one
    fn block_end(&self) -> Option<&'static str> {
        None
    }

    /// Wrap an already indented body into a runnable program
    fn program(&self, entry_name: &str, body: &str, with_helper: bool, pad: &str) -> String;

    /// Whole output when the graph has no entry point
    fn no_entry_diagnostic(&self) -> String;
}
