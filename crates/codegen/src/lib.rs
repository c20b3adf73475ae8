//! # Flowcode Codegen
//!
//! Deterministic flowchart-to-source compiler.
//!
//! ## Features
//!
//! - **Structured emission** - decisions become `if`/`else`, loops become
//!   `for`/`while`, sequences become statement runs
//! - **Merge resolution** - branch bodies stop at their nearest common node
//! - **Bounded traversal** - per-indent visit guard and a configurable step cap
//! - **Expression normalization** - unicode comparisons, `=` in conditions,
//!   `^` powers, bare `sqrt` calls
//! - **Never fails** - malformed graphs produce inline diagnostic comments
//!
//! ## Architecture
//!
//! ```text
//! Graph
//!   │
//!   ├──> ProgramAssembler
//!   │      ├─ GraphIndex::build
//!   │      ├─ analyze (findings logged)
//!   │      ├─ BlockEmitter::emit_block(entry, indent 1)
//!   │      │     ├─ per-kind emission
//!   │      │     ├─ Decision → resolve_merge → two nested blocks
//!   │      │     └─ Loop → body block stopped at the loop node
//!   │      └─ Syntax::program (helper import + wrapper)
//!   │
//!   └──> program text
//! ```
//!
//! ## Example
//!
//! ```
//! use flowcode_codegen::compile;
//! use flowcode_graph::Graph;
//!
//! let graph = Graph::from_json_str(r#"{
//!     "nodes": [
//!         {"id": "s", "type": "start"},
//!         {"id": "o", "type": "output", "data": {"value": "sqrt(16)"}}
//!     ],
//!     "edges": [{"source": "s", "target": "o"}]
//! }"#).unwrap();
//!
//! let code = compile(&graph);
//! assert!(code.starts_with("import math\ndef program():\n    print(math.sqrt(16))\n"));
//! ```

mod assembler;
mod emitter;
mod error;
mod options;
mod syntax;

pub use assembler::{compile, compile_with, ProgramAssembler};
pub use emitter::{Block, BlockEmitter};
pub use error::{ConfigError, Result};
pub use options::{CompileOptions, DEFAULT_MAX_STEPS};
pub use syntax::{normalize_condition, normalize_expr, uses_helper, Python, Syntax};
