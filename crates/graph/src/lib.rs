//! # Flowcode Graph
//!
//! Flowchart model and the graph queries the code generator is built on.
//!
//! ## Features
//!
//! - **Flow documents** - decode the editor's `{nodes, edges}` JSON
//! - **Indexing** - id→node and id→outgoing-edge lookups over an immutable snapshot
//! - **Edge selection** - forgiving sequential successor, exact port lookup
//! - **Reachability** - stop-set bounded BFS distances and branch merge points
//! - **Structural report** - entry reachability, dangling edges, unmodeled cycles
//! - **Prompt packs** - deterministic graph-as-text for external generators
//!
//! ## Architecture
//!
//! ```text
//! flow.json
//!     │
//!     ├──> Graph (nodes + ordered edges)
//!     │
//!     ├──> GraphIndex
//!     │      ├─ next / by_port
//!     │      ├─ distances (BFS, stop set)
//!     │      └─ resolve_merge (min combined distance, lowest id on ties)
//!     │
//!     ├──> analyze (petgraph) ──> GraphReport
//!     │
//!     └──> build_prompt_pack ──> PromptPack
//! ```

mod analysis;
mod builder;
mod describe;
mod error;
mod flow;
mod graph;
mod types;

pub use analysis::{analyze, DanglingEdge, GraphReport};
pub use builder::GraphIndex;
pub use describe::{build_prompt_pack, PromptPack, PROMPT_PACK_VERSION};
pub use error::{GraphError, Result};
pub use graph::{StopSet, BODY_PORT, EXIT_PORT, FALSE_PORT, NEXT_PORT, TRUE_PORT};
pub use types::{CastMode, Edge, Graph, KindTag, LoopSpec, Node, NodeId, NodeKind};
