use anyhow::{Context, Result};
use flowcode_codegen::{compile_with, CompileOptions};
use flowcode_graph::{analyze, build_prompt_pack, Graph};
use std::path::Path;

/// Looked up in the working directory when `--config` is not given
pub const CONFIG_FILE_NAME: &str = "flowcode.toml";

fn load_flow(path: &Path) -> Result<Graph> {
    Graph::from_path(path)
        .with_context(|| format!("Failed to load flow document {}", path.display()))
}

fn load_options(explicit: Option<&Path>) -> Result<CompileOptions> {
    let path = match explicit {
        Some(path) => path,
        None => {
            let fallback = Path::new(CONFIG_FILE_NAME);
            if !fallback.is_file() {
                return Ok(CompileOptions::default());
            }
            fallback
        }
    };

    log::info!("Using compile options from {}", path.display());
    CompileOptions::from_path(path)
        .with_context(|| format!("Failed to load config {}", path.display()))
}

/// Print `text`, adding a final newline when it has none
fn emit_stdout(text: &str) {
    if text.ends_with('\n') {
        print!("{text}");
    } else {
        println!("{text}");
    }
}

pub fn compile(flow: &Path, output: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let graph = load_flow(flow)?;
    let options = load_options(config)?;
    let code = compile_with(&graph, &options);

    match output {
        Some(path) => {
            std::fs::write(path, &code)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {} bytes to {}", code.len(), path.display());
        }
        None => emit_stdout(&code),
    }
    Ok(())
}

pub fn describe(flow: &Path, language: &str) -> Result<()> {
    let graph = load_flow(flow)?;
    let pack = build_prompt_pack(&graph, language);
    log::debug!("Prompt pack hash {:016x}", pack.text_hash);
    emit_stdout(&pack.text);
    Ok(())
}

pub fn check(flow: &Path, json: bool) -> Result<()> {
    let graph = load_flow(flow)?;
    let report = analyze(&graph);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_clean() {
        println!("ok: {} nodes, {} edges", graph.node_count(), graph.edge_count());
    } else {
        for finding in report.findings() {
            println!("{finding}");
        }
    }
    Ok(())
}
