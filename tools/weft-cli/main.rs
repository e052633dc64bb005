use clap::Parser;
use itertools::Itertools;
use std::fs;
use weft::prelude::*;

/// Inspect and validate workflow documents from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workflow JSON file
    workflow_path: String,

    /// Re-export the normalized document to this path
    #[arg(short, long)]
    out: Option<String>,

    /// Print a verdict for every edge instead of only the rejected ones
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let json = fs::read_to_string(&cli.workflow_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read workflow file '{}': {}",
            &cli.workflow_path, e
        ))
    });

    let mut store = WorkflowStore::new();
    import_document(&mut store, &json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to import workflow: {}", e)));

    println!("Workflow loaded from '{}'", &cli.workflow_path);

    // --- Summary ---
    let kind_counts = store.nodes().iter().counts_by(|node| node.kind());
    println!("\n--- Graph Summary ---");
    println!("Nodes: {}", store.nodes().len());
    for kind in [NodeKind::Text, NodeKind::Image, NodeKind::Llm] {
        if let Some(count) = kind_counts.get(&kind) {
            println!("  {}: {}", kind, count);
        }
    }
    println!("Edges: {}", store.edges().len());

    // --- Edge validation ---
    let mut rejected = 0;
    for edge in store.edges() {
        let source_kind = store.node(&edge.source).map(Node::kind);
        let target_kind = store.node(&edge.target).map(Node::kind);
        let (Some(source_kind), Some(target_kind)) = (source_kind, target_kind) else {
            // import drops dangling edges, so this only fires on internal bugs
            println!("  ? edge '{}' has a missing endpoint", edge.id);
            rejected += 1;
            continue;
        };
        match validate(
            source_kind,
            &edge.source_handle,
            target_kind,
            &edge.target_handle,
        ) {
            Ok(()) => {
                if cli.verbose {
                    println!(
                        "  ok {}:{} -> {}:{}",
                        source_kind, edge.source_handle, target_kind, edge.target_handle
                    );
                }
            }
            Err(rejection) => {
                println!("  REJECTED {}", rejection);
                rejected += 1;
            }
        }
    }
    if rejected == 0 {
        println!("All edges pass the connection rule table.");
    } else {
        println!("{} edge(s) failed validation.", rejected);
    }

    // --- Re-export ---
    if let Some(out_path) = cli.out {
        let exported = export_document(&store)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to export workflow: {}", e)));
        fs::write(&out_path, exported).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to write '{}': {}", &out_path, e))
        });
        println!("\nNormalized document written to '{}'", &out_path);
    }

    if rejected > 0 {
        std::process::exit(2);
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
