//! Tracery CLI — run-log inspector.
//!
//! Usage:
//!   tracery runs [--logs-dir path]
//!   tracery summary <run-id> [--logs-dir path]
//!   tracery audit <run-id> [--logs-dir path]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracery::{audit_graph, build_graph, build_hierarchy, ingest, AgentEvent, StageBody};

#[derive(Parser)]
#[command(
    name = "tracery",
    version,
    about = "Trace reconstruction engine for multi-agent research pipelines"
)]
struct Cli {
    /// Logs root directory, one subdirectory per run
    #[arg(long, global = true, default_value = "logs")]
    logs_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List run ids, newest first
    Runs,
    /// Print the reconstructed stage/round/group structure of a run
    Summary {
        /// Run id (directory name under the logs root)
        run_id: String,
    },
    /// Check a run's event graph for orphan and unreachable nodes
    Audit {
        /// Run id (directory name under the logs root)
        run_id: String,
    },
}

fn load_events(logs_dir: &PathBuf, run_id: &str) -> Result<Vec<AgentEvent>, String> {
    ingest::read_run_events(logs_dir, run_id).map_err(|e| format!("Failed to load run: {}", e))
}

fn cmd_runs(logs_dir: &PathBuf) -> i32 {
    match ingest::list_runs(logs_dir) {
        Ok(runs) if runs.is_empty() => {
            println!("No runs under {}", logs_dir.display());
            0
        }
        Ok(runs) => {
            for run in runs {
                println!("{}", run);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_summary(logs_dir: &PathBuf, run_id: &str) -> i32 {
    let events = match load_events(logs_dir, run_id) {
        Ok(events) => events,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let stages = build_hierarchy(&events);
    println!("{}: {} events, {} stages", run_id, events.len(), stages.len());
    for stage in &stages {
        println!(
            "  {} [{} .. {}] ({} events)",
            stage.name,
            stage.start_time.as_deref().unwrap_or("-"),
            stage.end_time.as_deref().unwrap_or("-"),
            stage.event_count()
        );
        match &stage.body {
            StageBody::Research { rounds } => {
                for round in rounds {
                    println!("    {} ({} events)", round.name, round.events.len());
                }
            }
            StageBody::Community { researchers } => {
                for group in researchers {
                    println!("    {} ({} events)", group.name, group.events.len());
                }
            }
            StageBody::Consensus { .. } => {}
        }
    }
    0
}

fn cmd_audit(logs_dir: &PathBuf, run_id: &str) -> i32 {
    let events = match load_events(logs_dir, run_id) {
        Ok(events) => events,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let graph = build_graph(&events);
    let audit = audit_graph(&graph);
    println!(
        "{}: {} nodes, {} edges",
        run_id,
        graph.node_count(),
        graph.edge_count()
    );
    if audit.is_clean() {
        println!("Graph is fully connected from the first node.");
        return 0;
    }
    for id in &audit.orphans {
        if let Some(node) = graph.nodes.iter().find(|n| &n.id == id) {
            println!("orphan: {} ({} from {})", id, node.event_type, node.source);
        }
    }
    for id in &audit.unreachable {
        println!("unreachable from start: {}", id);
    }
    for id in &audit.dangling_edges {
        println!("dangling edge: {}", id);
    }
    1
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Runs => cmd_runs(&cli.logs_dir),
        Commands::Summary { run_id } => cmd_summary(&cli.logs_dir, &run_id),
        Commands::Audit { run_id } => cmd_audit(&cli.logs_dir, &run_id),
    };
    std::process::exit(code);
}
