//! Command-line interface for fastgtools

use crate::parser::{parse_file, ParseOptions};
use crate::summary::GraphSummary;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// fastgtools - parse and validate FASTG assembly graphs
#[derive(Parser)]
#[command(name = "fastgtools")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Summarize the graph described by a FASTG file
    Summary {
        /// Path to the FASTG file (.fastg or .fastg.gz)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail if an adjacency target is never declared
        #[arg(long)]
        require_declared: bool,

        /// Also check adjacency targets against the edge's declared length and coverage
        #[arg(long)]
        check_references: bool,
    },

    /// Validate a FASTG file
    Validate {
        /// Path to the FASTG file (.fastg or .fastg.gz)
        #[arg(short, long)]
        input: PathBuf,

        /// Fail if an adjacency target is never declared
        #[arg(long)]
        require_declared: bool,

        /// Also check adjacency targets against the edge's declared length and coverage
        #[arg(long)]
        check_references: bool,
    },
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Summary {
            input,
            format,
            output,
            require_declared,
            check_references,
        } => cmd_summary(
            &input,
            &format,
            output.as_deref(),
            &ParseOptions {
                require_declared,
                check_references,
            },
        ),
        Commands::Validate {
            input,
            require_declared,
            check_references,
        } => cmd_validate(
            &input,
            &ParseOptions {
                require_declared,
                check_references,
            },
        ),
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn cmd_summary(
    input: &Path,
    format: &str,
    output: Option<&Path>,
    options: &ParseOptions,
) -> Result<()> {
    let spinner = create_spinner("Reading FASTG file...");
    let start = Instant::now();

    let parsed = parse_file(input, options);
    let graph = match parsed {
        Ok(graph) => graph,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e).with_context(|| format!("failed to parse {}", input.display()));
        }
    };
    spinner.set_message("Computing summary...");

    let summary = GraphSummary::from_graph(&graph);
    spinner.finish_with_message(format!("Done in {:.2?}", start.elapsed()));

    let output_text = match format.to_lowercase().as_str() {
        "json" => summary.to_json()?,
        _ => summary.format_summary(),
    };

    if let Some(output_path) = output {
        std::fs::write(output_path, &output_text)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        println!("Summary written to: {}", output_path.display());
    } else {
        println!("{}", output_text);
    }

    Ok(())
}

fn cmd_validate(input: &Path, options: &ParseOptions) -> Result<()> {
    let spinner = create_spinner("Validating FASTG file...");
    let start = Instant::now();

    let parsed = parse_file(input, options);
    spinner.finish_with_message(format!("File checked in {:.2?}", start.elapsed()));
    let graph = parsed.with_context(|| format!("{} is not valid FASTG", input.display()))?;

    println!("\n=== Validation Results ===\n");
    println!("Nodes: {}", graph.node_count());
    println!("Edges: {}", graph.edge_count());

    let undeclared: Vec<String> = graph
        .undeclared_nodes()
        .map(|node| node.name.to_string())
        .collect();
    if !undeclared.is_empty() {
        println!("\nReferenced but never declared ({}):", undeclared.len());
        for name in undeclared.iter().take(5) {
            println!("  ⚠ {}", name);
        }
        if undeclared.len() > 5 {
            println!("  ... and {} more", undeclared.len() - 5);
        }
    }

    println!("\n✓ Validation passed");
    Ok(())
}
