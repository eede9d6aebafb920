//! Reflexion CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "reflexion")]
#[command(about = "Build and compare module-dependency architecture diagrams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a dependency dump into a filtered diagram
    Build {
        /// Dependency dump file (one "producer consumer" pair per line)
        input: PathBuf,

        /// Output diagram file
        output: PathBuf,

        /// Allowed package prefixes; '*' or none keeps everything
        #[arg(long, num_args = 1.., value_delimiter = ',')]
        packages: Vec<String>,

        /// Package prefixes to hide
        #[arg(long, num_args = 1.., value_delimiter = ',')]
        hide_packages: Vec<String>,

        /// Maximum dependency depth to include
        #[arg(long)]
        max_depth: Option<u32>,

        /// Annotate edges with the consumer's version
        #[arg(long)]
        show_version: bool,

        /// Remove nodes with no edges after filtering
        #[arg(long)]
        remove_isolated: bool,
    },
    /// Compare two diagrams and report structural and textual similarity
    Compare {
        /// First diagram file
        first: PathBuf,

        /// Second diagram file
        second: PathBuf,

        /// Write each normalized graph as Graphviz DOT next to its input
        #[arg(long)]
        visualize: bool,

        /// Emit the similarity report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Build {
            input,
            output,
            packages,
            hide_packages,
            max_depth,
            show_version,
            remove_isolated,
        } => {
            let options = reflexion_builder::BuildOptions {
                packages,
                hide_packages,
                max_depth,
                show_version,
                remove_isolated,
            };
            commands::build(&input, &output, &options)
        }
        Commands::Compare {
            first,
            second,
            visualize,
            json,
        } => commands::compare(&first, &second, visualize, json),
    }
}
