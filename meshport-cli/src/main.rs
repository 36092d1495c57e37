//! # meshport CLI
//!
//! Command-line interface for porting a note mesh into a docs content tree.

mod commands;

use clap::{CommandFactory, Parser};
use meshport_core::config::DEFAULT_MESH_DIR;
use meshport_core::PortOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "meshport")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Corpus root containing the mesh directory
    #[arg(long, value_name = "PATH")]
    source: Option<PathBuf>,

    /// Site directory to write into (defaults to sites/<site id>)
    #[arg(long, value_name = "DIR")]
    target: Option<PathBuf>,

    /// Name of the mesh directory inside the corpus
    #[arg(long, default_value = DEFAULT_MESH_DIR)]
    mesh: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(source) = cli.source else {
        eprintln!("{}", Cli::command().render_usage());
        eprintln!("error: --source <PATH> is required");
        std::process::exit(1);
    };

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    commands::port_corpus(PortOptions {
        source,
        mesh_dir: cli.mesh,
        target: cli.target,
    })
}
