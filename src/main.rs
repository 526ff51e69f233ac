use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pathtree::{Console, Coordinator, MenuExit, SessionConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "pathtree",
    about = "Build a binary tree from `<value> <path>` records and check that it is complete"
)]
struct Cli {
    /// Log progress to stderr and print session statistics.
    #[arg(short, long)]
    verbose: bool,

    /// Word that ends interactive input.
    #[arg(long, default_value = "end")]
    sentinel: String,

    /// Input mode; without one, a menu is shown.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Type records one per line.
    Interactive,
    /// Read records from a file (one `<value> <path>` per line).
    Load {
        /// Records file.
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = SessionConfig::default()
        .with_sentinel(cli.sentinel)
        .with_verbose(cli.verbose);
    let mut console = Console::new(io::stdin().lock(), io::stdout().lock(), config);
    let mut coordinator = Coordinator::new();

    match cli.command {
        None => {
            if console.run_menu(&mut coordinator)? == MenuExit::Quit {
                return Ok(());
            }
        }
        Some(Commands::Interactive) => console
            .run_interactive(&mut coordinator)
            .context("interactive input failed")?,
        Some(Commands::Load { file }) => {
            let loaded = console
                .load_file(&mut coordinator, &file)
                .with_context(|| format!("failed to load records from {}", file.display()))?;
            if !loaded {
                bail!("{} contains no valid records", file.display());
            }
        }
    }

    console
        .show_results(&mut coordinator)
        .context("failed to report results")?;
    Ok(())
}

/// Filter used when `RUST_LOG` is unset
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "pathtree=debug"
    } else {
        "pathtree=warn"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}
