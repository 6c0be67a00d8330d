//! `render-diff`: reconcile render trees from the command line.
//!
//! Usage:
//!   render-diff diff <prev.json> <next.json> [--indexed]
//!   render-diff mount <tree.json>
//!   render-diff apply <tree.json> <patches.json>
//!
//! Any input path may be `-` to read stdin. Output goes to stdout as JSON.

use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use render_diff::cli::{apply_json, diff_json, mount_json, read_input, render};
use render_diff::DiffOptions;
use tracing::debug;

#[derive(Parser)]
#[command(name = "render-diff", version, about = "Render tree diffing and patching")]
struct Args {
    /// Pretty-print the JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the patch list that turns `prev` into `next`.
    Diff {
        prev: String,
        next: String,
        /// Reconcile children by position even when keys are present.
        #[arg(long)]
        indexed: bool,
    },
    /// Print the first-mount metadata patches of a tree.
    Mount { tree: String },
    /// Apply a patch list to a tree and print the result.
    Apply { tree: String, patches: String },
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let out = match &args.cmd {
        Command::Diff {
            prev,
            next,
            indexed,
        } => {
            if prev == "-" && next == "-" {
                bail!("only one input may be read from stdin");
            }
            let options = DiffOptions { keyed: !indexed };
            debug!(%prev, %next, keyed = options.keyed, "diff");
            diff_json(&read_input(prev)?, &read_input(next)?, &options)
                .context("diff failed")?
        }
        Command::Mount { tree } => mount_json(&read_input(tree)?).context("mount failed")?,
        Command::Apply { tree, patches } => {
            if tree == "-" && patches == "-" {
                bail!("only one input may be read from stdin");
            }
            apply_json(&read_input(tree)?, &read_input(patches)?).context("apply failed")?
        }
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", render(&out, args.pretty)?)?;
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();
}
