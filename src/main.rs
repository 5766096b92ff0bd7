use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use stepwise_avl::input::{parse_keys, Key};
use stepwise_avl::{parse_script, AvlTree, Command, Playback, Snapshot, Trace, TraceConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "stepwise-avl",
    about = "AVL tree that prints every rotation, deletion and search step"
)]
struct Cli {
    /// Also record the unbalanced BST right after each insertion.
    #[arg(long, global = true)]
    preview: bool,
    /// Also record the tree before and after every operation.
    #[arg(long, global = true)]
    bookends: bool,
    /// Print only the last step of every operation.
    #[arg(long, global = true)]
    final_only: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,
    /// Debug logging on stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Insert keys in order and print the trace of each insertion.
    Insert {
        /// Integer keys.
        #[arg(required = true, allow_hyphen_values = true)]
        keys: Vec<String>,
    },
    /// Execute a command script (insert/delete/search/find/print, one per line).
    Run {
        /// Script file.
        script: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let commands = match &cli.command {
        Commands::Insert { keys } => {
            let keys = parse_keys(keys.iter().map(String::as_str))
                .context("invalid key on the command line")?;
            vec![Command::Insert(keys)]
        }
        Commands::Run { script } => {
            let source = std::fs::read_to_string(script)
                .with_context(|| format!("failed to read script {}", script.display()))?;
            parse_script(&source)
                .with_context(|| format!("failed to parse script {}", script.display()))?
        }
    };

    let config = TraceConfig::minimal()
        .with_preview(cli.preview)
        .with_bookends(cli.bookends);
    let printer = Printer {
        format: cli.format,
        final_only: cli.final_only,
    };

    let mut tree = AvlTree::with_config(config);
    for command in commands {
        info!(%command, "executing");
        execute(&mut tree, command, &printer)?;
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn execute(tree: &mut AvlTree<Key>, command: Command, printer: &Printer) -> Result<()> {
    match command {
        Command::Insert(keys) => {
            for key in keys {
                printer.trace(&tree.insert(key))?;
            }
        }
        Command::Delete(keys) => {
            for key in keys {
                printer.trace(&tree.delete(&key))?;
            }
        }
        Command::Search(keys) => {
            for key in keys {
                printer.trace(&tree.search_with_trace(&key))?;
            }
        }
        Command::Find(keys) => {
            for key in keys {
                match tree.search(&key) {
                    Some(node) => println!(
                        "find {key}: node #{} height {} balance {}",
                        node.id(),
                        node.height(),
                        node.balance_factor()
                    ),
                    None => println!("find {key}: absent"),
                }
            }
        }
        Command::Print => printer.snapshot(&tree.snapshot())?,
    }
    Ok(())
}

struct Printer {
    format: Format,
    final_only: bool,
}

impl Printer {
    fn trace(&self, trace: &Trace<Key>) -> Result<()> {
        match self.format {
            Format::Text => {
                println!("# {} -> {}", trace.operation(), trace.outcome());
                let mut playback = Playback::of(trace);
                if self.final_only {
                    playback.fast_forward();
                }
                let total = playback.len();
                let start = playback.position();
                for (offset, step) in playback.remaining().enumerate() {
                    println!("-- step {}/{}", start + offset + 1, total);
                    print!("{step}");
                }
                Ok(())
            }
            Format::Json => {
                if self.final_only {
                    print_json(&trace.last())
                } else {
                    print_json(trace)
                }
            }
        }
    }

    fn snapshot(&self, snapshot: &Snapshot<Key>) -> Result<()> {
        match self.format {
            Format::Text => {
                print!("{snapshot}");
                Ok(())
            }
            Format::Json => print_json(snapshot),
        }
    }
}

#[cfg(feature = "visualize")]
fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

#[cfg(not(feature = "visualize"))]
fn print_json<T>(_value: &T) -> Result<()> {
    anyhow::bail!("JSON output requires building with the `visualize` feature")
}
