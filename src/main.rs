//! twig CLI - Command line interface for the twig object store
//!
//! Provides git-style plumbing commands over a repository directory.
//! Text output mirrors git; `--format json` emits one JSON document per call.

use clap::{ArgGroup, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use twig::{Config, ObjectKind, Repository, Tree, TreeItem};

#[derive(Parser)]
#[command(name = "twig")]
#[command(about = "A minimal content-addressed object store with git-compatible objects")]
#[command(version)]
struct Cli {
    /// Path to the repository root
    #[arg(short = 'C', long = "repo", default_value = ".")]
    repo: PathBuf,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty repository
    Init,

    /// Compute the blob hash of a file, optionally storing it
    HashObject {
        /// The file to hash
        file: PathBuf,
        /// Write the blob into the object store
        #[arg(short)]
        w: bool,
    },

    /// Show an object's content, type or size
    #[command(group(ArgGroup::new("mode").required(true).args(["pretty", "show_type", "size"])))]
    CatFile {
        /// Pretty-print the object's content
        #[arg(short = 'p')]
        pretty: bool,
        /// Show the object's type
        #[arg(short = 't')]
        show_type: bool,
        /// Show the object's size
        #[arg(short = 's')]
        size: bool,
        /// The object hash (40 hex chars)
        hash: String,
    },

    /// List the contents of a tree object
    LsTree {
        /// The tree hash (40 hex chars)
        hash: String,
        /// List only names
        #[arg(long)]
        name_only: bool,
        /// Recurse into sub-trees
        #[arg(short)]
        r: bool,
    },

    /// Snapshot the repository root as a tree object
    WriteTree,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;

    match cli.command {
        Commands::Init => {
            let repo = Repository::init(&cli.repo, config)?;
            let git_dir = repo.git_dir().display().to_string();
            match cli.format {
                OutputFormat::Text => {
                    println!("Initialized empty twig repository in {}", git_dir)
                }
                OutputFormat::Json => output(&serde_json::json!({
                    "status": "ok",
                    "path": git_dir
                }))?,
            }
        }

        Commands::HashObject { file, w } => {
            // Hashing without -w does not require a repository
            let hash = if w {
                open_repo(&cli.repo, config)?.store_blob(&file)?
            } else {
                twig::hash_file(&file)?
            };
            match cli.format {
                OutputFormat::Text => println!("{}", hash),
                OutputFormat::Json => output(&serde_json::json!({
                    "hash": hash.to_hex(),
                    "written": w
                }))?,
            }
        }

        Commands::CatFile {
            pretty,
            show_type,
            size,
            hash,
        } => {
            let repo = open_repo(&cli.repo, config)?;
            let object = repo.read_object(&hash)?;

            if show_type {
                match cli.format {
                    OutputFormat::Text => println!("{}", object.kind),
                    OutputFormat::Json => output(&serde_json::json!({ "type": object.kind.as_str() }))?,
                }
            } else if size {
                match cli.format {
                    OutputFormat::Text => println!("{}", object.size()),
                    OutputFormat::Json => output(&serde_json::json!({ "size": object.size() }))?,
                }
            } else if pretty {
                match (object.kind, cli.format) {
                    (ObjectKind::Blob, OutputFormat::Text) => {
                        let mut stdout = std::io::stdout().lock();
                        stdout.write_all(&object.data)?;
                        stdout.flush()?;
                    }
                    (ObjectKind::Blob, OutputFormat::Json) => output(&serde_json::json!({
                        "type": "blob",
                        "size": object.size(),
                        "content": String::from_utf8_lossy(&object.data)
                    }))?,
                    (ObjectKind::Tree, format) => {
                        let tree = Tree::decode(&object.data)?;
                        match format {
                            OutputFormat::Text => {
                                for entry in tree.entries() {
                                    println!("{}", entry);
                                }
                            }
                            OutputFormat::Json => output(&serde_json::json!({
                                "type": "tree",
                                "entries": tree.entries()
                            }))?,
                        }
                    }
                }
            }
        }

        Commands::LsTree { hash, name_only, r } => {
            let repo = open_repo(&cli.repo, config)?;

            if r {
                let files = repo.list_tree_recursive(&hash)?;
                match cli.format {
                    OutputFormat::Text => {
                        for (path, entry) in &files {
                            if name_only {
                                println!("{}", path);
                            } else {
                                println!(
                                    "{} {} {}\t{}",
                                    entry.mode,
                                    entry.mode.object_type(),
                                    entry.hash,
                                    path
                                );
                            }
                        }
                    }
                    OutputFormat::Json => {
                        let items: Vec<_> = files
                            .iter()
                            .map(|(path, entry)| {
                                if name_only {
                                    serde_json::json!(path)
                                } else {
                                    serde_json::json!({
                                        "mode": entry.mode,
                                        "name": path,
                                        "hash": entry.hash
                                    })
                                }
                            })
                            .collect();
                        output(&serde_json::json!({
                            "count": items.len(),
                            "entries": items
                        }))?;
                    }
                }
            } else {
                let items = repo.list_tree(&hash, name_only)?;
                match cli.format {
                    OutputFormat::Text => {
                        for item in &items {
                            match item {
                                TreeItem::Entry(entry) => println!("{}", entry),
                                TreeItem::Name(name) => println!("{}", name),
                            }
                        }
                    }
                    OutputFormat::Json => output(&serde_json::json!({
                        "count": items.len(),
                        "entries": items
                    }))?,
                }
            }
        }

        Commands::WriteTree => {
            let repo = open_repo(&cli.repo, config)?;
            let hash = repo.write_tree()?;
            match cli.format {
                OutputFormat::Text => println!("{}", hash),
                OutputFormat::Json => output(&serde_json::json!({ "hash": hash.to_hex() }))?,
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_repo(path: &Path, config: Config) -> anyhow::Result<Repository> {
    let repo = Repository::open(path, config)?;
    Ok(repo)
}

fn output(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
