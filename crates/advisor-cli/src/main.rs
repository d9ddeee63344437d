mod scan;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use advisor_analyze::{validate_code, HeuristicAnalyzer};
use advisor_assist::Assistant;
use advisor_core::{load_config, AdvisorConfig, Category};
use advisor_store::KnowledgeStore;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

// ── CLI Definition ──

#[derive(Parser)]
#[command(name = "advisor", about = "Offline knowledge search and code advisor")]
struct Cli {
    /// Path to the advisor config file
    #[arg(long, global = true, default_value = "advisor.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the knowledge base
    Search {
        query: String,
        /// Maximum number of results (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List entries related to an entry
    Related {
        id: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List knowledge entries
    Entries {
        /// pattern, solution, example or note
        #[arg(long)]
        category: Option<Category>,
        /// Tag substring
        #[arg(long)]
        tag: Option<String>,
    },
    /// Suggestions for a project directory and the file being edited
    Suggest {
        /// Project root to scan
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// File currently being edited
        #[arg(long)]
        current_file: Option<String>,
    },
    /// Analyze a source file (reads stdin when no file is given)
    Analyze {
        file: Option<PathBuf>,
        /// Free-form context for the analysis
        #[arg(long)]
        context: Option<String>,
        /// Report complexity, line count and a related knowledge entry
        #[arg(long)]
        detailed: bool,
    },
    /// Ask a question answered from the knowledge base
    Chat { message: String },
    /// Serve the knowledge base and analyzer over MCP on stdio
    Mcp,
}

// ── Helpers ──

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("serializing output")?
    );
    Ok(())
}

fn read_code(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading source file: {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading code from stdin")?;
            Ok(buf)
        }
    }
}

fn build_assistant(config: &AdvisorConfig) -> Assistant {
    let store = if config.knowledge.seed {
        KnowledgeStore::with_seed()
    } else {
        KnowledgeStore::empty()
    };
    Assistant::offline(store, HeuristicAnalyzer::new(&config.analyzer))
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.config)
        .with_context(|| format!("loading config: {}", cli.config.display()))?;
    let assistant = build_assistant(&config);
    let store = assistant.store();

    match cli.command {
        Commands::Search { query, limit } => {
            let limit = limit.unwrap_or(config.search.max_results);
            print_json(&store.search(&query, limit))
        }
        Commands::Related { id, limit } => {
            let limit = limit.unwrap_or(config.related.max_results);
            print_json(&store.related_entries(&id, limit))
        }
        Commands::Entries { category, tag } => {
            let mut entries = match category {
                Some(c) => store.entries_by_category(c),
                None => store.all_entries(),
            };
            if let Some(tag) = tag {
                let tagged: Vec<String> =
                    store.entries_by_tag(&tag).into_iter().map(|e| e.id).collect();
                entries.retain(|e| tagged.contains(&e.id));
            }
            print_json(&entries)
        }
        Commands::Suggest { dir, current_file } => {
            let ctx = scan::scan_directory(&dir, current_file)?;
            print_json(&store.contextual_suggestions(&ctx))
        }
        Commands::Analyze {
            file,
            context,
            detailed,
        } => {
            let code = read_code(file.as_deref())?;
            let result = if detailed {
                assistant.analyze_code(&code, context.as_deref())?
            } else {
                validate_code(&code)?;
                assistant.analyzer().analyze(&code, context.as_deref())
            };
            print_json(&result)
        }
        Commands::Chat { message } => {
            println!("{}", assistant.chat(&message)?);
            Ok(())
        }
        Commands::Mcp => {
            let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
            runtime.block_on(advisor_mcp::run_mcp_server(assistant, config))
        }
    }
}

// ── Main ──

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

// ── Tests ──
