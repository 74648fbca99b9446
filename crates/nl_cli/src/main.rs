mod runner;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use nl_ast::{LocalizeConfig, MemberOrder};
use nl_parser::parse_source;
use nl_transform::localize_source;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::runner::{discover, run_files, RunOptions};

#[derive(Parser)]
#[command(name = "nslocal", about = "nslocal: turn `Namespace.member` reads into local bindings")]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConfigArgs {
    /// JSON config file, e.g. `{"namespace": "Ember", "order": "firstSeen"}`.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Namespace identifier to localize (default: Ember).
    #[arg(long)]
    namespace: Option<String>,
    /// Property order in the declaration: `lexicographic` or `first-seen`.
    #[arg(long)]
    order: Option<MemberOrder>,
}

impl ConfigArgs {
    /// File values first, then flags on top.
    fn resolve(&self) -> Result<LocalizeConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => LocalizeConfig::default(),
        };
        if let Some(namespace) = &self.namespace {
            config.namespace = namespace.clone();
        }
        if let Some(order) = self.order {
            config.order = order;
        }
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<LocalizeConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("invalid config {}", path.display()))
}

#[derive(Subcommand)]
enum Commands {
    /// Localize every matching file under the given paths, in place.
    Run {
        /// Files or directories.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[command(flatten)]
        config: ConfigArgs,
        /// Report what would change without writing.
        #[arg(long)]
        dry: bool,
        /// Print rewritten files to stdout.
        #[arg(long)]
        print: bool,
        /// Extensions to pick up when walking directories.
        #[arg(long, value_delimiter = ',', default_value = "js,ts")]
        extensions: Vec<String>,
    },
    /// Localize one file and emit the result.
    Rewrite {
        input: PathBuf,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Parse and dump the AST.
    Parse {
        input: PathBuf,
        /// Dump as JSON instead of Debug.
        #[arg(long)]
        ast: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            paths,
            config,
            dry,
            print,
            extensions,
        } => {
            let options = RunOptions {
                config: config.resolve()?,
                dry,
                print,
                extensions,
            };
            let files = discover(&paths, &options.extensions);
            tracing::info!(
                "localizing `{}.*` in {} file(s)",
                options.config.namespace,
                files.len()
            );

            let summary = run_files(&files, &options);
            eprintln!("{summary}");
            if summary.errors > 0 {
                anyhow::bail!("{} file(s) could not be rewritten", summary.errors);
            }
        }
        Commands::Rewrite {
            input,
            output,
            config,
        } => {
            let config = config.resolve()?;
            let source = std::fs::read_to_string(&input)?;
            let filename = input.display().to_string();

            let outcome = localize_source(&source, &filename, &config)?;
            if outcome.is_unchanged() {
                tracing::info!("{filename}: nothing to localize");
            }
            let text = outcome.text_or(&source);

            match &output {
                Some(path) => std::fs::write(path, text)?,
                None => print!("{text}"),
            }
        }
        Commands::Parse { input, ast } => {
            let source = std::fs::read_to_string(&input)?;
            let filename = input.display().to_string();
            let parsed = parse_source(&source, &filename)?;

            if ast {
                let json = serde_json::to_string_pretty(&parsed.module)?;
                println!("{json}");
            } else {
                println!("{:#?}", parsed.module);
            }
        }
    }

    Ok(())
}
