use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};

use goraph::export::{self, ExportFormat, Exporter, GraphMessage, JsonExporter};
use goraph::scanner::ScanOptions;
use goraph::{Analyzer, AnalyzerOptions};

#[derive(Parser)]
#[command(name = "goraph")]
#[command(version)]
#[command(about = "Dependency graph builder for Go projects", long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dependency graph of a project
    Analyze(AnalyzeArgs),
    /// Show version information
    Version,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Project directory; overrides --path when given
    target: Option<String>,

    /// Project directory (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    path: String,

    /// Output format: json or dot
    #[arg(short, long, default_value = "json")]
    format: ExportFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Single-line JSON
    #[arg(long)]
    compact: bool,

    /// Directory names to skip during the walk (repeatable)
    #[arg(long = "skip-dir", value_name = "NAME")]
    skip_dirs: Vec<String>,

    /// Also scan directories starting with '.' or '_'
    #[arg(long)]
    include_hidden: bool,
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

/// Picks the project directory: a positional argument wins over `--path`,
/// and an empty path means the current directory.
fn resolve_root(target: Option<&str>, path: &str) -> PathBuf {
    let chosen = target.unwrap_or(path);
    if chosen.trim().is_empty() {
        warn!("Empty project path, using current directory");
        return PathBuf::from(".");
    }
    PathBuf::from(chosen)
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Cannot create output file '{}'", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let root = resolve_root(args.target.as_deref(), &args.path);
    if !root.exists() {
        bail!("Path '{}' does not exist", root.display());
    }

    let mut scan = ScanOptions::default();
    scan.skip_dirs.extend(args.skip_dirs.iter().cloned());
    scan.include_hidden = args.include_hidden;
    let analyzer = Analyzer::new(AnalyzerOptions {
        scan,
        ..AnalyzerOptions::default()
    });

    info!("Analyzing {}", root.display());
    let result = analyzer.analyze(&root);

    let mut writer = open_output(args.output.as_deref())?;
    let json = JsonExporter {
        pretty: !args.compact,
    };
    match (result, args.format) {
        (Ok(graph), ExportFormat::Json) => json.export(&graph, &mut writer)?,
        (Ok(graph), format) => export::export(format, &graph, &mut writer)?,
        (Err(err), ExportFormat::Json) => {
            json.export_message(&GraphMessage::error(&err), &mut writer)?;
            writer.flush()?;
            return Err(err).context("Analysis failed");
        }
        (Err(err), _) => return Err(err).context("Analysis failed"),
    }
    writer.flush()?;

    if let Some(path) = &args.output {
        info!("Wrote {} graph to {}", args.format, path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    match &cli.command {
        Some(Commands::Analyze(args)) => run_analyze(args),
        Some(Commands::Version) => {
            println!("goraph v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => {
            println!("goraph - Dependency graph builder for Go projects");
            println!("Run 'goraph analyze [PATH]' to build a project's graph");
            println!("Run 'goraph --help' for more information");
            Ok(())
        }
    }
}
