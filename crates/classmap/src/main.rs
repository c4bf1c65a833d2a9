use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use classmap_core::classifier::LibraryClassifier;
use classmap_core::config::Config;
use classmap_core::graph::TypeGraph;
use classmap_core::model::NamespaceId;
use classmap_core::walker::discover;
use classmap_manifest::Manifest;
use classmap_report::publish::RenderError;
use classmap_report::{dot, publish};

#[derive(Parser)]
#[command(name = "classmap")]
#[command(about = "Map and render a library's class hierarchy from a reflection manifest")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit the inheritance graph as Graphviz DOT text
    Dot {
        /// Path to the reflection manifest (JSON)
        manifest: PathBuf,
        /// Start traversal from this namespace instead of the manifest root
        #[arg(long)]
        root: Option<String>,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render the graph into a document and open it in a viewer
    Render {
        /// Path to the reflection manifest (JSON)
        manifest: PathBuf,
        /// Start traversal from this namespace instead of the manifest root
        #[arg(long)]
        root: Option<String>,
        /// Config file path (defaults to classmap.toml in the working directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Skip invoking the viewer on the produced document
        #[arg(long)]
        no_open: bool,
    },
    /// Print discovery statistics for a manifest
    Stats {
        /// Path to the reflection manifest (JSON)
        manifest: PathBuf,
        /// Start traversal from this namespace instead of the manifest root
        #[arg(long)]
        root: Option<String>,
        #[arg(long, value_enum, default_value = "text")]
        format: StatsFormat,
    },
    /// Create a default classmap.toml configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StatsFormat {
    Text,
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Dot {
            manifest,
            root,
            output,
        } => cmd_dot(&manifest, root.as_deref(), output.as_deref()),
        Commands::Render {
            manifest,
            root,
            config,
            no_open,
        } => cmd_render(&manifest, root.as_deref(), config.as_deref(), !no_open),
        Commands::Stats {
            manifest,
            root,
            format,
        } => cmd_stats(&manifest, root.as_deref(), format),
        Commands::Init { force } => cmd_init(force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(2);
    }
}

fn cmd_dot(manifest_path: &Path, root: Option<&str>, output: Option<&Path>) -> Result<()> {
    let text = build_dot(manifest_path, root)?;
    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{text}"),
    }
    Ok(())
}

fn cmd_render(
    manifest_path: &Path,
    root: Option<&str>,
    config_path: Option<&Path>,
    open: bool,
) -> Result<()> {
    let config = match config_path {
        Some(p) => Config::load(p)?,
        None => Config::load_or_default(Path::new(".")),
    };
    let text = build_dot(manifest_path, root)?;
    match publish::publish(&text, &config.render, open) {
        Ok(document) => {
            debug!(document = %document.display(), "published document");
            println!("{}", document.display());
            Ok(())
        }
        // The document exists even when the viewer fails; report it before
        // surfacing the error.
        Err(RenderError::ViewFailure {
            program,
            reason,
            document,
        }) => {
            println!("{}", document.display());
            anyhow::bail!("viewer `{program}` failed: {reason}");
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_stats(manifest_path: &Path, root: Option<&str>, format: StatsFormat) -> Result<()> {
    let manifest = load_manifest(manifest_path)?;
    let root_ns = resolve_root(&manifest, root)?;
    let classifier = LibraryClassifier::new(&manifest.library);
    let discovered = discover(&manifest.arena, root_ns, &classifier)?;
    let graph = TypeGraph::build(&manifest.arena, &discovered);

    match format {
        StatsFormat::Text => {
            println!("{} {}", "Library:".bold(), manifest.library);
            println!("  Namespaces in manifest: {}", manifest.arena.namespace_count());
            println!("  Types discovered:       {}", graph.node_count());
            println!("  Inheritance edges:      {}", graph.edge_count());
        }
        StatsFormat::Json => {
            let value = serde_json::json!({
                "library": manifest.library,
                "namespace_count": manifest.arena.namespace_count(),
                "type_count": graph.node_count(),
                "edge_count": graph.edge_count(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let target = PathBuf::from("classmap.toml");
    if target.exists() && !force {
        anyhow::bail!("classmap.toml already exists. Use --force to overwrite.");
    }
    std::fs::write(&target, Config::default_toml())?;
    println!("Created classmap.toml with default configuration.");
    Ok(())
}

fn build_dot(manifest_path: &Path, root: Option<&str>) -> Result<String> {
    let manifest = load_manifest(manifest_path)?;
    let root_ns = resolve_root(&manifest, root)?;
    let classifier = LibraryClassifier::new(&manifest.library);
    let discovered = discover(&manifest.arena, root_ns, &classifier)?;
    let graph = TypeGraph::build(&manifest.arena, &discovered);
    debug!(
        library = %manifest.library,
        types = graph.node_count(),
        edges = graph.edge_count(),
        "built inheritance graph"
    );
    Ok(dot::render(&graph))
}

fn load_manifest(path: &Path) -> Result<Manifest> {
    Manifest::load(path).with_context(|| format!("failed to load manifest {}", path.display()))
}

fn resolve_root(manifest: &Manifest, root: Option<&str>) -> Result<NamespaceId> {
    match root {
        Some(name) => manifest
            .arena
            .find_namespace(name)
            .with_context(|| format!("namespace `{name}` not found in manifest")),
        None => Ok(manifest.root),
    }
}
