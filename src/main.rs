//! fastrob CLI
//!
//! Slices a mesh into a robot program, compiles saved documents and writes
//! starter configuration files.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fastrob::{
    init_logging, recompute, CavalierGeometry, Compiler, Config, Document, Machine,
    PrusaSlicerEngine, Source,
};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "fastrob")]
#[command(version, about = "Additive manufacturing toolpaths for industrial robots", long_about = None)]
struct Cli {
    /// Configuration file (.toml or .json); defaults to the user config when present
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Slice a mesh and compile it into a robot program
    Run {
        /// Input mesh (.stl)
        mesh: PathBuf,
        /// Document source: engine or native
        #[arg(short, long)]
        source: Option<Source>,
        /// Target machine (KUKA, ABB)
        #[arg(short, long)]
        machine: Option<String>,
        /// Program output file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also save the post-processed document as nested-array JSON
        #[arg(long)]
        save_document: Option<PathBuf>,
    },
    /// Compile a saved document into a robot program
    Compile {
        /// Nested-array JSON document
        document: PathBuf,
        /// Target machine (KUKA, ABB)
        #[arg(short, long)]
        machine: Option<String>,
        /// Program output file; printed to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Paths carry lead-in and lead-out points
        #[arg(long)]
        lead: bool,
    },
    /// Write a configuration file with default values
    InitConfig {
        /// Destination; defaults to the user config path
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    init_logging()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            mesh,
            source,
            machine,
            output,
            save_document,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(source) = source {
                config.source = source;
            }
            if let Some(machine) = machine {
                config.compiler.machine = Machine::from_name(&machine);
            }
            if output.is_some() {
                config.compiler.output_file = output;
            }
            run(&config, &mesh, save_document.as_deref())?;
        }
        Commands::Compile {
            document,
            machine,
            output,
            lead,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(machine) = machine {
                config.compiler.machine = Machine::from_name(&machine);
            }
            compile(&config, &document, output.as_deref(), lead)?;
        }
        Commands::InitConfig { path, force } => {
            let path = match path.or(cli.config) {
                Some(path) => path,
                None => Config::default_path().context("Failed to resolve config path")?,
            };
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            Config::default()
                .save_to_file(&path)
                .with_context(|| format!("Failed to write config {}", path.display()))?;
            info!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    match Config::default_path() {
        Ok(path) if path.exists() => Config::load_from_file(&path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        _ => {
            info!("No configuration file, using defaults");
            Ok(Config::default())
        }
    }
}

fn run(config: &Config, mesh: &Path, save_document: Option<&Path>) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    let engine = PrusaSlicerEngine::new();
    let geometry = CavalierGeometry::new();
    let output = recompute(config, mesh, &engine, &geometry);

    if let Some(err) = output.error() {
        bail!("Recompute failed: {}", err);
    }

    let document = output.document();
    if let Some(path) = save_document {
        document
            .save(path)
            .with_context(|| format!("Failed to save document {}", path.display()))?;
    }

    if config.compiler.output_file.is_none() && !config.compiler.silent {
        print!("{}", output.compiled());
    }

    info!(
        "{} layers, {} paths, {} points for {}",
        document.len(),
        document.path_count(),
        document.point_count(),
        config.compiler.machine
    );
    Ok(())
}

fn compile(config: &Config, document: &Path, output: Option<&Path>, lead: bool) -> Result<()> {
    let document = Document::load(document)
        .with_context(|| format!("Failed to load document {}", document.display()))?;

    let compiler = Compiler::new(config.compiler.clone());
    let program = compiler.compile(&document, lead);

    match output {
        Some(path) => compiler
            .write_to(&program, path)
            .with_context(|| format!("Failed to write program {}", path.display()))?,
        None => print!("{}", program),
    }
    Ok(())
}
