//! Code-First Schema CLI
//!
//! Builds schema artifacts from declaration files and checks them for drift.
//!
//! Usage:
//!   codefirst-schema build
//!   codefirst-schema check
//!   codefirst-schema print --format typescript
//!   codefirst-schema --help

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use codefirst_schema::{emit, ArtifactKind, ArtifactSet, BuildConfig, Schema, SchemaBuilder};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codefirst-schema")]
#[command(about = "Build GraphQL SDL and type descriptors from code-first declarations")]
struct Cli {
    /// Config file (defaults to codefirst.toml in the working directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Declaration directory, overriding the config
    #[arg(short, long, global = true)]
    source: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the schema and write all configured artifacts
    Build {
        /// Fail without writing if the schema has warnings
        #[arg(long)]
        deny_warnings: bool,
    },

    /// Exit non-zero if artifacts on disk differ from a fresh build
    Check,

    /// Build the schema and report diagnostics without writing
    Validate,

    /// Print one artifact to stdout
    Print {
        #[arg(short, long, value_enum, default_value = "sdl")]
        format: PrintFormat,
    },

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default codefirst.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PrintFormat {
    Sdl,
    Descriptor,
    Typescript,
}

impl From<PrintFormat> for ArtifactKind {
    fn from(format: PrintFormat) -> Self {
        match format {
            PrintFormat::Sdl => ArtifactKind::Sdl,
            PrintFormat::Descriptor => ArtifactKind::Descriptor,
            PrintFormat::Typescript => ArtifactKind::TypeScript,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the command succeeded
fn run(cli: Cli) -> anyhow::Result<bool> {
    let load = || load_config(cli.config.as_deref(), cli.source.clone());

    match cli.command {
        Commands::Build { deny_warnings } => {
            let config = load()?;
            let schema = build_schema(&config)?;
            report_diagnostics(&schema, cli.verbose);

            if deny_warnings && schema.diagnostics().has_warnings() {
                eprintln!("❌ Refusing to write artifacts: schema has warnings");
                return Ok(false);
            }

            let artifacts = ArtifactSet::render(&schema, &config.output, &config.emit_options())?;
            let report = artifacts.write()?;
            println!(
                "✅ Built {} types: {} artifact(s) written, {} unchanged",
                schema.len(),
                report.written(),
                report.unchanged()
            );
            Ok(true)
        }

        Commands::Check => {
            let config = load()?;
            let schema = build_schema(&config)?;
            let artifacts = ArtifactSet::render(&schema, &config.output, &config.emit_options())?;
            let drifts = artifacts.check()?;

            if drifts.is_empty() {
                println!("✅ Artifacts are up to date");
                return Ok(true);
            }
            for drift in &drifts {
                println!("{}", drift);
            }
            eprintln!("❌ {} artifact(s) out of date, run `codefirst-schema build`", drifts.len());
            Ok(false)
        }

        Commands::Validate => {
            let config = load()?;
            let schema = build_schema(&config)?;
            report_diagnostics(&schema, true);
            println!(
                "✅ Schema is valid: {} types, {} warning(s)",
                schema.len(),
                schema.diagnostics().warning_count()
            );
            Ok(true)
        }

        Commands::Print { format } => {
            let config = load()?;
            let schema = build_schema(&config)?;
            let content = emit::emit(format.into(), &schema, &config.emit_options())?;
            print!("{}", content);
            Ok(true)
        }

        Commands::Config {
            action: ConfigAction::Show,
        } => {
            print!("{}", toml::to_string_pretty(&load()?)?);
            Ok(true)
        }

        Commands::Config {
            action: ConfigAction::Init { force },
        } => {
            let path = cli.config.clone().unwrap_or_else(|| PathBuf::from("codefirst.toml"));
            init_config(&path, force)?;
            Ok(true)
        }
    }
}

fn load_config(path: Option<&Path>, source: Option<PathBuf>) -> anyhow::Result<BuildConfig> {
    let mut config = BuildConfig::load_from(path).context("failed to load configuration")?;
    if let Some(dir) = source {
        config.source.dir = dir;
    }
    Ok(config)
}

fn build_schema(config: &BuildConfig) -> anyhow::Result<Schema> {
    let schema = SchemaBuilder::new()
        .load_dir(&config.source.dir)?
        .roots(config.schema.clone())
        .build()?;
    Ok(schema)
}

fn report_diagnostics(schema: &Schema, include_notes: bool) {
    let diagnostics = schema.diagnostics();
    if diagnostics.is_empty() {
        return;
    }
    if include_notes {
        eprintln!("{}", diagnostics.format_all());
    } else if diagnostics.has_warnings() {
        for item in diagnostics.warnings() {
            eprintln!("⚠️  {}", item);
        }
    }
}

fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    BuildConfig::default().save(path)?;
    println!("✅ Wrote {}", path.display());
    Ok(())
}
