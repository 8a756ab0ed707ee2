//! Provisioning Generator CLI
//!
//! Command-line interface for generating provisioning libraries from
//! management-plane client models.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use provisioning_generator_catalog::StaticCatalog;
use provisioning_generator_common::{GeneratorConfig, ResourceCatalog};
use provisioning_generator_generator::{AnalysisReport, LintWarning, Specification};
use provisioning_generator_parser::parse_client_model;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "provisioning-generator")]
#[command(version, about = "Generate provisioning libraries from management-plane client models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a client model and write the generated sources
    #[command(after_help = "EXAMPLES:\n  \
        # Generate with the catalog from the config file\n  \
        provisioning-generator generate --config storage.yaml --model storage.json\n\n  \
        # Override the output root and use a catalog snapshot\n  \
        provisioning-generator generate \\\n    \
        --config storage.yaml \\\n    \
        --model storage.json \\\n    \
        --catalog providers.json \\\n    \
        --output ./out")]
    Generate {
        /// Generator configuration (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Client model document (JSON or YAML)
        #[arg(short, long)]
        model: PathBuf,

        /// Output root (overrides output.base_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Catalog snapshot (overrides the configured catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Analyze a client model and report lint warnings without writing files
    Lint {
        /// Generator configuration (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Client model document (JSON or YAML)
        #[arg(short, long)]
        model: PathBuf,

        /// Catalog snapshot (overrides the configured catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Print the parsed client model as JSON
    Inspect {
        /// Client model document (JSON or YAML)
        #[arg(short, long)]
        model: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            config,
            model,
            output,
            catalog,
        } => generate_command(&config, &model, output, catalog.as_deref(), cli.verbose),
        Commands::Lint {
            config,
            model,
            catalog,
        } => lint_command(&config, &model, catalog.as_deref(), cli.verbose),
        Commands::Inspect { model } => inspect_command(&model),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &Path, output: Option<PathBuf>) -> Result<GeneratorConfig> {
    let mut config = GeneratorConfig::load(path)
        .with_context(|| format!("Failed to load config {}", path.display()))?;
    if let Some(output) = output {
        config.output.base_dir = output;
    }
    Ok(config)
}

fn open_catalog(
    config: &GeneratorConfig,
    snapshot: Option<&Path>,
) -> Result<Box<dyn ResourceCatalog>> {
    match snapshot {
        Some(path) => {
            let catalog = StaticCatalog::load(path)
                .with_context(|| format!("Failed to load catalog {}", path.display()))?;
            Ok(Box::new(catalog))
        },
        None => provisioning_generator_catalog::from_config(&config.catalog)
            .context("Failed to open resource type catalog"),
    }
}

fn generate_command(
    config_path: &Path,
    model_path: &Path,
    output: Option<PathBuf>,
    snapshot: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let config = load_config(config_path, output)?;

    println!(
        "{} Generating {} from {}",
        "→".cyan(),
        config.specification.name.yellow(),
        model_path.display()
    );

    let source = parse_client_model(model_path)
        .with_context(|| format!("Failed to parse client model {}", model_path.display()))?;
    let catalog = open_catalog(&config, snapshot)?;

    let mut spec = Specification::new(&config);
    let report = spec
        .build(&source, catalog.as_ref())
        .context("Failed to generate specification")?;

    print_analysis(&report.analysis);
    print_lint(&report.lint);

    if report.manifest_written {
        println!("  📄 {}", spec.base_dir().join("pom.xml").display());
    }
    for path in &report.generation.written {
        if verbose {
            println!("  📄 {}", path.display());
        }
    }

    for failure in &report.generation.failures {
        eprintln!(
            "{} {}: {}",
            "✗".red(),
            failure.model.yellow(),
            failure.error
        );
    }

    if !report.generation.is_success() {
        bail!(
            "{} of {} types failed to generate",
            report.generation.failures.len(),
            report.generation.failures.len() + report.generation.written.len()
        );
    }

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!(
        "  {} files written under {}",
        report.generation.written.len(),
        spec.base_dir().display()
    );

    Ok(())
}

fn lint_command(
    config_path: &Path,
    model_path: &Path,
    snapshot: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let config = load_config(config_path, None)?;
    let source = parse_client_model(model_path)
        .with_context(|| format!("Failed to parse client model {}", model_path.display()))?;
    let catalog = open_catalog(&config, snapshot)?;

    let mut spec = Specification::new(&config);
    let analysis = spec
        .analyze(&source, catalog.as_ref())
        .context("Failed to analyze client model")?;

    if verbose {
        println!("\n{}", "Resources:".bold());
        for id in spec.resources() {
            let model = spec.registry().model(*id);
            let resource_type = spec
                .resource(*id)
                .and_then(|r| r.full_type())
                .unwrap_or_else(|| "<scoped>".to_string());
            println!("  • {} ({})", model.type_name().cyan(), resource_type);
        }
    }

    print_analysis(&analysis);
    let warnings = spec.lint();
    print_lint(&warnings);

    if warnings.is_empty() {
        println!("\n{}", "✓ No lint warnings".green().bold());
    }
    Ok(())
}

fn inspect_command(model_path: &Path) -> Result<()> {
    let source = parse_client_model(model_path)
        .with_context(|| format!("Failed to parse client model {}", model_path.display()))?;
    let json = serde_json::to_string_pretty(&source).context("Failed to serialize client model")?;
    println!("{}", json);
    Ok(())
}

fn print_analysis(report: &AnalysisReport) {
    for failure in &report.version_failures {
        eprintln!(
            "{} Versions for {} not resolved: {}",
            "⚠".yellow(),
            failure.namespace,
            failure.error
        );
    }
    for name in &report.scoped_resources {
        eprintln!("{} {} is a scoped resource", "⚠".yellow(), name);
    }
    for unresolved in &report.unresolved_resources {
        eprintln!(
            "{} {} has an unrecognized create path {}",
            "⚠".yellow(),
            unresolved.name,
            unresolved.path
        );
    }
}

fn print_lint(warnings: &[LintWarning]) {
    if warnings.is_empty() {
        return;
    }
    println!("\n{}", format!("Lint warnings ({}):", warnings.len()).bold());
    for warning in warnings {
        println!("  {} {}: {}", "⚠".yellow(), warning.model.cyan(), warning.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_arguments() {
        let cli = Cli::try_parse_from([
            "provisioning-generator",
            "generate",
            "--config",
            "storage.yaml",
            "--model",
            "storage.json",
            "--output",
            "out",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate {
                config,
                model,
                output,
                catalog,
            } => {
                assert_eq!(config, PathBuf::from("storage.yaml"));
                assert_eq!(model, PathBuf::from("storage.json"));
                assert_eq!(output, Some(PathBuf::from("out")));
                assert!(catalog.is_none());
            },
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from([
            "provisioning-generator",
            "inspect",
            "--model",
            "storage.json",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_lint_requires_config() {
        assert!(Cli::try_parse_from(["provisioning-generator", "lint", "--model", "m.json"]).is_err());
    }

    #[test]
    fn test_load_config_applies_output_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "version: 1\nspecification:\n  name: Storage\n  package: com.azure.provisioning.storage\n  provider: Microsoft.Storage\n",
        )
        .unwrap();

        let config = load_config(&path, Some(PathBuf::from("elsewhere"))).unwrap();
        assert_eq!(config.output.base_dir, PathBuf::from("elsewhere"));
    }
}
