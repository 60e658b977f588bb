//! PSC Graph CLI: build the company-control graph datasets and load them

use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use psc_graph::{
    CypherScriptTarget, EmbeddedTarget, LoadReport, Pipeline, PipelineConfig,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "psc-graph", version, about = "PSC company-control graph builder")]
struct Cli {
    /// YAML pipeline config; defaults apply to anything it omits
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the normalized input collections
    #[arg(long, global = true)]
    input_dir: Option<PathBuf>,

    /// Directory receiving the datasets and manifest
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Read at most this many rows from each input
    #[arg(long, global = true)]
    sample_rows: Option<usize>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, clap::ValueEnum)]
enum TargetKind {
    /// In-process graph store
    Embedded,
    /// Cypher statements written to a script file
    CypherScript,
}

#[derive(Subcommand)]
enum Commands {
    /// Read inputs, build every dataset and write them with the manifest
    Build,
    /// Build, export, then reset and load a target
    Run {
        #[arg(long, default_value = "embedded")]
        target: TargetKind,

        /// Script path for the cypher-script target
        #[arg(long, default_value = "load.cypher")]
        script: PathBuf,

        /// URL prefix the script uses to reference datasets
        #[arg(long)]
        url_base: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(dir) = &cli.input_dir {
        config.input.dir = dir.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if cli.sample_rows.is_some() {
        config.sample_rows = cli.sample_rows;
    }
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    info!(
        input = %config.input.dir.display(),
        output = %config.output_dir.display(),
        "Starting"
    );
    let pipeline = Pipeline::new(config);

    match &cli.command {
        Commands::Build => {
            let (output, manifest) = pipeline.build_and_export().context("Build failed")?;
            match cli.format {
                OutputFormat::Json => {
                    println!("{}", manifest.to_json()?);
                }
                OutputFormat::Table => {
                    let mut table = Table::new();
                    table.set_content_arrangement(ContentArrangement::Dynamic);
                    table.set_header(vec!["dataset", "kind", "rows"]);
                    for dataset in &output.datasets {
                        let kind = match dataset {
                            psc_graph::Dataset::Nodes(set) => set.label.to_string(),
                            psc_graph::Dataset::Edges(set) => set.shape.relationship.to_string(),
                        };
                        table.add_row(vec![
                            dataset.name().to_string(),
                            kind,
                            dataset.table().len().to_string(),
                        ]);
                    }
                    println!("{}", table);
                    println!(
                        "{} candidate pair(s), {} block(s) skipped",
                        output.matches.pairs, output.matches.skipped_blocks
                    );
                }
            }
        }
        Commands::Run { target, script, url_base } => match target {
            TargetKind::Embedded => {
                let target = EmbeddedTarget::new();
                let report = pipeline.run(&target).await.context("Run failed")?;
                print_report(&report, &cli.format)?;
                if let OutputFormat::Table = cli.format {
                    let stats = target.store_read().await.statistics();
                    let mut table = Table::new();
                    table.set_header(vec!["label / type", "count"]);
                    for (label, count) in &stats.nodes_by_label {
                        table.add_row(vec![label.to_string(), count.to_string()]);
                    }
                    for (edge_type, count) in &stats.edges_by_type {
                        table.add_row(vec![edge_type.to_string(), count.to_string()]);
                    }
                    println!("{}", table);
                }
            }
            TargetKind::CypherScript => {
                let mut target = CypherScriptTarget::new(script);
                if let Some(base) = url_base {
                    target = target.with_url_base(base.clone());
                }
                let report = pipeline.run(&target).await.context("Run failed")?;
                let path = target.write_script().await?;
                print_report(&report, &cli.format)?;
                info!(path = %path.display(), "Script written");
            }
        },
    }

    Ok(())
}

fn print_report(report: &LoadReport, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["dataset", "kind", "created"]);
            for load in report.nodes.iter().chain(&report.edges) {
                table.add_row(vec![
                    load.location.display().to_string(),
                    load.kind.clone(),
                    load.created.to_string(),
                ]);
            }
            println!("{}", table);
            println!(
                "Deleted {}, constraints dropped {}, created {}",
                report.deleted, report.constraints_dropped, report.constraints_created
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config_defaults() {
        let cli = Cli::parse_from([
            "psc-graph",
            "--input-dir",
            "/data/in",
            "--sample-rows",
            "10",
            "run",
            "--target",
            "cypher-script",
        ]);
        let config = load_config(&cli).unwrap();

        assert_eq!(config.input.dir, PathBuf::from("/data/in"));
        assert_eq!(config.sample_rows, Some(10));
        assert_eq!(config.output_dir, PipelineConfig::default().output_dir);
        assert!(matches!(
            cli.command,
            Commands::Run { target: TargetKind::CypherScript, .. }
        ));
    }
}
