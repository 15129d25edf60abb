//! Tribridge CLI - Command-line interface
//!
//! Usage:
//!   tribridge triples [--type neo4j|arangodb]
//!   tribridge import <path> [--type T] [--document-name N]
//!   tribridge stats [--type T]
//!
//! Connection credentials are read from the environment.

mod batch;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tribridge_core::{AppConfig, ProcessEnv, RequestOverrides};
use tribridge_graph::{GraphService, HttpBackendFactory};

#[derive(Parser)]
#[command(name = "tribridge")]
#[command(about = "Fetch and import knowledge-graph triples in Neo4j or ArangoDB")]
#[command(version)]
struct Cli {
    /// TOML config file; environment variables still override it
    #[arg(long, global = true, env = "TRIBRIDGE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every stored relationship as a deduplicated triple (JSON)
    Triples {
        /// Backend type
        #[arg(long = "type")]
        backend_type: Option<String>,
    },
    /// Import triples from a JSON file or a directory of JSON files
    Import {
        /// File or directory
        path: PathBuf,
        #[arg(long = "type")]
        backend_type: Option<String>,
        /// Source document recorded on the relationships
        #[arg(long)]
        document_name: Option<String>,
    },
    /// Print node and relationship counts
    Stats {
        #[arg(long = "type")]
        backend_type: Option<String>,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let service = GraphService::new(
        Arc::new(HttpBackendFactory::new(Duration::from_secs(
            config.graph.request_timeout_secs,
        ))),
        Arc::new(ProcessEnv),
        config.graph.default_backend,
    );

    match cli.command {
        Commands::Triples { backend_type } => {
            let set = service
                .fetch_triples(backend_type.as_deref())
                .await
                .context("Failed to fetch triples")?;
            println!("{}", serde_json::to_string_pretty(&set)?);
        }
        Commands::Import {
            path,
            backend_type,
            document_name,
        } => {
            import(&service, &path, backend_type.as_deref(), document_name.as_deref()).await?;
        }
        Commands::Stats { backend_type } => {
            let (backend, stats) = service
                .stats(backend_type.as_deref())
                .await
                .context("Failed to read graph statistics")?;
            println!("Database:      {backend}");
            println!("Nodes:         {}", stats.node_count);
            println!("Relationships: {}", stats.relationship_count);
        }
    }

    Ok(())
}

async fn import(
    service: &GraphService,
    path: &Path,
    backend_type: Option<&str>,
    document_name: Option<&str>,
) -> anyhow::Result<()> {
    let files = batch::collect_files(path)?;
    if files.is_empty() {
        println!("No JSON files found in {}", path.display());
        return Ok(());
    }

    let mut imported_files = 0usize;
    let mut failed_files = 0usize;
    let mut stored = 0usize;
    let mut submitted = 0usize;

    for file in &files {
        let result = match batch::load(file, document_name) {
            Ok(loaded) => service
                .import_triples(
                    backend_type,
                    &RequestOverrides::none(),
                    &loaded.triples,
                    Some(loaded.document_name),
                )
                .await
                .map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(summary) => {
                imported_files += 1;
                stored += summary.count;
                submitted += summary.submitted;
                println!(
                    "  ok    {} ({} of {} triples)",
                    file.display(),
                    summary.count,
                    summary.submitted
                );
            }
            Err(e) => {
                failed_files += 1;
                tracing::error!(file = %file.display(), error = %e, "Import failed");
                println!("  fail  {}: {e:#}", file.display());
            }
        }
    }

    println!();
    println!("Files imported: {imported_files}");
    println!("Files failed:   {failed_files}");
    println!("Triples stored: {stored} of {submitted} submitted");

    if failed_files > 0 {
        anyhow::bail!("{failed_files} of {} files failed to import", files.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import_command() {
        let cli = Cli::try_parse_from([
            "tribridge",
            "import",
            "chunks/",
            "--type",
            "arangodb",
            "--document-name",
            "paper.txt",
        ])
        .unwrap();

        match cli.command {
            Commands::Import {
                path,
                backend_type,
                document_name,
            } => {
                assert_eq!(path, PathBuf::from("chunks/"));
                assert_eq!(backend_type.as_deref(), Some("arangodb"));
                assert_eq!(document_name.as_deref(), Some("paper.txt"));
            }
            _ => panic!("expected import"),
        }
    }

    #[test]
    fn test_type_is_optional() {
        let cli = Cli::try_parse_from(["tribridge", "stats"]).unwrap();
        assert!(matches!(cli.command, Commands::Stats { backend_type: None }));
    }
}
