//! `resquery` - list a resource collection the way a list API would.
//!
//! Reads objects from a YAML or JSON file, applies the query string and
//! prints one page of results with the total count.

mod config;
mod handlers;
mod logging;
mod resource;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use resquery::{default_list, ListResult, Object, QueryParser, Transformed};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::CliConfig;
use crate::handlers::{names_only, Kind};

/// List resources with filtering, sorting and pagination
#[derive(Parser)]
#[command(name = "resquery")]
#[command(version)]
#[command(about = "List resources with filtering, sorting and pagination")]
struct Cli {
    /// YAML or JSON file with a sequence of objects or a list document
    #[arg(short, long)]
    file: PathBuf,

    /// Query string, e.g. 'sortBy=name&ascending=true&page=1&limit=10'
    #[arg(short, long, default_value = "")]
    query: String,

    /// Resource kind, selects ordering and filters
    #[arg(short, long, value_enum, default_value_t = Kind::Generic)]
    kind: Kind,

    /// Print only item names
    #[arg(long)]
    names_only: bool,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    output: Format,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    logging::init(cli.verbose, config.log_level.as_deref());

    let mut objects = resource::load(&cli.file)?;
    let query = QueryParser::new(config.list.clone()).parse_query_string(&cli.query);
    debug!(?query, "parsed query");

    // Label selection happens on fetch, before the engine sees the objects.
    let selector = query.selector();
    if !selector.is_empty() {
        let before = objects.len();
        objects.retain(|object| {
            object
                .object_meta()
                .map_or(true, |meta| selector.matches(&meta.labels))
        });
        info!(%selector, before, after = objects.len(), "applied label selector");
    }

    let handler = cli.kind.handler();
    let mut transforms = vec![handler.transformer()];
    if cli.names_only {
        transforms.push(names_only());
    }
    let result = default_list(
        &objects,
        &query,
        Some(&handler.comparator()),
        Some(&handler.filter()),
        &transforms,
    );

    print!("{}", render(&result, cli.output)?);
    Ok(())
}

fn render<T: Serialize>(result: &ListResult<Transformed<T>>, format: Format) -> Result<String> {
    match format {
        Format::Json => {
            let mut out = serde_json::to_string_pretty(result).context("failed to encode JSON")?;
            out.push('\n');
            Ok(out)
        }
        Format::Yaml => serde_yaml::to_string(result).context("failed to encode YAML"),
    }
}
