//! Thin command-line consumer for the scouting analytics core.
//!
//! Parses flags, builds a [`scouting_core::query::StructuredQuery`],
//! dispatches it through [`scouting_core::executor::QueryExecutor`], and
//! prints the typed result as JSON. No scouting logic lives here; this
//! binary exists only so the workspace has a runnable entry point
//! (spec.md §1 lists CLI argument parsing as an external collaborator).

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use scouting_core::catalog::{self, Catalogue};
use scouting_core::config::EngineConfig;
use scouting_core::domain::PlayerId;
use scouting_core::executor::QueryExecutor;
use scouting_core::parser::{HttpLlmClient, QueryParser};
use scouting_core::query::{CohortFilters, MetricSet, StructuredQuery, Weights};
use scouting_core::store::{PgStoreGateway, StoreGateway};
use std::time::Duration;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "scouting_cli")]
#[command(about = "Query the scouting analytics core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find players similar to a reference player (spec §4.5).
    Similar {
        #[arg(long)]
        player: Uuid,
        #[arg(long)]
        season: Option<String>,
        #[arg(long)]
        league: Vec<String>,
        #[arg(long)]
        preset: Option<String>,
        #[arg(long, value_delimiter = ',')]
        metrics: Option<Vec<String>>,
        #[arg(long, default_value_t = 0.6)]
        role_weight: f64,
        #[arg(long, default_value_t = 0.4)]
        stats_weight: f64,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Rank a cohort by one named metric (spec §4.7).
    Leaderboard {
        #[arg(long)]
        metric: String,
        #[arg(long)]
        league: Vec<String>,
        #[arg(long)]
        season: Option<String>,
        #[arg(long)]
        min_minutes: Option<f64>,
        #[arg(long, default_value_t = 25)]
        limit: usize,
    },
    /// Compare two named players across a metric set (spec §4.7).
    Compare {
        #[arg(long)]
        a: Uuid,
        #[arg(long)]
        b: Uuid,
        #[arg(long)]
        season: Option<String>,
        #[arg(long, value_delimiter = ',')]
        metrics: Vec<String>,
    },
    /// Construct a cohort and optionally sort it (spec §4.7).
    Filter {
        #[arg(long)]
        league: Vec<String>,
        #[arg(long)]
        season: Option<String>,
        #[arg(long)]
        min_minutes: Option<f64>,
        #[arg(long, value_delimiter = ',')]
        metrics: Vec<String>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Translate free text into a StructuredQuery (spec §4.6). Never
    /// invents a metric, position, or league name.
    Parse {
        text: String,
        #[arg(long)]
        lenient: bool,
        /// Execute the parsed query immediately and print its result
        /// instead of just the StructuredQuery.
        #[arg(long)]
        execute: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::from_env();

    let catalogue = catalog::load_from_env().map_err(|errors| anyhow::anyhow!("catalogue invalid: {errors:?}"))?;

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let gateway = PgStoreGateway::connect(&database_url, &config.store).await.context("connecting to store")?;

    let schema = gateway.schema().await.context("fetching store schema")?;
    catalogue.validate_against_schema(&schema).context("catalogue self-check against store schema")?;

    match cli.command {
        Commands::Similar { player, season, league, preset, metrics, role_weight, stats_weight, limit } => {
            run_similar(&catalogue, &gateway, &config, player, season, league, preset, metrics, role_weight, stats_weight, limit)
                .await
        }
        Commands::Leaderboard { metric, league, season, min_minutes, limit } => {
            run_leaderboard(&catalogue, &gateway, &config, metric, league, season, min_minutes, limit).await
        }
        Commands::Compare { a, b, season, metrics } => run_compare(&catalogue, &gateway, &config, a, b, season, metrics).await,
        Commands::Filter { league, season, min_minutes, metrics, limit } => {
            run_filter(&catalogue, &gateway, &config, league, season, min_minutes, metrics, limit).await
        }
        Commands::Parse { text, lenient, execute } => run_parse(&catalogue, &gateway, &config, text, lenient, execute).await,
    }
}

fn metric_set(preset: Option<String>, metrics: Option<Vec<String>>) -> Result<MetricSet> {
    match (preset, metrics) {
        (Some(preset_id), _) => Ok(MetricSet::Preset(preset_id)),
        (None, Some(ids)) => Ok(MetricSet::Explicit(ids)),
        (None, None) => bail!("either --preset or --metrics must be given"),
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_similar(
    catalogue: &Catalogue,
    gateway: &dyn StoreGateway,
    config: &EngineConfig,
    player: Uuid,
    season: Option<String>,
    league: Vec<String>,
    preset: Option<String>,
    metrics: Option<Vec<String>>,
    role_weight: f64,
    stats_weight: f64,
    limit: usize,
) -> Result<()> {
    let cohort_filters = CohortFilters { leagues: league, season, ..Default::default() };
    let query = StructuredQuery::similarity(
        PlayerId(player),
        cohort_filters,
        metric_set(preset, metrics)?,
        Weights { role: role_weight, stats: stats_weight },
        limit,
    );
    print_executed(catalogue, gateway, config, query).await
}

async fn run_leaderboard(
    catalogue: &Catalogue,
    gateway: &dyn StoreGateway,
    config: &EngineConfig,
    metric: String,
    league: Vec<String>,
    season: Option<String>,
    min_minutes: Option<f64>,
    limit: usize,
) -> Result<()> {
    let cohort_filters = CohortFilters { leagues: league, season, min_minutes, ..Default::default() };
    let query = StructuredQuery::leaderboard(cohort_filters, MetricSet::Explicit(vec![metric]), limit);
    print_executed(catalogue, gateway, config, query).await
}

async fn run_compare(
    catalogue: &Catalogue,
    gateway: &dyn StoreGateway,
    config: &EngineConfig,
    a: Uuid,
    b: Uuid,
    season: Option<String>,
    metrics: Vec<String>,
) -> Result<()> {
    let cohort_filters = CohortFilters { season, ..Default::default() };
    let query = StructuredQuery::comparison(PlayerId(a), PlayerId(b), cohort_filters, MetricSet::Explicit(metrics));
    print_executed(catalogue, gateway, config, query).await
}

async fn run_filter(
    catalogue: &Catalogue,
    gateway: &dyn StoreGateway,
    config: &EngineConfig,
    league: Vec<String>,
    season: Option<String>,
    min_minutes: Option<f64>,
    metrics: Vec<String>,
    limit: usize,
) -> Result<()> {
    let cohort_filters = CohortFilters { leagues: league, season, min_minutes, ..Default::default() };
    let query = StructuredQuery::filter(cohort_filters, MetricSet::Explicit(metrics), limit);
    print_executed(catalogue, gateway, config, query).await
}

async fn run_parse(
    catalogue: &Catalogue,
    gateway: &dyn StoreGateway,
    config: &EngineConfig,
    text: String,
    lenient: bool,
    execute: bool,
) -> Result<()> {
    let api_base = std::env::var("OF_SCOUT_LLM_API_BASE").context("OF_SCOUT_LLM_API_BASE must be set")?;
    let api_key = std::env::var("OF_SCOUT_LLM_API_KEY").unwrap_or_default();
    let model = std::env::var("OF_SCOUT_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
    let llm = HttpLlmClient::new(api_base, api_key, model, Duration::from_millis(config.request_timeout_ms))?;

    let parser = QueryParser::new(&llm, catalogue, gateway, config.llm_temperature);

    if lenient {
        let outcome = parser.parse_lenient(&text).await?;
        if execute {
            print_executed(catalogue, gateway, config, outcome.query).await
        } else {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
    } else {
        let query = parser.parse_strict(&text).await?;
        if execute {
            print_executed(catalogue, gateway, config, query).await
        } else {
            println!("{}", serde_json::to_string_pretty(&query)?);
            Ok(())
        }
    }
}

async fn print_executed(
    catalogue: &Catalogue,
    gateway: &dyn StoreGateway,
    config: &EngineConfig,
    query: StructuredQuery,
) -> Result<()> {
    let executor = QueryExecutor::new(catalogue, gateway, config);
    match executor.execute(query).await {
        Ok(executed) => {
            println!("{}", serde_json::to_string_pretty(&executed)?);
            Ok(())
        }
        Err(errors) => {
            for error in &errors {
                eprintln!("error: {error}");
            }
            bail!("query was rejected ({} reason(s))", errors.len())
        }
    }
}
