mod api;
mod server;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use api::{ApiBatchRequest, ApiScoreRequest, ApiScoredItem};
use engagement_scoring::{
    batch, format_float, format_number, CommentRecord, EngagementConfig, EngagementEngine,
    RawEngagementCounts, ScoreCalculator, ScoreResult, TrendingOptions,
};

#[derive(Parser)]
#[command(name = "engagement-scoring", about = "Engagement scoring engine")]
struct Cli {
    /// TOML config file (defaults to ENGAGEMENT_CONFIG_PATH or config/engagement.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Preset to apply on top of the loaded config
    #[arg(long, global = true)]
    algorithm: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Score(ScoreArgs),
    Batch(FileArgs),
    Metrics(FileArgs),
    Trending(TrendingArgs),
    Config(ConfigArgs),
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
struct ScoreArgs {
    #[arg(long, default_value_t = 0)]
    likes: i64,
    #[arg(long, default_value_t = 0)]
    dislikes: i64,
    #[arg(long, default_value_t = 0)]
    agrees: i64,
    #[arg(long, default_value_t = 0)]
    disagrees: i64,
    #[arg(long, default_value_t = 0)]
    comments: i64,
    #[arg(long, default_value_t = 0)]
    shares: i64,
    #[arg(long, default_value_t = 0)]
    views: i64,
    #[arg(long, default_value_t = 0)]
    community_notes: i64,
    #[arg(long, default_value_t = 0)]
    reports: i64,
    #[arg(long, default_value_t = 0.0)]
    age_hours: f64,
    #[arg(long)]
    reputation: Option<f64>,
    #[arg(long)]
    details: bool,
}

#[derive(Args, Debug, Clone)]
struct FileArgs {
    /// JSON file with an array of items
    path: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct TrendingArgs {
    /// JSON file with an array of comments
    path: PathBuf,
    #[arg(long, default_value_t = 24.0)]
    window_hours: f64,
    #[arg(long)]
    min_score: Option<f64>,
    #[arg(long, default_value_t = 10)]
    limit: usize,
}

#[derive(Args, Debug, Clone)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigAction {
    Show,
    Preset {
        name: String,
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8787)]
    port: u16,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let (config, _) = EngagementConfig::load(cli.config).map_err(|err| err.to_string())?;
    let engine = EngagementEngine::new(config);
    if let Some(name) = cli.algorithm.as_deref() {
        engine
            .apply_preset_named(name)
            .map_err(|err| err.to_string())?;
    }

    match cli.command {
        Command::Score(args) => run_score(&engine, args),
        Command::Batch(args) => run_batch(&engine, &args.path),
        Command::Metrics(args) => run_metrics(&engine, &args.path),
        Command::Trending(args) => run_trending(&engine, args),
        Command::Config(args) => run_config(&engine, args.action),
        Command::Serve(args) => server::serve(args, engine).await,
    }
}

fn run_score(engine: &EngagementEngine, args: ScoreArgs) -> Result<(), String> {
    if !args.age_hours.is_finite() || args.age_hours < 0.0 {
        return Err(format!("invalid age (hours): {}", args.age_hours));
    }

    let request = ApiScoreRequest {
        id: None,
        metrics: RawEngagementCounts {
            likes: args.likes,
            dislikes: args.dislikes,
            agrees: args.agrees,
            disagrees: args.disagrees,
            comments: args.comments,
            shares: args.shares,
            views: args.views,
            community_notes: args.community_notes,
            reports: args.reports,
            comment_engagement: None,
            share_metrics: None,
        },
        created_at: None,
        age_hours: Some(args.age_hours),
        author_reputation: args.reputation,
        comments: None,
        shares: None,
    };
    let now = Utc::now();
    let config = engine.snapshot();
    let item = request.into_item(&config, now)?;
    let result = ScoreCalculator::new(&config).score(
        &item.metrics,
        item.created_at,
        now,
        item.author_reputation,
    );

    print_score(&result, args.details);
    Ok(())
}

fn print_score(result: &ScoreResult, details: bool) {
    let breakdown = &result.breakdown;
    println!(
        "Score: {} ({})",
        format_float(result.score, 2),
        result.algorithm
    );
    println!(
        "Weighted sum: {} | age {}h",
        format_float(breakdown.weighted_sum, 2),
        format_float(breakdown.age_hours, 1)
    );
    if let Some(decay) = breakdown.time_decay {
        println!("Time decay: x{}", format_float(decay, 3));
    }
    if let Some(bonus) = breakdown.new_content_bonus {
        println!("New content bonus: +{}", format_float(bonus, 2));
    }
    if let Some(controversy) = breakdown.controversy {
        println!(
            "Controversy: divisiveness {} | controversial {} | x{}",
            format_float(controversy.divisiveness, 2),
            controversy.controversial,
            format_float(controversy.multiplier, 2)
        );
    }
    if let Some(quality) = breakdown.quality {
        println!(
            "Quality: ratio {} | x{}",
            format_float(quality.ratio, 2),
            format_float(quality.multiplier, 2)
        );
    }
    if let Some(reputation) = breakdown.reputation {
        println!(
            "Author reputation: {} x {} = +{}",
            format_float(reputation.reputation, 2),
            format_float(reputation.weight, 2),
            format_float(reputation.contribution, 2)
        );
    }

    if details {
        println!("\nTerms:");
        for term in &breakdown.terms {
            println!(
                "  {}: {} x {} = {}",
                term.name,
                format_number(term.value),
                format_float(term.weight, 3),
                format_float(term.contribution, 2)
            );
        }
    }
}

fn run_batch(engine: &EngagementEngine, path: &Path) -> Result<(), String> {
    let now = Utc::now();
    let config = engine.snapshot();
    let (ids, items) = read_batch(path)?.into_items(&config, now)?;
    let results = batch::batch_calculate_scores(&config, &items, now);
    print_json(&ApiScoredItem::zip(ids, results))
}

fn run_metrics(engine: &EngagementEngine, path: &Path) -> Result<(), String> {
    let now = Utc::now();
    let config = engine.snapshot();
    let (_, items) = read_batch(path)?.into_items(&config, now)?;
    print_json(&batch::algorithm_metrics(&config, &items, now))
}

fn run_trending(engine: &EngagementEngine, args: TrendingArgs) -> Result<(), String> {
    let comments: Vec<CommentRecord> = read_json(&args.path)?;
    let options = TrendingOptions {
        time_window_hours: args.window_hours,
        min_score: args.min_score,
        limit: args.limit,
    };
    print_json(&engine.find_trending_comments(&comments, &options))
}

fn run_config(engine: &EngagementEngine, action: ConfigAction) -> Result<(), String> {
    match action {
        ConfigAction::Show => {}
        ConfigAction::Preset { name, write } => {
            engine
                .apply_preset_named(&name)
                .map_err(|err| err.to_string())?;
            if let Some(path) = write {
                engine
                    .get_config()
                    .write(&path)
                    .map_err(|err| err.to_string())?;
                println!("Wrote {} preset to {}", name, path.display());
                return Ok(());
            }
        }
    }

    let payload = toml::to_string_pretty(&engine.get_config())
        .map_err(|err| format!("failed to serialize config: {}", err))?;
    println!("{}", payload);
    Ok(())
}

fn read_batch(path: &Path) -> Result<ApiBatchRequest, String> {
    let items: Vec<ApiScoreRequest> = read_json(path)?;
    Ok(ApiBatchRequest { items })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let data = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {}", path.display(), err))?;
    serde_json::from_str(&data).map_err(|err| format!("failed to parse {}: {}", path.display(), err))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| format!("failed to serialize output: {}", err))?;
    println!("{}", payload);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("engagement_scoring=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
