use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use vestx_api::{AppState, RestApi};
use vestx_extract::{GeminiClient, RetryPolicy, DEFAULT_MODEL};
use vestx_outfit::{Selector, DEFAULT_CACHE_CAPACITY, RERANK_MAX_TOKENS, RERANK_TEMPERATURE};
use vestx_storage::WardrobeStore;

/// Wardrobe attribute extraction and outfit recommendation server
#[derive(Parser, Debug)]
#[command(name = "vestx")]
#[command(about = "Clothing attribute extraction and outfit recommendation", long_about = None)]
struct Args {
    /// Path to the wardrobe data directory
    #[arg(short, long, default_value = "./wardrobe")]
    data_dir: PathBuf,

    /// HTTP API port
    #[arg(long, default_value_t = 5000)]
    http_port: u16,

    /// Generative model used for extraction and re-ranking
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Disable the corrective retry on schema violations
    #[arg(long)]
    no_retry: bool,

    /// Send retry prompts without re-attaching the image
    #[arg(long)]
    retry_without_image: bool,

    /// Maximum number of cached recommendation sets
    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY)]
    cache_capacity: usize,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting vestx v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);
    info!("HTTP API port: {}", args.http_port);
    info!("Model: {}", args.model);

    let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        warn!("GEMINI_API_KEY is not set; model calls will fail until it is provided");
    }

    let store = WardrobeStore::open(&args.data_dir)?;
    info!("Wardrobe store initialized");

    let extract_client = GeminiClient::with_model(&api_key, &args.model);
    let rerank_client = GeminiClient::with_model(&api_key, &args.model)
        .generation(Some(RERANK_TEMPERATURE), Some(RERANK_MAX_TOKENS));

    let state = AppState {
        store,
        model: Arc::new(extract_client),
        selector: Arc::new(Selector::new(Arc::new(rerank_client), args.cache_capacity)),
        retry_policy: RetryPolicy {
            on_schema_violation: !args.no_retry,
            resend_image: !args.retry_without_image,
        },
    };

    info!("vestx started successfully");
    info!("HTTP API: http://localhost:{}/api/health", args.http_port);

    RestApi::start(state, args.http_port).await?;

    info!("Shutting down...");
    Ok(())
}
