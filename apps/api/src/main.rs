mod claims;
mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
mod storage;
mod summary;

use anyhow::Result;
use aws_config::{timeout::TimeoutConfig, BehaviorVersion, Region, SdkConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, InvokeStyle};
use crate::llm_client::{ConverseGenerator, InvokeGenerator, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{DynamoDbClaimStore, S3NotesStore};
use crate::summary::SummaryService;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; invalid values abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Claim Status API v{}", env!("CARGO_PKG_VERSION"));

    let aws = load_aws_config(&config).await;

    // DynamoDB claim records
    let claims = DynamoDbClaimStore::new(aws_sdk_dynamodb::Client::new(&aws), &config.claims_table);
    info!("DynamoDB client initialized (table: {})", config.claims_table);

    // S3 claim notes
    let notes = S3NotesStore::new(build_s3_client(&aws, &config));
    info!("S3 client initialized (bucket: {})", config.notes_bucket);

    // Bedrock generation endpoint
    let bedrock = aws_sdk_bedrockruntime::Client::new(&aws);
    let generator: Arc<dyn TextGenerator> = match config.bedrock_invoke_style {
        InvokeStyle::Converse => Arc::new(ConverseGenerator::new(bedrock)),
        InvokeStyle::Invoke => Arc::new(InvokeGenerator::new(bedrock)),
    };
    let summarizer = SummaryService::from_config(generator, &config);
    info!(
        "Bedrock client initialized (style: {:?}, target: {})",
        config.bedrock_invoke_style,
        summarizer.target()
    );

    // Build app state
    let state = AppState {
        claims: Arc::new(claims),
        notes: Arc::new(notes),
        summarizer: Arc::new(summarizer),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared AWS configuration: default credential chain, optional region and endpoint
/// override (LocalStack), and an operation timeout applied to every AWS call.
async fn load_aws_config(config: &Config) -> SdkConfig {
    let timeouts = TimeoutConfig::builder()
        .operation_timeout(config.aws_timeout)
        .build();

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).timeout_config(timeouts);
    if let Some(region) = &config.aws_region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(endpoint) = &config.aws_endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }
    loader.load().await
}

/// S3 needs path-style addressing when pointed at a local endpoint.
fn build_s3_client(aws: &SdkConfig, config: &Config) -> aws_sdk_s3::Client {
    let s3_config = aws_sdk_s3::config::Builder::from(aws)
        .force_path_style(config.aws_endpoint_url.is_some())
        .build();
    aws_sdk_s3::Client::from_conf(s3_config)
}
