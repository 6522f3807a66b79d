use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use titledoctor_core::bus::EventBus;
use titledoctor_core::config::StoreBackend;
use titledoctor_core::email::{Mailer, ResendMailer};
use titledoctor_core::job::{InMemoryJobStore, JobStore, SqliteJobStore};
use titledoctor_core::pipeline::{
    FetchVideosStep, GenerateTitlesStep, PipelineRunner, ResolveChannelStep, SendEmailStep,
    Submitter,
};
use titledoctor_core::titles::{OpenAiClient, TitleOptimizer, MAX_TITLES};
use titledoctor_core::youtube::{VideoPlatform, YouTubeDataApi};
use titledoctor_core::{load_config, validate_config};

use titledoctor_server::api::create_router;
use titledoctor_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("TITLEDOCTOR_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");

    // Create the job store
    let job_store: Arc<dyn JobStore> = match config.database.backend {
        StoreBackend::Memory => {
            info!("Using in-memory job store");
            Arc::new(InMemoryJobStore::new())
        }
        StoreBackend::Sqlite => {
            info!("Using SQLite job store at {:?}", config.database.path);
            Arc::new(
                SqliteJobStore::new(&config.database.path)
                    .context("Failed to create job store")?,
            )
        }
    };

    // Create the video platform client if configured
    let platform: Option<Arc<dyn VideoPlatform>> = match &config.youtube {
        Some(youtube_config) => {
            info!("Initializing YouTube Data API client");
            Some(Arc::new(YouTubeDataApi::new(youtube_config.clone())))
        }
        None => {
            info!("No YouTube credentials configured, channel resolution will fail");
            None
        }
    };
    let max_videos = config
        .youtube
        .as_ref()
        .map(|y| y.max_videos)
        .unwrap_or(MAX_TITLES as u8);

    // Create the title optimizer if configured
    let optimizer: Option<Arc<TitleOptimizer>> = match &config.llm {
        Some(llm_config) => {
            info!("Initializing LLM client ({})", llm_config.model);
            let client = Arc::new(OpenAiClient::new(llm_config.clone()));
            Some(Arc::new(TitleOptimizer::new(
                client,
                llm_config.max_tokens,
                llm_config.temperature,
            )))
        }
        None => {
            info!("No LLM credentials configured, title generation will fail");
            None
        }
    };

    // Create the mailer if configured
    let mailer: Option<Arc<dyn Mailer>> = match &config.email {
        Some(email_config) => {
            info!("Initializing Resend mailer ({})", email_config.from_address);
            Some(Arc::new(ResendMailer::new(email_config.clone())))
        }
        None => {
            info!("No email credentials configured, report delivery will fail");
            None
        }
    };

    // Wire the pipeline
    let bus = Arc::new(EventBus::new());
    let runner = PipelineRunner::new(Arc::clone(&job_store), Arc::clone(&bus))
        .with_step(Arc::new(ResolveChannelStep::new(
            Arc::clone(&job_store),
            platform.clone(),
        )))
        .with_step(Arc::new(FetchVideosStep::new(
            Arc::clone(&job_store),
            platform,
            max_videos,
        )))
        .with_step(Arc::new(GenerateTitlesStep::new(
            Arc::clone(&job_store),
            optimizer,
        )))
        .with_step(Arc::new(SendEmailStep::new(Arc::clone(&job_store), mailer)));

    runner
        .start()
        .map_err(|e| anyhow::anyhow!("Failed to start pipeline runner: {}", e))?;
    info!("Pipeline runner started");

    let submitter = Submitter::new(Arc::clone(&job_store), Arc::clone(&bus));

    // Create app state and router
    let app_state = Arc::new(AppState::new(config.clone(), job_store, submitter));
    let app = create_router(app_state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    runner.stop();

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
