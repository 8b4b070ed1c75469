use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use playbook_gateway::{FeedbackLog, ToolContext, ToolManager, serve};
use playbook_knowledge::KnowledgeEngine;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration first so the configured level applies to tracing
    let config = playbook_core::Config::load()?;

    // Initialize tracing (stderr only; stdout carries responses)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_level().into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = config.knowledge_settings();
    info!(
        "Configuration loaded (document: {})",
        settings.document_path.display()
    );

    let engine = KnowledgeEngine::open(settings).inspect_err(|e| {
        error!("Failed to open playbook: {}", e);
    })?;

    let sections = engine.invalidate_and_rebuild().await;
    if sections == 0 {
        warn!("Playbook indexed no sections; searches will return nothing");
    } else {
        info!("Successfully indexed {} sections from playbook", sections);
    }

    let context = ToolContext::new(engine, FeedbackLog::new(config.feedback_log_path()));
    let manager = ToolManager::new();

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    serve(&manager, &context, stdin, tokio::io::stdout()).await?;

    info!("Input closed, shutting down");
    Ok(())
}
