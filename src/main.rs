//! Gradebook - Store Provisioning Entry Point
//!
//! Opens (and if necessary creates) the store named by `DATABASE_URL`,
//! ensures its schema and reports what it holds.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gradebook::{Config, Gradebook};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.rust_log.clone().into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Opening gradebook...");
    let book = Gradebook::connect(&config.database).await?;

    let exercises = book.count_exercises().await?;
    tracing::info!("Gradebook ready with {} exercises", exercises);

    book.close().await;
    Ok(())
}
