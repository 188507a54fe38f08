use anyhow::Context;
use products_backfill::{JsonFileStore, MigrationConfig, MigrationRunner};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut runner = match prepare() {
        Ok(runner) => runner,
        Err(err) => {
            tracing::error!(error = ?err, "migration aborted before start");
            return ExitCode::FAILURE;
        }
    };

    // run failures are reported by the runner itself
    match runner.run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

fn prepare() -> anyhow::Result<MigrationRunner> {
    let config = MigrationConfig::from_env().context("load migration config")?;

    let store = JsonFileStore::open(&config.store_path).with_context(|| {
        format!("initialize document store '{}'", config.store_path.display())
    })?;

    Ok(MigrationRunner::new(Arc::new(store), config)?)
}
