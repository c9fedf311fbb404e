//! Probe command - round-trips a value through the configured store

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Namespace to write into
    #[arg(long, default_value = "probe")]
    pub namespace: String,

    /// Key of the probe entry
    #[arg(long, default_value = "probe")]
    pub key: String,

    /// JSON value to store
    #[arg(long, default_value = "\"ok\"")]
    pub value: String,
}

/// Run the probe against the configured backing store
pub async fn run(args: ProbeArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging)?;

    let value: serde_json::Value = serde_json::from_str(&args.value)
        .map_err(|e| anyhow::anyhow!("--value must be JSON: {}", e))?;

    let manager = crate::create_cache_manager(&config).await?;
    let cache = manager.get_cache(&args.namespace);
    let key = Some(args.key.as_str());

    cache.put(key, Some(&value)).await?;
    info!(namespace = %args.namespace, key = %args.key, "Stored probe value");

    let cached = cache.get::<serde_json::Value>(key).await?;
    let round_tripped = cached.and_then(|c| c.into_inner());

    if round_tripped.as_ref() != Some(&value) {
        anyhow::bail!(
            "probe value did not round-trip: stored {}, read {:?}",
            value,
            round_tripped
        );
    }
    info!(namespace = %args.namespace, key = %args.key, "Read probe value back");

    cache.evict(key).await?;

    if cache.get::<serde_json::Value>(key).await?.is_some() {
        anyhow::bail!("probe entry still present after eviction");
    }
    info!(namespace = %args.namespace, key = %args.key, "Evicted probe value");

    println!("ok");
    Ok(())
}
