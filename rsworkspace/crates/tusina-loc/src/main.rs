use tusina_loc::config::RECORD_SEED_PREFIX;
use tusina_loc::env::{ReadEnv, SystemEnv};
use tusina_loc::{LocConfig, serve};
use tusina_store::{LookupToken, MemoryStore};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = LocConfig::from_env(&SystemEnv);

    #[cfg(feature = "redis")]
    if let Some(url) = config.redis_url.clone() {
        let store_config = tusina_store::RedisStoreConfig::new(url)
            .with_key_prefix(config.redis_key_prefix.clone());
        let store = tusina_store::RedisStore::connect(store_config)
            .await
            .expect("Failed to connect to Redis");
        tracing::info!("Using Redis record store");
        serve(config, store).await.expect("Server failed");
        return;
    }

    #[cfg(not(feature = "redis"))]
    if config.redis_url.is_some() {
        tracing::warn!("LOC_REDIS_URL is set but this build lacks the `redis` feature; ignoring");
    }

    let store = seeded_memory_store(&SystemEnv);
    tracing::info!(records = store.len(), "Using in-memory record store");
    serve(config, store).await.expect("Server failed");
}

/// Seed from `LOC_RECORD_<token>=<raw json>` env vars. Values are stored
/// as given; they are validated at lookup time like any other record.
fn seeded_memory_store<E: ReadEnv>(env: &E) -> MemoryStore {
    let store = MemoryStore::new();
    for (suffix, raw) in env.vars_with_prefix(RECORD_SEED_PREFIX) {
        match LookupToken::new(suffix) {
            Ok(token) => {
                if let Err(e) = store.insert(&token, raw) {
                    tracing::warn!(error = %e, "Failed to seed record");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Skipping {RECORD_SEED_PREFIX}* env var with invalid token");
            }
        }
    }
    store
}
