use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::{
    config::Config,
    media::MediaStore,
    session::SessionStore,
    store::{MemoryStore, RedisStore, Store},
};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub media: MediaStore,
    pub sessions: SessionStore,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Arc<Self>> {
        let store: Arc<dyn Store> = match &config.redis_url {
            Some(url) => {
                info!("Connecting to Redis...");
                let store = RedisStore::connect(url)
                    .await
                    .context("Failed to connect to Redis")?;
                Arc::new(store)
            }
            None => {
                warn!("REDIS_URL not set, records will not survive a restart");
                Arc::new(MemoryStore::default())
            }
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Arc<Self> {
        let media = MediaStore::new(config.media_root.clone());
        let sessions = SessionStore::new(config.session_ttl);

        Arc::new(Self {
            config,
            store,
            media,
            sessions,
        })
    }
}
