//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use comanda_core::Product;

use crate::config::ServerConfig;
use crate::services::storage::StorageClient;
use crate::sync::OrderFeed;

/// Menu cache capacity (distinct search strings).
const MENU_CACHE_CAPACITY: u64 = 1000;

/// Menu cache TTL (5 minutes).
const MENU_CACHE_TTL: Duration = Duration::from_secs(300);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    storage: StorageClient,
    feed: OrderFeed,
    // Keyed by normalized search text; "" is the full menu.
    menu_cache: Cache<String, Vec<Product>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        let storage = StorageClient::new(config.storage.clone());
        let menu_cache = Cache::builder()
            .max_capacity(MENU_CACHE_CAPACITY)
            .time_to_live(MENU_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                storage,
                feed: OrderFeed::new(),
                menu_cache,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the blob storage client.
    #[must_use]
    pub fn storage(&self) -> &StorageClient {
        &self.inner.storage
    }

    /// Get a reference to the order change feed.
    #[must_use]
    pub fn feed(&self) -> &OrderFeed {
        &self.inner.feed
    }

    /// Get a reference to the menu cache.
    #[must_use]
    pub fn menu_cache(&self) -> &Cache<String, Vec<Product>> {
        &self.inner.menu_cache
    }
}
