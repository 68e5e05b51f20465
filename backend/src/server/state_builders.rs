//! Builders that pick adapters for each port from the service settings.
//!
//! PostgreSQL backs the record store when `database_url` is set; otherwise an
//! in-memory store is used. Redis backs the read cache and event stream when
//! `redis_url` is set; otherwise caching is disabled and events are logged.

use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use tokio::task::JoinHandle;
use tracing::warn;

use user_graph::domain::ports::{
    AccountEventPublisher, FollowRepository, NoOpUserCache, UserCache, UserRepository,
};
use user_graph::domain::{AccountCoordinator, AccountPorts};
use user_graph::inbound::http::state::HttpState;
use user_graph::outbound::cache::RedisUserCache;
use user_graph::outbound::crypto::BcryptPasswordHasher;
use user_graph::outbound::events::{LoggingEventPublisher, RedisStreamPublisher};
use user_graph::outbound::memory::InMemoryAccountStore;
use user_graph::outbound::persistence::{
    DbPool, DieselFollowRepository, DieselUserRepository, run_migrations,
};
use user_graph::outbound::redis_pool::RedisPool;

use super::config::ServiceSettings;

const REDIS_POOL_MAX_SIZE: u32 = 16;

type RecordStore = (Arc<dyn UserRepository>, Arc<dyn FollowRepository>);
type SideChannels = (Arc<dyn UserCache>, Arc<dyn AccountEventPublisher>);

/// HTTP state plus any background tasks the adapters started.
pub(crate) struct AccountWiring {
    pub(crate) http_state: HttpState,
    pub(crate) appender: Option<JoinHandle<()>>,
}

async fn build_record_store(settings: &ServiceSettings) -> Result<RecordStore> {
    let Some(pool_config) = settings.pool_config() else {
        warn!("no database_url configured; accounts are kept in memory");
        let store = Arc::new(InMemoryAccountStore::new());
        return Ok((store.clone(), store));
    };

    if settings.run_migrations {
        run_migrations(pool_config.database_url())
            .await
            .wrap_err("apply schema migrations")?;
    }
    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("build PostgreSQL pool")?;
    Ok((
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselFollowRepository::new(pool)),
    ))
}

fn build_side_channels(
    settings: &ServiceSettings,
) -> Result<(SideChannels, Option<JoinHandle<()>>)> {
    let Some(url) = settings.redis_url.as_deref() else {
        warn!("no redis_url configured; cache disabled and events logged only");
        return Ok((
            (Arc::new(NoOpUserCache), Arc::new(LoggingEventPublisher)),
            None,
        ));
    };

    let pool = RedisPool::new(url, REDIS_POOL_MAX_SIZE).wrap_err("build Redis pool")?;
    let cache = RedisUserCache::new(pool.clone(), settings.cache_ttl());
    let (publisher, appender) = RedisStreamPublisher::spawn(pool, settings.stream_config());
    Ok(((Arc::new(cache), Arc::new(publisher)), Some(appender)))
}

/// Wire the coordinator behind the HTTP state.
///
/// # Errors
/// Fails when migrations, pool construction, or adapter configuration fail.
pub(crate) async fn build_account_wiring(
    settings: &ServiceSettings,
    #[cfg(feature = "metrics")] registry: &prometheus::Registry,
) -> Result<AccountWiring> {
    let hasher =
        BcryptPasswordHasher::new(settings.bcrypt_cost()).wrap_err("configure bcrypt cost")?;
    let (users, follows) = build_record_store(settings).await?;
    let ((cache, events), appender) = build_side_channels(settings)?;

    let coordinator = AccountCoordinator::new(AccountPorts {
        users,
        follows,
        cache,
        events,
        hasher: Arc::new(hasher),
    })
    .with_cache_timeout(settings.cache_timeout());

    #[cfg(feature = "metrics")]
    let coordinator = {
        use user_graph::outbound::metrics::PrometheusAccountMetrics;
        let metrics = PrometheusAccountMetrics::new(registry)
            .wrap_err("register account metrics")?;
        coordinator.with_metrics(Arc::new(metrics))
    };

    Ok(AccountWiring {
        http_state: HttpState::new(Arc::new(coordinator)),
        appender,
    })
}
