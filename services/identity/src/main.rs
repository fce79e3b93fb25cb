use sea_orm::Database;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use aula_identity::config::{IdentityConfig, Profile};
use aula_identity::crypto::Argon2Hasher;
use aula_identity::domain::email::EmailRule;
use aula_identity::infra::cache::{RedisCounterStore, RedisSessionStore};
use aula_identity::infra::db::DbSessionStore;
use aula_identity::infra::mailer::HttpMailer;
use aula_identity::rate_limit::{CounterBackend, InMemoryCounterStore, RateLimiter};
use aula_identity::router::build_router;
use aula_identity::state::{AppState, SessionBackend};

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().json())
        .try_init();

    let config = IdentityConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    // Profile resolution happens exactly once, here: the chosen session and
    // counter backends are injected and handlers never see the profile.
    let ttl_secs = config.profile.session_ttl_secs();
    let (sessions, counters) = match config.profile {
        Profile::Production => {
            let redis_url = config.redis_url.as_deref().expect("REDIS_URL");
            let redis_cfg = deadpool_redis::Config::from_url(redis_url);
            let redis = redis_cfg
                .create_pool(Some(deadpool_redis::Runtime::Tokio1))
                .expect("failed to create Redis pool");
            (
                SessionBackend::Redis(RedisSessionStore {
                    pool: redis.clone(),
                    ttl_secs,
                }),
                CounterBackend::Redis(RedisCounterStore { pool: redis }),
            )
        }
        Profile::Development => (
            SessionBackend::Db(DbSessionStore {
                db: db.clone(),
                ttl_secs,
            }),
            CounterBackend::Memory(InMemoryCounterStore::new()),
        ),
    };

    let state = AppState {
        db,
        sessions,
        limiter: RateLimiter::new(counters, config.rate_limit.clone()),
        mailer: HttpMailer::new(config.mailer_url.clone()),
        hasher: Argon2Hasher,
        email_rule: EmailRule::new(config.staff_accounts.clone()),
        cookie: config.profile.cookie_policy(),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.identity_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("identity service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
