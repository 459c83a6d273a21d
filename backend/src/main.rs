//! Callback desk entry-point: loads settings, selects the interaction store,
//! and serves the REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use callback_desk::domain::ports::InteractionRepository;
use callback_desk::domain::{CallbackRequestService, RandomRequestIdSource, RequestIdGenerator};
use callback_desk::inbound::http::health::{HealthState, StoreKind};
use callback_desk::inbound::http::state::HttpState;
use callback_desk::outbound::memory::InMemoryInteractionRepository;
use callback_desk::outbound::persistence::{
    DbPool, DieselInteractionRepository, PoolConfig, run_migrations,
};
use callback_desk::settings::{LogFormat, ServiceSettings};
use server::{ServerConfig, create_server};

fn init_tracing(format: LogFormat) {
    let builder = fmt().with_env_filter(EnvFilter::from_default_env());
    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

async fn connect_postgres(
    database_url: String,
    settings: &ServiceSettings,
) -> std::io::Result<DieselInteractionRepository> {
    let migration_url = database_url.clone();
    let applied = web::block(move || run_migrations(&migration_url))
        .await
        .map_err(std::io::Error::other)?
        .map_err(std::io::Error::other)?;
    info!(applied, "database migrations applied");

    let config = PoolConfig::new(database_url)
        .with_max_size(settings.pool_max_size)
        .with_min_idle(Some(settings.pool_min_idle));
    let pool = DbPool::new(config)
        .await
        .map_err(|e| std::io::Error::other(e.message().to_owned()))?;
    Ok(DieselInteractionRepository::new(pool))
}

fn build_http_state<R>(repo: Arc<R>, settings: &ServiceSettings) -> HttpState
where
    R: InteractionRepository + 'static,
{
    let generator = RequestIdGenerator::new(
        Arc::new(RandomRequestIdSource),
        settings.id_draw_limit,
    );
    let service = CallbackRequestService::new(repo, generator, Arc::new(DefaultClock));
    HttpState::for_service(Arc::new(service))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let settings = ServiceSettings::load().map_err(std::io::Error::other)?;
    let log_format = settings.log_format().map_err(std::io::Error::other)?;
    init_tracing(log_format);

    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;

    let (http_state, store) = match settings.database_url() {
        Some(url) => {
            let repo = connect_postgres(url, &settings).await?;
            (
                build_http_state(Arc::new(repo), &settings),
                StoreKind::Postgres,
            )
        }
        None => {
            warn!("no database configured; callback requests are kept in memory only");
            (
                build_http_state(Arc::new(InMemoryInteractionRepository::new()), &settings),
                StoreKind::Memory,
            )
        }
    };

    let health_state = web::Data::new(HealthState::new(store));
    let server = create_server(health_state, ServerConfig::new(bind_addr, http_state))?;
    server.await
}
