use std::sync::Arc;

use crate::config::Config;
use feeledger_core::{
    bookings::BookingRepositoryTrait,
    fx::{FxService, FxServiceTrait},
    revenue::{FeePolicy, MonthlyRevenueRepositoryTrait, RevenueService},
};
use feeledger_storage_sqlite::{
    db::{self, spawn_writer},
    BookingRepository, FxRepository, MonthlyRevenueRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub booking_repository: Arc<dyn BookingRepositoryTrait>,
    pub fx_service: Arc<FxService>,
    pub revenue_service: Arc<RevenueService>,
    pub policy: FeePolicy,
    pub db_path: String,
}

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn load_policy(config: &Config) -> anyhow::Result<FeePolicy> {
    match &config.policy_file {
        Some(path) => {
            let policy = FeePolicy::from_json_file(path)?;
            tracing::info!("Fee policy loaded from {}", path.display());
            Ok(policy)
        }
        None => Ok(FeePolicy::default()),
    }
}

/// Opens the database, applies pending migrations and wires repositories to services.
/// Must be called inside the Tokio runtime, which hosts the writer actor.
pub fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = spawn_writer(pool.clone());

    let policy = load_policy(config)?;
    tracing::info!(
        "Base currency {}, {} fee entries, multi-currency policy {:?}",
        policy.base_currency,
        policy.fees.len(),
        policy.multi_currency_policy
    );

    let booking_repository: Arc<dyn BookingRepositoryTrait> =
        Arc::new(BookingRepository::new(pool.clone(), writer.clone()));
    let fx_repository = Arc::new(FxRepository::new(pool.clone(), writer.clone()));
    let revenue_repository: Arc<dyn MonthlyRevenueRepositoryTrait> =
        Arc::new(MonthlyRevenueRepository::new(pool.clone(), writer));

    let fx_service = Arc::new(FxService::new(fx_repository));
    let revenue_service = Arc::new(RevenueService::new(
        booking_repository.clone(),
        fx_service.clone() as Arc<dyn FxServiceTrait>,
        revenue_repository,
        policy.clone(),
    ));

    Ok(AppState {
        booking_repository,
        fx_service,
        revenue_service,
        policy,
        db_path,
    })
}
