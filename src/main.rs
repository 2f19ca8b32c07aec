//!
//! Campus resource-booking service.
//! Reads configuration from TOML file (~/.config/campus-booking/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use campus_booking::application::services::{
    start_booking_sweep_task, AttendanceService, AvailabilityService, CatalogService,
    OpeningHoursService, SchedulerService,
};
use campus_booking::config::AppConfig;
use campus_booking::infrastructure::database::migrator::Migrator;
use campus_booking::interfaces::http::ApiState;
use campus_booking::shared::{CampusClock, ShutdownSignal};
use campus_booking::{
    create_api_router, default_config_path, init_database, DatabaseConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("BOOKING_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting campus booking service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("Prometheus metrics recorder installed");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.url.clone(),
        claim_timeout_ms: app_cfg.database.claim_timeout_ms,
    };
    info!("Database: {}", db_config.url);

    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Repositories & services ────────────────────────────────
    let repos: Arc<dyn campus_booking::domain::RepositoryProvider> = Arc::new(
        SeaOrmRepositoryProvider::new(db.clone(), app_cfg.database.claim_timeout_ms),
    );

    // Seed default opening hours so a fresh install can take bookings
    create_default_opening_hours(repos.as_ref()).await;

    let clock = CampusClock::new(app_cfg.campus.utc_offset_hours);
    let hours = OpeningHoursService::new(repos.clone(), clock);

    let catalog = Arc::new(CatalogService::new(repos.clone()));
    let availability = Arc::new(AvailabilityService::new(repos.clone()));
    let scheduler = Arc::new(SchedulerService::new(
        repos.clone(),
        app_cfg.policy.clone(),
        hours,
    ));
    let attendance = Arc::new(AttendanceService::new(
        repos.clone(),
        app_cfg.policy.clone(),
        app_cfg.attendance.checkin_window_minutes,
    ));

    // ── Shutdown coordination ──────────────────────────────────
    let shutdown = ShutdownSignal::new();
    shutdown.spawn_os_listener();

    // ── Background sweep (no-shows + completions) ──────────────
    start_booking_sweep_task(
        attendance.clone(),
        shutdown.clone(),
        app_cfg.sweep.interval_secs,
    );

    // ── REST API server with graceful shutdown ─────────────────
    let state = ApiState {
        catalog,
        availability,
        scheduler,
        attendance,
    };
    let router = create_api_router(state, prometheus_handle);

    let addr = format!("{}:{}", app_cfg.server.host, app_cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs", addr);

    let api_shutdown = shutdown.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        })
        .await?;

    // ── Final cleanup ──────────────────────────────────────────
    info!("Performing final cleanup...");

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Campus booking service shutdown complete");
    Ok(())
}

/// Seed weekly opening hours for any resource kind that has none yet.
///
/// Campus weekend is Friday/Saturday: the library closes outright, other
/// kinds simply have no open rule those days. Administrators adjust the
/// rules afterwards; the scheduler fails closed for kinds with no rules at
/// all, so a fresh install must not start empty.
async fn create_default_opening_hours(repos: &dyn campus_booking::domain::RepositoryProvider) {
    use campus_booking::domain::opening_hours::OpeningHoursRule;
    use campus_booking::domain::resource::ResourceKind;
    use chrono::NaiveTime;

    let defaults = [
        (ResourceKind::LibrarySeat, (8, 0), (20, 0)),
        (ResourceKind::EquipmentUnit, (9, 0), (17, 0)),
        (ResourceKind::Room, (8, 0), (18, 0)),
    ];

    for (kind, open, close) in defaults {
        match repos.opening_hours().has_rules_for_kind(kind).await {
            Ok(true) => continue,
            Ok(false) => {}
            Err(e) => {
                error!("Failed to inspect opening hours for {}: {}", kind, e);
                continue;
            }
        }

        info!("Seeding default opening hours for {}", kind);

        let (Some(open_time), Some(close_time)) = (
            NaiveTime::from_hms_opt(open.0, open.1, 0),
            NaiveTime::from_hms_opt(close.0, close.1, 0),
        ) else {
            continue;
        };

        // Sunday (0) through Thursday (4) are working days
        for day in 0..=4u8 {
            let rule = OpeningHoursRule::open(kind, day, open_time, close_time);
            if let Err(e) = repos.opening_hours().save(rule).await {
                error!("Failed to seed opening hours for {}: {}", kind, e);
            }
        }
        for day in [5u8, 6u8] {
            let rule = OpeningHoursRule::closed(kind, day);
            if let Err(e) = repos.opening_hours().save(rule).await {
                error!("Failed to seed opening hours for {}: {}", kind, e);
            }
        }
    }
}
