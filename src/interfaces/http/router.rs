//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::services::{
    AttendanceService, AvailabilityService, CatalogService, SchedulerService,
};

use super::modules::{
    availability, bookings, checkin, health, metrics as metrics_module, penalties, request_id,
    resources,
};

/// Shared state for every API handler.
#[derive(Clone)]
pub struct ApiState {
    pub catalog: Arc<CatalogService>,
    pub availability: Arc<AvailabilityService>,
    pub scheduler: Arc<SchedulerService>,
    pub attendance: Arc<AttendanceService>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        resources::handlers::list_units,
        resources::handlers::get_unit,
        resources::handlers::set_unit_status,
        resources::handlers::retire_unit,
        availability::handlers::get_availability,
        bookings::handlers::create_booking,
        bookings::handlers::cancel_booking,
        bookings::handlers::list_bookings,
        checkin::handlers::check_in,
        penalties::handlers::list_penalties,
        penalties::handlers::settle_penalty,
    ),
    components(schemas(
        health::HealthStatus,
        resources::dto::ResourceUnitDto,
        resources::dto::UpdateUnitStatusRequest,
        availability::dto::AvailabilityDto,
        bookings::dto::BookingDto,
        bookings::dto::CreateBookingRequest,
        bookings::dto::CancelBookingRequest,
        checkin::dto::CheckInRequest,
        penalties::dto::PenaltyDto,
        penalties::dto::SettlePenaltyRequest,
    )),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Resources", description = "Bookable unit catalog"),
        (name = "Availability", description = "Advisory availability lookups"),
        (name = "Bookings", description = "Booking creation and lifecycle"),
        (name = "Attendance", description = "Check-in by attendance code"),
        (name = "Penalties", description = "No-show penalty settlement"),
    ),
    info(
        title = "Campus Booking API",
        description = "Resource-booking scheduler and availability engine for campus library seats, lab equipment and rooms."
    )
)]
struct ApiDoc;

/// Build the complete API router.
pub fn create_api_router(state: ApiState, prometheus_handle: PrometheusHandle) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/resources", get(resources::handlers::list_units))
        .route(
            "/resources/{unit_id}",
            get(resources::handlers::get_unit).delete(resources::handlers::retire_unit),
        )
        .route(
            "/resources/{unit_id}/status",
            patch(resources::handlers::set_unit_status),
        )
        .route(
            "/availability",
            get(availability::handlers::get_availability),
        )
        .route(
            "/bookings",
            post(bookings::handlers::create_booking).get(bookings::handlers::list_bookings),
        )
        .route(
            "/bookings/{booking_id}/cancel",
            patch(bookings::handlers::cancel_booking),
        )
        .route("/check-in", post(checkin::handlers::check_in))
        .route("/penalties", get(penalties::handlers::list_penalties))
        .route(
            "/penalties/{penalty_id}",
            patch(penalties::handlers::settle_penalty),
        )
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics_module::render_metrics))
        .with_state(prometheus_handle);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/v1", api_routes.merge(metrics_routes))
        .layer(middleware::from_fn(metrics_module::track_metrics))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
