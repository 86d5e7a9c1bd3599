//! HTTP API Layer
//!
//! This crate provides the REST API for the fund operations service using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for fund operations, relationship
//!   intelligence, and health
//! - **Middleware**: Request ids, tracing, audit logging, panic recovery
//! - **DTOs**: Query strings, command bodies, and the response envelope
//! - **Error Handling**: Every failure rendered as `{success: false, error}`
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(service, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use axum::{
    Router,
    routing::get,
    middleware as axum_middleware,
};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{CorsLayer, Any};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_fund::FundOperationsService;

use crate::config::ApiConfig;
use crate::middleware::audit_middleware;
use crate::handlers::{fund_operations, health, relationship};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: FundOperationsService,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `service` - Fund operations service over the configured store
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(service: FundOperationsService, config: ApiConfig) -> Router {
    let state = AppState { service, config };

    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // API routes
    let api_routes = Router::new()
        .route(
            "/fund-operations",
            get(fund_operations::get_fund_operations).post(fund_operations::post_fund_operations),
        )
        .route(
            "/relationship-intelligence",
            get(relationship::get_relationship_intelligence),
        )
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware));

    // Outermost first: the request id exists before tracing sees the request
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(error::handle_panic));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
        .layer(middleware)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
