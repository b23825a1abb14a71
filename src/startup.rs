use axum::{
    http::{header, HeaderValue},
    routing::{get, post, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::config::Config;
use crate::email::build_provider;
use crate::errors::AppError;
use crate::handlers::{self, AppState};
use crate::intake::{LeadIntake, NotificationSettings};
use crate::store::SupabaseStore;

/// Lead form bodies are small; anything above this is rejected with 413,
/// up front when `Content-Length` is declared, otherwise while buffering.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Wires the Supabase store and the configured email provider into the intake pipeline.
pub fn build_state(config: Config) -> Result<Arc<AppState>, AppError> {
    let store = Arc::new(SupabaseStore::from_config(&config)?);
    let notifier = build_provider(&config)?;
    match &notifier {
        Some(provider) => tracing::info!("✓ Email provider initialized: {}", provider.name()),
        None => tracing::info!("Email provider not configured"),
    }

    let intake = LeadIntake::new(
        store,
        notifier,
        NotificationSettings::from_config(&config),
        config.lead_source,
    );

    Ok(Arc::new(AppState { intake }))
}

fn lead_endpoint() -> MethodRouter<Arc<AppState>> {
    post(handlers::submit_lead)
        .options(handlers::preflight)
        .fallback(handlers::method_not_allowed)
}

/// Builds the full router: health check plus the lead endpoint.
///
/// Every response from the lead endpoint, errors included, carries the
/// permissive CORS headers the marketing site relies on.
pub fn build_router(state: Arc<AppState>) -> Router {
    let lead_routes = Router::new()
        .route("/api/submit-lead", lead_endpoint())
        .route("/api/leads", lead_endpoint())
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static("POST, OPTIONS"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static("Content-Type"),
                ))
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .merge(lead_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
