use std::{net::SocketAddr, sync::Arc};

use {
    axum::{
        Router,
        extract::State,
        response::{IntoResponse, Json},
        routing::{get, post},
    },
    tower_http::{
        cors::{Any, CorsLayer},
        trace::TraceLayer,
    },
    tracing::info,
};

#[cfg(feature = "prometheus")]
use msgrelay_metrics::MetricsHandle;

use crate::{message_routes, state::GatewayState};

// ── Shared app state ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<GatewayState>,
    #[cfg(feature = "prometheus")]
    pub metrics: Option<MetricsHandle>,
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the gateway router (shared between production startup and tests).
pub fn build_gateway_app(
    state: Arc<GatewayState>,
    #[cfg(feature = "prometheus")] metrics: Option<MetricsHandle>,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route(
            "/message/register-service",
            post(message_routes::register_service),
        )
        .route(
            "/message/unregister-service",
            post(message_routes::unregister_service),
        )
        .route("/message/services", get(message_routes::list_services))
        .route("/message/inbound", post(message_routes::inbound));

    #[cfg(feature = "prometheus")]
    let router = router.route("/metrics", get(metrics_handler));

    #[cfg(feature = "metrics")]
    let router = router.layer(axum::middleware::from_fn(
        crate::metrics_middleware::http_metrics_middleware,
    ));

    let app_state = AppState {
        gateway: state,
        #[cfg(feature = "prometheus")]
        metrics,
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Load services from `config`, bind and serve until the listener fails.
pub async fn start_gateway(
    config: &msgrelay_config::RelayConfig,
    bind: &str,
    port: u16,
) -> anyhow::Result<()> {
    #[cfg(feature = "prometheus")]
    let metrics = Some(msgrelay_metrics::init_metrics(
        msgrelay_metrics::MetricsRecorderConfig {
            enabled: config.metrics.enabled,
            global_labels: config
                .metrics
                .labels
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        },
    )?);

    let state = GatewayState::from_config(config).await?;
    info!(
        services = ?state.services().await,
        webhooks = config.webhook.urls.len(),
        "message services loaded"
    );

    #[cfg(feature = "prometheus")]
    let app = build_gateway_app(state, metrics);
    #[cfg(not(feature = "prometheus"))]
    let app = build_gateway_app(state);

    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "msgrelay gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": state.gateway.version,
        "services": state.gateway.services().await.len(),
    }))
}

#[cfg(feature = "prometheus")]
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    state
        .metrics
        .as_ref()
        .map(MetricsHandle::render)
        .unwrap_or_default()
}
