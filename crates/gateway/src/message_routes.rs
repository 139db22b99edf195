//! `/message/*` routes: register, unregister and list message services, and
//! hand inbound messages to the first service that accepts them.

use {
    axum::{
        Json,
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    msgrelay_common::InboundMessage,
    msgrelay_msgsvc::{Error, ServiceParams},
    serde::{Deserialize, Serialize},
    tracing::warn,
};

use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct UnregisterRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServicesResponse {
    pub names: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct InboundRequest {
    pub message: InboundMessage,
    pub sender_did: String,
    pub recipient_did: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InboundResponse {
    pub reply_id: String,
}

pub async fn register_service(
    State(state): State<AppState>,
    Json(params): Json<ServiceParams>,
) -> Response {
    match state.gateway.register(params).await {
        Ok(()) => Json(serde_json::json!({})).into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn unregister_service(
    State(state): State<AppState>,
    Json(body): Json<UnregisterRequest>,
) -> Response {
    match state.gateway.unregister(&body.name).await {
        Ok(()) => Json(serde_json::json!({})).into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn list_services(State(state): State<AppState>) -> impl IntoResponse {
    Json(ServicesResponse {
        names: state.gateway.services().await,
    })
}

pub async fn inbound(
    State(state): State<AppState>,
    Json(body): Json<InboundRequest>,
) -> Response {
    match state
        .gateway
        .dispatch(&body.message, &body.sender_did, &body.recipient_did)
        .await
    {
        Ok(reply_id) => Json(InboundResponse { reply_id }).into_response(),
        Err(e) => {
            warn!(error = %e, "inbound dispatch failed");
            error_response(&e)
        },
    }
}

fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::InvalidParams { .. }
        | Error::AlreadyRegistered { .. }
        | Error::NotRegistered { .. }
        | Error::TopicNotFound => StatusCode::BAD_REQUEST,
        Error::NoHandler { .. } => StatusCode::NOT_FOUND,
        Error::DeliveryFailed { .. } => StatusCode::BAD_GATEWAY,
        Error::SerializationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: &Error) -> Response {
    (
        status_for(error),
        Json(serde_json::json!({
            "error": error.to_string(),
            "kind": error.kind(),
        })),
    )
        .into_response()
}
