//! Route handlers.
//!
//! Each handler validates its input, calls one port and maps the outcome to
//! a response. Port errors become [`ApiError`]s through the conversions in
//! the adapters layer.

use crate::domain::error::{ApiError, ApiResult};
use crate::router::AppState;
use crate::VERSION;
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use shared_types::{
    Call, CallAck, CallbackRequest, HealthResponse, LoginRequest, LoginResponse, PingResponse,
    Recording, VerificationCallRequest,
};
use tracing::{debug, info, warn};

/// `POST /login`
pub async fn login(State(state): State<AppState>, body: Bytes) -> ApiResult<Response> {
    let credentials = parse_json::<LoginRequest>(&body)?.validate()?;

    match state.users.find_user(&credentials).await? {
        Some(user) => {
            let token = state.tokens.issue(&user)?;
            info!(username = %user.username, role = %user.role, "Login accepted");
            Ok(Json(LoginResponse::accepted(user, token)).into_response())
        }
        None => {
            warn!(username = %credentials.username, "Login rejected");
            Ok((StatusCode::UNAUTHORIZED, Json(LoginResponse::rejected())).into_response())
        }
    }
}

/// `GET /calls`
pub async fn list_calls(State(state): State<AppState>) -> ApiResult<Json<Vec<Call>>> {
    let mut calls = state.calls.list_calls(state.row_limit).await?;
    calls.truncate(state.row_limit as usize);
    debug!(rows = calls.len(), "Listing calls");
    Ok(Json(calls))
}

/// `GET /history`
pub async fn list_history(State(state): State<AppState>) -> ApiResult<Json<Vec<Recording>>> {
    let mut recordings = state.calls.list_recordings(state.row_limit).await?;
    recordings.truncate(state.row_limit as usize);
    debug!(rows = recordings.len(), "Listing recordings");
    Ok(Json(recordings))
}

/// `POST /call.php`
pub async fn verification_call(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<CallAck>> {
    let call = parse_json::<VerificationCallRequest>(&body)?.validate()?;
    state.telephony.place_verification_call(&call).await?;
    Ok(Json(CallAck::initiated()))
}

/// `POST /callback.php`
pub async fn callback_call(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<CallAck>> {
    let call = parse_json::<CallbackRequest>(&body)?.validate()?;
    state.telephony.place_callback(&call).await?;
    Ok(Json(CallAck::initiated()))
}

/// `GET /api/ping`
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "pong".to_string(),
    })
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
    })
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(uri.path())
}

/// An empty body reads as `{}` so presence validation reports the missing
/// fields; anything else must be a JSON object of the right shape.
fn parse_json<T>(body: &[u8]) -> ApiResult<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "Rejecting malformed JSON body");
        ApiError::validation("Invalid JSON body")
    })
}
