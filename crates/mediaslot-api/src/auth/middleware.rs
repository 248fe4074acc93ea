use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use mediaslot_core::AppError;

use super::verifier::ServiceVerifier;
use crate::error::HttpAppError;

pub const SERVICE_ID_HEADER: &str = "x-service-id";
pub const SERVICE_KEY_HEADER: &str = "x-service-key";

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn ServiceVerifier>,
}

/// Authenticated-service check for the protected routes.
///
/// Extracts the service header pair and delegates to the configured
/// verifier. Requests without the pair, or with a pair the verifier
/// rejects, never reach a handler.
pub async fn service_auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let service_id = request
        .headers()
        .get(SERVICE_ID_HEADER)
        .and_then(|h| h.to_str().ok());
    let service_key = request
        .headers()
        .get(SERVICE_KEY_HEADER)
        .and_then(|h| h.to_str().ok());

    let (service_id, service_key) = match (service_id, service_key) {
        (Some(id), Some(key)) if !id.is_empty() && !key.is_empty() => (id, key),
        _ => {
            return HttpAppError(AppError::Unauthorized(
                "Missing service credentials".to_string(),
            ))
            .into_response();
        }
    };

    match auth_state.verifier.verify(service_id, service_key).await {
        Ok(true) => next.run(request).await,
        Ok(false) => {
            tracing::debug!(service_id = %service_id, "Service credentials rejected");
            HttpAppError(AppError::Unauthorized(
                "Invalid service credentials".to_string(),
            ))
            .into_response()
        }
        Err(err) => HttpAppError(err).into_response(),
    }
}
