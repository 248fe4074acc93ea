use async_trait::async_trait;
use mediaslot_core::AppError;
use serde::Serialize;
use subtle::ConstantTimeEq;

/// Verifies a service credential pair. The production implementation calls
/// the external authentication collaborator; tests inject their own.
#[async_trait]
pub trait ServiceVerifier: Send + Sync {
    async fn verify(&self, service_id: &str, service_key: &str) -> Result<bool, AppError>;
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    service_id: &'a str,
    service_key: &'a str,
}

/// Delegates verification to the external authentication endpoint.
///
/// A 2xx response means the pair is valid, 401/403 means it is not; any
/// other outcome (including transport failure) fails closed as an internal
/// error rather than letting requests through.
pub struct RemoteServiceVerifier {
    client: reqwest::Client,
    verify_url: String,
}

impl RemoteServiceVerifier {
    pub fn new(verify_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            verify_url,
        }
    }
}

#[async_trait]
impl ServiceVerifier for RemoteServiceVerifier {
    async fn verify(&self, service_id: &str, service_key: &str) -> Result<bool, AppError> {
        let response = self
            .client
            .post(&self.verify_url)
            .json(&VerifyRequest {
                service_id,
                service_key,
            })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, url = %self.verify_url, "Auth verification request failed");
                AppError::Internal("Authentication service unreachable".to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Ok(false);
        }

        tracing::error!(status = %status, "Auth verification returned unexpected status");
        Err(AppError::Internal(
            "Authentication service returned an unexpected status".to_string(),
        ))
    }
}

/// Compares against a locally configured pair (dev / single-node mode).
pub struct StaticServiceVerifier {
    service_id: String,
    service_key: String,
}

impl StaticServiceVerifier {
    pub fn new(service_id: String, service_key: String) -> Self {
        Self {
            service_id,
            service_key,
        }
    }
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[async_trait]
impl ServiceVerifier for StaticServiceVerifier {
    async fn verify(&self, service_id: &str, service_key: &str) -> Result<bool, AppError> {
        Ok(secure_compare(service_id, &self.service_id)
            && secure_compare(service_key, &self.service_key))
    }
}
