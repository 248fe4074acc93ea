//! Service-to-service authentication.
//!
//! Callers present the `x-service-id` / `x-service-key` header pair; the
//! identity check itself is delegated to an external authentication
//! collaborator reached over HTTP. A statically configured pair is supported
//! as a fallback for single-node and development deployments.

pub mod middleware;
pub mod verifier;

pub use middleware::{service_auth_middleware, AuthState};
pub use verifier::{RemoteServiceVerifier, ServiceVerifier, StaticServiceVerifier};
