//! Configuration module
//!
//! Environment-driven configuration for the API and services: server settings,
//! storage roots, service authentication, upload limits, and cache tuning.

use std::env;

const CACHE_TTL_SECS: u64 = 7200;
const CACHE_SWEEP_INTERVAL_SECS: u64 = 600;
const MAX_UPLOAD_SIZE_MB: usize = 50;

/// Default content-type allowlist for uploads.
const DEFAULT_ALLOWED_CONTENT_TYPES: &str = "image/jpeg,image/png,image/gif,image/webp,\
video/mp4,video/quicktime,video/x-msvideo,video/x-ms-wmv,video/webm";

/// Application configuration, loaded once at startup and injected into handlers.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    /// Base URL used to derive public file URLs (e.g. "http://localhost:4000").
    pub public_base_url: String,
    /// Root directory for general asset storage.
    pub media_storage_path: String,
    /// Root directory for the logo namespace, segregated from general assets.
    pub logo_storage_path: String,
    pub max_upload_size_bytes: usize,
    pub allowed_content_types: Vec<String>,
    /// External authentication collaborator; when unset, the static pair below is used.
    pub auth_verify_url: Option<String>,
    pub service_id: Option<String>,
    pub service_key: Option<String>,
    pub cache_ttl_secs: u64,
    pub cache_sweep_interval_secs: u64,
    /// Optional relational shadow store. Write-only; never consulted on reads.
    pub database_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "4000".to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let allowed_content_types = env::var("ALLOWED_CONTENT_TYPES")
            .unwrap_or_else(|_| DEFAULT_ALLOWED_CONTENT_TYPES.to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .collect();

        let config = Config {
            server_port,
            environment,
            cors_origins,
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", server_port)),
            media_storage_path: env::var("MEDIA_STORAGE_PATH")
                .unwrap_or_else(|_| "./data/media".to_string()),
            logo_storage_path: env::var("LOGO_STORAGE_PATH")
                .unwrap_or_else(|_| "./data/logos".to_string()),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            allowed_content_types,
            auth_verify_url: env::var("AUTH_VERIFY_URL").ok(),
            service_id: env::var("SERVICE_ID").ok(),
            service_key: env::var("SERVICE_KEY").ok(),
            cache_ttl_secs: env::var("CACHE_TTL_SECS")
                .unwrap_or_else(|_| CACHE_TTL_SECS.to_string())
                .parse()
                .unwrap_or(CACHE_TTL_SECS),
            cache_sweep_interval_secs: env::var("CACHE_SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| CACHE_SWEEP_INTERVAL_SECS.to_string())
                .parse()
                .unwrap_or(CACHE_SWEEP_INTERVAL_SECS),
            database_url: env::var("DATABASE_URL").ok(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.auth_verify_url.is_none() && (self.service_id.is_none() || self.service_key.is_none())
        {
            return Err(anyhow::anyhow!(
                "Either AUTH_VERIFY_URL or the SERVICE_ID/SERVICE_KEY pair must be set"
            ));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        Ok(())
    }

    /// Public URL for a stored asset, derived from its slot key.
    pub fn file_url(&self, stored_name: &str) -> String {
        format!(
            "{}/media/file/{}",
            self.public_base_url.trim_end_matches('/'),
            stored_name
        )
    }

    /// Public URL for a tenant's logo.
    pub fn logo_url(&self, company_id: &str) -> String {
        format!(
            "{}/media/company-logo/file/{}",
            self.public_base_url.trim_end_matches('/'),
            company_id
        )
    }
}
