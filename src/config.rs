use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// Base URL that uploaded object keys are appended to.
    pub public_url: String,
}

/// Bootstrap admin account. Seeding is skipped without a password.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub email: String,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub admin: AdminConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "projectmanager".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "projectmanager-users".into()),
            ttl_days: std::env::var("JWT_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(7),
        };

        let endpoint = std::env::var("STORAGE_ENDPOINT").context("STORAGE_ENDPOINT is not set")?;
        let bucket = std::env::var("STORAGE_BUCKET").context("STORAGE_BUCKET is not set")?;
        let public_url = std::env::var("STORAGE_PUBLIC_URL")
            .unwrap_or_else(|_| format!("{}/{}", endpoint.trim_end_matches('/'), bucket));
        let storage = StorageConfig {
            access_key: std::env::var("STORAGE_ACCESS_KEY")
                .context("STORAGE_ACCESS_KEY is not set")?,
            secret_key: std::env::var("STORAGE_SECRET_KEY")
                .context("STORAGE_SECRET_KEY is not set")?,
            region: std::env::var("STORAGE_REGION").unwrap_or_else(|_| "us-east-1".into()),
            endpoint,
            bucket,
            public_url,
        };

        let admin = AdminConfig {
            email: std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@domain.com".into()),
            password: std::env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
        };

        Ok(Self {
            database_url,
            jwt,
            storage,
            admin,
        })
    }
}
