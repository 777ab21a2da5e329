use std::sync::Arc;

use crate::auth::jwt::JwtKeys;
use crate::auth::repo::{PgUserRepository, UserRepository};
use crate::config::AppConfig;
use crate::db;
use crate::projects::repo::{PgProjectRepository, ProjectRepository};
use crate::storage::{AssetHost, ObjectStorage};

/// Shared, read-only handles passed to every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: Arc<JwtKeys>,
    pub users: Arc<dyn UserRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub assets: Arc<dyn AssetHost>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let keys = Arc::new(JwtKeys::new(&config.jwt)?);

        let pool = db::connect(&config.database_url).await?;

        let assets = Arc::new(ObjectStorage::new(&config.storage).await?) as Arc<dyn AssetHost>;

        Ok(Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            projects: Arc::new(PgProjectRepository::new(pool)),
            config,
            keys,
            assets,
        })
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepository>,
        projects: Arc<dyn ProjectRepository>,
        assets: Arc<dyn AssetHost>,
    ) -> anyhow::Result<Self> {
        let keys = Arc::new(JwtKeys::new(&config.jwt)?);
        Ok(Self {
            config,
            keys,
            users,
            projects,
            assets,
        })
    }
}
