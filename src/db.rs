use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::auth::{
    password::hash_password,
    repo_types::{NewUser, Role},
};
use crate::state::AppState;

pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("run migrations")?;
    Ok(db)
}

/// Creates the bootstrap admin when the user table is empty.
/// Returns whether a user was inserted.
pub async fn seed_admin(st: &AppState) -> anyhow::Result<bool> {
    let Some(password) = st.config.admin.password.as_deref() else {
        warn!("ADMIN_PASSWORD not set; skipping admin seed");
        return Ok(false);
    };
    if st.users.count().await? > 0 {
        return Ok(false);
    }

    let admin = st
        .users
        .insert(NewUser {
            username: "Admin".into(),
            email: st.config.admin.email.trim().to_lowercase(),
            password_hash: hash_password(password)?,
            role: Role::Admin,
        })
        .await?;
    info!(user_id = %admin.id, email = %admin.email, "admin user seeded");
    Ok(true)
}
