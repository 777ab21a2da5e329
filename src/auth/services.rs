use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{RegisterRequest, UpdateUserRequest},
        password::{hash_password, verify_password},
        repo_types::{NewUser, Role, User},
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Creates an account and returns a session token for it.
pub async fn register(st: &AppState, req: RegisterRequest) -> AppResult<String> {
    let username = req.username.trim().to_string();
    let email = normalize_email(&req.email);
    if username.is_empty() {
        return Err(AppError::Validation("username".into()));
    }
    if !is_valid_email(&email) {
        return Err(AppError::Validation("email".into()));
    }
    if req.password.is_empty() {
        return Err(AppError::Validation("password".into()));
    }

    if st.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::DuplicateAccount);
    }

    let password_hash = hash_password(&req.password)?;
    let user = st
        .users
        .insert(NewUser {
            username,
            email,
            password_hash,
            role: Role::User,
        })
        .await?;

    let token = st.keys.issue(&user)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(token)
}

/// Unknown email and wrong password fail identically.
pub async fn login(st: &AppState, email: &str, password: &str) -> AppResult<String> {
    let email = normalize_email(email);
    let Some(user) = st.users.find_by_email(&email).await? else {
        debug!("login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash) {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = st.keys.issue(&user)?;
    info!(user_id = %user.id, "user logged in");
    Ok(token)
}

pub async fn list_users(st: &AppState) -> AppResult<Vec<User>> {
    st.users.find_all().await
}

pub async fn get_user(st: &AppState, id: Uuid) -> AppResult<User> {
    st.users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))
}

pub async fn update_user(st: &AppState, user: User) -> AppResult<User> {
    st.users
        .update(&user)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", user.id)))
}

/// Loads the user, applies the fields present in `patch` and stores it.
pub async fn apply_user_patch(
    st: &AppState,
    id: Uuid,
    patch: UpdateUserRequest,
) -> AppResult<User> {
    let mut user = get_user(st, id).await?;
    if let Some(username) = patch.username {
        let username = username.trim().to_string();
        if username.is_empty() {
            return Err(AppError::Validation("username".into()));
        }
        user.username = username;
    }
    if let Some(email) = patch.email {
        let email = normalize_email(&email);
        if !is_valid_email(&email) {
            return Err(AppError::Validation("email".into()));
        }
        if email != user.email {
            if let Some(owner) = st.users.find_by_email(&email).await? {
                if owner.id != user.id {
                    warn!(user_id = %user.id, "email already registered");
                    return Err(AppError::DuplicateAccount);
                }
            }
        }
        user.email = email;
    }
    if let Some(role) = patch.role {
        user.role = role;
    }
    let user = update_user(st, user).await?;
    info!(user_id = %user.id, "user updated");
    Ok(user)
}

pub async fn delete_user(st: &AppState, id: Uuid) -> AppResult<()> {
    if st.users.delete(id).await? == 0 {
        return Err(AppError::NotFound(format!("user {id}")));
    }
    info!(user_id = %id, "user deleted");
    Ok(())
}
