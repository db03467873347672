use anyhow::Context;
use time::OffsetDateTime;
use tracing::{error, info, warn};

use super::{
    dto::RegisterRequest,
    password::hash_password,
    repo::{StoreError, UserStore},
    repo_types::{NewUser, UserAccount},
};
use crate::error::AppError;

/// Surrounding whitespace only; case and format are kept as sent.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}

const DUPLICATE_EMAIL: &str = "Email already registered";

/// Creates an account. A taken email is a `Conflict` and leaves the store untouched.
pub async fn register(
    store: &dyn UserStore,
    req: RegisterRequest,
) -> Result<UserAccount, AppError> {
    let email = normalize_email(&req.email);

    match store.find_by_email(&email).await {
        Ok(Some(_)) => {
            warn!(email = %email, "email already registered");
            return Err(AppError::Conflict(DUPLICATE_EMAIL.into()));
        }
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(AppError::Internal(e.into()));
        }
    }

    let password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("hash_password task")??;

    let new_user = NewUser {
        name: req.name.trim(),
        email: &email,
        password_hash: &password_hash,
        calories: req.calories,
        created_at: OffsetDateTime::now_utc(),
    };

    // A concurrent registration can pass the lookup above; the unique index catches it.
    let user = match store.insert(&new_user).await {
        Ok(u) => u,
        Err(StoreError::DuplicateEmail) => {
            warn!(email = %email, "email registered concurrently");
            return Err(AppError::Conflict(DUPLICATE_EMAIL.into()));
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(AppError::Internal(e.into()));
        }
    };

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(user)
}
