use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{
    postgres::PgPoolOptions,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    PgPool, SqlitePool,
};
use tracing::{info, warn};

use super::repo_types::{NewUser, UserAccount};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// The UNIQUE constraint on `email` is the source of truth for duplicates.
fn map_insert_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateEmail,
        _ => StoreError::Database(e),
    }
}

/// Write-once user records keyed by unique email.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError>;
    async fn insert(&self, user: &NewUser<'_>) -> Result<UserAccount, StoreError>;
    async fn count(&self) -> Result<i64, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations/postgres").run(&db).await {
            warn!(error = %e, "postgres migration failed; continuing");
        }
        info!("postgres user store ready");
        Ok(Self { db })
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError> {
        let user = sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT id, name, email, password_hash, calories, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: &NewUser<'_>) -> Result<UserAccount, StoreError> {
        sqlx::query_as::<_, UserAccount>(
            r#"
            INSERT INTO users (name, email, password_hash, calories, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, calories, created_at
            "#,
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.calories)
        .bind(user.created_at)
        .fetch_one(&self.db)
        .await
        .map_err(map_insert_error)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;
        Ok(n)
    }
}

/// Embedded fallback used when no database URL is configured.
#[derive(Clone)]
pub struct SqliteUserStore {
    db: SqlitePool,
}

impl SqliteUserStore {
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let opts = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("parse sqlite url {url}"))?
            .create_if_missing(true);
        let db = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .context("open sqlite store")?;
        Self::migrate(db).await
    }

    /// Private database living as long as the single pooled connection.
    #[cfg(test)]
    pub async fn in_memory() -> anyhow::Result<Self> {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("open in-memory sqlite")?;
        Self::migrate(db).await
    }

    async fn migrate(db: SqlitePool) -> anyhow::Result<Self> {
        sqlx::migrate!("./migrations/sqlite")
            .run(&db)
            .await
            .context("run sqlite migrations")?;
        info!("sqlite user store ready");
        Ok(Self { db })
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError> {
        let user = sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT id, name, email, password_hash, calories, created_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: &NewUser<'_>) -> Result<UserAccount, StoreError> {
        sqlx::query_as::<_, UserAccount>(
            r#"
            INSERT INTO users (name, email, password_hash, calories, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, name, email, password_hash, calories, created_at
            "#,
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.calories)
        .bind(user.created_at)
        .fetch_one(&self.db)
        .await
        .map_err(map_insert_error)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;

    fn new_user<'a>(email: &'a str) -> NewUser<'a> {
        NewUser {
            name: "Olena",
            email,
            password_hash: "$argon2id$v=19$fake",
            calories: 2100,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn insert_then_find() {
        let store = SqliteUserStore::in_memory().await.unwrap();
        let created = store.insert(&new_user("olena@example.com")).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.calories, 2100);

        let found = store
            .find_by_email("olena@example.com")
            .await
            .unwrap()
            .expect("user should exist");
        assert_eq!(found.id, created.id);
        assert_eq!(found.name, "Olena");
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ids_are_distinct() {
        let store = SqliteUserStore::in_memory().await.unwrap();
        let a = store.insert(&new_user("a@example.com")).await.unwrap();
        let b = store.insert(&new_user("b@example.com")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn unique_constraint_maps_to_duplicate() {
        let store = SqliteUserStore::in_memory().await.unwrap();
        store.insert(&new_user("dup@example.com")).await.unwrap();

        let err = store.insert(&new_user("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail), "{err}");
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn created_at_survives_roundtrip() {
        let store = SqliteUserStore::in_memory().await.unwrap();
        let u = new_user("time@example.com");
        store.insert(&u).await.unwrap();
        let found = store.find_by_email("time@example.com").await.unwrap().unwrap();
        assert_eq!(found.created_at.unix_timestamp(), u.created_at.unix_timestamp());
    }

    #[tokio::test]
    async fn file_backed_store_is_created() {
        let dir = std::env::temp_dir().join(format!("mealmind-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("users.db");
        let url = format!("sqlite://{}", path.display());

        let store = SqliteUserStore::connect(&url).await.unwrap();
        store.insert(&new_user("file@example.com")).await.unwrap();
        assert!(path.exists());

        drop(store);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
