//! Application state for the storefront server

use std::path::PathBuf;

use shared::i18n::Lang;
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::RateLimiter;
use crate::config::Config;
use crate::db;
use crate::error::BoxError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// JWT secret for admin authentication
    pub jwt_secret: String,
    /// Rate limiter for login / contact routes
    pub rate_limiter: RateLimiter,
    /// Directory uploaded media is written to
    pub upload_dir: PathBuf,
    /// URL prefix media is served under (no trailing slash)
    pub public_media_base: String,
    /// Preview products per mega-menu column
    pub mega_menu_preview_limit: usize,
    /// Language used when a request names none
    pub default_lang: Lang,
}

impl AppState {
    /// Connect, run migrations, make sure the upload dir and an admin exist
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let upload_dir = PathBuf::from(&config.upload_dir);
        tokio::fs::create_dir_all(&upload_dir).await?;

        bootstrap_admin(&pool, config).await?;

        Ok(Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            rate_limiter: RateLimiter::new(),
            upload_dir,
            public_media_base: config.public_media_base.clone(),
            mega_menu_preview_limit: config.mega_menu_preview_limit,
            default_lang: config.default_lang,
        })
    }

    /// Public URL of an uploaded file
    pub fn media_url(&self, filename: &str) -> String {
        format!("{}/{filename}", self.public_media_base)
    }
}

/// Create the first admin from ADMIN_EMAIL / ADMIN_PASSWORD when none exists
async fn bootstrap_admin(pool: &PgPool, config: &Config) -> Result<(), BoxError> {
    if db::admins::count(pool).await? > 0 {
        return Ok(());
    }

    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        tracing::warn!("No admin account exists; set ADMIN_EMAIL and ADMIN_PASSWORD to create one");
        return Ok(());
    };

    let hash = crate::util::hash_password(password)?;
    let display_name = email.split('@').next().unwrap_or(email);
    db::admins::create(pool, snowflake_id(), email, display_name, &hash, now_millis()).await?;
    tracing::info!(%email, "Bootstrap admin created");
    Ok(())
}
