//! Storefront server configuration

use shared::i18n::Lang;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Storefront server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Max pooled connections
    pub db_max_connections: u32,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT secret for admin authentication
    pub jwt_secret: String,
    /// Directory for uploaded media
    pub upload_dir: String,
    /// URL prefix uploaded media is served under
    pub public_media_base: String,
    /// Preview products per mega-menu column
    pub mega_menu_preview_limit: usize,
    /// Language used when a request names none
    pub default_lang: Lang,
    /// Allowed CORS origins (empty = any)
    pub cors_allowed_origins: Vec<String>,
    /// Bootstrap admin, created when the admins table is empty
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    /// Rolling log file directory
    pub log_dir: Option<String>,
    /// `json` switches the log formatter
    pub log_format: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            db_max_connections: parse_env("DB_MAX_CONNECTIONS").unwrap_or(10),
            http_port: parse_env("HTTP_PORT").unwrap_or(8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            environment,
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()),
            public_media_base: std::env::var("PUBLIC_MEDIA_BASE")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "/media".into()),
            mega_menu_preview_limit: parse_env("MEGA_MENU_PREVIEW_LIMIT").unwrap_or(6),
            default_lang: std::env::var("DEFAULT_LANG")
                .ok()
                .and_then(|l| Lang::parse(&l))
                .unwrap_or_default(),
            cors_allowed_origins: parse_list(
                &std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
            ),
            admin_email: std::env::var("ADMIN_EMAIL").ok().filter(|s| !s.is_empty()),
            admin_password: std::env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            log_format: std::env::var("LOG_FORMAT").ok(),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Comma-separated list, blanks dropped
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list(" https://a.com, ,https://b.com "),
            vec!["https://a.com", "https://b.com"]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_require_secret_in_development() {
        let val = Config::require_secret("STOREFRONT_TEST_UNSET_SECRET", "development").unwrap();
        assert!(val.starts_with("dev-"));
        assert!(Config::require_secret("STOREFRONT_TEST_UNSET_SECRET", "production").is_err());
    }
}
