use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
}

/// Credentials for the first-boot administrator. Only consulted when no
/// admin account exists yet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminConfig {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub store_timeout: Duration,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = database_url_from_env()?;

        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        anyhow::ensure!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let admin = AdminConfig {
            email: non_empty_var("ADMIN_EMAIL"),
            password: non_empty_var("ADMIN_PASSWORD"),
        };

        let port = std::env::var("PORT")
            .or_else(|_| std::env::var("APP_PORT"))
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);

        Ok(Self {
            database_url,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            store_timeout: Duration::from_secs(
                std::env::var("STORE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(3),
            ),
            jwt: JwtConfig { secret },
            admin,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// `DATABASE_URL` wins; otherwise the URL is assembled from the discrete
/// `POSTGRES_*` variables.
fn database_url_from_env() -> anyhow::Result<String> {
    if let Some(url) = non_empty_var("DATABASE_URL") {
        return Ok(url);
    }

    let host = non_empty_var("POSTGRES_HOST")
        .context("either DATABASE_URL or POSTGRES_HOST must be set")?;
    let port = non_empty_var("POSTGRES_PORT").unwrap_or_else(|| "5432".into());
    let user = non_empty_var("POSTGRES_USER").context("POSTGRES_USER must be set")?;
    let password = std::env::var("POSTGRES_PASSWORD").unwrap_or_default();
    let db = non_empty_var("POSTGRES_DB").context("POSTGRES_DB must be set")?;

    Ok(compose_database_url(&host, &port, &user, &password, &db))
}

fn compose_database_url(host: &str, port: &str, user: &str, password: &str, db: &str) -> String {
    if password.is_empty() {
        format!("postgres://{user}@{host}:{port}/{db}")
    } else {
        format!("postgres://{user}:{password}@{host}:{port}/{db}")
    }
}
