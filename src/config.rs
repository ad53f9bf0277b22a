use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` runs against the in-process store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub store_timeout: Duration,
    pub log_level: String,
    pub password: PasswordConfig,
    /// Admin account created at startup if its email is not yet registered.
    pub admin: Option<AdminSeed>,
}

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

/// Argon2id cost parameters. Used for every hash the service computes,
/// on registration and on password change alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let jwt_secret = env_required("JWT_SECRET")?;

        let token_ttl_minutes: i64 = env_or("CATS_TOKEN_TTL_MINUTES", "60")
            .parse()
            .map_err(|e| format!("Invalid CATS_TOKEN_TTL_MINUTES: {e}"))?;

        let host: IpAddr = env_or("CATS_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid CATS_HOST: {e}"))?;

        let port: u16 = env_or("CATS_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid CATS_PORT: {e}"))?;

        let max_body_size: usize = env_or("CATS_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid CATS_MAX_BODY_SIZE: {e}"))?;

        let store_timeout_secs: u64 = env_or("CATS_STORE_TIMEOUT_SECS", "5")
            .parse()
            .map_err(|e| format!("Invalid CATS_STORE_TIMEOUT_SECS: {e}"))?;

        let log_level = env_or("CATS_LOG_LEVEL", "info");

        let defaults = PasswordConfig::default();
        let password = PasswordConfig {
            memory_kib: env_parse_or("CATS_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: env_parse_or("CATS_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: env_parse_or("CATS_HASH_PARALLELISM", defaults.parallelism)?,
        };

        let admin = match std::env::var("CATS_ADMIN_EMAIL") {
            Ok(email) if !email.trim().is_empty() => Some(AdminSeed {
                user_name: env_or("CATS_ADMIN_NAME", "admin"),
                email,
                password: env_required("CATS_ADMIN_PASSWORD")?,
            }),
            _ => None,
        };

        Ok(Config {
            database_url,
            jwt_secret,
            token_ttl: chrono::Duration::minutes(token_ttl_minutes),
            host,
            port,
            max_body_size,
            store_timeout: Duration::from_secs(store_timeout_secs),
            log_level,
            password,
            admin,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or(key: &str, default: u32) -> Result<u32, String> {
    match std::env::var(key) {
        Ok(value) => value.parse().map_err(|e| format!("Invalid {key}: {e}")),
        Err(_) => Ok(default),
    }
}
