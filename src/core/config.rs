use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub swagger: SwaggerConfig,
    pub minio: MinIOConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// MinIO/S3 storage configuration for category and product images
#[derive(Debug, Clone)]
pub struct MinIOConfig {
    /// MinIO/S3 endpoint URL
    pub endpoint: String,
    /// Public endpoint URL used in canonical image URLs (defaults to endpoint)
    pub public_endpoint: String,
    /// Access key for authentication
    pub access_key: String,
    /// Secret key for authentication
    pub secret_key: String,
    /// Bucket name for storing images
    pub bucket: String,
    /// AWS region (for S3 compatibility)
    pub region: String,
    /// Prefix under which all images are stored and publicly readable
    pub public_prefix: String,
    /// Timeout for fetching remote image sources
    pub image_fetch_timeout: Duration,
    /// Allow remote image sources on loopback, private or link-local addresses
    pub allow_private_image_hosts: bool,
}

/// Catalog read settings
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Number of products returned by search when no limit is given
    pub search_default_limit: i64,
}

impl Config {
    /// Read every section from the process environment
    ///
    /// `.env` is loaded once by the binary before this is called.
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            minio: MinIOConfig::from_env()?,
            catalog: CatalogConfig::from_env()?,
        })
    }
}

/// Value of `key`, or `default` when unset
fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse `key` as `T`, falling back to `default` when unset
fn parse_var<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} has an invalid value: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated origin list, dropping empty entries
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl AppConfig {
    /// Inline base64 images grow by a third; 15 MB leaves room for a 10 MB image
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 15 * 1024 * 1024;

    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            host: var_or("HOST", "127.0.0.1"),
            port: parse_var("PORT", 3000u16)?,
            cors_allowed_origins: parse_origins(&var_or("CORS_ALLOWED_ORIGINS", "*")),
            max_request_body_size: parse_var(
                "MAX_REQUEST_BODY_SIZE",
                Self::DEFAULT_MAX_REQUEST_BODY_SIZE,
            )?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        Ok(Self {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS", 10)?,
            min_connections: parse_var("DB_MIN_CONNECTIONS", 1)?,
            acquire_timeout_secs: parse_var("DB_ACQUIRE_TIMEOUT_SECS", 5)?,
            idle_timeout_secs: parse_var("DB_IDLE_TIMEOUT_SECS", 600)?,
            max_lifetime_secs: parse_var("DB_MAX_LIFETIME_SECS", 1800)?,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            // Empty values disable basic auth
            username: env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty()),
            password: env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty()),
            title: var_or("SWAGGER_TITLE", "LIPCI Storefront API"),
            version: var_or("SWAGGER_VERSION", env!("CARGO_PKG_VERSION")),
            description: var_or(
                "SWAGGER_DESCRIPTION",
                "Storefront and dashboard API for LIPCI",
            ),
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl MinIOConfig {
    pub fn from_env() -> Result<Self, String> {
        let endpoint = var_or("MINIO_ENDPOINT", "http://localhost:9000");
        let public_endpoint = var_or("MINIO_PUBLIC_ENDPOINT", &endpoint);

        Ok(Self {
            endpoint,
            public_endpoint,
            access_key: var_or("MINIO_ACCESS_KEY", "minioadmin"),
            secret_key: var_or("MINIO_SECRET_KEY", "minioadmin"),
            bucket: var_or("MINIO_BUCKET", "lipci-images"),
            region: var_or("MINIO_REGION", "us-east-1"),
            public_prefix: var_or("MINIO_PUBLIC_PREFIX", "public"),
            image_fetch_timeout: Duration::from_secs(parse_var("IMAGE_FETCH_TIMEOUT_SECS", 15)?),
            allow_private_image_hosts: parse_var("IMAGE_FETCH_ALLOW_PRIVATE_HOSTS", false)?,
        })
    }
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self, String> {
        let search_default_limit = parse_var("SEARCH_DEFAULT_LIMIT", DEFAULT_PAGE_SIZE)?;
        if !(1..=MAX_PAGE_SIZE).contains(&search_default_limit) {
            return Err(format!(
                "SEARCH_DEFAULT_LIMIT must be between 1 and {}",
                MAX_PAGE_SIZE
            ));
        }

        Ok(Self {
            search_default_limit,
        })
    }
}
