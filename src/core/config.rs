use std::env;
use std::fmt;
use std::time::Duration;

use crate::shared::validation::IDENTIFIER_REGEX;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub store: StoreConfig,
    pub database: Option<DatabaseConfig>,
    pub admin_auth: AdminAuthConfig,
    pub swagger: SwaggerConfig,
}

/// Deployment environment, mirrors the dev/qua/pro split of the catalog projects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Dev,
    Qua,
    Pro,
}

impl AppEnvironment {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "qua" => Ok(Self::Qua),
            "pro" => Ok(Self::Pro),
            other => Err(format!("Invalid APP_ENV: {} (expected dev, qua or pro)", other)),
        }
    }

    /// Log filter used when RUST_LOG is not set
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Self::Dev => "debug",
            Self::Qua => "info",
            Self::Pro => "warn",
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dev => write!(f, "dev"),
            Self::Qua => write!(f, "qua"),
            Self::Pro => write!(f, "pro"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

/// Which backend holds the works tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub schema: String,
    pub works_table: String,
    pub categories_table: String,
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

#[derive(Clone)]
pub struct AdminAuthConfig {
    pub password: String,
    pub token_secret: String,
    pub token_ttl: Duration,
}

impl fmt::Debug for AdminAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminAuthConfig")
            .field("password", &"<redacted>")
            .field("token_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        let store = StoreConfig::from_env()?;
        let database = match store.backend {
            StoreBackend::Postgres => Some(DatabaseConfig::from_env()?),
            StoreBackend::Memory => None,
        };

        Ok(Config {
            app: AppConfig::from_env()?,
            store,
            database,
            admin_auth: AdminAuthConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let environment = AppEnvironment::parse(
            &env::var("APP_ENV")
                .or_else(|_| env::var("ENVIRONMENT"))
                .unwrap_or_else(|_| "dev".to_string()),
        )?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            environment,
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StoreConfig {
    const DEFAULT_SCHEMA: &'static str = "settings";
    const DEFAULT_WORKS_TABLE: &'static str = "works_index";
    const DEFAULT_CATEGORIES_TABLE: &'static str = "works_categories";

    pub fn from_env() -> Result<Self, String> {
        let backend = match env::var("WORKS_STORE")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" => StoreBackend::Postgres,
            "memory" => StoreBackend::Memory,
            other => {
                return Err(format!(
                    "Invalid WORKS_STORE: {} (expected postgres or memory)",
                    other
                ))
            }
        };

        let schema = identifier_var("WORKS_SCHEMA", Self::DEFAULT_SCHEMA)?;
        let works_table = identifier_var("WORKS_TABLE", Self::DEFAULT_WORKS_TABLE)?;
        let categories_table =
            identifier_var("WORKS_CATEGORIES_TABLE", Self::DEFAULT_CATEGORIES_TABLE)?;

        Ok(Self {
            backend,
            schema,
            works_table,
            categories_table,
        })
    }

    /// Schema-qualified name of the works table
    pub fn works_table_ref(&self) -> String {
        format!("{}.{}", self.schema, self.works_table)
    }

    /// Schema-qualified name of the categories lookup table
    pub fn categories_table_ref(&self) -> String {
        format!("{}.{}", self.schema, self.categories_table)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            schema: Self::DEFAULT_SCHEMA.to_string(),
            works_table: Self::DEFAULT_WORKS_TABLE.to_string(),
            categories_table: Self::DEFAULT_CATEGORIES_TABLE.to_string(),
        }
    }
}

/// Table and schema names are interpolated into SQL, so only plain identifiers are accepted
fn identifier_var(key: &str, default: &str) -> Result<String, String> {
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    if !IDENTIFIER_REGEX.is_match(&value) {
        return Err(format!("{} must be a plain SQL identifier, got '{}'", key, value));
    }
    Ok(value)
}

impl DatabaseConfig {
    // Default values for database connection pool (conservative defaults for small-medium apps)
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl AdminAuthConfig {
    const DEFAULT_TOKEN_TTL_SECS: u64 = 3600; // 1 hour

    pub fn from_env() -> Result<Self, String> {
        let password = env::var("ADMIN_PASSWORD")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "ADMIN_PASSWORD environment variable is required".to_string())?;

        let token_secret = env::var("ADMIN_TOKEN_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "ADMIN_TOKEN_SECRET environment variable is required".to_string())?;

        let token_ttl_secs = env::var("ADMIN_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TOKEN_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "ADMIN_TOKEN_TTL_SECS must be a valid number".to_string())?;

        Ok(Self {
            password,
            token_secret,
            token_ttl: Duration::from_secs(token_ttl_secs),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Works Index API".to_string());
        let version =
            env::var("SWAGGER_VERSION").unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Catalog of data analysis works".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
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
