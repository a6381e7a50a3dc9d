use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};
use validator::{Validate, ValidationError};

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";

/// Application configuration with validation.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,

    /// JWT secret key (minimum 64 characters)
    #[validate(length(min = 64), custom = "validate_jwt_secret")]
    pub jwt_secret: String,

    /// JWT expiration time in seconds
    pub jwt_expiration: usize,

    /// Server host address
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to create missing tables on startup
    #[serde(default = "default_true_bool")]
    pub auto_migrate: bool,

    /// CORS: comma-separated list of allowed origins (production)
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// Allow permissive CORS fallback outside development
    #[serde(default)]
    pub cors_allow_any_origin: bool,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// DB pool: min connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// Username for the seeded admin account
    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    /// Password for the seeded admin account
    #[serde(default = "default_admin_password")]
    pub admin_password: String,

    /// JWT issuer claim
    #[serde(default = "default_auth_issuer")]
    pub auth_issuer: String,

    /// JWT audience claim
    #[serde(default = "default_auth_audience")]
    pub auth_audience: String,
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    pub fn should_allow_permissive_cors(&self) -> bool {
        self.is_development() || self.cors_allow_any_origin
    }

    pub fn has_cors_allowed_origins(&self) -> bool {
        self.cors_allowed_origins
            .as_deref()
            .map(|raw| raw.split(',').any(|origin| !origin.trim().is_empty()))
            .unwrap_or(false)
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Constraints that span multiple fields.
    pub fn validate_additional_constraints(&self) -> Result<(), ValidationError> {
        if !self.should_allow_permissive_cors() && !self.has_cors_allowed_origins() {
            let mut err = ValidationError::new("cors_allowed_origins");
            err.message = Some(
                "Set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true outside development"
                    .into(),
            );
            return Err(err);
        }
        if !self.is_development() && self.admin_password == default_admin_password() {
            let mut err = ValidationError::new("admin_password");
            err.message = Some("Override APP__ADMIN_PASSWORD outside development".into());
            return Err(err);
        }
        Ok(())
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_true_bool() -> bool {
    true
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_db_min_connections() -> u32 {
    1
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "admin@local".to_string()
}

fn default_auth_issuer() -> String {
    "garmentflow-api".to_string()
}

fn default_auth_audience() -> String {
    "garmentflow-app".to_string()
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

fn validate_jwt_secret(secret: &str) -> Result<(), ValidationError> {
    let trimmed = secret.trim();

    if trimmed.len() < 64 {
        let mut err = ValidationError::new("jwt_secret");
        err.message = Some("JWT secret must be at least 64 characters".into());
        return Err(err);
    }

    const DISALLOWED: [&str; 3] = [
        "CHANGE_THIS_SECRET_IN_PRODUCTION",
        "your-secret-key",
        "default-secret-key",
    ];
    if DISALLOWED
        .iter()
        .any(|&bad| trimmed.eq_ignore_ascii_case(bad))
    {
        let mut err = ValidationError::new("jwt_secret");
        err.message = Some("JWT secret must be overridden with a secure random value".into());
        return Err(err);
    }

    let unique_chars: std::collections::HashSet<char> = trimmed.chars().collect();
    if unique_chars.len() < 10 {
        let mut err = ValidationError::new("jwt_secret");
        err.message = Some("JWT secret must have at least 10 unique characters".into());
        return Err(err);
    }

    Ok(())
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("configuration load error: {0}")]
    Load(#[from] ConfigError),
    #[error("configuration validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("configuration constraint error: {0}")]
    Constraint(#[from] ValidationError),
}

/// Initializes the tracing subscriber. RUST_LOG overrides the configured
/// level when set.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::fmt;

    let default_directive = format!("garmentflow_api={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt().with_env_filter(filter_directive).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter_directive).try_init();
    }
}

/// Loads application configuration.
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. `config/default.toml`
/// 3. `config/{env}.toml` selected by RUN_ENV / APP_ENV
/// 4. Environment variables (`APP__*`)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    // jwt_secret has no built-in default. It must come from a config file or
    // the APP__JWT_SECRET environment variable.
    let config = Config::builder()
        .set_default("database_url", "sqlite://garmentflow.db?mode=rwc")?
        .set_default("jwt_expiration", 3600)?
        .set_default("host", "0.0.0.0")?
        .set_default("port", DEFAULT_PORT as i64)?
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    if config.get_string("jwt_secret").is_err() {
        error!("JWT secret is not configured. Set APP__JWT_SECRET with a secure random string (minimum 64 characters).");
        return Err(AppConfigError::Load(ConfigError::NotFound(
            "jwt_secret is required but not configured".into(),
        )));
    }

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    app_config.validate_additional_constraints().map_err(|e| {
        error!("Configuration constraint check failed: {:?}", e);
        AppConfigError::Constraint(e)
    })?;

    if app_config.is_development() && app_config.admin_password == default_admin_password() {
        warn!("Using the default admin password; override APP__ADMIN_PASSWORD before exposing the service");
    }

    info!("Configuration loaded successfully");
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) const TEST_JWT_SECRET: &str =
        "unit-test-secret-0123456789-abcdefghijklmnopqrstuvwxyz-ABCDEFGHIJKLMNOP";

    fn base_config() -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".into(),
            jwt_secret: TEST_JWT_SECRET.into(),
            jwt_expiration: 3600,
            host: "127.0.0.1".into(),
            port: 8080,
            environment: "production".into(),
            log_level: "info".into(),
            log_json: false,
            auto_migrate: true,
            cors_allowed_origins: None,
            cors_allow_any_origin: false,
            db_max_connections: 10,
            db_min_connections: 1,
            admin_username: "admin".into(),
            admin_password: "not-the-default".into(),
            auth_issuer: default_auth_issuer(),
            auth_audience: default_auth_audience(),
        }
    }

    #[test]
    fn non_dev_requires_cors_origins() {
        let cfg = base_config();
        assert!(cfg.validate_additional_constraints().is_err());
    }

    #[test]
    fn non_dev_allows_override_flag() {
        let mut cfg = base_config();
        cfg.cors_allow_any_origin = true;
        assert!(cfg.validate_additional_constraints().is_ok());
    }

    #[test]
    fn non_dev_with_origins_passes() {
        let mut cfg = base_config();
        cfg.cors_allowed_origins = Some("https://example.com".into());
        assert!(cfg.validate_additional_constraints().is_ok());
    }

    #[test]
    fn development_allows_permissive_by_default() {
        let mut cfg = base_config();
        cfg.environment = "development".into();
        assert!(cfg.validate_additional_constraints().is_ok());
    }

    #[test]
    fn non_dev_rejects_default_admin_password() {
        let mut cfg = base_config();
        cfg.cors_allow_any_origin = true;
        cfg.admin_password = default_admin_password();
        assert!(cfg.validate_additional_constraints().is_err());
    }

    #[test]
    fn weak_jwt_secrets_are_rejected() {
        assert!(validate_jwt_secret("short").is_err());
        let repeated = "a".repeat(80);
        assert!(validate_jwt_secret(&repeated).is_err());
        assert!(validate_jwt_secret(TEST_JWT_SECRET).is_ok());
    }
}
