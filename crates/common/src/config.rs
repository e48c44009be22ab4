//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Anti-abuse verification configuration.
    pub captcha: CaptchaConfig,
    /// Email delivery configuration.
    pub email: EmailConfig,
    /// Notification recipient configuration.
    pub notifications: NotificationConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Anti-abuse verification configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptchaConfig {
    /// Whether verification is enforced. When disabled, submissions are
    /// accepted without contacting the provider.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Provider verification endpoint.
    #[serde(default = "default_captcha_verify_url")]
    pub verify_url: String,
    /// Shared secret for the provider.
    #[serde(default)]
    pub secret: String,
    /// Minimum passing score, inclusive.
    #[serde(default = "default_captcha_threshold")]
    pub score_threshold: f64,
}

/// Email delivery configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Whether outbound email is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Delivery provider: `smtp` or `brevo`.
    #[serde(default = "default_email_provider")]
    pub provider: String,
    /// From address for all outbound mail.
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// From display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// SMTP relay host.
    #[serde(default)]
    pub smtp_host: Option<String>,
    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: Option<String>,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: Option<String>,
    /// Brevo API key.
    #[serde(default)]
    pub brevo_api_key: Option<String>,
}

/// Notification recipient configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Back-office mailbox receiving new-submission notices.
    #[serde(default)]
    pub admin_address: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_true() -> bool {
    true
}

fn default_captcha_verify_url() -> String {
    "https://www.google.com/recaptcha/api/siteverify".to_string()
}

const fn default_captcha_threshold() -> f64 {
    0.5
}

fn default_email_provider() -> String {
    "smtp".to_string()
}

fn default_from_address() -> String {
    "noreply@markethall.example".to_string()
}

fn default_from_name() -> String {
    "Markethall".to_string()
}

const fn default_smtp_port() -> u16 {
    587
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `MARKETHALL_ENV`)
    /// 3. Environment variables with `MARKETHALL_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("MARKETHALL_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("MARKETHALL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("MARKETHALL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
