//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `AUTH_JWT_PUBLIC_KEY` - PEM public key (or path to a PEM file) for session tokens
//! - `AUTH_SIGN_IN_URL` - Hosted sign-in page of the identity provider
//! - `AUTH_SIGN_UP_URL` - Hosted sign-up page of the identity provider
//! - `SANITY_PROJECT_ID` or `CONTENT_FIXTURE_PATH` - Catalog source
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_STATIC_DIR` - Static asset directory (default: crates/storefront/static)
//! - `STOREFRONT_DATABASE_URL` / `DATABASE_URL` - `PostgreSQL` connection string
//! - `AUTH_ISSUER` - Expected `iss` claim
//! - `AUTH_AUTHORIZED_PARTIES` - Comma-separated list of accepted `azp` origins
//! - `AUTH_ADMIN_ROLE` - Role claim value granting admin access (default: admin)
//! - `SANITY_DATASET` - Dataset name (default: production)
//! - `SANITY_API_VERSION` - API version date (default: 2025-01-01)
//! - `SANITY_API_TOKEN` - Read token for private datasets
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: Url,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Identity provider settings
    pub auth: AuthConfig,
    /// Catalog source settings
    pub content: ContentConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Identity provider configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// PEM-encoded RSA public key used to verify session tokens
    pub jwt_public_key: String,
    /// Expected token issuer
    pub issuer: Option<String>,
    /// Accepted `azp` values; empty accepts any
    pub authorized_parties: Vec<String>,
    /// Hosted sign-in page
    pub sign_in_url: Url,
    /// Hosted sign-up page
    pub sign_up_url: Url,
    /// Role claim value that grants access to `/admin`
    pub admin_role: String,
}

/// Where the product catalog comes from.
#[derive(Debug, Clone)]
pub enum ContentConfig {
    /// Live content platform
    Sanity(SanityConfig),
    /// JSON file with an array of product documents
    Fixture(PathBuf),
}

/// Content platform configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct SanityConfig {
    /// Project ID (subdomain of the API host)
    pub project_id: String,
    /// Dataset name
    pub dataset: String,
    /// API version date, without the leading `v`
    pub api_version: String,
    /// Read token for private datasets
    pub api_token: Option<SecretString>,
}

impl std::fmt::Debug for SanityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL");
        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_url("STOREFRONT_BASE_URL")?;
        let static_dir = PathBuf::from(get_env_or_default(
            "STOREFRONT_STATIC_DIR",
            "crates/storefront/static",
        ));

        let auth = AuthConfig::from_env()?;
        let content = ContentConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            static_dir,
            auth,
            content,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

impl AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let key = get_required_env("AUTH_JWT_PUBLIC_KEY")?;
        let jwt_public_key = load_pem("AUTH_JWT_PUBLIC_KEY", &key)?;

        Ok(Self {
            jwt_public_key,
            issuer: get_optional_env("AUTH_ISSUER").filter(|s| !s.is_empty()),
            authorized_parties: parse_list(
                &get_optional_env("AUTH_AUTHORIZED_PARTIES").unwrap_or_default(),
            ),
            sign_in_url: get_required_url("AUTH_SIGN_IN_URL")?,
            sign_up_url: get_required_url("AUTH_SIGN_UP_URL")?,
            admin_role: get_env_or_default("AUTH_ADMIN_ROLE", "admin"),
        })
    }
}

impl ContentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        if let Some(project_id) = get_optional_env("SANITY_PROJECT_ID") {
            let api_token = match get_optional_env("SANITY_API_TOKEN") {
                Some(token) => {
                    validate_secret_strength(&token, "SANITY_API_TOKEN")?;
                    Some(SecretString::from(token))
                }
                None => None,
            };
            return Ok(Self::Sanity(SanityConfig {
                project_id,
                dataset: get_env_or_default("SANITY_DATASET", "production"),
                api_version: get_env_or_default("SANITY_API_VERSION", "2025-01-01")
                    .trim_start_matches('v')
                    .to_string(),
                api_token,
            }));
        }

        get_optional_env("CONTENT_FIXTURE_PATH")
            .map(|path| Self::Fixture(PathBuf::from(path)))
            .ok_or_else(|| ConfigError::MissingEnvVar("SANITY_PROJECT_ID".to_string()))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as an absolute URL.
fn get_required_url(key: &str) -> Result<Url, ConfigError> {
    let value = get_required_env(key)?;
    Url::parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|value| !value.is_empty())
        .map(SecretString::from)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Split a comma-separated list, dropping blanks.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Accept an inline PEM (with literal `\n` escapes allowed) or a path to one.
fn load_pem(key: &str, value: &str) -> Result<String, ConfigError> {
    let inline = value.replace("\\n", "\n");
    if inline.trim_start().starts_with("-----BEGIN") {
        return Ok(inline);
    }
    std::fs::read_to_string(value).map_err(|e| {
        ConfigError::InvalidEnvVar(key.to_string(), format!("not a PEM or readable file: {e}"))
    })
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token issued by the content platform."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-token-here", "SANITY_API_TOKEN");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "SANITY_API_TOKEN");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("skQ7vR2mX9pL4tW8nZ3bK6jH1cF5", "SANITY_API_TOKEN");
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_list_trims_and_drops_blanks() {
        assert_eq!(
            parse_list(" https://a.test, ,https://b.test,"),
            vec!["https://a.test".to_string(), "https://b.test".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_load_pem_inline_with_escaped_newlines() {
        let pem = load_pem("K", "-----BEGIN PUBLIC KEY-----\\nABC\\n-----END PUBLIC KEY-----").unwrap();
        assert!(pem.contains("\nABC\n"));
    }

    #[test]
    fn test_load_pem_missing_file() {
        let result = load_pem("K", "/nonexistent/key.pem");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_sanity_config_debug_redacts_token() {
        let config = SanityConfig {
            project_id: "abc123".to_string(),
            dataset: "production".to_string(),
            api_version: "2025-01-01".to_string(),
            api_token: Some(SecretString::from("skSuperPrivateReadToken")),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("abc123"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("skSuperPrivateReadToken"));
        assert_eq!(
            config.api_token.as_ref().unwrap().expose_secret(),
            "skSuperPrivateReadToken"
        );
    }

    #[test]
    fn test_socket_addr_and_https() {
        let config = StorefrontConfig {
            database_url: None,
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: Url::parse("https://shop.example.com").unwrap(),
            static_dir: PathBuf::from("static"),
            auth: AuthConfig {
                jwt_public_key: String::new(),
                issuer: None,
                authorized_parties: Vec::new(),
                sign_in_url: Url::parse("https://accounts.example.com/sign-in").unwrap(),
                sign_up_url: Url::parse("https://accounts.example.com/sign-up").unwrap(),
                admin_role: "admin".to_string(),
            },
            content: ContentConfig::Fixture(PathBuf::from("products.json")),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
        assert!(config.is_https());
    }
}
