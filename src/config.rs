/*
 * Responsibility
 * - Read settings from the environment (.env supported via dotenvy)
 * - Validate them up front: a bad pattern or proxy list fails start-up
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::middleware::auth::{PathPolicy, TrustedProxies};
use crate::middleware::http::HttpLimits;

const DEFAULT_EXCEPT_PATHS: &str = "^/health$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub path_policy: PathPolicy,
    /// Account used when a credential is signed by `own`.
    pub own_account: Option<String>,
    pub trusted_proxies: TrustedProxies,

    pub token_signers_file: Option<PathBuf>,
    pub token_max_age_seconds: u64,
    pub token_clock_leeway_seconds: u64,

    pub http_limits: HttpLimits,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let except = pattern_list(
            &lookup("AUTH_EXCEPT_PATHS").unwrap_or_else(|| DEFAULT_EXCEPT_PATHS.to_string()),
        );
        let optional = pattern_list(&lookup("AUTH_OPTIONAL_PATHS").unwrap_or_default());
        let path_policy = PathPolicy::from_patterns(&except, &optional).map_err(|e| {
            tracing::error!(error = %e, "invalid auth path pattern");
            ConfigError::Invalid("AUTH_EXCEPT_PATHS / AUTH_OPTIONAL_PATHS")
        })?;

        let own_account = ["CONJUR_ACCOUNT", "OWN_ACCOUNT"]
            .into_iter()
            .filter_map(|key| lookup(key))
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty());

        let trusted_proxies = match lookup("TRUSTED_PROXIES") {
            Some(list) => TrustedProxies::parse_list(&list).map_err(|e| {
                tracing::error!(error = %e, "invalid trusted proxy list");
                ConfigError::Invalid("TRUSTED_PROXIES")
            })?,
            None => TrustedProxies::default(),
        };

        let token_signers_file = lookup("TOKEN_SIGNERS_FILE")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        // Without signer keys every credential is rejected; only tolerated in development.
        if app_env.is_production() && token_signers_file.is_none() {
            return Err(ConfigError::Missing("TOKEN_SIGNERS_FILE"));
        }

        let token_max_age_seconds = parse_or(&lookup, "TOKEN_MAX_AGE_SECONDS", 480)?;
        let token_clock_leeway_seconds = parse_or(&lookup, "TOKEN_CLOCK_LEEWAY_SECONDS", 30)?;

        let http_limits = HttpLimits {
            body_limit_bytes: parse_or(&lookup, "HTTP_BODY_LIMIT_BYTES", 1024 * 1024)?,
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "HTTP_REQUEST_TIMEOUT_SECONDS",
                30,
            )?),
        };

        Ok(Self {
            addr,
            app_env,
            path_policy,
            own_account,
            trusted_proxies,
            token_signers_file,
            token_max_age_seconds,
            token_clock_leeway_seconds,
            http_limits,
        })
    }
}

// Regexes may contain ',' (`{1,2}`), so path lists are whitespace-separated.
fn pattern_list(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
