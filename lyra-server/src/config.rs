//! Server configuration, loaded from environment variables at startup.

use std::str::FromStr;

use strum::{Display, EnumString};

/// Default CORS allow-list used when `LYRA_CORS_ORIGINS` is unset.
pub const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:3000,https://lyra-ai.vercel.app,https://*.vercel.app";

/// Which deployment flavour the service behaves as.
///
/// `Full` runs the complete reply rule chain and issues UUID identifiers.
/// `Simple` echoes every message back and issues millisecond-timestamp
/// identifiers, matching the constrained serverless deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Variant {
    #[default]
    Full,
    Simple,
}

/// Runtime configuration for lyra-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:8000"`).
    pub bind_address: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Reply rules and identifier scheme.
    pub variant: Variant,

    /// Label reported by `/api/health`.
    pub environment: String,

    /// Version string reported by `/api/config`.
    pub app_version: String,

    /// `true` when `VERCEL_ENV` is `"production"`.
    pub is_production: bool,

    /// Region reported by the hosting platform, `"unknown"` when absent.
    pub deployment_region: String,

    /// Comma-separated CORS allow-list. `scheme://*.suffix` entries match
    /// any subdomain.
    pub cors_allowed_origins: String,

    /// sqlx SQLite URL, e.g. `"sqlite://lyra.db"`. `None` keeps history and
    /// memories in process memory.
    pub database_url: Option<String>,

    /// Number of trailing user/assistant exchanges used as reply context.
    pub context_exchanges: usize,

    /// Serve the OpenAPI document at `/api-docs/openapi.json`.
    pub enable_openapi: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build [`Config`] from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        Self {
            bind_address: env_or("LYRA_BIND", "0.0.0.0:8000"),
            log_level: env_or("LYRA_LOG", "info"),
            log_json: lookup("LYRA_LOG_JSON").map(|v| is_truthy(&v)).unwrap_or(false),
            variant: parse_or(&lookup, "LYRA_VARIANT", Variant::Full),
            environment: env_or("LYRA_ENVIRONMENT", "vercel"),
            app_version: env_or("LYRA_APP_VERSION", "1.0.0"),
            is_production: lookup("VERCEL_ENV").is_some_and(|v| v == "production"),
            deployment_region: env_or("VERCEL_REGION", "unknown"),
            cors_allowed_origins: env_or("LYRA_CORS_ORIGINS", DEFAULT_CORS_ORIGINS),
            database_url: lookup("LYRA_DATABASE_URL").filter(|v| !v.trim().is_empty()),
            context_exchanges: parse_or(&lookup, "LYRA_CONTEXT_EXCHANGES", 10),
            enable_openapi: lookup("LYRA_ENABLE_OPENAPI").map(|v| is_truthy(&v)).unwrap_or(true),
        }
    }

    /// Trailing window size in messages (one exchange is two messages).
    pub fn context_window(&self) -> usize {
        self.context_exchanges.saturating_mul(2)
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Debug,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                eprintln!("WARN: {key}='{raw}' is not valid; falling back to {default:?}");
                default
            }
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn config_with(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = Config::default();
        assert_eq!(cfg.bind_address, "0.0.0.0:8000");
        assert_eq!(cfg.variant, Variant::Full);
        assert_eq!(cfg.environment, "vercel");
        assert_eq!(cfg.app_version, "1.0.0");
        assert!(!cfg.is_production);
        assert_eq!(cfg.deployment_region, "unknown");
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.context_window(), 20);
        assert!(cfg.enable_openapi);
    }

    #[test]
    fn production_flag_requires_exact_value() {
        assert!(config_with(&[("VERCEL_ENV", "production")]).is_production);
        assert!(!config_with(&[("VERCEL_ENV", "preview")]).is_production);
    }

    #[test]
    fn variant_is_case_insensitive() {
        assert_eq!(config_with(&[("LYRA_VARIANT", "SIMPLE")]).variant, Variant::Simple);
        assert_eq!(config_with(&[("LYRA_VARIANT", "bogus")]).variant, Variant::Full);
    }

    #[test]
    fn invalid_number_falls_back() {
        let cfg = config_with(&[("LYRA_CONTEXT_EXCHANGES", "many")]);
        assert_eq!(cfg.context_exchanges, 10);
        let cfg = config_with(&[("LYRA_CONTEXT_EXCHANGES", "3")]);
        assert_eq!(cfg.context_window(), 6);
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        assert!(config_with(&[("LYRA_DATABASE_URL", "  ")]).database_url.is_none());
        assert_eq!(
            config_with(&[("LYRA_DATABASE_URL", "sqlite://lyra.db")]).database_url.as_deref(),
            Some("sqlite://lyra.db")
        );
    }
}
