//! Client configuration, built in code or loaded from the environment.

use std::env;
use std::fmt;
use std::time::Duration;

use serde_json::json;
use tracing::Level;
use url::Url;
use vpos_types::{
    DEFAULT_MIN_AMOUNT, Environment, GatewayError, HttpMethod, Language, ValidationCode,
};

/// ISO 4217 numeric code used when none is configured.
pub const DEFAULT_CURRENCY: &str = "051";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Prefix used by [`ClientConfig::from_env`].
pub const DEFAULT_ENV_PREFIX: &str = "VPOS_";

/// Whether, and how verbosely, the transport emits `tracing` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    pub enabled: bool,
    /// Most verbose level that is still emitted
    pub level: Level,
}

impl LogConfig {
    /// Development logs everything from DEBUG up; production only warnings and errors.
    pub fn for_environment(environment: Environment) -> Self {
        if environment.is_production() {
            Self {
                enabled: true,
                level: Level::WARN,
            }
        } else {
            Self {
                enabled: true,
                level: Level::DEBUG,
            }
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            level: Level::ERROR,
        }
    }

    pub fn allows(&self, level: Level) -> bool {
        self.enabled && level <= self.level
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

/// Immutable settings of one gateway client.
#[derive(Clone)]
pub struct ClientConfig {
    pub login: String,
    pub secret: String,
    pub terminal_id: String,
    pub base_url: String,
    pub language: Language,
    /// ISO 4217 numeric currency code
    pub currency: String,
    pub http_method: HttpMethod,
    pub timeout: Duration,
    /// Minimum accepted amount, in major units
    pub min_amount: u64,
    pub environment: Environment,
    pub log: LogConfig,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("login", &"[REDACTED]")
            .field("secret", &"[REDACTED]")
            .field("terminal_id", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field("currency", &self.currency)
            .field("http_method", &self.http_method)
            .field("timeout", &self.timeout)
            .field("min_amount", &self.min_amount)
            .field("environment", &self.environment)
            .field("log", &self.log)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a configuration with every optional setting at its default.
    pub fn new(
        login: impl Into<String>,
        secret: impl Into<String>,
        terminal_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let environment = Environment::default();
        Self {
            login: login.into(),
            secret: secret.into(),
            terminal_id: terminal_id.into(),
            base_url: base_url.into(),
            language: Language::default(),
            currency: DEFAULT_CURRENCY.to_string(),
            http_method: HttpMethod::default(),
            timeout: DEFAULT_TIMEOUT,
            min_amount: DEFAULT_MIN_AMOUNT,
            environment,
            log: LogConfig::for_environment(environment),
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_http_method(mut self, method: HttpMethod) -> Self {
        self.http_method = method;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_min_amount(mut self, min_amount: u64) -> Self {
        self.min_amount = min_amount;
        self
    }

    /// Sets the environment and resets logging to its defaults.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self.log = LogConfig::for_environment(environment);
        self
    }

    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Checks required settings and the base address.
    pub fn validate(&self) -> Result<(), GatewayError> {
        let missing: Vec<String> = [
            ("login", &self.login),
            ("secret", &self.secret),
            ("terminal_id", &self.terminal_id),
            ("base_url", &self.base_url),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name.to_string())
        .collect();

        if !missing.is_empty() {
            return Err(GatewayError::Config { missing });
        }

        Url::parse(&self.base_url).map_err(|e| {
            GatewayError::validation_with(
                ValidationCode::InvalidFormat,
                format!("Invalid base URL: {e}"),
                json!({ "field": "base_url" }),
            )
        })?;

        Ok(())
    }

    /// Loads configuration from `VPOS_*` environment variables.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_env_with_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Loads configuration from environment variables named `{prefix}LOGIN` etc.
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, GatewayError> {
        Self::from_lookup(prefix, |name| env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// All missing required variables are reported together.
    pub fn from_lookup(
        prefix: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, GatewayError> {
        let var = |name: &str| {
            lookup(&format!("{prefix}{name}")).filter(|value| !value.trim().is_empty())
        };

        let mut missing = Vec::new();
        let mut required = |name: &str| {
            let value = var(name);
            if value.is_none() {
                missing.push(format!("{prefix}{name}"));
            }
            value.unwrap_or_default()
        };

        let login = required("LOGIN");
        let secret = required("SECRET");
        let terminal_id = required("TERMINAL_ID");
        let base_url = required("BASE_URL");

        if !missing.is_empty() {
            return Err(GatewayError::Config { missing });
        }

        let mut config = Self::new(login, secret, terminal_id, base_url);

        if let Some(value) = var("ENVIRONMENT") {
            config = config.with_environment(parse_var(prefix, "ENVIRONMENT", &value)?);
        }
        if let Some(value) = var("LANGUAGE") {
            config.language = parse_var(prefix, "LANGUAGE", &value)?;
        }
        if let Some(value) = var("CURRENCY") {
            config.currency = value.trim().to_string();
        }
        if let Some(value) = var("HTTP_METHOD") {
            config.http_method = parse_var(prefix, "HTTP_METHOD", &value)?;
        }
        if let Some(value) = var("TIMEOUT_MS") {
            config.timeout = Duration::from_millis(parse_var(prefix, "TIMEOUT_MS", &value)?);
        }
        if let Some(value) = var("MIN_AMOUNT") {
            config.min_amount = parse_var(prefix, "MIN_AMOUNT", &value)?;
        }
        if let Some(value) = var("LOG_ENABLED") {
            config.log.enabled = parse_var(prefix, "LOG_ENABLED", &value)?;
        }
        if let Some(value) = var("LOG_LEVEL") {
            config.log.level = parse_var(prefix, "LOG_LEVEL", &value)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_var<T>(prefix: &str, name: &str, value: &str) -> Result<T, GatewayError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| {
        GatewayError::validation_with(
            ValidationCode::InvalidFormat,
            format!("Invalid value for {prefix}{name}: {e}"),
            json!({ "variable": format!("{prefix}{name}"), "value": value }),
        )
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("shop", "secret", "T1", "https://gw.example.com");
        assert_eq!(config.language, Language::En);
        assert_eq!(config.currency, "051");
        assert_eq!(config.http_method, HttpMethod::Post);
        assert_eq!(config.timeout_ms(), 30_000);
        assert_eq!(config.min_amount, 50);
        assert!(config.log.allows(Level::DEBUG));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_logging_is_quieter() {
        let config = ClientConfig::new("shop", "secret", "T1", "https://gw.example.com")
            .with_environment(Environment::Production);
        assert!(config.log.allows(Level::WARN));
        assert!(config.log.allows(Level::ERROR));
        assert!(!config.log.allows(Level::INFO));
        assert!(!LogConfig::disabled().allows(Level::ERROR));
    }

    #[test]
    fn test_debug_hides_credentials() {
        let config = ClientConfig::new("shop", "hunter2", "T-777", "https://gw.example.com");
        let printed = format!("{config:?}");
        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("T-777"));
        assert!(printed.contains("https://gw.example.com"));
    }

    #[test]
    fn test_from_lookup_reports_every_missing_variable() {
        let err = ClientConfig::from_lookup("VPOS_", lookup(&[("VPOS_LOGIN", "shop")])).unwrap_err();
        match err {
            GatewayError::Config { missing } => assert_eq!(
                missing,
                vec!["VPOS_SECRET", "VPOS_TERMINAL_ID", "VPOS_BASE_URL"]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_lookup_with_custom_prefix_and_options() {
        let config = ClientConfig::from_lookup(
            "SHOP_PAY_",
            lookup(&[
                ("SHOP_PAY_LOGIN", "shop"),
                ("SHOP_PAY_SECRET", "secret"),
                ("SHOP_PAY_TERMINAL_ID", "T1"),
                ("SHOP_PAY_BASE_URL", "https://gw.example.com"),
                ("SHOP_PAY_LANGUAGE", "ru"),
                ("SHOP_PAY_HTTP_METHOD", "get"),
                ("SHOP_PAY_TIMEOUT_MS", "5000"),
                ("SHOP_PAY_ENVIRONMENT", "production"),
                ("SHOP_PAY_LOG_LEVEL", "info"),
            ]),
        )
        .unwrap();

        assert_eq!(config.language, Language::Ru);
        assert_eq!(config.http_method, HttpMethod::Get);
        assert_eq!(config.timeout_ms(), 5000);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.log.level, Level::INFO);
    }

    #[test]
    fn test_from_lookup_rejects_malformed_optional_values() {
        let err = ClientConfig::from_lookup(
            "VPOS_",
            lookup(&[
                ("VPOS_LOGIN", "shop"),
                ("VPOS_SECRET", "secret"),
                ("VPOS_TERMINAL_ID", "T1"),
                ("VPOS_BASE_URL", "https://gw.example.com"),
                ("VPOS_TIMEOUT_MS", "soon"),
            ]),
        )
        .unwrap_err();
        assert_eq!(err.validation_code(), Some(ValidationCode::InvalidFormat));
        assert!(err.to_string().contains("VPOS_TIMEOUT_MS"));
    }

    #[test]
    fn test_validate_rejects_blank_and_bad_url() {
        let blank = ClientConfig::new("", "secret", "T1", "https://gw.example.com");
        assert!(matches!(blank.validate(), Err(GatewayError::Config { .. })));

        let bad_url = ClientConfig::new("shop", "secret", "T1", "gw.example.com");
        assert_eq!(
            bad_url.validate().unwrap_err().validation_code(),
            Some(ValidationCode::InvalidFormat)
        );
    }
}
