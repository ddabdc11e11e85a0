use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "CardioCheck";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bind address for the analysis server.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

/// OpenAI-compatible chat completions gateway.
pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";

/// Model requested from the gateway unless overridden.
pub const DEFAULT_GATEWAY_MODEL: &str = "google/gemini-3-pro-preview";

/// Environment variable holding the gateway bearer key.
pub const GATEWAY_KEY_ENV: &str = "AI_GATEWAY_API_KEY";

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "cardiocheck_lib=info,cardiocheck=info,tower_http=warn"
}

/// Get the application data directory
/// ~/CardioCheck/ unless `CARDIOCHECK_DATA_DIR` points elsewhere.
pub fn app_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CARDIOCHECK_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_NAME)
}

/// Directory holding the local session blobs (profile, history).
pub fn session_dir() -> PathBuf {
    app_data_dir().join("session")
}

/// SQLite file backing the feedback board.
pub fn feedback_db_path() -> PathBuf {
    app_data_dir().join("feedback.db")
}

/// Connection settings for the text-generation gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub url: String,
    pub model: String,
    /// `None` is not a startup error; each analysis request fails instead.
    pub api_key: Option<String>,
    /// `None` leaves the transport default in place.
    pub timeout_secs: Option<u64>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_GATEWAY_URL.to_string(),
            model: DEFAULT_GATEWAY_MODEL.to_string(),
            api_key: None,
            timeout_secs: None,
        }
    }
}

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub gateway: GatewayConfig,
    pub feedback_db: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid bind address {value}: {reason}")]
    InvalidBindAddr { value: String, reason: String },
    #[error("Invalid value for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from any name → value lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup("CARDIOCHECK_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBindAddr {
                value: bind.clone(),
                reason: e.to_string(),
            })?;

        let timeout_secs = match lookup("CARDIOCHECK_GATEWAY_TIMEOUT_SECS") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                ConfigError::InvalidNumber {
                    name: "CARDIOCHECK_GATEWAY_TIMEOUT_SECS",
                    value: raw.clone(),
                }
            })?),
            None => None,
        };

        let gateway = GatewayConfig {
            url: lookup("AI_GATEWAY_URL").unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string()),
            model: lookup("AI_GATEWAY_MODEL").unwrap_or_else(|| DEFAULT_GATEWAY_MODEL.to_string()),
            api_key: lookup(GATEWAY_KEY_ENV).filter(|k| !k.trim().is_empty()),
            timeout_secs,
        };

        let feedback_db = lookup("CARDIOCHECK_DATA_DIR")
            .map(|dir| PathBuf::from(dir).join("feedback.db"))
            .unwrap_or_else(feedback_db_path);

        Ok(Self {
            bind_addr,
            gateway,
            feedback_db,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn session_dir_under_app_data() {
        let session = session_dir();
        assert!(session.starts_with(app_data_dir()));
        assert!(session.ends_with("session"));
    }

    #[test]
    fn app_name_is_cardiocheck() {
        assert_eq!(APP_NAME, "CardioCheck");
    }

    #[test]
    fn defaults_when_environment_empty() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.gateway.url, DEFAULT_GATEWAY_URL);
        assert_eq!(config.gateway.model, DEFAULT_GATEWAY_MODEL);
        assert!(config.gateway.api_key.is_none());
        assert!(config.gateway.timeout_secs.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("CARDIOCHECK_BIND", "0.0.0.0:9000"),
            ("AI_GATEWAY_API_KEY", "secret"),
            ("AI_GATEWAY_MODEL", "test/model"),
            ("CARDIOCHECK_GATEWAY_TIMEOUT_SECS", "45"),
            ("CARDIOCHECK_DATA_DIR", "/tmp/cc"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.gateway.api_key.as_deref(), Some("secret"));
        assert_eq!(config.gateway.model, "test/model");
        assert_eq!(config.gateway.timeout_secs, Some(45));
        assert_eq!(config.feedback_db, PathBuf::from("/tmp/cc/feedback.db"));
    }

    #[test]
    fn blank_api_key_treated_as_missing() {
        let config =
            ServerConfig::from_lookup(lookup_from(&[("AI_GATEWAY_API_KEY", "   ")])).unwrap();
        assert!(config.gateway.api_key.is_none());
    }

    #[test]
    fn rejects_bad_bind_addr() {
        let result = ServerConfig::from_lookup(lookup_from(&[("CARDIOCHECK_BIND", "nope")]));
        assert!(matches!(result, Err(ConfigError::InvalidBindAddr { .. })));
    }

    #[test]
    fn rejects_bad_timeout() {
        let result = ServerConfig::from_lookup(lookup_from(&[(
            "CARDIOCHECK_GATEWAY_TIMEOUT_SECS",
            "soon",
        )]));
        assert!(matches!(result, Err(ConfigError::InvalidNumber { .. })));
    }
}
