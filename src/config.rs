use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "FMW Insurance Portal";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Production API root used when `FMW_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "https://api.bodyf1rst.net/api";

/// Namespace of the insurance-partner endpoints below the API root.
pub const API_NAMESPACE: &str = "/fmw/insurance";

pub const ENV_API_URL: &str = "FMW_API_URL";
pub const ENV_SESSION_DIR: &str = "FMW_SESSION_DIR";
pub const ENV_DEMO_FALLBACK: &str = "FMW_DEMO_FALLBACK";

/// Log filter applied when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "fmw_claims=info,warn"
}

/// Get the default session directory
/// `<config dir>/fmw-insurance` (e.g. ~/.config/fmw-insurance on Linux)
pub fn default_session_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fmw-insurance")
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// API root without trailing slash.
    pub api_url: String,
    pub session_dir: PathBuf,
    /// Substitute demo data when live calls fail.
    pub demo_fallback: bool,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = match lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            Some(url) => normalize_api_url(&url)?,
            None => DEFAULT_API_URL.to_string(),
        };

        let session_dir = lookup(ENV_SESSION_DIR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_session_dir);

        let demo_fallback = lookup(ENV_DEMO_FALLBACK)
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        Ok(Self {
            api_url,
            session_dir,
            demo_fallback,
        })
    }

    /// Base URL of the insurance namespace, e.g. `https://host/api/fmw/insurance`.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.api_url, API_NAMESPACE)
    }

    pub fn with_api_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.api_url = normalize_api_url(url)?;
        Ok(self)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_dir: default_session_dir(),
            demo_fallback: true,
        }
    }
}

/// Validate an absolute http(s) URL and strip trailing slashes.
pub fn normalize_api_url(url: &str) -> Result<String, ConfigError> {
    let trimmed = url.trim();
    let parsed = reqwest::Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "off" | "no"
    )
}
