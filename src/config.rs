use crate::error::{CrmError, Result};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = concat!("golden-crm/", env!("CARGO_PKG_VERSION"));

/// Backend connection settings.
///
/// | Env Var                    | Default                       |
/// |----------------------------|-------------------------------|
/// | `CRM_API_BASE_URL`         | `http://localhost:8080/api/`  |
/// | `CRM_REQUEST_TIMEOUT_SECS` | `30`                          |
/// | `CRM_USER_AGENT`           | `golden-crm/<version>`        |
#[derive(Debug, Clone, PartialEq)]
pub struct CrmConfig {
    /// Base URL every resource path is joined onto. Always ends with `/`.
    pub base_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CrmConfig {
    /// Build a config pointing at `base_url`, other settings default
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(&base_url.into())?,
            ..Self::default()
        })
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("CRM_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());

        let timeout_secs = match lookup("CRM_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                CrmError::Config(format!("CRM_REQUEST_TIMEOUT_SECS must be a whole number, got {raw:?}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let user_agent = lookup("CRM_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.into());

        Ok(Self {
            base_url: normalize_base_url(&base_url)?,
            request_timeout: Duration::from_secs(timeout_secs),
            user_agent,
        })
    }

    /// Absolute URL for a path relative to the API root
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(CrmError::Config(format!(
            "CRM_API_BASE_URL must be an http(s) URL, got {raw:?}"
        )));
    }
    if trimmed.ends_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = CrmConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CrmConfig::default());
        assert_eq!(config.url("clients"), "http://localhost:8080/api/clients");
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let config = CrmConfig::from_lookup(lookup(&[
            ("CRM_API_BASE_URL", "https://crm.example.com/api"),
            ("CRM_REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://crm.example.com/api/");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(
            config.url("/integrations/core/upload"),
            "https://crm.example.com/api/integrations/core/upload"
        );
    }

    #[test]
    fn rejects_bad_values() {
        let err = CrmConfig::from_lookup(lookup(&[("CRM_REQUEST_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, CrmError::Config(_)));

        let err = CrmConfig::with_base_url("localhost:8080").unwrap_err();
        assert!(matches!(err, CrmError::Config(_)));
    }
}
