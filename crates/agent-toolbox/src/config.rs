//! Configuration for the product-catalog proxy

use agent_utils::env_string;
use std::time::Duration;

/// Upstream base URL, e.g. `https://host/sap/opu/odata4/.../0001`
pub const ENDPOINT_VAR: &str = "S4PRODUCT_MASTER_ENDPOINT";
pub const USER_VAR: &str = "S4HANA_USER";
pub const PASSWORD_VAR: &str = "S4HANA_PASSWORD";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the product-master API
///
/// Every field may be missing; the proxy tools report missing settings in
/// their result instead of failing at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductApiConfig {
    pub endpoint: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub request_timeout: Duration,
}

impl Default for ProductApiConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            user: None,
            password: None,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ProductApiConfig {
    /// Create a new configuration builder
    pub fn builder() -> ProductApiConfigBuilder {
        ProductApiConfigBuilder::default()
    }

    /// Read the settings from the environment (empty values count as unset)
    pub fn from_env() -> Self {
        Self {
            endpoint: env_string(ENDPOINT_VAR),
            user: env_string(USER_VAR),
            password: env_string(PASSWORD_VAR),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Endpoint without trailing slashes
    pub fn base_url(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(|e| e.trim_end_matches('/'))
            .filter(|e| !e.is_empty())
    }

    /// User and password, when both are set
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.user.as_deref(), self.password.as_deref()) {
            (Some(user), Some(password)) if !user.is_empty() && !password.is_empty() => {
                Some((user, password))
            }
            _ => None,
        }
    }
}

/// Builder for ProductApiConfig
#[derive(Debug, Default)]
pub struct ProductApiConfigBuilder {
    endpoint: Option<String>,
    user: Option<String>,
    password: Option<String>,
    request_timeout: Option<Duration>,
}

impl ProductApiConfigBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> ProductApiConfig {
        ProductApiConfig {
            endpoint: self.endpoint,
            user: self.user,
            password: self.password,
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_TIMEOUT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let config = ProductApiConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.base_url().is_none());
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_base_url_trims_slashes() {
        let config = ProductApiConfig::builder()
            .endpoint("https://erp.example.com/odata/product/")
            .build();
        assert_eq!(config.base_url(), Some("https://erp.example.com/odata/product"));
    }

    #[test]
    fn test_credentials_need_both_parts() {
        let config = ProductApiConfig::builder().user("alice").build();
        assert!(config.credentials().is_none());

        let config = ProductApiConfig::builder()
            .user("alice")
            .password("secret")
            .build();
        assert_eq!(config.credentials(), Some(("alice", "secret")));
    }

    #[test]
    fn test_from_env() {
        unsafe {
            std::env::set_var(ENDPOINT_VAR, "https://erp.example.com/api");
            std::env::set_var(USER_VAR, "bob");
            std::env::set_var(PASSWORD_VAR, "");
        }

        let config = ProductApiConfig::from_env();
        assert_eq!(config.base_url(), Some("https://erp.example.com/api"));
        assert_eq!(config.user.as_deref(), Some("bob"));
        assert!(config.password.is_none());

        unsafe {
            std::env::remove_var(ENDPOINT_VAR);
            std::env::remove_var(USER_VAR);
            std::env::remove_var(PASSWORD_VAR);
        }
    }
}
