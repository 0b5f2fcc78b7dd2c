//! Gateway credentials.

use crate::error::{PaymentError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Credentials used to authenticate against the gateway.
///
/// Either `secret_api_key` or the full legacy set (`license_id`, `site_id`,
/// `device_id`, `user_name`, `password`) must be present.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ServicesConfig {
    #[serde(rename = "secretAPIKey", alias = "secretApiKey")]
    pub secret_api_key: Option<String>,
    pub license_id: Option<i64>,
    pub site_id: Option<i64>,
    pub device_id: Option<i64>,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub developer_id: Option<String>,
    pub version_number: Option<String>,
    pub site_trace: Option<String>,
}

impl ServicesConfig {
    pub fn with_secret_api_key(key: impl Into<String>) -> Self {
        Self {
            secret_api_key: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PaymentError::ConfigError(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Checks the credential set and trims the secret key in place.
    pub fn validate(mut self) -> Result<Self> {
        if let Some(key) = self.secret_api_key.take() {
            let key = key.trim().to_string();
            if !key.is_empty() {
                self.secret_api_key = Some(key);
            }
        }

        if self.secret_api_key.is_some() {
            return Ok(self);
        }

        let legacy_complete = self.license_id.is_some_and(|v| v > 0)
            && self.site_id.is_some_and(|v| v > 0)
            && self.device_id.is_some_and(|v| v > 0)
            && self.user_name.as_deref().is_some_and(|v| !v.is_empty())
            && self.password.as_deref().is_some_and(|v| !v.is_empty());
        if !legacy_complete {
            return Err(PaymentError::ConfigError(
                "a secret API key or license, site, device, user name and password is required"
                    .to_string(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_key_is_trimmed() {
        let config = ServicesConfig::with_secret_api_key("  skapi_cert_abc \n")
            .validate()
            .unwrap();
        assert_eq!(config.secret_api_key.as_deref(), Some("skapi_cert_abc"));
    }

    #[test]
    fn test_blank_key_without_legacy_credentials_is_rejected() {
        let result = ServicesConfig::with_secret_api_key("   ").validate();
        assert!(matches!(result, Err(PaymentError::ConfigError(_))));
    }

    #[test]
    fn test_legacy_credentials_from_json() {
        let config = ServicesConfig::from_json_str(
            r#"{"licenseId": 1, "siteId": 2, "deviceId": 3, "userName": "u", "password": "p"}"#,
        )
        .unwrap()
        .validate()
        .unwrap();
        assert_eq!(config.device_id, Some(3));
    }

    #[test]
    fn test_incomplete_legacy_credentials_are_rejected() {
        let config = ServicesConfig::from_json_str(r#"{"licenseId": 1, "siteId": 2}"#).unwrap();
        assert!(config.validate().is_err());
    }
}
