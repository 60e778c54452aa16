use std::fmt;

use crate::constants::{
    DEFAULT_FAILURE_TARGET, DEFAULT_SUCCESS_TARGET, LIVE_SERVICE_URL, TEST_SERVICE_URL,
};
use crate::error::DpmError;

/// Gateway account credentials.
///
/// The transaction key is used as raw bytes while the signature key is stored
/// hex-encoded and decoded once here, so a bad signature key fails at startup
/// instead of on the first relay response.
#[derive(Clone)]
pub struct Credentials {
    login_id: String,
    transaction_key: Vec<u8>,
    signature_key: Vec<u8>,
}

impl Credentials {
    pub fn new(
        login_id: impl Into<String>,
        transaction_key: impl AsRef<[u8]>,
        signature_key_hex: &str,
    ) -> Result<Self, DpmError> {
        let login_id = login_id.into();
        if login_id.is_empty() {
            return Err(DpmError::ConfigError("login id is empty".to_string()));
        }

        let transaction_key = transaction_key.as_ref().to_vec();
        if transaction_key.is_empty() {
            return Err(DpmError::ConfigError("transaction key is empty".to_string()));
        }

        let signature_key_hex = signature_key_hex.trim();
        if signature_key_hex.is_empty() {
            return Err(DpmError::ConfigError("signature key is empty".to_string()));
        }
        // The decode error is deliberately not echoed: it can quote key material.
        let signature_key = hex::decode(signature_key_hex).map_err(|_| {
            DpmError::ConfigError("signature key is not valid hex".to_string())
        })?;

        Ok(Self {
            login_id,
            transaction_key,
            signature_key,
        })
    }

    pub fn login_id(&self) -> &str {
        &self.login_id
    }

    pub(crate) fn transaction_key(&self) -> &[u8] {
        &self.transaction_key
    }

    pub(crate) fn signature_key(&self) -> &[u8] {
        &self.signature_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login_id", &self.login_id)
            .field("transaction_key", &"<redacted>")
            .field("signature_key", &"<redacted>")
            .finish()
    }
}

/// Per-account gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub credentials: Credentials,
    pub test_mode: bool,
    pub success_target: String,
    pub failure_target: String,
}

impl GatewayConfig {
    pub fn new(credentials: Credentials, test_mode: bool) -> Self {
        Self {
            credentials,
            test_mode,
            success_target: DEFAULT_SUCCESS_TARGET.to_string(),
            failure_target: DEFAULT_FAILURE_TARGET.to_string(),
        }
    }

    /// Load configuration from `AUTHNET_*` environment variables.
    ///
    /// Required: `AUTHNET_LOGIN_ID`, `AUTHNET_TRANSACTION_KEY`,
    /// `AUTHNET_SIGNATURE_KEY` (hex). Optional: `AUTHNET_TEST_MODE`,
    /// `AUTHNET_SUCCESS_TARGET`, `AUTHNET_FAILURE_TARGET`.
    pub fn from_env() -> Result<Self, DpmError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`GatewayConfig::from_env`] with a caller-supplied variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DpmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| DpmError::ConfigError(format!("{name} is required")))
        };

        let login_id = required("AUTHNET_LOGIN_ID")?;
        let transaction_key = required("AUTHNET_TRANSACTION_KEY")?;
        let signature_key = required("AUTHNET_SIGNATURE_KEY")?;
        let credentials = Credentials::new(login_id, transaction_key, &signature_key)?;

        let test_mode = lookup("AUTHNET_TEST_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        if test_mode {
            tracing::warn!("AUTHNET_TEST_MODE is set, checkout forms will post to the test gateway");
        }

        let mut config = Self::new(credentials, test_mode);
        if let Some(target) = lookup("AUTHNET_SUCCESS_TARGET").filter(|v| !v.is_empty()) {
            config.success_target = target;
        }
        if let Some(target) = lookup("AUTHNET_FAILURE_TARGET").filter(|v| !v.is_empty()) {
            config.failure_target = target;
        }

        Ok(config)
    }

    /// Hosted form endpoint the browser should post the signed form to.
    pub fn service_url(&self) -> &'static str {
        service_url(self.test_mode)
    }
}

pub fn service_url(test_mode: bool) -> &'static str {
    if test_mode {
        TEST_SERVICE_URL
    } else {
        LIVE_SERVICE_URL
    }
}
