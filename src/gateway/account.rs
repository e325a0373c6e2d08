use std::fmt;

use thiserror::Error;

use crate::config::Config;

const ACCOUNT_PREFIX: &str = "act_";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GatewayInitError {
    #[error("{0} must not be blank")]
    BlankCredential(&'static str),
    #[error("invalid ad account id {0:?}, expected act_<digits> or <digits>")]
    InvalidAccountId(String),
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

#[derive(Clone)]
pub struct Credentials {
    pub app_id: String,
    pub app_secret: String,
    pub access_token: String,
}

// Secrets stay out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// The one remote ad account this process serves.
#[derive(Debug, Clone)]
pub struct AccountRef {
    account_id: String,
    credentials: Credentials,
}

impl AccountRef {
    pub fn new(account_id: &str, credentials: Credentials) -> Result<Self, GatewayInitError> {
        for (name, value) in [
            ("app id", &credentials.app_id),
            ("app secret", &credentials.app_secret),
            ("access token", &credentials.access_token),
        ] {
            if value.trim().is_empty() {
                return Err(GatewayInitError::BlankCredential(name));
            }
        }

        let trimmed = account_id.trim();
        let digits = trimmed.strip_prefix(ACCOUNT_PREFIX).unwrap_or(trimmed);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(GatewayInitError::InvalidAccountId(account_id.to_string()));
        }

        Ok(Self {
            account_id: format!("{ACCOUNT_PREFIX}{digits}"),
            credentials,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, GatewayInitError> {
        Self::new(
            &config.ad_account_id,
            Credentials {
                app_id: config.app_id.clone(),
                app_secret: config.app_secret.clone(),
                access_token: config.access_token.clone(),
            },
        )
    }

    /// Normalised `act_<digits>` identifier.
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}
