//! Secrets for the compose and publish services.

use std::fmt;

use crate::error::{AppError, Result};

/// Environment variable names the credentials are read from.
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const FACEBOOK_PAGE_ID_ENV: &str = "FACEBOOK_PAGE_ID";
pub const FACEBOOK_PAGE_ACCESS_TOKEN_ENV: &str = "FACEBOOK_PAGE_ACCESS_TOKEN";

/// API credentials, read once at startup and passed to the clients that need them.
#[derive(Clone, Default)]
pub struct Credentials {
    pub google_api_key: String,
    pub page_id: String,
    pub page_access_token: String,
}

impl Credentials {
    pub fn new(
        google_api_key: impl Into<String>,
        page_id: impl Into<String>,
        page_access_token: impl Into<String>,
    ) -> Self {
        Self {
            google_api_key: google_api_key.into(),
            page_id: page_id.into(),
            page_access_token: page_access_token.into(),
        }
    }

    /// Names of the environment variables that are unset.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (GOOGLE_API_KEY_ENV, &self.google_api_key),
            (FACEBOOK_PAGE_ID_ENV, &self.page_id),
            (FACEBOOK_PAGE_ACCESS_TOKEN_ENV, &self.page_access_token),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Check the credentials needed for a run.
    ///
    /// A dry run only talks to the compose service.
    pub fn validate(&self, dry_run: bool) -> Result<()> {
        let missing: Vec<_> = self
            .missing()
            .into_iter()
            .filter(|name| !dry_run || *name == GOOGLE_API_KEY_ENV)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::config(format!(
                "missing credentials: {}",
                missing.join(", ")
            )))
        }
    }
}

// Keep secrets out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("google_api_key", &redact(&self.google_api_key))
            .field("page_id", &self.page_id)
            .field("page_access_token", &redact(&self.page_access_token))
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "<unset>" } else { "<redacted>" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_requires_all_for_live_run() {
        let creds = Credentials::new("key", "", "token");
        let err = creds.validate(false).unwrap_err();
        assert!(err.to_string().contains(FACEBOOK_PAGE_ID_ENV));
    }

    #[test]
    fn dry_run_only_needs_google_key() {
        assert!(Credentials::new("key", "", "").validate(true).is_ok());
        assert!(Credentials::new("", "page", "token").validate(true).is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let creds = Credentials::new("secret-key", "123", "secret-token");
        let text = format!("{creds:?}");
        assert!(!text.contains("secret-key"));
        assert!(!text.contains("secret-token"));
        assert!(text.contains("123"));
    }
}
