//! Client configuration loaded via OrthoConfig.
//!
//! Values come from `EVENTS_CLIENT_*` environment variables or a
//! configuration file; unset values fall back to the defaults below.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::DEFAULT_USER_AGENT;

/// Backend used when no API URL is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
const DEFAULT_STORAGE_DIR: &str = ".events-client";

/// Settings shared by the library wiring and the CLI.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EVENTS_CLIENT")]
pub struct ClientSettings {
    /// Base URL of the events API.
    pub api_url: Option<String>,
    /// Directory holding the persisted session.
    pub storage_dir: Option<PathBuf>,
    /// Per-request timeout in seconds; unset means no client-side timeout.
    pub request_timeout_secs: Option<u64>,
    /// User agent sent with every request.
    pub user_agent: Option<String>,
}

impl ClientSettings {
    /// Configured API base URL, falling back to [`DEFAULT_API_URL`].
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not an absolute URL.
    pub fn api_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.api_url.as_deref().unwrap_or(DEFAULT_API_URL))
    }

    /// Configured storage directory, falling back to `.events-client`.
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR))
    }

    /// Configured request timeout. Zero is treated as unset.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Configured user agent, falling back to the crate default.
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for client configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> ClientSettings {
        ClientSettings::load_from_iter([OsString::from("events-cli")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("EVENTS_CLIENT_API_URL", None::<String>),
            ("EVENTS_CLIENT_STORAGE_DIR", None::<String>),
            ("EVENTS_CLIENT_REQUEST_TIMEOUT_SECS", None::<String>),
            ("EVENTS_CLIENT_USER_AGENT", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.api_url().expect("default url parses").as_str(),
            "http://localhost:8000/api/v1"
        );
        assert_eq!(settings.storage_dir(), PathBuf::from(DEFAULT_STORAGE_DIR));
        assert_eq!(settings.request_timeout(), None);
        assert_eq!(settings.user_agent(), DEFAULT_USER_AGENT);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "EVENTS_CLIENT_API_URL",
                Some("https://events.example.org/api/v1".to_owned()),
            ),
            ("EVENTS_CLIENT_STORAGE_DIR", Some("/tmp/events".to_owned())),
            ("EVENTS_CLIENT_REQUEST_TIMEOUT_SECS", Some("15".to_owned())),
            ("EVENTS_CLIENT_USER_AGENT", Some("kiosk/2".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.api_url().expect("url parses").host_str(),
            Some("events.example.org")
        );
        assert_eq!(settings.storage_dir(), PathBuf::from("/tmp/events"));
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(settings.user_agent(), "kiosk/2");
    }

    #[rstest]
    fn zero_timeout_means_unset() {
        let _guard = lock_env([("EVENTS_CLIENT_REQUEST_TIMEOUT_SECS", Some("0".to_owned()))]);
        assert_eq!(load_from_empty_args().request_timeout(), None);
    }
}
