//! Application configuration.
//!
//! One immutable [`AppConfig`] is built at startup from a JSON file and
//! passed by reference into every component constructor. Nothing reads
//! configuration from ambient global state.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Process-wide configuration, loaded once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Mail server settings.
    pub imap: ImapConfig,
    /// Settings carried for the web layer in front of this crate.
    #[serde(default)]
    pub http: HttpConfig,
}

/// IMAP endpoint, credentials and timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImapConfig {
    /// Server hostname.
    pub host: String,
    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Account name.
    pub username: String,
    /// Account secret.
    pub password: String,
    /// Use implicit TLS.
    #[serde(default = "default_true")]
    pub tls: bool,
    /// Skip server certificate validation.
    #[serde(default)]
    pub accept_invalid_certs: bool,
    /// Deadline for reaching the server and reading its greeting.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Deadline for the LOGIN exchange.
    #[serde(default = "default_auth_timeout")]
    pub auth_timeout_secs: u64,
    /// Advisory keepalive interval. Sessions here live for one operation,
    /// so no keepalive traffic is generated; the value is carried for
    /// deployments that front this crate with a long-lived session.
    #[serde(default = "default_keepalive")]
    pub keepalive_interval_secs: u64,
}

/// Settings for the external web layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Listen port.
    #[serde(default = "default_http_port")]
    pub port: u16,
    /// Cookie-session secret.
    #[serde(default)]
    pub session_secret: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: default_http_port(),
            session_secret: String::new(),
        }
    }
}

const fn default_port() -> u16 {
    993
}
const fn default_true() -> bool {
    true
}
const fn default_connect_timeout() -> u64 {
    30
}
const fn default_auth_timeout() -> u64 {
    15
}
const fn default_keepalive() -> u64 {
    300
}
const fn default_http_port() -> u16 {
    3000
}

impl ImapConfig {
    /// Connect deadline as a [`Duration`].
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Authentication deadline as a [`Duration`].
    #[must_use]
    pub const fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_secs)
    }

    /// Transport description for the IMAP layer.
    #[must_use]
    pub fn connect_config(&self) -> remail_imap::ConnectConfig {
        remail_imap::ConnectConfig::new(self.host.clone())
            .port(self.port)
            .tls(self.tls)
            .accept_invalid_certs(self.accept_invalid_certs)
    }
}

impl AppConfig {
    /// Loads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the file cannot be read and
    /// [`Error::Serde`] when it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&text)?;
        if config.imap.host.is_empty() {
            return Err(Error::Config("imap.host must not be empty".to_string()));
        }
        Ok(config)
    }

    /// Conventional config file location, `<config dir>/remail/config.json`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("remail").join("config.json"))
    }

    /// Conventional sender list location, `<config dir>/remail/senders.json`.
    #[must_use]
    pub fn default_senders_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("remail").join("senders.json"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_applies_defaults() {
        let json = r#"{
            "imap": {
                "host": "imap.example.com",
                "username": "alice",
                "password": "secret"
            }
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.imap.port, 993);
        assert!(config.imap.tls);
        assert!(!config.imap.accept_invalid_certs);
        assert_eq!(config.imap.connect_timeout(), Duration::from_secs(30));
        assert_eq!(config.imap.auth_timeout(), Duration::from_secs(15));
        assert_eq!(config.http.port, 3000);
    }

    #[test]
    fn test_full_config_round_trip() {
        let json = r#"{
            "imap": {
                "host": "mail.local",
                "port": 143,
                "username": "u",
                "password": "p",
                "tls": false,
                "accept_invalid_certs": true,
                "connect_timeout_secs": 5,
                "auth_timeout_secs": 5,
                "keepalive_interval_secs": 60
            },
            "http": { "port": 8080, "session_secret": "s3cret" }
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert!(!config.imap.tls);
        assert!(config.imap.accept_invalid_certs);
        assert_eq!(config.http.port, 8080);

        let transport = config.imap.connect_config();
        assert_eq!(transport.host, "mail.local");
        assert_eq!(transport.port, 143);
        assert!(transport.accept_invalid_certs);
    }

    #[test]
    fn test_empty_host_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"imap":{"host":"","username":"u","password":"p"}}"#,
        )
        .unwrap();

        assert!(matches!(
            AppConfig::load(&path),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = AppConfig::load(Path::new("/nonexistent/remail.json"))
            .err()
            .unwrap();
        assert!(matches!(err, Error::Config(_)));
    }
}
