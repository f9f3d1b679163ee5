//! Transport configuration.

/// How to reach the IMAP server.
///
/// Timeouts are enforced by the caller wrapping the connect future; this
/// struct only describes the endpoint and TLS behavior.
#[derive(Debug, Clone)]
pub struct ConnectConfig {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Use implicit TLS (port 993 convention). Plaintext otherwise.
    pub tls: bool,
    /// Skip server certificate validation.
    ///
    /// Only for servers with self-signed certificates on trusted networks.
    pub accept_invalid_certs: bool,
}

impl ConnectConfig {
    /// Creates a TLS configuration with the conventional port.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 993,
            tls: true,
            accept_invalid_certs: false,
        }
    }

    /// Sets the port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enables or disables TLS. The port is left alone; callers speaking
    /// plaintext on 143 set it themselves.
    #[must_use]
    pub const fn tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    /// Disables server certificate validation.
    #[must_use]
    pub const fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConnectConfig::new("imap.example.com");
        assert_eq!(config.host, "imap.example.com");
        assert_eq!(config.port, 993);
        assert!(config.tls);
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn test_builder_chain() {
        let config = ConnectConfig::new("mail.local")
            .port(143)
            .tls(false)
            .accept_invalid_certs(true);
        assert_eq!(config.port, 143);
        assert!(!config.tls);
        assert!(config.accept_invalid_certs);
    }
}
