// Shared transport configuration for building reqwest::Client instances.
//
// The REST and auth clients share TLS, timeout, and default-header
// settings through this module, avoiding duplicated builder logic.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::HeaderMap;

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store. Default — the hosted backend
    /// always presents a publicly trusted certificate.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file
    /// (self-hosted gateways behind a private CA).
    CustomCa(PathBuf),
    /// Accept any certificate (local development stacks).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` with the given default headers.
    ///
    /// The REST client injects `apikey` + `Authorization` here so every
    /// request is authenticated without per-call plumbing.
    pub fn build_client(&self, headers: HeaderMap) -> Result<reqwest::Client, crate::Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("safeops-rs/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| crate::Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| crate::Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| crate::Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}
