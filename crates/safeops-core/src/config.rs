// ── Runtime client configuration ──
//
// Describes *how* to reach a SafeOps backend. Carries credential data
// and connection tuning, but never touches disk — the CLI (via
// safeops-config) constructs a `ClientConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use safeops_api::TlsMode;

use crate::model::RpnTable;

/// Configuration for one backend connection.
///
/// There is no `Default`: the RPN weight table is policy the deployment
/// must state explicitly, so construction always names it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g. `https://acme.safeops.io`).
    pub url: Url,
    /// Service API key, sent as `apikey` + bearer on every request.
    pub api_key: SecretString,
    /// TLS verification strategy.
    pub tls: TlsMode,
    /// Request timeout.
    pub timeout: Duration,
    /// Enable the websocket change feed and store reconciliation.
    pub realtime_enabled: bool,
    /// Severity/likelihood weight table backing RPN computation.
    pub rpn: RpnTable,
}

impl ClientConfig {
    /// Config with standard tuning: system TLS, 30s timeout, realtime on.
    pub fn new(url: Url, api_key: SecretString, rpn: RpnTable) -> Self {
        Self {
            url,
            api_key,
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            realtime_enabled: true,
            rpn,
        }
    }
}
