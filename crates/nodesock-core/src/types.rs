use std::fmt;
use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HOST, DEFAULT_PORT};
use crate::error::{Error, Result};

/// A validated (host, port) pair identifying the remote server.
///
/// The host must parse as an IP address; hostname resolution is deliberately
/// out of scope for this client. An `Endpoint` that exists is always usable —
/// invalid input never gets past [`Endpoint::new`], and deserialization runs
/// through the same validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EndpointRepr")]
pub struct Endpoint {
    host: String,
    port: u16,
}

/// Raw wire shape of [`Endpoint`]; only becomes the real type through
/// [`Endpoint::new`].
#[derive(Deserialize)]
struct EndpointRepr {
    host: String,
    port: u16,
}

impl TryFrom<EndpointRepr> for Endpoint {
    type Error = Error;

    fn try_from(raw: EndpointRepr) -> Result<Self> {
        Endpoint::new(&raw.host, raw.port)
    }
}

impl Endpoint {
    /// Create a new endpoint with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidAddress` if `host` is not a valid IPv4 or IPv6
    /// address literal. The port range is enforced by the `u16` type.
    pub fn new(host: &str, port: u16) -> Result<Self> {
        if host.parse::<IpAddr>().is_err() {
            return Err(Error::InvalidAddress {
                host: host.to_string(),
                port,
            });
        }
        Ok(Endpoint {
            host: host.to_string(),
            port,
        })
    }

    /// Host part as a string slice.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port part.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Convert to a `SocketAddr` for the connect call.
    #[must_use]
    pub fn to_socket_addr(&self) -> SocketAddr {
        // Host validity is guaranteed by the constructor.
        let ip: IpAddr = self.host.parse().unwrap();
        SocketAddr::new(ip, self.port)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Endpoint {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Connection lifecycle state.
///
/// Transitions: `Disconnected -> Connecting -> Connected -> Closing ->
/// Disconnected`, with `Connecting -> Disconnected` on a failed connect.
/// There is no reconnect transition; a new connection starts from
/// `Disconnected` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No socket open.
    Disconnected,

    /// Connect attempt in progress.
    Connecting,

    /// Socket established, receive loop running.
    Connected,

    /// Stop requested, waiting for the receive loop to exit.
    Closing,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Closing => "closing",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("127.0.0.1", 3000)]
    #[case("0.0.0.0", 0)]
    #[case("192.168.0.100", 65535)]
    #[case("::1", 8080)]
    fn valid_endpoints(#[case] host: &str, #[case] port: u16) {
        let ep = Endpoint::new(host, port).unwrap();
        assert_eq!(ep.host(), host);
        assert_eq!(ep.port(), port);
        assert_eq!(ep.to_socket_addr().port(), port);
    }

    #[rstest]
    #[case("")]
    #[case("localhost")]
    #[case("not an address")]
    #[case("256.0.0.1")]
    #[case("10.0.0")]
    fn invalid_hosts_rejected(#[case] host: &str) {
        let err = Endpoint::new(host, 3000).unwrap_err();
        assert!(matches!(err, Error::InvalidAddress { .. }));
    }

    #[test]
    fn deserialization_validates_the_host() {
        let result = serde_json::from_str::<Endpoint>(r#"{"host":"not-an-ip","port":3000}"#);
        assert!(result.is_err());

        let ep: Endpoint = serde_json::from_str(r#"{"host":"127.0.0.1","port":3000}"#).unwrap();
        assert_eq!(ep.to_socket_addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn serde_round_trip() {
        let ep = Endpoint::new("192.168.0.100", 3000).unwrap();
        let json = serde_json::to_string(&ep).unwrap();
        assert_eq!(serde_json::from_str::<Endpoint>(&json).unwrap(), ep);
    }

    #[test]
    fn default_endpoint_is_loopback_3000() {
        let ep = Endpoint::default();
        assert_eq!(ep.host(), "127.0.0.1");
        assert_eq!(ep.port(), 3000);
        assert_eq!(ep.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn state_display() {
        assert_eq!(ConnectionState::Disconnected.to_string(), "disconnected");
        assert_eq!(ConnectionState::Closing.to_string(), "closing");
    }
}
