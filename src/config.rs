//! ICE server configuration for a negotiation session.

use serde::{Deserialize, Serialize};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::policy::bundle_policy::RTCBundlePolicy;
use webrtc::peer_connection::policy::rtcp_mux_policy::RTCRtcpMuxPolicy;

use crate::error::{Result, SessionError};

/// One STUN or TURN server entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub id: String,
    /// 'stun' or 'turn'
    pub r#type: String,
    pub url: String,
    pub username: Option<String>,
    pub credential: Option<String>,
}

/// Default public STUN servers used when the caller supplies none.
pub fn default_ice_servers() -> Vec<ServerConfig> {
    vec![
        ServerConfig {
            id: "default-stun-0".into(),
            r#type: "stun".into(),
            url: "stun:stun.l.google.com:19302".into(),
            username: None,
            credential: None,
        },
        ServerConfig {
            id: "default-stun-1".into(),
            r#type: "stun".into(),
            url: "stun:stun1.l.google.com:19302".into(),
            username: None,
            credential: None,
        },
    ]
}

/// Relay/reachability-discovery servers a session is created with.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ice_servers: Vec<ServerConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ice_servers: default_ice_servers(),
        }
    }
}

impl SessionConfig {
    pub fn new(ice_servers: Vec<ServerConfig>) -> Self {
        Self { ice_servers }
    }

    /// Rejects entries the engine would silently misuse: empty URLs and TURN
    /// servers without credentials.
    pub fn validate(&self) -> Result<()> {
        for server in &self.ice_servers {
            if server.url.is_empty() {
                return Err(SessionError::InvalidConfig(format!(
                    "server '{}' has an empty url",
                    server.id
                )));
            }
            if server.r#type == "turn"
                && (server.username.is_none() || server.credential.is_none())
            {
                return Err(SessionError::InvalidConfig(format!(
                    "turn server '{}' requires username and credential",
                    server.id
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn rtc_config(&self) -> RTCConfiguration {
        RTCConfiguration {
            ice_servers: self.ice_servers.iter().map(to_rtc_ice_server).collect(),
            ice_candidate_pool_size: 10,
            bundle_policy: RTCBundlePolicy::MaxBundle,
            rtcp_mux_policy: RTCRtcpMuxPolicy::Require,
            ..Default::default()
        }
    }
}

fn to_rtc_ice_server(config: &ServerConfig) -> RTCIceServer {
    RTCIceServer {
        urls: vec![add_ice_url_scheme(config)],
        username: config.username.clone().unwrap_or_default(),
        credential: config.credential.clone().unwrap_or_default(),
    }
}

/// Prepends the `stun:`/`turn:` scheme to a server URL when it is missing.
pub fn add_ice_url_scheme(config: &ServerConfig) -> String {
    if config.url.starts_with("turn:") || config.url.starts_with("stun:") {
        config.url.clone()
    } else {
        let scheme = if config.r#type == "turn" {
            "turn:"
        } else {
            "stun:"
        };
        format!("{}{}", scheme, config.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(r#type: &str, url: &str) -> ServerConfig {
        ServerConfig {
            id: "test".into(),
            r#type: r#type.into(),
            url: url.into(),
            username: None,
            credential: None,
        }
    }

    #[test]
    fn scheme_is_added_when_missing() {
        assert_eq!(
            add_ice_url_scheme(&server("stun", "stun.example.org")),
            "stun:stun.example.org"
        );
        assert_eq!(
            add_ice_url_scheme(&server("turn", "relay.example.org:3478")),
            "turn:relay.example.org:3478"
        );
    }

    #[test]
    fn scheme_is_kept_when_present() {
        assert_eq!(
            add_ice_url_scheme(&server("turn", "turn:relay.example.org")),
            "turn:relay.example.org"
        );
    }

    #[test]
    fn empty_url_is_rejected() {
        let config = SessionConfig::new(vec![server("stun", "")]);
        assert!(matches!(
            config.validate(),
            Err(SessionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn turn_without_credentials_is_rejected() {
        let config = SessionConfig::new(vec![server("turn", "relay.example.org")]);
        assert!(matches!(
            config.validate(),
            Err(SessionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn credentials_are_mapped_onto_the_engine_config() {
        let mut turn = server("turn", "relay.example.org");
        turn.username = Some("user".into());
        turn.credential = Some("secret".into());

        let config = SessionConfig::new(vec![turn]);
        config.validate().unwrap();

        let rtc = config.rtc_config();
        assert_eq!(rtc.ice_servers.len(), 1);
        assert_eq!(rtc.ice_servers[0].urls, vec!["turn:relay.example.org"]);
        assert_eq!(rtc.ice_servers[0].username, "user");
        assert_eq!(rtc.ice_servers[0].credential, "secret");
    }
}
