//! Wire types ferried over an external signaling channel.
//!
//! The channel itself (WebSocket, MQTT, QR codes, ...) is the caller's
//! concern; this module only defines the [`Signal`] payload and a compact
//! base64(JSON) codec for it.

use base64::{engine::general_purpose, Engine as _};
use rand::Rng;
use serde::{Deserialize, Serialize};
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

use crate::error::SessionError;

/// Random 8-byte identifier, hex encoded.
pub fn random_id() -> String {
    hex::encode(rand::rng().random::<[u8; 8]>())
}

/// A single reachability candidate in transport-friendly form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IceCandidate {
    pub candidate: String,
    pub sdp_mid: Option<String>,
    pub sdp_mline_index: Option<u16>,
}

impl From<RTCIceCandidateInit> for IceCandidate {
    fn from(init: RTCIceCandidateInit) -> Self {
        Self {
            candidate: init.candidate,
            sdp_mid: init.sdp_mid,
            sdp_mline_index: init.sdp_mline_index,
        }
    }
}

impl From<IceCandidate> for RTCIceCandidateInit {
    fn from(candidate: IceCandidate) -> Self {
        Self {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_mline_index,
            username_fragment: None,
        }
    }
}

/// Transient negotiation payload: either a session description or a single
/// candidate, plus an id and timestamp for correlation on the channel.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Signal {
    pub sdp: Option<RTCSessionDescription>,
    pub ice: Option<IceCandidate>,
    pub id: String,
    pub ts: i64,
}

impl Signal {
    pub fn description(sdp: RTCSessionDescription) -> Self {
        Self {
            sdp: Some(sdp),
            ice: None,
            id: random_id(),
            ts: chrono::Utc::now().timestamp(),
        }
    }

    pub fn candidate(ice: IceCandidate) -> Self {
        Self {
            sdp: None,
            ice: Some(ice),
            id: random_id(),
            ts: chrono::Utc::now().timestamp(),
        }
    }

    /// Encodes the signal as base64(JSON) for transports that want a single
    /// opaque string.
    pub fn encode(&self) -> Result<String, SessionError> {
        let json = serde_json::to_string(self)
            .map_err(|e| SessionError::MalformedSignal(e.to_string()))?;
        Ok(general_purpose::STANDARD.encode(json))
    }

    pub fn decode(encoded: &str) -> Result<Self, SessionError> {
        let raw = general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| SessionError::MalformedSignal(e.to_string()))?;
        serde_json::from_slice(&raw).map_err(|e| SessionError::MalformedSignal(e.to_string()))
    }
}
