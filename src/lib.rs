//! Peer-connection negotiation helper on top of the [`webrtc`] crate.
//!
//! A [`Session`] owns one peer-connection handle, buffers the locally
//! gathered ICE candidates and drives the SDP offer/answer handshake. The
//! actual transport setup, congestion control and codec handling belong to
//! the engine; this crate only configures and observes it.
//!
//! Negotiation state crosses the wire as [`Signal`] values; the signaling
//! channel itself is the caller's, configured through persisted
//! [`Settings`].

pub mod config;
pub mod error;
pub mod media;
pub mod session;
pub mod settings;
pub mod signaling;

pub use config::{default_ice_servers, ServerConfig, SessionConfig};
pub use error::{Result, SessionError, SettingsError};
pub use media::{LocalMedia, MediaTrack};
pub use session::{Session, SessionCallbacks};
pub use settings::{Settings, SignalingTransport};
pub use signaling::{random_id, IceCandidate, Signal};
