//! Persisted connection-broker settings.
//!
//! The settings carry the addresses and credentials of whatever broker the
//! caller exchanges [`crate::Signal`]s over, plus the ICE server list. They
//! are an explicitly passed value with a load/save lifecycle; nothing in the
//! crate mutates them ambiently.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{default_ice_servers, ServerConfig};
use crate::error::SettingsError;
use crate::signaling::random_id;

/// Which broker carries the signal exchange.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SignalingTransport {
    Mqtt,
    WebSocket,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub transport: SignalingTransport,
    pub websocket_host: Option<String>,
    pub websocket_port: Option<u16>,
    pub mqtt_server: Option<String>,
    pub mqtt_token: Option<String>,
    pub mqtt_client_id: Option<String>,
    pub mqtt_user_id: Option<u64>,
    /// Stable per-install identifier, generated once and persisted.
    pub uuid: String,
    pub ice_servers: Vec<ServerConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            transport: SignalingTransport::Mqtt,
            websocket_host: None,
            websocket_port: Some(8443),
            mqtt_server: None,
            mqtt_token: None,
            mqtt_client_id: None,
            mqtt_user_id: None,
            uuid: random_id(),
            ice_servers: default_ice_servers(),
        }
    }
}

impl Settings {
    /// Loads settings from a JSON file. A missing file yields defaults, so
    /// first runs work without a prior `save`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        match fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
