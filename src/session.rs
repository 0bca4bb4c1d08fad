//! The negotiation session: one exclusively owned peer-connection handle,
//! the candidates gathered for it, and the caller's event callbacks.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use webrtc::{
    api::{
        interceptor_registry::register_default_interceptors, media_engine::MediaEngine,
        APIBuilder,
    },
    ice_transport::ice_candidate::RTCIceCandidate,
    interceptor::registry::Registry,
    peer_connection::{
        peer_connection_state::RTCPeerConnectionState,
        sdp::{sdp_type::RTCSdpType, session_description::RTCSessionDescription},
        RTCPeerConnection,
    },
    track::track_remote::TrackRemote,
};

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::media::{LocalMedia, MediaTrack};
use crate::signaling::{IceCandidate, Signal};

pub type CandidateCallback = Box<dyn Fn(IceCandidate) + Send + Sync>;
pub type GatheringCompleteCallback = Box<dyn Fn(Vec<IceCandidate>) + Send + Sync>;
pub type TrackCallback = Box<dyn Fn(Arc<TrackRemote>) + Send + Sync>;
pub type CloseCallback = Box<dyn Fn() + Send + Sync>;

/// Caller-supplied event handlers; every field is optional.
#[derive(Default)]
pub struct SessionCallbacks {
    /// Invoked for each locally gathered candidate, in gathering order.
    pub on_candidate: Option<CandidateCallback>,
    /// Invoked once gathering ends, with the full accumulated list.
    pub on_gathering_complete: Option<GatheringCompleteCallback>,
    /// Invoked when the remote peer adds a media track.
    pub on_track: Option<TrackCallback>,
    /// Invoked when the peer connection reaches the closed state.
    pub on_close: Option<CloseCallback>,
}

/// One peer connection's negotiation lifecycle.
///
/// A session owns at most one live engine handle at a time; calling
/// [`Session::create_peer_connection`] again closes the previous handle and
/// starts candidate gathering from scratch.
pub struct Session {
    config: SessionConfig,
    callbacks: Arc<SessionCallbacks>,
    local_media: Option<Arc<LocalMedia>>,
    connection: Mutex<Option<Arc<RTCPeerConnection>>>,
    candidates: Arc<Mutex<Vec<IceCandidate>>>,
}

impl Session {
    /// Builds a session with no engine handle; call
    /// [`Session::create_peer_connection`] to bring one up.
    pub fn new(
        config: SessionConfig,
        callbacks: SessionCallbacks,
        local_media: Option<Arc<LocalMedia>>,
    ) -> Self {
        Self {
            config,
            callbacks: Arc::new(callbacks),
            local_media,
            connection: Mutex::new(None),
            candidates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Initializes a fresh engine handle: closes any prior handle, clears the
    /// candidate list, registers the event handlers and attaches the outbound
    /// media source's tracks.
    pub async fn create_peer_connection(&self) -> Result<()> {
        self.config.validate()?;
        self.close().await;
        self.candidates.lock().unwrap().clear();

        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;
        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let pc = Arc::new(api.new_peer_connection(self.config.rtc_config()).await?);

        let candidates = Arc::clone(&self.candidates);
        let callbacks = Arc::clone(&self.callbacks);
        pc.on_ice_candidate(Box::new(move |cand: Option<RTCIceCandidate>| {
            match cand {
                Some(c) => {
                    if let Ok(init) = c.to_json() {
                        let candidate = IceCandidate::from(init);
                        debug!(candidate = %candidate.candidate, "gathered local candidate");
                        candidates.lock().unwrap().push(candidate.clone());
                        if let Some(cb) = &callbacks.on_candidate {
                            cb(candidate);
                        }
                    }
                }
                // a null candidate marks the end of gathering
                None => {
                    let gathered = candidates.lock().unwrap().clone();
                    debug!(count = gathered.len(), "candidate gathering complete");
                    if let Some(cb) = &callbacks.on_gathering_complete {
                        cb(gathered);
                    }
                }
            }
            Box::pin(async {})
        }));

        let callbacks = Arc::clone(&self.callbacks);
        pc.on_track(Box::new(move |track: Arc<TrackRemote>, _, _| {
            debug!(kind = %track.kind(), "remote track received");
            if let Some(cb) = &callbacks.on_track {
                cb(track);
            }
            Box::pin(async {})
        }));

        let callbacks = Arc::clone(&self.callbacks);
        pc.on_peer_connection_state_change(Box::new(move |state: RTCPeerConnectionState| {
            debug!(?state, "peer connection state changed");
            if state == RTCPeerConnectionState::Closed {
                if let Some(cb) = &callbacks.on_close {
                    cb();
                }
            }
            Box::pin(async {})
        }));

        if let Some(media) = &self.local_media {
            for track in media.tracks() {
                pc.add_track(track.rtp_track()).await?;
            }
        }

        *self.connection.lock().unwrap() = Some(pc);
        Ok(())
    }

    /// Releases the engine handle; a no-op when none exists. Subsequent
    /// negotiation operations report [`SessionError::NoActiveSession`].
    pub async fn close(&self) {
        let pc = { self.connection.lock().unwrap().take() };
        if let Some(pc) = pc {
            if let Err(err) = pc.close().await {
                warn!(%err, "failed to close peer connection");
            }
        }
    }

    /// Forwards an additional outbound track to the engine; a no-op when no
    /// handle exists.
    pub async fn add_track(&self, track: Arc<MediaTrack>) -> Result<()> {
        let pc = { self.connection.lock().unwrap().as_ref().cloned() };
        if let Some(pc) = pc {
            pc.add_track(track.rtp_track()).await?;
        }
        Ok(())
    }

    /// Produces an offer, commits it as the local description and returns the
    /// committed description.
    pub async fn create_offer(&self) -> Result<RTCSessionDescription> {
        let pc = self.handle()?;
        let offer = pc.create_offer(None).await?;
        commit_local_description(&pc, offer).await
    }

    /// Produces an answer to the committed remote offer; same contract as
    /// [`Session::create_offer`].
    pub async fn create_answer(&self) -> Result<RTCSessionDescription> {
        let pc = self.handle()?;
        let answer = pc.create_answer(None).await?;
        commit_local_description(&pc, answer).await
    }

    /// Applies the signal's session description as the remote description.
    /// For offer-type descriptions this proceeds to [`Session::create_answer`]
    /// and returns the answer; answer-type descriptions are committed without
    /// producing anything.
    pub async fn answer_to_offer_sdp(
        &self,
        signal: &Signal,
    ) -> Result<Option<RTCSessionDescription>> {
        let pc = self.handle()?;
        let sdp = signal.sdp.clone().ok_or(SessionError::EmptySdp)?;
        let is_offer = sdp.sdp_type == RTCSdpType::Offer;

        pc.set_remote_description(sdp).await?;

        if !is_offer {
            return Ok(None);
        }
        Ok(Some(self.create_answer().await?))
    }

    /// Registers a remote reachability candidate with the engine.
    pub async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        let pc = self.handle()?;
        pc.add_ice_candidate(candidate.into()).await?;
        Ok(())
    }

    /// Snapshot of the candidates gathered for the current handle.
    pub fn candidates(&self) -> Vec<IceCandidate> {
        self.candidates.lock().unwrap().clone()
    }

    pub fn local_media(&self) -> Option<&Arc<LocalMedia>> {
        self.local_media.as_ref()
    }

    /// Disables all outbound audio tracks.
    pub fn mute(&self) {
        self.set_audio_enabled(false);
    }

    /// Re-enables all outbound audio tracks.
    pub fn unmute(&self) {
        self.set_audio_enabled(true);
    }

    /// Re-enables all outbound video tracks.
    pub fn enable_video(&self) {
        self.set_video_enabled(true);
    }

    /// Disables all outbound video tracks.
    pub fn disable_video(&self) {
        self.set_video_enabled(false);
    }

    fn set_audio_enabled(&self, enabled: bool) {
        if let Some(media) = &self.local_media {
            media.set_audio_enabled(enabled);
        }
    }

    fn set_video_enabled(&self, enabled: bool) {
        if let Some(media) = &self.local_media {
            media.set_video_enabled(enabled);
        }
    }

    fn handle(&self) -> Result<Arc<RTCPeerConnection>> {
        self.connection
            .lock()
            .unwrap()
            .as_ref()
            .cloned()
            .ok_or(SessionError::NoActiveSession)
    }
}

async fn commit_local_description(
    pc: &RTCPeerConnection,
    sdp: RTCSessionDescription,
) -> Result<RTCSessionDescription> {
    pc.set_local_description(sdp).await?;
    pc.local_description().await.ok_or(SessionError::EmptySdp)
}
