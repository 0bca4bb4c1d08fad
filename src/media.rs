//! Outbound media source attached to a session.
//!
//! The engine's local sample tracks have no notion of being muted; the
//! [`MediaTrack`] wrapper adds the enabled flag and drops samples while the
//! track is disabled, which keeps the RTP sender alive but silent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::media::Sample;
use webrtc::rtp_transceiver::rtp_codec::{RTCRtpCodecCapability, RTPCodecType};
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_local::TrackLocal;

use crate::error::Result;

/// One outbound track plus its enabled flag.
pub struct MediaTrack {
    inner: Arc<TrackLocalStaticSample>,
    enabled: AtomicBool,
}

impl MediaTrack {
    pub fn new(
        codec: RTCRtpCodecCapability,
        id: impl Into<String>,
        stream_id: impl Into<String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            inner: Arc::new(TrackLocalStaticSample::new(
                codec,
                id.into(),
                stream_id.into(),
            )),
            enabled: AtomicBool::new(true),
        })
    }

    /// Opus audio track.
    pub fn audio(id: impl Into<String>, stream_id: impl Into<String>) -> Arc<Self> {
        Self::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                clock_rate: 48000,
                channels: 2,
                ..Default::default()
            },
            id,
            stream_id,
        )
    }

    /// VP8 video track.
    pub fn video(id: impl Into<String>, stream_id: impl Into<String>) -> Arc<Self> {
        Self::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                clock_rate: 90000,
                ..Default::default()
            },
            id,
            stream_id,
        )
    }

    pub fn id(&self) -> &str {
        self.inner.id()
    }

    pub fn kind(&self) -> RTPCodecType {
        self.inner.kind()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Writes a sample to the engine track; silently dropped while disabled.
    pub async fn write_sample(&self, sample: &Sample) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.inner.write_sample(sample).await?;
        Ok(())
    }

    pub(crate) fn rtp_track(&self) -> Arc<dyn TrackLocal + Send + Sync> {
        Arc::clone(&self.inner) as Arc<dyn TrackLocal + Send + Sync>
    }
}

/// The caller-supplied outbound media source: an ordered set of tracks.
#[derive(Default)]
pub struct LocalMedia {
    tracks: Mutex<Vec<Arc<MediaTrack>>>,
}

impl LocalMedia {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_tracks(tracks: Vec<Arc<MediaTrack>>) -> Arc<Self> {
        Arc::new(Self {
            tracks: Mutex::new(tracks),
        })
    }

    pub fn add_track(&self, track: Arc<MediaTrack>) {
        self.tracks.lock().unwrap().push(track);
    }

    pub fn tracks(&self) -> Vec<Arc<MediaTrack>> {
        self.tracks.lock().unwrap().clone()
    }

    pub fn audio_tracks(&self) -> Vec<Arc<MediaTrack>> {
        self.tracks_of_kind(RTPCodecType::Audio)
    }

    pub fn video_tracks(&self) -> Vec<Arc<MediaTrack>> {
        self.tracks_of_kind(RTPCodecType::Video)
    }

    pub fn set_audio_enabled(&self, enabled: bool) {
        for track in self.audio_tracks() {
            track.set_enabled(enabled);
        }
    }

    pub fn set_video_enabled(&self, enabled: bool) {
        for track in self.video_tracks() {
            track.set_enabled(enabled);
        }
    }

    fn tracks_of_kind(&self, kind: RTPCodecType) -> Vec<Arc<MediaTrack>> {
        self.tracks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.kind() == kind)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_are_filtered_by_kind() {
        let media = LocalMedia::with_tracks(vec![
            MediaTrack::audio("mic", "call"),
            MediaTrack::video("cam", "call"),
        ]);

        assert_eq!(media.audio_tracks().len(), 1);
        assert_eq!(media.video_tracks().len(), 1);
        assert_eq!(media.audio_tracks()[0].id(), "mic");
        assert_eq!(media.video_tracks()[0].id(), "cam");
    }

    #[test]
    fn bulk_toggles_only_touch_matching_tracks() {
        let media = LocalMedia::new();
        media.add_track(MediaTrack::audio("mic", "call"));
        media.add_track(MediaTrack::video("cam", "call"));

        media.set_audio_enabled(false);
        assert!(!media.audio_tracks()[0].is_enabled());
        assert!(media.video_tracks()[0].is_enabled());

        media.set_audio_enabled(true);
        media.set_video_enabled(false);
        assert!(media.audio_tracks()[0].is_enabled());
        assert!(!media.video_tracks()[0].is_enabled());
    }

    #[tokio::test]
    async fn disabled_track_drops_samples_without_error() {
        let track = MediaTrack::audio("mic", "call");
        track.set_enabled(false);
        // Not bound to any sender either way; the disabled path must not fail.
        track.write_sample(&Sample::default()).await.unwrap();
    }
}
