//! Bridge adapter contract (spec §6.3) and the publish request it binds to.

use crate::error::Result;
use crate::rtc::packet::RtpPacket;

#[derive(Debug, Clone, Default)]
pub struct PublishRequest {
    pub stream_url: String,
    pub auth_token: Option<String>,
    pub audio_codec: Option<String>,
    pub video_codec: Option<String>,
}

/// Converts media between the source's RTP domain and an alternate
/// internal domain (e.g. muxing into fMP4 segments). Owned by the source
/// once attached (spec §5 ownership rules).
pub trait Bridge: Send {
    fn initialize(&mut self, req: &PublishRequest) -> Result<()>;
    fn setup_codec(&mut self, audio_codec_id: &str, video_codec_id: &str);
    fn on_publish(&mut self) -> Result<()>;
    fn on_unpublish(&mut self);
    fn on_rtp(&mut self, pkt: &dyn RtpPacket) -> Result<()>;
}

pub const DEFAULT_AUDIO_CODEC: &str = "opus";
pub const DEFAULT_VIDEO_CODEC: &str = "avc";
