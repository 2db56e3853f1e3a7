//! Stream description and track lookup (spec §4.7 `get_track_desc`).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

#[derive(Debug, Clone)]
pub struct TrackDesc {
    pub kind: TrackKind,
    /// Payload encoding name, e.g. `"opus"`, `"h264"`. Matched
    /// case-insensitively.
    pub codec: String,
}

#[derive(Debug, Clone, Default)]
pub struct StreamDescription {
    pub audio_track: Option<TrackDesc>,
    pub video_tracks: Vec<TrackDesc>,
}

impl StreamDescription {
    /// Spec §4.7 track lookup: audio returns at most one match (codec must
    /// match); video returns every match, or the whole list when `codec`
    /// is empty. Kind is an enum here rather than a free string, so the
    /// "any other kind returns empty" branch from the original text has no
    /// counterpart — it's unrepresentable by construction.
    pub fn get_track_desc(&self, kind: TrackKind, codec: &str) -> Vec<TrackDesc> {
        match kind {
            TrackKind::Audio => self
                .audio_track
                .iter()
                .filter(|t| t.codec.eq_ignore_ascii_case(codec))
                .cloned()
                .collect(),
            TrackKind::Video => self
                .video_tracks
                .iter()
                .filter(|t| codec.is_empty() || t.codec.eq_ignore_ascii_case(codec))
                .cloned()
                .collect(),
        }
    }
}
