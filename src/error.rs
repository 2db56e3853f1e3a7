//! Error kinds for the box codec, sample manager, encoders/decoder and the
//! RTC fan-out hub. One flat enum crosses the MP4/RTC boundary so a bridge
//! adapter that muxes RTP into fMP4 segments only has to handle one error
//! type (see spec.md §7).

use crate::boxes::FourCC;

#[derive(thiserror::Error, Debug)]
pub enum Mp4Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("{component} requires {required} bytes, only {available} available")]
    RequireSpace {
        component: &'static str,
        required: u64,
        available: u64,
    },

    #[error("box {typ} size {size} exceeds the 31-bit limit")]
    BoxOverflow { typ: FourCC, size: u64 },

    #[error("unterminated c-string in {typ} payload")]
    BoxString { typ: FourCC },

    #[error("illegal or unsupported major brand {brand:?} in ftyp")]
    IllegalBrand { brand: FourCC },

    #[error("cannot apply encryption transform to sample entry {typ}")]
    IllegalType { typ: FourCC },

    #[error("stsz sample index {index} out of range (sample_count={count})")]
    MoovOverflow { index: u32, count: u32 },

    #[error("{table} counters walked past their entry list for sample {index}")]
    IllegalTimestamp { table: &'static str, index: u32 },

    #[error("track missing mandatory child box {expected} during decode")]
    IllegalTrack { expected: FourCC },

    #[error("sample count mismatch after load: counted {counted}, stsz declared {declared}")]
    IllegalSamples { counted: u32, declared: u32 },

    #[error("cannot flush moov: {reason}")]
    IllegalMoov { reason: &'static str },

    #[error("mdat header size inconsistent at flush: {reason}")]
    IllegalMdat { reason: &'static str },

    #[error("AVC decoder config changed mid-stream")]
    AvccChange,

    #[error("HEVC decoder config changed mid-stream")]
    HvccChange,

    #[error("audio specific config changed mid-stream")]
    AscChange,

    #[error("illegal ESDS SL Config, predefined={predefined}")]
    EsdsSlConfig { predefined: u8 },

    #[error("RTP bridge/consumer enqueue failed: {reason}")]
    RtpMuxer { reason: String },

    #[error("reached end of media in decoder sample iterator")]
    SystemFileEof,

    #[error("HTTP reader exhausted before the expected payload was read")]
    HttpRequestEof,

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Mp4Error>,
    },
}

pub type Result<T> = std::result::Result<T, Mp4Error>;

/// Mirrors the teacher's `anyhow::Context` wrapping style (see
/// `samples.rs`/`api.rs`) but keeps the typed error so callers crossing the
/// MP4/RTC boundary can still match on `Mp4Error` variants.
pub trait Mp4ErrorContext<T> {
    fn mp4_context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> Mp4ErrorContext<T> for Result<T> {
    fn mp4_context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Mp4Error::Context {
            context: context.into(),
            source: Box::new(e),
        })
    }
}
