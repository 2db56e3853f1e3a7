//! Progressive MP4 encoder (spec §4.4). State machine: `Init → WroteFtyp →
//! WroteFreePlaceholder → WroteMdatHeader → Receiving → Flushed`.

use std::io::{Seek, SeekFrom, Write};

use byteorder::{BigEndian, WriteBytesExt};

use crate::boxes::FourCC;
use crate::boxes_ext::movie_header::MvhdBox;
use crate::boxes_ext::raw::FtypBox;
use crate::boxtree::Mp4Node;
use crate::cenc_config::CencConfig;
use crate::encoder::{build_trak, stbl_tables_for, CodecConfig};
use crate::error::{Mp4Error, Result};
use crate::sample_manager::{Sample, Track};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Init,
    WroteFtyp,
    WroteFreePlaceholder,
    WroteMdatHeader,
    Receiving,
    Flushed,
}

const FREE_PLACEHOLDER_LEN: u64 = 8;
const MDAT_HEADER_SMALL_LEN: u64 = 8;
const MDAT_HEADER_LARGE_LEN: u64 = 16;

pub struct ProgressiveEncoder<W: Write + Seek> {
    writer: W,
    state: State,
    mdat_offset: u64,
    mdat_bytes: u64,
    video_codec: Option<CodecConfig>,
    audio_codec: Option<CodecConfig>,
    video: Track,
    audio: Track,
    timescale: u32,
}

impl<W: Write + Seek> ProgressiveEncoder<W> {
    pub fn new(mut writer: W, timescale: u32) -> Result<Self> {
        // 1. Initialize: ftyp, 8-byte free placeholder, 8-byte mdat
        // placeholder header. The free placeholder is what lets the mdat
        // header grow to largesize later without shifting payload bytes.
        let ftyp = Mp4Node::leaf(
            FourCC::from_str("ftyp").unwrap(),
            Box::new(FtypBox::new("isom", 512, &["isom", "iso2", "mp41"])),
        );
        ftyp.encode(&mut writer)?;

        writer.write_u32::<BigEndian>(FREE_PLACEHOLDER_LEN as u32)?;
        writer.write_all(b"free")?;

        let mdat_offset = writer.stream_position()?;
        writer.write_u32::<BigEndian>(MDAT_HEADER_SMALL_LEN as u32)?;
        writer.write_all(b"mdat")?;

        Ok(ProgressiveEncoder {
            writer,
            state: State::Receiving,
            mdat_offset,
            mdat_bytes: 0,
            video_codec: None,
            audio_codec: None,
            video: Track::default(),
            audio: Track::default(),
            timescale,
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// 2. Write sample: sequence headers are captured as codec config and
    /// never written to `mdat`; subsequent samples with a different
    /// sequence header are rejected.
    pub fn write_sequence_header(&mut self, codec: CodecConfig) -> Result<()> {
        match &codec {
            CodecConfig::Avc { .. } => {
                if let Some(existing) = &self.video_codec {
                    if !matches!(existing, CodecConfig::Avc { .. }) || !codec_eq(existing, &codec) {
                        log::warn!("rejecting mid-stream avcC change");
                        return Err(Mp4Error::AvccChange);
                    }
                } else {
                    self.video_codec = Some(codec);
                }
            }
            CodecConfig::Hevc { .. } => {
                if let Some(existing) = &self.video_codec {
                    if !matches!(existing, CodecConfig::Hevc { .. }) || !codec_eq(existing, &codec) {
                        log::warn!("rejecting mid-stream hvcC change");
                        return Err(Mp4Error::HvccChange);
                    }
                } else {
                    self.video_codec = Some(codec);
                }
            }
            CodecConfig::Aac { .. } => {
                if let Some(existing) = &self.audio_codec {
                    if !codec_eq(existing, &codec) {
                        log::warn!("rejecting mid-stream audio specific config change");
                        return Err(Mp4Error::AscChange);
                    }
                } else {
                    self.audio_codec = Some(codec);
                }
            }
        }
        Ok(())
    }

    pub fn write_sample(&mut self, is_video: bool, dts: i64, pts: i64, is_key: bool, data: &[u8]) -> Result<()> {
        let offset = self.writer.stream_position()?;
        self.writer.write_all(data)?;
        self.mdat_bytes += data.len() as u64;
        let sample = Sample {
            offset,
            size: data.len() as u32,
            dts,
            pts,
            is_key,
        };
        if is_video {
            self.video.push(sample);
        } else {
            self.audio.push(sample);
        }
        Ok(())
    }

    /// 3. Flush: requires at least one sample, builds `moov`, rewrites the
    /// `mdat` header (growing to `largesize` and consuming the `free`
    /// placeholder if needed).
    pub fn flush(mut self) -> Result<W> {
        if self.video.samples.is_empty() && self.audio.samples.is_empty() {
            return Err(Mp4Error::IllegalMoov {
                reason: "flush with no audio or video samples",
            });
        }

        let mut traks = Vec::new();
        let mut next_track_id = 1u32;
        let mut max_duration = 0u64;

        if let (Some(codec), false) = (&self.video_codec, self.video.samples.is_empty()) {
            let track_id = next_track_id;
            next_track_id += 1;
            let duration = track_duration(&self.video);
            max_duration = max_duration.max(duration);
            let stbl = stbl_tables_for(&self.video, true);
            traks.push(build_trak(track_id, self.timescale, duration, codec, None, stbl));
        }
        if let (Some(codec), false) = (&self.audio_codec, self.audio.samples.is_empty()) {
            let track_id = next_track_id;
            next_track_id += 1;
            let duration = track_duration(&self.audio);
            max_duration = max_duration.max(duration);
            let stbl = stbl_tables_for(&self.audio, false);
            traks.push(build_trak(track_id, self.timescale, duration, codec, None, stbl));
        }

        let mvhd = Mp4Node::leaf(
            FourCC::from_str("mvhd").unwrap(),
            Box::new(MvhdBox {
                version: 0,
                creation_time: 0,
                modification_time: 0,
                timescale: self.timescale,
                duration: max_duration,
                rate: 0x0001_0000,
                next_track_id,
            }),
        );
        let mut moov_children = vec![mvhd];
        moov_children.extend(traks);
        let moov = Mp4Node::container(FourCC::from_str("moov").unwrap(), moov_children);
        moov.encode(&mut self.writer)?;

        let header_len = if (self.mdat_bytes + MDAT_HEADER_SMALL_LEN) > u32::MAX as u64 {
            MDAT_HEADER_LARGE_LEN
        } else {
            MDAT_HEADER_SMALL_LEN
        };
        let mdat_write_offset = if header_len == MDAT_HEADER_LARGE_LEN {
            self.mdat_offset - FREE_PLACEHOLDER_LEN
        } else {
            self.mdat_offset
        };

        self.writer.seek(SeekFrom::Start(mdat_write_offset))?;
        if header_len == MDAT_HEADER_LARGE_LEN {
            self.writer.write_u32::<BigEndian>(1)?;
            self.writer.write_all(b"mdat")?;
            self.writer
                .write_u64::<BigEndian>(self.mdat_bytes + MDAT_HEADER_LARGE_LEN)?;
        } else {
            self.writer
                .write_u32::<BigEndian>((self.mdat_bytes + MDAT_HEADER_SMALL_LEN) as u32)?;
            self.writer.write_all(b"mdat")?;
        }

        self.state = State::Flushed;
        self.writer.seek(SeekFrom::End(0))?;
        Ok(self.writer)
    }
}

fn codec_eq(a: &CodecConfig, b: &CodecConfig) -> bool {
    match (a, b) {
        (
            CodecConfig::Avc {
                avc_decoder_config: x,
                ..
            },
            CodecConfig::Avc {
                avc_decoder_config: y,
                ..
            },
        ) => x == y,
        (
            CodecConfig::Hevc {
                hvc_decoder_config: x,
                ..
            },
            CodecConfig::Hevc {
                hvc_decoder_config: y,
                ..
            },
        ) => x == y,
        (CodecConfig::Aac { asc: x, .. }, CodecConfig::Aac { asc: y, .. }) => x == y,
        _ => false,
    }
}

fn track_duration(t: &Track) -> u64 {
    match (t.samples.first(), t.samples.last()) {
        (Some(first), Some(last)) => (last.dts - first.dts).max(0) as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn flush_with_2g_mdat_grows_header_and_consumes_free_placeholder() {
        let mut enc = ProgressiveEncoder::new(Cursor::new(Vec::new()), 1000).unwrap();
        enc.write_sequence_header(CodecConfig::Avc {
            width: 1280,
            height: 720,
            avc_decoder_config: vec![0x01, 0x64, 0x00, 0x1e],
        })
        .unwrap();

        // 10 samples totaling 2^32 + 1 bytes.
        let big = vec![0u8; 429_496_730]; // ~ (2^32+1)/10
        for i in 0..10u32 {
            enc.write_sample(true, i as i64 * 40, i as i64 * 40, i == 0, &big)
                .unwrap();
        }
        let total: u64 = 10 * big.len() as u64;
        assert!(total >= (1u64 << 32));

        let mdat_offset_before = enc.mdat_offset;
        let out = enc.flush().unwrap().into_inner();

        // mdat header grew to 16 bytes (smallsize=1 + largesize), and the
        // header start moved back by 8 bytes (consuming the free
        // placeholder).
        let new_mdat_start = mdat_offset_before - FREE_PLACEHOLDER_LEN;
        assert_eq!(&out[new_mdat_start as usize + 4..new_mdat_start as usize + 8], b"mdat");
        let largesize = u64::from_be_bytes(
            out[new_mdat_start as usize + 8..new_mdat_start as usize + 16]
                .try_into()
                .unwrap(),
        );
        assert_eq!(largesize, total + MDAT_HEADER_LARGE_LEN);
    }
}
