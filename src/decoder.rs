//! Stream-driven MP4 decoder (spec §4.6). Reads top-level boxes one at a
//! time; `mdat` payload bytes are never buffered, only seeked over.

use std::io::{Read, Seek, SeekFrom};

use crate::boxes::FourCC;
use crate::boxes_ext::esds::EsdsBox;
use crate::boxes_ext::movie_header::MvhdBox;
use crate::boxes_ext::raw::{FtypBox, RawLeaf};
use crate::boxes_ext::sample_entry_fields::{AudioEntryPrefix, VisualEntryPrefix};
use crate::boxtree::{decode_node, read_header, Mp4Node};
use crate::encoder::CodecConfig;
use crate::error::{Mp4Error, Result};
use crate::sample_manager::{Sample, SampleManager};

const ALLOWED_MAJOR_BRANDS: &[&str] = &["isom", "iso2", "avc1", "mp41", "iso5"];

#[derive(Debug, Clone)]
pub enum DecodedFrame {
    VideoSequenceHeader(CodecConfig),
    AudioSequenceHeader(CodecConfig),
    Sample {
        is_video: bool,
        dts_ms: i64,
        pts_ms: i64,
        is_key: bool,
        data: Vec<u8>,
    },
}

/// Stream-driven decoder (spec §4.6). Built by [`Mp4Decoder::open`], then
/// driven one frame at a time via [`Mp4Decoder::read_sample`].
pub struct Mp4Decoder<R: Read + Seek> {
    reader: R,
    video_codec: Option<CodecConfig>,
    audio_codec: Option<CodecConfig>,
    video_timescale: u32,
    audio_timescale: u32,
    samples: Vec<(bool, Sample)>,
    next_sample: usize,
    video_header_sent: bool,
    audio_header_sent: bool,
    position: u64,
}

impl<R: Read + Seek> Mp4Decoder<R> {
    /// Steps 1-5 of spec §4.6: scans top-level boxes, validates `ftyp`,
    /// tracks an `mdat` seen ahead of `moov`, then builds the sample
    /// manager and codec configs from `moov` once found.
    pub fn open(mut reader: R) -> Result<Self> {
        let file_len = {
            let end = reader.seek(SeekFrom::End(0))?;
            reader.seek(SeekFrom::Start(0))?;
            end
        };

        let mut mdat_offset: Option<u64> = None;
        let mut moov: Option<Mp4Node> = None;

        while reader.stream_position()? < file_len {
            let header = read_header(&mut reader)?;
            let type_str = header.typ.as_str_lossy();
            let end = header.end.unwrap_or(file_len);

            match type_str.as_str() {
                "ftyp" => {
                    reader.seek(SeekFrom::Start(header.start))?;
                    let node = decode_node(&mut reader, file_len)?;
                    let ftyp = node.as_leaf::<FtypBox>().ok_or(Mp4Error::IllegalMoov {
                        reason: "ftyp did not decode as a typed leaf",
                    })?;
                    if !ALLOWED_MAJOR_BRANDS.contains(&ftyp.major_brand.as_str_lossy().as_str()) {
                        log::warn!("rejecting ftyp with unsupported major brand {}", ftyp.major_brand.as_str_lossy());
                        return Err(Mp4Error::IllegalBrand {
                            brand: ftyp.major_brand,
                        });
                    }
                }
                "mdat" => {
                    if moov.is_none() && mdat_offset.is_none() {
                        mdat_offset = Some(header.start);
                    }
                    reader.seek(SeekFrom::Start(end))?;
                }
                "moov" => {
                    reader.seek(SeekFrom::Start(header.start))?;
                    let node = decode_node(&mut reader, file_len)?;
                    moov = Some(node);
                    break;
                }
                _ => {
                    reader.seek(SeekFrom::Start(end))?;
                }
            }
        }

        let moov = moov.ok_or(Mp4Error::IllegalMoov {
            reason: "no moov box found",
        })?;

        moov.get("mvhd")
            .and_then(|n| n.as_leaf::<MvhdBox>())
            .ok_or_else(|| Mp4Error::IllegalTrack {
                expected: FourCC::from_str("mvhd").unwrap(),
            })?;

        let traks: Vec<&Mp4Node> = moov
            .children()
            .iter()
            .filter(|c| c.typ.as_str_lossy() == "trak")
            .collect();
        if traks.is_empty() {
            return Err(Mp4Error::IllegalMoov {
                reason: "moov has no audio or video trak",
            });
        }

        let mut video_codec = None;
        let mut audio_codec = None;
        let mut video_timescale = 0u32;
        let mut audio_timescale = 0u32;

        for trak in &traks {
            let mdia = trak.get("mdia").ok_or_else(|| Mp4Error::IllegalTrack {
                expected: FourCC::from_str("mdia").unwrap(),
            })?;
            let mdhd = mdia
                .get("mdhd")
                .and_then(|n| n.as_leaf::<crate::boxes_ext::movie_header::MdhdBox>())
                .ok_or_else(|| Mp4Error::IllegalTrack {
                    expected: FourCC::from_str("mdhd").unwrap(),
                })?;
            let stsd = mdia
                .get("minf")
                .and_then(|m| m.get("stbl"))
                .and_then(|s| s.get("stsd"))
                .ok_or_else(|| Mp4Error::IllegalTrack {
                    expected: FourCC::from_str("stsd").unwrap(),
                })?;
            let entry = stsd.children().first().ok_or_else(|| Mp4Error::IllegalTrack {
                expected: FourCC::from_str("stsd").unwrap(),
            })?;
            let entry_type = entry.typ.as_str_lossy();

            let prefix = match &entry.body {
                crate::boxtree::NodeBody::EntryContainer { prefix, .. } => prefix.clone(),
                _ => {
                    return Err(Mp4Error::IllegalTrack {
                        expected: FourCC::from_str("stsd").unwrap(),
                    })
                }
            };

            match entry_type.as_str() {
                "avc1" => {
                    let v = VisualEntryPrefix::parse(&prefix);
                    let avcc = entry
                        .get("avcC")
                        .and_then(|n| n.as_leaf::<RawLeaf>())
                        .map(|l| l.data.clone())
                        .unwrap_or_default();
                    video_codec = Some(CodecConfig::Avc {
                        width: v.width,
                        height: v.height,
                        avc_decoder_config: avcc,
                    });
                    video_timescale = mdhd.timescale;
                }
                "hev1" => {
                    let v = VisualEntryPrefix::parse(&prefix);
                    let hvcc = entry
                        .get("hvcC")
                        .and_then(|n| n.as_leaf::<RawLeaf>())
                        .map(|l| l.data.clone())
                        .unwrap_or_default();
                    video_codec = Some(CodecConfig::Hevc {
                        width: v.width,
                        height: v.height,
                        hvc_decoder_config: hvcc,
                    });
                    video_timescale = mdhd.timescale;
                }
                "mp4a" => {
                    // Sample rate is read directly off the sample entry's
                    // 16.16 field; unlike the original's FLV-era
                    // srs_audio_sample_rate_from_number table (a coded
                    // index over a small fixed set of rates), ISO BMFF
                    // stores the rate verbatim so there's no table to
                    // invert.
                    let a = AudioEntryPrefix::parse(&prefix);
                    let asc = entry
                        .get("esds")
                        .and_then(|n| n.as_leaf::<EsdsBox>())
                        .map(|e| e.decoder_specific_info.clone())
                        .unwrap_or_default();
                    audio_codec = Some(CodecConfig::Aac {
                        channel_count: a.channel_count,
                        sample_size: a.sample_size,
                        sample_rate: a.sample_rate,
                        asc,
                    });
                    audio_timescale = mdhd.timescale;
                }
                _ => {}
            }
        }

        let manager = SampleManager::load(&moov)?;
        let samples: Vec<(bool, Sample)> = manager.merged_by_offset().into_values().collect();

        if let Some(off) = mdat_offset {
            reader.seek(SeekFrom::Start(off))?;
        }

        Ok(Mp4Decoder {
            reader,
            video_codec,
            audio_codec,
            video_timescale,
            audio_timescale,
            samples,
            next_sample: 0,
            video_header_sent: false,
            audio_header_sent: false,
            position: 0,
        })
    }

    /// Step 6/7 of spec §4.6: video sequence header (once), then audio
    /// sequence header (once), then stored samples in file-offset order.
    /// Returns `SYSTEM_FILE_EOF` once every sample has been delivered.
    pub fn read_sample(&mut self) -> Result<DecodedFrame> {
        if !self.video_header_sent {
            self.video_header_sent = true;
            if let Some(codec) = &self.video_codec {
                return Ok(DecodedFrame::VideoSequenceHeader(codec.clone()));
            }
        }
        if !self.audio_header_sent {
            self.audio_header_sent = true;
            if let Some(codec) = &self.audio_codec {
                return Ok(DecodedFrame::AudioSequenceHeader(codec.clone()));
            }
        }

        if self.next_sample >= self.samples.len() {
            return Err(Mp4Error::SystemFileEof);
        }

        let (is_audio, sample) = self.samples[self.next_sample].clone();
        self.next_sample += 1;

        if self.position != sample.offset {
            self.reader.seek(SeekFrom::Start(sample.offset))?;
        }
        let mut data = vec![0u8; sample.size as usize];
        self.reader.read_exact(&mut data)?;
        self.position = sample.offset + sample.size as u64;

        let timescale = if is_audio { self.audio_timescale } else { self.video_timescale };
        let to_ms = |t: i64| -> i64 {
            if timescale == 0 {
                0
            } else {
                t * 1000 / timescale as i64
            }
        };

        Ok(DecodedFrame::Sample {
            is_video: !is_audio,
            dts_ms: to_ms(sample.dts),
            pts_ms: to_ms(sample.pts),
            is_key: sample.is_key,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::progressive::ProgressiveEncoder;
    use std::io::Cursor;

    #[test]
    fn decodes_sequence_headers_then_samples_in_order() {
        let mut enc = ProgressiveEncoder::new(Cursor::new(Vec::new()), 1000).unwrap();
        enc.write_sequence_header(CodecConfig::Avc {
            width: 640,
            height: 480,
            avc_decoder_config: vec![0x01, 0x42, 0x00, 0x1e],
        })
        .unwrap();
        enc.write_sample(true, 0, 0, true, &[0xAA; 10]).unwrap();
        enc.write_sample(true, 40, 40, false, &[0xBB; 5]).unwrap();
        let out = enc.flush().unwrap().into_inner();

        let mut dec = Mp4Decoder::open(Cursor::new(out)).unwrap();
        match dec.read_sample().unwrap() {
            DecodedFrame::VideoSequenceHeader(CodecConfig::Avc { width, .. }) => assert_eq!(width, 640),
            other => panic!("expected video sequence header, got {other:?}"),
        }
        match dec.read_sample().unwrap() {
            DecodedFrame::Sample { is_video, is_key, data, .. } => {
                assert!(is_video);
                assert!(is_key);
                assert_eq!(data, vec![0xAA; 10]);
            }
            other => panic!("expected sample, got {other:?}"),
        }
        match dec.read_sample().unwrap() {
            DecodedFrame::Sample { is_key, data, .. } => {
                assert!(!is_key);
                assert_eq!(data, vec![0xBB; 5]);
            }
            other => panic!("expected sample, got {other:?}"),
        }
        assert!(matches!(dec.read_sample(), Err(Mp4Error::SystemFileEof)));
    }
}
