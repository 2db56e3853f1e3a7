//! Sample manager (spec §4.3): ties the sample stream to the `stbl`/`trun`
//! tables. `load` walks a decoded `moov` into a flat, offset-ordered sample
//! list; `write` walks stored samples back into `stbl` boxes. Grounded on
//! `SrsMp4SampleManager::load`/`write` in the original
//! `srs_kernel_mp4.cpp`, and on the teacher's `samples.rs` chunk-walking
//! arithmetic (`get_sample_file_offset`).

use std::collections::BTreeMap;

use crate::boxes::FourCC;
use crate::boxes_ext::media_header::{DataEntryBox, ElstBox, SmhdBox, VmhdBox};
use crate::boxes_ext::sample_entry_fields::{AudioEntryPrefix, VisualEntryPrefix};
use crate::boxes_ext::sample_table::{ChunkOffsetBox, CttsBox, SttsBox, StscBox, StssBox, StszBox};
use crate::boxtree::{Mp4Node, NodeBody};
use crate::error::{Mp4Error, Result};

#[derive(Debug, Clone)]
pub struct Sample {
    pub offset: u64,
    pub size: u32,
    pub dts: i64,
    pub pts: i64,
    pub is_key: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Track {
    pub track_id: u32,
    pub timescale: u32,
    pub samples: Vec<Sample>,
}

impl Track {
    pub fn push(&mut self, s: Sample) {
        self.samples.push(s);
    }
}

#[derive(Debug, Default)]
pub struct SampleManager {
    pub video: Option<Track>,
    pub audio: Option<Track>,
}

/// Step 5 of spec §4.3 load: align the two tracks' origins. `maxp`/`maxn`
/// name the original's paired max-positive/max-negative skew variables;
/// here they reduce to "how much later does the other track start", which
/// is always mutually exclusive with its counterpart, so the spec's gating
/// condition `maxp*maxn==0 && maxp+maxn!=0` is equivalent to "the two
/// tracks don't already share an origin".
fn dts_alignment_adjustment(reference_first: i64, other_first: i64) -> i64 {
    let maxp = (reference_first - other_first).max(0);
    let maxn = (other_first - reference_first).max(0);
    if maxp * maxn == 0 && maxp + maxn != 0 {
        reference_first - other_first
    } else {
        0
    }
}

impl SampleManager {
    /// Decoder-path load (spec §4.3): given a decoded `moov`, extract every
    /// track's samples in file-offset order.
    pub fn load(moov: &Mp4Node) -> Result<Self> {
        let mut video = None;
        let mut audio = None;

        for trak in moov.children().iter().filter(|c| c.typ.as_str_lossy() == "trak") {
            trak.get("tkhd").ok_or_else(|| Mp4Error::IllegalTrack {
                expected: FourCC::from_str("tkhd").unwrap(),
            })?;
            let mdia = trak.get("mdia").ok_or_else(|| Mp4Error::IllegalTrack {
                expected: FourCC::from_str("mdia").unwrap(),
            })?;
            let mdhd = mdia
                .get("mdhd")
                .and_then(|n| n.as_leaf::<crate::boxes_ext::movie_header::MdhdBox>())
                .ok_or_else(|| Mp4Error::IllegalTrack {
                    expected: FourCC::from_str("mdhd").unwrap(),
                })?;
            let hdlr = mdia
                .get("hdlr")
                .and_then(|n| n.as_leaf::<crate::boxes_ext::movie_header::HdlrBox>())
                .ok_or_else(|| Mp4Error::IllegalTrack {
                    expected: FourCC::from_str("hdlr").unwrap(),
                })?;
            let is_audio = hdlr.handler_type.as_str_lossy() == "soun";

            let minf = mdia.get("minf").ok_or_else(|| Mp4Error::IllegalTrack {
                expected: FourCC::from_str("minf").unwrap(),
            })?;
            let stbl = minf.get("stbl").ok_or_else(|| Mp4Error::IllegalTrack {
                expected: FourCC::from_str("stbl").unwrap(),
            })?;

            let stts = stbl
                .get("stts")
                .and_then(|n| n.as_leaf::<SttsBox>())
                .ok_or_else(|| Mp4Error::IllegalTrack {
                    expected: FourCC::from_str("stts").unwrap(),
                })?;
            let stsz = stbl
                .get("stsz")
                .and_then(|n| n.as_leaf::<StszBox>())
                .ok_or_else(|| Mp4Error::IllegalTrack {
                    expected: FourCC::from_str("stsz").unwrap(),
                })?;
            let stsc = stbl
                .get("stsc")
                .and_then(|n| n.as_leaf::<StscBox>())
                .ok_or_else(|| Mp4Error::IllegalTrack {
                    expected: FourCC::from_str("stsc").unwrap(),
                })?;
            let co = stbl
                .get("stco")
                .and_then(|n| n.as_leaf::<ChunkOffsetBox>())
                .or_else(|| stbl.get("co64").and_then(|n| n.as_leaf::<ChunkOffsetBox>()))
                .ok_or_else(|| Mp4Error::IllegalTrack {
                    expected: FourCC::from_str("stco").unwrap(),
                })?;
            let ctts = stbl.get("ctts").and_then(|n| n.as_leaf::<CttsBox>());
            let stss = stbl.get("stss").and_then(|n| n.as_leaf::<StssBox>());

            let declared_count = stsz.sizes.len() as u32;

            // 1-2. Walk chunks, pulling samples_per_chunk runs from stsc.
            let mut samples = Vec::with_capacity(declared_count as usize);
            let mut sample_index = 0usize;
            let mut dts: i64 = 0;
            let mut stts_run = 0usize;
            let mut stts_remaining = stts.entries.first().map(|e| e.0).unwrap_or(0);
            let mut ctts_run = 0usize;
            let mut ctts_remaining = ctts.and_then(|c| c.entries.first()).map(|e| e.0).unwrap_or(0);

            'chunks: for (chunk_idx, &chunk_offset) in co.offsets.iter().enumerate() {
                let chunk_number = (chunk_idx + 1) as u32;
                let samples_per_chunk = stsc_run_for_chunk(&stsc.entries, chunk_number);
                let mut intra_offset = 0u64;
                for _ in 0..samples_per_chunk {
                    if sample_index as u32 >= declared_count {
                        break 'chunks;
                    }
                    let size = stsz.sizes[sample_index];

                    // 3. DTS from stts run.
                    while stts_remaining == 0 && stts_run + 1 < stts.entries.len() {
                        stts_run += 1;
                        stts_remaining = stts.entries[stts_run].0;
                    }
                    let delta = stts.entries.get(stts_run).map(|e| e.1).unwrap_or(0);
                    let this_dts = dts;
                    if stts_remaining > 0 {
                        stts_remaining -= 1;
                        dts += delta as i64;
                    }

                    let mut cts_offset = 0i64;
                    if let Some(ctts) = ctts {
                        while ctts_remaining == 0 && ctts_run + 1 < ctts.entries.len() {
                            ctts_run += 1;
                            ctts_remaining = ctts.entries[ctts_run].0;
                        }
                        cts_offset = ctts.entries.get(ctts_run).map(|e| e.1 as i64).unwrap_or(0);
                        if ctts_remaining > 0 {
                            ctts_remaining -= 1;
                        }
                    }

                    let is_key = match stss {
                        Some(s) => s.sample_numbers.contains(&((sample_index + 1) as u32)),
                        None => true,
                    };

                    samples.push(Sample {
                        offset: chunk_offset + intra_offset,
                        size,
                        dts: this_dts,
                        pts: this_dts + cts_offset,
                        is_key,
                    });
                    intra_offset += size as u64;
                    sample_index += 1;
                }
            }

            if sample_index as u32 != declared_count {
                return Err(Mp4Error::IllegalSamples {
                    counted: sample_index as u32,
                    declared: declared_count,
                });
            }

            let track = Track {
                track_id: 0,
                timescale: mdhd.timescale,
                samples,
            };
            if is_audio {
                audio = Some(track);
            } else {
                video = Some(track);
            }
        }

        // 5. Align audio origin to video's (or vice versa if only one side
        // is present, the adjustment is simply zero).
        if let (Some(v), Some(a)) = (&video, &mut audio) {
            if let (Some(vf), Some(af)) = (v.samples.first(), a.samples.first()) {
                let adj = dts_alignment_adjustment(vf.dts, af.dts);
                if adj != 0 {
                    for s in &mut a.samples {
                        s.dts += adj;
                        s.pts += adj;
                    }
                }
            }
        }

        Ok(SampleManager { video, audio })
    }

    /// Merges both tracks into a single offset-keyed ordered map so
    /// downstream iteration is file-order (spec §4.3 step 4).
    pub fn merged_by_offset(&self) -> BTreeMap<u64, (bool, Sample)> {
        let mut out = BTreeMap::new();
        if let Some(v) = &self.video {
            for s in &v.samples {
                out.insert(s.offset, (false, s.clone()));
            }
        }
        if let Some(a) = &self.audio {
            for s in &a.samples {
                out.insert(s.offset, (true, s.clone()));
            }
        }
        out
    }

    /// Encoder-path write (spec §4.3): emits `stts`/`stss`/`ctts`/`stsc`/
    /// `stsz`/`stco`-or-`co64` for one track's stored samples.
    pub fn write_stbl_children(track: &Track, is_video: bool) -> Vec<Mp4Node> {
        let mut out = Vec::new();

        // stts: coalesce equal deltas into runs. Every sample carries a
        // duration (spec §8.2 S8 expects `count == sample_count`, not
        // `sample_count - 1`), so the last sample repeats the prior delta.
        let n = track.samples.len();
        let mut deltas: Vec<u32> = Vec::with_capacity(n);
        for i in 0..n.saturating_sub(1) {
            deltas.push((track.samples[i + 1].dts - track.samples[i].dts).max(0) as u32);
        }
        if n >= 1 {
            deltas.push(deltas.last().copied().unwrap_or(0));
        }
        let mut stts_entries: Vec<(u32, u32)> = Vec::new();
        for delta in deltas {
            match stts_entries.last_mut() {
                Some((count, d)) if *d == delta => *count += 1,
                _ => stts_entries.push((1, delta)),
            }
        }
        out.push(Mp4Node::leaf(
            FourCC::from_str("stts").unwrap(),
            Box::new(SttsBox { entries: stts_entries }),
        ));

        if is_video {
            // stss: 1-based indices of key frames.
            let stss_numbers: Vec<u32> = track
                .samples
                .iter()
                .enumerate()
                .filter(|(_, s)| s.is_key)
                .map(|(i, _)| (i + 1) as u32)
                .collect();
            if stss_numbers.len() != track.samples.len() {
                out.push(Mp4Node::leaf(
                    FourCC::from_str("stss").unwrap(),
                    Box::new(StssBox {
                        sample_numbers: stss_numbers,
                    }),
                ));
            }

            // ctts: coalesce equal (pts-dts) offsets; version=1 iff any negative.
            let mut ctts_entries: Vec<(u32, i32)> = Vec::new();
            let mut any_negative = false;
            for s in &track.samples {
                let off = (s.pts - s.dts) as i32;
                if off < 0 {
                    any_negative = true;
                }
                match ctts_entries.last_mut() {
                    Some((count, o)) if *o == off => *count += 1,
                    _ => ctts_entries.push((1, off)),
                }
            }
            let has_cts = ctts_entries.iter().any(|(_, o)| *o != 0);
            if has_cts {
                out.push(Mp4Node::leaf(
                    FourCC::from_str("ctts").unwrap(),
                    Box::new(CttsBox {
                        version: if any_negative { 1 } else { 0 },
                        entries: ctts_entries,
                    }),
                ));
            }
        }

        // stsc: single run, one sample per chunk.
        out.push(Mp4Node::leaf(
            FourCC::from_str("stsc").unwrap(),
            Box::new(StscBox {
                entries: vec![(1, 1, 1)],
            }),
        ));

        // stsz: variable mode with per-sample sizes.
        out.push(Mp4Node::leaf(
            FourCC::from_str("stsz").unwrap(),
            Box::new(StszBox {
                sample_size: 0,
                sizes: track.samples.iter().map(|s| s.size).collect(),
            }),
        ));

        // Offsets: co64 iff the largest offset >= 2^32.
        let offsets: Vec<u64> = track.samples.iter().map(|s| s.offset).collect();
        let needs64 = offsets.iter().any(|&o| o >= u32::MAX as u64);
        let typ = if needs64 { "co64" } else { "stco" };
        out.push(Mp4Node::leaf(
            FourCC::from_str(typ).unwrap(),
            Box::new(ChunkOffsetBox {
                is64: needs64,
                offsets,
            }),
        ));

        out
    }

    /// `dinf(dref(url))` self-contained data reference, identical across
    /// every track (spec §4.4 moov shape).
    pub fn self_contained_dinf() -> Mp4Node {
        let url = Mp4Node::leaf(
            FourCC::from_str("url ").unwrap(),
            Box::new(DataEntryBox::url_self_contained()),
        );
        Mp4Node {
            typ: FourCC::from_str("dinf").unwrap(),
            uuid: None,
            body: NodeBody::Container(vec![Mp4Node {
                typ: FourCC::from_str("dref").unwrap(),
                uuid: None,
                body: NodeBody::FullContainer {
                    version: 0,
                    flags: 0,
                    prefix: 1u32.to_be_bytes().to_vec(),
                    children: vec![url],
                },
            }]),
        }
    }

    pub fn media_handler_box(is_video: bool) -> Mp4Node {
        if is_video {
            Mp4Node::leaf(FourCC::from_str("vmhd").unwrap(), Box::new(VmhdBox))
        } else {
            Mp4Node::leaf(FourCC::from_str("smhd").unwrap(), Box::new(SmhdBox))
        }
    }

    pub fn empty_edts() -> Mp4Node {
        Mp4Node {
            typ: FourCC::from_str("edts").unwrap(),
            uuid: None,
            body: NodeBody::Container(vec![Mp4Node::leaf(
                FourCC::from_str("elst").unwrap(),
                Box::new(ElstBox::default()),
            )]),
        }
    }
}

fn stsc_run_for_chunk(entries: &[(u32, u32, u32)], chunk_number: u32) -> u32 {
    let mut samples_per_chunk = entries.first().map(|e| e.1).unwrap_or(1);
    for &(first_chunk, spc, _sdi) in entries {
        if first_chunk <= chunk_number {
            samples_per_chunk = spc;
        } else {
            break;
        }
    }
    samples_per_chunk
}

pub fn visual_entry_prefix(width: u16, height: u16) -> VisualEntryPrefix {
    VisualEntryPrefix { width, height }
}

pub fn audio_entry_prefix(channel_count: u16, sample_size: u16, sample_rate: u32) -> AudioEntryPrefix {
    AudioEntryPrefix {
        channel_count,
        sample_size,
        sample_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stts_coalesces_constant_delta_into_one_run() {
        let mut track = Track::default();
        for i in 0..100u32 {
            track.push(Sample {
                offset: i as u64 * 100,
                size: 100,
                dts: i as i64 * 40,
                pts: i as i64 * 40,
                is_key: i == 0,
            });
        }
        let children = SampleManager::write_stbl_children(&track, true);
        let stts = children
            .iter()
            .find(|c| c.typ.as_str_lossy() == "stts")
            .and_then(|n| n.as_leaf::<SttsBox>())
            .unwrap();
        assert_eq!(stts.entries, vec![(100, 40)]);
    }

    #[test]
    fn dts_alignment_shifts_the_later_starting_track() {
        assert_eq!(dts_alignment_adjustment(100, 0), 100);
        assert_eq!(dts_alignment_adjustment(0, 0), 0);
    }
}
