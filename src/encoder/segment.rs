//! Fragmented MP4 (CMAF) media segment encoder (spec §4.5): `styp + sidx +
//! moof(mfhd+traf(tfhd+tfdt+trun)) + mdat`.

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::boxes::FourCC;
use crate::boxes_ext::fragment::{
    MfhdBox, SidxBox, SidxReference, TfdtBox, TfhdBox, TrunBox, TrunSample, SAMPLE_FLAGS_FIRST,
    SAMPLE_FLAGS_NON_KEY, TFHD_DEFAULT_BASE_IS_MOOF, TRUN_DATA_OFFSET, TRUN_FIRST_SAMPLE_FLAGS,
    TRUN_SAMPLE_CTS, TRUN_SAMPLE_DURATION, TRUN_SAMPLE_FLAGS, TRUN_SAMPLE_SIZE,
};
use crate::boxes_ext::raw::FtypBox;
use crate::boxtree::Mp4Node;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct SegmentSample {
    pub dts: i64,
    pub pts: i64,
    pub size: u32,
    pub is_key: bool,
    pub data: Vec<u8>,
}

const MDAT_HEADER_LEN: u64 = 8;

/// `samples` belong to a single track (`track_id`). `segment_end_dts` bounds
/// the last sample's synthesized duration.
pub fn encode_segment<W: Write>(
    w: &mut W,
    sequence_number: u32,
    base_time_ms: u64,
    track_id: u32,
    samples: &[SegmentSample],
    segment_end_dts: i64,
) -> Result<()> {
    let styp = Mp4Node::leaf(
        FourCC::from_str("styp").unwrap(),
        Box::new(FtypBox::new("msdh", 0, &["msdh", "msix"])),
    );

    let any_negative_cts = samples.iter().any(|s| s.pts < s.dts);
    let trun_flags = TRUN_DATA_OFFSET
        | TRUN_FIRST_SAMPLE_FLAGS
        | TRUN_SAMPLE_DURATION
        | TRUN_SAMPLE_SIZE
        | TRUN_SAMPLE_FLAGS
        | TRUN_SAMPLE_CTS;

    let trun_samples: Vec<TrunSample> = samples
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let duration = if i + 1 < samples.len() {
                (samples[i + 1].dts - s.dts).max(0) as u32
            } else {
                (segment_end_dts - s.dts).max(0) as u32
            };
            TrunSample {
                duration,
                size: s.size,
                flags: if s.is_key { 0 } else { SAMPLE_FLAGS_NON_KEY },
                cts: (s.pts - s.dts) as i32,
            }
        })
        .collect();

    let mut trun = TrunBox {
        version: if any_negative_cts { 1 } else { 0 },
        flags: trun_flags,
        data_offset: Some(0), // patched below once moof size is known
        first_sample_flags: Some(SAMPLE_FLAGS_FIRST),
        samples: trun_samples,
    };

    fn build_moof(
        sequence_number: u32,
        track_id: u32,
        base_time_ms: u64,
        trun: &TrunBox,
    ) -> Mp4Node {
        let tfhd = Mp4Node::leaf(
            FourCC::from_str("tfhd").unwrap(),
            Box::new(TfhdBox {
                flags: TFHD_DEFAULT_BASE_IS_MOOF,
                track_id,
                base_data_offset: None,
                sample_description_index: None,
                default_sample_duration: None,
                default_sample_size: None,
                default_sample_flags: None,
            }),
        );
        let tfdt = Mp4Node::leaf(
            FourCC::from_str("tfdt").unwrap(),
            Box::new(TfdtBox {
                version: 1,
                base_media_decode_time: base_time_ms,
            }),
        );
        let trun_node = Mp4Node::leaf(FourCC::from_str("trun").unwrap(), Box::new(trun.clone()));
        let traf = Mp4Node::container(FourCC::from_str("traf").unwrap(), vec![tfhd, tfdt, trun_node]);
        Mp4Node::container(
            FourCC::from_str("moof").unwrap(),
            vec![mfhd_node(sequence_number), traf],
        )
    }

    // trun.data_offset is a fixed-width field, so its value doesn't affect
    // moof's encoded size: size first with a placeholder, then patch.
    let moof_size = build_moof(sequence_number, track_id, base_time_ms, &trun).nb_bytes();
    trun.data_offset = Some((moof_size + MDAT_HEADER_LEN) as i32);
    let moof = build_moof(sequence_number, track_id, base_time_ms, &trun);

    let mdat_payload_len: u64 = samples.iter().map(|s| s.size as u64).sum();

    let first_dts = samples.first().map(|s| s.dts).unwrap_or(0);
    let sidx = Mp4Node::leaf(
        FourCC::from_str("sidx").unwrap(),
        Box::new(SidxBox {
            version: 0,
            reference_id: track_id,
            timescale: 1000,
            earliest_presentation_time: base_time_ms / 1000,
            first_offset: 0,
            references: vec![SidxReference {
                reference_type: 0,
                referenced_size: (moof.nb_bytes() + MDAT_HEADER_LEN + mdat_payload_len) as u32,
                subsegment_duration: (segment_end_dts - first_dts).max(0) as u32,
                starts_with_sap: 1,
                sap_type: 1,
                sap_delta_time: 0,
            }],
        }),
    );

    styp.encode(w)?;
    sidx.encode(w)?;
    moof.encode(w)?;

    w.write_u32::<BigEndian>((MDAT_HEADER_LEN + mdat_payload_len) as u32)?;
    w.write_all(b"mdat")?;
    for s in samples {
        w.write_all(&s.data)?;
    }
    Ok(())
}

fn mfhd_node(sequence_number: u32) -> Mp4Node {
    Mp4Node::leaf(
        FourCC::from_str("mfhd").unwrap(),
        Box::new(MfhdBox { sequence_number }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_layout_matches_s2_scenario() {
        let samples = vec![
            SegmentSample {
                dts: 1000,
                pts: 1000,
                size: 4096,
                is_key: true,
                data: vec![0xAAu8; 4096],
            },
            SegmentSample {
                dts: 1040,
                pts: 1040,
                size: 1024,
                is_key: false,
                data: vec![0xBBu8; 1024],
            },
        ];
        let mut buf = Vec::new();
        encode_segment(&mut buf, 2, 1000, 1, &samples, 1040).unwrap();

        assert_eq!(&buf[4..8], b"styp");
        let styp_size = u32::from_be_bytes(buf[0..4].try_into().unwrap()) as usize;
        assert_eq!(&buf[styp_size + 4..styp_size + 8], b"sidx");
        let sidx_size = u32::from_be_bytes(buf[styp_size..styp_size + 4].try_into().unwrap()) as usize;
        let moof_start = styp_size + sidx_size;
        assert_eq!(&buf[moof_start + 4..moof_start + 8], b"moof");
        let moof_size = u32::from_be_bytes(buf[moof_start..moof_start + 4].try_into().unwrap()) as usize;
        let mdat_start = moof_start + moof_size;
        assert_eq!(&buf[mdat_start + 4..mdat_start + 8], b"mdat");
        let mdat_size = u32::from_be_bytes(buf[mdat_start..mdat_start + 4].try_into().unwrap()) as usize;
        assert_eq!(mdat_size, 4096 + 1024 + 8);
    }
}
