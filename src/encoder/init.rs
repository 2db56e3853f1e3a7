//! Fragmented MP4 init segment encoder (spec §4.5).

use std::io::Write;

use crate::boxes::FourCC;
use crate::boxes_ext::fragment::TrexBox;
use crate::boxes_ext::movie_header::MvhdBox;
use crate::boxes_ext::raw::FtypBox;
use crate::boxtree::{Mp4Node, NodeBody};
use crate::cenc_config::CencConfig;
use crate::encoder::{build_trak, CodecConfig};
use crate::error::Result;

fn fourcc(s: &str) -> FourCC {
    FourCC::from_str(s).unwrap()
}

/// One empty `stbl` (stts/stsc/stsz/stco with zero entries), matching the
/// shape a fragmented init segment's `moov` carries (spec §4.5: "the moov
/// contains empty stts/stsc/stsz/stco in the sample table").
fn empty_stbl_tables() -> Vec<Mp4Node> {
    vec![
        Mp4Node::leaf(
            fourcc("stts"),
            Box::new(crate::boxes_ext::sample_table::SttsBox::default()),
        ),
        Mp4Node::leaf(
            fourcc("stsc"),
            Box::new(crate::boxes_ext::sample_table::StscBox::default()),
        ),
        Mp4Node::leaf(
            fourcc("stsz"),
            Box::new(crate::boxes_ext::sample_table::StszBox::default()),
        ),
        Mp4Node::leaf(
            fourcc("stco"),
            Box::new(crate::boxes_ext::sample_table::ChunkOffsetBox::default()),
        ),
    ]
}

/// Writes `ftyp(iso5) + moov(mvhd + trak* + mvex(trex*))` for a fragmented
/// stream declaring the given tracks.
pub fn encode_init_segment<W: Write>(
    w: &mut W,
    timescale: u32,
    tracks: &[CodecConfig],
    cenc: Option<&CencConfig>,
) -> Result<()> {
    let ftyp = Mp4Node::leaf(
        fourcc("ftyp"),
        Box::new(FtypBox::new("iso5", 512, &["iso6", "mp41"])),
    );
    ftyp.encode(w)?;

    let mut traks = Vec::new();
    let mut trexes = Vec::new();
    let mut track_id = 1u32;
    for codec in tracks {
        let stbl = empty_stbl_tables();
        traks.push(build_trak(track_id, timescale, 0, codec, cenc, stbl));
        trexes.push(Mp4Node::leaf(fourcc("trex"), Box::new(TrexBox::new(track_id))));
        track_id += 1;
    }
    let next_track_id = track_id;

    let mvhd = Mp4Node::leaf(
        fourcc("mvhd"),
        Box::new(MvhdBox {
            version: 0,
            creation_time: 0,
            modification_time: 0,
            timescale,
            duration: 0,
            rate: 0x0001_0000,
            next_track_id,
        }),
    );

    let mvex = Mp4Node {
        typ: fourcc("mvex"),
        uuid: None,
        body: NodeBody::Container(trexes),
    };

    let mut moov_children = vec![mvhd];
    moov_children.extend(traks);
    moov_children.push(mvex);
    let moov = Mp4Node::container(fourcc("moov"), moov_children);
    moov.encode(w)?;
    Ok(())
}

// Re-exported so callers can build a bare stsd for inspection/testing
// without going through the full init segment.
pub use crate::encoder::build_stsd as build_sample_description;
