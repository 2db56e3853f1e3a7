use std::io::Cursor;

use mp4_rtc_core::boxtree::decode_node;
use mp4_rtc_core::encoder::init::encode_init_segment;
use mp4_rtc_core::encoder::CodecConfig;

// S1: a fragmented init segment for one video + one audio track decodes
// back to ftyp(iso5) + moov(mvhd, trak*2, mvex(trex*2)) with empty sample
// tables in each trak's stbl.
#[test]
fn init_segment_has_empty_tables_and_one_trex_per_track() {
    let tracks = vec![
        CodecConfig::Avc {
            width: 1920,
            height: 1080,
            avc_decoder_config: vec![1, 2, 3, 4],
        },
        CodecConfig::Aac {
            channel_count: 2,
            sample_size: 16,
            sample_rate: 48000,
            asc: vec![0x11, 0x90],
        },
    ];

    let mut buf = Vec::new();
    encode_init_segment(&mut buf, 48000, &tracks, None).unwrap();

    let mut cursor = Cursor::new(buf);
    let end = cursor.get_ref().len() as u64;

    let ftyp = decode_node(&mut cursor, end).unwrap();
    assert_eq!(ftyp.typ.as_str_lossy(), "ftyp");

    let moov = decode_node(&mut cursor, end).unwrap();
    assert_eq!(moov.typ.as_str_lossy(), "moov");

    assert!(moov.get("mvhd").is_some());
    let traks: Vec<_> = moov.children().iter().filter(|c| c.typ.as_str_lossy() == "trak").collect();
    assert_eq!(traks.len(), 2);

    let mvex = moov.get("mvex").expect("mvex present");
    let trexes: Vec<_> = mvex.children().iter().filter(|c| c.typ.as_str_lossy() == "trex").collect();
    assert_eq!(trexes.len(), 2);

    for trak in &traks {
        let stbl = trak
            .get("mdia")
            .and_then(|m| m.get("minf"))
            .and_then(|m| m.get("stbl"))
            .expect("stbl present");
        for empty in ["stts", "stsc", "stsz", "stco"] {
            assert!(stbl.get(empty).is_some(), "missing {empty}");
        }
        assert!(stbl.get("stsd").is_some());
    }
}
