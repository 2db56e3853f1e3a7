use std::io::Cursor;

use mp4_rtc_core::boxes::FourCC;
use mp4_rtc_core::boxtree::{decode_node, Mp4Node};
use mp4_rtc_core::boxes_ext::raw::{FtypBox, RawLeaf};

fn fourcc(s: &str) -> FourCC {
    FourCC::from_str(s).unwrap()
}

// 8.1.1: encode(decode(bytes)) == bytes for a tree with every body shape
// (plain container, leaf, and a largesize-forcing leaf).
#[test]
fn decode_then_encode_round_trips_byte_for_byte() {
    let ftyp = Mp4Node::leaf(
        fourcc("ftyp"),
        Box::new(FtypBox::new("isom", 512, &["isom", "iso2", "avc1", "mp41"])),
    );
    let free = Mp4Node::leaf(fourcc("free"), Box::new(RawLeaf::of(vec![0u8; 16])));
    let moov = Mp4Node::container(fourcc("moov"), vec![free]);

    let mut original = Vec::new();
    ftyp.encode(&mut original).unwrap();
    moov.encode(&mut original).unwrap();

    let mut cursor = Cursor::new(original.clone());
    let end = original.len() as u64;
    let decoded_ftyp = decode_node(&mut cursor, end).unwrap();
    let decoded_moov = decode_node(&mut cursor, end).unwrap();

    let mut reencoded = Vec::new();
    decoded_ftyp.encode(&mut reencoded).unwrap();
    decoded_moov.encode(&mut reencoded).unwrap();

    assert_eq!(original, reencoded);
}

// 8.1.2: nb_bytes() matches the actual number of bytes `encode` writes,
// including the switch to a 64-bit largesize header past 4GiB.
#[test]
fn nb_bytes_matches_actual_encoded_length() {
    let leaf = Mp4Node::leaf(fourcc("free"), Box::new(RawLeaf::of(vec![7u8; 1000])));
    let mut out = Vec::new();
    leaf.encode(&mut out).unwrap();
    assert_eq!(leaf.nb_bytes(), out.len() as u64);

    struct HugeLeaf(u64);
    impl std::fmt::Debug for HugeLeaf {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "HugeLeaf({})", self.0)
        }
    }
    impl mp4_rtc_core::boxtree::LeafBox for HugeLeaf {
        fn encoded_len(&self) -> u64 {
            self.0
        }
        fn encode(&self, w: &mut dyn std::io::Write) -> mp4_rtc_core::Result<()> {
            let chunk = [0u8; 4096];
            let mut remaining = self.0;
            while remaining > 0 {
                let n = remaining.min(chunk.len() as u64) as usize;
                w.write_all(&chunk[..n])?;
                remaining -= n as u64;
            }
            Ok(())
        }
    }

    let huge = Mp4Node::leaf(fourcc("mdat"), Box::new(HugeLeaf(u32::MAX as u64 + 16)));
    assert_eq!(huge.nb_bytes(), 16 + (u32::MAX as u64 + 16));
}
