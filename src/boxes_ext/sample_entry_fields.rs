//! Fixed-size prefixes for the `avc1`/`hev1`/`mp4a` sample entries (spec
//! §4.2). These aren't `LeafBox` impls because sample entries are
//! `EntryContainer` nodes (prefix bytes + nested `avcC`/`hvcC`/`esds`
//! children) rather than plain leaves — see `boxtree::NodeBody`.

/// `VisualSampleEntry` prefix: 8-byte base `SampleEntry` (reserved +
/// data_reference_index) followed by the 70-byte visual fields.
pub struct VisualEntryPrefix {
    pub width: u16,
    pub height: u16,
}

impl VisualEntryPrefix {
    pub fn build(&self) -> Vec<u8> {
        let mut b = Vec::with_capacity(78);
        b.extend_from_slice(&[0u8; 6]); // reserved
        b.extend_from_slice(&1u16.to_be_bytes()); // data_reference_index
        b.extend_from_slice(&[0u8; 2]); // pre_defined
        b.extend_from_slice(&[0u8; 2]); // reserved
        b.extend_from_slice(&[0u8; 12]); // pre_defined[3]
        b.extend_from_slice(&self.width.to_be_bytes());
        b.extend_from_slice(&self.height.to_be_bytes());
        b.extend_from_slice(&0x0048_0000u32.to_be_bytes()); // horizresolution 72dpi
        b.extend_from_slice(&0x0048_0000u32.to_be_bytes()); // vertresolution 72dpi
        b.extend_from_slice(&[0u8; 4]); // reserved
        b.extend_from_slice(&1u16.to_be_bytes()); // frame_count
        b.extend_from_slice(&[0u8; 32]); // compressorname
        b.extend_from_slice(&0x0018u16.to_be_bytes()); // depth
        b.extend_from_slice(&(-1i16).to_be_bytes()); // pre_defined
        b
    }

    pub fn parse(prefix: &[u8]) -> Self {
        let width = u16::from_be_bytes([prefix[32], prefix[33]]);
        let height = u16::from_be_bytes([prefix[34], prefix[35]]);
        VisualEntryPrefix { width, height }
    }
}

/// `AudioSampleEntry` prefix: 8-byte base `SampleEntry` followed by the
/// 20-byte audio fields.
pub struct AudioEntryPrefix {
    pub channel_count: u16,
    pub sample_size: u16,
    pub sample_rate: u32,
}

impl AudioEntryPrefix {
    pub fn build(&self) -> Vec<u8> {
        let mut b = Vec::with_capacity(28);
        b.extend_from_slice(&[0u8; 6]); // reserved
        b.extend_from_slice(&1u16.to_be_bytes()); // data_reference_index
        b.extend_from_slice(&[0u8; 8]); // reserved
        b.extend_from_slice(&self.channel_count.to_be_bytes());
        b.extend_from_slice(&self.sample_size.to_be_bytes());
        b.extend_from_slice(&[0u8; 2]); // pre_defined
        b.extend_from_slice(&[0u8; 2]); // reserved
        b.extend_from_slice(&((self.sample_rate) << 16).to_be_bytes()); // 16.16 fixed-point
        b
    }

    pub fn parse(prefix: &[u8]) -> Self {
        let channel_count = u16::from_be_bytes([prefix[8], prefix[9]]);
        let sample_size = u16::from_be_bytes([prefix[10], prefix[11]]);
        let sample_rate_fixed = u32::from_be_bytes([prefix[16], prefix[17], prefix[18], prefix[19]]);
        AudioEntryPrefix {
            channel_count,
            sample_size,
            sample_rate: sample_rate_fixed >> 16,
        }
    }
}
