use std::io::{Cursor, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::boxtree::LeafBox;
use crate::error::Result;

/// `trex`: one per track inside `mvex` (spec §4.5).
#[derive(Debug, Clone)]
pub struct TrexBox {
    pub track_id: u32,
    pub default_sample_description_index: u32,
    pub default_sample_duration: u32,
    pub default_sample_size: u32,
    pub default_sample_flags: u32,
}

impl TrexBox {
    pub fn new(track_id: u32) -> Self {
        TrexBox {
            track_id,
            default_sample_description_index: 1,
            default_sample_duration: 0,
            default_sample_size: 0,
            default_sample_flags: 0,
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(&data[4..]);
        Ok(TrexBox {
            track_id: c.read_u32::<BigEndian>()?,
            default_sample_description_index: c.read_u32::<BigEndian>()?,
            default_sample_duration: c.read_u32::<BigEndian>()?,
            default_sample_size: c.read_u32::<BigEndian>()?,
            default_sample_flags: c.read_u32::<BigEndian>()?,
        })
    }
}

impl LeafBox for TrexBox {
    fn encoded_len(&self) -> u64 {
        4 + 20
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>(0)?;
        w.write_u32::<BigEndian>(self.track_id)?;
        w.write_u32::<BigEndian>(self.default_sample_description_index)?;
        w.write_u32::<BigEndian>(self.default_sample_duration)?;
        w.write_u32::<BigEndian>(self.default_sample_size)?;
        w.write_u32::<BigEndian>(self.default_sample_flags)?;
        Ok(())
    }
}

/// `mfhd`.
#[derive(Debug, Clone)]
pub struct MfhdBox {
    pub sequence_number: u32,
}

impl MfhdBox {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(&data[4..]);
        Ok(MfhdBox {
            sequence_number: c.read_u32::<BigEndian>()?,
        })
    }
}

impl LeafBox for MfhdBox {
    fn encoded_len(&self) -> u64 {
        8
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>(0)?;
        w.write_u32::<BigEndian>(self.sequence_number)?;
        Ok(())
    }
}

pub const TFHD_BASE_DATA_OFFSET: u32 = 0x00_0001;
pub const TFHD_SAMPLE_DESCRIPTION_INDEX: u32 = 0x00_0002;
pub const TFHD_DEFAULT_SAMPLE_DURATION: u32 = 0x00_0008;
pub const TFHD_DEFAULT_SAMPLE_SIZE: u32 = 0x00_0010;
pub const TFHD_DEFAULT_SAMPLE_FLAGS: u32 = 0x00_0020;
pub const TFHD_DURATION_IS_EMPTY: u32 = 0x01_0000;
pub const TFHD_DEFAULT_BASE_IS_MOOF: u32 = 0x02_0000;

/// `tfhd` (spec §4.2): optional fields gated by bits in `flags`.
#[derive(Debug, Clone)]
pub struct TfhdBox {
    pub flags: u32,
    pub track_id: u32,
    pub base_data_offset: Option<u64>,
    pub sample_description_index: Option<u32>,
    pub default_sample_duration: Option<u32>,
    pub default_sample_size: Option<u32>,
    pub default_sample_flags: Option<u32>,
}

impl TfhdBox {
    pub fn default_base_is_moof(track_id: u32) -> Self {
        TfhdBox {
            flags: TFHD_DEFAULT_BASE_IS_MOOF,
            track_id,
            base_data_offset: None,
            sample_description_index: None,
            default_sample_duration: None,
            default_sample_size: None,
            default_sample_flags: None,
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let flags = u32::from_be_bytes([0, data[1], data[2], data[3]]);
        let mut c = Cursor::new(&data[4..]);
        let track_id = c.read_u32::<BigEndian>()?;
        let base_data_offset = if flags & TFHD_BASE_DATA_OFFSET != 0 {
            Some(c.read_u64::<BigEndian>()?)
        } else {
            None
        };
        let sample_description_index = if flags & TFHD_SAMPLE_DESCRIPTION_INDEX != 0 {
            Some(c.read_u32::<BigEndian>()?)
        } else {
            None
        };
        let default_sample_duration = if flags & TFHD_DEFAULT_SAMPLE_DURATION != 0 {
            Some(c.read_u32::<BigEndian>()?)
        } else {
            None
        };
        let default_sample_size = if flags & TFHD_DEFAULT_SAMPLE_SIZE != 0 {
            Some(c.read_u32::<BigEndian>()?)
        } else {
            None
        };
        let default_sample_flags = if flags & TFHD_DEFAULT_SAMPLE_FLAGS != 0 {
            Some(c.read_u32::<BigEndian>()?)
        } else {
            None
        };
        Ok(TfhdBox {
            flags,
            track_id,
            base_data_offset,
            sample_description_index,
            default_sample_duration,
            default_sample_size,
            default_sample_flags,
        })
    }
}

impl LeafBox for TfhdBox {
    fn encoded_len(&self) -> u64 {
        let mut n = 4 + 4u64;
        if self.base_data_offset.is_some() {
            n += 8;
        }
        if self.sample_description_index.is_some() {
            n += 4;
        }
        if self.default_sample_duration.is_some() {
            n += 4;
        }
        if self.default_sample_size.is_some() {
            n += 4;
        }
        if self.default_sample_flags.is_some() {
            n += 4;
        }
        n
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>(self.flags & 0x00ff_ffff)?;
        w.write_u32::<BigEndian>(self.track_id)?;
        if let Some(v) = self.base_data_offset {
            w.write_u64::<BigEndian>(v)?;
        }
        if let Some(v) = self.sample_description_index {
            w.write_u32::<BigEndian>(v)?;
        }
        if let Some(v) = self.default_sample_duration {
            w.write_u32::<BigEndian>(v)?;
        }
        if let Some(v) = self.default_sample_size {
            w.write_u32::<BigEndian>(v)?;
        }
        if let Some(v) = self.default_sample_flags {
            w.write_u32::<BigEndian>(v)?;
        }
        Ok(())
    }
}

/// `tfdt`.
#[derive(Debug, Clone)]
pub struct TfdtBox {
    pub version: u8,
    pub base_media_decode_time: u64,
}

impl TfdtBox {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let version = data[0];
        let mut c = Cursor::new(&data[4..]);
        let base_media_decode_time = if version == 1 {
            c.read_u64::<BigEndian>()?
        } else {
            c.read_u32::<BigEndian>()? as u64
        };
        Ok(TfdtBox {
            version,
            base_media_decode_time,
        })
    }
}

impl LeafBox for TfdtBox {
    fn encoded_len(&self) -> u64 {
        4 + if self.version == 1 { 8 } else { 4 }
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>((self.version as u32) << 24)?;
        if self.version == 1 {
            w.write_u64::<BigEndian>(self.base_media_decode_time)?;
        } else {
            w.write_u32::<BigEndian>(self.base_media_decode_time as u32)?;
        }
        Ok(())
    }
}

pub const TRUN_DATA_OFFSET: u32 = 0x00_0001;
pub const TRUN_FIRST_SAMPLE_FLAGS: u32 = 0x00_0004;
pub const TRUN_SAMPLE_DURATION: u32 = 0x00_0100;
pub const TRUN_SAMPLE_SIZE: u32 = 0x00_0200;
pub const TRUN_SAMPLE_FLAGS: u32 = 0x00_0400;
pub const TRUN_SAMPLE_CTS: u32 = 0x00_0800;

pub const SAMPLE_FLAGS_FIRST: u32 = 0x0200_0000;
pub const SAMPLE_FLAGS_NON_KEY: u32 = 0x0100_0000;

#[derive(Debug, Clone, Default)]
pub struct TrunSample {
    pub duration: u32,
    pub size: u32,
    pub flags: u32,
    pub cts: i32,
}

/// `trun` (spec §4.2/§4.3): sample_count, optional data_offset/first_sample
/// flags, then per-sample optional fields gated by `flags`.
#[derive(Debug, Clone)]
pub struct TrunBox {
    pub version: u8,
    pub flags: u32,
    pub data_offset: Option<i32>,
    pub first_sample_flags: Option<u32>,
    pub samples: Vec<TrunSample>,
}

impl TrunBox {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let version = data[0];
        let flags = u32::from_be_bytes([0, data[1], data[2], data[3]]);
        let mut c = Cursor::new(&data[4..]);
        let count = c.read_u32::<BigEndian>()?;
        let data_offset = if flags & TRUN_DATA_OFFSET != 0 {
            Some(c.read_i32::<BigEndian>()?)
        } else {
            None
        };
        let first_sample_flags = if flags & TRUN_FIRST_SAMPLE_FLAGS != 0 {
            Some(c.read_u32::<BigEndian>()?)
        } else {
            None
        };
        let mut samples = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let duration = if flags & TRUN_SAMPLE_DURATION != 0 {
                c.read_u32::<BigEndian>()?
            } else {
                0
            };
            let size = if flags & TRUN_SAMPLE_SIZE != 0 {
                c.read_u32::<BigEndian>()?
            } else {
                0
            };
            let sflags = if flags & TRUN_SAMPLE_FLAGS != 0 {
                c.read_u32::<BigEndian>()?
            } else {
                0
            };
            let cts = if flags & TRUN_SAMPLE_CTS != 0 {
                if version == 1 {
                    c.read_i32::<BigEndian>()?
                } else {
                    c.read_u32::<BigEndian>()? as i32
                }
            } else {
                0
            };
            samples.push(TrunSample {
                duration,
                size,
                flags: sflags,
                cts,
            });
        }
        Ok(TrunBox {
            version,
            flags,
            data_offset,
            first_sample_flags,
            samples,
        })
    }
}

impl LeafBox for TrunBox {
    fn encoded_len(&self) -> u64 {
        let mut n = 4 + 4u64;
        if self.data_offset.is_some() {
            n += 4;
        }
        if self.first_sample_flags.is_some() {
            n += 4;
        }
        let per = (if self.flags & TRUN_SAMPLE_DURATION != 0 { 4 } else { 0 })
            + (if self.flags & TRUN_SAMPLE_SIZE != 0 { 4 } else { 0 })
            + (if self.flags & TRUN_SAMPLE_FLAGS != 0 { 4 } else { 0 })
            + (if self.flags & TRUN_SAMPLE_CTS != 0 { 4 } else { 0 });
        n + self.samples.len() as u64 * per
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>(((self.version as u32) << 24) | (self.flags & 0x00ff_ffff))?;
        w.write_u32::<BigEndian>(self.samples.len() as u32)?;
        if let Some(v) = self.data_offset {
            w.write_i32::<BigEndian>(v)?;
        }
        if let Some(v) = self.first_sample_flags {
            w.write_u32::<BigEndian>(v)?;
        }
        for s in &self.samples {
            if self.flags & TRUN_SAMPLE_DURATION != 0 {
                w.write_u32::<BigEndian>(s.duration)?;
            }
            if self.flags & TRUN_SAMPLE_SIZE != 0 {
                w.write_u32::<BigEndian>(s.size)?;
            }
            if self.flags & TRUN_SAMPLE_FLAGS != 0 {
                w.write_u32::<BigEndian>(s.flags)?;
            }
            if self.flags & TRUN_SAMPLE_CTS != 0 {
                if self.version == 1 {
                    w.write_i32::<BigEndian>(s.cts)?;
                } else {
                    w.write_u32::<BigEndian>(s.cts as u32)?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SidxReference {
    pub reference_type: u8,
    pub referenced_size: u32,
    pub subsegment_duration: u32,
    pub starts_with_sap: u8,
    pub sap_type: u8,
    pub sap_delta_time: u32,
}

/// `sidx`: segment index (spec §4.2).
#[derive(Debug, Clone)]
pub struct SidxBox {
    pub version: u8,
    pub reference_id: u32,
    pub timescale: u32,
    pub earliest_presentation_time: u64,
    pub first_offset: u64,
    pub references: Vec<SidxReference>,
}

impl SidxBox {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let version = data[0];
        let mut c = Cursor::new(&data[4..]);
        let reference_id = c.read_u32::<BigEndian>()?;
        let timescale = c.read_u32::<BigEndian>()?;
        let (earliest_presentation_time, first_offset) = if version == 0 {
            (
                c.read_u32::<BigEndian>()? as u64,
                c.read_u32::<BigEndian>()? as u64,
            )
        } else {
            (c.read_u64::<BigEndian>()?, c.read_u64::<BigEndian>()?)
        };
        c.read_u16::<BigEndian>()?; // reserved
        let count = c.read_u16::<BigEndian>()?;
        let mut references = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let a = c.read_u32::<BigEndian>()?;
            let subsegment_duration = c.read_u32::<BigEndian>()?;
            let b = c.read_u32::<BigEndian>()?;
            references.push(SidxReference {
                reference_type: (a >> 31) as u8,
                referenced_size: a & 0x7fff_ffff,
                subsegment_duration,
                starts_with_sap: (b >> 31) as u8,
                sap_type: ((b >> 28) & 0x7) as u8,
                sap_delta_time: b & 0x0fff_ffff,
            });
        }
        Ok(SidxBox {
            version,
            reference_id,
            timescale,
            earliest_presentation_time,
            first_offset,
            references,
        })
    }
}

impl LeafBox for SidxBox {
    fn encoded_len(&self) -> u64 {
        let ts = if self.version == 0 { 4 } else { 8 };
        4 + 4 + 4 + ts * 2 + 2 + 2 + self.references.len() as u64 * 12
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>((self.version as u32) << 24)?;
        w.write_u32::<BigEndian>(self.reference_id)?;
        w.write_u32::<BigEndian>(self.timescale)?;
        if self.version == 0 {
            w.write_u32::<BigEndian>(self.earliest_presentation_time as u32)?;
            w.write_u32::<BigEndian>(self.first_offset as u32)?;
        } else {
            w.write_u64::<BigEndian>(self.earliest_presentation_time)?;
            w.write_u64::<BigEndian>(self.first_offset)?;
        }
        w.write_u16::<BigEndian>(0)?; // reserved
        w.write_u16::<BigEndian>(self.references.len() as u16)?;
        for r in &self.references {
            let a = ((r.reference_type as u32) << 31) | (r.referenced_size & 0x7fff_ffff);
            w.write_u32::<BigEndian>(a)?;
            w.write_u32::<BigEndian>(r.subsegment_duration)?;
            let b = ((r.starts_with_sap as u32) << 31)
                | ((r.sap_type as u32 & 0x7) << 28)
                | (r.sap_delta_time & 0x0fff_ffff);
            w.write_u32::<BigEndian>(b)?;
        }
        Ok(())
    }
}
