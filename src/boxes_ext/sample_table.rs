use std::io::{Cursor, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::boxtree::LeafBox;
use crate::error::Result;

/// `stts`: run-length (count, delta) of decode-time deltas (spec §4.2/§4.3).
#[derive(Debug, Clone, Default)]
pub struct SttsBox {
    pub entries: Vec<(u32, u32)>,
}

impl SttsBox {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(&data[4..]);
        let count = c.read_u32::<BigEndian>()?;
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            entries.push((c.read_u32::<BigEndian>()?, c.read_u32::<BigEndian>()?));
        }
        Ok(SttsBox { entries })
    }
}

impl LeafBox for SttsBox {
    fn encoded_len(&self) -> u64 {
        8 + self.entries.len() as u64 * 8
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>(0)?;
        w.write_u32::<BigEndian>(self.entries.len() as u32)?;
        for (count, delta) in &self.entries {
            w.write_u32::<BigEndian>(*count)?;
            w.write_u32::<BigEndian>(*delta)?;
        }
        Ok(())
    }
}

/// `ctts`: run-length (count, offset); offsets unsigned in v0, signed in v1
/// (spec §4.2).
#[derive(Debug, Clone, Default)]
pub struct CttsBox {
    pub version: u8,
    pub entries: Vec<(u32, i32)>,
}

impl CttsBox {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let version = data[0];
        let mut c = Cursor::new(&data[4..]);
        let count = c.read_u32::<BigEndian>()?;
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let n = c.read_u32::<BigEndian>()?;
            let off = if version == 1 {
                c.read_i32::<BigEndian>()?
            } else {
                c.read_u32::<BigEndian>()? as i32
            };
            entries.push((n, off));
        }
        Ok(CttsBox { version, entries })
    }
}

impl LeafBox for CttsBox {
    fn encoded_len(&self) -> u64 {
        8 + self.entries.len() as u64 * 8
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>((self.version as u32) << 24)?;
        w.write_u32::<BigEndian>(self.entries.len() as u32)?;
        for (count, off) in &self.entries {
            w.write_u32::<BigEndian>(*count)?;
            w.write_i32::<BigEndian>(*off)?;
        }
        Ok(())
    }
}

/// `stss`: sorted 1-based sample-number array (spec §4.2). Absent means
/// every sample is a sync sample.
#[derive(Debug, Clone, Default)]
pub struct StssBox {
    pub sample_numbers: Vec<u32>,
}

impl StssBox {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(&data[4..]);
        let count = c.read_u32::<BigEndian>()?;
        let mut sample_numbers = Vec::with_capacity(count as usize);
        for _ in 0..count {
            sample_numbers.push(c.read_u32::<BigEndian>()?);
        }
        Ok(StssBox { sample_numbers })
    }
}

impl LeafBox for StssBox {
    fn encoded_len(&self) -> u64 {
        8 + self.sample_numbers.len() as u64 * 4
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>(0)?;
        w.write_u32::<BigEndian>(self.sample_numbers.len() as u32)?;
        for n in &self.sample_numbers {
            w.write_u32::<BigEndian>(*n)?;
        }
        Ok(())
    }
}

/// `stsc`: (first_chunk, samples_per_chunk, sample_description_index) runs
/// (spec §4.2).
#[derive(Debug, Clone, Default)]
pub struct StscBox {
    pub entries: Vec<(u32, u32, u32)>,
}

impl StscBox {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(&data[4..]);
        let count = c.read_u32::<BigEndian>()?;
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            entries.push((
                c.read_u32::<BigEndian>()?,
                c.read_u32::<BigEndian>()?,
                c.read_u32::<BigEndian>()?,
            ));
        }
        Ok(StscBox { entries })
    }
}

impl LeafBox for StscBox {
    fn encoded_len(&self) -> u64 {
        8 + self.entries.len() as u64 * 12
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>(0)?;
        w.write_u32::<BigEndian>(self.entries.len() as u32)?;
        for (first, per_chunk, sdi) in &self.entries {
            w.write_u32::<BigEndian>(*first)?;
            w.write_u32::<BigEndian>(*per_chunk)?;
            w.write_u32::<BigEndian>(*sdi)?;
        }
        Ok(())
    }
}

/// `stsz`: uniform `sample_size` or per-sample sizes (spec §4.2). This
/// crate's encoder always writes variable mode.
#[derive(Debug, Clone, Default)]
pub struct StszBox {
    pub sample_size: u32,
    pub sizes: Vec<u32>,
}

impl StszBox {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(&data[4..]);
        let sample_size = c.read_u32::<BigEndian>()?;
        let count = c.read_u32::<BigEndian>()?;
        let mut sizes = Vec::new();
        if sample_size == 0 {
            sizes.reserve(count as usize);
            for _ in 0..count {
                sizes.push(c.read_u32::<BigEndian>()?);
            }
        }
        Ok(StszBox { sample_size, sizes })
    }

    pub fn sample_count(&self) -> u32 {
        if self.sample_size == 0 {
            self.sizes.len() as u32
        } else {
            0
        }
    }
}

impl LeafBox for StszBox {
    fn encoded_len(&self) -> u64 {
        let per_sample = if self.sample_size == 0 {
            self.sizes.len() as u64 * 4
        } else {
            0
        };
        12 + per_sample
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>(0)?;
        w.write_u32::<BigEndian>(self.sample_size)?;
        w.write_u32::<BigEndian>(self.sizes.len() as u32)?;
        if self.sample_size == 0 {
            for s in &self.sizes {
                w.write_u32::<BigEndian>(*s)?;
            }
        }
        Ok(())
    }
}

/// `stco`/`co64`: chunk byte offsets, chosen by magnitude at write time
/// (spec §4.3: co64 iff the largest offset ≥ 2³²).
#[derive(Debug, Clone, Default)]
pub struct ChunkOffsetBox {
    pub is64: bool,
    pub offsets: Vec<u64>,
}

impl ChunkOffsetBox {
    pub fn decode(data: &[u8], is64: bool) -> Result<Self> {
        let mut c = Cursor::new(&data[4..]);
        let count = c.read_u32::<BigEndian>()?;
        let mut offsets = Vec::with_capacity(count as usize);
        for _ in 0..count {
            offsets.push(if is64 {
                c.read_u64::<BigEndian>()?
            } else {
                c.read_u32::<BigEndian>()? as u64
            });
        }
        Ok(ChunkOffsetBox { is64, offsets })
    }
}

impl LeafBox for ChunkOffsetBox {
    fn encoded_len(&self) -> u64 {
        8 + self.offsets.len() as u64 * if self.is64 { 8 } else { 4 }
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>(0)?;
        w.write_u32::<BigEndian>(self.offsets.len() as u32)?;
        for o in &self.offsets {
            if self.is64 {
                w.write_u64::<BigEndian>(*o)?;
            } else {
                w.write_u32::<BigEndian>(*o as u32)?;
            }
        }
        Ok(())
    }
}
