use std::io::{Cursor, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::boxes::FourCC;
use crate::boxtree::LeafBox;
use crate::error::Result;

/// `vmhd`: video media header, always present on a video track (flags=1).
#[derive(Debug, Clone, Default)]
pub struct VmhdBox;

impl VmhdBox {
    pub fn decode(_data: &[u8]) -> Result<Self> {
        Ok(VmhdBox)
    }
}

impl LeafBox for VmhdBox {
    fn encoded_len(&self) -> u64 {
        4 + 2 + 6
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>(1)?; // version=0, flags=1
        w.write_u16::<BigEndian>(0)?; // graphicsmode
        w.write_all(&[0u8; 6])?; // opcolor
        Ok(())
    }
}

/// `smhd`: sound media header, always present on an audio track.
#[derive(Debug, Clone, Default)]
pub struct SmhdBox;

impl SmhdBox {
    pub fn decode(_data: &[u8]) -> Result<Self> {
        Ok(SmhdBox)
    }
}

impl LeafBox for SmhdBox {
    fn encoded_len(&self) -> u64 {
        4 + 2 + 2
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>(0)?;
        w.write_u16::<BigEndian>(0)?; // balance
        w.write_u16::<BigEndian>(0)?; // reserved
        Ok(())
    }
}

/// `url `/`urn `: dref entries. Self-contained (flags bit 0 set) stores no
/// location; otherwise a location (and, for urn, a name) c-string follows.
#[derive(Debug, Clone)]
pub struct DataEntryBox {
    pub typ: FourCC,
    pub self_contained: bool,
    pub name: Option<String>,
    pub location: Option<String>,
}

impl DataEntryBox {
    pub fn url_self_contained() -> Self {
        DataEntryBox {
            typ: FourCC::from_str("url ").unwrap(),
            self_contained: true,
            name: None,
            location: None,
        }
    }

    pub fn decode(typ: FourCC, data: &[u8]) -> Result<Self> {
        let flags = u32::from_be_bytes([0, data[1], data[2], data[3]]);
        let self_contained = flags & 1 != 0;
        let rest = &data[4..];
        if self_contained {
            return Ok(DataEntryBox {
                typ,
                self_contained,
                name: None,
                location: None,
            });
        }
        let mut parts = rest.splitn(2, |&b| b == 0);
        let is_urn = typ.as_str_lossy() == "urn ";
        let name = if is_urn {
            parts.next().map(|s| String::from_utf8_lossy(s).into_owned())
        } else {
            None
        };
        let location = parts.next().map(|s| String::from_utf8_lossy(s).into_owned());
        Ok(DataEntryBox {
            typ,
            self_contained,
            name,
            location,
        })
    }
}

impl LeafBox for DataEntryBox {
    fn encoded_len(&self) -> u64 {
        let mut n = 4u64;
        if !self.self_contained {
            if let Some(name) = &self.name {
                n += name.len() as u64 + 1;
            }
            if let Some(loc) = &self.location {
                n += loc.len() as u64 + 1;
            }
        }
        n
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        let flags: u32 = if self.self_contained { 1 } else { 0 };
        w.write_u32::<BigEndian>(flags)?;
        if !self.self_contained {
            if let Some(name) = &self.name {
                w.write_all(name.as_bytes())?;
                w.write_u8(0)?;
            }
            if let Some(loc) = &self.location {
                w.write_all(loc.as_bytes())?;
                w.write_u8(0)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ElstEntry {
    pub segment_duration: u64,
    pub media_time: i64,
    pub media_rate_integer: i16,
    pub media_rate_fraction: i16,
}

/// `elst`: edit list. Empty in every track this crate writes (single full
/// presentation edit), but decode is complete for round-trip.
#[derive(Debug, Clone, Default)]
pub struct ElstBox {
    pub version: u8,
    pub entries: Vec<ElstEntry>,
}

impl ElstBox {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let version = data[0];
        let mut c = Cursor::new(&data[4..]);
        let count = c.read_u32::<BigEndian>()?;
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let (segment_duration, media_time) = if version == 1 {
                (
                    c.read_u64::<BigEndian>()?,
                    c.read_i64::<BigEndian>()?,
                )
            } else {
                (
                    c.read_u32::<BigEndian>()? as u64,
                    c.read_i32::<BigEndian>()? as i64,
                )
            };
            entries.push(ElstEntry {
                segment_duration,
                media_time,
                media_rate_integer: c.read_i16::<BigEndian>()?,
                media_rate_fraction: c.read_i16::<BigEndian>()?,
            });
        }
        Ok(ElstBox { version, entries })
    }
}

impl LeafBox for ElstBox {
    fn encoded_len(&self) -> u64 {
        let per = if self.version == 1 { 8 + 8 } else { 4 + 4 } + 2 + 2;
        4 + 4 + self.entries.len() as u64 * per
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>((self.version as u32) << 24)?;
        w.write_u32::<BigEndian>(self.entries.len() as u32)?;
        for e in &self.entries {
            if self.version == 1 {
                w.write_u64::<BigEndian>(e.segment_duration)?;
                w.write_i64::<BigEndian>(e.media_time)?;
            } else {
                w.write_u32::<BigEndian>(e.segment_duration as u32)?;
                w.write_i32::<BigEndian>(e.media_time as i32)?;
            }
            w.write_i16::<BigEndian>(e.media_rate_integer)?;
            w.write_i16::<BigEndian>(e.media_rate_fraction)?;
        }
        Ok(())
    }
}
