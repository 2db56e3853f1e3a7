use std::io::{Cursor, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::boxes::FourCC;
use crate::boxtree::LeafBox;
use crate::error::Result;

const IDENTITY_MATRIX: [u32; 9] = [
    0x0001_0000,
    0,
    0,
    0,
    0x0001_0000,
    0,
    0,
    0,
    0x4000_0000,
];

fn write_matrix(w: &mut dyn Write) -> Result<()> {
    for v in IDENTITY_MATRIX {
        w.write_u32::<BigEndian>(v)?;
    }
    Ok(())
}

/// `mvhd` (spec §4.2): v0 stores 32-bit times/durations, v1 64-bit.
#[derive(Debug, Clone)]
pub struct MvhdBox {
    pub version: u8,
    pub creation_time: u64,
    pub modification_time: u64,
    pub timescale: u32,
    pub duration: u64,
    pub rate: u32,
    pub next_track_id: u32,
}

impl MvhdBox {
    pub fn duration_ms(&self) -> u64 {
        if self.timescale == 0 {
            0
        } else {
            self.duration * 1000 / self.timescale as u64
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let version = data[0];
        let mut c = Cursor::new(&data[4..]);
        let (creation_time, modification_time, timescale, duration) = if version == 1 {
            (
                c.read_u64::<BigEndian>()?,
                c.read_u64::<BigEndian>()?,
                c.read_u32::<BigEndian>()?,
                c.read_u64::<BigEndian>()?,
            )
        } else {
            (
                c.read_u32::<BigEndian>()? as u64,
                c.read_u32::<BigEndian>()? as u64,
                c.read_u32::<BigEndian>()?,
                c.read_u32::<BigEndian>()? as u64,
            )
        };
        let rate = c.read_u32::<BigEndian>()?;
        // skip volume(2) reserved(2) reserved(8) matrix(36) pre_defined(24)
        let skip = 2 + 2 + 8 + 36 + 24;
        let pos = c.position() as usize + skip;
        let next_track_id = u32::from_be_bytes([
            c.get_ref()[pos],
            c.get_ref()[pos + 1],
            c.get_ref()[pos + 2],
            c.get_ref()[pos + 3],
        ]);
        Ok(MvhdBox {
            version,
            creation_time,
            modification_time,
            timescale,
            duration,
            rate,
            next_track_id,
        })
    }
}

impl LeafBox for MvhdBox {
    fn encoded_len(&self) -> u64 {
        let ts = if self.version == 1 { 8 } else { 4 };
        4 + ts * 3 + 4 + 4 + 2 + 2 + 8 + 36 + 24 + 4
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>((self.version as u32) << 24)?;
        if self.version == 1 {
            w.write_u64::<BigEndian>(self.creation_time)?;
            w.write_u64::<BigEndian>(self.modification_time)?;
            w.write_u32::<BigEndian>(self.timescale)?;
            w.write_u64::<BigEndian>(self.duration)?;
        } else {
            w.write_u32::<BigEndian>(self.creation_time as u32)?;
            w.write_u32::<BigEndian>(self.modification_time as u32)?;
            w.write_u32::<BigEndian>(self.timescale)?;
            w.write_u32::<BigEndian>(self.duration as u32)?;
        }
        w.write_u32::<BigEndian>(self.rate)?;
        w.write_u16::<BigEndian>(0x0100)?; // volume
        w.write_u16::<BigEndian>(0)?; // reserved
        w.write_all(&[0u8; 8])?; // reserved
        write_matrix(w)?;
        w.write_all(&[0u8; 24])?; // pre_defined
        w.write_u32::<BigEndian>(self.next_track_id)?;
        Ok(())
    }
}

/// `tkhd` (spec §4.2).
#[derive(Debug, Clone)]
pub struct TkhdBox {
    pub version: u8,
    pub flags: u32,
    pub creation_time: u64,
    pub modification_time: u64,
    pub track_id: u32,
    pub duration: u64,
    pub is_audio: bool,
    pub width: u32,
    pub height: u32,
}

impl TkhdBox {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let version = data[0];
        let flags = u32::from_be_bytes([0, data[1], data[2], data[3]]);
        let mut c = Cursor::new(&data[4..]);
        let (creation_time, modification_time, track_id, duration) = if version == 1 {
            let ct = c.read_u64::<BigEndian>()?;
            let mt = c.read_u64::<BigEndian>()?;
            let tid = c.read_u32::<BigEndian>()?;
            c.read_u32::<BigEndian>()?; // reserved
            let dur = c.read_u64::<BigEndian>()?;
            (ct, mt, tid, dur)
        } else {
            let ct = c.read_u32::<BigEndian>()? as u64;
            let mt = c.read_u32::<BigEndian>()? as u64;
            let tid = c.read_u32::<BigEndian>()?;
            c.read_u32::<BigEndian>()?; // reserved
            let dur = c.read_u32::<BigEndian>()? as u64;
            (ct, mt, tid, dur)
        };
        c.read_u64::<BigEndian>()?; // reserved[2]
        c.read_u16::<BigEndian>()?; // layer
        c.read_u16::<BigEndian>()?; // alternate_group
        let volume = c.read_u16::<BigEndian>()?;
        c.read_u16::<BigEndian>()?; // reserved
        for _ in 0..9 {
            c.read_u32::<BigEndian>()?;
        }
        let width = c.read_u32::<BigEndian>()?;
        let height = c.read_u32::<BigEndian>()?;
        Ok(TkhdBox {
            version,
            flags,
            creation_time,
            modification_time,
            track_id,
            duration,
            is_audio: volume != 0,
            width,
            height,
        })
    }
}

impl LeafBox for TkhdBox {
    fn encoded_len(&self) -> u64 {
        let ts = if self.version == 1 { 8 } else { 4 };
        4 + ts * 2 + 4 + 4 + ts + 8 + 2 + 2 + 2 + 2 + 36 + 4 + 4
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>(((self.version as u32) << 24) | (self.flags & 0x00ff_ffff))?;
        if self.version == 1 {
            w.write_u64::<BigEndian>(self.creation_time)?;
            w.write_u64::<BigEndian>(self.modification_time)?;
            w.write_u32::<BigEndian>(self.track_id)?;
            w.write_u32::<BigEndian>(0)?;
            w.write_u64::<BigEndian>(self.duration)?;
        } else {
            w.write_u32::<BigEndian>(self.creation_time as u32)?;
            w.write_u32::<BigEndian>(self.modification_time as u32)?;
            w.write_u32::<BigEndian>(self.track_id)?;
            w.write_u32::<BigEndian>(0)?;
            w.write_u32::<BigEndian>(self.duration as u32)?;
        }
        w.write_all(&[0u8; 8])?; // reserved[2]
        w.write_u16::<BigEndian>(0)?; // layer
        w.write_u16::<BigEndian>(0)?; // alternate_group
        w.write_u16::<BigEndian>(if self.is_audio { 0x0100 } else { 0 })?;
        w.write_u16::<BigEndian>(0)?; // reserved
        write_matrix(w)?;
        w.write_u32::<BigEndian>(self.width)?;
        w.write_u32::<BigEndian>(self.height)?;
        Ok(())
    }
}

/// `mdhd` (spec §4.2). `language` packs three 5-bit fields, each letter −
/// `0x60`.
#[derive(Debug, Clone)]
pub struct MdhdBox {
    pub version: u8,
    pub creation_time: u64,
    pub modification_time: u64,
    pub timescale: u32,
    pub duration: u64,
    pub language: [u8; 3],
}

pub fn lang_to_u16(lang: &[u8; 3]) -> u16 {
    (((lang[0] as u16 - 0x60) & 0x1f) << 10)
        | (((lang[1] as u16 - 0x60) & 0x1f) << 5)
        | ((lang[2] as u16 - 0x60) & 0x1f)
}

pub fn lang_from_u16(v: u16) -> [u8; 3] {
    [
        (((v >> 10) & 0x1f) as u8) + 0x60,
        (((v >> 5) & 0x1f) as u8) + 0x60,
        ((v & 0x1f) as u8) + 0x60,
    ]
}

impl MdhdBox {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let version = data[0];
        let mut c = Cursor::new(&data[4..]);
        let (creation_time, modification_time, timescale, duration) = if version == 1 {
            (
                c.read_u64::<BigEndian>()?,
                c.read_u64::<BigEndian>()?,
                c.read_u32::<BigEndian>()?,
                c.read_u64::<BigEndian>()?,
            )
        } else {
            (
                c.read_u32::<BigEndian>()? as u64,
                c.read_u32::<BigEndian>()? as u64,
                c.read_u32::<BigEndian>()?,
                c.read_u32::<BigEndian>()? as u64,
            )
        };
        let lang_bits = c.read_u16::<BigEndian>()?;
        Ok(MdhdBox {
            version,
            creation_time,
            modification_time,
            timescale,
            duration,
            language: lang_from_u16(lang_bits),
        })
    }
}

impl LeafBox for MdhdBox {
    fn encoded_len(&self) -> u64 {
        let ts = if self.version == 1 { 8 } else { 4 };
        4 + ts * 3 + 4 + 2 + 2
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>((self.version as u32) << 24)?;
        if self.version == 1 {
            w.write_u64::<BigEndian>(self.creation_time)?;
            w.write_u64::<BigEndian>(self.modification_time)?;
            w.write_u32::<BigEndian>(self.timescale)?;
            w.write_u64::<BigEndian>(self.duration)?;
        } else {
            w.write_u32::<BigEndian>(self.creation_time as u32)?;
            w.write_u32::<BigEndian>(self.modification_time as u32)?;
            w.write_u32::<BigEndian>(self.timescale)?;
            w.write_u32::<BigEndian>(self.duration as u32)?;
        }
        w.write_u16::<BigEndian>(lang_to_u16(&self.language))?;
        w.write_u16::<BigEndian>(0)?; // pre_defined
        Ok(())
    }
}

/// `hdlr`: distinguishes `soun` from `vide` (spec §4.2).
#[derive(Debug, Clone)]
pub struct HdlrBox {
    pub handler_type: FourCC,
    pub name: String,
}

impl HdlrBox {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let handler_type = FourCC([data[8], data[9], data[10], data[11]]);
        let name_start = 24;
        let name = if data.len() > name_start {
            let end = data[name_start..]
                .iter()
                .position(|&b| b == 0)
                .map(|p| name_start + p)
                .unwrap_or(data.len());
            String::from_utf8_lossy(&data[name_start..end]).into_owned()
        } else {
            String::new()
        };
        Ok(HdlrBox { handler_type, name })
    }
}

impl LeafBox for HdlrBox {
    fn encoded_len(&self) -> u64 {
        4 + 4 + 4 + 12 + self.name.len() as u64 + 1
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>(0)?; // version/flags
        w.write_u32::<BigEndian>(0)?; // pre_defined
        w.write_all(&self.handler_type.0)?;
        w.write_all(&[0u8; 12])?; // reserved
        w.write_all(self.name.as_bytes())?;
        w.write_u8(0)?;
        Ok(())
    }
}
