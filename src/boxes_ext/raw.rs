use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::boxes::FourCC;
use crate::boxtree::LeafBox;
use crate::error::Result;

/// `ftyp`/`styp`: major brand, minor version, compatible-brands list
/// consuming the remainder (spec §4.2).
#[derive(Debug, Clone)]
pub struct FtypBox {
    pub major_brand: FourCC,
    pub minor_version: u32,
    pub compatible_brands: Vec<FourCC>,
}

impl FtypBox {
    pub fn new(major: &str, minor: u32, compat: &[&str]) -> Self {
        FtypBox {
            major_brand: FourCC::from_str(major).unwrap(),
            minor_version: minor,
            compatible_brands: compat.iter().map(|s| FourCC::from_str(s).unwrap()).collect(),
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let major = FourCC([data[0], data[1], data[2], data[3]]);
        let minor = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
        let mut compatible_brands = Vec::new();
        let mut i = 8;
        while i + 4 <= data.len() {
            compatible_brands.push(FourCC([data[i], data[i + 1], data[i + 2], data[i + 3]]));
            i += 4;
        }
        Ok(FtypBox {
            major_brand: major,
            minor_version: minor,
            compatible_brands,
        })
    }
}

impl LeafBox for FtypBox {
    fn encoded_len(&self) -> u64 {
        8 + self.compatible_brands.len() as u64 * 4
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_all(&self.major_brand.0)?;
        w.write_u32::<BigEndian>(self.minor_version)?;
        for b in &self.compatible_brands {
            w.write_all(&b.0)?;
        }
        Ok(())
    }
}

/// Opaque payload, used for `free`/`skip`/unknown types (spec §4.1
/// discovery: "unknown types become a free-space placeholder") and for
/// `avcC`/`hvcC` (decoder config records this crate treats as opaque per
/// spec §4.2, since NAL bitstream parsing is out of scope per §1).
#[derive(Debug, Clone)]
pub struct RawLeaf {
    pub data: Vec<u8>,
}

impl RawLeaf {
    pub fn decode(_typ: FourCC, data: &[u8]) -> Self {
        RawLeaf {
            data: data.to_vec(),
        }
    }
    pub fn of(data: Vec<u8>) -> Self {
        RawLeaf { data }
    }
}

impl LeafBox for RawLeaf {
    fn encoded_len(&self) -> u64 {
        self.data.len() as u64
    }
    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_all(&self.data)?;
        Ok(())
    }
}
