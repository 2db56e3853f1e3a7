//! `esds`: wraps an MPEG-4 ES_Descriptor tree (spec §4.2). Descriptor size
//! is a variable-length encoding, groups of 7 bits with the MSB as a
//! continuation flag, grounded on the original SRS `srs_kernel_mp4.cpp`
//! ES_Descriptor codec (~1-4 size bytes depending on magnitude).

use std::io::{Cursor, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::boxtree::LeafBox;
use crate::error::{Mp4Error, Result};

const TAG_ES_DESCR: u8 = 0x03;
const TAG_DECODER_CONFIG: u8 = 0x04;
const TAG_DECODER_SPECIFIC_INFO: u8 = 0x05;
const TAG_SL_CONFIG: u8 = 0x06;

fn write_desc_size(w: &mut dyn Write, mut size: u32) -> Result<()> {
    let mut groups = [0u8; 4];
    let mut n = 0usize;
    loop {
        groups[n] = (size & 0x7f) as u8;
        size >>= 7;
        n += 1;
        if size == 0 || n == 4 {
            break;
        }
    }
    for i in (0..n).rev() {
        let mut b = groups[i];
        if i != 0 {
            b |= 0x80;
        }
        w.write_u8(b)?;
    }
    Ok(())
}

fn desc_size_len(size: u32) -> u64 {
    if size <= 0x7f {
        1
    } else if size <= 0x3fff {
        2
    } else if size <= 0x1f_ffff {
        3
    } else {
        4
    }
}

fn read_desc_size(r: &mut impl Read) -> Result<u32> {
    let mut size: u32 = 0;
    for _ in 0..4 {
        let b = r.read_u8()?;
        size = (size << 7) | (b & 0x7f) as u32;
        if b & 0x80 == 0 {
            break;
        }
    }
    Ok(size)
}

#[derive(Debug, Clone)]
pub struct EsdsBox {
    pub es_id: u16,
    pub stream_dependence: Option<u16>,
    pub url: Option<String>,
    pub ocr_es_id: Option<u16>,
    pub object_type_indication: u8,
    pub stream_type: u8,
    pub buffer_size_db: u32,
    pub max_bitrate: u32,
    pub avg_bitrate: u32,
    pub decoder_specific_info: Vec<u8>,
}

impl EsdsBox {
    pub fn aac(asc: Vec<u8>) -> Self {
        EsdsBox {
            es_id: 0,
            stream_dependence: None,
            url: None,
            ocr_es_id: None,
            object_type_indication: 0x40, // AAC
            stream_type: 0x05,            // audio stream
            buffer_size_db: 0,
            max_bitrate: 0,
            avg_bitrate: 0,
            decoder_specific_info: asc,
        }
    }

    fn dsi_size(&self) -> u32 {
        self.decoder_specific_info.len() as u32
    }

    fn decoder_config_payload_size(&self) -> u32 {
        (1 + 1 + 3 + 4 + 4) as u32
            + if self.decoder_specific_info.is_empty() {
                0
            } else {
                1 + desc_size_len(self.dsi_size()) as u32 + self.dsi_size()
            }
    }

    fn es_payload_size(&self) -> u32 {
        let mut n = 2 + 1; // ES_ID + flags byte
        if self.stream_dependence.is_some() {
            n += 2;
        }
        if let Some(u) = &self.url {
            n += 1 + u.len() as u32;
        }
        if self.ocr_es_id.is_some() {
            n += 2;
        }
        let dc = self.decoder_config_payload_size();
        n += 1 + desc_size_len(dc) as u32 + dc;
        n += 1 + desc_size_len(1) as u32 + 1; // SLConfigDescriptor, size=1
        n
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        // data starts with the 4-byte FullBox version/flags.
        let mut c = Cursor::new(&data[4..]);
        let tag = c.read_u8()?;
        if tag != TAG_ES_DESCR {
            return Err(Mp4Error::EsdsSlConfig { predefined: 0 });
        }
        let _es_size = read_desc_size(&mut c)?;
        let es_id = c.read_u16::<BigEndian>()?;
        let flags = c.read_u8()?;
        let stream_dependence_flag = flags & 0x80 != 0;
        let url_flag = flags & 0x40 != 0;
        let ocr_flag = flags & 0x20 != 0;
        let stream_dependence = if stream_dependence_flag {
            Some(c.read_u16::<BigEndian>()?)
        } else {
            None
        };
        let url = if url_flag {
            let len = c.read_u8()?;
            let mut buf = vec![0u8; len as usize];
            c.read_exact(&mut buf)?;
            Some(String::from_utf8_lossy(&buf).into_owned())
        } else {
            None
        };
        let ocr_es_id = if ocr_flag {
            Some(c.read_u16::<BigEndian>()?)
        } else {
            None
        };

        let dc_tag = c.read_u8()?;
        if dc_tag != TAG_DECODER_CONFIG {
            return Err(Mp4Error::EsdsSlConfig { predefined: dc_tag });
        }
        let _dc_size = read_desc_size(&mut c)?;
        let object_type_indication = c.read_u8()?;
        let stream_type_byte = c.read_u8()?;
        let stream_type = stream_type_byte >> 2;
        let mut buf3 = [0u8; 3];
        c.read_exact(&mut buf3)?;
        let buffer_size_db = u32::from_be_bytes([0, buf3[0], buf3[1], buf3[2]]);
        let max_bitrate = c.read_u32::<BigEndian>()?;
        let avg_bitrate = c.read_u32::<BigEndian>()?;

        let mut decoder_specific_info = Vec::new();
        // Peek for an optional DecoderSpecificInfo tag.
        let pos_before = c.position();
        if (pos_before as usize) < c.get_ref().len() {
            let maybe_tag = c.read_u8()?;
            if maybe_tag == TAG_DECODER_SPECIFIC_INFO {
                let dsi_size = read_desc_size(&mut c)?;
                decoder_specific_info = vec![0u8; dsi_size as usize];
                c.read_exact(&mut decoder_specific_info)?;
            } else {
                c.set_position(pos_before);
            }
        }

        let sl_tag = c.read_u8()?;
        if sl_tag == TAG_SL_CONFIG {
            let _sl_size = read_desc_size(&mut c)?;
            let predefined = c.read_u8()?;
            if predefined != 0x02 {
                return Err(Mp4Error::EsdsSlConfig { predefined });
            }
        }

        Ok(EsdsBox {
            es_id,
            stream_dependence,
            url,
            ocr_es_id,
            object_type_indication,
            stream_type,
            buffer_size_db,
            max_bitrate,
            avg_bitrate,
            decoder_specific_info,
        })
    }
}

impl LeafBox for EsdsBox {
    fn encoded_len(&self) -> u64 {
        let es_size = self.es_payload_size();
        4 + 1 + desc_size_len(es_size) + es_size as u64
    }

    fn encode(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32::<BigEndian>(0)?; // version/flags

        let es_size = self.es_payload_size();
        w.write_u8(TAG_ES_DESCR)?;
        write_desc_size(w, es_size)?;
        w.write_u16::<BigEndian>(self.es_id)?;
        let mut flags = 0u8;
        if self.stream_dependence.is_some() {
            flags |= 0x80;
        }
        if self.url.is_some() {
            flags |= 0x40;
        }
        if self.ocr_es_id.is_some() {
            flags |= 0x20;
        }
        w.write_u8(flags)?;
        if let Some(dep) = self.stream_dependence {
            w.write_u16::<BigEndian>(dep)?;
        }
        if let Some(url) = &self.url {
            w.write_u8(url.len() as u8)?;
            w.write_all(url.as_bytes())?;
        }
        if let Some(ocr) = self.ocr_es_id {
            w.write_u16::<BigEndian>(ocr)?;
        }

        let dc_size = self.decoder_config_payload_size();
        w.write_u8(TAG_DECODER_CONFIG)?;
        write_desc_size(w, dc_size)?;
        w.write_u8(self.object_type_indication)?;
        w.write_u8((self.stream_type << 2) | 0x01)?; // upStream=0, reserved=1
        let bsdb = self.buffer_size_db.to_be_bytes();
        w.write_all(&bsdb[1..4])?;
        w.write_u32::<BigEndian>(self.max_bitrate)?;
        w.write_u32::<BigEndian>(self.avg_bitrate)?;
        if !self.decoder_specific_info.is_empty() {
            w.write_u8(TAG_DECODER_SPECIFIC_INFO)?;
            write_desc_size(w, self.dsi_size())?;
            w.write_all(&self.decoder_specific_info)?;
        }

        w.write_u8(TAG_SL_CONFIG)?;
        write_desc_size(w, 1)?;
        w.write_u8(0x02)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn esds_roundtrip_recovers_asc() {
        let esds = EsdsBox::aac(vec![0x12, 0x10]);
        let mut buf = Vec::new();
        esds.encode(&mut buf).unwrap();
        let decoded = EsdsBox::decode(&buf).unwrap();
        assert_eq!(decoded.decoder_specific_info, vec![0x12, 0x10]);
        assert_eq!(decoded.object_type_indication, 0x40);
        assert_eq!(decoded.stream_type, 0x05);
    }
}
