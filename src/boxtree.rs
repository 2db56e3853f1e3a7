//! Recursive box tree: encode/decode/discovery for the box grammar in
//! spec §4.1. Builds on the same header shape the teacher's
//! `boxes::BoxHeader`/`NodeKind` already describe, but adds a write path and
//! typed leaf bodies so the tree can round-trip (§8.1.1/8.1.2).
//!
//! A box is either a `Container` (owns children, no payload of its own), a
//! `FullContainer` (stsd/dref: version+flags+a small fixed prefix, then
//! children), an `EntryContainer` (sample entries: a fixed-size prefix, then
//! child boxes such as avcC/esds), or a `Leaf` (typed payload via the
//! `LeafBox` trait). This is the "tagged variant for box bodies with shared
//! header fields" strategy spec §9 calls out.

use std::fmt;
use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::boxes::FourCC;
use crate::error::{Mp4Error, Result};

/// Boxes that are pure containers: no bytes of their own besides children.
const PLAIN_CONTAINERS: &[&str] = &[
    "moov", "trak", "mdia", "minf", "dinf", "stbl", "udta", "edts", "mvex", "traf", "moof", "sinf",
    "schi",
];

/// stsd/dref: FullBox header + a fixed prefix (entry_count) + children.
const FULL_CONTAINERS: &[&str] = &["stsd", "dref"];

/// Sample entries: fixed-size prefix (reserved/data_reference_index plus
/// type-specific fields), then nested config boxes (avcC/hvcC/esds).
const ENTRY_CONTAINERS: &[&str] = &["avc1", "hev1", "mp4a"];

pub fn is_plain_container(t: FourCC) -> bool {
    PLAIN_CONTAINERS.contains(&t.as_str_lossy().as_str())
}
pub fn is_full_container(t: FourCC) -> bool {
    FULL_CONTAINERS.contains(&t.as_str_lossy().as_str())
}
pub fn is_entry_container(t: FourCC) -> bool {
    ENTRY_CONTAINERS.contains(&t.as_str_lossy().as_str())
}

/// Blanket-implemented so every concrete `LeafBox` gets downcasting for
/// free; the sample manager needs to read back concrete fields (e.g.
/// `SttsBox::entries`) from a decoded tree (spec §4.3 load path).
pub trait AsAny: std::any::Any {
    fn as_any(&self) -> &dyn std::any::Any;
}
impl<T: std::any::Any> AsAny for T {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

pub trait LeafBox: fmt::Debug + AsAny {
    /// Bytes written by `encode`, i.e. everything after the 8/16/24-byte
    /// common header (including the 4-byte version+flags for full boxes).
    fn encoded_len(&self) -> u64;
    fn encode(&self, w: &mut dyn Write) -> Result<()>;
}

impl Mp4Node {
    pub fn as_leaf<T: 'static>(&self) -> Option<&T> {
        match &self.body {
            NodeBody::Leaf(b) => b.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum NodeBody {
    Container(Vec<Mp4Node>),
    FullContainer {
        version: u8,
        flags: u32,
        prefix: Vec<u8>,
        children: Vec<Mp4Node>,
    },
    EntryContainer {
        prefix: Vec<u8>,
        children: Vec<Mp4Node>,
    },
    Leaf(Box<dyn LeafBox>),
}

#[derive(Debug)]
pub struct Mp4Node {
    pub typ: FourCC,
    pub uuid: Option<[u8; 16]>,
    pub body: NodeBody,
}

impl Mp4Node {
    pub fn container(typ: FourCC, children: Vec<Mp4Node>) -> Self {
        Mp4Node {
            typ,
            uuid: None,
            body: NodeBody::Container(children),
        }
    }

    pub fn leaf(typ: FourCC, b: Box<dyn LeafBox>) -> Self {
        Mp4Node {
            typ,
            uuid: None,
            body: NodeBody::Leaf(b),
        }
    }

    pub fn get(&self, t: &str) -> Option<&Mp4Node> {
        self.children().iter().find(|c| c.typ.as_str_lossy() == t)
    }

    pub fn children(&self) -> &[Mp4Node] {
        match &self.body {
            NodeBody::Container(c) => c,
            NodeBody::FullContainer { children, .. } => children,
            NodeBody::EntryContainer { children, .. } => children,
            NodeBody::Leaf(_) => &[],
        }
    }

    fn body_len(&self) -> u64 {
        match &self.body {
            NodeBody::Container(c) => c.iter().map(Mp4Node::nb_bytes).sum(),
            NodeBody::FullContainer {
                prefix, children, ..
            } => 4 + prefix.len() as u64 + children.iter().map(Mp4Node::nb_bytes).sum::<u64>(),
            NodeBody::EntryContainer { prefix, children } => {
                prefix.len() as u64 + children.iter().map(Mp4Node::nb_bytes).sum::<u64>()
            }
            NodeBody::Leaf(l) => l.encoded_len(),
        }
    }

    /// Exact on-wire byte count of the whole subtree (spec §4.1 `nb_bytes`).
    pub fn nb_bytes(&self) -> u64 {
        let body = self.body_len();
        let mut hdr = 8u64;
        if self.uuid.is_some() {
            hdr += 16;
        }
        let small = hdr + body;
        if small > u32::MAX as u64 {
            hdr + 8 + body
        } else {
            small
        }
    }

    /// Writes the subtree: first derives size fields from `nb_bytes()`, then
    /// header, then body (spec §4.1 `encode`).
    pub fn encode(&self, w: &mut dyn Write) -> Result<()> {
        let total = self.nb_bytes();
        if total > u32::MAX as u64 {
            w.write_u32::<BigEndian>(1)?;
        } else {
            w.write_u32::<BigEndian>(total as u32)?;
        }
        let typ = if self.uuid.is_some() {
            *b"uuid"
        } else {
            self.typ.0
        };
        w.write_all(&typ)?;
        if total > u32::MAX as u64 {
            w.write_u64::<BigEndian>(total)?;
        }
        if let Some(u) = self.uuid {
            w.write_all(&u)?;
        }
        match &self.body {
            NodeBody::Container(c) => {
                for child in c {
                    child.encode(w)?;
                }
            }
            NodeBody::FullContainer {
                version,
                flags,
                prefix,
                children,
            } => {
                w.write_u32::<BigEndian>(((*version as u32) << 24) | (flags & 0x00ff_ffff))?;
                w.write_all(prefix)?;
                for child in children {
                    child.encode(w)?;
                }
            }
            NodeBody::EntryContainer { prefix, children } => {
                w.write_all(prefix)?;
                for child in children {
                    child.encode(w)?;
                }
            }
            NodeBody::Leaf(l) => l.encode(w)?,
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.nb_bytes() as usize);
        self.encode(&mut buf)?;
        Ok(buf)
    }
}

/// Header discovered by peeking (size, type) without consuming the payload
/// (spec §4.1 `discovery`).
pub struct RawHeader {
    pub typ: FourCC,
    pub uuid: Option<[u8; 16]>,
    pub header_len: u64,
    /// Absolute end offset of this box, or `None` when size==0 ("extends to
    /// the end of the enclosing region").
    pub end: Option<u64>,
    pub start: u64,
}

pub fn read_header<R: Read + Seek>(r: &mut R) -> Result<RawHeader> {
    let start = r.stream_position()?;
    let mut hdr8 = [0u8; 8];
    if r.read_exact(&mut hdr8).is_err() {
        return Err(Mp4Error::RequireSpace {
            component: "box header",
            required: 8,
            available: 0,
        });
    }
    let mut small = u32::from_be_bytes([hdr8[0], hdr8[1], hdr8[2], hdr8[3]]) as u64;
    let typ = FourCC([hdr8[4], hdr8[5], hdr8[6], hdr8[7]]);
    let mut header_len = 8u64;
    if small == 1 {
        let mut lb = [0u8; 8];
        r.read_exact(&mut lb).map_err(|_| Mp4Error::RequireSpace {
            component: "box largesize",
            required: 8,
            available: 0,
        })?;
        small = u64::from_be_bytes(lb);
        header_len += 8;
    }
    let mut uuid = None;
    if typ.as_str_lossy() == "uuid" {
        let mut u = [0u8; 16];
        r.read_exact(&mut u).map_err(|_| Mp4Error::RequireSpace {
            component: "box uuid",
            required: 16,
            available: 0,
        })?;
        uuid = Some(u);
        header_len += 16;
    }
    let end = if small == 0 { None } else { Some(start + small) };
    if let Some(e) = end {
        if small > 0 && (e - start) > 0x7fff_ffff {
            return Err(Mp4Error::BoxOverflow { typ, size: small });
        }
    }
    Ok(RawHeader {
        typ,
        uuid,
        header_len,
        end,
        start,
    })
}

/// Recursively decodes a box tree rooted at the reader's current position,
/// bounded by `parent_end` (absolute offset, used when a box's own size is
/// 0, i.e. "to parent end").
pub fn decode_node<R: Read + Seek>(r: &mut R, parent_end: u64) -> Result<Mp4Node> {
    let h = read_header(r)?;
    let end = h.end.unwrap_or(parent_end);
    if end < h.start + h.header_len {
        return Err(Mp4Error::BoxOverflow {
            typ: h.typ,
            size: end.saturating_sub(h.start),
        });
    }
    let body_len = end - h.start - h.header_len;
    let type_str = h.typ.as_str_lossy();

    let node = if is_plain_container(h.typ) {
        let mut children = Vec::new();
        let stop = h.start + h.header_len + body_len;
        while r.stream_position()? < stop {
            children.push(decode_node(r, stop)?);
        }
        Mp4Node {
            typ: h.typ,
            uuid: h.uuid,
            body: NodeBody::Container(children),
        }
    } else if is_full_container(h.typ) {
        let mut vf = [0u8; 4];
        r.read_exact(&mut vf)?;
        let version = vf[0];
        let flags = u32::from_be_bytes([0, vf[1], vf[2], vf[3]]);
        let mut count_buf = [0u8; 4];
        r.read_exact(&mut count_buf)?;
        let count = u32::from_be_bytes(count_buf);
        let stop = h.start + h.header_len + body_len;
        let mut children = Vec::new();
        for _ in 0..count {
            if r.stream_position()? >= stop {
                break;
            }
            children.push(decode_node(r, stop)?);
        }
        Mp4Node {
            typ: h.typ,
            uuid: h.uuid,
            body: NodeBody::FullContainer {
                version,
                flags,
                prefix: count_buf.to_vec(),
                children,
            },
        }
    } else if is_entry_container(h.typ) {
        let prefix_len: usize = match type_str.as_str() {
            "avc1" | "hev1" => 8 + 70,
            "mp4a" => 8 + 20,
            _ => 8,
        };
        let mut prefix = vec![0u8; prefix_len];
        r.read_exact(&mut prefix)?;
        let stop = h.start + h.header_len + body_len;
        let mut children = Vec::new();
        while r.stream_position()? < stop {
            children.push(decode_node(r, stop)?);
        }
        Mp4Node {
            typ: h.typ,
            uuid: h.uuid,
            body: NodeBody::EntryContainer { prefix, children },
        }
    } else {
        let mut data = vec![0u8; body_len as usize];
        r.read_exact(&mut data)?;
        let leaf = crate::boxes_ext::decode_leaf(h.typ, &data)?;
        Mp4Node {
            typ: h.typ,
            uuid: h.uuid,
            body: NodeBody::Leaf(leaf),
        }
    };
    r.seek(SeekFrom::Start(end))?;
    Ok(node)
}

pub fn read_u8(c: &mut impl Read) -> Result<u8> {
    Ok(c.read_u8()?)
}
pub fn read_u16(c: &mut impl Read) -> Result<u16> {
    Ok(c.read_u16::<BigEndian>()?)
}
pub fn read_u24(c: &mut impl Read) -> Result<u32> {
    let mut b = [0u8; 3];
    c.read_exact(&mut b)?;
    Ok(u32::from_be_bytes([0, b[0], b[1], b[2]]))
}
pub fn read_u32(c: &mut impl Read) -> Result<u32> {
    Ok(c.read_u32::<BigEndian>()?)
}
pub fn read_i32(c: &mut impl Read) -> Result<i32> {
    Ok(c.read_i32::<BigEndian>()?)
}
pub fn read_u64(c: &mut impl Read) -> Result<u64> {
    Ok(c.read_u64::<BigEndian>()?)
}

pub fn write_u24(w: &mut dyn Write, v: u32) -> Result<()> {
    let b = v.to_be_bytes();
    w.write_all(&b[1..4])?;
    Ok(())
}
