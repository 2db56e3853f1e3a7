//! MP4 encoders (spec §4.4/§4.5): shared `moov`/`trak`/`stsd` assembly used
//! by both the progressive encoder and the fragmented init encoder.

pub mod init;
pub mod progressive;
pub mod segment;

use crate::boxes::FourCC;
use crate::boxes_ext::cenc::{FrmaBox, SchmBox, TencBox};
use crate::boxes_ext::esds::EsdsBox;
use crate::boxes_ext::movie_header::{HdlrBox, MdhdBox, TkhdBox};
use crate::boxes_ext::raw::RawLeaf;
use crate::boxes_ext::sample_entry_fields::{AudioEntryPrefix, VisualEntryPrefix};
use crate::boxtree::{Mp4Node, NodeBody};
use crate::cenc_config::CencConfig;
use crate::sample_manager::{SampleManager, Track};

/// Per-track codec configuration an application supplies at encoder
/// construction (sequence headers copied in verbatim, spec §4.4 step 2).
#[derive(Debug, Clone)]
pub enum CodecConfig {
    Avc {
        width: u16,
        height: u16,
        avc_decoder_config: Vec<u8>,
    },
    Hevc {
        width: u16,
        height: u16,
        hvc_decoder_config: Vec<u8>,
    },
    Aac {
        channel_count: u16,
        sample_size: u16,
        sample_rate: u32,
        asc: Vec<u8>,
    },
}

impl CodecConfig {
    pub fn is_video(&self) -> bool {
        !matches!(self, CodecConfig::Aac { .. })
    }
}

fn fourcc(s: &str) -> FourCC {
    FourCC::from_str(s).unwrap()
}

/// Builds the `stsd` sample-description box for one track, optionally
/// wrapped for CENC (spec §4.5: entry renamed `encv`/`enca`, original type
/// preserved in `frma`, `sinf` subtree appended).
pub fn build_stsd(codec: &CodecConfig, cenc: Option<&CencConfig>) -> Mp4Node {
    let (entry_type, prefix, children): (&str, Vec<u8>, Vec<Mp4Node>) = match codec {
        CodecConfig::Avc {
            width,
            height,
            avc_decoder_config,
        } => (
            "avc1",
            VisualEntryPrefix {
                width: *width,
                height: *height,
            }
            .build(),
            vec![Mp4Node::leaf(
                fourcc("avcC"),
                Box::new(RawLeaf::of(avc_decoder_config.clone())),
            )],
        ),
        CodecConfig::Hevc {
            width,
            height,
            hvc_decoder_config,
        } => (
            "hev1",
            VisualEntryPrefix {
                width: *width,
                height: *height,
            }
            .build(),
            vec![Mp4Node::leaf(
                fourcc("hvcC"),
                Box::new(RawLeaf::of(hvc_decoder_config.clone())),
            )],
        ),
        CodecConfig::Aac {
            channel_count,
            sample_size,
            sample_rate,
            asc,
        } => (
            "mp4a",
            AudioEntryPrefix {
                channel_count: *channel_count,
                sample_size: *sample_size,
                sample_rate: *sample_rate,
            }
            .build(),
            vec![Mp4Node::leaf(fourcc("esds"), Box::new(EsdsBox::aac(asc.clone())))],
        ),
    };

    let mut out_type = entry_type;
    let mut out_children = children;

    if let Some(cfg) = cenc {
        let wrapped_type = if codec.is_video() { "encv" } else { "enca" };
        let sinf = Mp4Node {
            typ: fourcc("sinf"),
            uuid: None,
            body: NodeBody::Container(vec![
                Mp4Node::leaf(
                    fourcc("frma"),
                    Box::new(FrmaBox {
                        original_format: fourcc(entry_type),
                    }),
                ),
                Mp4Node::leaf(fourcc("schm"), Box::new(SchmBox::cbcs())),
                Mp4Node {
                    typ: fourcc("schi"),
                    uuid: None,
                    body: NodeBody::Container(vec![Mp4Node::leaf(
                        fourcc("tenc"),
                        Box::new(TencBox {
                            default_crypt_byte_block: cfg.crypt_byte_block,
                            default_skip_byte_block: cfg.skip_byte_block,
                            default_is_protected: 1,
                            default_per_sample_iv_size: 0,
                            default_kid: cfg.kid,
                            default_constant_iv: Some(cfg.iv.clone()),
                        }),
                    )],
                },
            ]),
        };
        out_children.push(sinf);
        out_type = wrapped_type;
    }

    let entry = Mp4Node {
        typ: fourcc(out_type),
        uuid: None,
        body: NodeBody::EntryContainer {
            prefix,
            children: out_children,
        },
    };

    Mp4Node {
        typ: fourcc("stsd"),
        uuid: None,
        body: NodeBody::FullContainer {
            version: 0,
            flags: 0,
            prefix: 1u32.to_be_bytes().to_vec(),
            children: vec![entry],
        },
    }
}

/// Assembles one `trak` subtree (spec §4.4 flush): `tkhd+edts+elst+mdia(
/// mdhd+hdlr+minf(vmhd|smhd+dinf(dref(url))+stbl(stsd+...)))`.
pub fn build_trak(
    track_id: u32,
    timescale: u32,
    duration: u64,
    codec: &CodecConfig,
    cenc: Option<&CencConfig>,
    stbl_tables: Vec<Mp4Node>,
) -> Mp4Node {
    let is_video = codec.is_video();

    let tkhd = Mp4Node::leaf(
        fourcc("tkhd"),
        Box::new(TkhdBox {
            version: 0,
            flags: 0x0000_0003, // track_enabled | track_in_movie
            creation_time: 0,
            modification_time: 0,
            track_id,
            duration,
            is_audio: !is_video,
            width: match codec {
                CodecConfig::Avc { width, .. } | CodecConfig::Hevc { width, .. } => (*width as u32) << 16,
                CodecConfig::Aac { .. } => 0,
            },
            height: match codec {
                CodecConfig::Avc { height, .. } | CodecConfig::Hevc { height, .. } => (*height as u32) << 16,
                CodecConfig::Aac { .. } => 0,
            },
        }),
    );

    let hdlr = Mp4Node::leaf(
        fourcc("hdlr"),
        Box::new(HdlrBox {
            handler_type: fourcc(if is_video { "vide" } else { "soun" }),
            name: if is_video {
                "VideoHandler".to_string()
            } else {
                "SoundHandler".to_string()
            },
        }),
    );

    let mdhd = Mp4Node::leaf(
        fourcc("mdhd"),
        Box::new(MdhdBox {
            version: 0,
            creation_time: 0,
            modification_time: 0,
            timescale,
            duration,
            language: *b"und",
        }),
    );

    let mut stsd_and_tables = vec![build_stsd(codec, cenc)];
    stsd_and_tables.extend(stbl_tables);

    let stbl = Mp4Node::container(fourcc("stbl"), stsd_and_tables);

    let minf = Mp4Node::container(
        fourcc("minf"),
        vec![
            SampleManager::media_handler_box(is_video),
            SampleManager::self_contained_dinf(),
            stbl,
        ],
    );

    let mdia = Mp4Node::container(fourcc("mdia"), vec![mdhd, hdlr, minf]);

    Mp4Node::container(
        fourcc("trak"),
        vec![tkhd, SampleManager::empty_edts(), mdia],
    )
}

/// Builds `stbl` children from a stored track's samples (spec §4.3 write).
pub fn stbl_tables_for(track: &Track, is_video: bool) -> Vec<Mp4Node> {
    SampleManager::write_stbl_children(track, is_video)
}
