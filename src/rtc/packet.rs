//! RTP packet contract the source/consumer fan-out operates over (spec
//! §6.3/§6.4 glossary: SSRC).

use std::fmt;

/// One RTP packet. `copy()` stands in for the "ownership passes, but each
/// consumer gets its own" rule in spec §4.7 step 2/3: the source hands a
/// fresh copy to the bridge and to every consumer rather than sharing one
/// buffer (see `DESIGN.md` for why this crate copies instead of `Arc`-sharing).
pub trait RtpPacket: fmt::Debug + Send {
    fn sequence_number(&self) -> u16;
    fn timestamp(&self) -> u32;
    fn ssrc(&self) -> u32;
    fn copy(&self) -> Box<dyn RtpPacket>;
}

/// A plain byte-buffer packet, useful for tests and for bridges that don't
/// need a richer representation.
#[derive(Debug, Clone)]
pub struct RawRtpPacket {
    pub sequence_number: u16,
    pub timestamp: u32,
    pub ssrc: u32,
    pub payload: Vec<u8>,
}

impl RtpPacket for RawRtpPacket {
    fn sequence_number(&self) -> u16 {
        self.sequence_number
    }
    fn timestamp(&self) -> u32 {
        self.timestamp
    }
    fn ssrc(&self) -> u32 {
        self.ssrc
    }
    fn copy(&self) -> Box<dyn RtpPacket> {
        Box::new(self.clone())
    }
}
