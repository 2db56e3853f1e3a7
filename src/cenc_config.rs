//! Construction-time configuration objects (spec §6.5, SPEC_FULL
//! [AMBIENT] Configuration). Plain structs with public fields; no
//! config-file parsing crate, which is out of scope per spec §1.

use crate::error::{Mp4Error, Result};

/// Encryption config for the fMP4 init encoder.
///
/// Validated eagerly via `TryFrom`, matching the teacher's style of
/// validating at construction in its box decoders rather than at use time.
#[derive(Debug, Clone)]
pub struct CencConfig {
    pub crypt_byte_block: u8,
    pub skip_byte_block: u8,
    pub kid: [u8; 16],
    pub iv: Vec<u8>,
}

impl TryFrom<CencConfigRequest> for CencConfig {
    type Error = Mp4Error;

    fn try_from(r: CencConfigRequest) -> Result<Self> {
        if r.crypt_byte_block + r.skip_byte_block != 10 {
            return Err(Mp4Error::IllegalType {
                typ: crate::boxes::FourCC::from_str("tenc").unwrap(),
            });
        }
        if r.iv.len() != 8 && r.iv.len() != 16 {
            return Err(Mp4Error::IllegalType {
                typ: crate::boxes::FourCC::from_str("tenc").unwrap(),
            });
        }
        Ok(CencConfig {
            crypt_byte_block: r.crypt_byte_block,
            skip_byte_block: r.skip_byte_block,
            kid: r.kid,
            iv: r.iv,
        })
    }
}

/// Unvalidated request form; construct this, then `CencConfig::try_from`.
#[derive(Debug, Clone)]
pub struct CencConfigRequest {
    pub crypt_byte_block: u8,
    pub skip_byte_block: u8,
    pub kid: [u8; 16],
    pub iv: Vec<u8>,
}

impl Default for CencConfigRequest {
    fn default() -> Self {
        CencConfigRequest {
            crypt_byte_block: 1,
            skip_byte_block: 9,
            kid: [0u8; 16],
            iv: vec![0u8; 8],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_byte_block_split() {
        let req = CencConfigRequest {
            crypt_byte_block: 2,
            skip_byte_block: 2,
            ..Default::default()
        };
        assert!(CencConfig::try_from(req).is_err());
    }

    #[test]
    fn accepts_default() {
        let req = CencConfigRequest::default();
        assert!(CencConfig::try_from(req).is_ok());
    }
}
