use std::convert::{TryFrom, TryInto};
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// A 32-byte opaque hash: `SubnetID`, `BlockchainID`, `ValidationID`,
/// `DelegationID`, `ConversionID` and `MessageID` are all this same shape.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
pub struct Id32(pub [u8; 32]);

impl Id32 {
    pub const ZERO: Id32 = Id32([0u8; 32]);

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Id32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id32({})", hex(&self.0))
    }
}

impl From<[u8; 32]> for Id32 {
    fn from(bytes: [u8; 32]) -> Self {
        Id32(bytes)
    }
}

impl TryFrom<&[u8]> for Id32 {
    type Error = CodecError;

    fn try_from(bytes: &[u8]) -> Result<Self, CodecError> {
        let arr: [u8; 32] =
            bytes
                .try_into()
                .map_err(|_| CodecError::InvalidMessageLength {
                    got: bytes.len(),
                    expected: 32,
                })?;
        Ok(Id32(arr))
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// `{threshold, addresses}` with `threshold <= addresses.len()`, serialized
/// as `u32 threshold || u32 addr_count || addr_count * 20-byte addresses`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct PChainOwner {
    pub threshold: u32,
    pub addresses: Vec<[u8; 20]>,
}

impl PChainOwner {
    pub fn is_valid(&self) -> bool {
        (self.threshold as usize) <= self.addresses.len()
    }

    pub fn packed_len(&self) -> usize {
        4 + 4 + self.addresses.len() * 20
    }

    pub(crate) fn pack_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.threshold.to_be_bytes());
        buf.extend_from_slice(&(self.addresses.len() as u32).to_be_bytes());
        for addr in &self.addresses {
            buf.extend_from_slice(addr);
        }
    }

    pub(crate) fn unpack_from(bytes: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        if bytes.len() < 8 {
            return Err(CodecError::InvalidMessageLength {
                got: bytes.len(),
                expected: 8,
            });
        }
        let threshold = u32::from_be_bytes(bytes[0..4].try_into().unwrap());
        let addr_count = u32::from_be_bytes(bytes[4..8].try_into().unwrap()) as usize;
        let mut rest = &bytes[8..];
        let needed = addr_count * 20;
        if rest.len() < needed {
            return Err(CodecError::InvalidMessageLength {
                got: rest.len(),
                expected: needed,
            });
        }
        let mut addresses = Vec::with_capacity(addr_count);
        for _ in 0..addr_count {
            let addr: [u8; 20] = rest[0..20].try_into().unwrap();
            addresses.push(addr);
            rest = &rest[20..];
        }
        Ok((
            PChainOwner {
                threshold,
                addresses,
            },
            rest,
        ))
    }
}
