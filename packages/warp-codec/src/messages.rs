use std::convert::TryInto;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CodecError;
use crate::ids::{Id32, PChainOwner};
use crate::{MessageType, BLS_PUBLIC_KEY_LEN, CODEC_VERSION};

fn write_header(buf: &mut Vec<u8>, type_id: MessageType) {
    buf.extend_from_slice(&CODEC_VERSION.to_be_bytes());
    buf.extend_from_slice(&(type_id as u32).to_be_bytes());
}

/// Strips and validates the `codec_id || type_id` header, returning the
/// remaining payload bytes.
fn read_header(bytes: &[u8], expected: MessageType) -> Result<&[u8], CodecError> {
    if bytes.len() < 6 {
        return Err(CodecError::InvalidMessageLength {
            got: bytes.len(),
            expected: 6,
        });
    }
    let codec_id = u16::from_be_bytes(bytes[0..2].try_into().unwrap());
    if codec_id != CODEC_VERSION {
        return Err(CodecError::InvalidCodecID);
    }
    let type_id = u32::from_be_bytes(bytes[2..6].try_into().unwrap());
    if type_id != expected as u32 {
        return Err(CodecError::InvalidMessageType);
    }
    Ok(&bytes[6..])
}

fn expect_len(payload: &[u8], expected: usize) -> Result<(), CodecError> {
    if payload.len() != expected {
        return Err(CodecError::InvalidMessageLength {
            got: payload.len(),
            expected,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------
// SubnetToL1ConversionMessage: conversion_id: bytes32. Fixed 38 bytes.
// ---------------------------------------------------------------------

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
pub struct SubnetToL1ConversionMessage {
    pub conversion_id: Id32,
}

pub fn pack_subnet_to_l1_conversion(msg: &SubnetToL1ConversionMessage) -> Vec<u8> {
    let mut buf = Vec::with_capacity(38);
    write_header(&mut buf, MessageType::SubnetToL1Conversion);
    buf.extend_from_slice(msg.conversion_id.as_bytes());
    buf
}

pub fn unpack_subnet_to_l1_conversion(
    bytes: &[u8],
) -> Result<SubnetToL1ConversionMessage, CodecError> {
    let payload = read_header(bytes, MessageType::SubnetToL1Conversion)?;
    expect_len(payload, 32)?;
    Ok(SubnetToL1ConversionMessage {
        conversion_id: Id32::try_from(payload)?,
    })
}

// ---------------------------------------------------------------------
// ValidationUptimeMessage: validation_id: bytes32 || uptime_seconds: u64. 46 bytes.
// ---------------------------------------------------------------------

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
pub struct ValidationUptimeMessage {
    pub validation_id: Id32,
    pub uptime_seconds: u64,
}

pub fn pack_validation_uptime(msg: &ValidationUptimeMessage) -> Vec<u8> {
    let mut buf = Vec::with_capacity(46);
    write_header(&mut buf, MessageType::ValidationUptime);
    buf.extend_from_slice(msg.validation_id.as_bytes());
    buf.extend_from_slice(&msg.uptime_seconds.to_be_bytes());
    buf
}

pub fn unpack_validation_uptime(bytes: &[u8]) -> Result<ValidationUptimeMessage, CodecError> {
    let payload = read_header(bytes, MessageType::ValidationUptime)?;
    expect_len(payload, 40)?;
    let validation_id = Id32::try_from(&payload[0..32])?;
    let uptime_seconds = u64::from_be_bytes(payload[32..40].try_into().unwrap());
    Ok(ValidationUptimeMessage {
        validation_id,
        uptime_seconds,
    })
}

// ---------------------------------------------------------------------
// L1ValidatorRegistrationMessage: validation_id: bytes32 || valid: u8. 39 bytes.
// ---------------------------------------------------------------------

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
pub struct L1ValidatorRegistrationMessage {
    pub validation_id: Id32,
    pub valid: bool,
}

pub fn pack_l1_validator_registration(msg: &L1ValidatorRegistrationMessage) -> Vec<u8> {
    let mut buf = Vec::with_capacity(39);
    write_header(&mut buf, MessageType::L1ValidatorRegistration);
    buf.extend_from_slice(msg.validation_id.as_bytes());
    buf.push(msg.valid as u8);
    buf
}

pub fn unpack_l1_validator_registration(
    bytes: &[u8],
) -> Result<L1ValidatorRegistrationMessage, CodecError> {
    let payload = read_header(bytes, MessageType::L1ValidatorRegistration)?;
    expect_len(payload, 33)?;
    let validation_id = Id32::try_from(&payload[0..32])?;
    let valid = match payload[32] {
        0 => false,
        1 => true,
        _ => return Err(CodecError::InvalidMessageLength { got: 33, expected: 33 }),
    };
    Ok(L1ValidatorRegistrationMessage {
        validation_id,
        valid,
    })
}

// ---------------------------------------------------------------------
// L1ValidatorWeightMessage: validation_id: bytes32 || nonce: u64 || weight: u64. 54 bytes.
// ---------------------------------------------------------------------

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
pub struct L1ValidatorWeightMessage {
    pub validation_id: Id32,
    pub nonce: u64,
    pub weight: u64,
}

pub fn pack_l1_validator_weight(msg: &L1ValidatorWeightMessage) -> Vec<u8> {
    let mut buf = Vec::with_capacity(54);
    write_header(&mut buf, MessageType::L1ValidatorWeight);
    buf.extend_from_slice(msg.validation_id.as_bytes());
    buf.extend_from_slice(&msg.nonce.to_be_bytes());
    buf.extend_from_slice(&msg.weight.to_be_bytes());
    buf
}

pub fn unpack_l1_validator_weight(bytes: &[u8]) -> Result<L1ValidatorWeightMessage, CodecError> {
    let payload = read_header(bytes, MessageType::L1ValidatorWeight)?;
    expect_len(payload, 48)?;
    let validation_id = Id32::try_from(&payload[0..32])?;
    let nonce = u64::from_be_bytes(payload[32..40].try_into().unwrap());
    let weight = u64::from_be_bytes(payload[40..48].try_into().unwrap());
    Ok(L1ValidatorWeightMessage {
        validation_id,
        nonce,
        weight,
    })
}

// ---------------------------------------------------------------------
// RegisterL1ValidatorMessage
// ---------------------------------------------------------------------

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct RegisterL1ValidatorMessage {
    pub subnet_id: Id32,
    pub node_id: Vec<u8>,
    pub bls_public_key: Vec<u8>,
    pub expiry: u64,
    pub remaining_balance_owner: PChainOwner,
    pub disable_owner: PChainOwner,
    pub weight: u64,
}

pub fn pack_register_l1_validator(msg: &RegisterL1ValidatorMessage) -> Result<Vec<u8>, CodecError> {
    if msg.bls_public_key.len() != BLS_PUBLIC_KEY_LEN {
        return Err(CodecError::InvalidBLSPublicKey);
    }
    let mut buf = Vec::new();
    write_header(&mut buf, MessageType::RegisterL1Validator);
    buf.extend_from_slice(msg.subnet_id.as_bytes());
    buf.extend_from_slice(&(msg.node_id.len() as u32).to_be_bytes());
    buf.extend_from_slice(&msg.node_id);
    buf.extend_from_slice(&(msg.bls_public_key.len() as u32).to_be_bytes());
    buf.extend_from_slice(&msg.bls_public_key);
    buf.extend_from_slice(&msg.expiry.to_be_bytes());
    msg.remaining_balance_owner.pack_into(&mut buf);
    msg.disable_owner.pack_into(&mut buf);
    buf.extend_from_slice(&msg.weight.to_be_bytes());
    Ok(buf)
}

pub fn unpack_register_l1_validator(
    bytes: &[u8],
) -> Result<RegisterL1ValidatorMessage, CodecError> {
    let payload = read_header(bytes, MessageType::RegisterL1Validator)?;
    if payload.len() < 32 + 4 {
        return Err(CodecError::InvalidMessageLength {
            got: payload.len(),
            expected: 36,
        });
    }
    let subnet_id = Id32::try_from(&payload[0..32])?;
    let mut rest = &payload[32..];

    let node_id_len = u32::from_be_bytes(rest[0..4].try_into().unwrap()) as usize;
    rest = &rest[4..];
    if rest.len() < node_id_len {
        return Err(CodecError::InvalidMessageLength {
            got: rest.len(),
            expected: node_id_len,
        });
    }
    let node_id = rest[..node_id_len].to_vec();
    rest = &rest[node_id_len..];

    if rest.len() < 4 {
        return Err(CodecError::InvalidMessageLength {
            got: rest.len(),
            expected: 4,
        });
    }
    let bls_len = u32::from_be_bytes(rest[0..4].try_into().unwrap()) as usize;
    rest = &rest[4..];
    if bls_len != BLS_PUBLIC_KEY_LEN {
        return Err(CodecError::InvalidBLSPublicKey);
    }
    if rest.len() < bls_len {
        return Err(CodecError::InvalidMessageLength {
            got: rest.len(),
            expected: bls_len,
        });
    }
    let bls_public_key = rest[..bls_len].to_vec();
    rest = &rest[bls_len..];

    if rest.len() < 8 {
        return Err(CodecError::InvalidMessageLength {
            got: rest.len(),
            expected: 8,
        });
    }
    let expiry = u64::from_be_bytes(rest[0..8].try_into().unwrap());
    rest = &rest[8..];

    let (remaining_balance_owner, rest) = PChainOwner::unpack_from(rest)?;
    let (disable_owner, rest) = PChainOwner::unpack_from(rest)?;

    expect_len(rest, 8)?;
    let weight = u64::from_be_bytes(rest[0..8].try_into().unwrap());

    Ok(RegisterL1ValidatorMessage {
        subnet_id,
        node_id,
        bls_public_key,
        expiry,
        remaining_balance_owner,
        disable_owner,
        weight,
    })
}

/// `validation_id = sha256(pack(msg))`, matching the remote (P-Chain) side's
/// independent derivation of the same id from the same bytes.
pub fn register_l1_validator_id(packed: &[u8]) -> Id32 {
    Id32(Sha256::digest(packed).into())
}

// ---------------------------------------------------------------------
// ConversionData — authenticates the genesis validator set.
// ---------------------------------------------------------------------

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct InitialValidator {
    pub node_id: Vec<u8>,
    pub bls_public_key: Vec<u8>,
    pub weight: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct ConversionData {
    pub subnet_id: Id32,
    pub manager_blockchain_id: Id32,
    pub manager_address: [u8; 20],
    pub initial_validators: Vec<InitialValidator>,
}

pub fn pack_conversion_data(data: &ConversionData) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    buf.extend_from_slice(data.subnet_id.as_bytes());
    buf.extend_from_slice(data.manager_blockchain_id.as_bytes());
    buf.extend_from_slice(&20u32.to_be_bytes());
    buf.extend_from_slice(&data.manager_address);
    buf.extend_from_slice(&(data.initial_validators.len() as u32).to_be_bytes());
    for v in &data.initial_validators {
        if v.bls_public_key.len() != BLS_PUBLIC_KEY_LEN {
            return Err(CodecError::InvalidBLSPublicKey);
        }
        buf.extend_from_slice(&(v.node_id.len() as u32).to_be_bytes());
        buf.extend_from_slice(&v.node_id);
        buf.extend_from_slice(&(v.bls_public_key.len() as u32).to_be_bytes());
        buf.extend_from_slice(&v.bls_public_key);
        buf.extend_from_slice(&v.weight.to_be_bytes());
    }
    Ok(buf)
}

/// `conversion_id = sha256(pack(conversion_data))`.
pub fn conversion_id(data: &ConversionData) -> Result<Id32, CodecError> {
    let packed = pack_conversion_data(data)?;
    Ok(Id32(Sha256::digest(&packed).into()))
}

/// `validation_id_i = sha256(subnet_id || u32(i))` for genesis validator `i`.
pub fn initial_validator_id(subnet_id: &Id32, index: u32) -> Id32 {
    let mut buf = Vec::with_capacity(36);
    buf.extend_from_slice(subnet_id.as_bytes());
    buf.extend_from_slice(&index.to_be_bytes());
    Id32(Sha256::digest(&buf).into())
}
