//! Deterministic big-endian codec for the five Warp message kinds exchanged
//! between the local core and the P-Chain, plus the `ConversionData` payload
//! used to authenticate the genesis validator set.
//!
//! Every message is framed as `u16 codec_id (always 0) || u32 type_id || payload`.

mod error;
mod ids;
mod messages;

pub use error::CodecError;
pub use ids::{Id32, PChainOwner};
pub use messages::{
    conversion_id, initial_validator_id, pack_conversion_data, pack_l1_validator_registration,
    pack_l1_validator_weight, pack_register_l1_validator, pack_subnet_to_l1_conversion,
    pack_validation_uptime, unpack_l1_validator_registration, unpack_l1_validator_weight,
    unpack_register_l1_validator, unpack_subnet_to_l1_conversion, unpack_validation_uptime,
    ConversionData, InitialValidator, L1ValidatorRegistrationMessage, L1ValidatorWeightMessage,
    RegisterL1ValidatorMessage, SubnetToL1ConversionMessage, ValidationUptimeMessage,
};

pub const CODEC_VERSION: u16 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MessageType {
    SubnetToL1Conversion = 0,
    RegisterL1Validator = 1,
    L1ValidatorRegistration = 2,
    L1ValidatorWeight = 3,
    ValidationUptime = 4,
}

pub const BLS_PUBLIC_KEY_LEN: usize = 48;
