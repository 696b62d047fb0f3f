use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

use crate::state::DelegatorStatus;
use validator_manager_core::ValidatorStatus;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Core(#[from] validator_manager_core::ContractError),

    #[error("{0}")]
    Asset(#[from] asset_handler::AssetError),

    #[error("{0}")]
    Admin(#[from] cw_controllers::AdminError),

    #[error("{0}")]
    Codec(#[from] warp_codec::CodecError),

    #[error("delegation fee must be in [{min}, 10000] bips")]
    InvalidDelegationFee { min: u16 },

    #[error("minimum stake duration must be >= {min} seconds")]
    InvalidMinStakeDuration { min: u64 },

    #[error("stake amount {got} must be in [{min}, {max}]")]
    InvalidStakeAmount {
        got: Uint128,
        min: Uint128,
        max: Uint128,
    },

    #[error("maximum stake multiplier must be in (0, 10]")]
    InvalidStakeMultiplier {},

    #[error("weight_to_value_factor must be > 0")]
    ZeroWeightToValueFactor {},

    #[error("uptime blockchain id must be non-zero")]
    InvalidUptimeBlockchainID {},

    #[error("invalid validator status: {0:?}")]
    InvalidValidatorStatus(ValidatorStatus),

    #[error("invalid delegator status: {0:?}")]
    InvalidDelegatorStatus(DelegatorStatus),

    #[error("unknown delegation id")]
    InvalidDelegationID {},

    #[error("minimum stake duration not yet passed, ends at {0}")]
    MinStakeDurationNotPassed(u64),

    #[error("new validator weight {0} would exceed max stake multiplier")]
    MaxWeightExceeded(u64),

    #[error("validator is not a PoS validator")]
    ValidatorNotPoS {},

    #[error("validator ineligible for rewards")]
    ValidatorIneligibleForRewards {},

    #[error("delegator ineligible for rewards")]
    DelegatorIneligibleForRewards {},

    #[error("unauthorized: {0}")]
    UnauthorizedOwner(String),

    #[error("reward recipient must be non-zero")]
    InvalidRewardRecipient {},

    #[error("reentrant call rejected")]
    Reentrancy {},
}
