use cosmwasm_std::StdError;
use thiserror::Error;

use crate::state::ValidatorStatus;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Admin(#[from] cw_controllers::AdminError),

    #[error("{0}")]
    Codec(#[from] warp_codec::CodecError),

    #[error("already initialized")]
    AlreadyInitialized {},

    #[error("maximum churn percentage must be in 0..=20")]
    InvalidChurnPercentage {},

    #[error("invalid validator status: {0:?}")]
    InvalidValidatorStatus(ValidatorStatus),

    #[error("invalid total weight: {0}")]
    InvalidTotalWeight(u64),

    #[error("invalid stake amount")]
    InvalidStakeAmount {},

    #[error("max churn rate exceeded")]
    MaxChurnRateExceeded {},

    #[error("invalid nonce: {0}")]
    InvalidNonce(u64),

    #[error("unexpected validation id: got {got:?}, expected {expected:?}")]
    UnexpectedValidationID { got: String, expected: String },

    #[error("invalid warp message")]
    InvalidWarpMessage {},

    #[error("invalid warp source chain id")]
    InvalidWarpSourceChainID {},

    #[error("invalid warp origin sender address")]
    InvalidWarpOriginSenderAddress {},

    #[error("registration already exists")]
    RegistrationAlreadyExists {},

    #[error("invalid P-Chain owner: threshold exceeds address count")]
    InvalidPChainOwner {},

    #[error("unauthorized: {0}")]
    Unauthorized(String),
}
