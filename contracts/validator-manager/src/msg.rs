use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::Binary;
use validator_manager_core::{ChurnTracker, Settings, Validator};
use warp_codec::{ConversionData, Id32, PChainOwner};

/// Mirrors `validator_manager_core::AuthorizedInitiator`, but carries an
/// unvalidated owner address as a bare `String` so `instantiate` can run
/// `deps.api.addr_validate` once up front.
#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub enum AuthorizedInitiatorMsg {
    Open,
    OwnerOnly(String),
}

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct InstantiateMsg {
    pub subnet_id: Id32,
    pub p_chain_blockchain_id: Id32,
    pub churn_period_seconds: u64,
    pub maximum_churn_percentage: u8,
    pub initiator: AuthorizedInitiatorMsg,
    /// Address allowed to call `MigrateFromV1`. If `None`, that admin
    /// operation is permanently unreachable on this instance.
    pub admin: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    InitializeValidatorSet {
        manager_address: [u8; 20],
        conversion_data: ConversionData,
        message_index: u32,
    },
    InitiateValidatorRegistration {
        node_id: Binary,
        bls_public_key: Binary,
        expiry: u64,
        remaining_balance_owner: PChainOwner,
        disable_owner: PChainOwner,
        weight: u64,
    },
    CompleteValidatorRegistration {
        message_index: u32,
    },
    InitiateValidatorWeightUpdate {
        validation_id: Id32,
        new_weight: u64,
    },
    InitiateValidatorRemoval {
        validation_id: Id32,
    },
    CompleteValidatorWeightUpdate {
        message_index: u32,
    },
    CompleteValidatorRemoval {
        message_index: u32,
    },
    /// Admin-only: re-seeds a validator record whose registration predates
    /// the current contract version.
    MigrateFromV1 {
        validation_id: Id32,
        node_id: Binary,
        weight: u64,
    },
    UpdateAdmin {
        admin: Option<String>,
    },
}

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    Validator { validation_id: Id32 },
    Settings {},
    L1TotalWeight {},
    ChurnTracker {},
    Admin {},
}

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct ValidatorResponse {
    pub validator: Option<Validator>,
}

pub type SettingsResponse = Settings;

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct L1TotalWeightResponse {
    pub weight: u64,
}

pub type ChurnTrackerResponse = ChurnTracker;

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct MigrateMsg {}
