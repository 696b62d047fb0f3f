use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::{Binary, Uint128};
use validator_manager_core::{ChurnTracker, Settings as VmSettings, Validator};
use warp_codec::{ConversionData, Id32, PChainOwner};

use crate::state::{Delegator, PosValidatorInfo, Settings};

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct InstantiateMsg {
    pub subnet_id: Id32,
    pub p_chain_blockchain_id: Id32,
    pub churn_period_seconds: u64,
    pub maximum_churn_percentage: u8,

    pub minimum_stake_amount: Uint128,
    pub maximum_stake_amount: Uint128,
    pub minimum_stake_duration: u64,
    pub minimum_delegation_fee_bips: u16,
    pub maximum_stake_multiplier: u8,
    pub weight_to_value_factor: Uint128,
    pub reward_basis_points: u32,
    pub uptime_blockchain_id: Id32,
    pub asset_denom: String,
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
    RegisterValidator {
        node_id: Binary,
        bls_public_key: Binary,
        expiry: u64,
        remaining_balance_owner: PChainOwner,
        disable_owner: PChainOwner,
        delegation_fee_bips: u16,
        min_stake_duration: u64,
        stake_amount: Uint128,
    },
    CompleteValidatorRegistration {
        message_index: u32,
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
    InitiateDelegatorRegistration {
        validation_id: Id32,
        value: Uint128,
    },
    CompleteDelegatorRegistration {
        delegation_id: Id32,
        message_index: Option<u32>,
    },
    InitiateDelegatorRemoval {
        delegation_id: Id32,
        include_uptime: bool,
        message_index: Option<u32>,
        reward_recipient: Option<String>,
    },
    ForceInitiateDelegatorRemoval {
        delegation_id: Id32,
        include_uptime: bool,
        message_index: Option<u32>,
        reward_recipient: Option<String>,
    },
    CompleteDelegatorRemoval {
        delegation_id: Id32,
        message_index: Option<u32>,
    },
    SubmitUptimeProof {
        validation_id: Id32,
        message_index: u32,
    },
    ResendUpdateDelegator {
        validation_id: Id32,
    },
    ChangeValidatorRewardRecipient {
        validation_id: Id32,
        new_recipient: String,
    },
    ChangeDelegatorRewardRecipient {
        delegation_id: Id32,
        new_recipient: String,
    },
    ClaimDelegationFees {
        validation_id: Id32,
    },
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
    PosValidatorInfo { validation_id: Id32 },
    Delegator { delegation_id: Id32 },
    VmSettings {},
    Settings {},
    L1TotalWeight {},
    ChurnTracker {},
    RedeemableValidatorRewards { validation_id: Id32 },
    Admin {},
}

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct ValidatorResponse {
    pub validator: Option<Validator>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct PosValidatorInfoResponse {
    pub info: Option<PosValidatorInfo>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct DelegatorResponse {
    pub delegator: Option<Delegator>,
}

pub type VmSettingsResponse = VmSettings;
pub type SettingsResponse = Settings;
pub type ChurnTrackerResponse = ChurnTracker;

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct L1TotalWeightResponse {
    pub weight: u64,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct RedeemableValidatorRewardsResponse {
    pub amount: Uint128,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct MigrateMsg {}
