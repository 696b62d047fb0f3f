use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::{Addr, Uint128, Uint256};
use cw_storage_plus::{Item, Map};
use reward_calculator::{LinearUptimeRewardCalculator, RewardCalculator};
use warp_codec::Id32;

/// The one concrete reward calculator shipped with this contract, persisted
/// as data rather than as a trait object — "pluggable" means swappable at
/// the source level, not dynamically dispatched storage.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema, Debug)]
pub enum RewardCalculatorConfig {
    LinearUptime { reward_basis_points: u32 },
}

impl RewardCalculatorConfig {
    pub fn calculate_reward(
        &self,
        stake_amount: Uint256,
        validator_start_time: u64,
        staking_start_time: u64,
        staking_end_time: u64,
        uptime_seconds: u64,
    ) -> Uint256 {
        match self {
            RewardCalculatorConfig::LinearUptime { reward_basis_points } => {
                LinearUptimeRewardCalculator {
                    reward_basis_points: *reward_basis_points,
                }
                .calculate_reward(
                    stake_amount,
                    validator_start_time,
                    staking_start_time,
                    staking_end_time,
                    uptime_seconds,
                )
            }
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct Settings {
    pub minimum_stake_amount: Uint128,
    pub maximum_stake_amount: Uint128,
    /// Must be `>= validator_manager_core::Settings::churn_period_seconds`.
    pub minimum_stake_duration: u64,
    /// 0 < bips <= 10_000.
    pub minimum_delegation_fee_bips: u16,
    /// 0 < multiplier <= 10.
    pub maximum_stake_multiplier: u8,
    pub weight_to_value_factor: Uint128,
    pub reward_calculator: RewardCalculatorConfig,
    pub uptime_blockchain_id: Id32,
    pub asset_denom: String,
}

pub const SETTINGS: Item<Settings> = Item::new("sm_settings");
pub const REENTRANCY_LOCK: Item<bool> = Item::new("sm_reentrancy_lock");

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct PosValidatorInfo {
    pub owner: Addr,
    pub delegation_fee_bips: u16,
    pub min_stake_duration: u64,
    pub uptime_seconds: u64,
    pub reward_recipient: Addr,
    /// Value locked at `RegisterValidator` time, refunded in full when the
    /// validator's removal or registration-invalidation is finalized.
    pub locked_value: Uint128,
}

pub const POS_VALIDATORS: Map<&[u8], PosValidatorInfo> = Map::new("sm_pos_validators");
pub const REDEEMABLE_VALIDATOR_REWARDS: Map<&[u8], Uint128> =
    Map::new("sm_redeemable_validator_rewards");

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema, Debug)]
pub enum DelegatorStatus {
    PendingAdded,
    Active,
    PendingRemoved,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct Delegator {
    pub status: DelegatorStatus,
    pub validation_id: Id32,
    pub owner: Addr,
    pub value: Uint128,
    pub weight: u64,
    pub starting_nonce: u64,
    pub ending_nonce: u64,
    pub start_time: u64,
    pub reward_recipient: Addr,
    /// Computed (but not yet paid) reward, set by `initiate_delegator_removal`
    /// and paid out by `complete_delegator_removal`.
    pub pending_reward: Uint128,
    pub pending_validator_fee: Uint128,
}

pub const DELEGATORS: Map<&[u8], Delegator> = Map::new("sm_delegators");

pub fn id_key(id: &Id32) -> &[u8] {
    &id.as_bytes()[..]
}
