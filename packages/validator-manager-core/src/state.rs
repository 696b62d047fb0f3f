use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::Addr;
use cw_storage_plus::{Item, Map};
use warp_codec::Id32;

/// Who may call `initiate_validator_registration` / `initiate_validator_weight_update`
/// / `initiate_validator_removal`. `Open` is used by the Staking Manager
/// (which layers its own caller checks on top); `OwnerOnly` realizes the PoA
/// specialization without any additional state.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
pub enum AuthorizedInitiator {
    Open,
    OwnerOnly(Addr),
}

impl AuthorizedInitiator {
    pub fn check(&self, caller: &Addr) -> bool {
        match self {
            AuthorizedInitiator::Open => true,
            AuthorizedInitiator::OwnerOnly(owner) => owner == caller,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct Settings {
    pub subnet_id: Id32,
    /// Blockchain id the P-Chain uses to sign conversion/registration/weight
    /// messages; inbound messages of those kinds must carry this source
    /// chain id.
    pub p_chain_blockchain_id: Id32,
    pub churn_period_seconds: u64,
    /// 0..=20
    pub maximum_churn_percentage: u8,
    pub initiator: AuthorizedInitiator,
}

pub const SETTINGS: Item<Settings> = Item::new("vm_settings");
pub const INITIALIZED: Item<bool> = Item::new("vm_initialized");
pub const L1_TOTAL_WEIGHT: Item<u64> = Item::new("vm_l1_total_weight");

/// `l1_total_weight` must never exceed this.
pub const MAX_L1_TOTAL_WEIGHT: u64 = u64::MAX / 4;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema, Debug)]
pub enum ValidatorStatus {
    Unknown,
    PendingAdded,
    Active,
    PendingRemoved,
    Completed,
    Invalidated,
}

impl ValidatorStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ValidatorStatus::Completed | ValidatorStatus::Invalidated)
    }
}

/// The data a validator's in-flight two-phase operation needs at completion
/// time, instead of re-deriving it from the ambient nonce alone.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
pub enum PendingOp {
    AwaitingRegistrationAck { expiry: u64 },
    AwaitingWeightAck { nonce: u64, target_weight: u64 },
    AwaitingRemovalAck { nonce: u64 },
}

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct Validator {
    pub status: ValidatorStatus,
    pub node_id: Vec<u8>,
    pub starting_weight: u64,
    pub weight: u64,
    pub sent_nonce: u64,
    pub received_nonce: u64,
    pub start_time: u64,
    pub end_time: u64,
    pub pending_op: Option<PendingOp>,
}

pub const VALIDATORS: Map<&[u8], Validator> = Map::new("vm_validators");

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct ChurnTracker {
    pub churn_period_seconds: u64,
    pub maximum_churn_percent: u8,
    pub window_start: u64,
    pub total_weight_at_start: u64,
    pub absolute_churn_in_window: u64,
}

impl ChurnTracker {
    pub fn new(now: u64, total_weight: u64, churn_period_seconds: u64, maximum_churn_percent: u8) -> Self {
        ChurnTracker {
            churn_period_seconds,
            maximum_churn_percent,
            window_start: now,
            total_weight_at_start: total_weight,
            absolute_churn_in_window: 0,
        }
    }

    fn reset_if_elapsed(&mut self, now: u64, total_weight: u64) {
        if now.saturating_sub(self.window_start) >= self.churn_period_seconds {
            self.window_start = now;
            self.total_weight_at_start = total_weight;
            self.absolute_churn_in_window = 0;
        }
    }

    /// Accounts for an absolute weight change of `delta`, resetting the
    /// window first if its period has elapsed. Returns `false` (without
    /// mutating the tracker) if the change would exceed the churn cap.
    pub fn try_account(&mut self, now: u64, total_weight: u64, delta: u64) -> bool {
        self.reset_if_elapsed(now, total_weight);
        let candidate = self.absolute_churn_in_window.saturating_add(delta);
        if (candidate as u128) * 100 > (self.maximum_churn_percent as u128) * (self.total_weight_at_start as u128) {
            return false;
        }
        self.absolute_churn_in_window = candidate;
        true
    }
}

pub const CHURN: Item<ChurnTracker> = Item::new("vm_churn");

pub fn id_key(id: &Id32) -> &[u8] {
    &id.as_bytes()[..]
}
