//! Staking Manager: locks stake, derives weight, and layers the delegator
//! sub-lifecycle and uptime-based rewards on top of `validator-manager-core`,
//! which this contract links directly and drives against its own storage,
//! giving it a non-owning handle to validator lifecycle state.

use std::convert::TryFrom;

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, QuerierWrapper, Storage, Uint128,
    Uint256,
};

use cw2::set_contract_version;
use cw_controllers::Admin;
use cw_utils::maybe_addr;
use sha2::{Digest, Sha256};

use asset_handler::{AssetHandler, NativeCoinHandler};
use validator_manager_core::{self as core, AuthorizedInitiator, Settings as VmSettings, Validator, ValidatorStatus};
use warp_bindings::{GetVerifiedWarpMessageResponse, WarpMessage, WarpQuery};
use warp_codec::{unpack_validation_uptime, Id32, PChainOwner};

use crate::error::ContractError;
use crate::events;
use crate::msg::{
    ChurnTrackerResponse, DelegatorResponse, ExecuteMsg, InstantiateMsg, L1TotalWeightResponse,
    MigrateMsg, PosValidatorInfoResponse, QueryMsg, RedeemableValidatorRewardsResponse,
    SettingsResponse, ValidatorResponse, VmSettingsResponse,
};
use crate::state::{
    id_key, Delegator, DelegatorStatus, PosValidatorInfo, RewardCalculatorConfig, Settings,
    DELEGATORS, POS_VALIDATORS, REDEEMABLE_VALIDATOR_REWARDS, REENTRANCY_LOCK, SETTINGS,
};

pub type Response = core::Response;

const CONTRACT_NAME: &str = "crates.io:staking-manager";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

const ADMIN: Admin = Admin::new("sm_admin");

fn now(env: &Env) -> u64 {
    env.block.time.seconds()
}

fn must_get_validator(deps: Deps<WarpQuery>, id: &Id32) -> Result<Validator, ContractError> {
    core::get_validator(deps, id)?
        .ok_or_else(|| validator_manager_core::ContractError::InvalidValidatorStatus(ValidatorStatus::Unknown).into())
}

fn load_pos_info(storage: &dyn Storage, id: &Id32) -> Result<PosValidatorInfo, ContractError> {
    POS_VALIDATORS
        .may_load(storage, id_key(id))?
        .ok_or(ContractError::ValidatorNotPoS {})
}

fn load_delegator(storage: &dyn Storage, id: &Id32) -> Result<Delegator, ContractError> {
    DELEGATORS
        .may_load(storage, id_key(id))?
        .ok_or(ContractError::InvalidDelegationID {})
}

/// `weight = floor(value / weight_to_value_factor)`, rejected if it would be
/// zero or would not fit in a `u64`.
fn value_to_weight(value: Uint128, factor: Uint128) -> Result<u64, ContractError> {
    let weight = (value / factor).u128();
    let weight: u64 = u64::try_from(weight).map_err(|_| ContractError::InvalidStakeAmount {
        got: value,
        min: factor,
        max: factor.checked_mul(Uint128::from(u64::MAX)).unwrap_or(Uint128::MAX),
    })?;
    if weight == 0 {
        return Err(ContractError::InvalidStakeAmount {
            got: value,
            min: factor,
            max: Uint128::MAX,
        });
    }
    Ok(weight)
}

/// `value = weight * weight_to_value_factor` (exact) — the reverse of
/// `value_to_weight`. When the originally locked amount didn't divide the
/// factor evenly, this is strictly less than it; the remainder stays locked
/// in the contract rather than being refunded.
fn weight_to_value(weight: u64, factor: Uint128) -> Uint128 {
    Uint128::from(weight) * factor
}

fn clamp_u256_to_u128(v: Uint256) -> Uint128 {
    Uint128::try_from(v).unwrap_or(Uint128::MAX)
}

/// `delegation_id = hash(validation_id || starting_nonce)` (GLOSSARY).
pub(crate) fn derive_delegation_id(validation_id: &Id32, nonce: u64) -> Id32 {
    let mut buf = Vec::with_capacity(40);
    buf.extend_from_slice(validation_id.as_bytes());
    buf.extend_from_slice(&nonce.to_be_bytes());
    Id32(Sha256::digest(&buf).into())
}

fn get_verified_message(
    querier: &QuerierWrapper<WarpQuery>,
    message_index: u32,
) -> Result<WarpMessage, ContractError> {
    let resp: GetVerifiedWarpMessageResponse = querier.query(&cosmwasm_std::QueryRequest::Custom(
        WarpQuery::GetVerifiedWarpMessage {
            index: message_index,
        },
    ))?;
    if !resp.valid {
        return Err(validator_manager_core::ContractError::InvalidWarpMessage {}.into());
    }
    Ok(resp.message)
}

/// Consumes an inbound `ValidationUptimeMessage`, authenticating it against
/// `settings.uptime_blockchain_id` (distinct from the P-Chain id Validator
/// Manager authenticates against) and returns the reported uptime seconds.
fn consume_uptime_proof(
    querier: &QuerierWrapper<WarpQuery>,
    settings: &Settings,
    validation_id: &Id32,
    message_index: u32,
) -> Result<u64, ContractError> {
    let msg = get_verified_message(querier, message_index)?;
    if msg.source_chain_id.as_slice() != settings.uptime_blockchain_id.as_bytes() {
        return Err(validator_manager_core::ContractError::InvalidWarpSourceChainID {}.into());
    }
    if !msg.is_node_signed() {
        return Err(validator_manager_core::ContractError::InvalidWarpOriginSenderAddress {}.into());
    }
    let ack = unpack_validation_uptime(msg.payload.as_slice())?;
    if &ack.validation_id != validation_id {
        return Err(validator_manager_core::ContractError::UnexpectedValidationID {
            got: format!("{:?}", ack.validation_id),
            expected: format!("{:?}", validation_id),
        }
        .into());
    }
    Ok(ack.uptime_seconds)
}

/// Single-entry reentrancy guard: held only across the external unlock/reward
/// calls and the reward-ledger mutations they accompany.
fn guarded<F>(storage: &mut dyn Storage, f: F) -> Result<Response, ContractError>
where
    F: FnOnce(&mut dyn Storage) -> Result<Response, ContractError>,
{
    if REENTRANCY_LOCK.may_load(storage)?.unwrap_or(false) {
        return Err(ContractError::Reentrancy {});
    }
    REENTRANCY_LOCK.save(storage, &true)?;
    let result = f(storage);
    REENTRANCY_LOCK.save(storage, &false)?;
    result
}

/// Pays out a delegator's locked stake and any already-computed reward,
/// credits the validator's fee share, and deletes the row. Used both by
/// `complete_delegator_removal` and by the `Completed`-validator
/// short-circuit in `complete_delegator_registration` and
/// `initiate_delegator_removal`.
fn finalize_delegator_removal(
    deps: DepsMut<WarpQuery>,
    delegation_id: &Id32,
    delegator: Delegator,
) -> Result<Response, ContractError> {
    let settings = SETTINGS.load(deps.storage)?;
    let handler = NativeCoinHandler::new(settings.asset_denom.clone());
    let refund = weight_to_value(delegator.weight, settings.weight_to_value_factor);
    guarded(deps.storage, |storage| {
        DELEGATORS.remove(storage, id_key(delegation_id));
        if !delegator.pending_validator_fee.is_zero() {
            let key = id_key(&delegator.validation_id);
            let existing = REDEEMABLE_VALIDATOR_REWARDS
                .may_load(storage, key)?
                .unwrap_or_default();
            REDEEMABLE_VALIDATOR_REWARDS.save(storage, key, &(existing + delegator.pending_validator_fee))?;
        }
        let mut response = Response::new().add_message(handler.unlock(&delegator.owner, refund));
        if !delegator.pending_reward.is_zero() {
            response = response.add_message(handler.reward(&delegator.reward_recipient, delegator.pending_reward));
        }
        Ok(response.add_event(events::completed_delegator_removal(
            delegation_id,
            &delegator.validation_id,
            delegator.pending_reward,
            delegator.pending_validator_fee,
        )))
    })
}

/// Refunds a validator's own locked stake (and, if it completed from
/// `Active`, its accrued reward) exactly once: the caller passes the
/// just-observed post-transition `Validator`, and this no-ops unless the
/// validator reached a terminal status with stake still outstanding.
fn finalize_validator_exit_if_terminal(
    mut deps: DepsMut<WarpQuery>,
    validation_id: &Id32,
    validator: &Validator,
    response: Response,
) -> Result<Response, ContractError> {
    if !validator.status.is_terminal() {
        return Ok(response);
    }
    let pos_info = match POS_VALIDATORS.may_load(deps.storage, id_key(validation_id))? {
        Some(info) if !info.locked_value.is_zero() => info,
        _ => return Ok(response),
    };
    let settings = SETTINGS.load(deps.storage)?;
    let handler = NativeCoinHandler::new(settings.asset_denom.clone());

    let reward = if validator.status == ValidatorStatus::Completed {
        clamp_u256_to_u128(settings.reward_calculator.calculate_reward(
            Uint256::from(pos_info.locked_value),
            validator.start_time,
            validator.start_time,
            validator.end_time,
            pos_info.uptime_seconds,
        ))
    } else {
        Uint128::zero()
    };

    let refund = weight_to_value(validator.starting_weight, settings.weight_to_value_factor);
    guarded(deps.branch().storage, |storage| {
        let mut updated = pos_info.clone();
        updated.locked_value = Uint128::zero();
        POS_VALIDATORS.save(storage, id_key(validation_id), &updated)?;

        let mut resp = response.add_message(handler.unlock(&pos_info.owner, refund));
        if !reward.is_zero() {
            resp = resp.add_message(handler.reward(&pos_info.reward_recipient, reward));
        }
        Ok(resp.add_event(events::finalized_validator_exit(validation_id, refund, reward)))
    })
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    mut deps: DepsMut<WarpQuery>,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    let api = deps.api;
    ADMIN.set(deps.branch(), maybe_addr(api, msg.admin)?)?;

    if msg.minimum_delegation_fee_bips == 0 || msg.minimum_delegation_fee_bips > 10_000 {
        return Err(ContractError::InvalidDelegationFee { min: 1 });
    }
    if msg.minimum_stake_duration < msg.churn_period_seconds {
        return Err(ContractError::InvalidMinStakeDuration {
            min: msg.churn_period_seconds,
        });
    }
    if msg.maximum_stake_multiplier == 0 || msg.maximum_stake_multiplier > 10 {
        return Err(ContractError::InvalidStakeMultiplier {});
    }
    if msg.weight_to_value_factor.is_zero() {
        return Err(ContractError::ZeroWeightToValueFactor {});
    }
    if msg.uptime_blockchain_id == Id32::ZERO {
        return Err(ContractError::InvalidUptimeBlockchainID {});
    }
    if msg.minimum_stake_amount.is_zero() || msg.minimum_stake_amount > msg.maximum_stake_amount {
        return Err(ContractError::InvalidStakeAmount {
            got: msg.minimum_stake_amount,
            min: msg.minimum_stake_amount,
            max: msg.maximum_stake_amount,
        });
    }

    let settings = Settings {
        minimum_stake_amount: msg.minimum_stake_amount,
        maximum_stake_amount: msg.maximum_stake_amount,
        minimum_stake_duration: msg.minimum_stake_duration,
        minimum_delegation_fee_bips: msg.minimum_delegation_fee_bips,
        maximum_stake_multiplier: msg.maximum_stake_multiplier,
        weight_to_value_factor: msg.weight_to_value_factor,
        reward_calculator: RewardCalculatorConfig::LinearUptime {
            reward_basis_points: msg.reward_basis_points,
        },
        uptime_blockchain_id: msg.uptime_blockchain_id,
        asset_denom: msg.asset_denom,
    };
    SETTINGS.save(deps.storage, &settings)?;
    REENTRANCY_LOCK.save(deps.storage, &false)?;

    let vm_settings = VmSettings {
        subnet_id: msg.subnet_id,
        p_chain_blockchain_id: msg.p_chain_blockchain_id,
        churn_period_seconds: msg.churn_period_seconds,
        maximum_churn_percentage: msg.maximum_churn_percentage,
        initiator: AuthorizedInitiator::Open,
    };
    core::initialize(deps.storage, vm_settings)?;

    Ok(Response::default())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut<WarpQuery>,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::InitializeValidatorSet {
            manager_address,
            conversion_data,
            message_index,
        } => Ok(core::initialize_validator_set(deps, &env, &manager_address, conversion_data, message_index)?),
        ExecuteMsg::RegisterValidator {
            node_id,
            bls_public_key,
            expiry,
            remaining_balance_owner,
            disable_owner,
            delegation_fee_bips,
            min_stake_duration,
            stake_amount,
        } => execute_register_validator(
            deps,
            &env,
            &info,
            node_id,
            bls_public_key,
            expiry,
            remaining_balance_owner,
            disable_owner,
            delegation_fee_bips,
            min_stake_duration,
            stake_amount,
        ),
        ExecuteMsg::CompleteValidatorRegistration { message_index } => {
            execute_complete_validator_registration(deps, &env, message_index)
        }
        ExecuteMsg::InitiateValidatorRemoval { validation_id } => {
            execute_initiate_validator_removal(deps, &env, &info.sender, &validation_id)
        }
        ExecuteMsg::CompleteValidatorWeightUpdate { message_index } => {
            execute_complete_validator_weight_update(deps, &env, message_index)
        }
        ExecuteMsg::CompleteValidatorRemoval { message_index } => {
            execute_complete_validator_removal(deps, &env, message_index)
        }
        ExecuteMsg::InitiateDelegatorRegistration { validation_id, value } => {
            execute_initiate_delegator_registration(deps, &env, &info, validation_id, value)
        }
        ExecuteMsg::CompleteDelegatorRegistration {
            delegation_id,
            message_index,
        } => execute_complete_delegator_registration(deps, &env, delegation_id, message_index),
        ExecuteMsg::InitiateDelegatorRemoval {
            delegation_id,
            include_uptime,
            message_index,
            reward_recipient,
        } => execute_initiate_delegator_removal(
            deps,
            &env,
            &info,
            delegation_id,
            include_uptime,
            message_index,
            reward_recipient,
            false,
        ),
        ExecuteMsg::ForceInitiateDelegatorRemoval {
            delegation_id,
            include_uptime,
            message_index,
            reward_recipient,
        } => execute_initiate_delegator_removal(
            deps,
            &env,
            &info,
            delegation_id,
            include_uptime,
            message_index,
            reward_recipient,
            true,
        ),
        ExecuteMsg::CompleteDelegatorRemoval {
            delegation_id,
            message_index,
        } => execute_complete_delegator_removal(deps, &env, delegation_id, message_index),
        ExecuteMsg::SubmitUptimeProof {
            validation_id,
            message_index,
        } => execute_submit_uptime_proof(deps, &validation_id, message_index),
        ExecuteMsg::ResendUpdateDelegator { validation_id } => {
            let (_, response) = core::resend_weight_update(deps, &validation_id)?;
            Ok(response)
        }
        ExecuteMsg::ChangeValidatorRewardRecipient {
            validation_id,
            new_recipient,
        } => execute_change_validator_reward_recipient(deps, &info.sender, validation_id, new_recipient),
        ExecuteMsg::ChangeDelegatorRewardRecipient {
            delegation_id,
            new_recipient,
        } => execute_change_delegator_reward_recipient(deps, &info.sender, delegation_id, new_recipient),
        ExecuteMsg::ClaimDelegationFees { validation_id } => {
            execute_claim_delegation_fees(deps, &info.sender, validation_id)
        }
        ExecuteMsg::MigrateFromV1 {
            validation_id,
            node_id,
            weight,
        } => {
            ADMIN.assert_admin(deps.as_ref(), &info.sender)?;
            core::migrate_from_v1(deps, &env, &validation_id, node_id.to_vec(), weight)?;
            Ok(Response::new().add_attribute("action", "migrate_from_v1"))
        }
        ExecuteMsg::UpdateAdmin { admin } => {
            let new_admin = maybe_addr(deps.api, admin)?;
            Ok(ADMIN.execute_update_admin(deps, info, new_admin)?)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn execute_register_validator(
    mut deps: DepsMut<WarpQuery>,
    env: &Env,
    info: &MessageInfo,
    node_id: Binary,
    bls_public_key: Binary,
    expiry: u64,
    remaining_balance_owner: PChainOwner,
    disable_owner: PChainOwner,
    delegation_fee_bips: u16,
    min_stake_duration: u64,
    stake_amount: Uint128,
) -> Result<Response, ContractError> {
    let settings = SETTINGS.load(deps.storage)?;
    if delegation_fee_bips < settings.minimum_delegation_fee_bips || delegation_fee_bips > 10_000 {
        return Err(ContractError::InvalidDelegationFee {
            min: settings.minimum_delegation_fee_bips,
        });
    }
    if min_stake_duration < settings.minimum_stake_duration {
        return Err(ContractError::InvalidMinStakeDuration {
            min: settings.minimum_stake_duration,
        });
    }
    if stake_amount < settings.minimum_stake_amount || stake_amount > settings.maximum_stake_amount {
        return Err(ContractError::InvalidStakeAmount {
            got: stake_amount,
            min: settings.minimum_stake_amount,
            max: settings.maximum_stake_amount,
        });
    }

    let handler = NativeCoinHandler::new(settings.asset_denom.clone());
    let locked_value = handler.lock(&info.funds, stake_amount)?;
    let weight = value_to_weight(locked_value, settings.weight_to_value_factor)?;

    let outcome = core::initiate_validator_registration(
        deps.branch(),
        env,
        &info.sender,
        node_id.to_vec(),
        bls_public_key.to_vec(),
        expiry,
        remaining_balance_owner,
        disable_owner,
        weight,
    )?;

    POS_VALIDATORS.save(
        deps.storage,
        id_key(&outcome.validation_id),
        &PosValidatorInfo {
            owner: info.sender.clone(),
            delegation_fee_bips,
            min_stake_duration,
            uptime_seconds: 0,
            reward_recipient: info.sender.clone(),
            locked_value,
        },
    )?;

    let response = outcome
        .response
        .add_event(events::registered_validator(&outcome.validation_id, info.sender.as_str(), stake_amount));
    Ok(response)
}

fn execute_complete_validator_registration(
    mut deps: DepsMut<WarpQuery>,
    env: &Env,
    message_index: u32,
) -> Result<Response, ContractError> {
    let (validation_id, response) = core::complete_validator_registration(deps.branch(), env, message_index)?;
    let validator = must_get_validator(deps.as_ref(), &validation_id)?;
    finalize_validator_exit_if_terminal(deps, &validation_id, &validator, response)
}

fn execute_complete_validator_weight_update(
    mut deps: DepsMut<WarpQuery>,
    env: &Env,
    message_index: u32,
) -> Result<Response, ContractError> {
    let (validation_id, _nonce, response) = core::complete_validator_weight_update(deps.branch(), env, message_index)?;
    let validator = must_get_validator(deps.as_ref(), &validation_id)?;
    finalize_validator_exit_if_terminal(deps, &validation_id, &validator, response)
}

fn execute_complete_validator_removal(
    mut deps: DepsMut<WarpQuery>,
    env: &Env,
    message_index: u32,
) -> Result<Response, ContractError> {
    let (validation_id, response) = core::complete_validator_removal(deps.branch(), env, message_index)?;
    let validator = must_get_validator(deps.as_ref(), &validation_id)?;
    finalize_validator_exit_if_terminal(deps, &validation_id, &validator, response)
}

fn execute_initiate_validator_removal(
    deps: DepsMut<WarpQuery>,
    env: &Env,
    caller: &Addr,
    validation_id: &Id32,
) -> Result<Response, ContractError> {
    let pos_info = load_pos_info(deps.storage, validation_id)?;
    if &pos_info.owner != caller {
        return Err(ContractError::UnauthorizedOwner(
            "caller is not the validator owner".into(),
        ));
    }
    let outcome = core::initiate_validator_removal(deps, env, caller, validation_id)?;
    Ok(outcome.response)
}

fn execute_initiate_delegator_registration(
    mut deps: DepsMut<WarpQuery>,
    env: &Env,
    info: &MessageInfo,
    validation_id: Id32,
    value: Uint128,
) -> Result<Response, ContractError> {
    let validator = must_get_validator(deps.as_ref(), &validation_id)?;
    if validator.status != ValidatorStatus::Active {
        return Err(validator_manager_core::ContractError::InvalidValidatorStatus(validator.status).into());
    }
    // Requires the validator to be PoS; presence of the row is the check.
    load_pos_info(deps.storage, &validation_id)?;
    let settings = SETTINGS.load(deps.storage)?;

    let handler = NativeCoinHandler::new(settings.asset_denom.clone());
    let locked_value = handler.lock(&info.funds, value)?;
    let delegator_weight = value_to_weight(locked_value, settings.weight_to_value_factor)?;

    let new_validator_weight = validator
        .weight
        .checked_add(delegator_weight)
        .ok_or(ContractError::MaxWeightExceeded(u64::MAX))?;
    let max_weight = validator
        .starting_weight
        .saturating_mul(settings.maximum_stake_multiplier as u64);
    if new_validator_weight > max_weight {
        return Err(ContractError::MaxWeightExceeded(new_validator_weight));
    }

    let outcome =
        core::initiate_validator_weight_update(deps.branch(), env, &info.sender, &validation_id, new_validator_weight)?;
    let delegation_id = derive_delegation_id(&validation_id, outcome.nonce);

    DELEGATORS.save(
        deps.storage,
        id_key(&delegation_id),
        &Delegator {
            status: DelegatorStatus::PendingAdded,
            validation_id,
            owner: info.sender.clone(),
            value: locked_value,
            weight: delegator_weight,
            starting_nonce: outcome.nonce,
            ending_nonce: 0,
            start_time: 0,
            reward_recipient: info.sender.clone(),
            pending_reward: Uint128::zero(),
            pending_validator_fee: Uint128::zero(),
        },
    )?;

    let response = outcome.response.add_event(events::initiated_delegator_registration(
        &delegation_id,
        &validation_id,
        info.sender.as_str(),
        outcome.nonce,
        delegator_weight,
    ));
    Ok(response)
}

fn execute_complete_delegator_registration(
    mut deps: DepsMut<WarpQuery>,
    env: &Env,
    delegation_id: Id32,
    message_index: Option<u32>,
) -> Result<Response, ContractError> {
    let mut delegator = load_delegator(deps.storage, &delegation_id)?;
    if delegator.status != DelegatorStatus::PendingAdded {
        return Err(ContractError::InvalidDelegatorStatus(delegator.status));
    }
    let validator = must_get_validator(deps.as_ref(), &delegator.validation_id)?;

    if validator.status == ValidatorStatus::Completed {
        return finalize_delegator_removal(deps, &delegation_id, delegator);
    }

    let mut response = Response::new();
    if validator.received_nonce < delegator.starting_nonce {
        let idx = message_index.ok_or(ContractError::Core(validator_manager_core::ContractError::InvalidNonce(
            delegator.starting_nonce,
        )))?;
        let (acked_id, acked_nonce, ack_response) = core::complete_validator_weight_update(deps.branch(), env, idx)?;
        if acked_id != delegator.validation_id {
            return Err(validator_manager_core::ContractError::UnexpectedValidationID {
                got: format!("{:?}", acked_id),
                expected: format!("{:?}", delegator.validation_id),
            }
            .into());
        }
        if acked_nonce < delegator.starting_nonce {
            return Err(validator_manager_core::ContractError::InvalidNonce(acked_nonce).into());
        }
        response = ack_response;
    }

    delegator.status = DelegatorStatus::Active;
    delegator.start_time = now(env);
    DELEGATORS.save(deps.storage, id_key(&delegation_id), &delegator)?;

    Ok(response.add_event(events::completed_delegator_registration(
        &delegation_id,
        &delegator.validation_id,
        delegator.start_time,
    )))
}

#[allow(clippy::too_many_arguments)]
fn execute_initiate_delegator_removal(
    mut deps: DepsMut<WarpQuery>,
    env: &Env,
    info: &MessageInfo,
    delegation_id: Id32,
    include_uptime: bool,
    message_index: Option<u32>,
    reward_recipient: Option<String>,
    force: bool,
) -> Result<Response, ContractError> {
    let mut delegator = load_delegator(deps.storage, &delegation_id)?;
    if delegator.status != DelegatorStatus::Active {
        return Err(ContractError::InvalidDelegatorStatus(delegator.status));
    }
    let validator = must_get_validator(deps.as_ref(), &delegator.validation_id)?;
    let mut pos_info = load_pos_info(deps.storage, &delegator.validation_id)?;

    let now_secs = now(env);
    let is_delegator = info.sender == delegator.owner;
    let is_eligible_validator_owner = info.sender == pos_info.owner
        && now_secs >= validator.start_time.saturating_add(pos_info.min_stake_duration);
    if !is_delegator && !is_eligible_validator_owner {
        return Err(ContractError::UnauthorizedOwner(
            "caller is neither the delegator nor an eligible validator owner".into(),
        ));
    }

    if let Some(recipient) = &reward_recipient {
        if recipient.trim().is_empty() {
            return Err(ContractError::InvalidRewardRecipient {});
        }
        delegator.reward_recipient = deps.api.addr_validate(recipient)?;
    }

    let settings = SETTINGS.load(deps.storage)?;
    let validator_active = validator.status == ValidatorStatus::Active;

    if validator_active {
        let unlock_at = delegator.start_time.saturating_add(settings.minimum_stake_duration);
        if now_secs < unlock_at {
            return Err(ContractError::MinStakeDurationNotPassed(unlock_at));
        }
    }

    let mut response =
        Response::new().add_event(events::initiated_delegator_removal(&delegation_id, &delegator.validation_id));

    // Consume the uptime proof (if any) before computing the reward below, so
    // a proof submitted alongside this removal counts towards its own payout
    // rather than only the next one.
    if validator_active && include_uptime {
        let idx = message_index.ok_or(ContractError::Core(validator_manager_core::ContractError::InvalidWarpMessage {}))?;
        let reported = consume_uptime_proof(&deps.querier, &settings, &delegator.validation_id, idx)?;
        pos_info.uptime_seconds = pos_info.uptime_seconds.max(reported);
        POS_VALIDATORS.save(deps.storage, id_key(&delegator.validation_id), &pos_info)?;
        response = response.add_event(events::submitted_uptime_proof(&delegator.validation_id, pos_info.uptime_seconds));
    }

    let delegation_end_time = if validator_active { now_secs } else { validator.end_time };
    let reward = clamp_u256_to_u128(settings.reward_calculator.calculate_reward(
        Uint256::from(delegator.value),
        validator.start_time,
        delegator.start_time,
        delegation_end_time,
        pos_info.uptime_seconds,
    ));
    if reward.is_zero() && !force {
        return Err(ContractError::DelegatorIneligibleForRewards {});
    }

    let validator_fee = reward.multiply_ratio(pos_info.delegation_fee_bips as u128, 10_000u128);
    let delegator_reward = reward - validator_fee;

    delegator.pending_reward = delegator_reward;
    delegator.pending_validator_fee = validator_fee;

    if validator_active {
        let outcome = core::initiate_validator_weight_update(
            deps.branch(),
            env,
            &info.sender,
            &delegator.validation_id,
            validator.weight.saturating_sub(delegator.weight),
        )?;
        delegator.ending_nonce = outcome.nonce;
        delegator.status = DelegatorStatus::PendingRemoved;
        DELEGATORS.save(deps.storage, id_key(&delegation_id), &delegator)?;

        response.messages.extend(outcome.response.messages);
        response.attributes.extend(outcome.response.attributes);
        response.events.extend(outcome.response.events);
        Ok(response)
    } else {
        delegator.status = DelegatorStatus::PendingRemoved;
        let finalize_response = finalize_delegator_removal(deps, &delegation_id, delegator)?;
        response.messages.extend(finalize_response.messages);
        response.attributes.extend(finalize_response.attributes);
        response.events.extend(finalize_response.events);
        Ok(response)
    }
}

fn execute_complete_delegator_removal(
    mut deps: DepsMut<WarpQuery>,
    env: &Env,
    delegation_id: Id32,
    message_index: Option<u32>,
) -> Result<Response, ContractError> {
    let delegator = load_delegator(deps.storage, &delegation_id)?;
    if delegator.status != DelegatorStatus::PendingRemoved {
        return Err(ContractError::InvalidDelegatorStatus(delegator.status));
    }
    let validator = must_get_validator(deps.as_ref(), &delegator.validation_id)?;
    let mut response = Response::new();

    if validator.status != ValidatorStatus::Completed && validator.received_nonce < delegator.ending_nonce {
        let idx = message_index.ok_or(ContractError::Core(validator_manager_core::ContractError::InvalidNonce(
            delegator.ending_nonce,
        )))?;
        let (acked_id, acked_nonce, ack_response) = core::complete_validator_weight_update(deps.branch(), env, idx)?;
        if acked_id != delegator.validation_id {
            return Err(validator_manager_core::ContractError::UnexpectedValidationID {
                got: format!("{:?}", acked_id),
                expected: format!("{:?}", delegator.validation_id),
            }
            .into());
        }
        if acked_nonce < delegator.ending_nonce {
            return Err(validator_manager_core::ContractError::InvalidNonce(acked_nonce).into());
        }
        response = ack_response;
    }

    let vm_settings = core::get_settings(deps.as_ref())?;
    let unlock_at = delegator.start_time.saturating_add(vm_settings.churn_period_seconds);
    if now(env) < unlock_at {
        return Err(ContractError::MinStakeDurationNotPassed(unlock_at));
    }

    let finalize_response = finalize_delegator_removal(deps, &delegation_id, delegator)?;
    response.messages.extend(finalize_response.messages);
    response.attributes.extend(finalize_response.attributes);
    response.events.extend(finalize_response.events);
    Ok(response)
}

fn execute_submit_uptime_proof(
    deps: DepsMut<WarpQuery>,
    validation_id: &Id32,
    message_index: u32,
) -> Result<Response, ContractError> {
    let validator = must_get_validator(deps.as_ref(), validation_id)?;
    if validator.status != ValidatorStatus::Active {
        return Err(validator_manager_core::ContractError::InvalidValidatorStatus(validator.status).into());
    }
    let mut pos_info = load_pos_info(deps.storage, validation_id)?;
    let settings = SETTINGS.load(deps.storage)?;
    let reported = consume_uptime_proof(&deps.querier, &settings, validation_id, message_index)?;
    pos_info.uptime_seconds = pos_info.uptime_seconds.max(reported);
    POS_VALIDATORS.save(deps.storage, id_key(validation_id), &pos_info)?;
    Ok(Response::new().add_event(events::submitted_uptime_proof(validation_id, pos_info.uptime_seconds)))
}

fn execute_change_validator_reward_recipient(
    deps: DepsMut<WarpQuery>,
    caller: &Addr,
    validation_id: Id32,
    new_recipient: String,
) -> Result<Response, ContractError> {
    let mut pos_info = load_pos_info(deps.storage, &validation_id)?;
    if &pos_info.owner != caller {
        return Err(ContractError::UnauthorizedOwner("caller is not the validator owner".into()));
    }
    if new_recipient.trim().is_empty() {
        return Err(ContractError::InvalidRewardRecipient {});
    }
    let recipient = deps.api.addr_validate(&new_recipient)?;
    pos_info.reward_recipient = recipient.clone();
    POS_VALIDATORS.save(deps.storage, id_key(&validation_id), &pos_info)?;
    Ok(Response::new().add_event(events::changed_reward_recipient("validator", &validation_id, recipient.as_str())))
}

fn execute_change_delegator_reward_recipient(
    deps: DepsMut<WarpQuery>,
    caller: &Addr,
    delegation_id: Id32,
    new_recipient: String,
) -> Result<Response, ContractError> {
    let mut delegator = load_delegator(deps.storage, &delegation_id)?;
    if &delegator.owner != caller {
        return Err(ContractError::UnauthorizedOwner("caller is not the delegator owner".into()));
    }
    if new_recipient.trim().is_empty() {
        return Err(ContractError::InvalidRewardRecipient {});
    }
    let recipient = deps.api.addr_validate(&new_recipient)?;
    delegator.reward_recipient = recipient.clone();
    DELEGATORS.save(deps.storage, id_key(&delegation_id), &delegator)?;
    Ok(Response::new().add_event(events::changed_reward_recipient("delegator", &delegation_id, recipient.as_str())))
}

fn execute_claim_delegation_fees(
    deps: DepsMut<WarpQuery>,
    caller: &Addr,
    validation_id: Id32,
) -> Result<Response, ContractError> {
    let validator = must_get_validator(deps.as_ref(), &validation_id)?;
    if validator.status != ValidatorStatus::Completed {
        return Err(validator_manager_core::ContractError::InvalidValidatorStatus(validator.status).into());
    }
    let pos_info = load_pos_info(deps.storage, &validation_id)?;
    if &pos_info.owner != caller {
        return Err(ContractError::UnauthorizedOwner("caller is not the validator owner".into()));
    }
    let key = id_key(&validation_id);
    let amount = REDEEMABLE_VALIDATOR_REWARDS.may_load(deps.storage, key)?.unwrap_or_default();
    if amount.is_zero() {
        return Err(ContractError::ValidatorIneligibleForRewards {});
    }
    let settings = SETTINGS.load(deps.storage)?;
    let handler = NativeCoinHandler::new(settings.asset_denom.clone());
    guarded(deps.storage, |storage| {
        REDEEMABLE_VALIDATOR_REWARDS.save(storage, key, &Uint128::zero())?;
        Ok(Response::new()
            .add_message(handler.reward(&pos_info.owner, amount))
            .add_event(events::claimed_delegation_fees(&validation_id, amount)))
    })
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps<WarpQuery>, _env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    let res = match msg {
        QueryMsg::Validator { validation_id } => to_binary(&ValidatorResponse {
            validator: core::get_validator(deps, &validation_id)?,
        }),
        QueryMsg::PosValidatorInfo { validation_id } => to_binary(&PosValidatorInfoResponse {
            info: POS_VALIDATORS.may_load(deps.storage, id_key(&validation_id))?,
        }),
        QueryMsg::Delegator { delegation_id } => to_binary(&DelegatorResponse {
            delegator: DELEGATORS.may_load(deps.storage, id_key(&delegation_id))?,
        }),
        QueryMsg::VmSettings {} => {
            let settings: VmSettingsResponse = core::get_settings(deps)?;
            to_binary(&settings)
        }
        QueryMsg::Settings {} => {
            let settings: SettingsResponse = SETTINGS.load(deps.storage)?;
            to_binary(&settings)
        }
        QueryMsg::L1TotalWeight {} => to_binary(&L1TotalWeightResponse {
            weight: core::get_l1_total_weight(deps)?,
        }),
        QueryMsg::ChurnTracker {} => {
            let tracker: ChurnTrackerResponse = core::get_churn_tracker(deps)?;
            to_binary(&tracker)
        }
        QueryMsg::RedeemableValidatorRewards { validation_id } => to_binary(&RedeemableValidatorRewardsResponse {
            amount: REDEEMABLE_VALIDATOR_REWARDS
                .may_load(deps.storage, id_key(&validation_id))?
                .unwrap_or_default(),
        }),
        QueryMsg::Admin {} => to_binary(&ADMIN.query_admin(deps)?),
    }?;
    Ok(res)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut<WarpQuery>, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    vm_utils::ensure_from_older_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::default())
}
