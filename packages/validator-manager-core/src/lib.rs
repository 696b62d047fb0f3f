//! Validator Manager core: validator lifecycle, weight ledger, churn
//! tracker and nonce discipline. A storage-agnostic library, not a
//! CosmWasm contract in its own right — both `validator-manager` (used
//! directly, optionally PoA-gated) and `staking-manager` (layering stake and
//! delegation on top) link this crate and drive it against their own
//! contract storage, giving the staking manager a non-owning handle to
//! validator lifecycle state without a cross-contract call.

pub mod error;
pub mod events;
pub mod state;

pub use error::ContractError;
pub use state::{AuthorizedInitiator, ChurnTracker, PendingOp, Settings, Validator, ValidatorStatus};

use cosmwasm_std::{Addr, Deps, DepsMut, Env, QuerierWrapper, QueryRequest, Response as CwResponse, SubMsg};
use sha2::{Digest, Sha256};

use warp_bindings::{GetVerifiedWarpMessageResponse, WarpMessage, WarpMsg, WarpQuery};
use warp_codec::{
    conversion_id, initial_validator_id, pack_l1_validator_weight, pack_register_l1_validator,
    register_l1_validator_id, unpack_l1_validator_registration, unpack_l1_validator_weight,
    unpack_subnet_to_l1_conversion, ConversionData, Id32, L1ValidatorWeightMessage, PChainOwner,
};

use state::{
    id_key, ValidatorStatus as Status, CHURN, INITIALIZED, L1_TOTAL_WEIGHT, MAX_L1_TOTAL_WEIGHT,
    SETTINGS, VALIDATORS,
};

pub type Response = CwResponse<WarpMsg>;

const EXPIRY_MAX_HORIZON_SECONDS: u64 = 48 * 3600;

fn now(env: &Env) -> u64 {
    env.block.time.seconds()
}

/// Builds and returns the Warp `SendWarpMessage` submessage alongside the
/// deterministic message id (`sha256(payload)`) the caller can record
/// immediately, without waiting on a reply.
fn send_warp_message(payload: Vec<u8>) -> (SubMsg<WarpMsg>, Id32) {
    let id = Id32(Sha256::digest(&payload).into());
    (
        SubMsg::new(WarpMsg::SendWarpMessage {
            payload: payload.into(),
        }),
        id,
    )
}

fn get_verified_message(
    querier: &QuerierWrapper<WarpQuery>,
    message_index: u32,
) -> Result<WarpMessage, ContractError> {
    let resp: GetVerifiedWarpMessageResponse = querier.query(&QueryRequest::Custom(
        WarpQuery::GetVerifiedWarpMessage {
            index: message_index,
        },
    ))?;
    if !resp.valid {
        return Err(ContractError::InvalidWarpMessage {});
    }
    Ok(resp.message)
}

fn authenticate(msg: &WarpMessage, expected_source_chain_id: &Id32) -> Result<(), ContractError> {
    if msg.source_chain_id.as_slice() != expected_source_chain_id.as_bytes() {
        return Err(ContractError::InvalidWarpSourceChainID {});
    }
    if !msg.is_node_signed() {
        return Err(ContractError::InvalidWarpOriginSenderAddress {});
    }
    Ok(())
}

fn load_validator(storage: &dyn cosmwasm_std::Storage, id: &Id32) -> Result<Validator, ContractError> {
    VALIDATORS
        .load(storage, id_key(id))
        .map_err(|_| ContractError::InvalidValidatorStatus(Status::Unknown))
}

fn require_status(v: &Validator, expected: Status) -> Result<(), ContractError> {
    if v.status != expected {
        return Err(ContractError::InvalidValidatorStatus(v.status));
    }
    Ok(())
}

fn total_weight(storage: &dyn cosmwasm_std::Storage) -> Result<u64, ContractError> {
    Ok(L1_TOTAL_WEIGHT.load(storage)?)
}

fn apply_weight_delta(
    storage: &mut dyn cosmwasm_std::Storage,
    now_secs: u64,
    increase: bool,
    magnitude: u64,
) -> Result<u64, ContractError> {
    let mut churn = CHURN.load(storage)?;
    let current_total = total_weight(storage)?;
    if !churn.try_account(now_secs, current_total, magnitude) {
        return Err(ContractError::MaxChurnRateExceeded {});
    }
    let new_total = if increase {
        current_total
            .checked_add(magnitude)
            .ok_or(ContractError::InvalidTotalWeight(u64::MAX))?
    } else {
        current_total.saturating_sub(magnitude)
    };
    if new_total > MAX_L1_TOTAL_WEIGHT {
        return Err(ContractError::InvalidTotalWeight(new_total));
    }
    CHURN.save(storage, &churn)?;
    L1_TOTAL_WEIGHT.save(storage, &new_total)?;
    Ok(new_total)
}

// ---------------------------------------------------------------------
// initialize
// ---------------------------------------------------------------------

pub fn initialize(
    storage: &mut dyn cosmwasm_std::Storage,
    settings: Settings,
) -> Result<(), ContractError> {
    if INITIALIZED.may_load(storage)?.unwrap_or(false) {
        return Err(ContractError::AlreadyInitialized {});
    }
    if settings.maximum_churn_percentage > 20 {
        return Err(ContractError::InvalidChurnPercentage {});
    }
    SETTINGS.save(storage, &settings)?;
    INITIALIZED.save(storage, &true)?;
    L1_TOTAL_WEIGHT.save(storage, &0u64)?;
    Ok(())
}

pub fn is_initialized(storage: &dyn cosmwasm_std::Storage) -> Result<bool, ContractError> {
    Ok(INITIALIZED.may_load(storage)?.unwrap_or(false))
}

const VALIDATOR_SET_INITIALIZED: cw_storage_plus::Item<bool> =
    cw_storage_plus::Item::new("vm_validator_set_initialized");

// ---------------------------------------------------------------------
// initialize_validator_set
// ---------------------------------------------------------------------

pub fn initialize_validator_set(
    deps: DepsMut<WarpQuery>,
    env: &Env,
    manager_address: &[u8; 20],
    conversion_data: ConversionData,
    message_index: u32,
) -> Result<Response, ContractError> {
    if VALIDATOR_SET_INITIALIZED
        .may_load(deps.storage)?
        .unwrap_or(false)
    {
        return Err(ContractError::AlreadyInitialized {});
    }
    let settings = SETTINGS.load(deps.storage)?;

    let warp_msg = get_verified_message(&deps.querier, message_index)?;
    authenticate(&warp_msg, &settings.p_chain_blockchain_id)?;
    let conv_msg = unpack_subnet_to_l1_conversion(warp_msg.payload.as_slice())?;

    if conversion_data.subnet_id != settings.subnet_id || &conversion_data.manager_address != manager_address {
        return Err(ContractError::InvalidWarpMessage {});
    }
    let expected_id = conversion_id(&conversion_data)?;
    if expected_id != conv_msg.conversion_id {
        return Err(ContractError::InvalidWarpMessage {});
    }

    let now_secs = now(env);
    let mut response = Response::new();
    let mut total: u64 = 0;

    for (i, validator) in conversion_data.initial_validators.iter().enumerate() {
        let validation_id = initial_validator_id(&conversion_data.subnet_id, i as u32);
        let record = Validator {
            status: Status::Active,
            node_id: validator.node_id.clone(),
            starting_weight: validator.weight,
            weight: validator.weight,
            sent_nonce: 0,
            received_nonce: 0,
            start_time: now_secs,
            end_time: 0,
            pending_op: None,
        };
        VALIDATORS.save(deps.storage, id_key(&validation_id), &record)?;
        total = total
            .checked_add(validator.weight)
            .ok_or(ContractError::InvalidTotalWeight(u64::MAX))?;
        response = response.add_event(events::registered_initial_validator(
            &validation_id,
            &validator.node_id,
            validator.weight,
        ));
    }

    if total > MAX_L1_TOTAL_WEIGHT {
        return Err(ContractError::InvalidTotalWeight(total));
    }

    L1_TOTAL_WEIGHT.save(deps.storage, &total)?;
    CHURN.save(
        deps.storage,
        &ChurnTracker::new(
            now_secs,
            total,
            settings.churn_period_seconds,
            settings.maximum_churn_percentage,
        ),
    )?;
    VALIDATOR_SET_INITIALIZED.save(deps.storage, &true)?;

    Ok(response)
}

// ---------------------------------------------------------------------
// initiate_validator_registration
// ---------------------------------------------------------------------

pub struct RegistrationOutcome {
    pub validation_id: Id32,
    pub response: Response,
}

#[allow(clippy::too_many_arguments)]
pub fn initiate_validator_registration(
    deps: DepsMut<WarpQuery>,
    env: &Env,
    caller: &Addr,
    node_id: Vec<u8>,
    bls_public_key: Vec<u8>,
    expiry: u64,
    remaining_balance_owner: PChainOwner,
    disable_owner: PChainOwner,
    weight: u64,
) -> Result<RegistrationOutcome, ContractError> {
    let settings = SETTINGS.load(deps.storage)?;
    if !settings.initiator.check(caller) {
        return Err(ContractError::Unauthorized(
            "caller may not initiate validator registration".into(),
        ));
    }
    if weight == 0 {
        return Err(ContractError::InvalidStakeAmount {});
    }
    if !remaining_balance_owner.is_valid() || !disable_owner.is_valid() {
        return Err(ContractError::InvalidPChainOwner {});
    }
    let now_secs = now(env);
    if expiry <= now_secs || expiry > now_secs + EXPIRY_MAX_HORIZON_SECONDS {
        return Err(ContractError::InvalidStakeAmount {});
    }

    let msg = warp_codec::RegisterL1ValidatorMessage {
        subnet_id: settings.subnet_id,
        node_id: node_id.clone(),
        bls_public_key,
        expiry,
        remaining_balance_owner,
        disable_owner,
        weight,
    };
    let packed = pack_register_l1_validator(&msg)?;
    let validation_id = register_l1_validator_id(&packed);

    if VALIDATORS.has(deps.storage, id_key(&validation_id)) {
        return Err(ContractError::RegistrationAlreadyExists {});
    }

    apply_weight_delta(deps.storage, now_secs, true, weight)?;

    let record = Validator {
        status: Status::PendingAdded,
        node_id: node_id.clone(),
        starting_weight: weight,
        weight,
        sent_nonce: 0,
        received_nonce: 0,
        start_time: 0,
        end_time: 0,
        pending_op: Some(PendingOp::AwaitingRegistrationAck { expiry }),
    };
    VALIDATORS.save(deps.storage, id_key(&validation_id), &record)?;

    let (sub_msg, registration_message_id) = send_warp_message(packed);
    let response = Response::new()
        .add_submessage(sub_msg)
        .add_event(events::initiated_validator_registration(
            &validation_id,
            &node_id,
            &registration_message_id,
            expiry,
            weight,
        ));

    Ok(RegistrationOutcome {
        validation_id,
        response,
    })
}

// ---------------------------------------------------------------------
// complete_validator_registration
// ---------------------------------------------------------------------

pub fn complete_validator_registration(
    deps: DepsMut<WarpQuery>,
    env: &Env,
    message_index: u32,
) -> Result<(Id32, Response), ContractError> {
    let settings = SETTINGS.load(deps.storage)?;
    let warp_msg = get_verified_message(&deps.querier, message_index)?;
    authenticate(&warp_msg, &settings.p_chain_blockchain_id)?;
    let ack = unpack_l1_validator_registration(warp_msg.payload.as_slice())?;

    let mut validator = load_validator(deps.storage, &ack.validation_id)?;
    require_status(&validator, Status::PendingAdded)?;

    let weight = validator.starting_weight;
    if ack.valid {
        validator.status = Status::Active;
        validator.start_time = now(env);
        validator.pending_op = None;
    } else {
        validator.status = Status::Invalidated;
        validator.end_time = now(env);
        validator.pending_op = None;
        apply_weight_delta(deps.storage, now(env), false, weight)?;
    }
    VALIDATORS.save(deps.storage, id_key(&ack.validation_id), &validator)?;

    let response = Response::new().add_event(events::completed_validator_registration(
        &ack.validation_id,
        weight,
        ack.valid,
    ));
    Ok((ack.validation_id, response))
}

// ---------------------------------------------------------------------
// initiate_validator_weight_update / initiate_validator_removal
// ---------------------------------------------------------------------

pub struct WeightUpdateOutcome {
    pub nonce: u64,
    pub message_id: Id32,
    pub response: Response,
}

pub fn initiate_validator_weight_update(
    deps: DepsMut<WarpQuery>,
    env: &Env,
    caller: &Addr,
    validation_id: &Id32,
    new_weight: u64,
) -> Result<WeightUpdateOutcome, ContractError> {
    let settings = SETTINGS.load(deps.storage)?;
    if !settings.initiator.check(caller) {
        return Err(ContractError::Unauthorized(
            "caller may not initiate validator weight updates".into(),
        ));
    }

    let mut validator = load_validator(deps.storage, validation_id)?;
    require_status(&validator, Status::Active)?;

    let now_secs = now(env);
    let old_weight = validator.weight;
    let is_removal = new_weight == 0;

    // A removal's weight stays counted in `l1_total_weight` until
    // `complete_validator_weight_update` acknowledges it; only then does it
    // leave the validator set. A non-removal change applies optimistically.
    if !is_removal {
        let delta = if new_weight >= old_weight {
            new_weight - old_weight
        } else {
            old_weight - new_weight
        };
        apply_weight_delta(deps.storage, now_secs, new_weight >= old_weight, delta)?;
    }

    let nonce = validator.sent_nonce + 1;
    validator.sent_nonce = nonce;
    validator.pending_op = Some(if is_removal {
        PendingOp::AwaitingRemovalAck { nonce }
    } else {
        PendingOp::AwaitingWeightAck {
            nonce,
            target_weight: new_weight,
        }
    });

    if is_removal {
        validator.status = Status::PendingRemoved;
        validator.end_time = now_secs;
    } else {
        validator.weight = new_weight;
    }
    VALIDATORS.save(deps.storage, id_key(validation_id), &validator)?;

    let msg = L1ValidatorWeightMessage {
        validation_id: *validation_id,
        nonce,
        weight: new_weight,
    };
    let packed = pack_l1_validator_weight(&msg);
    let (sub_msg, message_id) = send_warp_message(packed);

    let mut response = Response::new()
        .add_submessage(sub_msg)
        .add_event(events::initiated_validator_weight_update(
            validation_id,
            nonce,
            &message_id,
            new_weight,
        ));
    if is_removal {
        response = response.add_event(events::initiated_validator_removal(
            validation_id,
            &message_id,
            old_weight,
            validator.end_time,
        ));
    }

    Ok(WeightUpdateOutcome {
        nonce,
        message_id,
        response,
    })
}

/// Re-issues the currently in-flight (or, if none, the last-sent) weight
/// update for `validation_id` under its existing nonce. Idempotent: because
/// weight changes are cumulative and the P-Chain signs only the latest, this
/// covers every delegator still waiting on that update.
pub fn resend_weight_update(
    deps: DepsMut<WarpQuery>,
    validation_id: &Id32,
) -> Result<(Id32, Response), ContractError> {
    let validator = load_validator(deps.storage, validation_id)?;
    let (nonce, weight) = match &validator.pending_op {
        Some(PendingOp::AwaitingWeightAck {
            nonce,
            target_weight,
        }) => (*nonce, *target_weight),
        Some(PendingOp::AwaitingRemovalAck { nonce }) => (*nonce, 0),
        _ => (validator.sent_nonce, validator.weight),
    };
    let msg = L1ValidatorWeightMessage {
        validation_id: *validation_id,
        nonce,
        weight,
    };
    let packed = pack_l1_validator_weight(&msg);
    let (sub_msg, message_id) = send_warp_message(packed);
    Ok((message_id, Response::new().add_submessage(sub_msg)))
}

pub fn initiate_validator_removal(
    deps: DepsMut<WarpQuery>,
    env: &Env,
    caller: &Addr,
    validation_id: &Id32,
) -> Result<WeightUpdateOutcome, ContractError> {
    initiate_validator_weight_update(deps, env, caller, validation_id, 0)
}

// ---------------------------------------------------------------------
// complete_validator_weight_update
// ---------------------------------------------------------------------

pub fn complete_validator_weight_update(
    deps: DepsMut<WarpQuery>,
    env: &Env,
    message_index: u32,
) -> Result<(Id32, u64, Response), ContractError> {
    let settings = SETTINGS.load(deps.storage)?;
    let warp_msg = get_verified_message(&deps.querier, message_index)?;
    authenticate(&warp_msg, &settings.p_chain_blockchain_id)?;
    let ack = unpack_l1_validator_weight(warp_msg.payload.as_slice())?;

    let mut validator = load_validator(deps.storage, &ack.validation_id)?;
    if ack.nonce < validator.received_nonce {
        return Err(ContractError::InvalidNonce(ack.nonce));
    }
    validator.received_nonce = validator.received_nonce.max(ack.nonce);

    let now_secs = now(env);
    let mut response = Response::new();
    let completes_removal = ack.weight == 0
        && validator.status == Status::PendingRemoved
        && matches!(
            validator.pending_op,
            Some(PendingOp::AwaitingRemovalAck { nonce }) if nonce == ack.nonce
        );
    if completes_removal {
        validator.status = Status::Completed;
        validator.end_time = if validator.end_time == 0 {
            now_secs
        } else {
            validator.end_time
        };
        validator.pending_op = None;
        apply_weight_delta(deps.storage, now_secs, false, validator.weight)?;
        response = response.add_event(events::completed_validator_removal(&ack.validation_id));
    } else {
        if let Some(PendingOp::AwaitingWeightAck { nonce, .. }) = &validator.pending_op {
            if ack.nonce >= *nonce {
                validator.pending_op = None;
            }
        }
        response = response.add_event(events::completed_validator_weight_update(
            &ack.validation_id,
            ack.nonce,
            validator.weight,
        ));
    }
    VALIDATORS.save(deps.storage, id_key(&ack.validation_id), &validator)?;

    Ok((ack.validation_id, ack.nonce, response))
}

// ---------------------------------------------------------------------
// complete_validator_removal — finalizes a validator that never left
// PendingAdded, via an L1ValidatorRegistrationMessage{valid=false}.
// ---------------------------------------------------------------------

pub fn complete_validator_removal(
    deps: DepsMut<WarpQuery>,
    env: &Env,
    message_index: u32,
) -> Result<(Id32, Response), ContractError> {
    let settings = SETTINGS.load(deps.storage)?;
    let warp_msg = get_verified_message(&deps.querier, message_index)?;
    authenticate(&warp_msg, &settings.p_chain_blockchain_id)?;
    let ack = unpack_l1_validator_registration(warp_msg.payload.as_slice())?;
    if ack.valid {
        return Err(ContractError::InvalidWarpMessage {});
    }

    let mut validator = load_validator(deps.storage, &ack.validation_id)?;
    require_status(&validator, Status::PendingAdded)?;

    validator.status = Status::Invalidated;
    validator.end_time = now(env);
    validator.pending_op = None;
    apply_weight_delta(deps.storage, now(env), false, validator.starting_weight)?;
    VALIDATORS.save(deps.storage, id_key(&ack.validation_id), &validator)?;

    let response = Response::new().add_event(events::completed_validator_removal(&ack.validation_id));
    Ok((ack.validation_id, response))
}

// ---------------------------------------------------------------------
// migrate_from_v1
// ---------------------------------------------------------------------

/// Re-seeds a validator record whose registration predates the current
/// version of this contract, for use from an explicit admin-gated `migrate`
/// entry point. The caller is responsible for authorization.
pub fn migrate_from_v1(
    deps: DepsMut<WarpQuery>,
    env: &Env,
    validation_id: &Id32,
    node_id: Vec<u8>,
    weight: u64,
) -> Result<(), ContractError> {
    if VALIDATORS.has(deps.storage, id_key(validation_id)) {
        return Err(ContractError::RegistrationAlreadyExists {});
    }
    let now_secs = now(env);
    apply_weight_delta(deps.storage, now_secs, true, weight)?;
    let record = Validator {
        status: Status::Active,
        node_id,
        starting_weight: weight,
        weight,
        sent_nonce: 0,
        received_nonce: 0,
        start_time: now_secs,
        end_time: 0,
        pending_op: None,
    };
    VALIDATORS.save(deps.storage, id_key(validation_id), &record)?;
    Ok(())
}

// ---------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------

pub fn get_validator(deps: Deps<WarpQuery>, validation_id: &Id32) -> Result<Option<Validator>, ContractError> {
    Ok(VALIDATORS.may_load(deps.storage, id_key(validation_id))?)
}

pub fn get_settings(deps: Deps<WarpQuery>) -> Result<Settings, ContractError> {
    Ok(SETTINGS.load(deps.storage)?)
}

pub fn get_l1_total_weight(deps: Deps<WarpQuery>) -> Result<u64, ContractError> {
    Ok(L1_TOTAL_WEIGHT.load(deps.storage)?)
}

pub fn get_churn_tracker(deps: Deps<WarpQuery>) -> Result<ChurnTracker, ContractError> {
    Ok(CHURN.load(deps.storage)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::{mock_dependencies, mock_env, MockApi, MockQuerier, MockStorage};
    use cosmwasm_std::{to_binary, Binary, ContractResult, OwnedDeps, SystemError, SystemResult};

    fn make_deps() -> OwnedDeps<MockStorage, MockApi, MockQuerier, WarpQuery> {
        let deps = mock_dependencies();
        OwnedDeps {
            storage: deps.storage,
            api: deps.api,
            querier: MockQuerier::<WarpQuery>::new(&[]),
            custom_query_type: std::marker::PhantomData,
        }
    }

    fn settings() -> Settings {
        Settings {
            subnet_id: Id32([1; 32]),
            p_chain_blockchain_id: Id32([2; 32]),
            churn_period_seconds: 3600,
            maximum_churn_percentage: 20,
            initiator: AuthorizedInitiator::Open,
        }
    }

    #[test]
    fn initialize_rejects_invalid_churn_percentage() {
        let mut deps = make_deps();
        let mut s = settings();
        s.maximum_churn_percentage = 21;
        let err = initialize(&mut deps.storage, s).unwrap_err();
        assert_eq!(err, ContractError::InvalidChurnPercentage {});
    }

    #[test]
    fn initialize_twice_fails() {
        let mut deps = make_deps();
        initialize(&mut deps.storage, settings()).unwrap();
        let err = initialize(&mut deps.storage, settings()).unwrap_err();
        assert_eq!(err, ContractError::AlreadyInitialized {});
    }

    #[test]
    fn churn_tracker_rejects_excess_churn() {
        let mut tracker = ChurnTracker::new(0, 1_000_000, 3600, 20);
        assert!(tracker.try_account(10, 1_000_000, 150_000));
        assert!(!tracker.try_account(20, 1_000_000, 60_000));
    }

    #[test]
    fn churn_tracker_resets_after_period() {
        let mut tracker = ChurnTracker::new(0, 1_000_000, 3600, 20);
        assert!(tracker.try_account(10, 1_000_000, 150_000));
        // after the period elapses, the window resets and the cap no longer
        // sees the earlier churn
        assert!(tracker.try_account(5000, 1_000_000, 150_000));
    }

    fn reject_all_queries(_: &cosmwasm_std::QueryRequest<WarpQuery>) -> SystemResult<cosmwasm_std::ContractResult<cosmwasm_std::Binary>> {
        SystemResult::Err(SystemError::UnsupportedRequest {
            kind: "custom".into(),
        })
    }

    #[test]
    fn initiate_validator_registration_rejects_zero_weight() {
        let mut deps = make_deps();
        deps.querier.update_wasm(reject_all_queries);
        initialize(&mut deps.storage, settings()).unwrap();
        L1_TOTAL_WEIGHT.save(&mut deps.storage, &0).unwrap();
        CHURN
            .save(&mut deps.storage, &ChurnTracker::new(0, 0, 3600, 20))
            .unwrap();
        let env = mock_env();
        let caller = Addr::unchecked("caller");
        let err = initiate_validator_registration(
            deps.as_mut(),
            &env,
            &caller,
            vec![0xAA; 20],
            vec![0xBB; 48],
            env.block.time.seconds() + 100,
            PChainOwner {
                threshold: 0,
                addresses: vec![],
            },
            PChainOwner {
                threshold: 0,
                addresses: vec![],
            },
            0,
        )
        .unwrap_err();
        assert_eq!(err, ContractError::InvalidStakeAmount {});
    }

    /// `complete_validator_weight_update` must finalize a removal only when
    /// `pending_op` is the matching `AwaitingRemovalAck`, not merely because
    /// the acked weight happens to be zero at the expected nonce.
    #[test]
    fn removal_completes_only_against_its_own_pending_op() {
        let mut deps = make_deps();
        initialize(&mut deps.storage, settings()).unwrap();
        L1_TOTAL_WEIGHT.save(&mut deps.storage, &100).unwrap();
        CHURN
            .save(&mut deps.storage, &ChurnTracker::new(0, 100, 3600, 20))
            .unwrap();

        let validation_id = Id32([5; 32]);
        VALIDATORS
            .save(
                &mut deps.storage,
                id_key(&validation_id),
                &Validator {
                    status: Status::Active,
                    node_id: vec![0xAA; 20],
                    starting_weight: 100,
                    weight: 100,
                    sent_nonce: 0,
                    received_nonce: 0,
                    start_time: 0,
                    end_time: 0,
                    pending_op: None,
                },
            )
            .unwrap();

        let env = mock_env();
        let caller = Addr::unchecked("caller");
        initiate_validator_removal(deps.as_mut(), &env, &caller, &validation_id).unwrap();

        let validator = load_validator(&deps.storage, &validation_id).unwrap();
        assert_eq!(
            validator.pending_op,
            Some(PendingOp::AwaitingRemovalAck { nonce: 1 })
        );

        let ack = L1ValidatorWeightMessage {
            validation_id,
            nonce: 1,
            weight: 0,
        };
        let packed = pack_l1_validator_weight(&ack);
        let source_chain_id = settings().p_chain_blockchain_id.as_bytes().to_vec();
        deps.querier = MockQuerier::<WarpQuery>::new(&[]).with_custom_handler(move |query| {
            let WarpQuery::GetVerifiedWarpMessage { index } = query;
            assert_eq!(*index, 0);
            SystemResult::Ok(ContractResult::Ok(
                to_binary(&GetVerifiedWarpMessageResponse {
                    valid: true,
                    message: WarpMessage {
                        source_chain_id: Binary::from(source_chain_id.clone()),
                        origin_sender_address: Binary::from(Vec::<u8>::new()),
                        payload: Binary::from(packed.clone()),
                    },
                })
                .unwrap(),
            ))
        });

        let (_, _, _response) = complete_validator_weight_update(deps.as_mut(), &env, 0).unwrap();
        let validator = load_validator(&deps.storage, &validation_id).unwrap();
        assert_eq!(validator.status, Status::Completed);
        assert_eq!(validator.pending_op, None);
        assert_eq!(L1_TOTAL_WEIGHT.load(&deps.storage).unwrap(), 0);
    }
}
