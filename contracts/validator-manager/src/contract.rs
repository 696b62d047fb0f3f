#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{to_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, StdResult};

use cw2::set_contract_version;
use cw_controllers::Admin;
use cw_utils::maybe_addr;

use validator_manager_core::{self as core, AuthorizedInitiator, Settings};
use warp_bindings::WarpQuery;

use crate::error::ContractError;
use crate::msg::{
    AuthorizedInitiatorMsg, ChurnTrackerResponse, ExecuteMsg, InstantiateMsg, L1TotalWeightResponse,
    MigrateMsg, QueryMsg, SettingsResponse, ValidatorResponse,
};

pub type Response = core::Response;

const CONTRACT_NAME: &str = "crates.io:validator-manager";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Contract admin allowed to call `MigrateFromV1` — distinct from
/// `AuthorizedInitiator`, which gates the ordinary lifecycle entry points.
const ADMIN: Admin = Admin::new("vm_admin");

impl AuthorizedInitiatorMsg {
    fn validate(self, api: &dyn cosmwasm_std::Api) -> StdResult<AuthorizedInitiator> {
        Ok(match self {
            AuthorizedInitiatorMsg::Open => AuthorizedInitiator::Open,
            AuthorizedInitiatorMsg::OwnerOnly(owner) => {
                AuthorizedInitiator::OwnerOnly(api.addr_validate(&owner)?)
            }
        })
    }
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

    let settings = Settings {
        subnet_id: msg.subnet_id,
        p_chain_blockchain_id: msg.p_chain_blockchain_id,
        churn_period_seconds: msg.churn_period_seconds,
        maximum_churn_percentage: msg.maximum_churn_percentage,
        initiator: msg.initiator.validate(api)?,
    };
    core::initialize(deps.storage, settings)?;

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
        } => core::initialize_validator_set(deps, &env, &manager_address, conversion_data, message_index),
        ExecuteMsg::InitiateValidatorRegistration {
            node_id,
            bls_public_key,
            expiry,
            remaining_balance_owner,
            disable_owner,
            weight,
        } => execute_initiate_registration(
            deps,
            &env,
            &info.sender,
            node_id,
            bls_public_key,
            expiry,
            remaining_balance_owner,
            disable_owner,
            weight,
        ),
        ExecuteMsg::CompleteValidatorRegistration { message_index } => {
            let (_, response) = core::complete_validator_registration(deps, &env, message_index)?;
            Ok(response)
        }
        ExecuteMsg::InitiateValidatorWeightUpdate {
            validation_id,
            new_weight,
        } => {
            let outcome = core::initiate_validator_weight_update(
                deps,
                &env,
                &info.sender,
                &validation_id,
                new_weight,
            )?;
            Ok(outcome.response)
        }
        ExecuteMsg::InitiateValidatorRemoval { validation_id } => {
            let outcome =
                core::initiate_validator_removal(deps, &env, &info.sender, &validation_id)?;
            Ok(outcome.response)
        }
        ExecuteMsg::CompleteValidatorWeightUpdate { message_index } => {
            let (_, _, response) = core::complete_validator_weight_update(deps, &env, message_index)?;
            Ok(response)
        }
        ExecuteMsg::CompleteValidatorRemoval { message_index } => {
            let (_, response) = core::complete_validator_removal(deps, &env, message_index)?;
            Ok(response)
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
fn execute_initiate_registration(
    deps: DepsMut<WarpQuery>,
    env: &Env,
    caller: &Addr,
    node_id: Binary,
    bls_public_key: Binary,
    expiry: u64,
    remaining_balance_owner: warp_codec::PChainOwner,
    disable_owner: warp_codec::PChainOwner,
    weight: u64,
) -> Result<Response, ContractError> {
    let outcome = core::initiate_validator_registration(
        deps,
        env,
        caller,
        node_id.to_vec(),
        bls_public_key.to_vec(),
        expiry,
        remaining_balance_owner,
        disable_owner,
        weight,
    )?;
    Ok(outcome.response)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps<WarpQuery>, _env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    let res = match msg {
        QueryMsg::Validator { validation_id } => to_binary(&ValidatorResponse {
            validator: core::get_validator(deps, &validation_id)?,
        }),
        QueryMsg::Settings {} => {
            let settings: SettingsResponse = core::get_settings(deps)?;
            to_binary(&settings)
        }
        QueryMsg::L1TotalWeight {} => to_binary(&L1TotalWeightResponse {
            weight: core::get_l1_total_weight(deps)?,
        }),
        QueryMsg::ChurnTracker {} => {
            let tracker: ChurnTrackerResponse = core::get_churn_tracker(deps)?;
            to_binary(&tracker)
        }
        QueryMsg::Admin {} => to_binary(&ADMIN.query_admin(deps)?),
    }?;
    Ok(res)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut<WarpQuery>, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    vm_utils::ensure_from_older_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::default())
}
