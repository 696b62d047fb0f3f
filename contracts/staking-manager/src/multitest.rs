use cosmwasm_std::{coins, Addr, Binary, Uint128};
use cw_multi_test::{Contract, ContractWrapper, Executor};
use warp_bindings::{WarpMsg, WarpQuery};
use warp_bindings_test::WarpApp;
use warp_codec::{
    pack_l1_validator_registration, pack_l1_validator_weight, pack_register_l1_validator,
    register_l1_validator_id, Id32, L1ValidatorRegistrationMessage, L1ValidatorWeightMessage,
    PChainOwner, RegisterL1ValidatorMessage,
};

use crate::contract::derive_delegation_id;
use crate::msg::{DelegatorResponse, ExecuteMsg, InstantiateMsg, QueryMsg, ValidatorResponse};

const SUBNET_ID: Id32 = Id32([1; 32]);
const P_CHAIN_BLOCKCHAIN_ID: Id32 = Id32([7; 32]);
const UPTIME_BLOCKCHAIN_ID: Id32 = Id32([8; 32]);
const DENOM: &str = "uvalid";

fn contract_staking_manager() -> Box<dyn Contract<WarpMsg, WarpQuery>> {
    Box::new(ContractWrapper::new(
        crate::contract::execute,
        crate::contract::instantiate,
        crate::contract::query,
    ))
}

struct Suite {
    app: WarpApp,
    contract: Addr,
    owner: Addr,
    next_index: u32,
}

impl Suite {
    fn new() -> Self {
        let owner = Addr::unchecked("owner");
        let mut app = WarpApp::new();
        app.init_modules(|router, _, storage| -> anyhow::Result<()> {
            router.bank.init_balance(storage, &Addr::unchecked("validator"), coins(1_000, DENOM))?;
            router.bank.init_balance(storage, &Addr::unchecked("delegator"), coins(1_000, DENOM))?;
            Ok(())
        })
        .unwrap();

        let code_id = app.store_code(contract_staking_manager());
        let contract = app
            .instantiate_contract(
                code_id,
                owner.clone(),
                &InstantiateMsg {
                    subnet_id: SUBNET_ID,
                    p_chain_blockchain_id: P_CHAIN_BLOCKCHAIN_ID,
                    churn_period_seconds: 3600,
                    maximum_churn_percentage: 20,
                    minimum_stake_amount: Uint128::new(1),
                    maximum_stake_amount: Uint128::new(1_000),
                    minimum_stake_duration: 3600,
                    minimum_delegation_fee_bips: 100,
                    maximum_stake_multiplier: 5,
                    weight_to_value_factor: Uint128::new(1),
                    reward_basis_points: 1_000,
                    uptime_blockchain_id: UPTIME_BLOCKCHAIN_ID,
                    asset_denom: DENOM.to_string(),
                    admin: Some(owner.to_string()),
                },
                &[],
                "staking-manager",
                None,
            )
            .unwrap();

        Suite {
            app,
            contract,
            owner,
            next_index: 0,
        }
    }

    fn stage_message(&mut self, source_chain_id: Id32, payload: Vec<u8>) -> u32 {
        let index = self.next_index;
        self.next_index += 1;
        self.app
            .set_node_signed_message(index, Binary::from(source_chain_id.as_bytes().to_vec()), Binary::from(payload));
        index
    }

    fn register_validator(&mut self, owner: &str, stake_amount: u128) -> Id32 {
        let expiry = self.app.block_info().time.seconds() + 100;
        let validation_id = register_l1_validator_id(
            &pack_register_l1_validator(&RegisterL1ValidatorMessage {
                subnet_id: SUBNET_ID,
                node_id: vec![0xAA; 20],
                bls_public_key: vec![0xBB; 48],
                expiry,
                remaining_balance_owner: PChainOwner {
                    threshold: 0,
                    addresses: vec![],
                },
                disable_owner: PChainOwner {
                    threshold: 0,
                    addresses: vec![],
                },
                weight: stake_amount as u64,
            })
            .unwrap(),
        );

        self.app
            .execute_contract(
                Addr::unchecked(owner),
                self.contract.clone(),
                &ExecuteMsg::RegisterValidator {
                    node_id: Binary::from(vec![0xAA; 20]),
                    bls_public_key: Binary::from(vec![0xBB; 48]),
                    expiry,
                    remaining_balance_owner: PChainOwner {
                        threshold: 0,
                        addresses: vec![],
                    },
                    disable_owner: PChainOwner {
                        threshold: 0,
                        addresses: vec![],
                    },
                    delegation_fee_bips: 100,
                    min_stake_duration: 3600,
                    stake_amount: Uint128::new(stake_amount),
                },
                &coins(stake_amount, DENOM),
            )
            .unwrap();
        validation_id
    }

    fn complete_validator_registration(&mut self, validation_id: Id32) {
        let index = self.stage_message(
            P_CHAIN_BLOCKCHAIN_ID,
            pack_l1_validator_registration(&L1ValidatorRegistrationMessage {
                validation_id,
                valid: true,
            }),
        );
        self.app
            .execute_contract(
                self.owner.clone(),
                self.contract.clone(),
                &ExecuteMsg::CompleteValidatorRegistration { message_index: index },
                &[],
            )
            .unwrap();
    }

    fn query_validator(&self, validation_id: Id32) -> ValidatorResponse {
        self.app
            .wrap()
            .query_wasm_smart(self.contract.clone(), &QueryMsg::Validator { validation_id })
            .unwrap()
    }

    fn query_delegator(&self, delegation_id: Id32) -> DelegatorResponse {
        self.app
            .wrap()
            .query_wasm_smart(self.contract.clone(), &QueryMsg::Delegator { delegation_id })
            .unwrap()
    }
}

#[test]
fn validator_registration_completes_and_locks_stake() {
    let mut suite = Suite::new();
    let validation_id = suite.register_validator("validator", 100);
    suite.complete_validator_registration(validation_id);

    let response = suite.query_validator(validation_id);
    assert_eq!(response.validator.unwrap().weight, 100);

    let remaining = suite.app.wrap().query_balance("validator", DENOM).unwrap();
    assert_eq!(remaining.amount, Uint128::new(900));
}

#[test]
fn register_validator_rejects_mismatched_funds() {
    let mut suite = Suite::new();
    let err = suite
        .app
        .execute_contract(
            Addr::unchecked("validator"),
            suite.contract.clone(),
            &ExecuteMsg::RegisterValidator {
                node_id: Binary::from(vec![0xAA; 20]),
                bls_public_key: Binary::from(vec![0xBB; 48]),
                expiry: suite.app.block_info().time.seconds() + 100,
                remaining_balance_owner: PChainOwner {
                    threshold: 0,
                    addresses: vec![],
                },
                disable_owner: PChainOwner {
                    threshold: 0,
                    addresses: vec![],
                },
                delegation_fee_bips: 100,
                min_stake_duration: 3600,
                stake_amount: Uint128::new(100),
            },
            &coins(50, DENOM),
        )
        .unwrap_err();
    assert_eq!(
        crate::error::ContractError::Asset(asset_handler::AssetError::AmountMismatch {
            sent: Uint128::new(50),
            requested: Uint128::new(100),
        }),
        err.downcast().unwrap(),
    );
}

#[test]
fn delegator_registration_completes_after_weight_ack() {
    let mut suite = Suite::new();
    let validation_id = suite.register_validator("validator", 100);
    suite.complete_validator_registration(validation_id);

    suite
        .app
        .execute_contract(
            Addr::unchecked("delegator"),
            suite.contract.clone(),
            &ExecuteMsg::InitiateDelegatorRegistration {
                validation_id,
                value: Uint128::new(50),
            },
            &coins(50, DENOM),
        )
        .unwrap();

    let delegation_id = derive_delegation_id(&validation_id, 1);
    let ack_index = suite.stage_message(
        P_CHAIN_BLOCKCHAIN_ID,
        pack_l1_validator_weight(&L1ValidatorWeightMessage {
            validation_id,
            nonce: 1,
            weight: 150,
        }),
    );

    suite
        .app
        .execute_contract(
            Addr::unchecked("delegator"),
            suite.contract.clone(),
            &ExecuteMsg::CompleteDelegatorRegistration {
                delegation_id,
                message_index: Some(ack_index),
            },
            &[],
        )
        .unwrap();

    let delegator = suite.query_delegator(delegation_id).delegator.expect("delegator recorded");
    assert_eq!(delegator.weight, 50);
    assert_eq!(delegator.status, crate::state::DelegatorStatus::Active);
}

#[test]
fn delegator_removal_before_min_stake_duration_is_rejected() {
    let mut suite = Suite::new();
    let validation_id = suite.register_validator("validator", 100);
    suite.complete_validator_registration(validation_id);

    suite
        .app
        .execute_contract(
            Addr::unchecked("delegator"),
            suite.contract.clone(),
            &ExecuteMsg::InitiateDelegatorRegistration {
                validation_id,
                value: Uint128::new(50),
            },
            &coins(50, DENOM),
        )
        .unwrap();
    let delegation_id = derive_delegation_id(&validation_id, 1);
    let ack_index = suite.stage_message(
        P_CHAIN_BLOCKCHAIN_ID,
        pack_l1_validator_weight(&L1ValidatorWeightMessage {
            validation_id,
            nonce: 1,
            weight: 150,
        }),
    );
    suite
        .app
        .execute_contract(
            Addr::unchecked("delegator"),
            suite.contract.clone(),
            &ExecuteMsg::CompleteDelegatorRegistration {
                delegation_id,
                message_index: Some(ack_index),
            },
            &[],
        )
        .unwrap();

    let err = suite
        .app
        .execute_contract(
            Addr::unchecked("delegator"),
            suite.contract.clone(),
            &ExecuteMsg::InitiateDelegatorRemoval {
                delegation_id,
                include_uptime: false,
                message_index: None,
                reward_recipient: None,
            },
            &[],
        )
        .unwrap_err();
    let unlock_at = suite.app.block_info().time.seconds() + 3600;
    assert_eq!(
        crate::error::ContractError::MinStakeDurationNotPassed(unlock_at),
        err.downcast().unwrap(),
    );
}

/// `weight_to_value_factor=3` against a `stake_amount=100` floors the
/// derived weight to 33, so the reverse mapping refunds only 99 on exit —
/// the remaining 1 stays locked in the contract rather than being returned.
#[test]
fn validator_exit_refunds_weight_to_value_not_original_stake() {
    let owner = Addr::unchecked("owner");
    let mut app = WarpApp::new();
    app.init_modules(|router, _, storage| -> anyhow::Result<()> {
        router.bank.init_balance(storage, &Addr::unchecked("validator"), coins(1_000, DENOM))?;
        Ok(())
    })
    .unwrap();

    let code_id = app.store_code(contract_staking_manager());
    let contract = app
        .instantiate_contract(
            code_id,
            owner.clone(),
            &InstantiateMsg {
                subnet_id: SUBNET_ID,
                p_chain_blockchain_id: P_CHAIN_BLOCKCHAIN_ID,
                churn_period_seconds: 3600,
                maximum_churn_percentage: 20,
                minimum_stake_amount: Uint128::new(1),
                maximum_stake_amount: Uint128::new(1_000),
                minimum_stake_duration: 3600,
                minimum_delegation_fee_bips: 100,
                maximum_stake_multiplier: 5,
                weight_to_value_factor: Uint128::new(3),
                reward_basis_points: 1_000,
                uptime_blockchain_id: UPTIME_BLOCKCHAIN_ID,
                asset_denom: DENOM.to_string(),
                admin: Some(owner.to_string()),
            },
            &[],
            "staking-manager",
            None,
        )
        .unwrap();

    let stake_amount = 100u128;
    let expiry = app.block_info().time.seconds() + 100;
    let validation_id = register_l1_validator_id(
        &pack_register_l1_validator(&RegisterL1ValidatorMessage {
            subnet_id: SUBNET_ID,
            node_id: vec![0xAA; 20],
            bls_public_key: vec![0xBB; 48],
            expiry,
            remaining_balance_owner: PChainOwner {
                threshold: 0,
                addresses: vec![],
            },
            disable_owner: PChainOwner {
                threshold: 0,
                addresses: vec![],
            },
            weight: 33,
        })
        .unwrap(),
    );
    app.execute_contract(
        Addr::unchecked("validator"),
        contract.clone(),
        &ExecuteMsg::RegisterValidator {
            node_id: Binary::from(vec![0xAA; 20]),
            bls_public_key: Binary::from(vec![0xBB; 48]),
            expiry,
            remaining_balance_owner: PChainOwner {
                threshold: 0,
                addresses: vec![],
            },
            disable_owner: PChainOwner {
                threshold: 0,
                addresses: vec![],
            },
            delegation_fee_bips: 100,
            min_stake_duration: 3600,
            stake_amount: Uint128::new(stake_amount),
        },
        &coins(stake_amount, DENOM),
    )
    .unwrap();

    let mut next_index = 0u32;
    let mut stage = |app: &mut WarpApp, payload: Vec<u8>| -> u32 {
        let index = next_index;
        next_index += 1;
        app.set_node_signed_message(index, Binary::from(P_CHAIN_BLOCKCHAIN_ID.as_bytes().to_vec()), Binary::from(payload));
        index
    };

    let reg_ack_index = stage(
        &mut app,
        pack_l1_validator_registration(&L1ValidatorRegistrationMessage {
            validation_id,
            valid: true,
        }),
    );
    app.execute_contract(
        owner.clone(),
        contract.clone(),
        &ExecuteMsg::CompleteValidatorRegistration {
            message_index: reg_ack_index,
        },
        &[],
    )
    .unwrap();

    let response: ValidatorResponse = app
        .wrap()
        .query_wasm_smart(contract.clone(), &QueryMsg::Validator { validation_id })
        .unwrap();
    assert_eq!(response.validator.unwrap().weight, 33);

    app.execute_contract(
        owner.clone(),
        contract.clone(),
        &ExecuteMsg::InitiateValidatorRemoval { validation_id },
        &[],
    )
    .unwrap();

    let removal_ack_index = stage(
        &mut app,
        pack_l1_validator_weight(&L1ValidatorWeightMessage {
            validation_id,
            nonce: 1,
            weight: 0,
        }),
    );
    app.execute_contract(
        owner.clone(),
        contract.clone(),
        &ExecuteMsg::CompleteValidatorWeightUpdate {
            message_index: removal_ack_index,
        },
        &[],
    )
    .unwrap();

    let balance = app.wrap().query_balance("validator", DENOM).unwrap();
    // started with 1000, locked 100, refunded only floor(33 * 3) = 99
    assert_eq!(balance.amount, Uint128::new(999));
    let contract_balance = app.wrap().query_balance(contract.as_str(), DENOM).unwrap();
    assert_eq!(contract_balance.amount, Uint128::new(1));
}
