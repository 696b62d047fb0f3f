use cosmwasm_std::{Addr, Binary};
use cw_multi_test::{Contract, ContractWrapper, Executor};
use warp_bindings::{WarpMsg, WarpQuery};
use warp_bindings_test::WarpApp;
use warp_codec::{
    pack_l1_validator_registration, pack_l1_validator_weight, pack_register_l1_validator,
    register_l1_validator_id, Id32, L1ValidatorRegistrationMessage, L1ValidatorWeightMessage,
    PChainOwner, RegisterL1ValidatorMessage,
};

use crate::msg::{AuthorizedInitiatorMsg, ExecuteMsg, InstantiateMsg, QueryMsg, ValidatorResponse};

fn contract_validator_manager() -> Box<dyn Contract<WarpMsg, WarpQuery>> {
    Box::new(ContractWrapper::new(
        crate::contract::execute,
        crate::contract::instantiate,
        crate::contract::query,
    ))
}

const SUBNET_ID: Id32 = Id32([1; 32]);
const P_CHAIN_BLOCKCHAIN_ID: Id32 = Id32([7; 32]);

struct Suite {
    app: WarpApp,
    contract: Addr,
    owner: Addr,
    next_index: u32,
}

impl Suite {
    fn new(initiator: AuthorizedInitiatorMsg) -> Self {
        let mut app = WarpApp::new();
        let owner = Addr::unchecked("owner");

        let code_id = app.store_code(contract_validator_manager());
        let contract = app
            .instantiate_contract(
                code_id,
                owner.clone(),
                &InstantiateMsg {
                    subnet_id: SUBNET_ID,
                    p_chain_blockchain_id: P_CHAIN_BLOCKCHAIN_ID,
                    churn_period_seconds: 3600,
                    maximum_churn_percentage: 20,
                    initiator,
                    admin: Some(owner.to_string()),
                },
                &[],
                "validator-manager",
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

    fn stage_message(&mut self, payload: Vec<u8>) -> u32 {
        let index = self.next_index;
        self.next_index += 1;
        self.app.set_node_signed_message(
            index,
            Binary::from(P_CHAIN_BLOCKCHAIN_ID.as_bytes().to_vec()),
            Binary::from(payload),
        );
        index
    }

    fn registration_msg(&self, weight: u64) -> ExecuteMsg {
        ExecuteMsg::InitiateValidatorRegistration {
            node_id: Binary::from(vec![0xAA; 20]),
            bls_public_key: Binary::from(vec![0xBB; 48]),
            expiry: self.app.block_info().time.seconds() + 100,
            remaining_balance_owner: PChainOwner {
                threshold: 0,
                addresses: vec![],
            },
            disable_owner: PChainOwner {
                threshold: 0,
                addresses: vec![],
            },
            weight,
        }
    }

    /// Mirrors the id the contract derives internally, so tests can address
    /// the validator they just registered without scraping events.
    fn expected_validation_id(&self, weight: u64) -> Id32 {
        let packed = pack_register_l1_validator(&RegisterL1ValidatorMessage {
            subnet_id: SUBNET_ID,
            node_id: vec![0xAA; 20],
            bls_public_key: vec![0xBB; 48],
            expiry: self.app.block_info().time.seconds() + 100,
            remaining_balance_owner: PChainOwner {
                threshold: 0,
                addresses: vec![],
            },
            disable_owner: PChainOwner {
                threshold: 0,
                addresses: vec![],
            },
            weight,
        })
        .unwrap();
        register_l1_validator_id(&packed)
    }

    fn register(&mut self, caller: &str, weight: u64) -> Id32 {
        let validation_id = self.expected_validation_id(weight);
        let msg = self.registration_msg(weight);
        self.app
            .execute_contract(Addr::unchecked(caller), self.contract.clone(), &msg, &[])
            .unwrap();
        validation_id
    }

    fn query_validator(&self, validation_id: Id32) -> ValidatorResponse {
        self.app
            .wrap()
            .query_wasm_smart(self.contract.clone(), &QueryMsg::Validator { validation_id })
            .unwrap()
    }
}

#[test]
fn registration_completes_on_acknowledged_message() {
    let mut suite = Suite::new(AuthorizedInitiatorMsg::Open);
    let validation_id = suite.register("anybody", 100);

    let ack = L1ValidatorRegistrationMessage {
        validation_id,
        valid: true,
    };
    let index = suite.stage_message(pack_l1_validator_registration(&ack));

    suite
        .app
        .execute_contract(
            suite.owner.clone(),
            suite.contract.clone(),
            &ExecuteMsg::CompleteValidatorRegistration { message_index: index },
            &[],
        )
        .unwrap();

    let response = suite.query_validator(validation_id);
    let validator = response.validator.expect("validator recorded");
    assert_eq!(validator.weight, 100);
}

#[test]
fn rejected_registration_is_invalidated_and_frees_churn() {
    let mut suite = Suite::new(AuthorizedInitiatorMsg::Open);
    let validation_id = suite.register("anybody", 100);

    let ack = L1ValidatorRegistrationMessage {
        validation_id,
        valid: false,
    };
    let index = suite.stage_message(pack_l1_validator_registration(&ack));
    suite
        .app
        .execute_contract(
            suite.owner.clone(),
            suite.contract.clone(),
            &ExecuteMsg::CompleteValidatorRegistration { message_index: index },
            &[],
        )
        .unwrap();

    let response: crate::msg::L1TotalWeightResponse = suite
        .app
        .wrap()
        .query_wasm_smart(suite.contract.clone(), &QueryMsg::L1TotalWeight {})
        .unwrap();
    assert_eq!(response.weight, 0);
}

#[test]
fn owner_only_initiator_blocks_outside_callers() {
    let mut suite = Suite::new(AuthorizedInitiatorMsg::OwnerOnly(Addr::unchecked("owner").to_string()));
    let msg = suite.registration_msg(100);
    let err = suite
        .app
        .execute_contract(Addr::unchecked("stranger"), suite.contract.clone(), &msg, &[])
        .unwrap_err();
    assert_eq!(
        crate::error::ContractError::Unauthorized("caller may not initiate validator registration".into()),
        err.downcast().unwrap(),
    );
}

#[test]
fn weight_update_round_trips_through_warp() {
    let mut suite = Suite::new(AuthorizedInitiatorMsg::Open);
    let validation_id = suite.register("anybody", 100);
    let index = suite.stage_message(pack_l1_validator_registration(&L1ValidatorRegistrationMessage {
        validation_id,
        valid: true,
    }));
    suite
        .app
        .execute_contract(
            suite.owner.clone(),
            suite.contract.clone(),
            &ExecuteMsg::CompleteValidatorRegistration { message_index: index },
            &[],
        )
        .unwrap();

    suite
        .app
        .execute_contract(
            suite.owner.clone(),
            suite.contract.clone(),
            &ExecuteMsg::InitiateValidatorWeightUpdate {
                validation_id,
                new_weight: 150,
            },
            &[],
        )
        .unwrap();

    let weight_ack = L1ValidatorWeightMessage {
        validation_id,
        nonce: 1,
        weight: 150,
    };
    let index = suite.stage_message(pack_l1_validator_weight(&weight_ack));
    suite
        .app
        .execute_contract(
            suite.owner.clone(),
            suite.contract.clone(),
            &ExecuteMsg::CompleteValidatorWeightUpdate { message_index: index },
            &[],
        )
        .unwrap();

    let response = suite.query_validator(validation_id);
    assert_eq!(response.validator.unwrap().weight, 150);
}

#[test]
fn removal_keeps_l1_total_weight_until_completion_acknowledged() {
    let mut suite = Suite::new(AuthorizedInitiatorMsg::Open);
    let validation_id = suite.register("anybody", 100);
    let index = suite.stage_message(pack_l1_validator_registration(&L1ValidatorRegistrationMessage {
        validation_id,
        valid: true,
    }));
    suite
        .app
        .execute_contract(
            suite.owner.clone(),
            suite.contract.clone(),
            &ExecuteMsg::CompleteValidatorRegistration { message_index: index },
            &[],
        )
        .unwrap();

    let query_total_weight = |suite: &Suite| -> u64 {
        let response: crate::msg::L1TotalWeightResponse = suite
            .app
            .wrap()
            .query_wasm_smart(suite.contract.clone(), &QueryMsg::L1TotalWeight {})
            .unwrap();
        response.weight
    };
    assert_eq!(query_total_weight(&suite), 100);

    suite
        .app
        .execute_contract(
            suite.owner.clone(),
            suite.contract.clone(),
            &ExecuteMsg::InitiateValidatorRemoval { validation_id },
            &[],
        )
        .unwrap();

    // still counted: the validator is only PendingRemoved, not yet Completed.
    assert_eq!(query_total_weight(&suite), 100);
    let response = suite.query_validator(validation_id);
    assert_eq!(response.validator.unwrap().weight, 100);

    let weight_ack = L1ValidatorWeightMessage {
        validation_id,
        nonce: 1,
        weight: 0,
    };
    let index = suite.stage_message(pack_l1_validator_weight(&weight_ack));
    suite
        .app
        .execute_contract(
            suite.owner.clone(),
            suite.contract.clone(),
            &ExecuteMsg::CompleteValidatorWeightUpdate { message_index: index },
            &[],
        )
        .unwrap();

    assert_eq!(query_total_weight(&suite), 0);
}
