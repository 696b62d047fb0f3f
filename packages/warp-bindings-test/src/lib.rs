//! `cw-multi-test` support for contracts built on `warp-bindings`: a `Module`
//! that stands in for the chain's privileged Warp Messenger precompile, plus
//! an `App` wrapper with test-only setters a suite can use to seed "verified"
//! Warp messages at a given query index without needing a real signature
//! aggregator.

use std::fmt::Debug;
use std::ops::{Deref, DerefMut};

use anyhow::{bail, Result as AnyResult};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use thiserror::Error;

use cosmwasm_std::{Addr, Api, Binary, BlockInfo, CustomQuery, Empty, Querier, QuerierResult, StdError, Storage};
use cw_multi_test::{App, AppResponse, BankKeeper, BasicAppBuilder, CosmosRouter, Module, WasmKeeper};
use cw_storage_plus::Map;

use warp_bindings::{GetVerifiedWarpMessageResponse, WarpMessage, WarpMsg, WarpQuery};

const VERIFIED_MESSAGES: Map<u32, GetVerifiedWarpMessageResponse> = Map::new("warp_verified_messages");
const SENT_MESSAGES: Map<u32, Binary> = Map::new("warp_sent_messages");
const NEXT_SENT_INDEX: cw_storage_plus::Item<u32> = cw_storage_plus::Item::new("warp_next_sent_index");

#[derive(Error, Debug, PartialEq)]
pub enum WarpModuleError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("no verified Warp message seeded at index {0}")]
    NoMessageAtIndex(u32),
}

pub struct WarpModule {}

impl WarpModule {
    /// Test-only: seeds the response `get_verified_warp_message(index)` will
    /// return, the way a real node would after aggregating a P-Chain
    /// signature over `payload`.
    pub fn set_verified_message(
        &self,
        storage: &mut dyn Storage,
        index: u32,
        source_chain_id: Binary,
        origin_sender_address: Binary,
        payload: Binary,
        valid: bool,
    ) -> Result<(), WarpModuleError> {
        VERIFIED_MESSAGES.save(
            storage,
            index,
            &GetVerifiedWarpMessageResponse {
                message: WarpMessage {
                    source_chain_id,
                    origin_sender_address,
                    payload,
                },
                valid,
            },
        )?;
        Ok(())
    }

    /// Convenience for the common case: a node-signed message (zero origin
    /// sender) from `source_chain_id`.
    pub fn set_node_signed_message(
        &self,
        storage: &mut dyn Storage,
        index: u32,
        source_chain_id: Binary,
        payload: Binary,
    ) -> Result<(), WarpModuleError> {
        self.set_verified_message(storage, index, source_chain_id, Binary::from(vec![0u8; 32]), payload, true)
    }

    pub fn sent_messages(&self, storage: &dyn Storage) -> Result<Vec<Binary>, WarpModuleError> {
        let count = NEXT_SENT_INDEX.may_load(storage)?.unwrap_or(0);
        (0..count)
            .map(|i| SENT_MESSAGES.load(storage, i).map_err(WarpModuleError::from))
            .collect()
    }
}

impl Module for WarpModule {
    type ExecT = WarpMsg;
    type QueryT = WarpQuery;
    type SudoT = Empty;

    fn execute<ExecC, QueryC>(
        &self,
        _api: &dyn Api,
        storage: &mut dyn Storage,
        _router: &dyn CosmosRouter<ExecC = ExecC, QueryC = QueryC>,
        _block: &BlockInfo,
        _sender: Addr,
        msg: WarpMsg,
    ) -> AnyResult<AppResponse>
    where
        ExecC: Debug + Clone + PartialEq + JsonSchema + DeserializeOwned + 'static,
        QueryC: CustomQuery + DeserializeOwned + 'static,
    {
        match msg {
            WarpMsg::SendWarpMessage { payload } => {
                let index = NEXT_SENT_INDEX.may_load(storage)?.unwrap_or(0);
                SENT_MESSAGES.save(storage, index, &payload)?;
                NEXT_SENT_INDEX.save(storage, &(index + 1))?;
                Ok(AppResponse::default())
            }
        }
    }

    fn sudo<ExecC, QueryC>(
        &self,
        _api: &dyn Api,
        _storage: &mut dyn Storage,
        _router: &dyn CosmosRouter<ExecC = ExecC, QueryC = QueryC>,
        _block: &BlockInfo,
        _msg: Self::SudoT,
    ) -> AnyResult<AppResponse>
    where
        ExecC: Debug + Clone + PartialEq + JsonSchema + DeserializeOwned + 'static,
        QueryC: CustomQuery + DeserializeOwned + 'static,
    {
        bail!("sudo not implemented for WarpModule")
    }

    fn query(
        &self,
        _api: &dyn Api,
        storage: &dyn Storage,
        _querier: &dyn Querier,
        _block: &BlockInfo,
        request: WarpQuery,
    ) -> AnyResult<Binary> {
        match request {
            WarpQuery::GetVerifiedWarpMessage { index } => {
                let resp = VERIFIED_MESSAGES
                    .may_load(storage, index)?
                    .ok_or(WarpModuleError::NoMessageAtIndex(index))?;
                Ok(cosmwasm_std::to_binary(&resp)?)
            }
        }
    }
}

pub type WarpAppWrapped = App<BankKeeper, cosmwasm_std::testing::MockApi, cosmwasm_std::testing::MockStorage, WarpModule, WasmKeeper<WarpMsg, WarpQuery>>;

pub struct WarpApp(WarpAppWrapped);

impl Deref for WarpApp {
    type Target = WarpAppWrapped;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for WarpApp {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Querier for WarpApp {
    fn raw_query(&self, bin_request: &[u8]) -> QuerierResult {
        self.0.raw_query(bin_request)
    }
}

impl Default for WarpApp {
    fn default() -> Self {
        Self::new()
    }
}

impl WarpApp {
    pub fn new() -> Self {
        Self(
            BasicAppBuilder::<WarpMsg, WarpQuery>::new_custom()
                .with_custom(WarpModule {})
                .build(|_, _, _| {}),
        )
    }

    /// Seeds the response `get_verified_warp_message(index)` will return.
    pub fn set_verified_message(
        &mut self,
        index: u32,
        source_chain_id: Binary,
        origin_sender_address: Binary,
        payload: Binary,
        valid: bool,
    ) {
        let module = WarpModule {};
        self.0
            .init_modules(|_router, _api, storage| -> AnyResult<()> {
                module
                    .set_verified_message(storage, index, source_chain_id, origin_sender_address, payload, valid)
                    .map_err(|e| anyhow::anyhow!(e))
            })
            .unwrap();
    }

    pub fn set_node_signed_message(&mut self, index: u32, source_chain_id: Binary, payload: Binary) {
        self.set_verified_message(index, source_chain_id, Binary::from(vec![0u8; 32]), payload, true);
    }
}
