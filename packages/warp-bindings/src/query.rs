use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::{Binary, CustomQuery};

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
#[serde(rename_all = "snake_case")]
pub enum WarpQuery {
    /// Ask the chain's Warp precompile whether the message at `index` (as
    /// supplied in the calling transaction) carries a valid aggregate
    /// P-Chain signature. Returns `GetVerifiedWarpMessageResponse`.
    GetVerifiedWarpMessage { index: u32 },
}

impl CustomQuery for WarpQuery {}

/// Mirrors the (message, ok) pair the Warp Messenger precompile returns;
/// `valid = false` is fatal for the calling operation and is never retried
/// by this crate.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
pub struct GetVerifiedWarpMessageResponse {
    pub message: WarpMessage,
    pub valid: bool,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
pub struct WarpMessage {
    /// Blockchain id of the chain that produced the message (the P-Chain for
    /// conversion/registration/weight messages, or the validator's own
    /// uptime-reporting chain for uptime messages).
    pub source_chain_id: Binary,
    /// All-zero bytes signal a validator-node-signed proof rather than a
    /// contract-originated message; non-zero origin senders are rejected by
    /// every entry point in this core.
    pub origin_sender_address: Binary,
    pub payload: Binary,
}

impl WarpMessage {
    pub fn is_node_signed(&self) -> bool {
        self.origin_sender_address.as_slice().iter().all(|b| *b == 0)
    }
}
