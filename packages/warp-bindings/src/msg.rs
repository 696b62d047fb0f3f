use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::{Binary, CosmosMsg, CustomMsg};

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
#[serde(rename_all = "snake_case")]
/// Messages a contract may return to ask the chain's Warp module to sign and
/// gossip a cross-chain payload. Returning these from a non-privileged
/// contract is rejected by the chain at the custom-message dispatch layer.
pub enum WarpMsg {
    /// Submit `payload` for P-Chain signature aggregation. The resulting
    /// message id is the same `sha256(payload)` the caller can compute
    /// locally, so the core never needs to wait on a reply to learn it.
    SendWarpMessage { payload: Binary },
}

impl CustomMsg for WarpMsg {}

impl From<WarpMsg> for CosmosMsg<WarpMsg> {
    fn from(msg: WarpMsg) -> CosmosMsg<WarpMsg> {
        CosmosMsg::Custom(msg)
    }
}
