use std::env::current_dir;
use std::fs::create_dir_all;

use cosmwasm_schema::{export_schema, export_schema_with_title, remove_schemas, schema_for};

use staking_manager::msg::{
    ChurnTrackerResponse, DelegatorResponse, ExecuteMsg, InstantiateMsg, L1TotalWeightResponse,
    MigrateMsg, PosValidatorInfoResponse, QueryMsg, RedeemableValidatorRewardsResponse,
    SettingsResponse, ValidatorResponse, VmSettingsResponse,
};

fn main() {
    let mut out_dir = current_dir().unwrap();
    out_dir.push("schema");
    create_dir_all(&out_dir).unwrap();
    remove_schemas(&out_dir).unwrap();

    export_schema(&schema_for!(InstantiateMsg), &out_dir);
    export_schema_with_title(&schema_for!(ExecuteMsg), &out_dir, "ExecuteMsg");
    export_schema_with_title(&schema_for!(QueryMsg), &out_dir, "QueryMsg");
    export_schema(&schema_for!(MigrateMsg), &out_dir);
    export_schema(&schema_for!(ValidatorResponse), &out_dir);
    export_schema(&schema_for!(PosValidatorInfoResponse), &out_dir);
    export_schema(&schema_for!(DelegatorResponse), &out_dir);
    export_schema(&schema_for!(VmSettingsResponse), &out_dir);
    export_schema(&schema_for!(SettingsResponse), &out_dir);
    export_schema(&schema_for!(L1TotalWeightResponse), &out_dir);
    export_schema(&schema_for!(ChurnTrackerResponse), &out_dir);
    export_schema(&schema_for!(RedeemableValidatorRewardsResponse), &out_dir);
}
