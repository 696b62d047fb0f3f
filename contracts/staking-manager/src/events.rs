use cosmwasm_std::{Event, Uint128};
use warp_codec::Id32;

fn hex(id: &Id32) -> String {
    id.as_bytes().iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn registered_validator(validation_id: &Id32, owner: &str, stake_amount: Uint128) -> Event {
    Event::new("registered_validator")
        .add_attribute("validation_id", hex(validation_id))
        .add_attribute("owner", owner)
        .add_attribute("stake_amount", stake_amount.to_string())
}

pub fn initiated_delegator_registration(
    delegation_id: &Id32,
    validation_id: &Id32,
    delegator: &str,
    nonce: u64,
    delegator_weight: u64,
) -> Event {
    Event::new("initiated_delegator_registration")
        .add_attribute("delegation_id", hex(delegation_id))
        .add_attribute("validation_id", hex(validation_id))
        .add_attribute("delegator", delegator)
        .add_attribute("nonce", nonce.to_string())
        .add_attribute("delegator_weight", delegator_weight.to_string())
}

pub fn completed_delegator_registration(delegation_id: &Id32, validation_id: &Id32, start_time: u64) -> Event {
    Event::new("completed_delegator_registration")
        .add_attribute("delegation_id", hex(delegation_id))
        .add_attribute("validation_id", hex(validation_id))
        .add_attribute("start_time", start_time.to_string())
}

pub fn initiated_delegator_removal(delegation_id: &Id32, validation_id: &Id32) -> Event {
    Event::new("initiated_delegator_removal")
        .add_attribute("delegation_id", hex(delegation_id))
        .add_attribute("validation_id", hex(validation_id))
}

pub fn completed_delegator_removal(
    delegation_id: &Id32,
    validation_id: &Id32,
    delegator_reward: Uint128,
    validator_fee: Uint128,
) -> Event {
    Event::new("completed_delegator_removal")
        .add_attribute("delegation_id", hex(delegation_id))
        .add_attribute("validation_id", hex(validation_id))
        .add_attribute("delegator_reward", delegator_reward.to_string())
        .add_attribute("validator_fee", validator_fee.to_string())
}

pub fn finalized_validator_exit(validation_id: &Id32, locked_value: Uint128, reward: Uint128) -> Event {
    Event::new("finalized_validator_exit")
        .add_attribute("validation_id", hex(validation_id))
        .add_attribute("locked_value", locked_value.to_string())
        .add_attribute("reward", reward.to_string())
}

pub fn submitted_uptime_proof(validation_id: &Id32, uptime_seconds: u64) -> Event {
    Event::new("submitted_uptime_proof")
        .add_attribute("validation_id", hex(validation_id))
        .add_attribute("uptime_seconds", uptime_seconds.to_string())
}

pub fn claimed_delegation_fees(validation_id: &Id32, amount: Uint128) -> Event {
    Event::new("claimed_delegation_fees")
        .add_attribute("validation_id", hex(validation_id))
        .add_attribute("amount", amount.to_string())
}

pub fn changed_reward_recipient(subject: &str, id: &Id32, new_recipient: &str) -> Event {
    Event::new("changed_reward_recipient")
        .add_attribute("subject", subject)
        .add_attribute("id", hex(id))
        .add_attribute("new_recipient", new_recipient)
}
