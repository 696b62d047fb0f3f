use cosmwasm_std::Event;
use warp_codec::Id32;

fn hex(id: &Id32) -> String {
    id.as_bytes().iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn registered_initial_validator(validation_id: &Id32, node_id: &[u8], weight: u64) -> Event {
    Event::new("registered_initial_validator")
        .add_attribute("validation_id", hex(validation_id))
        .add_attribute("node_id", hex_bytes(node_id))
        .add_attribute("weight", weight.to_string())
}

pub fn initiated_validator_registration(
    validation_id: &Id32,
    node_id: &[u8],
    registration_message_id: &Id32,
    expiry: u64,
    weight: u64,
) -> Event {
    Event::new("initiated_validator_registration")
        .add_attribute("validation_id", hex(validation_id))
        .add_attribute("node_id", hex_bytes(node_id))
        .add_attribute("registration_message_id", hex(registration_message_id))
        .add_attribute("expiry", expiry.to_string())
        .add_attribute("weight", weight.to_string())
}

pub fn completed_validator_registration(validation_id: &Id32, weight: u64, valid: bool) -> Event {
    Event::new("completed_validator_registration")
        .add_attribute("validation_id", hex(validation_id))
        .add_attribute("weight", weight.to_string())
        .add_attribute("valid", valid.to_string())
}

pub fn initiated_validator_removal(
    validation_id: &Id32,
    weight_message_id: &Id32,
    weight: u64,
    end_time: u64,
) -> Event {
    Event::new("initiated_validator_removal")
        .add_attribute("validation_id", hex(validation_id))
        .add_attribute("weight_message_id", hex(weight_message_id))
        .add_attribute("weight", weight.to_string())
        .add_attribute("end_time", end_time.to_string())
}

pub fn completed_validator_removal(validation_id: &Id32) -> Event {
    Event::new("completed_validator_removal").add_attribute("validation_id", hex(validation_id))
}

pub fn initiated_validator_weight_update(
    validation_id: &Id32,
    nonce: u64,
    weight_message_id: &Id32,
    weight: u64,
) -> Event {
    Event::new("initiated_validator_weight_update")
        .add_attribute("validation_id", hex(validation_id))
        .add_attribute("nonce", nonce.to_string())
        .add_attribute("weight_message_id", hex(weight_message_id))
        .add_attribute("weight", weight.to_string())
}

pub fn completed_validator_weight_update(validation_id: &Id32, nonce: u64, weight: u64) -> Event {
    Event::new("completed_validator_weight_update")
        .add_attribute("validation_id", hex(validation_id))
        .add_attribute("nonce", nonce.to_string())
        .add_attribute("weight", weight.to_string())
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
