pub use validator_manager_core::ContractError;
