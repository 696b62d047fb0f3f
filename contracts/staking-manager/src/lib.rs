pub mod contract;
pub mod error;
pub mod events;
pub mod msg;
#[cfg(test)]
mod multitest;
pub mod state;

pub use error::ContractError;
