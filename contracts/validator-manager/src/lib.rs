pub mod contract;
pub mod error;
pub mod msg;
#[cfg(test)]
mod multitest;

pub use error::ContractError;
