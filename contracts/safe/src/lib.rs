#![no_std]

pub mod actions;
pub mod capsule;
pub mod codec;
pub mod errors;
pub mod events;
pub mod executor;
pub mod locks;
pub mod registry;
mod safe;
mod storage;
pub mod transaction;
pub mod types;


pub use crate::errors::SafeError;
pub use crate::safe::{SafeContract, SafeContractClient};
