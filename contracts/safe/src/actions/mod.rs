//! Action handlers. Each handler consumes exactly one `Executable`, decodes
//! its data and applies the effect.
//!
//! Tags form a single canonical enumeration; no two actions share a tag.

use soroban_sdk::{Bytes, BytesN, Env, Vec};

use crate::codec;
use crate::errors::SafeError;
use crate::executor::{ActionReceipt, Executable};
use crate::types::{Registry, TransactionKind};

pub mod call;
pub mod coin;
pub mod config;
pub mod object;
pub mod upgrade;

pub const ADD_OWNER: u64 = 1;
pub const REMOVE_OWNER: u64 = 2;
pub const SET_THRESHOLD: u64 = 3;
pub const SET_EXECUTION_DELAY: u64 = 4;
pub const COIN_TRANSFER: u64 = 10;
pub const OBJECT_TRANSFER: u64 = 11;
pub const CONTRACT_CALL: u64 = 12;
pub const UPGRADE_CODE: u64 = 13;

pub fn transaction_kind(tag: u64) -> Result<TransactionKind, SafeError> {
    match tag {
        ADD_OWNER | REMOVE_OWNER | SET_THRESHOLD | SET_EXECUTION_DELAY => {
            Ok(TransactionKind::Config)
        }
        COIN_TRANSFER => Ok(TransactionKind::CoinTransfer),
        OBJECT_TRANSFER => Ok(TransactionKind::ObjectTransfer),
        CONTRACT_CALL => Ok(TransactionKind::Programmable),
        UPGRADE_CODE => Ok(TransactionKind::Upgrade),
        _ => Err(SafeError::UnknownActionKind),
    }
}

/// Checks that every record of `payload` decodes and belongs to `kind`.
/// Returns the external resources the payload references.
pub(crate) fn validate(
    env: &Env,
    kind: TransactionKind,
    payload: &Vec<Bytes>,
) -> Result<Vec<BytesN<32>>, SafeError> {
    if payload.is_empty() {
        return Err(SafeError::InvalidPayload);
    }

    let mut resources = Vec::new(env);
    for record in payload.iter() {
        let (tag, data) = codec::decode_action(env, &record)?;
        if transaction_kind(tag)? != kind {
            return Err(SafeError::InvalidPayload);
        }
        match tag {
            COIN_TRANSFER => {
                coin::decode(env, &data)?;
            }
            OBJECT_TRANSFER => {
                let transfer = object::decode(env, &data)?;
                resources.push_back(transfer.object_id);
            }
            CONTRACT_CALL => {
                let call = call::decode(env, &data)?;
                resources.append(&call.borrowed);
            }
            UPGRADE_CODE => {
                upgrade::decode(env, &data)?;
            }
            _ => {
                config::decode(env, tag, &data)?;
            }
        }
    }
    Ok(resources)
}

pub(crate) fn dispatch(
    env: &Env,
    registry: &mut Registry,
    executable: Executable,
) -> Result<ActionReceipt, SafeError> {
    match executable.kind() {
        ADD_OWNER | REMOVE_OWNER | SET_THRESHOLD | SET_EXECUTION_DELAY => {
            config::execute(env, registry, executable)
        }
        COIN_TRANSFER => coin::execute(env, executable),
        OBJECT_TRANSFER => object::execute(env, executable),
        CONTRACT_CALL => call::execute(env, executable),
        UPGRADE_CODE => upgrade::execute(env, executable),
        _ => Err(executable.refuse()),
    }
}
