use soroban_sdk::{Address, Bytes, Env};

use crate::actions::{ADD_OWNER, REMOVE_OWNER, SET_EXECUTION_DELAY, SET_THRESHOLD};
use crate::codec::{self, Reader, Writer};
use crate::errors::SafeError;
use crate::events::{
    ExecutionDelayChanged, OwnerAdded, OwnerRemoved, ThresholdChanged, TransactionsInvalidated,
};
use crate::executor::{ActionReceipt, Executable};
use crate::registry::MAX_EXECUTION_DELAY_MS;
use crate::types::Registry;

const CONFIG_KINDS: [u64; 4] = [ADD_OWNER, REMOVE_OWNER, SET_THRESHOLD, SET_EXECUTION_DELAY];

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigAction {
    AddOwner(Address),
    RemoveOwner(Address),
    SetThreshold(u64),
    SetExecutionDelay(u64),
}

pub fn add_owner(env: &Env, owner: &Address) -> Bytes {
    let data = Writer::new(env).write_xdr(owner.clone()).into_bytes();
    codec::encode_action(env, ADD_OWNER, &data)
}

pub fn remove_owner(env: &Env, owner: &Address) -> Bytes {
    let data = Writer::new(env).write_xdr(owner.clone()).into_bytes();
    codec::encode_action(env, REMOVE_OWNER, &data)
}

pub fn set_threshold(env: &Env, threshold: u64) -> Bytes {
    let data = Writer::new(env).write_u64(threshold).into_bytes();
    codec::encode_action(env, SET_THRESHOLD, &data)
}

pub fn set_execution_delay(env: &Env, execution_delay: u64) -> Bytes {
    let data = Writer::new(env).write_u64(execution_delay).into_bytes();
    codec::encode_action(env, SET_EXECUTION_DELAY, &data)
}

pub fn decode(env: &Env, tag: u64, data: &Bytes) -> Result<ConfigAction, SafeError> {
    let mut reader = Reader::new(env, data);
    let action = match tag {
        ADD_OWNER => ConfigAction::AddOwner(reader.read_xdr()?),
        REMOVE_OWNER => ConfigAction::RemoveOwner(reader.read_xdr()?),
        SET_THRESHOLD => ConfigAction::SetThreshold(reader.read_u64()?),
        SET_EXECUTION_DELAY => {
            let delay = reader.read_u64()?;
            if delay > MAX_EXECUTION_DELAY_MS {
                return Err(SafeError::DelayOutOfRange);
            }
            ConfigAction::SetExecutionDelay(delay)
        }
        _ => return Err(SafeError::ActionKindMismatch),
    };
    reader.finish()?;
    Ok(action)
}

/// Applies one config sub-action and voids every transaction proposed
/// before it.
pub(crate) fn execute(
    env: &Env,
    registry: &mut Registry,
    executable: Executable,
) -> Result<ActionReceipt, SafeError> {
    let (tag, data, receipt) = executable.consume_any(&CONFIG_KINDS)?;

    match decode(env, tag, &data)? {
        ConfigAction::AddOwner(owner) => {
            registry.add_owner(owner.clone())?;
            OwnerAdded { owner }.publish(env);
        }
        ConfigAction::RemoveOwner(owner) => {
            registry.remove_owner(&owner)?;
            OwnerRemoved {
                owner,
                threshold: registry.threshold,
            }
            .publish(env);
        }
        ConfigAction::SetThreshold(threshold) => {
            registry.set_threshold(threshold)?;
            ThresholdChanged {
                threshold: registry.threshold,
            }
            .publish(env);
        }
        ConfigAction::SetExecutionDelay(execution_delay) => {
            registry.set_execution_delay(execution_delay)?;
            ExecutionDelayChanged { execution_delay }.publish(env);
        }
    }

    registry.invalidate_pending();
    TransactionsInvalidated {
        stale_index: registry.stale_index,
    }
    .publish(env);
    Ok(receipt)
}
