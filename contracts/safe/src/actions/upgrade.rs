use soroban_sdk::{Bytes, BytesN, Env};

use crate::actions::UPGRADE_CODE;
use crate::codec::{self, Reader, Writer};
use crate::errors::SafeError;
use crate::executor::{ActionReceipt, Executable};

pub fn encode(env: &Env, wasm_hash: &BytesN<32>) -> Bytes {
    let data = Writer::new(env).write_bytes32(wasm_hash).into_bytes();
    codec::encode_action(env, UPGRADE_CODE, &data)
}

pub fn decode(env: &Env, data: &Bytes) -> Result<BytesN<32>, SafeError> {
    let mut reader = Reader::new(env, data);
    let wasm_hash = reader.read_bytes32()?;
    reader.finish()?;
    Ok(wasm_hash)
}

/// Swaps the Safe's code for an already uploaded wasm. Takes effect once the
/// current invocation returns.
pub(crate) fn execute(env: &Env, executable: Executable) -> Result<ActionReceipt, SafeError> {
    let (data, receipt) = executable.consume(UPGRADE_CODE)?;
    let wasm_hash = decode(env, &data)?;
    env.deployer().update_current_contract_wasm(wasm_hash);
    Ok(receipt)
}
