use soroban_sdk::{Address, Bytes, BytesN, Env, Symbol, Val, Vec};

use crate::actions::CONTRACT_CALL;
use crate::capsule::Borrowable;
use crate::codec::{self, Reader, Writer};
use crate::errors::SafeError;
use crate::executor::{ActionReceipt, Executable};
use crate::storage;

/// Arbitrary cross-contract call made with the Safe as the invoker, lending
/// the listed custody objects to the callee for the duration of the call.
#[derive(Clone, Debug)]
pub struct ContractCall {
    pub contract: Address,
    pub function: Symbol,
    pub args: Vec<Val>,
    pub borrowed: Vec<BytesN<32>>,
}

pub fn encode(
    env: &Env,
    contract: &Address,
    function: &Symbol,
    args: &Vec<Val>,
    borrowed: &Vec<BytesN<32>>,
) -> Bytes {
    let mut writer = Writer::new(env)
        .write_xdr(contract.clone())
        .write_xdr(function.clone())
        .write_xdr(args.clone())
        .write_u32(borrowed.len());
    for object_id in borrowed.iter() {
        writer = writer.write_bytes32(&object_id);
    }
    codec::encode_action(env, CONTRACT_CALL, &writer.into_bytes())
}

pub fn decode(env: &Env, data: &Bytes) -> Result<ContractCall, SafeError> {
    let mut reader = Reader::new(env, data);
    let contract = reader.read_xdr()?;
    let function = reader.read_xdr()?;
    let args = reader.read_xdr()?;
    let count = reader.read_u32()?;
    let mut borrowed = Vec::new(env);
    for _ in 0..count {
        borrowed.push_back(reader.read_bytes32()?);
    }
    reader.finish()?;
    Ok(ContractCall {
        contract,
        function,
        args,
        borrowed,
    })
}

pub(crate) fn execute(env: &Env, executable: Executable) -> Result<ActionReceipt, SafeError> {
    let safe = executable.safe().clone();
    let sequence_number = executable.sequence_number();
    let (data, receipt) = executable.consume(CONTRACT_CALL)?;
    let call = decode(env, &data)?;

    let claimed = storage::lock_set(env, sequence_number).unwrap_or(Vec::new(env));
    let mut seen: Vec<BytesN<32>> = Vec::new(env);
    for object_id in call.borrowed.iter() {
        if !claimed.contains(&object_id) || seen.contains(&object_id) {
            return Err(SafeError::NotBorrowable);
        }
        seen.push_back(object_id.clone());
        if storage::object_holder(env, &object_id).as_ref() != Some(&safe) {
            return Err(SafeError::ObjectNotInCustody);
        }
    }

    let mut capsule = Borrowable::new(env, claimed);
    for object_id in call.borrowed.iter() {
        capsule.borrow(&object_id)?;
        storage::set_object_holder(env, &object_id, &call.contract);
    }

    env.invoke_contract::<Val>(&call.contract, &call.function, call.args.clone());

    for object_id in call.borrowed.iter() {
        capsule.put_back(object_id.clone())?;
        storage::set_object_holder(env, &object_id, &safe);
    }
    capsule.destroy()?;
    Ok(receipt)
}
