use soroban_sdk::{Address, Bytes, BytesN, Env, Vec};

use crate::actions::OBJECT_TRANSFER;
use crate::capsule::Removable;
use crate::codec::{self, Reader, Writer};
use crate::errors::SafeError;
use crate::events::ObjectReleased;
use crate::executor::{ActionReceipt, Executable};
use crate::storage;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ObjectTransfer {
    pub object_id: BytesN<32>,
    pub recipient: Address,
}

pub fn encode(env: &Env, object_id: &BytesN<32>, recipient: &Address) -> Bytes {
    let data = Writer::new(env)
        .write_bytes32(object_id)
        .write_xdr(recipient.clone())
        .into_bytes();
    codec::encode_action(env, OBJECT_TRANSFER, &data)
}

pub fn decode(env: &Env, data: &Bytes) -> Result<ObjectTransfer, SafeError> {
    let mut reader = Reader::new(env, data);
    let transfer = ObjectTransfer {
        object_id: reader.read_bytes32()?,
        recipient: reader.read_xdr()?,
    };
    reader.finish()?;
    Ok(transfer)
}

/// Releases a custody object to its recipient. Only objects claimed by the
/// executing transaction are removable.
pub(crate) fn execute(env: &Env, executable: Executable) -> Result<ActionReceipt, SafeError> {
    let safe = executable.safe().clone();
    let sequence_number = executable.sequence_number();
    let (data, receipt) = executable.consume(OBJECT_TRANSFER)?;
    let transfer = decode(env, &data)?;

    if storage::object_holder(env, &transfer.object_id) != Some(safe) {
        return Err(SafeError::ObjectNotInCustody);
    }

    let claimed = storage::lock_set(env, sequence_number).unwrap_or(Vec::new(env));
    let mut removable = Removable::new(claimed);
    let object_id = removable.withdraw(&transfer.object_id)?;

    storage::set_object_holder(env, &object_id, &transfer.recipient);
    ObjectReleased {
        object_id,
        recipient: transfer.recipient,
    }
    .publish(env);
    Ok(receipt)
}
