use soroban_sdk::{token, Address, Bytes, Env};

use crate::actions::COIN_TRANSFER;
use crate::codec::{self, Reader, Writer};
use crate::errors::SafeError;
use crate::executor::{ActionReceipt, Executable};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CoinTransfer {
    pub token: Address,
    pub recipient: Address,
    pub amount: i128,
}

pub fn encode(env: &Env, token: &Address, recipient: &Address, amount: i128) -> Bytes {
    let data = Writer::new(env)
        .write_xdr(token.clone())
        .write_xdr(recipient.clone())
        .write_i128(amount)
        .into_bytes();
    codec::encode_action(env, COIN_TRANSFER, &data)
}

pub fn decode(env: &Env, data: &Bytes) -> Result<CoinTransfer, SafeError> {
    let mut reader = Reader::new(env, data);
    let transfer = CoinTransfer {
        token: reader.read_xdr()?,
        recipient: reader.read_xdr()?,
        amount: reader.read_i128()?,
    };
    reader.finish()?;
    if transfer.amount <= 0 {
        return Err(SafeError::InvalidPayload);
    }
    Ok(transfer)
}

/// Pays `amount` of `token` from the Safe's balance to the recipient.
pub(crate) fn execute(env: &Env, executable: Executable) -> Result<ActionReceipt, SafeError> {
    let safe = executable.safe().clone();
    let (data, receipt) = executable.consume(COIN_TRANSFER)?;
    let transfer = decode(env, &data)?;

    let token_client = token::Client::new(env, &transfer.token);
    token_client.transfer(&safe, &transfer.recipient, &transfer.amount);
    Ok(receipt)
}
