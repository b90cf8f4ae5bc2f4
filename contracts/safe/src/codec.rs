//! Payload encoding shared by the execution engine and the action handlers.
//!
//! Scalars are fixed-width little-endian, `bytes` are a `u32` length followed
//! by the raw bytes, and host values (addresses, symbols, argument vectors)
//! travel as `bytes` holding their XDR form. Every decode must consume its
//! input exactly.

use soroban_sdk::xdr::{FromXdr, ToXdr};
use soroban_sdk::{Bytes, BytesN, Env};

use crate::errors::SafeError;

pub struct Reader<'a> {
    env: &'a Env,
    bytes: &'a Bytes,
    offset: u32,
}

impl<'a> Reader<'a> {
    pub fn new(env: &'a Env, bytes: &'a Bytes) -> Self {
        Reader {
            env,
            bytes,
            offset: 0,
        }
    }

    fn take(&mut self, len: u32) -> Result<Bytes, SafeError> {
        let end = self
            .offset
            .checked_add(len)
            .ok_or(SafeError::MalformedPayload)?;
        if end > self.bytes.len() {
            return Err(SafeError::MalformedPayload);
        }
        let chunk = self.bytes.slice(self.offset..end);
        self.offset = end;
        Ok(chunk)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], SafeError> {
        let chunk = self.take(N as u32)?;
        let mut buf = [0u8; N];
        chunk.copy_into_slice(&mut buf);
        Ok(buf)
    }

    pub fn read_u32(&mut self) -> Result<u32, SafeError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, SafeError> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    pub fn read_i128(&mut self) -> Result<i128, SafeError> {
        Ok(i128::from_le_bytes(self.take_array()?))
    }

    pub fn read_bytes(&mut self) -> Result<Bytes, SafeError> {
        let len = self.read_u32()?;
        self.take(len)
    }

    pub fn read_bytes32(&mut self) -> Result<BytesN<32>, SafeError> {
        let raw: [u8; 32] = self.take_array()?;
        Ok(BytesN::from_array(self.env, &raw))
    }

    pub fn read_xdr<T: FromXdr>(&mut self) -> Result<T, SafeError> {
        let raw = self.read_bytes()?;
        T::from_xdr(self.env, &raw).map_err(|_| SafeError::MalformedPayload)
    }

    pub fn finish(self) -> Result<(), SafeError> {
        if self.offset != self.bytes.len() {
            return Err(SafeError::TrailingData);
        }
        Ok(())
    }
}

pub struct Writer<'a> {
    env: &'a Env,
    bytes: Bytes,
}

impl<'a> Writer<'a> {
    pub fn new(env: &'a Env) -> Self {
        Writer {
            env,
            bytes: Bytes::new(env),
        }
    }

    pub fn write_u32(mut self, value: u32) -> Self {
        self.bytes.extend_from_array(&value.to_le_bytes());
        self
    }

    pub fn write_u64(mut self, value: u64) -> Self {
        self.bytes.extend_from_array(&value.to_le_bytes());
        self
    }

    pub fn write_i128(mut self, value: i128) -> Self {
        self.bytes.extend_from_array(&value.to_le_bytes());
        self
    }

    pub fn write_bytes(self, value: &Bytes) -> Self {
        let mut this = self.write_u32(value.len());
        this.bytes.append(value);
        this
    }

    pub fn write_bytes32(mut self, value: &BytesN<32>) -> Self {
        self.bytes.extend_from_array(&value.to_array());
        self
    }

    pub fn write_xdr<T: ToXdr>(self, value: T) -> Self {
        let raw = value.to_xdr(self.env);
        self.write_bytes(&raw)
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

/// Frames one action record as `[u64 kind][bytes data]`.
pub fn encode_action(env: &Env, kind: u64, data: &Bytes) -> Bytes {
    Writer::new(env)
        .write_u64(kind)
        .write_bytes(data)
        .into_bytes()
}

pub fn decode_action(env: &Env, record: &Bytes) -> Result<(u64, Bytes), SafeError> {
    let mut reader = Reader::new(env, record);
    let kind = reader.read_u64()?;
    let data = reader.read_bytes()?;
    reader.finish()?;
    Ok((kind, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::Address;

    #[test]
    fn action_frame_layout() {
        let env = Env::default();
        let data = Bytes::from_array(&env, &[7, 8, 9]);
        let record = encode_action(&env, 3, &data);

        assert_eq!(record.len(), 8 + 4 + 3);
        assert_eq!(record.get(0), Some(3));
        assert_eq!(record.get(8), Some(3));
        assert_eq!(decode_action(&env, &record), Ok((3, data)));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let env = Env::default();
        let mut record = encode_action(&env, 1, &Bytes::new(&env));
        record.push_back(0);
        assert_eq!(decode_action(&env, &record), Err(SafeError::TrailingData));
    }

    #[test]
    fn truncated_input_is_malformed() {
        let env = Env::default();
        let record = encode_action(&env, 1, &Bytes::from_array(&env, &[1, 2, 3, 4]));
        let truncated = record.slice(0..record.len() - 1);
        assert_eq!(
            decode_action(&env, &truncated),
            Err(SafeError::MalformedPayload)
        );
        assert_eq!(
            decode_action(&env, &Bytes::from_array(&env, &[1, 2])),
            Err(SafeError::MalformedPayload)
        );
    }

    #[test]
    fn mixed_fields_decode_in_order() {
        let env = Env::default();
        let who = Address::generate(&env);
        let id = BytesN::from_array(&env, &[5u8; 32]);
        let bytes = Writer::new(&env)
            .write_xdr(who.clone())
            .write_bytes32(&id)
            .write_i128(-42)
            .into_bytes();

        let mut reader = Reader::new(&env, &bytes);
        assert_eq!(reader.read_xdr::<Address>(), Ok(who));
        assert_eq!(reader.read_bytes32(), Ok(id));
        assert_eq!(reader.read_i128(), Ok(-42));
        assert_eq!(reader.finish(), Ok(()));
    }
}
