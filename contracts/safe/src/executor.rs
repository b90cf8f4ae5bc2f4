//! Sequential execution of an approved transaction's payload.
//!
//! An `Execution` walks the payload left to right, minting one `Executable`
//! per action. Each `Executable` must be consumed by exactly one handler,
//! which hands back an `ActionReceipt`; the session completes only once every
//! action has been minted and its receipt recorded in order.

use soroban_sdk::xdr::ToXdr;
use soroban_sdk::{log, Address, Bytes, BytesN, Env};

use crate::codec;
use crate::errors::SafeError;
use crate::types::{Registry, Transaction, TransactionStatus};

pub(crate) fn now_ms(env: &Env) -> u64 {
    env.ledger().timestamp().saturating_mul(1_000)
}

/// Single-use capability for one decoded action.
///
/// Dropping an `Executable` that was never consumed panics, aborting the
/// enclosing invocation.
pub struct Executable {
    safe: Address,
    sequence_number: u64,
    index: u32,
    kind: u64,
    data: Bytes,
    spent: bool,
}

/// Evidence that the action at `index` of a transaction was consumed.
#[must_use]
pub struct ActionReceipt {
    sequence_number: u64,
    index: u32,
}

impl Executable {
    pub fn safe(&self) -> &Address {
        &self.safe
    }

    pub fn kind(&self) -> u64 {
        self.kind
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    /// Consumes the capability on behalf of the handler for `kind` and
    /// returns the action data along with the receipt. A kind mismatch still
    /// burns the capability.
    pub fn consume(self, kind: u64) -> Result<(Bytes, ActionReceipt), SafeError> {
        let (_, data, receipt) = self.consume_any(&[kind])?;
        Ok((data, receipt))
    }

    /// Like `consume`, for handlers that serve a family of kinds.
    pub fn consume_any(
        mut self,
        kinds: &[u64],
    ) -> Result<(u64, Bytes, ActionReceipt), SafeError> {
        self.spent = true;
        if !kinds.contains(&self.kind) {
            return Err(SafeError::ActionKindMismatch);
        }
        let receipt = ActionReceipt {
            sequence_number: self.sequence_number,
            index: self.index,
        };
        Ok((self.kind, self.data.clone(), receipt))
    }

    /// Burns a capability that no handler accepts.
    pub(crate) fn refuse(mut self) -> SafeError {
        self.spent = true;
        SafeError::UnknownActionKind
    }
}

impl Drop for Executable {
    fn drop(&mut self) {
        if !self.spent {
            panic!("executable dropped without being consumed");
        }
    }
}

pub struct Execution {
    safe: Address,
    executor: Address,
    sequence_number: u64,
    next_index: u32,
    consumed: u32,
}

impl Execution {
    pub fn begin(
        env: &Env,
        safe: Address,
        registry: &Registry,
        transaction: &Transaction,
        executor: &Address,
    ) -> Result<Self, SafeError> {
        registry.require_owner(executor)?;
        transaction.require_fresh(registry)?;
        if transaction.status != TransactionStatus::Approved {
            return Err(SafeError::TransactionNotApproved);
        }
        if now_ms(env) < transaction.ready_at(registry) {
            return Err(SafeError::DelayNotExpired);
        }

        log!(
            env,
            "execution started",
            transaction.sequence_number,
            transaction.payload.len()
        );
        Ok(Execution {
            safe,
            executor: executor.clone(),
            sequence_number: transaction.sequence_number,
            next_index: 0,
            consumed: 0,
        })
    }

    pub fn has_next(&self, transaction: &Transaction) -> bool {
        self.next_index < transaction.payload.len()
    }

    pub fn next_executable(
        &mut self,
        env: &Env,
        transaction: &Transaction,
    ) -> Result<Executable, SafeError> {
        self.require_match(transaction)?;
        let record = transaction
            .payload
            .get(self.next_index)
            .ok_or(SafeError::ExecutionComplete)?;
        let (kind, data) = codec::decode_action(env, &record)?;

        let executable = Executable {
            safe: self.safe.clone(),
            sequence_number: self.sequence_number,
            index: self.next_index,
            kind,
            data,
            spent: false,
        };
        self.next_index += 1;
        Ok(executable)
    }

    /// Accepts consumption evidence. Receipts must arrive in payload order.
    pub fn record(&mut self, receipt: ActionReceipt) -> Result<(), SafeError> {
        if receipt.sequence_number != self.sequence_number {
            return Err(SafeError::TransactionMismatch);
        }
        if receipt.index != self.consumed {
            return Err(SafeError::OutOfOrderConsumption);
        }
        self.consumed += 1;
        Ok(())
    }

    /// Feeds every remaining action, in order, to `handler` and records the
    /// receipts it returns. Returns the number of actions handled.
    pub fn all_executables<F>(
        &mut self,
        env: &Env,
        transaction: &Transaction,
        mut handler: F,
    ) -> Result<u32, SafeError>
    where
        F: FnMut(Executable) -> Result<ActionReceipt, SafeError>,
    {
        let mut handled = 0u32;
        while self.has_next(transaction) {
            let executable = self.next_executable(env, transaction)?;
            log!(env, "dispatching action", executable.index(), executable.kind());
            let receipt = handler(executable)?;
            self.record(receipt)?;
            handled += 1;
        }
        Ok(handled)
    }

    /// Closes the session and marks the transaction executed. Returns the
    /// execution hash stamped into the transaction.
    pub fn complete(
        self,
        env: &Env,
        transaction: &mut Transaction,
    ) -> Result<BytesN<32>, SafeError> {
        self.require_match(transaction)?;
        let total = transaction.payload.len();
        if self.next_index != total || self.consumed != total {
            return Err(SafeError::ExecutionIncomplete);
        }

        let now = now_ms(env);
        let evidence = (
            self.safe.clone(),
            self.sequence_number,
            env.ledger().sequence(),
            now,
            self.executor.clone(),
        )
            .to_xdr(env);
        let hash = env.crypto().sha256(&evidence).to_bytes();

        transaction.confirm_execution(self.executor, hash.clone(), now);
        log!(env, "execution complete", self.sequence_number);
        Ok(hash)
    }

    fn require_match(&self, transaction: &Transaction) -> Result<(), SafeError> {
        if transaction.sequence_number != self.sequence_number {
            return Err(SafeError::TransactionMismatch);
        }
        Ok(())
    }
}
