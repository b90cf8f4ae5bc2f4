use soroban_sdk::{contract, contractimpl, Address, Bytes, BytesN, Env, Map, String, Vec};

use crate::actions;
use crate::errors::SafeError;
use crate::events::{
    ObjectDeposited, SafeInitialized, StatusChanged, TransactionExecuted, TransactionProposed,
    Vote, VoteCast,
};
use crate::executor::{now_ms, Execution};
use crate::locks;
use crate::storage;
use crate::types::{Registry, Transaction, TransactionKind, TransactionStatus};

#[contract]
pub struct SafeContract;

#[contractimpl]
impl SafeContract {
    pub fn initialize(
        env: Env,
        creator: Address,
        owners: Vec<Address>,
        threshold: u32,
        execution_delay: u64,
    ) -> Result<(), SafeError> {
        if storage::has_registry(&env) {
            return Err(SafeError::AlreadyInitialized);
        }
        creator.require_auth();

        let registry = Registry::create(&creator, owners, threshold, execution_delay)?;
        storage::save_registry(&env, &registry);

        SafeInitialized {
            creator,
            owners: registry.owners,
            threshold,
            execution_delay,
        }
        .publish(&env);
        Ok(())
    }

    /// Records a new transaction and claims every external resource its
    /// payload references. Returns the assigned sequence number.
    pub fn propose(
        env: Env,
        proposer: Address,
        kind: TransactionKind,
        payload: Vec<Bytes>,
        display: Map<String, String>,
    ) -> Result<u64, SafeError> {
        proposer.require_auth();
        let mut registry = storage::load_registry(&env)?;
        registry.require_owner(&proposer)?;

        let resources = actions::validate(&env, kind, &payload)?;
        let sequence_number = registry.next_sequence();
        let action_count = payload.len();
        let transaction = Transaction::new(
            &env,
            sequence_number,
            kind,
            payload,
            proposer.clone(),
            registry.threshold,
            now_ms(&env),
            display,
        );

        if !resources.is_empty() {
            locks::lock(&env, &registry, sequence_number, &resources)?;
        }
        storage::save_transaction(&env, &transaction);
        storage::save_registry(&env, &registry);

        TransactionProposed {
            sequence_number,
            proposer,
            kind,
            actions: action_count,
        }
        .publish(&env);
        Ok(sequence_number)
    }

    pub fn approve(
        env: Env,
        owner: Address,
        sequence_number: u64,
    ) -> Result<TransactionStatus, SafeError> {
        Self::vote(&env, owner, sequence_number, Vote::Approve)
    }

    pub fn reject(
        env: Env,
        owner: Address,
        sequence_number: u64,
    ) -> Result<TransactionStatus, SafeError> {
        Self::vote(&env, owner, sequence_number, Vote::Reject)
    }

    pub fn cancel(
        env: Env,
        owner: Address,
        sequence_number: u64,
    ) -> Result<TransactionStatus, SafeError> {
        Self::vote(&env, owner, sequence_number, Vote::Cancel)
    }

    /// Runs every action of an approved transaction in order and marks it
    /// executed. Returns the execution hash.
    pub fn execute(
        env: Env,
        executor: Address,
        sequence_number: u64,
    ) -> Result<BytesN<32>, SafeError> {
        executor.require_auth();
        let mut registry = storage::load_registry(&env)?;
        let mut transaction = storage::load_transaction(&env, sequence_number)?;

        let mut execution = Execution::begin(
            &env,
            env.current_contract_address(),
            &registry,
            &transaction,
            &executor,
        )?;
        execution.all_executables(&env, &transaction, |executable| {
            actions::dispatch(&env, &mut registry, executable)
        })?;
        let execution_hash = execution.complete(&env, &mut transaction)?;

        locks::release(&env, sequence_number)?;
        storage::save_registry(&env, &registry);
        storage::save_transaction(&env, &transaction);

        StatusChanged {
            sequence_number,
            status: transaction.status,
        }
        .publish(&env);
        TransactionExecuted {
            sequence_number,
            executor,
            execution_hash: execution_hash.clone(),
        }
        .publish(&env);
        Ok(execution_hash)
    }

    /// Drops the claims of a transaction that can no longer execute.
    pub fn release_locks(
        env: Env,
        caller: Address,
        sequence_number: u64,
    ) -> Result<Vec<BytesN<32>>, SafeError> {
        caller.require_auth();
        let registry = storage::load_registry(&env)?;
        registry.require_owner(&caller)?;

        let transaction = storage::load_transaction(&env, sequence_number)?;
        if transaction.is_live() && !registry.is_stale(sequence_number) {
            return Err(SafeError::TransactionStillLive);
        }
        locks::unlock(&env, sequence_number)
    }

    /// Places an external object in the Safe's custody.
    pub fn deposit_object(
        env: Env,
        depositor: Address,
        object_id: BytesN<32>,
    ) -> Result<(), SafeError> {
        depositor.require_auth();
        storage::load_registry(&env)?;

        let safe = env.current_contract_address();
        match storage::object_holder(&env, &object_id) {
            Some(holder) if holder == safe => return Err(SafeError::ObjectAlreadyDeposited),
            Some(holder) if holder != depositor => return Err(SafeError::ObjectNotInCustody),
            _ => {}
        }
        storage::set_object_holder(&env, &object_id, &safe);

        ObjectDeposited {
            object_id,
            depositor,
        }
        .publish(&env);
        Ok(())
    }

    pub fn owners(env: Env) -> Result<Vec<Address>, SafeError> {
        Ok(storage::load_registry(&env)?.owners)
    }

    pub fn threshold(env: Env) -> Result<u32, SafeError> {
        Ok(storage::load_registry(&env)?.threshold)
    }

    pub fn execution_delay(env: Env) -> Result<u64, SafeError> {
        Ok(storage::load_registry(&env)?.execution_delay)
    }

    pub fn stale_index(env: Env) -> Result<u64, SafeError> {
        Ok(storage::load_registry(&env)?.stale_index)
    }

    pub fn cutoff(env: Env) -> Result<u32, SafeError> {
        Ok(storage::load_registry(&env)?.cutoff())
    }

    pub fn is_owner(env: Env, id: Address) -> Result<bool, SafeError> {
        Ok(storage::load_registry(&env)?.is_owner(&id))
    }

    pub fn transaction(env: Env, sequence_number: u64) -> Result<Transaction, SafeError> {
        storage::load_transaction(&env, sequence_number)
    }

    pub fn transaction_count(env: Env) -> Result<u64, SafeError> {
        Ok(storage::load_registry(&env)?.transaction_count)
    }

    pub fn is_stale(env: Env, sequence_number: u64) -> Result<bool, SafeError> {
        Ok(storage::load_registry(&env)?.is_stale(sequence_number))
    }

    pub fn is_claimed(env: Env, resource: BytesN<32>) -> Result<bool, SafeError> {
        let registry = storage::load_registry(&env)?;
        Ok(locks::is_claimed(&env, &registry, &resource))
    }

    pub fn is_claimed_by(env: Env, resource: BytesN<32>, sequence_number: u64) -> bool {
        locks::is_claimed_by(&env, &resource, sequence_number)
    }

    pub fn object_holder(env: Env, object_id: BytesN<32>) -> Option<Address> {
        storage::object_holder(&env, &object_id)
    }

    pub fn vote_count(env: Env, owner: Address) -> u64 {
        storage::vote_count(&env, &owner)
    }

    fn vote(
        env: &Env,
        owner: Address,
        sequence_number: u64,
        vote: Vote,
    ) -> Result<TransactionStatus, SafeError> {
        owner.require_auth();
        let registry = storage::load_registry(env)?;
        let mut transaction = storage::load_transaction(env, sequence_number)?;

        let now = now_ms(env);
        let changed = match vote {
            Vote::Approve => transaction.approve(&registry, &owner, now)?,
            Vote::Reject => transaction.reject(&registry, &owner, now)?,
            Vote::Cancel => transaction.cancel(&registry, &owner, now)?,
        };
        storage::increment_vote_count(env, &owner);
        if changed && !transaction.is_live() {
            locks::release(env, sequence_number)?;
        }
        storage::save_transaction(env, &transaction);

        VoteCast {
            sequence_number,
            owner,
            vote,
        }
        .publish(env);
        if changed {
            StatusChanged {
                sequence_number,
                status: transaction.status,
            }
            .publish(env);
        }
        Ok(transaction.status)
    }
}
