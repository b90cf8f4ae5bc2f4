use soroban_sdk::{Address, BytesN, Env, Vec};

use crate::errors::SafeError;
use crate::types::{DataKey, Registry, Transaction};

const DAY_IN_LEDGERS: u32 = 17_280;

pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub(crate) const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const PERSISTENT_LIFETIME_THRESHOLD: u32 = PERSISTENT_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub(crate) fn has_registry(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Registry)
}

pub(crate) fn load_registry(env: &Env) -> Result<Registry, SafeError> {
    env.storage()
        .instance()
        .get(&DataKey::Registry)
        .ok_or(SafeError::NotInitialized)
}

pub(crate) fn save_registry(env: &Env, registry: &Registry) {
    env.storage().instance().set(&DataKey::Registry, registry);
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub(crate) fn load_transaction(env: &Env, sequence: u64) -> Result<Transaction, SafeError> {
    env.storage()
        .persistent()
        .get(&DataKey::Transaction(sequence))
        .ok_or(SafeError::TransactionNotFound)
}

pub(crate) fn save_transaction(env: &Env, transaction: &Transaction) {
    let key = DataKey::Transaction(transaction.sequence_number);
    env.storage().persistent().set(&key, transaction);
    bump(env, &key);
}

pub(crate) fn resource_claim(env: &Env, resource: &BytesN<32>) -> Option<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::ResourceLock(resource.clone()))
}

pub(crate) fn set_resource_claim(env: &Env, resource: &BytesN<32>, sequence: u64) {
    let key = DataKey::ResourceLock(resource.clone());
    env.storage().persistent().set(&key, &sequence);
    bump(env, &key);
}

pub(crate) fn remove_resource_claim(env: &Env, resource: &BytesN<32>) {
    env.storage()
        .persistent()
        .remove(&DataKey::ResourceLock(resource.clone()));
}

pub(crate) fn lock_set(env: &Env, sequence: u64) -> Option<Vec<BytesN<32>>> {
    env.storage().persistent().get(&DataKey::LockSet(sequence))
}

pub(crate) fn set_lock_set(env: &Env, sequence: u64, resources: &Vec<BytesN<32>>) {
    let key = DataKey::LockSet(sequence);
    env.storage().persistent().set(&key, resources);
    bump(env, &key);
}

pub(crate) fn remove_lock_set(env: &Env, sequence: u64) {
    env.storage().persistent().remove(&DataKey::LockSet(sequence));
}

pub(crate) fn object_holder(env: &Env, object_id: &BytesN<32>) -> Option<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::Object(object_id.clone()))
}

pub(crate) fn set_object_holder(env: &Env, object_id: &BytesN<32>, holder: &Address) {
    let key = DataKey::Object(object_id.clone());
    env.storage().persistent().set(&key, holder);
    bump(env, &key);
}

pub(crate) fn vote_count(env: &Env, owner: &Address) -> u64 {
    env.storage()
        .persistent()
        .get(&DataKey::VoteCount(owner.clone()))
        .unwrap_or(0u64)
}

pub(crate) fn increment_vote_count(env: &Env, owner: &Address) {
    let key = DataKey::VoteCount(owner.clone());
    let count = vote_count(env, owner).saturating_add(1);
    env.storage().persistent().set(&key, &count);
    bump(env, &key);
}

fn bump(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}
