//! Exclusive claims on external resources by in-flight transactions.
//!
//! Kept as two indexes: resource -> claiming sequence number, and sequence
//! number -> claimed resources. A claim held by a stale transaction no longer
//! blocks anyone and is evicted by the next claimant.

use soroban_sdk::{BytesN, Env, Vec};

use crate::errors::SafeError;
use crate::events::{ResourcesLocked, ResourcesUnlocked};
use crate::storage;
use crate::types::Registry;

pub fn lock(
    env: &Env,
    registry: &Registry,
    sequence_number: u64,
    resources: &Vec<BytesN<32>>,
) -> Result<(), SafeError> {
    if storage::lock_set(env, sequence_number).is_some() {
        return Err(SafeError::DuplicateLockEntry);
    }

    for resource in resources.iter() {
        if let Some(holder) = storage::resource_claim(env, &resource) {
            if holder != sequence_number && !registry.is_stale(holder) {
                return Err(SafeError::ResourceLocked);
            }
        }
    }

    let mut claimed: Vec<BytesN<32>> = Vec::new(env);
    for resource in resources.iter() {
        match storage::resource_claim(env, &resource) {
            Some(holder) if holder == sequence_number => continue,
            Some(holder) => evict(env, holder, &resource),
            None => {}
        }
        storage::set_resource_claim(env, &resource, sequence_number);
        claimed.push_back(resource);
    }
    storage::set_lock_set(env, sequence_number, &claimed);

    ResourcesLocked {
        sequence_number,
        resources: claimed,
    }
    .publish(env);
    Ok(())
}

pub fn unlock(env: &Env, sequence_number: u64) -> Result<Vec<BytesN<32>>, SafeError> {
    let resources = storage::lock_set(env, sequence_number).ok_or(SafeError::LockNotFound)?;
    for resource in resources.iter() {
        if storage::resource_claim(env, &resource) != Some(sequence_number) {
            return Err(SafeError::LockConsistencyError);
        }
    }
    for resource in resources.iter() {
        storage::remove_resource_claim(env, &resource);
    }
    storage::remove_lock_set(env, sequence_number);

    ResourcesUnlocked {
        sequence_number,
        resources: resources.clone(),
    }
    .publish(env);
    Ok(resources)
}

/// Unlocks `sequence_number` if it holds any claims.
pub(crate) fn release(env: &Env, sequence_number: u64) -> Result<(), SafeError> {
    if storage::lock_set(env, sequence_number).is_some() {
        unlock(env, sequence_number)?;
    }
    Ok(())
}

/// True when a live (non-stale) transaction claims `resource`.
pub fn is_claimed(env: &Env, registry: &Registry, resource: &BytesN<32>) -> bool {
    storage::resource_claim(env, resource).is_some_and(|holder| !registry.is_stale(holder))
}

pub fn is_claimed_by(env: &Env, resource: &BytesN<32>, sequence_number: u64) -> bool {
    storage::resource_claim(env, resource) == Some(sequence_number)
}

fn evict(env: &Env, holder: u64, resource: &BytesN<32>) {
    if let Some(mut held) = storage::lock_set(env, holder) {
        if let Some(index) = held.first_index_of(resource) {
            held.remove(index);
        }
        if held.is_empty() {
            storage::remove_lock_set(env, holder);
        } else {
            storage::set_lock_set(env, holder, &held);
        }
    }
    storage::remove_resource_claim(env, resource);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SafeContract;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::{vec, Address};

    fn setup() -> (Env, Address, Registry) {
        let env = Env::default();
        let contract_id = env.register(SafeContract, ());
        let owner = Address::generate(&env);
        let registry = Registry::create(&owner, vec![&env, owner.clone()], 1, 0).unwrap();
        (env, contract_id, registry)
    }

    fn id(env: &Env, byte: u8) -> BytesN<32> {
        BytesN::from_array(env, &[byte; 32])
    }

    #[test]
    fn live_claims_are_exclusive() {
        let (env, contract_id, registry) = setup();
        env.as_contract(&contract_id, || {
            let x = id(&env, 1);
            let y = id(&env, 2);

            lock(&env, &registry, 7, &vec![&env, x.clone()]).unwrap();
            assert!(is_claimed(&env, &registry, &x));
            assert!(is_claimed_by(&env, &x, 7));
            assert!(!is_claimed(&env, &registry, &y));

            assert_eq!(
                lock(&env, &registry, 8, &vec![&env, y.clone(), x.clone()]),
                Err(SafeError::ResourceLocked)
            );
            assert_eq!(
                lock(&env, &registry, 7, &vec![&env, y.clone()]),
                Err(SafeError::DuplicateLockEntry)
            );

            assert_eq!(unlock(&env, 7), Ok(vec![&env, x.clone()]));
            assert!(!is_claimed(&env, &registry, &x));
            lock(&env, &registry, 8, &vec![&env, y.clone(), x.clone()]).unwrap();
            assert!(is_claimed_by(&env, &x, 8));
        });
    }

    #[test]
    fn stale_claims_are_overwritten() {
        let (env, contract_id, mut registry) = setup();
        env.as_contract(&contract_id, || {
            let x = id(&env, 1);
            let y = id(&env, 2);
            let old = registry.next_sequence();
            lock(&env, &registry, old, &vec![&env, x.clone(), y.clone()]).unwrap();

            registry.invalidate_pending();
            let new = registry.next_sequence();
            assert!(!is_claimed(&env, &registry, &x));

            lock(&env, &registry, new, &vec![&env, x.clone()]).unwrap();
            assert!(is_claimed_by(&env, &x, new));

            // The stale holder keeps only what was not taken from it.
            assert_eq!(unlock(&env, old), Ok(vec![&env, y.clone()]));
            assert_eq!(unlock(&env, new), Ok(vec![&env, x]));
        });
    }

    #[test]
    fn unlock_requires_a_claim_set() {
        let (env, contract_id, registry) = setup();
        env.as_contract(&contract_id, || {
            assert_eq!(unlock(&env, 3), Err(SafeError::LockNotFound));
            assert_eq!(release(&env, 3), Ok(()));

            let x = id(&env, 9);
            lock(&env, &registry, 3, &vec![&env, x.clone(), x.clone()]).unwrap();
            assert_eq!(storage::lock_set(&env, 3), Some(vec![&env, x]));
        });
    }

    #[test]
    fn corrupted_index_is_detected() {
        let (env, contract_id, registry) = setup();
        env.as_contract(&contract_id, || {
            let x = id(&env, 4);
            lock(&env, &registry, 5, &vec![&env, x.clone()]).unwrap();
            storage::set_resource_claim(&env, &x, 6);
            assert_eq!(unlock(&env, 5), Err(SafeError::LockConsistencyError));
        });
    }
}
