use soroban_sdk::{Address, Vec};

use crate::errors::SafeError;
use crate::types::Registry;

/// Upper bound on the execution delay: 3 days in milliseconds.
pub const MAX_EXECUTION_DELAY_MS: u64 = 3 * 24 * 60 * 60 * 1000;

impl Registry {
    pub fn create(
        creator: &Address,
        owners: Vec<Address>,
        threshold: u32,
        execution_delay: u64,
    ) -> Result<Self, SafeError> {
        if owners.is_empty() || !owners.contains(creator) {
            return Err(SafeError::InvalidConfig);
        }

        for i in 0..owners.len() {
            for j in (i + 1)..owners.len() {
                if owners.get_unchecked(i) == owners.get_unchecked(j) {
                    return Err(SafeError::InvalidConfig);
                }
            }
        }

        if threshold == 0 || threshold > owners.len() {
            return Err(SafeError::InvalidConfig);
        }

        if execution_delay > MAX_EXECUTION_DELAY_MS {
            return Err(SafeError::DelayOutOfRange);
        }

        Ok(Registry {
            owners,
            threshold,
            execution_delay,
            stale_index: 0,
            transaction_count: 0,
        })
    }

    pub fn owner_count(&self) -> u32 {
        self.owners.len()
    }

    pub fn is_owner(&self, id: &Address) -> bool {
        self.owners.contains(id)
    }

    pub fn require_owner(&self, id: &Address) -> Result<(), SafeError> {
        if self.is_owner(id) {
            Ok(())
        } else {
            Err(SafeError::NotOwner)
        }
    }

    /// Rejections that make approval by the remaining owners impossible.
    pub fn cutoff(&self) -> u32 {
        self.owner_count() - self.threshold + 1
    }

    pub fn is_stale(&self, sequence_number: u64) -> bool {
        self.stale_index != 0 && sequence_number <= self.stale_index
    }

    pub(crate) fn next_sequence(&mut self) -> u64 {
        self.transaction_count += 1;
        self.transaction_count
    }

    /// Voids every transaction proposed so far.
    pub(crate) fn invalidate_pending(&mut self) {
        self.stale_index = self.transaction_count;
    }

    pub(crate) fn add_owner(&mut self, id: Address) -> Result<(), SafeError> {
        if self.is_owner(&id) {
            return Err(SafeError::AlreadyOwner);
        }
        self.owners.push_back(id);
        Ok(())
    }

    pub(crate) fn remove_owner(&mut self, id: &Address) -> Result<(), SafeError> {
        let index = self.owners.first_index_of(id).ok_or(SafeError::NotOwner)?;
        if self.owner_count() == 1 {
            return Err(SafeError::InvalidConfig);
        }
        self.owners.remove(index);
        if self.threshold > self.owner_count() {
            self.threshold = self.owner_count();
        }
        Ok(())
    }

    pub(crate) fn set_threshold(&mut self, threshold: u64) -> Result<(), SafeError> {
        let threshold = u32::try_from(threshold).map_err(|_| SafeError::ThresholdOutOfRange)?;
        if threshold == 0 || threshold > self.owner_count() {
            return Err(SafeError::ThresholdOutOfRange);
        }
        self.threshold = threshold;
        Ok(())
    }

    pub(crate) fn set_execution_delay(&mut self, execution_delay: u64) -> Result<(), SafeError> {
        if execution_delay > MAX_EXECUTION_DELAY_MS {
            return Err(SafeError::DelayOutOfRange);
        }
        self.execution_delay = execution_delay;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::{testutils::Address as _, vec, Env};

    fn owners(env: &Env, count: u32) -> Vec<Address> {
        let mut owners = Vec::new(env);
        for _ in 0..count {
            owners.push_back(Address::generate(env));
        }
        owners
    }

    #[test]
    fn create_validates_owner_set() {
        let env = Env::default();
        let set = owners(&env, 3);
        let creator = set.get_unchecked(0);
        let outsider = Address::generate(&env);

        assert_eq!(
            Registry::create(&creator, Vec::new(&env), 1, 0),
            Err(SafeError::InvalidConfig)
        );
        assert_eq!(
            Registry::create(&outsider, set.clone(), 1, 0),
            Err(SafeError::InvalidConfig)
        );
        assert_eq!(
            Registry::create(&creator, set.clone(), 0, 0),
            Err(SafeError::InvalidConfig)
        );
        assert_eq!(
            Registry::create(&creator, set.clone(), 4, 0),
            Err(SafeError::InvalidConfig)
        );
        assert_eq!(
            Registry::create(&creator, set.clone(), 2, MAX_EXECUTION_DELAY_MS + 1),
            Err(SafeError::DelayOutOfRange)
        );

        let duplicated = vec![&env, creator.clone(), creator.clone()];
        assert_eq!(
            Registry::create(&creator, duplicated, 1, 0),
            Err(SafeError::InvalidConfig)
        );

        let registry = Registry::create(&creator, set, 2, MAX_EXECUTION_DELAY_MS).unwrap();
        assert_eq!(registry.owner_count(), 3);
        assert_eq!(registry.stale_index, 0);
    }

    #[test]
    fn cutoff_is_complement_of_threshold() {
        let env = Env::default();
        let set = owners(&env, 5);
        let creator = set.get_unchecked(0);

        let registry = Registry::create(&creator, set.clone(), 3, 0).unwrap();
        assert_eq!(registry.cutoff(), 3);

        let unanimous = Registry::create(&creator, set.clone(), 5, 0).unwrap();
        assert_eq!(unanimous.cutoff(), 1);

        let any = Registry::create(&creator, set, 1, 0).unwrap();
        assert_eq!(any.cutoff(), 5);
    }

    #[test]
    fn remove_owner_clamps_threshold() {
        let env = Env::default();
        let set = owners(&env, 3);
        let creator = set.get_unchecked(0);
        let mut registry = Registry::create(&creator, set.clone(), 3, 0).unwrap();

        registry.remove_owner(&set.get_unchecked(2)).unwrap();
        assert_eq!(registry.owner_count(), 2);
        assert_eq!(registry.threshold, 2);

        assert_eq!(
            registry.remove_owner(&set.get_unchecked(2)),
            Err(SafeError::NotOwner)
        );

        registry.remove_owner(&set.get_unchecked(1)).unwrap();
        assert_eq!(registry.threshold, 1);
        assert_eq!(registry.remove_owner(&creator), Err(SafeError::InvalidConfig));
    }

    #[test]
    fn mutators_enforce_ranges() {
        let env = Env::default();
        let set = owners(&env, 2);
        let creator = set.get_unchecked(0);
        let mut registry = Registry::create(&creator, set, 1, 0).unwrap();

        assert_eq!(registry.add_owner(creator.clone()), Err(SafeError::AlreadyOwner));
        registry.add_owner(Address::generate(&env)).unwrap();

        assert_eq!(registry.set_threshold(0), Err(SafeError::ThresholdOutOfRange));
        assert_eq!(registry.set_threshold(4), Err(SafeError::ThresholdOutOfRange));
        assert_eq!(
            registry.set_threshold(u64::MAX),
            Err(SafeError::ThresholdOutOfRange)
        );
        registry.set_threshold(3).unwrap();
        assert_eq!(registry.threshold, 3);

        assert_eq!(
            registry.set_execution_delay(MAX_EXECUTION_DELAY_MS + 1),
            Err(SafeError::DelayOutOfRange)
        );
        registry.set_execution_delay(60_000).unwrap();
        assert_eq!(registry.execution_delay, 60_000);
    }

    #[test]
    fn staleness_watermark() {
        let env = Env::default();
        let set = owners(&env, 1);
        let creator = set.get_unchecked(0);
        let mut registry = Registry::create(&creator, set, 1, 0).unwrap();

        let first = registry.next_sequence();
        let second = registry.next_sequence();
        assert!(!registry.is_stale(first));

        registry.invalidate_pending();
        let third = registry.next_sequence();
        assert!(registry.is_stale(first));
        assert!(registry.is_stale(second));
        assert!(!registry.is_stale(third));
    }
}
