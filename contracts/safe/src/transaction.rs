use soroban_sdk::{Address, Bytes, BytesN, Env, Map, String, Vec};

use crate::errors::SafeError;
use crate::types::{
    Registry, Transaction, TransactionKind, TransactionMetadata, TransactionStatus,
};

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        env: &Env,
        sequence_number: u64,
        kind: TransactionKind,
        payload: Vec<Bytes>,
        creator: Address,
        threshold: u32,
        now: u64,
        display: Map<String, String>,
    ) -> Self {
        Transaction {
            sequence_number,
            kind,
            payload,
            status: TransactionStatus::Active,
            approved: Vec::new(env),
            rejected: Vec::new(env),
            cancelled: Vec::new(env),
            metadata: TransactionMetadata {
                creator,
                created_at: now,
                threshold,
                last_status_update: now,
                executor: None,
                execution_hash: None,
                display,
            },
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(
            self.status,
            TransactionStatus::Active | TransactionStatus::Approved
        )
    }

    /// Earliest timestamp (ms) at which an approved transaction may execute.
    pub fn ready_at(&self, registry: &Registry) -> u64 {
        self.metadata
            .last_status_update
            .saturating_add(registry.execution_delay)
    }

    pub fn require_fresh(&self, registry: &Registry) -> Result<(), SafeError> {
        if registry.is_stale(self.sequence_number) {
            return Err(SafeError::TransactionStale);
        }
        Ok(())
    }

    /// Records an approval. Returns true when the vote moved the transaction
    /// to `Approved`.
    pub fn approve(
        &mut self,
        registry: &Registry,
        owner: &Address,
        now: u64,
    ) -> Result<bool, SafeError> {
        self.require_vote(registry, owner)?;
        if self.approved.contains(owner) {
            return Err(SafeError::AlreadyApproved);
        }
        if let Some(index) = self.rejected.first_index_of(owner) {
            self.rejected.remove(index);
        }
        self.approved.push_back(owner.clone());

        if self.approved.len() >= self.metadata.threshold {
            self.transition(TransactionStatus::Approved, now);
            return Ok(true);
        }
        Ok(false)
    }

    /// Records a rejection. Returns true when the vote moved the transaction
    /// to `Rejected`.
    pub fn reject(
        &mut self,
        registry: &Registry,
        owner: &Address,
        now: u64,
    ) -> Result<bool, SafeError> {
        self.require_vote(registry, owner)?;
        if self.rejected.contains(owner) {
            return Err(SafeError::AlreadyRejected);
        }
        if let Some(index) = self.approved.first_index_of(owner) {
            self.approved.remove(index);
        }
        self.rejected.push_back(owner.clone());

        if self.rejected.len() >= registry.cutoff() {
            self.transition(TransactionStatus::Rejected, now);
            return Ok(true);
        }
        Ok(false)
    }

    /// Records a cancellation of an approved transaction. Returns true when
    /// the vote moved the transaction to `Cancelled`.
    pub fn cancel(
        &mut self,
        registry: &Registry,
        owner: &Address,
        now: u64,
    ) -> Result<bool, SafeError> {
        registry.require_owner(owner)?;
        self.require_fresh(registry)?;
        if self.status != TransactionStatus::Approved {
            return Err(SafeError::TransactionNotApproved);
        }
        if now < self.ready_at(registry) {
            return Err(SafeError::DelayNotExpired);
        }
        if self.cancelled.contains(owner) {
            return Err(SafeError::AlreadyCancelled);
        }
        self.cancelled.push_back(owner.clone());

        if self.cancelled.len() >= self.metadata.threshold {
            self.transition(TransactionStatus::Cancelled, now);
            return Ok(true);
        }
        Ok(false)
    }

    /// Only reachable through `Execution::complete`.
    pub(crate) fn confirm_execution(&mut self, executor: Address, hash: BytesN<32>, now: u64) {
        self.metadata.executor = Some(executor);
        self.metadata.execution_hash = Some(hash);
        self.transition(TransactionStatus::Executed, now);
    }

    fn require_vote(&self, registry: &Registry, owner: &Address) -> Result<(), SafeError> {
        registry.require_owner(owner)?;
        self.require_fresh(registry)?;
        if self.status != TransactionStatus::Active {
            return Err(SafeError::TransactionNotActive);
        }
        Ok(())
    }

    fn transition(&mut self, status: TransactionStatus, now: u64) {
        self.status = status;
        self.metadata.last_status_update = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::Address as _;

    struct Fixture {
        env: Env,
        owners: Vec<Address>,
        registry: Registry,
    }

    fn fixture(count: u32, threshold: u32) -> Fixture {
        let env = Env::default();
        let mut owners = Vec::new(&env);
        for _ in 0..count {
            owners.push_back(Address::generate(&env));
        }
        let mut registry =
            Registry::create(&owners.get_unchecked(0), owners.clone(), threshold, 0).unwrap();
        registry.next_sequence();
        Fixture {
            env,
            owners,
            registry,
        }
    }

    fn proposal(f: &Fixture) -> Transaction {
        let payload = Vec::from_array(&f.env, [Bytes::from_array(&f.env, &[0u8; 8])]);
        Transaction::new(
            &f.env,
            f.registry.transaction_count,
            TransactionKind::Config,
            payload,
            f.owners.get_unchecked(0),
            f.registry.threshold,
            1_000,
            Map::new(&f.env),
        )
    }

    #[test]
    fn approval_reaches_threshold_snapshot() {
        let f = fixture(3, 2);
        let mut tx = proposal(&f);
        let (a, b) = (f.owners.get_unchecked(0), f.owners.get_unchecked(1));

        assert_eq!(tx.approve(&f.registry, &a, 2_000), Ok(false));
        assert_eq!(tx.status, TransactionStatus::Active);
        assert_eq!(tx.approve(&f.registry, &a, 2_000), Err(SafeError::AlreadyApproved));

        assert_eq!(tx.approve(&f.registry, &b, 3_000), Ok(true));
        assert_eq!(tx.status, TransactionStatus::Approved);
        assert_eq!(tx.metadata.last_status_update, 3_000);

        let c = f.owners.get_unchecked(2);
        assert_eq!(
            tx.approve(&f.registry, &c, 4_000),
            Err(SafeError::TransactionNotActive)
        );
    }

    #[test]
    fn changing_vote_keeps_sets_exclusive() {
        let f = fixture(3, 2);
        let mut tx = proposal(&f);
        let a = f.owners.get_unchecked(0);

        tx.reject(&f.registry, &a, 1_000).unwrap();
        assert!(tx.rejected.contains(&a));

        tx.approve(&f.registry, &a, 1_000).unwrap();
        assert!(tx.approved.contains(&a));
        assert!(!tx.rejected.contains(&a));

        tx.reject(&f.registry, &a, 1_000).unwrap();
        assert!(tx.rejected.contains(&a));
        assert!(!tx.approved.contains(&a));
        assert_eq!(tx.reject(&f.registry, &a, 1_000), Err(SafeError::AlreadyRejected));
    }

    #[test]
    fn rejection_uses_live_cutoff() {
        // 4 owners, threshold 3: cutoff is 2.
        let f = fixture(4, 3);
        let mut tx = proposal(&f);

        assert_eq!(tx.reject(&f.registry, &f.owners.get_unchecked(0), 10), Ok(false));
        assert_eq!(tx.reject(&f.registry, &f.owners.get_unchecked(1), 20), Ok(true));
        assert_eq!(tx.status, TransactionStatus::Rejected);
        assert!(!tx.is_live());
    }

    #[test]
    fn cancel_requires_approval_and_quorum() {
        let f = fixture(3, 2);
        let mut tx = proposal(&f);
        let (a, b, c) = (
            f.owners.get_unchecked(0),
            f.owners.get_unchecked(1),
            f.owners.get_unchecked(2),
        );

        assert_eq!(
            tx.cancel(&f.registry, &c, 0),
            Err(SafeError::TransactionNotApproved)
        );
        tx.approve(&f.registry, &a, 0).unwrap();
        tx.approve(&f.registry, &b, 0).unwrap();

        assert_eq!(tx.cancel(&f.registry, &c, 0), Ok(false));
        assert_eq!(tx.status, TransactionStatus::Approved);
        assert_eq!(
            tx.cancel(&f.registry, &c, 0),
            Err(SafeError::AlreadyCancelled)
        );

        assert_eq!(tx.cancel(&f.registry, &a, 0), Ok(true));
        assert_eq!(tx.status, TransactionStatus::Cancelled);
    }

    #[test]
    fn cancel_waits_for_the_execution_delay() {
        let mut f = fixture(3, 2);
        f.registry.set_execution_delay(500).unwrap();
        let mut tx = proposal(&f);
        let (a, b, c) = (
            f.owners.get_unchecked(0),
            f.owners.get_unchecked(1),
            f.owners.get_unchecked(2),
        );
        tx.approve(&f.registry, &a, 1_000).unwrap();
        tx.approve(&f.registry, &b, 1_000).unwrap();
        let ready_at = tx.ready_at(&f.registry);
        assert_eq!(ready_at, 1_500);

        assert_eq!(
            tx.cancel(&f.registry, &c, ready_at - 1),
            Err(SafeError::DelayNotExpired)
        );
        assert!(tx.cancelled.is_empty());
        assert_eq!(tx.cancel(&f.registry, &c, ready_at), Ok(false));
        assert_eq!(tx.status, TransactionStatus::Approved);
    }

    #[test]
    fn stale_transactions_refuse_every_vote() {
        let mut f = fixture(3, 2);
        let mut tx = proposal(&f);
        let a = f.owners.get_unchecked(0);
        tx.approve(&f.registry, &a, 0).unwrap();

        f.registry.invalidate_pending();

        let b = f.owners.get_unchecked(1);
        assert_eq!(tx.approve(&f.registry, &b, 0), Err(SafeError::TransactionStale));
        assert_eq!(tx.reject(&f.registry, &b, 0), Err(SafeError::TransactionStale));
        assert_eq!(tx.cancel(&f.registry, &b, 0), Err(SafeError::TransactionStale));
        assert_eq!(tx.status, TransactionStatus::Active);
    }

    #[test]
    fn outsiders_cannot_vote() {
        let f = fixture(2, 1);
        let mut tx = proposal(&f);
        let outsider = Address::generate(&f.env);
        assert_eq!(tx.approve(&f.registry, &outsider, 0), Err(SafeError::NotOwner));
        assert_eq!(tx.reject(&f.registry, &outsider, 0), Err(SafeError::NotOwner));
    }
}
