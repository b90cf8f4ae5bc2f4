use soroban_sdk::{contractevent, contracttype, Address, BytesN, Vec};

use crate::types::{TransactionKind, TransactionStatus};

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Vote {
    Approve = 0,
    Reject = 1,
    Cancel = 2,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SafeInitialized {
    pub creator: Address,
    pub owners: Vec<Address>,
    pub threshold: u32,
    pub execution_delay: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransactionProposed {
    #[topic]
    pub sequence_number: u64,
    pub proposer: Address,
    pub kind: TransactionKind,
    pub actions: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VoteCast {
    #[topic]
    pub sequence_number: u64,
    #[topic]
    pub owner: Address,
    pub vote: Vote,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusChanged {
    #[topic]
    pub sequence_number: u64,
    pub status: TransactionStatus,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransactionExecuted {
    #[topic]
    pub sequence_number: u64,
    pub executor: Address,
    pub execution_hash: BytesN<32>,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerAdded {
    pub owner: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerRemoved {
    pub owner: Address,
    pub threshold: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ThresholdChanged {
    pub threshold: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExecutionDelayChanged {
    pub execution_delay: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransactionsInvalidated {
    pub stale_index: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResourcesLocked {
    #[topic]
    pub sequence_number: u64,
    pub resources: Vec<BytesN<32>>,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResourcesUnlocked {
    #[topic]
    pub sequence_number: u64,
    pub resources: Vec<BytesN<32>>,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ObjectDeposited {
    #[topic]
    pub object_id: BytesN<32>,
    pub depositor: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ObjectReleased {
    #[topic]
    pub object_id: BytesN<32>,
    pub recipient: Address,
}
