use soroban_sdk::{contracttype, Address, Bytes, BytesN, Map, String, Vec};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Registry,
    Transaction(u64),
    ResourceLock(BytesN<32>),
    LockSet(u64),
    Object(BytesN<32>),
    VoteCount(Address),
}

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum TransactionStatus {
    Active = 0,
    Approved = 1,
    Rejected = 2,
    Cancelled = 3,
    Executed = 4,
}

/// Selects which action tags a transaction's payload may contain.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum TransactionKind {
    Config = 0,
    CoinTransfer = 1,
    ObjectTransfer = 2,
    Programmable = 3,
    Upgrade = 4,
}

/// Owner set and quorum parameters of the Safe.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Registry {
    pub owners: Vec<Address>,
    pub threshold: u32,
    /// Milliseconds an approved transaction waits before it may execute.
    pub execution_delay: u64,
    /// Transactions with a sequence number at or below this are void.
    pub stale_index: u64,
    /// Last sequence number handed out.
    pub transaction_count: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransactionMetadata {
    pub creator: Address,
    pub created_at: u64,
    /// Threshold in force when the transaction was proposed.
    pub threshold: u32,
    pub last_status_update: u64,
    pub executor: Option<Address>,
    pub execution_hash: Option<BytesN<32>>,
    pub display: Map<String, String>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    pub sequence_number: u64,
    pub kind: TransactionKind,
    pub payload: Vec<Bytes>,
    pub status: TransactionStatus,
    pub approved: Vec<Address>,
    pub rejected: Vec<Address>,
    pub cancelled: Vec<Address>,
    pub metadata: TransactionMetadata,
}
