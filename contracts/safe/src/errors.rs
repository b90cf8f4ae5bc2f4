use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum SafeError {
    // Authorization
    NotInitialized = 1,
    AlreadyInitialized = 2,
    NotOwner = 3,

    // Configuration
    InvalidConfig = 10,
    AlreadyOwner = 11,
    ThresholdOutOfRange = 12,
    DelayOutOfRange = 13,

    // Votes
    AlreadyApproved = 20,
    AlreadyRejected = 21,
    AlreadyCancelled = 22,

    // Transaction state
    TransactionNotFound = 30,
    TransactionNotActive = 31,
    TransactionNotApproved = 32,
    TransactionStillLive = 33,
    InvalidPayload = 34,

    // Staleness
    TransactionStale = 40,

    // Timing
    DelayNotExpired = 50,

    // Execution
    ExecutionComplete = 60,
    ExecutionIncomplete = 61,
    TransactionMismatch = 62,
    ActionKindMismatch = 63,
    UnknownActionKind = 64,
    OutOfOrderConsumption = 65,

    // Resources
    ResourceLocked = 70,
    DuplicateLockEntry = 71,
    LockNotFound = 72,
    LockConsistencyError = 73,
    NotRemovable = 74,
    NotBorrowable = 75,
    OutstandingBorrow = 76,
    ObjectNotInCustody = 77,
    ObjectAlreadyDeposited = 78,

    // Codec
    TrailingData = 80,
    MalformedPayload = 81,
}
