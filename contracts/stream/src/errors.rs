use soroban_sdk::contracterror;

/// Typed failures returned by every contract operation.
///
/// An `Err` implies the invocation had no effect: all validation happens
/// before any storage write or token transfer, and the host rolls back the
/// whole invocation on an error result.
#[contracterror]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotAuthorized = 2,
    StreamNotFound = 3,
    DelegationNotFound = 4,
    SplitNotFound = 5,
    MilestoneNotFound = 6,
    EscrowNotFound = 7,
    InvalidAmount = 8,
    InvalidTimes = 9,
    InvalidParams = 10,
    AlreadyExists = 11,
    AlreadyClaimed = 12,
    AlreadyReleased = 13,
    ConditionNotMet = 14,
    InsufficientBalance = 15,
    StreamDepleted = 16,
    StreamNotActive = 17,
    AlreadyPaused = 18,
    NotPaused = 19,
    CapacityExceeded = 20,
}
