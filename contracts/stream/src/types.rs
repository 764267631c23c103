use soroban_sdk::{contracttype, Address, Bytes, Map, String, Vec};

/// Global configuration, set once at `init`.
#[contracttype]
#[derive(Clone, Debug)]
pub struct Config {
    /// Token contract used for every transfer the protocol makes.
    pub token: Address,
    pub admin: Address,
    /// Destination of the protocol fee cut taken on deposits and top-ups.
    pub treasury: Address,
    /// Fee in basis points, deducted from every deposit (30 = 0.3%).
    pub fee_bps: u32,
    /// While true, deposit-taking operations are rejected.
    pub paused: bool,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StreamStatus {
    Active = 0,
    Completed = 1,
    Cancelled = 2,
}

/// A single deposit-to-recipient continuous payment arrangement.
///
/// `deposit_amount` is net of the protocol fee. The pause fields are
/// advisory bookkeeping: they never alter the accrual formula, which is a
/// pure function of the wall-clock window (see `accrual`).
#[contracttype]
#[derive(Clone, Debug)]
pub struct Stream {
    pub id: u64,
    pub sender: Address,
    pub recipient: Address,
    pub deposit_amount: i128,
    pub withdrawn_amount: i128,
    pub rate_per_second: i128,
    pub start_time: u64,
    pub end_time: u64,
    pub status: StreamStatus,
    pub paused: bool,
    pub paused_at: Option<u64>,
    pub total_paused_duration: u64,
}

/// A time-boxed, amount-capped right to trigger withdrawals on the
/// recipient's behalf. At most one per stream; revocation flips `active`
/// and keeps the record for audit.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Delegation {
    pub delegate: Address,
    pub delegated_at: u64,
    pub expires_at: u64,
    pub withdrawal_limit: i128,
    pub total_withdrawn: i128,
    pub active: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SplitRecipient {
    pub recipient: Address,
    /// Share of the withdrawable pool, in basis points.
    pub bps: u32,
}

/// Percentage division of a stream's withdrawable pool. Shares sum to
/// exactly 10000 bps; `withdrawn` tracks what each recipient has drawn.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Split {
    pub recipients: Vec<SplitRecipient>,
    pub withdrawn: Map<Address, i128>,
}

/// A progress-threshold-gated bonus, escrowed separately from the main
/// deposit, keyed by `(stream id, threshold)`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Milestone {
    pub stream_id: u64,
    /// Stream progress percentage (1..=100) that unlocks the bonus.
    pub threshold: u32,
    pub bonus_amount: i128,
    pub claimed: bool,
    pub claimed_at: Option<u64>,
}

/// Details of a milestone-based escrow condition, verified off the accrual
/// path by the sender or the protocol admin.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EscrowMilestone {
    pub description: String,
    pub target_date: u64,
    pub verified_by: Option<Address>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EscrowCondition {
    /// Releasable once the ledger time reaches the inner timestamp.
    TimeBased(u64),
    /// Releasable once the sender or admin verifies the described milestone.
    MilestoneBased(EscrowMilestone),
    /// Releasable once the inner oracle address submits an approval.
    OracleBased(Address),
}

/// A separately locked side-pot tied to a stream. Release pays the
/// recipient, cancellation refunds the sender; the two are mutually
/// exclusive and single-fire.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Escrow {
    pub amount: i128,
    pub condition: EscrowCondition,
    pub condition_met: bool,
    pub oracle_verified: bool,
    pub released: bool,
    pub cancelled: bool,
    pub released_at: Option<u64>,
    pub cancelled_at: Option<u64>,
    /// Opaque data submitted by the oracle alongside its approval.
    pub attestation: Option<Bytes>,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EscrowStatus {
    Locked = 0,
    Released = 1,
    Cancelled = 2,
}

/// Protocol-wide counters, kept in instance storage.
#[contracttype]
#[derive(Clone, Debug)]
pub struct ProtocolStats {
    pub total_streams: u64,
    /// Gross deposits, fee included.
    pub total_deposited: i128,
    pub total_fees: i128,
    pub total_withdrawn: i128,
}

/// Namespace for all contract storage keys.
#[contracttype]
pub enum DataKey {
    Config,                    // Instance: global settings.
    NextStreamId,              // Instance: auto-incrementing ID counter.
    Stats,                     // Instance: protocol-wide counters.
    Stream(u64),               // Persistent: stream records.
    SenderStreams(Address),    // Persistent: stream ids by sender.
    RecipientStreams(Address), // Persistent: stream ids by recipient.
    Delegation(u64),           // Persistent: delegation per stream.
    Split(u64),                // Persistent: split per stream.
    Milestone(u64, u32),       // Persistent: milestone per (stream, threshold).
    StreamMilestones(u64),     // Persistent: milestone thresholds per stream.
    Escrow(u64),               // Persistent: escrow per stream.
}
