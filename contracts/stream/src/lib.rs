//! Rivulet: continuous, time-proportional token disbursement on Soroban.
//!
//! A sender deposits once and the recipient accrues a withdrawable balance
//! that grows linearly with elapsed time. On top of the core streaming
//! ledger sit delegation (bounded third-party withdrawal rights), splits
//! (percentage division of the withdrawable pool), progress-gated bonus
//! milestones and conditional escrow side-pots.
//!
//! Every mutating operation reads the ledger clock once, recomputes accrual
//! through the pure `accrual` module, applies its rule and commits the
//! updated records in one invocation; an error result rolls the whole
//! invocation back, so no partial state is ever observable.

#![no_std]

mod accrual;
mod delegation;
mod errors;
mod escrow;
mod events;
mod lifecycle;
mod milestone;
mod storage;
mod types;

#[cfg(test)]
mod test;

use soroban_sdk::{contract, contractimpl, token, Address, Bytes, Env, String, Vec};

pub use crate::{
    errors::Error,
    types::{
        Config, Delegation, Escrow, EscrowCondition, EscrowMilestone, EscrowStatus, Milestone,
        ProtocolStats, Split, SplitRecipient, Stream, StreamStatus,
    },
};

#[contract]
pub struct RivuletStream;

// ---------------------------------------------------------------------------
// Initialization & admin
// ---------------------------------------------------------------------------

#[contractimpl]
impl RivuletStream {
    /// Initialise the contract with the streaming token, the admin, the fee
    /// treasury and the protocol fee in basis points. Callable exactly once.
    pub fn init(
        env: Env,
        token: Address,
        admin: Address,
        treasury: Address,
        fee_bps: u32,
    ) -> Result<(), Error> {
        if storage::has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        if fee_bps >= 10_000 {
            return Err(Error::InvalidParams);
        }
        storage::save_config(
            &env,
            &Config {
                token,
                admin,
                treasury,
                fee_bps,
                paused: false,
            },
        );
        storage::init_stream_counter(&env);
        Ok(())
    }

    /// Rotate the admin key. Only the current admin may call.
    pub fn set_admin(env: Env, new_admin: Address) -> Result<(), Error> {
        let mut config = storage::config(&env);
        let old_admin = config.admin.clone();
        old_admin.require_auth();

        config.admin = new_admin.clone();
        storage::save_config(&env, &config);

        events::admin_updated(&env, &old_admin, &new_admin);
        Ok(())
    }

    /// Pause or unpause deposit-taking operations (`create_stream`,
    /// `top_up_stream`). Admin only.
    pub fn set_paused(env: Env, paused: bool) -> Result<(), Error> {
        let mut config = storage::config(&env);
        config.admin.require_auth();

        config.paused = paused;
        storage::save_config(&env, &config);

        events::protocol_paused(&env, paused);
        Ok(())
    }

    /// Transfer `amount` of the streaming token from the contract to the
    /// admin. Escape hatch for incident response; admin only.
    pub fn emergency_withdraw(env: Env, amount: i128) -> Result<(), Error> {
        let config = storage::config(&env);
        config.admin.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let token_client = token::Client::new(&env, &config.token);
        token_client.transfer(&env.current_contract_address(), &config.admin, &amount);

        events::emergency_withdrawal(&env, &config.admin, amount);
        Ok(())
    }

    pub fn get_config(env: Env) -> Config {
        storage::config(&env)
    }

    pub fn get_protocol_stats(env: Env) -> ProtocolStats {
        storage::stats(&env)
    }

    /// Protocol fee that would be deducted from a gross `amount`.
    pub fn calculate_fee(env: Env, amount: i128) -> i128 {
        accrual::fee(amount, storage::config(&env).fee_bps)
    }
}

// ---------------------------------------------------------------------------
// Stream lifecycle
// ---------------------------------------------------------------------------

#[contractimpl]
impl RivuletStream {
    /// Create a new payment stream.
    ///
    /// Pulls the gross `deposit` from the sender, routes the protocol fee
    /// to the treasury and streams the remainder linearly over
    /// `[start_time, end_time]` at `net / duration` tokens per second
    /// (floored). Returns the new stream id.
    ///
    /// Fails with `NotAuthorized` while the protocol is paused,
    /// `InvalidAmount` for a non-positive (or fully fee-consumed) deposit,
    /// `InvalidParams` when sender and recipient coincide, `InvalidTimes`
    /// for an empty window or a start in the past, and `CapacityExceeded`
    /// when either party is already at the per-address stream limit.
    pub fn create_stream(
        env: Env,
        sender: Address,
        recipient: Address,
        deposit: i128,
        start_time: u64,
        end_time: u64,
    ) -> Result<u64, Error> {
        lifecycle::create_stream(&env, sender, recipient, deposit, start_time, end_time)
    }

    /// Withdraw everything currently withdrawable to the recipient. Fails
    /// `StreamDepleted` when nothing has accrued beyond what was already
    /// withdrawn; reaching the full deposit flips the stream to `Completed`.
    pub fn withdraw(env: Env, stream_id: u64) -> Result<i128, Error> {
        lifecycle::withdraw(&env, stream_id)
    }

    /// Withdraw a specific amount to the recipient. `InvalidAmount` for
    /// non-positive amounts, `InsufficientBalance` beyond the accrued pool.
    pub fn withdraw_amount(env: Env, stream_id: u64, amount: i128) -> Result<i128, Error> {
        lifecycle::withdraw_amount(&env, stream_id, amount)
    }

    /// Cancel an active stream: the recipient is paid what has streamed but
    /// was not withdrawn, the sender is refunded the rest. Sender only.
    pub fn cancel_stream(env: Env, stream_id: u64) -> Result<(), Error> {
        lifecycle::cancel_stream(&env, stream_id)
    }

    /// Add funds to an active stream; the rate is re-derived over the
    /// original window. Returns the net amount credited. Sender only.
    pub fn top_up_stream(env: Env, stream_id: u64, amount: i128) -> Result<i128, Error> {
        lifecycle::top_up_stream(&env, stream_id, amount)
    }

    /// Reassign the recipient of an active stream. Recipient only.
    pub fn transfer_stream(env: Env, stream_id: u64, new_recipient: Address) -> Result<(), Error> {
        lifecycle::transfer_stream(&env, stream_id, new_recipient)
    }

    /// Record a pause on an active stream. Advisory: accrual and
    /// withdrawals are unaffected (see the `accrual` module docs). Sender
    /// only; double-pause fails `AlreadyPaused`.
    pub fn pause_stream(env: Env, stream_id: u64) -> Result<(), Error> {
        lifecycle::pause_stream(&env, stream_id)
    }

    /// Clear a recorded pause, accumulating the paused interval. Sender
    /// only; fails `NotPaused` when the stream is not paused.
    pub fn unpause_stream(env: Env, stream_id: u64) -> Result<(), Error> {
        lifecycle::unpause_stream(&env, stream_id)
    }

    pub fn get_stream(env: Env, stream_id: u64) -> Result<Stream, Error> {
        storage::load_stream(&env, stream_id)
    }

    pub fn get_streamed_amount(env: Env, stream_id: u64) -> Result<i128, Error> {
        let stream = storage::load_stream(&env, stream_id)?;
        Ok(accrual::streamed_amount(&stream, env.ledger().timestamp()))
    }

    pub fn get_withdrawable_amount(env: Env, stream_id: u64) -> Result<i128, Error> {
        let stream = storage::load_stream(&env, stream_id)?;
        Ok(accrual::withdrawable_amount(&stream, env.ledger().timestamp()))
    }

    pub fn get_remaining_balance(env: Env, stream_id: u64) -> Result<i128, Error> {
        let stream = storage::load_stream(&env, stream_id)?;
        Ok(accrual::remaining_balance(&stream))
    }

    pub fn is_stream_active(env: Env, stream_id: u64) -> Result<bool, Error> {
        let stream = storage::load_stream(&env, stream_id)?;
        Ok(stream.status == StreamStatus::Active)
    }

    /// Stream progress in whole percent (0 before start, 100 at or after
    /// end).
    pub fn get_stream_progress(env: Env, stream_id: u64) -> Result<u32, Error> {
        let stream = storage::load_stream(&env, stream_id)?;
        Ok(accrual::progress(&stream, env.ledger().timestamp()))
    }

    pub fn get_sender_streams(env: Env, sender: Address) -> Vec<u64> {
        storage::sender_streams(&env, &sender)
    }

    pub fn get_recipient_streams(env: Env, recipient: Address) -> Vec<u64> {
        storage::recipient_streams(&env, &recipient)
    }
}

// ---------------------------------------------------------------------------
// Delegation & splits
// ---------------------------------------------------------------------------

#[contractimpl]
impl RivuletStream {
    /// Grant `delegate` a time-boxed, amount-capped right to trigger
    /// withdrawals on the recipient's behalf. Recipient only; one active
    /// delegation per stream.
    pub fn delegate_stream(
        env: Env,
        stream_id: u64,
        delegate: Address,
        expires_at: u64,
        withdrawal_limit: i128,
    ) -> Result<(), Error> {
        delegation::delegate_stream(&env, stream_id, delegate, expires_at, withdrawal_limit)
    }

    /// Deactivate the stream's delegation; the record is kept for audit.
    /// Recipient only.
    pub fn revoke_delegation(env: Env, stream_id: u64) -> Result<(), Error> {
        delegation::revoke_delegation(&env, stream_id)
    }

    /// Withdraw `amount` to the stream's recipient on the delegate's
    /// authority, within the delegation's expiry and cumulative limit.
    pub fn delegated_withdraw(env: Env, stream_id: u64, amount: i128) -> Result<i128, Error> {
        delegation::delegated_withdraw(&env, stream_id, amount)
    }

    pub fn get_delegation(env: Env, stream_id: u64) -> Result<Delegation, Error> {
        delegation::get_delegation(&env, stream_id)
    }

    /// Fix a percentage division of the stream's withdrawable pool among up
    /// to ten recipients; shares must sum to exactly 10000 bps. Sender
    /// only; set once per stream.
    pub fn create_stream_split(
        env: Env,
        stream_id: u64,
        recipients: Vec<SplitRecipient>,
    ) -> Result<(), Error> {
        delegation::create_stream_split(&env, stream_id, recipients)
    }

    /// Pay the calling split recipient their share of the currently
    /// withdrawable pool. Shares are computed fresh each call: earlier
    /// withdrawals shrink the pool later movers draw from.
    pub fn withdraw_from_split(
        env: Env,
        stream_id: u64,
        recipient: Address,
    ) -> Result<i128, Error> {
        delegation::withdraw_from_split(&env, stream_id, recipient)
    }

    pub fn get_stream_split(env: Env, stream_id: u64) -> Result<Split, Error> {
        delegation::get_stream_split(&env, stream_id)
    }
}

// ---------------------------------------------------------------------------
// Milestones
// ---------------------------------------------------------------------------

#[contractimpl]
impl RivuletStream {
    /// Escrow a bonus against a progress threshold (1..=100). Sender only;
    /// at most ten milestones per stream, one per threshold.
    pub fn add_milestone(
        env: Env,
        stream_id: u64,
        threshold: u32,
        bonus: i128,
    ) -> Result<(), Error> {
        milestone::add_milestone(&env, stream_id, threshold, bonus)
    }

    /// Claim a milestone bonus once stream progress has reached its
    /// threshold. Recipient only; one-shot.
    pub fn claim_milestone(env: Env, stream_id: u64, threshold: u32) -> Result<i128, Error> {
        milestone::claim_milestone(&env, stream_id, threshold)
    }

    /// Claim every currently claimable milestone on the stream, skipping
    /// the ones that are not. Returns the total bonus paid.
    pub fn claim_all_milestones(env: Env, stream_id: u64) -> Result<i128, Error> {
        milestone::claim_all_milestones(&env, stream_id)
    }

    /// Remove an unclaimed milestone and recover its bonus. Sender only;
    /// allowed while the threshold is unreached, or once the stream is
    /// cancelled.
    pub fn remove_milestone(env: Env, stream_id: u64, threshold: u32) -> Result<i128, Error> {
        milestone::remove_milestone(&env, stream_id, threshold)
    }

    pub fn get_milestone(env: Env, stream_id: u64, threshold: u32) -> Result<Milestone, Error> {
        milestone::get_milestone(&env, stream_id, threshold)
    }

    pub fn get_stream_milestones(env: Env, stream_id: u64) -> Vec<Milestone> {
        milestone::get_stream_milestones(&env, stream_id)
    }

    pub fn is_milestone_claimable(
        env: Env,
        stream_id: u64,
        threshold: u32,
    ) -> Result<bool, Error> {
        milestone::is_milestone_claimable(&env, stream_id, threshold)
    }
}

// ---------------------------------------------------------------------------
// Escrow
// ---------------------------------------------------------------------------

#[contractimpl]
impl RivuletStream {
    /// Lock a separate side-pot against the stream, released when the given
    /// time, milestone or oracle condition is satisfied. Sender only; one
    /// escrow per stream.
    pub fn create_stream_escrow(
        env: Env,
        stream_id: u64,
        amount: i128,
        condition: EscrowCondition,
    ) -> Result<(), Error> {
        escrow::create_stream_escrow(&env, stream_id, amount, condition)
    }

    /// Update the description and target date of a milestone-based escrow
    /// while it is still unverified. Sender only.
    pub fn add_escrow_milestone(
        env: Env,
        stream_id: u64,
        description: String,
        target_date: u64,
    ) -> Result<(), Error> {
        escrow::add_escrow_milestone(&env, stream_id, description, target_date)
    }

    /// Mark a milestone-based escrow's condition as met. Stream sender or
    /// protocol admin only; one-shot.
    pub fn verify_escrow_milestone(
        env: Env,
        stream_id: u64,
        verifier: Address,
    ) -> Result<(), Error> {
        escrow::verify_escrow_milestone(&env, stream_id, verifier)
    }

    /// Oracle approval for an oracle-based escrow, with optional opaque
    /// attestation data. Registered oracle only; one-shot.
    pub fn approve_escrow_release(
        env: Env,
        stream_id: u64,
        attestation: Option<Bytes>,
    ) -> Result<(), Error> {
        escrow::approve_escrow_release(&env, stream_id, attestation)
    }

    /// Pay the escrow to the stream's recipient once releasable.
    /// Permissionless trigger; single-fire.
    pub fn release_escrow(env: Env, stream_id: u64) -> Result<i128, Error> {
        escrow::release_escrow(&env, stream_id)
    }

    /// Refund the escrow to the sender, only while the release condition is
    /// still unmet. Sender only; single-fire.
    pub fn cancel_escrow(env: Env, stream_id: u64) -> Result<(), Error> {
        escrow::cancel_escrow(&env, stream_id)
    }

    pub fn get_stream_escrow(env: Env, stream_id: u64) -> Result<Escrow, Error> {
        escrow::get_stream_escrow(&env, stream_id)
    }

    pub fn is_escrow_releasable(env: Env, stream_id: u64) -> Result<bool, Error> {
        escrow::is_escrow_releasable(&env, stream_id)
    }

    pub fn get_escrow_status(env: Env, stream_id: u64) -> Result<EscrowStatus, Error> {
        escrow::get_escrow_status(&env, stream_id)
    }
}
