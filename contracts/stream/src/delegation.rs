//! Secondary withdrawal rights: a single time/limit-bounded delegation per
//! stream, and a single percentage split of the withdrawable pool.

use soroban_sdk::{Address, Env, Map, Vec};

use crate::{
    accrual,
    errors::Error,
    events, lifecycle, storage,
    types::{Delegation, Split, SplitRecipient, StreamStatus},
};

/// Grants `delegate` a time-boxed, amount-capped right to trigger
/// withdrawals on the recipient's behalf. One active delegation per stream.
pub fn delegate_stream(
    env: &Env,
    stream_id: u64,
    delegate: Address,
    expires_at: u64,
    withdrawal_limit: i128,
) -> Result<(), Error> {
    let stream = storage::load_stream(env, stream_id)?;
    stream.recipient.require_auth();

    if stream.status != StreamStatus::Active {
        return Err(Error::StreamNotActive);
    }
    if withdrawal_limit <= 0 {
        return Err(Error::InvalidAmount);
    }
    if delegate == stream.recipient {
        return Err(Error::InvalidParams);
    }
    let now = env.ledger().timestamp();
    if expires_at <= now {
        return Err(Error::InvalidTimes);
    }
    if let Ok(existing) = storage::load_delegation(env, stream_id) {
        if existing.active {
            return Err(Error::AlreadyExists);
        }
    }

    let delegation = Delegation {
        delegate: delegate.clone(),
        delegated_at: now,
        expires_at,
        withdrawal_limit,
        total_withdrawn: 0,
        active: true,
    };
    storage::save_delegation(env, stream_id, &delegation);

    events::delegated(env, stream_id, &delegate, withdrawal_limit);
    Ok(())
}

/// Deactivates the delegation. The record is kept for audit.
pub fn revoke_delegation(env: &Env, stream_id: u64) -> Result<(), Error> {
    let stream = storage::load_stream(env, stream_id)?;
    stream.recipient.require_auth();

    let mut delegation = storage::load_delegation(env, stream_id)?;
    if !delegation.active {
        return Err(Error::DelegationNotFound);
    }
    delegation.active = false;
    storage::save_delegation(env, stream_id, &delegation);

    events::delegation_revoked(env, stream_id);
    Ok(())
}

/// Withdraws `amount` to the stream's recipient on the delegate's
/// authority. The amount counts against both the delegation limit and the
/// stream's withdrawn total in the same invocation, so delegate
/// withdrawals can never double-spend the withdrawable pool.
pub fn delegated_withdraw(env: &Env, stream_id: u64, amount: i128) -> Result<i128, Error> {
    let stream = storage::load_stream(env, stream_id)?;
    let mut delegation = storage::load_delegation(env, stream_id)?;
    delegation.delegate.require_auth();

    if !delegation.active {
        return Err(Error::DelegationNotFound);
    }
    if stream.status != StreamStatus::Active {
        return Err(Error::StreamNotActive);
    }
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    let now = env.ledger().timestamp();
    if now >= delegation.expires_at {
        return Err(Error::ConditionNotMet);
    }
    if delegation.total_withdrawn + amount > delegation.withdrawal_limit {
        return Err(Error::InsufficientBalance);
    }
    if amount > accrual::withdrawable_amount(&stream, now) {
        return Err(Error::InsufficientBalance);
    }

    delegation.total_withdrawn += amount;
    storage::save_delegation(env, stream_id, &delegation);

    let recipient = stream.recipient.clone();
    let paid = lifecycle::pay_out(env, stream, recipient, amount);

    events::delegated_withdrawal(env, stream_id, &delegation.delegate, paid);
    Ok(paid)
}

pub fn get_delegation(env: &Env, stream_id: u64) -> Result<Delegation, Error> {
    storage::load_delegation(env, stream_id)
}

/// Fixes a percentage division of the stream's withdrawable pool. Set once;
/// shares must sum to exactly 10000 bps.
pub fn create_stream_split(
    env: &Env,
    stream_id: u64,
    recipients: Vec<SplitRecipient>,
) -> Result<(), Error> {
    let stream = storage::load_stream(env, stream_id)?;
    stream.sender.require_auth();

    if stream.status != StreamStatus::Active {
        return Err(Error::StreamNotActive);
    }
    if storage::has_split(env, stream_id) {
        return Err(Error::AlreadyExists);
    }
    if recipients.is_empty() {
        return Err(Error::InvalidParams);
    }
    if recipients.len() > storage::MAX_SPLIT_RECIPIENTS {
        return Err(Error::CapacityExceeded);
    }

    let mut total_bps: u32 = 0;
    for entry in recipients.iter() {
        if entry.bps == 0 || entry.bps > 10_000 {
            return Err(Error::InvalidParams);
        }
        total_bps += entry.bps;
    }
    if total_bps != 10_000 {
        return Err(Error::InvalidParams);
    }

    let count = recipients.len();
    let split = Split {
        recipients,
        withdrawn: Map::new(env),
    };
    storage::save_split(env, stream_id, &split);

    events::split_created(env, stream_id, count);
    Ok(())
}

/// Pays `recipient` their bps share of the CURRENT withdrawable pool.
///
/// The share is computed fresh at call time, not against a frozen
/// allocation: every split withdrawal shrinks the shared pool, so a late
/// mover's share is a percentage of whatever remains.
pub fn withdraw_from_split(env: &Env, stream_id: u64, recipient: Address) -> Result<i128, Error> {
    recipient.require_auth();

    let stream = storage::load_stream(env, stream_id)?;
    if stream.status != StreamStatus::Active {
        return Err(Error::StreamNotActive);
    }
    let mut split = storage::load_split(env, stream_id)?;

    let mut bps: Option<u32> = None;
    for entry in split.recipients.iter() {
        if entry.recipient == recipient {
            bps = Some(entry.bps);
            break;
        }
    }
    let bps = bps.ok_or(Error::NotAuthorized)?;

    let now = env.ledger().timestamp();
    let withdrawable = accrual::withdrawable_amount(&stream, now);
    let share = withdrawable * bps as i128 / 10_000;
    if share == 0 {
        return Err(Error::StreamDepleted);
    }

    let prior = split.withdrawn.get(recipient.clone()).unwrap_or(0);
    split.withdrawn.set(recipient.clone(), prior + share);
    storage::save_split(env, stream_id, &split);

    let paid = lifecycle::pay_out(env, stream, recipient.clone(), share);

    events::split_withdrawal(env, stream_id, &recipient, paid);
    Ok(paid)
}

pub fn get_stream_split(env: &Env, stream_id: u64) -> Result<Split, Error> {
    storage::load_split(env, stream_id)
}
