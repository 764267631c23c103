//! Progress-gated bonus milestones, escrowed separately from the deposit.

use soroban_sdk::{token, Env, Vec};

use crate::{
    accrual,
    errors::Error,
    events, storage,
    types::{Milestone, Stream, StreamStatus},
};

/// Attaches a bonus to a progress threshold (1..=100). The bonus is pulled
/// from the sender immediately and held in trust until claimed or removed.
pub fn add_milestone(env: &Env, stream_id: u64, threshold: u32, bonus: i128) -> Result<(), Error> {
    let stream = storage::load_stream(env, stream_id)?;
    stream.sender.require_auth();

    if stream.status != StreamStatus::Active {
        return Err(Error::StreamNotActive);
    }
    if threshold == 0 || threshold > 100 {
        return Err(Error::InvalidParams);
    }
    if bonus <= 0 {
        return Err(Error::InvalidAmount);
    }
    if storage::has_milestone(env, stream_id, threshold) {
        return Err(Error::AlreadyExists);
    }
    if storage::milestone_thresholds(env, stream_id).len() >= storage::MAX_MILESTONES_PER_STREAM {
        return Err(Error::CapacityExceeded);
    }

    let token_client = token::Client::new(env, &storage::config(env).token);
    token_client.transfer(&stream.sender, &env.current_contract_address(), &bonus);

    storage::save_milestone(
        env,
        &Milestone {
            stream_id,
            threshold,
            bonus_amount: bonus,
            claimed: false,
            claimed_at: None,
        },
    );
    storage::push_milestone_threshold(env, stream_id, threshold)?;

    events::milestone_added(env, stream_id, threshold, bonus);
    Ok(())
}

pub fn claim_milestone(env: &Env, stream_id: u64, threshold: u32) -> Result<i128, Error> {
    let stream = storage::load_stream(env, stream_id)?;
    stream.recipient.require_auth();
    claim_one(env, &stream, threshold)
}

/// Best-effort claim of every milestone on this stream: claimable ones pay
/// out, the rest are skipped rather than failing the batch. Returns the
/// total bonus paid. The lookup is bound to the given stream id, never to
/// the latest-created stream.
pub fn claim_all_milestones(env: &Env, stream_id: u64) -> Result<i128, Error> {
    let stream = storage::load_stream(env, stream_id)?;
    stream.recipient.require_auth();

    let mut total: i128 = 0;
    for threshold in storage::milestone_thresholds(env, stream_id).iter() {
        if let Ok(paid) = claim_one(env, &stream, threshold) {
            total += paid;
        }
    }
    Ok(total)
}

/// Removes an unclaimed milestone and refunds its bonus to the sender.
///
/// Allowed while the threshold is still unreached, and unconditionally on a
/// cancelled stream (a bonus that can no longer be earned must not strand).
pub fn remove_milestone(env: &Env, stream_id: u64, threshold: u32) -> Result<i128, Error> {
    let stream = storage::load_stream(env, stream_id)?;
    stream.sender.require_auth();

    let milestone = storage::load_milestone(env, stream_id, threshold)?;
    if milestone.claimed {
        return Err(Error::AlreadyClaimed);
    }
    let now = env.ledger().timestamp();
    if stream.status != StreamStatus::Cancelled && accrual::progress(&stream, now) >= threshold {
        return Err(Error::ConditionNotMet);
    }

    storage::delete_milestone(env, stream_id, threshold);

    let token_client = token::Client::new(env, &storage::config(env).token);
    token_client.transfer(
        &env.current_contract_address(),
        &stream.sender,
        &milestone.bonus_amount,
    );

    events::milestone_removed(env, stream_id, threshold, milestone.bonus_amount);
    Ok(milestone.bonus_amount)
}

pub fn get_milestone(env: &Env, stream_id: u64, threshold: u32) -> Result<Milestone, Error> {
    storage::load_milestone(env, stream_id, threshold)
}

pub fn get_stream_milestones(env: &Env, stream_id: u64) -> Vec<Milestone> {
    let mut milestones = Vec::new(env);
    for threshold in storage::milestone_thresholds(env, stream_id).iter() {
        if let Ok(milestone) = storage::load_milestone(env, stream_id, threshold) {
            milestones.push_back(milestone);
        }
    }
    milestones
}

pub fn is_milestone_claimable(env: &Env, stream_id: u64, threshold: u32) -> Result<bool, Error> {
    let stream = storage::load_stream(env, stream_id)?;
    let milestone = storage::load_milestone(env, stream_id, threshold)?;
    let now = env.ledger().timestamp();
    Ok(!milestone.claimed
        && stream.status != StreamStatus::Cancelled
        && accrual::progress(&stream, now) >= threshold)
}

/// Validates and pays a single milestone. All checks precede any mutation,
/// so a failed claim inside `claim_all_milestones` leaves nothing behind.
fn claim_one(env: &Env, stream: &Stream, threshold: u32) -> Result<i128, Error> {
    let mut milestone = storage::load_milestone(env, stream.id, threshold)?;
    if milestone.claimed {
        return Err(Error::AlreadyClaimed);
    }
    if stream.status == StreamStatus::Cancelled {
        return Err(Error::ConditionNotMet);
    }
    let now = env.ledger().timestamp();
    if accrual::progress(stream, now) < threshold {
        return Err(Error::ConditionNotMet);
    }

    milestone.claimed = true;
    milestone.claimed_at = Some(now);
    storage::save_milestone(env, &milestone);

    let token_client = token::Client::new(env, &storage::config(env).token);
    token_client.transfer(
        &env.current_contract_address(),
        &stream.recipient,
        &milestone.bonus_amount,
    );

    events::milestone_claimed(env, stream.id, threshold, milestone.bonus_amount);
    Ok(milestone.bonus_amount)
}
