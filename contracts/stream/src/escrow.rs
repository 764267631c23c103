//! Conditional escrow: one separately locked side-pot per stream, released
//! to the recipient when its time, milestone or oracle condition is met, or
//! refunded to the sender before that. Release and cancellation are
//! mutually exclusive, single-fire.

use soroban_sdk::{token, Address, Bytes, Env, String};

use crate::{
    errors::Error,
    events, storage,
    types::{Escrow, EscrowCondition, EscrowMilestone, EscrowStatus, StreamStatus},
};

pub fn create_stream_escrow(
    env: &Env,
    stream_id: u64,
    amount: i128,
    condition: EscrowCondition,
) -> Result<(), Error> {
    let stream = storage::load_stream(env, stream_id)?;
    stream.sender.require_auth();

    if stream.status != StreamStatus::Active {
        return Err(Error::StreamNotActive);
    }
    if storage::has_escrow(env, stream_id) {
        return Err(Error::AlreadyExists);
    }
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    if let EscrowCondition::TimeBased(locked_until) = &condition {
        if *locked_until <= env.ledger().timestamp() {
            return Err(Error::InvalidTimes);
        }
    }

    let token_client = token::Client::new(env, &storage::config(env).token);
    token_client.transfer(&stream.sender, &env.current_contract_address(), &amount);

    let escrow = Escrow {
        amount,
        condition,
        condition_met: false,
        oracle_verified: false,
        released: false,
        cancelled: false,
        released_at: None,
        cancelled_at: None,
        attestation: None,
    };
    storage::save_escrow(env, stream_id, &escrow);

    events::escrow_created(env, stream_id, amount);
    Ok(())
}

/// Rewrites the description and target date of a milestone-based escrow
/// while it is still unverified.
pub fn add_escrow_milestone(
    env: &Env,
    stream_id: u64,
    description: String,
    target_date: u64,
) -> Result<(), Error> {
    let stream = storage::load_stream(env, stream_id)?;
    stream.sender.require_auth();

    let mut escrow = storage::load_escrow(env, stream_id)?;
    ensure_open(&escrow)?;
    if escrow.condition_met {
        return Err(Error::ConditionNotMet);
    }
    match escrow.condition {
        EscrowCondition::MilestoneBased(_) => {}
        _ => return Err(Error::InvalidParams),
    }

    escrow.condition = EscrowCondition::MilestoneBased(EscrowMilestone {
        description,
        target_date,
        verified_by: None,
    });
    storage::save_escrow(env, stream_id, &escrow);

    events::escrow_milestone_updated(env, stream_id, target_date);
    Ok(())
}

/// Marks a milestone-based escrow's condition as met. Only the stream's
/// sender or the protocol admin may verify; the verifier is recorded.
pub fn verify_escrow_milestone(env: &Env, stream_id: u64, verifier: Address) -> Result<(), Error> {
    verifier.require_auth();

    let stream = storage::load_stream(env, stream_id)?;
    let config = storage::config(env);
    if verifier != stream.sender && verifier != config.admin {
        return Err(Error::NotAuthorized);
    }

    let mut escrow = storage::load_escrow(env, stream_id)?;
    ensure_open(&escrow)?;
    if escrow.condition_met {
        return Err(Error::AlreadyClaimed);
    }
    match escrow.condition {
        EscrowCondition::MilestoneBased(mut details) => {
            details.verified_by = Some(verifier.clone());
            escrow.condition = EscrowCondition::MilestoneBased(details);
        }
        _ => return Err(Error::InvalidParams),
    }
    escrow.condition_met = true;
    storage::save_escrow(env, stream_id, &escrow);

    events::escrow_verified(env, stream_id, &verifier);
    Ok(())
}

/// Oracle approval for an oracle-based escrow: marks both `oracle_verified`
/// and `condition_met` and stores the opaque attestation, if any.
pub fn approve_escrow_release(
    env: &Env,
    stream_id: u64,
    attestation: Option<Bytes>,
) -> Result<(), Error> {
    let mut escrow = storage::load_escrow(env, stream_id)?;
    ensure_open(&escrow)?;
    if escrow.condition_met {
        return Err(Error::AlreadyClaimed);
    }
    let oracle = match &escrow.condition {
        EscrowCondition::OracleBased(oracle) => oracle.clone(),
        _ => return Err(Error::InvalidParams),
    };
    oracle.require_auth();

    escrow.oracle_verified = true;
    escrow.condition_met = true;
    escrow.attestation = attestation;
    storage::save_escrow(env, stream_id, &escrow);

    events::escrow_approved(env, stream_id, &oracle);
    Ok(())
}

/// Pays the escrow to the stream's recipient once the condition holds.
/// Permissionless: the funds can only ever go to the recipient.
pub fn release_escrow(env: &Env, stream_id: u64) -> Result<i128, Error> {
    let stream = storage::load_stream(env, stream_id)?;
    let mut escrow = storage::load_escrow(env, stream_id)?;
    ensure_open(&escrow)?;
    if !releasable(env, &escrow) {
        return Err(Error::ConditionNotMet);
    }

    escrow.released = true;
    escrow.released_at = Some(env.ledger().timestamp());
    storage::save_escrow(env, stream_id, &escrow);

    let token_client = token::Client::new(env, &storage::config(env).token);
    token_client.transfer(
        &env.current_contract_address(),
        &stream.recipient,
        &escrow.amount,
    );

    events::escrow_released(env, stream_id, escrow.amount);
    Ok(escrow.amount)
}

/// Refunds the escrow to the sender. Allowed only while the condition is
/// unmet (a time lock that has expired counts as met) and nothing has been
/// released.
pub fn cancel_escrow(env: &Env, stream_id: u64) -> Result<(), Error> {
    let stream = storage::load_stream(env, stream_id)?;
    stream.sender.require_auth();

    let mut escrow = storage::load_escrow(env, stream_id)?;
    ensure_open(&escrow)?;
    if escrow.condition_met || releasable(env, &escrow) {
        return Err(Error::ConditionNotMet);
    }

    escrow.cancelled = true;
    escrow.cancelled_at = Some(env.ledger().timestamp());
    storage::save_escrow(env, stream_id, &escrow);

    let token_client = token::Client::new(env, &storage::config(env).token);
    token_client.transfer(
        &env.current_contract_address(),
        &stream.sender,
        &escrow.amount,
    );

    events::escrow_cancelled(env, stream_id, escrow.amount);
    Ok(())
}

pub fn get_stream_escrow(env: &Env, stream_id: u64) -> Result<Escrow, Error> {
    storage::load_escrow(env, stream_id)
}

pub fn is_escrow_releasable(env: &Env, stream_id: u64) -> Result<bool, Error> {
    let escrow = storage::load_escrow(env, stream_id)?;
    Ok(!escrow.released && !escrow.cancelled && releasable(env, &escrow))
}

pub fn get_escrow_status(env: &Env, stream_id: u64) -> Result<EscrowStatus, Error> {
    let escrow = storage::load_escrow(env, stream_id)?;
    Ok(if escrow.released {
        EscrowStatus::Released
    } else if escrow.cancelled {
        EscrowStatus::Cancelled
    } else {
        EscrowStatus::Locked
    })
}

fn ensure_open(escrow: &Escrow) -> Result<(), Error> {
    if escrow.released || escrow.cancelled {
        return Err(Error::AlreadyReleased);
    }
    Ok(())
}

fn releasable(env: &Env, escrow: &Escrow) -> bool {
    match &escrow.condition {
        EscrowCondition::TimeBased(locked_until) => {
            escrow.condition_met || env.ledger().timestamp() >= *locked_until
        }
        _ => escrow.condition_met,
    }
}
