//! Stream lifecycle: create, withdraw, cancel, top-up, transfer and the
//! advisory pause flag.

use soroban_sdk::{token, Address, Env};

use crate::{
    accrual,
    errors::Error,
    events, storage,
    types::{Stream, StreamStatus},
};

pub fn create_stream(
    env: &Env,
    sender: Address,
    recipient: Address,
    deposit: i128,
    start_time: u64,
    end_time: u64,
) -> Result<u64, Error> {
    sender.require_auth();

    let config = storage::config(env);
    if config.paused {
        return Err(Error::NotAuthorized);
    }
    if deposit <= 0 {
        return Err(Error::InvalidAmount);
    }
    if sender == recipient {
        return Err(Error::InvalidParams);
    }
    let now = env.ledger().timestamp();
    if end_time <= start_time || start_time < now {
        return Err(Error::InvalidTimes);
    }
    if storage::sender_streams(env, &sender).len() >= storage::MAX_STREAMS_PER_ADDRESS
        || storage::recipient_streams(env, &recipient).len() >= storage::MAX_STREAMS_PER_ADDRESS
    {
        return Err(Error::CapacityExceeded);
    }

    let fee = accrual::fee(deposit, config.fee_bps);
    let net = deposit - fee;
    if net <= 0 {
        return Err(Error::InvalidAmount);
    }
    let duration = (end_time - start_time) as i128;
    let rate_per_second = net / duration;

    // If either transfer fails the host rolls the whole invocation back, so
    // no stream is ever recorded without its deposit.
    let token_client = token::Client::new(env, &config.token);
    token_client.transfer(&sender, &env.current_contract_address(), &deposit);
    if fee > 0 {
        token_client.transfer(&env.current_contract_address(), &config.treasury, &fee);
    }

    let stream_id = storage::next_stream_id(env);
    let stream = Stream {
        id: stream_id,
        sender: sender.clone(),
        recipient: recipient.clone(),
        deposit_amount: net,
        withdrawn_amount: 0,
        rate_per_second,
        start_time,
        end_time,
        status: StreamStatus::Active,
        paused: false,
        paused_at: None,
        total_paused_duration: 0,
    };
    storage::save_stream(env, &stream);
    storage::push_sender_stream(env, &sender, stream_id)?;
    storage::push_recipient_stream(env, &recipient, stream_id)?;

    let mut stats = storage::stats(env);
    stats.total_streams += 1;
    stats.total_deposited += deposit;
    stats.total_fees += fee;
    storage::save_stats(env, &stats);

    events::stream_created(env, stream_id, &sender, &recipient, net);
    Ok(stream_id)
}

pub fn withdraw(env: &Env, stream_id: u64) -> Result<i128, Error> {
    let stream = storage::load_stream(env, stream_id)?;
    stream.recipient.require_auth();

    if stream.status != StreamStatus::Active {
        return Err(Error::StreamNotActive);
    }
    let now = env.ledger().timestamp();
    let withdrawable = accrual::withdrawable_amount(&stream, now);
    if withdrawable == 0 {
        return Err(Error::StreamDepleted);
    }

    let to = stream.recipient.clone();
    Ok(pay_out(env, stream, to, withdrawable))
}

pub fn withdraw_amount(env: &Env, stream_id: u64, amount: i128) -> Result<i128, Error> {
    let stream = storage::load_stream(env, stream_id)?;
    stream.recipient.require_auth();

    if stream.status != StreamStatus::Active {
        return Err(Error::StreamNotActive);
    }
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    let now = env.ledger().timestamp();
    if amount > accrual::withdrawable_amount(&stream, now) {
        return Err(Error::InsufficientBalance);
    }

    let to = stream.recipient.clone();
    Ok(pay_out(env, stream, to, amount))
}

/// Cancels an active stream: pays the recipient whatever has streamed but
/// was not yet withdrawn, refunds the rest to the sender and freezes the
/// record with `withdrawn_amount == streamed`, so
/// `recipient_paid + sender_refunded + prior_withdrawn == deposit` exactly.
pub fn cancel_stream(env: &Env, stream_id: u64) -> Result<(), Error> {
    let mut stream = storage::load_stream(env, stream_id)?;
    stream.sender.require_auth();

    if stream.status != StreamStatus::Active {
        return Err(Error::StreamNotActive);
    }

    let now = env.ledger().timestamp();
    let streamed = accrual::streamed_amount(&stream, now);
    let recipient_due = streamed - stream.withdrawn_amount;
    let sender_refund = stream.deposit_amount - streamed;

    // CEI: record the terminal state before the outbound transfers.
    stream.status = StreamStatus::Cancelled;
    stream.withdrawn_amount = streamed;
    storage::save_stream(env, &stream);

    let mut stats = storage::stats(env);
    stats.total_withdrawn += recipient_due;
    storage::save_stats(env, &stats);

    let token_client = token::Client::new(env, &storage::config(env).token);
    if recipient_due > 0 {
        token_client.transfer(
            &env.current_contract_address(),
            &stream.recipient,
            &recipient_due,
        );
    }
    if sender_refund > 0 {
        token_client.transfer(
            &env.current_contract_address(),
            &stream.sender,
            &sender_refund,
        );
    }

    events::stream_cancelled(env, stream_id, recipient_due, sender_refund);
    Ok(())
}

/// Adds funds to an active stream. The fee-deducted extra raises the
/// deposit and the rate is re-derived over the original `[start, end]`
/// window so the enlarged deposit still fully streams out by `end_time`.
pub fn top_up_stream(env: &Env, stream_id: u64, amount: i128) -> Result<i128, Error> {
    let mut stream = storage::load_stream(env, stream_id)?;
    stream.sender.require_auth();

    let config = storage::config(env);
    if config.paused {
        return Err(Error::NotAuthorized);
    }
    if stream.status != StreamStatus::Active {
        return Err(Error::StreamNotActive);
    }
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    let now = env.ledger().timestamp();
    if now >= stream.end_time {
        return Err(Error::InvalidTimes);
    }

    let fee = accrual::fee(amount, config.fee_bps);
    let net = amount - fee;
    if net <= 0 {
        return Err(Error::InvalidAmount);
    }

    let token_client = token::Client::new(env, &config.token);
    token_client.transfer(&stream.sender, &env.current_contract_address(), &amount);
    if fee > 0 {
        token_client.transfer(&env.current_contract_address(), &config.treasury, &fee);
    }

    stream.deposit_amount += net;
    let duration = (stream.end_time - stream.start_time) as i128;
    stream.rate_per_second = stream.deposit_amount / duration;
    storage::save_stream(env, &stream);

    let mut stats = storage::stats(env);
    stats.total_deposited += amount;
    stats.total_fees += fee;
    storage::save_stats(env, &stats);

    events::stream_topped_up(env, stream_id, net, stream.rate_per_second);
    Ok(net)
}

/// Reassigns the recipient of an active stream. Withdrawal history stays
/// with the stream; the id is appended to the new recipient's index.
pub fn transfer_stream(env: &Env, stream_id: u64, new_recipient: Address) -> Result<(), Error> {
    let mut stream = storage::load_stream(env, stream_id)?;
    stream.recipient.require_auth();

    if stream.status != StreamStatus::Active {
        return Err(Error::StreamNotActive);
    }
    if new_recipient == stream.recipient {
        return Err(Error::InvalidParams);
    }

    storage::push_recipient_stream(env, &new_recipient, stream_id)?;
    stream.recipient = new_recipient.clone();
    storage::save_stream(env, &stream);

    events::stream_transferred(env, stream_id, &new_recipient);
    Ok(())
}

/// Flags an active stream as paused and records the timestamp. The pause
/// state is advisory bookkeeping for off-chain dispute resolution; it does
/// not stop accrual or withdrawals.
pub fn pause_stream(env: &Env, stream_id: u64) -> Result<(), Error> {
    let mut stream = storage::load_stream(env, stream_id)?;
    stream.sender.require_auth();

    if stream.status != StreamStatus::Active {
        return Err(Error::StreamNotActive);
    }
    if stream.paused {
        return Err(Error::AlreadyPaused);
    }

    let now = env.ledger().timestamp();
    stream.paused = true;
    stream.paused_at = Some(now);
    storage::save_stream(env, &stream);

    events::stream_paused(env, stream_id, now);
    Ok(())
}

/// Clears the pause flag, folding the elapsed interval into
/// `total_paused_duration`.
pub fn unpause_stream(env: &Env, stream_id: u64) -> Result<(), Error> {
    let mut stream = storage::load_stream(env, stream_id)?;
    stream.sender.require_auth();

    if stream.status != StreamStatus::Active {
        return Err(Error::StreamNotActive);
    }
    if !stream.paused {
        return Err(Error::NotPaused);
    }

    let now = env.ledger().timestamp();
    let paused_for = now - stream.paused_at.unwrap_or(now);
    stream.total_paused_duration += paused_for;
    stream.paused = false;
    stream.paused_at = None;
    storage::save_stream(env, &stream);

    events::stream_unpaused(env, stream_id, paused_for);
    Ok(())
}

/// Books a withdrawal against the stream and transfers `amount` to `to`.
///
/// Callers have already validated the amount against the withdrawable pool;
/// this updates the withdrawn counter, flips the stream to `Completed` once
/// fully drained and emits the withdrawal event.
pub(crate) fn pay_out(env: &Env, mut stream: Stream, to: Address, amount: i128) -> i128 {
    stream.withdrawn_amount += amount;
    if stream.withdrawn_amount == stream.deposit_amount {
        stream.status = StreamStatus::Completed;
    }
    storage::save_stream(env, &stream);

    let mut stats = storage::stats(env);
    stats.total_withdrawn += amount;
    storage::save_stats(env, &stats);

    let token_client = token::Client::new(env, &storage::config(env).token);
    token_client.transfer(&env.current_contract_address(), &to, &amount);

    events::withdrawal(env, stream.id, &to, amount);
    amount
}
