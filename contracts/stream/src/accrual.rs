//! Pure accrual math: streamed, withdrawable and remaining amounts plus
//! progress, as total functions of `(stream record, now)`.
//!
//! Boundary policy: zero strictly before `start_time`, the full deposit at
//! or after `end_time`, `rate × elapsed` in between. The rate itself is
//! pre-floored at creation/top-up (`net deposit / duration`), so the linear
//! leg can undershoot the deposit by the rounding residual; the end-time
//! rule closes that gap. Recorded pause intervals are deliberately absent
//! from these formulas (see DESIGN.md).

use crate::types::{Stream, StreamStatus};

/// Total amount streamed to the recipient at `now`.
///
/// Terminal states are deterministic: a completed stream has streamed its
/// whole deposit, a cancelled stream is frozen at the amount that had
/// streamed when it was cancelled (stored in `withdrawn_amount` by cancel).
pub fn streamed_amount(stream: &Stream, now: u64) -> i128 {
    match stream.status {
        StreamStatus::Completed => stream.deposit_amount,
        StreamStatus::Cancelled => stream.withdrawn_amount,
        StreamStatus::Active => {
            if now < stream.start_time {
                return 0;
            }
            if now >= stream.end_time {
                return stream.deposit_amount;
            }
            let elapsed = (now - stream.start_time) as i128;
            // rate = floor(deposit / duration) and elapsed < duration, so the
            // product is always below the deposit; min guards the invariant.
            (stream.rate_per_second * elapsed).min(stream.deposit_amount)
        }
    }
}

/// Streamed but not yet withdrawn.
pub fn withdrawable_amount(stream: &Stream, now: u64) -> i128 {
    (streamed_amount(stream, now) - stream.withdrawn_amount).max(0)
}

/// Deposit not yet withdrawn: `withdrawn + remaining == deposit` always.
pub fn remaining_balance(stream: &Stream) -> i128 {
    stream.deposit_amount - stream.withdrawn_amount
}

/// Stream progress in whole percent, with the same boundary rules as
/// `streamed_amount`: 0 before start, 100 at or after end.
pub fn progress(stream: &Stream, now: u64) -> u32 {
    if now < stream.start_time {
        return 0;
    }
    if now >= stream.end_time {
        return 100;
    }
    let elapsed = now - stream.start_time;
    let duration = stream.end_time - stream.start_time;
    (elapsed * 100 / duration) as u32
}

/// Protocol fee on a gross amount, floored.
pub fn fee(amount: i128, fee_bps: u32) -> i128 {
    amount * fee_bps as i128 / 10_000
}
