//! Unit tests for the pure accrual math, plus the numeric scenarios the
//! protocol is specified against.

use soroban_sdk::{testutils::Address as _, Address, Env};

use super::TestContext;
use crate::{accrual, Stream, StreamStatus};

fn sample_stream(env: &Env) -> Stream {
    Stream {
        id: 0,
        sender: Address::generate(env),
        recipient: Address::generate(env),
        deposit_amount: 9_970,
        withdrawn_amount: 0,
        rate_per_second: 9,
        start_time: 100,
        end_time: 1_100,
        status: StreamStatus::Active,
        paused: false,
        paused_at: None,
        total_paused_duration: 0,
    }
}

#[test]
fn streamed_is_zero_before_start() {
    let env = Env::default();
    let stream = sample_stream(&env);

    assert_eq!(accrual::streamed_amount(&stream, 0), 0);
    assert_eq!(accrual::streamed_amount(&stream, 99), 0);
}

#[test]
fn streamed_is_full_deposit_at_and_after_end() {
    let env = Env::default();
    let stream = sample_stream(&env);

    // The rate is floored, so the linear leg alone never reaches the
    // deposit; the end-time rule closes the rounding gap.
    assert_eq!(accrual::streamed_amount(&stream, 1_100), 9_970);
    assert_eq!(accrual::streamed_amount(&stream, 1_000_000), 9_970);
}

#[test]
fn streamed_is_linear_between_start_and_end() {
    let env = Env::default();
    let stream = sample_stream(&env);

    assert_eq!(accrual::streamed_amount(&stream, 100), 0);
    assert_eq!(accrual::streamed_amount(&stream, 101), 9);
    assert_eq!(accrual::streamed_amount(&stream, 600), 9 * 500);
    assert_eq!(accrual::streamed_amount(&stream, 1_099), 9 * 999);
}

#[test]
fn streamed_is_monotonic_in_time() {
    let env = Env::default();
    let stream = sample_stream(&env);

    let mut last = 0;
    for now in (0_u64..1_200).step_by(7) {
        let streamed = accrual::streamed_amount(&stream, now);
        assert!(streamed >= last, "streamed amount decreased at t={}", now);
        last = streamed;
    }
}

#[test]
fn withdrawable_subtracts_withdrawn() {
    let env = Env::default();
    let mut stream = sample_stream(&env);
    stream.withdrawn_amount = 4_000;

    assert_eq!(accrual::withdrawable_amount(&stream, 600), 4_500 - 4_000);
    // More withdrawn than currently streamed clamps to zero rather than
    // going negative.
    stream.withdrawn_amount = 5_000;
    assert_eq!(accrual::withdrawable_amount(&stream, 600), 0);
}

#[test]
fn remaining_plus_withdrawn_equals_deposit() {
    let env = Env::default();
    let mut stream = sample_stream(&env);

    for withdrawn in [0, 1, 4_500, 9_970] {
        stream.withdrawn_amount = withdrawn;
        assert_eq!(
            stream.withdrawn_amount + accrual::remaining_balance(&stream),
            stream.deposit_amount
        );
    }
}

#[test]
fn progress_boundaries_match_streamed_boundaries() {
    let env = Env::default();
    let stream = sample_stream(&env);

    assert_eq!(accrual::progress(&stream, 99), 0);
    assert_eq!(accrual::progress(&stream, 100), 0);
    assert_eq!(accrual::progress(&stream, 600), 50);
    assert_eq!(accrual::progress(&stream, 1_099), 99);
    assert_eq!(accrual::progress(&stream, 1_100), 100);
    assert_eq!(accrual::progress(&stream, 2_000), 100);
}

#[test]
fn terminal_states_are_time_independent() {
    let env = Env::default();
    let mut stream = sample_stream(&env);

    stream.status = StreamStatus::Completed;
    stream.withdrawn_amount = stream.deposit_amount;
    assert_eq!(accrual::streamed_amount(&stream, 0), 9_970);
    assert_eq!(accrual::streamed_amount(&stream, 1_000_000), 9_970);

    // A cancelled stream is frozen at what had streamed when it was
    // cancelled, which cancel stores in withdrawn_amount.
    stream.status = StreamStatus::Cancelled;
    stream.withdrawn_amount = 4_500;
    assert_eq!(accrual::streamed_amount(&stream, 1_000_000), 4_500);
}

#[test]
fn fee_floors() {
    assert_eq!(accrual::fee(100_000_000, 30), 300_000);
    assert_eq!(accrual::fee(10_000, 30), 30);
    assert_eq!(accrual::fee(333, 30), 0);
    assert_eq!(accrual::fee(1_000, 0), 0);
}

// ---------------------------------------------------------------------------
// Specified numeric scenarios, via the deployed contract
// ---------------------------------------------------------------------------

#[test]
fn thirty_day_stream_half_duration_withdrawable() {
    let ctx = TestContext::setup();
    ctx.set_time(0);

    // 100_000_000 over 30 days; 0.3% fee leaves 99_700_000 and the rate
    // floors to 38/s.
    let stream_id = ctx.client().create_stream(
        &ctx.sender,
        &ctx.recipient,
        &100_000_000_i128,
        &0_u64,
        &2_592_000_u64,
    );

    ctx.set_time(1_296_000);
    let withdrawable = ctx.client().get_withdrawable_amount(&stream_id);
    assert_eq!(withdrawable, 38 * 1_296_000);
}

#[test]
fn protocol_fee_on_one_hundred_million() {
    let ctx = TestContext::setup();
    assert_eq!(ctx.client().calculate_fee(&100_000_000_i128), 300_000);
}

#[test]
fn reads_are_idempotent_for_fixed_state_and_time() {
    let ctx = TestContext::setup();
    let stream_id = ctx.create_default_stream();

    ctx.set_time(600);
    let first = (
        ctx.client().get_streamed_amount(&stream_id),
        ctx.client().get_withdrawable_amount(&stream_id),
        ctx.client().get_remaining_balance(&stream_id),
        ctx.client().get_stream_progress(&stream_id),
    );
    let second = (
        ctx.client().get_streamed_amount(&stream_id),
        ctx.client().get_withdrawable_amount(&stream_id),
        ctx.client().get_remaining_balance(&stream_id),
        ctx.client().get_stream_progress(&stream_id),
    );
    assert_eq!(first, second);
}
