//! Delegated withdrawal tests: grant, revoke, the expiry and limit bounds,
//! and the guarantee that delegated funds only ever reach the recipient.

use soroban_sdk::testutils::Address as _;
use soroban_sdk::Address;

use super::{TestContext, DEFAULT_RATE};
use crate::Error;

fn delegated(ctx: &TestContext) -> (u64, Address) {
    let stream_id = ctx.create_default_stream();
    let delegate = Address::generate(&ctx.env);
    ctx.client()
        .delegate_stream(&stream_id, &delegate, &2_000_u64, &5_000_i128);
    (stream_id, delegate)
}

#[test]
fn delegate_records_grant() {
    let ctx = TestContext::setup();
    let (stream_id, delegate) = delegated(&ctx);

    let delegation = ctx.client().get_delegation(&stream_id);
    assert_eq!(delegation.delegate, delegate);
    assert_eq!(delegation.expires_at, 2_000);
    assert_eq!(delegation.withdrawal_limit, 5_000);
    assert_eq!(delegation.total_withdrawn, 0);
    assert!(delegation.active);
}

#[test]
fn delegated_withdraw_pays_the_recipient() {
    let ctx = TestContext::setup();
    let (stream_id, delegate) = delegated(&ctx);

    ctx.set_time(600);
    let paid = ctx.client().delegated_withdraw(&stream_id, &1_000_i128);
    assert_eq!(paid, 1_000);

    // The delegate triggers the withdrawal but never receives the funds.
    assert_eq!(ctx.token().balance(&delegate), 0);
    assert_eq!(ctx.token().balance(&ctx.recipient), 1_000);

    let delegation = ctx.client().get_delegation(&stream_id);
    assert_eq!(delegation.total_withdrawn, 1_000);
}

#[test]
fn delegated_withdraw_counts_against_the_stream() {
    let ctx = TestContext::setup();
    let (stream_id, _) = delegated(&ctx);

    ctx.set_time(600);
    ctx.client().delegated_withdraw(&stream_id, &1_000_i128);

    // The same accrued tokens cannot be withdrawn again by the recipient.
    assert_eq!(
        ctx.client().get_withdrawable_amount(&stream_id),
        DEFAULT_RATE * 500 - 1_000
    );
    let stream = ctx.client().get_stream(&stream_id);
    assert_eq!(stream.withdrawn_amount, 1_000);
}

#[test]
fn delegated_withdraw_enforces_cumulative_limit() {
    let ctx = TestContext::setup();
    let (stream_id, _) = delegated(&ctx);

    ctx.set_time(1_000);
    ctx.client().delegated_withdraw(&stream_id, &3_000_i128);
    ctx.client().delegated_withdraw(&stream_id, &2_000_i128);

    // Limit of 5_000 is exhausted even though the stream has more accrued.
    let res = ctx.client().try_delegated_withdraw(&stream_id, &1_i128);
    assert_eq!(res, Err(Ok(Error::InsufficientBalance)));
}

#[test]
fn delegated_withdraw_is_bounded_by_accrual() {
    let ctx = TestContext::setup();
    let (stream_id, _) = delegated(&ctx);

    ctx.set_time(200);
    let res = ctx
        .client()
        .try_delegated_withdraw(&stream_id, &(DEFAULT_RATE * 100 + 1));
    assert_eq!(res, Err(Ok(Error::InsufficientBalance)));
}

#[test]
fn delegated_withdraw_after_expiry_fails() {
    let ctx = TestContext::setup();
    let (stream_id, _) = delegated(&ctx);

    ctx.set_time(2_000);
    let res = ctx.client().try_delegated_withdraw(&stream_id, &100_i128);
    assert_eq!(res, Err(Ok(Error::ConditionNotMet)));
}

#[test]
fn revoked_delegation_cannot_withdraw() {
    let ctx = TestContext::setup();
    let (stream_id, _) = delegated(&ctx);

    ctx.client().revoke_delegation(&stream_id);
    assert!(!ctx.client().get_delegation(&stream_id).active);

    ctx.set_time(600);
    let res = ctx.client().try_delegated_withdraw(&stream_id, &100_i128);
    assert_eq!(res, Err(Ok(Error::DelegationNotFound)));

    // Revoking again has nothing to revoke.
    let res = ctx.client().try_revoke_delegation(&stream_id);
    assert_eq!(res, Err(Ok(Error::DelegationNotFound)));
}

#[test]
fn one_active_delegation_per_stream() {
    let ctx = TestContext::setup();
    let (stream_id, _) = delegated(&ctx);

    let other = Address::generate(&ctx.env);
    let res = ctx
        .client()
        .try_delegate_stream(&stream_id, &other, &2_000_u64, &5_000_i128);
    assert_eq!(res, Err(Ok(Error::AlreadyExists)));

    // Revocation frees the slot for a new grant.
    ctx.client().revoke_delegation(&stream_id);
    ctx.client()
        .delegate_stream(&stream_id, &other, &2_000_u64, &5_000_i128);
    assert_eq!(ctx.client().get_delegation(&stream_id).delegate, other);
}

#[test]
fn delegate_validation() {
    let ctx = TestContext::setup();
    let stream_id = ctx.create_default_stream();
    let delegate = Address::generate(&ctx.env);

    let res = ctx
        .client()
        .try_delegate_stream(&stream_id, &delegate, &2_000_u64, &0_i128);
    assert_eq!(res, Err(Ok(Error::InvalidAmount)));

    let res = ctx
        .client()
        .try_delegate_stream(&stream_id, &ctx.recipient, &2_000_u64, &5_000_i128);
    assert_eq!(res, Err(Ok(Error::InvalidParams)));

    // Expiry must lie in the future.
    ctx.set_time(50);
    let res = ctx
        .client()
        .try_delegate_stream(&stream_id, &delegate, &50_u64, &5_000_i128);
    assert_eq!(res, Err(Ok(Error::InvalidTimes)));
}

#[test]
fn delegate_on_cancelled_stream_fails() {
    let ctx = TestContext::setup();
    let stream_id = ctx.create_default_stream();
    ctx.set_time(600);
    ctx.client().cancel_stream(&stream_id);

    let delegate = Address::generate(&ctx.env);
    let res = ctx
        .client()
        .try_delegate_stream(&stream_id, &delegate, &2_000_u64, &5_000_i128);
    assert_eq!(res, Err(Ok(Error::StreamNotActive)));
}

#[test]
fn missing_delegation_is_not_found() {
    let ctx = TestContext::setup();
    let stream_id = ctx.create_default_stream();

    let res = ctx.client().try_get_delegation(&stream_id);
    assert_eq!(res, Err(Ok(Error::DelegationNotFound)));
}
