//! Event emission helpers. Events carry the operation, the stream id and
//! the moved amounts for the external notification relay; they are
//! best-effort and never load-bearing for ledger correctness.

use soroban_sdk::{symbol_short, Address, Env};

pub fn stream_created(env: &Env, stream_id: u64, sender: &Address, recipient: &Address, net_deposit: i128) {
    env.events().publish(
        (symbol_short!("created"), stream_id),
        (sender.clone(), recipient.clone(), net_deposit),
    );
}

pub fn withdrawal(env: &Env, stream_id: u64, to: &Address, amount: i128) {
    env.events()
        .publish((symbol_short!("withdrew"), stream_id), (to.clone(), amount));
}

pub fn stream_cancelled(env: &Env, stream_id: u64, recipient_paid: i128, sender_refunded: i128) {
    env.events().publish(
        (symbol_short!("cancelled"), stream_id),
        (recipient_paid, sender_refunded),
    );
}

pub fn stream_topped_up(env: &Env, stream_id: u64, net_amount: i128, new_rate: i128) {
    env.events()
        .publish((symbol_short!("topped"), stream_id), (net_amount, new_rate));
}

pub fn stream_transferred(env: &Env, stream_id: u64, new_recipient: &Address) {
    env.events()
        .publish((symbol_short!("xferred"), stream_id), new_recipient.clone());
}

pub fn stream_paused(env: &Env, stream_id: u64, at: u64) {
    env.events().publish((symbol_short!("paused"), stream_id), at);
}

pub fn stream_unpaused(env: &Env, stream_id: u64, paused_for: u64) {
    env.events()
        .publish((symbol_short!("unpaused"), stream_id), paused_for);
}

pub fn delegated(env: &Env, stream_id: u64, delegate: &Address, limit: i128) {
    env.events().publish(
        (symbol_short!("delegated"), stream_id),
        (delegate.clone(), limit),
    );
}

pub fn delegation_revoked(env: &Env, stream_id: u64) {
    env.events()
        .publish((symbol_short!("revoked"), stream_id), ());
}

pub fn delegated_withdrawal(env: &Env, stream_id: u64, delegate: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("delwdrew"), stream_id),
        (delegate.clone(), amount),
    );
}

pub fn split_created(env: &Env, stream_id: u64, recipients: u32) {
    env.events()
        .publish((symbol_short!("split"), stream_id), recipients);
}

pub fn split_withdrawal(env: &Env, stream_id: u64, recipient: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("splitwdrw"), stream_id),
        (recipient.clone(), amount),
    );
}

pub fn milestone_added(env: &Env, stream_id: u64, threshold: u32, bonus: i128) {
    env.events()
        .publish((symbol_short!("msadded"), stream_id), (threshold, bonus));
}

pub fn milestone_claimed(env: &Env, stream_id: u64, threshold: u32, bonus: i128) {
    env.events()
        .publish((symbol_short!("msclaimed"), stream_id), (threshold, bonus));
}

pub fn milestone_removed(env: &Env, stream_id: u64, threshold: u32, bonus: i128) {
    env.events()
        .publish((symbol_short!("msremoved"), stream_id), (threshold, bonus));
}

pub fn escrow_created(env: &Env, stream_id: u64, amount: i128) {
    env.events()
        .publish((symbol_short!("escrowed"), stream_id), amount);
}

pub fn escrow_milestone_updated(env: &Env, stream_id: u64, target_date: u64) {
    env.events()
        .publish((symbol_short!("esmstone"), stream_id), target_date);
}

pub fn escrow_verified(env: &Env, stream_id: u64, verifier: &Address) {
    env.events()
        .publish((symbol_short!("esverify"), stream_id), verifier.clone());
}

pub fn escrow_approved(env: &Env, stream_id: u64, oracle: &Address) {
    env.events()
        .publish((symbol_short!("esapprove"), stream_id), oracle.clone());
}

pub fn escrow_released(env: &Env, stream_id: u64, amount: i128) {
    env.events()
        .publish((symbol_short!("esrelease"), stream_id), amount);
}

pub fn escrow_cancelled(env: &Env, stream_id: u64, amount: i128) {
    env.events()
        .publish((symbol_short!("escancel"), stream_id), amount);
}

pub fn protocol_paused(env: &Env, paused: bool) {
    env.events()
        .publish((symbol_short!("protpause"),), paused);
}

pub fn emergency_withdrawal(env: &Env, to: &Address, amount: i128) {
    env.events()
        .publish((symbol_short!("emergency"),), (to.clone(), amount));
}

pub fn admin_updated(env: &Env, old_admin: &Address, new_admin: &Address) {
    env.events().publish(
        (symbol_short!("admin"), symbol_short!("updated")),
        (old_admin.clone(), new_admin.clone()),
    );
}
