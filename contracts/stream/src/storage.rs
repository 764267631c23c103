//! Storage helpers for instance and persistent data.

use soroban_sdk::{Address, Env, Vec};

use crate::{
    errors::Error,
    types::{Config, DataKey, Delegation, Escrow, Milestone, ProtocolStats, Split, Stream},
};

/// Streams indexed per sender or recipient address. Exceeding the cap is a
/// hard `CapacityExceeded` failure, never a silent truncation.
pub const MAX_STREAMS_PER_ADDRESS: u32 = 50;
/// Bonus milestones attachable to a single stream.
pub const MAX_MILESTONES_PER_STREAM: u32 = 10;
/// Recipients in a single split.
pub const MAX_SPLIT_RECIPIENTS: u32 = 10;

// TTL extension applied on every save so records outlive the archival window.
const TTL_THRESHOLD: u32 = 17280;
const TTL_EXTEND_TO: u32 = 120960;

// ---------------------------------------------------------------------------
// Config & counters (instance storage)
// ---------------------------------------------------------------------------

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn config(env: &Env) -> Config {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .expect("contract not initialised: missing config")
}

pub fn save_config(env: &Env, config: &Config) {
    env.storage().instance().set(&DataKey::Config, config);
    env.storage().instance().extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn init_stream_counter(env: &Env) {
    env.storage().instance().set(&DataKey::NextStreamId, &0u64);
}

/// Allocates the next stream id. Ids are monotonic and never reused.
pub fn next_stream_id(env: &Env) -> u64 {
    let id: u64 = env
        .storage()
        .instance()
        .get(&DataKey::NextStreamId)
        .unwrap_or(0);
    env.storage().instance().set(&DataKey::NextStreamId, &(id + 1));
    id
}

pub fn stats(env: &Env) -> ProtocolStats {
    env.storage()
        .instance()
        .get(&DataKey::Stats)
        .unwrap_or(ProtocolStats {
            total_streams: 0,
            total_deposited: 0,
            total_fees: 0,
            total_withdrawn: 0,
        })
}

pub fn save_stats(env: &Env, stats: &ProtocolStats) {
    env.storage().instance().set(&DataKey::Stats, stats);
}

// ---------------------------------------------------------------------------
// Streams & indices
// ---------------------------------------------------------------------------

pub fn load_stream(env: &Env, stream_id: u64) -> Result<Stream, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Stream(stream_id))
        .ok_or(Error::StreamNotFound)
}

pub fn save_stream(env: &Env, stream: &Stream) {
    let key = DataKey::Stream(stream.id);
    env.storage().persistent().set(&key, stream);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn sender_streams(env: &Env, sender: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::SenderStreams(sender.clone()))
        .unwrap_or(Vec::new(env))
}

pub fn recipient_streams(env: &Env, recipient: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::RecipientStreams(recipient.clone()))
        .unwrap_or(Vec::new(env))
}

pub fn push_sender_stream(env: &Env, sender: &Address, stream_id: u64) -> Result<(), Error> {
    let mut ids = sender_streams(env, sender);
    if ids.len() >= MAX_STREAMS_PER_ADDRESS {
        return Err(Error::CapacityExceeded);
    }
    ids.push_back(stream_id);
    let key = DataKey::SenderStreams(sender.clone());
    env.storage().persistent().set(&key, &ids);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    Ok(())
}

pub fn push_recipient_stream(env: &Env, recipient: &Address, stream_id: u64) -> Result<(), Error> {
    let mut ids = recipient_streams(env, recipient);
    if ids.len() >= MAX_STREAMS_PER_ADDRESS {
        return Err(Error::CapacityExceeded);
    }
    ids.push_back(stream_id);
    let key = DataKey::RecipientStreams(recipient.clone());
    env.storage().persistent().set(&key, &ids);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    Ok(())
}

// ---------------------------------------------------------------------------
// Delegations & splits
// ---------------------------------------------------------------------------

pub fn load_delegation(env: &Env, stream_id: u64) -> Result<Delegation, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Delegation(stream_id))
        .ok_or(Error::DelegationNotFound)
}

pub fn save_delegation(env: &Env, stream_id: u64, delegation: &Delegation) {
    let key = DataKey::Delegation(stream_id);
    env.storage().persistent().set(&key, delegation);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn has_split(env: &Env, stream_id: u64) -> bool {
    env.storage().persistent().has(&DataKey::Split(stream_id))
}

pub fn load_split(env: &Env, stream_id: u64) -> Result<Split, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Split(stream_id))
        .ok_or(Error::SplitNotFound)
}

pub fn save_split(env: &Env, stream_id: u64, split: &Split) {
    let key = DataKey::Split(stream_id);
    env.storage().persistent().set(&key, split);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ---------------------------------------------------------------------------
// Milestones
// ---------------------------------------------------------------------------

pub fn has_milestone(env: &Env, stream_id: u64, threshold: u32) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Milestone(stream_id, threshold))
}

pub fn load_milestone(env: &Env, stream_id: u64, threshold: u32) -> Result<Milestone, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Milestone(stream_id, threshold))
        .ok_or(Error::MilestoneNotFound)
}

pub fn save_milestone(env: &Env, milestone: &Milestone) {
    let key = DataKey::Milestone(milestone.stream_id, milestone.threshold);
    env.storage().persistent().set(&key, milestone);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn milestone_thresholds(env: &Env, stream_id: u64) -> Vec<u32> {
    env.storage()
        .persistent()
        .get(&DataKey::StreamMilestones(stream_id))
        .unwrap_or(Vec::new(env))
}

pub fn push_milestone_threshold(env: &Env, stream_id: u64, threshold: u32) -> Result<(), Error> {
    let mut thresholds = milestone_thresholds(env, stream_id);
    if thresholds.len() >= MAX_MILESTONES_PER_STREAM {
        return Err(Error::CapacityExceeded);
    }
    thresholds.push_back(threshold);
    let key = DataKey::StreamMilestones(stream_id);
    env.storage().persistent().set(&key, &thresholds);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    Ok(())
}

/// Removes the milestone record and its list entry. The only physical
/// deletion in the system: every other record survives as audit trail.
pub fn delete_milestone(env: &Env, stream_id: u64, threshold: u32) {
    env.storage()
        .persistent()
        .remove(&DataKey::Milestone(stream_id, threshold));

    let thresholds = milestone_thresholds(env, stream_id);
    let mut remaining = Vec::new(env);
    for t in thresholds.iter() {
        if t != threshold {
            remaining.push_back(t);
        }
    }
    env.storage()
        .persistent()
        .set(&DataKey::StreamMilestones(stream_id), &remaining);
}

// ---------------------------------------------------------------------------
// Escrows
// ---------------------------------------------------------------------------

pub fn has_escrow(env: &Env, stream_id: u64) -> bool {
    env.storage().persistent().has(&DataKey::Escrow(stream_id))
}

pub fn load_escrow(env: &Env, stream_id: u64) -> Result<Escrow, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Escrow(stream_id))
        .ok_or(Error::EscrowNotFound)
}

pub fn save_escrow(env: &Env, stream_id: u64, escrow: &Escrow) {
    let key = DataKey::Escrow(stream_id);
    env.storage().persistent().set(&key, escrow);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
