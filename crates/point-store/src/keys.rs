//! Key encoding utilities for `RocksDB`.
//!
//! Integers are encoded big-endian so that keys sort in numeric order within a
//! prefix.

use point_core::{HistoryId, UserId};

/// Create a balance key from a user ID.
#[must_use]
pub fn user_point_key(user_id: UserId) -> Vec<u8> {
    user_id.to_be_bytes().to_vec()
}

/// Create a history key from a history ID.
#[must_use]
pub fn history_key(history_id: HistoryId) -> Vec<u8> {
    history_id.to_be_bytes().to_vec()
}

/// Create a user-history index key.
///
/// Format: `user_id (8 bytes) || history_id (8 bytes)`
///
/// History ids are allocated in increasing order, so a user's records sort in
/// insertion order.
#[must_use]
pub fn user_history_key(user_id: UserId, history_id: HistoryId) -> Vec<u8> {
    let mut key = Vec::with_capacity(16);
    key.extend_from_slice(&user_id.to_be_bytes());
    key.extend_from_slice(&history_id.to_be_bytes());
    key
}

/// Create a prefix for iterating all history records for a user.
#[must_use]
pub fn user_histories_prefix(user_id: UserId) -> Vec<u8> {
    user_id.to_be_bytes().to_vec()
}

/// Extract the history ID from a user-history index key.
///
/// Returns `None` if the key is not exactly 16 bytes.
#[must_use]
pub fn history_id_from_user_key(key: &[u8]) -> Option<HistoryId> {
    if key.len() != 16 {
        return None;
    }
    let bytes: [u8; 8] = key[8..16].try_into().ok()?;
    Some(HistoryId::from_be_bytes(bytes))
}

/// Decode a history key.
///
/// Returns `None` if the key is not exactly 8 bytes.
#[must_use]
pub fn history_id_from_key(key: &[u8]) -> Option<HistoryId> {
    let bytes: [u8; 8] = key.try_into().ok()?;
    Some(HistoryId::from_be_bytes(bytes))
}
