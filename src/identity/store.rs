//! Identity store: the single owner of the client-held identity record.
//!
//! DESIGN
//! ======
//! The record is loaded once from durable storage at construction and
//! mirrored in memory; reads never touch storage. Only whole-record writes
//! and whole-record clears exist, so partial identity state cannot be built.
//!
//! Every write and clear advances an epoch. A caller that starts a network
//! round-trip captures the epoch first and commits its result with
//! [`IdentityStore::write_if_current`]; if a logout or expiry cleared the
//! store in the meantime the stale result is dropped instead of
//! resurrecting the old identity.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::record::{IdentityRecord, Role, UserId};
use super::storage::Storage;
use crate::error::ClientError;

pub const USER_ID_KEY: &str = "userId";
pub const USERNAME_KEY: &str = "username";
pub const ROLE_KEY: &str = "role";

const IDENTITY_KEYS: [&str; 3] = [USER_ID_KEY, USERNAME_KEY, ROLE_KEY];

#[derive(Debug)]
struct StoreState {
    epoch: u64,
    current: Option<IdentityRecord>,
}

pub struct IdentityStore {
    storage: Arc<dyn Storage>,
    state: Mutex<StoreState>,
}

impl IdentityStore {
    /// Load the persisted record, discarding it if any field is missing or invalid.
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let current = read_record(storage.as_ref());
        if current.is_none() && IDENTITY_KEYS.iter().any(|key| storage.get(key).is_some()) {
            tracing::warn!("discarding partial identity found in storage");
            if let Err(e) = storage.remove_all(&IDENTITY_KEYS) {
                tracing::warn!(error = %e, "failed to scrub partial identity");
            }
        }
        Self { storage, state: Mutex::new(StoreState { epoch: 0, current }) }
    }

    /// Current record, or `None` when logged out.
    #[must_use]
    pub fn read(&self) -> Option<IdentityRecord> {
        self.lock().current.clone()
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.lock().current.is_some()
    }

    /// Version counter advanced by every write and clear.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.lock().epoch
    }

    /// Replace the record.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] if the record could not be persisted;
    /// the in-memory record is left unchanged in that case.
    pub fn write(&self, record: IdentityRecord) -> Result<(), ClientError> {
        let mut state = self.lock();
        self.commit_write(&mut state, record)
    }

    /// Remove the record. Clearing an empty store is a no-op success.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] if durable storage could not be
    /// scrubbed after one retry. The in-memory record is cleared regardless,
    /// but the stale record stays on disk and [`IdentityStore::load`] will
    /// restore it in the next process.
    pub fn clear(&self) -> Result<(), ClientError> {
        let mut state = self.lock();
        self.commit_clear(&mut state)
    }

    /// Replace the record only if nothing else wrote or cleared since `epoch`.
    ///
    /// # Errors
    ///
    /// Same as [`IdentityStore::write`].
    pub fn write_if_current(&self, epoch: u64, record: IdentityRecord) -> Result<bool, ClientError> {
        let mut state = self.lock();
        if state.epoch != epoch {
            tracing::debug!(expected = epoch, actual = state.epoch, "dropping stale identity write");
            return Ok(false);
        }
        self.commit_write(&mut state, record).map(|()| true)
    }

    /// Clear the record only if nothing else wrote or cleared since `epoch`.
    ///
    /// # Errors
    ///
    /// Same as [`IdentityStore::clear`].
    pub fn clear_if_current(&self, epoch: u64) -> Result<bool, ClientError> {
        let mut state = self.lock();
        if state.epoch != epoch {
            tracing::debug!(expected = epoch, actual = state.epoch, "dropping stale identity clear");
            return Ok(false);
        }
        self.commit_clear(&mut state).map(|()| true)
    }

    fn commit_write(&self, state: &mut StoreState, record: IdentityRecord) -> Result<(), ClientError> {
        self.storage.set_all(&[
            (USER_ID_KEY, record.user_id.to_string()),
            (USERNAME_KEY, record.username.clone()),
            (ROLE_KEY, record.role.as_str().to_owned()),
        ])?;
        state.epoch += 1;
        state.current = Some(record);
        Ok(())
    }

    fn commit_clear(&self, state: &mut StoreState) -> Result<(), ClientError> {
        state.epoch += 1;
        state.current = None;
        self.storage.remove_all(&IDENTITY_KEYS).or_else(|e| {
            tracing::warn!(error = %e, "identity scrub failed; retrying once");
            self.storage.remove_all(&IDENTITY_KEYS)
        })
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn read_record(storage: &dyn Storage) -> Option<IdentityRecord> {
    let user_id = storage.get(USER_ID_KEY)?.parse::<UserId>().ok()?;
    let username = storage.get(USERNAME_KEY)?;
    let role = storage.get(ROLE_KEY)?.parse::<Role>().ok()?;
    IdentityRecord::new(user_id, username, role).ok()
}
