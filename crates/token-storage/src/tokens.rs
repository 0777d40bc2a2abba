//! High-level API for the access/refresh token pair.

use crate::{KeyValueStore, StorageKeys, StorageResult};
use std::sync::{Mutex, MutexGuard};

/// High-level API for storing and retrieving session tokens.
///
/// The pair is written together and cleared together. Session state is
/// derived from storage on every call; nothing is cached here. Compound
/// writes are serialized so a reader never sees one half of a new pair next
/// to one half of an old one.
pub struct TokenStore {
    storage: Box<dyn KeyValueStore>,
    pair_lock: Mutex<()>,
}

impl TokenStore {
    /// Create a new token store with the given storage backend
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            pair_lock: Mutex::new(()),
        }
    }

    fn lock_pair(&self) -> MutexGuard<'_, ()> {
        self.pair_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store both tokens, overwriting any previous pair.
    pub fn set_tokens(&self, access_token: &str, refresh_token: &str) -> StorageResult<()> {
        let _pair = self.lock_pair();
        self.storage.set(StorageKeys::ACCESS_TOKEN, access_token)?;
        if let Err(err) = self.storage.set(StorageKeys::REFRESH_TOKEN, refresh_token) {
            // Never leave a fresh access token paired with a stale refresh token.
            let _ = self.storage.delete(StorageKeys::ACCESS_TOKEN);
            return Err(err);
        }
        tracing::debug!("Stored session token pair");
        Ok(())
    }

    /// Replace the access token, but only while `refresh_token` is still the
    /// stored refresh token. Returns whether the write happened.
    ///
    /// A refresh that completes after a logout or a new sign-in must not
    /// graft its access token onto whatever pair is stored now.
    pub fn replace_access_token(
        &self,
        refresh_token: &str,
        access_token: &str,
    ) -> StorageResult<bool> {
        let _pair = self.lock_pair();
        if self.storage.get(StorageKeys::REFRESH_TOKEN)?.as_deref() != Some(refresh_token) {
            return Ok(false);
        }
        self.storage.set(StorageKeys::ACCESS_TOKEN, access_token)?;
        Ok(true)
    }

    pub fn get_access_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(StorageKeys::ACCESS_TOKEN)
    }

    pub fn get_refresh_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(StorageKeys::REFRESH_TOKEN)
    }

    /// Remove both tokens. Idempotent.
    pub fn clear_tokens(&self) -> StorageResult<()> {
        let _pair = self.lock_pair();
        self.clear_locked()
    }

    /// Remove both tokens only while `refresh_token` is still stored.
    /// Returns whether anything was cleared.
    pub fn clear_tokens_if_refresh(&self, refresh_token: &str) -> StorageResult<bool> {
        let _pair = self.lock_pair();
        if self.storage.get(StorageKeys::REFRESH_TOKEN)?.as_deref() != Some(refresh_token) {
            return Ok(false);
        }
        self.clear_locked()?;
        Ok(true)
    }

    fn clear_locked(&self) -> StorageResult<()> {
        let had_access = self.storage.delete(StorageKeys::ACCESS_TOKEN)?;
        let had_refresh = self.storage.delete(StorageKeys::REFRESH_TOKEN)?;
        if had_access || had_refresh {
            tracing::debug!("Cleared session token pair");
        }
        Ok(())
    }

    /// Presence check only: a stale token still counts until the server rejects it.
    pub fn is_authenticated(&self) -> StorageResult<bool> {
        self.storage.has(StorageKeys::ACCESS_TOKEN)
    }
}
