//! Nullable store: thread-safe in-memory storage for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use tokenfarm_store::{FarmStore, FarmWriteBatch, StoreError};
use tokenfarm_types::AccountId;

/// An in-memory farm store for testing.
///
/// Writes can be made to fail outright with [`NullFarmStore::fail_writes`],
/// or after a record budget runs out with [`NullFarmStore::fail_after_records`].
/// A batch that runs out of budget part way through commits nothing.
pub struct NullFarmStore {
    accounts: Mutex<HashMap<AccountId, Vec<u8>>>,
    meta: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
    /// Records that may still be written; `None` is unlimited.
    write_budget: Mutex<Option<usize>>,
}

impl NullFarmStore {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            meta: Mutex::new(HashMap::new()),
            write_budget: Mutex::new(None),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.write_budget.lock().unwrap() = if fail { Some(0) } else { None };
    }

    /// Accept `records` more individual records, then fail every write.
    pub fn fail_after_records(&self, records: usize) {
        *self.write_budget.lock().unwrap() = Some(records);
    }

    pub fn account_count(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }
}

impl Default for NullFarmStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FarmStore for NullFarmStore {
    fn get_account_state(&self, account: &AccountId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.accounts.lock().unwrap().get(account).cloned())
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.meta.lock().unwrap().get(key).cloned())
    }

    fn write_batch(&self, batch: FarmWriteBatch) -> Result<(), StoreError> {
        let mut budget = self.write_budget.lock().unwrap();
        if let Some(left) = *budget {
            if batch.len() > left {
                // The budget runs out part way through: nothing is committed.
                *budget = Some(0);
                return Err(StoreError::Backend("disk full".into()));
            }
            *budget = Some(left - batch.len());
        }

        let mut accounts = self.accounts.lock().unwrap();
        for (id, state) in batch.account_states() {
            accounts.insert(id.clone(), state.clone());
        }
        let mut meta = self.meta.lock().unwrap();
        for (key, value) in batch.meta_entries() {
            meta.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_writes_are_readable() {
        let store = NullFarmStore::new();
        let id = AccountId::from_seed(1);
        assert!(store.get_account_state(&id).unwrap().is_none());

        let mut batch = FarmWriteBatch::new();
        batch.put_account_state(&id, b"state");
        batch.put_meta(b"k", b"v");
        store.write_batch(batch).unwrap();

        assert_eq!(store.get_account_state(&id).unwrap(), Some(b"state".to_vec()));
        assert_eq!(store.get_meta(b"k").unwrap(), Some(b"v".to_vec()));
        assert_eq!(store.account_count(), 1);
    }

    #[test]
    fn failed_writes_leave_store_untouched() {
        let store = NullFarmStore::new();
        store.fail_writes(true);
        let mut batch = FarmWriteBatch::new();
        batch.put_account_state(&AccountId::from_seed(1), b"s");
        batch.put_meta(b"k", b"v");
        assert!(store.write_batch(batch).is_err());
        assert!(store.get_meta(b"k").unwrap().is_none());
        assert_eq!(store.account_count(), 0);
    }

    #[test]
    fn budget_exhausted_mid_batch_commits_nothing() {
        let store = NullFarmStore::new();
        store.fail_after_records(2);
        let mut batch = FarmWriteBatch::new();
        batch.put_account_state(&AccountId::from_seed(1), b"a");
        batch.put_account_state(&AccountId::from_seed(2), b"b");
        batch.put_meta(b"k", b"v");

        assert!(store.write_batch(batch.clone()).is_err());
        assert_eq!(store.account_count(), 0);
        assert!(store.get_meta(b"k").unwrap().is_none());

        store.fail_writes(false);
        store.write_batch(batch).unwrap();
        assert_eq!(store.account_count(), 2);
    }
}
