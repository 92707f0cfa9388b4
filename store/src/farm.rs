use crate::StoreError;
use tokenfarm_types::AccountId;

/// Store trait for persisting farm engine state to durable storage.
///
/// Uses opaque `Vec<u8>` so the store doesn't depend on the `tokenfarm-farm`
/// crate. The engine serializes/deserializes its own types.
pub trait FarmStore {
    fn get_account_state(&self, account: &AccountId) -> Result<Option<Vec<u8>>, StoreError>;
    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Apply every put in `batch`, or none of them.
    fn write_batch(&self, batch: FarmWriteBatch) -> Result<(), StoreError>;
}

/// A set of puts committed together by [`FarmStore::write_batch`].
///
/// Later puts to the same key overwrite earlier ones.
#[derive(Clone, Debug, Default)]
pub struct FarmWriteBatch {
    accounts: Vec<(AccountId, Vec<u8>)>,
    meta: Vec<(Vec<u8>, Vec<u8>)>,
}

impl FarmWriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_account_state(&mut self, account: &AccountId, state: &[u8]) {
        self.accounts.push((account.clone(), state.to_vec()));
    }

    pub fn put_meta(&mut self, key: &[u8], value: &[u8]) {
        self.meta.push((key.to_vec(), value.to_vec()));
    }

    pub fn account_states(&self) -> &[(AccountId, Vec<u8>)] {
        &self.accounts
    }

    pub fn meta_entries(&self) -> &[(Vec<u8>, Vec<u8>)] {
        &self.meta
    }

    /// Number of records in the batch.
    pub fn len(&self) -> usize {
        self.accounts.len() + self.meta.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
