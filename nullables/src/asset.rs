//! Nullable asset: a scriptable transfer collaborator.

use std::collections::HashMap;
use std::sync::Mutex;

use tokenfarm_token::{AssetLedger, TokenError};
use tokenfarm_types::AccountId;

/// A transfer call observed by [`NullAsset`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedTransfer {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: u128,
}

/// An allowance-free asset ledger whose transfers can be forced to fail.
///
/// `transfer_from` ignores the spender; balances still have to cover the
/// amount. Successful transfers are recorded in order.
pub struct NullAsset {
    balances: Mutex<HashMap<AccountId, u128>>,
    fail_next: Mutex<u32>,
    transfers: Mutex<Vec<RecordedTransfer>>,
}

impl NullAsset {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
            fail_next: Mutex::new(0),
            transfers: Mutex::new(Vec::new()),
        }
    }

    /// Seed a balance directly.
    pub fn set_balance(&self, account: &AccountId, amount: u128) {
        self.balances.lock().unwrap().insert(account.clone(), amount);
    }

    /// Make the next `n` transfer calls fail with `TokenError::Other`.
    pub fn fail_next(&self, n: u32) {
        *self.fail_next.lock().unwrap() = n;
    }

    pub fn transfers(&self) -> Vec<RecordedTransfer> {
        self.transfers.lock().unwrap().clone()
    }

    fn apply(&self, from: &AccountId, to: &AccountId, amount: u128) -> Result<(), TokenError> {
        {
            let mut remaining = self.fail_next.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(TokenError::Other("transfer rejected by null asset".into()));
            }
        }
        let mut balances = self.balances.lock().unwrap();
        let available = balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        balances.insert(from.clone(), available - amount);
        *balances.entry(to.clone()).or_insert(0) += amount;
        self.transfers.lock().unwrap().push(RecordedTransfer {
            from: from.clone(),
            to: to.clone(),
            amount,
        });
        Ok(())
    }
}

impl Default for NullAsset {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLedger for NullAsset {
    fn transfer_from(
        &self,
        _spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError> {
        self.apply(from, to, amount)
    }

    fn transfer(&self, sender: &AccountId, to: &AccountId, amount: u128) -> Result<(), TokenError> {
        self.apply(sender, to, amount)
    }

    fn balance_of(&self, account: &AccountId) -> u128 {
        self.balances
            .lock()
            .unwrap()
            .get(account)
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_failures_then_success() {
        let asset = NullAsset::new();
        let a = AccountId::from_seed(1);
        let b = AccountId::from_seed(2);
        asset.set_balance(&a, 10);
        asset.fail_next(1);

        assert!(asset.transfer(&a, &b, 5).is_err());
        assert_eq!(asset.balance_of(&a), 10);
        asset.transfer(&a, &b, 5).unwrap();
        assert_eq!(asset.balance_of(&b), 5);
        assert_eq!(asset.transfers().len(), 1);
    }
}
