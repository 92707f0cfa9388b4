//! In-memory fungible token ledger.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokenfarm_types::AccountId;

use crate::asset::AssetLedger;
use crate::error::TokenError;

/// Balances, allowances and supply. Guarded by the [`Token`] mutex.
#[derive(Clone, Debug)]
struct Ledger {
    owner: AccountId,
    total_supply: u128,
    balances: HashMap<AccountId, u128>,
    /// `(owner, spender) -> remaining allowance`
    allowances: HashMap<(AccountId, AccountId), u128>,
}

impl Ledger {
    fn balance(&self, account: &AccountId) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Compute both post-transfer balances before writing either.
    fn move_balance(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError> {
        let available = self.balance(from);
        let from_after = available
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                needed: amount,
                available,
            })?;
        if from == to {
            return Ok(());
        }
        let to_after = self
            .balance(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        self.balances.insert(from.clone(), from_after);
        self.balances.insert(to.clone(), to_after);
        Ok(())
    }
}

/// A named fungible token with an owner who may mint.
///
/// All methods take `&self`; the ledger is guarded by a mutex so one token
/// can be shared (`Arc<Token>`) between the farm and the accounts using it.
pub struct Token {
    name: String,
    symbol: String,
    ledger: Mutex<Ledger>,
}

impl Token {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, owner: AccountId) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            ledger: Mutex::new(Ledger {
                owner,
                total_supply: 0,
                balances: HashMap::new(),
                allowances: HashMap::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn owner(&self) -> AccountId {
        self.ledger().owner.clone()
    }

    pub fn total_supply(&self) -> u128 {
        self.ledger().total_supply
    }

    /// Create `amount` new units for `to`. Owner only.
    pub fn mint(&self, caller: &AccountId, to: &AccountId, amount: u128) -> Result<(), TokenError> {
        if amount == 0 {
            return Err(TokenError::ZeroAmount);
        }
        let mut ledger = self.ledger();
        if ledger.owner != *caller {
            return Err(TokenError::NotOwner(caller.to_string()));
        }
        let supply = ledger
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let balance = ledger
            .balance(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        ledger.total_supply = supply;
        ledger.balances.insert(to.clone(), balance);
        tracing::debug!(token = %self.symbol, %to, amount, "minted");
        Ok(())
    }

    /// Hand minting rights to `new_owner`. Owner only.
    pub fn transfer_ownership(
        &self,
        caller: &AccountId,
        new_owner: AccountId,
    ) -> Result<(), TokenError> {
        let mut ledger = self.ledger();
        if ledger.owner != *caller {
            return Err(TokenError::NotOwner(caller.to_string()));
        }
        tracing::info!(token = %self.symbol, from = %caller, to = %new_owner, "ownership transferred");
        ledger.owner = new_owner;
        Ok(())
    }

    /// Set (overwrite) the allowance `spender` may move out of `owner`'s balance.
    pub fn approve(&self, owner: &AccountId, spender: &AccountId, amount: u128) {
        self.ledger()
            .allowances
            .insert((owner.clone(), spender.clone()), amount);
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.ledger().allowance(owner, spender)
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AssetLedger for Token {
    fn transfer_from(
        &self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError> {
        if amount == 0 {
            return Err(TokenError::ZeroAmount);
        }
        let mut ledger = self.ledger();
        let approved = ledger.allowance(from, spender);
        let remaining = approved
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientAllowance {
                needed: amount,
                available: approved,
            })?;
        ledger.move_balance(from, to, amount)?;
        ledger
            .allowances
            .insert((from.clone(), spender.clone()), remaining);
        Ok(())
    }

    fn transfer(&self, sender: &AccountId, to: &AccountId, amount: u128) -> Result<(), TokenError> {
        if amount == 0 {
            return Err(TokenError::ZeroAmount);
        }
        self.ledger().move_balance(sender, to, amount)
    }

    fn balance_of(&self, account: &AccountId) -> u128 {
        self.ledger().balance(account)
    }
}
