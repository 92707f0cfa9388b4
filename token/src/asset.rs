use crate::TokenError;
use tokenfarm_types::AccountId;

/// The value-transfer primitive the farm is built on.
///
/// The acting account is always passed explicitly: `spender` for
/// `transfer_from` (who consumes the allowance), `sender` for `transfer`.
/// Implementations must apply a call completely or not at all.
pub trait AssetLedger: Send + Sync {
    /// Move `amount` from `from` to `to`, consuming `spender`'s allowance.
    fn transfer_from(
        &self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError>;

    /// Move `amount` from `sender`'s own balance to `to`.
    fn transfer(&self, sender: &AccountId, to: &AccountId, amount: u128) -> Result<(), TokenError>;

    fn balance_of(&self, account: &AccountId) -> u128;
}
