//! In-memory ledger of user accounts.
//!
//! Every balance read or mutation is ownership-checked first, then amount
//! validated, then performed under the single accounts lock so that the
//! funds check and the debit cannot be interleaved with another request.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::Account;
use crate::services::metrics::record_ledger_operation;
use crate::services::{Claims, OwnershipValidator, ServiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Credit,
    Debit,
}

#[derive(Clone)]
pub struct Ledger {
    accounts: Arc<Mutex<Vec<Account>>>,
    ownership: OwnershipValidator,
}

impl Ledger {
    pub fn new(ownership: OwnershipValidator) -> Self {
        Self {
            accounts: Arc::new(Mutex::new(Vec::new())),
            ownership,
        }
    }

    fn accounts(&self) -> Result<MutexGuard<'_, Vec<Account>>, ServiceError> {
        self.accounts
            .lock()
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Ledger mutex poisoned: {}", e)))
    }

    /// Open an account for `user_id`. Callers must have checked the admin role.
    pub fn create_account(&self, user_id: i64, initial_balance: f64) -> Result<Account, ServiceError> {
        let result = self.open(user_id, initial_balance);
        record("create_account", &result);
        if let Ok(account) = &result {
            tracing::info!(account_id = account.id, user_id, "Account created");
        }
        result
    }

    /// Snapshot of every account in creation order.
    pub fn list_accounts(&self) -> Result<Vec<Account>, ServiceError> {
        Ok(self.accounts()?.clone())
    }

    pub fn balance(&self, claims: &Claims, user_id: i64) -> Result<f64, ServiceError> {
        let result = self.read_balance(claims, user_id);
        record("balance", &result);
        result
    }

    pub fn deposit(&self, claims: &Claims, user_id: i64, amount: f64) -> Result<Account, ServiceError> {
        let result = self.apply(claims, user_id, amount, Direction::Credit);
        record("deposit", &result);
        if let Ok(account) = &result {
            tracing::info!(account_id = account.id, user_id, amount, "Deposit applied");
        }
        result
    }

    pub fn withdraw(&self, claims: &Claims, user_id: i64, amount: f64) -> Result<Account, ServiceError> {
        let result = self.apply(claims, user_id, amount, Direction::Debit);
        record("withdraw", &result);
        if let Ok(account) = &result {
            tracing::info!(account_id = account.id, user_id, amount, "Withdrawal applied");
        }
        result
    }

    fn open(&self, user_id: i64, initial_balance: f64) -> Result<Account, ServiceError> {
        if !initial_balance.is_finite() || initial_balance < 0.0 {
            return Err(ServiceError::InvalidAmount);
        }

        let mut accounts = self.accounts()?;
        let account = Account::new(accounts.len() as i64 + 1, user_id, initial_balance);
        accounts.push(account.clone());
        Ok(account)
    }

    fn read_balance(&self, claims: &Claims, user_id: i64) -> Result<f64, ServiceError> {
        self.ownership.ensure_owner(claims, user_id)?;

        let accounts = self.accounts()?;
        accounts
            .iter()
            .find(|a| a.user_id == user_id)
            .map(|a| a.balance)
            .ok_or(ServiceError::AccountNotFound)
    }

    /// Ownership, then amount, then (for debits) funds, then the mutation.
    /// The lookup, funds check and write share one lock acquisition.
    fn apply(
        &self,
        claims: &Claims,
        user_id: i64,
        amount: f64,
        direction: Direction,
    ) -> Result<Account, ServiceError> {
        self.ownership.ensure_owner(claims, user_id)?;
        validate_amount(amount)?;

        let mut accounts = self.accounts()?;
        let account = accounts
            .iter_mut()
            .find(|a| a.user_id == user_id)
            .ok_or(ServiceError::AccountNotFound)?;

        let updated = match direction {
            // A credit that overflows to infinity is refused with the balance untouched.
            Direction::Credit => {
                let updated = account.balance + amount;
                if !updated.is_finite() {
                    return Err(ServiceError::InvalidAmount);
                }
                updated
            }
            Direction::Debit => {
                if amount > account.balance {
                    return Err(ServiceError::InsufficientFunds);
                }
                account.balance - amount
            }
        };
        account.balance = updated;

        Ok(account.clone())
    }

    pub fn count(&self) -> Result<usize, ServiceError> {
        Ok(self.accounts()?.len())
    }
}

fn validate_amount(amount: f64) -> Result<(), ServiceError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ServiceError::InvalidAmount);
    }
    Ok(())
}

fn record<T>(operation: &str, result: &Result<T, ServiceError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(ServiceError::Forbidden) => "forbidden",
        Err(ServiceError::InvalidAmount) => "invalid_amount",
        Err(ServiceError::InsufficientFunds) => "insufficient_funds",
        Err(ServiceError::AccountNotFound) => "not_found",
        Err(_) => "error",
    };
    record_ledger_operation(operation, outcome);
}
