//! Account service
//!
//! Creates, lists and deletes accounts. Account names are globally unique.

use std::sync::Arc;

use crate::domain::entities::{Account, AccountId, NewAccount, UserId};
use crate::domain::ports::AccountRepository;
use crate::error::DomainError;

/// Service for managing accounts
pub struct AccountService<AR>
where
    AR: AccountRepository,
{
    accounts: Arc<AR>,
}

impl<AR> AccountService<AR>
where
    AR: AccountRepository,
{
    pub fn new(accounts: Arc<AR>) -> Self {
        Self { accounts }
    }

    /// Create a new account
    ///
    /// Fails with `AlreadyExists` when the name is taken, whether the
    /// pre-check or the store's unique constraint catches it.
    pub async fn create(
        &self,
        name: &str,
        description: &str,
        owner: Option<UserId>,
    ) -> Result<Account, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation(
                "Account name cannot be empty".to_string(),
            ));
        }

        if self.accounts.find_by_name(name).await?.is_some() {
            tracing::warn!(name, "Rejected duplicate account name");
            return Err(duplicate_account(name));
        }

        let account = self
            .accounts
            .create(&NewAccount {
                name: name.to_string(),
                description: description.to_string(),
                owner,
            })
            .await
            .map_err(|e| match e {
                DomainError::AlreadyExists(_) => duplicate_account(name),
                e => e,
            })?;

        tracing::info!(account_id = %account.id, name = %account.name, "Account created");
        Ok(account)
    }

    /// Accounts owned by the given user
    pub async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Account>, DomainError> {
        self.accounts.find_by_owner(owner).await
    }

    /// Get an account by ID
    pub async fn get(&self, id: &AccountId) -> Result<Account, DomainError> {
        self.accounts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Account {} not found", id)))
    }

    /// Delete an account and everything under it
    pub async fn delete(&self, id: &AccountId) -> Result<(), DomainError> {
        self.accounts.delete(id).await?;
        tracing::info!(account_id = %id, "Account deleted");
        Ok(())
    }
}

fn duplicate_account(name: &str) -> DomainError {
    DomainError::AlreadyExists(format!("An account named '{}' already exists", name))
}
