// src/repo/accounts.rs

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use validator::Validate;

use crate::error::AppError;
use crate::models::account::{AdminAccount, RegisterRequest};
use crate::storage::KvStore;

use super::keys;

/// Repository over administrator accounts.
///
/// Passwords are hashed with Argon2 before they touch the store. There is no
/// session or token machinery on top: `verify_login` answers yes or no and
/// the caller decides what to show.
pub struct AdminAccounts {
    store: Arc<dyn KvStore>,
}

impl AdminAccounts {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn all(&self) -> Result<Vec<AdminAccount>, AppError> {
        match self.store.read(keys::ADMINS)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_all(&self, accounts: &[AdminAccount]) -> Result<(), AppError> {
        let raw = serde_json::to_string(accounts)?;
        self.store.write(keys::ADMINS, &raw)
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>, AppError> {
        Ok(self
            .all()?
            .into_iter()
            .find(|a| a.email.eq_ignore_ascii_case(email)))
    }

    /// Registers a new admin account.
    pub fn register(&self, req: RegisterRequest) -> Result<AdminAccount, AppError> {
        if let Err(validation_errors) = req.validate() {
            return Err(AppError::BadRequest(validation_errors.to_string()));
        }

        let mut accounts = self.all()?;
        if accounts
            .iter()
            .any(|a| a.email.eq_ignore_ascii_case(&req.email))
        {
            return Err(AppError::Conflict(format!(
                "Account '{}' already exists",
                req.email
            )));
        }

        let account = AdminAccount {
            full_name: req.full_name.trim().to_string(),
            email: req.email.trim().to_string(),
            password_hash: hash_password(&req.password)?,
        };
        accounts.push(account.clone());
        self.write_all(&accounts)?;
        tracing::info!("Registered admin account {}", account.email);
        Ok(account)
    }

    /// Checks email and password; returns the account when both match.
    pub fn verify_login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<AdminAccount>, AppError> {
        let Some(account) = self.find_by_email(email)? else {
            return Ok(None);
        };
        if verify_password(password, &account.password_hash)? {
            Ok(Some(account))
        } else {
            Ok(None)
        }
    }
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash =
        PasswordHash::new(password_hash).map_err(|e| AppError::Internal(e.to_string()))?;

    let result = Argon2::default().verify_password(password.as_bytes(), &parsed_hash);

    Ok(result.is_ok())
}
