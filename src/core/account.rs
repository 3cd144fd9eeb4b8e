//! Register / login use cases.

use std::sync::Arc;

use tracing::info;

use crate::core::hasher::PasswordHasher;
use crate::core::token::TokenCodec;
use crate::db::employees::EmployeeStore;
use crate::db::log::audit;
use crate::errors::{AppError, AppResult};
use crate::models::claims::{Claim, SessionClaim};
use crate::models::employee::{Account, LoginRequest, RegisterRequest};

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub account: Account,
    pub token: String,
}

#[derive(Clone)]
pub struct AccountLogic {
    store: EmployeeStore,
    hasher: Arc<dyn PasswordHasher>,
    tokens: TokenCodec,
}

impl AccountLogic {
    pub fn new(store: EmployeeStore, hasher: Arc<dyn PasswordHasher>, tokens: TokenCodec) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Create an employee. The returned account never carries the password.
    pub fn register(&self, req: &RegisterRequest) -> AppResult<Account> {
        if self.store.email_exists(&req.email)? {
            return Err(AppError::Conflicted);
        }

        let hashed = self.hasher.hash_password(&req.password)?;
        let id = self.store.create(req.name.trim(), &req.email, &hashed)?;
        let employee = self.store.find_by_id(id)?;

        info!(employee_id = id, "employee registered");
        audit(self.store.pool(), "register", &req.email, &format!("employee {} created", id));

        Ok(Account::from(employee))
    }

    /// Check credentials and mint a session token.
    ///
    /// Unknown email is NotFound; a wrong password is Unauthorized and no
    /// token is produced.
    pub fn login(&self, req: &LoginRequest) -> AppResult<LoginOutcome> {
        let employee = self.store.find_by_email(&req.email)?;

        if !self
            .hasher
            .compare_password_hash(&req.password, &employee.password_hash)
        {
            info!(employee_id = employee.id, "login rejected: wrong password");
            return Err(AppError::Unauthorized);
        }

        let token = self.tokens.issue(Claim::Session(SessionClaim {
            id: employee.id,
            email: employee.email.clone(),
            name: employee.name.clone(),
        }))?;

        audit(self.store.pool(), "login", &employee.email, "session issued");

        Ok(LoginOutcome {
            account: Account::from(employee),
            token,
        })
    }
}
