//! Password hashing.

use crate::errors::AppResult;

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

pub trait PasswordHasher: Send + Sync {
    fn hash_password(&self, plain: &str) -> AppResult<String>;

    /// `false` on mismatch *and* on a malformed digest.
    fn compare_password_hash(&self, plain: &str, hash: &str) -> bool;
}

/// bcrypt with a deployment-time cost factor.
#[derive(Debug, Clone, Copy)]
pub struct Bcrypt {
    cost: u32,
}

impl Bcrypt {
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl PasswordHasher for Bcrypt {
    fn hash_password(&self, plain: &str) -> AppResult<String> {
        Ok(bcrypt::hash(plain, self.cost)?)
    }

    fn compare_password_hash(&self, plain: &str, hash: &str) -> bool {
        bcrypt::verify(plain, hash).unwrap_or(false)
    }
}
