//! Claim shapes carried inside signed tokens.
//!
//! Two kinds share one signing key: the login session (`token` cookie) and
//! the open check-in (`checkin-token` cookie). They travel as a tagged union
//! so a token minted for one purpose can never be read as the other.

use serde::{Deserialize, Serialize};

/// Identity asserted after a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaim {
    pub id: i64,
    pub email: String,
    pub name: String,
}

/// Binds a principal to one open attendance record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckinClaim {
    pub id: i64,
    pub checkin_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Claim {
    Session(SessionClaim),
    Checkin(CheckinClaim),
}

impl Claim {
    pub fn kind(&self) -> &'static str {
        match self {
            Claim::Session(_) => "session",
            Claim::Checkin(_) => "checkin",
        }
    }
}

/// Wire form: the claim plus its validity window (seconds since epoch).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedClaims {
    #[serde(flatten)]
    pub claim: Claim,
    pub iat: i64,
    pub exp: i64,
}
