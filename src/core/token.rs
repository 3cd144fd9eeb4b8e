//! Signed, time-bounded session tokens (HS256 JWT).

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::models::claims::{CheckinClaim, Claim, SessionClaim, SignedClaims};

/// Validity window of every issued token.
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed: {0}")]
    Malformed(String),

    #[error("expected a {expected} token, got {found}")]
    WrongKind {
        expected: &'static str,
        found: &'static str,
    },

    #[error("token could not be signed: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed(e.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, claim: Claim) -> Result<String, TokenError> {
        self.issue_at(claim, Utc::now().timestamp())
    }

    /// Sign `claim` as if issued at `issued_at` (seconds since epoch).
    pub fn issue_at(&self, claim: Claim, issued_at: i64) -> Result<String, TokenError> {
        let signed = SignedClaims {
            claim,
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECS,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &signed, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature and expiry. Nothing inside a token is trusted unless
    /// this returns `Ok`.
    pub fn parse(&self, token: &str) -> Result<SignedClaims, TokenError> {
        let data = jsonwebtoken::decode::<SignedClaims>(token, &self.decoding, &self.validation)?;

        if data.claims.iat >= data.claims.exp {
            return Err(TokenError::Malformed("iat is not before exp".into()));
        }
        Ok(data.claims)
    }

    pub fn parse_session(&self, token: &str) -> Result<SessionClaim, TokenError> {
        match self.parse(token)?.claim {
            Claim::Session(c) => Ok(c),
            other => Err(TokenError::WrongKind {
                expected: "session",
                found: other.kind(),
            }),
        }
    }

    pub fn parse_checkin(&self, token: &str) -> Result<CheckinClaim, TokenError> {
        match self.parse(token)?.claim {
            Claim::Checkin(c) => Ok(c),
            other => Err(TokenError::WrongKind {
                expected: "checkin",
                found: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Claim {
        Claim::Session(SessionClaim {
            id: 42,
            email: "dewi@example.com".into(),
            name: "Dewi".into(),
        })
    }

    #[test]
    fn session_round_trip() {
        let codec = TokenCodec::new("s3cret");
        let token = codec.issue(session()).unwrap();
        assert!(!token.is_empty());

        let signed = codec.parse(&token).unwrap();
        assert_eq!(signed.claim, session());
        assert!(signed.iat < signed.exp);
        assert_eq!(signed.exp - signed.iat, TOKEN_TTL_SECS);

        let s = codec.parse_session(&token).unwrap();
        assert_eq!(s.id, 42);
        assert_eq!(s.email, "dewi@example.com");
        assert_eq!(s.name, "Dewi");
    }

    #[test]
    fn foreign_secret_is_rejected() {
        let token = TokenCodec::new("one").issue(session()).unwrap();
        assert_eq!(
            TokenCodec::new("two").parse(&token).unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn swapped_payload_is_rejected() {
        let codec = TokenCodec::new("s3cret");
        let genuine = codec.issue(session()).unwrap();
        let other = codec
            .issue(Claim::Session(SessionClaim {
                id: 1,
                email: "admin@example.com".into(),
                name: "Admin".into(),
            }))
            .unwrap();

        let g: Vec<&str> = genuine.split('.').collect();
        let o: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", g[0], o[1], g[2]);

        assert_eq!(codec.parse(&forged).unwrap_err(), TokenError::InvalidSignature);
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = TokenCodec::new("s3cret");
        let two_days_ago = Utc::now().timestamp() - 2 * TOKEN_TTL_SECS;
        let token = codec.issue_at(session(), two_days_ago).unwrap();
        assert_eq!(codec.parse(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = TokenCodec::new("s3cret");
        assert!(matches!(codec.parse("not.a.jwt"), Err(TokenError::Malformed(_))));
        assert!(matches!(codec.parse(""), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn claim_kinds_do_not_mix() {
        let codec = TokenCodec::new("s3cret");
        let checkin = codec
            .issue(Claim::Checkin(CheckinClaim {
                id: 42,
                checkin_id: 9,
            }))
            .unwrap();
        let sess = codec.issue(session()).unwrap();

        assert_eq!(codec.parse_checkin(&checkin).unwrap().checkin_id, 9);
        assert!(matches!(
            codec.parse_session(&checkin),
            Err(TokenError::WrongKind { expected: "session", .. })
        ));
        assert!(matches!(
            codec.parse_checkin(&sess),
            Err(TokenError::WrongKind { expected: "checkin", .. })
        ));
    }
}
