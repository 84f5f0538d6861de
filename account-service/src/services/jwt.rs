use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::models::{Role, User};
use crate::services::AuthError;

/// Lifetime of every issued token.
pub const TOKEN_TTL_SECONDS: i64 = 60 * 60;

/// Issues and verifies HS256 identity tokens with one process-wide key.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

/// Identity assertion carried inside a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Result<Self, anyhow::Error> {
        if config.secret.is_empty() {
            return Err(anyhow::anyhow!("JWT signing secret must not be empty"));
        }

        let secret = config.secret.as_bytes();
        tracing::info!("Token service initialized with HS256 key");

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        })
    }

    /// Issue a token for `user` expiring one hour from now.
    pub fn issue(&self, user: &User) -> Result<String, anyhow::Error> {
        self.issue_at(user, Utc::now())
    }

    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<String, anyhow::Error> {
        let exp = now + Duration::seconds(TOKEN_TTL_SECONDS);

        let claims = Claims {
            username: user.username.clone(),
            role: user.role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode token: {}", e))
    }

    /// Check signature and expiry of `token` against the current time.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Check signature and expiry of `token` as of `now`.
    ///
    /// A token is accepted strictly before its `exp`; there is no leeway.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against the supplied clock below.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            AuthError
        })?;

        if now.timestamp() >= token_data.claims.exp {
            tracing::debug!(username = %token_data.claims.username, "Token expired");
            return Err(AuthError);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_service(secret: &str) -> TokenService {
        TokenService::new(&JwtConfig {
            secret: secret.to_string(),
        })
        .unwrap()
    }

    fn alice() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            password: "wonderland".to_string(),
            role: Role::User,
        }
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result = TokenService::new(&JwtConfig {
            secret: String::new(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_issue_and_verify_round_trip() -> Result<(), anyhow::Error> {
        let service = token_service("test-secret");
        let token = service.issue(&alice())?;
        assert!(!token.is_empty());

        let claims = service.verify(&token)?;
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECONDS);
        Ok(())
    }

    #[test]
    fn test_token_valid_until_one_hour() -> Result<(), anyhow::Error> {
        let service = token_service("test-secret");
        let issued = Utc::now();
        let token = service.issue_at(&alice(), issued)?;

        let just_before = issued + Duration::seconds(TOKEN_TTL_SECONDS - 1);
        assert!(service.verify_at(&token, just_before).is_ok());

        let at_expiry = issued + Duration::seconds(TOKEN_TTL_SECONDS);
        assert_eq!(service.verify_at(&token, at_expiry), Err(AuthError));

        let later = issued + Duration::hours(5);
        assert_eq!(service.verify_at(&token, later), Err(AuthError));
        Ok(())
    }

    #[test]
    fn test_tampered_token_rejected() -> Result<(), anyhow::Error> {
        let service = token_service("test-secret");
        let token = service.issue(&alice())?;

        // The final character may only carry unused base64 padding bits.
        for idx in 0..token.len() - 1 {
            let mut bytes = token.clone().into_bytes();
            bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes)?;
            if tampered == token {
                continue;
            }
            assert_eq!(
                service.verify(&tampered),
                Err(AuthError),
                "byte {} flipped",
                idx
            );
        }
        Ok(())
    }

    #[test]
    fn test_foreign_key_and_garbage_rejected() -> Result<(), anyhow::Error> {
        let token = token_service("other-secret").issue(&alice())?;
        let service = token_service("test-secret");

        assert_eq!(service.verify(&token), Err(AuthError));
        assert_eq!(service.verify(""), Err(AuthError));
        assert_eq!(service.verify("not.a.jwt"), Err(AuthError));
        Ok(())
    }

    #[test]
    fn test_expired_and_forged_fail_identically() -> Result<(), anyhow::Error> {
        let service = token_service("test-secret");
        let long_ago = Utc::now() - Duration::hours(2);
        let expired = service.issue_at(&alice(), long_ago)?;
        let forged = token_service("attacker").issue(&alice())?;

        let expired_err = service.verify(&expired).unwrap_err();
        let forged_err = service.verify(&forged).unwrap_err();
        assert_eq!(expired_err, forged_err);
        assert_eq!(expired_err.to_string(), forged_err.to_string());
        Ok(())
    }
}
