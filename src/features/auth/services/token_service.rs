use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::Duration;
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AccessClaims, AuthenticatedUser, ACCESS_TOKEN_TYPE};

/// Signed access token and its lifetime in seconds
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Issues and validates HS256 access tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    access_ttl: Duration,
    leeway: u64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            access_ttl: config.access_token_ttl,
            leeway: config.jwt_leeway.as_secs(),
        }
    }

    pub fn issue_access_token(&self, user: &AuthenticatedUser) -> Result<IssuedToken> {
        let now = Utc::now().timestamp().max(0) as u64;
        let ttl = self.access_ttl.as_secs();

        let claims = AccessClaims {
            sub: user.user_id.to_string(),
            username: user.username.clone(),
            is_admin: user.is_admin,
            typ: ACCESS_TOKEN_TYPE.to_string(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + ttl,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign access token: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_in: ttl as i64,
        })
    }

    pub fn validate_access_token(&self, token: &str) -> Result<AuthenticatedUser> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = self.leeway;

        let claims = decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?
            .claims;

        if claims.typ != ACCESS_TOKEN_TYPE {
            return Err(AppError::Auth("Token is not an access token".to_string()));
        }

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Auth("Malformed subject claim".to_string()))?;

        Ok(AuthenticatedUser {
            user_id,
            username: claims.username,
            is_admin: claims.is_admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{create_customer_user, test_auth_config};

    #[test]
    fn test_issued_token_validates_back_to_user() {
        let service = TokenService::new(&test_auth_config());
        let user = create_customer_user();

        let issued = service.issue_access_token(&user).unwrap();
        assert_eq!(issued.expires_in, 3600);

        let validated = service.validate_access_token(&issued.token).unwrap();
        assert_eq!(validated, user);
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let service = TokenService::new(&test_auth_config());
        let mut other_config = test_auth_config();
        other_config.jwt_secret = "another-secret-that-is-long-enough-123".to_string();
        let other = TokenService::new(&other_config);

        let issued = other.issue_access_token(&create_customer_user()).unwrap();
        assert!(matches!(
            service.validate_access_token(&issued.token),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let service = TokenService::new(&test_auth_config());
        assert!(service.validate_access_token("not.a.token").is_err());
    }
}
