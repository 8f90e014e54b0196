use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::core::config::AdminAuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::AccessTokenDto;
use crate::features::auth::model::{AdminClaims, AuthenticatedAdmin, ADMIN_SUBJECT};

/// Issues and checks admin bearer tokens.
///
/// Tokens are self-contained HS256 JWTs; nothing about a login is stored.
pub struct TokenService {
    password_digest: [u8; 32],
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

impl TokenService {
    pub fn new(config: AdminAuthConfig) -> Self {
        let secret = config.token_secret.as_bytes();
        Self {
            password_digest: digest(&config.password),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_secs: config.token_ttl.as_secs() as i64,
        }
    }

    /// Exchange the admin password for a token
    pub fn login(&self, password: &str) -> Result<AccessTokenDto> {
        if digest(password) != self.password_digest {
            tracing::warn!("Rejected admin login attempt");
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let now = Utc::now().timestamp();
        let claims = AdminClaims {
            sub: ADMIN_SUBJECT.to_string(),
            iat: now,
            exp: now + self.ttl_secs,
            jti: Uuid::now_v7().to_string(),
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        tracing::info!("Issued admin token {}", claims.jti);
        Ok(AccessTokenDto {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.ttl_secs,
        })
    }

    /// Check signature, expiry and subject
    pub fn validate(&self, token: &str) -> Result<AuthenticatedAdmin> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.sub = Some(ADMIN_SUBJECT.to_string());
        validation.leeway = 0;

        let claims = decode::<AdminClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!("Rejected admin token: {}", e);
                AppError::Unauthorized("Invalid or expired token".to_string())
            })?
            .claims;

        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AppError::Unauthorized("Invalid token expiry".to_string()))?;

        Ok(AuthenticatedAdmin {
            subject: claims.sub,
            token_id: claims.jti,
            expires_at,
        })
    }
}
