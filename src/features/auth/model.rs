use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Subject carried by every admin token
pub const ADMIN_SUBJECT: &str = "admin";

/// Identity of a request that presented a valid admin token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedAdmin {
    pub subject: String,
    /// `jti` of the presented token
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
}

/// JWT claims of an admin token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}
