use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request DTO for admin login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response DTO for a freshly issued admin token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenDto {
    /// HS256 JWT to send as `Authorization: Bearer <token>`
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
}
