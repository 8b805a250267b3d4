use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "BAYN00004")]
    pub employee_id: String,
    /// date of birth, DDMMYYYY; separators are ignored
    #[schema(example = "10-12-1988")]
    pub date_of_birth: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RefreshReqDto {
    pub refresh_token: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// login employee id
    pub sub: String,
    /// internal employee record id
    pub employee_id: String,
    pub role: u8, // role id
    pub exp: usize,
    pub jti: String,

    pub token_type: TokenType,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
