use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

use crate::models::{Claims, TokenType};

fn now() -> usize {
    Utc::now().timestamp().max(0) as usize
}

fn generate_token(
    login_id: &str,
    employee_id: &str,
    role: u8,
    token_type: TokenType,
    secret: &str,
    ttl: usize,
) -> Result<(String, Claims), Error> {
    let claims = Claims {
        sub: login_id.to_string(),
        employee_id: employee_id.to_string(),
        role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
        token_type,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, claims))
}

pub fn generate_access_token(
    login_id: &str,
    employee_id: &str,
    role: u8,
    secret: &str,
    ttl: usize,
) -> Result<String, Error> {
    generate_token(login_id, employee_id, role, TokenType::Access, secret, ttl).map(|(t, _)| t)
}

pub fn generate_refresh_token(
    login_id: &str,
    employee_id: &str,
    role: u8,
    secret: &str,
    ttl: usize,
) -> Result<(String, Claims), Error> {
    generate_token(login_id, employee_id, role, TokenType::Refresh, secret, ttl)
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_round_trips_claims() {
        let token = generate_access_token("BAYN00004", "BAYN00004", 3, "secret", 60).unwrap();
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "BAYN00004");
        assert_eq!(claims.role, 3);
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn refresh_tokens_get_unique_ids() {
        let (_, a) = generate_refresh_token("A", "A", 3, "secret", 60).unwrap();
        let (_, b) = generate_refresh_token("A", "A", 3, "secret", 60).unwrap();
        assert_eq!(a.token_type, TokenType::Refresh);
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token("A", "A", 3, "secret", 60).unwrap();
        assert!(verify_token(&token, "other").is_err());
    }
}
