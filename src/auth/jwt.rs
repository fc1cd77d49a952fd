use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::models::{Claims, TokenType};

/// Decode and validate an access token. Refresh tokens are rejected here;
/// refreshing is the identity collaborator's job.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| e.to_string())?;

    if data.claims.token_type != TokenType::Access {
        return Err("not an access token".to_string());
    }
    Ok(data.claims)
}
