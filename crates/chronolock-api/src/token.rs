use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

/// Claims embedded in the session token handed to clients after login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    pub display_name: String,
    pub exp: usize,
}

/// Issues the opaque session credential clients present after login.
///
/// Stands in for the external identity provider: an HS256 token keyed by the
/// user's identity number, carrying email and display name.
pub struct TokenIssuer {
    secret: String,
}

impl TokenIssuer {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    pub fn issue(
        &self,
        id_number: &str,
        email: &str,
        display_name: &str,
    ) -> anyhow::Result<String> {
        let claims = SessionClaims {
            sub: id_number.to_string(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            exp: (Utc::now() + Duration::days(30)).timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }
}
