use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

/// The claims carried in a CoinKeeper access token.
///
/// `sub` is the id of the authenticated user; every record-keeping and analytics handler scopes its queries to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: i64,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    expiry: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes()),
            expiry: config.token_expiry,
        }
    }

    /// Issue a new access token for the given user.
    /// This method DOES NOT verify the user's credentials. This must be done prior to calling `issue_token`.
    pub fn issue_token(&self, user_id: i64, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.expiry).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }
}

/// Verifies bearer tokens. An instance lives in the app data so the [`JwtClaims`] extractor can reach it.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.reveal().as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::ValidationError(e.to_string()),
        })?;
        Ok(data.claims)
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req.headers().get(header::AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let value = value.to_str().map_err(|e| AuthError::PoorlyFormattedHeader(e.to_string()))?;
    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::PoorlyFormattedHeader("The authorization scheme must be Bearer".to_string()))
}

/// Handlers declare a `JwtClaims` argument to require authentication: the extractor rejects the request with a 401
/// before the handler runs if the `Authorization: Bearer <token>` header is missing, malformed, expired or forged.
impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = req
            .app_data::<web::Data<TokenVerifier>>()
            .ok_or_else(|| ServerError::InitializeError("TokenVerifier is not configured".to_string()))
            .and_then(|verifier| {
                let token = bearer_token(req)?;
                let claims = verifier.validate_token(token)?;
                debug!("🔑️ Valid access token presented for user {}", claims.sub);
                Ok(claims)
            });
        ready(result)
    }
}
