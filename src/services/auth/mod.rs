/*
 * Responsibility
 * - access token (JWT, EdDSA) の検証と Actor への変換
 * - token の発行/registration/password は identity サービス側の責務 (ここでは扱わない)
 */
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Actor, Role};

#[derive(Debug, Error)]
pub enum AccessJwtError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("missing or invalid 'aud' claim")]
    MissingOrInvalidAud,
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
    #[error("invalid 'sub' (expected UUID)")]
    InvalidSubUuid,
    #[error("unknown 'role' claim: {0}")]
    UnknownRole(String),
}

fn aud_is_present_and_valid(aud: &serde_json::Value) -> bool {
    match aud {
        // Typical: aud is a string
        serde_json::Value::String(s) => !s.trim().is_empty(),
        // Also valid: aud is an array of strings
        serde_json::Value::Array(arr) => arr.iter().any(|v| match v {
            serde_json::Value::String(s) => !s.trim().is_empty(),
            _ => false,
        }),
        // Missing claim ends up as Null due to #[serde(default)]
        _ => false,
    }
}

/// Access token (JWT) claims.
///
/// - `aud` は string/array どちらも来うるので Value で受け、検証は Validation に任せる
/// - `role` はこのプロジェクトの規約 claim (student/instructor/admin のどれか 1 つ)
#[derive(Debug, Clone, Deserialize)]
struct AccessTokenClaims {
    iss: String,
    #[serde(default)]
    aud: serde_json::Value,

    sub: String,
    exp: u64,

    role: String,
}

/// EdDSA (Ed25519) access-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("validation", &self.validation)
            .finish()
    }
}

impl AuthService {
    pub fn new(
        access_public_key_pem: &str,
        issuer: &str,
        audience: &str,
        leeway_seconds: u64,
    ) -> Result<Self, String> {
        let decoding_key = DecodingKey::from_ed_pem(access_public_key_pem.as_bytes())
            .map_err(|e| format!("invalid ed25519 public key pem: {}", e))?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Verify + strict claim validation, then convert into the core-facing `Actor`.
    ///
    /// `jsonwebtoken::Validation` が署名 / `exp` / `iss` / `aud` を見る。
    /// ここではさらに「必須 claim が空でないこと」「sub が UUID であること」
    /// 「role が既知であること」を確認する
    pub fn verify(&self, token: &str) -> Result<Actor, AccessJwtError> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if claims.iss.trim().is_empty() {
            return Err(AccessJwtError::EmptyClaim("iss"));
        }
        if claims.sub.trim().is_empty() {
            return Err(AccessJwtError::EmptyClaim("sub"));
        }
        if claims.exp == 0 {
            return Err(AccessJwtError::EmptyClaim("exp"));
        }
        if !aud_is_present_and_valid(&claims.aud) {
            return Err(AccessJwtError::MissingOrInvalidAud);
        }

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| AccessJwtError::InvalidSubUuid)?;

        let role = Role::from_str(&claims.role)
            .map_err(|_| AccessJwtError::UnknownRole(claims.role.clone()))?;

        Ok(Actor::new(user_id, role))
    }
}
