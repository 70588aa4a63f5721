//! services/auth_client/src/adapters/jwt.rs
//!
//! Implements the `TokenExpiryChecker` port for JWTs. Only the `exp` claim is
//! read; signatures are the auth service's concern and are not verified here.

use auth_session_core::ports::{Clock, TokenExpiryChecker, TokenParseError};
use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use serde::Deserialize;
use std::sync::Arc;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<f64>,
}

#[derive(Clone)]
pub struct JwtExpiryChecker {
    clock: Arc<dyn Clock>,
}

impl JwtExpiryChecker {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Reads the `exp` claim as milliseconds since the Unix epoch.
    pub fn expires_at_millis(token: &str) -> Result<i64, TokenParseError> {
        if token.split('.').count() != 3 {
            return Err(TokenParseError::Malformed);
        }

        let header =
            decode_header(token).map_err(|e| TokenParseError::InvalidPayload(e.to_string()))?;

        let mut validation = Validation::new(header.alg);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|e| TokenParseError::InvalidPayload(e.to_string()))?;

        let exp = data.claims.exp.ok_or(TokenParseError::MissingExpiry)?;
        let millis = exp * 1000.0;
        // `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
        if !millis.is_finite() || millis < i64::MIN as f64 || millis >= i64::MAX as f64 {
            return Err(TokenParseError::InvalidPayload(format!(
                "exp {} is out of range",
                exp
            )));
        }
        Ok(millis as i64)
    }
}

impl TokenExpiryChecker for JwtExpiryChecker {
    fn expires_within(&self, token: &str, threshold_days: i64) -> Result<bool, TokenParseError> {
        let expires_at = Self::expires_at_millis(token)?;
        let remaining = expires_at.saturating_sub(self.clock.now_millis());
        Ok(remaining <= threshold_days.saturating_mul(MILLIS_PER_DAY))
    }
}
