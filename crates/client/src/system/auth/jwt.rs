use chrono::{DateTime, Utc};
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, DecodingKey, Validation};

/// Read claims from an access token without verifying its signature.
///
/// The client never holds the signing secret; it only needs `exp` to decide
/// when to refresh. Opaque (non-JWT) tokens yield `None`.
pub fn read_claims(token: &str) -> Option<TokenClaims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .ok()
}

pub fn expires_at(token: &str) -> Option<DateTime<Utc>> {
    read_claims(token).and_then(|claims| DateTime::<Utc>::from_timestamp(claims.exp, 0))
}

/// True when the token is a JWT expiring within `skew_secs` of `now`.
pub fn expires_within(token: &str, skew_secs: i64, now: DateTime<Utc>) -> bool {
    match expires_at(token) {
        Some(exp) => exp - chrono::Duration::seconds(skew_secs) <= now,
        None => false,
    }
}

#[cfg(test)]
pub(crate) fn make_token(exp: i64) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};
    let claims = TokenClaims {
        exp,
        user_id: Some(serde_json::json!(1)),
        username: Some("admin".into()),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-secret")).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_exp_without_secret() {
        let exp = Utc::now().timestamp() + 3600;
        let token = make_token(exp);
        assert_eq!(read_claims(&token).map(|c| c.exp), Some(exp));
        assert_eq!(expires_at(&token).map(|d| d.timestamp()), Some(exp));
    }

    #[test]
    fn test_expires_within() {
        let now = Utc::now();
        let soon = make_token(now.timestamp() + 10);
        let later = make_token(now.timestamp() + 3600);
        assert!(expires_within(&soon, 30, now));
        assert!(!expires_within(&later, 30, now));
    }

    #[test]
    fn test_opaque_token_never_expires() {
        assert!(read_claims("opaque-token").is_none());
        assert!(!expires_within("opaque-token", 30, Utc::now()));
    }
}
