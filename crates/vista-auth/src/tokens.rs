use std::fmt;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use vista_core::models::report::ReportRecord;

use crate::error::AuthError;

/// A short-lived credential for the embedding widget.
#[derive(Clone, PartialEq, Eq)]
pub struct EmbedToken {
    pub token: String,
    /// `None` for tokens pasted into the report configuration.
    pub expires_at: Option<jiff::Timestamp>,
}

impl fmt::Debug for EmbedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbedToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Produces embed tokens for a report. Real credential services plug in here.
pub trait TokenIssuer {
    fn issue_embed_token(&self, report: &ReportRecord) -> Result<EmbedToken, AuthError>;
}

/// Issuer used when no signing key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTokenIssuer;

impl TokenIssuer for NoTokenIssuer {
    fn issue_embed_token(&self, _report: &ReportRecord) -> Result<EmbedToken, AuthError> {
        Err(AuthError::NoSigningKey)
    }
}

/// Claims carried by a signed embed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedClaims {
    /// Widget-side report id.
    pub sub: String,
    /// Portal record id.
    pub rid: String,
    /// Datasets the report may read, core dataset first.
    pub ds: Vec<String>,
    pub iat: u64,
    pub exp: u64,
}

/// HS256-signed embed tokens with a fixed lifetime.
pub struct SignedTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SignedTokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Check signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<EmbedClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<EmbedClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }
}

impl TokenIssuer for SignedTokenIssuer {
    fn issue_embed_token(&self, report: &ReportRecord) -> Result<EmbedToken, AuthError> {
        let now = jiff::Timestamp::now().as_second();
        let iat = u64::try_from(now).map_err(|e| AuthError::TokenIssue(e.to_string()))?;
        let exp = iat
            .checked_add(self.ttl.as_secs())
            .ok_or_else(|| AuthError::TokenIssue("token lifetime is too long".to_string()))?;

        let claims = EmbedClaims {
            sub: report.report_id.clone(),
            rid: report.id.clone(),
            ds: report.dataset_ids().into_iter().map(str::to_string).collect(),
            iat,
            exp,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;

        let exp_secs = i64::try_from(exp).map_err(|e| AuthError::TokenIssue(e.to_string()))?;
        let expires_at = jiff::Timestamp::from_second(exp_secs)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))?;

        tracing::debug!(report_id = %report.id, %expires_at, "embed token issued");
        Ok(EmbedToken {
            token,
            expires_at: Some(expires_at),
        })
    }
}

/// The token a viewer should use for `report`.
///
/// A token stored on the record wins; otherwise one is requested from
/// `issuer`. `None` means the viewer has to ask for authentication.
pub fn resolve_embed_token(report: &ReportRecord, issuer: &dyn TokenIssuer) -> Option<EmbedToken> {
    if report.has_embed_token() {
        return Some(EmbedToken {
            token: report.embed_token.clone(),
            expires_at: None,
        });
    }

    match issuer.issue_embed_token(report) {
        Ok(token) => Some(token),
        Err(e) => {
            tracing::info!(report_id = %report.id, error = %e, "no embed token available");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ReportRecord {
        ReportRecord {
            id: "report1".to_string(),
            report_id: "abcd1234".to_string(),
            core_dataset_id: "core".to_string(),
            report_dataset_id: "secondary".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn signed_token_verifies_with_the_same_key() {
        let issuer = SignedTokenIssuer::new(b"test-signing-key", Duration::from_secs(600));
        let token = issuer.issue_embed_token(&report()).unwrap();
        let claims = issuer.verify(&token.token).unwrap();

        assert_eq!(claims.sub, "abcd1234");
        assert_eq!(claims.rid, "report1");
        assert_eq!(claims.ds, vec!["core".to_string(), "secondary".to_string()]);
        assert_eq!(claims.exp - claims.iat, 600);
        assert!(token.expires_at.is_some());
    }

    #[test]
    fn oversized_lifetime_is_an_issue_error() {
        let issuer = SignedTokenIssuer::new(b"key", Duration::from_secs(u64::MAX));
        assert!(matches!(
            issuer.issue_embed_token(&report()),
            Err(AuthError::TokenIssue(_))
        ));
    }

    #[test]
    fn token_from_another_key_is_rejected() {
        let issuer = SignedTokenIssuer::new(b"key-one", Duration::from_secs(600));
        let other = SignedTokenIssuer::new(b"key-two", Duration::from_secs(600));
        let token = issuer.issue_embed_token(&report()).unwrap();
        assert!(matches!(other.verify(&token.token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = SignedTokenIssuer::new(b"key", Duration::from_secs(0));
        let claims = EmbedClaims {
            sub: "r".to_string(),
            rid: "r".to_string(),
            ds: vec![],
            iat: 1_000,
            exp: 1_060,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"key"),
        )
        .unwrap();
        assert!(matches!(issuer.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn stored_token_takes_precedence() {
        let mut record = report();
        record.embed_token = "pasted-token".to_string();
        let token = resolve_embed_token(&record, &NoTokenIssuer).unwrap();
        assert_eq!(token.token, "pasted-token");
        assert!(token.expires_at.is_none());
    }

    #[test]
    fn no_issuer_and_no_stored_token_yields_none() {
        assert!(resolve_embed_token(&report(), &NoTokenIssuer).is_none());
    }

    #[test]
    fn debug_hides_token() {
        let token = EmbedToken {
            token: "abc.def.ghi".to_string(),
            expires_at: None,
        };
        assert!(!format!("{token:?}").contains("abc.def.ghi"));
    }
}
