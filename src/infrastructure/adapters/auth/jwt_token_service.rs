//! JWT Token Service - HS256 令牌签发与校验

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::{AuthError, TokenKind, TokenServicePort};

/// JWT Claims
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// 用户 ID
    sub: String,
    /// access | refresh
    token_type: String,
    iat: i64,
    exp: i64,
    jti: String,
}

/// JWT 配置
#[derive(Debug, Clone)]
pub struct JwtTokenServiceConfig {
    pub secret: String,
    pub access_ttl_secs: u64,
    pub refresh_ttl_secs: u64,
}

impl Default for JwtTokenServiceConfig {
    fn default() -> Self {
        Self {
            secret: "dev-jwt-secret".to_string(),
            access_ttl_secs: 3600,
            refresh_ttl_secs: 2_592_000,
        }
    }
}

/// JWT Token Service
pub struct JwtTokenService {
    config: JwtTokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtTokenService {
    pub fn new(config: JwtTokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn ttl_secs(&self, kind: TokenKind) -> u64 {
        match kind {
            TokenKind::Access => self.config.access_ttl_secs,
            TokenKind::Refresh => self.config.refresh_ttl_secs,
        }
    }
}

impl TokenServicePort for JwtTokenService {
    fn issue(&self, user_id: Uuid, kind: TokenKind) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            token_type: kind.as_str().to_string(),
            iat: now,
            exp: now + self.ttl_secs(kind) as i64,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn verify(&self, token: &str, expected: TokenKind) -> Result<Uuid, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        if data.claims.token_type != expected.as_str() {
            return Err(AuthError::WrongKind {
                expected: expected.as_str(),
            });
        }

        Uuid::parse_str(&data.claims.sub).map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtTokenService {
        JwtTokenService::new(JwtTokenServiceConfig {
            secret: "test-secret".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_issue_and_verify_access_token() {
        let service = service();
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id, TokenKind::Access).unwrap();
        assert_eq!(service.verify(&token, TokenKind::Access).unwrap(), user_id);
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let service = service();
        let user_id = Uuid::new_v4();

        let refresh = service.issue(user_id, TokenKind::Refresh).unwrap();
        assert!(matches!(
            service.verify(&refresh, TokenKind::Access),
            Err(AuthError::WrongKind { .. })
        ));

        let access = service.issue(user_id, TokenKind::Access).unwrap();
        assert!(matches!(
            service.verify(&access, TokenKind::Refresh),
            Err(AuthError::WrongKind { .. })
        ));
    }

    #[test]
    fn test_rejects_foreign_signature_and_garbage() {
        let token = service().issue(Uuid::new_v4(), TokenKind::Access).unwrap();
        let other = JwtTokenService::new(JwtTokenServiceConfig {
            secret: "another-secret".to_string(),
            ..Default::default()
        });

        assert!(matches!(
            other.verify(&token, TokenKind::Access),
            Err(AuthError::InvalidToken(_))
        ));
        assert!(service().verify("not.a.jwt", TokenKind::Access).is_err());
    }

    #[test]
    fn test_expired_token() {
        let service = service();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            token_type: "access".to_string(),
            iat: Utc::now().timestamp() - 7200,
            exp: Utc::now().timestamp() - 3600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &service.encoding_key).unwrap();

        assert!(matches!(
            service.verify(&token, TokenKind::Access),
            Err(AuthError::Expired)
        ));
    }
}
