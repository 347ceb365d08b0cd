//! User Command Handlers

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{Login, RefreshToken, Register, SetUserPlan};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    PasswordHasherPort, TokenKind, TokenServicePort, UserRecord, UserRepositoryPort,
};
use crate::domain::{Email, Password, Plan};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ============================================================================
// Response DTOs
// ============================================================================

/// 用户信息（不含密码哈希）
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub plan: Plan,
    pub elevenlabs_voice_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            plan: record.plan,
            elevenlabs_voice_id: record.elevenlabs_voice_id,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// 注册 / 登录响应
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
}

fn issue_pair(
    tokens: &dyn TokenServicePort,
    user: UserRecord,
) -> Result<AuthResponse, ApplicationError> {
    Ok(AuthResponse {
        access_token: tokens.issue(user.id, TokenKind::Access)?,
        refresh_token: tokens.issue(user.id, TokenKind::Refresh)?,
        user: UserResponse::from(user),
    })
}

// ============================================================================
// Register
// ============================================================================

/// Register Handler
pub struct RegisterHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    hasher: Arc<dyn PasswordHasherPort>,
    tokens: Arc<dyn TokenServicePort>,
}

impl RegisterHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        hasher: Arc<dyn PasswordHasherPort>,
        tokens: Arc<dyn TokenServicePort>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            tokens,
        }
    }

    pub async fn handle(&self, command: Register) -> Result<AuthResponse, ApplicationError> {
        let email = Email::parse(&command.email)?;
        let password = Password::new(command.password)?;

        if self.user_repo.find_by_email(email.as_str()).await?.is_some() {
            return Err(ApplicationError::Conflict(
                "Email already registered".to_string(),
            ));
        }

        // 哈希计算较重，放到阻塞线程池
        let hasher = self.hasher.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(password.expose()))
            .await
            .map_err(|e| ApplicationError::internal(e.to_string()))??;

        let now = Utc::now();
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.as_str().to_string(),
            password_hash,
            plan: Plan::Free,
            elevenlabs_voice_id: None,
            created_at: now,
            updated_at: now,
        };
        self.user_repo.create(&user).await?;

        tracing::info!(user_id = %user.id, "User registered");

        issue_pair(self.tokens.as_ref(), user)
    }
}

// ============================================================================
// Login
// ============================================================================

/// Login Handler
pub struct LoginHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    hasher: Arc<dyn PasswordHasherPort>,
    tokens: Arc<dyn TokenServicePort>,
}

impl LoginHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        hasher: Arc<dyn PasswordHasherPort>,
        tokens: Arc<dyn TokenServicePort>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            tokens,
        }
    }

    pub async fn handle(&self, command: Login) -> Result<AuthResponse, ApplicationError> {
        let unauthorized = || ApplicationError::Unauthorized(INVALID_CREDENTIALS.to_string());

        let email = Email::parse(&command.email).map_err(|_| unauthorized())?;
        let user = self
            .user_repo
            .find_by_email(email.as_str())
            .await?
            .ok_or_else(unauthorized)?;

        let hasher = self.hasher.clone();
        let hash = user.password_hash.clone();
        let password = command.password;
        let valid = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| ApplicationError::internal(e.to_string()))?
            .unwrap_or(false);

        if !valid {
            tracing::debug!(user_id = %user.id, "Login rejected");
            return Err(unauthorized());
        }

        tracing::info!(user_id = %user.id, "User logged in");

        issue_pair(self.tokens.as_ref(), user)
    }
}

// ============================================================================
// RefreshToken
// ============================================================================

/// RefreshToken Handler
pub struct RefreshTokenHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    tokens: Arc<dyn TokenServicePort>,
}

impl RefreshTokenHandler {
    pub fn new(user_repo: Arc<dyn UserRepositoryPort>, tokens: Arc<dyn TokenServicePort>) -> Self {
        Self { user_repo, tokens }
    }

    pub async fn handle(
        &self,
        command: RefreshToken,
    ) -> Result<AccessTokenResponse, ApplicationError> {
        let user_id = self
            .tokens
            .verify(&command.refresh_token, TokenKind::Refresh)?;

        if self.user_repo.find_by_id(user_id).await?.is_none() {
            return Err(ApplicationError::Unauthorized("User no longer exists".to_string()));
        }

        Ok(AccessTokenResponse {
            access_token: self.tokens.issue(user_id, TokenKind::Access)?,
        })
    }
}

// ============================================================================
// SetUserPlan
// ============================================================================

/// SetUserPlan Handler
pub struct SetUserPlanHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
}

impl SetUserPlanHandler {
    pub fn new(user_repo: Arc<dyn UserRepositoryPort>) -> Self {
        Self { user_repo }
    }

    pub async fn handle(&self, command: SetUserPlan) -> Result<UserResponse, ApplicationError> {
        let email = Email::parse(&command.email)?;
        let user = self
            .user_repo
            .find_by_email(email.as_str())
            .await?
            .ok_or_else(|| ApplicationError::not_found("User", email.as_str()))?;

        let updated = self.user_repo.update_plan(user.id, command.plan).await?;

        tracing::info!(
            user_id = %updated.id,
            plan = updated.plan.as_str(),
            "User plan changed"
        );

        Ok(UserResponse::from(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestContext;

    fn register(ctx: &TestContext) -> RegisterHandler {
        RegisterHandler::new(ctx.users.clone(), ctx.hasher.clone(), ctx.tokens.clone())
    }

    fn login(ctx: &TestContext) -> LoginHandler {
        LoginHandler::new(ctx.users.clone(), ctx.hasher.clone(), ctx.tokens.clone())
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let ctx = TestContext::new().await;

        let registered = register(&ctx)
            .handle(Register {
                email: " Ana@Example.com ".to_string(),
                password: "segredo123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(registered.user.email, "ana@example.com");
        assert_eq!(registered.user.plan, Plan::Free);

        let user_id = ctx
            .tokens
            .verify(&registered.access_token, TokenKind::Access)
            .unwrap();
        assert_eq!(user_id, registered.user.id);

        let logged_in = login(&ctx)
            .handle(Login {
                email: "ana@example.com".to_string(),
                password: "segredo123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);
    }

    #[tokio::test]
    async fn test_register_validation_and_duplicates() {
        let ctx = TestContext::new().await;
        let handler = register(&ctx);

        let err = handler
            .handle(Register {
                email: "not-an-email".to_string(),
                password: "segredo123".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        let err = handler
            .handle(Register {
                email: "ana@example.com".to_string(),
                password: "123".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        let command = Register {
            email: "ana@example.com".to_string(),
            password: "segredo123".to_string(),
        };
        handler.handle(command.clone()).await.unwrap();
        let err = handler.handle(command).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password_and_unknown_email() {
        let ctx = TestContext::new().await;
        ctx.create_user("ana@example.com", Plan::Free).await;

        for (email, password) in [
            ("ana@example.com", "errada"),
            ("ninguem@example.com", "segredo123"),
        ] {
            let err = login(&ctx)
                .handle(Login {
                    email: email.to_string(),
                    password: password.to_string(),
                })
                .await
                .unwrap_err();
            assert!(
                matches!(err, ApplicationError::Unauthorized(ref msg) if msg == INVALID_CREDENTIALS)
            );
        }
    }

    #[tokio::test]
    async fn test_refresh_requires_refresh_token() {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ana@example.com", Plan::Free).await;
        let handler = RefreshTokenHandler::new(ctx.users.clone(), ctx.tokens.clone());

        let refresh = ctx.tokens.issue(user.id, TokenKind::Refresh).unwrap();
        let response = handler
            .handle(RefreshToken {
                refresh_token: refresh,
            })
            .await
            .unwrap();
        assert_eq!(
            ctx.tokens
                .verify(&response.access_token, TokenKind::Access)
                .unwrap(),
            user.id
        );

        let access = ctx.tokens.issue(user.id, TokenKind::Access).unwrap();
        let err = handler
            .handle(RefreshToken {
                refresh_token: access,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_set_plan() {
        let ctx = TestContext::new().await;
        ctx.create_user("ana@example.com", Plan::Free).await;
        let handler = SetUserPlanHandler::new(ctx.users.clone());

        let user = handler
            .handle(SetUserPlan {
                email: "ANA@example.com".to_string(),
                plan: Plan::Premium,
            })
            .await
            .unwrap();
        assert_eq!(user.plan, Plan::Premium);

        let err = handler
            .handle(SetUserPlan {
                email: "x@example.com".to_string(),
                plan: Plan::Premium,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }
}
