//! Authentication service

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{User, UserClaims, UserInfo},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by exact username and password match.
    /// Returns a signed session token and the user without password.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, UserInfo)> {
        let user = self
            .repository
            .users_find_by_credentials(username, password)
            .await
            .ok_or_else(|| {
                tracing::warn!(username = %username, "Failed login attempt");
                AppError::Authentication("Invalid username or password".to_string())
            })?;

        let token = self.create_token_for_user(&user)?;
        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok((token, user.into()))
    }

    /// Current session user, re-read from the store
    pub async fn session_user(&self, claims: &UserClaims) -> AppResult<UserInfo> {
        match self.repository.users_get_by_id(&claims.user_id).await {
            Ok(user) => Ok(user.into()),
            Err(AppError::UserNotFound(_)) => Err(AppError::Authentication(
                "Session user no longer exists".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = chrono::Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id.clone(),
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::repository::storage::MemoryStorage;
    use std::sync::Arc;

    async fn service() -> (AuthService, Repository) {
        let repository = Repository::open(Arc::new(MemoryStorage::new()), true)
            .await
            .unwrap();
        let config = AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_hours: 1,
        };
        (AuthService::new(repository.clone(), config), repository)
    }

    #[tokio::test]
    async fn test_login_issues_token() {
        let (service, _) = service().await;
        let (token, user) = service.authenticate("teacher", "teacher123").await.unwrap();
        assert_eq!(user.id, "2");
        assert_eq!(user.role, Role::Faculty);

        let claims = UserClaims::from_token(&token, "test-secret").unwrap();
        assert_eq!(claims.user_id, "2");
        assert_eq!(claims.sub, "teacher");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn test_login_requires_exact_match() {
        let (service, _) = service().await;
        for (username, password) in [("teacher", "wrong"), ("Teacher", "teacher123"), ("nobody", "x")] {
            match service.authenticate(username, password).await {
                Err(AppError::Authentication(msg)) => {
                    assert_eq!(msg, "Invalid username or password")
                }
                other => panic!("unexpected result: {:?}", other.map(|(_, u)| u)),
            }
        }
    }

    #[tokio::test]
    async fn test_deleted_user_session_rejected() {
        let (service, repository) = service().await;
        let (token, _) = service.authenticate("student", "student123").await.unwrap();
        let claims = UserClaims::from_token(&token, "test-secret").unwrap();
        assert_eq!(service.session_user(&claims).await.unwrap().username, "student");

        repository.delete::<User>("1").await.unwrap();
        assert!(matches!(
            service.session_user(&claims).await,
            Err(AppError::Authentication(_))
        ));
    }
}
