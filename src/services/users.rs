//! User management service (admin)

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User, UserInfo},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<UserInfo>> {
        Ok(self
            .repository
            .list::<User>()
            .await
            .into_iter()
            .map(UserInfo::from)
            .collect())
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<UserInfo> {
        self.repository.users_get_by_id(id).await.map(UserInfo::from)
    }

    /// Create a user. New users start without penalty points.
    pub async fn create_user(&self, user: CreateUser) -> AppResult<UserInfo> {
        user.validate()?;
        let created = self
            .repository
            .insert_with::<User, _>(|data, id| {
                if data.username_exists(&user.username, None) {
                    return Err(AppError::Conflict("Username already exists".to_string()));
                }
                Ok(User {
                    id,
                    name: user.name,
                    username: user.username,
                    password: Some(user.password),
                    role: user.role,
                    penalty_points: 0,
                })
            })
            .await?;
        tracing::info!(user_id = %created.id, role = %created.role, "Created user {}", created.username);
        Ok(created.into())
    }

    pub async fn update_user(&self, id: &str, update: UpdateUser) -> AppResult<UserInfo> {
        update.validate()?;
        self.repository
            .update_with::<User, _>(id, |data, user| {
                if let Some(ref username) = update.username {
                    if data.username_exists(username, Some(id)) {
                        return Err(AppError::Conflict("Username already exists".to_string()));
                    }
                }
                if let Some(name) = update.name {
                    user.name = name;
                }
                if let Some(username) = update.username {
                    user.username = username;
                }
                if let Some(password) = update.password {
                    user.password = Some(password);
                }
                if let Some(role) = update.role {
                    user.role = role;
                }
                Ok(())
            })
            .await
            .map(UserInfo::from)
    }

    /// Set a user's penalty point total
    pub async fn set_penalty_points(&self, id: &str, penalty_points: u32) -> AppResult<UserInfo> {
        let user = self
            .repository
            .update_with::<User, _>(id, |_, user| {
                user.penalty_points = penalty_points;
                Ok(())
            })
            .await?;
        tracing::info!(user_id = %id, penalty_points, "Adjusted penalty points");
        Ok(user.into())
    }

    /// Delete a user. Their reservations are kept and show as "Unknown User".
    pub async fn delete_user(&self, id: &str) -> AppResult<()> {
        let removed = self.repository.delete::<User>(id).await?;
        tracing::info!(user_id = %id, "Deleted user {}", removed.username);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::repository::storage::MemoryStorage;
    use std::sync::Arc;

    async fn service() -> UsersService {
        let repository = Repository::open(Arc::new(MemoryStorage::new()), true)
            .await
            .unwrap();
        UsersService::new(repository)
    }

    fn new_user(username: &str) -> CreateUser {
        CreateUser {
            name: "Guest Lecturer".to_string(),
            username: username.to_string(),
            password: "lecture1".to_string(),
            role: Role::Faculty,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_next_id() {
        let service = service().await;
        let created = service.create_user(new_user("lecturer")).await.unwrap();
        assert_eq!(created.id, "4");
        assert_eq!(created.penalty_points, 0);
        assert_eq!(created.role, Role::Faculty);
    }

    #[tokio::test]
    async fn test_username_is_unique() {
        let service = service().await;
        assert!(matches!(
            service.create_user(new_user("admin")).await,
            Err(AppError::Conflict(_))
        ));

        let rename = UpdateUser {
            username: Some("teacher".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update_user("1", rename).await,
            Err(AppError::Conflict(_))
        ));

        // Keeping one's own username is not a conflict
        let same = UpdateUser {
            username: Some("student".to_string()),
            name: Some("Student One".to_string()),
            ..Default::default()
        };
        let updated = service.update_user("1", same).await.unwrap();
        assert_eq!(updated.name, "Student One");
    }

    #[tokio::test]
    async fn test_penalty_points() {
        let service = service().await;
        let updated = service.set_penalty_points("1", 3).await.unwrap();
        assert_eq!(updated.penalty_points, 3);
        assert!(matches!(
            service.set_penalty_points("99", 1).await,
            Err(AppError::UserNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_that_user() {
        let service = service().await;
        service.delete_user("2").await.unwrap();
        let ids: Vec<String> = service.list().await.unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(service.delete_user("2").await.is_err());
    }

    #[tokio::test]
    async fn test_empty_fields_rejected() {
        let service = service().await;
        let mut user = new_user("");
        user.password = String::new();
        match service.create_user(user).await {
            Err(AppError::Validation(msg)) => {
                assert!(msg.contains("username"));
                assert!(msg.contains("password"));
            }
            other => panic!("expected validation error, got {:?}", other.map(|u| u.id)),
        }
    }
}
