//! User collection and lookups

use super::{Collection, DataSet, Record, Repository};
use crate::{
    error::{AppError, AppResult},
    models::User,
};

impl Record for User {
    const KEY: &'static str = super::storage::USERS_KEY;
    const ID_PREFIX: &'static str = "";
    const LABEL: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(data: &DataSet) -> &Collection<Self> {
        &data.users
    }

    fn collection_mut(data: &mut DataSet) -> &mut Collection<Self> {
        &mut data.users
    }

    fn not_found(id: &str) -> AppError {
        AppError::UserNotFound(format!("User {} not found", id))
    }
}

impl DataSet {
    /// Whether `username` is taken by a user other than `exclude_id`
    pub fn username_exists(&self, username: &str, exclude_id: Option<&str>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id.as_str()) != exclude_id)
    }

    /// Display name for a user id, "Unknown User" if it no longer exists
    pub fn user_name(&self, user_id: &str) -> String {
        self.users
            .get(user_id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| "Unknown User".to_string())
    }
}

impl Repository {
    /// Find the user whose username and password both match exactly
    pub async fn users_find_by_credentials(&self, username: &str, password: &str) -> Option<User> {
        self.read()
            .await
            .users
            .values()
            .find(|u| u.username == username && u.password.as_deref() == Some(password))
            .cloned()
    }

    pub async fn users_get_by_id(&self, id: &str) -> AppResult<User> {
        self.get::<User>(id).await
    }
}
