//! User model and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Portal roles. Each role gets its own dashboard scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stored user record.
///
/// The password is kept in plaintext because the portal login is a direct
/// lookup. Never return this type from a handler; use [`UserInfo`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub penalty_points: u32,
}

/// User as exposed to clients and cached in sessions (no password)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub username: String,
    pub role: Role,
    pub penalty_points: u32,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            username: user.username.clone(),
            role: user.role,
            penalty_points: user.penalty_points,
        }
    }
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            role: user.role,
            penalty_points: user.penalty_points,
        }
    }
}

/// Create user request (admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub role: Role,
}

/// Update user request (admin). Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    pub username: Option<String>,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// Penalty adjustment request (admin)
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePenalty {
    /// New penalty point total. Negative values are rejected at deserialization.
    pub penalty_points: u32,
}

/// JWT claims for an authenticated session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> UserClaims {
        UserClaims {
            sub: "someone".to_string(),
            user_id: "9".to_string(),
            role,
            exp: chrono::Utc::now().timestamp() + 3600,
            iat: chrono::Utc::now().timestamp(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let token = claims(Role::Faculty).create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, "9");
        assert_eq!(parsed.role, Role::Faculty);
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_role_guard() {
        assert!(claims(Role::Student).require_admin().is_err());
        assert!(claims(Role::Admin).require_admin().is_ok());
        assert!(claims(Role::Faculty).require_admin().is_err());
        assert!(claims(Role::Faculty).has_role(Role::Faculty));
    }

    #[test]
    fn test_user_info_strips_password() {
        let user = User {
            id: "1".to_string(),
            name: "Student User".to_string(),
            username: "student".to_string(),
            password: Some("student123".to_string()),
            role: Role::Student,
            penalty_points: 2,
        };
        let json = serde_json::to_value(UserInfo::from(&user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["penaltyPoints"], 2);
        assert_eq!(json["role"], "student");
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_value(Role::Faculty).unwrap(), "faculty");
        let role: Role = serde_json::from_value(serde_json::json!("admin")).unwrap();
        assert_eq!(role, Role::Admin);
        assert!(serde_json::from_value::<Role>(serde_json::json!("guest")).is_err());
    }
}
