use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::validation::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(format!("Unknown role '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Public projection of a user, safe to hand back to any caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserOutput {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
}

impl From<&User> for UserOutput {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<User> for UserOutput {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name,
            email: user.email,
        }
    }
}

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::default();
        errors.check(!self.user_name.trim().is_empty(), "user_name", "Name is required");
        errors.check(looks_like_email(&self.email), "email", "Invalid email");
        errors.check(
            self.password.len() >= MIN_PASSWORD_LEN,
            "password",
            "Password must be at least 8 characters",
        );
        errors.into_result()
    }
}

/// Self-service profile update. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::default();
        if let Some(name) = &self.user_name {
            errors.check(!name.trim().is_empty(), "user_name", "Name is required");
        }
        if let Some(email) = &self.email {
            errors.check(looks_like_email(email), "email", "Invalid email");
        }
        if let Some(password) = &self.password {
            errors.check(
                password.len() >= MIN_PASSWORD_LEN,
                "password",
                "Password must be at least 8 characters",
            );
        }
        errors.into_result()
    }
}

/// Emails are stored and looked up trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}
