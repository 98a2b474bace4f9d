use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub preferences: HashMap<String, serde_json::Value>,
    #[serde(default, with = "crate::datetime::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::datetime::option")]
    pub last_login: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), Error> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(Error::MissingField("password"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), Error> {
        if self.username.trim().is_empty() {
            return Err(Error::MissingField("username"));
        }
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(Error::MissingField("password"));
        }
        Ok(())
    }
}

/// `{user, token}` returned by login and register
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AuthResponse {
    pub user: User,
    #[serde(alias = "access_token")]
    pub token: String,
}

fn validate_email(email: &str) -> Result<(), Error> {
    let email = email.trim();
    if email.is_empty() {
        return Err(Error::MissingField("email"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(Error::invalid("email", "should look like name@example.com")),
    }
}
