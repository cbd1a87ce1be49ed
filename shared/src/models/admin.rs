//! Admin account & todo models

use serde::{Deserialize, Serialize};

use super::double_option;

/// Back-office account (password hash never leaves the server)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Admin {
    pub id: i64,
    pub email: String,
    pub display_name: String,
    pub is_active: bool,
    pub created_at: i64,
    pub last_login_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Epoch milliseconds
    pub expires_at: i64,
    pub admin: Admin,
}

/// Dashboard todo item, owned by one admin
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AdminTodo {
    pub id: i64,
    pub admin_id: i64,
    pub title: String,
    pub is_done: bool,
    pub due_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminTodoCreate {
    pub title: String,
    pub due_at: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminTodoUpdate {
    pub title: Option<String>,
    pub is_done: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_at: Option<Option<i64>>,
}
