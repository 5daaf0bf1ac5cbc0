use brainwave::{
    ValidationErrors,
    validation::{
        ValidationError,
        validators::{validate_email, validate_length, validate_required},
    },
};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::AppConfig;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::thought::Entity")]
    Thought,
}

impl Related<super::thought::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Thought.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Public view of an account; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<Model> for UserResponse {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterRequest {
    /// Trim and lower-case the email, trim the name, and check every field.
    ///
    /// # Errors
    ///
    /// Returns all failed checks: name or password too short, malformed email,
    /// or a confirmation that does not match.
    pub fn validated(mut self, config: &AppConfig) -> Result<Self, ValidationErrors> {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();

        let mut errors = ValidationErrors::new();
        errors.check(validate_length("name", &self.name, Some(config.name_min_length), Some(255)));
        errors.check(validate_email("email", &self.email));
        errors.check(validate_length(
            "password",
            &self.password,
            Some(config.password_min_length),
            None,
        ));
        if self.password != self.confirm_password {
            errors.add(ValidationError::new("confirmPassword", "Passwords do not match"));
        }
        errors.result().map(|()| self)
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// # Errors
    ///
    /// Fails when either credential is blank.
    pub fn validated(mut self) -> Result<Self, ValidationErrors> {
        self.email = self.email.trim().to_lowercase();
        let mut errors = ValidationErrors::new();
        errors.check(validate_required("email", &self.email));
        errors.check(validate_required("password", &self.password));
        errors.result().map(|()| self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,
    pub user: UserResponse,
}
