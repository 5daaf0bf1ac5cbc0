use async_trait::async_trait;
use brainwave::{
    CRUDResource, IntoOwnedActiveModel, MergeIntoActiveModel, ValidationErrors,
    validation::validators::validate_length,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::Set, entity::prelude::*};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::ThoughtLimits;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "thoughts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub status: ThoughtStatus,
    pub next_reminder: Option<DateTime<Utc>>,
    pub last_follow_up: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum ThoughtStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

/// A thought as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Thought {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
    pub status: ThoughtStatus,
    pub next_reminder: Option<DateTime<Utc>>,
    pub last_follow_up: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Model> for Thought {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            body: model.body,
            status: model.status,
            next_reminder: model.next_reminder,
            last_follow_up: model.last_follow_up,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtCreate {
    #[schema(example = "Call the plumber")]
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub status: ThoughtStatus,
    #[serde(default)]
    pub next_reminder: Option<DateTime<Utc>>,
}

impl ThoughtCreate {
    /// Trim the text fields and check them against `limits`.
    ///
    /// # Errors
    ///
    /// Returns every field whose length is out of range.
    pub fn validated(mut self, limits: &ThoughtLimits) -> Result<Self, ValidationErrors> {
        self.title = self.title.trim().to_string();
        self.body = self.body.trim().to_string();

        let mut errors = ValidationErrors::new();
        errors.check(validate_title(&self.title, limits));
        errors.check(validate_body(&self.body, limits));
        errors.result().map(|()| self)
    }
}

impl IntoOwnedActiveModel<ActiveModel> for ThoughtCreate {
    fn into_owned_active_model(self, owner: Uuid) -> ActiveModel {
        let now = Utc::now();
        ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner),
            title: Set(self.title),
            body: Set(self.body),
            status: Set(self.status),
            next_reminder: Set(self.next_reminder),
            last_follow_up: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

/// Partial update. Absent fields are left alone; `"nextReminder": null` clears the reminder.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtUpdate {
    pub title: Option<String>,
    pub body: Option<String>,
    pub status: Option<ThoughtStatus>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub next_reminder: Option<Option<DateTime<Utc>>>,
}

impl ThoughtUpdate {
    /// Trim and check whichever text fields are present.
    ///
    /// # Errors
    ///
    /// Returns every present field whose length is out of range.
    pub fn validated(mut self, limits: &ThoughtLimits) -> Result<Self, ValidationErrors> {
        self.title = self.title.map(|title| title.trim().to_string());
        self.body = self.body.map(|body| body.trim().to_string());

        let mut errors = ValidationErrors::new();
        if let Some(title) = &self.title {
            errors.check(validate_title(title, limits));
        }
        if let Some(body) = &self.body {
            errors.check(validate_body(body, limits));
        }
        errors.result().map(|()| self)
    }
}

impl MergeIntoActiveModel<ActiveModel> for ThoughtUpdate {
    fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        if let Some(title) = self.title {
            existing.title = Set(title);
        }
        if let Some(body) = self.body {
            existing.body = Set(body);
        }
        if let Some(status) = self.status {
            existing.status = Set(status);
        }
        if let Some(next_reminder) = self.next_reminder {
            existing.next_reminder = Set(next_reminder);
        }
        existing.updated_at = Set(Utc::now());
        Ok(existing)
    }
}

fn validate_title(title: &str, limits: &ThoughtLimits) -> Result<(), brainwave::ValidationError> {
    validate_length("title", title, Some(limits.title_min), Some(limits.title_max))
}

fn validate_body(body: &str, limits: &ThoughtLimits) -> Result<(), brainwave::ValidationError> {
    validate_length("body", body, Some(limits.body_min), Some(limits.body_max))
}

#[async_trait]
impl CRUDResource for Thought {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type CreateModel = ThoughtCreate;
    type UpdateModel = ThoughtUpdate;

    const ID_COLUMN: Column = Column::Id;
    const OWNER_COLUMN: Column = Column::UserId;
    const RESOURCE_NAME_SINGULAR: &'static str = "Thought";
    const RESOURCE_NAME_PLURAL: &'static str = "Thoughts";
    const DEFAULT_ORDER_FIELD: &'static str = "updatedAt";

    fn sortable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("title", Column::Title),
            ("status", Column::Status),
            ("nextReminder", Column::NextReminder),
            ("createdAt", Column::CreatedAt),
            ("updatedAt", Column::UpdatedAt),
        ]
    }

    fn filterable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("title", Column::Title),
            ("status", Column::Status),
            ("nextReminder", Column::NextReminder),
            ("lastFollowUp", Column::LastFollowUp),
            ("createdAt", Column::CreatedAt),
            ("updatedAt", Column::UpdatedAt),
        ]
    }

    fn fulltext_searchable_columns() -> Vec<Column> {
        vec![Column::Title, Column::Body]
    }
}
