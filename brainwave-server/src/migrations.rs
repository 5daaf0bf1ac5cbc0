use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateUsersTable), Box::new(CreateThoughtsTable)]
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Thoughts {
    Table,
    Id,
    UserId,
    Title,
    Body,
    Status,
    NextReminder,
    LastFollowUp,
    CreatedAt,
    UpdatedAt,
}

pub struct CreateUsersTable;

impl MigrationName for CreateUsersTable {
    fn name(&self) -> &'static str {
        "m20260101_000001_create_users_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateUsersTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

pub struct CreateThoughtsTable;

impl MigrationName for CreateThoughtsTable {
    fn name(&self) -> &'static str {
        "m20260101_000002_create_thoughts_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateThoughtsTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Thoughts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Thoughts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Thoughts::UserId).uuid().not_null())
                    .col(ColumnDef::new(Thoughts::Title).string_len(254).not_null())
                    .col(ColumnDef::new(Thoughts::Body).text().not_null())
                    .col(
                        ColumnDef::new(Thoughts::Status)
                            .string_len(16)
                            .not_null()
                            .default("ACTIVE"),
                    )
                    .col(ColumnDef::new(Thoughts::NextReminder).timestamp_with_time_zone())
                    .col(ColumnDef::new(Thoughts::LastFollowUp).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Thoughts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Thoughts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_thoughts_user")
                            .from(Thoughts::Table, Thoughts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_thoughts_user_updated")
                    .table(Thoughts::Table)
                    .col(Thoughts::UserId)
                    .col(Thoughts::UpdatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Thoughts::Table).to_owned())
            .await
    }
}
