use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Robots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Robots::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Robots::Name).string().not_null())
                    .col(
                        ColumnDef::new(Robots::Status)
                            .boolean()
                            .default(true)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Robots::Alert).string_len(32))
                    .col(
                        ColumnDef::new(Robots::Priority)
                            .string_len(16)
                            .default("4 - Low")
                            .not_null(),
                    )
                    .col(ColumnDef::new(Robots::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Robots::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Dashboard "recent" ordering
        manager
            .create_index(
                Index::create()
                    .name("idx_robots_updated_at")
                    .table(Robots::Table)
                    .col(Robots::UpdatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Robots::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Robots {
    Table,
    Id,
    Name,
    Status,
    Alert,
    Priority,
    CreatedAt,
    UpdatedAt,
}
