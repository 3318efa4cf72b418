use sea_orm_migration::prelude::*;

/// Users (账号)
#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}

/// Gacha Templates (用户自定义模板，系统模板在代码中)
#[derive(DeriveIden)]
enum GachaTemplates {
    Table,
    Id,
    UserId,
    Name,
    Theme,
    ItemNoun,
    Tier1Count,
    Tier2Count,
    Tier3Count,
    Tier4Count,
    Tier5Count,
    IsPublic,
    CreatedAt,
}

/// Gacha Results (抽取结果历史)
#[derive(DeriveIden)]
enum GachaResults {
    Table,
    Id,
    UserId,
    TemplateId,
    TemplateName,
    ItemId,
    ItemName,
    Tier,
    DrawnAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

fn tier_count(col: GachaTemplates) -> ColumnDef {
    ColumnDef::new(col).integer().not_null().default(0).to_owned()
}

fn gacha_templates_table() -> TableCreateStatement {
    Table::create()
        .table(GachaTemplates::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(GachaTemplates::Id)
                .uuid()
                .not_null()
                .primary_key(),
        )
        .col(
            ColumnDef::new(GachaTemplates::UserId)
                .big_integer()
                .not_null(),
        )
        .col(
            ColumnDef::new(GachaTemplates::Name)
                .string_len(50)
                .not_null(),
        )
        .col(
            ColumnDef::new(GachaTemplates::Theme)
                .string_len(32)
                .not_null()
                .default("classic"),
        )
        .col(
            ColumnDef::new(GachaTemplates::ItemNoun)
                .string_len(32)
                .not_null()
                .default("Item"),
        )
        .col(&mut tier_count(GachaTemplates::Tier1Count))
        .col(&mut tier_count(GachaTemplates::Tier2Count))
        .col(&mut tier_count(GachaTemplates::Tier3Count))
        .col(&mut tier_count(GachaTemplates::Tier4Count))
        .col(&mut tier_count(GachaTemplates::Tier5Count))
        .col(
            ColumnDef::new(GachaTemplates::IsPublic)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(GachaTemplates::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::cust("NOW()")),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_gacha_templates_user")
                .from(GachaTemplates::Table, GachaTemplates::UserId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::PasswordHash)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                gacha_templates_table(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_gacha_templates_user")
                    .table(GachaTemplates::Table)
                    .col(GachaTemplates::UserId)
                    .to_owned(),
            )
            .await?;

        // 结果表不加模板外键：系统模板不在数据库中
        manager
            .create_table(
                Table::create()
                    .table(GachaResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GachaResults::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GachaResults::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GachaResults::TemplateId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GachaResults::TemplateName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GachaResults::ItemId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GachaResults::ItemName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GachaResults::Tier)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GachaResults::DrawnAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gacha_results_user")
                            .from(GachaResults::Table, GachaResults::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_gacha_results_user_drawn_at")
                    .table(GachaResults::Table)
                    .col(GachaResults::UserId)
                    .col(GachaResults::DrawnAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除顺序：结果 -> 模板 -> 用户
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(GachaResults::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(GachaTemplates::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().if_exists().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}
