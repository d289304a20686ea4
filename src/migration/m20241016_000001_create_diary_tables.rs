// ABOUTME: Initial migration to create app_user, recipe, step, and coffee tables
// ABOUTME: Declares the ON DELETE CASCADE chain app_user -> recipe -> step in the schema

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppUser::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AppUser::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AppUser::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(AppUser::Email).string().not_null())
                    .col(ColumnDef::new(AppUser::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Recipe::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Recipe::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Recipe::Name).string().not_null())
                    .col(ColumnDef::new(Recipe::Brewer).string().not_null().default(""))
                    .col(ColumnDef::new(Recipe::Grinder).string().not_null().default(""))
                    .col(ColumnDef::new(Recipe::Clicks).integer().not_null().default(0))
                    .col(ColumnDef::new(Recipe::Temperature).integer().not_null().default(0))
                    .col(ColumnDef::new(Recipe::WaterAmount).integer().not_null().default(0))
                    .col(ColumnDef::new(Recipe::CoffeeAmount).integer().not_null().default(0))
                    .col(ColumnDef::new(Recipe::CoffeeRatio).integer().not_null().default(0))
                    .col(ColumnDef::new(Recipe::AppUserId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_app_user_id")
                            .from(Recipe::Table, Recipe::AppUserId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Step::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Step::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Step::RecipeId).integer().not_null())
                    .col(ColumnDef::new(Step::Position).integer().not_null())
                    .col(ColumnDef::new(Step::Description).string().not_null())
                    .col(ColumnDef::new(Step::Time).integer().not_null().default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_step_recipe_id")
                            .from(Step::Table, Step::RecipeId)
                            .to(Recipe::Table, Recipe::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_step_recipe_position")
                    .table(Step::Table)
                    .col(Step::RecipeId)
                    .col(Step::Position)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Coffee::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Coffee::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Coffee::Name).string().not_null())
                    .col(ColumnDef::new(Coffee::Origin).string().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Coffee::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Step::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Recipe::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AppUser::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum AppUser {
    Table,
    Id,
    Username,
    Email,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Recipe {
    Table,
    Id,
    Name,
    Brewer,
    Grinder,
    Clicks,
    Temperature,
    WaterAmount,
    CoffeeAmount,
    CoffeeRatio,
    AppUserId,
}

#[derive(DeriveIden)]
enum Step {
    Table,
    Id,
    RecipeId,
    Position,
    Description,
    Time,
}

#[derive(DeriveIden)]
enum Coffee {
    Table,
    Id,
    Name,
    Origin,
}
