// ABOUTME: Recipe entity describing a named brewing procedure and its parameters
// ABOUTME: Belongs to one AppUser and owns an ordered list of steps

use sea_orm::entity::prelude::*;

/// A recipe row. The owner is kept as a plain id; use
/// `Storage::fetch_recipe_owner` to load the user when it is needed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recipe")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub brewer: String,
    pub grinder: String,
    pub clicks: i32,
    pub temperature: i32,
    pub water_amount: i32,
    pub coffee_amount: i32,
    pub coffee_ratio: i32,
    pub app_user_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::app_user::Entity",
        from = "Column::AppUserId",
        to = "super::app_user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    AppUser,
    #[sea_orm(has_many = "super::step::Entity")]
    Steps,
}

impl Related<super::app_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AppUser.def()
    }
}

impl Related<super::step::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Steps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
