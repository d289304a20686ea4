// ABOUTME: SeaORM persistence gateway for users, coffees, recipes, and recipe steps
// ABOUTME: Multi-row mutations run in one transaction; owner lookups are explicit fetches

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use std::collections::HashSet;

use crate::entities::{app_user, coffee, recipe, step, AppUser, Coffee, Recipe, Step};
use crate::error::{AppError, Result};
use crate::migration::Migrator;
use crate::types::RecipeView;

/// Validated recipe fields ready to be written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeDraft {
    pub name: String,
    pub brewer: String,
    pub grinder: String,
    pub clicks: i32,
    pub temperature: i32,
    pub water_amount: i32,
    pub coffee_amount: i32,
    pub coffee_ratio: i32,
    pub steps: Vec<StepDraft>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepDraft {
    pub id: Option<i32>,
    pub description: String,
    pub time: i32,
}

pub struct Storage {
    pub db: DatabaseConnection,
}

impl Storage {
    /// Connects to the store and brings the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let db = Database::connect(database_url).await?;
        Migrator::up(&db, None).await?;

        tracing::info!("Connected to {}", database_url);
        Ok(Self { db })
    }

    // Users

    pub async fn create_user(&self, username: &str, email: &str) -> Result<app_user::Model> {
        let user = app_user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        Ok(user.insert(&self.db).await?)
    }

    pub async fn get_user(&self, user_id: i32) -> Result<app_user::Model> {
        AppUser::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))
    }

    /// Recipes and their steps go with the user through the schema's cascades.
    pub async fn delete_user(&self, user_id: i32) -> Result<()> {
        let res = AppUser::delete_by_id(user_id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(format!("user {}", user_id)));
        }

        Ok(())
    }

    // Coffees

    pub async fn create_coffee(&self, name: &str, origin: &str) -> Result<coffee::Model> {
        let coffee = coffee::ActiveModel {
            name: Set(name.to_string()),
            origin: Set(origin.to_string()),
            ..Default::default()
        };

        Ok(coffee.insert(&self.db).await?)
    }

    pub async fn list_coffees(&self) -> Result<Vec<coffee::Model>> {
        Ok(Coffee::find()
            .order_by_asc(coffee::Column::Id)
            .all(&self.db)
            .await?)
    }

    // Recipes

    pub async fn create_recipe(&self, owner_id: i32, draft: &RecipeDraft) -> Result<RecipeView> {
        let txn = self.db.begin().await?;

        if AppUser::find_by_id(owner_id).one(&txn).await?.is_none() {
            return Err(AppError::Integrity(format!(
                "recipe owner user {} does not exist",
                owner_id
            )));
        }

        let mut active = recipe::ActiveModel {
            app_user_id: Set(Some(owner_id)),
            ..Default::default()
        };
        apply_draft(&mut active, draft);
        let recipe = active.insert(&txn).await?;

        let mut steps = Vec::with_capacity(draft.steps.len());
        for (position, step_draft) in draft.steps.iter().enumerate() {
            steps.push(insert_step(&txn, recipe.id, position as i32, step_draft).await?);
        }

        txn.commit().await?;

        tracing::info!(recipe_id = recipe.id, steps = steps.len(), "Created recipe");
        Ok(RecipeView::new(recipe, steps))
    }

    pub async fn get_recipe(&self, recipe_id: i32) -> Result<RecipeView> {
        let recipe = find_recipe(&self.db, recipe_id).await?;
        let steps = load_steps(&self.db, recipe_id).await?;

        Ok(RecipeView::new(recipe, steps))
    }

    pub async fn list_recipes_for_user(&self, user_id: i32) -> Result<Vec<RecipeView>> {
        self.get_user(user_id).await?;

        let rows = Recipe::find()
            .filter(recipe::Column::AppUserId.eq(user_id))
            .order_by_asc(recipe::Column::Id)
            .find_with_related(Step)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(recipe, mut steps)| {
                steps.sort_by_key(|s| (s.position, s.id));
                RecipeView::new(recipe, steps)
            })
            .collect())
    }

    /// Replaces the recipe's fields and step list. Steps that carry an id are
    /// kept and updated, steps without one are inserted, and steps missing
    /// from the list are deleted.
    pub async fn update_recipe(&self, recipe_id: i32, draft: &RecipeDraft) -> Result<RecipeView> {
        let txn = self.db.begin().await?;

        let recipe = find_recipe(&txn, recipe_id).await?;
        let existing = load_steps(&txn, recipe_id).await?;
        let existing_ids: HashSet<i32> = existing.iter().map(|s| s.id).collect();

        let mut kept = HashSet::new();
        for id in draft.steps.iter().filter_map(|s| s.id) {
            if !existing_ids.contains(&id) {
                return Err(AppError::Integrity(format!(
                    "step {} does not belong to recipe {}",
                    id, recipe_id
                )));
            }
            if !kept.insert(id) {
                return Err(AppError::Integrity(format!(
                    "step {} is listed more than once",
                    id
                )));
            }
        }

        let mut active: recipe::ActiveModel = recipe.into();
        apply_draft(&mut active, draft);
        let recipe = active.update(&txn).await?;

        let orphans: Vec<i32> = existing_ids.difference(&kept).copied().collect();
        if !orphans.is_empty() {
            Step::delete_many()
                .filter(step::Column::RecipeId.eq(recipe_id))
                .filter(step::Column::Id.is_in(orphans.clone()))
                .exec(&txn)
                .await?;
        }

        let mut existing = existing;
        for (position, step_draft) in draft.steps.iter().enumerate() {
            let position = position as i32;
            match step_draft.id {
                Some(id) => {
                    let idx = existing
                        .iter()
                        .position(|s| s.id == id)
                        .ok_or_else(|| AppError::Internal(format!("step {} vanished", id)))?;
                    let mut active: step::ActiveModel = existing.swap_remove(idx).into();
                    active.position = Set(position);
                    active.description = Set(step_draft.description.clone());
                    active.time = Set(step_draft.time);
                    active.update(&txn).await?;
                }
                None => {
                    insert_step(&txn, recipe_id, position, step_draft).await?;
                }
            }
        }

        let steps = load_steps(&txn, recipe_id).await?;
        txn.commit().await?;

        tracing::info!(recipe_id, removed_steps = orphans.len(), "Updated recipe");
        Ok(RecipeView::new(recipe, steps))
    }

    pub async fn delete_recipe(&self, recipe_id: i32) -> Result<()> {
        let txn = self.db.begin().await?;

        let recipe = find_recipe(&txn, recipe_id).await?;
        let removed = Step::delete_many()
            .filter(step::Column::RecipeId.eq(recipe_id))
            .exec(&txn)
            .await?;
        recipe.delete(&txn).await?;

        txn.commit().await?;

        tracing::info!(recipe_id, steps = removed.rows_affected, "Deleted recipe");
        Ok(())
    }

    /// Appends a step at the end of the recipe.
    pub async fn add_step(&self, recipe_id: i32, draft: &StepDraft) -> Result<RecipeView> {
        let txn = self.db.begin().await?;

        let recipe = Recipe::find_by_id(recipe_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::Integrity(format!("cannot attach step to missing recipe {}", recipe_id))
            })?;

        let count = Step::find()
            .filter(step::Column::RecipeId.eq(recipe_id))
            .count(&txn)
            .await?;
        insert_step(&txn, recipe_id, count as i32, draft).await?;

        let steps = load_steps(&txn, recipe_id).await?;
        txn.commit().await?;

        Ok(RecipeView::new(recipe, steps))
    }

    /// Deletes one step and closes the gap in the positions of the rest.
    pub async fn remove_step(&self, recipe_id: i32, step_id: i32) -> Result<RecipeView> {
        let txn = self.db.begin().await?;

        let recipe = find_recipe(&txn, recipe_id).await?;
        let step = Step::find_by_id(step_id)
            .filter(step::Column::RecipeId.eq(recipe_id))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("step {} in recipe {}", step_id, recipe_id))
            })?;
        step.delete(&txn).await?;

        let mut steps = Vec::new();
        for (position, remaining) in load_steps(&txn, recipe_id).await?.into_iter().enumerate() {
            let position = position as i32;
            if remaining.position == position {
                steps.push(remaining);
                continue;
            }
            let mut active: step::ActiveModel = remaining.into();
            active.position = Set(position);
            steps.push(active.update(&txn).await?);
        }

        txn.commit().await?;

        tracing::info!(recipe_id, step_id, "Removed step");
        Ok(RecipeView::new(recipe, steps))
    }

    /// Loads the user owning a recipe. `None` when the recipe has no owner yet.
    pub async fn fetch_recipe_owner(&self, recipe_id: i32) -> Result<Option<app_user::Model>> {
        let recipe = find_recipe(&self.db, recipe_id).await?;

        Ok(recipe.find_related(AppUser).one(&self.db).await?)
    }
}

async fn find_recipe<C: ConnectionTrait>(conn: &C, recipe_id: i32) -> Result<recipe::Model> {
    Recipe::find_by_id(recipe_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("recipe {}", recipe_id)))
}

async fn load_steps<C: ConnectionTrait>(conn: &C, recipe_id: i32) -> Result<Vec<step::Model>> {
    Ok(Step::find()
        .filter(step::Column::RecipeId.eq(recipe_id))
        .order_by_asc(step::Column::Position)
        .order_by_asc(step::Column::Id)
        .all(conn)
        .await?)
}

async fn insert_step<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    position: i32,
    draft: &StepDraft,
) -> Result<step::Model> {
    let step = step::ActiveModel {
        recipe_id: Set(recipe_id),
        position: Set(position),
        description: Set(draft.description.clone()),
        time: Set(draft.time),
        ..Default::default()
    };

    Ok(step.insert(conn).await?)
}

fn apply_draft(active: &mut recipe::ActiveModel, draft: &RecipeDraft) {
    active.name = Set(draft.name.clone());
    active.brewer = Set(draft.brewer.clone());
    active.grinder = Set(draft.grinder.clone());
    active.clicks = Set(draft.clicks);
    active.temperature = Set(draft.temperature);
    active.water_amount = Set(draft.water_amount);
    active.coffee_amount = Set(draft.coffee_amount);
    active.coffee_ratio = Set(draft.coffee_ratio);
}
