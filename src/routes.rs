// ABOUTME: HTTP handlers mapping diary endpoints onto service calls
// ABOUTME: Handlers only extract input and forward whatever the services produce

use axum::{extract::State, response::Json};

use crate::entities::{app_user, coffee};
use crate::error::Result;
use crate::extract::{JsonBody, PathParams};
use crate::service::Wrapped;
use crate::types::{NewCoffee, NewUser, RecipeInput, RecipeView, StepInput};
use crate::AppState;

// Coffees

pub async fn create_coffee(
    State(state): State<AppState>,
    JsonBody(coffee): JsonBody<NewCoffee>,
) -> Wrapped<coffee::Model> {
    state.coffees.add_coffee(coffee).await
}

pub async fn get_coffees(State(state): State<AppState>) -> Result<Json<Vec<coffee::Model>>> {
    Ok(Json(state.coffees.get_coffees().await?))
}

// Users

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(user): JsonBody<NewUser>,
) -> Wrapped<app_user::Model> {
    state.users.register(user).await
}

pub async fn get_user(
    PathParams(user_id): PathParams<i32>,
    State(state): State<AppState>,
) -> Result<Json<app_user::Model>> {
    Ok(Json(state.users.get(user_id).await?))
}

pub async fn delete_user(
    PathParams(user_id): PathParams<i32>,
    State(state): State<AppState>,
) -> Wrapped<()> {
    state.users.delete(user_id).await
}

// Recipes

pub async fn create_recipe(
    PathParams(user_id): PathParams<i32>,
    State(state): State<AppState>,
    JsonBody(recipe): JsonBody<RecipeInput>,
) -> Wrapped<RecipeView> {
    state.recipes.create(user_id, recipe).await
}

pub async fn list_recipes(
    PathParams(user_id): PathParams<i32>,
    State(state): State<AppState>,
) -> Result<Json<Vec<RecipeView>>> {
    Ok(Json(state.recipes.list_for_user(user_id).await?))
}

pub async fn get_recipe(
    PathParams(recipe_id): PathParams<i32>,
    State(state): State<AppState>,
) -> Result<Json<RecipeView>> {
    Ok(Json(state.recipes.get(recipe_id).await?))
}

pub async fn update_recipe(
    PathParams(recipe_id): PathParams<i32>,
    State(state): State<AppState>,
    JsonBody(recipe): JsonBody<RecipeInput>,
) -> Wrapped<RecipeView> {
    state.recipes.update(recipe_id, recipe).await
}

pub async fn delete_recipe(
    PathParams(recipe_id): PathParams<i32>,
    State(state): State<AppState>,
) -> Wrapped<()> {
    state.recipes.delete(recipe_id).await
}

pub async fn add_step(
    PathParams(recipe_id): PathParams<i32>,
    State(state): State<AppState>,
    JsonBody(step): JsonBody<StepInput>,
) -> Wrapped<RecipeView> {
    state.recipes.add_step(recipe_id, step).await
}

pub async fn remove_step(
    PathParams((recipe_id, step_id)): PathParams<(i32, i32)>,
    State(state): State<AppState>,
) -> Wrapped<RecipeView> {
    state.recipes.remove_step(recipe_id, step_id).await
}

pub async fn get_recipe_owner(
    PathParams(recipe_id): PathParams<i32>,
    State(state): State<AppState>,
) -> Result<Json<app_user::Model>> {
    Ok(Json(state.recipes.owner(recipe_id).await?))
}
