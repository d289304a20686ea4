// ABOUTME: Service layer validating client payloads and delegating to storage
// ABOUTME: Mutations always answer with the response wrapper, success or failure

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::entities::{app_user, coffee};
use crate::error::{AppError, Result};
use crate::storage::{RecipeDraft, Storage, StepDraft};
use crate::types::{ApiResponse, NewCoffee, NewUser, RecipeInput, RecipeView, StepInput};

/// A response wrapper together with the HTTP status it is sent with.
#[derive(Debug)]
pub struct Wrapped<T> {
    pub status: StatusCode,
    pub body: ApiResponse<T>,
}

impl<T> Wrapped<T> {
    fn from_result(result: Result<T>, status: StatusCode, message: &str) -> Self {
        match result {
            Ok(data) => Self {
                status,
                body: ApiResponse::success(message, data),
            },
            Err(err) => {
                let (status, message) = err.public_parts();
                Self {
                    status,
                    body: ApiResponse::error(message),
                }
            }
        }
    }
}

impl<T: Serialize> IntoResponse for Wrapped<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Clone)]
pub struct CoffeeService {
    storage: Arc<Storage>,
}

impl CoffeeService {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub async fn add_coffee(&self, coffee: NewCoffee) -> Wrapped<coffee::Model> {
        let result = self.insert_coffee(coffee).await;

        Wrapped::from_result(result, StatusCode::CREATED, "Coffee added")
    }

    async fn insert_coffee(&self, coffee: NewCoffee) -> Result<coffee::Model> {
        let name = required("name", coffee.name.as_deref())?;
        let origin = required("origin", coffee.origin.as_deref())?;
        let created = self.storage.create_coffee(name, origin).await?;

        tracing::info!(coffee_id = created.id, "Added coffee");
        Ok(created)
    }

    pub async fn get_coffees(&self) -> Result<Vec<coffee::Model>> {
        self.storage.list_coffees().await
    }
}

#[derive(Clone)]
pub struct UserService {
    storage: Arc<Storage>,
}

impl UserService {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub async fn register(&self, user: NewUser) -> Wrapped<app_user::Model> {
        let result = self.insert_user(user).await;

        Wrapped::from_result(result, StatusCode::CREATED, "User registered")
    }

    async fn insert_user(&self, user: NewUser) -> Result<app_user::Model> {
        let username = required("username", user.username.as_deref())?;
        let email = required("email", user.email.as_deref())?;
        if !email.contains('@') {
            return Err(AppError::Validation(format!(
                "'{}' is not an email address",
                email
            )));
        }
        let created = self.storage.create_user(username, email).await?;

        tracing::info!(user_id = created.id, "Registered user");
        Ok(created)
    }

    pub async fn get(&self, user_id: i32) -> Result<app_user::Model> {
        self.storage.get_user(user_id).await
    }

    pub async fn delete(&self, user_id: i32) -> Wrapped<()> {
        let result = self.storage.delete_user(user_id).await;
        if result.is_ok() {
            tracing::info!(user_id, "Deleted user with all recipes");
        }

        Wrapped::from_result(result, StatusCode::OK, "User deleted")
    }
}

#[derive(Clone)]
pub struct RecipeService {
    storage: Arc<Storage>,
}

impl RecipeService {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub async fn create(&self, owner_id: i32, input: RecipeInput) -> Wrapped<RecipeView> {
        let result = match recipe_draft(input, false) {
            Ok(draft) => self.storage.create_recipe(owner_id, &draft).await,
            Err(err) => Err(err),
        };

        Wrapped::from_result(result, StatusCode::CREATED, "Recipe created")
    }

    pub async fn get(&self, recipe_id: i32) -> Result<RecipeView> {
        self.storage.get_recipe(recipe_id).await
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<RecipeView>> {
        self.storage.list_recipes_for_user(user_id).await
    }

    pub async fn update(&self, recipe_id: i32, input: RecipeInput) -> Wrapped<RecipeView> {
        let result = match recipe_draft(input, true) {
            Ok(draft) => self.storage.update_recipe(recipe_id, &draft).await,
            Err(err) => Err(err),
        };

        Wrapped::from_result(result, StatusCode::OK, "Recipe updated")
    }

    pub async fn delete(&self, recipe_id: i32) -> Wrapped<()> {
        let result = self.storage.delete_recipe(recipe_id).await;

        Wrapped::from_result(result, StatusCode::OK, "Recipe deleted")
    }

    pub async fn add_step(&self, recipe_id: i32, input: StepInput) -> Wrapped<RecipeView> {
        let result = match step_draft(input, false) {
            Ok(draft) => self.storage.add_step(recipe_id, &draft).await,
            Err(err) => Err(err),
        };

        Wrapped::from_result(result, StatusCode::CREATED, "Step added")
    }

    pub async fn remove_step(&self, recipe_id: i32, step_id: i32) -> Wrapped<RecipeView> {
        let result = self.storage.remove_step(recipe_id, step_id).await;

        Wrapped::from_result(result, StatusCode::OK, "Step removed")
    }

    pub async fn owner(&self, recipe_id: i32) -> Result<app_user::Model> {
        self.storage
            .fetch_recipe_owner(recipe_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("owner of recipe {}", recipe_id)))
    }
}

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("'{}' is required", field))),
    }
}

fn non_negative(field: &str, value: i32) -> Result<i32> {
    if value < 0 {
        return Err(AppError::Validation(format!(
            "'{}' must not be negative",
            field
        )));
    }
    Ok(value)
}

/// Step ids are only meaningful when updating an existing recipe.
fn step_draft(input: StepInput, keep_id: bool) -> Result<StepDraft> {
    if input.id.is_some() && !keep_id {
        return Err(AppError::Validation(
            "new steps must not carry an 'id'".to_string(),
        ));
    }

    Ok(StepDraft {
        id: input.id,
        description: required("description", input.description.as_deref())?.to_string(),
        time: non_negative("time", input.time)?,
    })
}

fn recipe_draft(input: RecipeInput, keep_step_ids: bool) -> Result<RecipeDraft> {
    let steps = input
        .steps
        .into_iter()
        .map(|s| step_draft(s, keep_step_ids))
        .collect::<Result<Vec<_>>>()?;

    Ok(RecipeDraft {
        name: required("name", input.name.as_deref())?.to_string(),
        brewer: input.brewer.trim().to_string(),
        grinder: input.grinder.trim().to_string(),
        clicks: non_negative("clicks", input.clicks)?,
        temperature: non_negative("temperature", input.temperature)?,
        water_amount: non_negative("waterAmount", input.water_amount)?,
        coffee_amount: non_negative("coffeeAmount", input.coffee_amount)?,
        coffee_ratio: non_negative("coffeeRatio", input.coffee_ratio)?,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_missing_and_blank() {
        assert!(required("name", None).is_err());
        assert!(required("name", Some("   ")).is_err());
        assert_eq!(required("name", Some(" Espresso ")).unwrap(), "Espresso");
    }

    #[test]
    fn recipe_draft_rejects_negative_amounts() {
        let input = RecipeInput {
            name: Some("Chemex".to_string()),
            water_amount: -1,
            ..Default::default()
        };

        let err = recipe_draft(input, false).unwrap_err();
        assert!(err.to_string().contains("waterAmount"));
    }

    #[test]
    fn new_steps_cannot_carry_ids() {
        let input = StepInput {
            id: Some(4),
            description: Some("Swirl".to_string()),
            time: 5,
        };

        assert!(matches!(step_draft(input.clone(), false), Err(AppError::Validation(_))));
        assert_eq!(step_draft(input, true).unwrap().id, Some(4));
    }

    #[test]
    fn recipe_draft_keeps_step_order() {
        let input = RecipeInput {
            name: Some("Aeropress".to_string()),
            steps: vec![
                StepInput {
                    description: Some("Pour".to_string()),
                    time: 10,
                    ..Default::default()
                },
                StepInput {
                    description: Some("Press".to_string()),
                    time: 30,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let draft = recipe_draft(input, false).unwrap();
        let descriptions: Vec<&str> = draft.steps.iter().map(|s| s.description.as_str()).collect();
        assert_eq!(descriptions, ["Pour", "Press"]);
    }
}
