// ABOUTME: Type definitions for API requests, responses, and the uniform response wrapper
// ABOUTME: Recipe views render forward edges only: recipe -> steps, owner as a bare id

use serde::{Deserialize, Serialize};

use crate::entities::{recipe, step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Error,
}

/// Envelope returned by every mutating endpoint and by every failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: Outcome,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: Outcome::Success,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Outcome::Error,
            message: message.into(),
            data: None,
        }
    }
}

// Coffee
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCoffee {
    // Optional so a missing field is reported as a validation error
    // instead of a body rejection.
    pub name: Option<String>,
    pub origin: Option<String>,
}

// Users
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUser {
    pub username: Option<String>,
    pub email: Option<String>,
}

// Recipes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInput {
    pub name: Option<String>,
    #[serde(default)]
    pub brewer: String,
    #[serde(default)]
    pub grinder: String,
    #[serde(default)]
    pub clicks: i32,
    #[serde(default)]
    pub temperature: i32,
    #[serde(default)]
    pub water_amount: i32,
    #[serde(default)]
    pub coffee_amount: i32,
    #[serde(default)]
    pub coffee_ratio: i32,
    #[serde(default)]
    pub steps: Vec<StepInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepInput {
    /// Set when updating a recipe to keep an existing step; absent for new steps.
    #[serde(default)]
    pub id: Option<i32>,
    pub description: Option<String>,
    #[serde(default)]
    pub time: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepView {
    pub id: i32,
    pub position: i32,
    pub description: String,
    pub time: i32,
}

impl From<step::Model> for StepView {
    fn from(step: step::Model) -> Self {
        Self {
            id: step.id,
            position: step.position,
            description: step.description,
            time: step.time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView {
    pub id: i32,
    pub name: String,
    pub brewer: String,
    pub grinder: String,
    pub clicks: i32,
    pub temperature: i32,
    pub water_amount: i32,
    pub coffee_amount: i32,
    pub coffee_ratio: i32,
    pub user_id: Option<i32>,
    pub steps: Vec<StepView>,
    /// Sum of all step times, in seconds. Wider than a single step's time.
    pub total_time: i64,
}

impl RecipeView {
    pub fn new(recipe: recipe::Model, steps: Vec<step::Model>) -> Self {
        let steps: Vec<StepView> = steps.into_iter().map(StepView::from).collect();
        let total_time = steps.iter().map(|s| i64::from(s.time)).sum();

        Self {
            id: recipe.id,
            name: recipe.name,
            brewer: recipe.brewer,
            grinder: recipe.grinder,
            clicks: recipe.clicks,
            temperature: recipe.temperature,
            water_amount: recipe.water_amount,
            coffee_amount: recipe.coffee_amount,
            coffee_ratio: recipe.coffee_ratio,
            user_id: recipe.app_user_id,
            steps,
            total_time,
        }
    }
}
