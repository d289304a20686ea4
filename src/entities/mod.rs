// ABOUTME: SeaORM entities module for the diary's tables and relationships
// ABOUTME: Exports entity definitions for users, recipes, steps, and coffees

pub mod app_user;
pub mod coffee;
pub mod recipe;
pub mod step;

pub use app_user::Entity as AppUser;
pub use coffee::Entity as Coffee;
pub use recipe::Entity as Recipe;
pub use step::Entity as Step;
