// ABOUTME: Tests for the persistence gateway against a temporary SQLite database
// ABOUTME: Covers cascades, orphan removal, step ordering, and typed failure classes

#[cfg(test)]
mod tests {
    use super::super::error::AppError;
    use super::super::storage::*;
    use crate::entities::{recipe, step, Recipe, Step};
    use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
    use tempfile::TempDir;

    async fn create_test_storage() -> (Storage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
        let storage = Storage::connect(&db_url).await.unwrap();

        (storage, temp_dir)
    }

    fn step(description: &str, time: i32) -> StepDraft {
        StepDraft {
            id: None,
            description: description.to_string(),
            time,
        }
    }

    fn v60_draft() -> RecipeDraft {
        RecipeDraft {
            name: "V60 morning".to_string(),
            brewer: "V60".to_string(),
            grinder: "Comandante".to_string(),
            clicks: 24,
            temperature: 94,
            water_amount: 250,
            coffee_amount: 15,
            coffee_ratio: 16,
            steps: vec![
                step("Bloom with 50g", 45),
                step("Pour to 150g", 30),
                step("Pour to 250g", 60),
            ],
        }
    }

    async fn step_rows(storage: &Storage, recipe_id: i32) -> u64 {
        Step::find()
            .filter(step::Column::RecipeId.eq(recipe_id))
            .count(&storage.db)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_user_operations() {
        let (storage, _temp_dir) = create_test_storage().await;

        let user = storage.create_user("radek", "radek@example.com").await.unwrap();
        assert!(user.id > 0);

        let fetched = storage.get_user(user.id).await.unwrap();
        assert_eq!(fetched.username, "radek");
        assert_eq!(fetched.email, "radek@example.com");

        let missing = storage.get_user(user.id + 100).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let (storage, _temp_dir) = create_test_storage().await;

        storage.create_user("twin", "a@example.com").await.unwrap();
        let result = storage.create_user("twin", "b@example.com").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_coffee_create_and_list() {
        let (storage, _temp_dir) = create_test_storage().await;

        assert!(storage.list_coffees().await.unwrap().is_empty());

        let espresso = storage.create_coffee("Espresso", "Ethiopia").await.unwrap();
        let filter = storage.create_coffee("Filter", "Kenya").await.unwrap();

        let coffees = storage.list_coffees().await.unwrap();
        assert_eq!(coffees, vec![espresso, filter]);
    }

    #[tokio::test]
    async fn test_create_recipe_with_steps() {
        let (storage, _temp_dir) = create_test_storage().await;
        let user = storage.create_user("brewer", "brewer@example.com").await.unwrap();

        let view = storage.create_recipe(user.id, &v60_draft()).await.unwrap();
        assert_eq!(view.user_id, Some(user.id));
        assert_eq!(view.steps.len(), 3);
        assert_eq!(
            view.steps.iter().map(|s| s.position).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(view.total_time, 135);
        assert_eq!(step_rows(&storage, view.id).await, 3);

        let fetched = storage.get_recipe(view.id).await.unwrap();
        assert_eq!(fetched, view);
    }

    #[tokio::test]
    async fn test_create_recipe_for_missing_user_writes_nothing() {
        let (storage, _temp_dir) = create_test_storage().await;

        let result = storage.create_recipe(42, &v60_draft()).await;
        assert!(matches!(result, Err(AppError::Integrity(_))));

        assert_eq!(Recipe::find().count(&storage.db).await.unwrap(), 0);
        assert_eq!(Step::find().count(&storage.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_remove_step_deletes_row_and_renumbers() {
        let (storage, _temp_dir) = create_test_storage().await;
        let user = storage.create_user("brewer", "brewer@example.com").await.unwrap();
        let view = storage.create_recipe(user.id, &v60_draft()).await.unwrap();

        let second = view.steps[1].id;
        let updated = storage.remove_step(view.id, second).await.unwrap();

        assert_eq!(updated.steps.len(), 2);
        assert_eq!(updated.steps[0].description, "Bloom with 50g");
        assert_eq!(updated.steps[1].description, "Pour to 250g");
        assert_eq!(updated.steps[1].position, 1);
        assert!(Step::find_by_id(second).one(&storage.db).await.unwrap().is_none());

        let again = storage.get_recipe(view.id).await.unwrap();
        assert_eq!(again.steps, updated.steps);
    }

    #[tokio::test]
    async fn test_remove_step_of_other_recipe_is_not_found() {
        let (storage, _temp_dir) = create_test_storage().await;
        let user = storage.create_user("brewer", "brewer@example.com").await.unwrap();
        let first = storage.create_recipe(user.id, &v60_draft()).await.unwrap();
        let second = storage.create_recipe(user.id, &v60_draft()).await.unwrap();

        let result = storage.remove_step(first.id, second.steps[0].id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(step_rows(&storage, second.id).await, 3);
    }

    #[tokio::test]
    async fn test_update_recipe_removes_orphans() {
        let (storage, _temp_dir) = create_test_storage().await;
        let user = storage.create_user("brewer", "brewer@example.com").await.unwrap();
        let view = storage.create_recipe(user.id, &v60_draft()).await.unwrap();

        let mut draft = v60_draft();
        draft.name = "V60 evening".to_string();
        draft.steps = vec![
            StepDraft {
                id: Some(view.steps[2].id),
                description: "Pour to 250g slowly".to_string(),
                time: 75,
            },
            StepDraft {
                id: Some(view.steps[0].id),
                description: "Bloom with 50g".to_string(),
                time: 45,
            },
            step("Swirl", 5),
        ];

        let updated = storage.update_recipe(view.id, &draft).await.unwrap();
        assert_eq!(updated.name, "V60 evening");
        assert_eq!(updated.steps.len(), 3);
        assert_eq!(updated.steps[0].id, view.steps[2].id);
        assert_eq!(updated.steps[0].description, "Pour to 250g slowly");
        assert_eq!(updated.steps[1].id, view.steps[0].id);
        assert_eq!(updated.steps[2].description, "Swirl");

        let dropped = view.steps[1].id;
        assert!(Step::find_by_id(dropped).one(&storage.db).await.unwrap().is_none());
        assert_eq!(step_rows(&storage, view.id).await, 3);
    }

    #[tokio::test]
    async fn test_update_with_foreign_step_rolls_back() {
        let (storage, _temp_dir) = create_test_storage().await;
        let user = storage.create_user("brewer", "brewer@example.com").await.unwrap();
        let mine = storage.create_recipe(user.id, &v60_draft()).await.unwrap();
        let other = storage.create_recipe(user.id, &v60_draft()).await.unwrap();

        let mut draft = v60_draft();
        draft.name = "Hijacked".to_string();
        draft.steps = vec![StepDraft {
            id: Some(other.steps[0].id),
            description: "Not mine".to_string(),
            time: 1,
        }];

        let result = storage.update_recipe(mine.id, &draft).await;
        assert!(matches!(result, Err(AppError::Integrity(_))));

        let unchanged = storage.get_recipe(mine.id).await.unwrap();
        assert_eq!(unchanged, mine);
    }

    #[tokio::test]
    async fn test_add_step_appends() {
        let (storage, _temp_dir) = create_test_storage().await;
        let user = storage.create_user("brewer", "brewer@example.com").await.unwrap();
        let view = storage.create_recipe(user.id, &v60_draft()).await.unwrap();

        let updated = storage.add_step(view.id, &step("Serve", 0)).await.unwrap();
        assert_eq!(updated.steps.len(), 4);
        assert_eq!(updated.steps[3].description, "Serve");
        assert_eq!(updated.steps[3].position, 3);
    }

    #[tokio::test]
    async fn test_add_step_to_missing_recipe_is_integrity_error() {
        let (storage, _temp_dir) = create_test_storage().await;

        let result = storage.add_step(999, &step("Orphan", 10)).await;
        assert!(matches!(result, Err(AppError::Integrity(_))));
        assert_eq!(Step::find().count(&storage.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_recipe_removes_steps() {
        let (storage, _temp_dir) = create_test_storage().await;
        let user = storage.create_user("brewer", "brewer@example.com").await.unwrap();
        let doomed = storage.create_recipe(user.id, &v60_draft()).await.unwrap();
        let kept = storage.create_recipe(user.id, &v60_draft()).await.unwrap();

        storage.delete_recipe(doomed.id).await.unwrap();

        assert_eq!(step_rows(&storage, doomed.id).await, 0);
        assert_eq!(step_rows(&storage, kept.id).await, 3);
        assert!(matches!(
            storage.get_recipe(doomed.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            storage.delete_recipe(doomed.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let (storage, _temp_dir) = create_test_storage().await;
        let owner = storage.create_user("owner", "owner@example.com").await.unwrap();
        let bystander = storage.create_user("other", "other@example.com").await.unwrap();
        storage.create_recipe(owner.id, &v60_draft()).await.unwrap();
        storage.create_recipe(owner.id, &v60_draft()).await.unwrap();
        let survivor = storage.create_recipe(bystander.id, &v60_draft()).await.unwrap();

        storage.delete_user(owner.id).await.unwrap();

        let remaining = Recipe::find().all(&storage.db).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, survivor.id);
        assert_eq!(Step::find().count(&storage.db).await.unwrap(), 3);

        assert!(matches!(
            storage.delete_user(owner.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_schema_cascades_raw_deletes() {
        let (storage, _temp_dir) = create_test_storage().await;
        let user = storage.create_user("raw", "raw@example.com").await.unwrap();
        let view = storage.create_recipe(user.id, &v60_draft()).await.unwrap();

        storage
            .db
            .execute_unprepared(&format!("DELETE FROM app_user WHERE id = {}", user.id))
            .await
            .unwrap();

        let recipes = Recipe::find()
            .filter(recipe::Column::AppUserId.eq(user.id))
            .count(&storage.db)
            .await
            .unwrap();
        assert_eq!(recipes, 0);
        assert_eq!(step_rows(&storage, view.id).await, 0);
    }

    #[tokio::test]
    async fn test_list_recipes_is_scoped_to_owner() {
        let (storage, _temp_dir) = create_test_storage().await;
        let alice = storage.create_user("alice", "alice@example.com").await.unwrap();
        let bob = storage.create_user("bob", "bob@example.com").await.unwrap();

        let mut chemex = v60_draft();
        chemex.name = "Chemex".to_string();
        storage.create_recipe(alice.id, &v60_draft()).await.unwrap();
        storage.create_recipe(alice.id, &chemex).await.unwrap();
        storage.create_recipe(bob.id, &v60_draft()).await.unwrap();

        let recipes = storage.list_recipes_for_user(alice.id).await.unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[1].name, "Chemex");
        assert!(recipes.iter().all(|r| r.user_id == Some(alice.id)));
        assert!(recipes.iter().all(|r| r.steps.len() == 3));
        assert_eq!(recipes[0].steps[0].position, 0);

        assert!(matches!(
            storage.list_recipes_for_user(bob.id + 10).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_recipe_owner() {
        let (storage, _temp_dir) = create_test_storage().await;
        let user = storage.create_user("owner", "owner@example.com").await.unwrap();
        let view = storage.create_recipe(user.id, &v60_draft()).await.unwrap();

        let owner = storage.fetch_recipe_owner(view.id).await.unwrap();
        assert_eq!(owner.map(|u| u.username), Some("owner".to_string()));

        assert!(matches!(
            storage.fetch_recipe_owner(view.id + 1).await,
            Err(AppError::NotFound(_))
        ));
    }
}
