use std::sync::Arc;

use bson::oid::ObjectId;
use chrono::Utc;
use models::{parse_id, Fields, NewRecipe, Recipe, RecipePatch};
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::recipe::repository::RecipeRepository;

const RECIPE: &str = "recipe";

/// Recipe business service, independent of the web framework.
///
/// Validates identifiers before touching the store, normalises request
/// fields, and turns "no matching document" into [`ServiceError::NotFound`].
pub struct RecipeService {
    repo: Arc<dyn RecipeRepository>,
}

impl RecipeService {
    pub fn new(repo: Arc<dyn RecipeRepository>) -> Self { Self { repo } }

    pub async fn ping(&self) -> Result<(), ServiceError> { self.repo.ping().await }

    /// Create a recipe from raw request fields.
    ///
    /// # Examples
    /// ```
    /// use service::recipe::{MemoryRecipeRepository, RecipeService};
    /// use std::sync::Arc;
    /// let svc = RecipeService::new(Arc::new(MemoryRecipeRepository::new()));
    /// let fields = serde_json::json!({"title": "Soup", "categories": "dinner"});
    /// let created = tokio_test::block_on(svc.create(fields.as_object().unwrap())).unwrap();
    /// assert_eq!(created.categories, vec!["dinner".to_string()]);
    /// assert_eq!(created.like_count, 0);
    /// ```
    #[instrument(skip(self, fields), fields(field_count = fields.len()))]
    pub async fn create(&self, fields: &Fields) -> Result<Recipe, ServiceError> {
        let recipe = NewRecipe::from_fields(fields).into_recipe(ObjectId::new(), Utc::now());
        let saved = self.repo.insert(recipe).await?;
        info!(recipe_id = %saved.id, "recipe_inserted");
        Ok(saved)
    }

    pub async fn list(&self) -> Result<Vec<Recipe>, ServiceError> {
        let items = self.repo.list().await?;
        debug!(count = items.len(), "recipes_listed");
        Ok(items)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, raw_id: &str) -> Result<Recipe, ServiceError> {
        let id = parse_id(raw_id)?;
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(RECIPE))
    }

    #[instrument(skip(self))]
    pub async fn like(&self, raw_id: &str) -> Result<Recipe, ServiceError> {
        let id = parse_id(raw_id)?;
        let liked = self
            .repo
            .increment_likes(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(RECIPE))?;
        info!(recipe_id = %liked.id, like_count = liked.like_count, "recipe_liked");
        Ok(liked)
    }

    /// Partial update. A body with no recognised field returns the current document.
    #[instrument(skip(self, fields))]
    pub async fn update(&self, raw_id: &str, fields: &Fields) -> Result<Recipe, ServiceError> {
        let id = parse_id(raw_id)?;
        let patch = RecipePatch::from_fields(fields);
        let updated = if patch.is_empty() {
            debug!(recipe_id = %id, "empty_patch");
            self.repo.get(id).await?
        } else {
            self.repo.update(id, &patch).await?
        };
        let updated = updated.ok_or_else(|| ServiceError::not_found(RECIPE))?;
        info!(recipe_id = %updated.id, "recipe_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, raw_id: &str) -> Result<u64, ServiceError> {
        let id = parse_id(raw_id)?;
        match self.repo.delete(id).await? {
            0 => Err(ServiceError::not_found(RECIPE)),
            n => {
                info!(recipe_id = %id, deleted = n, "recipe_deleted");
                Ok(n)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::MemoryRecipeRepository;
    use models::{errors::ModelError, Numeric};
    use serde_json::{json, Value};

    fn svc() -> RecipeService {
        RecipeService::new(Arc::new(MemoryRecipeRepository::new()))
    }

    fn fields(v: Value) -> Fields {
        v.as_object().cloned().expect("object fixture")
    }

    #[tokio::test]
    async fn create_normalises_and_stamps() -> Result<(), anyhow::Error> {
        let svc = svc();
        let before = Utc::now();
        let r = svc
            .create(&fields(json!({"title": "Soup", "prepTime": "20", "categories": "dinner"})))
            .await?;
        assert_eq!(r.prep_time, Some(Numeric::Int(20)));
        assert_eq!(r.categories, vec!["dinner"]);
        assert_eq!(r.like_count, 0);
        let created = r.created_at.expect("createdAt stamped").to_chrono();
        assert!(created >= before - chrono::Duration::seconds(1));

        let listed = svc.list().await?;
        assert_eq!(listed, vec![r]);
        Ok(())
    }

    #[tokio::test]
    async fn supplied_like_count_is_kept() -> Result<(), anyhow::Error> {
        let r = svc().create(&fields(json!({"likeCount": "12"}))).await?;
        assert_eq!(r.like_count, 12);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_id_is_rejected_everywhere() {
        let svc = svc();
        let empty = Fields::new();
        let is_invalid = |r: Result<_, ServiceError>| {
            matches!(r, Err(ServiceError::Model(ModelError::InvalidId(_))))
        };
        assert!(is_invalid(svc.get("nope").await.map(|_| ())));
        assert!(is_invalid(svc.like("nope").await.map(|_| ())));
        assert!(is_invalid(svc.update("nope", &empty).await.map(|_| ())));
        assert!(is_invalid(svc.delete("nope").await.map(|_| ())));
    }

    #[tokio::test]
    async fn absent_id_is_not_found() {
        let svc = svc();
        let id = ObjectId::new().to_hex();
        assert!(matches!(svc.get(&id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.like(&id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            svc.update(&id, &fields(json!({"title": "x"}))).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(svc.update(&id, &Fields::new()).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete(&id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn n_likes_add_exactly_n() -> Result<(), anyhow::Error> {
        let svc = svc();
        let r = svc.create(&fields(json!({"title": "Pie", "likeCount": 3}))).await?;
        let id = r.id.to_hex();
        for _ in 0..5 {
            svc.like(&id).await?;
        }
        assert_eq!(svc.get(&id).await?.like_count, 8);
        Ok(())
    }

    #[tokio::test]
    async fn update_touches_only_supplied_fields() -> Result<(), anyhow::Error> {
        let svc = svc();
        let r = svc
            .create(&fields(json!({"title": "Pie", "cuisine": "British", "categories": ["dessert"]})))
            .await?;
        let id = r.id.to_hex();

        let updated = svc.update(&id, &fields(json!({"categories": "baking", "prepTime": "45"}))).await?;
        assert_eq!(updated.title.as_deref(), Some("Pie"));
        assert_eq!(updated.cuisine.as_deref(), Some("British"));
        assert_eq!(updated.categories, vec!["baking"]);
        assert_eq!(updated.prep_time, Some(Numeric::Int(45)));
        assert_eq!(updated.created_at, r.created_at);

        let unchanged = svc.update(&id, &fields(json!({"bogus": true}))).await?;
        assert_eq!(unchanged, updated);
        Ok(())
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() -> Result<(), anyhow::Error> {
        let svc = svc();
        let id = svc.create(&Fields::new()).await?.id.to_hex();
        assert_eq!(svc.delete(&id).await?, 1);
        assert!(matches!(svc.get(&id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
