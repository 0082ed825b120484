use async_trait::async_trait;
use bson::oid::ObjectId;
use models::{Recipe, RecipePatch};
use tokio::sync::RwLock;

use crate::errors::ServiceError;
use crate::recipe::repository::RecipeRepository;

/// In-process repository over a `RwLock<Vec<Recipe>>`.
///
/// Mirrors the MongoDB semantics the HTTP layer relies on: insertion order on
/// list, increments under the write lock, `$set`-style partial updates.
#[derive(Default)]
pub struct MemoryRecipeRepository {
    items: RwLock<Vec<Recipe>>,
}

impl MemoryRecipeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl RecipeRepository for MemoryRecipeRepository {
    async fn ping(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn insert(&self, recipe: Recipe) -> Result<Recipe, ServiceError> {
        let mut items = self.items.write().await;
        if items.iter().any(|r| r.id == recipe.id) {
            return Err(ServiceError::Db(format!("duplicate key: {}", recipe.id)));
        }
        items.push(recipe.clone());
        Ok(recipe)
    }

    async fn list(&self) -> Result<Vec<Recipe>, ServiceError> {
        Ok(self.items.read().await.clone())
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Recipe>, ServiceError> {
        Ok(self.items.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn increment_likes(&self, id: ObjectId) -> Result<Option<Recipe>, ServiceError> {
        let mut items = self.items.write().await;
        Ok(items.iter_mut().find(|r| r.id == id).map(|r| {
            r.like_count += 1;
            r.clone()
        }))
    }

    async fn update(&self, id: ObjectId, patch: &RecipePatch) -> Result<Option<Recipe>, ServiceError> {
        let mut items = self.items.write().await;
        Ok(items.iter_mut().find(|r| r.id == id).map(|r| {
            patch.apply_to(r);
            r.clone()
        }))
    }

    async fn delete(&self, id: ObjectId) -> Result<u64, ServiceError> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|r| r.id != id);
        Ok((before - items.len()) as u64)
    }
}
