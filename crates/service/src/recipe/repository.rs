use async_trait::async_trait;
use bson::oid::ObjectId;
use models::{Recipe, RecipePatch};

use crate::errors::ServiceError;

/// Persistence seam for recipe documents. One method, one store round-trip.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Check the store is reachable.
    async fn ping(&self) -> Result<(), ServiceError>;
    async fn insert(&self, recipe: Recipe) -> Result<Recipe, ServiceError>;
    /// Every document, unfiltered and unpaginated.
    async fn list(&self) -> Result<Vec<Recipe>, ServiceError>;
    async fn get(&self, id: ObjectId) -> Result<Option<Recipe>, ServiceError>;
    /// Atomically add 1 to `likeCount`; returns the document after the increment.
    async fn increment_likes(&self, id: ObjectId) -> Result<Option<Recipe>, ServiceError>;
    /// `$set` the supplied fields; returns the document after the update.
    async fn update(&self, id: ObjectId, patch: &RecipePatch) -> Result<Option<Recipe>, ServiceError>;
    /// Returns the number of removed documents (0 or 1).
    async fn delete(&self, id: ObjectId) -> Result<u64, ServiceError>;
}
