use std::sync::Arc;

use service::RecipeService;

/// Shared handler state: the recipe service behind its injected repository.
#[derive(Clone)]
pub struct ServerState {
    pub recipes: Arc<RecipeService>,
}

impl ServerState {
    pub fn new(recipes: Arc<RecipeService>) -> Self {
        Self { recipes }
    }
}
