pub mod repo;
pub mod repository;
pub mod service;

pub use repo::{memory::MemoryRecipeRepository, mongo::MongoStore};
pub use repository::RecipeRepository;
pub use service::RecipeService;
