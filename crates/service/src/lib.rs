//! Service layer providing recipe operations on top of `models`.
//! - Separates business rules (id validation, not-found policy) from data access.
//! - `RecipeRepository` is the persistence seam: MongoDB in production, in-memory in tests.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod recipe;

pub use errors::ServiceError;
pub use recipe::{MemoryRecipeRepository, MongoStore, RecipeRepository, RecipeService};
