//! Recipe document model and request-field normalisation.

pub mod errors;
pub mod input;
pub mod recipe;

pub use input::{Fields, NewRecipe, RecipePatch};
pub use recipe::{parse_id, Numeric, Recipe, RecipeView};

#[cfg(test)]
mod tests;
