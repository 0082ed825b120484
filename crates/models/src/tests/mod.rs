
/// Document (de)serialization and the client-facing view
pub mod recipe_tests;
