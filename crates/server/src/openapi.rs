use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthDoc {
    /// `OK` or `Error`
    pub status: String,
    /// `Connected` or `Disconnected`
    pub mongodb: String,
    pub error: Option<String>,
}

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String }

#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct DeleteResultDoc { pub message: String, pub deletedCount: u64 }

/// Create/update body. Form posts may repeat `categories` / `ingredients` (or use `categories[]`).
#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct RecipeInputDoc {
    pub image: Option<String>,
    pub title: Option<String>,
    /// A single string or a list
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<String>,
    pub cuisine: Option<String>,
    /// Numeric or numeric string
    pub prepTime: Option<String>,
    /// A single string or a list
    pub categories: Option<Vec<String>>,
    /// Defaults to 0
    pub likeCount: Option<String>,
    pub userId: Option<String>,
}

#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct RecipeDoc {
    pub _id: String,
    pub image: Option<String>,
    pub title: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Option<String>,
    pub cuisine: Option<String>,
    pub prepTime: Option<f64>,
    pub categories: Vec<String>,
    pub likeCount: i64,
    /// RFC 3339
    pub createdAt: Option<String>,
    pub userId: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::pages::landing,
        crate::routes::health::health,
        crate::routes::recipes::add_recipe,
        crate::routes::recipes::get_recipes,
        crate::routes::recipes::get_recipe,
        crate::routes::recipes::like_recipe,
        crate::routes::recipes::update_recipe,
        crate::routes::recipes::delete_recipe,
    ),
    components(
        schemas(
            HealthDoc,
            ErrorDoc,
            DeleteResultDoc,
            RecipeInputDoc,
            RecipeDoc,
        )
    ),
    tags(
        (name = "pages"),
        (name = "health"),
        (name = "recipes")
    )
)]
pub struct ApiDoc;
