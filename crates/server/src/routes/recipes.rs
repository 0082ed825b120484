use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::types::DeleteResult;
use models::RecipeView;
use tracing::{error, info};

use crate::errors::JsonApiError;
use crate::extract::RecipeBody;
use crate::metrics;
use crate::state::ServerState;

pub const CREATED_MESSAGE: &str = "Recipe successfully added!";
pub const CREATE_FAILED_MESSAGE: &str = "Failed to add recipe";
pub const DELETED_MESSAGE: &str = "Recipe deleted successfully";

/// 记录指标后原样返回结果
fn observe<T>(operation: &str, result: Result<T, JsonApiError>) -> Result<T, JsonApiError> {
    metrics::record(operation, result.is_ok());
    result
}

/// Create a recipe from a form post or JSON body.
#[utoipa::path(
    post,
    path = "/add-recipe",
    tag = "recipes",
    request_body = crate::openapi::RecipeInputDoc,
    responses(
        (status = 201, description = "Created", body = String),
        (status = 500, description = "Insert failed or store unavailable", body = String)
    )
)]
pub async fn add_recipe(State(state): State<ServerState>, RecipeBody(fields): RecipeBody) -> Response {
    match state.recipes.create(&fields).await {
        Ok(recipe) => {
            metrics::record("create", true);
            info!(recipe_id = %recipe.id, "recipe created");
            (StatusCode::CREATED, CREATED_MESSAGE).into_response()
        }
        Err(e) => {
            metrics::record("create", false);
            error!(error = %e, "error inserting recipe");
            (StatusCode::INTERNAL_SERVER_ERROR, CREATE_FAILED_MESSAGE).into_response()
        }
    }
}

/// Every recipe, unfiltered.
#[utoipa::path(
    get,
    path = "/get-recipes",
    tag = "recipes",
    responses(
        (status = 200, description = "All recipes", body = [crate::openapi::RecipeDoc]),
        (status = 500, description = "Query failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_recipes(State(state): State<ServerState>) -> Result<Json<Vec<RecipeView>>, JsonApiError> {
    let result = state
        .recipes
        .list()
        .await
        .map(|items| Json(items.into_iter().map(RecipeView::from).collect()))
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch recipes"));
    observe("list", result)
}

#[utoipa::path(
    get,
    path = "/get-recipe/{id}",
    tag = "recipes",
    params(("id" = String, Path, description = "Recipe ObjectId (24 hex chars)")),
    responses(
        (status = 200, description = "Recipe", body = crate::openapi::RecipeDoc),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_recipe(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeView>, JsonApiError> {
    let result = state
        .recipes
        .get(&id)
        .await
        .map(|r| Json(RecipeView::from(r)))
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch recipe"));
    observe("get", result)
}

/// Atomically add one like.
#[utoipa::path(
    patch,
    path = "/recipes/{id}/like",
    tag = "recipes",
    params(("id" = String, Path, description = "Recipe ObjectId (24 hex chars)")),
    responses(
        (status = 200, description = "Recipe after the increment", body = crate::openapi::RecipeDoc),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn like_recipe(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeView>, JsonApiError> {
    let result = state
        .recipes
        .like(&id)
        .await
        .map(|r| Json(RecipeView::from(r)))
        .map_err(|e| JsonApiError::from_service(e, "Failed to like recipe"));
    observe("like", result)
}

/// Partial update of the supplied fields.
#[utoipa::path(
    put,
    path = "/update-recipe/{id}",
    tag = "recipes",
    params(("id" = String, Path, description = "Recipe ObjectId (24 hex chars)")),
    request_body = crate::openapi::RecipeInputDoc,
    responses(
        (status = 200, description = "Recipe after the update", body = crate::openapi::RecipeDoc),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update_recipe(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    RecipeBody(fields): RecipeBody,
) -> Result<Json<RecipeView>, JsonApiError> {
    let result = state
        .recipes
        .update(&id, &fields)
        .await
        .map(|r| Json(RecipeView::from(r)))
        .map_err(|e| JsonApiError::from_service(e, "Failed to update recipe"));
    observe("update", result)
}

#[utoipa::path(
    delete,
    path = "/delete-recipe/{id}",
    tag = "recipes",
    params(("id" = String, Path, description = "Recipe ObjectId (24 hex chars)")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::DeleteResultDoc),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete_recipe(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, JsonApiError> {
    let result = state
        .recipes
        .delete(&id)
        .await
        .map(|deleted_count| {
            Json(DeleteResult { message: DELETED_MESSAGE.into(), deleted_count })
        })
        .map_err(|e| JsonApiError::from_service(e, "Failed to delete recipe"));
    observe("delete", result)
}
