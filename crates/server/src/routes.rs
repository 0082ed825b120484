use std::path::Path;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeFile,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod health;
pub mod pages;
pub mod recipes;

/// Build the full application router: pages, health/metrics, recipe CRUD, API docs.
pub fn build_router(state: ServerState, cors: CorsLayer, public_dir: &str) -> Router {
    let form_page = ServeFile::new(Path::new(public_dir).join("form.html"));

    // Static pages + health
    let public = Router::new()
        .route("/", get(pages::landing))
        .route_service("/add", form_page)
        .route("/health", get(health::health))
        .route("/metrics", get(health::metrics));

    // Recipe CRUD
    let recipe_routes = Router::new()
        .route("/add-recipe", post(recipes::add_recipe))
        .route("/get-recipes", get(recipes::get_recipes))
        .route("/get-recipe/:id", get(recipes::get_recipe))
        .route("/recipes/:id/like", patch(recipes::like_recipe))
        .route("/update-recipe/:id", put(recipes::update_recipe))
        .route("/delete-recipe/:id", delete(recipes::delete_recipe));

    let docs = SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    // Compose
    public
        .merge(recipe_routes)
        .merge(docs)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
