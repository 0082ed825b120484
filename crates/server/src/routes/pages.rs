pub const WELCOME: &str = "Welcome to the Recipe Book API!";

#[utoipa::path(get, path = "/", tag = "pages", responses((status = 200, description = "Welcome text", body = String)))]
pub async fn landing() -> &'static str {
    WELCOME
}
