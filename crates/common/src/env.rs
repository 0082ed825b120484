//! Environment/runtime helpers
//!
//! Sanity checks run once at startup.

use std::path::Path;

use tracing::warn;

/// Warn when the static page directory is missing; `/add` will answer 404 in that case.
/// Returns whether the add-form page is present.
pub async fn ensure_env(public_dir: &str) -> bool {
    if tokio::fs::metadata(public_dir).await.is_err() {
        warn!(%public_dir, "public assets directory not found; /add will 404");
        return false;
    }
    let form = Path::new(public_dir).join("form.html");
    if tokio::fs::metadata(&form).await.is_err() {
        warn!(form = %form.display(), "form.html not found; /add will 404");
        return false;
    }
    true
}
