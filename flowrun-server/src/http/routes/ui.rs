//! Static file serving for the built UI
//!
//! Unknown paths fall back to `index.html` so client-side routes load the app.

use std::path::Path;

use tower_http::services::{ServeDir, ServeFile};

/// Service serving `dir`, with `dir/index.html` as fallback
pub fn service(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")))
}
