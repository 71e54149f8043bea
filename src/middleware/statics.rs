//! Static file serving.
//!
//! [`ServeDir`] answers `GET`/`HEAD` requests whose path names a file under
//! its root directory. Directories resolve to their `index.html`. Anything it
//! cannot serve (other methods, missing files, unreadable entries) falls
//! through to the next layer untouched, so register it before the routes it
//! may shadow.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::handler::BoxFuture;
use crate::middleware::{Middleware, Next};
use crate::request::Request;
use crate::response::{ContentType, Response};

/// Serves files from a directory.
#[derive(Clone, Debug)]
pub struct ServeDir {
    root: PathBuf,
}

impl ServeDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps a request path onto the filesystem. Returns `None` for any path
    /// that could escape the root.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let mut full = self.root.clone();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if matches!(segment, "." | "..") || segment.contains(['\\', '\0', ':']) {
                return None;
            }
            full.push(segment);
        }
        Some(full)
    }
}

impl Middleware for ServeDir {
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        let readable = matches!(*req.method(), http::Method::GET | http::Method::HEAD);
        let target = if readable { self.resolve(req.path()) } else { None };

        Box::pin(async move {
            if let Some(path) = target {
                if let Some(res) = read_file(&path).await {
                    return res;
                }
            }
            next.run(req).await
        })
    }
}

async fn read_file(path: &Path) -> Option<Response> {
    let meta = tokio::fs::metadata(path).await.ok()?;
    let file = if meta.is_dir() { path.join("index.html") } else { path.to_owned() };

    let bytes = match tokio::fs::read(&file).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            debug!(path = %file.display(), "static file unreadable: {e}");
            return None;
        }
    };

    let content_type = file.extension()
        .and_then(|ext| ext.to_str())
        .map_or(ContentType::OctetStream, ContentType::from_extension);

    Some(Response::builder().bytes(content_type, bytes))
}
