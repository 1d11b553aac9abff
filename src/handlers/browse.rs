//! Read-only browser over the storage root, mounted under `/files`.
//!
//! Directories render as an HTML index; files are handed to
//! [`ServeFile`], which infers the content type from the extension and
//! handles range and conditional requests. Paths that would climb out of
//! the root are answered with 404.

use std::fmt::Write;
use std::path::Path;

use axum::{
    body::Body,
    extract::{Path as UrlPath, Request, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use tokio::fs;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::http::response::ApiError;
use crate::http::server::AppState;

/// `/files` and `/files/`.
pub async fn browse_root(State(state): State<AppState>, request: Request) -> Response {
    serve(&state, "", request).await
}

/// `/files/{*path}`.
pub async fn browse_path(
    State(state): State<AppState>,
    UrlPath(path): UrlPath<String>,
    request: Request,
) -> Response {
    serve(&state, &path, request).await
}

async fn serve(state: &AppState, relative: &str, request: Request) -> Response {
    match try_serve(state, relative, request).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn try_serve(state: &AppState, relative: &str, request: Request) -> Result<Response, ApiError> {
    let fs_path = state.storage.resolve(relative).ok_or_else(|| {
        tracing::warn!(path = %relative, "Rejected path outside storage root");
        ApiError::NotFound
    })?;

    let metadata = fs::metadata(&fs_path).await?;

    if metadata.is_dir() {
        let url_path = request.uri().path();
        if !url_path.ends_with('/') {
            return Ok(Redirect::permanent(&format!("{}/", url_path)).into_response());
        }
        let listing = render_listing(url_path, &fs_path).await?;
        return Ok(Html(listing).into_response());
    }

    match ServeFile::new(&fs_path).oneshot(request).await {
        Ok(response) => Ok(response.map(Body::new)),
        Err(never) => match never {},
    }
}

struct Entry {
    name: String,
    is_dir: bool,
    size: u64,
    modified: Option<DateTime<Utc>>,
}

async fn read_entries(dir: &Path) -> std::io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        let metadata = entry.metadata().await?;
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: metadata.is_dir(),
            size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

async fn render_listing(url_path: &str, dir: &Path) -> Result<String, ApiError> {
    let entries = read_entries(dir)
        .await
        .map_err(|e| ApiError::internal("Error reading directory", e))?;

    let title = escape_html(url_path);
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"UTF-8\"><title>Index of {title}</title></head>\n<body>\n<h1>Index of {title}</h1>\n<pre>\n"
    );
    for entry in &entries {
        let suffix = if entry.is_dir { "/" } else { "" };
        let modified = entry
            .modified
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        let size = if entry.is_dir {
            "-".to_string()
        } else {
            entry.size.to_string()
        };
        let _ = writeln!(
            html,
            "<a href=\"{href}{suffix}\">{name}{suffix}</a>  {modified}  {size}",
            href = encode_href(&entry.name),
            name = escape_html(&entry.name),
        );
    }
    html.push_str("</pre>\n</body>\n</html>\n");
    Ok(html)
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode one path segment for use as a relative link.
fn encode_href(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                let _ = write!(out, "%{:02X}", byte);
            }
        }
    }
    out
}
