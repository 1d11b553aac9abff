//! Multipart upload handler.
//!
//! The first part named `file` that carries a filename is streamed to
//! `<root>/<UTC date>/<filename>`. An existing file of that name is
//! truncated and replaced. A write that fails midway removes the partial
//! file before answering 500.

use std::io;
use std::path::Path;

use axum::extract::{
    multipart::{Field, MultipartRejection},
    Multipart, State,
};
use chrono::Utc;
use tokio::{fs, io::AsyncWriteExt};

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::storage::validate_file_name;

/// Name of the multipart part holding the file.
pub const FILE_FIELD: &str = "file";

const NO_FILE: &str = "No file uploaded";

pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Upload is not a multipart form");
        ApiError::BadRequest(NO_FILE)
    })?;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(ApiError::BadRequest(NO_FILE)),
            Err(e) => {
                tracing::debug!(error = %e, "Malformed multipart body");
                return Err(ApiError::BadRequest(NO_FILE));
            }
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // a part without a filename is a plain form value, not a file
        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };

        return store(&state, &file_name, field).await;
    }
}

async fn store(state: &AppState, file_name: &str, field: Field<'_>) -> Result<String, ApiError> {
    let file_name = validate_file_name(file_name).map_err(|e| {
        tracing::warn!(error = %e, "Rejected upload");
        ApiError::BadRequest("Invalid file name")
    })?;

    let dir = state.storage.upload_dir(Utc::now().date_naive());
    fs::create_dir_all(&dir)
        .await
        .map_err(|e| ApiError::internal("Error creating upload directory", e))?;

    let dst_path = dir.join(file_name);
    let written = match write_field(field, &dst_path).await {
        Ok(written) => written,
        Err(WriteError::Create(e)) => {
            return Err(ApiError::internal("Error creating destination file", e));
        }
        Err(WriteError::Copy(e)) => {
            if let Err(remove_err) = fs::remove_file(&dst_path).await {
                tracing::warn!(path = %dst_path.display(), error = %remove_err, "Could not remove partial upload");
            }
            return Err(ApiError::internal("Error saving file", e));
        }
    };

    metrics::record_upload(written);
    tracing::info!(path = %dst_path.display(), bytes = written, "File saved");
    Ok(format!("File uploaded to: {}\n", dst_path.display()))
}

enum WriteError {
    Create(io::Error),
    Copy(io::Error),
}

async fn write_field(mut field: Field<'_>, path: &Path) -> Result<u64, WriteError> {
    let mut file = fs::File::create(path).await.map_err(WriteError::Create)?;

    let mut written = 0u64;
    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => return Err(WriteError::Copy(io::Error::other(e))),
        };
        file.write_all(&chunk).await.map_err(WriteError::Copy)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(WriteError::Copy)?;

    Ok(written)
}
