//! Image upload handler
//!
//! Multipart POST with a `file` field (the bytes) and an `img` field
//! (the stored filename). The file lands in the images directory under
//! the client-supplied name, overwriting any previous upload with the
//! same name. Names must be a bare file name; anything that could step
//! out of the images directory is rejected.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::config::AppState;
use crate::error::{Error, Result};

/// POST /api/upload
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<&'static str>> {
    let mut name: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::BadRequest(e.to_string()))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "img" => {
                name = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| Error::BadRequest(e.to_string()))?,
                );
            }
            "file" => {
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| Error::BadRequest(e.to_string()))?,
                );
            }
            _ => {}
        }
    }

    let name = name.ok_or_else(|| Error::BadRequest("missing `img` form field".to_string()))?;
    let data = data.ok_or_else(|| Error::BadRequest("missing `file` form field".to_string()))?;
    let name = validate_image_name(&name)?;

    let path = state.config.images_dir.join(name);
    tokio::fs::write(&path, &data).await?;

    info!("Stored image {:?} ({} bytes)", path, data.len());
    Ok(Json("Image has been uploaded successfully!"))
}

/// Accept only a bare file name as the stored name. Extensions and
/// collisions are the client's business; path traversal is not.
fn validate_image_name(name: &str) -> Result<&str> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
    {
        return Err(Error::InvalidImageName(name.to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass() {
        assert!(validate_image_name("photo.png").is_ok());
        assert!(validate_image_name("2026-08-05-cover.jpg").is_ok());
        assert!(validate_image_name("no-extension").is_ok());
    }

    #[test]
    fn traversal_and_empty_names_fail() {
        assert!(validate_image_name("").is_err());
        assert!(validate_image_name(".").is_err());
        assert!(validate_image_name("..").is_err());
        assert!(validate_image_name("../escape.png").is_err());
        assert!(validate_image_name("a/b.png").is_err());
        assert!(validate_image_name("a\\b.png").is_err());
    }
}
