//! Media gateway
//!
//! Poster images are uploaded as a multipart form with a single `file` part;
//! the server answers with the URL the image is served from.

use std::path::Path;

use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::info;

use super::{HttpClient, ImageUploader};
use crate::models::UploadedImage;

const IMAGES_PATH: &str = "/api/media/images";

/// Content type for a poster file name, if it is an accepted image type
pub fn image_mime(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Image upload gateway
#[derive(Debug, Clone)]
pub struct MediaGateway {
    http: HttpClient,
}

impl MediaGateway {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ImageUploader for MediaGateway {
    async fn upload_image(&self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        let Some(mime) = image_mime(file_name) else {
            bail!("unsupported image type: {}", file_name);
        };

        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = Form::new().part("file", part);

        let uploaded: UploadedImage = self.http.post_multipart(IMAGES_PATH, form).await?;
        info!(file_name, size, url = %uploaded.url, "uploaded poster");
        Ok(uploaded.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_mime() {
        assert_eq!(image_mime("poster.png"), Some("image/png"));
        assert_eq!(image_mime("poster.JPG"), Some("image/jpeg"));
        assert_eq!(image_mime("dir/poster.jpeg"), Some("image/jpeg"));
        assert_eq!(image_mime("poster.webp"), Some("image/webp"));
        assert_eq!(image_mime("poster.gif"), None);
        assert_eq!(image_mime("poster"), None);
    }
}
