//! Thumbnail storage: the [`ObjectStore`] seam and its Supabase Storage
//! implementation.

use async_trait::async_trait;
use reqwest::Method;

use crate::error::BackendError;
use crate::http::RestClient;

/// Write-once object storage with public URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload `bytes` under `name`. Fails if the name already exists.
    async fn upload(
        &self,
        name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), BackendError>;

    /// Publicly reachable URL of the object stored under `name`.
    fn public_url(&self, name: &str) -> String;
}

/// Public URL of `name` in `bucket` for a project at `base_url`.
pub fn public_object_url(base_url: &str, bucket: &str, name: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{bucket}/{name}",
        base_url.trim_end_matches('/')
    )
}

/// [`ObjectStore`] over one public Supabase Storage bucket.
pub struct SupabaseStorage {
    rest: RestClient,
    bucket: String,
}

impl SupabaseStorage {
    pub(crate) fn new(rest: RestClient, bucket: &str) -> Self {
        Self {
            rest,
            bucket: bucket.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for SupabaseStorage {
    async fn upload(
        &self,
        name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), BackendError> {
        let path = format!("/storage/v1/object/{}/{name}", self.bucket);
        let size = bytes.len();
        let response = self
            .rest
            .request(Method::POST, &path, None)
            .header("Content-Type", content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        RestClient::ensure_success(response).await?;

        tracing::debug!(bucket = %self.bucket, name, size, "Thumbnail uploaded");
        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        public_object_url(self.rest.base_url(), &self.bucket, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_layout() {
        assert_eq!(
            public_object_url("https://abc.supabase.co", "thumbnails", "1234.png"),
            "https://abc.supabase.co/storage/v1/object/public/thumbnails/1234.png"
        );
    }

    #[test]
    fn public_url_tolerates_trailing_slash() {
        assert_eq!(
            public_object_url("http://localhost:54321/", "thumbs", "x.webp"),
            "http://localhost:54321/storage/v1/object/public/thumbs/x.webp"
        );
    }
}
