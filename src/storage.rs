use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

use crate::config::StorageConfig;

/// Location of an uploaded file on the remote host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    pub url: String,
    /// Needed to delete the file later.
    pub public_id: String,
}

/// Remote host for project images.
#[async_trait]
pub trait AssetHost: Send + Sync {
    async fn upload(&self, file_name: &str, body: Bytes) -> anyhow::Result<UploadedAsset>;
    /// `Ok(false)` when the host refused to delete the file.
    async fn delete(&self, public_id: &str) -> anyhow::Result<bool>;
}

/// S3-compatible object storage (AWS, MinIO).
#[derive(Clone)]
pub struct ObjectStorage {
    client: Client,
    bucket: String,
    public_url: String,
}

impl ObjectStorage {
    pub async fn new(cfg: &StorageConfig) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(Credentials::new(
                &cfg.access_key,
                &cfg.secret_key,
                None,
                None,
                "static",
            ))
            .endpoint_url(&cfg.endpoint)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(&cfg.endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            bucket: cfg.bucket.clone(),
            public_url: cfg.public_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AssetHost for ObjectStorage {
    async fn upload(&self, file_name: &str, body: Bytes) -> anyhow::Result<UploadedAsset> {
        let ext = extension_of(file_name).unwrap_or_else(|| "bin".into());
        let key = object_key(&ext);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type(mime_from_ext(&ext))
            .send()
            .await
            .with_context(|| format!("s3 put_object {}", key))?;
        debug!(key = %key, file_name, "asset uploaded");

        Ok(UploadedAsset {
            url: format!("{}/{}", self.public_url, key),
            public_id: key,
        })
    }

    async fn delete(&self, public_id: &str) -> anyhow::Result<bool> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(public_id)
            .send()
            .await
            .with_context(|| format!("s3 delete_object {}", public_id))?;
        debug!(key = %public_id, "asset deleted");
        Ok(true)
    }
}

/// Lowercased extension without the dot.
pub fn extension_of(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn object_key(ext: &str) -> String {
    format!("projects/{}.{}", Uuid::new_v4(), ext)
}

fn mime_from_ext(ext: &str) -> &'static str {
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}
