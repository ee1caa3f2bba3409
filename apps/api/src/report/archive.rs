// Long-term storage for rendered PDFs.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tracing::info;

use crate::errors::AppError;

#[async_trait]
pub trait ReportArchive: Send + Sync {
    /// Stores `bytes` under `key`. Failures surface as `AppError::Storage`.
    async fn store_pdf(&self, key: &str, bytes: Vec<u8>) -> Result<(), AppError>;
}

pub struct S3Archive {
    client: S3Client,
    bucket: String,
}

impl S3Archive {
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ReportArchive for S3Archive {
    async fn store_pdf(&self, key: &str, bytes: Vec<u8>) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type("application/pdf")
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded report to s3://{}/{}", self.bucket, key);
        Ok(())
    }
}
