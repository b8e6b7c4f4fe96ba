//! MinIO/S3-compatible image store
//!
//! Uploads category images into a publicly readable prefix of one bucket and
//! hands back the canonical public URL of each object.
//!
//! Uses rust-s3 crate for lightweight S3 operations.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client, Url};
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::config::MinIOConfig;
use crate::core::error::{AppError, Result};
use crate::modules::storage::image_source::{
    ensure_acceptable, ensure_allowed_type, ensure_within_limit, extension_for, ImageSource,
};
use crate::modules::storage::remote_host::{ensure_public_host, is_literal_non_public};
use crate::modules::storage::sigv4::Signer;
use crate::modules::storage::ImageStore;

const MAX_IMAGE_REDIRECTS: usize = 5;

/// MinIO/S3-compatible storage client
pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
    public_prefix: String,
    /// Signs the bucket policy request
    signer: Signer,
    /// HTTP client for bucket policy operations and remote image sources
    http_client: Client,
    /// Skip the public-address check on remote image sources
    allow_private_hosts: bool,
}

impl MinIOClient {
    /// Create a new MinIO client from configuration
    ///
    /// No network calls are made; call [`MinIOClient::prepare`] once at start-up.
    pub fn new(config: MinIOConfig) -> Result<Self> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create MinIO bucket: {}", e)))?;

        // Use path-style URLs for MinIO (http://endpoint/bucket instead of http://bucket.endpoint)
        bucket.set_path_style();

        let allow_private_hosts = config.allow_private_image_hosts;
        let redirect_policy = Policy::custom(move |attempt| {
            if attempt.previous().len() >= MAX_IMAGE_REDIRECTS {
                attempt.error("too many redirects")
            } else if !allow_private_hosts && is_literal_non_public(attempt.url()) {
                attempt.stop()
            } else {
                attempt.follow()
            }
        });

        let http_client = Client::builder()
            .timeout(config.image_fetch_timeout)
            .redirect(redirect_policy)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            public_endpoint: config.public_endpoint.trim_end_matches('/').to_string(),
            public_prefix: config.public_prefix.trim_matches('/').to_string(),
            signer: Signer::new(&config.access_key, &config.secret_key, &config.region),
            http_client,
            allow_private_hosts,
        })
    }

    /// Ensure the bucket exists and images under the public prefix are readable
    pub async fn prepare(&self) -> Result<()> {
        self.ensure_bucket_exists().await?;
        self.set_public_read_policy().await?;

        info!(
            "MinIO image store ready: endpoint={}, bucket={}, public_prefix={}",
            self.endpoint,
            self.bucket.name(),
            self.public_prefix
        );
        Ok(())
    }

    /// Create the bucket unless the server already has it
    ///
    /// Any other creation failure is only logged: the credentials may lack
    /// `CreateBucket` on a bucket provisioned out of band.
    async fn ensure_bucket_exists(&self) -> Result<()> {
        let name = self.bucket.name();
        let created = Bucket::create_with_path_style(
            &name,
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match created {
            Ok(_) => info!("Created bucket '{}'", name),
            Err(e) if is_existing_bucket_error(&e.to_string()) => {
                debug!("Bucket '{}' already present", name)
            }
            Err(e) => warn!("Bucket '{}' not created ({}); continuing with it as is", name, e),
        }
        Ok(())
    }

    /// Allow anonymous `GetObject` below the public prefix
    ///
    /// A rejected policy is logged with the `mc` command that applies it by hand.
    async fn set_public_read_policy(&self) -> Result<()> {
        let bucket_name = self.bucket.name();
        let policy = public_read_policy(&bucket_name, &self.public_prefix);

        if let Err(e) = self.put_bucket_policy(&bucket_name, &policy).await {
            warn!(
                "Bucket policy for '{}' not applied: {}. Run: mc anonymous set download minio/{}/{}",
                bucket_name, e, bucket_name, self.public_prefix
            );
            return Ok(());
        }

        info!("Public read enabled for {}/{}/*", bucket_name, self.public_prefix);
        Ok(())
    }

    /// PUT the bucket policy; rust-s3 has no call for it, so the request is signed by hand
    async fn put_bucket_policy(&self, bucket_name: &str, policy: &str) -> Result<()> {
        let endpoint_url = Url::parse(&self.endpoint)
            .map_err(|e| AppError::Internal(format!("Invalid endpoint URL: {}", e)))?;
        let host = match (endpoint_url.host_str(), endpoint_url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(AppError::Internal("Endpoint URL has no host".to_string())),
        };

        let path = format!("/{}", bucket_name);
        let signed = self.signer.sign(
            "PUT",
            &host,
            &path,
            "policy=",
            policy.as_bytes(),
            Utc::now(),
        )?;

        let response = self
            .http_client
            .put(format!("{}{}?policy", self.endpoint, path))
            .header("Host", &host)
            .header("x-amz-date", &signed.amz_date)
            .header("x-amz-content-sha256", &signed.payload_hash)
            .header("Authorization", &signed.authorization)
            .header(CONTENT_TYPE, "application/json")
            .body(policy.to_string())
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to send policy request: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::Storage(format!(
            "Failed to set bucket policy: {} - {}",
            status, body
        )))
    }

    /// Object key for a new image: `{public_prefix}/{folder}/{id}.{ext}`
    pub fn generate_key(&self, folder: &str, content_type: &str) -> String {
        format!(
            "{}/{}/{}.{}",
            self.public_prefix,
            folder.trim_matches('/'),
            Uuid::new_v4(),
            extension_for(content_type)
        )
    }

    /// Canonical public URL of an object
    pub fn get_public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_endpoint, self.bucket.name(), key)
    }

    /// Extract the object key from a URL produced by this store
    pub fn extract_key_from_url(&self, url: &str) -> Option<String> {
        [&self.public_endpoint, &self.endpoint]
            .iter()
            .map(|endpoint| format!("{}/{}/", endpoint, self.bucket.name()))
            .find_map(|prefix| url.strip_prefix(prefix.as_str()).map(str::to_string))
            .filter(|key| !key.is_empty())
    }

    /// Download a remote image source
    ///
    /// The size cap is enforced from `Content-Length` and again while
    /// reading, so an oversized body is never buffered whole.
    async fn fetch_remote(&self, url: &str) -> Result<(String, Vec<u8>)> {
        let parsed = Url::parse(url)
            .map_err(|e| AppError::Storage(format!("Invalid image URL '{}': {}", url, e)))?;
        if !self.allow_private_hosts {
            ensure_public_host(&parsed).await?;
        }

        let mut response = self
            .http_client
            .get(parsed)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to fetch image '{}': {}", url, e)))?;

        if !response.status().is_success() {
            return Err(AppError::Storage(format!(
                "Failed to fetch image '{}': HTTP {}",
                url,
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();
        ensure_allowed_type(&content_type)?;

        if let Some(declared) = response.content_length() {
            ensure_within_limit(usize::try_from(declared).unwrap_or(usize::MAX))?;
        }

        let mut data = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to read image '{}': {}", url, e)))?
        {
            ensure_within_limit(data.len() + chunk.len())?;
            data.extend_from_slice(&chunk);
        }

        ensure_acceptable(&content_type, data.len())?;
        Ok((content_type, data))
    }

    /// Store raw bytes under `key`
    async fn put_object(&self, key: &str, data: &[u8], content_type: &str) -> Result<()> {
        let response = self
            .bucket
            .put_object_with_content_type(key, data, content_type)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload image '{}': {}", key, e)))?;

        if !(200..300).contains(&response.status_code()) {
            return Err(AppError::Storage(format!(
                "Failed to upload image '{}': HTTP {}",
                key,
                response.status_code()
            )));
        }

        debug!("Uploaded image '{}' to bucket '{}'", key, self.bucket.name());
        Ok(())
    }
}

#[async_trait]
impl ImageStore for MinIOClient {
    async fn upload(&self, source: &str, folder: &str) -> Result<String> {
        let (content_type, data) = match ImageSource::parse(source)? {
            ImageSource::Inline { content_type, data } => (content_type, data),
            ImageSource::Remote(url) => self.fetch_remote(&url).await?,
        };

        let key = self.generate_key(folder, &content_type);
        self.put_object(&key, &data, &content_type).await?;

        let url = self.get_public_url(&key);
        info!("Image stored: key={}, size={}", key, data.len());
        Ok(url)
    }

    async fn remove(&self, url: &str) -> Result<()> {
        let key = self
            .extract_key_from_url(url)
            .ok_or_else(|| AppError::Storage(format!("URL '{}' is not served by this store", url)))?;

        let response = self
            .bucket
            .delete_object(&key)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete image '{}': {}", key, e)))?;

        if !(200..300).contains(&response.status_code()) {
            return Err(AppError::Storage(format!(
                "Failed to delete image '{}': HTTP {}",
                key,
                response.status_code()
            )));
        }

        debug!("Deleted image '{}' from bucket '{}'", key, self.bucket.name());
        Ok(())
    }
}

fn is_existing_bucket_error(error: &str) -> bool {
    ["BucketAlreadyOwnedByYou", "BucketAlreadyExists", "already own it"]
        .iter()
        .any(|marker| error.contains(marker))
}

fn public_read_policy(bucket: &str, prefix: &str) -> String {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "AWS": "*" },
            "Action": ["s3:GetObject"],
            "Resource": [format!("arn:aws:s3:::{}/{}/*", bucket, prefix)]
        }]
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::image_source::MAX_IMAGE_SIZE;
    use axum::{routing::get, Router};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve `body` as `image/png` with a `Content-Length` header
    async fn serve_image(body: Vec<u8>) -> String {
        let app = Router::new().route(
            "/hat.png",
            get(move || {
                let body = body.clone();
                async move { ([("content-type", "image/png")], body) }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{}/hat.png", addr)
    }

    /// Serve `chunks` chunks of 1 MiB with chunked encoding and no length
    async fn serve_chunked_image(chunks: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 2048];
            let _ = socket.read(&mut request).await;

            let head = "HTTP/1.1 200 OK\r\ncontent-type: image/png\r\n\
                        transfer-encoding: chunked\r\nconnection: close\r\n\r\n";
            if socket.write_all(head.as_bytes()).await.is_err() {
                return;
            }
            let chunk = vec![0u8; 1024 * 1024];
            for _ in 0..chunks {
                let size = format!("{:x}\r\n", chunk.len());
                let framed: Vec<u8> =
                    [size.as_bytes(), chunk.as_slice(), b"\r\n".as_slice()].concat();
                // The client hangs up once the cap is exceeded
                if socket.write_all(&framed).await.is_err() {
                    return;
                }
            }
            let _ = socket.write_all(b"0\r\n\r\n").await;
        });
        format!("http://{}/hat.png", addr)
    }

    fn client() -> MinIOClient {
        client_with(false)
    }

    fn client_with(allow_private_image_hosts: bool) -> MinIOClient {
        MinIOClient::new(MinIOConfig {
            endpoint: "http://minio:9000".to_string(),
            public_endpoint: "https://img.lipci.bg/".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            bucket: "lipci-images".to_string(),
            region: "us-east-1".to_string(),
            public_prefix: "public".to_string(),
            image_fetch_timeout: Duration::from_secs(5),
            allow_private_image_hosts,
        })
        .unwrap()
    }

    #[test]
    fn test_generate_key_uses_prefix_folder_and_extension() {
        let key = client().generate_key("LIPCI/categories", "image/png");

        assert!(key.starts_with("public/LIPCI/categories/"));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn test_public_url_round_trips_to_key() {
        let client = client();
        let key = "public/LIPCI/categories/abc.jpg";
        let url = client.get_public_url(key);

        assert_eq!(
            url,
            "https://img.lipci.bg/lipci-images/public/LIPCI/categories/abc.jpg"
        );
        assert_eq!(client.extract_key_from_url(&url).as_deref(), Some(key));
    }

    #[test]
    fn test_extract_key_accepts_internal_endpoint() {
        let key = client().extract_key_from_url("http://minio:9000/lipci-images/public/x.webp");
        assert_eq!(key.as_deref(), Some("public/x.webp"));
    }

    #[test]
    fn test_extract_key_rejects_foreign_urls() {
        let client = client();
        assert_eq!(
            client.extract_key_from_url("https://cdn.example.com/lipci-images/x.png"),
            None
        );
        assert_eq!(
            client.extract_key_from_url("https://img.lipci.bg/lipci-images/"),
            None
        );
    }

    #[test]
    fn test_policy_grants_read_on_public_prefix_only() {
        let policy: serde_json::Value =
            serde_json::from_str(&public_read_policy("lipci-images", "public")).unwrap();
        let statement = &policy["Statement"][0];

        assert_eq!(statement["Action"][0], "s3:GetObject");
        assert_eq!(
            statement["Resource"][0],
            "arn:aws:s3:::lipci-images/public/*"
        );
    }

    #[test]
    fn test_existing_bucket_errors_are_recognised() {
        assert!(is_existing_bucket_error(
            "S3 error: <Code>BucketAlreadyOwnedByYou</Code>"
        ));
        assert!(!is_existing_bucket_error("AccessDenied"));
    }

    #[tokio::test]
    async fn test_fetch_remote_reads_small_image() {
        let url = serve_image(b"\x89PNG tiny".to_vec()).await;

        let (content_type, data) = client_with(true).fetch_remote(&url).await.unwrap();

        assert_eq!(content_type, "image/png");
        assert_eq!(data, b"\x89PNG tiny");
    }

    #[tokio::test]
    async fn test_fetch_remote_rejects_declared_oversize() {
        let url = serve_image(vec![0u8; MAX_IMAGE_SIZE + 1]).await;

        let err = client_with(true).fetch_remote(&url).await.unwrap_err();

        assert!(matches!(err, AppError::Storage(ref msg) if msg.contains("too large")));
    }

    #[tokio::test]
    async fn test_fetch_remote_stops_reading_undeclared_oversize() {
        let url = serve_chunked_image(MAX_IMAGE_SIZE / (1024 * 1024) + 2).await;

        let err = client_with(true).fetch_remote(&url).await.unwrap_err();

        assert!(matches!(err, AppError::Storage(ref msg) if msg.contains("too large")));
    }

    #[tokio::test]
    async fn test_fetch_remote_refuses_private_hosts_by_default() {
        let url = serve_image(b"\x89PNG tiny".to_vec()).await;

        let err = client().fetch_remote(&url).await.unwrap_err();

        assert!(matches!(err, AppError::Storage(ref msg) if msg.contains("non-public")));
    }
}
