//! Storage locations parsed from URLs (S3, GCS, Azure, local)

use crate::config::AwsCredentials;
use crate::error::{Error, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectMeta, ObjectStore};
use std::sync::Arc;
use tracing::debug;

/// Whether a location is opened for reading or writing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Local directories must already exist
    Read,
    /// Local directories are created on demand
    Write,
}

/// An object store plus a key prefix inside it
#[derive(Debug, Clone)]
pub struct StorageLocation {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket/container
    prefix: ObjectPath,
    /// URL scheme for logging
    scheme: String,
    /// Display form of the store root, e.g. `s3://bucket` or a local directory
    root: String,
}

impl StorageLocation {
    /// Parse a location URL and create the matching object store
    ///
    /// Supported formats:
    /// - `s3://bucket/path/`, `s3a://...`, `s3n://...` - AWS S3
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `az://container/path/` - Azure Blob Storage
    /// - `file:///local/path/`, `/local/path/` or `./path/` - Local filesystem
    ///
    /// S3 uses `credentials` when given and the standard AWS environment
    /// variables otherwise.
    pub fn parse(url: &str, credentials: Option<&AwsCredentials>, access: Access) -> Result<Self> {
        match url.split_once("://") {
            Some((scheme @ ("s3" | "s3a" | "s3n"), rest)) => {
                Self::parse_s3(url, scheme, rest, credentials)
            }
            Some(("gs", rest)) => Self::parse_gcs(url, rest),
            Some(("az", rest)) => Self::parse_azure(url, rest),
            Some(("file", rest)) => Self::parse_local(rest, access),
            Some((scheme, _)) => Err(Error::location(
                url,
                format!("unsupported scheme '{scheme}'"),
            )),
            None => Self::parse_local(url, access),
        }
    }

    /// Wrap an existing store, mainly for tests
    pub fn new(store: Arc<dyn ObjectStore>, prefix: &str, scheme: &str) -> Self {
        Self {
            store,
            prefix: ObjectPath::from(prefix.trim_matches('/')),
            scheme: scheme.to_string(),
            root: format!("{scheme}:/"),
        }
    }

    fn parse_s3(
        url: &str,
        scheme: &str,
        rest: &str,
        credentials: Option<&AwsCredentials>,
    ) -> Result<Self> {
        let (bucket, prefix) = split_bucket(url, rest)?;

        let mut builder = match credentials {
            Some(creds) => {
                let mut builder = AmazonS3Builder::new()
                    .with_access_key_id(&creds.access_key_id)
                    .with_secret_access_key(&creds.secret_access_key);
                if let Some(token) = &creds.session_token {
                    builder = builder.with_token(token);
                }
                if let Some(region) = &creds.region {
                    builder = builder.with_region(region);
                }
                if let Some(endpoint) = &creds.endpoint {
                    builder = builder
                        .with_endpoint(endpoint)
                        .with_allow_http(endpoint.starts_with("http://"));
                }
                builder
            }
            None => AmazonS3Builder::from_env(),
        };
        builder = builder.with_bucket_name(bucket);

        let store = builder
            .build()
            .map_err(|e| Error::location(url, format!("failed to create S3 client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: ObjectPath::from(prefix),
            scheme: scheme.to_string(),
            root: format!("{scheme}://{bucket}"),
        })
    }

    fn parse_gcs(url: &str, rest: &str) -> Result<Self> {
        let (bucket, prefix) = split_bucket(url, rest)?;

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::location(url, format!("failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: ObjectPath::from(prefix),
            scheme: "gs".to_string(),
            root: format!("gs://{bucket}"),
        })
    }

    fn parse_azure(url: &str, rest: &str) -> Result<Self> {
        let (container, prefix) = split_bucket(url, rest)?;

        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::location(url, format!("failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: ObjectPath::from(prefix),
            scheme: "az".to_string(),
            root: format!("az://{container}"),
        })
    }

    fn parse_local(path: &str, access: Access) -> Result<Self> {
        match access {
            Access::Write => std::fs::create_dir_all(path)
                .map_err(|e| Error::location(path, format!("failed to create directory: {e}")))?,
            Access::Read => {
                if !std::path::Path::new(path).is_dir() {
                    return Err(Error::FileNotFound {
                        path: path.to_string(),
                    });
                }
            }
        }

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::location(path, format!("failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: ObjectPath::default(),
            scheme: "file".to_string(),
            root: path.trim_end_matches('/').to_string(),
        })
    }

    /// Check if this is a cloud location (not local)
    pub fn is_cloud(&self) -> bool {
        self.scheme != "file"
    }

    /// Get the scheme (s3, s3a, s3n, gs, az, file)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn prefix(&self) -> &ObjectPath {
        &self.prefix
    }

    /// The same store, one path segment further down
    pub fn child(&self, segment: &str) -> Self {
        Self {
            store: self.store.clone(),
            prefix: self.prefix.child(segment),
            scheme: self.scheme.clone(),
            root: self.root.clone(),
        }
    }

    /// Object path for `segments` below this location's prefix
    ///
    /// Each segment is percent-encoded by the path layer as needed.
    pub fn path<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> ObjectPath {
        segments
            .into_iter()
            .fold(self.prefix.clone(), |path, segment| path.child(segment))
    }

    /// Human-readable URL of a path in this store, for logs and reports
    pub fn url(&self, path: &ObjectPath) -> String {
        format!("{}/{path}", self.root)
    }

    /// Human-readable URL of this location
    pub fn display_url(&self) -> String {
        self.url(&self.prefix)
    }

    /// Path of `path` relative to this location's prefix, or `None` when it
    /// lies outside it
    pub fn relative(&self, path: &ObjectPath) -> Option<String> {
        let parts: Vec<String> = path
            .prefix_match(&self.prefix)?
            .map(|part| part.as_ref().to_string())
            .collect();
        Some(parts.join("/"))
    }

    /// Every object below this location, recursively
    pub async fn list(&self) -> Result<Vec<ObjectMeta>> {
        let prefix = (!self.prefix.as_ref().is_empty()).then_some(&self.prefix);
        let objects: Vec<ObjectMeta> = self.store.list(prefix).try_collect().await?;
        debug!(
            location = %self.display_url(),
            objects = objects.len(),
            "Listed objects"
        );
        Ok(objects)
    }

    /// Whether any object exists below this location
    pub async fn has_objects(&self) -> Result<bool> {
        let prefix = (!self.prefix.as_ref().is_empty()).then_some(&self.prefix);
        Ok(self.store.list(prefix).try_next().await?.is_some())
    }

    /// Delete every object below this location, returning how many went
    pub async fn delete_all(&self) -> Result<usize> {
        let objects = self.list().await?;
        for meta in &objects {
            self.store.delete(&meta.location).await?;
        }
        Ok(objects.len())
    }

    /// Read one object fully
    pub async fn get(&self, path: &ObjectPath) -> Result<Bytes> {
        Ok(self.store.get(path).await?.bytes().await?)
    }

    /// Write bytes to an object, returning its URL
    pub async fn put(&self, path: &ObjectPath, data: Bytes) -> Result<String> {
        self.store.put(path, data.into()).await?;
        let url = self.url(path);
        debug!(object = %url, "Wrote object");
        Ok(url)
    }
}

fn split_bucket<'a>(url: &str, rest: &'a str) -> Result<(&'a str, &'a str)> {
    let (bucket, prefix) = rest.split_once('/').unwrap_or((rest, ""));
    if bucket.is_empty() {
        return Err(Error::location(url, "missing bucket or container name"));
    }
    Ok((bucket, prefix.trim_matches('/')))
}
