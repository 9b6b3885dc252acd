//! Listing, partition planning and concurrent fetch

use crate::config::{AwsCredentials, InputConfig};
use crate::decode::{decode_records, records_to_batch};
use crate::error::{Error, Result};
use crate::frame::from_partitions;
use crate::storage::{is_hidden, split_glob, Access, GlobPattern, StorageLocation};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use datafusion::prelude::{DataFrame, SessionContext};
use futures::{stream, StreamExt, TryStreamExt};
use object_store::ObjectMeta;
use std::path::Path;
use tracing::{debug, info};

const DEFAULT_MAX_PARTITION_BYTES: u64 = 128 * 1024 * 1024;
const DEFAULT_READ_CONCURRENCY: usize = 16;

/// A glob over JSON objects read against a fixed schema
#[derive(Debug, Clone)]
pub struct JsonSource {
    location: StorageLocation,
    pattern: GlobPattern,
    schema: SchemaRef,
    max_partition_bytes: u64,
    read_concurrency: usize,
}

impl JsonSource {
    /// Source over objects below `location` whose relative key matches
    /// `pattern`
    pub fn new(location: StorageLocation, pattern: GlobPattern, schema: SchemaRef) -> Self {
        Self {
            location,
            pattern,
            schema,
            max_partition_bytes: DEFAULT_MAX_PARTITION_BYTES,
            read_concurrency: DEFAULT_READ_CONCURRENCY,
        }
    }

    /// Resolve a location URL such as `s3a://bucket/song_data/*/*/*/*.json`
    ///
    /// Without glob characters every object beneath the location is read,
    /// or just the named file when a local path points at one.
    pub fn open(
        url: &str,
        schema: SchemaRef,
        credentials: Option<&AwsCredentials>,
        input: &InputConfig,
    ) -> Result<Self> {
        let (base, pattern) = split_glob(url)?;

        let (base, pattern) = match pattern {
            Some(pattern) => (base, GlobPattern::new(&pattern)?),
            None => match local_file(&base) {
                Some((parent, name)) => (parent, GlobPattern::literal(&name)?),
                None => (base, GlobPattern::any()?),
            },
        };

        let location = StorageLocation::parse(&base, credentials, Access::Read)?;
        Ok(Self::new(location, pattern, schema)
            .with_max_partition_bytes(input.max_partition_bytes)
            .with_read_concurrency(input.read_concurrency))
    }

    pub fn with_max_partition_bytes(mut self, bytes: u64) -> Self {
        self.max_partition_bytes = bytes.max(1);
        self
    }

    pub fn with_read_concurrency(mut self, concurrency: usize) -> Self {
        self.read_concurrency = concurrency.max(1);
        self
    }

    /// Display form of the location and pattern
    pub fn describe(&self) -> String {
        format!("{}/{}", self.location.display_url(), self.pattern.as_str())
    }

    /// Matching, non-hidden objects sorted by path
    ///
    /// Fails with [`Error::NoInputFiles`] when nothing matches.
    pub async fn list_files(&self) -> Result<Vec<ObjectMeta>> {
        let mut files: Vec<ObjectMeta> = self
            .location
            .list()
            .await?
            .into_iter()
            .filter(|meta| {
                self.location
                    .relative(&meta.location)
                    .is_some_and(|key| !is_hidden(&key) && self.pattern.matches(&key))
            })
            .collect();

        if files.is_empty() {
            return Err(Error::NoInputFiles {
                pattern: self.describe(),
            });
        }

        files.sort_by(|a, b| a.location.cmp(&b.location));
        Ok(files)
    }

    /// Read every matching object into a frame registered with `ctx`
    pub async fn read(&self, ctx: &SessionContext) -> Result<DataFrame> {
        let partitions = self.read_partitions().await?;
        from_partitions(ctx, self.schema.clone(), partitions)
    }

    /// Read every matching object, one batch per planned partition
    pub async fn read_partitions(&self) -> Result<Vec<RecordBatch>> {
        let files = self.list_files().await?;
        let total_bytes: u64 = files.iter().map(|meta| meta.size as u64).sum();
        let plan = plan_partitions(files, self.max_partition_bytes);
        info!(
            source = %self.describe(),
            files = plan.iter().map(Vec::len).sum::<usize>(),
            bytes = total_bytes,
            partitions = plan.len(),
            "Reading JSON source"
        );

        // Fetch order is preserved, so bodies line up with the plan.
        let sizes: Vec<usize> = plan.iter().map(Vec::len).collect();
        let mut bodies = stream::iter(plan.into_iter().flatten())
            .map(|meta| async move {
                let body = self.location.get(&meta.location).await?;
                debug!(object = %meta.location, bytes = body.len(), "Fetched object");
                Ok::<_, Error>((self.location.url(&meta.location), body))
            })
            .buffered(self.read_concurrency)
            .try_collect::<Vec<_>>()
            .await?
            .into_iter();

        let decodes = sizes.into_iter().map(|size| {
            let files: Vec<(String, Bytes)> = bodies.by_ref().take(size).collect();
            let schema = self.schema.clone();
            tokio::task::spawn_blocking(move || decode_partition(&files, &schema))
        });

        let partitions = futures::future::try_join_all(decodes)
            .await?
            .into_iter()
            .collect::<Result<Vec<RecordBatch>>>()?;

        info!(
            source = %self.describe(),
            rows = partitions.iter().map(RecordBatch::num_rows).sum::<usize>(),
            "Decoded JSON source"
        );
        Ok(partitions)
    }
}

/// Pack files, in order, into partitions of at most `max_bytes`
///
/// A file larger than `max_bytes` gets a partition of its own; files are
/// never split.
pub fn plan_partitions(files: Vec<ObjectMeta>, max_bytes: u64) -> Vec<Vec<ObjectMeta>> {
    let mut partitions = Vec::new();
    let mut current: Vec<ObjectMeta> = Vec::new();
    let mut current_bytes = 0u64;

    for meta in files {
        let size = meta.size as u64;
        if !current.is_empty() && current_bytes + size > max_bytes {
            partitions.push(std::mem::take(&mut current));
            current_bytes = 0;
        }
        current_bytes += size;
        current.push(meta);
    }

    if !current.is_empty() {
        partitions.push(current);
    }
    partitions
}

fn decode_partition(files: &[(String, Bytes)], schema: &SchemaRef) -> Result<RecordBatch> {
    let mut records = Vec::new();
    for (url, body) in files {
        records.extend(decode_records(url, body)?);
    }
    records_to_batch(&records, schema)
}

/// Split a plain local file path into its directory and file name
fn local_file(location: &str) -> Option<(String, String)> {
    if location.contains("://") && !location.starts_with("file://") {
        return None;
    }
    let path = Path::new(location.strip_prefix("file://").unwrap_or(location));
    if !path.is_file() {
        return None;
    }
    let name = path.file_name()?.to_str()?.to_string();
    let parent = match path.parent()?.to_str()? {
        "" => ".".to_string(),
        parent => parent.to_string(),
    };
    Some((parent, name))
}
