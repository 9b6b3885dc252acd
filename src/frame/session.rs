//! In-memory tables and plan execution

use crate::error::Result;
use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use datafusion::datasource::MemTable;
use datafusion::prelude::{DataFrame, SessionContext};
use std::sync::Arc;

/// Frame with one DataFusion partition per batch
pub fn from_partitions(
    ctx: &SessionContext,
    schema: SchemaRef,
    partitions: Vec<RecordBatch>,
) -> Result<DataFrame> {
    from_partitioned(ctx, schema, partitions.into_iter().map(|b| vec![b]).collect())
}

/// Frame over already partitioned batches
///
/// No partitions at all still yields one empty partition.
pub fn from_partitioned(
    ctx: &SessionContext,
    schema: SchemaRef,
    mut partitions: Vec<Vec<RecordBatch>>,
) -> Result<DataFrame> {
    if partitions.is_empty() {
        partitions.push(Vec::new());
    }
    let table = MemTable::try_new(schema, partitions)?;
    Ok(ctx.read_table(Arc::new(table))?)
}

/// Execute `frame` into a single batch
pub async fn collect_batch(frame: DataFrame) -> Result<RecordBatch> {
    let schema = Arc::clone(frame.schema().inner());
    let batches = frame.collect().await?;
    let schema = batches.first().map_or(schema, RecordBatch::schema);
    Ok(concat_batches(&schema, &batches)?)
}

/// Rows `frame` produces
pub async fn num_rows(frame: &DataFrame) -> Result<usize> {
    Ok(frame.clone().count().await?)
}
