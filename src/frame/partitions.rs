//! Partition-wise maps

use super::session::from_partitioned;
use crate::error::{Error, Result};
use arrow::array::{Array, AsArray, Int64Array};
use arrow::datatypes::{DataType, Field, Int64Type, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use datafusion::prelude::{DataFrame, SessionContext};
use std::sync::Arc;

/// Bits reserved for the row number in a monotonic id
const ROW_ID_BITS: u32 = 33;

/// Replace every batch of `frame` with `f` applied to it
///
/// `schema` is what `f` produces. Partition boundaries are those of the
/// executed plan.
pub async fn map_partitions<F>(
    ctx: &SessionContext,
    frame: DataFrame,
    schema: SchemaRef,
    f: F,
) -> Result<DataFrame>
where
    F: Fn(&RecordBatch) -> Result<RecordBatch>,
{
    let partitions = frame
        .collect_partitioned()
        .await?
        .iter()
        .map(|batches| batches.iter().map(&f).collect::<Result<Vec<_>>>())
        .collect::<Result<Vec<_>>>()?;
    from_partitioned(ctx, schema, partitions)
}

/// Append a unique, increasing, non-contiguous Int64 id
///
/// The id is `(partition_index << 33) + row_within_partition`, so it is
/// unique within a frame, increases in partition order, and jumps between
/// partitions.
pub async fn with_monotonic_id(
    ctx: &SessionContext,
    frame: DataFrame,
    name: &str,
) -> Result<DataFrame> {
    let schema = extend_schema(
        frame.schema().as_arrow(),
        [Field::new(name, DataType::Int64, false)],
    )?;
    let partitions = assign_monotonic_ids(frame.collect_partitioned().await?, &schema)?;
    from_partitioned(ctx, schema, partitions)
}

/// Append the id column to every batch; `schema` already carries it last
pub fn assign_monotonic_ids(
    partitions: Vec<Vec<RecordBatch>>,
    schema: &SchemaRef,
) -> Result<Vec<Vec<RecordBatch>>> {
    partitions
        .into_iter()
        .enumerate()
        .map(|(index, batches)| {
            let mut next = (index as i64) << ROW_ID_BITS;
            batches
                .into_iter()
                .map(|batch| {
                    let rows = batch.num_rows() as i64;
                    let ids = Int64Array::from_iter_values(next..next + rows);
                    next += rows;
                    let mut columns = batch.columns().to_vec();
                    columns.push(Arc::new(ids));
                    Ok(RecordBatch::try_new(schema.clone(), columns)?)
                })
                .collect()
        })
        .collect()
}

/// `schema` followed by `extra`; names must stay unique
pub fn extend_schema(
    schema: &Schema,
    extra: impl IntoIterator<Item = Field>,
) -> Result<SchemaRef> {
    let mut fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|f| f.as_ref().clone())
        .collect();
    for field in extra {
        if schema.field_with_name(field.name()).is_ok() {
            return Err(Error::frame(format!("duplicate column '{}'", field.name())));
        }
        fields.push(field);
    }
    Ok(Arc::new(Schema::new(fields)))
}

/// Borrow a named Int64 column
pub fn i64_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Int64Array> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| Error::column_not_found(name))?;
    column
        .as_primitive_opt::<Int64Type>()
        .ok_or_else(|| Error::ColumnType {
            column: name.to_string(),
            expected: DataType::Int64.to_string(),
            actual: column.data_type().to_string(),
        })
}
