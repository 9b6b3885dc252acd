//! Hive-style partitioning of a table's rows

use crate::error::{Error, Result};
use crate::frame::collect_batch;
use arrow::array::{Array, ArrayRef};
use arrow::compute::kernels::partition::partition;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use datafusion::functions::expr_fn::nullif;
use datafusion::prelude::{col, lit, DataFrame};

/// Directory value used for null or empty partition values
pub const DEFAULT_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

/// Rows sharing one combination of partition values
#[derive(Debug, Clone)]
pub struct PartitionGroup {
    /// `column=value` directory names, outermost first
    pub segments: Vec<String>,
    /// The group's rows without the partition columns
    pub batch: RecordBatch,
}

/// Execute `frame` and split its rows by the values of `columns`
///
/// The plan is sorted on the partition columns (ascending, nulls last) so
/// every group is one contiguous run; empty strings are folded into null
/// first so both land in the default partition. With no partition columns
/// the whole table is one group. An empty table yields no groups.
pub async fn partition_frame(frame: DataFrame, columns: &[&str]) -> Result<Vec<PartitionGroup>> {
    if columns.is_empty() {
        let batch = collect_batch(frame).await?;
        if batch.num_rows() == 0 {
            return Ok(Vec::new());
        }
        return Ok(vec![PartitionGroup {
            segments: Vec::new(),
            batch,
        }]);
    }

    let mut frame = frame;
    for &name in columns {
        let is_text = frame
            .schema()
            .field_with_unqualified_name(name)
            .map_err(|_| Error::column_not_found(name))?
            .data_type()
            == &DataType::Utf8;
        if is_text {
            frame = frame.with_column(name, nullif(col(name), lit("")))?;
        }
    }
    let order = columns.iter().map(|&name| col(name).sort(true, false)).collect();
    let batch = collect_batch(frame.sort(order)?).await?;
    if batch.num_rows() == 0 {
        return Ok(Vec::new());
    }

    let schema = batch.schema();
    let key_indices = columns
        .iter()
        .map(|&name| {
            schema
                .index_of(name)
                .map_err(|_| Error::column_not_found(name))
        })
        .collect::<Result<Vec<usize>>>()?;
    let data_indices: Vec<usize> = (0..schema.fields().len())
        .filter(|i| !key_indices.contains(i))
        .collect();

    let keys: Vec<ArrayRef> = key_indices
        .iter()
        .map(|&i| batch.column(i).clone())
        .collect();
    partition(&keys)?
        .ranges()
        .into_iter()
        .map(|range| {
            let segments = key_indices
                .iter()
                .zip(columns)
                .map(|(&index, name)| {
                    let value = partition_value(batch.column(index).as_ref(), range.start)?;
                    Ok(format!("{name}={value}"))
                })
                .collect::<Result<Vec<String>>>()?;
            Ok(PartitionGroup {
                segments,
                batch: batch
                    .slice(range.start, range.end - range.start)
                    .project(&data_indices)?,
            })
        })
        .collect()
}

/// Directory value of one cell
pub fn partition_value(array: &dyn Array, row: usize) -> Result<String> {
    if array.is_null(row) {
        return Ok(DEFAULT_PARTITION.to_string());
    }
    let value = array_value_to_string(array, row)?;
    if value.is_empty() {
        Ok(DEFAULT_PARTITION.to_string())
    } else {
        Ok(value)
    }
}
