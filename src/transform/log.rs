//! Event log transformations

use crate::calendar::{CalendarParts, Clock};
use crate::error::Result;
use crate::frame::{extend_schema, i64_column, map_partitions};
use crate::model::columns::{log, out};
use arrow::array::{ArrayRef, Int32Array, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, TimeUnit};
use arrow::record_batch::RecordBatch;
use datafusion::prelude::{col, lit, DataFrame, SessionContext};
use std::sync::Arc;

/// Append `start_time` and its calendar parts, derived from `ts`
///
/// `start_time` keeps the raw epoch milliseconds. A null or out-of-range
/// `ts` gives null parts.
pub async fn with_calendar_columns(
    ctx: &SessionContext,
    events: DataFrame,
    clock: Clock,
) -> Result<DataFrame> {
    let schema = extend_schema(
        events.schema().as_arrow(),
        [
            Field::new(
                out::START_TIME,
                DataType::Timestamp(TimeUnit::Millisecond, None),
                true,
            ),
            Field::new(out::HOUR, DataType::Int32, true),
            Field::new(out::DAY, DataType::Int32, true),
            Field::new(out::WEEK, DataType::Int32, true),
            Field::new(out::MONTH, DataType::Int32, true),
            Field::new(out::YEAR, DataType::Int32, true),
            Field::new(out::WEEKDAY, DataType::Int32, true),
        ],
    )?;

    let output = schema.clone();
    map_partitions(ctx, events, schema, move |batch| {
        let mut columns = batch.columns().to_vec();
        columns.extend(calendar_columns(batch, clock)?);
        Ok(RecordBatch::try_new(output.clone(), columns)?)
    })
    .await
}

fn calendar_columns(batch: &RecordBatch, clock: Clock) -> Result<Vec<ArrayRef>> {
    let ts = i64_column(batch, log::TS)?;
    let parts: Vec<Option<CalendarParts>> = ts
        .iter()
        .map(|millis| millis.and_then(|m| CalendarParts::from_epoch_millis(m, clock)))
        .collect();

    let part = |field: fn(&CalendarParts) -> i32| -> ArrayRef {
        Arc::new(
            parts
                .iter()
                .map(|p| p.as_ref().map(field))
                .collect::<Int32Array>(),
        )
    };

    Ok(vec![
        Arc::new(ts.iter().collect::<TimestampMillisecondArray>()) as ArrayRef,
        part(|p| p.hour),
        part(|p| p.day),
        part(|p| p.week),
        part(|p| p.month),
        part(|p| p.year),
        part(|p| p.weekday),
    ])
}

/// Keep only actual song plays (`page == "NextSong"`); a null page is dropped
pub fn next_song_plays(events: DataFrame) -> Result<DataFrame> {
    Ok(events.filter(col(log::PAGE).eq(lit(log::NEXT_SONG)))?)
}

/// One row per play; no dedup
pub fn users_table(plays: DataFrame) -> Result<DataFrame> {
    Ok(plays.select(vec![
        col(log::USER_ID).alias(out::USER_ID),
        col(log::FIRST_NAME).alias(out::FIRST_NAME),
        col(log::LAST_NAME).alias(out::LAST_NAME),
        col(log::GENDER),
        col(log::LEVEL),
    ])?)
}

/// One row per play; no dedup
pub fn time_table(plays: DataFrame) -> Result<DataFrame> {
    Ok(plays.select_columns(&[
        out::START_TIME,
        out::HOUR,
        out::DAY,
        out::WEEK,
        out::MONTH,
        out::YEAR,
        out::WEEKDAY,
    ])?)
}
