//! Song metadata projections

use crate::error::Result;
use crate::model::columns::{out, song};
use datafusion::prelude::{col, DataFrame};

/// One row per song record; no dedup, nulls pass through
pub fn songs_table(songs: DataFrame) -> Result<DataFrame> {
    Ok(songs.select_columns(&[
        song::SONG_ID,
        song::TITLE,
        song::ARTIST_ID,
        song::YEAR,
        song::DURATION,
    ])?)
}

/// One row per song record, so an artist with several songs repeats
pub fn artists_table(songs: DataFrame) -> Result<DataFrame> {
    Ok(songs.select(vec![
        col(song::ARTIST_ID),
        col(song::ARTIST_NAME).alias(out::NAME),
        col(song::ARTIST_LOCATION).alias(out::LOCATION),
        col(song::ARTIST_LATITUDE).alias(out::LATITUDE),
        col(song::ARTIST_LONGITUDE).alias(out::LONGITUDE),
    ])?)
}
