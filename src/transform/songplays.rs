//! Songplay fact table

use crate::error::Result;
use crate::frame::with_monotonic_id;
use crate::model::columns::{log, out, song};
use datafusion::logical_expr::JoinType;
use datafusion::prelude::{col, DataFrame, SessionContext};

/// Join plays to songs on (artist name, title) and number the result
///
/// Matching is exact, so a play whose artist or song differs in case or
/// whitespace is dropped, as is one with a null key. A play matching several
/// songs is repeated. `songplay_id` is unique and increasing but has gaps
/// between partitions of the joined plan.
pub async fn songplays_table(
    ctx: &SessionContext,
    plays: DataFrame,
    songs: DataFrame,
) -> Result<DataFrame> {
    let plays = plays.select(vec![
        col(out::START_TIME),
        col(log::USER_ID).alias(out::USER_ID),
        col(log::LEVEL),
        col(log::SESSION_ID).alias(out::SESSION_ID),
        col(log::LOCATION),
        col(log::USER_AGENT).alias(out::USER_AGENT),
        col(log::SONG),
        col(log::ARTIST),
        col(out::MONTH),
        col(out::YEAR),
    ])?;
    let songs =
        songs.select_columns(&[song::SONG_ID, song::ARTIST_ID, song::ARTIST_NAME, song::TITLE])?;

    let joined = plays
        .join(
            songs,
            JoinType::Inner,
            &[log::ARTIST, log::SONG],
            &[song::ARTIST_NAME, song::TITLE],
            None,
        )?
        .select_columns(&[
            out::START_TIME,
            out::USER_ID,
            out::LEVEL,
            out::SONG_ID,
            out::ARTIST_ID,
            out::SESSION_ID,
            out::LOCATION,
            out::USER_AGENT,
            out::MONTH,
            out::YEAR,
        ])?;

    with_monotonic_id(ctx, joined, out::SONGPLAY_ID).await
}
