//! Job orchestration

use super::report::JobReport;
use crate::calendar::Clock;
use crate::config::EtlConfig;
use crate::error::Result;
use crate::frame::num_rows;
use crate::model::{log_source_schema, song_source_schema, Table};
use crate::output::{TableReport, TableSink};
use crate::source::JsonSource;
use crate::storage::{Access, StorageLocation};
use crate::transform;
use chrono::Utc;
use datafusion::prelude::SessionContext;
use std::time::Instant;
use tracing::info;

/// Song + log corpora in, five tables out
#[derive(Debug, Clone)]
pub struct EtlJob {
    songs: JsonSource,
    logs: JsonSource,
    sink: TableSink,
    clock: Clock,
}

impl EtlJob {
    /// Resolve every location named by `config`
    ///
    /// Local input directories must exist; the local output directory is
    /// created. Nothing is read yet.
    pub fn new(config: &EtlConfig) -> Result<Self> {
        config.validate()?;
        let credentials = config.aws.as_ref();

        let songs = JsonSource::open(
            &config.input.song_data,
            song_source_schema(),
            credentials,
            &config.input,
        )?;
        let logs = JsonSource::open(
            &config.input.log_data,
            log_source_schema(),
            credentials,
            &config.input,
        )?;
        let output = StorageLocation::parse(&config.output.location, credentials, Access::Write)?;

        Ok(Self::from_parts(
            songs,
            logs,
            TableSink::new(output, &config.output),
            config.clock,
        ))
    }

    /// Assemble a job from already-built parts
    pub fn from_parts(songs: JsonSource, logs: JsonSource, sink: TableSink, clock: Clock) -> Self {
        Self {
            songs,
            logs,
            sink,
            clock,
        }
    }

    /// Run both pipelines and report what was written
    ///
    /// The first error aborts the run; tables already written stay.
    pub async fn run(&self) -> Result<JobReport> {
        let started_at = Utc::now();
        let timer = Instant::now();
        info!(
            songs = %self.songs.describe(),
            logs = %self.logs.describe(),
            output = %self.sink.location().display_url(),
            "Starting ETL job"
        );

        let (song_tables, log_tables) =
            tokio::try_join!(self.process_song_data(), self.process_log_data())?;

        let report = JobReport {
            started_at,
            elapsed_ms: u64::try_from(timer.elapsed().as_millis()).unwrap_or(u64::MAX),
            tables: song_tables.into_iter().chain(log_tables).collect(),
        };
        info!(
            tables = report.tables.len(),
            rows = report.total_rows(),
            elapsed_ms = report.elapsed_ms,
            "ETL job finished"
        );
        Ok(report)
    }

    /// Write `songs_table` and `artists_table`
    pub async fn process_song_data(&self) -> Result<Vec<TableReport>> {
        let ctx = SessionContext::new();
        let songs = self.songs.read(&ctx).await?;
        info!(rows = num_rows(&songs).await?, "Processing song data");

        let songs_table = transform::songs_table(songs.clone())?;
        let artists_table = transform::artists_table(songs)?;

        Ok(vec![
            self.sink.write(Table::Songs, songs_table).await?,
            self.sink.write(Table::Artists, artists_table).await?,
        ])
    }

    /// Write `users_table`, `time_table` and `songplays_table`
    pub async fn process_log_data(&self) -> Result<Vec<TableReport>> {
        let ctx = SessionContext::new();
        let events = self.logs.read(&ctx).await?;
        let events = transform::with_calendar_columns(&ctx, events, self.clock).await?;
        let plays = transform::next_song_plays(events.clone())?;
        info!(
            events = num_rows(&events).await?,
            plays = num_rows(&plays).await?,
            "Processing log data"
        );

        let users_table = transform::users_table(plays.clone())?;
        let time_table = transform::time_table(plays.clone())?;
        let users = self.sink.write(Table::Users, users_table).await?;
        let time = self.sink.write(Table::Time, time_table).await?;

        let songs = self.songs.read(&ctx).await?;
        let songplays_table = transform::songplays_table(&ctx, plays, songs).await?;
        let songplays = self.sink.write(Table::Songplays, songplays_table).await?;

        Ok(vec![users, time, songplays])
    }
}
