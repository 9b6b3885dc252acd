//! Source schemas and output tables

use super::columns::{log, out, song};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use std::sync::Arc;

/// Schema the song metadata corpus is read against
pub fn song_source_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(song::ARTIST_ID, DataType::Utf8, true),
        Field::new(song::ARTIST_LATITUDE, DataType::Float64, true),
        Field::new(song::ARTIST_LOCATION, DataType::Utf8, true),
        Field::new(song::ARTIST_LONGITUDE, DataType::Float64, true),
        Field::new(song::ARTIST_NAME, DataType::Utf8, true),
        Field::new(song::DURATION, DataType::Float64, true),
        Field::new(song::NUM_SONGS, DataType::Int64, true),
        Field::new(song::SONG_ID, DataType::Utf8, true),
        Field::new(song::TITLE, DataType::Utf8, true),
        Field::new(song::YEAR, DataType::Int64, true),
    ]))
}

/// Schema the event log corpus is read against
pub fn log_source_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(log::ARTIST, DataType::Utf8, true),
        Field::new(log::AUTH, DataType::Utf8, true),
        Field::new(log::FIRST_NAME, DataType::Utf8, true),
        Field::new(log::GENDER, DataType::Utf8, true),
        Field::new(log::ITEM_IN_SESSION, DataType::Int64, true),
        Field::new(log::LAST_NAME, DataType::Utf8, true),
        Field::new(log::LENGTH, DataType::Float64, true),
        Field::new(log::LEVEL, DataType::Utf8, true),
        Field::new(log::LOCATION, DataType::Utf8, true),
        Field::new(log::METHOD, DataType::Utf8, true),
        Field::new(log::PAGE, DataType::Utf8, true),
        Field::new(log::REGISTRATION, DataType::Float64, true),
        Field::new(log::SESSION_ID, DataType::Int64, true),
        Field::new(log::SONG, DataType::Utf8, true),
        Field::new(log::STATUS, DataType::Int64, true),
        Field::new(log::TS, DataType::Int64, true),
        Field::new(log::USER_AGENT, DataType::Utf8, true),
        Field::new(log::USER_ID, DataType::Utf8, true),
    ]))
}

/// The five datasets the job writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Songs,
    Artists,
    Users,
    Time,
    Songplays,
}

impl Table {
    /// Every table, in write order
    pub const ALL: [Table; 5] = [
        Table::Songs,
        Table::Artists,
        Table::Users,
        Table::Time,
        Table::Songplays,
    ];

    /// Directory name of the dataset
    pub fn name(self) -> &'static str {
        match self {
            Table::Songs => "songs_table",
            Table::Artists => "artists_table",
            Table::Users => "users_table",
            Table::Time => "time_table",
            Table::Songplays => "songplays_table",
        }
    }

    /// Columns the dataset is partitioned by, outermost first
    pub fn partition_columns(self) -> &'static [&'static str] {
        match self {
            Table::Songs => &[out::YEAR, out::ARTIST_ID],
            Table::Time | Table::Songplays => &[out::YEAR, out::MONTH],
            Table::Artists | Table::Users => &[],
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
