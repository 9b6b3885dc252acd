//! Star schema transformations
//!
//! DataFusion plans from the raw corpora to the five output tables. Reading
//! and writing happen in [`crate::job`].

mod log;
mod song;
mod songplays;

pub use log::{next_song_plays, time_table, users_table, with_calendar_columns};
pub use song::{artists_table, songs_table};
pub use songplays::songplays_table;
