//! Column names
//!
//! Raw names are what the JSON corpora use; output names are what the
//! written tables use.

/// Song metadata corpus
pub mod song {
    pub const ARTIST_ID: &str = "artist_id";
    pub const ARTIST_LATITUDE: &str = "artist_latitude";
    pub const ARTIST_LOCATION: &str = "artist_location";
    pub const ARTIST_LONGITUDE: &str = "artist_longitude";
    pub const ARTIST_NAME: &str = "artist_name";
    pub const DURATION: &str = "duration";
    pub const NUM_SONGS: &str = "num_songs";
    pub const SONG_ID: &str = "song_id";
    pub const TITLE: &str = "title";
    pub const YEAR: &str = "year";
}

/// Event log corpus
pub mod log {
    pub const ARTIST: &str = "artist";
    pub const AUTH: &str = "auth";
    pub const FIRST_NAME: &str = "firstName";
    pub const GENDER: &str = "gender";
    pub const ITEM_IN_SESSION: &str = "itemInSession";
    pub const LAST_NAME: &str = "lastName";
    pub const LENGTH: &str = "length";
    pub const LEVEL: &str = "level";
    pub const LOCATION: &str = "location";
    pub const METHOD: &str = "method";
    pub const PAGE: &str = "page";
    pub const REGISTRATION: &str = "registration";
    pub const SESSION_ID: &str = "sessionId";
    pub const SONG: &str = "song";
    pub const STATUS: &str = "status";
    pub const TS: &str = "ts";
    pub const USER_AGENT: &str = "userAgent";
    pub const USER_ID: &str = "userId";

    /// Page value of an actual song play
    pub const NEXT_SONG: &str = "NextSong";
}

/// Written tables
pub mod out {
    pub const SONG_ID: &str = "song_id";
    pub const TITLE: &str = "title";
    pub const ARTIST_ID: &str = "artist_id";
    pub const YEAR: &str = "year";
    pub const DURATION: &str = "duration";

    pub const NAME: &str = "name";
    pub const LOCATION: &str = "location";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";

    pub const USER_ID: &str = "user_id";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const GENDER: &str = "gender";
    pub const LEVEL: &str = "level";

    pub const START_TIME: &str = "start_time";
    pub const HOUR: &str = "hour";
    pub const DAY: &str = "day";
    pub const WEEK: &str = "week";
    pub const MONTH: &str = "month";
    pub const WEEKDAY: &str = "weekday";

    pub const SONGPLAY_ID: &str = "songplay_id";
    pub const SESSION_ID: &str = "session_id";
    pub const USER_AGENT: &str = "user_agent";
}
