//! Canned transcript sessions for tests and the replay example.
//!
//! Each module is one recorded session: a sorted word list with persisted
//! ids, the speaker-hint rows that were stored alongside it, and the
//! participant count the client knew at the time.

pub mod standup_1 {
    pub const SESSION_JSON: &str = include_str!("../data/standup_1/session.json");
}

pub mod interview_1 {
    pub const SESSION_JSON: &str = include_str!("../data/interview_1/session.json");
}
