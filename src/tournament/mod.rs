//! Tournament scheduling and scoring: teams of components play matches on
//! courts, set scores roll up into match winners and standings, and a greedy
//! timetabler assigns every pairing a court and time slot.

pub mod court;
pub mod match_mode;
pub mod matches;
pub mod scheduler;
pub mod signup;
pub mod stats;
pub mod team;
pub mod tournament;

pub use court::Court;
pub use match_mode::{MatchMode, ModeResult};
pub use matches::{Match, MatchSet, MatchState, SetResult};
pub use stats::{StandingsRow, TeamStats};
pub use team::{Component, Team};
pub use tournament::{Tournament, TournamentState};

use thiserror::Error;
use uuid::Uuid;

pub type TournamentResult<T> = Result<T, TournamentError>;

/// Failures raised by tournament operations.
///
/// Configuration errors surface immediately; placement conflicts during
/// scheduling never escape the scheduler, which treats them as cues to try
/// the next court or time slot.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("tournament `{tournament}` has no court for matches")]
    MissingCourt { tournament: String },
    #[error("tournament `{tournament}` has no start time for matches")]
    MissingStartTime { tournament: String },
    #[error("tournament `{tournament}` has no match duration")]
    MissingDuration { tournament: String },
    #[error("tournament `{tournament}` cannot schedule matches of {number} teams")]
    InvalidTeamsNumber { tournament: String, number: u32 },
    #[error("no court and time available for match `{pairing}`")]
    Unschedulable { pairing: String },
    #[error("teams in match `{match_name}` have common components")]
    CommonComponents { match_name: String },
    #[error("teams in match `{match_name}` belong to different tournaments")]
    CrossTournamentTeams { match_name: String },
    #[error("winner of match `{match_name}` is not participating in it")]
    WinnerNotPlaying { match_name: String },
    #[error("set `{set_name}` is tied at {score}: sets cannot end in a draw")]
    TiedSet { set_name: String, score: u32 },
    #[error("set `{set_name}` is not valid: {reason}")]
    InvalidSetScore { set_name: String, reason: String },
    #[error(
        "match `{match_name}` not valid: result {won_sets} - {lost_sets} \
         not expected for match mode `{mode}`"
    )]
    UnexpectedResult {
        match_name: String,
        won_sets: u32,
        lost_sets: u32,
        mode: String,
    },
    #[error("match `{0}` not found in this tournament")]
    UnknownMatch(Uuid),
    #[error("component `{0}` not found in this tournament")]
    UnknownComponent(Uuid),
    #[error("tournament named `{0}` not found")]
    UnknownTournament(String),
    #[error("team `{name}` already registered in tournament `{tournament}`")]
    DuplicateTeamName { tournament: String, name: String },
    #[error("CSV import failed: {0}")]
    Csv(String),
}
