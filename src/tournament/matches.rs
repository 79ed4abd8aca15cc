use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{match_mode::MatchMode, TournamentResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchState {
    Draft,
    Done,
}

/// Score of one team in one set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetResult {
    pub team_id: Uuid,
    pub score: u32,
}

/// A set of a match: one score per participating team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchSet {
    pub name: String,
    pub results: Vec<SetResult>,
}

impl MatchSet {
    pub fn new(name: impl Into<String>, scores: &[(Uuid, u32)]) -> Self {
        Self {
            name: name.into(),
            results: scores
                .iter()
                .map(|(team_id, score)| SetResult {
                    team_id: *team_id,
                    score: *score,
                })
                .collect(),
        }
    }

    pub fn score_of(&self, team_id: Uuid) -> u32 {
        self.results
            .iter()
            .find(|result| result.team_id == team_id)
            .map(|result| result.score)
            .unwrap_or(0)
    }

    /// A set with no points at all was never played and is skipped by the
    /// scoring derivations.
    pub fn is_played(&self) -> bool {
        self.results.iter().any(|result| result.score > 0)
    }
}

/// An unordered pairing of teams scheduled on a court.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    pub team_ids: Vec<Uuid>,
    pub court_id: Uuid,
    /// Start of competitive play; the warm-up buffer precedes it.
    pub time_start: DateTime<Utc>,
    pub time_end: DateTime<Utc>,
    pub state: MatchState,
    #[serde(default)]
    pub sets: Vec<MatchSet>,
}

impl Match {
    pub fn new(
        team_ids: Vec<Uuid>,
        court_id: Uuid,
        time_start: DateTime<Utc>,
        time_end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_ids,
            court_id,
            time_start,
            time_end,
            state: MatchState::Draft,
            sets: Vec::new(),
        }
    }

    pub fn contains_team(&self, team_id: Uuid) -> bool {
        self.team_ids.contains(&team_id)
    }

    pub fn record_set(&mut self, set: MatchSet) {
        self.sets.push(set);
    }

    /// True when this set index (0-based) is played under tie-break rules.
    pub fn is_tie_break(&self, set_index: usize, mode: &MatchMode) -> bool {
        set_index + 1 == mode.tie_break_number as usize
    }

    /// Sets won and lost per team over the played sets.
    ///
    /// Only meaningful for done matches; a draft match reports all zeros.
    pub fn sets_count(&self, mode: &MatchMode) -> TournamentResult<Vec<(Uuid, u32, u32)>> {
        let mut counts: Vec<(Uuid, u32, u32)> = self
            .team_ids
            .iter()
            .map(|team_id| (*team_id, 0, 0))
            .collect();
        if self.state != MatchState::Done {
            return Ok(counts);
        }
        for (index, set) in self.sets.iter().enumerate() {
            if !set.is_played() {
                continue;
            }
            let winner = mode.set_winner(set, self.is_tie_break(index, mode))?;
            for (team_id, won, lost) in counts.iter_mut() {
                if *team_id == winner {
                    *won += 1;
                } else {
                    *lost += 1;
                }
            }
        }
        Ok(counts)
    }

    /// The team with strictly the most won sets, if any.
    ///
    /// A shared maximum means no winner: draws are allowed at match level
    /// even though individual sets cannot tie.
    pub fn winner(&self, mode: &MatchMode) -> TournamentResult<Option<Uuid>> {
        let counts = self.sets_count(mode)?;
        let mut best: Option<(Uuid, u32)> = None;
        let mut unique = true;
        for (team_id, won, _) in counts {
            match best {
                Some((_, top)) if won == top => unique = false,
                Some((_, top)) if won > top => {
                    best = Some((team_id, won));
                    unique = true;
                }
                None => best = Some((team_id, won)),
                _ => {}
            }
        }
        match best {
            Some((team_id, won)) if unique && won > 0 => Ok(Some(team_id)),
            _ => Ok(None),
        }
    }

    /// True when `[start, end)` overlaps this match's slot, including the
    /// warm-up buffer of `warm_up` minutes before competitive play.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>, warm_up: chrono::Duration) -> bool {
        let slot_start = self.time_start - warm_up;
        start < self.time_end && slot_start < end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn done_match_with_sets(sets: Vec<MatchSet>) -> Match {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let mut m = Match::new(
            sets[0].results.iter().map(|r| r.team_id).collect(),
            Uuid::new_v4(),
            start,
            start + chrono::Duration::hours(1),
        );
        m.sets = sets;
        m.state = MatchState::Done;
        m
    }

    #[test]
    fn winner_takes_strict_majority_of_sets() {
        let mode = MatchMode::beach_volley();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let m = done_match_with_sets(vec![
            MatchSet::new("Set 1", &[(a, 21), (b, 15)]),
            MatchSet::new("Set 2", &[(a, 18), (b, 21)]),
            MatchSet::new("Set 3", &[(a, 15), (b, 9)]),
        ]);
        assert_eq!(m.winner(&mode).unwrap(), Some(a));
    }

    #[test]
    fn equal_sets_mean_no_winner() {
        let mode = MatchMode::beach_volley();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let m = done_match_with_sets(vec![
            MatchSet::new("Set 1", &[(a, 21), (b, 15)]),
            MatchSet::new("Set 2", &[(a, 19), (b, 21)]),
        ]);
        assert_eq!(m.winner(&mode).unwrap(), None);
    }

    #[test]
    fn draft_match_has_no_winner() {
        let mode = MatchMode::beach_volley();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut m = done_match_with_sets(vec![MatchSet::new("Set 1", &[(a, 21), (b, 15)])]);
        m.state = MatchState::Draft;
        assert_eq!(m.winner(&mode).unwrap(), None);
    }

    #[test]
    fn unplayed_sets_are_skipped() {
        let mode = MatchMode::beach_volley();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let m = done_match_with_sets(vec![
            MatchSet::new("Set 1", &[(a, 21), (b, 15)]),
            MatchSet::new("Set 2", &[(a, 0), (b, 0)]),
        ]);
        let counts = m.sets_count(&mode).unwrap();
        assert_eq!(counts, vec![(a, 1, 0), (b, 0, 1)]);
    }

    #[test]
    fn overlap_includes_warm_up() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let m = Match::new(
            vec![Uuid::new_v4()],
            Uuid::new_v4(),
            start,
            start + chrono::Duration::hours(1),
        );
        let warm_up = chrono::Duration::minutes(10);
        // A slot ending during the warm-up window still conflicts.
        assert!(m.overlaps(start - chrono::Duration::minutes(30), start - chrono::Duration::minutes(5), warm_up));
        assert!(!m.overlaps(start - chrono::Duration::minutes(30), start - warm_up, warm_up));
    }
}
