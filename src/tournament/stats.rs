use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    match_mode::MatchMode,
    matches::{Match, MatchState},
    TournamentResult,
};

/// Per-match, per-team scoring summary derived from the recorded sets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamStats {
    pub match_id: Uuid,
    pub team_id: Uuid,
    pub won_sets: u32,
    pub lost_sets: u32,
    /// Points scored by the team across all sets.
    pub done_points: u32,
    /// Points scored against the team across all sets.
    pub taken_points: u32,
    pub tournament_points: u32,
}

impl TeamStats {
    /// Derives the stats of every team in `match_`.
    ///
    /// Draft matches yield zeroed stats; done matches are validated and
    /// scored through the match mode.
    pub fn from_match(match_: &Match, match_name: &str, mode: &MatchMode) -> TournamentResult<Vec<TeamStats>> {
        let counts = match_.sets_count(mode)?;
        let points = if match_.state == MatchState::Done {
            mode.points(match_name, &counts)?
        } else {
            counts.iter().map(|(team_id, _, _)| (*team_id, 0)).collect()
        };

        let match_points: u32 = match_
            .sets
            .iter()
            .flat_map(|set| set.results.iter())
            .map(|result| result.score)
            .sum();

        let mut stats = Vec::with_capacity(counts.len());
        for ((team_id, won_sets, lost_sets), (_, tournament_points)) in
            counts.into_iter().zip(points)
        {
            let done_points: u32 = match_
                .sets
                .iter()
                .map(|set| set.score_of(team_id))
                .sum();
            stats.push(TeamStats {
                match_id: match_.id,
                team_id,
                won_sets,
                lost_sets,
                done_points,
                taken_points: match_points - done_points,
                tournament_points,
            });
        }
        Ok(stats)
    }
}

/// Won/lost ratio; a lossless record divides by 0.1 instead of zero.
pub fn calculate_ratio(won: u32, lost: u32) -> f64 {
    if lost == 0 {
        won as f64 / 0.1
    } else {
        won as f64 / lost as f64
    }
}

/// One row of the tournament ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandingsRow {
    pub team_id: Uuid,
    pub matches_played: u32,
    pub won_sets: u32,
    pub lost_sets: u32,
    pub done_points: u32,
    pub taken_points: u32,
    pub tournament_points: u32,
    pub sets_ratio: f64,
    pub points_ratio: f64,
}

impl StandingsRow {
    pub fn new(team_id: Uuid) -> Self {
        Self {
            team_id,
            matches_played: 0,
            won_sets: 0,
            lost_sets: 0,
            done_points: 0,
            taken_points: 0,
            tournament_points: 0,
            sets_ratio: 0.0,
            points_ratio: 0.0,
        }
    }

    pub fn absorb(&mut self, stats: &TeamStats) {
        self.matches_played += 1;
        self.won_sets += stats.won_sets;
        self.lost_sets += stats.lost_sets;
        self.done_points += stats.done_points;
        self.taken_points += stats.taken_points;
        self.tournament_points += stats.tournament_points;
        self.sets_ratio = calculate_ratio(self.won_sets, self.lost_sets);
        self.points_ratio = calculate_ratio(self.done_points, self.taken_points);
    }
}

/// Orders rows by tournament points, then sets ratio, then points ratio.
pub fn sort_standings(rows: &mut [StandingsRow]) {
    rows.sort_by(|a, b| {
        b.tournament_points
            .cmp(&a.tournament_points)
            .then_with(|| {
                b.sets_ratio
                    .partial_cmp(&a.sets_ratio)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| {
                b.points_ratio
                    .partial_cmp(&a.points_ratio)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });
}
