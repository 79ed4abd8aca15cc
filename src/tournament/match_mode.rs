use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{matches::MatchSet, TournamentError, TournamentResult};

/// Tournament points granted for one (sets won, sets lost) outcome.
///
/// The table is symmetric: a team whose result matches `(won, lost)` takes
/// `win_points`, a team matching the swapped tuple takes `lose_points`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModeResult {
    pub won_sets: u32,
    pub lost_sets: u32,
    pub win_points: u32,
    pub lose_points: u32,
}

/// Configurable ruleset defining set targets, margins, and the tie-break
/// set for a tournament's matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchMode {
    pub name: String,
    /// Points needed to win a regular set.
    pub win_set_points: u32,
    /// Minimum lead over the loser; play continues past the target until
    /// the lead is reached.
    pub win_set_break_points: u32,
    /// Points needed to win the tie-break set.
    pub win_tie_break_points: u32,
    /// 1-based index of the set played as tie-break.
    pub tie_break_number: u32,
    pub results: Vec<ModeResult>,
}

impl MatchMode {
    /// Best-of-three beach volley: sets to 21 (tie-break to 15), win by 2.
    pub fn beach_volley() -> Self {
        Self {
            name: "Beach volley".into(),
            win_set_points: 21,
            win_set_break_points: 2,
            win_tie_break_points: 15,
            tie_break_number: 3,
            results: vec![
                ModeResult {
                    won_sets: 2,
                    lost_sets: 0,
                    win_points: 3,
                    lose_points: 0,
                },
                ModeResult {
                    won_sets: 2,
                    lost_sets: 1,
                    win_points: 2,
                    lose_points: 1,
                },
                ModeResult {
                    won_sets: 1,
                    lost_sets: 1,
                    win_points: 1,
                    lose_points: 1,
                },
                ModeResult {
                    won_sets: 0,
                    lost_sets: 0,
                    win_points: 0,
                    lose_points: 0,
                },
            ],
        }
    }

    /// Determines the winner of a set and validates its score.
    ///
    /// The highest score wins; a shared top score is invalid input. The
    /// winner must reach the target (tie-break target on the tie-break set)
    /// with at least the break-point lead, and play extended past the
    /// target must end with exactly that lead.
    pub fn set_winner(&self, set: &MatchSet, is_tie_break: bool) -> TournamentResult<Uuid> {
        let mut best: Option<(Uuid, u32)> = None;
        let mut tied = false;
        for result in &set.results {
            match best {
                Some((_, top)) if result.score == top => tied = true,
                Some((_, top)) if result.score > top => {
                    best = Some((result.team_id, result.score));
                    tied = false;
                }
                None => best = Some((result.team_id, result.score)),
                _ => {}
            }
        }
        let (winner, winner_score) = best.ok_or_else(|| TournamentError::InvalidSetScore {
            set_name: set.name.clone(),
            reason: "no result recorded".into(),
        })?;
        if tied {
            return Err(TournamentError::TiedSet {
                set_name: set.name.clone(),
                score: winner_score,
            });
        }

        let target = if is_tie_break {
            self.win_tie_break_points
        } else {
            self.win_set_points
        };
        let runner_up = set
            .results
            .iter()
            .filter(|result| result.team_id != winner)
            .map(|result| result.score)
            .max()
            .unwrap_or(0);
        let lead = winner_score - runner_up;
        if winner_score < target {
            return Err(TournamentError::InvalidSetScore {
                set_name: set.name.clone(),
                reason: format!("winner reached {winner_score} of {target} points"),
            });
        }
        if lead < self.win_set_break_points {
            return Err(TournamentError::InvalidSetScore {
                set_name: set.name.clone(),
                reason: format!(
                    "winner leads by {lead}, {} required",
                    self.win_set_break_points
                ),
            });
        }
        if winner_score > target && lead != self.win_set_break_points {
            return Err(TournamentError::InvalidSetScore {
                set_name: set.name.clone(),
                reason: format!(
                    "score beyond {target} points must close with a lead of {}",
                    self.win_set_break_points
                ),
            });
        }
        Ok(winner)
    }

    /// Looks up the tournament points for each team's sets result.
    ///
    /// `sets_count` maps each team to its (won, lost) sets; an unknown
    /// combination is a configuration error naming the unexpected result.
    pub fn points(
        &self,
        match_name: &str,
        sets_count: &[(Uuid, u32, u32)],
    ) -> TournamentResult<Vec<(Uuid, u32)>> {
        let mut points = Vec::with_capacity(sets_count.len());
        for (team_id, won_sets, lost_sets) in sets_count {
            let mut matched = None;
            for result in &self.results {
                if (*won_sets, *lost_sets) == (result.won_sets, result.lost_sets) {
                    matched = Some(result.win_points);
                    break;
                }
                if (*won_sets, *lost_sets) == (result.lost_sets, result.won_sets) {
                    matched = Some(result.lose_points);
                    break;
                }
            }
            let earned = matched.ok_or_else(|| TournamentError::UnexpectedResult {
                match_name: match_name.to_string(),
                won_sets: *won_sets,
                lost_sets: *lost_sets,
                mode: self.name.clone(),
            })?;
            points.push((*team_id, earned));
        }
        Ok(points)
    }
}
