use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    court::Court,
    match_mode::MatchMode,
    matches::{Match, MatchSet, MatchState},
    scheduler,
    stats::{sort_standings, StandingsRow, TeamStats},
    team::{Component, Team},
    TournamentError, TournamentResult,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TournamentState {
    Draft,
    Started,
    Done,
}

/// A tournament: registered components grouped into teams, courts to play
/// on, the ruleset, and the scheduled matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: Uuid,
    pub name: String,
    pub state: TournamentState,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Competitive play length of one match.
    pub match_duration_minutes: i64,
    /// Buffer booked on the court before competitive play.
    #[serde(default)]
    pub warm_up_minutes: i64,
    /// Teams per match.
    pub match_teams_nbr: u32,
    #[serde(default)]
    pub randomize_matches: bool,
    pub mode: MatchMode,
    pub components: Vec<Component>,
    pub teams: Vec<Team>,
    pub courts: Vec<Court>,
    pub matches: Vec<Match>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            state: TournamentState::Draft,
            start_time: None,
            end_time: None,
            match_duration_minutes: 60,
            warm_up_minutes: 0,
            match_teams_nbr: 2,
            randomize_matches: false,
            mode: MatchMode::beach_volley(),
            components: Vec::new(),
            teams: Vec::new(),
            courts: Vec::new(),
            matches: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn add_component(&mut self, component: Component) -> Uuid {
        let id = component.id;
        self.components.push(component);
        self.touch();
        id
    }

    pub fn component(&self, id: Uuid) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn component_by_name(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn add_court(&mut self, court: Court) -> Uuid {
        let id = court.id;
        self.courts.push(court);
        self.touch();
        id
    }

    pub fn court(&self, id: Uuid) -> Option<&Court> {
        self.courts.iter().find(|c| c.id == id)
    }

    /// Registers a team. Every component must already be registered in the
    /// tournament and team names are unique within it.
    pub fn add_team(&mut self, team: Team) -> TournamentResult<Uuid> {
        if let Some(missing) = team
            .component_ids
            .iter()
            .find(|id| self.component(**id).is_none())
        {
            return Err(TournamentError::UnknownComponent(*missing));
        }
        if self.teams.iter().any(|existing| existing.name == team.name) {
            return Err(TournamentError::DuplicateTeamName {
                tournament: self.name.clone(),
                name: team.name,
            });
        }
        let id = team.id;
        self.teams.push(team);
        self.touch();
        Ok(id)
    }

    pub fn team(&self, id: Uuid) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn team_by_name(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    pub fn match_by_id(&self, id: Uuid) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn match_by_id_mut(&mut self, id: Uuid) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Every component playing in any of `team_ids`.
    pub fn components_of_teams(&self, team_ids: &[Uuid]) -> HashSet<Uuid> {
        team_ids
            .iter()
            .filter_map(|id| self.team(*id))
            .flat_map(|team| team.component_ids.iter().copied())
            .collect()
    }

    /// Display label of a pairing, e.g. `Alpha vs Beta`.
    pub fn pairing_label(&self, team_ids: &[Uuid]) -> String {
        team_ids
            .iter()
            .map(|id| {
                self.team(*id)
                    .map(|team| team.name.clone())
                    .unwrap_or_else(|| id.to_string())
            })
            .collect::<Vec<_>>()
            .join(" vs ")
    }

    pub fn match_label(&self, match_: &Match) -> String {
        self.pairing_label(&match_.team_ids)
    }

    /// Number of matches a full generation produces: C(teams, group size).
    pub fn match_count_estimated(&self) -> u64 {
        let n = self.teams.len() as u64;
        let k = self.match_teams_nbr as u64;
        if k == 0 || k > n {
            return 0;
        }
        let mut count = 1u64;
        for step in 0..k {
            count = count * (n - step) / (step + 1);
        }
        count
    }

    /// Registers a match by hand, outside the generator.
    ///
    /// Rejects teams of other tournaments and pairings whose teams share a
    /// component.
    pub fn add_match(
        &mut self,
        team_ids: Vec<Uuid>,
        court_id: Uuid,
        time_start: DateTime<Utc>,
        time_end: DateTime<Utc>,
    ) -> TournamentResult<Uuid> {
        let label = self.pairing_label(&team_ids);
        if team_ids.iter().any(|id| self.team(*id).is_none()) {
            return Err(TournamentError::CrossTournamentTeams { match_name: label });
        }
        for (index, first) in team_ids.iter().enumerate() {
            for second in &team_ids[index + 1..] {
                let (Some(a), Some(b)) = (self.team(*first), self.team(*second)) else {
                    continue;
                };
                if a.shares_component_with(b) {
                    return Err(TournamentError::CommonComponents { match_name: label });
                }
            }
        }
        let match_ = Match::new(team_ids, court_id, time_start, time_end);
        let id = match_.id;
        self.matches.push(match_);
        self.touch();
        Ok(id)
    }

    /// Regenerates the schedule: done matches are kept as played, draft
    /// matches are replaced by a fresh generation. Returns the number of
    /// matches created.
    pub fn generate_matches(&mut self) -> TournamentResult<usize> {
        let generated = scheduler::generate_matches(self)?;
        let created = generated.len();
        self.matches.retain(|m| m.state == MatchState::Done);
        self.matches.extend(generated);
        if self.state == TournamentState::Draft {
            self.state = TournamentState::Started;
        }
        self.touch();
        tracing::info!(tournament = %self.name, matches = created, "schedule generated");
        Ok(created)
    }

    pub fn record_set(&mut self, match_id: Uuid, set: MatchSet) -> TournamentResult<()> {
        let match_ = self
            .match_by_id_mut(match_id)
            .ok_or(TournamentError::UnknownMatch(match_id))?;
        match_.record_set(set);
        self.touch();
        Ok(())
    }

    /// Closes a match: validates every recorded set and the overall result
    /// against the mode, then returns the winner (an override, when given,
    /// must be a participating team).
    pub fn done(
        &mut self,
        match_id: Uuid,
        winner_override: Option<Uuid>,
    ) -> TournamentResult<Option<Uuid>> {
        let label = {
            let match_ = self
                .match_by_id(match_id)
                .ok_or(TournamentError::UnknownMatch(match_id))?;
            self.match_label(match_)
        };
        let mode = self.mode.clone();
        let match_ = self
            .match_by_id_mut(match_id)
            .ok_or(TournamentError::UnknownMatch(match_id))?;
        if let Some(team_id) = winner_override {
            if !match_.contains_team(team_id) {
                return Err(TournamentError::WinnerNotPlaying { match_name: label });
            }
        }
        let previous = match_.state;
        match_.state = MatchState::Done;
        let validated = match_
            .winner(&mode)
            .and_then(|winner| {
                // Surfaces unexpected set results before the state sticks.
                TeamStats::from_match(match_, &label, &mode)?;
                Ok(winner)
            });
        match validated {
            Ok(winner) => {
                if self.matches.iter().all(|m| m.state == MatchState::Done) {
                    self.state = TournamentState::Done;
                }
                self.touch();
                Ok(winner_override.or(winner))
            }
            Err(err) => {
                if let Some(match_) = self.match_by_id_mut(match_id) {
                    match_.state = previous;
                }
                Err(err)
            }
        }
    }

    /// Ranking over the done matches, every registered team included.
    pub fn standings(&self) -> TournamentResult<Vec<StandingsRow>> {
        let mut rows: Vec<StandingsRow> = self
            .teams
            .iter()
            .map(|team| StandingsRow::new(team.id))
            .collect();
        for match_ in self.matches.iter().filter(|m| m.state == MatchState::Done) {
            let label = self.match_label(match_);
            for stats in TeamStats::from_match(match_, &label, &self.mode)? {
                if let Some(row) = rows.iter_mut().find(|row| row.team_id == stats.team_id) {
                    row.absorb(&stats);
                }
            }
        }
        sort_standings(&mut rows);
        Ok(rows)
    }
}
