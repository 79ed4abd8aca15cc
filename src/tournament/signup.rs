//! Tournament signup import.
//!
//! One CSV row per team: the tournament it signs up for, the team name, and
//! one player per `Player N` column. Players are matched by name and created
//! when unknown.

use super::{team::Component, team::Team, tournament::Tournament, TournamentError, TournamentResult};

/// Registers the teams described by `data` into `tournaments`.
///
/// Expects a header with `Tournament`, `Team name` and any number of
/// `Player ...` columns; blank player cells are skipped. Returns the number
/// of teams registered.
pub fn import_signups(tournaments: &mut [Tournament], data: &str) -> TournamentResult<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let headers = reader
        .headers()
        .map_err(|err| TournamentError::Csv(err.to_string()))?
        .clone();
    let column = |name: &str| headers.iter().position(|header| header == name);
    let tournament_column = column("Tournament")
        .ok_or_else(|| TournamentError::Csv("missing `Tournament` column".into()))?;
    let team_column = column("Team name")
        .ok_or_else(|| TournamentError::Csv("missing `Team name` column".into()))?;
    let player_columns: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, header)| header.starts_with("Player"))
        .map(|(index, _)| index)
        .collect();
    if player_columns.is_empty() {
        return Err(TournamentError::Csv("missing `Player` columns".into()));
    }

    let mut registered = 0;
    for (row_number, record) in reader.records().enumerate() {
        let record = record.map_err(|err| {
            TournamentError::Csv(format!("row {}: {err}", row_number + 2))
        })?;
        let cell = |index: usize| record.get(index).unwrap_or("").trim();

        let tournament_name = cell(tournament_column);
        let tournament = tournaments
            .iter_mut()
            .find(|t| t.name == tournament_name)
            .ok_or_else(|| TournamentError::UnknownTournament(tournament_name.to_string()))?;

        let team_name = cell(team_column);
        if team_name.is_empty() {
            return Err(TournamentError::Csv(format!(
                "row {}: empty team name",
                row_number + 2
            )));
        }

        let mut component_ids = Vec::new();
        for &player_column in &player_columns {
            let player = cell(player_column);
            if player.is_empty() {
                continue;
            }
            let component_id = match tournament.component_by_name(player) {
                Some(component) => component.id,
                None => tournament.add_component(Component::new(player)),
            };
            component_ids.push(component_id);
        }
        if component_ids.is_empty() {
            return Err(TournamentError::Csv(format!(
                "row {}: team `{team_name}` has no players",
                row_number + 2
            )));
        }

        tournament.add_team(Team::new(team_name, component_ids))?;
        registered += 1;
    }
    tracing::info!(teams = registered, "signup import finished");
    Ok(registered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_teams_and_creates_players_once() {
        let mut tournaments = vec![Tournament::new("Spring Open")];
        let data = "\
Tournament,Team name,Player 1,Player 2
Spring Open,Aces,Alex,Sam
Spring Open,Blockers,Robin,Alex
";
        let registered = import_signups(&mut tournaments, data).unwrap();
        assert_eq!(registered, 2);
        let tournament = &tournaments[0];
        assert_eq!(tournament.teams.len(), 2);
        // Alex plays in both teams but exists once.
        assert_eq!(tournament.components.len(), 3);
        let alex = tournament.component_by_name("Alex").unwrap().id;
        assert!(tournament.teams.iter().all(|t| t.component_ids.len() == 2));
        assert!(tournament
            .teams
            .iter()
            .all(|t| t.component_ids.contains(&alex)));
    }

    #[test]
    fn blank_player_cells_are_skipped() {
        let mut tournaments = vec![Tournament::new("Spring Open")];
        let data = "\
Tournament,Team name,Player 1,Player 2,Player 3
Spring Open,Solo,Alex,,
";
        import_signups(&mut tournaments, data).unwrap();
        assert_eq!(tournaments[0].teams[0].component_ids.len(), 1);
    }

    #[test]
    fn unknown_tournament_is_an_error() {
        let mut tournaments = vec![Tournament::new("Spring Open")];
        let data = "\
Tournament,Team name,Player 1
Winter Cup,Aces,Alex
";
        let err = import_signups(&mut tournaments, data).unwrap_err();
        assert!(matches!(err, TournamentError::UnknownTournament(name) if name == "Winter Cup"));
    }

    #[test]
    fn duplicate_team_name_rejects_the_import() {
        let mut tournaments = vec![Tournament::new("Spring Open")];
        let data = "\
Tournament,Team name,Player 1
Spring Open,Aces,Alex
Spring Open,Aces,Sam
";
        let err = import_signups(&mut tournaments, data).unwrap_err();
        assert!(matches!(err, TournamentError::DuplicateTeamName { .. }));
    }
}
