//! Scheduling and scoring flows through the public tournament API.

use chrono::{Duration, TimeZone, Utc};
use splitmatch::tournament::{
    Component, Court, MatchSet, MatchState, Team, Tournament, TournamentError,
};

fn tournament_with_teams(count: usize) -> Tournament {
    let mut tournament = Tournament::new("City Open");
    tournament.start_time = Some(Utc.with_ymd_and_hms(2024, 7, 13, 9, 0, 0).unwrap());
    tournament.match_duration_minutes = 45;
    tournament.warm_up_minutes = 15;
    for index in 0..count {
        let player = tournament.add_component(Component::new(format!("Player {index}")));
        tournament
            .add_team(Team::new(format!("Team {}", index + 1), vec![player]))
            .unwrap();
    }
    tournament
}

#[test]
fn three_teams_one_court_yields_three_sequential_matches() {
    let mut tournament = tournament_with_teams(3);
    tournament.add_court(Court::new("Center"));

    let created = tournament.generate_matches().unwrap();
    assert_eq!(created, 3);
    assert_eq!(created as u64, tournament.match_count_estimated());

    let warm_up = Duration::minutes(15);
    for (index, first) in tournament.matches.iter().enumerate() {
        for second in &tournament.matches[index + 1..] {
            assert!(
                !first.overlaps(second.time_start - warm_up, second.time_end, warm_up),
                "single court cannot host overlapping matches"
            );
        }
    }
    // Slots are 60 minutes (45 play + 15 warm-up), play starts after warm-up.
    let mut starts: Vec<_> = tournament.matches.iter().map(|m| m.time_start).collect();
    starts.sort();
    assert_eq!(starts[0], tournament.start_time.unwrap() + warm_up);
    assert_eq!(starts[1] - starts[0], Duration::minutes(60));
}

#[test]
fn scheduling_without_a_start_time_names_the_tournament() {
    let mut tournament = tournament_with_teams(2);
    tournament.start_time = None;
    tournament.add_court(Court::new("Center"));
    let err = tournament.generate_matches().unwrap_err();
    match err {
        TournamentError::MissingStartTime { tournament } => {
            assert_eq!(tournament, "City Open");
        }
        other => panic!("expected MissingStartTime, got {other:?}"),
    }
}

#[test]
fn scheduling_without_a_court_names_the_tournament() {
    let mut tournament = tournament_with_teams(2);
    let err = tournament.generate_matches().unwrap_err();
    match err {
        TournamentError::MissingCourt { tournament } => {
            assert_eq!(tournament, "City Open");
        }
        other => panic!("expected MissingCourt, got {other:?}"),
    }
}

#[test]
fn regeneration_keeps_done_matches_and_replaces_drafts() {
    let mut tournament = tournament_with_teams(3);
    tournament.add_court(Court::new("Center"));
    tournament.generate_matches().unwrap();

    let first = tournament.matches[0].id;
    let (a, b) = (
        tournament.matches[0].team_ids[0],
        tournament.matches[0].team_ids[1],
    );
    tournament
        .record_set(first, MatchSet::new("Set 1", &[(a, 21), (b, 15)]))
        .unwrap();
    tournament
        .record_set(first, MatchSet::new("Set 2", &[(a, 21), (b, 18)]))
        .unwrap();
    tournament.done(first, None).unwrap();

    let created = tournament.generate_matches().unwrap();
    assert_eq!(created, 2);
    assert_eq!(tournament.matches.len(), 3);
    let done: Vec<_> = tournament
        .matches
        .iter()
        .filter(|m| m.state == MatchState::Done)
        .collect();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].id, first);
}

#[test]
fn full_round_robin_produces_a_ranked_table() {
    let mut tournament = tournament_with_teams(3);
    tournament.add_court(Court::new("Center"));
    tournament.generate_matches().unwrap();

    // Team 1 beats everyone 2-0, Team 2 beats Team 3 2-1.
    let team_ids: Vec<_> = tournament.teams.iter().map(|t| t.id).collect();
    let team = |n: usize| team_ids[n - 1];
    let results = [
        (team(1), team(2), vec![(21, 12), (21, 15)]),
        (team(1), team(3), vec![(21, 10), (21, 19)]),
        (team(2), team(3), vec![(21, 17), (19, 21), (15, 11)]),
    ];
    for (winner, loser, sets) in results {
        let match_id = tournament
            .matches
            .iter()
            .find(|m| m.contains_team(winner) && m.contains_team(loser))
            .unwrap()
            .id;
        for (index, (won, lost)) in sets.iter().enumerate() {
            tournament
                .record_set(
                    match_id,
                    MatchSet::new(
                        format!("Set {}", index + 1),
                        &[(winner, *won), (loser, *lost)],
                    ),
                )
                .unwrap();
        }
        let declared = tournament.done(match_id, None).unwrap();
        assert_eq!(declared, Some(winner));
    }

    let standings = tournament.standings().unwrap();
    assert_eq!(standings[0].team_id, team(1));
    assert_eq!(standings[0].tournament_points, 6);
    assert_eq!(standings[1].team_id, team(2));
    assert_eq!(standings[1].tournament_points, 2);
    assert_eq!(standings[2].team_id, team(3));
    assert_eq!(standings[2].tournament_points, 1);
}

#[test]
fn tied_sets_block_match_completion() {
    let mut tournament = tournament_with_teams(2);
    tournament.add_court(Court::new("Center"));
    tournament.generate_matches().unwrap();

    let match_id = tournament.matches[0].id;
    let (a, b) = (
        tournament.matches[0].team_ids[0],
        tournament.matches[0].team_ids[1],
    );
    tournament
        .record_set(match_id, MatchSet::new("Set 1", &[(a, 21), (b, 21)]))
        .unwrap();
    let err = tournament.done(match_id, None).unwrap_err();
    assert!(matches!(err, TournamentError::TiedSet { score: 21, .. }));
    assert_eq!(tournament.matches[0].state, MatchState::Draft);
}

#[test]
fn signup_import_feeds_the_scheduler() {
    let mut tournament = Tournament::new("Beach Cup");
    tournament.start_time = Some(Utc.with_ymd_and_hms(2024, 8, 3, 10, 0, 0).unwrap());
    tournament.add_court(Court::new("Sand 1"));
    let mut tournaments = vec![tournament];

    let data = "\
Tournament,Team name,Player 1,Player 2
Beach Cup,Sunsetters,Ana,Bruno
Beach Cup,Diggers,Carla,Dinis
Beach Cup,Netcrossers,Eva,Filipe
";
    let registered =
        splitmatch::tournament::signup::import_signups(&mut tournaments, data).unwrap();
    assert_eq!(registered, 3);

    let tournament = &mut tournaments[0];
    let created = tournament.generate_matches().unwrap();
    assert_eq!(created, 3);
}
