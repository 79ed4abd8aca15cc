//! Greedy timetabling of round-robin matches.
//!
//! Every pairing of teams is placed on the earliest feasible court/time
//! slot. Feasibility is a pure check over the in-memory bookings; a failed
//! placement just moves on to the next court or time. Only configuration
//! problems and a pairing with no feasible slot at all are fatal.

use std::collections::{BTreeSet, HashSet, VecDeque};

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use uuid::Uuid;

use super::{
    matches::{Match, MatchState},
    tournament::Tournament,
    TournamentError, TournamentResult,
};

struct Booking {
    court_id: Uuid,
    slot_start: DateTime<Utc>,
    slot_end: DateTime<Utc>,
    components: HashSet<Uuid>,
}

impl Booking {
    fn overlaps_time(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.slot_end && self.slot_start < end
    }
}

/// Generates matches for every pairing not already played.
///
/// Done matches keep their bookings and their pairings are not regenerated;
/// draft matches are ignored (the caller replaces them). Returns the new
/// draft matches, or a configuration error, or
/// [`TournamentError::Unschedulable`] naming the first pairing that fits
/// nowhere in the tournament window.
pub fn generate_matches(tournament: &Tournament) -> TournamentResult<Vec<Match>> {
    let start = tournament
        .start_time
        .ok_or_else(|| TournamentError::MissingStartTime {
            tournament: tournament.name.clone(),
        })?;
    if tournament.courts.is_empty() {
        return Err(TournamentError::MissingCourt {
            tournament: tournament.name.clone(),
        });
    }
    if tournament.match_duration_minutes <= 0 {
        return Err(TournamentError::MissingDuration {
            tournament: tournament.name.clone(),
        });
    }
    let group_size = tournament.match_teams_nbr as usize;
    if tournament.match_teams_nbr < 2 || group_size > tournament.teams.len() {
        return Err(TournamentError::InvalidTeamsNumber {
            tournament: tournament.name.clone(),
            number: tournament.match_teams_nbr,
        });
    }

    let warm_up = Duration::minutes(tournament.warm_up_minutes.max(0));
    let slot_length = warm_up + Duration::minutes(tournament.match_duration_minutes);

    let done_matches: Vec<&Match> = tournament
        .matches
        .iter()
        .filter(|m| m.state == MatchState::Done)
        .collect();
    let done_pairings: HashSet<Vec<Uuid>> = done_matches
        .iter()
        .map(|m| sorted_ids(&m.team_ids))
        .collect();

    let mut bookings: Vec<Booking> = done_matches
        .iter()
        .map(|m| Booking {
            court_id: m.court_id,
            slot_start: m.time_start - warm_up,
            slot_end: m.time_end,
            components: tournament.components_of_teams(&m.team_ids),
        })
        .collect();

    let team_ids: Vec<Uuid> = tournament.teams.iter().map(|team| team.id).collect();
    let mut pairings: Vec<Vec<Uuid>> = combinations(&team_ids, group_size)
        .into_iter()
        .filter(|pairing| !done_pairings.contains(&sorted_ids(pairing)))
        .filter(|pairing| !has_internal_overlap(tournament, pairing))
        .collect();
    if tournament.randomize_matches {
        pairings.shuffle(&mut rand::thread_rng());
    }
    let mut worklist: VecDeque<Vec<Uuid>> = pairings.into();

    let mut candidate_times: BTreeSet<DateTime<Utc>> = BTreeSet::new();
    candidate_times.insert(start);
    for court in &tournament.courts {
        if let Some(available_from) = court.availability_start {
            if available_from > start {
                candidate_times.insert(available_from);
            }
        }
    }
    for booking in &bookings {
        candidate_times.insert(booking.slot_end);
    }

    let mut generated = Vec::new();
    while let Some(pairing) = worklist.pop_front() {
        let components = tournament.components_of_teams(&pairing);
        let mut placed = None;

        'times: for slot_start in candidate_times.iter().copied() {
            let slot_end = slot_start + slot_length;
            if let Some(window_end) = tournament.end_time {
                if slot_end > window_end {
                    // Times are ascending: nothing later can fit either.
                    break;
                }
            }
            for court in &tournament.courts {
                if !court.available_during(slot_start, slot_end) {
                    continue;
                }
                let conflict = bookings.iter().any(|booking| {
                    booking.overlaps_time(slot_start, slot_end)
                        && (booking.court_id == court.id
                            || !booking.components.is_disjoint(&components))
                });
                if !conflict {
                    placed = Some((court.id, slot_start, slot_end));
                    break 'times;
                }
            }
        }

        let (court_id, slot_start, slot_end) = placed.ok_or_else(|| {
            TournamentError::Unschedulable {
                pairing: tournament.pairing_label(&pairing),
            }
        })?;

        tracing::debug!(
            pairing = %tournament.pairing_label(&pairing),
            start = %slot_start,
            "scheduled match"
        );
        generated.push(Match::new(
            pairing.clone(),
            court_id,
            slot_start + warm_up,
            slot_end,
        ));
        bookings.push(Booking {
            court_id,
            slot_start,
            slot_end,
            components: components.clone(),
        });
        candidate_times.insert(slot_end);

        // Send pairings sharing a component to the back of the worklist so
        // the same people do not play back-to-back.
        let (rested, busy): (Vec<_>, Vec<_>) = worklist.drain(..).partition(|candidate| {
            tournament
                .components_of_teams(candidate)
                .is_disjoint(&components)
        });
        worklist.extend(rested);
        worklist.extend(busy);
    }

    Ok(generated)
}

fn sorted_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut sorted = ids.to_vec();
    sorted.sort();
    sorted
}

fn has_internal_overlap(tournament: &Tournament, pairing: &[Uuid]) -> bool {
    for (index, first) in pairing.iter().enumerate() {
        for second in &pairing[index + 1..] {
            let (Some(a), Some(b)) = (tournament.team(*first), tournament.team(*second)) else {
                continue;
            };
            if a.shares_component_with(b) {
                return true;
            }
        }
    }
    false
}

/// All unique `k`-element combinations of `items`, in lexicographic order
/// of the input positions.
pub fn combinations(items: &[Uuid], k: usize) -> Vec<Vec<Uuid>> {
    fn recurse(items: &[Uuid], k: usize, offset: usize, current: &mut Vec<Uuid>, out: &mut Vec<Vec<Uuid>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        let remaining = k - current.len();
        for index in offset..=items.len().saturating_sub(remaining) {
            current.push(items[index]);
            recurse(items, k, index + 1, current, out);
            current.pop();
        }
    }

    let mut out = Vec::new();
    if k == 0 || k > items.len() {
        return out;
    }
    let mut current = Vec::with_capacity(k);
    recurse(items, k, 0, &mut current, &mut out);
    out
}
