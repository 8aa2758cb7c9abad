use crate::{MIN_PLAYERS_PER_TEAM, MIN_TEAMS};
use thiserror::Error;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum FeasibilityError {
    /// Not enough players to give every team [`MIN_PLAYERS_PER_TEAM`] players.
    #[error(
        "need at least {needed} players to create {teams} teams with minimum {min} players each ({provided} were provided)",
        min = MIN_PLAYERS_PER_TEAM
    )]
    NotEnoughPlayers {
        needed: usize,
        provided: usize,
        teams: usize,
    },
    /// Less than [`MIN_TEAMS`] teams were requested.
    #[error("must create at least {min} teams ({0} requested)", min = MIN_TEAMS)]
    NotEnoughTeams(usize),
    /// More teams were requested than the players can fill.
    #[error("cannot create {teams} teams with only {players} players")]
    TooManyTeams { teams: usize, players: usize },
}

/// Checks whether `player_count` players can be split into `requested_teams` teams.
///
/// Returns every violated rule, an empty list means the split is feasible.
pub fn feasibility_errors(player_count: usize, requested_teams: usize) -> Vec<FeasibilityError> {
    let mut errors = Vec::new();

    let needed = requested_teams.saturating_mul(MIN_PLAYERS_PER_TEAM);
    if player_count < needed {
        errors.push(FeasibilityError::NotEnoughPlayers {
            needed,
            provided: player_count,
            teams: requested_teams,
        });
    }

    if requested_teams < MIN_TEAMS {
        errors.push(FeasibilityError::NotEnoughTeams(requested_teams));
    }

    // Same rule as above seen from the teams side, reported separately
    if requested_teams > player_count / MIN_PLAYERS_PER_TEAM {
        errors.push(FeasibilityError::TooManyTeams {
            teams: requested_teams,
            players: player_count,
        });
    }

    errors
}

/// Checks whether `player_count` players can be split into `requested_teams` teams.
///
/// Returns a human-readable message for each violated rule.
/// An empty list means the split is feasible.
#[inline]
pub fn validate_feasibility(player_count: usize, requested_teams: usize) -> Vec<String> {
    feasibility_errors(player_count, requested_teams)
        .iter()
        .map(ToString::to_string)
        .collect()
}
