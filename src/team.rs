use crate::player::Position;
use crate::traits::Participant;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// A generated team.
///
/// Aggregates are kept in sync by [`GeneratedTeam::add_player`] and
/// [`GeneratedTeam::remove_player`], which are the only ways to change the roster.
#[derive(Serialize, Debug)]
pub struct GeneratedTeam<'a, P: Participant> {
    /// Identifier of the team (`team-1`, `team-2`, ...).
    pub id: String,
    /// Display name of the team (`Team 1`, `Team 2`, ...).
    pub name: String,

    players: Vec<&'a P>,
    total_rating: f64,
    average_rating: f64,
    position_count: IndexMap<Position, usize>,
}

impl<'a, P: Participant> GeneratedTeam<'a, P> {
    /// Creates the empty team at `index` (0-based).
    pub fn new(index: usize) -> GeneratedTeam<'a, P> {
        GeneratedTeam {
            id: format!("team-{}", index + 1),
            name: format!("Team {}", index + 1),
            players: Vec::new(),
            total_rating: 0.0,
            average_rating: 0.0,
            position_count: Position::ALL.into_iter().map(|p| (p, 0)).collect(),
        }
    }

    /// Creates `number` empty teams.
    #[inline]
    pub(crate) fn empty_teams(number: usize) -> Vec<GeneratedTeam<'a, P>> {
        (0..number).map(GeneratedTeam::new).collect()
    }

    /// Adds a player and updates the aggregates.
    pub fn add_player(&mut self, player: &'a P) {
        self.total_rating += player.rating().get();
        *self.position_count.entry(player.position()).or_insert(0) += 1;
        self.players.push(player);
        self.update_average();
    }

    /// Removes the player with the given id and updates the aggregates.
    ///
    /// Returns [`None`] if the player is not part of this team.
    pub fn remove_player(&mut self, id: &str) -> Option<&'a P> {
        let index = self.players.iter().position(|p| p.id() == id)?;
        let player = self.players.remove(index);
        if let Some(count) = self.position_count.get_mut(&player.position()) {
            *count = count.saturating_sub(1);
        }
        // Recomputed instead of subtracted, so removals don't accumulate rounding errors
        self.total_rating = self.players.iter().map(|p| p.rating().get()).sum();
        self.update_average();
        Some(player)
    }

    #[inline]
    fn update_average(&mut self) {
        self.average_rating = if self.players.is_empty() {
            0.0
        } else {
            self.total_rating / self.players.len() as f64
        };
    }

    #[inline]
    pub fn players(&self) -> &[&'a P] {
        &self.players
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Sum of the ratings of the players.
    #[inline]
    pub fn total_rating(&self) -> f64 {
        self.total_rating
    }

    /// Average rating of the players, `0` if the team is empty.
    #[inline]
    pub fn average_rating(&self) -> f64 {
        self.average_rating
    }

    /// Number of players playing in `position`.
    #[inline]
    pub fn position_count(&self, position: Position) -> usize {
        self.position_count.get(&position).copied().unwrap_or(0)
    }

    /// Number of players per position. Every position is present, in [`Position::ALL`] order.
    #[inline]
    pub fn position_counts(&self) -> &IndexMap<Position, usize> {
        &self.position_count
    }
}

impl<P: Participant> Clone for GeneratedTeam<'_, P> {
    #[inline]
    fn clone(&self) -> Self {
        GeneratedTeam {
            id: self.id.clone(),
            name: self.name.clone(),
            players: self.players.clone(),
            total_rating: self.total_rating,
            average_rating: self.average_rating,
            position_count: self.position_count.clone(),
        }
    }
}

impl<P: Participant> Display for GeneratedTeam<'_, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} players, total {}, avg {:.1}",
            self.name,
            self.players.len(),
            self.total_rating,
            self.average_rating
        )?;
        let positions = self
            .position_count
            .iter()
            .filter(|(_, &count)| count > 0)
            .map(|(position, count)| format!("{count} {position}"))
            .join(", ");
        if positions.is_empty() {
            write!(f, ")")
        } else {
            write!(f, ": {positions})")
        }
    }
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum MoveError {
    /// There's no team at the given index.
    #[error("there's no team at index {0}")]
    UnknownTeam(usize),
    /// The player isn't part of the source team.
    #[error("player {0} is not part of the source team")]
    UnknownPlayer(String),
    /// Source and destination are the same team.
    #[error("cannot move a player to the team it's already in")]
    SameTeam,
}

/// Manually moves a player from one generated team to another, updating both teams' aggregates.
///
/// The teams are not re-balanced afterwards.
pub fn move_player<'a, P: Participant>(
    teams: &mut [GeneratedTeam<'a, P>],
    from: usize,
    player_id: &str,
    to: usize,
) -> Result<(), MoveError> {
    if from >= teams.len() {
        return Err(MoveError::UnknownTeam(from));
    }
    if to >= teams.len() {
        return Err(MoveError::UnknownTeam(to));
    }
    if from == to {
        return Err(MoveError::SameTeam);
    }

    let player = teams[from]
        .remove_player(player_id)
        .ok_or_else(|| MoveError::UnknownPlayer(player_id.to_owned()))?;
    teams[to].add_player(player);

    tracing::debug!(player = player_id, from, to, "moved player between teams");
    Ok(())
}
