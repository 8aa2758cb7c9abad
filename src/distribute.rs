use crate::generator::TeamGenError;
use crate::player::Position;
use crate::shuffle::shuffled;
use crate::team::GeneratedTeam;
use crate::traits::Participant;
use rand::Rng;
use std::cmp::Ordering;
use std::num::NonZero;

/// How players are distributed among the teams.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Strategy {
    /// Player `i` goes to team `i % teams`.
    RoundRobin,
    /// Players are sorted by descending rating and dealt 1, 2, ..., k, k, ..., 2, 1, 1, 2, ...
    Snake,
    /// Scarce-position players are dealt one per team first, then every other player goes to the
    /// team with fewest players in their position (see [`RecipientOrder`]).
    Positional {
        /// Whether players of the same position are handed out from the highest rated one.
        rating_sorted: bool,
    },
}

impl Strategy {
    /// Picks the strategy for the given balancing options.
    ///
    /// Position balancing takes priority: when both are requested, rating only decides the order
    /// players of the same position are handed out in.
    #[inline]
    pub const fn from_flags(consider_rating: bool, consider_position: bool) -> Strategy {
        match (consider_rating, consider_position) {
            (rating_sorted, true) => Strategy::Positional { rating_sorted },
            (true, false) => Strategy::Snake,
            (false, false) => Strategy::RoundRobin,
        }
    }
}

/// Decides which team receives the next player of a position.
pub trait RecipientOrder {
    /// Orders two candidate teams for receiving a player playing in `position`.
    /// The [`Ordering::Less`] team receives the player first.
    fn compare<P: Participant>(
        &self,
        a: &GeneratedTeam<'_, P>,
        b: &GeneratedTeam<'_, P>,
        position: Position,
    ) -> Ordering;
}

/// Prefers the team with fewest players in the position, then the one with the lowest total rating.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct WeakestRecipient;

impl RecipientOrder for WeakestRecipient {
    #[inline]
    fn compare<P: Participant>(
        &self,
        a: &GeneratedTeam<'_, P>,
        b: &GeneratedTeam<'_, P>,
        position: Position,
    ) -> Ordering {
        a.position_count(position)
            .cmp(&b.position_count(position))
            .then(a.total_rating().total_cmp(&b.total_rating()))
    }
}

impl<O: RecipientOrder> RecipientOrder for &O {
    #[inline]
    fn compare<P: Participant>(
        &self,
        a: &GeneratedTeam<'_, P>,
        b: &GeneratedTeam<'_, P>,
        position: Position,
    ) -> Ordering {
        (**self).compare(a, b, position)
    }
}

/// Distributes `players` among `number_of_teams` new teams.
///
/// `players` is expected to be already shuffled: strategies only reorder it by rating or position,
/// so players that compare equal keep the provided order.
pub fn distribute<'a, P: Participant, O: RecipientOrder, R: Rng>(
    players: &[&'a P],
    number_of_teams: NonZero<usize>,
    strategy: Strategy,
    order: &O,
    rng: &mut R,
) -> Result<Vec<GeneratedTeam<'a, P>>, TeamGenError> {
    let mut teams = GeneratedTeam::empty_teams(number_of_teams.get());

    match strategy {
        Strategy::RoundRobin => round_robin(&mut teams, players.iter().copied()),
        Strategy::Snake => {
            let mut players = players.to_vec();
            sort_by_rating(&mut players);
            snake(&mut teams, players);
        }
        Strategy::Positional { rating_sorted } => {
            positional(&mut teams, players, rating_sorted, order, rng)?
        }
    }

    Ok(teams)
}

fn round_robin<'a, P: Participant>(
    teams: &mut [GeneratedTeam<'a, P>],
    players: impl IntoIterator<Item = &'a P>,
) {
    for (player, index) in players.into_iter().zip((0..teams.len()).cycle()) {
        teams[index].add_player(player);
    }
}

fn snake<'a, P: Participant>(
    teams: &mut [GeneratedTeam<'a, P>],
    players: impl IntoIterator<Item = &'a P>,
) {
    let forward = 0..teams.len();
    let backward = (0..teams.len()).rev();
    for (player, index) in players.into_iter().zip(forward.chain(backward).cycle()) {
        teams[index].add_player(player);
    }
}

fn positional<'a, P: Participant, O: RecipientOrder, R: Rng>(
    teams: &mut [GeneratedTeam<'a, P>],
    players: &[&'a P],
    rating_sorted: bool,
    order: &O,
    rng: &mut R,
) -> Result<(), TeamGenError> {
    let (scarce, others): (Vec<&'a P>, Vec<&'a P>) = players
        .iter()
        .copied()
        .partition(|p| p.position().is_scarce());

    round_robin(teams, shuffled(&scarce, rng));

    for position in Position::ALL.into_iter().filter(|p| !p.is_scarce()) {
        let mut group: Vec<&'a P> = others
            .iter()
            .copied()
            .filter(|p| p.position() == position)
            .collect();
        if rating_sorted {
            sort_by_rating(&mut group);
        }

        for player in group {
            let recipient = (0..teams.len())
                .min_by(|&a, &b| order.compare(&teams[a], &teams[b], position))
                .ok_or(TeamGenError::InternalError("no team can receive the player"))?;
            teams[recipient].add_player(player);
        }
    }

    Ok(())
}

/// Sorts by descending rating, keeping the current order between equally rated players.
#[inline]
fn sort_by_rating<P: Participant>(players: &mut [&P]) {
    players.sort_by(|a, b| b.rating().get().total_cmp(&a.rating().get()));
}
