use crate::traits::Participant;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Playing position of a player.
///
/// The set is closed: every per-position bookkeeping iterates [`Position::ALL`].
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    /// Every position, in distribution priority order.
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    /// Returns whether this is the scarce position, dealt one per team before anything else.
    #[inline]
    pub const fn is_scarce(self) -> bool {
        matches!(self, Position::Goalkeeper)
    }

    /// Short label of the position.
    #[inline]
    pub const fn label(self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Copy, Clone, PartialEq)]
#[non_exhaustive]
pub enum PlayerError {
    /// The rating is outside [`Rating::MIN`]..=[`Rating::MAX`].
    #[error("rating must be between 0 and 5 (got {0})")]
    RatingOutOfRange(f64),
    /// The rating is NaN or infinite.
    #[error("rating must be a finite number")]
    NotFinite,
}

/// A skill rating, always in the range [`Rating::MIN`]..=[`Rating::MAX`].
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, PartialOrd)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
    /// Lowest possible rating.
    pub const MIN: f64 = 0.0;
    /// Highest possible rating.
    pub const MAX: f64 = 5.0;

    #[inline]
    pub fn new(value: f64) -> Result<Rating, PlayerError> {
        if !value.is_finite() {
            return Err(PlayerError::NotFinite);
        }
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(PlayerError::RatingOutOfRange(value));
        }
        Ok(Rating(value))
    }

    #[inline(always)]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Rating {
    type Error = PlayerError;

    #[inline]
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for f64 {
    #[inline(always)]
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A player record, as stored by the roster.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub rating: Rating,
}

impl Player {
    /// Creates a new player, checking that `rating` is a valid [`Rating`].
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: Position,
        rating: f64,
    ) -> Result<Player, PlayerError> {
        Ok(Player {
            id: id.into(),
            name: name.into(),
            position,
            rating: Rating::new(rating)?,
        })
    }
}

impl Participant for Player {
    #[inline]
    fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn position(&self) -> Position {
        self.position
    }

    #[inline]
    fn rating(&self) -> Rating {
        self.rating
    }
}
