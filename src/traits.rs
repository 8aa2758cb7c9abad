use crate::player::{Position, Rating};

/// A participant that can be assigned to a generated team.
pub trait Participant {
    /// Unique key of the participant.
    fn id(&self) -> &str;

    /// Display name of the participant.
    fn name(&self) -> &str;

    /// Playing position of the participant.
    fn position(&self) -> Position;

    /// Skill rating of the participant.
    fn rating(&self) -> Rating;
}

// TRAIT DEFAULT IMPLEMENTATIONS

impl<P: Participant> Participant for &P {
    #[inline]
    fn id(&self) -> &str {
        (**self).id()
    }

    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn position(&self) -> Position {
        (**self).position()
    }

    #[inline]
    fn rating(&self) -> Rating {
        (**self).rating()
    }
}
