use crate::team::GeneratedTeam;
use crate::traits::Participant;
use itertools::{Itertools, MinMaxResult};

/// Returns how unbalanced the teams are: the highest average rating minus the lowest one.
///
/// Lower is better, `0` means perfectly balanced. Less than two teams are always balanced.
pub fn balance_score<P: Participant>(teams: &[GeneratedTeam<'_, P>]) -> f64 {
    match teams.iter().map(|t| t.average_rating()).minmax_by(f64::total_cmp) {
        MinMaxResult::MinMax(min, max) => max - min,
        MinMaxResult::OneElement(_) | MinMaxResult::NoElements => 0.0,
    }
}
