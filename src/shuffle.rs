use rand::prelude::SliceRandom;
use rand::Rng;

/// Returns a uniformly random permutation of `items`, leaving `items` untouched.
///
/// Uses the Fisher-Yates exchange: walks from the last index down to 1, swapping each
/// element with one at a uniformly random index in `0..=i`.
#[inline]
pub fn shuffled<T: Clone>(items: &[T], rng: &mut impl Rng) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled
}
