#![forbid(unsafe_code)]

use rand::{thread_rng, RngCore};

pub mod balance;
pub mod distribute;
pub mod generator;
pub mod player;
pub mod shuffle;
pub mod team;
pub mod traits;
pub mod validation;

pub use generator::{generate_balanced_teams, GeneratedTeams, PartitionConfig, TeamGenerator};
pub use player::{Player, Position, Rating};
pub use team::GeneratedTeam;
pub use traits::Participant;
pub use validation::validate_feasibility;

/// Minimum number of players every generated team must receive.
pub const MIN_PLAYERS_PER_TEAM: usize = 3;

/// Minimum number of teams a generation can produce.
pub const MIN_TEAMS: usize = 2;

/// Random generator used by the team generation.
pub type RandGen = rand_pcg::Pcg64;

pub use rand_seeder::Seeder;

/// Generates a new random seed.
#[inline]
pub fn gen_seed() -> [u8; 32] {
    let mut seed = [0u8; 32];
    thread_rng().fill_bytes(&mut seed);
    seed
}

/// Generates a new [`Seeder`] from a random seed.
#[inline]
pub fn gen_seeder() -> Seeder {
    Seeder::from(gen_seed())
}
