use crate::balance::balance_score;
use crate::distribute::{distribute, RecipientOrder, Strategy, WeakestRecipient};
use crate::shuffle::shuffled;
use crate::team::GeneratedTeam;
use crate::traits::Participant;
use crate::validation::{feasibility_errors, FeasibilityError};
use crate::{gen_seeder, RandGen, Seeder};
use itertools::Itertools;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::num::NonZero;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Default number of attempts made to find the most balanced teams.
pub const DEFAULT_ATTEMPTS: NonZero<usize> = match NonZero::new(50) {
    Some(attempts) => attempts,
    None => unreachable!(),
};

/// Options of a team generation.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq)]
#[serde(default)]
pub struct PartitionConfig {
    /// Balance teams by player rating.
    pub consider_rating: bool,
    /// Balance teams by player position.
    pub consider_position: bool,
    /// Number of teams to generate, at least [`MIN_TEAMS`](crate::MIN_TEAMS).
    pub number_of_teams: usize,
}

impl PartitionConfig {
    /// The distribution strategy used for these options.
    #[inline]
    pub const fn strategy(&self) -> Strategy {
        Strategy::from_flags(self.consider_rating, self.consider_position)
    }
}

impl Default for PartitionConfig {
    #[inline]
    fn default() -> Self {
        PartitionConfig {
            consider_rating: true,
            consider_position: true,
            number_of_teams: 2,
        }
    }
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum TeamGenError {
    /// The players can't be split into the requested number of teams.
    #[error("cannot generate teams: {}", .0.iter().join(", "))]
    Infeasible(Vec<FeasibilityError>),
    /// An error occurred while generating the teams.
    #[error("an error occurred while generating the teams: {0}")]
    InternalError(&'static str),
}

/// The most balanced teams found by a [`TeamGenerator`].
#[derive(Serialize, Debug)]
pub struct GeneratedTeams<'a, P: Participant> {
    /// The generated teams.
    pub teams: Vec<GeneratedTeam<'a, P>>,
    /// Balance score of the teams (see [`balance_score`]).
    pub balance: f64,
    /// Number of attempts actually made.
    pub attempts: usize,
}

/// Generates balanced teams.
///
/// Every attempt shuffles the players and distributes them with the configured [`Strategy`].
/// The most balanced attempt is kept, stopping early if a perfectly balanced one is found.
#[derive(Clone, Debug)]
pub struct TeamGenerator<O: RecipientOrder = WeakestRecipient> {
    config: PartitionConfig,
    attempts: NonZero<usize>,
    order: O,
}

impl TeamGenerator {
    #[inline]
    pub fn new(config: PartitionConfig) -> TeamGenerator {
        TeamGenerator {
            config,
            attempts: DEFAULT_ATTEMPTS,
            order: WeakestRecipient,
        }
    }
}

impl<O: RecipientOrder> TeamGenerator<O> {
    /// Sets the maximum number of attempts.
    #[inline]
    pub fn attempts(mut self, attempts: NonZero<usize>) -> Self {
        self.attempts = attempts;
        self
    }

    /// Sets the order used to pick the team receiving a player when balancing by position.
    #[inline]
    pub fn recipient_order<N: RecipientOrder>(self, order: N) -> TeamGenerator<N> {
        TeamGenerator {
            config: self.config,
            attempts: self.attempts,
            order,
        }
    }

    #[inline]
    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Generates the teams, using `seeder` as source of randomness.
    ///
    /// The same seeder and players always produce the same teams.
    #[inline]
    pub fn generate<'a, P: Participant>(
        &self,
        players: &'a [P],
        mut seeder: Seeder,
    ) -> Result<GeneratedTeams<'a, P>, TeamGenError> {
        let mut rng: RandGen = seeder.make_rng();
        self.generate_with_rng(players, &mut rng)
    }

    /// Generates the teams, using `rng` as source of randomness.
    pub fn generate_with_rng<'a, P: Participant, R: Rng>(
        &self,
        players: &'a [P],
        rng: &mut R,
    ) -> Result<GeneratedTeams<'a, P>, TeamGenError> {
        let errors = feasibility_errors(players.len(), self.config.number_of_teams);
        if !errors.is_empty() {
            warn!(
                players = players.len(),
                teams = self.config.number_of_teams,
                "refusing to generate infeasible teams"
            );
            return Err(TeamGenError::Infeasible(errors));
        }

        let number_of_teams = NonZero::new(self.config.number_of_teams)
            .ok_or(TeamGenError::InternalError("number of teams is zero"))?;
        let strategy = self.config.strategy();
        let pool: Vec<&'a P> = players.iter().collect();

        debug!(
            players = pool.len(),
            teams = number_of_teams.get(),
            ?strategy,
            max_attempts = self.attempts.get(),
            "generating teams"
        );

        let mut best: Option<(f64, Vec<GeneratedTeam<'a, P>>)> = None;
        let mut attempts = 0;
        for attempt in 0..self.attempts.get() {
            attempts += 1;

            let pool = shuffled(&pool, rng);
            let teams = distribute(&pool, number_of_teams, strategy, &self.order, rng)?;
            let score = balance_score(&teams);
            trace!(attempt, score, "attempt scored");

            let improved = match &best {
                Some((best_score, _)) => score < *best_score,
                None => true,
            };
            if improved {
                best = Some((score, teams));
            }

            if score == 0.0 {
                debug!(attempt, "found perfectly balanced teams");
                break;
            }
        }

        let (balance, teams) = best.ok_or(TeamGenError::InternalError("no attempt was made"))?;
        debug!(balance, attempts, "teams generated");

        Ok(GeneratedTeams {
            teams,
            balance,
            attempts,
        })
    }
}

/// Generates the most balanced teams out of [`DEFAULT_ATTEMPTS`] attempts, with a random seed.
#[inline]
pub fn generate_balanced_teams<P: Participant>(
    players: &[P],
    config: PartitionConfig,
) -> Result<Vec<GeneratedTeam<'_, P>>, TeamGenError> {
    TeamGenerator::new(config)
        .generate(players, gen_seeder())
        .map(|generated| generated.teams)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::player::{Player, Position};
    use crate::{gen_seed, validate_feasibility};
    use std::collections::HashMap;

    fn random_players(count: usize, seeder: &mut Seeder) -> Vec<Player> {
        let mut rng: RandGen = seeder.make_rng();
        (0..count)
            .map(|i| {
                let position = Position::ALL[rng.gen_range(0..Position::ALL.len())];
                let rating = rng.gen_range(0..=5) as f64;
                Player::new(format!("p{i}"), format!("Player {i}"), position, rating).unwrap()
            })
            .collect()
    }

    fn all_configs(number_of_teams: usize) -> impl Iterator<Item = PartitionConfig> {
        [(false, false), (true, false), (false, true), (true, true)]
            .into_iter()
            .map(move |(consider_rating, consider_position)| PartitionConfig {
                consider_rating,
                consider_position,
                number_of_teams,
            })
    }

    fn team_ids(generated: &GeneratedTeams<'_, Player>) -> Vec<Vec<String>> {
        generated
            .teams
            .iter()
            .map(|t| t.players().iter().map(|p| p.id.clone()).collect())
            .collect()
    }

    #[test]
    fn test_generate() {
        // Run with --nocapture

        let mut seeder = gen_seeder();
        let players = random_players(14, &mut seeder);
        let generated = TeamGenerator::new(PartitionConfig::default())
            .generate(&players, seeder)
            .unwrap();

        println!("Balance: {:.2} ({} attempts)", generated.balance, generated.attempts);
        for team in &generated.teams {
            println!("{}", team);
        }
    }

    #[test]
    fn test_invariants() {
        for _ in 0..5 {
            let mut seeder = Seeder::from(gen_seed());
            for count in [6, 7, 12, 13, 25, 40] {
                let players = random_players(count, &mut seeder);
                for number_of_teams in 2..=count / 3 {
                    for config in all_configs(number_of_teams) {
                        let generated = TeamGenerator::new(config)
                            .generate(&players, Seeder::from(gen_seed()))
                            .unwrap();
                        check_invariants(&players, &generated, config);
                    }
                }
            }
        }
    }

    fn check_invariants(
        players: &[Player],
        generated: &GeneratedTeams<'_, Player>,
        config: PartitionConfig,
    ) {
        let teams = &generated.teams;
        assert_eq!(teams.len(), config.number_of_teams);

        // Every player is in exactly one team
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for team in teams {
            for player in team.players() {
                *seen.entry(player.id.as_str()).or_default() += 1;
            }
        }
        assert_eq!(seen.len(), players.len());
        assert!(players.iter().all(|p| seen.get(p.id.as_str()) == Some(&1)));

        for team in teams {
            assert_eq!(team.position_counts().values().sum::<usize>(), team.len());
            assert_eq!(team.position_counts().len(), Position::ALL.len());

            let total: f64 = team.players().iter().map(|p| p.rating.get()).sum();
            assert!((team.total_rating() - total).abs() < 1e-9);
            if team.is_empty() {
                assert_eq!(team.average_rating(), 0.0);
            } else {
                assert!((team.average_rating() - total / team.len() as f64).abs() < 1e-9);
            }
        }

        assert_eq!(generated.balance, balance_score(teams));
        assert!(generated.attempts >= 1 && generated.attempts <= DEFAULT_ATTEMPTS.get());

        if config.consider_position {
            let goalkeepers: Vec<_> = teams
                .iter()
                .map(|t| t.position_count(Position::Goalkeeper))
                .collect();
            let max = goalkeepers.iter().max().unwrap();
            let min = goalkeepers.iter().min().unwrap();
            assert!(max - min <= 1, "goalkeepers: {goalkeepers:?}");
        }
    }

    #[test]
    fn test_exact_split() {
        let players: Vec<_> = [5.0, 5.0, 1.0, 1.0, 3.0, 3.0]
            .into_iter()
            .enumerate()
            .map(|(i, r)| {
                Player::new(i.to_string(), format!("Player {i}"), Position::Defender, r).unwrap()
            })
            .collect();
        let config = PartitionConfig {
            consider_rating: true,
            consider_position: false,
            number_of_teams: 2,
        };

        for _ in 0..50 {
            let generated = TeamGenerator::new(config)
                .generate(&players, gen_seeder())
                .unwrap();
            assert_eq!(generated.balance, 0.0);
            assert_eq!(generated.attempts, 1);
            assert_eq!(generated.teams[0].average_rating(), 3.0);
            assert_eq!(generated.teams[1].average_rating(), 3.0);
        }
    }

    #[test]
    fn test_not_enough_players() {
        let players: Vec<_> = (0..5)
            .map(|i| Player::new(i.to_string(), "X", Position::Forward, 3.0).unwrap())
            .collect();
        let config = PartitionConfig {
            number_of_teams: 2,
            ..Default::default()
        };

        assert!(!validate_feasibility(players.len(), 2).is_empty());
        let Err(TeamGenError::Infeasible(errors)) = generate_balanced_teams(&players, config) else {
            panic!("generation should have failed");
        };
        assert_eq!(errors, feasibility_errors(5, 2));
    }

    #[test]
    fn test_not_enough_teams() {
        let players: Vec<_> = (0..9)
            .map(|i| Player::new(i.to_string(), "X", Position::Forward, 3.0).unwrap())
            .collect();
        for number_of_teams in [0, 1] {
            let config = PartitionConfig {
                number_of_teams,
                ..Default::default()
            };
            assert!(matches!(
                generate_balanced_teams(&players, config),
                Err(TeamGenError::Infeasible(_))
            ));
        }
    }

    #[test]
    fn test_one_goalkeeper_per_team() {
        let positions = [
            Position::Goalkeeper,
            Position::Defender,
            Position::Midfielder,
            Position::Goalkeeper,
            Position::Forward,
            Position::Defender,
            Position::Goalkeeper,
            Position::Midfielder,
            Position::Forward,
        ];
        let players: Vec<_> = positions
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                Player::new(i.to_string(), format!("Player {i}"), p, (i % 5) as f64).unwrap()
            })
            .collect();

        for consider_rating in [false, true] {
            let config = PartitionConfig {
                consider_rating,
                consider_position: true,
                number_of_teams: 3,
            };
            for _ in 0..20 {
                let teams = generate_balanced_teams(&players, config).unwrap();
                assert_eq!(teams.len(), 3);
                for team in &teams {
                    assert_eq!(team.position_count(Position::Goalkeeper), 1, "{team}");
                }
            }
        }
    }

    #[test]
    fn test_attempts() {
        // Distinct ratings can never be perfectly balanced with 7 players in 2 teams
        let players: Vec<_> = [0.0, 0.5, 1.0, 2.0, 3.0, 4.5, 5.0]
            .into_iter()
            .enumerate()
            .map(|(i, r)| Player::new(i.to_string(), "X", Position::Midfielder, r).unwrap())
            .collect();
        let config = PartitionConfig {
            consider_rating: false,
            consider_position: false,
            number_of_teams: 2,
        };

        let generated = TeamGenerator::new(config)
            .attempts(NonZero::new(7).unwrap())
            .generate(&players, gen_seeder())
            .unwrap();
        assert_eq!(generated.attempts, 7);

        let generated = TeamGenerator::new(config)
            .attempts(NonZero::new(1).unwrap())
            .generate(&players, gen_seeder())
            .unwrap();
        assert_eq!(generated.attempts, 1);
    }

    #[test]
    fn test_more_attempts_never_worse() {
        let mut seeder = Seeder::from("more-attempts");
        let players = random_players(20, &mut seeder);
        let config = PartitionConfig {
            consider_rating: false,
            consider_position: false,
            number_of_teams: 4,
        };

        // Same seed: the first attempt is shared, so the longer run can only improve on it
        let seed = gen_seed();
        let one = TeamGenerator::new(config)
            .attempts(NonZero::new(1).unwrap())
            .generate(&players, Seeder::from(seed))
            .unwrap();
        let many = TeamGenerator::new(config)
            .generate(&players, Seeder::from(seed))
            .unwrap();
        assert!(many.balance <= one.balance);
    }

    #[test]
    fn test_reproducibility() {
        // Execute a bunch of times to test against different seeds
        for _ in 0..20 {
            reproducibility_test_case(gen_seed());
        }
    }

    fn reproducibility_test_case(seed: [u8; 32]) {
        let players = random_players(17, &mut Seeder::from(seed));
        for config in all_configs(4) {
            let generator = TeamGenerator::new(config);
            let generated = generator.generate(&players, Seeder::from(seed)).unwrap();

            for _ in 0..5 {
                let generated_clone = generator.generate(&players, Seeder::from(seed)).unwrap();
                assert_eq!(team_ids(&generated), team_ids(&generated_clone));
                assert_eq!(generated.balance, generated_clone.balance);
            }
        }
    }

    #[test]
    fn test_config_defaults() {
        assert_eq!(
            serde_json::from_str::<PartitionConfig>("{}").unwrap(),
            PartitionConfig::default()
        );
        assert_eq!(
            serde_json::from_str::<PartitionConfig>(
                r#"{"consider_position":false,"number_of_teams":4}"#
            )
            .unwrap(),
            PartitionConfig {
                consider_rating: true,
                consider_position: false,
                number_of_teams: 4,
            }
        );
    }

    #[test]
    fn test_borrowed_participants() {
        let mut seeder = Seeder::from("borrowed");
        let players = random_players(9, &mut seeder);
        let roster: Vec<&Player> = players.iter().collect();
        let teams = generate_balanced_teams(&roster, PartitionConfig::default()).unwrap();
        assert_eq!(teams.iter().map(|t| t.len()).sum::<usize>(), 9);
    }
}
