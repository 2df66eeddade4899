//! Win-rate estimation over many independent matches.
//!
//! Every match gets its own generator, seeded from the batch seed and the
//! match index, so matches can run on any number of threads and still
//! produce the same statistics for a given seed.

use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::arena::config::{ArenaConfig, EvalStats};
use crate::arena::game::Game;
use crate::arena::provider::PolicyProvider;
use crate::arena::runner::MatchRunner;
use crate::error::{ArenaError, ArenaResult};

/// Win rates for both seat assignments of the same pair of providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatReport {
    /// Provider A at seat 0, provider B at seat 1.
    pub first: EvalStats,
    /// Provider B at seat 0, provider A at seat 1.
    pub swapped: EvalStats,
}

/// Repeats matches between two providers and aggregates seat-0 outcomes.
pub struct Evaluator<G: Game> {
    game: G,
    config: ArenaConfig,
}

impl<G: Game> Evaluator<G> {
    /// Create an evaluator for a two-player game.
    pub fn new(game: G, config: ArenaConfig) -> ArenaResult<Self> {
        config.validate()?;
        if game.num_players() != 2 {
            return Err(ArenaError::InvalidArgument(format!(
                "{} has {} players, evaluation needs exactly 2",
                game.name(),
                game.num_players()
            )));
        }
        Ok(Self { game, config })
    }

    /// Fraction of `num_matches` matches won by seat 0.
    ///
    /// `seat_0` plays first in every match. A match counts as a win only if
    /// seat 0's return is strictly positive, so draws count as losses.
    pub fn evaluate(
        &self,
        seat_0: &dyn PolicyProvider,
        seat_1: &dyn PolicyProvider,
        num_matches: usize,
    ) -> ArenaResult<f64> {
        Ok(self.evaluate_with_stats(seat_0, seat_1, num_matches)?.win_rate)
    }

    /// Same as [`evaluate`](Self::evaluate), with the full outcome counts.
    pub fn evaluate_with_stats(
        &self,
        seat_0: &dyn PolicyProvider,
        seat_1: &dyn PolicyProvider,
        num_matches: usize,
    ) -> ArenaResult<EvalStats> {
        let base_seed = self.base_seed();
        self.play_batch(seat_0, seat_1, num_matches, base_seed)
    }

    /// Evaluate A against B, then B against A, with the configured match count.
    ///
    /// The second batch draws its seeds after the first batch's, so the two
    /// batches never replay the same random stream. The two figures are
    /// independent and need not be complementary.
    pub fn evaluate_both_seats(
        &self,
        provider_a: &dyn PolicyProvider,
        provider_b: &dyn PolicyProvider,
    ) -> ArenaResult<SeatReport> {
        let num_matches = self.config.num_matches;
        let base_seed = self.base_seed();
        let first = self.play_batch(provider_a, provider_b, num_matches, base_seed)?;
        let swapped = self.play_batch(
            provider_b,
            provider_a,
            num_matches,
            base_seed.wrapping_add(num_matches as u64),
        )?;
        Ok(SeatReport { first, swapped })
    }

    /// Get reference to the game.
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    fn base_seed(&self) -> u64 {
        self.config.seed.unwrap_or_else(rand::random)
    }

    /// Match `i` of the batch is seeded with `base_seed + i`.
    fn play_batch(
        &self,
        seat_0: &dyn PolicyProvider,
        seat_1: &dyn PolicyProvider,
        num_matches: usize,
        base_seed: u64,
    ) -> ArenaResult<EvalStats> {
        if num_matches == 0 {
            return Err(ArenaError::InvalidArgument(
                "cannot estimate a win rate from zero matches".into(),
            ));
        }

        log::info!(
            "{:<32}{:<32}",
            format!("playing {} {} matches", num_matches, self.game.name()),
            format!("{} vs {}", seat_0.name(), seat_1.name())
        );

        let start = Instant::now();
        let progress = self.progress_bar(num_matches);
        let seats = [seat_0, seat_1];
        let runner = MatchRunner::new(&self.game);

        let play = |index: usize| -> ArenaResult<f64> {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(index as u64));
            let returns = runner.run(&seats, &mut rng)?;
            progress.inc(1);
            log::debug!("match {} returns {:?}", index, returns);
            returns.first().copied().ok_or_else(|| {
                ArenaError::InvalidArgument(format!("{} returned no returns", self.game.name()))
            })
        };

        let outcomes: ArenaResult<Vec<f64>> = match self.config.num_threads {
            Some(1) => (0..num_matches).map(&play).collect(),
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(|| (0..num_matches).into_par_iter().map(&play).collect()),
            None => (0..num_matches).into_par_iter().map(&play).collect(),
        };
        progress.finish_and_clear();

        let mut stats = EvalStats::new();
        for seat_return in outcomes? {
            stats.record(seat_return);
        }
        stats.finish(start.elapsed().as_secs_f64());

        log::info!(
            "{:<32}{:<32}",
            format!("{} seat 0 win rate {:.3}", seat_0.name(), stats.win_rate),
            format!("{}W {}D {}L in {:.2}s", stats.wins, stats.draws, stats.losses, stats.elapsed_seconds)
        );
        Ok(stats)
    }

    fn progress_bar(&self, num_matches: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(num_matches as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} matches [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar
    }
}
