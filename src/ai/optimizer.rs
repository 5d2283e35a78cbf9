//! Shot search for the computer opponent
//!
//! Stochastic hill climbing with random restarts. Every candidate shot is
//! judged by playing it out on a private copy of the table, restored from the
//! same snapshot each time:
//!
//! 1. simulate the current candidate and score the resulting table
//! 2. keep it if it beats the best so far
//! 3. every 10th iteration draw a fresh random candidate, otherwise mutate
//!    the best one (smaller rotation changes the better the best scores)
//!
//! The search is pre-emptible: `step(budget)` runs at most `budget`
//! iterations, so a host can spread a decision over several frames.

use std::f32::consts::PI;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::evaluation::evaluate;
use crate::audio::Silent;
use crate::config::AiConfig;
use crate::consts::RANDOM_RESTART_INTERVAL;
use crate::input::{Command, InputSource};
use crate::normalize_angle;
use crate::sim::{TurnPhase, World, WorldSnapshot};

/// A trial shot and how well it played out
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub power: f32,
    /// Radians
    pub rotation: f32,
    pub evaluation: f32,
}

impl Candidate {
    /// Uniform power in the configured range, uniform direction
    pub fn random(rng: &mut impl Rng, ai: &AiConfig) -> Self {
        Self {
            power: rng.random_range(ai.min_power..=ai.max_power),
            rotation: rng.random_range(-PI..PI),
            evaluation: 0.0,
        }
    }

    /// A neighbour of this candidate. The rotation offset shrinks as the
    /// evaluation grows; a non-positive evaluation gets a fresh direction.
    pub fn mutate(&self, rng: &mut impl Rng, ai: &AiConfig) -> Self {
        let offset = rng.random_range(-ai.power_variance..=ai.power_variance);
        let power = (self.power + offset).clamp(ai.min_power, ai.max_power);

        let rotation = if self.evaluation > 0.0 {
            let spin = rng.random_range(-PI..PI) * ai.rotation_variance / self.evaluation;
            normalize_angle(self.rotation + spin)
        } else {
            rng.random_range(-PI..PI)
        };

        Self {
            power,
            rotation,
            evaluation: 0.0,
        }
    }

    pub fn as_command(&self) -> Command {
        Command::Shoot {
            power: self.power,
            rotation: self.rotation,
        }
    }
}

/// Progress of a `ShotSearch`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Running,
    Finished,
}

/// One decision's worth of search, started from a fixed table
#[derive(Debug, Clone)]
pub struct ShotSearch {
    start: WorldSnapshot,
    scratch: World,
    ai: AiConfig,
    rng: Pcg32,
    current: Candidate,
    best: Option<Candidate>,
    iteration: usize,
    /// Best evaluation after each iteration
    history: Vec<f32>,
}

impl ShotSearch {
    pub fn new(world: &World, seed: u64) -> Self {
        let ai = world.config().ai.clone();
        let mut rng = Pcg32::seed_from_u64(seed);
        let current = Candidate::random(&mut rng, &ai);

        Self {
            start: world.snapshot(),
            scratch: world.clone(),
            history: Vec::with_capacity(ai.iterations),
            ai,
            rng,
            current,
            best: None,
            iteration: 0,
        }
    }

    /// Run up to `budget` iterations
    pub fn step(&mut self, budget: usize) -> SearchStatus {
        for _ in 0..budget {
            if self.is_finished() {
                break;
            }
            self.iterate();
        }
        self.status()
    }

    /// Exhaust the iteration budget and return the winner
    pub fn run(mut self) -> Candidate {
        while self.step(self.ai.iterations) == SearchStatus::Running {}
        self.into_best()
    }

    fn iterate(&mut self) {
        let mut candidate = self.current;
        candidate.evaluation = self.simulate(candidate);

        let best = match self.best {
            Some(best) if best.evaluation >= candidate.evaluation => best,
            _ => {
                self.best = Some(candidate);
                candidate
            }
        };
        self.history.push(best.evaluation);
        self.iteration += 1;

        self.current = if self.iteration % RANDOM_RESTART_INTERVAL == 0 {
            Candidate::random(&mut self.rng, &self.ai)
        } else {
            best.mutate(&mut self.rng, &self.ai)
        };
    }

    /// Play `candidate` out from the start snapshot and score it
    fn simulate(&mut self, candidate: Candidate) -> f32 {
        self.scratch.restore(&self.start);
        if !self.scratch.shoot(candidate.power, candidate.rotation) {
            return f32::NEG_INFINITY;
        }
        match self.scratch.settle_turn(&mut Silent) {
            Some(outcome) => evaluate(&self.scratch, &outcome, &self.ai),
            None => f32::NEG_INFINITY,
        }
    }

    pub fn status(&self) -> SearchStatus {
        if self.is_finished() {
            SearchStatus::Finished
        } else {
            SearchStatus::Running
        }
    }

    pub fn is_finished(&self) -> bool {
        self.iteration >= self.ai.iterations
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn best(&self) -> Option<Candidate> {
        self.best
    }

    pub fn history(&self) -> &[f32] {
        &self.history
    }

    /// True if this search was started from exactly this table
    pub fn started_from(&self, world: &World) -> bool {
        self.start == world.snapshot()
    }

    /// The best candidate, or the first random one if nothing ran yet
    pub fn into_best(self) -> Candidate {
        self.best.unwrap_or(self.current)
    }
}

/// Computer player: places a ball in hand, then searches for a shot
#[derive(Debug, Clone)]
pub struct AiOpponent {
    rng: Pcg32,
    /// Iterations per `next_command` call; `None` searches to completion
    step_budget: Option<usize>,
    search: Option<ShotSearch>,
}

impl AiOpponent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            step_budget: None,
            search: None,
        }
    }

    /// Spread each decision over several polls of at most `budget` iterations
    pub fn with_step_budget(mut self, budget: usize) -> Self {
        self.step_budget = Some(budget.max(1));
        self
    }

    /// Deterministic ball-in-hand spot: walk right from the cue spot
    pub fn placement(world: &World) -> Option<glam::Vec2> {
        if !world.is_ball_in_hand() {
            return None;
        }
        world.find_cue_spot(world.config().ai.placement_step)
    }

    /// Run a whole search for `world` right now
    pub fn think(&mut self, world: &World) -> Candidate {
        let best = ShotSearch::new(world, self.rng.random()).run();
        log::debug!(
            "AI chose power {:.2}, rotation {:.3} (eval {:.2})",
            best.power,
            best.rotation,
            best.evaluation
        );
        best
    }

    /// Abandon any search in progress
    pub fn cancel(&mut self) {
        self.search = None;
    }
}

impl InputSource for AiOpponent {
    fn next_command(&mut self, world: &World) -> Option<Command> {
        if world.phase() != TurnPhase::Aiming {
            return None;
        }

        if let Some(spot) = Self::placement(world) {
            if world.cue_ball().pos != spot {
                self.cancel();
                return Some(Command::PlaceCueBall(spot));
            }
        }

        let Some(budget) = self.step_budget else {
            return Some(self.think(world).as_command());
        };

        if self.search.as_ref().is_some_and(|s| !s.started_from(world)) {
            self.cancel();
        }
        let search = self
            .search
            .get_or_insert_with(|| ShotSearch::new(world, self.rng.random()));

        match search.step(budget) {
            SearchStatus::Running => None,
            SearchStatus::Finished => {
                let best = self.search.take()?.into_best();
                log::debug!(
                    "AI chose power {:.2}, rotation {:.3} (eval {:.2})",
                    best.power,
                    best.rotation,
                    best.evaluation
                );
                Some(best.as_command())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use proptest::prelude::*;

    fn quick_config(iterations: usize) -> GameConfig {
        let mut config = GameConfig::default();
        config.ai.iterations = iterations;
        config
    }

    #[test]
    fn test_random_candidate_in_range() {
        let ai = AiConfig::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let c = Candidate::random(&mut rng, &ai);
            assert!(c.power >= ai.min_power && c.power <= ai.max_power);
            assert!((-PI..PI).contains(&c.rotation));
        }
    }

    #[test]
    fn test_mutation_clamps_power() {
        let ai = AiConfig::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let edge = Candidate {
            power: ai.max_power,
            rotation: 0.0,
            evaluation: 50.0,
        };
        for _ in 0..100 {
            let m = edge.mutate(&mut rng, &ai);
            assert!(m.power >= ai.min_power && m.power <= ai.max_power);
            // High evaluation keeps the direction close
            assert!(m.rotation.abs() <= PI * ai.rotation_variance / 50.0 + 1e-5);
        }
    }

    #[test]
    fn test_step_budget_is_respected() {
        let world = World::new(quick_config(5));
        let mut search = ShotSearch::new(&world, 1);

        assert_eq!(search.step(2), SearchStatus::Running);
        assert_eq!(search.iteration(), 2);
        assert_eq!(search.history().len(), 2);
        assert!(search.best().is_some());

        assert_eq!(search.step(10), SearchStatus::Finished);
        assert_eq!(search.iteration(), 5);
        assert_eq!(search.step(10), SearchStatus::Finished);
        assert_eq!(search.history().len(), 5);
    }

    #[test]
    fn test_search_leaves_live_world_untouched() {
        let world = World::new(quick_config(4));
        let before = world.snapshot();
        let best = ShotSearch::new(&world, 11).run();
        assert_eq!(world.snapshot(), before);
        assert!(best.power >= world.config().ai.min_power);
    }

    #[test]
    fn test_same_seed_same_decision() {
        let world = World::new(quick_config(6));
        let a = ShotSearch::new(&world, 42).run();
        let b = ShotSearch::new(&world, 42).run();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unfinished_search_falls_back_to_first_candidate() {
        let world = World::new(quick_config(3));
        let search = ShotSearch::new(&world, 5);
        let fallback = search.clone().into_best();
        assert_eq!(fallback.evaluation, 0.0);
        assert!(fallback.power >= world.config().ai.min_power);
    }

    #[test]
    fn test_ai_places_ball_in_hand_first() {
        let mut world = World::new(quick_config(3));
        let mut snap = world.snapshot();
        snap.turn.ball_in_hand = true;
        snap.balls[0].respot(glam::Vec2::new(300.0, 300.0));
        world.restore(&snap);

        let mut ai = AiOpponent::new(9);
        let Some(Command::PlaceCueBall(spot)) = ai.next_command(&world) else {
            panic!("expected a placement first");
        };
        assert!(world.can_place_cue_ball(spot));
        world.apply(Command::PlaceCueBall(spot)).unwrap();

        let command = ai.next_command(&world);
        assert!(matches!(command, Some(Command::Shoot { .. })));
        world.apply(command.unwrap()).unwrap();
        assert!(world.is_balls_moving());
    }

    #[test]
    fn test_budgeted_ai_spreads_search_over_polls() {
        let world = World::new(quick_config(4));
        let mut ai = AiOpponent::new(2).with_step_budget(1);

        for _ in 0..3 {
            assert_eq!(ai.next_command(&world), None);
        }
        assert!(matches!(ai.next_command(&world), Some(Command::Shoot { .. })));
    }

    #[test]
    fn test_cancel_restarts_the_search() {
        let world = World::new(quick_config(4));
        let mut ai = AiOpponent::new(2).with_step_budget(1);

        assert_eq!(ai.next_command(&world), None);
        assert_eq!(ai.next_command(&world), None);
        ai.cancel();

        // A fresh search needs all four iterations again
        for _ in 0..3 {
            assert_eq!(ai.next_command(&world), None);
        }
        assert!(matches!(ai.next_command(&world), Some(Command::Shoot { .. })));
    }

    #[test]
    fn test_ai_waits_while_balls_move() {
        let mut world = World::new(quick_config(2));
        assert!(world.shoot(10.0, 0.0));
        let mut ai = AiOpponent::new(1);
        assert_eq!(ai.next_command(&world), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(6))]

        #[test]
        fn prop_best_evaluation_never_decreases(seed in any::<u64>()) {
            let world = World::new(quick_config(12));
            let mut search = ShotSearch::new(&world, seed);
            search.step(12);

            let history = search.history();
            prop_assert_eq!(history.len(), 12);
            for pair in history.windows(2) {
                prop_assert!(pair[1] >= pair[0]);
            }
            prop_assert_eq!(search.best().map(|b| b.evaluation), history.last().copied());
        }
    }
}
