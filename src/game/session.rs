//! The play session: hydration, time, score and the live drops.
//!
//! `GameSession` is the single owner of gameplay state. Systems never poke its
//! fields directly; every change goes through a method so the guards below
//! hold regardless of which timer or input event arrives first.
//!
//! Phases: `Idle -> Running -> GameOver -> Idle`.

use bevy::prelude::*;
use rand::Rng;
use std::collections::BTreeMap;

use super::{
    drops::{DropId, DropKind, DropSpec, roll_drop},
    rules::GameRules,
};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<GameSession>();
    app.register_type::<GameSession>();
    app.register_type::<SessionPhase>();
}

pub const START_MESSAGE: &str = "Click the clean drops to survive!";
pub const CLEAN_MESSAGE: &str = "Nice! Hydration restored.";
pub const DIRTY_MESSAGE: &str = "Yuck, that was dirty!";
pub const MISSED_MESSAGE: &str = "Missed a clean drop. Stay sharp!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum SessionPhase {
    #[default]
    Idle,
    Running,
    /// Final message is on screen, waiting to go back home.
    GameOver,
}

/// How a drop left the playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Clicked or activated from the keyboard.
    Input,
    /// Reached the bottom untouched.
    Expired,
}

/// Final numbers of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct GameOverSummary {
    pub score: u32,
    pub elapsed_seconds: u32,
}

impl GameOverSummary {
    pub fn message(&self) -> String {
        format!(
            "Game Over | Score: {} | Survived {}s",
            self.score, self.elapsed_seconds
        )
    }
}

/// Result of resolving a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDrop {
    pub kind: DropKind,
    pub resolution: Resolution,
    /// Set when this resolution drained the last of the hydration.
    pub game_over: Option<GameOverSummary>,
}

#[derive(Debug, Clone, Copy)]
struct LiveDrop {
    spec: DropSpec,
    collected: bool,
}

#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct GameSession {
    /// Raw gauge value. Clamped on every refresh, so outside a method call it
    /// always sits in `[0, max_hydration]`.
    pub hydration: i32,
    pub elapsed_seconds: u32,
    pub score: u32,
    pub phase: SessionPhase,
    pub message: String,
    #[reflect(ignore)]
    drops: BTreeMap<DropId, LiveDrop>,
    next_drop_id: u64,
}

impl GameSession {
    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Gauge value for display, in `[0, max]`.
    pub fn hydration_percent(&self, rules: &GameRules) -> f32 {
        let max = rules.max_hydration.max(1);
        self.hydration.clamp(0, max) as f32 * 100.0 / max as f32
    }

    pub fn drop_count(&self) -> usize {
        self.drops.len()
    }

    /// Live drops in spawn order.
    pub fn live_drops(&self) -> impl Iterator<Item = DropId> + '_ {
        self.drops.keys().copied()
    }

    /// Begin a new session. Returns false, changing nothing, unless idle.
    pub fn start(&mut self, rules: &GameRules) -> bool {
        if self.phase != SessionPhase::Idle {
            return false;
        }

        self.hydration = rules.starting_hydration;
        self.elapsed_seconds = 0;
        self.score = 0;
        self.drops.clear();
        self.message = START_MESSAGE.to_string();
        self.phase = SessionPhase::Running;
        self.refresh(rules);
        true
    }

    /// One second of natural drain.
    pub fn tick(&mut self, rules: &GameRules) -> Option<GameOverSummary> {
        if !self.is_running() {
            return None;
        }

        self.elapsed_seconds += 1;
        self.hydration -= rules.drain_per_tick;
        let game_over = self.check_game_over();
        self.refresh(rules);
        game_over
    }

    /// Roll and register a new drop. Nothing spawns outside a running session.
    pub fn spawn_drop(
        &mut self,
        rng: &mut impl Rng,
        rules: &GameRules,
    ) -> Option<(DropId, DropSpec)> {
        if !self.is_running() {
            return None;
        }

        let id = DropId(self.next_drop_id);
        self.next_drop_id += 1;
        let spec = roll_drop(rng, rules);
        self.drops.insert(
            id,
            LiveDrop {
                spec,
                collected: false,
            },
        );
        Some((id, spec))
    }

    /// Apply the effect of a drop leaving the playfield.
    ///
    /// A drop resolves at most once: unknown, already collected, or
    /// post-session resolutions return `None` and change nothing.
    pub fn resolve_drop(
        &mut self,
        id: DropId,
        resolution: Resolution,
        rules: &GameRules,
    ) -> Option<ResolvedDrop> {
        if !self.is_running() {
            return None;
        }
        let drop = self.drops.get_mut(&id)?;
        if drop.collected {
            return None;
        }
        drop.collected = true;
        let kind = drop.spec.kind;

        match (resolution, kind) {
            (Resolution::Input, DropKind::Clean) => {
                self.hydration += rules.clean_reward;
                self.score += 1;
                self.message = CLEAN_MESSAGE.to_string();
            }
            (Resolution::Input, DropKind::Dirty) => {
                self.hydration -= rules.dirty_penalty;
                self.score = self.score.saturating_sub(1);
                self.message = DIRTY_MESSAGE.to_string();
            }
            (Resolution::Expired, DropKind::Clean) => {
                self.hydration -= rules.missed_clean_penalty;
                self.message = MISSED_MESSAGE.to_string();
            }
            // Dodging a dirty drop is its own reward.
            (Resolution::Expired, DropKind::Dirty) => {}
        }

        self.drops.remove(&id);
        let game_over = self.check_game_over();
        self.refresh(rules);

        Some(ResolvedDrop {
            kind,
            resolution,
            game_over,
        })
    }

    /// Stop the running session and clear its drops.
    ///
    /// Only the first call per session yields a summary.
    pub fn end_game(&mut self) -> Option<GameOverSummary> {
        if !self.is_running() {
            return None;
        }

        self.phase = SessionPhase::GameOver;
        self.drops.clear();
        let summary = GameOverSummary {
            score: self.score,
            elapsed_seconds: self.elapsed_seconds,
        };
        self.message = summary.message();
        Some(summary)
    }

    /// Leave the game-over phase once the final message has been shown.
    pub fn return_home(&mut self) -> bool {
        if self.phase != SessionPhase::GameOver {
            return false;
        }
        self.phase = SessionPhase::Idle;
        true
    }

    fn check_game_over(&mut self) -> Option<GameOverSummary> {
        if self.hydration <= 0 {
            self.end_game()
        } else {
            None
        }
    }

    fn refresh(&mut self, rules: &GameRules) {
        self.hydration = self.hydration.clamp(0, rules.max_hydration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn rules_with_probability(clean_probability: f64) -> GameRules {
        GameRules {
            clean_probability,
            ..default()
        }
    }

    fn running(rules: &GameRules) -> GameSession {
        let mut session = GameSession::default();
        assert!(session.start(rules));
        session
    }

    fn spawn(session: &mut GameSession, rules: &GameRules, rng: &mut StdRng) -> DropId {
        session.spawn_drop(rng, rules).expect("session is running").0
    }

    #[test]
    fn start_resets_state() {
        let rules = GameRules::default();
        let session = running(&rules);
        assert_eq!(session.hydration, 100);
        assert_eq!(session.elapsed_seconds, 0);
        assert_eq!(session.score, 0);
        assert_eq!(session.phase, SessionPhase::Running);
        assert_eq!(session.message, START_MESSAGE);
    }

    #[test]
    fn second_start_is_ignored() {
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = running(&rules);
        session.tick(&rules);
        spawn(&mut session, &rules, &mut rng);

        assert!(!session.start(&rules));
        assert_eq!(session.hydration, 99);
        assert_eq!(session.elapsed_seconds, 1);
        assert_eq!(session.drop_count(), 1);
    }

    #[test]
    fn tick_drains_and_counts() {
        let rules = GameRules::default();
        let mut session = running(&rules);
        for _ in 0..10 {
            assert!(session.tick(&rules).is_none());
        }
        assert_eq!(session.elapsed_seconds, 10);
        assert_eq!(session.hydration, 90);
    }

    #[test]
    fn hundred_ticks_end_the_game() {
        let rules = GameRules::default();
        let mut session = running(&rules);
        let mut summaries = Vec::new();
        for _ in 0..150 {
            if let Some(summary) = session.tick(&rules) {
                summaries.push(summary);
            }
        }
        assert_eq!(
            summaries,
            vec![GameOverSummary {
                score: 0,
                elapsed_seconds: 100
            }]
        );
        assert_eq!(session.phase, SessionPhase::GameOver);
        assert_eq!(session.hydration, 0);
        assert_eq!(session.elapsed_seconds, 100);
    }

    #[test]
    fn missed_clean_drops_shorten_the_game() {
        let rules = rules_with_probability(1.0);
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = running(&rules);
        let mut summary = None;
        while summary.is_none() {
            let id = spawn(&mut session, &rules, &mut rng);
            let resolved = session.resolve_drop(id, Resolution::Expired, &rules).unwrap();
            summary = resolved.game_over.or_else(|| session.tick(&rules));
        }
        let summary = summary.unwrap();
        assert!(summary.elapsed_seconds < 100);
        assert_eq!(session.message, summary.message());
    }

    #[test]
    fn collecting_clean_drops_caps_hydration() {
        let rules = rules_with_probability(1.0);
        let mut rng = StdRng::seed_from_u64(2);
        let mut session = running(&rules);
        for _ in 0..5 {
            let id = spawn(&mut session, &rules, &mut rng);
            let resolved = session.resolve_drop(id, Resolution::Input, &rules).unwrap();
            assert_eq!(resolved.kind, DropKind::Clean);
        }
        assert_eq!(session.hydration, 100);
        assert_eq!(session.score, 5);
        assert_eq!(session.message, CLEAN_MESSAGE);
    }

    #[test]
    fn dirty_drop_at_zero_score_keeps_score_floored() {
        let rules = rules_with_probability(0.0);
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = running(&rules);
        let id = spawn(&mut session, &rules, &mut rng);
        session.resolve_drop(id, Resolution::Input, &rules).unwrap();
        assert_eq!(session.score, 0);
        assert_eq!(session.hydration, 86);
        assert_eq!(session.message, DIRTY_MESSAGE);
    }

    #[test]
    fn dirty_drop_costs_a_point() {
        let rules = GameRules::default();
        let mut session = running(&rules);
        session.score = 3;
        let id = spawn(&mut session, &rules_with_probability(0.0), &mut StdRng::seed_from_u64(4));
        session.resolve_drop(id, Resolution::Input, &rules).unwrap();
        assert_eq!(session.score, 2);
    }

    #[test]
    fn expired_dirty_drop_is_free() {
        let rules = rules_with_probability(0.0);
        let mut rng = StdRng::seed_from_u64(6);
        let mut session = running(&rules);
        let id = spawn(&mut session, &rules, &mut rng);
        let resolved = session.resolve_drop(id, Resolution::Expired, &rules).unwrap();
        assert_eq!(resolved.kind, DropKind::Dirty);
        assert_eq!(session.hydration, 100);
        assert_eq!(session.message, START_MESSAGE);
        assert_eq!(session.drop_count(), 0);
    }

    #[test]
    fn expired_clean_drop_costs_hydration() {
        let rules = rules_with_probability(1.0);
        let mut rng = StdRng::seed_from_u64(8);
        let mut session = running(&rules);
        let id = spawn(&mut session, &rules, &mut rng);
        session.resolve_drop(id, Resolution::Expired, &rules).unwrap();
        assert_eq!(session.hydration, 94);
        assert_eq!(session.message, MISSED_MESSAGE);
    }

    #[test]
    fn drop_resolves_only_once() {
        let rules = rules_with_probability(1.0);
        let mut rng = StdRng::seed_from_u64(10);
        let mut session = running(&rules);
        session.tick(&rules);
        let id = spawn(&mut session, &rules, &mut rng);

        assert!(session.resolve_drop(id, Resolution::Input, &rules).is_some());
        let (hydration, score) = (session.hydration, session.score);
        assert!(session.resolve_drop(id, Resolution::Input, &rules).is_none());
        assert!(session.resolve_drop(id, Resolution::Expired, &rules).is_none());
        assert_eq!((session.hydration, session.score), (hydration, score));
    }

    #[test]
    fn game_ends_once_when_drain_and_penalty_coincide() {
        let rules = rules_with_probability(0.0);
        let mut rng = StdRng::seed_from_u64(12);
        let mut session = running(&rules);
        let id = spawn(&mut session, &rules, &mut rng);
        session.hydration = 1;

        let resolved = session.resolve_drop(id, Resolution::Input, &rules).unwrap();
        assert!(resolved.game_over.is_some());
        assert!(session.tick(&rules).is_none());
        assert!(session.end_game().is_none());
        assert_eq!(session.elapsed_seconds, 0);
        assert_eq!(session.hydration, 0);
    }

    #[test]
    fn end_game_clears_drops_and_blocks_stale_callbacks() {
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(13);
        let mut session = running(&rules);
        let ids: Vec<_> = (0..4).map(|_| spawn(&mut session, &rules, &mut rng)).collect();
        session.score = 2;
        session.elapsed_seconds = 17;

        let summary = session.end_game().unwrap();
        assert_eq!(summary.message(), "Game Over | Score: 2 | Survived 17s");
        assert_eq!(session.drop_count(), 0);

        for id in ids {
            assert!(session.resolve_drop(id, Resolution::Expired, &rules).is_none());
        }
        assert!(session.spawn_drop(&mut rng, &rules).is_none());
        assert!(session.tick(&rules).is_none());
        assert_eq!(session.elapsed_seconds, 17);
    }

    #[test]
    fn start_waits_for_return_home() {
        let rules = GameRules::default();
        let mut session = running(&rules);
        session.end_game();

        assert!(!session.start(&rules));
        assert_eq!(session.phase, SessionPhase::GameOver);
        assert!(session.return_home());
        assert!(!session.return_home());
        assert!(session.start(&rules));
    }

    #[test]
    fn hydration_never_leaves_gauge_range() {
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(14);
        let mut session = running(&rules);
        for step in 0..400 {
            if let Some((id, _)) = session.spawn_drop(&mut rng, &rules) {
                let resolution = if step % 3 == 0 {
                    Resolution::Expired
                } else {
                    Resolution::Input
                };
                session.resolve_drop(id, resolution, &rules);
            }
            if step % 2 == 0 {
                session.tick(&rules);
            }
            assert!((0..=100).contains(&session.hydration));
            let percent = session.hydration_percent(&rules);
            assert!((0.0..=100.0).contains(&percent));
        }
    }

    #[test]
    fn live_drops_come_back_in_spawn_order() {
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(15);
        let mut session = running(&rules);
        let ids: Vec<_> = (0..5).map(|_| spawn(&mut session, &rules, &mut rng)).collect();
        session.resolve_drop(ids[1], Resolution::Input, &rules);
        let live: Vec<_> = session.live_drops().collect();
        assert_eq!(live, vec![ids[0], ids[2], ids[3], ids[4]]);
    }
}
