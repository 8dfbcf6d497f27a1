//! Drop kinds and the random rolls that shape each new drop.
//!
//! The sampling functions are pure over any `rand::Rng`, so gameplay uses a
//! seedable generator and tests use a fixed seed.

use bevy::prelude::*;
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::rules::GameRules;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<DropKind>();
    app.register_type::<DropId>();

    let rules = app.world().resource::<GameRules>();
    let rng = DropRng::from_rules(rules);
    app.insert_resource(rng);
}

/// The two kinds of falling drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum DropKind {
    /// Restores hydration when clicked, hurts when missed.
    Clean,
    /// Hurts when clicked, harmless when left alone.
    Dirty,
}

impl DropKind {
    /// Get the colour used to render this kind.
    pub fn to_color(self) -> Color {
        match self {
            // #2E9DF7
            DropKind::Clean => Color::srgb(0.180, 0.616, 0.969),
            // #4FCB53
            DropKind::Dirty => Color::srgb(0.310, 0.796, 0.325),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DropKind::Clean => "clean water drop",
            DropKind::Dirty => "dirty water drop",
        }
    }
}

/// Identifier of a drop within the session, assigned in spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
pub struct DropId(pub u64);

impl std::fmt::Display for DropId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything rolled for a drop at spawn time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropSpec {
    pub kind: DropKind,
    /// Left edge in playfield pixels.
    pub horizontal_position: f32,
    pub fall_duration_ms: u32,
}

/// Random source for drop rolls.
#[derive(Resource)]
pub struct DropRng(pub StdRng);

impl DropRng {
    pub fn from_rules(rules: &GameRules) -> Self {
        match rules.seed {
            Some(seed) => {
                info!("Seeding drop rolls with {}", seed);
                Self(StdRng::seed_from_u64(seed))
            }
            None => Self(StdRng::from_rng(&mut rand::rng())),
        }
    }
}

/// Pick clean with probability `clean_probability`, dirty otherwise.
pub fn select_kind(rng: &mut impl Rng, clean_probability: f64) -> DropKind {
    if rng.random_bool(clean_probability) {
        DropKind::Clean
    } else {
        DropKind::Dirty
    }
}

/// Uniform fall duration in `[min_ms, max_ms)`.
pub fn sample_fall_duration(rng: &mut impl Rng, min_ms: u32, max_ms: u32) -> u32 {
    rng.random_range(min_ms..max_ms)
}

/// Left edge of a drop, kept inside the playfield and off the left border.
pub fn sample_horizontal_position(rng: &mut impl Rng, rules: &GameRules) -> f32 {
    let span = (rules.playfield_width - rules.drop_size).max(0.0);
    (rng.random::<f32>() * span).floor().max(rules.edge_margin)
}

pub fn roll_drop(rng: &mut impl Rng, rules: &GameRules) -> DropSpec {
    DropSpec {
        kind: select_kind(rng, rules.clean_probability),
        horizontal_position: sample_horizontal_position(rng, rules),
        fall_duration_ms: sample_fall_duration(
            rng,
            rules.fall_duration_min_ms,
            rules.fall_duration_max_ms,
        ),
    }
}
