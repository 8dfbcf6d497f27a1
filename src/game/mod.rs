//! The main game module for Thirst Mode.
//!
//! This module contains all the gameplay logic including:
//! - Session state (hydration, time, score) and its phases
//! - Drop kinds and the random rolls behind each spawn
//! - The tick and spawn timers
//! - Falling drop nodes and player input
//! - The HUD

mod clock;
pub mod controller;
#[cfg(feature = "dev")]
mod debug;
mod drops;
mod falling;
mod hud;
mod rules;
mod session;

use bevy::prelude::*;

use crate::{screens::Screen, theme::widget};

pub(super) fn plugin(app: &mut App) {
    // Rules first: drop rolls seed themselves from them.
    app.add_plugins(rules::plugin);
    app.add_plugins((
        drops::plugin,
        session::plugin,
        clock::plugin,
        controller::plugin,
        falling::plugin,
        hud::plugin,
    ));

    #[cfg(feature = "dev")]
    app.add_plugins(debug::plugin);
}

/// System to spawn the game view when entering gameplay.
/// Called from `screens/gameplay.rs` on `OnEnter(Screen::Gameplay)`.
pub fn spawn_game(
    mut commands: Commands,
    session: Res<session::GameSession>,
    rules: Res<rules::GameRules>,
) {
    commands.spawn((
        widget::ui_root("Game View"),
        DespawnOnExit(Screen::Gameplay),
        children![
            hud::hud_bar(&session, &rules),
            falling::playfield(&rules),
            hud::message_box(&session, &rules),
        ],
    ));

    info!("Game view spawned");
}
