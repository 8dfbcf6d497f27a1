//! Developer overlay and session controls.
//!
//! - `F1` toggles the overlay (phase, raw hydration, live drops)
//! - `F2` requests a new session
//! - `F3` ends the running session

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use super::{
    controller::{SessionEnded, StartSession},
    session::GameSession,
};
use crate::theme::palette::DEBUG_TEXT;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<DebugOverlayVisible>();
    app.add_systems(Startup, spawn_debug_overlay);

    app.add_systems(
        Update,
        (
            toggle_debug.run_if(input_just_pressed(KeyCode::F1)),
            request_start.run_if(input_just_pressed(KeyCode::F2)),
            force_game_over.run_if(input_just_pressed(KeyCode::F3)),
            update_debug_overlay.run_if(debug_visible),
        ),
    );
}

/// Resource to track if the debug overlay is visible.
#[derive(Resource, Default)]
pub struct DebugOverlayVisible(pub bool);

#[derive(Component)]
struct DebugOverlay;

fn debug_visible(debug: Res<DebugOverlayVisible>) -> bool {
    debug.0
}

fn spawn_debug_overlay(mut commands: Commands) {
    commands.spawn((
        Name::new("Debug Overlay"),
        DebugOverlay,
        Text::new(""),
        TextFont::from_font_size(14.0),
        TextColor(DEBUG_TEXT),
        Node {
            position_type: PositionType::Absolute,
            right: Val::Px(8.0),
            top: Val::Px(8.0),
            ..default()
        },
        Visibility::Hidden,
        GlobalZIndex(10),
        Pickable::IGNORE,
    ));
}

fn toggle_debug(
    mut debug: ResMut<DebugOverlayVisible>,
    mut overlay: Single<&mut Visibility, With<DebugOverlay>>,
) {
    debug.0 = !debug.0;
    **overlay = if debug.0 {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };
    let state = if debug.0 { "ON" } else { "OFF" };
    info!("Debug overlay: {}", state);
}

fn request_start(mut start: MessageWriter<StartSession>) {
    start.write(StartSession);
}

fn force_game_over(mut session: ResMut<GameSession>, mut ended: MessageWriter<SessionEnded>) {
    if let Some(summary) = session.end_game() {
        info!("Debug: forced game over");
        ended.write(SessionEnded(summary));
    }
}

fn update_debug_overlay(
    session: Res<GameSession>,
    mut overlay: Single<&mut Text, With<DebugOverlay>>,
) {
    overlay.0 = format!(
        "phase: {:?}\nhydration: {}\nelapsed: {}s\nscore: {}\nlive drops: {}",
        session.phase,
        session.hydration,
        session.elapsed_seconds,
        session.score,
        session.drop_count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn overlay_starts_hidden_in_debug_colour() {
        let mut world = World::new();
        world.run_system_once(spawn_debug_overlay).unwrap();

        let mut overlays =
            world.query_filtered::<(&TextColor, &Visibility), With<DebugOverlay>>();
        let (color, visibility) = overlays.single(&world).unwrap();
        assert_eq!(color.0, DEBUG_TEXT);
        assert_eq!(*visibility, Visibility::Hidden);
    }
}
