//! The main menu (seen on the home view).

use bevy::prelude::*;

use crate::{
    game::controller::{LastRun, StartSession},
    menus::Menu,
    theme::widget,
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::Main), spawn_main_menu);
}

fn spawn_main_menu(mut commands: Commands, last_run: Res<LastRun>) {
    let last_run = match last_run.0 {
        Some(summary) => format!(
            "Last run: {} points, survived {}s",
            summary.score, summary.elapsed_seconds
        ),
        None => "Keep your hydration above zero.".to_string(),
    };

    commands.spawn((
        widget::ui_root("Main Menu"),
        GlobalZIndex(2),
        DespawnOnExit(Menu::Main),
        #[cfg(not(target_family = "wasm"))]
        children![
            widget::header("Thirst Mode"),
            widget::label("Click clean drops, dodge dirty ones."),
            widget::label(last_run),
            widget::button("Start", start_game),
            widget::button("Exit", exit_app),
        ],
        #[cfg(target_family = "wasm")]
        children![
            widget::header("Thirst Mode"),
            widget::label("Click clean drops, dodge dirty ones."),
            widget::label(last_run),
            widget::button("Start", start_game),
        ],
    ));
}

fn start_game(_: On<Pointer<Click>>, mut start: MessageWriter<StartSession>) {
    start.write(StartSession);
}

#[cfg(not(target_family = "wasm"))]
fn exit_app(_: On<Pointer<Click>>, mut app_exit: MessageWriter<AppExit>) {
    app_exit.write(AppExit::Success);
}
