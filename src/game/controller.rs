//! Session lifecycle: starting a run, tearing it down on game over, and
//! returning to the home view after the final message.

use bevy::prelude::*;

use super::{
    clock::SessionClock,
    falling::{FocusedDrop, WaterDrop},
    rules::GameRules,
    session::{GameOverSummary, GameSession},
};
use crate::{AppSystems, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<StartSession>();
    app.add_message::<SessionEnded>();
    app.init_resource::<LastRun>();

    app.add_systems(
        Update,
        (
            start_session.in_set(AppSystems::RecordInput),
            finish_session.in_set(AppSystems::Update),
            return_home
                .in_set(AppSystems::TickTimers)
                .run_if(resource_exists::<ReturnHome>),
        ),
    );
}

/// Request to begin a new session (start button, debug key).
#[derive(Message, Debug, Clone, Copy)]
pub struct StartSession;

/// Sent exactly once per session, by whichever update drained the gauge.
#[derive(Message, Debug, Clone, Copy)]
pub struct SessionEnded(pub GameOverSummary);

/// Result of the most recent session, shown on the home view.
#[derive(Resource, Debug, Default)]
pub struct LastRun(pub Option<GameOverSummary>);

/// Delay between the game-over message and the home view.
#[derive(Resource, Debug)]
pub struct ReturnHome(pub Timer);

fn start_session(
    mut requests: MessageReader<StartSession>,
    mut session: ResMut<GameSession>,
    rules: Res<GameRules>,
    mut commands: Commands,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    for _ in requests.read() {
        if session.start(&rules) {
            commands.insert_resource(SessionClock::new(&rules));
            next_screen.set(Screen::Gameplay);
            info!("Session started with {} hydration", session.hydration);
        } else {
            debug!("Ignoring start request while {:?}", session.phase);
        }
    }
}

fn finish_session(
    mut ended: MessageReader<SessionEnded>,
    mut commands: Commands,
    rules: Res<GameRules>,
    drops: Query<Entity, With<WaterDrop>>,
    mut focus: ResMut<FocusedDrop>,
    mut last_run: ResMut<LastRun>,
) {
    let Some(SessionEnded(summary)) = ended.read().last().copied() else {
        return;
    };

    commands.remove_resource::<SessionClock>();
    for entity in &drops {
        commands.entity(entity).try_despawn();
    }
    focus.0 = None;
    last_run.0 = Some(summary);
    commands.insert_resource(ReturnHome(Timer::new(
        rules.return_home_delay(),
        TimerMode::Once,
    )));

    info!(
        "GAME OVER! Score: {}, survived {}s",
        summary.score, summary.elapsed_seconds
    );
}

fn return_home(
    time: Res<Time>,
    mut timer: ResMut<ReturnHome>,
    mut session: ResMut<GameSession>,
    mut commands: Commands,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }

    session.return_home();
    commands.remove_resource::<ReturnHome>();
    next_screen.set(Screen::Title);
    info!("Back to the home view");
}
