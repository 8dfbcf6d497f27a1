//! Periodic processes of a running session: the one-second tick and the
//! drop spawner.
//!
//! Both timers live in the `SessionClock` resource. Removing the resource is
//! how a session cancels them, so nothing ticks or spawns after game over.

use bevy::prelude::*;
use std::time::Duration;

use super::{
    controller::SessionEnded,
    drops::DropRng,
    falling::DropSpawned,
    rules::GameRules,
    session::GameSession,
};
use crate::AppSystems;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<SessionClock>();

    app.add_systems(
        Update,
        run_session_clock
            .in_set(AppSystems::TickTimers)
            .run_if(resource_exists::<SessionClock>),
    );
}

/// The two repeating timers driving a session.
#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct SessionClock {
    tick: Timer,
    spawn: Timer,
}

/// How often each timer fired during one advance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClockFires {
    pub ticks: u32,
    pub spawns: u32,
}

impl SessionClock {
    pub fn new(rules: &GameRules) -> Self {
        Self {
            tick: Timer::new(rules.tick_interval(), TimerMode::Repeating),
            spawn: Timer::new(rules.spawn_interval(), TimerMode::Repeating),
        }
    }

    pub fn advance(&mut self, delta: Duration) -> ClockFires {
        self.tick.tick(delta);
        self.spawn.tick(delta);
        ClockFires {
            ticks: self.tick.times_finished_this_tick(),
            spawns: self.spawn.times_finished_this_tick(),
        }
    }
}

/// Fire due ticks first, then due spawns. A tick that ends the session stops
/// everything queued behind it.
fn run_session_clock(
    time: Res<Time>,
    mut clock: ResMut<SessionClock>,
    mut session: ResMut<GameSession>,
    rules: Res<GameRules>,
    mut rng: ResMut<DropRng>,
    mut ended: MessageWriter<SessionEnded>,
    mut spawned: MessageWriter<DropSpawned>,
) {
    let fires = clock.advance(time.delta());

    for _ in 0..fires.ticks {
        if let Some(summary) = session.tick(&rules) {
            ended.write(SessionEnded(summary));
            return;
        }
    }

    for _ in 0..fires.spawns {
        let Some((id, spec)) = session.spawn_drop(&mut rng.0, &rules) else {
            return;
        };
        debug!(
            "Spawned {:?} drop {} ({} ms fall, {} live)",
            spec.kind,
            id,
            spec.fall_duration_ms,
            session.drop_count()
        );
        spawned.write(DropSpawned { id, spec });
    }
}
