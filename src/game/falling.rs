//! Drops on screen: spawning their nodes, the fall, and player input.
//!
//! Each drop node carries its own fall timer. When the timer runs out the
//! drop expires; clicking it (or pressing Enter/Space while it has focus)
//! collects it. Either way the session decides what happens, the node is
//! just despawned.

use bevy::prelude::*;
use std::collections::HashMap;

use super::{
    controller::SessionEnded,
    drops::{DropId, DropKind, DropSpec},
    rules::GameRules,
    session::{GameSession, Resolution},
};
use crate::{AppSystems, screens::Screen, theme::palette::FOCUS_OUTLINE};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<WaterDrop>();
    app.add_message::<DropSpawned>();
    app.init_resource::<FocusedDrop>();

    app.add_systems(
        Update,
        (
            (cycle_focus, activate_focused_drop)
                .chain()
                .in_set(AppSystems::RecordInput),
            (spawn_drop_nodes, fall_and_expire, outline_focused_drop)
                .chain()
                .in_set(AppSystems::Update),
        )
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// Message sent by the spawn timer for every new drop.
#[derive(Message, Debug, Clone, Copy)]
pub struct DropSpawned {
    pub id: DropId,
    pub spec: DropSpec,
}

/// Marker for the area drops fall through.
#[derive(Component, Debug)]
pub struct Playfield;

/// A drop node, linked to its session entry.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct WaterDrop {
    pub id: DropId,
    pub kind: DropKind,
}

/// Time left before the drop reaches the bottom.
#[derive(Component, Debug)]
pub struct Falling(pub Timer);

/// The drop that Enter/Space would activate.
#[derive(Resource, Debug, Default)]
pub struct FocusedDrop(pub Option<Entity>);

/// The playfield node, sized from the rules.
pub fn playfield(rules: &GameRules) -> impl Bundle + use<> {
    (
        Name::new("Playfield"),
        Playfield,
        Node {
            width: Val::Px(rules.playfield_width),
            height: Val::Px(rules.playfield_height),
            overflow: Overflow::clip(),
            ..default()
        },
        BackgroundColor(crate::theme::palette::PLAYFIELD_BACKGROUND),
    )
}

/// Vertical position of a drop's top edge at `fraction` of its fall.
pub fn fall_top(rules: &GameRules, fraction: f32) -> f32 {
    let start = -rules.drop_size;
    start + (rules.playfield_height - start) * fraction.clamp(0.0, 1.0)
}

fn spawn_drop_nodes(
    mut commands: Commands,
    mut spawned: MessageReader<DropSpawned>,
    playfield: Single<Entity, With<Playfield>>,
    rules: Res<GameRules>,
) {
    for DropSpawned { id, spec } in spawned.read().copied() {
        commands
            .spawn((
                Name::new(format!("{} {}", spec.kind.label(), id)),
                WaterDrop { id, kind: spec.kind },
                Falling(Timer::from_seconds(
                    spec.fall_duration_ms as f32 / 1000.0,
                    TimerMode::Once,
                )),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(spec.horizontal_position),
                    top: Val::Px(fall_top(&rules, 0.0)),
                    width: Val::Px(rules.drop_size),
                    height: Val::Px(rules.drop_size),
                    ..default()
                },
                BackgroundColor(spec.kind.to_color()),
                Outline::new(Val::Px(3.0), Val::ZERO, Color::NONE),
                ChildOf(*playfield),
            ))
            .observe(collect_on_click)
            .observe(focus_on_hover)
            .observe(blur_on_leave);
    }
}

/// Move drops down and expire the ones that reached the bottom.
fn fall_and_expire(
    mut commands: Commands,
    time: Res<Time>,
    rules: Res<GameRules>,
    mut session: ResMut<GameSession>,
    mut drops: Query<(Entity, &WaterDrop, &mut Falling, &mut Node)>,
    mut ended: MessageWriter<SessionEnded>,
) {
    for (entity, drop, mut falling, mut node) in &mut drops {
        falling.0.tick(time.delta());
        node.top = Val::Px(fall_top(&rules, falling.0.fraction()));

        if !falling.0.just_finished() {
            continue;
        }

        commands.entity(entity).try_despawn();
        if let Some(resolved) = session.resolve_drop(drop.id, Resolution::Expired, &rules) {
            if resolved.kind == DropKind::Clean {
                debug!("Missed clean drop {}", drop.id);
            }
            if let Some(summary) = resolved.game_over {
                ended.write(SessionEnded(summary));
            }
        }
    }
}

/// Resolve a drop through player input and remove its node.
fn collect_drop(
    commands: &mut Commands,
    entity: Entity,
    drop: &WaterDrop,
    session: &mut GameSession,
    rules: &GameRules,
    ended: &mut MessageWriter<SessionEnded>,
) {
    let Some(resolved) = session.resolve_drop(drop.id, Resolution::Input, rules) else {
        return;
    };

    commands.entity(entity).try_despawn();
    debug!(
        "{:?} on {:?} drop {}: hydration {}, score {}",
        resolved.resolution, resolved.kind, drop.id, session.hydration, session.score
    );
    if let Some(summary) = resolved.game_over {
        ended.write(SessionEnded(summary));
    }
}

fn collect_on_click(
    click: On<Pointer<Click>>,
    mut commands: Commands,
    drops: Query<&WaterDrop>,
    mut session: ResMut<GameSession>,
    rules: Res<GameRules>,
    mut ended: MessageWriter<SessionEnded>,
) {
    let Ok(drop) = drops.get(click.entity) else {
        return;
    };
    collect_drop(
        &mut commands,
        click.entity,
        drop,
        &mut session,
        &rules,
        &mut ended,
    );
}

fn focus_on_hover(over: On<Pointer<Over>>, mut focus: ResMut<FocusedDrop>) {
    focus.0 = Some(over.entity);
}

fn blur_on_leave(out: On<Pointer<Out>>, mut focus: ResMut<FocusedDrop>) {
    if focus.0 == Some(out.entity) {
        focus.0 = None;
    }
}

/// Tab moves focus to the next live drop in spawn order, wrapping around.
fn cycle_focus(
    input: Res<ButtonInput<KeyCode>>,
    session: Res<GameSession>,
    drops: Query<(Entity, &WaterDrop)>,
    mut focus: ResMut<FocusedDrop>,
) {
    if !input.just_pressed(KeyCode::Tab) {
        return;
    }

    let entities: HashMap<DropId, Entity> = drops.iter().map(|(e, d)| (d.id, e)).collect();
    let order: Vec<Entity> = session
        .live_drops()
        .filter_map(|id| entities.get(&id).copied())
        .collect();

    let current = focus
        .0
        .and_then(|entity| order.iter().position(|e| *e == entity));
    let next = match current {
        Some(index) => order.get(index + 1).or_else(|| order.first()),
        None => order.first(),
    };
    focus.0 = next.copied();
}

fn activate_focused_drop(
    input: Res<ButtonInput<KeyCode>>,
    mut commands: Commands,
    focus: Res<FocusedDrop>,
    drops: Query<&WaterDrop>,
    mut session: ResMut<GameSession>,
    rules: Res<GameRules>,
    mut ended: MessageWriter<SessionEnded>,
) {
    if !input.any_just_pressed([KeyCode::Enter, KeyCode::Space]) {
        return;
    }
    let Some(entity) = focus.0 else {
        return;
    };
    let Ok(drop) = drops.get(entity) else {
        return;
    };
    collect_drop(&mut commands, entity, drop, &mut session, &rules, &mut ended);
}

fn outline_focused_drop(
    focus: Res<FocusedDrop>,
    mut outlines: Query<(Entity, &mut Outline), With<WaterDrop>>,
) {
    if !focus.is_changed() {
        return;
    }
    for (entity, mut outline) in &mut outlines {
        outline.color = if focus.0 == Some(entity) {
            FOCUS_OUTLINE
        } else {
            Color::NONE
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fall_starts_above_and_ends_at_bottom() {
        let rules = GameRules::default();
        assert_eq!(fall_top(&rules, 0.0), -rules.drop_size);
        assert_eq!(fall_top(&rules, 1.0), rules.playfield_height);
    }

    #[test]
    fn fall_is_monotonic_and_clamped() {
        let rules = GameRules::default();
        let mut last = fall_top(&rules, -1.0);
        for step in 0..=20 {
            let top = fall_top(&rules, step as f32 / 20.0);
            assert!(top >= last);
            last = top;
        }
        assert_eq!(fall_top(&rules, 2.0), rules.playfield_height);
    }
}
