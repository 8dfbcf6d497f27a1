//! Heads-up display: hydration gauge, time, score and the message box.

use bevy::prelude::*;

use super::{rules::GameRules, session::GameSession};
use crate::{
    AppSystems,
    screens::Screen,
    theme::palette::{GAUGE_BACKGROUND, GAUGE_FILL, LABEL_TEXT},
};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<HudField>();

    app.add_systems(
        Update,
        refresh_hud
            .in_set(AppSystems::Update)
            .run_if(in_state(Screen::Gameplay).and(resource_changed::<GameSession>)),
    );
}

/// Which session value a HUD text shows.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum HudField {
    Hydration,
    Time,
    Score,
    Message,
}

impl HudField {
    pub fn render(self, session: &GameSession, rules: &GameRules) -> String {
        match self {
            HudField::Hydration => format!("{}%", session.hydration_percent(rules).round()),
            HudField::Time => format!("Time: {}s", session.elapsed_seconds),
            HudField::Score => format!("Score: {}", session.score),
            HudField::Message => session.message.clone(),
        }
    }
}

/// The filled part of the hydration gauge.
#[derive(Component, Debug)]
pub struct HydrationFill;

fn hud_text(
    field: HudField,
    session: &GameSession,
    rules: &GameRules,
    size: f32,
) -> impl Bundle + use<> {
    (
        Name::new(format!("{field:?} Label")),
        field,
        Text::new(field.render(session, rules)),
        TextFont::from_font_size(size),
        TextColor(LABEL_TEXT),
        Pickable::IGNORE,
    )
}

/// Top bar: gauge with its percentage, then time and score.
pub fn hud_bar(session: &GameSession, rules: &GameRules) -> impl Bundle + use<> {
    let percent = session.hydration_percent(rules);
    (
        Name::new("HUD"),
        Node {
            width: Val::Px(rules.playfield_width),
            align_items: AlignItems::Center,
            justify_content: JustifyContent::SpaceBetween,
            column_gap: Val::Px(12.0),
            ..default()
        },
        Pickable::IGNORE,
        children![
            (
                Name::new("Hydration Gauge"),
                Node {
                    width: Val::Px(180.0),
                    height: Val::Px(22.0),
                    ..default()
                },
                BackgroundColor(GAUGE_BACKGROUND),
                Pickable::IGNORE,
                children![(
                    Name::new("Hydration Fill"),
                    HydrationFill,
                    Node {
                        width: Val::Percent(percent),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(GAUGE_FILL),
                    Pickable::IGNORE,
                )],
            ),
            hud_text(HudField::Hydration, session, rules, 22.0),
            hud_text(HudField::Time, session, rules, 22.0),
            hud_text(HudField::Score, session, rules, 22.0),
        ],
    )
}

pub fn message_box(session: &GameSession, rules: &GameRules) -> impl Bundle + use<> {
    hud_text(HudField::Message, session, rules, 24.0)
}

fn refresh_hud(
    session: Res<GameSession>,
    rules: Res<GameRules>,
    mut texts: Query<(&HudField, &mut Text)>,
    mut fill: Single<&mut Node, With<HydrationFill>>,
) {
    for (field, mut text) in &mut texts {
        text.0 = field.render(&session, &rules);
    }
    fill.width = Val::Percent(session.hydration_percent(&rules));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_render_session_values() {
        let rules = GameRules::default();
        let mut session = GameSession::default();
        session.start(&rules);
        session.tick(&rules);
        session.score = 4;

        assert_eq!(HudField::Hydration.render(&session, &rules), "99%");
        assert_eq!(HudField::Time.render(&session, &rules), "Time: 1s");
        assert_eq!(HudField::Score.render(&session, &rules), "Score: 4");
        assert_eq!(
            HudField::Message.render(&session, &rules),
            "Click the clean drops to survive!"
        );
    }

    #[test]
    fn gauge_label_uses_clamped_value() {
        let rules = GameRules::default();
        let mut session = GameSession::default();
        session.hydration = -12;
        assert_eq!(HudField::Hydration.render(&session, &rules), "0%");
    }
}
