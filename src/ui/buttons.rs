//! On-screen control buttons (pause, reset, faster, slower)

use bevy::prelude::*;

use crate::constants::*;
use crate::session::{BounceSession, ControlAction};

/// Button that emits its action when pressed
#[derive(Component, Debug, Clone, Copy)]
pub struct ControlButton(pub ControlAction);

/// Label on the pause button, flipped to "Resume" while paused
#[derive(Component)]
pub struct PauseButtonLabel;

pub const BUTTON_ACTIONS: [ControlAction; 4] = [
    ControlAction::TogglePause,
    ControlAction::Reset,
    ControlAction::SpeedUp,
    ControlAction::SpeedDown,
];

/// Row of buttons anchored bottom-right
pub fn spawn_control_buttons(commands: &mut Commands) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            right: Val::Px(10.0),
            bottom: Val::Px(10.0),
            flex_direction: FlexDirection::Row,
            column_gap: Val::Px(8.0),
            ..default()
        })
        .with_children(|row| {
            for action in BUTTON_ACTIONS {
                let mut button = row.spawn((
                    ControlButton(action),
                    Button,
                    Node {
                        padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
                        ..default()
                    },
                    BackgroundColor(BUTTON_NORMAL),
                ));
                button.with_children(|b| {
                    let mut label = b.spawn((
                        Text::new(action.label()),
                        TextFont {
                            font_size: HUD_FONT_SIZE,
                            ..default()
                        },
                        TextColor(TEXT_PRIMARY),
                    ));
                    if action == ControlAction::TogglePause {
                        label.insert(PauseButtonLabel);
                    }
                });
            }
        });
}

/// Pressed buttons become ControlActions; hover state tints the background
pub fn button_controls(
    mut buttons: Query<
        (&Interaction, &ControlButton, &mut BackgroundColor),
        Changed<Interaction>,
    >,
    mut actions: MessageWriter<ControlAction>,
) {
    for (interaction, button, mut background) in &mut buttons {
        match *interaction {
            Interaction::Pressed => {
                background.0 = BUTTON_PRESSED;
                actions.write(button.0);
            }
            Interaction::Hovered => background.0 = BUTTON_HOVERED,
            Interaction::None => background.0 = BUTTON_NORMAL,
        }
    }
}

pub fn update_pause_label(
    session: Res<BounceSession>,
    mut labels: Query<&mut Text, With<PauseButtonLabel>>,
) {
    if !session.is_changed() {
        return;
    }
    let label = if session.paused { "Resume" } else { "Pause" };
    for mut text in &mut labels {
        if text.0 != label {
            text.0 = label.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Boundary;
    use crate::events::EventBus;
    use crate::input::apply_controls;

    fn app() -> App {
        let mut app = App::new();
        app.add_message::<ControlAction>()
            .insert_resource(BounceSession::with_seed(
                Boundary::from_viewport(300.0, 300.0).unwrap(),
                3.0,
                2,
            ))
            .insert_resource(EventBus::new());
        app
    }

    #[test]
    fn test_pressed_button_sends_its_action() {
        let mut app = app();
        app.add_systems(Update, (button_controls, apply_controls).chain());
        let pressed = app
            .world_mut()
            .spawn((
                Interaction::Pressed,
                ControlButton(ControlAction::SpeedUp),
                BackgroundColor(BUTTON_NORMAL),
            ))
            .id();
        let hovered = app
            .world_mut()
            .spawn((
                Interaction::Hovered,
                ControlButton(ControlAction::Reset),
                BackgroundColor(BUTTON_NORMAL),
            ))
            .id();
        app.update();

        assert_eq!(app.world().resource::<BounceSession>().speed, 4.0);
        let codes: Vec<_> = app
            .world()
            .resource::<EventBus>()
            .peek()
            .iter()
            .map(|e| e.event.type_code())
            .collect();
        assert_eq!(codes, vec!["SP"]);

        let color = |e: Entity| app.world().get::<BackgroundColor>(e).map(|c| c.0);
        assert_eq!(color(pressed), Some(BUTTON_PRESSED));
        assert_eq!(color(hovered), Some(BUTTON_HOVERED));
    }

    #[test]
    fn test_pause_label_follows_session() {
        let mut app = app();
        app.add_systems(Update, update_pause_label);
        let label = app
            .world_mut()
            .spawn((Text::new("Pause"), PauseButtonLabel))
            .id();

        app.world_mut().resource_mut::<BounceSession>().paused = true;
        app.update();
        assert_eq!(app.world().get::<Text>(label).map(|t| t.0.as_str()), Some("Resume"));

        app.world_mut().resource_mut::<BounceSession>().paused = false;
        app.update();
        assert_eq!(app.world().get::<Text>(label).map(|t| t.0.as_str()), Some("Pause"));
    }
}
