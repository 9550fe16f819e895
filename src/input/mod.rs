//! Input module - turns keys, buttons and window resizes into ControlActions
//! and applies them to the session between frames

use bevy::prelude::*;
use bevy::window::WindowResized;

use crate::events::{BounceEvent, EventBus};
use crate::session::{BounceSession, ControlAction, ControlOutcome};

/// Map this frame's key presses to control actions.
/// Space pauses, R resets, Up/= speeds up, Down/- slows down.
pub fn keyboard_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut actions: MessageWriter<ControlAction>,
) {
    if keyboard.just_pressed(KeyCode::Space) {
        actions.write(ControlAction::TogglePause);
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        actions.write(ControlAction::Reset);
    }
    if keyboard.just_pressed(KeyCode::ArrowUp) || keyboard.just_pressed(KeyCode::Equal) {
        actions.write(ControlAction::SpeedUp);
    }
    if keyboard.just_pressed(KeyCode::ArrowDown) || keyboard.just_pressed(KeyCode::Minus) {
        actions.write(ControlAction::SpeedDown);
    }
}

/// Forward the latest window size as a Resize action
pub fn window_resize_controls(
    mut resized: MessageReader<WindowResized>,
    mut actions: MessageWriter<ControlAction>,
) {
    let Some(last) = resized.read().last() else {
        return;
    };
    actions.write(ControlAction::Resize {
        width: last.width,
        height: last.height,
    });
}

/// Event to log for a control outcome, if anything changed
pub fn outcome_event(action: ControlAction, outcome: ControlOutcome) -> Option<BounceEvent> {
    match outcome {
        ControlOutcome::Paused(paused) => Some(BounceEvent::Pause { paused }),
        ControlOutcome::Reset => Some(BounceEvent::Reset),
        ControlOutcome::SpeedChanged(speed) => Some(BounceEvent::SpeedChange { speed }),
        ControlOutcome::Resized(boundary) => match action {
            ControlAction::Resize { width, height } => Some(BounceEvent::Resize {
                width,
                height,
                radius: boundary.radius,
            }),
            _ => None,
        },
        ControlOutcome::Ignored => None,
    }
}

/// Refit the boundary to the size the window actually got and restart
/// from one ball, logging RZ and RS. Returns false when nothing changed.
pub fn fit_session_to_viewport(
    session: &mut BounceSession,
    bus: &mut EventBus,
    width: f32,
    height: f32,
) -> bool {
    if session.boundary.viewport() == Vec2::new(width, height) {
        return false;
    }
    let action = ControlAction::Resize { width, height };
    let Some(event) = outcome_event(action, session.apply(action)) else {
        return false;
    };
    bus.emit(event);
    session.reset();
    bus.emit(BounceEvent::Reset);
    true
}

/// Apply queued controls before the step
pub fn apply_controls(
    mut actions: MessageReader<ControlAction>,
    mut session: ResMut<BounceSession>,
    mut bus: ResMut<EventBus>,
) {
    for &action in actions.read() {
        let outcome = session.apply(action);
        match outcome {
            ControlOutcome::Paused(paused) => {
                info!("{}", if paused { "Paused" } else { "Resumed" })
            }
            ControlOutcome::Reset => info!("Reset to a single ball"),
            ControlOutcome::SpeedChanged(speed) => info!("Speed now {}", speed),
            ControlOutcome::Resized(boundary) => info!(
                "Boundary now center ({:.0}, {:.0}) radius {:.0}",
                boundary.center.x, boundary.center.y, boundary.radius
            ),
            ControlOutcome::Ignored => debug!("{} ignored", action.label()),
        }
        if let Some(event) = outcome_event(action, outcome) {
            bus.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Boundary;

    #[test]
    fn test_ignored_outcomes_are_not_logged() {
        assert_eq!(
            outcome_event(ControlAction::SpeedDown, ControlOutcome::Ignored),
            None
        );
    }

    #[test]
    fn test_resize_event_carries_radius() {
        let boundary = Boundary::from_viewport(1024.0, 768.0).unwrap();
        let event = outcome_event(
            ControlAction::Resize {
                width: 1024.0,
                height: 768.0,
            },
            ControlOutcome::Resized(boundary),
        );
        assert_eq!(
            event,
            Some(BounceEvent::Resize {
                width: 1024.0,
                height: 768.0,
                radius: 384.0
            })
        );
    }

    #[test]
    fn test_apply_controls_in_app() {
        let mut app = App::new();
        app.add_message::<ControlAction>()
            .insert_resource(BounceSession::with_seed(
                Boundary::from_viewport(400.0, 400.0).unwrap(),
                3.0,
                9,
            ))
            .insert_resource(EventBus::new())
            .add_systems(Update, apply_controls);

        app.world_mut().write_message(ControlAction::TogglePause);
        app.world_mut().write_message(ControlAction::SpeedUp);
        app.update();

        let session = app.world().resource::<BounceSession>();
        assert!(session.paused);
        assert_eq!(session.speed, 4.0);

        let bus = app.world().resource::<EventBus>();
        let codes: Vec<_> = bus.peek().iter().map(|e| e.event.type_code()).collect();
        assert_eq!(codes, vec!["PA", "SP"]);
    }

    fn control_app() -> App {
        let mut app = App::new();
        app.add_message::<ControlAction>()
            .insert_resource(BounceSession::with_seed(
                Boundary::from_viewport(400.0, 400.0).unwrap(),
                3.0,
                9,
            ))
            .insert_resource(EventBus::new());
        app
    }

    fn bus_codes(app: &App) -> Vec<&'static str> {
        app.world()
            .resource::<EventBus>()
            .peek()
            .iter()
            .map(|e| e.event.type_code())
            .collect()
    }

    #[test]
    fn test_last_resize_of_frame_wins() {
        let mut app = control_app();
        app.add_message::<WindowResized>()
            .add_systems(Update, (window_resize_controls, apply_controls).chain());

        let window = app.world_mut().spawn_empty().id();
        app.world_mut().write_message(WindowResized {
            window,
            width: 300.0,
            height: 200.0,
        });
        app.world_mut().write_message(WindowResized {
            window,
            width: 1000.0,
            height: 500.0,
        });
        app.update();

        let session = app.world().resource::<BounceSession>();
        assert_eq!(Some(session.boundary), Boundary::from_viewport(1000.0, 500.0));
        assert_eq!(bus_codes(&app), vec!["RZ"]);
        assert_eq!(
            app.world().resource::<EventBus>().peek()[0].event,
            BounceEvent::Resize {
                width: 1000.0,
                height: 500.0,
                radius: 250.0
            }
        );
    }

    #[test]
    fn test_no_resize_no_action() {
        let mut app = control_app();
        app.add_message::<WindowResized>()
            .add_systems(Update, (window_resize_controls, apply_controls).chain());
        app.update();
        assert!(bus_codes(&app).is_empty());
    }

    #[test]
    fn test_key_presses_become_controls() {
        let mut app = control_app();
        app.init_resource::<ButtonInput<KeyCode>>()
            .add_systems(Update, (keyboard_controls, apply_controls).chain());

        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.press(KeyCode::Space);
            keys.press(KeyCode::Minus);
        }
        app.update();

        let session = app.world().resource::<BounceSession>();
        assert!(session.paused);
        assert_eq!(session.speed, 2.0);
        assert_eq!(bus_codes(&app), vec!["PA", "SP"]);
    }

    #[test]
    fn test_fit_to_viewport_logs_resize_and_reset() {
        let mut session =
            BounceSession::with_seed(Boundary::from_viewport(800.0, 600.0).unwrap(), 3.0, 4);
        session.hit_count = 7;
        let mut bus = EventBus::new();

        assert!(fit_session_to_viewport(&mut session, &mut bus, 640.0, 480.0));
        assert_eq!(session.boundary.viewport(), Vec2::new(640.0, 480.0));
        assert_eq!(session.population(), 1);
        assert_eq!(session.hit_count, 0);
        let codes: Vec<_> = bus.peek().iter().map(|e| e.event.type_code()).collect();
        assert_eq!(codes, vec!["RZ", "RS"]);

        // Same size again is a no-op
        assert!(!fit_session_to_viewport(&mut session, &mut bus, 640.0, 480.0));
        assert_eq!(bus.pending_count(), 2);
    }
}
